//! Profile commands: setup, reset, relapse
//!
//! Writes are optimistic. The command validates, hands the write to the
//! background, and returns the new local state immediately; persistence
//! failures are logged, never surfaced (best-effort, last-write-wins).

use crate::db::AppState;
use crate::journey::JourneyStatus;
use crate::profile::{load_profile, set_quit_date, spawn_write, upsert_profile, ProfileError, UserProfile};
use chrono::Utc;
use std::sync::Arc;
use tauri::State;

/// ---------------------------------------------------------------------------
/// Read
/// ---------------------------------------------------------------------------

#[tauri::command]
pub async fn get_profile(
  state: State<'_, Arc<AppState>>,
  user_id: String,
) -> Result<Option<UserProfile>, String> {
  load_profile(&state.db, &user_id).await
}

/// ---------------------------------------------------------------------------
/// Setup
/// ---------------------------------------------------------------------------

/// Complete (or redo) setup. Field validation happens here, before the
/// store is touched; the write itself is fire-and-forget.
#[tauri::command]
pub async fn complete_setup(
  state: State<'_, Arc<AppState>>,
  user_id: String,
  profile: UserProfile,
) -> Result<UserProfile, ProfileError> {
  profile.validate(Utc::now())?;

  let db = state.db.clone();
  let to_save = profile.clone();
  spawn_write("profile", async move {
    upsert_profile(&db, &user_id, &to_save).await
  });

  println!("Setup complete, journey begins");
  Ok(profile)
}

/// ---------------------------------------------------------------------------
/// Reset & Relapse
/// ---------------------------------------------------------------------------

/// Clear the quit date and send the user back to pick a new one. All
/// other profile fields are kept.
#[tauri::command]
pub async fn reset_journey(
  state: State<'_, Arc<AppState>>,
  user_id: String,
) -> Result<JourneyStatus, String> {
  let db = state.db.clone();
  spawn_write("quit date", async move {
    set_quit_date(&db, &user_id, None).await
  });

  println!("Journey reset - awaiting a new quit date");
  Ok(JourneyStatus::AwaitingQuitDate)
}

/// A relapse is the same store transition as a reset; only the framing
/// in the UI differs.
#[tauri::command]
pub async fn record_relapse(
  state: State<'_, Arc<AppState>>,
  user_id: String,
) -> Result<JourneyStatus, String> {
  let db = state.db.clone();
  spawn_write("quit date", async move {
    set_quit_date(&db, &user_id, None).await
  });

  println!("Relapse recorded - journey restarted");
  Ok(JourneyStatus::AwaitingQuitDate)
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;
  use crate::test_utils::*;
  use chrono::Duration;
  use serial_test::serial;
  use tauri::Manager;

  #[tokio::test]
  #[serial]
  async fn test_get_profile_none_for_new_user() {
    let pool = setup_test_db().await;
    let state = Arc::new(AppState { db: pool.clone() });
    let app = tauri::test::mock_app();
    app.manage(state);

    let result = get_profile(app.state(), "test-user".to_string()).await;
    assert!(result.unwrap().is_none());

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  #[serial]
  async fn test_complete_setup_returns_optimistic_profile() {
    let pool = setup_test_db().await;
    let state = Arc::new(AppState { db: pool.clone() });
    let app = tauri::test::mock_app();
    app.manage(state);

    let profile = mock_profile();
    let returned = complete_setup(app.state(), "test-user".to_string(), profile.clone())
      .await
      .expect("Setup should succeed");

    // The command answers before the write lands
    assert_eq!(returned.name, profile.name);
    assert_eq!(returned.quit_date, profile.quit_date);

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  #[serial]
  async fn test_complete_setup_rejects_invalid_form() {
    let pool = setup_test_db().await;
    let state = Arc::new(AppState { db: pool.clone() });
    let app = tauri::test::mock_app();
    app.manage(state);

    let mut profile = mock_profile();
    profile.pack_size = 0;

    let result = complete_setup(app.state(), "test-user".to_string(), profile).await;
    assert!(matches!(result, Err(ProfileError::InvalidPackSize)));

    // Nothing was written
    let stored = load_profile(&pool, "test-user").await.unwrap();
    assert!(stored.is_none());

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  #[serial]
  async fn test_complete_setup_rejects_future_quit_date() {
    let pool = setup_test_db().await;
    let state = Arc::new(AppState { db: pool.clone() });
    let app = tauri::test::mock_app();
    app.manage(state);

    let mut profile = mock_profile();
    profile.quit_date = Some(Utc::now() + Duration::days(2));

    let result = complete_setup(app.state(), "test-user".to_string(), profile).await;
    assert!(matches!(result, Err(ProfileError::QuitDateInFuture)));

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  #[serial]
  async fn test_reset_returns_awaiting_status() {
    let pool = setup_test_db().await;
    seed_test_profile(&pool, "test-user").await;
    let state = Arc::new(AppState { db: pool.clone() });
    let app = tauri::test::mock_app();
    app.manage(state);

    let status = reset_journey(app.state(), "test-user".to_string())
      .await
      .unwrap();
    assert_eq!(status, JourneyStatus::AwaitingQuitDate);

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  #[serial]
  async fn test_relapse_returns_awaiting_status() {
    let pool = setup_test_db().await;
    seed_test_profile(&pool, "test-user").await;
    let state = Arc::new(AppState { db: pool.clone() });
    let app = tauri::test::mock_app();
    app.manage(state);

    let status = record_relapse(app.state(), "test-user".to_string())
      .await
      .unwrap();
    assert_eq!(status, JourneyStatus::AwaitingQuitDate);

    teardown_test_db(pool).await;
  }
}
