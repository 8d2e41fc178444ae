pub mod auth;
pub mod debug;
pub mod profile;
pub mod progress;
pub mod recovery;

use crate::db::AppState;
use crate::journey::JourneyStatus;
use std::sync::Arc;
use tauri::State;

/// Where the UI should route: setup, quit-date picker, or dashboard.
#[tauri::command]
pub async fn get_journey_status(
  state: State<'_, Arc<AppState>>,
  user_id: String,
) -> Result<JourneyStatus, String> {
  let profile = crate::profile::load_profile(&state.db, &user_id).await?;
  Ok(JourneyStatus::of(profile.as_ref()))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::test_utils::*;
  use serial_test::serial;
  use tauri::Manager;

  #[tokio::test]
  #[serial]
  async fn test_journey_status_routes_by_profile_state() {
    let pool = setup_test_db().await;
    let state = Arc::new(AppState { db: pool.clone() });
    let app = tauri::test::mock_app();
    app.manage(state);

    // No profile yet
    let status = get_journey_status(app.state(), "test-user".to_string())
      .await
      .unwrap();
    assert_eq!(status, JourneyStatus::NoProfile);

    // Profile with quit date
    seed_test_profile(&pool, "test-user").await;
    let status = get_journey_status(app.state(), "test-user".to_string())
      .await
      .unwrap();
    assert_eq!(status, JourneyStatus::Active);

    // Quit date cleared
    crate::profile::set_quit_date(&pool, "test-user", None)
      .await
      .unwrap();
    let status = get_journey_status(app.state(), "test-user".to_string())
      .await
      .unwrap();
    assert_eq!(status, JourneyStatus::AwaitingQuitDate);

    teardown_test_db(pool).await;
  }
}
