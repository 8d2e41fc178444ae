//! AI recovery summary commands
//!
//! One guarded call to the Claude adapter. Any failure collapses to a
//! single generic user-facing message; retry is the user tapping the
//! button again. Successful summaries are recorded best-effort so the
//! dashboard can show the latest without refetching.

use crate::db::AppState;
use crate::llm::{ClaudeClient, RecoveryStatsInput, RECOVERY_FAILURE_MESSAGE};
use crate::models::RecoveryStatsRecord;
use crate::profile::load_profile;
use chrono::Utc;
use std::sync::Arc;
use tauri::State;

/// ---------------------------------------------------------------------------
/// Fetch
/// ---------------------------------------------------------------------------

/// Generate a personalized recovery summary for the signed-in user.
///
/// No request-id guarding: if the user triggers overlapping fetches,
/// whichever resolves last is the one that sticks.
#[tauri::command]
pub async fn fetch_recovery_stats(
  state: State<'_, Arc<AppState>>,
  user_id: String,
) -> Result<String, String> {
  let profile = load_profile(&state.db, &user_id)
    .await?
    .ok_or_else(|| format!("No profile for user: {}", user_id))?;

  let quit_date = profile
    .quit_date
    .ok_or_else(|| "No quit date set - complete setup first".to_string())?;

  let days_since_quitting = (Utc::now() - quit_date).num_days().max(0);

  let input = RecoveryStatsInput {
    days_since_quitting,
    cigarettes_per_day_before_quitting: profile.cigarettes_per_day,
    years_smoking: profile.years_smoked,
  };

  let client = match ClaudeClient::from_env() {
    Ok(client) => client,
    Err(e) => {
      eprintln!("Recovery stats unavailable: {}", e);
      return Err(RECOVERY_FAILURE_MESSAGE.to_string());
    }
  };

  let (stats, usage) = match client.recovery_stats(&input).await {
    Ok(result) => result,
    Err(e) => {
      eprintln!("Recovery stats request failed: {}", e);
      return Err(RECOVERY_FAILURE_MESSAGE.to_string());
    }
  };

  println!(
    "Recovery stats generated ({} in / {} out tokens)",
    usage.input_tokens, usage.output_tokens
  );

  // Best-effort history write; the summary is already on its way back
  if let Err(e) = save_recovery_stats(
    &state.db,
    &user_id,
    days_since_quitting,
    &stats.lung_recovery_stats,
  )
  .await
  {
    eprintln!("Failed to store recovery stats: {}", e);
  }

  Ok(stats.lung_recovery_stats)
}

/// ---------------------------------------------------------------------------
/// Latest Stored Summary
/// ---------------------------------------------------------------------------

#[tauri::command]
pub async fn get_latest_recovery_stats(
  state: State<'_, Arc<AppState>>,
  user_id: String,
) -> Result<Option<RecoveryStatsRecord>, String> {
  sqlx::query_as::<_, RecoveryStatsRecord>(
    r#"
    SELECT * FROM recovery_stats
    WHERE user_id = ?1
    ORDER BY id DESC
    LIMIT 1
    "#,
  )
  .bind(&user_id)
  .fetch_optional(&state.db)
  .await
  .map_err(|e| format!("Failed to load recovery stats: {}", e))
}

/// ---------------------------------------------------------------------------
/// Database Helpers
/// ---------------------------------------------------------------------------

async fn save_recovery_stats(
  db: &crate::db::DbPool,
  user_id: &str,
  days_since_quitting: i64,
  text: &str,
) -> Result<(), String> {
  sqlx::query(
    r#"
    INSERT INTO recovery_stats (user_id, days_since_quitting, lung_recovery_stats, model_version)
    VALUES (?1, ?2, ?3, ?4)
    "#,
  )
  .bind(user_id)
  .bind(days_since_quitting)
  .bind(text)
  .bind(ClaudeClient::model_version())
  .execute(db)
  .await
  .map_err(|e| format!("Failed to insert recovery stats: {}", e))?;

  Ok(())
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;
  use crate::test_utils::*;
  use serial_test::serial;
  use tauri::Manager;

  #[tokio::test]
  #[serial]
  async fn test_fetch_without_api_key_gives_generic_message() {
    let pool = setup_test_db().await;
    seed_test_profile(&pool, "test-user").await;
    let state = Arc::new(AppState { db: pool.clone() });
    let app = tauri::test::mock_app();
    app.manage(state);

    std::env::remove_var("ANTHROPIC_API_KEY");

    let result = fetch_recovery_stats(app.state(), "test-user".to_string()).await;
    assert_eq!(result.unwrap_err(), RECOVERY_FAILURE_MESSAGE);

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  #[serial]
  async fn test_fetch_requires_quit_date() {
    let pool = setup_test_db().await;
    seed_test_profile(&pool, "test-user").await;
    crate::profile::set_quit_date(&pool, "test-user", None)
      .await
      .unwrap();
    let state = Arc::new(AppState { db: pool.clone() });
    let app = tauri::test::mock_app();
    app.manage(state);

    let result = fetch_recovery_stats(app.state(), "test-user".to_string()).await;
    assert!(result.unwrap_err().contains("quit date"));

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  #[serial]
  async fn test_latest_is_none_before_any_fetch() {
    let pool = setup_test_db().await;
    let state = Arc::new(AppState { db: pool.clone() });
    let app = tauri::test::mock_app();
    app.manage(state);

    let latest = get_latest_recovery_stats(app.state(), "test-user".to_string())
      .await
      .unwrap();
    assert!(latest.is_none());

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  #[serial]
  async fn test_latest_returns_newest_row() {
    let pool = setup_test_db().await;
    let state = Arc::new(AppState { db: pool.clone() });
    let app = tauri::test::mock_app();
    app.manage(state.clone());

    save_recovery_stats(&pool, "test-user", 10, "Ten days of healing.")
      .await
      .unwrap();
    save_recovery_stats(&pool, "test-user", 11, "Eleven days of healing.")
      .await
      .unwrap();

    let latest = get_latest_recovery_stats(app.state(), "test-user".to_string())
      .await
      .unwrap()
      .expect("Should have a stored summary");

    assert_eq!(latest.days_since_quitting, 11);
    assert_eq!(latest.lung_recovery_stats, "Eleven days of healing.");
    assert_eq!(
      latest.model_version.as_deref(),
      Some(ClaudeClient::model_version())
    );

    teardown_test_db(pool).await;
  }
}
