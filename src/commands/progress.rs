//! Dashboard commands: derived stats, milestones, quote, scene
//!
//! Every command takes an optional `now` override (and the scene an
//! optional hour) so debug time travel is an explicit parameter, not
//! ambient state. Production callers pass None.

use crate::db::AppState;
use crate::milestones::{scene_highlights, HighlightStatus, MilestoneProgress};
use crate::profile::{load_profile, UserProfile};
use crate::progress::{altitude_meters, is_night, DerivedStats, ElapsedTime, Point};
use crate::quotes::daily_quote;
use chrono::{DateTime, Timelike, Utc};
use serde::Serialize;
use std::sync::Arc;
use tauri::State;

/// ---------------------------------------------------------------------------
/// Shared Lookup
/// ---------------------------------------------------------------------------

/// Load the profile and require an active journey (quit date set).
async fn load_active_profile(
  state: &State<'_, Arc<AppState>>,
  user_id: &str,
) -> Result<UserProfile, String> {
  let profile = load_profile(&state.db, user_id)
    .await?
    .ok_or_else(|| format!("No profile for user: {}", user_id))?;

  if profile.quit_date.is_none() {
    return Err("No quit date set - complete setup first".to_string());
  }

  Ok(profile)
}

/// ---------------------------------------------------------------------------
/// Derived Stats
/// ---------------------------------------------------------------------------

#[tauri::command]
pub async fn get_derived_stats(
  state: State<'_, Arc<AppState>>,
  user_id: String,
  now_override: Option<DateTime<Utc>>,
) -> Result<DerivedStats, String> {
  let profile = load_active_profile(&state, &user_id).await?;
  let now = now_override.unwrap_or_else(Utc::now);

  // quit_date presence was checked above
  DerivedStats::for_profile(&profile, now).ok_or_else(|| "No quit date set".to_string())
}

/// ---------------------------------------------------------------------------
/// Elapsed Time (live counter)
/// ---------------------------------------------------------------------------

/// HH:MM:SS since the quit instant. The frontend calls this once per
/// second while the scene is visible and must clear that interval when
/// the view unmounts.
#[tauri::command]
pub async fn get_elapsed_time(
  state: State<'_, Arc<AppState>>,
  user_id: String,
  now_override: Option<DateTime<Utc>>,
) -> Result<String, String> {
  let profile = load_active_profile(&state, &user_id).await?;
  let now = now_override.unwrap_or_else(Utc::now);
  let quit_date = profile
    .quit_date
    .ok_or_else(|| "No quit date set".to_string())?;

  Ok(ElapsedTime::since(quit_date, now).to_string())
}

/// ---------------------------------------------------------------------------
/// Milestones
/// ---------------------------------------------------------------------------

#[tauri::command]
pub async fn get_milestone_progress(
  state: State<'_, Arc<AppState>>,
  user_id: String,
  now_override: Option<DateTime<Utc>>,
) -> Result<MilestoneProgress, String> {
  let stats = get_derived_stats(state, user_id, now_override).await?;
  Ok(MilestoneProgress::evaluate(stats.days_since_quitting))
}

/// ---------------------------------------------------------------------------
/// Daily Quote
/// ---------------------------------------------------------------------------

#[tauri::command]
pub async fn get_daily_quote(
  state: State<'_, Arc<AppState>>,
  user_id: String,
  now_override: Option<DateTime<Utc>>,
) -> Result<String, String> {
  let stats = get_derived_stats(state, user_id, now_override).await?;
  Ok(daily_quote(stats.days_since_quitting).to_string())
}

/// ---------------------------------------------------------------------------
/// Mountain Scene
/// ---------------------------------------------------------------------------

/// Everything the scene needs for one frame.
#[derive(Debug, Clone, Serialize)]
pub struct SceneState {
  pub day: i64,
  pub altitude_meters: i64,
  pub peaks_conquered: i64,
  pub is_night: bool,
  pub climber: Point,
  pub elapsed: String,
  pub highlights: Vec<HighlightStatus>,
}

#[tauri::command]
pub async fn get_scene_state(
  state: State<'_, Arc<AppState>>,
  user_id: String,
  hour_override: Option<u32>,
  now_override: Option<DateTime<Utc>>,
) -> Result<SceneState, String> {
  let profile = load_active_profile(&state, &user_id).await?;
  let now = now_override.unwrap_or_else(Utc::now);
  let quit_date = profile
    .quit_date
    .ok_or_else(|| "No quit date set".to_string())?;

  let stats = DerivedStats::for_profile(&profile, now).ok_or_else(|| "No quit date set".to_string())?;
  let hour = hour_override.unwrap_or_else(|| now.hour());

  Ok(SceneState {
    day: stats.days_since_quitting,
    altitude_meters: altitude_meters(stats.days_since_quitting),
    peaks_conquered: stats.peaks_conquered,
    is_night: is_night(hour),
    climber: stats.climb_position,
    elapsed: ElapsedTime::since(quit_date, now).to_string(),
    highlights: scene_highlights(stats.days_since_quitting),
  })
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

  async fn seed_user_with_quit_days(pool: &sqlx::SqlitePool, days: i64) -> DateTime<Utc> {
    let now = Utc::now();
    let mut profile = mock_profile();
    profile.quit_date = Some(now - Duration::days(days));
    crate::profile::upsert_profile(pool, "test-user", &profile)
      .await
      .expect("Should seed profile");
    now
  }

  #[tokio::test]
  #[serial]
  async fn test_derived_stats_for_seeded_profile() {
    let pool = setup_test_db().await;
    let now = seed_user_with_quit_days(&pool, 7).await;
    let state = Arc::new(AppState { db: pool.clone() });
    let app = tauri::test::mock_app();
    app.manage(state);

    let stats = get_derived_stats(app.state(), "test-user".to_string(), Some(now))
      .await
      .unwrap();

    assert_eq!(stats.days_since_quitting, 7);
    assert_eq!(stats.cigarettes_avoided, 140);

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  #[serial]
  async fn test_derived_stats_without_profile_errors() {
    let pool = setup_test_db().await;
    let state = Arc::new(AppState { db: pool.clone() });
    let app = tauri::test::mock_app();
    app.manage(state);

    let result = get_derived_stats(app.state(), "test-user".to_string(), None).await;
    assert!(result.is_err());

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  #[serial]
  async fn test_derived_stats_without_quit_date_errors() {
    let pool = setup_test_db().await;
    seed_test_profile(&pool, "test-user").await;
    crate::profile::set_quit_date(&pool, "test-user", None)
      .await
      .unwrap();
    let state = Arc::new(AppState { db: pool.clone() });
    let app = tauri::test::mock_app();
    app.manage(state);

    let result = get_derived_stats(app.state(), "test-user".to_string(), None).await;
    assert!(result.unwrap_err().contains("quit date"));

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  #[serial]
  async fn test_milestones_at_day_seven() {
    let pool = setup_test_db().await;
    let now = seed_user_with_quit_days(&pool, 7).await;
    let state = Arc::new(AppState { db: pool.clone() });
    let app = tauri::test::mock_app();
    app.manage(state);

    let progress = get_milestone_progress(app.state(), "test-user".to_string(), Some(now))
      .await
      .unwrap();

    assert_eq!(progress.earned.len(), 3);
    assert_eq!(progress.next.unwrap().days, 30);

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  #[serial]
  async fn test_daily_quote_is_stable_within_day() {
    let pool = setup_test_db().await;
    let now = seed_user_with_quit_days(&pool, 42).await;
    let state = Arc::new(AppState { db: pool.clone() });
    let app = tauri::test::mock_app();
    app.manage(state);

    let first = get_daily_quote(app.state(), "test-user".to_string(), Some(now))
      .await
      .unwrap();
    let second = get_daily_quote(app.state(), "test-user".to_string(), Some(now))
      .await
      .unwrap();
    assert_eq!(first, second);

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  #[serial]
  async fn test_scene_state_honors_hour_override() {
    let pool = setup_test_db().await;
    let now = seed_user_with_quit_days(&pool, 30).await;
    let state = Arc::new(AppState { db: pool.clone() });
    let app = tauri::test::mock_app();
    app.manage(state);

    let night = get_scene_state(
      app.state(),
      "test-user".to_string(),
      Some(22),
      Some(now),
    )
    .await
    .unwrap();
    assert!(night.is_night);
    assert_eq!(night.day, 30);
    assert_eq!(night.altitude_meters, 150);

    let day = get_scene_state(
      app.state(),
      "test-user".to_string(),
      Some(10),
      Some(now),
    )
    .await
    .unwrap();
    assert!(!day.is_night);

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  #[serial]
  async fn test_elapsed_time_formats() {
    let pool = setup_test_db().await;
    let now = Utc::now();
    let mut profile = mock_profile();
    profile.quit_date = Some(now - Duration::hours(3) - Duration::minutes(20));
    crate::profile::upsert_profile(&pool, "test-user", &profile)
      .await
      .unwrap();
    let state = Arc::new(AppState { db: pool.clone() });
    let app = tauri::test::mock_app();
    app.manage(state);

    let elapsed = get_elapsed_time(app.state(), "test-user".to_string(), Some(now))
      .await
      .unwrap();
    assert_eq!(elapsed, "03:20:00");

    teardown_test_db(pool).await;
  }
}
