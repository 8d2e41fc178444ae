//! Debug-only commands: manual day shifts
//!
//! "Add a day" moves the quit date back; "remove a day" moves it
//! forward and is refused if that would land in the future. Both use
//! the same optimistic write path as every other profile mutation.

use crate::db::AppState;
use crate::journey::{add_debug_day, remove_debug_day};
use crate::profile::{load_profile, set_quit_date, spawn_write};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tauri::State;

async fn load_quit_date(
  state: &State<'_, Arc<AppState>>,
  user_id: &str,
) -> Result<DateTime<Utc>, String> {
  let profile = load_profile(&state.db, user_id)
    .await?
    .ok_or_else(|| format!("No profile for user: {}", user_id))?;

  profile
    .quit_date
    .ok_or_else(|| "No quit date set".to_string())
}

/// Pretend one more day has passed.
#[tauri::command]
pub async fn debug_add_day(
  state: State<'_, Arc<AppState>>,
  user_id: String,
) -> Result<DateTime<Utc>, String> {
  let quit_date = load_quit_date(&state, &user_id).await?;
  let shifted = add_debug_day(quit_date);

  let db = state.db.clone();
  spawn_write("quit date", async move {
    set_quit_date(&db, &user_id, Some(shifted)).await
  });

  Ok(shifted)
}

/// Take one day of progress back. Refused when the quit date would
/// cross now; the stored state is left untouched.
#[tauri::command]
pub async fn debug_remove_day(
  state: State<'_, Arc<AppState>>,
  user_id: String,
) -> Result<DateTime<Utc>, String> {
  let quit_date = load_quit_date(&state, &user_id).await?;
  let shifted = remove_debug_day(quit_date, Utc::now()).map_err(|e| e.to_string())?;

  let db = state.db.clone();
  spawn_write("quit date", async move {
    set_quit_date(&db, &user_id, Some(shifted)).await
  });

  Ok(shifted)
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
