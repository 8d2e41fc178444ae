mod auth;
mod commands;
mod db;
mod journey;
mod llm;
mod milestones;
mod models;
mod profile;
mod progress;
mod quotes;

#[cfg(test)]
mod test_utils;

use db::AppState;
use std::sync::Arc;
use tauri::Manager;

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
  // Load environment variables from .env file
  dotenvy::dotenv().ok();

  tauri::Builder::default()
    .plugin(tauri_plugin_opener::init())
    .setup(|app| {
      // Initialize database
      let app_handle = app.handle().clone();
      tauri::async_runtime::block_on(async move {
        match db::initialize_db(&app_handle).await {
          Ok(pool) => {
            let state = Arc::new(AppState { db: pool });
            app_handle.manage(state);
            println!("Database ready");
          }
          Err(e) => {
            eprintln!("Failed to initialize database: {}", e);
          }
        }
      });
      Ok(())
    })
    .invoke_handler(tauri::generate_handler![
      commands::get_journey_status,
      // Auth commands
      commands::auth::auth_start_sign_in,
      commands::auth::auth_complete_sign_in,
      commands::auth::auth_get_status,
      commands::auth::auth_sign_out,
      // Profile commands
      commands::profile::get_profile,
      commands::profile::complete_setup,
      commands::profile::reset_journey,
      commands::profile::record_relapse,
      // Dashboard commands
      commands::progress::get_derived_stats,
      commands::progress::get_elapsed_time,
      commands::progress::get_milestone_progress,
      commands::progress::get_daily_quote,
      commands::progress::get_scene_state,
      // Recovery summary commands
      commands::recovery::fetch_recovery_stats,
      commands::recovery::get_latest_recovery_stats,
      // Debug commands
      commands::debug::debug_add_day,
      commands::debug::debug_remove_day,
    ])
    .run(tauri::generate_context!())
    .expect("error while running tauri application");
}
