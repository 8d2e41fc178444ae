//! Sign-in commands
//!
//! Thin orchestration over the OAuth adapter: start returns the
//! authorization URL for the frontend to open, complete waits for the
//! loopback callback and persists the session, status and sign-out
//! read/clear the single session row.

use crate::auth::{
  build_auth_url, exchange_code_for_tokens, fetch_identity, wait_for_callback, AuthConfig,
  AuthError, AuthTokens, Identity, Provider,
};
use crate::db::AppState;
use crate::models::AuthSessionRecord;
use serde::Serialize;
use std::sync::Arc;
use tauri::State;

/// ---------------------------------------------------------------------------
/// Start Sign-In
/// ---------------------------------------------------------------------------

/// Initiates sign-in by returning the provider authorization URL.
/// Frontend should open this URL in the default browser.
#[tauri::command]
pub async fn auth_start_sign_in(provider: String) -> Result<String, AuthError> {
  let provider: Provider = provider.parse().map_err(AuthError::OAuth)?;
  let config = AuthConfig::from_env(provider)?;
  build_auth_url(&config)
}

/// ---------------------------------------------------------------------------
/// Complete Sign-In
/// ---------------------------------------------------------------------------

/// Waits for the OAuth callback, exchanges the code, resolves the
/// identity, and stores the session. Call right after
/// auth_start_sign_in.
#[tauri::command]
pub async fn auth_complete_sign_in(
  state: State<'_, Arc<AppState>>,
  provider: String,
) -> Result<Identity, AuthError> {
  let provider: Provider = provider.parse().map_err(AuthError::OAuth)?;
  let config = AuthConfig::from_env(provider)?;

  // Wait for callback (blocking - runs in Tauri's async runtime)
  let callback = tokio::task::spawn_blocking(|| wait_for_callback(120))
    .await
    .map_err(|e| AuthError::Server(e.to_string()))??;

  let tokens = exchange_code_for_tokens(&config, &callback.code).await?;
  let identity = fetch_identity(&config, &tokens.access_token).await?;

  save_session(&state.db, provider, &identity, &tokens).await?;

  println!("Signed in as {}", identity.user_id);
  Ok(identity)
}

/// ---------------------------------------------------------------------------
/// Session Status
/// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct AuthStatus {
  pub is_signed_in: bool,
  pub provider: Option<String>,
  pub user_id: Option<String>,
  pub display_name: Option<String>,
  pub avatar_url: Option<String>,
}

#[tauri::command]
pub async fn auth_get_status(state: State<'_, Arc<AppState>>) -> Result<AuthStatus, AuthError> {
  let session =
    sqlx::query_as::<_, AuthSessionRecord>("SELECT * FROM auth_session WHERE id = 1")
      .fetch_optional(&state.db)
      .await
      .map_err(|e| AuthError::Database(e.to_string()))?;

  match session {
    Some(session) => Ok(AuthStatus {
      is_signed_in: true,
      provider: Some(session.provider),
      user_id: Some(session.user_id),
      display_name: session.display_name,
      avatar_url: session.avatar_url,
    }),
    None => Ok(AuthStatus {
      is_signed_in: false,
      provider: None,
      user_id: None,
      display_name: None,
      avatar_url: None,
    }),
  }
}

/// ---------------------------------------------------------------------------
/// Sign Out
/// ---------------------------------------------------------------------------

#[tauri::command]
pub async fn auth_sign_out(state: State<'_, Arc<AppState>>) -> Result<(), AuthError> {
  sqlx::query("DELETE FROM auth_session WHERE id = 1")
    .execute(&state.db)
    .await
    .map_err(|e| AuthError::Database(e.to_string()))?;

  println!("Signed out");
  Ok(())
}

/// ---------------------------------------------------------------------------
/// Database Helpers
/// ---------------------------------------------------------------------------

async fn save_session(
  db: &crate::db::DbPool,
  provider: Provider,
  identity: &Identity,
  tokens: &AuthTokens,
) -> Result<(), AuthError> {
  sqlx::query(
    r#"
    INSERT INTO auth_session (
      id, provider, user_id, display_name, avatar_url,
      access_token, refresh_token, token_expires_at
    )
    VALUES (1, ?1, ?2, ?3, ?4, ?5, ?6, ?7)
    ON CONFLICT(id) DO UPDATE SET
      provider = excluded.provider,
      user_id = excluded.user_id,
      display_name = excluded.display_name,
      avatar_url = excluded.avatar_url,
      access_token = excluded.access_token,
      refresh_token = excluded.refresh_token,
      token_expires_at = excluded.token_expires_at,
      updated_at = CURRENT_TIMESTAMP
    "#,
  )
  .bind(provider.as_str())
  .bind(&identity.user_id)
  .bind(&identity.display_name)
  .bind(&identity.avatar_url)
  .bind(&tokens.access_token)
  .bind(&tokens.refresh_token)
  .bind(tokens.expires_at)
  .execute(db)
  .await
  .map_err(|e| AuthError::Database(e.to_string()))?;

  Ok(())
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
