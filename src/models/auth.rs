use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The single-row current sign-in session.
#[allow(dead_code)]
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct AuthSessionRecord {
  pub id: i64,
  pub provider: String,
  pub user_id: String,
  pub display_name: Option<String>,
  pub avatar_url: Option<String>,
  pub access_token: Option<String>,
  pub refresh_token: Option<String>,
  pub token_expires_at: Option<DateTime<Utc>>,
  pub created_at: Option<DateTime<Utc>>,
  pub updated_at: Option<DateTime<Utc>>,
}
