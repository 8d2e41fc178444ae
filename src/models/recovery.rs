use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored AI recovery summary; the newest row per user is the one the
/// dashboard shows.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct RecoveryStatsRecord {
  pub id: i64,
  pub user_id: String,
  pub days_since_quitting: i64,
  pub lung_recovery_stats: String,
  pub model_version: Option<String>,
  pub created_at: Option<DateTime<Utc>>,
}
