use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stored profile row, keyed by the auth adapter's stable user id.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProfileRecord {
  pub user_id: String,
  pub name: String,
  pub age: i64,
  pub quit_date: Option<DateTime<Utc>>,
  pub cigarettes_per_day: i64,
  pub years_smoked: f64,
  pub pack_price: f64,
  pub pack_size: i64,
  pub avatar_url: Option<String>,
  pub created_at: Option<DateTime<Utc>>,
  pub updated_at: Option<DateTime<Utc>>,
}
