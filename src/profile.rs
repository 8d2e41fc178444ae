//! User profile: domain type, validation, and store operations
//!
//! The profile is read-mostly. Writes triggered by user actions (setup,
//! reset, relapse, debug day shifts) are fire-and-forget: the UI gets
//! the optimistic state back immediately and a failed write is logged,
//! never surfaced.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::journey::validate_quit_date;
use crate::models::ProfileRecord;

/// ---------------------------------------------------------------------------
/// Domain Type
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
  pub name: String,
  pub age: i64,
  /// Absent until the user commits to a quit date (setup incomplete or
  /// journey reset)
  pub quit_date: Option<DateTime<Utc>>,
  pub cigarettes_per_day: i64,
  pub years_smoked: f64,
  pub pack_price: f64,
  pub pack_size: i64,
  pub avatar_url: Option<String>,
}

/// ---------------------------------------------------------------------------
/// Validation
/// ---------------------------------------------------------------------------

/// Field-level validation errors for the setup form. These are caught
/// before anything reaches the calculator or the store.
#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
  #[error("Please enter your name.")]
  NameTooShort,

  #[error("Please enter your age.")]
  InvalidAge,

  #[error("Cigarettes per day must be at least 1.")]
  InvalidCigarettesPerDay,

  #[error("Years smoked cannot be negative.")]
  NegativeYearsSmoked,

  #[error("Pack price cannot be negative.")]
  NegativePackPrice,

  #[error("A pack must contain at least 1 cigarette.")]
  InvalidPackSize,

  #[error("The quit date cannot be in the future.")]
  QuitDateInFuture,
}

impl Serialize for ProfileError {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: serde::Serializer,
  {
    serializer.serialize_str(&self.to_string())
  }
}

impl UserProfile {
  /// Enforce the profile invariants. `now` is explicit so validation
  /// stays deterministic under test.
  pub fn validate(&self, now: DateTime<Utc>) -> Result<(), ProfileError> {
    if self.name.trim().len() < 2 {
      return Err(ProfileError::NameTooShort);
    }
    if self.age < 1 {
      return Err(ProfileError::InvalidAge);
    }
    if self.cigarettes_per_day < 1 {
      return Err(ProfileError::InvalidCigarettesPerDay);
    }
    if self.years_smoked < 0.0 {
      return Err(ProfileError::NegativeYearsSmoked);
    }
    if self.pack_price < 0.0 {
      return Err(ProfileError::NegativePackPrice);
    }
    if self.pack_size < 1 {
      return Err(ProfileError::InvalidPackSize);
    }
    if let Some(quit_date) = self.quit_date {
      validate_quit_date(quit_date, now).map_err(|_| ProfileError::QuitDateInFuture)?;
    }
    Ok(())
  }
}

impl From<ProfileRecord> for UserProfile {
  fn from(record: ProfileRecord) -> Self {
    Self {
      name: record.name,
      age: record.age,
      quit_date: record.quit_date,
      cigarettes_per_day: record.cigarettes_per_day,
      years_smoked: record.years_smoked,
      pack_price: record.pack_price,
      pack_size: record.pack_size,
      avatar_url: record.avatar_url,
    }
  }
}

/// ---------------------------------------------------------------------------
/// Store Operations
/// ---------------------------------------------------------------------------

/// Load the profile for a user, if one exists.
pub async fn load_profile(
  pool: &SqlitePool,
  user_id: &str,
) -> Result<Option<UserProfile>, String> {
  let record = sqlx::query_as::<_, ProfileRecord>("SELECT * FROM profiles WHERE user_id = ?1")
    .bind(user_id)
    .fetch_optional(pool)
    .await
    .map_err(|e| format!("Failed to load profile: {}", e))?;

  Ok(record.map(UserProfile::from))
}

/// Write the full profile, replacing any existing row for the user.
pub async fn upsert_profile(
  pool: &SqlitePool,
  user_id: &str,
  profile: &UserProfile,
) -> Result<(), String> {
  sqlx::query(
    r#"
    INSERT INTO profiles (
      user_id, name, age, quit_date, cigarettes_per_day,
      years_smoked, pack_price, pack_size, avatar_url
    )
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
    ON CONFLICT(user_id) DO UPDATE SET
      name = excluded.name,
      age = excluded.age,
      quit_date = excluded.quit_date,
      cigarettes_per_day = excluded.cigarettes_per_day,
      years_smoked = excluded.years_smoked,
      pack_price = excluded.pack_price,
      pack_size = excluded.pack_size,
      avatar_url = excluded.avatar_url,
      updated_at = CURRENT_TIMESTAMP
    "#,
  )
  .bind(user_id)
  .bind(&profile.name)
  .bind(profile.age)
  .bind(profile.quit_date)
  .bind(profile.cigarettes_per_day)
  .bind(profile.years_smoked)
  .bind(profile.pack_price)
  .bind(profile.pack_size)
  .bind(&profile.avatar_url)
  .execute(pool)
  .await
  .map_err(|e| format!("Failed to save profile: {}", e))?;

  Ok(())
}

/// Partial update of the quit date only. Reset and relapse clear it
/// (None); the debug day shifts move it. All other fields are kept.
pub async fn set_quit_date(
  pool: &SqlitePool,
  user_id: &str,
  quit_date: Option<DateTime<Utc>>,
) -> Result<(), String> {
  let result = sqlx::query(
    "UPDATE profiles SET quit_date = ?1, updated_at = CURRENT_TIMESTAMP WHERE user_id = ?2",
  )
  .bind(quit_date)
  .bind(user_id)
  .execute(pool)
  .await
  .map_err(|e| format!("Failed to update quit date: {}", e))?;

  if result.rows_affected() == 0 {
    return Err(format!("No profile for user: {}", user_id));
  }

  Ok(())
}

/// ---------------------------------------------------------------------------
/// Fire-and-Forget Writes
/// ---------------------------------------------------------------------------

/// Run a store write in the background. The caller has already applied
/// the optimistic local state; a failure here is logged and dropped.
pub fn spawn_write<F>(label: &'static str, write: F)
where
  F: std::future::Future<Output = Result<(), String>> + Send + 'static,
{
  tauri::async_runtime::spawn(async move {
    if let Err(e) = write.await {
      eprintln!("Background {} write failed: {}", label, e);
    }
  });
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
