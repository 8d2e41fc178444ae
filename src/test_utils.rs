//! Test utilities and helpers for integration and unit testing
//!
//! This module provides common test infrastructure including:
//! - Database setup/teardown
//! - Mock data factories
//! - Helper assertions

use crate::profile::UserProfile;
use chrono::{DateTime, Duration, Utc};
use sqlx::SqlitePool;

/// ---------------------------------------------------------------------------
/// Database Test Utilities
/// ---------------------------------------------------------------------------

/// Create an in-memory SQLite database for testing
/// Runs all migrations and returns a ready-to-use pool
///
/// Uses max_connections(1) to prevent multiple pool connections from creating
/// isolated in-memory databases, which would cause intermittent test failures
pub async fn setup_test_db() -> SqlitePool {
  let pool = sqlx::sqlite::SqlitePoolOptions::new()
    .max_connections(1)
    .connect("sqlite::memory:")
    .await
    .expect("Failed to create in-memory database");

  // Run migrations
  sqlx::migrate!("./migrations")
    .run(&pool)
    .await
    .expect("Failed to run migrations");

  pool
}

/// Close a test database pool
pub async fn teardown_test_db(pool: SqlitePool) {
  pool.close().await;
}

/// Seed a profile row for the given user: "Alex", 30 days in,
/// a pack a day at $8.50.
pub async fn seed_test_profile(pool: &SqlitePool, user_id: &str) -> UserProfile {
  let profile = mock_profile();

  crate::profile::upsert_profile(pool, user_id, &profile)
    .await
    .expect("Failed to seed test profile");

  profile
}

/// Seed a signed-in session for the given identity.
pub async fn seed_test_session(pool: &SqlitePool, user_id: &str) {
  sqlx::query(
    r#"
    INSERT INTO auth_session (id, provider, user_id, display_name, access_token)
    VALUES (1, 'google', ?1, 'Alex', 'test-token')
    ON CONFLICT(id) DO UPDATE SET
      provider = excluded.provider,
      user_id = excluded.user_id,
      display_name = excluded.display_name,
      access_token = excluded.access_token
    "#,
  )
  .bind(user_id)
  .execute(pool)
  .await
  .expect("Failed to seed test session");
}

/// ---------------------------------------------------------------------------
/// Mock Data Factories
/// ---------------------------------------------------------------------------

/// Create a mock profile for testing: quit 30 days ago, pack a day.
pub fn mock_profile() -> UserProfile {
  UserProfile {
    name: "Alex".to_string(),
    age: 30,
    quit_date: Some(Utc::now() - Duration::days(30)),
    cigarettes_per_day: 20,
    years_smoked: 10.0,
    pack_price: 8.5,
    pack_size: 20,
    avatar_url: None,
  }
}

/// ---------------------------------------------------------------------------
/// Time Helpers
/// ---------------------------------------------------------------------------

/// Create a DateTime N days ago from now
pub fn datetime_days_ago(days: i64) -> DateTime<Utc> {
  Utc::now() - Duration::days(days)
}

/// ---------------------------------------------------------------------------
/// Test Macros
/// ---------------------------------------------------------------------------

/// Assert two floats are approximately equal within a tolerance
#[macro_export]
macro_rules! assert_approx_eq {
  ($left:expr, $right:expr, $tolerance:expr) => {
    let diff = ($left - $right).abs();
    assert!(
      diff < $tolerance,
      "Values not approximately equal: {} vs {} (diff: {}, tolerance: {})",
      $left,
      $right,
      diff,
      $tolerance
    );
  };
}

/// ---------------------------------------------------------------------------
/// Tests for Test Utilities
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn test_setup_db_creates_schema() {
    let pool = setup_test_db().await;

    // Verify key tables exist
    let tables: Vec<(String,)> = sqlx::query_as(
      "SELECT name FROM sqlite_master WHERE type='table' AND name IN ('profiles', 'auth_session', 'recovery_stats')"
    )
    .fetch_all(&pool)
    .await
    .expect("Failed to query tables");

    assert_eq!(tables.len(), 3, "Expected 3 tables, got {}", tables.len());

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_seed_profile_is_readable() {
    let pool = setup_test_db().await;

    seed_test_profile(&pool, "test-user").await;

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM profiles")
      .fetch_one(&pool)
      .await
      .expect("Failed to count profiles");
    assert_eq!(count, 1);

    teardown_test_db(pool).await;
  }

  #[test]
  fn test_mock_profile_is_valid() {
    let profile = mock_profile();
    assert!(profile.validate(Utc::now()).is_ok());
    assert!(profile.quit_date.is_some());
  }

  #[test]
  fn test_datetime_helpers_produce_correct_dates() {
    let past = datetime_days_ago(7);

    let diff = Utc::now() - past;
    // Allow for slight timing differences (6-8 days is acceptable)
    assert!(diff.num_days() >= 6 && diff.num_days() <= 8,
            "Expected ~7 days difference, got {}", diff.num_days());
  }
}
