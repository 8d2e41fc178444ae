//! Journey status state machine
//!
//! The app's implicit "do we have a profile / do we have a quit date"
//! checks are modeled as one explicit tagged status. Transitions:
//! setup with a past quit date moves to Active; reset and relapse clear
//! the quit date and fall back to AwaitingQuitDate. There is no paused
//! or archived state.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::profile::UserProfile;

/// ---------------------------------------------------------------------------
/// Journey Status
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[derive(Default)]
pub enum JourneyStatus {
  /// No stored profile for this user
  #[default]
  NoProfile,
  /// Profile exists but the quit date was never set or was cleared
  AwaitingQuitDate,
  /// Quit date set and in the past: the climb is on
  Active,
}

impl std::fmt::Display for JourneyStatus {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::NoProfile => write!(f, "no_profile"),
      Self::AwaitingQuitDate => write!(f, "awaiting_quit_date"),
      Self::Active => write!(f, "active"),
    }
  }
}

impl std::str::FromStr for JourneyStatus {
  type Err = String;
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "no_profile" => Ok(Self::NoProfile),
      "awaiting_quit_date" => Ok(Self::AwaitingQuitDate),
      "active" => Ok(Self::Active),
      _ => Err(format!("Unknown journey status: {}", s)),
    }
  }
}

impl JourneyStatus {
  /// Derive the status from whatever the profile store returned.
  pub fn of(profile: Option<&UserProfile>) -> Self {
    match profile {
      None => Self::NoProfile,
      Some(p) if p.quit_date.is_none() => Self::AwaitingQuitDate,
      Some(_) => Self::Active,
    }
  }
}

/// ---------------------------------------------------------------------------
/// Errors
/// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum JourneyError {
  #[error("Cannot go into the future! The quit date must stay at or before now.")]
  QuitDateInFuture,

  #[error("No quit date set")]
  NoQuitDate,
}

impl Serialize for JourneyError {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: serde::Serializer,
  {
    serializer.serialize_str(&self.to_string())
  }
}

/// ---------------------------------------------------------------------------
/// Transitions
/// ---------------------------------------------------------------------------

/// Setup (and re-setup after a reset) may only commit a quit date at or
/// before the current instant.
pub fn validate_quit_date(quit_date: DateTime<Utc>, now: DateTime<Utc>) -> Result<(), JourneyError> {
  if quit_date > now {
    return Err(JourneyError::QuitDateInFuture);
  }
  Ok(())
}

/// Debug-only: add one day of progress by moving the quit date back.
pub fn add_debug_day(quit_date: DateTime<Utc>) -> DateTime<Utc> {
  quit_date - Duration::days(1)
}

/// Debug-only: remove one day of progress by moving the quit date
/// forward. Refused when that would push the quit date past `now`.
pub fn remove_debug_day(
  quit_date: DateTime<Utc>,
  now: DateTime<Utc>,
) -> Result<DateTime<Utc>, JourneyError> {
  let shifted = quit_date + Duration::days(1);
  if shifted > now {
    return Err(JourneyError::QuitDateInFuture);
  }
  Ok(shifted)
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
