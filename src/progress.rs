//! Deterministic derived-stats layer for the smoke-free journey
//!
//! Everything here is a pure projection of (profile, now). Nothing is
//! persisted and nothing does I/O; commands recompute on every call.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::profile::UserProfile;

/// ---------------------------------------------------------------------------
/// Climb Cycle Constants
/// ---------------------------------------------------------------------------

/// Days per climb cycle: one conquered peak per 90 smoke-free days.
pub const CLIMB_CYCLE_DAYS: i64 = 90;

/// Display altitude gained per smoke-free day, in meters.
const METERS_PER_DAY: i64 = 5;

/// ---------------------------------------------------------------------------
/// Climb Path (cubic Bezier)
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
  pub x: f64,
  pub y: f64,
}

/// The fixed ascent path from base camp to the peak, in scene coordinates
/// (SVG viewBox 0 0 400 300, y grows downward).
#[derive(Debug, Clone, Copy)]
pub struct ClimbPath {
  pub start: Point,
  pub control1: Point,
  pub control2: Point,
  pub peak: Point,
}

pub const CLIMB_PATH: ClimbPath = ClimbPath {
  start: Point { x: 50.0, y: 250.0 },
  control1: Point { x: 120.0, y: 180.0 },
  control2: Point { x: 220.0, y: 100.0 },
  peak: Point { x: 280.0, y: 50.0 },
};

impl ClimbPath {
  /// Evaluate the cubic Bezier at parameter `t`.
  /// P(t) = (1-t)^3 P0 + 3(1-t)^2 t P1 + 3(1-t) t^2 P2 + t^3 P3
  pub fn point_at(&self, t: f64) -> Point {
    let u = 1.0 - t;
    let b0 = u * u * u;
    let b1 = 3.0 * u * u * t;
    let b2 = 3.0 * u * t * t;
    let b3 = t * t * t;

    Point {
      x: b0 * self.start.x + b1 * self.control1.x + b2 * self.control2.x + b3 * self.peak.x,
      y: b0 * self.start.y + b1 * self.control1.y + b2 * self.control2.y + b3 * self.peak.y,
    }
  }
}

/// ---------------------------------------------------------------------------
/// Derived Stats
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DerivedStats {
  /// Whole calendar days since the quit instant, clamped to >= 0
  pub days_since_quitting: i64,

  /// days * (cigarettes_per_day / pack_size) * pack_price
  pub money_saved: f64,

  /// days * cigarettes_per_day
  pub cigarettes_avoided: i64,

  /// Completed 90-day climb cycles
  pub peaks_conquered: i64,

  /// Days into the current climb cycle (modulus; 0 on a peak day)
  pub days_in_current_climb: i64,

  /// Position along the current climb in [0, 1]
  pub progress_fraction: f64,

  /// Climber position on the ascent path at `progress_fraction`
  pub climb_position: Point,
}

impl DerivedStats {
  /// Compute all derived stats from the raw profile numbers.
  ///
  /// `days_since_quitting` is the whole-day difference; a quit date in
  /// the future (clock skew, manual manipulation) clamps to 0 so money
  /// and cigarette counts can never go negative.
  pub fn compute(
    quit_date: DateTime<Utc>,
    cigarettes_per_day: i64,
    pack_price: f64,
    pack_size: i64,
    now: DateTime<Utc>,
  ) -> Self {
    let days = (now - quit_date).num_days().max(0);

    let money_saved = days as f64 * (cigarettes_per_day as f64 / pack_size as f64) * pack_price;
    let cigarettes_avoided = days * cigarettes_per_day;

    let peaks_conquered = days / CLIMB_CYCLE_DAYS;
    let days_in_current_climb = days % CLIMB_CYCLE_DAYS;

    // A multiple of 90 (other than day 0) renders as "peak reached",
    // not as the start of the next climb.
    let progress_fraction = if days > 0 && days_in_current_climb == 0 {
      1.0
    } else {
      days_in_current_climb as f64 / CLIMB_CYCLE_DAYS as f64
    };

    Self {
      days_since_quitting: days,
      money_saved,
      cigarettes_avoided,
      peaks_conquered,
      days_in_current_climb,
      progress_fraction,
      climb_position: CLIMB_PATH.point_at(progress_fraction),
    }
  }

  /// Compute stats for a stored profile. Returns None when no quit date
  /// is set; the caller routes to the setup flow instead.
  pub fn for_profile(profile: &UserProfile, now: DateTime<Utc>) -> Option<Self> {
    profile.quit_date.map(|quit_date| {
      Self::compute(
        quit_date,
        profile.cigarettes_per_day,
        profile.pack_price,
        profile.pack_size,
        now,
      )
    })
  }
}

/// ---------------------------------------------------------------------------
/// Elapsed Time (second granularity)
/// ---------------------------------------------------------------------------

/// Time since the quit instant, for the live HH:MM:SS counter.
///
/// Deliberately decoupled from `days_since_quitting`: stats and
/// milestones use whole days, the counter uses full timestamp
/// subtraction and ticks once per second in the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElapsedTime {
  pub hours: i64,
  pub minutes: i64,
  pub seconds: i64,
}

impl ElapsedTime {
  pub fn since(quit_date: DateTime<Utc>, now: DateTime<Utc>) -> Self {
    let total_seconds = (now - quit_date).num_seconds().max(0);

    Self {
      hours: total_seconds / 3600,
      minutes: (total_seconds % 3600) / 60,
      seconds: total_seconds % 60,
    }
  }
}

impl std::fmt::Display for ElapsedTime {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(
      f,
      "{:02}:{:02}:{:02}",
      self.hours, self.minutes, self.seconds
    )
  }
}

/// ---------------------------------------------------------------------------
/// Scene Helpers
/// ---------------------------------------------------------------------------

/// Night rendering between 18:00 and 06:00.
pub fn is_night(hour: u32) -> bool {
  hour >= 18 || hour < 6
}

/// Display altitude for the day counter overlay.
pub fn altitude_meters(days_since_quitting: i64) -> i64 {
  days_since_quitting * METERS_PER_DAY
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
