//! Milestone table and evaluation
//!
//! The table is compile-time data, ordered ascending by day threshold.
//! Evaluation is a pure function of `days_since_quitting`.

use serde::Serialize;

use crate::progress::CLIMB_CYCLE_DAYS;

/// ---------------------------------------------------------------------------
/// Static Milestone Table
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Milestone {
  pub days: i64,
  pub name: &'static str,
  pub description: &'static str,
}

pub const MILESTONES: [Milestone; 6] = [
  Milestone {
    days: 1,
    name: "24 Hours",
    description: "You made it through the first day!",
  },
  Milestone {
    days: 3,
    name: "72 Hours",
    description: "Nicotine is leaving your system.",
  },
  Milestone {
    days: 7,
    name: "1 Week",
    description: "A whole week smoke-free!",
  },
  Milestone {
    days: 30,
    name: "1 Month",
    description: "Your lung function is improving.",
  },
  Milestone {
    days: 90,
    name: "3 Months",
    description: "Coughing and shortness of breath decrease.",
  },
  Milestone {
    days: 365,
    name: "1 Year",
    description: "You reached the peak! Your risk of heart disease is cut in half.",
  },
];

/// ---------------------------------------------------------------------------
/// Peak Badges
/// ---------------------------------------------------------------------------

/// Generated badge for each completed 90-day climb, shown after the
/// table milestones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeakBadge {
  pub name: String,
  pub description: String,
}

impl PeakBadge {
  fn nth(n: i64) -> Self {
    let plural = if n > 1 { "peaks" } else { "peak" };
    Self {
      name: format!("{} Peak", n),
      description: format!("{} {} conquered!", n, plural),
    }
  }
}

/// ---------------------------------------------------------------------------
/// Evaluation
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct MilestoneProgress {
  /// Milestones at or below the current day count, in table order
  pub earned: Vec<Milestone>,

  /// First milestone still ahead, absent once all are earned
  pub next: Option<Milestone>,

  /// How many days until `next`, absent alongside it
  pub days_until_next: Option<i64>,

  /// One badge per conquered peak, appended after the table milestones
  pub peak_badges: Vec<PeakBadge>,
}

impl MilestoneProgress {
  /// Evaluate the full milestone state for a day count.
  /// Identical input always yields identical output; thresholds are
  /// distinct so there is no ordering ambiguity.
  pub fn evaluate(days_since_quitting: i64) -> Self {
    let earned: Vec<Milestone> = MILESTONES
      .iter()
      .filter(|m| m.days <= days_since_quitting)
      .copied()
      .collect();

    let next = MILESTONES
      .iter()
      .find(|m| m.days > days_since_quitting)
      .copied();

    let days_until_next = next.map(|m| m.days - days_since_quitting);

    let peaks_conquered = days_since_quitting.max(0) / CLIMB_CYCLE_DAYS;
    let peak_badges = (1..=peaks_conquered).map(PeakBadge::nth).collect();

    Self {
      earned,
      next,
      days_until_next,
      peak_badges,
    }
  }
}

/// ---------------------------------------------------------------------------
/// Scene Health Highlights
/// ---------------------------------------------------------------------------

/// The three recovery highlights pinned on the mountain scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SceneHighlight {
  pub days: i64,
  pub title: &'static str,
  pub description: &'static str,
}

pub const SCENE_HIGHLIGHTS: [SceneHighlight; 3] = [
  SceneHighlight {
    days: 1,
    title: "Improved Circulation",
    description: "After just 1 day, your circulation improves, and your heart attack risk starts to drop.",
  },
  SceneHighlight {
    days: 7,
    title: "Reduced Cravings",
    description: "After 1 week, nicotine cravings and withdrawal symptoms are significantly reduced.",
  },
  SceneHighlight {
    days: 30,
    title: "Normalized Brain Chemistry",
    description: "After 30 days, your brain chemistry is returning to normal, reducing irritability and anxiety.",
  },
];

/// A highlight with its achieved state for a given day count.
#[derive(Debug, Clone, Serialize)]
pub struct HighlightStatus {
  pub highlight: SceneHighlight,
  pub achieved: bool,
  /// Days remaining when not yet achieved
  pub days_away: Option<i64>,
}

pub fn scene_highlights(days_since_quitting: i64) -> Vec<HighlightStatus> {
  SCENE_HIGHLIGHTS
    .iter()
    .map(|h| {
      let achieved = days_since_quitting >= h.days;
      HighlightStatus {
        highlight: *h,
        achieved,
        days_away: if achieved {
          None
        } else {
          Some(h.days - days_since_quitting)
        },
      }
    })
    .collect()
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
