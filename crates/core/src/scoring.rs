//! Scoring module - line clear points and score milestones
//!
//! Points depend only on the number of lines removed by a single lock:
//!
//! | lines | points |
//! |---|---|
//! | 0 | 0 |
//! | 1 | 100 |
//! | 2 | 300 |
//! | 3 | 500 |
//! | n >= 4 | 800 * (n - 3) |
//!
//! Every value is multiplied by a presentation scale (default 1).

use crate::types::{LINE_SCORES, LINE_SCORE_MULTI, MILESTONE_THRESHOLDS};

/// Calculate the score delta for one lock event
pub fn line_clear_score(lines: usize, scale: u32) -> u64 {
    let base = match lines {
        0..=3 => LINE_SCORES[lines],
        n => LINE_SCORE_MULTI.saturating_mul((n - 3) as u64),
    };
    base.saturating_mul(scale as u64)
}

/// Reward tier reached when the score crosses a threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Milestone {
    /// 1000 points (scaled)
    Great,
    /// 5000 points (scaled)
    Amazing,
    /// 10000 points (scaled)
    Legendary,
}

impl Milestone {
    pub const ALL: [Milestone; 3] = [Milestone::Great, Milestone::Amazing, Milestone::Legendary];

    /// Unscaled score at which this milestone fires
    pub fn threshold(&self) -> u64 {
        match self {
            Milestone::Great => MILESTONE_THRESHOLDS[0],
            Milestone::Amazing => MILESTONE_THRESHOLDS[1],
            Milestone::Legendary => MILESTONE_THRESHOLDS[2],
        }
    }

    /// Banner text shown by front ends
    pub fn message(&self) -> &'static str {
        match self {
            Milestone::Great => "Great!",
            Milestone::Amazing => "Amazing!",
            Milestone::Legendary => "Legendary! Truly impressive",
        }
    }
}

/// Find the milestone crossed when the score moves from `before` to `after`.
///
/// Thresholds are checked lowest first and only the first crossed one is
/// reported, so a single huge clear that jumps several tiers yields the lowest.
pub fn milestone_crossed(before: u64, after: u64, scale: u32) -> Option<Milestone> {
    Milestone::ALL.into_iter().find(|m| {
        let threshold = m.threshold().saturating_mul(scale as u64);
        before < threshold && threshold <= after
    })
}
