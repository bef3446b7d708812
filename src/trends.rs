//! Rolling trend statistics over the pellet event log.
//!
//! Partitions events into a recent window (`[now - 30d, now]`) and the
//! window before it (`[now - 60d, now - 30d)`), counts per kind, and
//! reports a percentage change per kind. Events older than both windows
//! are ignored. An empty input yields `None` rather than a misleading
//! all-zero summary.
//!
//! Percentage change edge cases: a previous-period count of zero with
//! recent activity reports the fixed [`NEW_ACTIVITY_PCT`] sentinel (never
//! an actual ratio), and zero in both windows reports 0.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::core::{Pellet, PelletKind};

/// Default length of each trend window, in days.
pub const DEFAULT_WINDOW_DAYS: i64 = 30;

/// Default number of top tagging reasons reported.
pub const DEFAULT_TOP_REASONS: usize = 3;

/// Percentage-change sentinel for activity appearing in a previously
/// quiet window.
pub const NEW_ACTIVITY_PCT: f64 = 100.0;

/// Counts and change for one pellet kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendStat {
    /// Events in the recent window.
    pub recent: u64,
    /// Events in the window before it.
    pub previous: u64,
    /// Percentage change from previous to recent.
    pub change_pct: f64,
}

impl TrendStat {
    fn from_counts(recent: u64, previous: u64) -> Self {
        let change_pct = match (previous, recent) {
            (0, 0) => 0.0,
            (0, _) => NEW_ACTIVITY_PCT,
            _ => (recent as f64 - previous as f64) / previous as f64 * 100.0,
        };
        Self {
            recent,
            previous,
            change_pct,
        }
    }
}

/// One tagging reason and its frequency in the recent window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReasonCount {
    /// The free-text reason.
    pub reason: String,
    /// Occurrences in the recent window.
    pub count: u64,
}

/// Windowed trend summary for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendSummary {
    /// Negative pellet counts and change.
    pub negative: TrendStat,
    /// Positive pellet counts and change.
    pub positive: TrendStat,
    /// Most frequent recent tagging reasons, ties broken by first-seen
    /// order in the input.
    pub top_reasons: Vec<ReasonCount>,
}

/// Summarize with the default window length and reason count.
///
/// Returns `None` when `pellets` is empty.
pub fn summarize(pellets: &[Pellet], now: DateTime<Utc>) -> Option<TrendSummary> {
    summarize_with(pellets, now, DEFAULT_WINDOW_DAYS, DEFAULT_TOP_REASONS)
}

/// Summarize with an explicit window length (days) and top-reason limit.
///
/// Returns `None` when `pellets` is empty.
pub fn summarize_with(
    pellets: &[Pellet],
    now: DateTime<Utc>,
    window_days: i64,
    top_reasons: usize,
) -> Option<TrendSummary> {
    if pellets.is_empty() {
        return None;
    }

    let window = Duration::days(window_days);
    let recent_start = now - window;
    let previous_start = now - window - window;

    let mut recent_negative = 0u64;
    let mut recent_positive = 0u64;
    let mut previous_negative = 0u64;
    let mut previous_positive = 0u64;
    // First-seen order so the later stable sort breaks ties by it.
    let mut reasons: Vec<ReasonCount> = Vec::new();

    for pellet in pellets {
        let ts = pellet.created_at;
        if ts >= recent_start && ts <= now {
            match pellet.kind {
                PelletKind::Negative => recent_negative += 1,
                PelletKind::Positive => recent_positive += 1,
            }
            match reasons.iter_mut().find(|r| r.reason == pellet.reason) {
                Some(entry) => entry.count += 1,
                None => reasons.push(ReasonCount {
                    reason: pellet.reason.clone(),
                    count: 1,
                }),
            }
        } else if ts >= previous_start && ts < recent_start {
            match pellet.kind {
                PelletKind::Negative => previous_negative += 1,
                PelletKind::Positive => previous_positive += 1,
            }
        }
        // Older than both windows (or in the future): ignored.
    }

    reasons.sort_by(|a, b| b.count.cmp(&a.count));
    reasons.truncate(top_reasons);

    Some(TrendSummary {
        negative: TrendStat::from_counts(recent_negative, previous_negative),
        positive: TrendStat::from_counts(recent_positive, previous_positive),
        top_reasons: reasons,
    })
}
