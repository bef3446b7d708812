//! User progression state.
//!
//! A user record carries the mutable progression state the engine acts
//! on: pellet balances, experience, level, and earned badges. Registration
//! seeds the configured starting balances; after that the record is only
//! mutated through the economy, progression, and badge components.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::PelletKind;

/// A badge earned by a user, with the award timestamp.
///
/// At most one earned badge exists per (user, badge) pair; awarding is
/// idempotent and an earned badge is never revoked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EarnedBadge {
    /// The catalog badge id.
    pub badge_id: String,
    /// When the badge was awarded.
    pub earned_at: DateTime<Utc>,
}

impl EarnedBadge {
    /// Create a new earned badge with the current timestamp.
    pub fn new(badge_id: impl Into<String>) -> Self {
        Self::with_timestamp(badge_id, Utc::now())
    }

    /// Create an earned badge with a specific timestamp (for testing).
    pub fn with_timestamp(badge_id: impl Into<String>, earned_at: DateTime<Utc>) -> Self {
        Self {
            badge_id: badge_id.into(),
            earned_at,
        }
    }
}

/// A registered user and their progression state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Unique user id.
    pub id: String,
    /// The user's own license plate.
    pub plate: String,
    /// Available negative pellets.
    pub pellet_count: u32,
    /// Available positive pellets.
    pub positive_pellet_count: u32,
    /// Accumulated experience points. Monotonically non-decreasing.
    pub exp: u32,
    /// Progression level derived from `exp`. Starts at 1.
    pub level: u32,
    /// Earned badges in award order. Ids are unique.
    pub badges: Vec<EarnedBadge>,
    /// When the user registered.
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a newly registered user with the given starting balances.
    pub fn register(
        id: impl Into<String>,
        plate: impl Into<String>,
        starting_negative: u32,
        starting_positive: u32,
    ) -> Self {
        Self {
            id: id.into(),
            plate: plate.into(),
            pellet_count: starting_negative,
            positive_pellet_count: starting_positive,
            exp: 0,
            level: 1,
            badges: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Get the balance for a pellet kind.
    pub fn balance(&self, kind: PelletKind) -> u32 {
        match kind {
            PelletKind::Negative => self.pellet_count,
            PelletKind::Positive => self.positive_pellet_count,
        }
    }

    /// Get a mutable reference to the balance for a pellet kind.
    pub(crate) fn balance_mut(&mut self, kind: PelletKind) -> &mut u32 {
        match kind {
            PelletKind::Negative => &mut self.pellet_count,
            PelletKind::Positive => &mut self.positive_pellet_count,
        }
    }

    /// Check whether the user holds a badge.
    pub fn has_badge(&self, badge_id: &str) -> bool {
        self.badges.iter().any(|b| b.badge_id == badge_id)
    }

    /// Record an earned badge.
    ///
    /// No-op if the badge is already held, preserving the at-most-once
    /// award invariant.
    pub fn add_badge(&mut self, badge: EarnedBadge) {
        if !self.has_badge(&badge.badge_id) {
            self.badges.push(badge);
        }
    }
}
