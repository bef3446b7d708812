//! Progression calculator: experience accumulation and level curve.
//!
//! `level_for_exp` is a pure, total, monotonically non-decreasing step
//! function, so the same exp always yields the same level and a user's
//! progression can be replayed deterministically. Experience only ever
//! accumulates; the policy for which actions earn how much exp lives in
//! [`crate::config::ExpConfig`], outside this module.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::core::User;
use crate::error::{EngineError, Result};

/// Cumulative exp required to reach each level.
///
/// Index `n` holds the threshold for level `n + 1`. Beyond the table,
/// every additional [`EXP_PER_EXTRA_LEVEL`] exp is one more level.
pub const LEVEL_THRESHOLDS: &[u32] = &[0, 100, 250, 500, 1000, 1750, 2750, 4000, 5500, 7500];

/// Exp per level past the end of [`LEVEL_THRESHOLDS`].
pub const EXP_PER_EXTRA_LEVEL: u32 = 2500;

/// Compute the level for a given exp total.
///
/// Pure and total over all of `u32`; monotonically non-decreasing.
/// Level 1 corresponds to 0 exp.
pub fn level_for_exp(exp: u32) -> u32 {
    let last = LEVEL_THRESHOLDS[LEVEL_THRESHOLDS.len() - 1];
    if exp >= last {
        return LEVEL_THRESHOLDS.len() as u32 + (exp - last) / EXP_PER_EXTRA_LEVEL;
    }

    let mut level = 1;
    for (i, &threshold) in LEVEL_THRESHOLDS.iter().enumerate() {
        if exp >= threshold {
            level = (i + 1) as u32;
        } else {
            break;
        }
    }
    level
}

/// Exp remaining until the next level, given the current exp total.
///
/// Returns 0 when the next threshold is not representable in `u32`
/// (exp totals near the saturation point have no reachable next level).
pub fn exp_to_next_level(exp: u32) -> u32 {
    let level = level_for_exp(exp);
    if (level as usize) < LEVEL_THRESHOLDS.len() {
        return LEVEL_THRESHOLDS[level as usize] - exp;
    }

    let last = LEVEL_THRESHOLDS[LEVEL_THRESHOLDS.len() - 1];
    let steps = level - LEVEL_THRESHOLDS.len() as u32 + 1;
    match steps
        .checked_mul(EXP_PER_EXTRA_LEVEL)
        .and_then(|extra| last.checked_add(extra))
    {
        Some(next_threshold) => next_threshold - exp,
        None => 0,
    }
}

/// The result of an exp award.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpAward {
    /// The new exp total.
    pub exp: u32,
    /// The new level.
    pub level: u32,
    /// Whether the award crossed at least one level threshold.
    pub leveled_up: bool,
}

/// Add `amount` exp to the user and recompute their level.
///
/// `amount` must be greater than zero. `leveled_up` is true iff the new
/// level differs from the level computed from the exp total before the
/// award. Exp saturates at `u32::MAX` rather than wrapping.
pub fn award_exp(user: &mut User, amount: u32) -> Result<ExpAward> {
    if amount == 0 {
        warn!(user_id = %user.id, "rejected zero-amount exp award");
        return Err(EngineError::invalid_amount(amount));
    }

    let level_before = level_for_exp(user.exp);
    user.exp = user.exp.saturating_add(amount);
    let level = level_for_exp(user.exp);
    user.level = level;

    let leveled_up = level != level_before;
    if leveled_up {
        info!(user_id = %user.id, level, exp = user.exp, "level up");
    } else {
        debug!(user_id = %user.id, amount, exp = user.exp, "awarded exp");
    }

    Ok(ExpAward {
        exp: user.exp,
        level,
        leveled_up,
    })
}
