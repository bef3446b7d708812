//! Economy ledger: pellet balance debits and credits.
//!
//! Balances are `u32`, so they are never negative by construction. A
//! debit beyond the available balance is rejected all-or-nothing: the
//! balance is left unchanged and the caller must not create the
//! corresponding pellet event. Credits always succeed (shop purchases and
//! the erase item are balance credits, not event deletions).
//!
//! Zero amounts are a caller error (`InvalidAmount`), rejected rather
//! than clamped.

use tracing::{debug, warn};

use crate::core::{PelletKind, User};
use crate::error::{EngineError, Result};

/// Remove `amount` pellets of `kind` from the user's balance.
///
/// Returns the new balance. Fails with `InsufficientBalance` when the
/// balance is below `amount`, leaving the balance unchanged, and with
/// `InvalidAmount` when `amount` is zero.
pub fn debit(user: &mut User, kind: PelletKind, amount: u32) -> Result<u32> {
    if amount == 0 {
        warn!(user_id = %user.id, kind = %kind, "rejected zero-amount debit");
        return Err(EngineError::invalid_amount(amount));
    }

    let balance = user.balance(kind);
    if balance < amount {
        return Err(EngineError::insufficient_balance(kind, balance, amount));
    }

    let slot = user.balance_mut(kind);
    *slot -= amount;
    let new_balance = *slot;

    debug!(user_id = %user.id, kind = %kind, amount, new_balance, "debited pellets");
    Ok(new_balance)
}

/// Add `amount` pellets of `kind` to the user's balance.
///
/// Always succeeds for a non-zero amount; returns the new balance.
/// Saturates at `u32::MAX` rather than wrapping.
pub fn credit(user: &mut User, kind: PelletKind, amount: u32) -> Result<u32> {
    if amount == 0 {
        warn!(user_id = %user.id, kind = %kind, "rejected zero-amount credit");
        return Err(EngineError::invalid_amount(amount));
    }

    let slot = user.balance_mut(kind);
    *slot = slot.saturating_add(amount);
    let new_balance = *slot;

    debug!(user_id = %user.id, kind = %kind, amount, new_balance, "credited pellets");
    Ok(new_balance)
}
