//! Engine orchestrator: the tagging flow end to end.
//!
//! Wires the economy ledger, progression calculator, badge evaluator,
//! and trend analyzer over injected storage. One tag runs as: debit the
//! tagger's balance (failure aborts with no event), append the pellet to
//! the log, award exp per policy, re-check badges against the updated
//! statistics, and persist the user. Every operation returns plain data;
//! notification and rendering belong to the caller.
//!
//! The engine performs no locking. Callers must serialize mutations per
//! user id (at most one in-flight mutation per user); cross-user
//! operations may proceed in parallel.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::badges::{check_and_award, BadgeCatalog, StatsSnapshot};
use crate::config::Config;
use crate::core::{GeoPoint, Pellet, PelletKind, User};
use crate::economy;
use crate::error::{EngineError, Result};
use crate::progression::{award_exp, ExpAward};
use crate::store::{EventLog, UserStore};
use crate::trends::{summarize_with, TrendSummary};

/// The result of one tagging action, as plain data for the UI and
/// notification layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagOutcome {
    /// The pellet event that was created.
    pub pellet: Pellet,
    /// The tagger's remaining balance for the pellet kind used.
    pub new_balance: u32,
    /// The tagger's exp award.
    pub progress: ExpAward,
    /// Badges newly awarded to the tagger, in catalog order.
    pub new_badges: Vec<String>,
    /// Badges newly awarded to the tagged plate's owner, if registered.
    pub target_new_badges: Vec<String>,
}

/// Progression and scoring engine over injected storage.
pub struct Engine<L: EventLog, U: UserStore> {
    log: L,
    users: U,
    catalog: BadgeCatalog,
    config: Config,
    /// Per-process sequence for pellet ids.
    pellet_seq: AtomicU64,
}

impl<L: EventLog, U: UserStore> Engine<L, U> {
    /// Create an engine over the given stores, catalog, and config.
    ///
    /// Fails fast on an invalid config.
    pub fn new(log: L, users: U, catalog: BadgeCatalog, config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            log,
            users,
            catalog,
            config,
            pellet_seq: AtomicU64::new(0),
        })
    }

    /// The badge catalog in use.
    pub fn catalog(&self) -> &BadgeCatalog {
        &self.catalog
    }

    /// The configuration in use.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Register a new user with the configured starting balances.
    pub fn register_user(
        &self,
        id: impl Into<String>,
        plate: impl Into<String>,
    ) -> Result<User> {
        let id = id.into();
        if self.users.exists(&id)? {
            return Err(EngineError::duplicate_user(id));
        }

        let user = User::register(
            id,
            plate,
            self.config.economy.starting_negative,
            self.config.economy.starting_positive,
        );
        self.users.put(&user)?;

        debug!(user_id = %user.id, plate = %user.plate, "registered user");
        Ok(user)
    }

    /// Tag a plate: debit, append event, award exp, re-check badges.
    ///
    /// Fails with `InsufficientBalance` before any event is created when
    /// the tagger's balance for `kind` is empty (all-or-nothing). A
    /// positive tag additionally awards exp to the plate's registered
    /// owner, whose badge eligibility is re-checked as well.
    ///
    /// The event is appended before the user record is saved, because
    /// the badge check reads the log and must see the new pellet. If the
    /// save then fails, the event persists while the debit and exp
    /// mutation are lost; there is no cross-store transaction here.
    /// Callers that need atomicity must retry the save or reconcile the
    /// user record against the log.
    pub fn tag_plate(
        &self,
        actor_id: &str,
        plate: &str,
        kind: PelletKind,
        reason: impl Into<String>,
        geo: Option<GeoPoint>,
        now: DateTime<Utc>,
    ) -> Result<TagOutcome> {
        let mut actor = self.load_user(actor_id)?;

        // Debit first: a failed debit must leave no event behind.
        let new_balance = economy::debit(&mut actor, kind, 1)?;

        let mut pellet =
            Pellet::with_timestamp(self.next_pellet_id(now), plate, actor_id, kind, reason, now);
        if let Some(geo) = geo {
            pellet = pellet.with_geo(geo);
        }
        self.log.append(&pellet)?;

        let progress = self.award_policy_exp(&mut actor, self.config.exp.per_tag_given)?;

        // Positive tags also reward the tagged plate's owner.
        let tagging_own_plate = actor.plate == plate;
        if kind == PelletKind::Positive && tagging_own_plate {
            self.award_policy_exp(&mut actor, self.config.exp.per_positive_received)?;
        }

        let snapshot = self.snapshot_of(&actor)?;
        let new_badges = check_and_award(&self.catalog, &mut actor, &snapshot, now);
        self.users.put(&actor)?;

        let mut target_new_badges = Vec::new();
        if kind == PelletKind::Positive && !tagging_own_plate {
            if let Some(mut target) = self.users.find_by_plate(plate)? {
                self.award_policy_exp(&mut target, self.config.exp.per_positive_received)?;
                let snapshot = self.snapshot_of(&target)?;
                target_new_badges = check_and_award(&self.catalog, &mut target, &snapshot, now);
                self.users.put(&target)?;
            }
        }

        Ok(TagOutcome {
            pellet,
            new_balance,
            progress,
            new_badges,
            target_new_badges,
        })
    }

    /// Credit purchased pellets to a user's balance.
    ///
    /// Returns the new balance for `kind`.
    pub fn purchase_pellets(&self, user_id: &str, kind: PelletKind, amount: u32) -> Result<u32> {
        let mut user = self.load_user(user_id)?;
        let balance = economy::credit(&mut user, kind, amount)?;
        self.users.put(&user)?;
        Ok(balance)
    }

    /// Apply one erase purchase: credit the configured number of
    /// negative pellets back to the user.
    ///
    /// The event history is untouched; an erase is a balance credit, not
    /// an event deletion.
    pub fn apply_erase(&self, user_id: &str) -> Result<u32> {
        self.purchase_pellets(user_id, PelletKind::Negative, self.config.economy.erase_credit)
    }

    /// Re-evaluate badge eligibility for a user.
    ///
    /// Returns the newly awarded badge ids in catalog order; empty when
    /// nothing new qualifies. Repeating the call with no intervening
    /// state change returns an empty sequence.
    pub fn check_and_award(&self, user_id: &str, now: DateTime<Utc>) -> Result<Vec<String>> {
        let mut user = self.load_user(user_id)?;
        let snapshot = self.snapshot_of(&user)?;
        let awarded = check_and_award(&self.catalog, &mut user, &snapshot, now);
        if !awarded.is_empty() {
            self.users.put(&user)?;
        }
        Ok(awarded)
    }

    /// Build the cumulative statistics snapshot for a user.
    pub fn stats_for(&self, user_id: &str) -> Result<StatsSnapshot> {
        let user = self.load_user(user_id)?;
        self.snapshot_of(&user)
    }

    /// Trend summary over the events targeting a plate.
    pub fn trends_for_plate(
        &self,
        plate: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<TrendSummary>> {
        let events = self.log.events_for_plate(plate)?;
        Ok(summarize_with(
            &events,
            now,
            self.config.trends.window_days,
            self.config.trends.top_reasons,
        ))
    }

    /// Trend summary over the events a user has created.
    pub fn trends_for_user(
        &self,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<TrendSummary>> {
        let events = self.log.events_for_user(user_id)?;
        Ok(summarize_with(
            &events,
            now,
            self.config.trends.window_days,
            self.config.trends.top_reasons,
        ))
    }

    fn load_user(&self, user_id: &str) -> Result<User> {
        self.users
            .get(user_id)?
            .ok_or_else(|| EngineError::user_not_found(user_id))
    }

    fn snapshot_of(&self, user: &User) -> Result<StatsSnapshot> {
        let received = self.log.events_for_plate(&user.plate)?;
        let given = self.log.events_for_user(&user.id)?;
        Ok(StatsSnapshot::from_events(&received, &given, user.exp))
    }

    /// Award policy exp, treating a zero-rate policy as "no award".
    fn award_policy_exp(&self, user: &mut User, amount: u32) -> Result<ExpAward> {
        if amount == 0 {
            return Ok(ExpAward {
                exp: user.exp,
                level: user.level,
                leveled_up: false,
            });
        }
        award_exp(user, amount)
    }

    fn next_pellet_id(&self, now: DateTime<Utc>) -> String {
        let seq = self.pellet_seq.fetch_add(1, Ordering::Relaxed);
        format!("plt-{}-{}", now.timestamp_millis(), seq)
    }
}
