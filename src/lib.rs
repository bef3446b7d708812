//! roadrep - Progression & Scoring Engine for plate tagging
//!
//! roadrep converts a stream of tagging events (pellets) into a bounded
//! pellet economy, an experience/level curve, idempotent badge awards,
//! and rolling trend statistics. All computation is synchronous and pure
//! over state supplied through injectable storage traits; the embedding
//! application owns persistence transport, notification, and rendering.

pub mod badges;
pub mod config;
pub mod core;
pub mod economy;
pub mod engine;
pub mod error;
pub mod progression;
pub mod store;
pub mod trends;

pub use badges::{
    check_and_award, newly_satisfied, BadgeCatalog, BadgeDefinition, Criterion, CriterionKind,
    Rarity, StatsSnapshot,
};
pub use config::{Config, EconomyConfig, ExpConfig, TrendsConfig};
pub use core::{EarnedBadge, GeoPoint, Pellet, PelletKind, User, PELLET_SCHEMA_VERSION};
pub use economy::{credit, debit};
pub use engine::{Engine, TagOutcome};
pub use error::{EngineError, Result};
pub use progression::{
    award_exp, exp_to_next_level, level_for_exp, ExpAward, EXP_PER_EXTRA_LEVEL, LEVEL_THRESHOLDS,
};
pub use store::{EventLog, FileEventLog, MemoryEventLog, MemoryUserStore, UserStore};
pub use trends::{
    summarize, summarize_with, ReasonCount, TrendStat, TrendSummary, DEFAULT_TOP_REASONS,
    DEFAULT_WINDOW_DAYS, NEW_ACTIVITY_PCT,
};
