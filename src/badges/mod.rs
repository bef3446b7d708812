//! Badge catalog and rule evaluation.

pub mod catalog;
pub mod evaluator;

pub use catalog::{BadgeCatalog, BadgeDefinition, Criterion, CriterionKind, Rarity};
pub use evaluator::{check_and_award, newly_satisfied, StatsSnapshot};
