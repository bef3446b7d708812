//! Badge rule evaluation and idempotent awarding.
//!
//! The evaluator is a pure pass over the catalog: build a
//! [`StatsSnapshot`] from the user's event history, compare each
//! not-yet-held badge's criterion against it, and record every newly
//! satisfied badge in catalog order. Nothing is cached between calls, so
//! catalog additions make users retroactively eligible on their next
//! check, and a repeated call with unchanged state awards nothing.

use chrono::{DateTime, Utc};
use tracing::info;

use crate::badges::catalog::{BadgeCatalog, BadgeDefinition, CriterionKind};
use crate::core::{EarnedBadge, Pellet, PelletKind, User};

/// The cumulative counters badge criteria are evaluated against.
///
/// Derived, not persisted: rebuilt from the event log and user state on
/// every check.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    /// Negative pellets received by the user's plate.
    pub negative_received: u64,
    /// Positive pellets received by the user's plate.
    pub positive_received: u64,
    /// Negative pellets given by the user.
    pub negative_given: u64,
    /// Positive pellets given by the user.
    pub positive_given: u64,
    /// Total experience earned.
    pub exp: u64,
}

impl StatsSnapshot {
    /// Build a snapshot from the events received by the user's plate,
    /// the events the user created, and their exp total.
    pub fn from_events(received: &[Pellet], given: &[Pellet], exp: u32) -> Self {
        let mut snapshot = Self {
            exp: u64::from(exp),
            ..Self::default()
        };

        for pellet in received {
            match pellet.kind {
                PelletKind::Negative => snapshot.negative_received += 1,
                PelletKind::Positive => snapshot.positive_received += 1,
            }
        }
        for pellet in given {
            match pellet.kind {
                PelletKind::Negative => snapshot.negative_given += 1,
                PelletKind::Positive => snapshot.positive_given += 1,
            }
        }

        snapshot
    }

    /// Total pellets given, regardless of kind.
    pub fn pellets_given(&self) -> u64 {
        self.negative_given + self.positive_given
    }

    /// The counter a criterion kind compares against.
    pub fn value_for(&self, kind: CriterionKind) -> u64 {
        match kind {
            CriterionKind::NegativePelletsReceived => self.negative_received,
            CriterionKind::PositivePelletsReceived => self.positive_received,
            CriterionKind::PelletsGiven => self.pellets_given(),
            CriterionKind::PositivePelletsGiven => self.positive_given,
            CriterionKind::ExpEarned => self.exp,
        }
    }
}

/// Find the catalog badges the user does not hold but whose criterion
/// the snapshot satisfies, in catalog order.
///
/// Pure: no state is mutated and nothing is cached.
pub fn newly_satisfied<'a>(
    catalog: &'a BadgeCatalog,
    user: &User,
    snapshot: &StatsSnapshot,
) -> Vec<&'a BadgeDefinition> {
    catalog
        .iter()
        .filter(|badge| !user.has_badge(&badge.id))
        .filter(|badge| snapshot.value_for(badge.criterion.kind) >= badge.criterion.threshold)
        .collect()
}

/// Evaluate the catalog against the snapshot and record every newly
/// satisfied badge on the user.
///
/// Returns the newly awarded badge ids in catalog order; empty when no
/// new badge qualifies (the common case). Calling again with unchanged
/// state returns an empty sequence.
pub fn check_and_award(
    catalog: &BadgeCatalog,
    user: &mut User,
    snapshot: &StatsSnapshot,
    now: DateTime<Utc>,
) -> Vec<String> {
    let new_badges: Vec<String> = newly_satisfied(catalog, user, snapshot)
        .into_iter()
        .map(|badge| badge.id.clone())
        .collect();

    for id in &new_badges {
        user.add_badge(EarnedBadge::with_timestamp(id.clone(), now));
        info!(user_id = %user.id, badge_id = %id, "badge awarded");
    }

    new_badges
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::badges::catalog::Rarity;

    fn badge(id: &str, kind: CriterionKind, threshold: u64) -> BadgeDefinition {
        BadgeDefinition::new(id, id, "test", "icon", Rarity::Common, kind, threshold)
    }

    fn catalog() -> BadgeCatalog {
        BadgeCatalog::new(vec![
            badge("first-tag", CriterionKind::PelletsGiven, 1),
            badge("good-samaritan", CriterionKind::PositivePelletsGiven, 2),
            badge("marked", CriterionKind::NegativePelletsReceived, 2),
            badge("seasoned", CriterionKind::ExpEarned, 100),
        ])
        .unwrap()
    }

    fn new_user() -> User {
        User::register("u1", "ABC-123", 10, 5)
    }

    fn negative(id: &str) -> Pellet {
        Pellet::new(id, "XYZ-789", "u1", PelletKind::Negative, "speeding")
    }

    fn positive(id: &str) -> Pellet {
        Pellet::new(id, "XYZ-789", "u1", PelletKind::Positive, "courteous")
    }

    #[test]
    fn test_snapshot_from_events() {
        let received = vec![negative("r1"), negative("r2"), positive("r3")];
        let given = vec![negative("g1"), positive("g2"), positive("g3")];

        let snapshot = StatsSnapshot::from_events(&received, &given, 42);

        assert_eq!(snapshot.negative_received, 2);
        assert_eq!(snapshot.positive_received, 1);
        assert_eq!(snapshot.negative_given, 1);
        assert_eq!(snapshot.positive_given, 2);
        assert_eq!(snapshot.pellets_given(), 3);
        assert_eq!(snapshot.exp, 42);
    }

    #[test]
    fn test_snapshot_value_for_each_kind() {
        let snapshot = StatsSnapshot {
            negative_received: 1,
            positive_received: 2,
            negative_given: 3,
            positive_given: 4,
            exp: 5,
        };

        assert_eq!(snapshot.value_for(CriterionKind::NegativePelletsReceived), 1);
        assert_eq!(snapshot.value_for(CriterionKind::PositivePelletsReceived), 2);
        assert_eq!(snapshot.value_for(CriterionKind::PelletsGiven), 7);
        assert_eq!(snapshot.value_for(CriterionKind::PositivePelletsGiven), 4);
        assert_eq!(snapshot.value_for(CriterionKind::ExpEarned), 5);
    }

    #[test]
    fn test_no_badges_before_any_activity() {
        let catalog = catalog();
        let mut user = new_user();
        let snapshot = StatsSnapshot::default();

        let awarded = check_and_award(&catalog, &mut user, &snapshot, Utc::now());

        assert!(awarded.is_empty());
        assert!(user.badges.is_empty());
    }

    #[test]
    fn test_first_tag_scenario() {
        let catalog = catalog();
        let mut user = new_user();

        // No pellets given yet
        let snapshot = StatsSnapshot::from_events(&[], &[], 0);
        assert!(check_and_award(&catalog, &mut user, &snapshot, Utc::now()).is_empty());

        // One pellet given
        let given = vec![negative("g1")];
        let snapshot = StatsSnapshot::from_events(&[], &given, 0);
        let awarded = check_and_award(&catalog, &mut user, &snapshot, Utc::now());
        assert_eq!(awarded, vec!["first-tag".to_string()]);

        // Calling again with unchanged state awards nothing
        let awarded = check_and_award(&catalog, &mut user, &snapshot, Utc::now());
        assert!(awarded.is_empty());
        assert_eq!(user.badges.len(), 1);
    }

    #[test]
    fn test_multiple_badges_in_one_pass_follow_catalog_order() {
        let catalog = catalog();
        let mut user = new_user();

        // Satisfies seasoned (exp), first-tag and good-samaritan (given)
        let given = vec![positive("g1"), positive("g2")];
        let snapshot = StatsSnapshot::from_events(&[], &given, 150);

        let awarded = check_and_award(&catalog, &mut user, &snapshot, Utc::now());

        assert_eq!(
            awarded,
            vec![
                "first-tag".to_string(),
                "good-samaritan".to_string(),
                "seasoned".to_string(),
            ]
        );
    }

    #[test]
    fn test_zero_threshold_satisfied_immediately() {
        let catalog =
            BadgeCatalog::new(vec![badge("welcome", CriterionKind::PelletsGiven, 0)]).unwrap();
        let mut user = new_user();

        let awarded = check_and_award(&catalog, &mut user, &StatsSnapshot::default(), Utc::now());

        assert_eq!(awarded, vec!["welcome".to_string()]);
    }

    #[test]
    fn test_all_badges_held_returns_empty() {
        let catalog = catalog();
        let mut user = new_user();
        for def in catalog.iter() {
            user.add_badge(EarnedBadge::new(def.id.clone()));
        }

        let snapshot = StatsSnapshot {
            negative_received: 100,
            positive_received: 100,
            negative_given: 100,
            positive_given: 100,
            exp: 100_000,
        };
        let awarded = check_and_award(&catalog, &mut user, &snapshot, Utc::now());

        assert!(awarded.is_empty());
    }

    #[test]
    fn test_catalog_addition_makes_user_retroactively_eligible() {
        let mut user = new_user();
        let given = vec![negative("g1")];
        let snapshot = StatsSnapshot::from_events(&[], &given, 0);

        let catalog = BadgeCatalog::new(vec![badge("first-tag", CriterionKind::PelletsGiven, 1)])
            .unwrap();
        let awarded = check_and_award(&catalog, &mut user, &snapshot, Utc::now());
        assert_eq!(awarded, vec!["first-tag".to_string()]);

        // A new catalog version adds a badge the user already satisfies
        let catalog = BadgeCatalog::new(vec![
            badge("first-tag", CriterionKind::PelletsGiven, 1),
            badge("starter", CriterionKind::PelletsGiven, 1),
        ])
        .unwrap();
        let awarded = check_and_award(&catalog, &mut user, &snapshot, Utc::now());
        assert_eq!(awarded, vec!["starter".to_string()]);
    }

    #[test]
    fn test_earned_at_uses_supplied_timestamp() {
        let catalog = catalog();
        let mut user = new_user();
        let now = Utc::now();
        let given = vec![negative("g1")];
        let snapshot = StatsSnapshot::from_events(&[], &given, 0);

        check_and_award(&catalog, &mut user, &snapshot, now);

        assert_eq!(user.badges[0].earned_at, now);
    }

    #[test]
    fn test_received_events_drive_received_criteria() {
        let catalog = catalog();
        let mut user = new_user();

        let received = vec![negative("r1"), negative("r2")];
        let snapshot = StatsSnapshot::from_events(&received, &[], 0);
        let awarded = check_and_award(&catalog, &mut user, &snapshot, Utc::now());

        assert_eq!(awarded, vec!["marked".to_string()]);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            // Property: check_and_award is idempotent — an immediate
            // second call with unchanged state awards nothing.
            #[test]
            fn prop_second_call_awards_nothing(
                negative_given in 0u64..50,
                positive_given in 0u64..50,
                exp in 0u64..5000,
            ) {
                let catalog = catalog();
                let mut user = new_user();
                let snapshot = StatsSnapshot {
                    negative_given,
                    positive_given,
                    exp,
                    ..StatsSnapshot::default()
                };

                let first = check_and_award(&catalog, &mut user, &snapshot, Utc::now());
                let second = check_and_award(&catalog, &mut user, &snapshot, Utc::now());

                prop_assert!(second.is_empty());
                prop_assert_eq!(user.badges.len(), first.len());
            }

            // Property: awarded ids are unique and drawn from the catalog.
            #[test]
            fn prop_awards_are_unique_catalog_ids(
                negative_received in 0u64..50,
                exp in 0u64..5000,
            ) {
                let catalog = catalog();
                let mut user = new_user();
                let snapshot = StatsSnapshot {
                    negative_received,
                    exp,
                    ..StatsSnapshot::default()
                };

                let awarded = check_and_award(&catalog, &mut user, &snapshot, Utc::now());

                for (i, id) in awarded.iter().enumerate() {
                    prop_assert!(catalog.get(id).is_some());
                    prop_assert!(!awarded[..i].contains(id));
                }
            }
        }
    }
}
