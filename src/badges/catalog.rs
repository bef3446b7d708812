//! Static badge catalog: definitions, rarity, criteria, and loading.
//!
//! The catalog is loaded once at process start and validated eagerly:
//! unknown criterion kinds fail at deserialization (the kind is a closed
//! enum) and structural defects (duplicate ids, empty fields) fail at
//! construction, so a bad catalog entry can never corrupt per-user
//! evaluation later. Declared order is preserved; it determines both
//! evaluation and downstream notification order.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// Badge rarity tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

impl Rarity {
    /// Get the rarity name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Common => "common",
            Self::Uncommon => "uncommon",
            Self::Rare => "rare",
            Self::Epic => "epic",
            Self::Legendary => "legendary",
        }
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The cumulative statistic a badge criterion is evaluated against.
///
/// Closed set: an unknown kind in a catalog file is a deserialization
/// error, not a runtime fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CriterionKind {
    /// Negative pellets received by the user's plate.
    NegativePelletsReceived,
    /// Positive pellets received by the user's plate.
    PositivePelletsReceived,
    /// Pellets of any kind given by the user.
    PelletsGiven,
    /// Positive pellets given by the user.
    PositivePelletsGiven,
    /// Total experience earned.
    ExpEarned,
}

/// A single-criterion unlock rule: `statistic >= threshold`.
///
/// A threshold of 0 is legal and satisfied by every snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Criterion {
    /// The statistic to compare.
    #[serde(rename = "type")]
    pub kind: CriterionKind,
    /// The value at which the badge unlocks.
    pub threshold: u64,
}

/// A static catalog entry describing one badge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BadgeDefinition {
    /// Unique badge id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Display description.
    pub description: String,
    /// Icon identifier for the UI layer.
    pub icon: String,
    /// Rarity tier.
    pub rarity: Rarity,
    /// The unlock criterion.
    pub criterion: Criterion,
}

impl BadgeDefinition {
    /// Create a new badge definition.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        icon: impl Into<String>,
        rarity: Rarity,
        kind: CriterionKind,
        threshold: u64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            icon: icon.into(),
            rarity,
            criterion: Criterion { kind, threshold },
        }
    }
}

/// TOML file shape: a list of `[[badges]]` tables.
#[derive(Debug, Deserialize)]
struct CatalogFile {
    badges: Vec<BadgeDefinition>,
}

/// An ordered, validated badge catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct BadgeCatalog {
    badges: Vec<BadgeDefinition>,
}

impl BadgeCatalog {
    /// Build a catalog from definitions, validating eagerly.
    ///
    /// Fails with `Catalog` on empty ids or names, or duplicate ids.
    /// Declared order is preserved.
    pub fn new(badges: Vec<BadgeDefinition>) -> Result<Self> {
        for badge in &badges {
            if badge.id.trim().is_empty() {
                return Err(EngineError::catalog("badge with empty id"));
            }
            if badge.name.trim().is_empty() {
                return Err(EngineError::catalog(format!(
                    "badge {} has an empty name",
                    badge.id
                )));
            }
        }

        for (i, badge) in badges.iter().enumerate() {
            if badges[..i].iter().any(|b| b.id == badge.id) {
                return Err(EngineError::catalog(format!(
                    "duplicate badge id: {}",
                    badge.id
                )));
            }
        }

        Ok(Self { badges })
    }

    /// Parse a catalog from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let file: CatalogFile = toml::from_str(text)
            .map_err(|e| EngineError::catalog(format!("failed to parse catalog: {}", e)))?;
        Self::new(file.badges)
    }

    /// Load a catalog from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text =
            fs::read_to_string(path).map_err(|e| EngineError::storage(path.to_path_buf(), e))?;
        Self::from_toml_str(&text)
    }

    /// The catalog shipped with the engine.
    pub fn builtin() -> Self {
        // Validation cannot fail on the shipped definitions; keep the
        // construction infallible for callers.
        Self::new(vec![
            BadgeDefinition::new(
                "first-tag",
                "First Tag",
                "Tag your first driver",
                "target",
                Rarity::Common,
                CriterionKind::PelletsGiven,
                1,
            ),
            BadgeDefinition::new(
                "vigilante",
                "Vigilante",
                "Tag 25 drivers",
                "shield",
                Rarity::Uncommon,
                CriterionKind::PelletsGiven,
                25,
            ),
            BadgeDefinition::new(
                "road-guardian",
                "Road Guardian",
                "Tag 100 drivers",
                "crown",
                Rarity::Rare,
                CriterionKind::PelletsGiven,
                100,
            ),
            BadgeDefinition::new(
                "good-samaritan",
                "Good Samaritan",
                "Give 10 positive tags",
                "heart",
                Rarity::Uncommon,
                CriterionKind::PositivePelletsGiven,
                10,
            ),
            BadgeDefinition::new(
                "beloved",
                "Beloved",
                "Receive 25 positive tags",
                "star",
                Rarity::Rare,
                CriterionKind::PositivePelletsReceived,
                25,
            ),
            BadgeDefinition::new(
                "marked",
                "Marked",
                "Receive 10 negative tags",
                "flame",
                Rarity::Common,
                CriterionKind::NegativePelletsReceived,
                10,
            ),
            BadgeDefinition::new(
                "seasoned",
                "Seasoned",
                "Earn 1000 exp",
                "medal",
                Rarity::Epic,
                CriterionKind::ExpEarned,
                1000,
            ),
            BadgeDefinition::new(
                "road-legend",
                "Road Legend",
                "Earn 10000 exp",
                "trophy",
                Rarity::Legendary,
                CriterionKind::ExpEarned,
                10_000,
            ),
        ])
        .expect("builtin catalog is valid")
    }

    /// Iterate definitions in declared order.
    pub fn iter(&self) -> impl Iterator<Item = &BadgeDefinition> {
        self.badges.iter()
    }

    /// Look up a definition by id.
    pub fn get(&self, id: &str) -> Option<&BadgeDefinition> {
        self.badges.iter().find(|b| b.id == id)
    }

    /// Number of definitions in the catalog.
    pub fn len(&self) -> usize {
        self.badges.len()
    }

    /// Check if the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.badges.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn badge(id: &str, kind: CriterionKind, threshold: u64) -> BadgeDefinition {
        BadgeDefinition::new(id, id, "test badge", "icon", Rarity::Common, kind, threshold)
    }

    #[test]
    fn test_builtin_catalog_is_valid() {
        let catalog = BadgeCatalog::builtin();
        assert!(!catalog.is_empty());
        assert!(catalog.get("first-tag").is_some());
    }

    #[test]
    fn test_catalog_preserves_declared_order() {
        let catalog = BadgeCatalog::new(vec![
            badge("b", CriterionKind::PelletsGiven, 1),
            badge("a", CriterionKind::PelletsGiven, 2),
            badge("c", CriterionKind::ExpEarned, 3),
        ])
        .unwrap();

        let ids: Vec<&str> = catalog.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_duplicate_id_is_rejected() {
        let err = BadgeCatalog::new(vec![
            badge("dup", CriterionKind::PelletsGiven, 1),
            badge("dup", CriterionKind::ExpEarned, 2),
        ])
        .unwrap_err();

        assert!(matches!(err, EngineError::Catalog { .. }));
        assert!(err.to_string().contains("dup"));
    }

    #[test]
    fn test_empty_id_is_rejected() {
        let err = BadgeCatalog::new(vec![badge("  ", CriterionKind::PelletsGiven, 1)]).unwrap_err();
        assert!(matches!(err, EngineError::Catalog { .. }));
    }

    #[test]
    fn test_empty_name_is_rejected() {
        let mut def = badge("ok", CriterionKind::PelletsGiven, 1);
        def.name = String::new();

        let err = BadgeCatalog::new(vec![def]).unwrap_err();
        assert!(matches!(err, EngineError::Catalog { .. }));
    }

    #[test]
    fn test_zero_threshold_is_legal() {
        let catalog = BadgeCatalog::new(vec![badge("free", CriterionKind::ExpEarned, 0)]).unwrap();
        assert_eq!(catalog.get("free").unwrap().criterion.threshold, 0);
    }

    #[test]
    fn test_from_toml_str() {
        let catalog = BadgeCatalog::from_toml_str(
            r#"
            [[badges]]
            id = "first-tag"
            name = "First Tag"
            description = "Tag your first driver"
            icon = "target"
            rarity = "common"
            criterion = { type = "pellets_given", threshold = 1 }

            [[badges]]
            id = "seasoned"
            name = "Seasoned"
            description = "Earn 1000 exp"
            icon = "medal"
            rarity = "epic"
            criterion = { type = "exp_earned", threshold = 1000 }
            "#,
        )
        .unwrap();

        assert_eq!(catalog.len(), 2);
        let first = catalog.get("first-tag").unwrap();
        assert_eq!(first.criterion.kind, CriterionKind::PelletsGiven);
        assert_eq!(first.criterion.threshold, 1);
        assert_eq!(first.rarity, Rarity::Common);
    }

    #[test]
    fn test_unknown_criterion_kind_fails_at_parse() {
        let err = BadgeCatalog::from_toml_str(
            r#"
            [[badges]]
            id = "bad"
            name = "Bad"
            description = "bad"
            icon = "x"
            rarity = "common"
            criterion = { type = "pellets_eaten", threshold = 1 }
            "#,
        )
        .unwrap_err();

        assert!(matches!(err, EngineError::Catalog { .. }));
    }

    #[test]
    fn test_negative_threshold_fails_at_parse() {
        let err = BadgeCatalog::from_toml_str(
            r#"
            [[badges]]
            id = "bad"
            name = "Bad"
            description = "bad"
            icon = "x"
            rarity = "common"
            criterion = { type = "pellets_given", threshold = -1 }
            "#,
        )
        .unwrap_err();

        assert!(matches!(err, EngineError::Catalog { .. }));
    }

    #[test]
    fn test_load_from_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("badges.toml");
        std::fs::write(
            &path,
            r#"
            [[badges]]
            id = "first-tag"
            name = "First Tag"
            description = "Tag your first driver"
            icon = "target"
            rarity = "common"
            criterion = { type = "pellets_given", threshold = 1 }
            "#,
        )
        .unwrap();

        let catalog = BadgeCatalog::load(&path).unwrap();
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_load_missing_file() {
        let temp = TempDir::new().unwrap();
        let err = BadgeCatalog::load(temp.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, EngineError::Storage { .. }));
    }

    #[test]
    fn test_rarity_display() {
        assert_eq!(Rarity::Common.to_string(), "common");
        assert_eq!(Rarity::Legendary.to_string(), "legendary");
    }
}
