//! Pellet event model.
//!
//! A pellet is one immutable tagging event against a license plate. The
//! event log is append-only: pellets are created exactly once per tagging
//! action and never mutated or deleted, so cumulative statistics and
//! trends can always be replayed from the log.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Schema version for pellet events.
///
/// Increment when the event schema changes in a breaking way.
pub const PELLET_SCHEMA_VERSION: u8 = 1;

/// The polarity of a tagging event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PelletKind {
    /// A negative reputation mark.
    Negative,
    /// A positive reputation mark.
    Positive,
}

impl PelletKind {
    /// Get the kind name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Negative => "negative",
            Self::Positive => "positive",
        }
    }
}

impl fmt::Display for PelletKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An optional geographic coordinate attached to a tagging event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lon: f64,
}

impl GeoPoint {
    /// Create a new geo point.
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// One tagging event against a license plate.
///
/// Immutable once created. Identified by `id`; `plate` is the tagged
/// vehicle and `creator_id` is the tagging user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pellet {
    /// Schema version for forward compatibility.
    pub v: u8,
    /// Unique event id.
    pub id: String,
    /// The license plate that was tagged.
    pub plate: String,
    /// The user who created the tag.
    pub creator_id: String,
    /// When the tag was created.
    pub created_at: DateTime<Utc>,
    /// Negative or positive mark.
    pub kind: PelletKind,
    /// Free-text reason for the tag.
    pub reason: String,
    /// Where the tag was created, if the client supplied a location.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geo: Option<GeoPoint>,
}

impl Pellet {
    /// Create a new pellet with the current timestamp.
    pub fn new(
        id: impl Into<String>,
        plate: impl Into<String>,
        creator_id: impl Into<String>,
        kind: PelletKind,
        reason: impl Into<String>,
    ) -> Self {
        Self::with_timestamp(id, plate, creator_id, kind, reason, Utc::now())
    }

    /// Create a pellet with a specific timestamp (for testing and replay).
    pub fn with_timestamp(
        id: impl Into<String>,
        plate: impl Into<String>,
        creator_id: impl Into<String>,
        kind: PelletKind,
        reason: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            v: PELLET_SCHEMA_VERSION,
            id: id.into(),
            plate: plate.into(),
            creator_id: creator_id.into(),
            created_at,
            kind,
            reason: reason.into(),
            geo: None,
        }
    }

    /// Attach a geo coordinate to this pellet.
    pub fn with_geo(mut self, geo: GeoPoint) -> Self {
        self.geo = Some(geo);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_as_str() {
        assert_eq!(PelletKind::Negative.as_str(), "negative");
        assert_eq!(PelletKind::Positive.as_str(), "positive");
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(PelletKind::Negative.to_string(), "negative");
        assert_eq!(PelletKind::Positive.to_string(), "positive");
    }

    #[test]
    fn test_new_pellet() {
        let pellet = Pellet::new("p1", "ABC-123", "u1", PelletKind::Negative, "ran a red light");

        assert_eq!(pellet.v, PELLET_SCHEMA_VERSION);
        assert_eq!(pellet.id, "p1");
        assert_eq!(pellet.plate, "ABC-123");
        assert_eq!(pellet.creator_id, "u1");
        assert_eq!(pellet.kind, PelletKind::Negative);
        assert_eq!(pellet.reason, "ran a red light");
        assert!(pellet.geo.is_none());
        assert!(pellet.created_at <= Utc::now());
    }

    #[test]
    fn test_with_geo() {
        let pellet = Pellet::new("p1", "ABC-123", "u1", PelletKind::Positive, "let me merge")
            .with_geo(GeoPoint::new(52.52, 13.405));

        let geo = pellet.geo.unwrap();
        assert!((geo.lat - 52.52).abs() < f64::EPSILON);
        assert!((geo.lon - 13.405).abs() < f64::EPSILON);
    }

    #[test]
    fn test_kind_serialization() {
        let json = serde_json::to_string(&PelletKind::Negative).unwrap();
        assert_eq!(json, r#""negative""#);

        let parsed: PelletKind = serde_json::from_str(r#""positive""#).unwrap();
        assert_eq!(parsed, PelletKind::Positive);
    }

    #[test]
    fn test_pellet_serialization() {
        let pellet = Pellet::new("p1", "ABC-123", "u1", PelletKind::Negative, "tailgating");
        let json = serde_json::to_string(&pellet).unwrap();

        assert!(json.contains(r#""kind":"negative""#));
        assert!(json.contains(r#""plate":"ABC-123""#));
        // geo should not be present when None
        assert!(!json.contains("geo"));

        let parsed: Pellet = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, pellet);
    }

    #[test]
    fn test_pellet_serialization_with_geo() {
        let pellet = Pellet::new("p1", "ABC-123", "u1", PelletKind::Positive, "courteous")
            .with_geo(GeoPoint::new(1.0, 2.0));
        let json = serde_json::to_string(&pellet).unwrap();

        assert!(json.contains("geo"));

        let parsed: Pellet = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, pellet);
    }
}
