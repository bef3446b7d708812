//! Core domain types: pellet events and user progression state.

pub mod pellet;
pub mod user;

pub use pellet::{GeoPoint, Pellet, PelletKind, PELLET_SCHEMA_VERSION};
pub use user::{EarnedBadge, User};
