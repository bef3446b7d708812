//! Unified error types for the roadrep engine.
//!
//! The error taxonomy distinguishes recoverable outcomes from caller
//! defects: `InsufficientBalance` is expected and surfaced to the user,
//! `InvalidAmount` and `DuplicateUser` are integration bugs that are
//! logged and rejected, never silently clamped. A malformed badge catalog
//! fails at load time (`Catalog`) so a bad entry can never corrupt per-user
//! mutations.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::core::PelletKind;

/// The main error type for engine operations.
#[derive(Error, Debug)]
pub enum EngineError {
    /// A debit was attempted beyond the available balance.
    ///
    /// Recoverable: the balance is left unchanged and no pellet event
    /// may be created for the failed action.
    #[error("insufficient {kind} balance: have {available}, requested {requested}")]
    InsufficientBalance {
        kind: PelletKind,
        available: u32,
        requested: u32,
    },

    /// A zero amount was passed to a debit, credit, or exp award.
    #[error("invalid amount: {amount} (must be > 0)")]
    InvalidAmount { amount: u32 },

    /// Badge catalog validation failure at load time.
    #[error("catalog error: {message}")]
    Catalog { message: String },

    /// Configuration parse or validation failure at load time.
    #[error("config error: {message}")]
    Config { message: String },

    /// I/O errors from the file-backed event log.
    #[error("storage error at {path}: {source}")]
    Storage {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// JSON or TOML parsing/serialization errors.
    #[error("serialization error: {message}")]
    Serde { message: String },

    /// User not found in the user store.
    #[error("user not found: {user_id}")]
    UserNotFound { user_id: String },

    /// Registration attempted with an id that already exists.
    #[error("user already registered: {user_id}")]
    DuplicateUser { user_id: String },
}

/// A specialized Result type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;

impl EngineError {
    /// Create an insufficient balance error.
    pub fn insufficient_balance(kind: PelletKind, available: u32, requested: u32) -> Self {
        Self::InsufficientBalance {
            kind,
            available,
            requested,
        }
    }

    /// Create an invalid amount error.
    pub fn invalid_amount(amount: u32) -> Self {
        Self::InvalidAmount { amount }
    }

    /// Create a catalog error.
    pub fn catalog(message: impl Into<String>) -> Self {
        Self::Catalog {
            message: message.into(),
        }
    }

    /// Create a config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a storage error from an I/O error.
    pub fn storage(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Storage {
            path: path.into(),
            source,
        }
    }

    /// Create a serialization error.
    pub fn serde(message: impl Into<String>) -> Self {
        Self::Serde {
            message: message.into(),
        }
    }

    /// Create a user not found error.
    pub fn user_not_found(user_id: impl Into<String>) -> Self {
        Self::UserNotFound {
            user_id: user_id.into(),
        }
    }

    /// Create a duplicate user error.
    pub fn duplicate_user(user_id: impl Into<String>) -> Self {
        Self::DuplicateUser {
            user_id: user_id.into(),
        }
    }

    /// Check if this error is recoverable by user action.
    ///
    /// `InsufficientBalance` can be resolved by the user (buy more
    /// pellets); everything else is a defect or infrastructure failure.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::InsufficientBalance { .. })
    }
}

impl From<io::Error> for EngineError {
    fn from(err: io::Error) -> Self {
        Self::Storage {
            path: PathBuf::new(),
            source: err,
        }
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde {
            message: err.to_string(),
        }
    }
}
