//! Storage traits for the event log and user records.
//!
//! The persistence transport (SQL, HTTP/RPC, flat file) is irrelevant to
//! the engine; these traits are the injection seam. The event log is
//! append-only from the engine's point of view — pellets are never
//! mutated or deleted.

use std::sync::Arc;

use crate::core::{Pellet, User};
use crate::error::Result;

/// Read/append access to the pellet event log.
pub trait EventLog: Send + Sync {
    /// Append a pellet to the log.
    fn append(&self, pellet: &Pellet) -> Result<()>;

    /// All pellets created by the given user, in append order.
    fn events_for_user(&self, user_id: &str) -> Result<Vec<Pellet>>;

    /// All pellets targeting the given plate, in append order.
    fn events_for_plate(&self, plate: &str) -> Result<Vec<Pellet>>;

    /// Total number of events in the log.
    fn len(&self) -> Result<usize>;

    /// Check if the log is empty.
    fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

/// Read/write access to user records.
pub trait UserStore: Send + Sync {
    /// Retrieve a user by id.
    ///
    /// Returns `Ok(None)` if the user doesn't exist.
    fn get(&self, id: &str) -> Result<Option<User>>;

    /// Retrieve the user registered under the given plate.
    ///
    /// Returns `Ok(None)` if no user owns the plate.
    fn find_by_plate(&self, plate: &str) -> Result<Option<User>>;

    /// Save a user.
    ///
    /// Creates a new record or updates an existing one.
    fn put(&self, user: &User) -> Result<()>;

    /// Delete a user.
    ///
    /// Returns `Ok(())` even if the user doesn't exist.
    fn delete(&self, id: &str) -> Result<()>;

    /// Check if a user exists.
    fn exists(&self, id: &str) -> Result<bool> {
        Ok(self.get(id)?.is_some())
    }
}

/// Blanket implementation of EventLog for Arc-wrapped logs.
impl<T: EventLog + ?Sized> EventLog for Arc<T> {
    fn append(&self, pellet: &Pellet) -> Result<()> {
        (**self).append(pellet)
    }

    fn events_for_user(&self, user_id: &str) -> Result<Vec<Pellet>> {
        (**self).events_for_user(user_id)
    }

    fn events_for_plate(&self, plate: &str) -> Result<Vec<Pellet>> {
        (**self).events_for_plate(plate)
    }

    fn len(&self) -> Result<usize> {
        (**self).len()
    }
}

/// Blanket implementation of UserStore for Arc-wrapped stores.
impl<T: UserStore + ?Sized> UserStore for Arc<T> {
    fn get(&self, id: &str) -> Result<Option<User>> {
        (**self).get(id)
    }

    fn find_by_plate(&self, plate: &str) -> Result<Option<User>> {
        (**self).find_by_plate(plate)
    }

    fn put(&self, user: &User) -> Result<()> {
        (**self).put(user)
    }

    fn delete(&self, id: &str) -> Result<()> {
        (**self).delete(id)
    }
}
