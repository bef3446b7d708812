//! In-memory storage for testing and embedding.
//!
//! Thread-safe `RwLock`-based implementations of the storage traits.
//! Contents are lost when the store is dropped.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::core::{Pellet, User};
use crate::error::Result;
use crate::store::{EventLog, UserStore};

/// In-memory append-only pellet log.
#[derive(Debug, Default)]
pub struct MemoryEventLog {
    /// Events in append order.
    events: RwLock<Vec<Pellet>>,
}

impl MemoryEventLog {
    /// Create a new empty log.
    pub fn new() -> Self {
        Self {
            events: RwLock::new(Vec::new()),
        }
    }

    /// All events in append order.
    pub fn all(&self) -> Vec<Pellet> {
        self.events.read().unwrap().clone()
    }
}

impl EventLog for MemoryEventLog {
    fn append(&self, pellet: &Pellet) -> Result<()> {
        self.events.write().unwrap().push(pellet.clone());
        Ok(())
    }

    fn events_for_user(&self, user_id: &str) -> Result<Vec<Pellet>> {
        let events = self.events.read().unwrap();
        Ok(events
            .iter()
            .filter(|p| p.creator_id == user_id)
            .cloned()
            .collect())
    }

    fn events_for_plate(&self, plate: &str) -> Result<Vec<Pellet>> {
        let events = self.events.read().unwrap();
        Ok(events.iter().filter(|p| p.plate == plate).cloned().collect())
    }

    fn len(&self) -> Result<usize> {
        Ok(self.events.read().unwrap().len())
    }
}

/// In-memory user store.
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    /// User records by id.
    users: RwLock<HashMap<String, User>>,
}

impl MemoryUserStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
        }
    }

    /// Number of users in the store.
    pub fn len(&self) -> usize {
        self.users.read().unwrap().len()
    }

    /// Check if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.users.read().unwrap().is_empty()
    }
}

impl UserStore for MemoryUserStore {
    fn get(&self, id: &str) -> Result<Option<User>> {
        let users = self.users.read().unwrap();
        Ok(users.get(id).cloned())
    }

    fn find_by_plate(&self, plate: &str) -> Result<Option<User>> {
        let users = self.users.read().unwrap();
        Ok(users.values().find(|u| u.plate == plate).cloned())
    }

    fn put(&self, user: &User) -> Result<()> {
        let mut users = self.users.write().unwrap();
        users.insert(user.id.clone(), user.clone());
        Ok(())
    }

    fn delete(&self, id: &str) -> Result<()> {
        let mut users = self.users.write().unwrap();
        users.remove(id);
        Ok(())
    }
}
