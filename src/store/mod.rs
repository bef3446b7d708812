//! Storage abstraction: event log and user records.
//!
//! The engine only sees the [`EventLog`] and [`UserStore`] traits; the
//! memory and file implementations here cover tests and single-process
//! embedding.

pub mod file;
pub mod memory;
pub mod traits;

pub use file::FileEventLog;
pub use memory::{MemoryEventLog, MemoryUserStore};
pub use traits::{EventLog, UserStore};
