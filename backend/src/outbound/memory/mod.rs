//! In-process adapters used when no database is configured.
//!
//! State lives for the lifetime of the process and is lost on restart.

mod habit_store;

pub use habit_store::InMemoryHabitStore;
