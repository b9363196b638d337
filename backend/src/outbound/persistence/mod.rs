//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repositories translate between Diesel rows and domain types and contain
//! no business rules. Row structs (`models`) and table definitions (`schema`)
//! stay private to this module. Connections come from a `bb8` pool through
//! `diesel-async`; schema migrations are embedded at compile time and applied
//! at startup by [`run_migrations`].

mod diesel_basic_error_mapping;
mod diesel_check_in_repository;
mod diesel_habit_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_check_in_repository::DieselCheckInRepository;
pub use diesel_habit_repository::DieselHabitRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
