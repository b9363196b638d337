//! Outbound adapters implementing the domain's driven ports.
//!
//! - **persistence**: PostgreSQL repositories using Diesel and a bb8 pool.
//! - **memory**: a mutex-guarded store used when no database is configured.
//!
//! Adapters translate between domain types and storage rows and hold no
//! business rules beyond the uniqueness and cascade guarantees the schema
//! provides.

pub mod memory;
pub mod persistence;
