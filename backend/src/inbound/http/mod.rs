//! HTTP inbound adapter exposing REST endpoints.

pub mod check_ins;
pub mod error;
pub mod habits;
pub mod health;
pub mod schemas;
pub mod session;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub(crate) mod validation;

pub use error::ApiResult;
