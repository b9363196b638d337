//! Port for check-in persistence.
//!
//! Adapters must reject a second check-in for the same habit and day with
//! [`CheckInRepositoryError::Conflict`], even under concurrent inserts.

use async_trait::async_trait;
use chrono::NaiveDate;
use pagination::PageRequest;
use uuid::Uuid;

use crate::domain::{CheckIn, NewCheckIn, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by check-in repository adapters.
    pub enum CheckInRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "check-in repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "check-in repository query failed: {message}",
        /// A check-in already exists for the habit and day.
        Conflict { habit_id: Uuid, date: NaiveDate } =>
            "habit {habit_id} already has a check-in on {date}",
        /// The check-in does not exist.
        NotFound { check_in_id: Uuid } =>
            "check-in {check_in_id} not found",
    }
}

/// Port for reading and writing check-ins.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CheckInRepository: Send + Sync {
    /// Every check-in for a habit, newest day first.
    async fn list_check_ins(&self, habit_id: &Uuid)
    -> Result<Vec<CheckIn>, CheckInRepositoryError>;

    /// Find a check-in by id, scoped to its habit and owner.
    async fn find_check_in(
        &self,
        habit_id: &Uuid,
        check_in_id: &Uuid,
        owner_id: &UserId,
    ) -> Result<Option<CheckIn>, CheckInRepositoryError>;

    /// Find the check-in recorded for a habit on `date`.
    async fn find_by_date(
        &self,
        habit_id: &Uuid,
        date: NaiveDate,
    ) -> Result<Option<CheckIn>, CheckInRepositoryError>;

    /// Store a check-in.
    async fn insert_check_in(
        &self,
        check_in: &NewCheckIn,
    ) -> Result<CheckIn, CheckInRepositoryError>;

    /// Delete a check-in by id.
    async fn delete_check_in(&self, check_in_id: &Uuid) -> Result<(), CheckInRepositoryError>;

    /// One page of a habit's check-ins, newest day first.
    async fn page_check_ins(
        &self,
        habit_id: &Uuid,
        page: PageRequest,
    ) -> Result<Vec<CheckIn>, CheckInRepositoryError>;

    /// Number of check-ins recorded for a habit.
    async fn count_check_ins(&self, habit_id: &Uuid) -> Result<u64, CheckInRepositoryError>;
}
