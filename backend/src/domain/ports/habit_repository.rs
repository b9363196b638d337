//! Port for habit persistence, including the derived streak fields.

use async_trait::async_trait;
use pagination::PageRequest;
use uuid::Uuid;

use crate::domain::{Habit, StreakSnapshot, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by habit repository adapters.
    pub enum HabitRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "habit repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "habit repository query failed: {message}",
        /// The habit vanished between lookup and write.
        NotFound { habit_id: Uuid } =>
            "habit {habit_id} not found",
    }
}

/// Port for reading and writing habits.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HabitRepository: Send + Sync {
    /// Find a habit by id, scoped to its owner.
    async fn find_owned(
        &self,
        habit_id: &Uuid,
        owner_id: &UserId,
    ) -> Result<Option<Habit>, HabitRepositoryError>;

    /// Store a new habit.
    async fn insert(&self, habit: &Habit) -> Result<(), HabitRepositoryError>;

    /// Overwrite the owner-editable fields of an existing habit.
    ///
    /// Streak fields are left as stored.
    async fn update(&self, habit: &Habit) -> Result<(), HabitRepositoryError>;

    /// Delete a habit together with its check-ins.
    async fn delete(&self, habit_id: &Uuid) -> Result<(), HabitRepositoryError>;

    /// Page through an owner's habits, newest first.
    async fn list_for_owner(
        &self,
        owner_id: &UserId,
        active_only: bool,
        page: PageRequest,
    ) -> Result<Vec<Habit>, HabitRepositoryError>;

    /// Count an owner's habits using the same filter as
    /// [`HabitRepository::list_for_owner`].
    async fn count_for_owner(
        &self,
        owner_id: &UserId,
        active_only: bool,
    ) -> Result<u64, HabitRepositoryError>;

    /// Persist recomputed streak fields.
    async fn update_streak_fields(
        &self,
        habit_id: &Uuid,
        streak: StreakSnapshot,
    ) -> Result<(), HabitRepositoryError>;
}
