//! Driving port for habit management.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Error, Habit, UserId};

/// Serializable habit payload for driving ports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitPayload {
    pub id: Uuid,
    pub user_id: UserId,
    pub name: String,
    pub description: Option<String>,
    pub frequency_goal: u8,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub last_check_in: Option<NaiveDate>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Habit> for HabitPayload {
    fn from(value: Habit) -> Self {
        let streak = value.streak();
        Self {
            id: value.id(),
            user_id: value.owner_id().clone(),
            name: value.name().as_ref().to_owned(),
            description: value.description().map(|text| text.as_ref().to_owned()),
            frequency_goal: value.frequency_goal().get(),
            current_streak: streak.current_streak,
            longest_streak: streak.longest_streak,
            last_check_in: streak.last_check_in,
            is_active: value.is_active(),
            created_at: value.created_at(),
            updated_at: value.updated_at(),
        }
    }
}

/// Request to create a habit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateHabitRequest {
    pub user_id: UserId,
    pub name: String,
    pub description: Option<String>,
    /// Defaults to one check-in per week.
    pub frequency_goal: Option<i64>,
}

/// Partial update of a habit. `None` leaves a field unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateHabitRequest {
    pub habit_id: Uuid,
    pub user_id: UserId,
    pub name: Option<String>,
    /// A blank description clears the stored one.
    pub description: Option<String>,
    pub frequency_goal: Option<i64>,
    pub is_active: Option<bool>,
}

/// Request to delete a habit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteHabitRequest {
    pub habit_id: Uuid,
    pub user_id: UserId,
}

/// Driving port for habit writes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HabitCommand: Send + Sync {
    /// Create an active habit with zeroed streaks.
    async fn create_habit(&self, request: CreateHabitRequest) -> Result<HabitPayload, Error>;

    /// Apply a partial update. Streak fields cannot be changed here.
    async fn update_habit(&self, request: UpdateHabitRequest) -> Result<HabitPayload, Error>;

    /// Delete a habit and its check-ins.
    async fn delete_habit(&self, request: DeleteHabitRequest) -> Result<(), Error>;
}
