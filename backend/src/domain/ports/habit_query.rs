//! Driving port for habit reads.

use async_trait::async_trait;
use pagination::{PageRequest, Paginated};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{CheckInPayload, HabitPayload};
use crate::domain::{Error, UserId};

/// Default page size for habit listings.
pub const HABIT_LIST_PAGE_SIZE: u32 = 20;
/// Recent check-ins embedded in each listed habit.
pub const LIST_RECENT_CHECK_INS: u32 = 7;
/// Recent check-ins embedded in a single habit view.
pub const DETAIL_RECENT_CHECK_INS: u32 = 30;

/// Request for a single habit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetHabitRequest {
    pub habit_id: Uuid,
    pub user_id: UserId,
}

/// A habit with its most recent check-ins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitDetail {
    pub habit: HabitPayload,
    pub recent_check_ins: Vec<CheckInPayload>,
    pub total_check_ins: u64,
}

/// Request for one page of the caller's habits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListHabitsRequest {
    pub user_id: UserId,
    pub active_only: bool,
    pub page: PageRequest,
}

/// A listed habit with today's status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitSummary {
    pub habit: HabitPayload,
    pub completed_today: bool,
    pub today_check_in: Option<CheckInPayload>,
    pub recent_check_ins: Vec<CheckInPayload>,
    pub total_check_ins: u64,
}

/// Driving port for habit reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HabitQuery: Send + Sync {
    /// Fetch one habit owned by the caller.
    async fn get_habit(&self, request: GetHabitRequest) -> Result<HabitDetail, Error>;

    /// List the caller's habits newest first.
    async fn list_habits(
        &self,
        request: ListHabitsRequest,
    ) -> Result<Paginated<HabitSummary>, Error>;
}
