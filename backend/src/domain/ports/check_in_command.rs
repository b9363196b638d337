//! Driving port for recording and undoing check-ins.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{CheckIn, Error, UserId};

/// Serializable check-in payload for driving ports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckInPayload {
    pub id: Uuid,
    pub habit_id: Uuid,
    pub date: NaiveDate,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<CheckIn> for CheckInPayload {
    fn from(value: CheckIn) -> Self {
        Self {
            id: value.id(),
            habit_id: value.habit_id(),
            date: value.date(),
            note: value.note().map(|note| note.as_ref().to_owned()),
            created_at: value.created_at(),
        }
    }
}

/// Request to mark a habit done for one day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordCheckInRequest {
    pub habit_id: Uuid,
    pub user_id: UserId,
    /// Day to record; defaults to today (UTC).
    pub date: Option<NaiveDate>,
    pub note: Option<String>,
}

/// Result of a recorded check-in with the refreshed streak fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordCheckInResponse {
    pub check_in: CheckInPayload,
    pub current_streak: u32,
    pub longest_streak: u32,
}

/// Request to undo a check-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoveCheckInRequest {
    pub habit_id: Uuid,
    pub check_in_id: Uuid,
    pub user_id: UserId,
}

/// Result of an undone check-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveCheckInResponse {
    pub current_streak: u32,
}

/// Driving port for check-in mutations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CheckInCommand: Send + Sync {
    /// Record a check-in and recompute the habit's streak.
    ///
    /// Fails with `not_found` when the caller does not own the habit,
    /// `invalid_request` for future dates or oversized notes and `conflict`
    /// when the day already has a check-in.
    async fn record_check_in(
        &self,
        request: RecordCheckInRequest,
    ) -> Result<RecordCheckInResponse, Error>;

    /// Remove a check-in and recompute the current streak.
    ///
    /// The longest streak is left untouched.
    async fn remove_check_in(
        &self,
        request: RemoveCheckInRequest,
    ) -> Result<RemoveCheckInResponse, Error>;
}
