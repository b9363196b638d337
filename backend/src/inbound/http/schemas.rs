//! OpenAPI schema definitions for domain types.
//!
//! Domain and port types stay free of `utoipa`. The wrappers here mirror
//! their serialised shape and are registered under the public schema names.

#![expect(
    dead_code,
    reason = "Schema wrappers are only read by utoipa derive output"
)]

use chrono::{DateTime, NaiveDate, Utc};
use utoipa::ToSchema;
use uuid::Uuid;

/// Stable machine-readable error codes returned in API error responses.
#[derive(ToSchema)]
#[schema(as = ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// No authenticated session.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// The requested resource does not exist for the caller.
    #[schema(rename = "not_found")]
    NotFound,
    /// The request clashes with existing state.
    #[schema(rename = "conflict")]
    Conflict,
    /// A backing store is unreachable.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// API error payload.
#[derive(ToSchema)]
#[schema(as = Error, rename_all = "camelCase")]
pub struct ErrorSchema {
    #[schema(example = "invalid_request")]
    code: ErrorCodeSchema,
    #[schema(example = "Cannot check in for future dates")]
    message: String,
    /// Correlation identifier echoed in the `trace-id` header.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    details: Option<serde_json::Value>,
}

/// A habit with its derived streak fields.
#[derive(ToSchema)]
#[schema(as = Habit, rename_all = "camelCase")]
pub struct HabitSchema {
    id: Uuid,
    user_id: Uuid,
    #[schema(example = "Read 20 pages", max_length = 100)]
    name: String,
    #[schema(max_length = 500)]
    description: Option<String>,
    /// Target check-ins per week.
    #[schema(minimum = 1, maximum = 7, example = 5)]
    frequency_goal: u8,
    current_streak: u32,
    /// Never lower than `currentStreak`; never decreases.
    longest_streak: u32,
    last_check_in: Option<NaiveDate>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// One day's check-in for a habit.
#[derive(ToSchema)]
#[schema(as = CheckIn, rename_all = "camelCase")]
pub struct CheckInSchema {
    id: Uuid,
    habit_id: Uuid,
    /// UTC calendar day.
    date: NaiveDate,
    #[schema(max_length = 500)]
    note: Option<String>,
    created_at: DateTime<Utc>,
}

/// Habit plus the caller's status for today.
#[derive(ToSchema)]
#[schema(as = HabitSummary, rename_all = "camelCase")]
pub struct HabitSummarySchema {
    habit: HabitSchema,
    completed_today: bool,
    today_check_in: Option<CheckInSchema>,
    /// Seven most recent check-ins, newest first.
    recent_check_ins: Vec<CheckInSchema>,
    total_check_ins: u64,
}

/// Habit with its thirty most recent check-ins.
#[derive(ToSchema)]
#[schema(as = HabitDetail, rename_all = "camelCase")]
pub struct HabitDetailSchema {
    habit: HabitSchema,
    recent_check_ins: Vec<CheckInSchema>,
    total_check_ins: u64,
}

/// Page position and totals.
#[derive(ToSchema)]
#[schema(as = PageInfo, rename_all = "camelCase")]
pub struct PageInfoSchema {
    page: u32,
    limit: u32,
    total: u64,
    total_pages: u64,
}

/// One page of habit summaries.
#[derive(ToSchema)]
#[schema(as = HabitPage)]
pub struct HabitPageSchema {
    items: Vec<HabitSummarySchema>,
    pagination: PageInfoSchema,
}

/// One page of check-in history, newest first.
#[derive(ToSchema)]
#[schema(as = CheckInPage)]
pub struct CheckInPageSchema {
    items: Vec<CheckInSchema>,
    pagination: PageInfoSchema,
}

/// Result of recording a check-in.
#[derive(ToSchema)]
#[schema(as = RecordCheckInResponse, rename_all = "camelCase")]
pub struct RecordCheckInSchema {
    check_in: CheckInSchema,
    current_streak: u32,
    longest_streak: u32,
}
