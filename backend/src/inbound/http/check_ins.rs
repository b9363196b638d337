//! Check-in HTTP handlers.
//!
//! ```text
//! POST   /api/v1/habits/{habitId}/checkin
//! DELETE /api/v1/habits/{habitId}/checkin/{checkInId}
//! GET    /api/v1/habits/{habitId}/checkins?page&limit
//! ```

use actix_web::{HttpResponse, delete, get, post, web};
use pagination::Paginated;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::{
    CHECK_IN_HISTORY_PAGE_SIZE, CheckInPayload, ListCheckInsRequest, RecordCheckInRequest,
    RemoveCheckInRequest,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::habits::HABIT_ID;
use crate::inbound::http::schemas::{CheckInPageSchema, ErrorSchema, RecordCheckInSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, parse_optional_date, parse_optional_json, parse_page, parse_uuid,
};

const CHECK_IN_ID: FieldName = FieldName::new("checkInId");

/// Request payload for recording a check-in; an empty body means today with no note.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecordCheckInBody {
    /// `YYYY-MM-DD` or RFC 3339; defaults to today (UTC).
    #[schema(example = "2026-03-14")]
    pub date: Option<String>,
    /// Free text, trimmed; blank notes are dropped.
    #[schema(max_length = 500)]
    pub note: Option<String>,
}

/// Acknowledgement returned after undoing a check-in.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RemoveCheckInResponseBody {
    /// Human-readable acknowledgement.
    #[schema(example = "Check-in removed")]
    pub message: String,
    /// Streak recomputed from the remaining check-ins.
    pub current_streak: u32,
}

/// Query parameters for check-in history.
#[derive(Debug, Default, Deserialize, Serialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CheckInHistoryQuery {
    /// One-based page number (default 1).
    pub page: Option<u32>,
    /// Page size, 1 to 100 (default 30).
    pub limit: Option<u32>,
}

/// Record a check-in for today or an earlier day.
#[utoipa::path(
    post,
    path = "/api/v1/habits/{habitId}/checkin",
    params(("habitId" = uuid::Uuid, Path, description = "Habit identifier")),
    request_body = RecordCheckInBody,
    responses(
        (status = 201, description = "Check-in recorded", body = RecordCheckInSchema),
        (status = 400, description = "Malformed body, future or malformed date, or oversized note", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Habit not found", body = ErrorSchema),
        (status = 409, description = "Already checked in for this date", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["check-ins"],
    operation_id = "recordCheckIn"
)]
#[post("/habits/{habit_id}/checkin")]
pub async fn record_check_in(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    body: web::Bytes,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let habit_id = parse_uuid(&path, HABIT_ID)?;
    let RecordCheckInBody { date, note } = parse_optional_json(&body)?;
    let date = parse_optional_date(date.as_deref(), FieldName::new("date"))?;
    let response = state
        .check_ins
        .record_check_in(RecordCheckInRequest {
            habit_id,
            user_id,
            date,
            note,
        })
        .await?;
    Ok(HttpResponse::Created().json(response))
}

/// Undo a check-in and recompute the current streak.
#[utoipa::path(
    delete,
    path = "/api/v1/habits/{habitId}/checkin/{checkInId}",
    params(
        ("habitId" = uuid::Uuid, Path, description = "Habit identifier"),
        ("checkInId" = uuid::Uuid, Path, description = "Check-in identifier")
    ),
    responses(
        (status = 200, description = "Check-in removed", body = RemoveCheckInResponseBody),
        (status = 400, description = "Invalid identifier", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Check-in not found", body = ErrorSchema)
    ),
    tags = ["check-ins"],
    operation_id = "removeCheckIn"
)]
#[delete("/habits/{habit_id}/checkin/{check_in_id}")]
pub async fn remove_check_in(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<(String, String)>,
) -> ApiResult<web::Json<RemoveCheckInResponseBody>> {
    let user_id = session.require_user_id()?;
    let (raw_habit_id, raw_check_in_id) = path.into_inner();
    let habit_id = parse_uuid(&raw_habit_id, HABIT_ID)?;
    let check_in_id = parse_uuid(&raw_check_in_id, CHECK_IN_ID)?;
    let response = state
        .check_ins
        .remove_check_in(RemoveCheckInRequest {
            habit_id,
            check_in_id,
            user_id,
        })
        .await?;
    Ok(web::Json(RemoveCheckInResponseBody {
        message: "Check-in removed".to_owned(),
        current_streak: response.current_streak,
    }))
}

/// Page through a habit's check-ins, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/habits/{habitId}/checkins",
    params(
        ("habitId" = uuid::Uuid, Path, description = "Habit identifier"),
        CheckInHistoryQuery
    ),
    responses(
        (status = 200, description = "Check-in history", body = CheckInPageSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Habit not found", body = ErrorSchema)
    ),
    tags = ["check-ins"],
    operation_id = "listCheckIns"
)]
#[get("/habits/{habit_id}/checkins")]
pub async fn list_check_ins(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    query: web::Query<CheckInHistoryQuery>,
) -> ApiResult<web::Json<Paginated<CheckInPayload>>> {
    let user_id = session.require_user_id()?;
    let habit_id = parse_uuid(&path, HABIT_ID)?;
    let CheckInHistoryQuery { page, limit } = query.into_inner();
    let page = parse_page(page, limit, CHECK_IN_HISTORY_PAGE_SIZE)?;
    let history = state
        .check_ins_query
        .list_check_ins(ListCheckInsRequest {
            habit_id,
            user_id,
            page,
        })
        .await?;
    Ok(web::Json(history))
}

#[cfg(test)]
#[path = "check_ins_tests.rs"]
mod tests;
