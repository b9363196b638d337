//! Habit management HTTP handlers.
//!
//! ```text
//! GET    /api/v1/habits?page&limit&active
//! POST   /api/v1/habits
//! GET    /api/v1/habits/{habitId}
//! PATCH  /api/v1/habits/{habitId}
//! DELETE /api/v1/habits/{habitId}
//! ```

use actix_web::{HttpResponse, delete, get, patch, post, web};
use pagination::Paginated;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::{
    CreateHabitRequest, DeleteHabitRequest, GetHabitRequest, HABIT_LIST_PAGE_SIZE, HabitDetail,
    HabitPayload, HabitSummary, ListHabitsRequest, UpdateHabitRequest,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorSchema, HabitDetailSchema, HabitPageSchema, HabitSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, missing_field_error, parse_page, parse_uuid};

pub(crate) const HABIT_ID: FieldName = FieldName::new("habitId");

/// Query parameters for listing habits.
#[derive(Debug, Default, Deserialize, Serialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListHabitsQuery {
    /// One-based page number (default 1).
    pub page: Option<u32>,
    /// Page size, 1 to 100 (default 20).
    pub limit: Option<u32>,
    /// Only return active habits when `true`.
    pub active: Option<bool>,
}

/// Request payload for creating a habit.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateHabitBody {
    #[schema(example = "Read 20 pages")]
    pub name: Option<String>,
    pub description: Option<String>,
    #[schema(minimum = 1, maximum = 7)]
    pub frequency_goal: Option<i64>,
}

/// Partial update; absent fields stay unchanged and a blank description clears it.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateHabitBody {
    pub name: Option<String>,
    pub description: Option<String>,
    #[schema(minimum = 1, maximum = 7)]
    pub frequency_goal: Option<i64>,
    pub is_active: Option<bool>,
}

/// Plain acknowledgement body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "Habit deleted")]
    pub message: String,
}

/// List the caller's habits with today's status.
#[utoipa::path(
    get,
    path = "/api/v1/habits",
    params(ListHabitsQuery),
    responses(
        (status = 200, description = "Habits, newest first", body = HabitPageSchema),
        (status = 400, description = "Invalid pagination", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["habits"],
    operation_id = "listHabits"
)]
#[get("/habits")]
pub async fn list_habits(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<ListHabitsQuery>,
) -> ApiResult<web::Json<Paginated<HabitSummary>>> {
    let user_id = session.require_user_id()?;
    let ListHabitsQuery {
        page,
        limit,
        active,
    } = query.into_inner();
    let page = parse_page(page, limit, HABIT_LIST_PAGE_SIZE)?;
    let habits = state
        .habits_query
        .list_habits(ListHabitsRequest {
            user_id,
            active_only: active.unwrap_or(false),
            page,
        })
        .await?;
    Ok(web::Json(habits))
}

/// Create a habit owned by the caller.
#[utoipa::path(
    post,
    path = "/api/v1/habits",
    request_body = CreateHabitBody,
    responses(
        (status = 201, description = "Habit created", body = HabitSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["habits"],
    operation_id = "createHabit"
)]
#[post("/habits")]
pub async fn create_habit(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateHabitBody>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let CreateHabitBody {
        name,
        description,
        frequency_goal,
    } = payload.into_inner();
    let name = name.ok_or_else(|| missing_field_error(FieldName::new("name")))?;
    let habit = state
        .habits
        .create_habit(CreateHabitRequest {
            user_id,
            name,
            description,
            frequency_goal,
        })
        .await?;
    Ok(HttpResponse::Created().json(habit))
}

/// Fetch one habit with its recent check-ins.
#[utoipa::path(
    get,
    path = "/api/v1/habits/{habitId}",
    params(("habitId" = uuid::Uuid, Path, description = "Habit identifier")),
    responses(
        (status = 200, description = "Habit detail", body = HabitDetailSchema),
        (status = 400, description = "Invalid habit id", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Habit not found", body = ErrorSchema)
    ),
    tags = ["habits"],
    operation_id = "getHabit"
)]
#[get("/habits/{habit_id}")]
pub async fn get_habit(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<HabitDetail>> {
    let user_id = session.require_user_id()?;
    let habit_id = parse_uuid(&path, HABIT_ID)?;
    let detail = state
        .habits_query
        .get_habit(GetHabitRequest { habit_id, user_id })
        .await?;
    Ok(web::Json(detail))
}

/// Update a habit's name, description, goal or active flag.
#[utoipa::path(
    patch,
    path = "/api/v1/habits/{habitId}",
    params(("habitId" = uuid::Uuid, Path, description = "Habit identifier")),
    request_body = UpdateHabitBody,
    responses(
        (status = 200, description = "Updated habit", body = HabitSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Habit not found", body = ErrorSchema)
    ),
    tags = ["habits"],
    operation_id = "updateHabit"
)]
#[patch("/habits/{habit_id}")]
pub async fn update_habit(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<UpdateHabitBody>,
) -> ApiResult<web::Json<HabitPayload>> {
    let user_id = session.require_user_id()?;
    let habit_id = parse_uuid(&path, HABIT_ID)?;
    let UpdateHabitBody {
        name,
        description,
        frequency_goal,
        is_active,
    } = payload.into_inner();
    let habit = state
        .habits
        .update_habit(UpdateHabitRequest {
            habit_id,
            user_id,
            name,
            description,
            frequency_goal,
            is_active,
        })
        .await?;
    Ok(web::Json(habit))
}

/// Delete a habit and all of its check-ins.
#[utoipa::path(
    delete,
    path = "/api/v1/habits/{habitId}",
    params(("habitId" = uuid::Uuid, Path, description = "Habit identifier")),
    responses(
        (status = 200, description = "Habit deleted", body = MessageResponse),
        (status = 400, description = "Invalid habit id", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Habit not found", body = ErrorSchema)
    ),
    tags = ["habits"],
    operation_id = "deleteHabit"
)]
#[delete("/habits/{habit_id}")]
pub async fn delete_habit(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<MessageResponse>> {
    let user_id = session.require_user_id()?;
    let habit_id = parse_uuid(&path, HABIT_ID)?;
    state
        .habits
        .delete_habit(DeleteHabitRequest { habit_id, user_id })
        .await?;
    Ok(web::Json(MessageResponse {
        message: "Habit deleted".to_owned(),
    }))
}

#[cfg(test)]
#[path = "habits_tests.rs"]
mod tests;
