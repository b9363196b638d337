//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every habit, check-in and health endpoint together
//! with the schema wrappers from [`crate::inbound::http::schemas`], so domain
//! types never depend on utoipa. Swagger UI serves it in debug builds and the
//! `openapi-dump` binary prints it for external tooling.

use crate::inbound::http::check_ins::{RecordCheckInBody, RemoveCheckInResponseBody};
use crate::inbound::http::habits::{CreateHabitBody, MessageResponse, UpdateHabitBody};
use crate::inbound::http::schemas::{
    CheckInPageSchema, CheckInSchema, ErrorCodeSchema, ErrorSchema, HabitDetailSchema,
    HabitPageSchema, HabitSchema, HabitSummarySchema, PageInfoSchema, RecordCheckInSchema,
};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by the account service at login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Habit streak API",
        description = "Habits, daily check-ins and streaks for session-authenticated users."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::habits::list_habits,
        crate::inbound::http::habits::create_habit,
        crate::inbound::http::habits::get_habit,
        crate::inbound::http::habits::update_habit,
        crate::inbound::http::habits::delete_habit,
        crate::inbound::http::check_ins::record_check_in,
        crate::inbound::http::check_ins::remove_check_in,
        crate::inbound::http::check_ins::list_check_ins,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        HabitSchema,
        CheckInSchema,
        HabitSummarySchema,
        HabitDetailSchema,
        PageInfoSchema,
        HabitPageSchema,
        CheckInPageSchema,
        RecordCheckInSchema,
        CreateHabitBody,
        UpdateHabitBody,
        MessageResponse,
        RecordCheckInBody,
        RemoveCheckInResponseBody,
    )),
    tags(
        (name = "habits", description = "Create, update, list and delete habits"),
        (name = "check-ins", description = "Record and undo daily check-ins"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
