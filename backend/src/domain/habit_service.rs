//! Habit management service.
//!
//! Implements the habit command and query driving ports. Listing pulls the
//! embedded check-in data per habit; pages are capped at a hundred habits so
//! the fan-out stays bounded.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use pagination::{PageRequest, Paginated};
use serde_json::json;
use tracing::info;

use crate::domain::ports::{
    CheckInPayload, CheckInRepository, CreateHabitRequest, DETAIL_RECENT_CHECK_INS,
    DeleteHabitRequest, GetHabitRequest, HabitCommand, HabitDetail, HabitPayload, HabitQuery,
    HabitRepository, HabitRepositoryError, HabitSummary, LIST_RECENT_CHECK_INS, ListHabitsRequest,
    UpdateHabitRequest,
};
use crate::domain::{
    Error, FrequencyGoal, Habit, HabitDescription, HabitName, HabitPatch, HabitValidationError,
    calendar,
};

use super::check_in_service::map_check_in_repository_error;

pub(crate) fn map_habit_repository_error(error: HabitRepositoryError) -> Error {
    match error {
        HabitRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("habit repository unavailable: {message}"))
        }
        HabitRepositoryError::Query { message } => {
            Error::internal(format!("habit repository error: {message}"))
        }
        HabitRepositoryError::NotFound { .. } => Error::not_found("Habit not found"),
    }
}

fn map_validation_error(error: HabitValidationError) -> Error {
    let (field, code) = match &error {
        HabitValidationError::EmptyName => ("name", "empty_name"),
        HabitValidationError::NameTooLong { .. } => ("name", "name_too_long"),
        HabitValidationError::DescriptionTooLong { .. } => ("description", "description_too_long"),
        HabitValidationError::FrequencyGoalOutOfRange { .. } => {
            ("frequencyGoal", "frequency_goal_out_of_range")
        }
    };
    Error::invalid_request(error.to_string()).with_details(json!({
        "field": field,
        "code": code,
    }))
}

fn recent_page(limit: u32) -> Result<PageRequest, Error> {
    PageRequest::new(1, limit).map_err(|err| Error::internal(err.to_string()))
}

/// Service implementing the habit driving ports.
#[derive(Clone)]
pub struct HabitService<H, C> {
    habits: Arc<H>,
    check_ins: Arc<C>,
    clock: Arc<dyn Clock>,
}

impl<H, C> HabitService<H, C> {
    /// Create a service over the habit and check-in stores.
    pub fn new(habits: Arc<H>, check_ins: Arc<C>, clock: Arc<dyn Clock>) -> Self {
        Self {
            habits,
            check_ins,
            clock,
        }
    }
}

impl<H, C> HabitService<H, C>
where
    H: HabitRepository,
    C: CheckInRepository,
{
    async fn owned_habit(&self, request: &GetHabitRequest) -> Result<Habit, Error> {
        self.habits
            .find_owned(&request.habit_id, &request.user_id)
            .await
            .map_err(map_habit_repository_error)?
            .ok_or_else(|| Error::not_found("Habit not found"))
    }

    async fn recent_check_ins(
        &self,
        habit: &Habit,
        limit: u32,
    ) -> Result<(Vec<CheckInPayload>, u64), Error> {
        let recent = self
            .check_ins
            .page_check_ins(&habit.id(), recent_page(limit)?)
            .await
            .map_err(map_check_in_repository_error)?;
        let total = self
            .check_ins
            .count_check_ins(&habit.id())
            .await
            .map_err(map_check_in_repository_error)?;
        Ok((recent.into_iter().map(CheckInPayload::from).collect(), total))
    }

    async fn summarise(&self, habit: Habit) -> Result<HabitSummary, Error> {
        let today = calendar::today(self.clock.as_ref());
        let today_check_in = self
            .check_ins
            .find_by_date(&habit.id(), today)
            .await
            .map_err(map_check_in_repository_error)?
            .map(CheckInPayload::from);
        let (recent_check_ins, total_check_ins) =
            self.recent_check_ins(&habit, LIST_RECENT_CHECK_INS).await?;
        Ok(HabitSummary {
            habit: habit.into(),
            completed_today: today_check_in.is_some(),
            today_check_in,
            recent_check_ins,
            total_check_ins,
        })
    }
}

#[async_trait]
impl<H, C> HabitCommand for HabitService<H, C>
where
    H: HabitRepository,
    C: CheckInRepository,
{
    async fn create_habit(&self, request: CreateHabitRequest) -> Result<HabitPayload, Error> {
        let name = HabitName::new(&request.name).map_err(map_validation_error)?;
        let description = request
            .description
            .map(HabitDescription::parse)
            .transpose()
            .map_err(map_validation_error)?
            .flatten();
        let frequency_goal = request
            .frequency_goal
            .map(FrequencyGoal::new)
            .transpose()
            .map_err(map_validation_error)?
            .unwrap_or_default();

        let habit = Habit::create(
            request.user_id,
            name,
            description,
            frequency_goal,
            self.clock.utc(),
        );
        self.habits
            .insert(&habit)
            .await
            .map_err(map_habit_repository_error)?;

        info!(habit_id = %habit.id(), "habit created");
        Ok(habit.into())
    }

    async fn update_habit(&self, request: UpdateHabitRequest) -> Result<HabitPayload, Error> {
        let patch = HabitPatch {
            name: request
                .name
                .map(HabitName::new)
                .transpose()
                .map_err(map_validation_error)?,
            description: request
                .description
                .map(HabitDescription::parse)
                .transpose()
                .map_err(map_validation_error)?,
            frequency_goal: request
                .frequency_goal
                .map(FrequencyGoal::new)
                .transpose()
                .map_err(map_validation_error)?,
            is_active: request.is_active,
        };

        let habit = self
            .owned_habit(&GetHabitRequest {
                habit_id: request.habit_id,
                user_id: request.user_id,
            })
            .await?
            .apply(patch, self.clock.utc());
        self.habits
            .update(&habit)
            .await
            .map_err(map_habit_repository_error)?;

        info!(habit_id = %habit.id(), "habit updated");
        Ok(habit.into())
    }

    async fn delete_habit(&self, request: DeleteHabitRequest) -> Result<(), Error> {
        let habit = self
            .owned_habit(&GetHabitRequest {
                habit_id: request.habit_id,
                user_id: request.user_id,
            })
            .await?;
        self.habits
            .delete(&habit.id())
            .await
            .map_err(map_habit_repository_error)?;

        info!(habit_id = %habit.id(), "habit deleted");
        Ok(())
    }
}

#[async_trait]
impl<H, C> HabitQuery for HabitService<H, C>
where
    H: HabitRepository,
    C: CheckInRepository,
{
    async fn get_habit(&self, request: GetHabitRequest) -> Result<HabitDetail, Error> {
        let habit = self.owned_habit(&request).await?;
        let (recent_check_ins, total_check_ins) =
            self.recent_check_ins(&habit, DETAIL_RECENT_CHECK_INS).await?;
        Ok(HabitDetail {
            habit: habit.into(),
            recent_check_ins,
            total_check_ins,
        })
    }

    async fn list_habits(
        &self,
        request: ListHabitsRequest,
    ) -> Result<Paginated<HabitSummary>, Error> {
        let ListHabitsRequest {
            user_id,
            active_only,
            page,
        } = request;
        let habits = self
            .habits
            .list_for_owner(&user_id, active_only, page)
            .await
            .map_err(map_habit_repository_error)?;
        let total = self
            .habits
            .count_for_owner(&user_id, active_only)
            .await
            .map_err(map_habit_repository_error)?;

        let mut items = Vec::with_capacity(habits.len());
        for habit in habits {
            items.push(self.summarise(habit).await?);
        }
        Ok(Paginated::new(items, page, total))
    }
}

#[cfg(test)]
#[path = "habit_service_tests.rs"]
mod tests;
