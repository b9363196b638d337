//! Check-in lifecycle service.
//!
//! Every mutation reloads the habit's full check-in set and recomputes the
//! streak from scratch, so a streak left stale by an earlier failure is
//! repaired by the next successful check-in or undo.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use mockable::Clock;
use pagination::Paginated;
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::ports::{
    CheckInCommand, CheckInPayload, CheckInQuery, CheckInRepository, CheckInRepositoryError,
    HabitRepository, ListCheckInsRequest, RecordCheckInRequest, RecordCheckInResponse,
    RemoveCheckInRequest, RemoveCheckInResponse,
};
use crate::domain::{
    CheckIn, CheckInNote, Error, Habit, NewCheckIn, StreakSnapshot, UserId, calendar, streak,
};

use super::habit_service::map_habit_repository_error;

pub(crate) fn map_check_in_repository_error(error: CheckInRepositoryError) -> Error {
    match error {
        CheckInRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("check-in repository unavailable: {message}"))
        }
        CheckInRepositoryError::Query { message } => {
            Error::internal(format!("check-in repository error: {message}"))
        }
        CheckInRepositoryError::Conflict { habit_id, date } => {
            Error::conflict("Already checked in for this date").with_details(json!({
                "habitId": habit_id,
                "date": date,
                "code": "duplicate_check_in",
            }))
        }
        CheckInRepositoryError::NotFound { .. } => Error::not_found("Check-in not found"),
    }
}

fn habit_not_found() -> Error {
    Error::not_found("Habit not found")
}

/// Service implementing the check-in driving ports.
#[derive(Clone)]
pub struct CheckInService<H, C> {
    habits: Arc<H>,
    check_ins: Arc<C>,
    clock: Arc<dyn Clock>,
}

impl<H, C> CheckInService<H, C> {
    /// Create a service over the habit and check-in stores.
    pub fn new(habits: Arc<H>, check_ins: Arc<C>, clock: Arc<dyn Clock>) -> Self {
        Self {
            habits,
            check_ins,
            clock,
        }
    }
}

impl<H, C> CheckInService<H, C>
where
    H: HabitRepository,
    C: CheckInRepository,
{
    async fn owned_habit(&self, habit_id: &Uuid, owner_id: &UserId) -> Result<Habit, Error> {
        self.habits
            .find_owned(habit_id, owner_id)
            .await
            .map_err(map_habit_repository_error)?
            .ok_or_else(habit_not_found)
    }

    async fn remaining_dates(&self, habit_id: &Uuid) -> Result<Vec<NaiveDate>, Error> {
        let check_ins = self
            .check_ins
            .list_check_ins(habit_id)
            .await
            .map_err(map_check_in_repository_error)?;
        Ok(check_ins.iter().map(CheckIn::date).collect())
    }

    async fn store_streak(&self, habit_id: &Uuid, snapshot: StreakSnapshot) -> Result<(), Error> {
        self.habits
            .update_streak_fields(habit_id, snapshot)
            .await
            .map_err(|err| {
                warn!(%habit_id, error = %err, "failed to persist streak fields");
                map_habit_repository_error(err)
            })
    }

    fn validate_date(requested: Option<NaiveDate>, today: NaiveDate) -> Result<NaiveDate, Error> {
        let date = requested.unwrap_or(today);
        if date > today {
            return Err(
                Error::invalid_request("Cannot check in for future dates").with_details(json!({
                    "field": "date",
                    "value": date,
                    "code": "future_date",
                })),
            );
        }
        Ok(date)
    }
}

#[async_trait]
impl<H, C> CheckInCommand for CheckInService<H, C>
where
    H: HabitRepository,
    C: CheckInRepository,
{
    async fn record_check_in(
        &self,
        request: RecordCheckInRequest,
    ) -> Result<RecordCheckInResponse, Error> {
        let RecordCheckInRequest {
            habit_id,
            user_id,
            date,
            note,
        } = request;

        let habit = self.owned_habit(&habit_id, &user_id).await?;
        let today = calendar::today(self.clock.as_ref());
        let date = Self::validate_date(date, today)?;
        let note = note
            .map(CheckInNote::parse)
            .transpose()
            .map_err(|err| {
                Error::invalid_request(err.to_string()).with_details(json!({
                    "field": "note",
                    "code": "note_too_long",
                }))
            })?
            .flatten();

        let existing = self
            .check_ins
            .find_by_date(&habit_id, date)
            .await
            .map_err(map_check_in_repository_error)?;
        if existing.is_some() {
            return Err(map_check_in_repository_error(
                CheckInRepositoryError::conflict(habit_id, date),
            ));
        }

        let check_in = self
            .check_ins
            .insert_check_in(&NewCheckIn {
                id: Uuid::new_v4(),
                habit_id,
                user_id,
                date,
                note,
                created_at: self.clock.utc(),
            })
            .await
            .map_err(map_check_in_repository_error)?;

        let dates = self.remaining_dates(&habit_id).await?;
        let current = streak::current_streak(dates, today);
        let snapshot = habit.streak().after_check_in(current, date);
        self.store_streak(&habit_id, snapshot).await?;

        info!(
            %habit_id,
            check_in_id = %check_in.id(),
            current_streak = snapshot.current_streak,
            "check-in recorded"
        );
        Ok(RecordCheckInResponse {
            check_in: check_in.into(),
            current_streak: snapshot.current_streak,
            longest_streak: snapshot.longest_streak,
        })
    }

    async fn remove_check_in(
        &self,
        request: RemoveCheckInRequest,
    ) -> Result<RemoveCheckInResponse, Error> {
        let RemoveCheckInRequest {
            habit_id,
            check_in_id,
            user_id,
        } = request;

        let check_in = self
            .check_ins
            .find_check_in(&habit_id, &check_in_id, &user_id)
            .await
            .map_err(map_check_in_repository_error)?
            .ok_or_else(|| Error::not_found("Check-in not found"))?;
        let habit = self.owned_habit(&habit_id, &user_id).await?;

        self.check_ins
            .delete_check_in(&check_in.id())
            .await
            .map_err(map_check_in_repository_error)?;

        let dates = self.remaining_dates(&habit_id).await?;
        let newest = dates.iter().max().copied();
        let current = streak::current_streak(dates, calendar::today(self.clock.as_ref()));
        let snapshot = habit.streak().after_removal(current, newest);
        self.store_streak(&habit_id, snapshot).await?;

        info!(
            %habit_id,
            %check_in_id,
            current_streak = snapshot.current_streak,
            "check-in removed"
        );
        Ok(RemoveCheckInResponse {
            current_streak: snapshot.current_streak,
        })
    }
}

#[async_trait]
impl<H, C> CheckInQuery for CheckInService<H, C>
where
    H: HabitRepository,
    C: CheckInRepository,
{
    async fn list_check_ins(
        &self,
        request: ListCheckInsRequest,
    ) -> Result<Paginated<CheckInPayload>, Error> {
        let ListCheckInsRequest {
            habit_id,
            user_id,
            page,
        } = request;
        self.owned_habit(&habit_id, &user_id).await?;

        let items = self
            .check_ins
            .page_check_ins(&habit_id, page)
            .await
            .map_err(map_check_in_repository_error)?;
        let total = self
            .check_ins
            .count_check_ins(&habit_id)
            .await
            .map_err(map_check_in_repository_error)?;

        Ok(Paginated::new(items, page, total).map(CheckInPayload::from))
    }
}

#[cfg(test)]
#[path = "check_in_service_tests.rs"]
mod tests;
