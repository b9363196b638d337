//! PostgreSQL-backed `HabitRepository` implementation using Diesel ORM.
//!
//! Deleting a habit relies on the `ON DELETE CASCADE` foreign key from
//! `check_ins` to remove its check-ins in the same statement.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use pagination::PageRequest;
use uuid::Uuid;

use crate::domain::ports::{HabitRepository, HabitRepositoryError};
use crate::domain::{
    FrequencyGoal, Habit, HabitDescription, HabitDraft, HabitName, HabitValidationError,
    StreakSnapshot, UserId,
};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{HabitRow, HabitStreakUpdate, HabitUpdate, NewHabitRow};
use super::pool::{DbPool, PoolError};
use super::schema::habits;

/// Diesel-backed implementation of the habit repository port.
#[derive(Clone)]
pub struct DieselHabitRepository {
    pool: DbPool,
}

impl DieselHabitRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> HabitRepositoryError {
    map_basic_pool_error(error, HabitRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> HabitRepositoryError {
    map_basic_diesel_error(
        error,
        HabitRepositoryError::query,
        HabitRepositoryError::connection,
    )
}

fn to_column(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

fn from_column(value: i32) -> u32 {
    u32::try_from(value).unwrap_or(0)
}

fn row_to_habit(row: HabitRow) -> Result<Habit, HabitRepositoryError> {
    let habit_id = row.id;
    let invalid = |err: HabitValidationError| {
        HabitRepositoryError::query(format!("stored habit {habit_id} is invalid: {err}"))
    };

    Ok(Habit::new(HabitDraft {
        id: row.id,
        owner_id: UserId::from_uuid(row.user_id),
        name: HabitName::new(&row.name).map_err(invalid)?,
        description: row
            .description
            .map(HabitDescription::parse)
            .transpose()
            .map_err(invalid)?
            .flatten(),
        frequency_goal: FrequencyGoal::new(row.frequency_goal).map_err(invalid)?,
        streak: StreakSnapshot {
            current_streak: from_column(row.current_streak),
            longest_streak: from_column(row.longest_streak),
            last_check_in: row.last_check_in,
        },
        is_active: row.is_active,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }))
}

fn page_bounds(page: PageRequest) -> (i64, i64) {
    let offset = i64::try_from(page.offset()).unwrap_or(i64::MAX);
    (i64::from(page.limit()), offset)
}

#[async_trait]
impl HabitRepository for DieselHabitRepository {
    async fn find_owned(
        &self,
        habit_id: &Uuid,
        owner_id: &UserId,
    ) -> Result<Option<Habit>, HabitRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<HabitRow> = habits::table
            .filter(habits::id.eq(habit_id))
            .filter(habits::user_id.eq(owner_id.as_uuid()))
            .select(HabitRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_habit).transpose()
    }

    async fn insert(&self, habit: &Habit) -> Result<(), HabitRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let streak = habit.streak();

        let row = NewHabitRow {
            id: habit.id(),
            user_id: *habit.owner_id().as_uuid(),
            name: habit.name().as_ref(),
            description: habit.description().map(AsRef::as_ref),
            frequency_goal: i16::from(habit.frequency_goal().get()),
            current_streak: to_column(streak.current_streak),
            longest_streak: to_column(streak.longest_streak),
            last_check_in: streak.last_check_in,
            is_active: habit.is_active(),
            created_at: habit.created_at(),
            updated_at: habit.updated_at(),
        };

        diesel::insert_into(habits::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn update(&self, habit: &Habit) -> Result<(), HabitRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let changes = HabitUpdate {
            name: habit.name().as_ref(),
            description: habit.description().map(AsRef::as_ref),
            frequency_goal: i16::from(habit.frequency_goal().get()),
            is_active: habit.is_active(),
            updated_at: habit.updated_at(),
        };

        let updated = diesel::update(habits::table.find(habit.id()))
            .set(&changes)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        if updated == 0 {
            return Err(HabitRepositoryError::not_found(habit.id()));
        }
        Ok(())
    }

    async fn delete(&self, habit_id: &Uuid) -> Result<(), HabitRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let deleted = diesel::delete(habits::table.find(habit_id))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        if deleted == 0 {
            return Err(HabitRepositoryError::not_found(*habit_id));
        }
        Ok(())
    }

    async fn list_for_owner(
        &self,
        owner_id: &UserId,
        active_only: bool,
        page: PageRequest,
    ) -> Result<Vec<Habit>, HabitRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let (limit, offset) = page_bounds(page);

        let mut query = habits::table
            .filter(habits::user_id.eq(owner_id.as_uuid()))
            .select(HabitRow::as_select())
            .into_boxed();
        if active_only {
            query = query.filter(habits::is_active.eq(true));
        }

        let rows: Vec<HabitRow> = query
            .order((habits::created_at.desc(), habits::id.desc()))
            .limit(limit)
            .offset(offset)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_habit).collect()
    }

    async fn count_for_owner(
        &self,
        owner_id: &UserId,
        active_only: bool,
    ) -> Result<u64, HabitRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut query = habits::table
            .filter(habits::user_id.eq(owner_id.as_uuid()))
            .into_boxed();
        if active_only {
            query = query.filter(habits::is_active.eq(true));
        }

        let count: i64 = query
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(u64::try_from(count).unwrap_or(0))
    }

    async fn update_streak_fields(
        &self,
        habit_id: &Uuid,
        streak: StreakSnapshot,
    ) -> Result<(), HabitRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let changes = HabitStreakUpdate {
            current_streak: to_column(streak.current_streak),
            longest_streak: to_column(streak.longest_streak),
            last_check_in: streak.last_check_in,
        };

        let updated = diesel::update(habits::table.find(habit_id))
            .set(&changes)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        if updated == 0 {
            return Err(HabitRepositoryError::not_found(*habit_id));
        }
        Ok(())
    }
}
