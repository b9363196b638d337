//! PostgreSQL-backed `CheckInRepository` implementation using Diesel ORM.
//!
//! The `check_ins_habit_id_date_key` unique index enforces one check-in per
//! habit per day; a violation is reported as a conflict so concurrent
//! duplicate submissions resolve to exactly one winner.

use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use pagination::PageRequest;
use uuid::Uuid;

use crate::domain::ports::{CheckInRepository, CheckInRepositoryError};
use crate::domain::{CheckIn, CheckInNote, NewCheckIn, UserId};

use super::diesel_basic_error_mapping::{
    is_unique_violation, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::{CheckInRow, NewCheckInRow};
use super::pool::{DbPool, PoolError};
use super::schema::check_ins;

/// Diesel-backed implementation of the check-in repository port.
#[derive(Clone)]
pub struct DieselCheckInRepository {
    pool: DbPool,
}

impl DieselCheckInRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> CheckInRepositoryError {
    map_basic_pool_error(error, CheckInRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> CheckInRepositoryError {
    map_basic_diesel_error(
        error,
        CheckInRepositoryError::query,
        CheckInRepositoryError::connection,
    )
}

fn map_insert_error(error: diesel::result::Error, check_in: &NewCheckIn) -> CheckInRepositoryError {
    if is_unique_violation(&error) {
        return CheckInRepositoryError::conflict(check_in.habit_id, check_in.date);
    }
    map_diesel_error(error)
}

fn row_to_check_in(row: CheckInRow) -> Result<CheckIn, CheckInRepositoryError> {
    let check_in_id = row.id;
    let note = row
        .note
        .map(CheckInNote::parse)
        .transpose()
        .map_err(|err| {
            CheckInRepositoryError::query(format!("stored check-in {check_in_id} is invalid: {err}"))
        })?
        .flatten();

    Ok(CheckIn::from(NewCheckIn {
        id: row.id,
        habit_id: row.habit_id,
        user_id: UserId::from_uuid(row.user_id),
        date: row.check_in_date,
        note,
        created_at: row.created_at,
    }))
}

fn rows_to_check_ins(rows: Vec<CheckInRow>) -> Result<Vec<CheckIn>, CheckInRepositoryError> {
    rows.into_iter().map(row_to_check_in).collect()
}

#[async_trait]
impl CheckInRepository for DieselCheckInRepository {
    async fn list_check_ins(
        &self,
        habit_id: &Uuid,
    ) -> Result<Vec<CheckIn>, CheckInRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<CheckInRow> = check_ins::table
            .filter(check_ins::habit_id.eq(habit_id))
            .order(check_ins::check_in_date.desc())
            .select(CheckInRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows_to_check_ins(rows)
    }

    async fn find_check_in(
        &self,
        habit_id: &Uuid,
        check_in_id: &Uuid,
        owner_id: &UserId,
    ) -> Result<Option<CheckIn>, CheckInRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<CheckInRow> = check_ins::table
            .filter(check_ins::id.eq(check_in_id))
            .filter(check_ins::habit_id.eq(habit_id))
            .filter(check_ins::user_id.eq(owner_id.as_uuid()))
            .select(CheckInRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_check_in).transpose()
    }

    async fn find_by_date(
        &self,
        habit_id: &Uuid,
        date: NaiveDate,
    ) -> Result<Option<CheckIn>, CheckInRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<CheckInRow> = check_ins::table
            .filter(check_ins::habit_id.eq(habit_id))
            .filter(check_ins::check_in_date.eq(date))
            .select(CheckInRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_check_in).transpose()
    }

    async fn insert_check_in(
        &self,
        check_in: &NewCheckIn,
    ) -> Result<CheckIn, CheckInRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = NewCheckInRow {
            id: check_in.id,
            habit_id: check_in.habit_id,
            user_id: *check_in.user_id.as_uuid(),
            check_in_date: check_in.date,
            note: check_in.note.as_ref().map(AsRef::as_ref),
            created_at: check_in.created_at,
        };

        let stored: CheckInRow = diesel::insert_into(check_ins::table)
            .values(&row)
            .returning(CheckInRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| map_insert_error(err, check_in))?;

        row_to_check_in(stored)
    }

    async fn delete_check_in(&self, check_in_id: &Uuid) -> Result<(), CheckInRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let deleted = diesel::delete(check_ins::table.find(check_in_id))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        if deleted == 0 {
            return Err(CheckInRepositoryError::not_found(*check_in_id));
        }
        Ok(())
    }

    async fn page_check_ins(
        &self,
        habit_id: &Uuid,
        page: PageRequest,
    ) -> Result<Vec<CheckIn>, CheckInRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let offset = i64::try_from(page.offset()).unwrap_or(i64::MAX);

        let rows: Vec<CheckInRow> = check_ins::table
            .filter(check_ins::habit_id.eq(habit_id))
            .order((check_ins::check_in_date.desc(), check_ins::id.desc()))
            .limit(i64::from(page.limit()))
            .offset(offset)
            .select(CheckInRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows_to_check_ins(rows)
    }

    async fn count_check_ins(&self, habit_id: &Uuid) -> Result<u64, CheckInRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let count: i64 = check_ins::table
            .filter(check_ins::habit_id.eq(habit_id))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(u64::try_from(count).unwrap_or(0))
    }
}
