//! Diesel row structs. Internal to the persistence adapter.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{check_ins, habits};

/// Row read from `habits`.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = habits)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct HabitRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub frequency_goal: i16,
    pub current_streak: i32,
    pub longest_streak: i32,
    pub last_check_in: Option<NaiveDate>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Row written to `habits` on creation.
#[derive(Debug, Insertable)]
#[diesel(table_name = habits)]
pub(crate) struct NewHabitRow<'a> {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub frequency_goal: i16,
    pub current_streak: i32,
    pub longest_streak: i32,
    pub last_check_in: Option<NaiveDate>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Owner-editable habit columns.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = habits)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct HabitUpdate<'a> {
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub frequency_goal: i16,
    pub is_active: bool,
    pub updated_at: DateTime<Utc>,
}

/// Derived streak columns.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = habits)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct HabitStreakUpdate {
    pub current_streak: i32,
    pub longest_streak: i32,
    pub last_check_in: Option<NaiveDate>,
}

/// Row read from `check_ins`.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = check_ins)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CheckInRow {
    pub id: Uuid,
    pub habit_id: Uuid,
    pub user_id: Uuid,
    pub check_in_date: NaiveDate,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Row written to `check_ins`.
#[derive(Debug, Insertable)]
#[diesel(table_name = check_ins)]
pub(crate) struct NewCheckInRow<'a> {
    pub id: Uuid,
    pub habit_id: Uuid,
    pub user_id: Uuid,
    pub check_in_date: NaiveDate,
    pub note: Option<&'a str>,
    pub created_at: DateTime<Utc>,
}
