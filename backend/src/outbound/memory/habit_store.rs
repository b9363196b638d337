//! In-memory implementation of the habit and check-in repository ports.
//!
//! One mutex guards both collections so the per-day uniqueness check and the
//! insert happen atomically, and deleting a habit removes its check-ins in the
//! same critical section.

use std::cmp::Reverse;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::NaiveDate;
use pagination::PageRequest;
use uuid::Uuid;

use crate::domain::ports::{
    CheckInRepository, CheckInRepositoryError, HabitRepository, HabitRepositoryError,
};
use crate::domain::{CheckIn, Habit, NewCheckIn, StreakSnapshot, UserId};

#[derive(Default)]
struct State {
    habits: HashMap<Uuid, Habit>,
    check_ins: HashMap<Uuid, CheckIn>,
}

impl State {
    fn check_ins_for(&self, habit_id: &Uuid) -> Vec<CheckIn> {
        let mut found: Vec<CheckIn> = self
            .check_ins
            .values()
            .filter(|check_in| check_in.habit_id() == *habit_id)
            .cloned()
            .collect();
        found.sort_by_key(|check_in| Reverse(check_in.date()));
        found
    }

    fn owned_habits(&self, owner_id: &UserId, active_only: bool) -> Vec<&Habit> {
        let mut found: Vec<&Habit> = self
            .habits
            .values()
            .filter(|habit| habit.owner_id().as_uuid() == owner_id.as_uuid())
            .filter(|habit| !active_only || habit.is_active())
            .collect();
        found.sort_by_key(|habit| Reverse(habit.created_at()));
        found
    }
}

fn page_of<T>(items: Vec<T>, page: PageRequest) -> Vec<T> {
    let skip = usize::try_from(page.offset()).unwrap_or(usize::MAX);
    let take = usize::try_from(page.limit()).unwrap_or(usize::MAX);
    items.into_iter().skip(skip).take(take).collect()
}

/// Habit and check-in store kept in process memory.
#[derive(Default)]
pub struct InMemoryHabitStore {
    state: Mutex<State>,
}

impl InMemoryHabitStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock<E>(&self, poisoned: impl FnOnce(String) -> E) -> Result<MutexGuard<'_, State>, E> {
        self.state
            .lock()
            .map_err(|err| poisoned(format!("store lock poisoned: {err}")))
    }

    fn habits(&self) -> Result<MutexGuard<'_, State>, HabitRepositoryError> {
        self.lock(HabitRepositoryError::query)
    }

    fn check_ins(&self) -> Result<MutexGuard<'_, State>, CheckInRepositoryError> {
        self.lock(CheckInRepositoryError::query)
    }
}

#[async_trait]
impl HabitRepository for InMemoryHabitStore {
    async fn find_owned(
        &self,
        habit_id: &Uuid,
        owner_id: &UserId,
    ) -> Result<Option<Habit>, HabitRepositoryError> {
        let state = self.habits()?;
        Ok(state
            .habits
            .get(habit_id)
            .filter(|habit| habit.owner_id().as_uuid() == owner_id.as_uuid())
            .cloned())
    }

    async fn insert(&self, habit: &Habit) -> Result<(), HabitRepositoryError> {
        let mut state = self.habits()?;
        if state.habits.contains_key(&habit.id()) {
            return Err(HabitRepositoryError::query(format!(
                "habit {} already exists",
                habit.id()
            )));
        }
        state.habits.insert(habit.id(), habit.clone());
        Ok(())
    }

    async fn update(&self, habit: &Habit) -> Result<(), HabitRepositoryError> {
        let mut state = self.habits()?;
        let stored = state
            .habits
            .get_mut(&habit.id())
            .ok_or_else(|| HabitRepositoryError::not_found(habit.id()))?;
        let streak = stored.streak();
        *stored = habit.clone().with_streak(streak);
        Ok(())
    }

    async fn delete(&self, habit_id: &Uuid) -> Result<(), HabitRepositoryError> {
        let mut state = self.habits()?;
        state
            .habits
            .remove(habit_id)
            .ok_or_else(|| HabitRepositoryError::not_found(*habit_id))?;
        state
            .check_ins
            .retain(|_, check_in| check_in.habit_id() != *habit_id);
        Ok(())
    }

    async fn list_for_owner(
        &self,
        owner_id: &UserId,
        active_only: bool,
        page: PageRequest,
    ) -> Result<Vec<Habit>, HabitRepositoryError> {
        let state = self.habits()?;
        let owned = state
            .owned_habits(owner_id, active_only)
            .into_iter()
            .cloned()
            .collect();
        Ok(page_of(owned, page))
    }

    async fn count_for_owner(
        &self,
        owner_id: &UserId,
        active_only: bool,
    ) -> Result<u64, HabitRepositoryError> {
        let state = self.habits()?;
        let count = state.owned_habits(owner_id, active_only).len();
        Ok(u64::try_from(count).unwrap_or(u64::MAX))
    }

    async fn update_streak_fields(
        &self,
        habit_id: &Uuid,
        streak: StreakSnapshot,
    ) -> Result<(), HabitRepositoryError> {
        let mut state = self.habits()?;
        let stored = state
            .habits
            .get_mut(habit_id)
            .ok_or_else(|| HabitRepositoryError::not_found(*habit_id))?;
        *stored = stored.clone().with_streak(streak);
        Ok(())
    }
}

#[async_trait]
impl CheckInRepository for InMemoryHabitStore {
    async fn list_check_ins(
        &self,
        habit_id: &Uuid,
    ) -> Result<Vec<CheckIn>, CheckInRepositoryError> {
        Ok(self.check_ins()?.check_ins_for(habit_id))
    }

    async fn find_check_in(
        &self,
        habit_id: &Uuid,
        check_in_id: &Uuid,
        owner_id: &UserId,
    ) -> Result<Option<CheckIn>, CheckInRepositoryError> {
        let state = self.check_ins()?;
        Ok(state
            .check_ins
            .get(check_in_id)
            .filter(|check_in| {
                check_in.habit_id() == *habit_id
                    && check_in.user_id().as_uuid() == owner_id.as_uuid()
            })
            .cloned())
    }

    async fn find_by_date(
        &self,
        habit_id: &Uuid,
        date: NaiveDate,
    ) -> Result<Option<CheckIn>, CheckInRepositoryError> {
        let state = self.check_ins()?;
        Ok(state
            .check_ins
            .values()
            .find(|check_in| check_in.habit_id() == *habit_id && check_in.date() == date)
            .cloned())
    }

    async fn insert_check_in(
        &self,
        check_in: &NewCheckIn,
    ) -> Result<CheckIn, CheckInRepositoryError> {
        let mut state = self.check_ins()?;
        let duplicate = state
            .check_ins
            .values()
            .any(|stored| stored.habit_id() == check_in.habit_id && stored.date() == check_in.date);
        if duplicate {
            return Err(CheckInRepositoryError::conflict(
                check_in.habit_id,
                check_in.date,
            ));
        }
        if !state.habits.contains_key(&check_in.habit_id) {
            return Err(CheckInRepositoryError::query(format!(
                "habit {} does not exist",
                check_in.habit_id
            )));
        }
        let stored = CheckIn::from(check_in.clone());
        state.check_ins.insert(stored.id(), stored.clone());
        Ok(stored)
    }

    async fn delete_check_in(&self, check_in_id: &Uuid) -> Result<(), CheckInRepositoryError> {
        let mut state = self.check_ins()?;
        state
            .check_ins
            .remove(check_in_id)
            .map(|_| ())
            .ok_or_else(|| CheckInRepositoryError::not_found(*check_in_id))
    }

    async fn page_check_ins(
        &self,
        habit_id: &Uuid,
        page: PageRequest,
    ) -> Result<Vec<CheckIn>, CheckInRepositoryError> {
        let all = self.check_ins()?.check_ins_for(habit_id);
        Ok(page_of(all, page))
    }

    async fn count_check_ins(&self, habit_id: &Uuid) -> Result<u64, CheckInRepositoryError> {
        let state = self.check_ins()?;
        let count = state
            .check_ins
            .values()
            .filter(|check_in| check_in.habit_id() == *habit_id)
            .count();
        Ok(u64::try_from(count).unwrap_or(u64::MAX))
    }
}
