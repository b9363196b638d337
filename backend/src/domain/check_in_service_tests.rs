//! Tests for the check-in lifecycle service.

use std::sync::Arc;

use chrono::{Days, NaiveDate, Utc};
use mockable::Clock;
use pagination::PageRequest;
use rstest::{fixture, rstest};
use uuid::Uuid;

use super::*;
use crate::domain::ports::{HabitRepositoryError, MockCheckInRepository, MockHabitRepository};
use crate::domain::{ErrorCode, FrequencyGoal, HabitName};
use crate::test_support::MutableClock;

#[fixture]
fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 19).expect("valid date")
}

#[fixture]
fn habit() -> Habit {
    Habit::create(
        UserId::random(),
        HabitName::new("Stretch").expect("valid name"),
        None,
        FrequencyGoal::default(),
        Utc::now(),
    )
}

fn days_ago(today: NaiveDate, days: u64) -> NaiveDate {
    today.checked_sub_days(Days::new(days)).expect("in range")
}

fn check_in_on(habit: &Habit, date: NaiveDate) -> CheckIn {
    CheckIn::from(NewCheckIn {
        id: Uuid::new_v4(),
        habit_id: habit.id(),
        user_id: habit.owner_id().clone(),
        date,
        note: None,
        created_at: Utc::now(),
    })
}

fn service(
    habits: MockHabitRepository,
    check_ins: MockCheckInRepository,
    today: NaiveDate,
) -> CheckInService<MockHabitRepository, MockCheckInRepository> {
    let clock: Arc<dyn Clock> = Arc::new(MutableClock::at_noon(today));
    CheckInService::new(Arc::new(habits), Arc::new(check_ins), clock)
}

fn habits_returning(habit: &Habit) -> MockHabitRepository {
    let mut habits = MockHabitRepository::new();
    let found = habit.clone();
    habits
        .expect_find_owned()
        .times(1)
        .return_once(move |_, _| Ok(Some(found)));
    habits
}

fn record_request(habit: &Habit, date: Option<NaiveDate>) -> RecordCheckInRequest {
    RecordCheckInRequest {
        habit_id: habit.id(),
        user_id: habit.owner_id().clone(),
        date,
        note: None,
    }
}

#[rstest]
#[tokio::test]
async fn record_defaults_to_today_and_extends_streak(today: NaiveDate, habit: Habit) {
    let mut habits = habits_returning(&habit);
    habits
        .expect_update_streak_fields()
        .withf(move |_, snapshot| {
            snapshot.current_streak == 2
                && snapshot.longest_streak == 2
                && snapshot.last_check_in == Some(today)
        })
        .times(1)
        .return_once(|_, _| Ok(()));

    let history = vec![check_in_on(&habit, today), check_in_on(&habit, days_ago(today, 1))];
    let mut check_ins = MockCheckInRepository::new();
    check_ins
        .expect_find_by_date()
        .withf(move |_, date| *date == today)
        .times(1)
        .return_once(|_, _| Ok(None));
    check_ins
        .expect_insert_check_in()
        .times(1)
        .returning(|new| Ok(CheckIn::from(new.clone())));
    check_ins
        .expect_list_check_ins()
        .times(1)
        .return_once(move |_| Ok(history));

    let response = service(habits, check_ins, today)
        .record_check_in(record_request(&habit, None))
        .await
        .expect("check-in succeeds");

    assert_eq!(response.check_in.date, today);
    assert_eq!(response.current_streak, 2);
    assert_eq!(response.longest_streak, 2);
}

#[rstest]
#[tokio::test]
async fn record_keeps_higher_stored_longest(today: NaiveDate, habit: Habit) {
    let habit = habit.with_streak(StreakSnapshot {
        current_streak: 0,
        longest_streak: 9,
        last_check_in: Some(days_ago(today, 20)),
    });
    let mut habits = habits_returning(&habit);
    habits
        .expect_update_streak_fields()
        .times(1)
        .return_once(|_, _| Ok(()));

    let history = vec![check_in_on(&habit, today)];
    let mut check_ins = MockCheckInRepository::new();
    check_ins.expect_find_by_date().return_once(|_, _| Ok(None));
    check_ins
        .expect_insert_check_in()
        .returning(|new| Ok(CheckIn::from(new.clone())));
    check_ins
        .expect_list_check_ins()
        .return_once(move |_| Ok(history));

    let response = service(habits, check_ins, today)
        .record_check_in(record_request(&habit, Some(today)))
        .await
        .expect("check-in succeeds");

    assert_eq!(response.current_streak, 1);
    assert_eq!(response.longest_streak, 9);
}

#[rstest]
#[tokio::test]
async fn record_rejects_future_dates_without_writing(today: NaiveDate, habit: Habit) {
    let mut habits = habits_returning(&habit);
    habits.expect_update_streak_fields().times(0);
    let mut check_ins = MockCheckInRepository::new();
    check_ins.expect_insert_check_in().times(0);

    let tomorrow = today.succ_opt().expect("in range");
    let error = service(habits, check_ins, today)
        .record_check_in(record_request(&habit, Some(tomorrow)))
        .await
        .expect_err("future date rejected");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
    assert_eq!(error.message(), "Cannot check in for future dates");
}

#[rstest]
#[tokio::test]
async fn record_rejects_second_check_in_for_same_day(today: NaiveDate, habit: Habit) {
    let habits = habits_returning(&habit);
    let existing = check_in_on(&habit, today);
    let mut check_ins = MockCheckInRepository::new();
    check_ins
        .expect_find_by_date()
        .times(1)
        .return_once(move |_, _| Ok(Some(existing)));
    check_ins.expect_insert_check_in().times(0);

    let error = service(habits, check_ins, today)
        .record_check_in(record_request(&habit, None))
        .await
        .expect_err("duplicate rejected");

    assert_eq!(error.code(), ErrorCode::Conflict);
    assert_eq!(error.message(), "Already checked in for this date");
}

#[rstest]
#[tokio::test]
async fn record_maps_lost_insert_race_to_conflict(today: NaiveDate, habit: Habit) {
    let mut habits = habits_returning(&habit);
    habits.expect_update_streak_fields().times(0);
    let mut check_ins = MockCheckInRepository::new();
    check_ins.expect_find_by_date().return_once(|_, _| Ok(None));
    check_ins
        .expect_insert_check_in()
        .times(1)
        .returning(|new| Err(CheckInRepositoryError::conflict(new.habit_id, new.date)));

    let error = service(habits, check_ins, today)
        .record_check_in(record_request(&habit, None))
        .await
        .expect_err("conflict");

    assert_eq!(error.code(), ErrorCode::Conflict);
}

#[rstest]
#[tokio::test]
async fn record_for_unknown_habit_is_not_found(today: NaiveDate, habit: Habit) {
    let mut habits = MockHabitRepository::new();
    habits
        .expect_find_owned()
        .times(1)
        .return_once(|_, _| Ok(None));
    let mut check_ins = MockCheckInRepository::new();
    check_ins.expect_find_by_date().times(0);

    let error = service(habits, check_ins, today)
        .record_check_in(record_request(&habit, None))
        .await
        .expect_err("not found");

    assert_eq!(error.code(), ErrorCode::NotFound);
    assert_eq!(error.message(), "Habit not found");
}

#[rstest]
#[tokio::test]
async fn record_rejects_oversized_note(today: NaiveDate, habit: Habit) {
    let habits = habits_returning(&habit);
    let check_ins = MockCheckInRepository::new();

    let mut request = record_request(&habit, None);
    request.note = Some("n".repeat(501));
    let error = service(habits, check_ins, today)
        .record_check_in(request)
        .await
        .expect_err("note rejected");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[tokio::test]
async fn record_reports_unreachable_store(today: NaiveDate, habit: Habit) {
    let mut habits = MockHabitRepository::new();
    habits
        .expect_find_owned()
        .return_once(|_, _| Err(HabitRepositoryError::connection("refused")));

    let error = service(habits, MockCheckInRepository::new(), today)
        .record_check_in(record_request(&habit, None))
        .await
        .expect_err("unavailable");

    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
}

#[rstest]
#[tokio::test]
async fn remove_recomputes_current_and_keeps_longest(today: NaiveDate, habit: Habit) {
    let habit = habit.with_streak(StreakSnapshot {
        current_streak: 2,
        longest_streak: 5,
        last_check_in: Some(today),
    });
    let removed = check_in_on(&habit, today);
    let remaining = vec![check_in_on(&habit, days_ago(today, 1))];
    let yesterday = days_ago(today, 1);

    let mut habits = habits_returning(&habit);
    habits
        .expect_update_streak_fields()
        .withf(move |_, snapshot| {
            snapshot.current_streak == 1
                && snapshot.longest_streak == 5
                && snapshot.last_check_in == Some(yesterday)
        })
        .times(1)
        .return_once(|_, _| Ok(()));

    let removed_id = removed.id();
    let mut check_ins = MockCheckInRepository::new();
    check_ins
        .expect_find_check_in()
        .times(1)
        .return_once(move |_, _, _| Ok(Some(removed)));
    check_ins
        .expect_delete_check_in()
        .withf(move |id| *id == removed_id)
        .times(1)
        .return_once(|_| Ok(()));
    check_ins
        .expect_list_check_ins()
        .times(1)
        .return_once(move |_| Ok(remaining));

    let response = service(habits, check_ins, today)
        .remove_check_in(RemoveCheckInRequest {
            habit_id: habit.id(),
            check_in_id: removed_id,
            user_id: habit.owner_id().clone(),
        })
        .await
        .expect("undo succeeds");

    assert_eq!(response.current_streak, 1);
}

#[rstest]
#[tokio::test]
async fn remove_last_check_in_clears_last_date(today: NaiveDate, habit: Habit) {
    let removed = check_in_on(&habit, today);
    let mut habits = habits_returning(&habit);
    habits
        .expect_update_streak_fields()
        .withf(|_, snapshot| snapshot.current_streak == 0 && snapshot.last_check_in.is_none())
        .times(1)
        .return_once(|_, _| Ok(()));
    let mut check_ins = MockCheckInRepository::new();
    check_ins
        .expect_find_check_in()
        .return_once(move |_, _, _| Ok(Some(removed)));
    check_ins.expect_delete_check_in().return_once(|_| Ok(()));
    check_ins
        .expect_list_check_ins()
        .return_once(|_| Ok(Vec::new()));

    let response = service(habits, check_ins, today)
        .remove_check_in(RemoveCheckInRequest {
            habit_id: habit.id(),
            check_in_id: Uuid::new_v4(),
            user_id: habit.owner_id().clone(),
        })
        .await
        .expect("undo succeeds");

    assert_eq!(response.current_streak, 0);
}

#[rstest]
#[case::missing(Ok(None))]
#[case::store_reports_gone(Err(CheckInRepositoryError::not_found(Uuid::nil())))]
#[tokio::test]
async fn remove_unknown_check_in_is_not_found(
    today: NaiveDate,
    habit: Habit,
    #[case] lookup: Result<Option<CheckIn>, CheckInRepositoryError>,
) {
    let mut habits = MockHabitRepository::new();
    habits.expect_update_streak_fields().times(0);
    let mut check_ins = MockCheckInRepository::new();
    check_ins
        .expect_find_check_in()
        .times(1)
        .return_once(move |_, _, _| lookup);
    check_ins.expect_delete_check_in().times(0);

    let error = service(habits, check_ins, today)
        .remove_check_in(RemoveCheckInRequest {
            habit_id: habit.id(),
            check_in_id: Uuid::new_v4(),
            user_id: habit.owner_id().clone(),
        })
        .await
        .expect_err("not found");

    assert_eq!(error.code(), ErrorCode::NotFound);
    assert_eq!(error.message(), "Check-in not found");
}

#[rstest]
#[tokio::test]
async fn list_check_ins_returns_page_with_totals(today: NaiveDate, habit: Habit) {
    let habits = habits_returning(&habit);
    let page_items = vec![check_in_on(&habit, today), check_in_on(&habit, days_ago(today, 1))];
    let mut check_ins = MockCheckInRepository::new();
    check_ins
        .expect_page_check_ins()
        .withf(|_, page| page.page() == 2 && page.limit() == 2)
        .return_once(move |_, _| Ok(page_items));
    check_ins.expect_count_check_ins().return_once(|_| Ok(5));

    let page = PageRequest::new(2, 2).expect("valid page");
    let listed = service(habits, check_ins, today)
        .list_check_ins(ListCheckInsRequest {
            habit_id: habit.id(),
            user_id: habit.owner_id().clone(),
            page,
        })
        .await
        .expect("listing succeeds");

    assert_eq!(listed.items.len(), 2);
    assert_eq!(listed.pagination.total, 5);
    assert_eq!(listed.pagination.total_pages, 3);
}
