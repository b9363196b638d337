//! Integration tests for the Diesel habit and check-in repositories.
//!
//! Each test runs against its own database cloned from a migrated template on
//! the shared embedded cluster. Set `SKIP_TEST_CLUSTER=1` to skip the suite
//! where the cluster cannot start.

use std::sync::Arc;

use backend::domain::ports::{
    CheckInCommand, CheckInRepository, CheckInRepositoryError, HabitRepository,
    RecordCheckInRequest,
};
use backend::domain::{
    CheckInNote, CheckInService, ErrorCode, FrequencyGoal, Habit, HabitDescription, HabitName,
    HabitPatch, NewCheckIn, StreakSnapshot, UserId,
};
use backend::outbound::persistence::{
    DbPool, DieselCheckInRepository, DieselHabitRepository, PoolConfig,
};
use backend::test_support::MutableClock;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use pagination::PageRequest;
use pg_embedded_setup_unpriv::TemporaryDatabase;
use rstest::{fixture, rstest};
use tokio::runtime::Runtime;
use uuid::Uuid;

#[path = "support/pg_embed.rs"]
mod pg_embed;

mod support;

use pg_embed::shared_cluster;
use support::embedded_postgres::{count_rows, drop_check_ins_table};
use support::{handle_cluster_setup_failure, provision_template_database};

struct TestContext {
    runtime: Runtime,
    habits: DieselHabitRepository,
    check_ins: DieselCheckInRepository,
    database_url: String,
    _database: TemporaryDatabase,
}

fn setup_test_context() -> Result<TestContext, String> {
    let runtime = Runtime::new().map_err(|err| err.to_string())?;
    let cluster = shared_cluster()?;
    let temp_db = provision_template_database(cluster).map_err(|err| err.to_string())?;
    let database_url = temp_db.url().to_string();

    let pool = runtime
        .block_on(DbPool::new(PoolConfig::new(&database_url).with_max_size(4)))
        .map_err(|err| err.to_string())?;

    Ok(TestContext {
        runtime,
        habits: DieselHabitRepository::new(pool.clone()),
        check_ins: DieselCheckInRepository::new(pool),
        database_url,
        _database: temp_db,
    })
}

#[fixture]
fn db() -> Option<TestContext> {
    match setup_test_context() {
        Ok(ctx) => Some(ctx),
        Err(reason) => handle_cluster_setup_failure(reason),
    }
}

#[fixture]
fn owner() -> UserId {
    UserId::new("11111111-1111-1111-1111-111111111111").expect("fixture user id is valid")
}

// Postgres keeps microseconds, so fixtures use whole seconds to compare
// round-tripped values exactly.
fn at(seconds: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_773_489_600 + seconds, 0)
        .single()
        .expect("valid timestamp")
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, d).expect("valid date")
}

fn habit(owner: &UserId, name: &str, created: i64) -> Habit {
    Habit::create(
        owner.clone(),
        HabitName::new(name).expect("valid name"),
        HabitDescription::parse("twenty minutes").expect("valid description"),
        FrequencyGoal::new(5).expect("valid goal"),
        at(created),
    )
}

fn check_in(habit: &Habit, date: NaiveDate, note: Option<&str>) -> NewCheckIn {
    NewCheckIn {
        id: Uuid::new_v4(),
        habit_id: habit.id(),
        user_id: habit.owner_id().clone(),
        date,
        note: note.and_then(|raw| CheckInNote::parse(raw).expect("valid note")),
        created_at: at(60),
    }
}

fn page(page: u32, limit: u32) -> PageRequest {
    PageRequest::new(page, limit).expect("valid page")
}

#[rstest]
fn habits_round_trip_and_stay_owner_scoped(db: Option<TestContext>, owner: UserId) {
    let Some(ctx) = db else { return };
    let stored = habit(&owner, "Read", 0);

    ctx.runtime.block_on(async {
        ctx.habits.insert(&stored).await.expect("insert habit");

        let found = ctx
            .habits
            .find_owned(&stored.id(), &owner)
            .await
            .expect("find habit");
        assert_eq!(found.as_ref(), Some(&stored));

        let stranger = ctx
            .habits
            .find_owned(&stored.id(), &UserId::random())
            .await
            .expect("find as stranger");
        assert!(stranger.is_none());
    });
}

#[rstest]
fn listing_is_newest_first_with_active_filter(db: Option<TestContext>, owner: UserId) {
    let Some(ctx) = db else { return };
    let oldest = habit(&owner, "Stretch", 0);
    let middle = habit(&owner, "Journal", 10).apply(
        HabitPatch {
            is_active: Some(false),
            ..HabitPatch::default()
        },
        at(10),
    );
    let newest = habit(&owner, "Run", 20);
    let foreign = habit(&UserId::random(), "Swim", 30);

    ctx.runtime.block_on(async {
        for h in [&oldest, &middle, &newest, &foreign] {
            ctx.habits.insert(h).await.expect("insert habit");
        }

        let all = ctx
            .habits
            .list_for_owner(&owner, false, page(1, 2))
            .await
            .expect("list habits");
        let ids: Vec<Uuid> = all.iter().map(Habit::id).collect();
        assert_eq!(ids, vec![newest.id(), middle.id()]);

        let active = ctx
            .habits
            .list_for_owner(&owner, true, page(1, 10))
            .await
            .expect("list active habits");
        let ids: Vec<Uuid> = active.iter().map(Habit::id).collect();
        assert_eq!(ids, vec![newest.id(), oldest.id()]);

        assert_eq!(ctx.habits.count_for_owner(&owner, false).await, Ok(3));
        assert_eq!(ctx.habits.count_for_owner(&owner, true).await, Ok(2));
    });
}

#[rstest]
fn edits_and_streak_updates_touch_separate_columns(db: Option<TestContext>, owner: UserId) {
    let Some(ctx) = db else { return };
    let stored = habit(&owner, "Meditate", 0);
    let streak = StreakSnapshot {
        current_streak: 3,
        longest_streak: 7,
        last_check_in: Some(day(14)),
    };

    ctx.runtime.block_on(async {
        ctx.habits.insert(&stored).await.expect("insert habit");
        ctx.habits
            .update_streak_fields(&stored.id(), streak)
            .await
            .expect("update streak");

        // The edited copy still carries the default streak; update must not
        // write it back.
        let edited = stored.clone().apply(
            HabitPatch {
                name: Some(HabitName::new("Meditate daily").expect("valid name")),
                description: Some(None),
                ..HabitPatch::default()
            },
            at(120),
        );
        ctx.habits.update(&edited).await.expect("update habit");

        let found = ctx
            .habits
            .find_owned(&stored.id(), &owner)
            .await
            .expect("find habit")
            .expect("habit exists");
        assert_eq!(found.name().as_ref(), "Meditate daily");
        assert!(found.description().is_none());
        assert_eq!(found.updated_at(), at(120));
        assert_eq!(found.streak(), streak);
    });
}

#[rstest]
fn missing_habits_report_not_found(db: Option<TestContext>, owner: UserId) {
    let Some(ctx) = db else { return };
    let ghost = habit(&owner, "Ghost", 0);

    ctx.runtime.block_on(async {
        assert!(ctx.habits.update(&ghost).await.is_err());
        assert!(ctx.habits.delete(&ghost.id()).await.is_err());
        assert!(
            ctx.habits
                .update_streak_fields(&ghost.id(), StreakSnapshot::default())
                .await
                .is_err()
        );
    });
}

#[rstest]
fn second_check_in_for_a_day_conflicts(db: Option<TestContext>, owner: UserId) {
    let Some(ctx) = db else { return };
    let stored = habit(&owner, "Read", 0);

    ctx.runtime.block_on(async {
        ctx.habits.insert(&stored).await.expect("insert habit");
        let first = ctx
            .check_ins
            .insert_check_in(&check_in(&stored, day(14), Some("chapter 3")))
            .await
            .expect("first check-in");
        assert_eq!(first.note().map(AsRef::as_ref), Some("chapter 3"));

        let second = ctx
            .check_ins
            .insert_check_in(&check_in(&stored, day(14), None))
            .await;
        assert_eq!(
            second,
            Err(CheckInRepositoryError::conflict(stored.id(), day(14)))
        );
        assert_eq!(ctx.check_ins.count_check_ins(&stored.id()).await, Ok(1));
    });
}

#[rstest]
fn check_in_reads_are_newest_first_and_owner_scoped(db: Option<TestContext>, owner: UserId) {
    let Some(ctx) = db else { return };
    let stored = habit(&owner, "Read", 0);

    ctx.runtime.block_on(async {
        ctx.habits.insert(&stored).await.expect("insert habit");
        let mut ids = Vec::new();
        for d in [12, 14, 13] {
            let inserted = ctx
                .check_ins
                .insert_check_in(&check_in(&stored, day(d), None))
                .await
                .expect("insert check-in");
            ids.push(inserted.id());
        }

        let all = ctx
            .check_ins
            .list_check_ins(&stored.id())
            .await
            .expect("list check-ins");
        let dates: Vec<NaiveDate> = all.iter().map(|c| c.date()).collect();
        assert_eq!(dates, vec![day(14), day(13), day(12)]);

        let second_page = ctx
            .check_ins
            .page_check_ins(&stored.id(), page(2, 2))
            .await
            .expect("page check-ins");
        let dates: Vec<NaiveDate> = second_page.iter().map(|c| c.date()).collect();
        assert_eq!(dates, vec![day(12)]);

        let by_date = ctx
            .check_ins
            .find_by_date(&stored.id(), day(13))
            .await
            .expect("find by date");
        assert_eq!(by_date.map(|c| c.id()), Some(ids[2]));

        let foreign = ctx
            .check_ins
            .find_check_in(&stored.id(), &ids[0], &UserId::random())
            .await
            .expect("find as stranger");
        assert!(foreign.is_none());

        ctx.check_ins
            .delete_check_in(&ids[0])
            .await
            .expect("delete check-in");
        assert_eq!(
            ctx.check_ins.delete_check_in(&ids[0]).await,
            Err(CheckInRepositoryError::not_found(ids[0]))
        );
    });
}

#[rstest]
fn deleting_a_habit_cascades_to_check_ins(db: Option<TestContext>, owner: UserId) {
    let Some(ctx) = db else { return };
    let stored = habit(&owner, "Read", 0);

    ctx.runtime.block_on(async {
        ctx.habits.insert(&stored).await.expect("insert habit");
        for d in [12, 13] {
            ctx.check_ins
                .insert_check_in(&check_in(&stored, day(d), None))
                .await
                .expect("insert check-in");
        }
        ctx.habits.delete(&stored.id()).await.expect("delete habit");
    });

    assert_eq!(
        count_rows(&ctx.database_url, "check_ins").expect("count check-ins"),
        0
    );
}

#[rstest]
fn concurrent_check_ins_for_one_day_record_once(db: Option<TestContext>, owner: UserId) {
    let Some(ctx) = db else { return };
    let stored = habit(&owner, "Read", 0);
    let service = Arc::new(CheckInService::new(
        Arc::new(ctx.habits.clone()),
        Arc::new(ctx.check_ins.clone()),
        Arc::new(MutableClock::at_noon(day(14))),
    ));

    let outcomes = ctx.runtime.block_on(async {
        ctx.habits.insert(&stored).await.expect("insert habit");
        let attempts = (0..4).map(|_| {
            let service = Arc::clone(&service);
            let request = RecordCheckInRequest {
                habit_id: stored.id(),
                user_id: owner.clone(),
                date: None,
                note: None,
            };
            tokio::spawn(async move { service.record_check_in(request).await })
        });
        futures_util::future::join_all(attempts).await
    });

    let mut successes = 0;
    for outcome in outcomes {
        match outcome.expect("task joined") {
            Ok(response) => {
                successes += 1;
                assert_eq!(response.current_streak, 1);
            }
            Err(err) => assert_eq!(err.code(), ErrorCode::Conflict),
        }
    }
    assert_eq!(successes, 1);
    assert_eq!(
        count_rows(&ctx.database_url, "check_ins").expect("count check-ins"),
        1
    );
}

#[rstest]
fn schema_loss_surfaces_as_query_errors(db: Option<TestContext>, owner: UserId) {
    let Some(ctx) = db else { return };
    let stored = habit(&owner, "Read", 0);
    ctx.runtime
        .block_on(ctx.habits.insert(&stored))
        .expect("insert habit");

    drop_check_ins_table(&ctx.database_url).expect("drop check_ins");

    let result = ctx
        .runtime
        .block_on(ctx.check_ins.list_check_ins(&stored.id()));
    assert!(matches!(result, Err(CheckInRepositoryError::Query { .. })));
}
