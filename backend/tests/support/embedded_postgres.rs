//! Embedded PostgreSQL helpers for the Diesel adapter suites.
//!
//! - Each test gets a database cloned from a template that already has the
//!   habit schema applied, so migrations run once per migration set.
//! - Raw SQL helpers use `postgres` directly so tests can inspect or corrupt
//!   state without going through the adapters under test.

use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};
use std::time::Duration;

use backend::outbound::persistence::MIGRATIONS;
use diesel::Connection;
use diesel::pg::PgConnection;
use diesel_migrations::MigrationHarness;
use pg_embedded_setup_unpriv::test_support::hash_directory;
use pg_embedded_setup_unpriv::{ClusterHandle, TemporaryDatabase};
use postgres::{Client, NoTls};
use uuid::Uuid;

use super::format_postgres_error;

static TEMPLATE_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

const TEMPLATE_NAME_PREFIX: &str = "habits_template";
const TEMPLATE_PROVISION_RETRIES: usize = 5;
const TEMPLATE_PROVISION_RETRY_DELAY: Duration = Duration::from_millis(500);

/// Failures raised while preparing an embedded test database.
#[derive(Debug, thiserror::Error)]
pub enum EmbeddedDbError {
    /// A connection to the cluster could not be opened.
    #[error("embedded database connection failed: {0}")]
    Connection(String),
    /// Template provisioning, migration or raw SQL failed.
    #[error("embedded database setup failed: {0}")]
    Setup(String),
}

fn migrations_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("migrations")
}

fn template_database_name() -> Result<String, EmbeddedDbError> {
    let hash = hash_directory(migrations_dir())
        .map_err(|err| EmbeddedDbError::Setup(format!("hash migrations: {err}")))?;
    let short_hash = hash.get(..8).unwrap_or(&hash);
    Ok(format!("{TEMPLATE_NAME_PREFIX}_{short_hash}"))
}

fn provision_attempt(
    cluster: &ClusterHandle,
    attempt: usize,
) -> Result<TemporaryDatabase, EmbeddedDbError> {
    let template_name = ensure_template_database(cluster).map_err(|error| {
        EmbeddedDbError::Setup(format!(
            "template check: attempt {attempt}/{TEMPLATE_PROVISION_RETRIES}: {error}"
        ))
    })?;
    let db_name = format!("test_{}", Uuid::new_v4().simple());
    cluster
        .temporary_database_from_template(db_name.as_str(), template_name.as_str())
        .map_err(|error| {
            EmbeddedDbError::Setup(format!(
                "create database from template: attempt {attempt}/{TEMPLATE_PROVISION_RETRIES}: {error:?}"
            ))
        })
}

/// Creates or reuses a template database with the latest migrations applied.
fn ensure_template_database(cluster: &ClusterHandle) -> Result<String, EmbeddedDbError> {
    let template_name = template_database_name()?;
    let _lock = TEMPLATE_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|err| err.into_inner());

    let exists = cluster
        .database_exists(template_name.as_str())
        .map_err(|err| EmbeddedDbError::Setup(format!("template check: {err:?}")))?;

    if !exists {
        cluster
            .create_database(template_name.as_str())
            .map_err(|err| EmbeddedDbError::Setup(format!("create template: {err:?}")))?;

        let url = cluster.connection().database_url(&template_name);
        migrate_schema(&url)?;
    }

    Ok(template_name)
}

/// Provisions a temporary database cloned from the migration template.
pub fn provision_template_database(
    cluster: &ClusterHandle,
) -> Result<TemporaryDatabase, EmbeddedDbError> {
    let mut last_error = None;
    for attempt in 1..=TEMPLATE_PROVISION_RETRIES {
        match provision_attempt(cluster, attempt) {
            Ok(database) => return Ok(database),
            Err(error) => last_error = Some(error),
        };
        if attempt < TEMPLATE_PROVISION_RETRIES {
            std::thread::sleep(TEMPLATE_PROVISION_RETRY_DELAY);
        }
    }

    Err(last_error.unwrap_or_else(|| {
        EmbeddedDbError::Setup("create database from template: exhausted retries".to_owned())
    }))
}

/// Runs all pending Diesel migrations against the test database.
pub fn migrate_schema(url: &str) -> Result<(), EmbeddedDbError> {
    let mut conn = PgConnection::establish(url)
        .map_err(|err| EmbeddedDbError::Connection(format!("{err:?}")))?;
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|err| EmbeddedDbError::Setup(format!("migration: {err:?}")))?;
    Ok(())
}

/// Count the rows in `table` using a raw connection.
pub fn count_rows(url: &str, table: &str) -> Result<i64, EmbeddedDbError> {
    let mut client = Client::connect(url, NoTls)
        .map_err(|err| EmbeddedDbError::Connection(format_postgres_error(&err)))?;
    let row = client
        .query_one(format!("SELECT COUNT(*) FROM {table}").as_str(), &[])
        .map_err(|err| EmbeddedDbError::Setup(format_postgres_error(&err)))?;
    Ok(row.get(0))
}

/// Drops the `check_ins` table to simulate schema loss.
pub fn drop_check_ins_table(url: &str) -> Result<(), EmbeddedDbError> {
    let mut client = Client::connect(url, NoTls)
        .map_err(|err| EmbeddedDbError::Connection(format_postgres_error(&err)))?;
    client
        .batch_execute("DROP TABLE IF EXISTS check_ins;")
        .map_err(|err| EmbeddedDbError::Setup(format_postgres_error(&err)))?;
    Ok(())
}
