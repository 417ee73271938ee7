use sqlx::{
    migrate::MigrateError,
    postgres::{PgConnectOptions, PgPoolOptions},
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
    PgPool, SqlitePool,
};
use std::str::FromStr;
use tracing::{info, warn};

pub async fn create_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    let options = PgConnectOptions::from_str(database_url)?
        .application_name("cebu-rescue-backend")
        .statement_cache_capacity(100);

    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(1)
        .acquire_timeout(std::time::Duration::from_secs(5))
        .idle_timeout(std::time::Duration::from_secs(60))
        .connect_with(options)
        .await
}

/// Opens (and creates if missing) the SQLite file, including its directory
pub async fn create_sqlite_pool(options: SqliteConnectOptions) -> Result<SqlitePool, sqlx::Error> {
    if let Some(dir) = options.get_filename().parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)?;
    }

    SqlitePoolOptions::new()
        .max_connections(5)
        .acquire_timeout(std::time::Duration::from_secs(5))
        .connect_with(options.journal_mode(SqliteJournalMode::Wal))
        .await
}

/// Creates the five tables if they are missing. Every statement is idempotent,
/// so rerunning against an initialised database is a no-op.
pub async fn run_migrations(pool: &PgPool) {
    report_migrations(sqlx::migrate!("./migrations/postgres").run(pool).await);
}

pub async fn run_sqlite_migrations(pool: &SqlitePool) {
    report_migrations(sqlx::migrate!("./migrations/sqlite").run(pool).await);
}

fn report_migrations(result: Result<(), MigrateError>) {
    match result {
        Ok(_) => info!("✅ Migrations completed successfully"),
        Err(MigrateError::VersionMismatch(version)) => {
            warn!("⚠️  Migration version mismatch: {}", version);
            warn!("Database has different migration state than expected");
        }
        Err(e) => {
            warn!("❌ Failed to run migrations: {}", e);
            warn!("Continuing without migrations (set SKIP_MIGRATIONS=true to suppress this warning)");
        }
    }
}
