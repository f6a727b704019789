//! Database connection management using Diesel ORM.
//!
//! Provides connection pooling, migration support, and connection
//! configuration for SQLite databases.

use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool};
use diesel::SqliteConnection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use tracing::info;

use crate::error::{Error, Result};

/// Embedded database migrations compiled from the migrations/ directory.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Type alias for a SQLite connection pool.
pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;

const MEMORY_URL: &str = ":memory:";

#[derive(Debug, Clone, Copy)]
struct Pragmas;

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for Pragmas {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> std::result::Result<(), diesel::r2d2::Error> {
        diesel::sql_query("PRAGMA busy_timeout=5000")
            .execute(conn)
            .map(|_| ())
            .map_err(diesel::r2d2::Error::QueryError)
    }
}

/// Create a connection pool for the given database URL.
///
/// An in-memory database gets a single connection, since every SQLite
/// connection to `:memory:` opens a separate database.
///
/// # Errors
/// Returns an error if the pool cannot be created.
pub fn create_pool(database_url: &str) -> Result<DbPool> {
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    let max_size = if database_url == MEMORY_URL { 1 } else { 5 };
    Pool::builder()
        .max_size(max_size)
        .connection_customizer(Box::new(Pragmas))
        .build(manager)
        .map_err(|e| Error::Connection(e.to_string()))
}

/// Run all pending database migrations.
///
/// # Errors
/// Returns an error if migrations fail.
pub fn run_migrations(pool: &DbPool) -> Result<()> {
    let mut conn = pool.get().map_err(|e| Error::Connection(e.to_string()))?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| Error::Database(e.to_string()))?;
    if !applied.is_empty() {
        info!(count = applied.len(), "applied database migrations");
    }
    Ok(())
}

/// Open a pool and bring the schema up to date.
///
/// # Errors
/// Returns an error if the pool cannot be created or migrations fail.
pub fn open(database_url: &str) -> Result<DbPool> {
    let pool = create_pool(database_url)?;
    run_migrations(&pool)?;
    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(diesel::QueryableByName)]
    struct TableName {
        #[diesel(sql_type = diesel::sql_types::Text)]
        name: String,
    }

    #[derive(diesel::QueryableByName)]
    struct Timeout {
        #[diesel(sql_type = diesel::sql_types::BigInt)]
        timeout: i64,
    }

    #[test]
    fn memory_pool_has_one_connection() {
        let pool = create_pool(":memory:").unwrap();
        assert_eq!(pool.max_size(), 1);
    }

    #[test]
    fn run_migrations_creates_tables() {
        let pool = open(":memory:").unwrap();
        let mut conn = pool.get().unwrap();

        let tables: Vec<String> = diesel::sql_query(
            "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%' AND name != '__diesel_schema_migrations' ORDER BY name",
        )
        .load::<TableName>(&mut conn)
        .unwrap()
        .into_iter()
        .map(|t| t.name)
        .collect();

        assert_eq!(tables, vec!["payment_history".to_string(), "users".to_string()]);
    }

    #[test]
    fn run_migrations_is_idempotent() {
        let pool = create_pool(":memory:").unwrap();
        run_migrations(&pool).unwrap();
        run_migrations(&pool).unwrap();
    }

    #[test]
    fn connections_get_busy_timeout() {
        let pool = create_pool(":memory:").unwrap();
        let mut conn = pool.get().unwrap();

        let rows: Vec<Timeout> = diesel::sql_query("PRAGMA busy_timeout")
            .load(&mut conn)
            .unwrap();

        assert_eq!(rows[0].timeout, 5000);
    }
}
