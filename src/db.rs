//! Database connection pool and migration management.

use sqlx::{Pool, Postgres};

/// Type alias for the PostgreSQL connection pool shared across handlers.
pub type DbPool = Pool<Postgres>;

/// Create a new PostgreSQL connection pool.
///
/// The pool keeps a small number of connections alive and hands them out per
/// request, which is far cheaper than opening one connection per request.
///
/// # Errors
///
/// Returns an error if the connection string is invalid, the server is
/// unreachable, or authentication fails.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    sqlx::postgres::PgPoolOptions::new()
        // Limit concurrent connections
        .max_connections(5)
        .connect(database_url)
        .await
}

/// Run database migrations from the `migrations/` directory.
///
/// Applied migrations are tracked in the `_sqlx_migrations` table, so each
/// file runs exactly once. The four application tables (users,
/// cycling_record, gps_data, key_to_record) are created here, including the
/// natural-key UNIQUE constraint and the ON DELETE CASCADE foreign key the
/// replace and delete flows rely on.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    // The macro embeds the migration files at compile time
    sqlx::migrate!("./migrations").run(pool).await
}
