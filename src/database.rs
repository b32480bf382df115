use std::fs;
use std::path::Path;
use std::time::Duration;
use actix_web::web;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use crate::error::AppError;

pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Applied to every connection the pool hands out.
#[derive(Debug, Clone, Copy)]
struct ConnectionOptions {
    busy_timeout: Duration,
}

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for ConnectionOptions {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        diesel::sql_query("PRAGMA foreign_keys = ON")
            .execute(conn)
            .and_then(|_| {
                diesel::sql_query(format!("PRAGMA busy_timeout = {}", self.busy_timeout.as_millis()))
                    .execute(conn)
            })
            .map(|_| ())
            .map_err(diesel::r2d2::Error::QueryError)
    }
}

fn build_pool(database_url: &str, max_size: u32) -> Result<DbPool, AppError> {
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    let pool = Pool::builder()
        .max_size(max_size)
        .connection_customizer(Box::new(ConnectionOptions { busy_timeout: Duration::from_secs(5) }))
        .build(manager)?;
    run_migrations(&pool)?;
    Ok(pool)
}

fn run_migrations(pool: &DbPool) -> Result<(), AppError> {
    let mut conn = pool.get()?;
    let applied = conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| AppError::Migration(e.to_string()))?;
    for m in applied {
        info!("Applied migration {}", m);
    }
    Ok(())
}

/// Opens (and creates if needed) the database file and brings the schema up to date.
pub fn setup(path: &Path) -> Result<DbPool, failure::Error> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    let url = path.to_str().ok_or_else(|| format_err!("Database path {:?} is not valid UTF-8", path))?;
    info!("Using database {}", url);
    Ok(build_pool(url, 8)?)
}

/// A private in-memory database. One connection, so every checkout sees the same data.
#[cfg(test)]
pub fn memory_pool() -> DbPool {
    build_pool(":memory:", 1).expect("in-memory database")
}

/// Runs `f` with a pooled connection on the blocking thread pool.
pub async fn with_conn<F, T>(pool: &DbPool, f: F) -> Result<T, AppError>
    where F: FnOnce(&mut SqliteConnection) -> Result<T, AppError> + Send + 'static,
          T: Send + 'static
{
    let pool = pool.clone();
    web::block(move || {
        let mut conn = pool.get()?;
        f(&mut conn)
    }).await?
}

#[cfg(test)]
mod tests {
    use super::*;
    use diesel::sql_types::Integer;

    #[derive(QueryableByName)]
    struct Pragma {
        #[diesel(sql_type = Integer)]
        foreign_keys: i32,
    }

    #[test]
    fn connections_enforce_foreign_keys() {
        let pool = memory_pool();
        let mut conn = pool.get().unwrap();
        let p: Pragma = diesel::sql_query("PRAGMA foreign_keys").get_result(&mut conn).unwrap();
        assert_eq!(p.foreign_keys, 1);
    }

    #[test]
    fn migrations_are_idempotent() {
        let pool = memory_pool();
        assert!(run_migrations(&pool).is_ok());
    }
}
