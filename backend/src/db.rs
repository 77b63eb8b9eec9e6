use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool, PoolError, PooledConnection};

pub type DbPool = Pool<ConnectionManager<PgConnection>>;
pub type DbConn = PooledConnection<ConnectionManager<PgConnection>>;

/// Builds the shared connection pool. Constructed once in `main` and handed
/// to every component through `AppState`; nothing else opens connections.
pub fn init_pool(database_url: &str) -> Result<DbPool, PoolError> {
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    let pool = Pool::builder().build(manager)?;
    log::info!("database connection pool established");
    Ok(pool)
}

/// Startup smoke query so a bad DATABASE_URL fails the process early
/// instead of the first request.
pub fn ping(pool: &DbPool) -> Result<(), Box<dyn std::error::Error>> {
    let mut conn = pool.get()?;
    let probe: i32 =
        diesel::select(diesel::dsl::sql::<diesel::sql_types::Integer>("1")).get_result(&mut conn)?;
    log::info!("database test query result: {}", probe);
    Ok(())
}
