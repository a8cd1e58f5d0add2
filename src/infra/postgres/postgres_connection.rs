use anyhow::{Context, Result};
use diesel::{
    Connection, PgConnection,
    connection::CacheSize,
    r2d2::{ConnectionManager, CustomizeConnection, Error as R2d2Error, Pool},
};
use tracing::info;

use crate::config::config_model::Database;

// Transaction-mode poolers reject named prepared statements.
#[derive(Debug, Default)]
struct DisablePreparedStatements;

impl CustomizeConnection<PgConnection, R2d2Error> for DisablePreparedStatements {
    fn on_acquire(&self, conn: &mut PgConnection) -> std::result::Result<(), R2d2Error> {
        conn.set_prepared_statement_cache_size(CacheSize::Disabled);
        Ok(())
    }
}

pub type PgPoolSquad = Pool<ConnectionManager<PgConnection>>;

/// Builds the process-wide pool shared by every repository.
pub fn establish_connection(database: &Database) -> Result<PgPoolSquad> {
    let manager = ConnectionManager::<PgConnection>::new(&database.url);
    let pool = Pool::builder()
        .max_size(database.max_connections)
        .connection_customizer(Box::new(DisablePreparedStatements))
        .build(manager)
        .context("failed to build postgres pool")?;

    info!(
        max_connections = database.max_connections,
        "postgres: connection pool ready"
    );
    Ok(pool)
}
