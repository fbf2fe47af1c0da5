use std::time::Duration;

use sqlx::Row;
use sqlx::mysql::{MySqlDatabaseError, MySqlPool, MySqlPoolOptions, MySqlRow};
use tracing::{debug, info, warn};

use crate::config::DatabaseConfig;
use crate::error::{Error, Result};
use crate::game::{Mods, RankedStatus, Ruleset};
use crate::score::{ScoreRecord, SelectionFilter, count_from_db};

use super::query::{select_query, update_query};
use super::{PpWrite, ScoreStore};

/// MySQL server error numbers that get a dedicated diagnostic
const ER_ACCESS_DENIED_ERROR: u16 = 1045;
const ER_BAD_DB_ERROR: u16 = 1049;

const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(10);

/// Classification of a failed startup connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectFailure {
    AccessDenied,
    MissingDatabase,
    Other,
}

/// Map a MySQL server error number to a startup failure class
pub fn classify_error_number(number: u16) -> ConnectFailure {
    match number {
        ER_ACCESS_DENIED_ERROR => ConnectFailure::AccessDenied,
        ER_BAD_DB_ERROR => ConnectFailure::MissingDatabase,
        _ => ConnectFailure::Other,
    }
}

fn classify_connect_error(err: sqlx::Error) -> Error {
    let number = err
        .as_database_error()
        .and_then(|db_err| db_err.try_downcast_ref::<MySqlDatabaseError>())
        .map(|mysql_err| mysql_err.number());

    match number.map(classify_error_number) {
        Some(ConnectFailure::AccessDenied) => Error::DatabaseAccessDenied,
        Some(ConnectFailure::MissingDatabase) => Error::DatabaseMissing,
        _ => Error::Database(err),
    }
}

#[derive(Clone)]
pub struct MySqlScoreStore {
    pool: MySqlPool,
}

impl MySqlScoreStore {
    /// Open a bounded pool. Credential and schema errors are reported with
    /// their own variants.
    pub async fn connect(config: &DatabaseConfig, max_connections: u32) -> Result<Self> {
        let pool = MySqlPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .connect(&config.url)
            .await
            .map_err(classify_connect_error)?;

        info!(
            "Successfully connected to SQL (pool size {})",
            max_connections
        );
        Ok(Self { pool })
    }

    pub fn from_pool(pool: MySqlPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

fn record_from_row(row: &MySqlRow) -> std::result::Result<ScoreRecord, sqlx::Error> {
    let map_id: Option<i64> = row.try_get("beatmap_id")?;
    let ranked: Option<i64> = row.try_get("ranked")?;

    Ok(ScoreRecord {
        id: row.try_get("id")?,
        mods: Mods::from_db(row.try_get("mods")?),
        max_combo: count_from_db(row.try_get("max_combo")?),
        count_100: count_from_db(row.try_get("count_100")?),
        count_50: count_from_db(row.try_get("count_50")?),
        misses: count_from_db(row.try_get("misses")?),
        map_id: map_id.and_then(|id| u32::try_from(id).ok()).filter(|&id| id != 0),
        ranked: ranked.and_then(RankedStatus::from_code),
    })
}

impl ScoreStore for MySqlScoreStore {
    async fn select(&self, filter: &SelectionFilter) -> Result<Vec<ScoreRecord>> {
        let mut qb = select_query(filter);
        debug!("Selecting scores: {}", qb.sql());

        let rows = qb.build().fetch_all(&self.pool).await?;
        let records = rows
            .iter()
            .map(record_from_row)
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(records)
    }

    async fn apply(&self, ruleset: Ruleset, write: PpWrite) -> Result<()> {
        let mut qb = update_query(ruleset, write);
        let result = qb.build().execute(&self.pool).await?;

        if result.rows_affected() > 1 {
            warn!(
                "Update for score {} affected {} rows",
                write.score_id(),
                result.rows_affected()
            );
        }
        Ok(())
    }
}
