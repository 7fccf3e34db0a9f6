//! One named MySQL handle: a lazily connected pool plus the CRUD calls.

use std::str::FromStr;

use sqlx::mysql::{MySqlConnectOptions, MySqlPoolOptions, MySqlRow};
use sqlx::{Connection, FromRow, MySql, MySqlPool, QueryBuilder};
use tracing::debug;

use crate::builder::{
    build_count, build_delete, build_insert, build_select, build_update, InsertMode, Page, Where,
};
use crate::config::MysqlConfig;
use crate::value::Values;
use crate::{MysqlError, Result};

/// An open connection pool for one configured database.
///
/// Safe to share between tasks; the pool hands each call its own connection.
#[derive(Debug)]
pub struct MysqlClient {
    pool: MySqlPool,
    config: MysqlConfig,
}

impl MysqlClient {
    /// Build the pool without dialing the server from this call.
    ///
    /// A malformed address fails here; an unreachable server only fails on
    /// first use. `max_idle_conns` becomes the pool's `min_connections`
    /// floor (clamped to `max_open_conns`): a non-zero value has the pool's
    /// maintenance task dial that many connections in the background and
    /// keep them open, rather than capping idle connections.
    pub fn open(config: MysqlConfig) -> Result<Self> {
        let options = MySqlConnectOptions::from_str(&config.url())?;

        let mut pool_options = MySqlPoolOptions::new();
        if config.max_open_conns > 0 {
            pool_options = pool_options.max_connections(config.max_open_conns);
        }
        if config.max_idle_conns > 0 {
            let ceiling = pool_options.get_max_connections();
            let floor = config.max_idle_conns.min(ceiling);
            debug!(
                "Keeping {} mysql connections warm (max_idle_conns={})",
                floor, config.max_idle_conns
            );
            pool_options = pool_options.min_connections(floor);
        }
        if let Some(timeout) = config.connect_timeout() {
            pool_options = pool_options.acquire_timeout(timeout);
        }
        if let Some(timeout) = config.idle_timeout() {
            pool_options = pool_options.idle_timeout(timeout);
        }
        if let Some(lifetime) = config.max_lifetime() {
            pool_options = pool_options.max_lifetime(lifetime);
        }

        debug!(
            "Opening mysql pool (max_connections={}, min_connections={})",
            pool_options.get_max_connections(),
            pool_options.get_min_connections()
        );
        let pool = pool_options.connect_lazy_with(options);

        Ok(Self { pool, config })
    }

    /// Close the pool. Idempotent; later calls fail with `PoolClosed`.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    pub fn is_closed(&self) -> bool {
        self.pool.is_closed()
    }

    /// Round trip to the server on a pooled connection.
    pub async fn ping(&self) -> Result<()> {
        let mut conn = self.pool.acquire().await?;
        conn.ping().await?;
        Ok(())
    }

    pub fn config(&self) -> &MysqlConfig {
        &self.config
    }

    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }

    /// Insert one row. `values` maps column name to value, e.g.
    /// `{"c_userid": "123456"}`. Returns the affected row count.
    pub async fn insert(&self, table: &str, values: &Values) -> Result<u64> {
        self.insert_many(table, std::slice::from_ref(values), InsertMode::Insert)
            .await
    }

    /// Insert several rows in one statement. All rows share the first row's
    /// columns.
    pub async fn insert_many(&self, table: &str, rows: &[Values], mode: InsertMode) -> Result<u64> {
        if rows.first().map_or(true, |row| row.is_empty()) {
            return Err(MysqlError::EmptyValues);
        }
        let mut qb = build_insert(table, rows, mode)?;
        self.execute(&mut qb).await
    }

    /// Select `fields` (empty for `*`) from `table`, decoding each row into
    /// `T`.
    ///
    /// A `limit` of zero fetches one row.
    pub async fn query<T>(
        &self,
        table: &str,
        filter: &Where,
        fields: &[&str],
        offset: u32,
        limit: u32,
    ) -> Result<Vec<T>>
    where
        T: for<'r> FromRow<'r, MySqlRow> + Send + Unpin,
    {
        let mut qb = build_select(table, filter, fields, Some(Page::new(offset, limit)))?;
        debug!(sql = qb.sql(), "mysql query");
        let rows = qb.build_query_as::<T>().fetch_all(&self.pool).await?;
        Ok(rows)
    }

    /// `count(*)` over `filter`. No matching row reads as zero.
    pub async fn query_count(&self, table: &str, filter: &Where) -> Result<u64> {
        let mut qb = build_count(table, filter)?;
        debug!(sql = qb.sql(), "mysql count");
        let count = qb
            .build_query_scalar::<i64>()
            .fetch_optional(&self.pool)
            .await?;
        Ok(count.map_or(0, |count| count.max(0) as u64))
    }

    /// Set `values` on the rows matching `filter`.
    pub async fn update(&self, table: &str, filter: &Where, values: &Values) -> Result<u64> {
        if filter.is_empty() {
            return Err(MysqlError::EmptyWhere);
        }
        if values.is_empty() {
            return Err(MysqlError::EmptyValues);
        }
        let mut qb = build_update(table, filter, values)?;
        self.execute(&mut qb).await
    }

    /// Delete the rows matching `filter`.
    pub async fn delete(&self, table: &str, filter: &Where) -> Result<u64> {
        if filter.is_empty() {
            return Err(MysqlError::EmptyWhere);
        }
        let mut qb = build_delete(table, filter)?;
        self.execute(&mut qb).await
    }

    async fn execute(&self, qb: &mut QueryBuilder<'static, MySql>) -> Result<u64> {
        debug!(sql = qb.sql(), "mysql exec");
        let result = qb.build().execute(&self.pool).await?;
        Ok(result.rows_affected())
    }
}
