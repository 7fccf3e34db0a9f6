//! CRUD calls addressed by config name.
//!
//! Each function resolves the client first; an unknown name fails with
//! [`MysqlError::ClientNotFound`](crate::MysqlError::ClientNotFound) before
//! anything else is attempted.

use sqlx::mysql::MySqlRow;
use sqlx::FromRow;

use crate::builder::Where;
use crate::registry::ClientRegistry;
use crate::value::Values;
use crate::Result;

pub async fn insert(
    registry: &ClientRegistry,
    config_name: &str,
    table_name: &str,
    values: &Values,
) -> Result<u64> {
    registry
        .lookup(config_name)
        .await?
        .insert(table_name, values)
        .await
}

/// See [`MysqlClient::query`](crate::MysqlClient::query).
pub async fn query<T>(
    registry: &ClientRegistry,
    config_name: &str,
    table_name: &str,
    filter: &Where,
    fields: &[&str],
    offset: u32,
    limit: u32,
) -> Result<Vec<T>>
where
    T: for<'r> FromRow<'r, MySqlRow> + Send + Unpin,
{
    registry
        .lookup(config_name)
        .await?
        .query(table_name, filter, fields, offset, limit)
        .await
}

pub async fn query_count(
    registry: &ClientRegistry,
    config_name: &str,
    table_name: &str,
    filter: &Where,
) -> Result<u64> {
    registry
        .lookup(config_name)
        .await?
        .query_count(table_name, filter)
        .await
}

pub async fn update(
    registry: &ClientRegistry,
    config_name: &str,
    table_name: &str,
    filter: &Where,
    values: &Values,
) -> Result<u64> {
    registry
        .lookup(config_name)
        .await?
        .update(table_name, filter, values)
        .await
}

pub async fn delete(
    registry: &ClientRegistry,
    config_name: &str,
    table_name: &str,
    filter: &Where,
) -> Result<u64> {
    registry
        .lookup(config_name)
        .await?
        .delete(table_name, filter)
        .await
}
