//! Typed error type for the mysqlclient crate.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MysqlError {
    /// Execution failure reported by the driver, passed through unchanged.
    #[error("sqlx error: {0}")]
    Database(#[from] sqlx::Error),

    /// The name was never initialized, or its initialization failed.
    #[error("mysql client not exist: '{0}'")]
    ClientNotFound(String),

    #[error("value is empty")]
    EmptyValues,

    #[error("where is empty")]
    EmptyWhere,

    #[error("invalid identifier: '{0}'")]
    InvalidIdentifier(String),

    /// An `_orderby` / `_groupby` directive or field expression with
    /// characters outside the allowed set.
    #[error("invalid clause: '{0}'")]
    InvalidClause(String),

    #[error("invalid condition on '{key}': {reason}")]
    InvalidCondition {
        key: String,
        reason: &'static str,
    },

    /// A batch-insert row whose columns differ from the first row's.
    #[error("row {row} does not have the same columns as the first row")]
    MismatchedColumns { row: usize },

    #[error("config error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("no mysql config named '{0}'")]
    ConfigMissing(String),
}

pub type Result<T, E = MysqlError> = std::result::Result<T, E>;
