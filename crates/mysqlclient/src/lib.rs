//! `mysqlclient` crate — named MySQL pools and map-driven CRUD helpers.
//!
//! A [`ClientRegistry`] maps config names to open [`MysqlClient`]s. The
//! [`facade`] functions look a client up by name, turn a column map into SQL
//! and run it.

pub mod builder;
pub mod client;
pub mod config;
pub mod error;
pub mod facade;
pub mod registry;
pub mod value;

pub use builder::{InsertMode, Page, Where};
pub use client::MysqlClient;
pub use config::{MysqlConfig, Settings};
pub use error::{MysqlError, Result};
pub use registry::ClientRegistry;
pub use value::{Record, Value, Values};
