//! Name → client lookup table.
//!
//! The registry is an ordinary value: build one at startup, initialize the
//! names the process needs, and hand it (or an `Arc` of it) to callers.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{error, info, warn};

use crate::client::MysqlClient;
use crate::config::Settings;
use crate::{MysqlError, Result};

#[derive(Debug, Default)]
pub struct ClientRegistry {
    clients: RwLock<HashMap<String, Arc<MysqlClient>>>,
}

impl ClientRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a client for each name from `settings` and install it.
    ///
    /// A name that fails (no config, bad address) is logged and skipped; the
    /// rest of the batch still runs. Returns how many names were installed.
    pub async fn initialize<S: AsRef<str>>(&self, settings: &Settings, names: &[S]) -> usize {
        let mut installed = 0;
        for name in names {
            let name = name.as_ref();
            let opened = settings
                .mysql(name)
                .and_then(|config| MysqlClient::open(config.clone()));
            match opened {
                Ok(client) => {
                    self.install(name, client).await;
                    info!("mysql client initialized, config name: {name}");
                    installed += 1;
                }
                Err(e) => {
                    error!("mysql client init failed, config name: {name}, err: {e}");
                }
            }
        }
        installed
    }

    /// Put `client` under `name`. A client already registered under that
    /// name is closed once the new one is visible.
    pub async fn install(&self, name: impl Into<String>, client: MysqlClient) -> Arc<MysqlClient> {
        let name = name.into();
        let client = Arc::new(client);
        let previous = self
            .clients
            .write()
            .await
            .insert(name.clone(), Arc::clone(&client));

        if let Some(previous) = previous {
            warn!("closing replaced mysql client, config name: {name}");
            previous.close().await;
        }
        client
    }

    pub async fn lookup(&self, name: &str) -> Result<Arc<MysqlClient>> {
        self.clients
            .read()
            .await
            .get(name)
            .cloned()
            .ok_or_else(|| MysqlError::ClientNotFound(name.to_string()))
    }

    /// Close every registered pool. Names stay registered; calls through a
    /// closed client fail with `sqlx::Error::PoolClosed`.
    pub async fn close_all(&self) {
        let clients = self.clients.read().await;
        for client in clients.values() {
            client.close().await;
        }
    }

    /// Registered names, sorted.
    pub async fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.clients.read().await.keys().cloned().collect();
        names.sort();
        names
    }
}
