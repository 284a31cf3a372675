//! Lazily-opened connection to the blog store, shared by every request.
//!
//! The manager owns at most one [`BlogStore`] handle. The first caller that
//! needs it runs the [`Connector`]; later callers reuse the handle. Attempts
//! are serialized behind an async mutex, so concurrent first requests never
//! open more than one connection.

use std::sync::Arc;
use std::sync::atomic::{AtomicU8, AtomicU64, Ordering};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::config::DatabaseConfig;
use crate::error::ConnectionError;
use crate::store::BlogStore;

/// Observable state of the shared connection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
    Closed,
}

impl ConnectionState {
    fn from_u8(v: u8) -> Self {
        match v {
            1 => Self::Connecting,
            2 => Self::Connected,
            3 => Self::Closed,
            _ => Self::Disconnected,
        }
    }

    fn as_u8(self) -> u8 {
        match self {
            Self::Disconnected => 0,
            Self::Connecting => 1,
            Self::Connected => 2,
            Self::Closed => 3,
        }
    }
}

/// How `ensure_connected` treats a connection that is not yet established.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InFlightPolicy {
    /// Wait for the attempt and report its outcome.
    #[default]
    Await,
    /// Return immediately, starting an attempt in the background if none is
    /// running. The next `store()` call still waits for the attempt before
    /// handing out the connection.
    Proceed,
}

/// Opens a connection to a blog store.
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(
        &self,
        uri: &str,
        config: &DatabaseConfig,
    ) -> Result<Arc<dyn BlogStore>, ConnectionError>;
}

#[derive(Default)]
struct Slot {
    store: Option<Arc<dyn BlogStore>>,
    /// Number and error of the latest failed attempt, cleared on success.
    last_failure: Option<(u64, ConnectionError)>,
}

pub struct ConnectionManager {
    connector: Box<dyn Connector>,
    config: DatabaseConfig,
    slot: Mutex<Slot>,
    state: AtomicU8,
    attempts: AtomicU64,
}

impl ConnectionManager {
    pub fn new(connector: impl Connector + 'static, config: DatabaseConfig) -> Self {
        Self {
            connector: Box::new(connector),
            config,
            slot: Mutex::new(Slot::default()),
            state: AtomicU8::new(ConnectionState::Disconnected.as_u8()),
            attempts: AtomicU64::new(0),
        }
    }

    pub fn state(&self) -> ConnectionState {
        ConnectionState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// Number of connection attempts made so far, successful or not.
    pub fn attempts(&self) -> u64 {
        self.attempts.load(Ordering::SeqCst)
    }

    pub fn database_name(&self) -> &str {
        &self.config.name
    }

    fn set_state(&self, state: ConnectionState) {
        self.state.store(state.as_u8(), Ordering::Release);
    }

    /// The attempt whose outcome a caller arriving now accepts: the one in
    /// flight, otherwise the next one to start.
    fn joined_attempt(&self) -> u64 {
        // `attempts` is bumped before `Connecting` is published.
        let connecting = self.state() == ConnectionState::Connecting;
        let attempts = self.attempts();
        if connecting { attempts } else { attempts + 1 }
    }

    /// Make sure a connection exists or is being opened.
    ///
    /// Idempotent: once connected, repeated calls return immediately without
    /// touching the connector. Under [`InFlightPolicy::Proceed`] the call never
    /// waits for an attempt to finish.
    #[instrument(skip(self), fields(database = %self.config.name))]
    pub async fn ensure_connected(self: &Arc<Self>) -> Result<(), ConnectionError> {
        let proceed = self.config.in_flight == InFlightPolicy::Proceed;
        match self.state() {
            ConnectionState::Connected => {
                debug!("Already connected");
                return Ok(());
            }
            ConnectionState::Connecting if proceed => {
                debug!("Connection attempt in flight, proceeding without waiting");
                return Ok(());
            }
            ConnectionState::Closed => return Err(ConnectionError::Closed),
            _ => {}
        }

        if proceed {
            self.config.uri().ok_or(ConnectionError::MissingUri)?;
            let joined = self.joined_attempt();
            let manager = Arc::clone(self);
            tokio::spawn(async move {
                // Failures are logged and handed to the next `store` call.
                let _ = manager.connect_or_join(joined).await;
            });
            return Ok(());
        }

        self.store().await.map(|_| ())
    }

    /// The shared store handle, connecting first if necessary.
    ///
    /// Callers that queued up behind a failed attempt get that attempt's
    /// error instead of starting another one.
    pub async fn store(&self) -> Result<Arc<dyn BlogStore>, ConnectionError> {
        self.connect_or_join(self.joined_attempt()).await
    }

    async fn connect_or_join(&self, joined: u64) -> Result<Arc<dyn BlogStore>, ConnectionError> {
        let uri = self.config.uri().ok_or(ConnectionError::MissingUri)?;

        let mut slot = self.slot.lock().await;
        if let Some(store) = slot.store.as_ref() {
            return Ok(Arc::clone(store));
        }
        if self.state() == ConnectionState::Closed {
            return Err(ConnectionError::Closed);
        }
        if let Some((failed, err)) = &slot.last_failure {
            if *failed >= joined {
                debug!(attempt = *failed, "Reusing outcome of failed attempt");
                return Err(err.clone());
            }
        }

        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
        self.set_state(ConnectionState::Connecting);
        info!(attempt, database = %self.config.name, "Connecting to blog store");

        match self.connector.connect(uri, &self.config).await {
            Ok(store) => {
                slot.store = Some(Arc::clone(&store));
                slot.last_failure = None;
                self.set_state(ConnectionState::Connected);
                info!(attempt, "Connected to blog store");
                Ok(store)
            }
            Err(err) => {
                slot.last_failure = Some((attempt, err.clone()));
                self.set_state(ConnectionState::Disconnected);
                warn!(attempt, error = %err, "Connection attempt failed");
                Err(err)
            }
        }
    }

    /// Drop the shared handle and refuse further use.
    pub async fn close(&self) {
        let mut slot = self.slot.lock().await;
        self.set_state(ConnectionState::Closed);
        if let Some(store) = slot.store.take() {
            store.close().await;
            info!(database = %self.config.name, "Blog store connection closed");
        }
    }
}
