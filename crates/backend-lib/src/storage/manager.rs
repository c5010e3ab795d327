// ============================
// authgate-backend-lib/src/storage/manager.rs
// ============================
//! Shared connection with reconnect-on-demand.
use metrics::counter;
use tokio::sync::Mutex;
use tracing::{info, warn};

use super::{Driver, StoreError};
use crate::metrics::STORE_RECONNECT;

/// Remembered target plus the live handles, if any.
///
/// `namespace` is only ever `Some` while `connection` is `Some`.
struct ConnectionState<D: Driver> {
    address: Option<String>,
    namespace_name: Option<String>,
    connection: Option<D::Connection>,
    namespace: Option<D::Namespace>,
}

impl<D: Driver> ConnectionState<D> {
    fn empty() -> Self {
        Self {
            address: None,
            namespace_name: None,
            connection: None,
            namespace: None,
        }
    }
}

/// Owns the single shared connection to the document store.
///
/// Every accessor checks liveness and reconnects with the remembered
/// address and namespace when the connection is gone. The check and the
/// reconnect run under one lock, so concurrent callers that find the
/// connection dead wait for a single reconnect instead of each opening
/// their own.
pub struct ConnectionManager<D: Driver> {
    driver: D,
    state: Mutex<ConnectionState<D>>,
}

impl<D: Driver> ConnectionManager<D> {
    /// Create a disconnected manager
    pub fn new(driver: D) -> Self {
        Self {
            driver,
            state: Mutex::new(ConnectionState::empty()),
        }
    }

    /// Remember `address`/`namespace` and open a fresh connection,
    /// replacing any existing one.
    pub async fn connect(&self, address: &str, namespace: &str) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        self.establish(&mut state, address.to_string(), namespace.to_string())
            .await
    }

    /// Close the current connection. The remembered target is kept so the
    /// next accessor call can reconnect.
    pub async fn disconnect(&self) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        let connection = state.connection.take().ok_or(StoreError::NotConnected)?;
        state.namespace = None;

        self.driver.close(connection).await?;
        info!(address = ?state.address, "store disconnected");
        Ok(())
    }

    /// Live handle to the configured namespace
    pub async fn namespace(&self) -> Result<D::Namespace, StoreError> {
        let mut state = self.state.lock().await;

        let alive = state
            .connection
            .as_ref()
            .is_some_and(|connection| self.driver.is_alive(connection));

        if !alive {
            let (Some(address), Some(namespace)) =
                (state.address.clone(), state.namespace_name.clone())
            else {
                return Err(StoreError::NeverConnected);
            };

            warn!(%namespace, "store connection is down, reconnecting");
            counter!(STORE_RECONNECT).increment(1);
            self.establish(&mut state, address, namespace).await?;
        }

        state.namespace.clone().ok_or(StoreError::NotConnected)
    }

    /// Live handle to resource `name` inside the configured namespace
    pub async fn collection(&self, name: &str) -> Result<D::Collection, StoreError> {
        let namespace = self.namespace().await?;
        Ok(self.driver.collection(&namespace, name))
    }

    /// Whether a connection is held and the driver reports it alive
    pub async fn is_connected(&self) -> bool {
        let state = self.state.lock().await;
        state
            .connection
            .as_ref()
            .is_some_and(|connection| self.driver.is_alive(connection))
    }

    /// Address recorded by the last `connect`
    pub async fn address(&self) -> Option<String> {
        self.state.lock().await.address.clone()
    }

    async fn establish(
        &self,
        state: &mut ConnectionState<D>,
        address: String,
        namespace: String,
    ) -> Result<(), StoreError> {
        state.namespace = None;
        if let Some(stale) = state.connection.take() {
            if let Err(error) = self.driver.close(stale).await {
                warn!(%error, "failed to close replaced store connection");
            }
        }

        // Remembered even if opening fails, so a later accessor can retry.
        state.address = Some(address.clone());
        state.namespace_name = Some(namespace.clone());

        let connection = self.driver.open(&address).await?;
        state.namespace = Some(self.driver.namespace(&connection, &namespace));
        state.connection = Some(connection);

        info!(%namespace, "store connected");
        Ok(())
    }
}
