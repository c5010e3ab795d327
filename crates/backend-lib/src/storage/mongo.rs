//! MongoDB driver for the connection manager
use async_trait::async_trait;
use bson::{doc, Document};
use mongodb::{
    event::{sdam::SdamEvent, EventHandler},
    options::ClientOptions,
    Client, Collection, Database,
};
use std::collections::HashMap;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex, MutexGuard, PoisonError,
};
use std::time::Duration;
use tracing::{debug, warn};

use super::{Driver, StoreError};

/// Upper bound for server selection and socket connect, so an unreachable
/// store fails the call instead of hanging it.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(3);

/// Latest heartbeat outcome per server of one client's topology.
///
/// The client counts as alive while no server has reported yet (the
/// opening ping succeeded) or while at least one server's last heartbeat
/// succeeded. A single failing member of a replica set does not mark the
/// whole client dead.
#[derive(Debug, Default)]
struct ServerHealth {
    closed: AtomicBool,
    servers: Mutex<HashMap<String, bool>>,
}

impl ServerHealth {
    fn servers(&self) -> MutexGuard<'_, HashMap<String, bool>> {
        self.servers.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record(&self, server: String, healthy: bool) {
        self.servers().insert(server, healthy);
    }

    fn forget(&self, server: &str) {
        self.servers().remove(server);
    }

    fn close(&self) {
        self.closed.store(true, Ordering::Release);
    }

    fn is_alive(&self) -> bool {
        if self.closed.load(Ordering::Acquire) {
            return false;
        }
        let servers = self.servers();
        servers.is_empty() || servers.values().any(|healthy| *healthy)
    }

    fn observe(&self, event: SdamEvent) {
        match event {
            SdamEvent::ServerHeartbeatFailed(failed) => {
                warn!(server = %failed.server_address, "store heartbeat failed");
                self.record(failed.server_address.to_string(), false);
            },
            SdamEvent::ServerHeartbeatSucceeded(succeeded) => {
                self.record(succeeded.server_address.to_string(), true);
            },
            SdamEvent::ServerClosed(closed) => self.forget(&closed.address.to_string()),
            _ => {},
        }
    }
}

/// A MongoDB client plus its heartbeat-fed health
pub struct MongoConnection {
    client: Client,
    health: Arc<ServerHealth>,
}

/// [`Driver`] backed by the official MongoDB driver
#[derive(Debug, Clone, Copy, Default)]
pub struct MongoDriver;

#[async_trait]
impl Driver for MongoDriver {
    type Connection = MongoConnection;
    type Namespace = Database;
    type Collection = Collection<Document>;

    async fn open(&self, address: &str) -> Result<MongoConnection, StoreError> {
        let connect_error = |reason: String| StoreError::Connect {
            address: address.to_string(),
            reason,
        };

        let mut options = ClientOptions::parse(address)
            .await
            .map_err(|e| connect_error(e.to_string()))?;
        options.server_selection_timeout = Some(CONNECT_TIMEOUT);
        options.connect_timeout = Some(CONNECT_TIMEOUT);

        let health = Arc::new(ServerHealth::default());
        let observer = health.clone();
        options.sdam_event_handler = Some(EventHandler::callback(move |event: SdamEvent| {
            observer.observe(event)
        }));

        let client = Client::with_options(options).map_err(|e| connect_error(e.to_string()))?;

        // Fail fast on an unreachable server.
        client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| connect_error(e.to_string()))?;
        debug!("store ping succeeded");

        Ok(MongoConnection { client, health })
    }

    fn is_alive(&self, connection: &MongoConnection) -> bool {
        connection.health.is_alive()
    }

    fn namespace(&self, connection: &MongoConnection, name: &str) -> Database {
        connection.client.database(name)
    }

    fn collection(&self, namespace: &Database, name: &str) -> Collection<Document> {
        namespace.collection::<Document>(name)
    }

    async fn close(&self, connection: MongoConnection) -> Result<(), StoreError> {
        connection.health.close();
        connection.client.shutdown().await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alive_before_any_heartbeat() {
        let health = ServerHealth::default();
        assert!(health.is_alive());
    }

    #[test]
    fn test_one_failing_member_keeps_client_alive() {
        let health = ServerHealth::default();
        health.record("a:27017".to_string(), true);
        health.record("b:27017".to_string(), true);

        health.record("b:27017".to_string(), false);
        assert!(health.is_alive());

        health.record("a:27017".to_string(), true);
        assert!(health.is_alive());
    }

    #[test]
    fn test_dead_when_every_member_fails() {
        let health = ServerHealth::default();
        health.record("a:27017".to_string(), false);
        health.record("b:27017".to_string(), false);
        assert!(!health.is_alive());

        health.record("a:27017".to_string(), true);
        assert!(health.is_alive());
    }

    #[test]
    fn test_removed_member_is_forgotten() {
        let health = ServerHealth::default();
        health.record("a:27017".to_string(), true);
        health.record("b:27017".to_string(), false);

        health.forget("a:27017");
        assert!(!health.is_alive());

        health.forget("b:27017");
        assert!(health.is_alive());
    }

    #[test]
    fn test_closed_client_is_dead() {
        let health = ServerHealth::default();
        health.record("a:27017".to_string(), true);
        health.close();
        assert!(!health.is_alive());
    }
}
