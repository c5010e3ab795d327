// ============================
// authgate-backend-lib/src/storage/mod.rs
// ============================
//! Storage abstraction: a driver seam plus a shared, self-healing
//! connection manager on top of it.
use async_trait::async_trait;
use thiserror::Error;

mod manager;
pub mod mongo;

pub use manager::ConnectionManager;
pub use mongo::MongoDriver;

/// Failures raised by the connection manager and its drivers
#[derive(Error, Debug)]
pub enum StoreError {
    /// A handle was requested before `connect` ever recorded an address.
    #[error("store was never connected")]
    NeverConnected,

    #[error("store is not connected")]
    NotConnected,

    #[error("failed to connect to {address}: {reason}")]
    Connect { address: String, reason: String },
}

/// Trait for document-store drivers
///
/// A driver knows how to open and close one physical connection and how to
/// derive namespace and collection handles from it. Liveness checks must be
/// answered from local state only.
#[async_trait]
pub trait Driver: Send + Sync + 'static {
    /// One physical connection
    type Connection: Send + Sync + 'static;
    /// Handle to a named namespace (a database)
    type Namespace: Clone + Send + Sync + 'static;
    /// Handle to a named resource inside a namespace (a collection)
    type Collection: Send + 'static;

    /// Open a new connection to `address`
    async fn open(&self, address: &str) -> Result<Self::Connection, StoreError>;

    /// Whether `connection` is still usable, without doing I/O
    fn is_alive(&self, connection: &Self::Connection) -> bool;

    /// Derive the handle for namespace `name`
    fn namespace(&self, connection: &Self::Connection, name: &str) -> Self::Namespace;

    /// Derive the handle for resource `name` inside `namespace`
    fn collection(&self, namespace: &Self::Namespace, name: &str) -> Self::Collection;

    /// Close `connection`
    async fn close(&self, connection: Self::Connection) -> Result<(), StoreError>;
}
