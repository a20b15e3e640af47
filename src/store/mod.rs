//! Document store module
//!
//! Persistence behind a single injected trait object:
//! - `MongoStore` talks to a MongoDB server through the official driver
//! - `MemoryStore` keeps records in process, for tests and local runs

mod memory;
mod model;
mod mongo;

use async_trait::async_trait;
use bson::oid::ObjectId;
use std::sync::Arc;
use thiserror::Error;

use crate::config::{StoreBackend, StoreConfig};
use crate::logger;

pub use memory::MemoryStore;
pub use model::{Book, BookFields, DeleteAck, InsertAck, UpdateAck};
pub use mongo::MongoStore;

#[derive(Error, Debug)]
pub enum StoreError {
    /// The store could not be reached (connection, server selection, I/O)
    #[error("store unavailable: {0}")]
    Unavailable(String),
    /// The store rejected or failed the operation
    #[error("query failed: {0}")]
    Query(String),
    /// A stored document did not match the book shape
    #[error("decode failed: {0}")]
    Decode(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Point operations over the books collection, keyed by `_id`
#[async_trait]
pub trait BookStore: Send + Sync {
    /// Round-trip to the store without touching data
    async fn ping(&self) -> StoreResult<()>;

    async fn insert(&self, book: &Book) -> StoreResult<InsertAck>;

    /// Every record, in no guaranteed order
    async fn find_all(&self) -> StoreResult<Vec<Book>>;

    async fn find_by_id(&self, id: ObjectId) -> StoreResult<Option<Book>>;

    /// Set the three mutable fields; zero matches is not an error
    async fn update_by_id(&self, id: ObjectId, fields: &BookFields) -> StoreResult<UpdateAck>;

    /// Remove at most one record; zero matches is not an error
    async fn delete_by_id(&self, id: ObjectId) -> StoreResult<DeleteAck>;
}

/// Build the backend selected by configuration.
///
/// The MongoDB backend is pinged once so an unreachable server fails startup.
pub async fn connect(config: &StoreConfig) -> StoreResult<Arc<dyn BookStore>> {
    match config.backend {
        StoreBackend::Memory => {
            logger::log_info("[STORE] Using in-memory book store");
            Ok(Arc::new(MemoryStore::new()))
        }
        StoreBackend::Mongodb => {
            let store = MongoStore::connect(config).await?;
            store.ping().await?;
            logger::log_info(&format!(
                "[STORE] Connected to mongodb://{}:{} ({}.{})",
                config.host, config.port, config.database, config.collection
            ));
            Ok(Arc::new(store))
        }
    }
}
