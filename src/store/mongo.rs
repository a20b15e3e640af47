// MongoDB book store
// One collection handle shared by all requests; the driver pools connections

use async_trait::async_trait;
use bson::oid::ObjectId;
use bson::{doc, Document};
use futures_util::TryStreamExt;
use mongodb::error::ErrorKind;
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection, Database};
use std::time::Duration;

use super::{Book, BookFields, BookStore, DeleteAck, InsertAck, StoreError, StoreResult, UpdateAck};
use crate::config::StoreConfig;

pub struct MongoStore {
    database: Database,
    books: Collection<Book>,
}

impl MongoStore {
    /// Create the client and collection handles.
    ///
    /// The driver connects lazily; call `ping` to verify the server is reachable.
    pub async fn connect(config: &StoreConfig) -> StoreResult<Self> {
        let mut options = ClientOptions::parse(config.connection_uri()).await?;
        let timeout = Duration::from_millis(config.connect_timeout_ms);
        options.app_name = Some(env!("CARGO_PKG_NAME").to_string());
        options.connect_timeout = Some(timeout);
        options.server_selection_timeout = Some(timeout);

        let client = Client::with_options(options)?;
        let database = client.database(&config.database);
        let books = database.collection::<Book>(&config.collection);
        Ok(Self { database, books })
    }
}

fn id_filter(id: ObjectId) -> Document {
    doc! { "_id": id }
}

/// `$set` of the mutable fields; `_id` is never part of the update
fn set_fields(fields: &BookFields) -> Document {
    doc! {
        "$set": {
            "name": fields.name.as_str(),
            "author": fields.author.as_str(),
            "publication_date": fields.publication_date.as_str(),
        }
    }
}

impl From<mongodb::error::Error> for StoreError {
    fn from(err: mongodb::error::Error) -> Self {
        match err.kind.as_ref() {
            ErrorKind::ServerSelection { .. }
            | ErrorKind::Io(_)
            | ErrorKind::ConnectionPoolCleared { .. }
            | ErrorKind::DnsResolve { .. } => Self::Unavailable(err.to_string()),
            ErrorKind::BsonDeserialization(_) => Self::Decode(err.to_string()),
            _ => Self::Query(err.to_string()),
        }
    }
}

#[async_trait]
impl BookStore for MongoStore {
    async fn ping(&self) -> StoreResult<()> {
        self.database.run_command(doc! { "ping": 1 }, None).await?;
        Ok(())
    }

    async fn insert(&self, book: &Book) -> StoreResult<InsertAck> {
        let result = self.books.insert_one(book, None).await?;
        let inserted_id = result.inserted_id.as_object_id().ok_or_else(|| {
            StoreError::Decode(format!("unexpected inserted id: {}", result.inserted_id))
        })?;
        Ok(InsertAck { inserted_id })
    }

    async fn find_all(&self) -> StoreResult<Vec<Book>> {
        let cursor = self.books.find(doc! {}, None).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn find_by_id(&self, id: ObjectId) -> StoreResult<Option<Book>> {
        Ok(self.books.find_one(id_filter(id), None).await?)
    }

    async fn update_by_id(&self, id: ObjectId, fields: &BookFields) -> StoreResult<UpdateAck> {
        let result = self
            .books
            .update_one(id_filter(id), set_fields(fields), None)
            .await?;
        Ok(UpdateAck {
            matched_count: result.matched_count,
            modified_count: result.modified_count,
        })
    }

    async fn delete_by_id(&self, id: ObjectId) -> StoreResult<DeleteAck> {
        let result = self.books.delete_one(id_filter(id), None).await?;
        Ok(DeleteAck {
            deleted_count: result.deleted_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_fields_leaves_id_alone() {
        let update = set_fields(&BookFields {
            name: "Dune".to_string(),
            author: "Herbert".to_string(),
            publication_date: "1965".to_string(),
        });
        let set = update.get_document("$set").unwrap();
        assert_eq!(set.len(), 3);
        assert_eq!(set.get_str("name").unwrap(), "Dune");
        assert_eq!(set.get_str("publication_date").unwrap(), "1965");
        assert!(!set.contains_key("_id"));
    }

    #[test]
    fn test_id_filter() {
        let id = ObjectId::new();
        assert_eq!(id_filter(id).get_object_id("_id").unwrap(), id);
    }

    #[test]
    fn test_io_error_is_unavailable() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = StoreError::from(mongodb::error::Error::from(io));
        assert!(matches!(err, StoreError::Unavailable(_)));
    }
}
