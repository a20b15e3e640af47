// In-memory book store
// Mirrors the document store's point-operation semantics for tests and local runs

use async_trait::async_trait;
use bson::oid::ObjectId;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use super::{Book, BookFields, BookStore, DeleteAck, InsertAck, StoreError, StoreResult, UpdateAck};

#[derive(Debug, Default)]
pub struct MemoryStore {
    books: RwLock<BTreeMap<ObjectId, Book>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BookStore for MemoryStore {
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn insert(&self, book: &Book) -> StoreResult<InsertAck> {
        let mut books = self.books.write().await;
        if books.contains_key(&book.id) {
            return Err(StoreError::Query(format!(
                "duplicate key: _id {}",
                book.id.to_hex()
            )));
        }
        books.insert(book.id, book.clone());
        Ok(InsertAck {
            inserted_id: book.id,
        })
    }

    async fn find_all(&self) -> StoreResult<Vec<Book>> {
        Ok(self.books.read().await.values().cloned().collect())
    }

    async fn find_by_id(&self, id: ObjectId) -> StoreResult<Option<Book>> {
        Ok(self.books.read().await.get(&id).cloned())
    }

    async fn update_by_id(&self, id: ObjectId, fields: &BookFields) -> StoreResult<UpdateAck> {
        let mut books = self.books.write().await;
        let ack = match books.get_mut(&id) {
            Some(book) => UpdateAck {
                matched_count: 1,
                modified_count: u64::from(book.apply(fields)),
            },
            None => UpdateAck {
                matched_count: 0,
                modified_count: 0,
            },
        };
        Ok(ack)
    }

    async fn delete_by_id(&self, id: ObjectId) -> StoreResult<DeleteAck> {
        let removed = self.books.write().await.remove(&id);
        Ok(DeleteAck {
            deleted_count: u64::from(removed.is_some()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(name: &str) -> BookFields {
        BookFields {
            name: name.to_string(),
            author: "Herbert".to_string(),
            publication_date: "1965".to_string(),
        }
    }

    #[tokio::test]
    async fn test_insert_then_find() {
        let store = MemoryStore::new();
        let book = Book::new(fields("Dune"));
        let ack = store.insert(&book).await.unwrap();
        assert_eq!(ack.inserted_id, book.id);

        let found = store.find_by_id(book.id).await.unwrap();
        assert_eq!(found, Some(book));
        assert!(store.find_by_id(ObjectId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_insert_duplicate_id_fails() {
        let store = MemoryStore::new();
        let book = Book::new(fields("Dune"));
        store.insert(&book).await.unwrap();
        let err = store.insert(&book).await.unwrap_err();
        assert!(matches!(err, StoreError::Query(_)));
    }

    #[tokio::test]
    async fn test_update_counts() {
        let store = MemoryStore::new();
        let book = Book::new(fields("Dune"));
        store.insert(&book).await.unwrap();

        let ack = store.update_by_id(book.id, &fields("Dune Messiah")).await.unwrap();
        assert_eq!(ack, UpdateAck { matched_count: 1, modified_count: 1 });

        // Same values again: matched but not modified
        let ack = store.update_by_id(book.id, &fields("Dune Messiah")).await.unwrap();
        assert_eq!(ack, UpdateAck { matched_count: 1, modified_count: 0 });

        let ack = store.update_by_id(ObjectId::new(), &fields("x")).await.unwrap();
        assert_eq!(ack, UpdateAck { matched_count: 0, modified_count: 0 });
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let store = MemoryStore::new();
        let book = Book::new(fields("Dune"));
        store.insert(&book).await.unwrap();

        assert_eq!(store.delete_by_id(book.id).await.unwrap().deleted_count, 1);
        assert_eq!(store.delete_by_id(book.id).await.unwrap().deleted_count, 0);
        assert!(store.find_all().await.unwrap().is_empty());
    }
}
