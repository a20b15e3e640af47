// API wire types
// JSON shapes for records and write acknowledgements

use serde::Serialize;

use crate::store::{Book, DeleteAck, InsertAck, UpdateAck};

/// A book as returned to clients; `_id` is the 24-char hex form
#[derive(Debug, Serialize)]
pub struct BookBody {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub author: String,
    pub publication_date: String,
}

impl From<Book> for BookBody {
    fn from(book: Book) -> Self {
        Self {
            id: book.id.to_hex(),
            name: book.name,
            author: book.author,
            publication_date: book.publication_date,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct InsertResult {
    #[serde(rename = "InsertedID")]
    pub inserted_id: String,
}

impl From<InsertAck> for InsertResult {
    fn from(ack: InsertAck) -> Self {
        Self {
            inserted_id: ack.inserted_id.to_hex(),
        }
    }
}

/// Update acknowledgement; updates never upsert, so the upsert fields are fixed
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateResult {
    pub matched_count: u64,
    pub modified_count: u64,
    pub upserted_count: u64,
    #[serde(rename = "UpsertedID")]
    pub upserted_id: Option<String>,
}

impl From<UpdateAck> for UpdateResult {
    fn from(ack: UpdateAck) -> Self {
        Self {
            matched_count: ack.matched_count,
            modified_count: ack.modified_count,
            upserted_count: 0,
            upserted_id: None,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeleteResult {
    pub deleted_count: u64,
}

impl From<DeleteAck> for DeleteResult {
    fn from(ack: DeleteAck) -> Self {
        Self {
            deleted_count: ack.deleted_count,
        }
    }
}
