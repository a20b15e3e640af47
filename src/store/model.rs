// Book record types
// The stored document shape and the acknowledgements returned by writes

use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// A stored book document.
///
/// `id` is minted by the server on creation and never changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    pub author: String,
    pub publication_date: String,
}

/// The mutable part of a book, as submitted by clients
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookFields {
    pub name: String,
    pub author: String,
    pub publication_date: String,
}

impl Book {
    /// Build a new record with a freshly minted id
    pub fn new(fields: BookFields) -> Self {
        Self {
            id: ObjectId::new(),
            name: fields.name,
            author: fields.author,
            publication_date: fields.publication_date,
        }
    }

    /// Overwrite the mutable fields, returning whether anything changed
    pub fn apply(&mut self, fields: &BookFields) -> bool {
        let changed = self.name != fields.name
            || self.author != fields.author
            || self.publication_date != fields.publication_date;
        if changed {
            self.name.clone_from(&fields.name);
            self.author.clone_from(&fields.author);
            self.publication_date.clone_from(&fields.publication_date);
        }
        changed
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsertAck {
    pub inserted_id: ObjectId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateAck {
    pub matched_count: u64,
    pub modified_count: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteAck {
    pub deleted_count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dune() -> BookFields {
        BookFields {
            name: "Dune".to_string(),
            author: "Herbert".to_string(),
            publication_date: "1965".to_string(),
        }
    }

    #[test]
    fn test_new_mints_distinct_ids() {
        let a = Book::new(dune());
        let b = Book::new(dune());
        assert_ne!(a.id, b.id);
        assert_eq!(a.name, "Dune");
        assert_eq!(a.publication_date, "1965");
    }

    #[test]
    fn test_apply_reports_changes() {
        let mut book = Book::new(dune());
        let id = book.id;
        assert!(!book.apply(&dune()));

        let mut fields = dune();
        fields.author = "Frank Herbert".to_string();
        assert!(book.apply(&fields));
        assert_eq!(book.author, "Frank Herbert");
        assert_eq!(book.id, id);
    }

    #[test]
    fn test_bson_uses_underscore_id() {
        let book = Book::new(dune());
        let doc = bson::to_document(&book).unwrap();
        assert_eq!(doc.get_object_id("_id").unwrap(), book.id);
        assert_eq!(doc.get_str("author").unwrap(), "Herbert");
    }
}
