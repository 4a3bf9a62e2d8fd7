use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BookId(pub String);

impl std::fmt::Display for BookId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A catalog entry as the library API serves it. The wire format is the
/// Mongo-style JSON of the backing service: `_id` plus camelCase fields.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    #[serde(rename = "_id")]
    pub id: BookId,
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub description: String,
    pub price: Decimal,
    #[serde(default)]
    pub cover_image: Option<String>,
}

/// Fields an administrator supplies when creating or editing a book.
/// The cover image is not part of the draft; it travels as a separate
/// multipart file part.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BookDraft {
    pub title: String,
    pub author: String,
    pub description: String,
    pub price: Decimal,
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::{Book, BookId};

    #[test]
    fn deserializes_the_api_wire_shape() {
        let raw = r#"{
            "_id": "64f0c2a9e13b7a0012ab34cd",
            "title": "Pilgrim's Progress",
            "author": "John Bunyan",
            "description": "An allegory.",
            "price": 99.0,
            "coverImage": "/uploads/pilgrim.jpg",
            "__v": 0
        }"#;

        let book: Book = serde_json::from_str(raw).expect("book should deserialize");
        assert_eq!(book.id, BookId("64f0c2a9e13b7a0012ab34cd".to_string()));
        assert_eq!(book.price, Decimal::new(990, 1));
        assert_eq!(book.cover_image.as_deref(), Some("/uploads/pilgrim.jpg"));
    }

    #[test]
    fn tolerates_missing_optional_fields() {
        let raw = r#"{"_id": "1", "title": "Hymns", "author": "Various", "price": 10}"#;

        let book: Book = serde_json::from_str(raw).expect("book should deserialize");
        assert_eq!(book.description, "");
        assert!(book.cover_image.is_none());
    }
}
