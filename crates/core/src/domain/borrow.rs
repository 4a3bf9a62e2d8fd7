use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BorrowId(pub String);

impl std::fmt::Display for BorrowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Server-side populated reference to the borrowing user. The API may
/// return null here when the account was deleted after the record was
/// written.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BorrowerRef {
    pub name: String,
}

/// Server-side populated reference to the borrowed book; null when the
/// book was removed from the catalog.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BorrowedBookRef {
    pub title: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BorrowRecord {
    #[serde(rename = "_id")]
    pub id: BorrowId,
    #[serde(default)]
    pub user: Option<BorrowerRef>,
    #[serde(default)]
    pub book: Option<BorrowedBookRef>,
    pub borrowed_at: DateTime<Utc>,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub returned: bool,
}

impl BorrowRecord {
    pub fn borrower_name(&self) -> &str {
        self.user.as_ref().map(|user| user.name.as_str()).unwrap_or("N/A")
    }

    pub fn book_title(&self) -> &str {
        self.book.as_ref().map(|book| book.title.as_str()).unwrap_or("N/A")
    }
}
