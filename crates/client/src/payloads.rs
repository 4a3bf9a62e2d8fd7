use chrono::{DateTime, Utc};
use libris_core::session::Session;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub struct RegisterRequest<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BorrowRequest<'a> {
    pub book_id: &'a str,
    pub due_date: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ReturnRequest {
    pub returned: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetAdminRequest {
    pub is_admin: bool,
}

/// `POST /auth/login` and `POST /auth/register` both answer with the
/// profile-plus-token payload the session is built from.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub is_admin: bool,
    pub token: String,
}

impl AuthResponse {
    pub fn into_session(self) -> Session {
        Session {
            name: self.name,
            email: self.email,
            is_admin: self.is_admin,
            token: self.token.into(),
        }
    }
}

/// Error body shape the service uses for rejections.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}
