use std::time::Duration;

use chrono::{DateTime, Utc};
use libris_core::config::ApiConfig;
use libris_core::domain::book::{Book, BookDraft, BookId};
use libris_core::domain::borrow::{BorrowId, BorrowRecord};
use libris_core::domain::user::{User, UserId};
use libris_core::session::Session;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, RequestBuilder, Response};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::ApiError;
use crate::payloads::{
    AuthResponse, BorrowRequest, ErrorBody, LoginRequest, RegisterRequest, ReturnRequest,
    SetAdminRequest,
};

/// A cover image read from disk, sent as the `coverImage` multipart part.
#[derive(Clone, Debug)]
pub struct CoverUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Typed client for the Church Library REST API.
///
/// One instance per command invocation; requests are fire-and-await with
/// the configured timeout and no retry. When a session is attached every
/// request carries `Authorization: Bearer <token>`.
#[derive(Clone, Debug)]
pub struct LibraryApi {
    http: Client,
    base_url: String,
    token: Option<SecretString>,
}

impl LibraryApi {
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|source| ApiError::Transport { url: config.base_url.clone(), source })?;

        Ok(Self { http, base_url: config.base_url.trim_end_matches('/').to_string(), token: None })
    }

    pub fn with_session(mut self, session: &Session) -> Self {
        self.token = Some(session.token.clone());
        self
    }

    pub async fn list_books(&self) -> Result<Vec<Book>, ApiError> {
        self.get_json("/books").await
    }

    pub async fn get_book(&self, id: &BookId) -> Result<Book, ApiError> {
        self.get_json(&format!("/books/{id}")).await
    }

    pub async fn create_book(
        &self,
        draft: &BookDraft,
        cover: Option<CoverUpload>,
    ) -> Result<Book, ApiError> {
        let path = "/books".to_string();
        let builder = self.request(Method::POST, &path).multipart(book_form(draft, cover));
        let response = self.execute(builder, &path).await?;
        self.decode(response, &path).await
    }

    pub async fn update_book(
        &self,
        id: &BookId,
        draft: &BookDraft,
        cover: Option<CoverUpload>,
    ) -> Result<Book, ApiError> {
        let path = format!("/books/{id}");
        let builder = self.request(Method::PUT, &path).multipart(book_form(draft, cover));
        let response = self.execute(builder, &path).await?;
        self.decode(response, &path).await
    }

    pub async fn delete_book(&self, id: &BookId) -> Result<(), ApiError> {
        let path = format!("/books/{id}");
        self.execute(self.request(Method::DELETE, &path), &path).await?;
        Ok(())
    }

    pub async fn borrow_book(
        &self,
        book_id: &BookId,
        due_date: DateTime<Utc>,
    ) -> Result<(), ApiError> {
        let request = BorrowRequest { book_id: &book_id.0, due_date };
        self.post_json("/borrow", &request).await
    }

    pub async fn list_borrow_records(&self) -> Result<Vec<BorrowRecord>, ApiError> {
        self.get_json("/borrow").await
    }

    pub async fn mark_returned(&self, id: &BorrowId) -> Result<(), ApiError> {
        let path = format!("/borrow/{id}");
        let builder = self.request(Method::PUT, &path).json(&ReturnRequest { returned: true });
        self.execute(builder, &path).await?;
        Ok(())
    }

    pub async fn list_users(&self) -> Result<Vec<User>, ApiError> {
        self.get_json("/users").await
    }

    pub async fn set_admin(&self, id: &UserId, is_admin: bool) -> Result<(), ApiError> {
        let path = format!("/users/{id}");
        let builder = self.request(Method::PUT, &path).json(&SetAdminRequest { is_admin });
        self.execute(builder, &path).await?;
        Ok(())
    }

    pub async fn login(&self, email: &str, password: &SecretString) -> Result<Session, ApiError> {
        let path = "/auth/login";
        let request = LoginRequest { email, password: password.expose_secret() };
        let builder = self.request(Method::POST, path).json(&request);
        let response = self.execute(builder, path).await?;
        let auth: AuthResponse = self.decode(response, path).await?;
        Ok(auth.into_session())
    }

    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &SecretString,
    ) -> Result<Session, ApiError> {
        let path = "/auth/register";
        let request = RegisterRequest { name, email, password: password.expose_secret() };
        let builder = self.request(Method::POST, path).json(&request);
        let response = self.execute(builder, path).await?;
        let auth: AuthResponse = self.decode(response, path).await?;
        Ok(auth.into_session())
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let mut builder = self.http.request(method, self.endpoint(path));
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token.expose_secret());
        }
        builder
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.execute(self.request(Method::GET, path), path).await?;
        self.decode(response, path).await
    }

    async fn post_json<B: Serialize>(&self, path: &str, body: &B) -> Result<(), ApiError> {
        let builder = self.request(Method::POST, path).json(body);
        self.execute(builder, path).await?;
        Ok(())
    }

    async fn execute(&self, builder: RequestBuilder, path: &str) -> Result<Response, ApiError> {
        let url = self.endpoint(path);
        let correlation_id = Uuid::new_v4().simple().to_string();
        debug!(
            event_name = "api.request_started",
            correlation_id = %correlation_id,
            url = %url,
            "sending library api request"
        );

        let response = builder.send().await.map_err(|source| {
            warn!(
                event_name = "api.request_failed",
                correlation_id = %correlation_id,
                url = %url,
                error = %source,
                "library api request failed in transport"
            );
            ApiError::Transport { url: url.clone(), source }
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        // Rejections carry `{ "message": ... }` when the service has one.
        let message = response.json::<ErrorBody>().await.ok().and_then(|body| body.message);
        warn!(
            event_name = "api.request_rejected",
            correlation_id = %correlation_id,
            url = %url,
            status = status.as_u16(),
            "library api rejected the request"
        );
        Err(ApiError::Server { status: status.as_u16(), message })
    }

    async fn decode<T: DeserializeOwned>(
        &self,
        response: Response,
        path: &str,
    ) -> Result<T, ApiError> {
        let url = self.endpoint(path);
        response.json().await.map_err(|source| ApiError::Decode { url, source })
    }
}

fn book_form(draft: &BookDraft, cover: Option<CoverUpload>) -> Form {
    let mut form = Form::new()
        .text("title", draft.title.clone())
        .text("author", draft.author.clone())
        .text("description", draft.description.clone())
        .text("price", draft.price.to_string());

    if let Some(cover) = cover {
        form = form.part("coverImage", Part::bytes(cover.bytes).file_name(cover.file_name));
    }

    form
}
