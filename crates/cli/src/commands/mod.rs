pub mod admin;
pub mod auth;
pub mod catalog;
pub mod checkout;

use std::future::Future;

use libris_client::{ApiError, LibraryApi};
use libris_core::config::{AppConfig, LoadOptions};
use libris_core::errors::{ApplicationError, InterfaceError};
use libris_core::session::{Session, SessionStore};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

impl CommandResult {
    pub fn success(output: impl Into<String>) -> Self {
        Self { exit_code: 0, output: output.into() }
    }

    pub fn failure(output: impl Into<String>, exit_code: u8) -> Self {
        Self { exit_code, output: output.into() }
    }
}

/// Everything a command needs, resolved once per invocation: the loaded
/// config, the session store, and the session it held at startup. Passed
/// explicitly; no command reads ambient state.
pub struct CommandContext {
    pub config: AppConfig,
    pub store: SessionStore,
    pub session: Option<Session>,
}

impl CommandContext {
    pub fn initialize(options: LoadOptions) -> Result<Self, CommandResult> {
        let config = AppConfig::load(options)
            .map_err(|error| CommandResult::failure(format!("configuration issue: {error}"), 2))?;

        let store = SessionStore::new(config.session.path.clone());
        let session = store
            .load()
            .map_err(|error| CommandResult::failure(format!("session issue: {error}"), 3))?;

        Ok(Self { config, store, session })
    }

    /// A client for the library API, with the bearer token attached when
    /// someone is signed in.
    pub fn api(&self) -> Result<LibraryApi, CommandResult> {
        let api = LibraryApi::new(&self.config.api)
            .map_err(|error| CommandResult::failure(format!("client setup failed: {error}"), 3))?;

        Ok(match &self.session {
            Some(session) => api.with_session(session),
            None => api,
        })
    }

    pub fn require_session(&self) -> Result<&Session, CommandResult> {
        self.session.as_ref().ok_or_else(|| {
            CommandResult::failure(
                "This action requires a signed-in session. Run `libris login --email <email>` first.",
                2,
            )
        })
    }
}

/// Commands are synchronous at the surface; each builds a small runtime
/// for its awaited API calls.
pub(crate) fn block_on<F: Future>(future: F) -> Result<F::Output, CommandResult> {
    let runtime =
        tokio::runtime::Builder::new_current_thread().enable_all().build().map_err(|error| {
            CommandResult::failure(format!("failed to initialize async runtime: {error}"), 3)
        })?;

    Ok(runtime.block_on(future))
}

/// Render an API failure the way the original views did: show the server's
/// message when it sent one, otherwise the view's own fallback line. The
/// structured error goes to the log with a correlation id; the exit code
/// follows the interface-error class.
pub(crate) fn api_failure(error: ApiError, fallback: &str) -> CommandResult {
    let shown = error.user_message(fallback).to_string();

    let correlation_id = Uuid::new_v4().simple().to_string();
    let interface = ApplicationError::from(error).into_interface(correlation_id.clone());
    tracing::error!(
        event_name = "command.api_failure",
        correlation_id = %correlation_id,
        error = %interface,
        "library api call failed"
    );

    CommandResult::failure(shown, exit_code_for(&interface))
}

fn exit_code_for(interface: &InterfaceError) -> u8 {
    match interface {
        InterfaceError::BadRequest { .. } => 2,
        InterfaceError::Internal { .. } => 3,
        InterfaceError::ServiceUnavailable { .. } => 4,
    }
}
