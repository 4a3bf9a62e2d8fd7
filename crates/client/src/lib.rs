pub mod client;
pub mod error;
pub mod payloads;

pub use client::{CoverUpload, LibraryApi};
pub use error::ApiError;
