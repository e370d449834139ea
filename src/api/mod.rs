//! Backend API
//!
//! Typed bindings to the REST backend, organized by domain. Each domain
//! module adds methods to [`ApiClient`].

pub mod client;
pub mod endpoints;
pub mod error;
pub mod retry;

mod admin;
mod analytics;
mod audit;
mod auth;
mod excel;
mod groups;
mod items;
mod logs;
mod procurement;

#[cfg(test)]
pub(crate) mod mock;

pub use client::{ApiClient, HttpTransport, QueryParams, Transport, UploadPart};
pub use error::{ApiError, ErrorKind};
pub use excel::{export_filename, ImportOutcome, XLSX_MIME};
pub use items::item_query_params;
pub use logs::{ActivityQuery, UndoRecord};

/// Client used by the running app
pub type Api = ApiClient<HttpTransport>;
