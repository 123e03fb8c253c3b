//! # clockify-rs
//!
//! A Rust client library for the Clockify API, focused on the time entries
//! of a workspace.
//!
//! Every remote operation returns an [`ApiResponse`]: a failure reported by
//! the service (or a network fault) is an [`ApiResponse::Failure`], never an
//! `Err`. The `Err` side of an operation is reserved for local problems found
//! before anything is sent, such as a write request missing a required field.
//!
//! ```no_run
//! # async fn run() -> clockify_rs::error::Result<()> {
//! use clockify_rs::{Client, time_entry::TimeEntryRequest};
//!
//! let client = Client::from_env()?;
//! let request = TimeEntryRequest::starting_at(time::OffsetDateTime::now_utc());
//! let response = client.time_entries().create("workspace-id", &request).await?;
//! if let Some(entry) = response.data() {
//!     println!("created {}", entry.id);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Sentry Integration
//!
//! Errors carry a [`SpanTrace`] captured where they were created. Install
//! `tracing_error::ErrorLayer` in your subscriber to populate it, and enable
//! the `sentry` feature to turn errors into breadcrumbs:
//!
//! ```toml
//! [dependencies]
//! clockify-rs = { version = "0.1", features = ["sentry"] }
//! ```

#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

#[macro_use]
extern crate tracing;

pub mod client;
pub mod config;
pub mod endpoints;
pub mod entities;
pub mod error;
pub mod response;
pub mod utils;
pub mod validation;

#[cfg(feature = "sentry")]
pub mod sentry_integration;

pub use client::Client;
pub use config::{ApiKey, Config};
pub use endpoints::ClockifyEndpoint;
pub use entities::*;
pub use error::{ApiError, Error};
pub use response::ApiResponse;
pub use validation::Validate;

// Re-export SpanTrace for users who want to access it
pub use tracing_error::SpanTrace;

// Re-export the time entry types for convenience
pub use entities::time_entry::{
    TimeEntryDto, TimeEntryRequest, TimeInterval, UpdateTimeEntryRequest,
};
