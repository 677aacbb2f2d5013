//! `coderefs-cleanup` retires LaunchDarkly Code References branches when the
//! corresponding Git branch is deleted.
//!
//! The pieces, leaf first:
//! - [`retry::execute`]: sends a [`RequestDescriptor`] and retries 429/5xx
//!   responses and transport failures with header-directed or exponential
//!   backoff;
//! - [`CodeRefsClient::delete_branch`]: builds the branch-delete-tasks call
//!   and turns non-success responses into [`CodeRefsError::Service`];
//! - [`action::run`]: resolves inputs against the triggering GitHub event.

pub mod action;
pub mod classify;
mod client;
mod error;
mod logger;
mod options;
mod request;
pub mod retry;
mod transport;

pub use client::{branch_delete_url, delete_branch, CodeRefsClient, DEFAULT_BASE_URI};
pub use error::CodeRefsError;
pub use logger::Logger;
pub use options::{ClientOptions, RetryConfig};
pub use request::RequestDescriptor;
pub use retry::{execute, RetryError};
pub use transport::Transport;

pub type Result<T> = std::result::Result<T, CodeRefsError>;
