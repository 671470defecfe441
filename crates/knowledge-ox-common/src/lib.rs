#![cfg_attr(not(test), deny(unsafe_code))]
#![warn(
    clippy::pedantic,
    clippy::unwrap_used,
    clippy::missing_docs_in_private_items
)]

//! Shared HTTP client abstractions for knowledge-ox
//!
//! This crate holds the request plumbing the vector store client is built on:
//! endpoint description, bearer authentication, JSON and multipart bodies,
//! and the translation of non-2xx responses into a typed error.

pub mod error;
pub mod request_builder;
pub mod timestamp;

pub use error::CommonRequestError;
pub use request_builder::{AuthMethod, Endpoint, HttpMethod, MultipartForm, RequestBuilder, RequestConfig};
pub use timestamp::Timestamp;

