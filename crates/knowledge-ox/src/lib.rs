//! Vector store document and retrieval-chat client for Rust
//!
//! This crate talks to a hosted vector store and normalizes its responses
//! into a small, stable model:
//! - Listing, uploading, replacing and deleting documents in a vector store
//! - Creating vector stores
//! - Asking questions answered with file search over the store
//! - Settings persistence through a caller-owned key-value store
//!
//! The client is stateless. Every operation receives the caller's
//! [`Settings`] and returns an [`ApiResult`].
//!
//! # Example
//!
//! ```rust,no_run
//! use knowledge_ox::{KnowledgeClient, Settings};
//!
//! #[tokio::main]
//! async fn main() {
//!     let client = KnowledgeClient::new();
//!     let settings = Settings::new("your-api-key", "", "vs_123");
//!
//!     let answer = client.ask("What is our refund policy?", &[], &settings).await;
//!     match answer.into_result() {
//!         Ok(message) => println!("{}", message.content),
//!         Err(error) => eprintln!("{error}"),
//!     }
//! }
//! ```

pub mod chat;
pub mod client;
pub mod error;
pub mod extract;
pub mod files;
pub mod format;
pub mod model;
pub mod provider;
pub mod result;
pub mod settings;

pub use client::KnowledgeClient;
pub use error::ClientError;
pub use format::{format_bytes, format_date};
pub use model::{ChatMessage, CreatedVectorStore, FileUpload, KnowledgeFile, Role};
pub use provider::{Clock, IdGenerator, SystemClock, UuidGenerator};
pub use result::ApiResult;
pub use settings::{
    DEFAULT_MODEL, JsonFileStore, KeyValueStore, MemoryStore, SETTINGS_KEY, Settings,
    StorageError,
};

pub use knowledge_ox_common::CommonRequestError;
