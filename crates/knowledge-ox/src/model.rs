use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// One document attached to the configured vector store.
///
/// `id` is the vector-store-file association id, not the raw file id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeFile {
    pub id: String,
    pub filename: String,
    pub bytes: u64,
    /// "completed", "in_progress", or whatever the remote reports
    pub status: String,
    /// Unix timestamp in seconds
    pub created_at: i64,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl KnowledgeFile {
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.status == "completed"
    }
}

/// Author of a chat turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

/// A single entry of the caller-owned conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    pub role: Role,
    pub content: String,
    /// Milliseconds since the Unix epoch
    pub created_at: i64,
}

impl ChatMessage {
    pub fn new(
        id: impl Into<String>,
        role: Role,
        content: impl Into<String>,
        created_at: i64,
    ) -> Self {
        Self {
            id: id.into(),
            role,
            content: content.into(),
            created_at,
        }
    }
}

/// A local file about to be uploaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    pub name: String,
    pub data: Vec<u8>,
    pub size: u64,
}

impl FileUpload {
    pub fn new(name: impl Into<String>, data: Vec<u8>) -> Self {
        let size = data.len() as u64;
        Self {
            name: name.into(),
            data,
            size,
        }
    }

    /// Content type guessed from the file name
    #[must_use]
    pub fn mime_type(&self) -> String {
        mime_guess::from_path(&self.name)
            .first_or_octet_stream()
            .essence_str()
            .to_string()
    }
}

/// A freshly created vector store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedVectorStore {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}
