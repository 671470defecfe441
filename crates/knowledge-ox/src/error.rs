use knowledge_ox_common::CommonRequestError;
use thiserror::Error;

/// Errors that can occur inside the vector store client
///
/// The display string of each variant is what callers see as the failure
/// message of an [`ApiResult`](crate::ApiResult).
#[derive(Debug, Error)]
pub enum ClientError {
    /// No API key in the supplied settings
    #[error("Missing API key. Add your API key in Settings.")]
    MissingApiKey,

    /// No vector store id in the supplied settings
    #[error("Missing vector store ID. Add or create a vector store in Settings.")]
    MissingVectorStoreId,

    /// Question was empty after trimming
    #[error("Question cannot be empty.")]
    EmptyQuestion,

    /// Store name was empty after trimming
    #[error("Vector store name cannot be empty.")]
    EmptyStoreName,

    /// File id was empty after trimming
    #[error("File ID cannot be empty.")]
    EmptyFileId,

    /// Transport, remote or decoding failure
    #[error(transparent)]
    Request(#[from] CommonRequestError),
}

impl ClientError {
    /// Whether the error was detected locally before any request was made
    #[must_use]
    pub fn is_precondition(&self) -> bool {
        !matches!(self, Self::Request(_))
    }
}
