use std::sync::Arc;

use bon::Builder;
use knowledge_ox_common::{AuthMethod, RequestBuilder, RequestConfig};

use crate::provider::{Clock, IdGenerator, SystemClock, UuidGenerator};
use crate::{ClientError, Settings};

/// Default API root
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Vector store client
///
/// Holds no credentials of its own: every operation takes the caller's
/// [`Settings`] and builds its authenticated requests from them.
#[derive(Debug, Clone, Builder)]
pub struct KnowledgeClient {
    /// Base URL for the API (allows for custom endpoints)
    #[builder(default = DEFAULT_BASE_URL.to_string(), into)]
    pub base_url: String,

    /// Time source for timestamps the remote leaves out
    #[builder(default = Arc::new(SystemClock) as Arc<dyn Clock>)]
    clock: Arc<dyn Clock>,

    /// Id source for chat messages the remote leaves unnamed
    #[builder(default = Arc::new(UuidGenerator) as Arc<dyn IdGenerator>)]
    ids: Arc<dyn IdGenerator>,

    /// HTTP client for making requests
    #[builder(default)]
    http: reqwest::Client,
}

impl Default for KnowledgeClient {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl KnowledgeClient {
    /// Create a client against the default API root
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    pub(crate) fn ids(&self) -> &dyn IdGenerator {
        self.ids.as_ref()
    }

    /// Request builder authenticated with the settings' API key
    pub(crate) fn requests(&self, settings: &Settings) -> RequestBuilder {
        let config = RequestConfig::new(&self.base_url)
            .with_auth(AuthMethod::Bearer(settings.api_key.trim().to_string()))
            .with_header("OpenAI-Beta", "assistants=v2");

        RequestBuilder::new(self.http.clone(), config)
    }

    /// Checks shared by every operation that touches the configured store.
    /// Returns the trimmed vector store id.
    pub(crate) fn require_store<'a>(&self, settings: &'a Settings) -> Result<&'a str, ClientError> {
        if !settings.has_api_key() {
            return Err(ClientError::MissingApiKey);
        }
        if !settings.has_vector_store() {
            return Err(ClientError::MissingVectorStoreId);
        }
        Ok(settings.vector_store_id.trim())
    }
}
