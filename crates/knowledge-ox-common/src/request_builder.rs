use crate::error::{self, CommonRequestError};
use reqwest::{Method, RequestBuilder as ReqwestRequestBuilder, Response};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// HTTP method for API endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Delete,
}

impl From<HttpMethod> for Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Delete => Method::DELETE,
        }
    }
}

/// Authentication method for API requests
#[derive(Clone, PartialEq, Eq)]
pub enum AuthMethod {
    /// Bearer token authentication (Authorization: Bearer <token>)
    Bearer(String),
}

impl std::fmt::Debug for AuthMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bearer(_) => f.write_str("Bearer(***)"),
        }
    }
}

/// Represents an API endpoint with its configuration
#[derive(Debug, Clone)]
pub struct Endpoint {
    pub path: String,
    pub method: HttpMethod,
    pub query_params: Option<Vec<(String, String)>>,
}

impl Endpoint {
    pub fn new(path: impl Into<String>, method: HttpMethod) -> Self {
        Self {
            path: path.into(),
            method,
            query_params: None,
        }
    }

    #[must_use]
    pub fn with_query_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_params
            .get_or_insert_with(Vec::new)
            .push((key.into(), value.into()));
        self
    }
}

/// Configuration for request building
#[derive(Debug, Clone)]
pub struct RequestConfig {
    pub base_url: String,
    pub auth: Option<AuthMethod>,
    pub default_headers: HashMap<String, String>,
}

impl RequestConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            auth: None,
            default_headers: HashMap::new(),
        }
    }

    #[must_use]
    pub fn with_auth(mut self, auth: AuthMethod) -> Self {
        self.auth = Some(auth);
        self
    }

    #[must_use]
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.insert(key.into(), value.into());
        self
    }
}

/// Generic request builder that handles the common HTTP patterns
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    client: reqwest::Client,
    config: RequestConfig,
}

impl RequestBuilder {
    pub fn new(client: reqwest::Client, config: RequestConfig) -> Self {
        Self { client, config }
    }

    /// Full URL for an endpoint path
    #[must_use]
    pub fn url(&self, endpoint: &Endpoint) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            endpoint.path.trim_start_matches('/')
        )
    }

    /// Build a reqwest RequestBuilder for the given endpoint
    pub fn build_request(&self, endpoint: &Endpoint) -> ReqwestRequestBuilder {
        let url = self.url(endpoint);
        let method: Method = endpoint.method.into();
        log::debug!("{method} {url}");

        let mut req = self.client.request(method, &url);

        if let Some(ref params) = endpoint.query_params {
            req = req.query(params);
        }

        if let Some(AuthMethod::Bearer(ref token)) = self.config.auth {
            req = req.bearer_auth(token);
        }

        for (key, value) in &self.config.default_headers {
            req = req.header(key, value);
        }

        req
    }

    /// Execute a request with JSON body and return deserialized response
    pub async fn request_json<T: for<'de> Deserialize<'de>, B: Serialize>(
        &self,
        endpoint: &Endpoint,
        body: Option<&B>,
    ) -> Result<T, CommonRequestError> {
        let mut req = self.build_request(endpoint);

        if let Some(body) = body {
            // Normalize to a Value first so serialization errors surface before sending
            let val = serde_json::to_value(body)?;
            req = req.json(&val);
        }

        let res = req.send().await?;
        Self::handle_response(res).await
    }

    /// Execute a request without body and return deserialized response
    pub async fn request<T: for<'de> Deserialize<'de>>(
        &self,
        endpoint: &Endpoint,
    ) -> Result<T, CommonRequestError> {
        let res = self.build_request(endpoint).send().await?;
        Self::handle_response(res).await
    }

    /// Execute a request and ignore the success body (for delete operations)
    pub async fn request_unit(&self, endpoint: &Endpoint) -> Result<(), CommonRequestError> {
        let res = self.build_request(endpoint).send().await?;
        let status = res.status();

        if status.is_success() {
            Ok(())
        } else {
            Err(Self::error_from(res).await)
        }
    }

    /// Execute a multipart form request (for file uploads)
    pub async fn request_multipart<T: for<'de> Deserialize<'de>>(
        &self,
        endpoint: &Endpoint,
        form: reqwest::multipart::Form,
    ) -> Result<T, CommonRequestError> {
        let res = self.build_request(endpoint).multipart(form).send().await?;
        Self::handle_response(res).await
    }

    /// Handle response and parse errors
    async fn handle_response<T: for<'de> Deserialize<'de>>(
        res: Response,
    ) -> Result<T, CommonRequestError> {
        let status = res.status();
        if !status.is_success() {
            return Err(Self::error_from(res).await);
        }

        let bytes = res.bytes().await?;
        serde_json::from_slice::<T>(&bytes).map_err(|e| {
            CommonRequestError::UnexpectedResponse(format!(
                "HTTP {} but failed to decode JSON: {e}",
                status.as_u16()
            ))
        })
    }

    /// Turn a non-2xx response into an error; an unreadable body is not fatal
    async fn error_from(res: Response) -> CommonRequestError {
        let status = res.status();
        let bytes = res.bytes().await.unwrap_or_default();
        error::parse_error_response(status, &bytes)
    }
}

/// Helper struct for building multipart forms
#[derive(Debug)]
pub struct MultipartForm {
    form: reqwest::multipart::Form,
}

impl MultipartForm {
    /// Create a new multipart form
    #[must_use]
    pub fn new() -> Self {
        Self {
            form: reqwest::multipart::Form::new(),
        }
    }

    /// Add a text field
    #[must_use]
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.form = self.form.text(name.into(), value.into());
        self
    }

    /// Add a file from bytes with custom mime type
    ///
    /// An unparseable mime type leaves the part without a content type.
    #[must_use]
    pub fn file_from_bytes_with_mime(
        mut self,
        name: impl Into<String>,
        filename: impl Into<String>,
        data: Vec<u8>,
        mime_type: &str,
    ) -> Self {
        let filename = filename.into();
        let part = reqwest::multipart::Part::bytes(data.clone())
            .file_name(filename.clone())
            .mime_str(mime_type)
            .unwrap_or_else(|_| reqwest::multipart::Part::bytes(data).file_name(filename));
        self.form = self.form.part(name.into(), part);
        self
    }

    /// Build the final form
    #[must_use]
    pub fn build(self) -> reqwest::multipart::Form {
        self.form
    }
}

impl Default for MultipartForm {
    fn default() -> Self {
        Self::new()
    }
}
