//! Document operations against the configured vector store, and the
//! normalization of the remote's file records into [`KnowledgeFile`].

use std::collections::BTreeMap;

use futures_util::future::join_all;
use knowledge_ox_common::{CommonRequestError, Endpoint, HttpMethod, MultipartForm, RequestBuilder};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::provider::Clock;
use crate::{ApiResult, ClientError, CreatedVectorStore, FileUpload, KnowledgeClient, KnowledgeFile, Settings};

/// Associations fetched by a single list call
pub const LIST_PAGE_SIZE: u32 = 100;

/// Purpose tag attached to every raw file upload
pub const FILE_PURPOSE: &str = "assistants";

/// Status reported for a file the remote has not finished indexing
pub const PENDING_STATUS: &str = "in_progress";

#[derive(Debug, Deserialize)]
struct FileListPage {
    #[serde(default)]
    data: Vec<Value>,
}

#[derive(Debug, Serialize)]
struct AttachFileRequest<'a> {
    file_id: &'a str,
}

#[derive(Debug, Serialize)]
struct CreateVectorStoreRequest<'a> {
    name: &'a str,
}

impl KnowledgeClient {
    /// List the documents attached to the configured vector store.
    ///
    /// Each association is enriched from its raw file record concurrently;
    /// enrichment failures keep the association's own fields.
    pub async fn list_files(&self, settings: &Settings) -> ApiResult<Vec<KnowledgeFile>> {
        self.try_list_files(settings).await.into()
    }

    async fn try_list_files(&self, settings: &Settings) -> Result<Vec<KnowledgeFile>, ClientError> {
        let store_id = self.require_store(settings)?;
        let requests = self.requests(settings);

        let endpoint = Endpoint::new(format!("vector_stores/{store_id}/files"), HttpMethod::Get)
            .with_query_param("limit", LIST_PAGE_SIZE.to_string());
        let page: FileListPage = requests.request(&endpoint).await?;

        let entries = page.data.iter().filter_map(|entry| {
            let file = file_from_association(entry);
            if file.is_none() {
                log::warn!("Skipping vector store file without an id: {entry}");
            }
            file.map(|file| (file, raw_file_id(entry)))
        });

        let enriched = join_all(
            entries.map(|(file, raw_id)| enrich_from_remote(&requests, file, raw_id)),
        )
        .await;

        Ok(enriched)
    }

    /// Upload a document and attach it to the configured vector store.
    pub async fn upload_file(&self, file: &FileUpload, settings: &Settings) -> ApiResult<KnowledgeFile> {
        self.try_upload_file(file, settings).await.into()
    }

    async fn try_upload_file(
        &self,
        file: &FileUpload,
        settings: &Settings,
    ) -> Result<KnowledgeFile, ClientError> {
        let store_id = self.require_store(settings)?;
        let requests = self.requests(settings);

        let form = MultipartForm::new()
            .text("purpose", FILE_PURPOSE)
            .file_from_bytes_with_mime("file", &file.name, file.data.clone(), &file.mime_type())
            .build();
        let uploaded: Value = requests
            .request_multipart(&Endpoint::new("files", HttpMethod::Post), form)
            .await?;
        let raw_id = string_field(&uploaded, &["id"]).ok_or_else(|| {
            CommonRequestError::UnexpectedResponse("file upload response has no id".to_string())
        })?;
        log::debug!("Uploaded {} as {raw_id}", file.name);

        let endpoint = Endpoint::new(format!("vector_stores/{store_id}/files"), HttpMethod::Post);
        let attached: Value = requests
            .request_json(&endpoint, Some(&AttachFileRequest { file_id: &raw_id }))
            .await?;

        Ok(file_from_upload(file, &raw_id, &uploaded, &attached, self.clock()))
    }

    /// Upload `file` and, once that succeeds, remove the association `file_id`.
    ///
    /// The result is always the upload's; a failed delete is only logged.
    pub async fn replace_file(
        &self,
        file_id: &str,
        file: &FileUpload,
        settings: &Settings,
    ) -> ApiResult<KnowledgeFile> {
        let uploaded = self.upload_file(file, settings).await;

        if uploaded.is_ok() {
            if let ApiResult::Err(message) = self.delete_file(file_id, settings).await {
                log::warn!("Replaced file {file_id} could not be removed: {message}");
            }
        }

        uploaded
    }

    /// Remove a document from the configured vector store.
    pub async fn delete_file(&self, file_id: &str, settings: &Settings) -> ApiResult<bool> {
        self.try_delete_file(file_id, settings).await.into()
    }

    async fn try_delete_file(&self, file_id: &str, settings: &Settings) -> Result<bool, ClientError> {
        let store_id = self.require_store(settings)?;
        let file_id = file_id.trim();
        if file_id.is_empty() {
            return Err(ClientError::EmptyFileId);
        }
        let endpoint = Endpoint::new(
            format!("vector_stores/{store_id}/files/{file_id}"),
            HttpMethod::Delete,
        );
        self.requests(settings).request_unit(&endpoint).await?;
        Ok(true)
    }

    /// Create a new vector store.
    ///
    /// Unlike the other operations, a blank name or missing API key is
    /// returned as `Err` before any request; only the remote outcome is an
    /// [`ApiResult`].
    pub async fn create_vector_store(
        &self,
        name: &str,
        settings: &Settings,
    ) -> Result<ApiResult<CreatedVectorStore>, ClientError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ClientError::EmptyStoreName);
        }
        if !settings.has_api_key() {
            return Err(ClientError::MissingApiKey);
        }

        Ok(self.try_create_vector_store(name, settings).await.into())
    }

    async fn try_create_vector_store(
        &self,
        name: &str,
        settings: &Settings,
    ) -> Result<CreatedVectorStore, ClientError> {
        let created: Value = self
            .requests(settings)
            .request_json(
                &Endpoint::new("vector_stores", HttpMethod::Post),
                Some(&CreateVectorStoreRequest { name }),
            )
            .await?;

        let id = string_field(&created, &["id"]).ok_or_else(|| {
            CommonRequestError::UnexpectedResponse("vector store response has no id".to_string())
        })?;

        Ok(CreatedVectorStore {
            id,
            name: string_field(&created, &["name"]),
        })
    }
}

/// Fetch the raw file record behind an association and merge it in.
/// Any failure leaves `file` untouched.
async fn enrich_from_remote(
    requests: &RequestBuilder,
    file: KnowledgeFile,
    raw_id: String,
) -> KnowledgeFile {
    let endpoint = Endpoint::new(format!("files/{raw_id}"), HttpMethod::Get);
    match requests.request::<Value>(&endpoint).await {
        Ok(detail) => enrich(file, &detail),
        Err(e) => {
            log::warn!("Could not load details for file {raw_id}: {e}");
            file
        }
    }
}

/// Normalize one entry of a vector store file listing
pub(crate) fn file_from_association(entry: &Value) -> Option<KnowledgeFile> {
    let id = string_field(entry, &["id"])?;

    Some(KnowledgeFile {
        filename: string_field(entry, &["filename", "name"]).unwrap_or_else(|| id.clone()),
        bytes: u64_field(entry, &["usage_bytes", "bytes", "size"]).unwrap_or(0),
        status: string_field(entry, &["status"]).unwrap_or_else(|| PENDING_STATUS.to_string()),
        created_at: i64_field(entry, &["created_at"]).unwrap_or(0),
        metadata: metadata_field(entry),
        id,
    })
}

/// Id of the raw file behind an association
pub(crate) fn raw_file_id(entry: &Value) -> String {
    string_field(entry, &["file_id", "id"]).unwrap_or_default()
}

/// Overlay the raw file record onto an association
pub(crate) fn enrich(mut file: KnowledgeFile, detail: &Value) -> KnowledgeFile {
    if let Some(filename) = string_field(detail, &["filename", "name"]) {
        file.filename = filename;
    }
    if let Some(bytes) = u64_field(detail, &["bytes", "size"]).filter(|b| *b > 0) {
        file.bytes = bytes;
    }
    if let Some(created_at) = i64_field(detail, &["created_at"]) {
        file.created_at = created_at;
    }
    let metadata = metadata_field(detail);
    if !metadata.is_empty() {
        file.metadata = metadata;
    }
    file
}

/// Build the record for a just-uploaded file from both upload steps
pub(crate) fn file_from_upload(
    local: &FileUpload,
    raw_id: &str,
    uploaded: &Value,
    attached: &Value,
    clock: &dyn Clock,
) -> KnowledgeFile {
    KnowledgeFile {
        id: string_field(attached, &["id"]).unwrap_or_else(|| raw_id.to_string()),
        filename: local.name.clone(),
        bytes: u64_field(attached, &["usage_bytes"])
            .filter(|b| *b > 0)
            .unwrap_or(local.size),
        status: string_field(attached, &["status"]).unwrap_or_else(|| PENDING_STATUS.to_string()),
        created_at: i64_field(attached, &["created_at"])
            .or_else(|| i64_field(uploaded, &["created_at"]))
            .unwrap_or_else(|| clock.now_seconds()),
        metadata: metadata_field(attached),
    }
}

/// First non-empty string under any of `keys`
fn string_field(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| value.get(*key)?.as_str())
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(ToString::to_string)
}

/// First non-negative integer under any of `keys`; numeric strings count
fn u64_field(value: &Value, keys: &[&str]) -> Option<u64> {
    keys.iter().find_map(|key| match value.get(*key)? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

fn i64_field(value: &Value, keys: &[&str]) -> Option<i64> {
    keys.iter().find_map(|key| match value.get(*key)? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

/// String map from `attributes` or `metadata`; other scalars become JSON text
fn metadata_field(value: &Value) -> BTreeMap<String, String> {
    ["attributes", "metadata"]
        .iter()
        .find_map(|key| value.get(*key)?.as_object())
        .map(|map| {
            map.iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| {
                    let v = v.as_str().map_or_else(|| v.to_string(), ToString::to_string);
                    (k.clone(), v)
                })
                .collect()
        })
        .unwrap_or_default()
}
