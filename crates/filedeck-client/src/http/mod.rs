//! HTTP implementation of [`DriveApi`] on top of `reqwest`.

pub mod envelope;

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{ACCEPT, AUTHORIZATION, COOKIE, HeaderMap, HeaderValue};
use reqwest::multipart::{Form, Part};
use reqwest::{Method, RequestBuilder, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use filedeck_core::config::ApiConfig;
use filedeck_core::types::{FileId, FolderId, ShareId};
use filedeck_core::{AppError, AppResult, ErrorKind};
use filedeck_entity::{
    BatchItem, BatchResult, CreateShare, File, FileBlob, Folder, FolderContents, ItemKey,
    SearchResults, Share, TrashContents,
};

use crate::api::{DriveApi, DriveOp};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateFolderBody<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    parent_id: Option<&'a FolderId>,
}

#[derive(Serialize)]
struct RenameBody<'a> {
    name: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MoveBody<'a> {
    target_folder_id: Option<&'a FolderId>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BatchBody<'a> {
    items: &'a [BatchItem],
    #[serde(skip_serializing_if = "Option::is_none")]
    target_folder_id: Option<&'a FolderId>,
}

/// Drive client speaking the service's REST protocol.
#[derive(Debug, Clone)]
pub struct HttpDriveClient {
    /// Shared connection pool.
    client: reqwest::Client,
    /// Base URL without a trailing slash.
    base_url: String,
}

impl HttpDriveClient {
    /// Build a client from the API configuration.
    pub fn new(config: &ApiConfig) -> AppResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(token) = config.bearer_token.as_deref().filter(|t| !t.is_empty()) {
            let value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|e| AppError::with_source(ErrorKind::Configuration, "Invalid bearer token", e))?;
            headers.insert(AUTHORIZATION, value);
        }
        if let Some(cookie) = config.session_cookie.as_deref().filter(|c| !c.is_empty()) {
            let value = HeaderValue::from_str(cookie)
                .map_err(|e| AppError::with_source(ErrorKind::Configuration, "Invalid session cookie", e))?;
            headers.insert(COOKIE, value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| {
                AppError::with_source(ErrorKind::Configuration, "Failed to build HTTP client", e)
            })?;

        Url::parse(&config.base_url).map_err(|e| {
            AppError::with_source(
                ErrorKind::Configuration,
                format!("Invalid API base URL '{}'", config.base_url),
                e,
            )
        })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// The configured base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build an endpoint URL. Each segment is percent-encoded on its own, so
    /// an id carrying `/` or `?` stays a single path segment.
    fn url(&self, segments: &[&str], query: &[(&str, &str)]) -> AppResult<Url> {
        let mut url = Url::parse(&self.base_url).map_err(|e| {
            AppError::with_source(ErrorKind::Configuration, format!("Invalid API base URL '{}'", self.base_url), e)
        })?;
        url.path_segments_mut()
            .map_err(|()| AppError::configuration(format!("API base URL '{}' cannot carry a path", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    fn request(&self, method: Method, segments: &[&str], query: &[(&str, &str)]) -> AppResult<RequestBuilder> {
        Ok(self.client.request(method, self.url(segments, query)?))
    }

    /// Send a request and return the raw success body.
    async fn send(&self, op: DriveOp, request: RequestBuilder) -> AppResult<Bytes> {
        let response = request.send().await.map_err(|e| {
            AppError::with_source(ErrorKind::Transport, format!("{op} request failed: {e}"), e)
        })?;
        let status = response.status();
        let body = response.bytes().await.map_err(|e| {
            AppError::with_source(ErrorKind::Transport, format!("{op} response interrupted: {e}"), e)
        })?;

        if !status.is_success() {
            let err = envelope::status_error(status, &String::from_utf8_lossy(&body));
            warn!(operation = %op, status = status.as_u16(), error = %err, "Drive request rejected");
            return Err(err);
        }
        debug!(operation = %op, status = status.as_u16(), bytes = body.len(), "Drive request completed");
        Ok(body)
    }

    async fn send_json<T: DeserializeOwned>(&self, op: DriveOp, request: RequestBuilder) -> AppResult<T> {
        let body = self.send(op, request).await?;
        envelope::decode(&String::from_utf8_lossy(&body))
    }

    async fn send_unit(&self, op: DriveOp, request: RequestBuilder) -> AppResult<()> {
        self.send(op, request).await.map(|_| ())
    }

    fn blob_part(blob: FileBlob) -> AppResult<Part> {
        let content_type = blob.content_type();
        Part::bytes(blob.data.to_vec())
            .file_name(blob.name)
            .mime_str(&content_type)
            .map_err(|e| AppError::with_source(ErrorKind::Internal, "Invalid content type", e))
    }
}

#[async_trait]
impl DriveApi for HttpDriveClient {
    async fn list_children(&self, folder_id: Option<&FolderId>) -> AppResult<FolderContents> {
        let query: Vec<(&str, &str)> = folder_id.map(|id| ("folderId", id.as_str())).into_iter().collect();
        let req = self.request(Method::GET, &["folders"], &query)?;
        self.send_json(DriveOp::ListChildren, req).await
    }

    async fn get_ancestors(&self, folder_id: &FolderId) -> AppResult<Vec<Folder>> {
        let req = self.request(Method::GET, &["folders", folder_id.as_str(), "ancestors"], &[])?;
        self.send_json(DriveOp::GetAncestors, req).await
    }

    async fn create_folder(&self, name: &str, parent_id: Option<&FolderId>) -> AppResult<Folder> {
        let req = self
            .request(Method::POST, &["folders"], &[])?
            .json(&CreateFolderBody { name, parent_id });
        self.send_json(DriveOp::CreateFolder, req).await
    }

    async fn rename_folder(&self, id: &FolderId, name: &str) -> AppResult<Folder> {
        let req = self
            .request(Method::PATCH, &["folders", id.as_str(), "rename"], &[])?
            .json(&RenameBody { name });
        self.send_json(DriveOp::Rename, req).await
    }

    async fn rename_file(&self, id: &FileId, name: &str) -> AppResult<File> {
        let req = self
            .request(Method::PATCH, &["files", id.as_str(), "rename"], &[])?
            .json(&RenameBody { name });
        self.send_json(DriveOp::Rename, req).await
    }

    async fn move_folder(&self, id: &FolderId, target: Option<&FolderId>) -> AppResult<()> {
        let req = self
            .request(Method::POST, &["folders", id.as_str(), "move"], &[])?
            .json(&MoveBody { target_folder_id: target });
        self.send_unit(DriveOp::Move, req).await
    }

    async fn move_file(&self, id: &FileId, target: Option<&FolderId>) -> AppResult<()> {
        let req = self
            .request(Method::POST, &["files", id.as_str(), "move"], &[])?
            .json(&MoveBody { target_folder_id: target });
        self.send_unit(DriveOp::Move, req).await
    }

    async fn delete_folder(&self, id: &FolderId, recursive: bool) -> AppResult<()> {
        let recursive = if recursive { "true" } else { "false" };
        let req = self.request(Method::DELETE, &["folders", id.as_str()], &[("recursive", recursive)])?;
        self.send_unit(DriveOp::Delete, req).await
    }

    async fn delete_file(&self, id: &FileId) -> AppResult<()> {
        let req = self.request(Method::DELETE, &["files", id.as_str()], &[])?;
        self.send_unit(DriveOp::Delete, req).await
    }

    async fn restore_folder(&self, id: &FolderId) -> AppResult<()> {
        let req = self.request(Method::POST, &["folders", id.as_str(), "restore"], &[])?;
        self.send_unit(DriveOp::Restore, req).await
    }

    async fn restore_file(&self, id: &FileId) -> AppResult<()> {
        let req = self.request(Method::POST, &["files", id.as_str(), "restore"], &[])?;
        self.send_unit(DriveOp::Restore, req).await
    }

    async fn permanently_delete(&self, key: &ItemKey) -> AppResult<()> {
        let segments = match key {
            ItemKey::Folder(id) => ["folders", id.as_str(), "permanent"],
            ItemKey::File(id) => ["files", id.as_str(), "permanent"],
        };
        let req = self.request(Method::DELETE, &segments, &[])?;
        self.send_unit(DriveOp::PermanentDelete, req).await
    }

    async fn batch_delete(&self, items: &[BatchItem]) -> AppResult<BatchResult> {
        let req = self
            .request(Method::POST, &["files", "batch", "delete"], &[])?
            .json(&BatchBody { items, target_folder_id: None });
        self.send_json(DriveOp::BatchDelete, req).await
    }

    async fn batch_move(&self, items: &[BatchItem], target: Option<&FolderId>) -> AppResult<BatchResult> {
        let req = self
            .request(Method::POST, &["files", "batch", "move"], &[])?
            .json(&BatchBody { items, target_folder_id: target });
        self.send_json(DriveOp::BatchMove, req).await
    }

    async fn batch_restore(&self, items: &[BatchItem]) -> AppResult<BatchResult> {
        let req = self
            .request(Method::POST, &["files", "batch", "restore"], &[])?
            .json(&BatchBody { items, target_folder_id: None });
        self.send_json(DriveOp::BatchRestore, req).await
    }

    async fn upload_single(&self, blob: FileBlob, folder_id: Option<&FolderId>) -> AppResult<File> {
        let mut form = Form::new().part("file", Self::blob_part(blob)?);
        if let Some(id) = folder_id {
            form = form.text("folderId", id.to_string());
        }
        let req = self.request(Method::POST, &["files", "upload"], &[])?.multipart(form);
        self.send_json(DriveOp::UploadSingle, req).await
    }

    async fn upload_multi(
        &self,
        blobs: Vec<FileBlob>,
        paths: Vec<String>,
        base_folder_id: Option<&FolderId>,
    ) -> AppResult<()> {
        if blobs.len() != paths.len() {
            return Err(AppError::internal(format!(
                "{} files but {} paths in folder upload",
                blobs.len(),
                paths.len()
            )));
        }
        let mut form = Form::new();
        for blob in blobs {
            form = form.part("files", Self::blob_part(blob)?);
        }
        form = form.text("paths", serde_json::to_string(&paths)?);
        if let Some(id) = base_folder_id {
            form = form.text("baseFolderId", id.to_string());
        }
        let req = self.request(Method::POST, &["files", "upload-multi"], &[])?.multipart(form);
        self.send_unit(DriveOp::UploadMulti, req).await
    }

    async fn download_file(&self, id: &FileId) -> AppResult<Bytes> {
        let req = self
            .request(Method::GET, &["files", id.as_str(), "download"], &[])?
            .header(ACCEPT, "*/*");
        self.send(DriveOp::Download, req).await
    }

    async fn search(&self, query: &str) -> AppResult<SearchResults> {
        let req = self.request(Method::GET, &["search"], &[("q", query)])?;
        self.send_json(DriveOp::Search, req).await
    }

    async fn shared_with_me(&self) -> AppResult<Vec<Share>> {
        let req = self.request(Method::GET, &["shares", "shared-with-me"], &[])?;
        self.send_json(DriveOp::ListShares, req).await
    }

    async fn shares_sent(&self) -> AppResult<Vec<Share>> {
        let req = self.request(Method::GET, &["shares", "sent"], &[])?;
        self.send_json(DriveOp::ListShares, req).await
    }

    async fn create_share(&self, request: &CreateShare) -> AppResult<()> {
        let req = self.request(Method::POST, &["shares"], &[])?.json(request);
        self.send_unit(DriveOp::CreateShare, req).await
    }

    async fn delete_share(&self, id: &ShareId) -> AppResult<()> {
        let req = self.request(Method::DELETE, &["shares", id.as_str()], &[])?;
        self.send_unit(DriveOp::DeleteShare, req).await
    }

    async fn list_trash(&self) -> AppResult<TrashContents> {
        let req = self.request(Method::GET, &["trash"], &[])?;
        self.send_json(DriveOp::ListTrash, req).await
    }
}
