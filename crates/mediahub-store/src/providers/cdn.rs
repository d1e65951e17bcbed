//! HTTP CDN asset store.
//!
//! Uploads are sent as `multipart/form-data` to `{endpoint}/upload` with a
//! streamed file part, so progress follows the bytes actually handed to the
//! connection. Deletes go to `{endpoint}/destroy` by object id.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Client};
use serde::Deserialize;
use tracing::{debug, warn};

use mediahub_core::error::{AppError, ErrorKind};
use mediahub_core::result::AppResult;
use mediahub_core::traits::{AssetStore, ProgressFn};
use mediahub_core::types::{StoredObject, UploadFile};

use crate::progress::{DEFAULT_CHUNK_SIZE, ProgressStream, chunked, fraction};

/// Asset store backed by an HTTP CDN API.
#[derive(Debug, Clone)]
pub struct CdnAssetStore {
    client: Client,
    endpoint: String,
    api_key: String,
}

/// Upload response body. Providers differ on which URL field they fill.
#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: Option<String>,
    url: Option<String>,
}

/// Destroy response body (`{"result": "ok"}` or `{"result": "not found"}`).
#[derive(Debug, Deserialize)]
struct DestroyResponse {
    result: String,
}

impl CdnAssetStore {
    /// Create a new CDN client.
    pub fn new(endpoint: &str, api_key: &str, timeout: Duration) -> AppResult<Self> {
        if endpoint.trim().is_empty() {
            return Err(AppError::configuration(
                "assets.cdn.endpoint is required for the cdn provider",
            ));
        }
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| transport("build HTTP client", e))?;

        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if self.api_key.is_empty() {
            request
        } else {
            request.bearer_auth(&self.api_key)
        }
    }
}

fn transport(action: &str, err: reqwest::Error) -> AppError {
    AppError::with_source(
        ErrorKind::ExternalService,
        format!("Asset store failed to {action}: {err}"),
        err,
    )
}

#[async_trait]
impl AssetStore for CdnAssetStore {
    fn provider_type(&self) -> &str {
        "cdn"
    }

    async fn upload(
        &self,
        file: &UploadFile,
        folder: &str,
        progress: &ProgressFn<'_>,
    ) -> AppResult<StoredObject> {
        let total = file.size();
        let (stream, mut sent) = ProgressStream::new(chunked(file.data.clone(), DEFAULT_CHUNK_SIZE));

        let mut part = Part::stream_with_length(Body::wrap_stream(stream), total)
            .file_name(file.name.clone());
        if let Some(content_type) = &file.content_type {
            part = part
                .mime_str(content_type)
                .map_err(|e| AppError::validation(format!("Invalid content type: {e}")))?;
        }
        let form = Form::new()
            .text("folder", folder.to_string())
            .part("file", part);

        let request = self
            .authorized(self.client.post(format!("{}/upload", self.endpoint)))
            .multipart(form)
            .send();
        tokio::pin!(request);

        progress(0.0);
        let mut watching = true;
        let response = loop {
            tokio::select! {
                response = &mut request => break response,
                changed = sent.changed(), if watching => match changed {
                    Ok(()) => progress(fraction(*sent.borrow_and_update(), total)),
                    Err(_) => watching = false,
                },
            }
        };

        let response = response.map_err(|e| transport("upload", e))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::external(format!(
                "Asset store rejected upload: HTTP {status} {body}"
            )));
        }

        let body: UploadResponse = response
            .json()
            .await
            .map_err(|e| transport("decode upload response", e))?;
        let url = body
            .secure_url
            .or(body.url)
            .ok_or_else(|| AppError::external("Asset store response carried no URL"))?;

        progress(1.0);
        debug!(file = %file.name, url = %url, "Object uploaded");
        Ok(StoredObject { url })
    }

    async fn delete_by_object_id(&self, object_id: &str) -> AppResult<bool> {
        let response = self
            .authorized(self.client.post(format!("{}/destroy", self.endpoint)))
            .json(&serde_json::json!({ "public_id": object_id }))
            .send()
            .await
            .map_err(|e| transport("delete object", e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::external(format!(
                "Asset store rejected delete of {object_id}: HTTP {status}"
            )));
        }

        let body: DestroyResponse = response
            .json()
            .await
            .map_err(|e| transport("decode delete response", e))?;
        if body.result != "ok" {
            warn!(object_id, result = %body.result, "Object not deleted");
        }
        Ok(body.result == "ok")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requires_endpoint() {
        let err = CdnAssetStore::new("", "key", Duration::from_secs(5)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);
    }

    #[test]
    fn test_upload_response_prefers_secure_url() {
        let body: UploadResponse = serde_json::from_str(
            r#"{"url":"http://h/upload/v1/a.png","secure_url":"https://h/upload/v1/a.png"}"#,
        )
        .unwrap();
        assert_eq!(
            body.secure_url.or(body.url).as_deref(),
            Some("https://h/upload/v1/a.png")
        );
    }
}
