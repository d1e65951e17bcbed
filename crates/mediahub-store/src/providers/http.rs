//! REST metadata store client.
//!
//! Endpoints, relative to the configured base URL:
//!
//! | operation | request |
//! |---|---|
//! | list | `GET /media` |
//! | create | `POST /media` |
//! | update | `PUT /media/{id}` |
//! | delete | `DELETE /media/{id}` |
//! | delete folder | `DELETE /media/folder?path={path}` |

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use mediahub_core::error::{AppError, ErrorKind};
use mediahub_core::result::AppResult;
use mediahub_core::traits::MetadataStore;
use mediahub_core::types::{Asset, AssetId, AssetUpdate, CreateAsset, FolderDeleteSummary};

/// Metadata store backed by a REST endpoint.
#[derive(Debug, Clone)]
pub struct HttpMetadataStore {
    client: Client,
    base_url: String,
}

impl HttpMetadataStore {
    /// Create a new client for `base_url`.
    pub fn new(base_url: &str, timeout: Duration) -> AppResult<Self> {
        if base_url.trim().is_empty() {
            return Err(AppError::configuration(
                "metadata.base_url is required for the http provider",
            ));
        }
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| transport("build HTTP client", e))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn media_url(&self) -> String {
        format!("{}/media", self.base_url)
    }

    /// `{base}/media/{id}` with the id percent-encoded as one segment.
    fn record_url(&self, id: &AssetId) -> AppResult<Url> {
        let mut url = Url::parse(&self.base_url).map_err(invalid_base)?;
        url.path_segments_mut()
            .map_err(|()| AppError::configuration("Metadata base URL cannot carry a path"))?
            .pop_if_empty()
            .push("media")
            .push(id.as_str());
        Ok(url)
    }

    fn folder_url(&self, path: &str) -> AppResult<Url> {
        Url::parse_with_params(&format!("{}/media/folder", self.base_url), &[("path", path)])
            .map_err(invalid_base)
    }
}

fn invalid_base(err: impl std::fmt::Display) -> AppError {
    AppError::configuration(format!("Invalid metadata base URL: {err}"))
}

/// Map a reqwest failure into a transport error.
fn transport(action: &str, err: reqwest::Error) -> AppError {
    AppError::with_source(
        ErrorKind::ExternalService,
        format!("Metadata store failed to {action}: {err}"),
        err,
    )
}

/// Turn non-success statuses into errors, keeping 404 distinguishable.
async fn check(response: Response, action: &str) -> AppResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message = format!("Metadata store failed to {action}: HTTP {status} {body}");
    Err(match status {
        StatusCode::NOT_FOUND => AppError::not_found(message),
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => AppError::validation(message),
        _ => AppError::external(message),
    })
}

async fn decode<T: DeserializeOwned>(response: Response, action: &str) -> AppResult<T> {
    let response = check(response, action).await?;
    response.json::<T>().await.map_err(|e| transport(action, e))
}

#[async_trait]
impl MetadataStore for HttpMetadataStore {
    fn provider_type(&self) -> &str {
        "http"
    }

    async fn list(&self) -> AppResult<Vec<Asset>> {
        let response = self
            .client
            .get(self.media_url())
            .send()
            .await
            .map_err(|e| transport("list assets", e))?;
        decode(response, "list assets").await
    }

    async fn create(&self, asset: &CreateAsset) -> AppResult<Asset> {
        let response = self
            .client
            .post(self.media_url())
            .json(asset)
            .send()
            .await
            .map_err(|e| transport("create asset", e))?;
        let created: Asset = decode(response, "create asset").await?;
        debug!(asset_id = %created.id, "Asset record created");
        Ok(created)
    }

    async fn update(&self, id: &AssetId, update: &AssetUpdate) -> AppResult<Asset> {
        let response = self
            .client
            .put(self.record_url(id)?)
            .json(update)
            .send()
            .await
            .map_err(|e| transport("update asset", e))?;
        decode(response, "update asset").await
    }

    async fn delete(&self, id: &AssetId) -> AppResult<()> {
        let response = self
            .client
            .delete(self.record_url(id)?)
            .send()
            .await
            .map_err(|e| transport("delete asset", e))?;
        check(response, "delete asset").await?;
        Ok(())
    }

    async fn delete_folder(&self, path: &str) -> AppResult<FolderDeleteSummary> {
        let response = self
            .client
            .delete(self.folder_url(path)?)
            .send()
            .await
            .map_err(|e| transport("delete folder", e))?;
        decode(response, "delete folder").await
    }
}
