//! REST client for the remote object store.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use log::debug;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::Deserialize;

use quotekeeper_core::errors::{RemoteStoreError, Result};
use quotekeeper_core::sync::{RemoteObjectMeta, RemoteObjectRef, RemoteStoreTrait};

/// Default timeout for API requests.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Object metadata as reported by the server.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ObjectInfo {
    id: String,
    name: String,
    #[serde(default)]
    content_hash: String,
    /// Epoch milliseconds; -1 when the object has never been written.
    #[serde(default = "default_modified_at")]
    modified_at: i64,
}

fn default_modified_at() -> i64 {
    -1
}

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    code: String,
    message: String,
}

impl ObjectInfo {
    fn object_ref(&self) -> RemoteObjectRef {
        RemoteObjectRef {
            id: self.id.clone(),
            name: self.name.clone(),
        }
    }

    fn meta(&self) -> Result<RemoteObjectMeta> {
        let modified_at = Some(self.modified_at)
            .filter(|millis| *millis >= 0)
            .and_then(|millis| Utc.timestamp_millis_opt(millis).single())
            .ok_or_else(|| {
                RemoteStoreError::InvalidResponse(format!(
                    "bad modification timestamp: {}",
                    self.modified_at
                ))
            })?;
        Ok(RemoteObjectMeta {
            content_hash: self.content_hash.clone(),
            modified_at,
        })
    }
}

/// Client for a named-object store over HTTP.
#[derive(Debug, Clone)]
pub struct ObjectStoreClient {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl ObjectStoreClient {
    /// Create a new client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Base URL of the object store API
    /// * `token` - Bearer token for the linked account
    pub fn new(base_url: &str, token: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        }
    }

    fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let auth_value = HeaderValue::from_str(&format!("Bearer {}", self.token))
            .map_err(|_| RemoteStoreError::Auth("Invalid access token format".to_string()))?;
        headers.insert(AUTHORIZATION, auth_value);
        Ok(headers)
    }

    /// Parse a JSON response body, turning error statuses into
    /// [`RemoteStoreError::Api`].
    async fn parse_response<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        let body = response.text().await.map_err(RemoteStoreError::Network)?;
        debug!("Object store response ({}): {}", status, body);

        if !status.is_success() {
            if let Ok(error) = serde_json::from_str::<ApiErrorResponse>(&body) {
                return Err(RemoteStoreError::api(
                    status.as_u16(),
                    format!("{}: {}", error.code, error.message),
                )
                .into());
            }
            return Err(
                RemoteStoreError::api(status.as_u16(), format!("Request failed: {}", body)).into(),
            );
        }

        serde_json::from_str(&body).map_err(|e| {
            RemoteStoreError::InvalidResponse(format!("Failed to parse response: {}", e)).into()
        })
    }

    /// Fetch the server's metadata record for an object.
    ///
    /// GET /api/v1/objects/{id}
    async fn get_object_info(&self, object: &RemoteObjectRef) -> Result<ObjectInfo> {
        let url = format!("{}/api/v1/objects/{}", self.base_url, object.id);
        let response = self
            .client
            .get(&url)
            .headers(self.headers()?)
            .send()
            .await
            .map_err(RemoteStoreError::Network)?;
        if response.status().as_u16() == 404 {
            return Err(RemoteStoreError::ObjectNotFound(object.name.clone()).into());
        }
        Self::parse_response(response).await
    }
}

#[async_trait]
impl RemoteStoreTrait for ObjectStoreClient {
    /// GET /api/v1/objects?name={name}
    async fn find_object(&self, name: &str) -> Result<Option<RemoteObjectRef>> {
        let url = format!(
            "{}/api/v1/objects?name={}",
            self.base_url,
            urlencoding::encode(name)
        );
        debug!("Querying backup object by name: {}", name);

        let response = self
            .client
            .get(&url)
            .headers(self.headers()?)
            .send()
            .await
            .map_err(RemoteStoreError::Network)?;
        let objects: Vec<ObjectInfo> = Self::parse_response(response).await?;
        Ok(objects
            .into_iter()
            .find(|info| info.name == name)
            .map(|info| info.object_ref()))
    }

    /// POST /api/v1/objects
    async fn create_object(&self, name: &str) -> Result<RemoteObjectRef> {
        let url = format!("{}/api/v1/objects", self.base_url);
        debug!("Creating backup object: {}", name);

        let response = self
            .client
            .post(&url)
            .headers(self.headers()?)
            .json(&serde_json::json!({ "name": name }))
            .send()
            .await
            .map_err(RemoteStoreError::Network)?;
        let info: ObjectInfo = Self::parse_response(response).await?;
        Ok(info.object_ref())
    }

    /// PUT /api/v1/objects/{id}/content
    async fn upload(&self, object: &RemoteObjectRef, bytes: Vec<u8>) -> Result<RemoteObjectMeta> {
        let url = format!("{}/api/v1/objects/{}/content", self.base_url, object.id);
        debug!("Uploading {} bytes to {}", bytes.len(), object.name);

        let mut headers = self.headers()?;
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/octet-stream"),
        );
        let response = self
            .client
            .put(&url)
            .headers(headers)
            .body(bytes)
            .send()
            .await
            .map_err(RemoteStoreError::Network)?;
        let info: ObjectInfo = Self::parse_response(response).await?;
        info.meta()
    }

    async fn head(&self, object: &RemoteObjectRef) -> Result<RemoteObjectMeta> {
        self.get_object_info(object).await?.meta()
    }

    /// GET /api/v1/objects/{id}/content
    async fn download(&self, object: &RemoteObjectRef) -> Result<(Vec<u8>, RemoteObjectMeta)> {
        // Metadata first, then content; the server's hash identifies
        // the bytes we are about to apply locally.
        let meta = self.head(object).await?;

        let url = format!("{}/api/v1/objects/{}/content", self.base_url, object.id);
        debug!("Downloading content of {}", object.name);
        let response = self
            .client
            .get(&url)
            .headers(self.headers()?)
            .send()
            .await
            .map_err(RemoteStoreError::Network)?;
        let status = response.status();
        if status.as_u16() == 404 {
            return Err(RemoteStoreError::ObjectNotFound(object.name.clone()).into());
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RemoteStoreError::api(status.as_u16(), body).into());
        }
        let bytes = response
            .bytes()
            .await
            .map_err(RemoteStoreError::Network)?
            .to_vec();
        Ok((bytes, meta))
    }
}
