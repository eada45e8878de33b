//! Client configuration and RPC plumbing

use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{ApiError, ApiResult};

pub const DEFAULT_API_URL: &str = "https://api.dropboxapi.com";
pub const DEFAULT_CONTENT_URL: &str = "https://content.dropboxapi.com";

#[derive(Debug, Clone)]
pub struct DropboxConfig {
    pub access_token: String,
    /// Host for RPC-style endpoints (listing, metadata, account).
    pub api_url: String,
    /// Host for content-download endpoints.
    pub content_url: String,
}

impl DropboxConfig {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            api_url: DEFAULT_API_URL.to_string(),
            content_url: DEFAULT_CONTENT_URL.to_string(),
        }
    }

    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    pub fn with_content_url(mut self, url: impl Into<String>) -> Self {
        self.content_url = url.into();
        self
    }
}

#[derive(Debug, Clone)]
pub struct DropboxClient {
    pub(crate) http: Client,
    pub(crate) config: DropboxConfig,
}

impl DropboxClient {
    pub fn new(config: DropboxConfig) -> ApiResult<Self> {
        let http = Client::builder()
            .user_agent(concat!("dbx-api/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|source| ApiError::Http {
                endpoint: "client".to_string(),
                source,
            })?;
        Ok(Self { http, config })
    }

    pub(crate) fn api_endpoint(&self, route: &str) -> String {
        format!("{}/2/{}", self.config.api_url.trim_end_matches('/'), route)
    }

    pub(crate) fn content_endpoint(&self, route: &str) -> String {
        format!("{}/2/{}", self.config.content_url.trim_end_matches('/'), route)
    }

    pub(crate) fn authorized_post(&self, url: &str) -> RequestBuilder {
        self.http.post(url).bearer_auth(&self.config.access_token)
    }

    /// Call an RPC endpoint. `arg` is sent as the JSON body; endpoints that
    /// take no parameters must be called without a body at all.
    pub(crate) async fn rpc<A, R>(&self, route: &str, arg: Option<&A>) -> ApiResult<R>
    where
        A: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.api_endpoint(route);
        let mut request = self.authorized_post(&url);
        if let Some(arg) = arg {
            request = request.json(arg);
        }

        log::debug!("rpc {}", route);
        let response = send(request, route).await?;
        let bytes = response.bytes().await.map_err(|source| ApiError::Http {
            endpoint: route.to_string(),
            source,
        })?;

        serde_json::from_slice(&bytes).map_err(|source| ApiError::Decode {
            endpoint: route.to_string(),
            source,
        })
    }
}

/// Send a request and turn non-success statuses into `ApiError::Status`.
pub(crate) async fn send(request: RequestBuilder, route: &str) -> ApiResult<Response> {
    let response = request.send().await.map_err(|source| ApiError::Http {
        endpoint: route.to_string(),
        source,
    })?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ApiError::Status {
            endpoint: route.to_string(),
            status: status.as_u16(),
            body,
        });
    }

    Ok(response)
}

/// JSON suitable for the `Dropbox-API-Arg` header: every non-ASCII
/// character is written as a `\uXXXX` escape.
pub(crate) fn header_safe_json<A: Serialize + ?Sized>(arg: &A) -> ApiResult<String> {
    let json = serde_json::to_string(arg).map_err(|source| ApiError::Decode {
        endpoint: "Dropbox-API-Arg".to_string(),
        source,
    })?;

    let mut out = String::with_capacity(json.len());
    for c in json.chars() {
        if c.is_ascii() && c != '\u{7f}' {
            out.push(c);
        } else {
            let mut units = [0u16; 2];
            for unit in c.encode_utf16(&mut units) {
                out.push_str(&format!("\\u{:04x}", unit));
            }
        }
    }
    Ok(out)
}
