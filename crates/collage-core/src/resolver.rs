//! Share-link resolution: turns a public cloud-storage link into a
//! direct-download URL.
//!
//! The pipeline only depends on [`DirectLinkResolver`]; [`DiskApiResolver`]
//! is the implementation backed by the storage provider's public API.

use crate::config::ApiConfig;
use crate::error::{CollageError, Result};
use crate::fetch::{self, HttpOptions};
use serde::Deserialize;

pub trait DirectLinkResolver {
    fn direct_link(&self, share_url: &str) -> Result<String>;
}

/// Successful API body: `{"href": "...", "method": "GET", ...}`.
#[derive(Debug, Deserialize)]
struct DownloadLink {
    href: String,
}

/// Error body the API sends with non-2xx statuses.
#[derive(Debug, Default, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Resolves share links with one GET to `base_url + share_url`.
#[derive(Debug, Clone)]
pub struct DiskApiResolver {
    base_url: String,
    http: HttpOptions,
}

impl DiskApiResolver {
    /// Fails with `InvalidConfig` if the API base URL is missing or malformed.
    pub fn new(api: &ApiConfig) -> Result<Self> {
        Ok(Self {
            base_url: api.base_url()?.to_string(),
            http: HttpOptions::from(api),
        })
    }

    /// The URL the API call is sent to. The share link is an opaque token
    /// (a full public URL or a bare public key); only links that parse as a
    /// URL with a non-http(s) scheme are refused.
    pub fn request_url(&self, share_url: &str) -> Result<String> {
        let share_url = share_url.trim();
        if share_url.is_empty() {
            return Err(CollageError::InvalidConfig("share link is empty".to_string()));
        }
        if let Ok(parsed) = url::Url::parse(share_url) {
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(CollageError::InvalidConfig(format!(
                    "share link must be http or https: {:?}",
                    share_url
                )));
            }
        }
        Ok(format!("{}{}", self.base_url, share_url))
    }
}

impl DirectLinkResolver for DiskApiResolver {
    fn direct_link(&self, share_url: &str) -> Result<String> {
        let url = self.request_url(share_url)?;
        tracing::info!(share_url = share_url.trim(), "resolving share link");
        let resp = fetch::get(&url, &self.http)?;
        let href = parse_response(resp.status, &resp.body)?;
        tracing::debug!(href = fetch::redact(&href), "direct link resolved");
        Ok(href)
    }
}

/// Interprets an API response: the `href` of a 2xx body, or an error that
/// carries the API's own explanation when it sent one.
fn parse_response(status: u32, body: &[u8]) -> Result<String> {
    if !(200..300).contains(&status) {
        let detail: ApiErrorBody = serde_json::from_slice(body).unwrap_or_default();
        let reason = detail
            .description
            .or(detail.message)
            .map(|d| match &detail.error {
                Some(code) => format!(": {} ({})", d, code),
                None => format!(": {}", d),
            })
            .unwrap_or_default();
        return Err(CollageError::RemoteApi(format!(
            "API returned HTTP {}{}",
            status, reason
        )));
    }

    let link: DownloadLink = serde_json::from_slice(body).map_err(|e| {
        CollageError::RemoteApi(format!("malformed API response (expected `href`): {}", e))
    })?;
    if link.href.trim().is_empty() {
        return Err(CollageError::RemoteApi(
            "malformed API response: empty `href`".to_string(),
        ));
    }
    Ok(link.href)
}
