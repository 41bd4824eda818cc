//! Blocking HTTP GET and archive retrieval.
//!
//! Uses the curl crate (libcurl). Bodies are buffered in memory: the archive
//! is small enough to hold whole and the zip reader needs random access.

mod archive;

pub use archive::extract_zip;

use crate::config::ApiConfig;
use crate::error::{CollageError, Result};
use std::path::Path;
use std::time::Duration;

const MAX_REDIRECTS: u32 = 10;

/// Timeouts applied to every request.
#[derive(Debug, Clone, Copy)]
pub struct HttpOptions {
    pub connect_timeout: Duration,
    /// Whole-transfer limit.
    pub timeout: Duration,
}

impl Default for HttpOptions {
    fn default() -> Self {
        Self::from(&ApiConfig::default())
    }
}

impl From<&ApiConfig> for HttpOptions {
    fn from(api: &ApiConfig) -> Self {
        Self {
            connect_timeout: api.connect_timeout(),
            timeout: api.timeout(),
        }
    }
}

/// Status and body of a completed GET.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u32,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

fn curl_err(url: &str) -> impl Fn(curl::Error) -> CollageError + '_ {
    move |e| CollageError::RemoteApi(format!("GET {}: {}", redact(url), e))
}

/// Drops the query string; direct links carry signed tokens there.
pub(crate) fn redact(url: &str) -> &str {
    url.split_once('?').map(|(head, _)| head).unwrap_or(url)
}

/// Performs a GET and returns whatever status the server answered with.
/// Follows redirects. Only transport failures are errors here.
pub fn get(url: &str, opts: &HttpOptions) -> Result<HttpResponse> {
    let mut body = Vec::new();
    let to_err = curl_err(url);

    let mut easy = curl::easy::Easy::new();
    easy.url(url).map_err(&to_err)?;
    easy.follow_location(true).map_err(&to_err)?;
    easy.max_redirections(MAX_REDIRECTS).map_err(&to_err)?;
    easy.connect_timeout(opts.connect_timeout).map_err(&to_err)?;
    easy.timeout(opts.timeout).map_err(&to_err)?;

    {
        let mut transfer = easy.transfer();
        transfer
            .write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })
            .map_err(&to_err)?;
        transfer.perform().map_err(&to_err)?;
    }

    let status = easy.response_code().map_err(&to_err)?;
    tracing::debug!(url = redact(url), status, bytes = body.len(), "GET done");
    Ok(HttpResponse { status, body })
}

/// Downloads the archive behind a direct link. Non-2xx is an error.
pub fn download_archive(url: &str, opts: &HttpOptions) -> Result<Vec<u8>> {
    let resp = get(url, opts)?;
    if !resp.is_success() {
        return Err(CollageError::RemoteApi(format!(
            "GET {} returned HTTP {}",
            redact(url),
            resp.status
        )));
    }
    tracing::info!(bytes = resp.body.len(), "archive downloaded");
    Ok(resp.body)
}

/// Downloads a zip archive and extracts it under `dest`. Returns the number
/// of entries extracted.
pub fn download_and_extract(url: &str, dest: &Path, opts: &HttpOptions) -> Result<usize> {
    let bytes = download_archive(url, opts)?;
    extract_zip(&bytes, dest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redact_strips_query() {
        assert_eq!(
            redact("https://downloader.disk.example/disk/abc?token=secret&x=1"),
            "https://downloader.disk.example/disk/abc"
        );
        assert_eq!(redact("http://h/p"), "http://h/p");
    }

    #[test]
    fn http_options_follow_api_config() {
        let api = ApiConfig {
            base_url: None,
            connect_timeout_secs: 3,
            timeout_secs: 9,
        };
        let opts = HttpOptions::from(&api);
        assert_eq!(opts.connect_timeout, Duration::from_secs(3));
        assert_eq!(opts.timeout, Duration::from_secs(9));
    }

    #[test]
    fn success_range() {
        let ok = HttpResponse { status: 204, body: Vec::new() };
        let redirect = HttpResponse { status: 302, body: Vec::new() };
        assert!(ok.is_success());
        assert!(!redirect.is_success());
    }

    #[test]
    fn unreachable_host_is_remote_api_error() {
        let opts = HttpOptions {
            connect_timeout: Duration::from_secs(2),
            timeout: Duration::from_secs(2),
        };
        // Port 9 (discard) on localhost is closed on any sane test machine.
        let err = get("http://127.0.0.1:9/", &opts).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::RemoteApi);
    }
}
