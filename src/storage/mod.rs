//! Content-Addressed Storage Helpers
//!
//! Resolves `ipfs://` URIs onto an HTTP gateway and downloads the
//! referenced content. The fetch layer itself is plain HTTP; no pinning
//! or upload functionality lives here.

use std::time::Duration;

use tracing::error;

/// Public gateway used when the caller configures none
pub const DEFAULT_IPFS_GATEWAY: &str = "https://ipfs.io/ipfs/";

/// Errors raised by storage helpers
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The URI scheme is neither `ipfs` nor `http(s)`
    #[error("unsupported URI scheme in `{0}`")]
    UnsupportedScheme(String),

    /// The gateway answered with a non-success status
    #[error("download failed: {status} {uri}")]
    DownloadFailed {
        uri: String,
        status: reqwest::StatusCode,
    },

    /// Transport-level failure
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
}

/// Options for [`download`]
#[derive(Debug, Clone)]
pub struct DownloadOptions {
    /// Gateway prefix for `ipfs://` URIs, ending in `/ipfs/`
    pub gateway: String,
    /// Per-request timeout
    pub timeout: Option<Duration>,
}

impl Default for DownloadOptions {
    fn default() -> Self {
        Self {
            gateway: DEFAULT_IPFS_GATEWAY.to_string(),
            timeout: Some(Duration::from_secs(30)),
        }
    }
}

/// Map a content URI onto a fetchable HTTP URL.
///
/// `ipfs://<cid>/<path>` becomes `<gateway><cid>/<path>`; `http(s)` URIs
/// pass through unchanged; anything else is rejected.
pub fn resolve_scheme(uri: &str, gateway: &str) -> Result<String, StorageError> {
    if let Some(content_path) = uri.strip_prefix("ipfs://") {
        let gateway = gateway.strip_suffix('/').unwrap_or(gateway);
        return Ok(format!("{gateway}/{content_path}"));
    }
    if uri.starts_with("http://") || uri.starts_with("https://") {
        return Ok(uri.to_string());
    }
    Err(StorageError::UnsupportedScheme(uri.to_string()))
}

/// Download the content behind a URI, resolving `ipfs://` through the
/// configured gateway. Non-success statuses are reported as errors, never
/// silently returned as body bytes.
pub async fn download(uri: &str, options: &DownloadOptions) -> Result<Vec<u8>, StorageError> {
    let resolved = resolve_scheme(uri, &options.gateway)?;

    let mut request = reqwest::Client::new().get(&resolved);
    if let Some(timeout) = options.timeout {
        request = request.timeout(timeout);
    }

    let response = request.send().await?;
    let status = response.status();
    if !status.is_success() {
        error!(%status, uri = %resolved, "failed to download file");
        return Err(StorageError::DownloadFailed {
            uri: resolved,
            status,
        });
    }

    Ok(response.bytes().await?.to_vec())
}
