//! One-shot HTTP fetch helpers.
//!
//! Native callers run these on a worker thread (blocking client); WASM
//! callers await them inside `spawn_local`. No retries and no timeouts
//! beyond the client's own.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("request failed: {0}")]
    Request(String),
    #[error("server returned HTTP {0}")]
    Status(u16),
    #[error("failed to read response body: {0}")]
    Body(String),
}

#[cfg(not(target_arch = "wasm32"))]
pub fn fetch_bytes(url: &str) -> Result<Vec<u8>, HttpError> {
    log::debug!("GET {}", url);
    let response = reqwest::blocking::get(url).map_err(|e| HttpError::Request(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(HttpError::Status(status.as_u16()));
    }

    let bytes = response
        .bytes()
        .map_err(|e| HttpError::Body(e.to_string()))?;
    Ok(bytes.to_vec())
}

#[cfg(not(target_arch = "wasm32"))]
pub fn fetch_text(url: &str) -> Result<String, HttpError> {
    let bytes = fetch_bytes(url)?;
    String::from_utf8(bytes).map_err(|e| HttpError::Body(e.to_string()))
}

#[cfg(target_arch = "wasm32")]
pub async fn fetch_bytes(url: &str) -> Result<Vec<u8>, HttpError> {
    log::debug!("GET {}", url);
    let response = reqwest::get(url)
        .await
        .map_err(|e| HttpError::Request(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(HttpError::Status(status.as_u16()));
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| HttpError::Body(e.to_string()))?;
    Ok(bytes.to_vec())
}

#[cfg(target_arch = "wasm32")]
pub async fn fetch_text(url: &str) -> Result<String, HttpError> {
    let bytes = fetch_bytes(url).await?;
    String::from_utf8(bytes).map_err(|e| HttpError::Body(e.to_string()))
}
