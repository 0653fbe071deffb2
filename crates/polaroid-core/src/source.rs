//! Asynchronous image acquisition for callers that hold URLs or data URIs
//! rather than decoded bitmaps.
//!
//! Loading is the only suspension point of a render: a collage issues all of
//! its loads concurrently and waits for the whole set (fan-out/fan-in), then
//! composites sequentially on the single destination canvas. One failed load
//! fails the batch; there is no partial render to hand back.

use crate::error::{RenderError, Result};
use base64::Engine as _;
use image::DynamicImage;
use std::path::PathBuf;
use tracing::debug;

/// An addressable bitmap resource.
#[derive(Debug, Clone)]
pub enum ImageSource {
    Path(PathBuf),
    Url(String),
    DataUri(String),
    Bytes(Vec<u8>),
}

impl ImageSource {
    /// Fetch and decode one source. HTTP requests are anonymous: no cookies,
    /// no stored credentials, nothing beyond the bare GET.
    pub async fn load(&self) -> Result<DynamicImage> {
        match self {
            ImageSource::Path(path) => Ok(image::open(path)?),
            ImageSource::Bytes(bytes) => Ok(image::load_from_memory(bytes)?),
            ImageSource::DataUri(uri) => decode_data_uri(uri),
            ImageSource::Url(url) => {
                let response = reqwest::get(url)
                    .await
                    .map_err(|e| RenderError::Fetch(format!("GET {url}: {e}")))?;
                if !response.status().is_success() {
                    return Err(RenderError::Fetch(format!(
                        "GET {url}: status {}",
                        response.status()
                    )));
                }
                let bytes = response
                    .bytes()
                    .await
                    .map_err(|e| RenderError::Fetch(format!("GET {url}: {e}")))?;
                debug!(url, bytes = bytes.len(), "fetched image");
                Ok(image::load_from_memory(&bytes)?)
            }
        }
    }
}

/// Load every source concurrently; the result order matches the input order.
pub async fn load_all(sources: &[ImageSource]) -> Result<Vec<DynamicImage>> {
    futures::future::try_join_all(sources.iter().map(|s| s.load())).await
}

fn decode_data_uri(uri: &str) -> Result<DynamicImage> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| RenderError::Fetch("data URI missing 'data:' prefix".into()))?;
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| RenderError::Fetch("data URI missing ',' separator".into()))?;
    if !meta.ends_with(";base64") {
        return Err(RenderError::Fetch(
            "only base64 data URIs are supported".into(),
        ));
    }
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(payload)
        .map_err(|e| RenderError::Fetch(format!("invalid base64 payload: {e}")))?;
    Ok(image::load_from_memory(&bytes)?)
}
