mod basic;
mod client;

pub use basic::BasicClient;
pub use client::HttpClient;

use bytes::Bytes;

use crate::error::LoadError;

/// GETs `url` and returns the whole body.
///
/// A non-success status is an error, so a failed download never reaches
/// the parser.
pub async fn fetch_bytes<C: HttpClient>(client: &C, url: &str) -> Result<Bytes, LoadError> {
    let parsed = reqwest::Url::parse(url).map_err(|e| LoadError::InvalidUrl {
        url: url.to_string(),
        message: e.to_string(),
    })?;
    let req = reqwest::Request::new(reqwest::Method::GET, parsed);

    let resp = client.execute(req).await?.error_for_status()?;
    Ok(resp.bytes().await?)
}
