//! Single-shot fetch against the upstream MMR API.
//!
//! One GET per call — failures are terminal for the request, retries are
//! the caller's problem (and deliberately nobody's: the cache in front of
//! this module is the only load shedding).

use crate::error::{RankError, Result};
use crate::region::Region;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

/// Expected upstream envelope. Everything of interest lives under `data`;
/// the object is retained in full so the cache can serve it back later.
#[derive(Debug, Deserialize)]
struct MmrEnvelope {
    #[serde(default)]
    data: Option<Value>,
}

/// Build the upstream lookup URL.
///
/// Name and tag are pushed as path segments so reserved characters get
/// percent-encoded instead of splitting the path. The API key travels as
/// a query parameter — never log the resulting URL.
fn mmr_url(base_url: &str, api_key: &str, region: Region, name: &str, tag: &str) -> Result<Url> {
    let mut url = Url::parse(base_url)
        .map_err(|e| RankError::Internal(format!("Invalid upstream base URL: {e}")))?;

    url.path_segments_mut()
        .map_err(|_| RankError::Internal("Upstream base URL cannot be a base".to_string()))?
        .pop_if_empty()
        .push(region.as_str())
        .push(name)
        .push(tag);

    url.query_pairs_mut().append_pair("api_key", api_key);

    Ok(url)
}

/// Fetch the raw `data` object for one player from the upstream API.
///
/// # Errors
///
/// - [`RankError::UpstreamUnreachable`] on transport failure
/// - [`RankError::UpstreamStatus`] when the upstream answers non-200
/// - [`RankError::UpstreamMalformed`] when the body is not the expected JSON
/// - [`RankError::MissingData`] when `data` is absent or not an object
pub async fn fetch_mmr(
    client: &Client,
    base_url: &str,
    api_key: &str,
    region: Region,
    name: &str,
    tag: &str,
) -> Result<Value> {
    let url = mmr_url(base_url, api_key, region, name, tag)?;

    debug!("Fetching rank from upstream for {}#{} ({})", name, tag, region);

    let response = client
        .get(url)
        .send()
        .await
        .map_err(RankError::UpstreamUnreachable)?;

    let status = response.status();
    if status != StatusCode::OK {
        warn!(
            "Upstream returned {} for {}#{} ({})",
            status, name, tag, region
        );
        return Err(RankError::UpstreamStatus(status.as_u16()));
    }

    let body = response
        .text()
        .await
        .map_err(RankError::UpstreamUnreachable)?;

    let envelope: MmrEnvelope =
        serde_json::from_str(&body).map_err(RankError::UpstreamMalformed)?;

    match envelope.data {
        Some(data) if data.is_object() => Ok(data),
        _ => Err(RankError::MissingData),
    }
}
