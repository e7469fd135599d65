use crate::{
    error::{RankError, Result},
    metrics,
    region::Region,
    server::state::AppState,
};
use axum::{
    Json,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use std::time::Instant;
use tracing::info;

/// Serve a player's current rank, from cache when fresh.
///
/// The region is validated against the allow-list before the core lookup
/// runs; name and tag pass through verbatim.
pub async fn get_rank(
    Path((region, name, tag)): Path<(String, String, String)>,
    State(state): State<AppState>,
) -> Result<Response> {
    let start = Instant::now();
    info!("Serving rank for {}#{} ({})", name, tag, region);

    let Some(region) = Region::parse(&region) else {
        metrics::record_request("rank", 400);
        return Err(RankError::InvalidRegion(region));
    };

    match state.fetcher.get_rank(region, &name, &tag).await {
        Ok(snapshot) => {
            metrics::record_request("rank", 200);
            metrics::record_duration("rank", start);

            Ok(Json(snapshot).into_response())
        }
        Err(e) => {
            metrics::record_upstream_error();
            metrics::record_request("rank", e.status_code().as_u16());
            metrics::record_duration("rank", start);

            Err(e)
        }
    }
}
