//! Cache-augmented rank lookup.
//!
//! The only interesting path in the service: check the cache, fall back to
//! one upstream fetch, validate the untrusted payload, and shape the
//! result for display.

use crate::cache::{PlayerKey, RankCache};
use crate::error::{RankError, Result};
use crate::metrics;
use crate::region::Region;
use crate::upstream;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::time::Instant;

/// Result of one rank lookup.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankSnapshot {
    /// Display string, e.g. `"Gold 2 [45RR]"`.
    pub message: String,
    /// Whether the payload came from the cache.
    pub cached: bool,
    /// Wall-clock time spent serving this lookup.
    #[serde(rename = "latency:ms")]
    pub latency_ms: u64,
}

/// Rank lookup service: shared HTTP client + payload cache + upstream
/// coordinates. Cheap to clone, shared by all request handlers.
#[derive(Clone)]
pub struct RankFetcher {
    client: Client,
    cache: RankCache,
    base_url: String,
    api_key: String,
}

impl RankFetcher {
    pub fn new(client: Client, cache: RankCache, base_url: String, api_key: String) -> Self {
        Self {
            client,
            cache,
            base_url,
            api_key,
        }
    }

    /// Look up a player's current rank.
    ///
    /// Serves from the cache when a fresh entry exists; otherwise issues a
    /// single upstream GET and stores the returned `data` object under the
    /// player's key (overwriting any previous entry — concurrent misses
    /// race and the last write wins).
    ///
    /// The display fields are validated on every read, so a cached payload
    /// with an unexpected shape keeps failing deterministically instead of
    /// being trusted just because it was stored.
    pub async fn get_rank(&self, region: Region, name: &str, tag: &str) -> Result<RankSnapshot> {
        let start = Instant::now();
        let key = PlayerKey::new(region, name, tag);

        let (payload, cached) = match self.cache.get(&key) {
            Some(payload) => (payload, true),
            None => {
                let payload = upstream::fetch_mmr(
                    &self.client,
                    &self.base_url,
                    &self.api_key,
                    region,
                    name,
                    tag,
                )
                .await?;
                self.cache.insert(key, payload.clone());
                (payload, false)
            }
        };
        metrics::record_cache_lookup(cached);

        let (tier, rr) = extract_rank(&payload)?;

        Ok(RankSnapshot {
            message: format_message(tier, rr),
            cached,
            latency_ms: start.elapsed().as_millis() as u64,
        })
    }
}

/// Pull the two display fields out of a stored payload.
///
/// Missing field or wrong type fails with the offending field's name.
fn extract_rank(payload: &Value) -> Result<(&str, f64)> {
    let current = payload
        .get("current_data")
        .filter(|v| v.is_object())
        .ok_or(RankError::InvalidFieldType {
            field: "current_data",
        })?;

    let tier = current
        .get("currenttierpatched")
        .and_then(Value::as_str)
        .ok_or(RankError::InvalidFieldType {
            field: "currenttierpatched",
        })?;

    let rr = current
        .get("ranking_in_tier")
        .and_then(Value::as_f64)
        .ok_or(RankError::InvalidFieldType {
            field: "ranking_in_tier",
        })?;

    Ok((tier, rr))
}

/// Format the display message. `ranking_in_tier` arrives as a float but is
/// shown truncated toward zero, not rounded.
fn format_message(tier: &str, rr: f64) -> String {
    format!("{} [{}RR]", tier, rr.trunc() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fetcher(server: &MockServer, ttl: Duration) -> RankFetcher {
        RankFetcher::new(
            Client::new(),
            RankCache::new(ttl),
            format!("{}/mmr", server.uri()),
            "test-key".to_string(),
        )
    }

    fn gold_2_body() -> serde_json::Value {
        json!({
            "status": 200,
            "data": {
                "current_data": {
                    "currenttierpatched": "Gold 2",
                    "ranking_in_tier": 45.0,
                    "mmr_change_to_last_game": 18
                }
            }
        })
    }

    // ---- Formatting ----

    #[test]
    fn message_truncates_rr_toward_zero() {
        assert_eq!(format_message("Gold 2", 67.9), "Gold 2 [67RR]");
        assert_eq!(format_message("Gold 2", 45.0), "Gold 2 [45RR]");
        assert_eq!(format_message("Iron 1", -0.5), "Iron 1 [0RR]");
    }

    // ---- Field extraction ----

    #[test]
    fn extract_reads_both_fields() {
        let payload = json!({
            "current_data": {"currenttierpatched": "Diamond 3", "ranking_in_tier": 12.4}
        });
        let (tier, rr) = extract_rank(&payload).unwrap();
        assert_eq!(tier, "Diamond 3");
        assert_eq!(rr, 12.4);
    }

    #[test]
    fn extract_fails_on_missing_current_data() {
        let err = extract_rank(&json!({})).unwrap_err();
        assert!(matches!(
            err,
            RankError::InvalidFieldType {
                field: "current_data"
            }
        ));
    }

    #[test]
    fn extract_fails_on_string_rr() {
        let payload = json!({
            "current_data": {"currenttierpatched": "Gold 2", "ranking_in_tier": "45"}
        });
        let err = extract_rank(&payload).unwrap_err();
        assert!(matches!(
            err,
            RankError::InvalidFieldType {
                field: "ranking_in_tier"
            }
        ));
    }

    #[test]
    fn extract_fails_on_numeric_tier() {
        let payload = json!({
            "current_data": {"currenttierpatched": 14, "ranking_in_tier": 45.0}
        });
        let err = extract_rank(&payload).unwrap_err();
        assert!(matches!(
            err,
            RankError::InvalidFieldType {
                field: "currenttierpatched"
            }
        ));
    }

    #[test]
    fn extract_accepts_integer_rr() {
        // Upstream sometimes serializes whole numbers without a decimal point.
        let payload = json!({
            "current_data": {"currenttierpatched": "Gold 2", "ranking_in_tier": 45}
        });
        let (_, rr) = extract_rank(&payload).unwrap();
        assert_eq!(rr, 45.0);
    }

    // ---- Cache-augmented fetch ----

    #[tokio::test]
    async fn fresh_fetch_is_not_cached() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/mmr/eu/Foo/1234"))
            .respond_with(ResponseTemplate::new(200).set_body_json(gold_2_body()))
            .mount(&server)
            .await;

        let fetcher = fetcher(&server, Duration::from_secs(300));
        let snapshot = fetcher.get_rank(Region::Eu, "Foo", "1234").await.unwrap();

        assert_eq!(snapshot.message, "Gold 2 [45RR]");
        assert!(!snapshot.cached);
    }

    #[tokio::test]
    async fn repeated_lookups_hit_the_cache() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/mmr/eu/Foo/1234"))
            .respond_with(ResponseTemplate::new(200).set_body_json(gold_2_body()))
            .expect(1)
            .mount(&server)
            .await;

        let fetcher = fetcher(&server, Duration::from_secs(300));

        let first = fetcher.get_rank(Region::Eu, "Foo", "1234").await.unwrap();
        assert!(!first.cached);

        for _ in 0..3 {
            let again = fetcher.get_rank(Region::Eu, "Foo", "1234").await.unwrap();
            assert!(again.cached);
            assert_eq!(again.message, first.message);
        }
        // Mock expectation verifies exactly one upstream call happened.
    }

    #[tokio::test]
    async fn expired_entry_triggers_refetch() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/mmr/eu/Foo/1234"))
            .respond_with(ResponseTemplate::new(200).set_body_json(gold_2_body()))
            .expect(2)
            .mount(&server)
            .await;

        let fetcher = fetcher(&server, Duration::from_millis(10));

        let first = fetcher.get_rank(Region::Eu, "Foo", "1234").await.unwrap();
        assert!(!first.cached);

        tokio::time::sleep(Duration::from_millis(30)).await;

        let second = fetcher.get_rank(Region::Eu, "Foo", "1234").await.unwrap();
        assert!(!second.cached, "Entry past TTL must be refetched");
    }

    #[tokio::test]
    async fn truncates_fractional_rr_from_upstream() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {"current_data": {"currenttierpatched": "Platinum 1", "ranking_in_tier": 67.9}}
            })))
            .mount(&server)
            .await;

        let fetcher = fetcher(&server, Duration::from_secs(300));
        let snapshot = fetcher.get_rank(Region::Na, "Bar", "5678").await.unwrap();

        assert_eq!(snapshot.message, "Platinum 1 [67RR]");
    }

    #[tokio::test]
    async fn malformed_cached_payload_fails_the_same_on_every_read() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {"current_data": {"currenttierpatched": "Gold 2", "ranking_in_tier": "45"}}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let fetcher = fetcher(&server, Duration::from_secs(300));

        // The payload is stored before extraction, so the first failure
        // caches it; every later read must fail identically without a new
        // upstream call (verified by the expect(1) above).
        for _ in 0..3 {
            let err = fetcher.get_rank(Region::Eu, "Foo", "1234").await.unwrap_err();
            assert!(matches!(
                err,
                RankError::InvalidFieldType {
                    field: "ranking_in_tier"
                }
            ));
        }
    }

    #[tokio::test]
    async fn upstream_failure_leaves_cache_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .expect(2)
            .mount(&server)
            .await;

        let fetcher = fetcher(&server, Duration::from_secs(300));

        let err = fetcher.get_rank(Region::Eu, "Foo", "1234").await.unwrap_err();
        assert!(matches!(err, RankError::UpstreamStatus(503)));

        // Nothing cached — the second call goes upstream again.
        let err = fetcher.get_rank(Region::Eu, "Foo", "1234").await.unwrap_err();
        assert!(matches!(err, RankError::UpstreamStatus(503)));
    }

    #[tokio::test]
    async fn different_players_do_not_share_entries() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/mmr/eu/Foo/1234"))
            .respond_with(ResponseTemplate::new(200).set_body_json(gold_2_body()))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/mmr/eu/Bar/1234"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {"current_data": {"currenttierpatched": "Silver 1", "ranking_in_tier": 3.0}}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let fetcher = fetcher(&server, Duration::from_secs(300));

        let foo = fetcher.get_rank(Region::Eu, "Foo", "1234").await.unwrap();
        let bar = fetcher.get_rank(Region::Eu, "Bar", "1234").await.unwrap();

        assert_eq!(foo.message, "Gold 2 [45RR]");
        assert_eq!(bar.message, "Silver 1 [3RR]");
    }
}
