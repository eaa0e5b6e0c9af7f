use crate::api::endpoints::Endpoint;
use crate::api::upstream::{RawResponse, UpstreamClient};
use crate::error::FetchError;
use crate::models::stats::AggregateResponse;
use crate::services::normalize;
use chrono::{SecondsFormat, Utc};
use futures::future::join_all;
use serde_json::{json, Value};
use tracing::{info, warn};

pub struct StatsService {
    api: UpstreamClient,
}

impl StatsService {
    pub fn new() -> Self {
        Self::with_client(UpstreamClient::new())
    }

    pub fn with_client(api: UpstreamClient) -> Self {
        Self { api }
    }

    /// Fetches every endpoint concurrently and normalizes the results.
    ///
    /// All six fetches settle before anything is normalized; one upstream
    /// failing never cancels or fails the others.
    pub async fn collect(&self) -> AggregateResponse {
        info!("Collecting stats from {} upstream endpoints", Endpoint::ALL.len());

        let outcomes = join_all(Endpoint::ALL.into_iter().map(|endpoint| async move {
            let outcome = self.api.get_with_cache(endpoint.url()).await;
            (endpoint, materialize(outcome))
        }))
        .await;

        let mut raw: [Value; 6] = Default::default();
        for (slot, (endpoint, value)) in raw.iter_mut().zip(outcomes) {
            if let Some(error) = normalize::upstream_error(&value) {
                warn!("{} upstream failed: {}", endpoint.label(), error);
            }
            *slot = value;
        }
        let [cf_profile, cf_status, cf_rating, codechef, leetcode, geeksforgeeks] = raw;

        AggregateResponse {
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            codeforces: normalize::codeforces(&cf_profile, &cf_status, &cf_rating),
            codechef: normalize::codechef(&codechef),
            leetcode: normalize::leetcode(&leetcode),
            geeksforgeeks: normalize::geeksforgeeks(&geeksforgeeks),
        }
    }
}

impl Default for StatsService {
    fn default() -> Self {
        Self::new()
    }
}

/// Turns a settled fetch into a JSON value, folding every failure into an
/// `{ "error": ... }` object.
pub fn materialize(outcome: Result<RawResponse, FetchError>) -> Value {
    let failure = match outcome {
        Ok(response) if response.is_ok() => match response.json() {
            Ok(value) => return value,
            Err(e) => e,
        },
        Ok(response) => FetchError::Status(response.status),
        Err(e) => e,
    };
    json!({ "error": failure.to_string() })
}
