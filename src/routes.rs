use std::{any::Any, panic::AssertUnwindSafe, sync::Arc};

use axum::{
    extract::State,
    http::{
        header::{
            ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
            ACCESS_CONTROL_ALLOW_ORIGIN, CACHE_CONTROL, ORIGIN, VARY,
        },
        HeaderMap, HeaderValue, Method, StatusCode,
    },
    response::{IntoResponse, Response},
    routing::any,
    Json, Router,
};
use futures::FutureExt;
use tracing::{debug, error};

use crate::{config::allowed_origins, error::AppError, services::stats_service::StatsService};

pub const STATS_PATH: &str = "/api/getStats";

/// Fresh at the edge for 15 minutes, servable stale for a day while revalidating.
const EDGE_CACHE_POLICY: &str = "s-maxage=900, stale-while-revalidate=86400";

pub struct AppState {
    pub service: StatsService,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(STATS_PATH, any(stats_handler))
        .with_state(state)
}

/// `OPTIONS` answers the pre-flight without touching upstreams; every other
/// method runs the aggregation.
pub async fn stats_handler(
    State(state): State<Arc<AppState>>,
    method: Method,
    headers: HeaderMap,
) -> Response {
    let origin = headers.get(ORIGIN).and_then(|o| o.to_str().ok());
    let cors = cors_headers(origin, &allowed_origins());

    if method == Method::OPTIONS {
        debug!("Pre-flight from {:?}", origin);
        return (StatusCode::NO_CONTENT, cors).into_response();
    }

    let mut response = match AssertUnwindSafe(state.service.collect())
        .catch_unwind()
        .await
    {
        Ok(aggregate) => (StatusCode::OK, Json(aggregate)).into_response(),
        Err(panic) => {
            let e = AppError::Internal(panic_message(panic.as_ref()));
            error!("Stats aggregation failed: {}", e);
            e.into_response()
        }
    };

    let response_headers = response.headers_mut();
    response_headers.extend(cors);
    response_headers.insert(CACHE_CONTROL, HeaderValue::from_static(EDGE_CACHE_POLICY));
    response
}

/// Echoes an allow-listed origin; anything else gets no allow-origin header.
pub fn cors_headers(origin: Option<&str>, allowed: &[String]) -> HeaderMap {
    let mut headers = HeaderMap::new();

    if let Some(origin) = origin.filter(|o| allowed.iter().any(|a| a == o)) {
        if let Ok(value) = HeaderValue::from_str(origin) {
            headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, value);
            headers.insert(VARY, HeaderValue::from_static("Origin"));
        }
    }
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET,OPTIONS"),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type"),
    );
    headers
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        String::new()
    }
}
