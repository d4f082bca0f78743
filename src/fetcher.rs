//! Network collaborator for the path-computation service.
//!
//! One request, one typed outcome: success parses into [`RouteResult`],
//! everything else collapses into [`RouteError`]. Retry policy, if any,
//! belongs to the caller.

use crate::{Algorithm, RouteError, RouteResult};
use futures::{pin_mut, select, FutureExt};
use gloo_net::http::Request;
use gloo_timers::future::TimeoutFuture;
use log::debug;
use serde::Serialize;

/// Endpoint of the external route-computation service.
pub const FIND_PATH_URL: &str = "/find_path";

/// Upper bound on how long a single computation may take before the client
/// gives up on the response.
pub const FETCH_TIMEOUT_MS: u32 = 30_000;

/// Request body for `POST /find_path`.
#[derive(Serialize)]
struct FindPathBody {
    algorithm: Algorithm,
}

/// Extract the display message from a failed response body.
///
/// The service reports failures as `{"error": "..."}`; a missing field or a
/// non-JSON body falls back to a generic message.
pub fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("error")
                .and_then(|e| e.as_str())
                .map(str::to_owned)
        })
        .unwrap_or_else(|| "Server error".to_owned())
}

async fn send_request(algorithm: Algorithm) -> Result<RouteResult, RouteError> {
    let request = Request::post(FIND_PATH_URL)
        .json(&FindPathBody { algorithm })
        .map_err(|e| RouteError::Transport(e.to_string()))?;

    let response = request
        .send()
        .await
        .map_err(|e| RouteError::Transport(e.to_string()))?;

    if !response.ok() {
        let body = response.text().await.unwrap_or_default();
        return Err(RouteError::Service(error_message(&body)));
    }

    response
        .json::<RouteResult>()
        .await
        .map_err(|e| RouteError::Transport(e.to_string()))
}

/// Ask the service to compute a route with `algorithm`.
///
/// Suspends the caller until the response arrives or [`FETCH_TIMEOUT_MS`]
/// elapses; a timed-out computation surfaces as `Service("timeout")`. A
/// single failed attempt is reported immediately, without retrying.
pub async fn fetch_route(algorithm: Algorithm) -> Result<RouteResult, RouteError> {
    debug!("requesting route for {}", algorithm);

    let fetch = send_request(algorithm).fuse();
    let deadline = TimeoutFuture::new(FETCH_TIMEOUT_MS).fuse();
    pin_mut!(fetch, deadline);

    select! {
        outcome = fetch => outcome,
        _ = deadline => Err(RouteError::Service("timeout".to_owned())),
    }
}
