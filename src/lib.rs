use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The two route-computation strategies the external service exposes.
///
/// The set is closed: the service knows nothing else, so any other wire
/// value is a deserialization error rather than a recoverable condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    Dijkstra,
    Astar,
}

impl Algorithm {
    pub const ALL: [Algorithm; 2] = [Algorithm::Dijkstra, Algorithm::Astar];

    /// Wire identifier used in the `/find_path` request body.
    pub fn as_str(&self) -> &'static str {
        match self {
            Algorithm::Dijkstra => "dijkstra",
            Algorithm::Astar => "astar",
        }
    }

    /// Human-readable name shown while a computation is in flight.
    pub fn label(&self) -> &'static str {
        match self {
            Algorithm::Dijkstra => "Dijkstra's Algorithm",
            Algorithm::Astar => "A* Algorithm",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A computed route as returned by the path service.
///
/// `map_html` is opaque renderable markup; the remaining fields are the
/// summary statistics shown next to the map. Immutable once received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteResult {
    pub map_html: String,
    pub distance: f64,
    pub algorithm: String,
    pub nodes: u32,
}

// Error type for route requests
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    /// The service answered with a non-success status or an unparsable body.
    Service(String),
    /// The request never completed (network failure, malformed transport).
    Transport(String),
}

impl fmt::Display for RouteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Both variants display as their message only; the distinction
        // matters to callers, not to the user.
        match self {
            RouteError::Service(msg) | RouteError::Transport(msg) => f.write_str(msg),
        }
    }
}

impl std::error::Error for RouteError {}

/// The single active request slot of the controller.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestState {
    Idle,
    Loading(Algorithm),
    Rendered(Algorithm),
    Failed(Algorithm, String),
}

/// What the caller must do after [`SessionState::request_compute`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComputeAction {
    /// The cached result for the current algorithm is already on screen;
    /// re-render it without touching the network.
    RenderCached,
    /// Issue one network call, tagged so a late response can be recognized
    /// as stale and dropped.
    Fetch {
        algorithm: Algorithm,
        generation: u64,
    },
}

/// Consolidated controller state: algorithm selection, request slot, and the
/// staleness token for in-flight fetches.
///
/// All UI-facing behavior is driven through the transition methods below, so
/// the machine can be exercised without a rendering surface. The result
/// cache itself lives outside; callers pass in whether the current algorithm
/// is cached and store successful results themselves.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    /// Currently selected algorithm; always defined.
    pub current: Algorithm,
    /// The algorithm whose result was rendered last, if any. Only ever set
    /// right after a successful render of `current`'s result.
    pub last_rendered: Option<Algorithm>,
    pub request: RequestState,
    generation: u64,
}

impl SessionState {
    pub fn new() -> Self {
        SessionState {
            current: Algorithm::Dijkstra,
            last_rendered: None,
            request: RequestState::Idle,
            generation: 0,
        }
    }

    /// Change the selected algorithm. Idempotent if already selected; has no
    /// consequence beyond restyling until a computation is requested.
    pub fn select(&mut self, algorithm: Algorithm) {
        self.current = algorithm;
    }

    /// Handle a compute request for the currently selected algorithm.
    ///
    /// Cache reuse is deliberately gated on "is this still the last-rendered
    /// algorithm", not merely "is this cached": switching away and back to a
    /// cached-but-not-displayed algorithm re-fetches. `cached` is the
    /// caller's cache lookup for `self.current`.
    pub fn request_compute(&mut self, cached: bool) -> ComputeAction {
        let algorithm = self.current;
        if cached && self.last_rendered == Some(algorithm) {
            debug!("cache hit for {}, skipping fetch", algorithm);
            self.request = RequestState::Rendered(algorithm);
            return ComputeAction::RenderCached;
        }

        // Bumping the generation invalidates every response still in flight.
        self.generation += 1;
        self.request = RequestState::Loading(algorithm);
        debug!("fetching {} (generation {})", algorithm, self.generation);
        ComputeAction::Fetch {
            algorithm,
            generation: self.generation,
        }
    }

    /// Apply a successful fetch outcome. Returns `false` when the outcome is
    /// stale and was discarded; the caller must then drop the result as well.
    pub fn apply_success(&mut self, generation: u64, algorithm: Algorithm) -> bool {
        if !self.is_live(generation) {
            warn!("discarding stale result for {}", algorithm);
            return false;
        }
        self.last_rendered = Some(algorithm);
        self.request = RequestState::Rendered(algorithm);
        true
    }

    /// Apply a failed fetch outcome. A failed attempt never becomes the
    /// displayed algorithm: `last_rendered` is left untouched. Returns
    /// `false` when the outcome is stale and was discarded.
    pub fn apply_failure(&mut self, generation: u64, algorithm: Algorithm, message: String) -> bool {
        if !self.is_live(generation) {
            warn!("discarding stale error for {}: {}", algorithm, message);
            return false;
        }
        self.request = RequestState::Failed(algorithm, message);
        true
    }

    /// A fetch outcome only applies while its request is still the one the
    /// user is waiting on. The `Loading` check matters on its own: a cache
    /// short-circuit does not bump the generation, yet it must still bury
    /// any response left in flight.
    fn is_live(&self, generation: u64) -> bool {
        self.generation == generation && matches!(self.request, RequestState::Loading(_))
    }
}

impl Default for SessionState {
    fn default() -> Self {
        SessionState::new()
    }
}

pub mod fetcher;

#[cfg(test)]
mod tests {
    use super::*;

    /// Drive one successful compute for the currently selected algorithm.
    fn complete_fetch(state: &mut SessionState, cached: bool) {
        match state.request_compute(cached) {
            ComputeAction::Fetch {
                algorithm,
                generation,
            } => assert!(state.apply_success(generation, algorithm)),
            ComputeAction::RenderCached => panic!("expected a fetch"),
        }
    }

    #[test]
    fn starts_idle_with_dijkstra_selected() {
        let state = SessionState::new();
        assert_eq!(state.current, Algorithm::Dijkstra);
        assert_eq!(state.last_rendered, None);
        assert_eq!(state.request, RequestState::Idle);
    }

    #[test]
    fn uncached_compute_issues_one_fetch() {
        let mut state = SessionState::new();
        let action = state.request_compute(false);
        assert_eq!(
            action,
            ComputeAction::Fetch {
                algorithm: Algorithm::Dijkstra,
                generation: 1,
            }
        );
        assert_eq!(state.request, RequestState::Loading(Algorithm::Dijkstra));
    }

    #[test]
    fn success_marks_last_rendered() {
        let mut state = SessionState::new();
        complete_fetch(&mut state, false);
        assert_eq!(state.last_rendered, Some(Algorithm::Dijkstra));
        assert_eq!(state.request, RequestState::Rendered(Algorithm::Dijkstra));
    }

    #[test]
    fn rerequest_of_rendered_algorithm_short_circuits() {
        let mut state = SessionState::new();
        complete_fetch(&mut state, false);

        // Re-selecting the same algorithm and computing again reuses the
        // cached result without a network call.
        state.select(Algorithm::Dijkstra);
        assert_eq!(state.request_compute(true), ComputeAction::RenderCached);
        assert_eq!(state.request, RequestState::Rendered(Algorithm::Dijkstra));
    }

    #[test]
    fn cached_but_not_last_rendered_refetches() {
        let mut state = SessionState::new();
        complete_fetch(&mut state, false); // dijkstra rendered
        state.select(Algorithm::Astar);
        complete_fetch(&mut state, false); // astar rendered

        // Dijkstra is cached, but astar is the last-rendered algorithm, so
        // the gating rule demands a fresh fetch.
        state.select(Algorithm::Dijkstra);
        assert!(matches!(
            state.request_compute(true),
            ComputeAction::Fetch {
                algorithm: Algorithm::Dijkstra,
                ..
            }
        ));
    }

    #[test]
    fn short_circuit_applies_after_both_algorithms_rendered() {
        let mut state = SessionState::new();
        complete_fetch(&mut state, false);
        state.select(Algorithm::Astar);
        complete_fetch(&mut state, false);

        // Astar is both cached and last rendered.
        assert_eq!(state.request_compute(true), ComputeAction::RenderCached);
    }

    #[test]
    fn late_response_for_abandoned_algorithm_is_discarded() {
        let mut state = SessionState::new();
        complete_fetch(&mut state, false); // dijkstra rendered and cached

        // Switch to astar and start a fetch...
        state.select(Algorithm::Astar);
        let ComputeAction::Fetch {
            algorithm,
            generation,
        } = state.request_compute(false)
        else {
            panic!("expected a fetch");
        };

        // ...then switch back to dijkstra, whose cached result short-circuits.
        state.select(Algorithm::Dijkstra);
        assert_eq!(state.request_compute(true), ComputeAction::RenderCached);

        // Astar's response arrives late and must not overwrite the UI.
        assert!(!state.apply_success(generation, algorithm));
        assert_eq!(state.request, RequestState::Rendered(Algorithm::Dijkstra));
        assert_eq!(state.last_rendered, Some(Algorithm::Dijkstra));
    }

    #[test]
    fn newer_request_preempts_in_flight_fetch() {
        let mut state = SessionState::new();
        let ComputeAction::Fetch {
            algorithm: first_algorithm,
            generation: first_generation,
        } = state.request_compute(false)
        else {
            panic!("expected a fetch");
        };

        state.select(Algorithm::Astar);
        let second = state.request_compute(false);

        // The superseded outcome is dropped, the newer one applies.
        assert!(!state.apply_success(first_generation, first_algorithm));
        let ComputeAction::Fetch {
            algorithm,
            generation,
        } = second
        else {
            panic!("expected a fetch");
        };
        assert!(state.apply_success(generation, algorithm));
        assert_eq!(state.request, RequestState::Rendered(Algorithm::Astar));
        assert_eq!(state.last_rendered, Some(Algorithm::Astar));
    }

    #[test]
    fn failure_keeps_last_rendered_and_allows_retry() {
        let mut state = SessionState::new();
        let ComputeAction::Fetch {
            algorithm,
            generation,
        } = state.request_compute(false)
        else {
            panic!("expected a fetch");
        };
        assert!(state.apply_failure(generation, algorithm, "no route found".into()));
        assert_eq!(
            state.request,
            RequestState::Failed(Algorithm::Dijkstra, "no route found".into())
        );
        assert_eq!(state.last_rendered, None);

        // An immediate retry starts a fresh attempt with a newer generation.
        assert!(matches!(
            state.request_compute(false),
            ComputeAction::Fetch { generation: 2, .. }
        ));
    }

    #[test]
    fn stale_failure_is_discarded() {
        let mut state = SessionState::new();
        let ComputeAction::Fetch { generation, .. } = state.request_compute(false) else {
            panic!("expected a fetch");
        };

        // A second request supersedes the first before it fails.
        let _ = state.request_compute(false);
        assert!(!state.apply_failure(generation, Algorithm::Dijkstra, "timeout".into()));
        assert_eq!(state.request, RequestState::Loading(Algorithm::Dijkstra));
    }

    #[test]
    fn select_is_idempotent() {
        let mut state = SessionState::new();
        state.select(Algorithm::Astar);
        state.select(Algorithm::Astar);
        assert_eq!(state.current, Algorithm::Astar);
        assert_eq!(state.request, RequestState::Idle);
    }

    #[test]
    fn algorithm_wire_form_is_lowercase() {
        assert_eq!(
            serde_json::to_string(&Algorithm::Dijkstra).unwrap(),
            "\"dijkstra\""
        );
        assert_eq!(
            serde_json::to_string(&Algorithm::Astar).unwrap(),
            "\"astar\""
        );
        assert_eq!(
            serde_json::from_str::<Algorithm>("\"astar\"").unwrap(),
            Algorithm::Astar
        );
        assert!(serde_json::from_str::<Algorithm>("\"bfs\"").is_err());
    }

    #[test]
    fn route_result_parses_service_payload() {
        // Extra fields such as `path_simplified` are ignored.
        let payload = r#"{
            "map_html": "<div>...</div>",
            "distance": 12.5,
            "algorithm": "Dijkstra",
            "nodes": 37,
            "path_simplified": [[36.64, 4.9], [36.75, 5.05]]
        }"#;
        let result: RouteResult = serde_json::from_str(payload).unwrap();
        assert_eq!(result.map_html, "<div>...</div>");
        assert_eq!(result.distance, 12.5);
        assert_eq!(result.algorithm, "Dijkstra");
        assert_eq!(result.nodes, 37);
    }
}
