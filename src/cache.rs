//! Thread-local cache for fetched route results.
//!
//! The cache persists across component re-renders for the life of the page,
//! one entry per [`Algorithm`]. Entries are never evicted or invalidated:
//! the service is deterministic per algorithm for the fixed start and end
//! points, so a repeated insert for the same key is a benign overwrite.

use route_compare::{Algorithm, RouteResult};
use std::cell::RefCell;
use std::collections::HashMap;

thread_local! {
    /// Global cache that survives component lifetimes.
    /// Thread-local to avoid synchronization overhead in WASM.
    static CACHE_STORE: RefCell<HashMap<Algorithm, RouteResult>> = RefCell::new(HashMap::new());
}

/// Pure lookup: the cached result for `algorithm`, if any.
pub fn lookup(algorithm: Algorithm) -> Option<RouteResult> {
    CACHE_STORE.with(|c| c.borrow().get(&algorithm).cloned())
}

/// Store `result` for `algorithm`.
pub fn store(algorithm: Algorithm, result: RouteResult) {
    CACHE_STORE.with(|c| c.borrow_mut().insert(algorithm, result));
}
