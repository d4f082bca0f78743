//! Main module for the Route Compare application using Yew.
//! Wires UI components, state hooks, and side-effect logic.

use gloo_timers::callback::Timeout;
use route_compare::{fetcher, Algorithm, ComputeAction, RequestState, SessionState};
use std::cell::RefCell;
use yew::prelude::*;

mod cache;
mod components;
mod config;

use components::{render_map, render_results, AlgorithmTabs, AlgorithmToggle, ErrorNotice};
use config::*;

thread_local! {
    /// Session-wide controller state. Lives outside the component tree the
    /// same way the result cache does, so async completions always see the
    /// state as it is now, not as it was when their fetch was issued.
    static SESSION: RefCell<SessionState> = RefCell::new(SessionState::new());
}

/// Helper to bump the version counter and trigger a UI re-render.
fn bump_version(version: &UseStateHandle<usize>) {
    version.set(version.wrapping_add(1));
}

/// Primary application component wiring state, effects, and UI elements.
#[function_component(App)]
fn app() -> Html {
    // Version counter tied to SESSION mutations; reading it below makes the
    // component re-render whenever a transition bumps it.
    let session_version = use_state(|| 0usize);

    // Dismissible error notification and its expiry timers.
    let notice = use_state(|| None::<String>);
    let notice_fading = use_state(|| false);
    let notice_timer = use_state(|| None::<Timeout>);
    let notice_fade_timer = use_state(|| None::<Timeout>);
    let startup_timer = use_state(|| None::<Timeout>);

    let show_notice = {
        let notice = notice.clone();
        let notice_fading = notice_fading.clone();
        let notice_timer = notice_timer.clone();
        let notice_fade_timer = notice_fade_timer.clone();
        Callback::from(move |message: String| {
            notice.set(Some(message));
            notice_fading.set(false);
            // A fade timer left over from a previous notice must not clear
            // this one.
            notice_fade_timer.set(None);

            // Visible for a fixed delay, then one more fade-out beat.
            let fading_setter = notice_fading.clone();
            let notice_setter = notice.clone();
            let fade_timer = notice_fade_timer.clone();
            let handle = Timeout::new(NOTICE_VISIBLE_MS, move || {
                fading_setter.set(true);
                let notice_setter = notice_setter.clone();
                let inner = Timeout::new(NOTICE_FADE_MS, move || {
                    notice_setter.set(None);
                });
                fade_timer.set(Some(inner));
            });
            notice_timer.set(Some(handle));
        })
    };

    let dismiss_notice = {
        let notice = notice.clone();
        let notice_timer = notice_timer.clone();
        let notice_fade_timer = notice_fade_timer.clone();
        Callback::from(move |_: ()| {
            // Dropping the handles cancels any pending expiry.
            notice_timer.set(None);
            notice_fade_timer.set(None);
            notice.set(None);
        })
    };

    // Compute request: cache short-circuit or a tagged fetch whose outcome
    // is dropped if a newer request supersedes it before it lands.
    let compute = {
        let session_version = session_version.clone();
        let show_notice = show_notice.clone();
        Callback::from(move |_: ()| {
            let action = SESSION.with(|s| {
                let mut session = s.borrow_mut();
                let cached = cache::lookup(session.current).is_some();
                session.request_compute(cached)
            });

            match action {
                ComputeAction::RenderCached => bump_version(&session_version),
                ComputeAction::Fetch {
                    algorithm,
                    generation,
                } => {
                    bump_version(&session_version);
                    let session_version = session_version.clone();
                    let show_notice = show_notice.clone();
                    wasm_bindgen_futures::spawn_local(async move {
                        match fetcher::fetch_route(algorithm).await {
                            Ok(result) => {
                                let applied = SESSION.with(|s| {
                                    s.borrow_mut().apply_success(generation, algorithm)
                                });
                                if applied {
                                    cache::store(algorithm, result);
                                    bump_version(&session_version);
                                }
                            }
                            Err(err) => {
                                let message = err.to_string();
                                let applied = SESSION.with(|s| {
                                    s.borrow_mut().apply_failure(
                                        generation,
                                        algorithm,
                                        message.clone(),
                                    )
                                });
                                if applied {
                                    show_notice.emit(message);
                                    bump_version(&session_version);
                                }
                            }
                        }
                    });
                }
            }
        })
    };

    let select = {
        let session_version = session_version.clone();
        Callback::from(move |algorithm: Algorithm| {
            SESSION.with(|s| s.borrow_mut().select(algorithm));
            bump_version(&session_version);
        })
    };

    // Trigger the first computation for the default algorithm shortly after
    // mount, as if the user had pressed the button.
    {
        let compute = compute.clone();
        let startup_timer = startup_timer.clone();
        use_effect_with((), move |_| {
            let handle = Timeout::new(STARTUP_COMPUTE_DELAY_MS, move || compute.emit(()));
            startup_timer.set(Some(handle));
        });
    }

    // Ensure re-render on session updates by reading session_version
    let _ = *session_version;
    let session = SESSION.with(|s| s.borrow().clone());
    let rendered = match &session.request {
        RequestState::Rendered(algorithm) => cache::lookup(*algorithm),
        _ => None,
    };
    let loading = matches!(session.request, RequestState::Loading(_));

    let button_class = match (session.current, loading) {
        (Algorithm::Dijkstra, false) => "button is-primary is-medium is-fullwidth",
        (Algorithm::Dijkstra, true) => "button is-primary is-medium is-fullwidth is-loading",
        (Algorithm::Astar, false) => "button is-danger is-medium is-fullwidth",
        (Algorithm::Astar, true) => "button is-danger is-medium is-fullwidth is-loading",
    };

    html! {
        <div class="container">
            <h1 class="title">{ "Route Compare" }</h1>
            <p class="subtitle">{ "Amizour to Bejaia, two ways" }</p>

            <AlgorithmToggle current={session.current} onselect={select.clone()} />
            <AlgorithmTabs current={session.current} onselect={select} />

            <button id="find-path-btn" class={button_class}
                onclick={compute.reform(|_: MouseEvent| ())}>
                { "Find Path" }
            </button>

            if let Some(message) = &*notice {
                <ErrorNotice message={message.clone()}
                    fading={*notice_fading}
                    ondismiss={dismiss_notice} />
            }

            <div class="map-area" id="map">
                { render_map(&session.request, rendered.as_ref()) }
            </div>

            if let Some(result) = &rendered {
                { render_results(result) }
            }
        </div>
    }
}

/// Entry point: installs the panic hook and starts the Yew renderer.
fn main() {
    console_error_panic_hook::set_once();
    yew::Renderer::<App>::new().render();
}
