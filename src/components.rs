//! Pure Yew view components for the Route Compare UI.
//!
//! Stateless pieces that render from props or plain references, keeping the
//! request state machine free of any rendering concern.

use route_compare::{Algorithm, RequestState, RouteResult};
use yew::prelude::*;

/// Renders the summary statistics panel for a computed route.
pub fn render_results(result: &RouteResult) -> Html {
    html! {
        <div class="path-info" id="path-info">
            <div class="path-stat">
                <span class="stat-label">{ "Distance: " }</span>
                <span class="stat-value" id="distance-value">{ result.distance.to_string() }</span>
            </div>
            <div class="path-stat">
                <span class="stat-label">{ "Algorithm: " }</span>
                <span class="stat-value" id="algorithm-value">{ result.algorithm.clone() }</span>
            </div>
            <div class="path-stat">
                <span class="stat-label">{ "Nodes explored: " }</span>
                <span class="stat-value" id="nodes-value">{ result.nodes.to_string() }</span>
            </div>
        </div>
    }
}

/// Renders the map area for the given request state.
///
/// `result` is the cached result for the rendered algorithm, when there is
/// one; the map markup it carries is injected verbatim.
pub fn render_map(request: &RequestState, result: Option<&RouteResult>) -> Html {
    match request {
        RequestState::Idle => html! {
            <div class="has-text-centered initial-map-message">
                <p class="is-size-5">{ "Pick an algorithm and find a path." }</p>
            </div>
        },
        RequestState::Loading(algorithm) => html! {
            <div class="has-text-centered initial-map-message">
                <div class="loading-container">
                    <div class="loading-spinner"></div>
                    <div class="loading-text">
                        <p class="is-size-5 mb-2">{ "Calculating optimal route with" }</p>
                        <p class="is-size-4 has-text-weight-bold">{ algorithm.label() }</p>
                    </div>
                </div>
            </div>
        },
        RequestState::Rendered(_) => match result {
            Some(r) => Html::from_html_unchecked(AttrValue::from(r.map_html.clone())),
            None => html! {
                <div class="has-text-centered initial-map-message">
                    <p class="is-size-5">{ "No map available" }</p>
                </div>
            },
        },
        RequestState::Failed(_, message) => html! {
            <div class="has-text-centered initial-map-message">
                <div class="notification is-danger is-light">
                    <p class="is-size-5">{ "Error calculating path" }</p>
                    <p class="is-size-6 mt-2">{ message.clone() }</p>
                </div>
            </div>
        },
    }
}

/// Shared props for the two equivalent algorithm-selection affordances.
#[derive(Properties, PartialEq)]
pub struct SelectorProps {
    pub current: Algorithm,
    pub onselect: Callback<Algorithm>,
}

/// Toggle-style algorithm selector; always mirrors [`SelectorProps::current`].
#[function_component(AlgorithmToggle)]
pub fn algorithm_toggle(props: &SelectorProps) -> Html {
    html! {
        <div class="algorithm-toggle-group">
            { for Algorithm::ALL.into_iter().map(|algorithm| {
                let onclick = props.onselect.reform(move |_: MouseEvent| algorithm);
                let inner_class = if props.current == algorithm {
                    "algorithm-toggle-inner is-active"
                } else {
                    "algorithm-toggle-inner"
                };
                html! {
                    <button class="algorithm-toggle" {onclick}>
                        <span class={inner_class}>{ algorithm.label() }</span>
                    </button>
                }
            }) }
        </div>
    }
}

/// Tab-style algorithm selector, equivalent to [`AlgorithmToggle`].
#[function_component(AlgorithmTabs)]
pub fn algorithm_tabs(props: &SelectorProps) -> Html {
    html! {
        <div class="tabs is-toggle">
            <ul>
                { for Algorithm::ALL.into_iter().map(|algorithm| {
                    let onclick = props.onselect.reform(move |_: MouseEvent| algorithm);
                    let class = if props.current == algorithm { "is-active" } else { "" };
                    html! {
                        <li {class}>
                            <a {onclick}>{ algorithm.label() }</a>
                        </li>
                    }
                }) }
            </ul>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct ErrorNoticeProps {
    pub message: String,
    pub fading: bool,
    pub ondismiss: Callback<()>,
}

/// Dismissible error notification; fades out shortly before removal.
#[function_component(ErrorNotice)]
pub fn error_notice(props: &ErrorNoticeProps) -> Html {
    let class = if props.fading {
        "notification is-danger is-light animate__animated animate__fadeOut"
    } else {
        "notification is-danger is-light animate__animated animate__fadeIn"
    };
    let onclick = props.ondismiss.reform(|_: MouseEvent| ());
    html! {
        <div {class}>
            <button class="delete" {onclick}></button>
            { props.message.clone() }
        </div>
    }
}
