//! Root application module.
//!
//! Contains the main App component, AppContext definition, TerminalState,
//! and the session bootstrap (graph download and host bridge detection).

use std::sync::Arc;

use leptos::prelude::*;
use log::{debug, error, info, warn};

use crate::components::Terminal;
use crate::config::{DEFAULT_HOSTNAME, DEFAULT_USERNAME, GRAPH_URL, SessionConfig};
use crate::core::error::GraphError;
use crate::core::{
    AutocompleteResult, DirectoryGraph, Dispatch, HistoryDirection, SessionCoordinator,
    SessionIdentity,
};
use crate::models::{DirectoryGraphNode, OutputLine};
use crate::utils::{fetch_text, host};

// ============================================================================
// TerminalState
// ============================================================================

/// Reactive handle on a terminal session.
///
/// The [`SessionCoordinator`] lives in a local [`StoredValue`] and is the
/// single source of truth. The signals are read-only mirrors refreshed after
/// every mutation so the view can track them.
///
/// # Note
///
/// This struct is `Copy` because every field is an arena handle.
#[derive(Clone, Copy)]
pub struct TerminalState {
    coordinator: StoredValue<Option<SessionCoordinator>, LocalStorage>,
    /// Transcript mirror.
    pub transcript: RwSignal<Vec<OutputLine>>,
    /// Prompt mirror: `<user>@<host> <path> $ `.
    pub prompt: RwSignal<String>,
    /// Whether a host command is outstanding.
    pub in_flight: RwSignal<bool>,
    /// Whether a session has been attached.
    pub ready: RwSignal<bool>,
}

impl TerminalState {
    pub fn new() -> Self {
        Self {
            coordinator: StoredValue::new_local(None),
            transcript: RwSignal::new(Vec::new()),
            prompt: RwSignal::new(String::new()),
            in_flight: RwSignal::new(false),
            ready: RwSignal::new(false),
        }
    }

    /// Install a started session.
    pub fn attach(&self, coordinator: SessionCoordinator) {
        self.coordinator.set_value(Some(coordinator));
        self.ready.set(true);
        self.sync();
    }

    /// Refresh the signal mirrors from the coordinator.
    fn sync(&self) {
        let snapshot = self.coordinator.with_value(|c| {
            c.as_ref()
                .map(|c| (c.transcript().to_vec(), c.prompt(), c.is_in_flight()))
        });
        if let Some((transcript, prompt, in_flight)) = snapshot {
            self.transcript.set(transcript);
            self.prompt.set(prompt);
            self.in_flight.set(in_flight);
        }
    }

    /// Submit a line.
    ///
    /// Host round trips run on the local executor; the coordinator is only
    /// borrowed before and after the await.
    pub fn submit(&self, line: String) {
        let dispatch = self
            .coordinator
            .try_update_value(|c| c.as_mut().map(|c| c.begin(&line)))
            .flatten();

        match dispatch {
            Some(Ok(Dispatch::Done)) => self.sync(),
            Some(Ok(Dispatch::Remote(job))) => {
                self.sync();
                let state = *self;
                wasm_bindgen_futures::spawn_local(async move {
                    let completion = job.run().await;
                    state.coordinator.update_value(|c| {
                        if let Some(c) = c.as_mut() {
                            c.complete(completion);
                        }
                    });
                    state.sync();
                });
            }
            Some(Err(e)) => debug!("submission rejected: {}", e),
            None => debug!("no session attached yet"),
        }
    }

    /// Release a stuck host command.
    pub fn abandon(&self) {
        self.coordinator.update_value(|c| {
            if let Some(c) = c.as_mut() {
                c.abandon();
            }
        });
        self.sync();
    }

    pub fn navigate_history(&self, direction: HistoryDirection) -> Option<String> {
        self.coordinator
            .try_update_value(|c| c.as_mut().and_then(|c| c.navigate_history(direction)))
            .flatten()
    }

    pub fn autocomplete(&self, input: &str) -> AutocompleteResult {
        self.coordinator
            .with_value(|c| c.as_ref().map(|c| c.autocomplete(input)))
            .unwrap_or(AutocompleteResult::None)
    }

    pub fn hint(&self, input: &str) -> Option<String> {
        self.coordinator
            .with_value(|c| c.as_ref().and_then(|c| c.hint(input)))
    }
}

impl Default for TerminalState {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// AppContext
// ============================================================================

/// Application-wide reactive context.
///
/// Provided at the root of the component tree and accessed from children
/// with `use_context::<AppContext>()`.
#[derive(Clone, Copy)]
pub struct AppContext {
    pub terminal: TerminalState,
}

impl AppContext {
    pub fn new() -> Self {
        Self {
            terminal: TerminalState::new(),
        }
    }
}

impl Default for AppContext {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Session Bootstrap
// ============================================================================

/// Download the directory graph, falling back to an empty home.
async fn load_graph() -> Result<DirectoryGraph, GraphError> {
    match fetch_text(GRAPH_URL).await {
        Ok(text) => match DirectoryGraph::from_json(&text) {
            Ok(graph) => return Ok(graph),
            Err(e) => warn!("directory graph rejected: {}", e),
        },
        Err(e) => warn!("directory graph unavailable: {}", e),
    }
    DirectoryGraph::from_nodes(vec![DirectoryGraphNode::directory(
        "home",
        DEFAULT_USERNAME,
        None,
    )])
}

/// Start a session and attach it to the terminal.
///
/// The graph provider returns the active user's subtree, so its root is home.
async fn start_session(terminal: TerminalState) {
    let graph = match load_graph().await {
        Ok(graph) => graph,
        Err(e) => {
            error!("could not build a directory graph: {}", e);
            return;
        }
    };
    let home = graph.root().clone();
    let identity = SessionIdentity::new(DEFAULT_USERNAME, DEFAULT_HOSTNAME);

    match SessionCoordinator::start(
        Arc::new(graph),
        home,
        identity,
        host::detect(),
        SessionConfig::default(),
    )
    .await
    {
        Ok(coordinator) => {
            info!("session started in {:?} mode", coordinator.mode());
            terminal.attach(coordinator);
        }
        Err(e) => error!("could not start terminal session: {}", e),
    }
}

// ============================================================================
// App
// ============================================================================

/// Root application component with error boundary.
///
/// This component:
/// - Creates and provides the global AppContext
/// - Starts the terminal session
/// - Renders the Terminal inside an ErrorBoundary
#[component]
pub fn App() -> impl IntoView {
    let ctx = AppContext::new();
    provide_context(ctx);

    wasm_bindgen_futures::spawn_local(start_session(ctx.terminal));

    view! {
        <ErrorBoundary
            fallback=|errors| view! {
                <div style="
                    display: flex;
                    flex-direction: column;
                    align-items: center;
                    justify-content: center;
                    height: 100vh;
                    background: #0a0e27;
                    color: #e0e0e0;
                    font-family: 'Courier New', monospace;
                ">
                    <h1 style="color: #ff6b6b;">"Terminal crashed"</h1>
                    <ul style="color: #ff6b6b; font-size: 0.9rem;">
                        {move || errors.get()
                            .into_iter()
                            .map(|(_, e)| view! { <li>{e.to_string()}</li> })
                            .collect::<Vec<_>>()
                        }
                    </ul>
                </div>
            }
        >
            <Terminal />
        </ErrorBoundary>
    }
}
