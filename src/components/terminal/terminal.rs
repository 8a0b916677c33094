//! Terminal view component.
//!
//! Transcript, command line, and the running indicator with an abandon control.

use leptos::prelude::*;

use crate::app::{AppContext, TerminalState};
use crate::components::terminal::{Input, Output};
use crate::core::{AutocompleteResult, HistoryDirection};
use crate::utils::dom;

stylance::import_crate_style!(css, "src/components/terminal/terminal.module.css");

#[component]
pub fn Terminal() -> impl IntoView {
    let Some(ctx) = use_context::<AppContext>() else {
        return view! { <div class=css::container>"terminal context missing"</div> }.into_any();
    };
    let terminal = ctx.terminal;
    let output_ref = NodeRef::<leptos::html::Div>::new();

    // Keep the newest line in view
    Effect::new(move || {
        terminal.transcript.track();
        if let Some(output) = output_ref.get() {
            dom::scroll_to_bottom(&output);
        }
    });

    let prompt = Signal::derive(move || terminal.prompt.get());
    let in_flight = Signal::derive(move || terminal.in_flight.get());
    let disabled = Signal::derive(move || !terminal.ready.get() || terminal.in_flight.get());

    let on_submit = Callback::new(move |line: String| terminal.submit(line));
    let on_history_nav = create_history_nav_callback(terminal);
    let on_autocomplete = create_autocomplete_callback(terminal);
    let on_get_hint = create_hint_callback(terminal);

    view! {
        <div class=css::container on:click=move |_| dom::focus_terminal_input()>
            <div node_ref=output_ref class=css::output>
                <For
                    each=move || terminal.transcript.get()
                    key=|line| line.id
                    children=|line| view! { <Output line=line /> }
                />
            </div>

            <Show when=move || in_flight.get() fallback=|| ()>
                <div class=css::running>
                    <span class=css::spinner>"running..."</span>
                    <button
                        class=css::abandon
                        on:click=move |ev| {
                            ev.stop_propagation();
                            terminal.abandon();
                        }
                    >
                        "abandon"
                    </button>
                </div>
            </Show>

            <div class=css::inputArea>
                <Input
                    prompt=prompt
                    disabled=disabled
                    on_submit=on_submit
                    on_history_nav=on_history_nav
                    on_autocomplete=on_autocomplete
                    on_get_hint=on_get_hint
                />
            </div>
        </div>
    }
    .into_any()
}

// ============================================================================
// Callback Factories
// ============================================================================

fn create_history_nav_callback(
    terminal: TerminalState,
) -> Callback<HistoryDirection, Option<String>> {
    Callback::new(move |direction| terminal.navigate_history(direction))
}

fn create_autocomplete_callback(terminal: TerminalState) -> Callback<String, AutocompleteResult> {
    Callback::new(move |input: String| terminal.autocomplete(&input))
}

fn create_hint_callback(terminal: TerminalState) -> Callback<String, Option<String>> {
    Callback::new(move |input: String| terminal.hint(&input))
}
