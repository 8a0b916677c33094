//! Core logic for the terminal engine.
//!
//! This module provides:
//! - [`parser::tokenize`] for splitting command lines
//! - [`DirectoryGraph`] path resolution over the document store
//! - [`commands`] builtin dispatch for sandboxed sessions
//! - [`bridge`] host execution with a shadow working directory
//! - [`SessionCoordinator`] single-flight session state machine
//! - [`autocomplete`] and [`get_hint`] for tab completion

mod autocomplete;
pub mod bridge;
pub mod commands;
pub mod error;
mod filesystem;
pub mod history;
pub mod parser;
pub mod session;

pub use autocomplete::{AutocompleteResult, CompletionScope, autocomplete, get_hint};
pub use bridge::{Delay, HostBridge, NativeBridge};
pub use filesystem::DirectoryGraph;
pub use history::{CommandHistory, HistoryDirection};
pub use parser::tokenize;
pub use session::{
    Completion, Dispatch, Location, Mode, RemoteJob, Session, SessionCoordinator, SessionIdentity,
};
