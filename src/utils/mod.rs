//! Browser utilities for the web shell.
//!
//! Provides:
//! - [`console`] - `log` records forwarded to the browser console
//! - [`dom`] - Safe access to window and element helpers
//! - [`fetch_text`] - Network fetching with timeout
//! - [`host`] - JavaScript host bridge and timer adapters

pub mod console;
pub mod dom;
mod fetch;
pub mod host;

pub use fetch::fetch_text;
