//! Terminal session engine for a browser desktop.
//!
//! A terminal runs either sandboxed, over a read-only directory graph from the
//! document store, or bridged, forwarding lines to a native host executor.
//! The engine (`config`, `core`, `models`) has no browser dependency; the
//! Leptos presentation is behind the `web` feature.

pub mod config;
pub mod core;
pub mod models;

#[cfg(feature = "web")]
pub mod app;
#[cfg(feature = "web")]
pub mod components;
#[cfg(feature = "web")]
pub mod utils;
