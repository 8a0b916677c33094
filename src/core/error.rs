//! Error types for the terminal engine.
//!
//! Path resolution failures and unknown commands never appear here: they are
//! recovered inside the dispatcher as transcript lines. These types cover the
//! conditions that cross a component boundary:
//!
//! - [`GraphError`] - malformed directory graph snapshots
//! - [`BridgeError`] - host bridge transport and liveness failures
//! - [`SessionError`] - session setup and submission rejections
//! - [`ConfigError`] - session configuration loading
//! - [`FetchError`] - browser fetch failures (graph provider download)

use thiserror::Error;

use crate::models::NodeId;

/// Directory graph construction errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("duplicate node id: {0}")]
    DuplicateId(NodeId),
    #[error("unknown node: {0}")]
    UnknownNode(NodeId),
    #[error("node {0} is not a directory")]
    NotADirectory(NodeId),
    #[error("graph has no root directory")]
    MissingRoot,
    #[error("invalid graph document: {0}")]
    Parse(String),
}

/// Host bridge failures.
///
/// These are engine-level conditions. A remote command that runs and exits
/// non-zero is not a `BridgeError`; its stderr is ordinary output.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BridgeError {
    #[error("host bridge unavailable")]
    Unavailable,
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("no response from host after {0} ms")]
    Timeout(u64),
    #[error("command abandoned; its result will be discarded")]
    Abandoned,
    #[error("host identity unavailable: {0}")]
    Identity(String),
}

/// Session setup and submission errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// A command is already in flight; the submission was dropped.
    #[error("a command is already running")]
    Busy,
    #[error("operation requires a sandboxed session")]
    NotSandboxed,
    #[error(transparent)]
    Graph(#[from] GraphError),
    #[error(transparent)]
    Bridge(#[from] BridgeError),
}

/// Session configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid session config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Network/fetch-related errors for HTTP requests.
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    #[error("Browser window not available")]
    NoWindow,
    #[error("Failed to create request")]
    RequestCreationFailed,
    /// Network request failed (CORS, offline, ...)
    #[error("Network error: {0}")]
    NetworkError(String),
    #[error("HTTP error: {0}")]
    HttpError(u16),
    #[error("Failed to read response")]
    ResponseReadFailed,
    #[error("Invalid response content")]
    InvalidContent,
    #[error("Request timed out")]
    Timeout,
}
