//! Data models and types for the terminal engine.
//!
//! Contains domain types for:
//! - [`DirectoryGraphNode`], [`NodeId`], [`NodeKind`] - Document store directory graph
//! - [`HostIdentity`], [`ExecRequest`], [`ExecResponse`] - Host bridge wire types
//! - [`OutputLine`] - Terminal transcript lines

mod graph;
mod host;
mod terminal;

pub use graph::{DirectoryGraphNode, NodeId, NodeKind};
pub use host::{ExecRequest, ExecResponse, HostIdentity};
pub use terminal::{OutputLine, OutputLineData, TextStyle};
