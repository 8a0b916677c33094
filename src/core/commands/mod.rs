//! Builtin command table and dispatch.
//!
//! This module provides:
//! - [`BUILTINS`], the closed table of sandboxed commands
//! - [`ShellContext`], the read-only view of a session a handler receives
//! - [`CommandResult`] for command execution results
//! - [`execute_command`] for dispatching an argument vector
//!
//! # Architecture
//!
//! Each builtin is one [`Builtin`] entry pairing a name with a typed
//! [`Handler`]. Lookup is case-insensitive on the command name only;
//! arguments are passed through untouched. Adding a command means adding a
//! handler in `execute.rs` and a row in [`BUILTINS`].

mod execute;
mod result;

pub use execute::execute_command;
pub use result::CommandResult;

use crate::core::DirectoryGraph;
use crate::models::NodeId;

/// Read-only session state visible to builtins.
#[derive(Clone, Copy, Debug)]
pub struct ShellContext<'a> {
    pub graph: &'a DirectoryGraph,
    pub cwd: &'a NodeId,
    pub home: &'a NodeId,
    /// Capitalized user name used to expand `~` in `pwd`
    pub display_name: &'a str,
    /// Shell name used in `command not found` messages
    pub shell_name: &'a str,
}

/// Typed handler signature shared by every builtin.
pub type Handler = fn(&ShellContext<'_>, &[String]) -> CommandResult;

/// A named entry in the builtin table.
#[derive(Clone, Copy)]
pub struct Builtin {
    pub name: &'static str,
    handler: Handler,
}

impl Builtin {
    /// Find a builtin by name, ignoring ASCII case.
    pub fn lookup(name: &str) -> Option<&'static Builtin> {
        BUILTINS.iter().find(|b| b.name.eq_ignore_ascii_case(name))
    }

    /// Get all builtin names for autocomplete.
    pub fn names() -> impl Iterator<Item = &'static str> {
        BUILTINS.iter().map(|b| b.name)
    }

    /// Run this builtin's handler.
    pub fn run(&self, ctx: &ShellContext<'_>, args: &[String]) -> CommandResult {
        (self.handler)(ctx, args)
    }
}

impl std::fmt::Debug for Builtin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Builtin").field(&self.name).finish()
    }
}

/// The sandboxed command table.
pub const BUILTINS: &[Builtin] = &[
    Builtin { name: "help", handler: execute::help },
    Builtin { name: "ls", handler: execute::ls },
    Builtin { name: "cd", handler: execute::cd },
    Builtin { name: "pwd", handler: execute::pwd },
    Builtin { name: "cat", handler: execute::cat },
    Builtin { name: "whoami", handler: execute::whoami },
    Builtin { name: "about", handler: execute::about },
    Builtin { name: "skills", handler: execute::skills },
    Builtin { name: "projects", handler: execute::projects },
    Builtin { name: "contact", handler: execute::contact },
    Builtin { name: "clear", handler: execute::clear },
];

// =============================================================================
// Tests
// =============================================================================
