//! Application configuration.
//!
//! Centralizes the constants used throughout the terminal engine.
//! Text assets are loaded at compile time using `include_str!`.
//! Per-session tunables live in [`SessionConfig`], which can be loaded from TOML.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::error::ConfigError;

// =============================================================================
// Text Assets (loaded at compile time)
// =============================================================================

/// Help text for `help` command.
pub const HELP_TEXT: &str = include_str!("../assets/text/help.txt");

/// Profile card for `whoami` command.
pub const PROFILE_TEXT: &str = include_str!("../assets/text/profile.txt");

/// Text for `about` command.
pub const ABOUT_TEXT: &str = include_str!("../assets/text/about.txt");

/// Text for `skills` command.
pub const SKILLS_TEXT: &str = include_str!("../assets/text/skills.txt");

/// Text for `projects` command.
pub const PROJECTS_TEXT: &str = include_str!("../assets/text/projects.txt");

/// Text for `contact` command.
pub const CONTACT_TEXT: &str = include_str!("../assets/text/contact.txt");

// =============================================================================
// Application Metadata
// =============================================================================

/// Hostname shown in the prompt of a sandboxed session.
pub const DEFAULT_HOSTNAME: &str = "desktop";

/// Username used when the embedding product does not supply one.
pub const DEFAULT_USERNAME: &str = "guest";

/// Shell name used in `command not found` messages.
pub const DEFAULT_SHELL_NAME: &str = "zsh";

// =============================================================================
// Filesystem Configuration
// =============================================================================

/// Default bound on ancestor walks when rendering a node path.
pub const DEFAULT_MAX_PATH_DEPTH: usize = 256;

/// Lowest accepted ancestor walk bound; smaller configured values are raised to this.
pub const MIN_PATH_DEPTH: usize = 20;

/// Prefix that presentation expands `~` to in `pwd` output.
pub const USERS_ROOT: &str = "/Users";

// =============================================================================
// Network Configuration
// =============================================================================

/// Default host bridge round trip timeout in milliseconds.
pub const DEFAULT_BRIDGE_TIMEOUT_MS: u64 = 30_000;

/// Fetch request timeout in milliseconds.
#[cfg(feature = "web")]
pub const FETCH_TIMEOUT_MS: i32 = 10000;

/// Location of the directory graph snapshot served alongside the app.
#[cfg(feature = "web")]
pub const GRAPH_URL: &str = "./graph.json";

/// Global object the host page installs when a native executor is attached.
#[cfg(feature = "web")]
pub const HOST_BRIDGE_GLOBAL: &str = "hostBridge";

// =============================================================================
// Terminal Configuration
// =============================================================================

/// Maximum number of command history entries to keep.
pub const MAX_COMMAND_HISTORY: usize = 100;

// =============================================================================
// Session Configuration
// =============================================================================

/// Per-session tunables.
///
/// Every field has a default, so a partial TOML document is valid:
///
/// ```toml
/// shell_name = "bash"
/// bridge_timeout_ms = 5000
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Name printed in `<shell>: command not found: <cmd>`.
    pub shell_name: String,
    /// Bound on ancestor walks when rendering paths.
    pub max_path_depth: usize,
    /// Host round trip timeout. `None` waits forever.
    pub bridge_timeout_ms: Option<u64>,
    /// Command history capacity.
    pub history_limit: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            shell_name: DEFAULT_SHELL_NAME.to_string(),
            max_path_depth: DEFAULT_MAX_PATH_DEPTH,
            bridge_timeout_ms: Some(DEFAULT_BRIDGE_TIMEOUT_MS),
            history_limit: MAX_COMMAND_HISTORY,
        }
    }
}

impl SessionConfig {
    /// Parse a TOML document, filling absent fields with defaults.
    pub fn from_toml(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        Ok(config)
    }

    /// Host round trip timeout, if any.
    pub fn bridge_timeout(&self) -> Option<Duration> {
        self.bridge_timeout_ms.map(Duration::from_millis)
    }

    /// Effective path depth bound after applying the floor.
    pub fn path_depth(&self) -> usize {
        self.max_path_depth.max(MIN_PATH_DEPTH)
    }

    pub fn with_bridge_timeout_ms(mut self, ms: Option<u64>) -> Self {
        self.bridge_timeout_ms = ms;
        self
    }

    pub fn with_shell_name(mut self, name: impl Into<String>) -> Self {
        self.shell_name = name.into();
        self
    }
}
