//! Tab autocomplete for builtin names and graph paths.
//!
//! This module provides completion for:
//! - Command names (e.g., "cl" -> "clear")
//! - Directory paths for `cd`, `ls`
//! - Any node path for `cat`
//!
//! The autocomplete system supports:
//! - Single match: Complete immediately
//! - Multiple matches: Show common prefix and all options
//! - Ghost text hints while typing

use crate::core::DirectoryGraph;
use crate::core::commands::Builtin;
use crate::models::NodeId;

// ============================================================================
// Public Types
// ============================================================================

/// Result of an autocomplete attempt.
#[derive(Clone, Debug, PartialEq)]
pub enum AutocompleteResult {
    /// Single exact match - complete with this value.
    Single(String),
    /// Multiple matches - (common_prefix, all_matches).
    Multiple(String, Vec<String>),
    /// No matches found.
    None,
}

/// Graph position completion runs against.
#[derive(Clone, Copy, Debug)]
pub struct CompletionScope<'a> {
    pub graph: &'a DirectoryGraph,
    pub cwd: &'a NodeId,
    pub home: &'a NodeId,
}

// ============================================================================
// Configuration
// ============================================================================

/// Commands that accept directory paths as arguments.
const DIR_COMMANDS: &[&str] = &["cd", "ls"];

/// Commands that accept file paths as arguments.
const FILE_COMMANDS: &[&str] = &["cat"];

// ============================================================================
// Completion Context
// ============================================================================

/// Determines what type of completion is needed for a command.
#[derive(Debug, Clone, Copy, PartialEq)]
enum CompletionMode {
    Command,
    DirectoryPath,
    FilePath,
    None,
}

impl CompletionMode {
    /// Split input into the command word and the rest of the line.
    fn from_input(input: &str) -> (Self, &str, &str) {
        let Some((cmd, rest)) = input.split_once(' ') else {
            return (Self::Command, input, "");
        };

        let mode = if DIR_COMMANDS.iter().any(|c| c.eq_ignore_ascii_case(cmd)) {
            Self::DirectoryPath
        } else if FILE_COMMANDS.iter().any(|c| c.eq_ignore_ascii_case(cmd)) {
            Self::FilePath
        } else {
            Self::None
        };

        (mode, cmd, rest.trim_start())
    }

    fn dirs_only(self) -> bool {
        matches!(self, Self::DirectoryPath)
    }
}

// ============================================================================
// Path Parsing
// ============================================================================

/// A partial path split at its last `/`.
struct ParsedPath<'a> {
    /// Directory prefix as typed (e.g., "docs/" or "")
    dir_part: &'a str,
    /// Name being completed
    name_part: &'a str,
    search_dir: NodeId,
}

impl<'a> ParsedPath<'a> {
    fn parse(partial: &'a str, scope: &CompletionScope<'_>) -> Option<Self> {
        let (dir_part, name_part) = match partial.rfind('/') {
            Some(idx) => (&partial[..=idx], &partial[idx + 1..]),
            None => ("", partial),
        };

        let search_dir = match dir_part.trim_end_matches('/') {
            "" if dir_part.is_empty() => scope.cwd.clone(),
            "" => scope.graph.root().clone(),
            dir => scope.graph.resolve(scope.cwd, scope.home, dir)?,
        };

        Some(Self {
            dir_part,
            name_part,
            search_dir,
        })
    }

    /// Children of the search directory whose names start with `name_part`.
    fn matches<'g>(&self, graph: &'g DirectoryGraph, dirs_only: bool) -> Vec<(&'g str, bool)> {
        let name_lower = self.name_part.to_lowercase();
        graph
            .children(self.search_dir.as_str())
            .filter(|node| !dirs_only || node.is_directory())
            .filter(|node| node.name.to_lowercase().starts_with(&name_lower))
            .map(|node| (node.name.as_str(), node.is_directory()))
            .collect()
    }
}

// ============================================================================
// Public API
// ============================================================================

/// Perform autocomplete on Tab press.
pub fn autocomplete(input: &str, scope: &CompletionScope<'_>) -> AutocompleteResult {
    let input = input.trim_start();
    if input.is_empty() {
        return AutocompleteResult::None;
    }

    match CompletionMode::from_input(input) {
        (CompletionMode::Command, cmd, _) => complete_command(cmd),
        (mode @ (CompletionMode::DirectoryPath | CompletionMode::FilePath), cmd, partial) => {
            complete_path(cmd, partial, scope, mode.dirs_only())
        }
        (CompletionMode::None, _, _) => AutocompleteResult::None,
    }
}

/// Get the suffix that would complete the current input, for ghost text.
pub fn get_hint(input: &str, scope: &CompletionScope<'_>) -> Option<String> {
    let input = input.trim_start();
    if input.is_empty() {
        return None;
    }

    match CompletionMode::from_input(input) {
        (CompletionMode::Command, cmd, _) => get_command_hint(cmd),
        (mode @ (CompletionMode::DirectoryPath | CompletionMode::FilePath), _, partial) => {
            get_path_hint(partial, scope, mode.dirs_only())
        }
        (CompletionMode::None, _, _) => None,
    }
}

// ============================================================================
// Command Completion
// ============================================================================

fn complete_command(partial: &str) -> AutocompleteResult {
    let partial_lower = partial.to_lowercase();
    let matches: Vec<String> = Builtin::names()
        .filter(|cmd| cmd.starts_with(&partial_lower))
        .map(str::to_string)
        .collect();

    match matches.len() {
        0 => AutocompleteResult::None,
        1 => AutocompleteResult::Single(format!("{} ", matches[0])),
        _ => {
            let common = find_common_prefix(&matches);
            AutocompleteResult::Multiple(common, matches)
        }
    }
}

fn get_command_hint(partial: &str) -> Option<String> {
    let partial_lower = partial.to_lowercase();
    Builtin::names()
        .find(|cmd| cmd.starts_with(&partial_lower) && *cmd != partial_lower)
        .map(|cmd| cmd[partial_lower.len()..].to_string())
}

// ============================================================================
// Path Completion
// ============================================================================

fn complete_path(
    cmd: &str,
    partial: &str,
    scope: &CompletionScope<'_>,
    dirs_only: bool,
) -> AutocompleteResult {
    let Some(parsed) = ParsedPath::parse(partial, scope) else {
        return AutocompleteResult::None;
    };
    let matches = parsed.matches(scope.graph, dirs_only);

    match matches.as_slice() {
        [] => AutocompleteResult::None,
        [(name, is_dir)] => {
            let suffix = if *is_dir { "/" } else { " " };
            AutocompleteResult::Single(format!("{} {}{}{}", cmd, parsed.dir_part, name, suffix))
        }
        _ => {
            let names: Vec<String> = matches.iter().map(|(n, _)| n.to_string()).collect();
            let common = find_common_prefix(&names);
            let display: Vec<String> = matches
                .iter()
                .map(|(name, is_dir)| {
                    if *is_dir {
                        format!("{}/", name)
                    } else {
                        name.to_string()
                    }
                })
                .collect();
            AutocompleteResult::Multiple(format!("{} {}{}", cmd, parsed.dir_part, common), display)
        }
    }
}

fn get_path_hint(partial: &str, scope: &CompletionScope<'_>, dirs_only: bool) -> Option<String> {
    let parsed = ParsedPath::parse(partial, scope)?;
    let typed = parsed.name_part.len();

    parsed
        .matches(scope.graph, dirs_only)
        .into_iter()
        .find(|(name, _)| name.len() > typed)
        .and_then(|(name, is_dir)| {
            let rest = name.get(typed..)?;
            Some(format!("{}{}", rest, if is_dir { "/" } else { "" }))
        })
}

// ============================================================================
// Utilities
// ============================================================================

/// Find the common prefix of multiple strings (case-insensitive).
fn find_common_prefix(strings: &[String]) -> String {
    let Some((first, rest)) = strings.split_first() else {
        return String::new();
    };

    let mut prefix_chars = first.chars().count();
    for s in rest {
        prefix_chars = first
            .chars()
            .zip(s.chars())
            .take(prefix_chars)
            .take_while(|(a, b)| a.to_lowercase().eq(b.to_lowercase()))
            .count();
    }

    first.chars().take(prefix_chars).collect()
}

// ============================================================================
// Tests
// ============================================================================
