//! Command execution logic.
//!
//! Contains [`execute_command`] and the handlers referenced by the builtin
//! table. Handlers only read the [`ShellContext`]; every failure they can hit
//! is rendered as an error line rather than returned.

use log::debug;

use crate::config::{
    ABOUT_TEXT, CONTACT_TEXT, HELP_TEXT, PROFILE_TEXT, PROJECTS_TEXT, SKILLS_TEXT, USERS_ROOT,
};
use crate::models::OutputLine;

use super::{Builtin, CommandResult, ShellContext};

/// Execute an argument vector against the builtin table.
///
/// An empty vector is a no-op. Unknown names produce
/// `<shell>: command not found: <cmd>`.
pub fn execute_command(ctx: &ShellContext<'_>, argv: &[String]) -> CommandResult {
    let Some((name, args)) = argv.split_first() else {
        return CommandResult::empty();
    };

    match Builtin::lookup(name) {
        Some(builtin) => {
            debug!("dispatch {} with {} args", builtin.name, args.len());
            builtin.run(ctx, args)
        }
        None => CommandResult::error(format!(
            "{}: command not found: {}",
            ctx.shell_name, name
        )),
    }
}

fn static_text(text: &str) -> CommandResult {
    CommandResult::output(OutputLine::text_block(text))
}

pub(super) fn help(_ctx: &ShellContext<'_>, _args: &[String]) -> CommandResult {
    static_text(HELP_TEXT)
}

pub(super) fn whoami(_ctx: &ShellContext<'_>, _args: &[String]) -> CommandResult {
    static_text(PROFILE_TEXT)
}

pub(super) fn about(_ctx: &ShellContext<'_>, _args: &[String]) -> CommandResult {
    static_text(ABOUT_TEXT)
}

pub(super) fn skills(_ctx: &ShellContext<'_>, _args: &[String]) -> CommandResult {
    static_text(SKILLS_TEXT)
}

pub(super) fn projects(_ctx: &ShellContext<'_>, _args: &[String]) -> CommandResult {
    static_text(PROJECTS_TEXT)
}

pub(super) fn contact(_ctx: &ShellContext<'_>, _args: &[String]) -> CommandResult {
    static_text(CONTACT_TEXT)
}

pub(super) fn clear(_ctx: &ShellContext<'_>, _args: &[String]) -> CommandResult {
    CommandResult::clear()
}

/// Execute `ls` command.
///
/// Flags (arguments starting with `-`) are accepted and ignored.
pub(super) fn ls(ctx: &ShellContext<'_>, args: &[String]) -> CommandResult {
    let target = args
        .iter()
        .find(|a| !a.starts_with('-'))
        .map(String::as_str)
        .unwrap_or(".");

    let Some(dir) = ctx.graph.resolve(ctx.cwd, ctx.home, target) else {
        return CommandResult::error(format!("ls: {}: No such file or directory", target));
    };

    let entries: Vec<OutputLine> = ctx
        .graph
        .children(dir.as_str())
        .map(|node| {
            if node.is_directory() {
                OutputLine::dir_entry(&node.name)
            } else {
                OutputLine::file_entry(&node.name)
            }
        })
        .collect();

    if entries.is_empty() {
        CommandResult::output(vec![OutputLine::text("(empty)")])
    } else {
        CommandResult::output(entries)
    }
}

/// Execute `cd` command.
pub(super) fn cd(ctx: &ShellContext<'_>, args: &[String]) -> CommandResult {
    let Some(target) = args.first() else {
        return CommandResult::change_dir(ctx.home.clone());
    };

    match ctx.graph.resolve(ctx.cwd, ctx.home, target) {
        Some(id) => CommandResult::change_dir(id),
        None => CommandResult::error(format!("cd: {}: No such file or directory", target)),
    }
}

/// Execute `pwd` command.
///
/// `~` is shown as `/Users/<DisplayName>`.
pub(super) fn pwd(ctx: &ShellContext<'_>, _args: &[String]) -> CommandResult {
    let path = ctx.graph.path_to_string(ctx.cwd, ctx.home);
    let home = format!("{}/{}", USERS_ROOT, ctx.display_name);

    let expanded = match path.strip_prefix('~') {
        Some("") => home,
        Some(rest) if rest.starts_with('/') => format!("{}{}", home, rest),
        _ => path,
    };
    CommandResult::output(vec![OutputLine::text(expanded)])
}

/// Execute `cat` command.
pub(super) fn cat(ctx: &ShellContext<'_>, args: &[String]) -> CommandResult {
    let Some(target) = args.first() else {
        return CommandResult::error("cat: missing file operand");
    };

    let Some(node) = ctx.graph.resolve_file(ctx.cwd, ctx.home, target) else {
        return CommandResult::error(format!("cat: {}: No such file or directory", target));
    };

    if node.is_directory() {
        return CommandResult::error(format!("cat: {}: Is a directory", node.name));
    }

    let body = node
        .content
        .as_deref()
        .filter(|s| !s.is_empty())
        .or(node.description.as_deref())
        .filter(|s| !s.is_empty());

    match body {
        Some(text) => static_text(text),
        None => CommandResult::output(vec![OutputLine::text("(empty)")]),
    }
}

// =============================================================================
// Tests
// =============================================================================
