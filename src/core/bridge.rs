//! Native host bridge.
//!
//! Runs shell lines on a stateless host executor while keeping a shadow
//! working directory on the client. The executor never remembers a `cd`, so
//! a directory change is sent as one compound instruction that enters the
//! target and prints where it landed; the printed path becomes the new cwd.
//!
//! The transport and the timer are injected through [`HostBridge`] and
//! [`Delay`] so the same logic runs against a browser bridge, a test fake or
//! anything else that can answer an [`ExecRequest`].

use std::rc::Rc;
use std::time::Duration;

use async_trait::async_trait;
use futures::future::{Either, select};
use log::{debug, info};

use crate::core::error::BridgeError;
use crate::models::{ExecRequest, ExecResponse, HostIdentity, OutputLine};

// =============================================================================
// Seams
// =============================================================================

/// Transport to a native executor.
///
/// `Err` means the call itself could not complete. A command that ran and
/// exited non-zero is an `Ok` response.
#[async_trait(?Send)]
pub trait HostBridge {
    /// Host home directory and hostname. Fetched once per session.
    async fn identity(&self) -> Result<HostIdentity, BridgeError>;

    /// Run one command line in a fresh process.
    async fn execute(&self, request: ExecRequest) -> Result<ExecResponse, BridgeError>;
}

/// Timer used to bound host round trips.
#[async_trait(?Send)]
pub trait Delay {
    async fn sleep(&self, duration: Duration);
}

// =============================================================================
// Requests
// =============================================================================

/// A submitted line translated for the host.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BridgeRequest {
    /// Synthesized `cd <dir> && pwd`
    ChangeDir {
        /// Target as typed, for error messages
        target: String,
        /// Absolute directory the instruction enters
        dir: String,
        instruction: String,
        cwd: String,
    },
    /// Raw line run in the shadow cwd
    Run { line: String, cwd: String },
}

impl BridgeRequest {
    fn to_exec(&self) -> ExecRequest {
        match self {
            Self::ChangeDir {
                instruction, cwd, ..
            } => ExecRequest::new(instruction.as_str(), Some(cwd.as_str())),
            Self::Run { line, cwd } => ExecRequest::new(line.as_str(), Some(cwd.as_str())),
        }
    }
}

/// What a finished round trip contributes to the session.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BridgeOutcome {
    pub lines: Vec<OutputLine>,
    /// New shadow cwd after a successful `cd`
    pub cwd: Option<String>,
}

// =============================================================================
// Native Bridge
// =============================================================================

/// Host bridge with shadow cwd handling and a bounded wait.
///
/// Cloning is cheap; clones share the transport and timer.
#[derive(Clone)]
pub struct NativeBridge {
    host: Rc<dyn HostBridge>,
    delay: Rc<dyn Delay>,
    timeout: Option<Duration>,
    identity: HostIdentity,
}

impl NativeBridge {
    /// Fetch host identity and build a bridge around it.
    ///
    /// The identity call is bounded by the same timeout as commands.
    pub async fn connect(
        host: Rc<dyn HostBridge>,
        delay: Rc<dyn Delay>,
        timeout: Option<Duration>,
    ) -> Result<Self, BridgeError> {
        let identity = race_with_timeout(host.identity(), delay.as_ref(), timeout).await?;
        if identity.homedir.is_empty() {
            return Err(BridgeError::Identity("empty home directory".to_string()));
        }
        info!(
            "host bridge connected: {} (home {})",
            identity.hostname, identity.homedir
        );
        Ok(Self {
            host,
            delay,
            timeout,
            identity,
        })
    }

    pub fn identity(&self) -> &HostIdentity {
        &self.identity
    }

    pub fn home(&self) -> &str {
        &self.identity.homedir
    }

    /// Translate an argument vector into a host request.
    ///
    /// Only a literal lowercase `cd` is intercepted; every other line is
    /// forwarded as typed.
    pub fn prepare(&self, line: &str, argv: &[String], cwd: &str) -> BridgeRequest {
        match argv.split_first() {
            Some((cmd, args)) if cmd == "cd" => {
                let target = args.first().map(String::as_str);
                let dir = resolve_host_path(self.home(), cwd, target);
                BridgeRequest::ChangeDir {
                    target: target.unwrap_or("~").to_string(),
                    instruction: format!("cd {} && pwd", shell_quote(&dir)),
                    dir,
                    cwd: cwd.to_string(),
                }
            }
            _ => BridgeRequest::Run {
                line: line.to_string(),
                cwd: cwd.to_string(),
            },
        }
    }

    /// Perform one round trip and reconcile the response.
    pub async fn execute(&self, request: &BridgeRequest) -> Result<BridgeOutcome, BridgeError> {
        debug!("bridge request: {:?}", request);
        let call = self.host.execute(request.to_exec());
        let response = race_with_timeout(call, self.delay.as_ref(), self.timeout).await?;

        if let Some(reason) = response.transport_error.filter(|r| !r.is_empty()) {
            return Err(BridgeError::Transport(reason));
        }

        Ok(match request {
            BridgeRequest::ChangeDir { target, .. } => {
                let landed = response
                    .stdout
                    .lines()
                    .map(str::trim)
                    .rfind(|l| !l.is_empty())
                    .map(str::to_string);
                match landed {
                    Some(path) if response.success => BridgeOutcome {
                        lines: Vec::new(),
                        cwd: Some(path),
                    },
                    _ => BridgeOutcome {
                        lines: vec![OutputLine::error(format!(
                            "cd: {}: No such file or directory",
                            target
                        ))],
                        cwd: None,
                    },
                }
            }
            BridgeRequest::Run { .. } => {
                let mut lines = OutputLine::text_block(&response.stdout);
                lines.extend(response.stderr.lines().map(OutputLine::error));
                BridgeOutcome { lines, cwd: None }
            }
        })
    }
}

impl std::fmt::Debug for NativeBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NativeBridge")
            .field("identity", &self.identity)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Race a bridge call against the timer.
///
/// With no timeout the call is awaited directly.
async fn race_with_timeout<F, T>(
    call: F,
    delay: &dyn Delay,
    timeout: Option<Duration>,
) -> Result<T, BridgeError>
where
    F: std::future::Future<Output = Result<T, BridgeError>> + Unpin,
{
    let Some(limit) = timeout else {
        return call.await;
    };

    match select(call, delay.sleep(limit)).await {
        Either::Left((result, _)) => result,
        Either::Right(_) => Err(BridgeError::Timeout(
            u64::try_from(limit.as_millis()).unwrap_or(u64::MAX),
        )),
    }
}

/// Quote a string for a POSIX shell.
///
/// Wraps in single quotes; embedded single quotes become `'\''`.
pub fn shell_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', r"'\''"))
}

/// Resolve a `cd` target against the host home and shadow cwd.
///
/// - no target or `~` -> home
/// - `~/x` -> `home/x`
/// - `/x` -> unchanged
/// - anything else -> `cwd/x`
pub fn resolve_host_path(home: &str, cwd: &str, target: Option<&str>) -> String {
    match target {
        None | Some("~") => home.to_string(),
        Some(t) if t.starts_with("~/") => join(home, &t[2..]),
        Some(t) if t.starts_with('/') => t.to_string(),
        Some(t) => join(cwd, t),
    }
}

fn join(base: &str, rest: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), rest)
}

/// Render a host path with the home prefix shown as `~`.
pub fn tilde_path(home: &str, path: &str) -> String {
    let home = home.trim_end_matches('/');
    if home.is_empty() {
        return path.to_string();
    }
    match path.strip_prefix(home) {
        Some("") | Some("/") => "~".to_string(),
        Some(rest) if rest.starts_with('/') => format!("~{}", rest),
        _ => path.to_string(),
    }
}

// =============================================================================
// Tests
// =============================================================================
