//! Terminal session and its coordinator.
//!
//! A [`Session`] is the single owner of everything a terminal instance
//! mutates: the current location, the transcript, the in-flight flag and the
//! command history. The [`SessionCoordinator`] is the only writer. It routes
//! each submitted line to the builtin table (sandboxed mode) or the host
//! bridge (bridged mode) and applies the result.
//!
//! # Single flight
//!
//! At most one command is outstanding. A submission while one is in flight
//! is rejected with [`SessionError::Busy`] and leaves no trace.
//!
//! Bridged submissions are split in three so that callers holding the
//! coordinator behind a shared handle do not keep it borrowed across the
//! host round trip:
//!
//! 1. [`SessionCoordinator::begin`] takes the lock, echoes the line and
//!    returns a [`RemoteJob`]
//! 2. [`RemoteJob::run`] performs the round trip with no access to the session
//! 3. [`SessionCoordinator::complete`] applies the result and releases the lock
//!
//! [`SessionCoordinator::submit`] chains the three for exclusive owners.

use std::rc::Rc;
use std::sync::Arc;

use log::{debug, info, warn};

use crate::config::SessionConfig;
use crate::core::autocomplete::{self, AutocompleteResult, CompletionScope};
use crate::core::bridge::{self, BridgeOutcome, BridgeRequest, Delay, HostBridge, NativeBridge};
use crate::core::commands::{CommandResult, ShellContext, execute_command};
use crate::core::error::{BridgeError, GraphError, SessionError};
use crate::core::history::{CommandHistory, HistoryDirection};
use crate::core::parser::tokenize;
use crate::core::DirectoryGraph;
use crate::models::{NodeId, OutputLine};

// =============================================================================
// Session State
// =============================================================================

/// Who the prompt says is logged in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionIdentity {
    pub username: String,
    pub hostname: String,
    /// Capitalized form shown by `pwd` (`/Users/<DisplayName>`)
    pub display_name: String,
}

impl SessionIdentity {
    pub fn new(username: impl Into<String>, hostname: impl Into<String>) -> Self {
        let username = username.into();
        Self {
            display_name: capitalize(&username),
            username,
            hostname: hostname.into(),
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Current directory, in the addressing scheme of the session's mode.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Location {
    /// Node ids in the directory graph
    Sandboxed { cwd: NodeId, home: NodeId },
    /// Absolute host paths; `cwd` is the client-side shadow
    Bridged { cwd: String, home: String },
}

/// Execution mode, fixed when the session starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Sandboxed,
    Bridged,
}

/// Mutable state of one terminal instance.
#[derive(Clone, Debug)]
pub struct Session {
    identity: SessionIdentity,
    location: Location,
    transcript: Vec<OutputLine>,
    in_flight: bool,
    history: CommandHistory,
}

impl Session {
    fn new(identity: SessionIdentity, location: Location, history_limit: usize) -> Self {
        Self {
            identity,
            location,
            transcript: Vec::new(),
            in_flight: false,
            history: CommandHistory::new(history_limit),
        }
    }

    pub fn identity(&self) -> &SessionIdentity {
        &self.identity
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn transcript(&self) -> &[OutputLine] {
        &self.transcript
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn history(&self) -> &CommandHistory {
        &self.history
    }

    /// Append a command's output followed by the blank separator.
    fn append_block(&mut self, lines: Vec<OutputLine>) {
        self.transcript.extend(lines);
        self.transcript.push(OutputLine::empty());
    }
}

// =============================================================================
// Dispatch Results
// =============================================================================

/// What `begin` left to do.
#[derive(Debug)]
pub enum Dispatch {
    /// The line was fully handled.
    Done,
    /// A host round trip is pending; run it and hand the result to `complete`.
    Remote(RemoteJob),
}

/// A host round trip detached from the session.
#[derive(Debug)]
pub struct RemoteJob {
    bridge: NativeBridge,
    request: BridgeRequest,
    generation: u64,
}

impl RemoteJob {
    pub fn request(&self) -> &BridgeRequest {
        &self.request
    }

    /// Perform the round trip. This is the only suspension point.
    pub async fn run(self) -> Completion {
        let result = self.bridge.execute(&self.request).await;
        Completion {
            generation: self.generation,
            result,
        }
    }
}

/// Result of a [`RemoteJob`], tagged with the submission it belongs to.
#[derive(Debug)]
pub struct Completion {
    generation: u64,
    result: Result<BridgeOutcome, BridgeError>,
}

enum Backend {
    Sandboxed { graph: Arc<DirectoryGraph> },
    Bridged(NativeBridge),
}

// =============================================================================
// Coordinator
// =============================================================================

/// Owns a [`Session`] and applies submitted lines to it.
pub struct SessionCoordinator {
    session: Session,
    backend: Backend,
    config: SessionConfig,
    /// Bumped on every bridged submission and on abandon
    generation: u64,
}

impl SessionCoordinator {
    /// Start a sandboxed session over a directory graph.
    ///
    /// `home` must be a live directory; the session starts there.
    pub fn sandboxed(
        graph: Arc<DirectoryGraph>,
        home: NodeId,
        identity: SessionIdentity,
        config: SessionConfig,
    ) -> Result<Self, SessionError> {
        check_home(&graph, &home)?;
        let graph = apply_depth(graph, config.path_depth());

        info!(
            "sandboxed session for {} at {}",
            identity.username,
            graph.path_to_string(&home, &home)
        );
        let location = Location::Sandboxed {
            cwd: home.clone(),
            home,
        };
        Ok(Self {
            session: Session::new(identity, location, config.history_limit),
            backend: Backend::Sandboxed { graph },
            config,
            generation: 0,
        })
    }

    /// Start a bridged session on a connected host.
    ///
    /// The prompt shows the host's user and hostname; the shadow cwd starts
    /// at the host home.
    pub fn bridged(bridge: NativeBridge, config: SessionConfig) -> Self {
        let host = bridge.identity();
        let username = host
            .username()
            .unwrap_or(crate::config::DEFAULT_USERNAME)
            .to_string();
        let identity = SessionIdentity::new(username, host.hostname.clone());
        let home = bridge.home().to_string();

        info!("bridged session for {} on {}", identity.username, identity.hostname);
        let location = Location::Bridged {
            cwd: home.clone(),
            home,
        };
        Self {
            session: Session::new(identity, location, config.history_limit),
            backend: Backend::Bridged(bridge),
            config,
            generation: 0,
        }
    }

    /// Start a session, preferring the host bridge when one is offered.
    ///
    /// If the bridge cannot report its identity the session falls back to
    /// sandboxed mode. The mode never changes afterwards.
    pub async fn start(
        graph: Arc<DirectoryGraph>,
        home: NodeId,
        identity: SessionIdentity,
        host: Option<(Rc<dyn HostBridge>, Rc<dyn Delay>)>,
        config: SessionConfig,
    ) -> Result<Self, SessionError> {
        if let Some((host, delay)) = host {
            match NativeBridge::connect(host, delay, config.bridge_timeout()).await {
                Ok(bridge) => return Ok(Self::bridged(bridge, config)),
                Err(e) => warn!("host bridge unavailable, using sandbox: {}", e),
            }
        }
        Self::sandboxed(graph, home, identity, config)
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn mode(&self) -> Mode {
        match self.backend {
            Backend::Sandboxed { .. } => Mode::Sandboxed,
            Backend::Bridged(_) => Mode::Bridged,
        }
    }

    pub fn is_in_flight(&self) -> bool {
        self.session.in_flight
    }

    pub fn transcript(&self) -> &[OutputLine] {
        &self.session.transcript
    }

    /// Plain-text transcript, one string per line.
    pub fn lines(&self) -> Vec<String> {
        self.session.transcript.iter().map(OutputLine::to_plain).collect()
    }

    /// Current directory for display: `~`-relative where possible.
    pub fn cwd_display(&self) -> String {
        match (&self.backend, &self.session.location) {
            (Backend::Sandboxed { graph }, Location::Sandboxed { cwd, home }) => {
                graph.path_to_string(cwd, home)
            }
            (_, Location::Bridged { cwd, home }) => bridge::tilde_path(home, cwd),
            (Backend::Bridged(_), Location::Sandboxed { cwd, .. }) => cwd.to_string(),
        }
    }

    /// `<username>@<hostname> <displayPath> $ `
    pub fn prompt(&self) -> String {
        let identity = &self.session.identity;
        format!(
            "{}@{} {} $ ",
            identity.username,
            identity.hostname,
            self.cwd_display()
        )
    }

    /// The directory graph, in sandboxed mode.
    pub fn graph(&self) -> Option<&Arc<DirectoryGraph>> {
        match &self.backend {
            Backend::Sandboxed { graph } => Some(graph),
            Backend::Bridged(_) => None,
        }
    }

    // -------------------------------------------------------------------------
    // Submission
    // -------------------------------------------------------------------------

    /// Accept a line, echo it and either run it or hand back a [`RemoteJob`].
    ///
    /// Rejected with [`SessionError::Busy`] while a command is in flight;
    /// a rejected submission does not touch the transcript, cwd or history.
    pub fn begin(&mut self, line: &str) -> Result<Dispatch, SessionError> {
        if self.session.in_flight {
            debug!("rejected while in flight: {:?}", line);
            return Err(SessionError::Busy);
        }

        let argv = tokenize(line);
        let prompt = self.prompt();
        self.session.history.record(line);
        self.session.transcript.push(OutputLine::command(prompt, line));

        if argv.is_empty() {
            return Ok(Dispatch::Done);
        }

        match &self.backend {
            Backend::Sandboxed { graph } => {
                let graph = Arc::clone(graph);
                self.session.in_flight = true;
                let result = self.run_builtin(&graph, &argv);
                self.apply_builtin(result);
                self.session.in_flight = false;
                Ok(Dispatch::Done)
            }
            Backend::Bridged(_) if argv[0].eq_ignore_ascii_case("clear") => {
                self.session.transcript.clear();
                Ok(Dispatch::Done)
            }
            Backend::Bridged(bridge) => {
                let Location::Bridged { cwd, .. } = &self.session.location else {
                    return Err(SessionError::Bridge(BridgeError::Unavailable));
                };
                let request = bridge.prepare(line, &argv, cwd);
                let job = RemoteJob {
                    bridge: bridge.clone(),
                    request,
                    generation: self.generation + 1,
                };
                self.generation += 1;
                self.session.in_flight = true;
                Ok(Dispatch::Remote(job))
            }
        }
    }

    /// Apply a finished round trip and release the in-flight lock.
    ///
    /// Returns `false` if the completion was stale (timed out and abandoned,
    /// or from an earlier submission) and was discarded.
    pub fn complete(&mut self, completion: Completion) -> bool {
        if !self.session.in_flight || completion.generation != self.generation {
            warn!(
                "discarding stale host result (submission {}, current {})",
                completion.generation, self.generation
            );
            return false;
        }
        self.session.in_flight = false;

        match completion.result {
            Ok(outcome) => {
                if let Some(new_cwd) = outcome.cwd
                    && let Location::Bridged { cwd, .. } = &mut self.session.location
                {
                    debug!("shadow cwd {} -> {}", cwd, new_cwd);
                    *cwd = new_cwd;
                }
                self.session.append_block(outcome.lines);
            }
            Err(e) => {
                warn!("host round trip failed: {}", e);
                self.session
                    .append_block(vec![OutputLine::bridge_error(e.to_string())]);
            }
        }
        true
    }

    /// Give up on the outstanding command.
    ///
    /// The session becomes usable again; the command's result, if it ever
    /// arrives, is discarded. Returns `false` if nothing was in flight.
    pub fn abandon(&mut self) -> bool {
        if !self.session.in_flight {
            return false;
        }
        info!("abandoning submission {}", self.generation);
        self.generation += 1;
        self.session.in_flight = false;
        self.session
            .append_block(vec![OutputLine::bridge_error(BridgeError::Abandoned.to_string())]);
        true
    }

    /// Submit a line and wait for it to finish.
    pub async fn submit(&mut self, line: &str) -> Result<(), SessionError> {
        if let Dispatch::Remote(job) = self.begin(line)? {
            let completion = job.run().await;
            self.complete(completion);
        }
        Ok(())
    }

    fn run_builtin(&self, graph: &DirectoryGraph, argv: &[String]) -> CommandResult {
        let Location::Sandboxed { cwd, home } = &self.session.location else {
            return CommandResult::empty();
        };
        let ctx = ShellContext {
            graph,
            cwd,
            home,
            display_name: &self.session.identity.display_name,
            shell_name: &self.config.shell_name,
        };
        execute_command(&ctx, argv)
    }

    fn apply_builtin(&mut self, result: CommandResult) {
        if result.clear {
            self.session.transcript.clear();
            return;
        }
        if let Some(new_cwd) = result.cwd
            && let Location::Sandboxed { cwd, .. } = &mut self.session.location
        {
            *cwd = new_cwd;
        }
        self.session.append_block(result.output);
    }

    // -------------------------------------------------------------------------
    // Graph Updates
    // -------------------------------------------------------------------------

    /// Swap in a new graph snapshot.
    ///
    /// If the current directory or one of its ancestors is gone or trashed
    /// the session moves home. A snapshot without the home directory is
    /// refused.
    pub fn replace_graph(&mut self, graph: Arc<DirectoryGraph>) -> Result<(), SessionError> {
        let Backend::Sandboxed { graph: current } = &mut self.backend else {
            return Err(SessionError::NotSandboxed);
        };
        let Location::Sandboxed { cwd, home } = &mut self.session.location else {
            return Err(SessionError::NotSandboxed);
        };

        check_home(&graph, home)?;
        if !graph.is_reachable_directory(cwd.as_str()) {
            info!("cwd {} is gone or trashed, returning home", cwd);
            *cwd = home.clone();
        }
        *current = apply_depth(graph, self.config.path_depth());
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Input Helpers
    // -------------------------------------------------------------------------

    /// Step through command history.
    pub fn navigate_history(&mut self, direction: HistoryDirection) -> Option<String> {
        self.session.history.navigate(direction).map(str::to_string)
    }

    /// Tab completion. Bridged sessions complete nothing.
    pub fn autocomplete(&self, input: &str) -> AutocompleteResult {
        match self.completion_scope() {
            Some(scope) => autocomplete::autocomplete(input, &scope),
            None => AutocompleteResult::None,
        }
    }

    /// Ghost-text completion hint.
    pub fn hint(&self, input: &str) -> Option<String> {
        autocomplete::get_hint(input, &self.completion_scope()?)
    }

    fn completion_scope(&self) -> Option<CompletionScope<'_>> {
        match (&self.backend, &self.session.location) {
            (Backend::Sandboxed { graph }, Location::Sandboxed { cwd, home }) => {
                Some(CompletionScope { graph, cwd, home })
            }
            _ => None,
        }
    }
}

/// Require `home` to be a live directory of `graph`.
fn check_home(graph: &DirectoryGraph, home: &NodeId) -> Result<(), GraphError> {
    match graph.node(home.as_str()) {
        None => Err(GraphError::UnknownNode(home.clone())),
        Some(node) if node.trashed => Err(GraphError::UnknownNode(home.clone())),
        Some(node) if !node.is_directory() => Err(GraphError::NotADirectory(home.clone())),
        Some(_) => Ok(()),
    }
}

/// Make the graph use the configured path depth bound.
fn apply_depth(graph: Arc<DirectoryGraph>, depth: usize) -> Arc<DirectoryGraph> {
    if graph.max_depth() == depth {
        graph
    } else {
        Arc::new(Arc::unwrap_or_clone(graph).with_max_depth(depth))
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DirectoryGraphNode;

    fn create_test_graph() -> Arc<DirectoryGraph> {
        Arc::new(
            DirectoryGraph::from_nodes(vec![
                DirectoryGraphNode::directory("root", "", None),
                DirectoryGraphNode::directory("H", "alice", Some("root")),
                DirectoryGraphNode::directory("D", "docs", Some("H")),
                DirectoryGraphNode::file("f", "readme.txt", Some("H"), Some("hi")),
            ])
            .unwrap(),
        )
    }

    fn coordinator() -> SessionCoordinator {
        SessionCoordinator::sandboxed(
            create_test_graph(),
            NodeId::from("H"),
            SessionIdentity::new("alice", "desktop"),
            SessionConfig::default(),
        )
        .unwrap()
    }

    fn cwd(c: &SessionCoordinator) -> NodeId {
        match c.session().location() {
            Location::Sandboxed { cwd, .. } => cwd.clone(),
            other => panic!("unexpected location {other:?}"),
        }
    }

    fn run(c: &mut SessionCoordinator, line: &str) {
        assert!(matches!(c.begin(line), Ok(Dispatch::Done)));
    }

    #[test]
    fn test_identity_display_name() {
        let id = SessionIdentity::new("alice", "box");
        assert_eq!(id.display_name, "Alice");
        assert_eq!(SessionIdentity::new("", "box").display_name, "");
    }

    #[test]
    fn test_initial_state() {
        let c = coordinator();
        assert_eq!(c.mode(), Mode::Sandboxed);
        assert_eq!(c.prompt(), "alice@desktop ~ $ ");
        assert!(c.transcript().is_empty());
        assert!(!c.is_in_flight());
    }

    #[test]
    fn test_sandboxed_home_must_be_directory() {
        let graph = create_test_graph();
        let identity = SessionIdentity::new("alice", "desktop");
        let err = SessionCoordinator::sandboxed(
            graph.clone(),
            NodeId::from("f"),
            identity.clone(),
            SessionConfig::default(),
        )
        .err();
        assert_eq!(
            err,
            Some(SessionError::Graph(GraphError::NotADirectory(NodeId::from("f"))))
        );

        let err = SessionCoordinator::sandboxed(
            graph,
            NodeId::from("nope"),
            identity,
            SessionConfig::default(),
        )
        .err();
        assert!(matches!(err, Some(SessionError::Graph(GraphError::UnknownNode(_)))));
    }

    #[test]
    fn test_echo_output_and_separator() {
        let mut c = coordinator();
        run(&mut c, "cat readme.txt");
        assert_eq!(c.lines(), vec!["alice@desktop ~ $ cat readme.txt", "hi", ""]);
    }

    #[test]
    fn test_empty_line_only_echoes() {
        let mut c = coordinator();
        run(&mut c, "   ");
        assert_eq!(c.lines(), vec!["alice@desktop ~ $    "]);
        assert!(c.session().history().is_empty());
    }

    #[test]
    fn test_cd_updates_prompt() {
        let mut c = coordinator();
        run(&mut c, "cd docs");
        assert_eq!(cwd(&c), NodeId::from("D"));
        assert_eq!(c.prompt(), "alice@desktop ~/docs $ ");
        run(&mut c, "cd ..");
        assert_eq!(cwd(&c), NodeId::from("H"));
    }

    #[test]
    fn test_clear_truncates_transcript() {
        let mut c = coordinator();
        run(&mut c, "ls");
        run(&mut c, "CLEAR");
        assert!(c.transcript().is_empty());
        assert_eq!(c.session().history().len(), 2);
    }

    #[test]
    fn test_history_navigation() {
        let mut c = coordinator();
        run(&mut c, "ls");
        run(&mut c, "pwd");
        assert_eq!(c.navigate_history(HistoryDirection::Older).as_deref(), Some("pwd"));
        assert_eq!(c.navigate_history(HistoryDirection::Older).as_deref(), Some("ls"));
    }

    #[test]
    fn test_replace_graph_falls_back_home() {
        let mut c = coordinator();
        run(&mut c, "cd docs");

        let smaller = Arc::new(
            DirectoryGraph::from_nodes(vec![
                DirectoryGraphNode::directory("root", "", None),
                DirectoryGraphNode::directory("H", "alice", Some("root")),
            ])
            .unwrap(),
        );
        c.replace_graph(smaller).unwrap();
        assert_eq!(cwd(&c), NodeId::from("H"));
    }

    #[test]
    fn test_replace_graph_leaves_trashed_subtree() {
        let nodes = |trash_proj: bool| {
            let mut proj = DirectoryGraphNode::directory("P", "proj", Some("H"));
            proj.trashed = trash_proj;
            Arc::new(
                DirectoryGraph::from_nodes(vec![
                    DirectoryGraphNode::directory("root", "", None),
                    DirectoryGraphNode::directory("H", "alice", Some("root")),
                    proj,
                    DirectoryGraphNode::directory("S", "sub", Some("P")),
                    DirectoryGraphNode::file("o", "old.txt", Some("P"), None),
                ])
                .unwrap(),
            )
        };
        let mut c = SessionCoordinator::sandboxed(
            nodes(false),
            NodeId::from("H"),
            SessionIdentity::new("alice", "d"),
            SessionConfig::default(),
        )
        .unwrap();
        run(&mut c, "cd proj/sub");
        assert_eq!(cwd(&c), NodeId::from("S"));

        c.replace_graph(nodes(true)).unwrap();
        assert_eq!(cwd(&c), NodeId::from("H"));

        run(&mut c, "cd proj");
        run(&mut c, "ls");
        assert_eq!(cwd(&c), NodeId::from("H"));
        assert!(!c.lines().iter().any(|l| l == "sub/" || l == "old.txt"));
    }

    #[test]
    fn test_repeated_cd_dot_keeps_cwd() {
        let mut c = coordinator();
        run(&mut c, "cd docs");
        for _ in 0..5 {
            run(&mut c, "cd .");
            assert_eq!(cwd(&c), NodeId::from("D"));
        }
        assert_eq!(c.prompt(), "alice@desktop ~/docs $ ");
    }

    #[test]
    fn test_replace_graph_requires_home() {
        let mut c = coordinator();
        let foreign = Arc::new(
            DirectoryGraph::from_nodes(vec![DirectoryGraphNode::directory("other", "", None)])
                .unwrap(),
        );
        assert!(c.replace_graph(foreign).is_err());
        assert_eq!(cwd(&c), NodeId::from("H"));
    }

    #[test]
    fn test_autocomplete_sandboxed() {
        let c = coordinator();
        assert_eq!(
            c.autocomplete("cd do"),
            AutocompleteResult::Single("cd docs/".to_string())
        );
        assert_eq!(c.hint("cat rea"), Some("dme.txt".to_string()));
    }

    #[test]
    fn test_abandon_without_flight_is_noop() {
        let mut c = coordinator();
        assert!(!c.abandon());
        assert!(c.transcript().is_empty());
    }

    #[test]
    fn test_configured_depth_applied() {
        let c = SessionCoordinator::sandboxed(
            create_test_graph(),
            NodeId::from("H"),
            SessionIdentity::new("alice", "desktop"),
            SessionConfig {
                max_path_depth: 64,
                ..SessionConfig::default()
            },
        )
        .unwrap();
        assert_eq!(c.graph().map(|g| g.max_depth()), Some(64));
    }
}
