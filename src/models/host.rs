//! Wire types exchanged with the host capability bridge.

use serde::{Deserialize, Serialize};

/// Host identity reported once at bridge session start.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostIdentity {
    /// Absolute home directory of the host user (e.g. `/home/alice`)
    pub homedir: String,
    pub hostname: String,
}

impl HostIdentity {
    /// Best-effort user name: the last segment of the home directory.
    pub fn username(&self) -> Option<&str> {
        self.homedir
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .filter(|name| !name.is_empty())
    }
}

/// A single stateless execution request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecRequest {
    pub command: String,
    /// Working directory to run in; `None` lets the host pick.
    pub cwd: Option<String>,
}

impl ExecRequest {
    pub fn new(command: impl Into<String>, cwd: Option<&str>) -> Self {
        Self {
            command: command.into(),
            cwd: cwd.map(str::to_string),
        }
    }
}

/// Reply from the host executor.
///
/// `transport_error` is set by the host side when the command could not be
/// run at all; a non-zero `exit_code` with `transport_error == None` is an
/// ordinary command failure.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExecResponse {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
    pub transport_error: Option<String>,
}

impl ExecResponse {
    /// Successful run with the given stdout.
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            success: true,
            stdout: stdout.into(),
            ..Default::default()
        }
    }

    /// Command ran and exited non-zero.
    pub fn failed(exit_code: i32, stderr: impl Into<String>) -> Self {
        Self {
            success: false,
            stderr: stderr.into(),
            exit_code,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_from_homedir() {
        let id = HostIdentity {
            homedir: "/home/alice/".to_string(),
            hostname: "box".to_string(),
        };
        assert_eq!(id.username(), Some("alice"));

        let root = HostIdentity {
            homedir: "/".to_string(),
            hostname: "box".to_string(),
        };
        assert_eq!(root.username(), None);
    }

    #[test]
    fn test_response_wire_format() {
        let json = r#"{"success":false,"stdout":"","stderr":"boom","exitCode":2,"transportError":null}"#;
        let resp: ExecResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.exit_code, 2);
        assert_eq!(resp.stderr, "boom");
        assert!(!resp.success);
        assert!(resp.transport_error.is_none());
    }

    #[test]
    fn test_response_defaults() {
        let resp: ExecResponse = serde_json::from_str(r#"{"success":true}"#).unwrap();
        assert!(resp.success);
        assert_eq!(resp.exit_code, 0);
        assert!(resp.stdout.is_empty());
    }
}
