//! Terminal transcript line types.

use std::sync::atomic::{AtomicUsize, Ordering};

/// Text styling for directory listings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextStyle {
    /// Directory entries (cyan, bold, trailing `/`)
    Directory,
    /// Regular file entries
    File,
    /// Hidden files (dimmed)
    Hidden,
}

/// Represents a single transcript line with a unique ID
#[derive(Clone, Debug)]
pub struct OutputLine {
    /// Unique ID for efficient keying in For loops
    pub id: usize,
    pub data: OutputLineData,
}

/// The actual content of a transcript line
#[derive(Clone, Debug, PartialEq)]
pub enum OutputLineData {
    /// Echo of a submitted line: prompt plus user input
    Command { prompt: String, input: String },
    /// Plain text output
    Text(String),
    /// Command-level error (red); includes remote stderr
    Error(String),
    /// Engine-level bridge failure (transport, timeout, abandon)
    BridgeError(String),
    /// Directory listing entry
    ListEntry { name: String, style: TextStyle },
    /// Blank separator line
    Empty,
}

// Global counter for generating unique IDs
static OUTPUT_LINE_COUNTER: AtomicUsize = AtomicUsize::new(0);

impl OutputLine {
    fn new(data: OutputLineData) -> Self {
        Self {
            id: OUTPUT_LINE_COUNTER.fetch_add(1, Ordering::Relaxed),
            data,
        }
    }

    pub fn text(s: impl Into<String>) -> Self {
        Self::new(OutputLineData::Text(s.into()))
    }

    pub fn error(s: impl Into<String>) -> Self {
        Self::new(OutputLineData::Error(s.into()))
    }

    pub fn bridge_error(s: impl Into<String>) -> Self {
        Self::new(OutputLineData::BridgeError(s.into()))
    }

    pub fn command(prompt: impl Into<String>, input: impl Into<String>) -> Self {
        Self::new(OutputLineData::Command {
            prompt: prompt.into(),
            input: input.into(),
        })
    }

    /// Create a directory listing entry
    pub fn dir_entry(name: impl Into<String>) -> Self {
        Self::new(OutputLineData::ListEntry {
            name: name.into(),
            style: TextStyle::Directory,
        })
    }

    /// Create a file listing entry; dot-files are styled as hidden
    pub fn file_entry(name: impl Into<String>) -> Self {
        let name = name.into();
        let style = if name.starts_with('.') {
            TextStyle::Hidden
        } else {
            TextStyle::File
        };
        Self::new(OutputLineData::ListEntry { name, style })
    }

    pub fn empty() -> Self {
        Self::new(OutputLineData::Empty)
    }

    /// Lines of a multi-line text block, one `Text` line each.
    pub fn text_block(block: &str) -> Vec<Self> {
        block.lines().map(Self::text).collect()
    }

    /// Whether this line reports a bridge failure rather than command output.
    pub fn is_bridge_error(&self) -> bool {
        matches!(self.data, OutputLineData::BridgeError(_))
    }

    /// Plain-text rendering used by non-HTML consumers.
    pub fn to_plain(&self) -> String {
        match &self.data {
            OutputLineData::Command { prompt, input } => format!("{}{}", prompt, input),
            OutputLineData::Text(s) | OutputLineData::Error(s) => s.clone(),
            OutputLineData::BridgeError(s) => format!("bridge: {}", s),
            OutputLineData::ListEntry { name, style } => match style {
                TextStyle::Directory => format!("{}/", name),
                TextStyle::File | TextStyle::Hidden => name.clone(),
            },
            OutputLineData::Empty => String::new(),
        }
    }
}

impl PartialEq for OutputLine {
    fn eq(&self, other: &Self) -> bool {
        // Only compare data, not ID
        self.data == other.data
    }
}
