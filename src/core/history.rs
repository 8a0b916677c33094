//! Command history with up/down navigation.

use std::collections::VecDeque;

/// Navigation direction through the history.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HistoryDirection {
    /// Toward older entries (arrow up)
    Older,
    /// Toward newer entries (arrow down)
    Newer,
}

/// Bounded list of submitted lines.
///
/// Consecutive duplicates are stored once. Recording a line resets the
/// navigation cursor.
#[derive(Clone, Debug)]
pub struct CommandHistory {
    entries: VecDeque<String>,
    limit: usize,
    cursor: Option<usize>,
}

impl CommandHistory {
    pub fn new(limit: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            limit: limit.max(1),
            cursor: None,
        }
    }

    pub fn record(&mut self, line: &str) {
        if !line.trim().is_empty() && self.entries.back().map(String::as_str) != Some(line) {
            self.entries.push_back(line.to_string());
            if self.entries.len() > self.limit {
                self.entries.pop_front();
            }
        }
        self.cursor = None;
    }

    /// Move the cursor and return the entry under it.
    ///
    /// Moving newer past the latest entry leaves history and returns `None`
    /// (an empty input line). Moving older past the first entry stays there.
    pub fn navigate(&mut self, direction: HistoryDirection) -> Option<&str> {
        if self.entries.is_empty() {
            return None;
        }

        let last = self.entries.len() - 1;
        self.cursor = match (self.cursor, direction) {
            (None, HistoryDirection::Older) => Some(last),
            (None, HistoryDirection::Newer) => None,
            (Some(i), HistoryDirection::Older) => Some(i.saturating_sub(1)),
            (Some(i), HistoryDirection::Newer) if i < last => Some(i + 1),
            (Some(_), HistoryDirection::Newer) => None,
        };

        self.cursor
            .and_then(|i| self.entries.get(i))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
