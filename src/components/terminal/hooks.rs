//! Custom hooks for terminal components.

use leptos::prelude::*;

/// Tab cycling through multiple completion candidates.
///
/// `base` is the completed input up to the common prefix, e.g. `cd do`.
/// Candidates are bare names; directories keep their trailing `/`.
#[derive(Clone, Copy)]
pub struct TabCycleState {
    pub matches: RwSignal<Vec<String>>,
    pub index: RwSignal<usize>,
    pub base: RwSignal<String>,
}

impl TabCycleState {
    pub fn new() -> Self {
        Self {
            matches: RwSignal::new(vec![]),
            index: RwSignal::new(0),
            base: RwSignal::new(String::new()),
        }
    }

    pub fn is_active(&self) -> bool {
        self.matches.with(|m| !m.is_empty())
    }

    pub fn clear(&self) {
        self.matches.set(vec![]);
        self.index.set(0);
        self.base.set(String::new());
    }

    pub fn start(&self, base: String, matches: Vec<String>) {
        self.base.set(base);
        self.matches.set(matches);
        self.index.set(0);
    }

    pub fn advance(&self) {
        let len = self.matches.with(Vec::len);
        if len > 0 {
            self.index.update(|i| *i = (*i + 1) % len);
        }
    }

    /// Input line with the selected candidate substituted for the last word.
    ///
    /// For a path argument only the segment after the last `/` is replaced.
    pub fn completion(&self) -> Option<String> {
        let selected = self
            .matches
            .with(|m| m.get(self.index.get_untracked()).cloned())?;

        Some(self.base.with(|base| match base.split_once(' ') {
            None => selected,
            Some((cmd, arg)) => match arg.rsplit_once('/') {
                Some((dir, _)) => format!("{} {}/{}", cmd, dir, selected),
                None => format!("{} {}", cmd, selected),
            },
        }))
    }
}

impl Default for TabCycleState {
    fn default() -> Self {
        Self::new()
    }
}

/// Ghost text shown after the cursor while typing.
#[derive(Clone, Copy)]
pub struct HintState {
    pub hint: RwSignal<Option<String>>,
}

impl HintState {
    pub fn new() -> Self {
        Self {
            hint: RwSignal::new(None),
        }
    }

    pub fn get(&self) -> Option<String> {
        self.hint.get_untracked()
    }

    pub fn set(&self, value: Option<String>) {
        self.hint.set(value);
    }

    pub fn clear(&self) {
        self.hint.set(None);
    }
}

impl Default for HintState {
    fn default() -> Self {
        Self::new()
    }
}
