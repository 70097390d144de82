use std::collections::HashMap;

use crate::types::{CategoryKey, RepositoryRecord};

/// Result of a fetch, fed back into [`ViewState::reduce`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewAction {
    Success {
        key: CategoryKey,
        repos: Vec<RepositoryRecord>,
    },
    Error(String),
}

/// Per-language results plus the most recent failure.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    repos: HashMap<CategoryKey, Vec<RepositoryRecord>>,
    error: Option<String>,
}

/// What the body of the screen should show for the current language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel<'a> {
    Loading,
    Failed(&'a str),
    /// Data wins over an error; the error is still surfaced alongside.
    Grid {
        repos: &'a [RepositoryRecord],
        error: Option<&'a str>,
    },
}

impl ViewState {
    /// Pure transition. Entries for other keys are never touched.
    pub fn reduce(mut self, action: ViewAction) -> ViewState {
        match action {
            ViewAction::Success { key, repos } => {
                self.repos.insert(key, repos);
                self.error = None;
            }
            ViewAction::Error(message) => {
                self.error = Some(message);
            }
        }
        self
    }

    pub fn repos(&self, key: &CategoryKey) -> Option<&[RepositoryRecord]> {
        self.repos.get(key).map(Vec::as_slice)
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.repos.len()
    }

    pub fn is_loading(&self, key: &CategoryKey) -> bool {
        !self.repos.contains_key(key) && self.error.is_none()
    }

    pub fn panel(&self, key: &CategoryKey) -> Panel<'_> {
        match (self.repos(key), self.error()) {
            (Some(repos), error) => Panel::Grid { repos, error },
            (None, Some(message)) => Panel::Failed(message),
            (None, None) => Panel::Loading,
        }
    }
}
