use std::cell::Cell;
use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent};
use tokio::sync::mpsc;

use crate::action::Action;
use crate::config::Config;
use crate::controller::PopularController;
use crate::error::{PopularError, Result};
use crate::event::Event;
use crate::source::RepoSource;
use crate::types::{CategoryKey, RepositoryRecord};

pub struct App {
    pub languages: Vec<CategoryKey>,
    pub card_index: usize,
    /// Cards per grid row, written back by the renderer.
    pub columns: Cell<usize>,
    pub ticks: usize,
    pub loading_label: String,
    pub notice: Option<String>,
    pub should_quit: bool,
    controller: PopularController,
}

impl App {
    pub fn new(
        source: Arc<dyn RepoSource>,
        action_tx: mpsc::UnboundedSender<Action>,
        config: &Config,
        initial: CategoryKey,
    ) -> Self {
        Self {
            languages: config.languages(),
            card_index: 0,
            columns: Cell::new(1),
            ticks: 0,
            loading_label: config.ui.loading_label.clone(),
            notice: None,
            should_quit: false,
            controller: PopularController::new(source, action_tx, initial),
        }
    }

    /// Kick off the fetch for the initial language.
    pub fn start(&mut self) {
        self.controller.start();
    }

    pub fn controller(&self) -> &PopularController {
        &self.controller
    }

    /// Position of the current language in the nav, if it is listed there.
    pub fn language_index(&self) -> Option<usize> {
        let current = self.controller.current();
        self.languages.iter().position(|l| l == current)
    }

    pub fn selected_repo(&self) -> Option<&RepositoryRecord> {
        self.controller.current_repos().get(self.card_index)
    }

    pub fn loading_text(&self) -> String {
        format!("{}{}", self.loading_label, ".".repeat(self.ticks % 4))
    }

    pub fn handle_event(&self, event: Event) -> Action {
        match event {
            Event::Tick => Action::Tick,
            Event::Key(key) => self.handle_key(key),
            Event::Render | Event::Resize => Action::None,
        }
    }

    fn handle_key(&self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
            KeyCode::Tab | KeyCode::Char(']') => Action::NextLanguage,
            KeyCode::BackTab | KeyCode::Char('[') => Action::PrevLanguage,
            KeyCode::Char(c @ '1'..='9') => Action::SelectLanguage(c as usize - '1' as usize),
            KeyCode::Char('h') | KeyCode::Left => Action::CardLeft,
            KeyCode::Char('l') | KeyCode::Right => Action::CardRight,
            KeyCode::Char('k') | KeyCode::Up => Action::CardUp,
            KeyCode::Char('j') | KeyCode::Down => Action::CardDown,
            KeyCode::Char('g') | KeyCode::Home => Action::FirstCard,
            KeyCode::Char('G') | KeyCode::End => Action::LastCard,
            KeyCode::Char('o') | KeyCode::Enter => Action::OpenInBrowser,
            KeyCode::Char('u') => Action::OpenOwner,
            KeyCode::Char('y') => Action::YankUrl,
            _ => Action::None,
        }
    }

    pub fn update(&mut self, action: Action) {
        if !matches!(action, Action::Tick | Action::View(_) | Action::None) {
            self.notice = None;
        }

        let len = self.controller.current_repos().len();
        let columns = self.columns.get().max(1);

        match action {
            Action::Quit => {
                self.controller.dispose();
                self.should_quit = true;
            }
            Action::Tick => {
                if self.controller.is_loading() {
                    self.ticks = self.ticks.wrapping_add(1);
                }
            }

            Action::NextLanguage => {
                let next = match self.language_index() {
                    Some(i) => (i + 1) % self.languages.len(),
                    None => 0,
                };
                self.select_language(next);
            }
            Action::PrevLanguage => {
                let count = self.languages.len();
                let prev = match self.language_index() {
                    Some(i) => (i + count - 1) % count,
                    None => count.saturating_sub(1),
                };
                self.select_language(prev);
            }
            Action::SelectLanguage(index) => self.select_language(index),

            Action::CardLeft => {
                self.card_index = self.card_index.saturating_sub(1);
            }
            Action::CardRight => {
                if self.card_index + 1 < len {
                    self.card_index += 1;
                }
            }
            Action::CardUp => {
                if self.card_index >= columns {
                    self.card_index -= columns;
                }
            }
            Action::CardDown => {
                if self.card_index + columns < len {
                    self.card_index += columns;
                }
            }
            Action::FirstCard => {
                self.card_index = 0;
            }
            Action::LastCard => {
                self.card_index = len.saturating_sub(1);
            }

            Action::OpenInBrowser => {
                if let Some(url) = self.selected_repo().map(|r| r.url.clone()) {
                    self.open_url(&url);
                }
            }
            Action::OpenOwner => {
                if let Some(url) = self.selected_repo().map(|r| r.owner.profile_url()) {
                    self.open_url(&url);
                }
            }
            Action::YankUrl => {
                if let Some(url) = self.selected_repo().map(|r| r.url.clone()) {
                    self.notice = Some(match copy_to_clipboard(&url) {
                        Ok(()) => format!("Copied {}", url),
                        Err(e) => e.to_string(),
                    });
                }
            }

            Action::View(view_action) => {
                self.controller.apply(view_action);
                let len = self.controller.current_repos().len();
                self.card_index = self.card_index.min(len.saturating_sub(1));
            }
            Action::None => {}
        }
    }

    fn open_url(&mut self, url: &str) {
        self.notice = Some(match open::that(url) {
            Ok(()) => format!("Opened {}", url),
            Err(e) => format!("Could not open browser: {}", e),
        });
    }

    fn select_language(&mut self, index: usize) {
        let Some(key) = self.languages.get(index).cloned() else {
            return;
        };
        if &key != self.controller.current() {
            self.card_index = 0;
        }
        self.controller.select(key);
    }
}

fn copy_to_clipboard(text: &str) -> Result<()> {
    let mut clipboard =
        arboard::Clipboard::new().map_err(|e| PopularError::Clipboard(e.to_string()))?;
    clipboard
        .set_text(text.to_string())
        .map_err(|e| PopularError::Clipboard(e.to_string()))
}
