use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::time::Instant;
use tokio::sync::oneshot::{self, error::TryRecvError};

use crate::config::AppConfig;
use crate::phrase::focus::{Focus, FocusTarget};
use crate::phrase::{self, Phrase, SubmitOutcome, Validity, PHRASE_LEN};
use crate::wordlist::{WordList, WordListSource};

/// Seconds a status message stays on the info line
const STATUS_SECONDS: u64 = 3;

/// Slots per grid row (the form is 4 rows of 3)
pub const GRID_COLUMNS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Popup {
    None,
    Help,
    Outcome,  // Blocking: must be dismissed before anything else
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordListState {
    Loading,
    Ready,
}

/// Something a pointer press landed on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    Suggestion(usize),
    Slot(usize),
    Submit,
}

pub struct App {
    pub popup: Popup,

    // Form state
    pub phrase: Phrase,
    pub invalid: Validity,
    pub focus: Focus,

    // Reference list, filled in by the loader task
    pub wordlist: WordList,
    pub wordlist_state: WordListState,
    pub wordlist_source: String,
    loader: Option<oneshot::Receiver<WordList>>,

    // Last submission result (shown in the Outcome popup)
    pub outcome: Option<SubmitOutcome>,

    // Status message (shown in info line, auto-clears after timeout)
    pub status_message: Option<String>,
    pub status_message_time: Option<Instant>,

    pub config: AppConfig,
}

impl App {
    /// Create the app and start loading the word list in the background.
    /// Must be called from within a tokio runtime.
    pub fn new(config: AppConfig, source: WordListSource) -> Self {
        let (tx, rx) = oneshot::channel();
        let description = source.describe();

        tokio::spawn(async move {
            let list = crate::wordlist::load_source(&source).await;
            let _ = tx.send(list);
        });

        Self::loading(config, rx, description)
    }

    fn loading(config: AppConfig, loader: oneshot::Receiver<WordList>, description: String) -> Self {
        let mut app = Self::blank(config, description);
        app.loader = Some(loader);
        app.wordlist_state = WordListState::Loading;
        app
    }

    /// Create the app with an already-loaded word list
    pub fn with_wordlist(config: AppConfig, wordlist: WordList, description: String) -> Self {
        let mut app = Self::blank(config, description);
        app.wordlist = wordlist;
        app.wordlist_state = WordListState::Ready;
        app.revalidate();
        app
    }

    fn blank(config: AppConfig, wordlist_source: String) -> Self {
        let phrase = Phrase::new();
        let wordlist = WordList::default();
        let focus = Focus::slot(0, &phrase, &wordlist, config.suggestion_limit);

        Self {
            popup: Popup::None,
            phrase,
            invalid: [false; PHRASE_LEN],
            focus,
            wordlist,
            wordlist_state: WordListState::Loading,
            wordlist_source,
            loader: None,
            outcome: None,
            status_message: None,
            status_message_time: None,
            config,
        }
    }

    /// Set a status message (auto-clears after a few seconds)
    fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some(msg.into());
        self.status_message_time = Some(Instant::now());
    }

    fn limit(&self) -> usize {
        self.config.suggestion_limit
    }

    /// Recompute invalid flags against the current list
    fn revalidate(&mut self) {
        self.invalid = phrase::validate(&self.phrase, &self.wordlist);
    }

    /// The focused slot's text changed
    fn on_phrase_changed(&mut self) {
        self.revalidate();
        let limit = self.limit();
        self.focus.refresh(&self.phrase, &self.wordlist, limit);
    }

    fn focus_target(&mut self, target: FocusTarget) {
        self.focus = match target {
            FocusTarget::Slot(index) => {
                Focus::slot(index, &self.phrase, &self.wordlist, self.limit())
            }
            FocusTarget::Submit => Focus::Submit,
        };
    }

    /// Write a chosen suggestion into its slot and advance to the next slot
    /// (the last slot keeps focus)
    fn commit_suggestion(&mut self, index: usize, word: String) {
        self.phrase.set(index, &word);
        self.revalidate();
        if index + 1 < PHRASE_LEN {
            self.focus_target(FocusTarget::Slot(index + 1));
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        // Popups first
        if self.popup != Popup::None {
            self.handle_popup_key(key);
            return;
        }

        match key.code {
            KeyCode::F(1) => self.popup = Popup::Help,
            KeyCode::F(2) => self.submit(),
            KeyCode::Tab => self.focus_target(self.focus.next_target()),
            KeyCode::BackTab => self.focus_target(self.focus.prev_target()),
            _ => match self.focus {
                Focus::Slot { index, .. } => self.handle_slot_key(index, key),
                Focus::Submit => self.handle_submit_key(key),
                Focus::None => {
                    if matches!(key.code, KeyCode::Enter | KeyCode::Down) {
                        self.focus_target(FocusTarget::Slot(0));
                    }
                }
            },
        }
    }

    fn handle_popup_key(&mut self, key: KeyEvent) {
        match self.popup {
            Popup::Help => {
                if matches!(key.code, KeyCode::Esc | KeyCode::F(1) | KeyCode::Enter | KeyCode::Char('q')) {
                    self.popup = Popup::None;
                }
            }
            Popup::Outcome => {
                if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char(' ')) {
                    self.popup = Popup::None;
                }
            }
            Popup::None => {}
        }
    }

    fn handle_slot_key(&mut self, index: usize, key: KeyEvent) {
        match key.code {
            // Ctrl-U clears the slot
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.phrase.clear_slot(index);
                self.on_phrase_changed();
            }
            KeyCode::Char(_) if key.modifiers.contains(KeyModifiers::CONTROL) => {}

            // Words never contain spaces, so space moves on
            KeyCode::Char(' ') => {
                if !self.phrase.is_slot_empty(index) {
                    self.focus_target(self.focus.next_target());
                }
            }
            KeyCode::Char(c) if !c.is_control() => {
                self.phrase.push_char(index, c);
                self.on_phrase_changed();
            }

            KeyCode::Backspace => {
                if self.phrase.pop_char(index).is_some() {
                    self.on_phrase_changed();
                } else if index > 0 {
                    self.focus_target(FocusTarget::Slot(index - 1));
                }
            }

            KeyCode::Enter => {
                if let Some((slot, word)) = self.focus.take_suggestion(None) {
                    self.commit_suggestion(slot, word);
                } else {
                    self.focus_target(self.focus.next_target());
                }
            }

            // Suggestion highlight, or one grid row
            KeyCode::Up => {
                if self.focus.suggestions().is_empty() {
                    if index >= GRID_COLUMNS {
                        self.focus_target(FocusTarget::Slot(index - GRID_COLUMNS));
                    }
                } else {
                    self.focus.move_highlight(-1);
                }
            }
            KeyCode::Down => {
                if self.focus.suggestions().is_empty() {
                    if index + GRID_COLUMNS < PHRASE_LEN {
                        self.focus_target(FocusTarget::Slot(index + GRID_COLUMNS));
                    }
                } else {
                    self.focus.move_highlight(1);
                }
            }

            KeyCode::Esc => {
                if !self.focus.dismiss_suggestions() {
                    self.focus = Focus::None;
                }
            }
            _ => {}
        }
    }

    fn handle_submit_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter | KeyCode::Char(' ') => self.submit(),
            KeyCode::Up | KeyCode::Backspace => self.focus_target(FocusTarget::Slot(PHRASE_LEN - 1)),
            KeyCode::Esc => self.focus = Focus::None,
            _ => {}
        }
    }

    /// Distribute pasted whitespace-separated words over consecutive slots,
    /// starting at the focused slot
    pub fn handle_paste(&mut self, text: &str) {
        if self.popup != Popup::None {
            return;
        }

        let start = self.focus.active_slot().unwrap_or(0);
        let words: Vec<&str> = text.split_whitespace().collect();
        if words.is_empty() {
            return;
        }

        let fitting = words.len().min(PHRASE_LEN - start);
        for (offset, word) in words.iter().take(fitting).enumerate() {
            self.phrase.set(start + offset, word);
        }
        self.revalidate();

        let last = start + fitting - 1;
        self.focus_target(FocusTarget::Slot(last));
        self.focus.dismiss_suggestions();

        if words.len() > fitting {
            self.set_status(format!(
                "Pasted {} words, ignored {} extra",
                fitting,
                words.len() - fitting
            ));
        } else {
            self.set_status(format!("Pasted {} words", fitting));
        }
    }

    /// Pointer press. A press on a suggestion is committed to the slot that
    /// offered it before focus moves anywhere else.
    pub fn handle_click(&mut self, hit: Hit) {
        if self.popup != Popup::None {
            return;
        }

        match hit {
            Hit::Suggestion(choice) => {
                if let Some((slot, word)) = self.focus.take_suggestion(Some(choice)) {
                    self.commit_suggestion(slot, word);
                }
            }
            Hit::Slot(index) => {
                if self.focus.active_slot() != Some(index) {
                    self.focus_target(FocusTarget::Slot(index));
                }
            }
            Hit::Submit => {
                self.focus = Focus::Submit;
                self.submit();
            }
        }
    }

    /// Check the phrase and show the result in a blocking popup
    pub fn submit(&mut self) {
        if self.wordlist_state == WordListState::Loading {
            self.set_status("Word list is still loading");
            return;
        }

        let outcome = phrase::check_submission(
            &self.phrase,
            &self.wordlist,
            self.config.empty_list_policy(),
        );

        if outcome.is_accepted() {
            tracing::info!("Phrase accepted");
        } else {
            tracing::info!("Phrase rejected: {:?}", outcome);
        }

        if self.config.notifications {
            crate::notify::notify_outcome(&outcome);
        }

        self.outcome = Some(outcome);
        self.popup = Popup::Outcome;
    }

    pub fn tick(&mut self) {
        self.poll_loader();

        // Clear status message after timeout
        if let Some(time) = self.status_message_time {
            if time.elapsed().as_secs() >= STATUS_SECONDS {
                self.status_message = None;
                self.status_message_time = None;
            }
        }
    }

    /// Pick up the word list once the loader task has finished
    fn poll_loader(&mut self) {
        let Some(loader) = self.loader.as_mut() else {
            return;
        };

        let list = match loader.try_recv() {
            Ok(list) => list,
            Err(TryRecvError::Empty) => return,
            Err(TryRecvError::Closed) => {
                tracing::error!("Word list loader stopped without a result");
                WordList::default()
            }
        };

        self.loader = None;
        self.finish_loading(list);
    }

    fn finish_loading(&mut self, list: WordList) {
        self.wordlist = list;
        self.wordlist_state = WordListState::Ready;
        self.revalidate();
        let limit = self.limit();
        self.focus.refresh(&self.phrase, &self.wordlist, limit);

        if self.wordlist.is_empty() {
            self.set_status("Word list unavailable, words are not being checked");
        } else {
            self.set_status(format!("Loaded {} words", self.wordlist.len()));
        }
    }
}
