//! Focus and suggestion state for the phrase form
//!
//! Exactly one control can hold focus: a word slot or the submit control.
//! A focused slot either shows suggestions or it doesn't; there is no timer
//! between losing focus and hiding suggestions. Committing a suggestion
//! happens before focus moves, so a pointer press on a suggestion always
//! lands in the slot it was offered for.

use super::{Phrase, PHRASE_LEN};
use crate::wordlist::WordList;

/// Focus state of a single slot as seen by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotFocus {
    Unfocused,
    Focused,
    Suggesting,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Focus {
    #[default]
    None,
    Slot {
        index: usize,
        suggestions: Vec<String>,
        highlighted: usize,
    },
    Submit,
}

impl Focus {
    /// Focus a slot, showing suggestions if it already has text
    pub fn slot(index: usize, phrase: &Phrase, wordlist: &WordList, limit: usize) -> Self {
        let index = index.min(PHRASE_LEN - 1);
        Focus::Slot {
            index,
            suggestions: wordlist.suggest(phrase.get(index), limit),
            highlighted: 0,
        }
    }

    pub fn active_slot(&self) -> Option<usize> {
        match self {
            Focus::Slot { index, .. } => Some(*index),
            _ => None,
        }
    }

    pub fn slot_state(&self, slot: usize) -> SlotFocus {
        match self {
            Focus::Slot { index, suggestions, .. } if *index == slot => {
                if suggestions.is_empty() {
                    SlotFocus::Focused
                } else {
                    SlotFocus::Suggesting
                }
            }
            _ => SlotFocus::Unfocused,
        }
    }

    pub fn suggestions(&self) -> &[String] {
        match self {
            Focus::Slot { suggestions, .. } => suggestions,
            _ => &[],
        }
    }

    pub fn highlighted(&self) -> Option<usize> {
        match self {
            Focus::Slot { suggestions, highlighted, .. } if !suggestions.is_empty() => {
                Some(*highlighted)
            }
            _ => None,
        }
    }

    /// Recompute suggestions after the focused slot's text changed
    pub fn refresh(&mut self, phrase: &Phrase, wordlist: &WordList, limit: usize) {
        if let Focus::Slot { index, suggestions, highlighted } = self {
            *suggestions = wordlist.suggest(phrase.get(*index), limit);
            *highlighted = 0;
        }
    }

    /// Hide suggestions but keep the slot focused
    pub fn dismiss_suggestions(&mut self) -> bool {
        match self {
            Focus::Slot { suggestions, highlighted, .. } if !suggestions.is_empty() => {
                suggestions.clear();
                *highlighted = 0;
                true
            }
            _ => false,
        }
    }

    /// Move the highlight by `delta`, wrapping
    pub fn move_highlight(&mut self, delta: isize) {
        if let Focus::Slot { suggestions, highlighted, .. } = self {
            if suggestions.is_empty() {
                return;
            }
            let len = suggestions.len() as isize;
            *highlighted = (*highlighted as isize + delta).rem_euclid(len) as usize;
        }
    }

    /// Take the suggestion at `choice` (or the highlighted one) for the
    /// focused slot. Returns the slot index and the chosen word.
    pub fn take_suggestion(&mut self, choice: Option<usize>) -> Option<(usize, String)> {
        let Focus::Slot { index, suggestions, highlighted } = self else {
            return None;
        };
        let pick = choice.unwrap_or(*highlighted);
        if pick >= suggestions.len() {
            return None;
        }
        let word = suggestions.swap_remove(pick);
        suggestions.clear();
        *highlighted = 0;
        Some((*index, word))
    }

    /// Next control in tab order: slots 0..12, then Submit, wrapping
    pub fn next_target(&self) -> FocusTarget {
        match self {
            Focus::None => FocusTarget::Slot(0),
            Focus::Slot { index, .. } if *index + 1 < PHRASE_LEN => FocusTarget::Slot(index + 1),
            Focus::Slot { .. } => FocusTarget::Submit,
            Focus::Submit => FocusTarget::Slot(0),
        }
    }

    pub fn prev_target(&self) -> FocusTarget {
        match self {
            Focus::None | Focus::Submit => FocusTarget::Slot(PHRASE_LEN - 1),
            Focus::Slot { index: 0, .. } => FocusTarget::Submit,
            Focus::Slot { index, .. } => FocusTarget::Slot(index - 1),
        }
    }
}

/// A control that can receive focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusTarget {
    Slot(usize),
    Submit,
}
