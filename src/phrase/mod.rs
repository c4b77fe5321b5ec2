pub mod focus;

use serde::Serialize;

use crate::wordlist::WordList;

/// Number of words in a recovery phrase
pub const PHRASE_LEN: usize = 12;

/// Per-slot invalid flags (`true` = invalid)
pub type Validity = [bool; PHRASE_LEN];

/// The words the user has entered, one per slot
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Phrase {
    slots: [String; PHRASE_LEN],
}

impl Phrase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a phrase from whitespace-separated words (extra words are ignored)
    pub fn from_words<'a>(words: impl IntoIterator<Item = &'a str>) -> Self {
        let mut phrase = Self::new();
        for (i, word) in words.into_iter().take(PHRASE_LEN).enumerate() {
            phrase.set(i, word);
        }
        phrase
    }

    pub fn get(&self, index: usize) -> &str {
        self.slots.get(index).map(String::as_str).unwrap_or("")
    }

    /// Store a slot's text, lowercased
    pub fn set(&mut self, index: usize, text: &str) {
        if let Some(slot) = self.slots.get_mut(index) {
            *slot = text.to_lowercase();
        }
    }

    pub fn push_char(&mut self, index: usize, c: char) {
        if let Some(slot) = self.slots.get_mut(index) {
            slot.extend(c.to_lowercase());
        }
    }

    pub fn pop_char(&mut self, index: usize) -> Option<char> {
        self.slots.get_mut(index).and_then(String::pop)
    }

    pub fn clear_slot(&mut self, index: usize) {
        if let Some(slot) = self.slots.get_mut(index) {
            slot.clear();
        }
    }

    pub fn is_slot_empty(&self, index: usize) -> bool {
        self.get(index).trim().is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.slots.iter().map(String::as_str)
    }
}

/// Whether a single entry is invalid against the list.
/// Empty entries are never invalid; an empty list flags nothing.
pub fn is_invalid(word: &str, wordlist: &WordList) -> bool {
    let word = word.trim();
    if word.is_empty() || wordlist.is_empty() {
        return false;
    }
    !wordlist.contains(word)
}

/// Recompute the invalid flags for every slot
pub fn validate(phrase: &Phrase, wordlist: &WordList) -> Validity {
    let mut flags = [false; PHRASE_LEN];
    for (flag, word) in flags.iter_mut().zip(phrase.iter()) {
        *flag = is_invalid(word, wordlist);
    }
    flags
}

/// What to do with a submission while no word list is loaded
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EmptyListPolicy {
    /// Every word counts as valid
    #[default]
    Vacuous,
    /// Refuse to accept anything
    Reject,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum SubmitOutcome {
    Accepted,
    Rejected {
        /// 0-based indices of empty slots
        empty: Vec<usize>,
        /// 0-based indices of words not in the list
        invalid: Vec<usize>,
        wordlist_missing: bool,
    },
    /// More words were given than a phrase holds
    TooManyWords { count: usize },
}

impl SubmitOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, SubmitOutcome::Accepted)
    }

    pub fn headline(&self) -> &'static str {
        match self {
            SubmitOutcome::Accepted => "Recovery phrase verified!",
            SubmitOutcome::Rejected { .. } => "Please check and fill in all words!",
            SubmitOutcome::TooManyWords { .. } => "Too many words for a recovery phrase!",
        }
    }

    /// Human-readable details, slot numbers 1-based
    pub fn details(&self) -> Vec<String> {
        let (empty, invalid, wordlist_missing) = match self {
            SubmitOutcome::Accepted => return Vec::new(),
            SubmitOutcome::TooManyWords { count } => {
                return vec![format!("Expected {} words, got {}", PHRASE_LEN, count)];
            }
            SubmitOutcome::Rejected { empty, invalid, wordlist_missing } => {
                (empty, invalid, wordlist_missing)
            }
        };

        let numbers = |slots: &[usize]| {
            slots
                .iter()
                .map(|i| (i + 1).to_string())
                .collect::<Vec<_>>()
                .join(", ")
        };

        let mut lines = Vec::new();
        if *wordlist_missing {
            lines.push("No word list is loaded".to_string());
        }
        if !empty.is_empty() {
            lines.push(format!("Empty: {}", numbers(empty)));
        }
        if !invalid.is_empty() {
            lines.push(format!("Not in word list: {}", numbers(invalid)));
        }
        lines
    }
}

/// Accept iff every slot is filled and none is flagged invalid
pub fn check_submission(
    phrase: &Phrase,
    wordlist: &WordList,
    policy: EmptyListPolicy,
) -> SubmitOutcome {
    let flags = validate(phrase, wordlist);
    let empty: Vec<usize> = (0..PHRASE_LEN).filter(|&i| phrase.is_slot_empty(i)).collect();
    let invalid: Vec<usize> = (0..PHRASE_LEN).filter(|&i| flags[i]).collect();
    let wordlist_missing = wordlist.is_empty() && policy == EmptyListPolicy::Reject;

    if empty.is_empty() && invalid.is_empty() && !wordlist_missing {
        SubmitOutcome::Accepted
    } else {
        SubmitOutcome::Rejected {
            empty,
            invalid,
            wordlist_missing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str =
        "legal winner thank year wave sausage worth useful legal winner thank yellow";

    fn valid_phrase() -> Phrase {
        Phrase::from_words(VALID.split_whitespace())
    }

    #[test]
    fn test_listed_words_are_never_invalid() {
        let list = WordList::bundled();
        for word in ["abandon", "ZOO", "Legal", "  winner  "] {
            assert!(!is_invalid(word, &list), "{} flagged", word);
        }
    }

    #[test]
    fn test_unlisted_words_are_invalid() {
        let list = WordList::bundled();
        for word in ["xyz123", "abandonn", "a", "bitcoin"] {
            assert!(is_invalid(word, &list), "{} not flagged", word);
        }
    }

    #[test]
    fn test_empty_slots_are_never_invalid() {
        let list = WordList::bundled();
        assert!(!is_invalid("", &list));
        assert!(!is_invalid("   ", &list));
        assert_eq!(validate(&Phrase::new(), &list), [false; PHRASE_LEN]);
    }

    #[test]
    fn test_empty_list_flags_nothing() {
        let mut phrase = valid_phrase();
        phrase.set(3, "xyz123");
        assert_eq!(validate(&phrase, &WordList::default()), [false; PHRASE_LEN]);
    }

    #[test]
    fn test_validate_marks_only_bad_slots() {
        let mut phrase = valid_phrase();
        phrase.set(0, "xyz123");
        phrase.clear_slot(5);

        let flags = validate(&phrase, &WordList::bundled());
        assert!(flags[0]);
        assert!(!flags[5]);
        assert_eq!(flags.iter().filter(|f| **f).count(), 1);
    }

    #[test]
    fn test_set_lowercases() {
        let mut phrase = Phrase::new();
        phrase.set(0, "Abandon");
        phrase.push_char(1, 'Z');
        assert_eq!(phrase.get(0), "abandon");
        assert_eq!(phrase.get(1), "z");
    }

    #[test]
    fn test_valid_phrase_is_accepted() {
        let outcome = check_submission(&valid_phrase(), &WordList::bundled(), EmptyListPolicy::Vacuous);
        assert_eq!(outcome, SubmitOutcome::Accepted);
        assert_eq!(outcome.headline(), "Recovery phrase verified!");
    }

    #[test]
    fn test_empty_slot_is_rejected() {
        let mut phrase = valid_phrase();
        phrase.clear_slot(11);

        let outcome = check_submission(&phrase, &WordList::bundled(), EmptyListPolicy::Vacuous);
        assert_eq!(
            outcome,
            SubmitOutcome::Rejected {
                empty: vec![11],
                invalid: vec![],
                wordlist_missing: false,
            }
        );
        assert_eq!(outcome.details(), vec!["Empty: 12".to_string()]);
    }

    #[test]
    fn test_unknown_word_is_rejected() {
        let mut phrase = valid_phrase();
        phrase.set(2, "xyz123");

        let outcome = check_submission(&phrase, &WordList::bundled(), EmptyListPolicy::Vacuous);
        assert!(!outcome.is_accepted());
        assert_eq!(outcome.details(), vec!["Not in word list: 3".to_string()]);
    }

    #[test]
    fn test_empty_list_accepts_by_default() {
        let mut phrase = valid_phrase();
        phrase.set(2, "xyz123");
        let outcome = check_submission(&phrase, &WordList::default(), EmptyListPolicy::Vacuous);
        assert!(outcome.is_accepted());
    }

    #[test]
    fn test_empty_list_rejects_under_reject_policy() {
        let outcome = check_submission(&valid_phrase(), &WordList::default(), EmptyListPolicy::Reject);
        assert_eq!(
            outcome,
            SubmitOutcome::Rejected {
                empty: vec![],
                invalid: vec![],
                wordlist_missing: true,
            }
        );
    }

    #[test]
    fn test_outcome_serializes_with_tag() {
        let json = serde_json::to_value(SubmitOutcome::Accepted).unwrap();
        assert_eq!(json["result"], "accepted");
    }
}
