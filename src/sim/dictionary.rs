//! Word validation backed by a prefix tree
//!
//! The tree is built once and never mutated afterwards, so one instance can
//! be shared (e.g. behind an `Arc`) by every game and every in-flight
//! validation.

use std::future::Future;
use std::path::Path;

use thiserror::Error;

/// Word list compiled into the binary
pub const BUNDLED_WORDS: &str = include_str!("../../assets/words.txt");

const ALPHABET: usize = 26;
const NO_CHILD: u32 = 0;

#[derive(Debug, Error)]
pub enum DictionaryError {
    #[error("failed to read word list: {0}")]
    Io(#[from] std::io::Error),
    #[error("word list contains no usable words")]
    Empty,
    #[error("validator unavailable: {0}")]
    Unavailable(String),
}

/// Asynchronous membership test.
///
/// Callers must enforce the minimum word length themselves and treat an
/// `Err` exactly like "not a word".
pub trait WordValidator {
    fn validate(&self, word: &str) -> impl Future<Output = Result<bool, DictionaryError>>;
}

#[derive(Debug, Clone, Default)]
struct Node {
    children: [u32; ALPHABET],
    terminal: bool,
}

/// Read-only prefix tree over uppercase ASCII words
#[derive(Debug, Clone)]
pub struct Dictionary {
    nodes: Vec<Node>,
    words: usize,
}

impl Default for Dictionary {
    fn default() -> Self {
        Self {
            nodes: vec![Node::default()],
            words: 0,
        }
    }
}

impl Dictionary {
    /// Build from newline separated words. Lines with anything but ASCII
    /// letters are skipped; `#` starts a comment line.
    pub fn from_word_list(text: &str) -> Result<Self, DictionaryError> {
        let mut dict = Self::default();
        for line in text.lines() {
            let word = line.trim();
            if word.is_empty() || word.starts_with('#') {
                continue;
            }
            dict.insert(word);
        }
        if dict.words == 0 {
            return Err(DictionaryError::Empty);
        }
        log::info!("Dictionary loaded ({} words)", dict.words);
        Ok(dict)
    }

    /// The word list shipped with the crate
    pub fn bundled() -> Result<Self, DictionaryError> {
        Self::from_word_list(BUNDLED_WORDS)
    }

    /// Load a word list from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DictionaryError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_word_list(&text)
    }

    /// Insert a word, returning false if it was rejected or already present
    pub fn insert(&mut self, word: &str) -> bool {
        if word.is_empty() || !word.bytes().all(|b| b.is_ascii_alphabetic()) {
            return false;
        }
        let mut node = 0usize;
        for b in word.bytes() {
            let slot = letter_slot(b);
            let child = self.nodes[node].children[slot];
            node = if child == NO_CHILD {
                self.nodes.push(Node::default());
                let new_idx = self.nodes.len() - 1;
                self.nodes[node].children[slot] = new_idx as u32;
                new_idx
            } else {
                child as usize
            };
        }
        if self.nodes[node].terminal {
            return false;
        }
        self.nodes[node].terminal = true;
        self.words += 1;
        true
    }

    /// Number of distinct words
    pub fn len(&self) -> usize {
        self.words
    }

    pub fn is_empty(&self) -> bool {
        self.words == 0
    }

    /// Case-insensitive exact lookup, O(word length)
    pub fn contains(&self, word: &str) -> bool {
        self.walk(word).is_some_and(|n| self.nodes[n].terminal)
    }

    /// Whether any word starts with `prefix`
    pub fn has_prefix(&self, prefix: &str) -> bool {
        self.walk(prefix).is_some()
    }

    fn walk(&self, text: &str) -> Option<usize> {
        let mut node = 0usize;
        for b in text.bytes() {
            if !b.is_ascii_alphabetic() {
                return None;
            }
            let child = self.nodes[node].children[letter_slot(b)];
            if child == NO_CHILD {
                return None;
            }
            node = child as usize;
        }
        Some(node)
    }
}

impl WordValidator for Dictionary {
    fn validate(&self, word: &str) -> impl Future<Output = Result<bool, DictionaryError>> {
        let found = self.contains(word);
        async move { Ok(found) }
    }
}

#[inline]
fn letter_slot(b: u8) -> usize {
    (b.to_ascii_uppercase() - b'A') as usize
}
