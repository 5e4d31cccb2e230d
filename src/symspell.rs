//! The SymSpell deletion index.
//!
//! A worker-local structure mapping each "deletion key" (a dictionary word
//! with one character removed) to the dictionary words that produced it.
//! Answers membership (`check`) and edit-distance-1 candidate (`candidates`)
//! queries in time proportional to the query word's length rather than the
//! size of the dictionary.
//!
//! Candidate lists hold `Rc<str>` rather than raw pointers into a shared
//! byte buffer: each index is built and consulted entirely within one
//! worker thread, so reference counting gives the same "outlives the index"
//! guarantee the original's pointers relied on, without unsafe code.

use std::collections::{HashMap, HashSet};
use std::rc::Rc;

pub struct DeletionIndex {
    dict: HashSet<Rc<str>>,
    map: HashMap<String, Vec<Rc<str>>>,
}

impl DeletionIndex {
    pub fn new() -> Self {
        Self {
            dict: HashSet::new(),
            map: HashMap::new(),
        }
    }

    /// Builds an index from a dictionary shard, applying the capitalisation
    /// augmentation: every word starting with a lowercase letter also gets
    /// its first-letter-uppercased variant inserted.
    pub fn build(words: &[String]) -> Self {
        let mut index = Self::new();
        for word in words {
            index.insert(word);
            if let Some(capitalised) = capitalise(word) {
                index.insert(&capitalised);
            }
        }
        index
    }

    /// Inserts `word`, idempotent if already present.
    pub fn insert(&mut self, word: &str) {
        if self.dict.contains(word) {
            return;
        }
        let interned: Rc<str> = Rc::from(word);
        self.dict.insert(interned.clone());
        self.map.entry(word.to_string()).or_default().push(interned.clone());

        if word.len() < 2 {
            return;
        }
        let bytes = word.as_bytes();
        let mut last: Option<u8> = None;
        for i in 0..bytes.len() {
            let c = bytes[i];
            if Some(c) == last {
                continue;
            }
            last = Some(c);
            let key = deletion_key(word, i);
            self.map.entry(key).or_default().push(interned.clone());
        }
    }

    /// Byte-exact membership test. No case folding at query time.
    pub fn check(&self, word: &str) -> bool {
        self.dict.contains(word)
    }

    /// Candidate words at edit distance exactly 1 from `word`.
    ///
    /// Precondition: `!self.check(word)`.
    pub fn candidates(&self, word: &str) -> Vec<Rc<str>> {
        assert!(
            !self.check(word),
            "candidates() called on a word already in the dictionary: {word:?}"
        );

        let mut out = Vec::new();
        if let Some(words) = self.map.get(word) {
            out.extend(words.iter().cloned());
        }

        if word.len() < 2 {
            return out;
        }
        let bytes = word.as_bytes();
        let mut last: Option<u8> = None;
        for i in 0..bytes.len() {
            let c = bytes[i];
            if Some(c) == last {
                continue;
            }
            last = Some(c);
            let key = deletion_key(word, i);
            if let Some(words) = self.map.get(&key) {
                for candidate in words {
                    if edit_distance(word, candidate) == 1 {
                        out.push(candidate.clone());
                    }
                }
            }
        }
        out
    }

    pub fn dictionary_len(&self) -> usize {
        self.dict.len()
    }
}

impl Default for DeletionIndex {
    fn default() -> Self {
        Self::new()
    }
}

/// `word` with the byte at position `i` removed. `i` is always a char
/// boundary here because inputs are ASCII (§1 Non-goals).
fn deletion_key(word: &str, i: usize) -> String {
    let mut key = String::with_capacity(word.len() - 1);
    key.push_str(&word[..i]);
    key.push_str(&word[i + 1..]);
    key
}

/// The first-letter-uppercased variant of `word`, or `None` if its first
/// byte is not an ASCII lowercase letter.
fn capitalise(word: &str) -> Option<String> {
    let mut chars = word.chars();
    let first = chars.next()?;
    if first.is_ascii_lowercase() {
        Some(first.to_ascii_uppercase().to_string() + chars.as_str())
    } else {
        None
    }
}

/// Standard Levenshtein distance (insertion, deletion, substitution; no
/// transposition — see the Open Questions entry in SPEC_FULL.md §9).
pub fn edit_distance(a: &str, b: &str) -> usize {
    let a = a.as_bytes();
    let b = b.as_bytes();
    let (n, m) = (a.len(), b.len());

    let mut dp = vec![0usize; m + 1];
    for (j, cell) in dp.iter_mut().enumerate() {
        *cell = j;
    }

    for i in 1..=n {
        let mut prev_diag = dp[0];
        dp[0] = i;
        for j in 1..=m {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            let above = dp[j];
            let insertion = dp[j - 1] + 1;
            let deletion = above + 1;
            let substitution = prev_diag + cost;
            prev_diag = above;
            dp[j] = insertion.min(deletion).min(substitution);
        }
    }
    dp[m]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edit_distance_basic() {
        assert_eq!(edit_distance("apple", "apple"), 0);
        assert_eq!(edit_distance("aple", "apple"), 1);
        assert_eq!(edit_distance("at", "bat"), 1);
        assert_eq!(edit_distance("ab", "ba"), 2); // no transposition credit
    }

    #[test]
    fn insert_and_check_round_trip() {
        let mut idx = DeletionIndex::new();
        idx.insert("hello");
        assert!(idx.check("hello"));
        assert!(!idx.check("hell"));
    }

    #[test]
    fn duplicate_adjacent_skip_deduplicates_map_entries() {
        let mut idx = DeletionIndex::new();
        idx.insert("hello");
        // Both deletions of the repeated 'l' yield "helo"; only one entry
        // should have been recorded under that key for "hello".
        assert!(!idx.check("helo"));
        let candidates = idx.candidates("helo");
        let count = candidates.iter().filter(|c| c.as_ref() == "hello").count();
        assert_eq!(count, 1);
    }

    #[test]
    fn capitalisation_augmentation() {
        let index = DeletionIndex::build(&["apple".to_string()]);
        assert!(index.check("apple"));
        assert!(index.check("Apple"));
        assert!(!index.check("APPLE"));
    }

    #[test]
    fn candidates_single_char_word_has_no_deletion_keys() {
        let index = DeletionIndex::build(&["a".to_string(), "ab".to_string()]);
        assert!(!index.check("b"));
        // "b" is too short to generate a deletion key and isn't a key of
        // any dictionary word either.
        assert!(index.candidates("b").is_empty());
    }

    #[test]
    #[should_panic]
    fn candidates_precondition_panics_on_known_word() {
        let index = DeletionIndex::build(&["apple".to_string()]);
        let _ = index.candidates("apple");
    }

    #[test]
    fn candidates_multiple_sorted_example() {
        // S3 from SPEC_FULL.md: dictionary cat/bat/hat/rat, query "at".
        let index = DeletionIndex::build(
            &["cat", "bat", "hat", "rat"]
                .iter()
                .map(|s| s.to_string())
                .collect::<Vec<_>>(),
        );
        assert!(!index.check("at"));
        let mut words: Vec<String> = index
            .candidates("at")
            .iter()
            .map(|c| c.to_string())
            .collect();
        words.sort();
        words.dedup();
        assert_eq!(words, vec!["bat", "cat", "hat", "rat"]);
    }
}
