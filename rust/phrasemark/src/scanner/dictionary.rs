//! PhraseDictionary: normalized phrase keys -> definition records
//!
//! Every primary phrase and alias is normalized and compiled into one
//! Aho-Corasick automaton. The automaton runs in standard (overlapping) mode
//! so the line scanner sees every candidate and can pick the longest one
//! that respects word boundaries.
//!
//! Dictionaries are immutable once built. Hosts rebuild wholesale and swap
//! the new one in through a `DictionaryHandle`.

use aho_corasick::{AhoCorasick, AhoCorasickBuilder, MatchKind};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::error::Result;
use crate::source::DefinitionRecord;

/// Lower-case (per char, locale-independent) and collapse whitespace runs
pub fn normalize_phrase(phrase: &str) -> String {
    let mut key = String::with_capacity(phrase.len());
    for word in phrase.split_whitespace() {
        if !key.is_empty() {
            key.push(' ');
        }
        key.extend(word.chars().flat_map(char::to_lowercase));
    }
    key
}

/// A raw candidate from the automaton, in folded-text byte offsets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Candidate<'a> {
    pub start: usize,
    pub end: usize,
    pub key: &'a str,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct DictionaryStats {
    pub key_count: usize,
    pub record_count: usize,
    pub multi_word_keys: usize,
    pub longest_key_chars: usize,
}

// =============================================================================
// PhraseDictionary
// =============================================================================

#[derive(Debug, Default)]
pub struct PhraseDictionary {
    records: Vec<Arc<DefinitionRecord>>,
    /// key -> index into `records`
    index: HashMap<String, usize>,
    /// pattern id -> key
    patterns: Vec<String>,
    automaton: Option<AhoCorasick>,
}

impl PhraseDictionary {
    /// Build from records. A key claimed by several records resolves to the
    /// last one.
    pub fn build<I>(records: I) -> Result<Self>
    where
        I: IntoIterator<Item = DefinitionRecord>,
    {
        let mut dictionary = PhraseDictionary::default();

        for record in records {
            let slot = dictionary.records.len();
            for phrase in record.phrases() {
                let key = normalize_phrase(phrase);
                if !key.is_empty() {
                    dictionary.index.insert(key, slot);
                }
            }
            dictionary.records.push(Arc::new(record));
        }

        let mut patterns: Vec<String> = dictionary.index.keys().cloned().collect();
        patterns.sort();

        if !patterns.is_empty() {
            let automaton = AhoCorasickBuilder::new()
                .match_kind(MatchKind::Standard)
                .build(&patterns)?;
            dictionary.automaton = Some(automaton);
        }
        dictionary.patterns = patterns;

        Ok(dictionary)
    }

    /// Look up an already-normalized key
    pub fn lookup(&self, key: &str) -> Option<&DefinitionRecord> {
        self.index.get(key).map(|&slot| self.records[slot].as_ref())
    }

    /// Normalize `phrase`, then look it up
    pub fn resolve(&self, phrase: &str) -> Option<&DefinitionRecord> {
        self.lookup(&normalize_phrase(phrase))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// All keys in sorted order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    pub fn stats(&self) -> DictionaryStats {
        DictionaryStats {
            key_count: self.len(),
            record_count: self.record_count(),
            multi_word_keys: self.keys().filter(|k| k.contains(' ')).count(),
            longest_key_chars: self.keys().map(|k| k.chars().count()).max().unwrap_or(0),
        }
    }

    /// Every key occurrence in `folded`, overlapping ones included
    pub(crate) fn candidates<'a>(&'a self, folded: &'a str) -> impl Iterator<Item = Candidate<'a>> + 'a {
        self.automaton
            .iter()
            .flat_map(move |automaton| automaton.find_overlapping_iter(folded))
            .map(move |mat| Candidate {
                start: mat.start(),
                end: mat.end(),
                key: self.patterns[mat.pattern().as_usize()].as_str(),
            })
    }
}

// =============================================================================
// DictionaryHandle
// =============================================================================

/// Shared, swappable reference to the current dictionary.
///
/// Scanners take a `snapshot()` and keep it for the whole scan, so a
/// `replace()` never exposes a half-built dictionary.
#[derive(Debug, Clone, Default)]
pub struct DictionaryHandle {
    current: Arc<RwLock<Arc<PhraseDictionary>>>,
}

impl DictionaryHandle {
    pub fn new(dictionary: PhraseDictionary) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(dictionary))),
        }
    }

    pub fn snapshot(&self) -> Arc<PhraseDictionary> {
        match self.current.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    /// Swap in a rebuilt dictionary
    pub fn replace(&self, dictionary: PhraseDictionary) {
        let next = Arc::new(dictionary);
        match self.current.write() {
            Ok(mut guard) => *guard = next,
            Err(poisoned) => *poisoned.into_inner() = next,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
