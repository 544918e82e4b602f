//! LineScanner: phrase matches within a single line
//!
//! For every start position the longest dictionary key that is also a whole
//! phrase (boundary-valid on both sides) wins, so "new york" beats "new" and
//! "cat" never fires inside "category". Overlaps between different start
//! positions are left for the overlap resolver.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::config::OffsetUnit;
use crate::scanner::dictionary::PhraseDictionary;
use crate::scanner::script::{is_phrase_boundary, FoldedText, OffsetMap};

/// A located phrase: half-open span plus the normalized key
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
pub struct PhraseInfo {
    pub from: usize,
    pub to: usize,
    pub phrase: String,
}

/// Scans lines against one dictionary snapshot
#[derive(Debug, Clone)]
pub struct LineScanner {
    dictionary: Arc<PhraseDictionary>,
    unit: OffsetUnit,
}

impl LineScanner {
    pub fn new(dictionary: Arc<PhraseDictionary>, unit: OffsetUnit) -> Self {
        Self { dictionary, unit }
    }

    pub fn unit(&self) -> OffsetUnit {
        self.unit
    }

    /// All accepted matches in `line`, sorted by `from`, offset by
    /// `base_offset` (in the scanner's unit)
    pub fn scan_line(&self, line: &str, base_offset: usize) -> Vec<PhraseInfo> {
        let matches = self.scan_line_bytes(line);
        if matches.is_empty() {
            return matches;
        }

        let map = OffsetMap::new(line, self.unit);
        matches
            .into_iter()
            .map(|info| PhraseInfo {
                from: base_offset + map.to_unit(info.from),
                to: base_offset + map.to_unit(info.to),
                phrase: info.phrase,
            })
            .collect()
    }

    /// Same matches as `scan_line`, as byte ranges into `line` with no base
    /// offset, for callers that slice the original text
    pub fn scan_line_bytes(&self, line: &str) -> Vec<PhraseInfo> {
        if line.is_empty() || self.dictionary.is_empty() {
            return Vec::new();
        }

        let folded = FoldedText::new(line);

        // start -> (end, key), longest boundary-valid candidate per start
        let mut best: BTreeMap<usize, (usize, &str)> = BTreeMap::new();

        for candidate in self.dictionary.candidates(folded.as_str()) {
            let Some((start, end)) = folded.original_span(candidate.start, candidate.end) else {
                continue;
            };
            if start >= end || !is_phrase_boundary(line, start, end) {
                continue;
            }
            best.entry(start)
                .and_modify(|slot| {
                    if end > slot.0 {
                        *slot = (end, candidate.key);
                    }
                })
                .or_insert((end, candidate.key));
        }

        best.into_iter()
            .map(|(from, (to, key))| PhraseInfo { from, to, phrase: key.to_string() })
            .collect()
    }
}

// =============================================================================
// Tests
// =============================================================================
