//! Script-aware tokenization helpers.
//!
//! Two regimes decide where a phrase may start or end:
//! - Han ideographs carry no inter-word whitespace, so every position next
//!   to one is a boundary.
//! - Everything else is delimited by a fixed set of terminating characters.
//!
//! `FoldedText` is the case- and whitespace-folded view of a line the
//! automaton runs over, with a map back to the original byte offsets.
//! `OffsetMap` turns those byte offsets into the host's `OffsetUnit`.

use crate::config::OffsetUnit;

/// Characters that end a token outside Han runs
pub fn is_terminator(c: char) -> bool {
    matches!(
        c,
        '!' | '@' | '#' | '$' | '%' | '^' | '&' | '*' | '(' | ')' | '+' | '='
            | '{' | '}' | '[' | ']' | ':' | ';' | '"' | '\'' | '<' | '>' | ','
            | '.' | '?' | '/' | '|' | '\\'
    ) || c.is_whitespace()
}

/// Han script ideographs (CJK unified, extensions, compatibility, radicals)
pub fn is_han(c: char) -> bool {
    matches!(
        c as u32,
        0x2E80..=0x2E99
            | 0x2E9B..=0x2EF3
            | 0x2F00..=0x2FD5
            | 0x3005
            | 0x3007
            | 0x3021..=0x3029
            | 0x3038..=0x303B
            | 0x3400..=0x4DBF
            | 0x4E00..=0x9FFF
            | 0xF900..=0xFA6D
            | 0xFA70..=0xFAD9
            | 0x20000..=0x2A6DF
            | 0x2A700..=0x2EBEF
            | 0x2F800..=0x2FA1F
            | 0x30000..=0x323AF
    )
}

/// True when `line[start..end]` is a whole phrase under the active regime.
///
/// `start`/`end` must be char boundaries with `start < end`.
pub fn is_phrase_boundary(line: &str, start: usize, end: usize) -> bool {
    let phrase = &line[start..end];
    let (Some(first), Some(last)) = (phrase.chars().next(), phrase.chars().next_back()) else {
        return false;
    };

    let opens = match line[..start].chars().next_back() {
        None => true,
        Some(prev) => is_han(first) || is_han(prev) || is_terminator(prev),
    };
    let closes = match line[end..].chars().next() {
        None => true,
        Some(next) => is_han(last) || is_han(next) || is_terminator(next),
    };

    opens && closes
}

// =============================================================================
// FoldedText
// =============================================================================

/// Lower-cased copy of a line with whitespace runs collapsed to one space.
///
/// Each char is folded on its own with `char::to_lowercase`, so the result
/// matches `normalize_phrase` exactly and never depends on locale. A `\n`
/// is kept as-is and ends any whitespace run, so no key (keys never hold a
/// line break) can match across lines even when a caller passes multi-line
/// text to `scan_line`.
#[derive(Debug, Clone)]
pub struct FoldedText {
    text: String,
    /// `origin[i]` is the original byte offset for folded offset `i` when `i`
    /// starts the expansion of an original char (or is the end of text)
    origin: Vec<Option<usize>>,
}

impl FoldedText {
    pub fn new(line: &str) -> Self {
        let mut text = String::with_capacity(line.len());
        let mut origin = Vec::with_capacity(line.len() + 1);
        let mut chars = line.char_indices().peekable();

        while let Some((at, c)) = chars.next() {
            origin.push(Some(at));
            if c == '\n' {
                text.push('\n');
            } else if c.is_whitespace() {
                while chars.next_if(|&(_, n)| n.is_whitespace() && n != '\n').is_some() {}
                text.push(' ');
            } else {
                text.extend(c.to_lowercase());
            }
            origin.resize(text.len(), None);
        }
        origin.push(Some(line.len()));

        Self { text, origin }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Map a folded span back to the original line, if both ends fall on
    /// original char boundaries
    pub fn original_span(&self, start: usize, end: usize) -> Option<(usize, usize)> {
        let from = self.origin.get(start).copied().flatten()?;
        let to = self.origin.get(end).copied().flatten()?;
        Some((from, to))
    }
}

// =============================================================================
// OffsetMap
// =============================================================================

/// Byte offsets of one line converted to an `OffsetUnit`.
///
/// Byte units and ASCII lines map to themselves; otherwise a table of
/// `(byte, unit)` pairs at every char boundary is built once per line, so
/// converting many spans costs a binary search each.
#[derive(Debug, Clone)]
pub struct OffsetMap {
    table: Option<Vec<(usize, usize)>>,
}

impl OffsetMap {
    pub fn new(line: &str, unit: OffsetUnit) -> Self {
        if unit == OffsetUnit::Byte || line.is_ascii() {
            return Self { table: None };
        }

        let mut table = Vec::with_capacity(line.len() + 1);
        let mut position = 0;
        for (at, c) in line.char_indices() {
            table.push((at, position));
            position += match unit {
                OffsetUnit::Utf16 => c.len_utf16(),
                _ => 1,
            };
        }
        table.push((line.len(), position));
        Self { table: Some(table) }
    }

    /// `byte` in the map's unit. Offsets inside a char round down to its start.
    pub fn to_unit(&self, byte: usize) -> usize {
        let Some(table) = &self.table else {
            return byte;
        };
        match table.binary_search_by_key(&byte, |&(b, _)| b) {
            Ok(i) => table[i].1,
            Err(i) => table[i.saturating_sub(1)].1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminators() {
        for c in "!@#$%^&*()+={}[]:;\"'<>,.?/|\\\r\n \t".chars() {
            assert!(is_terminator(c), "{:?} should terminate", c);
        }
        for c in "aZ09-_~`".chars() {
            assert!(!is_terminator(c), "{:?} should not terminate", c);
        }
    }

    #[test]
    fn test_han_detection() {
        assert!(is_han('中'));
        assert!(is_han('々'));
        assert!(is_han('𠀀'));
        assert!(!is_han('a'));
        assert!(!is_han('あ'));
        assert!(!is_han('한'));
    }

    #[test]
    fn test_boundary_rejects_partial_words() {
        let line = "category";
        assert!(!is_phrase_boundary(line, 0, 3));
        let line = "the cat sat";
        assert!(is_phrase_boundary(line, 4, 7));
        let line = "(cat)";
        assert!(is_phrase_boundary(line, 1, 4));
        let line = "bobcat";
        assert!(!is_phrase_boundary(line, 3, 6));
    }

    #[test]
    fn test_boundary_inside_han_run() {
        let line = "我们喜欢机器学习方法";
        let start = line.find("机器").unwrap();
        assert!(is_phrase_boundary(line, start, start + "机器".len()));
    }

    #[test]
    fn test_fold_lowercases_and_collapses() {
        let folded = FoldedText::new("New \t York");
        assert_eq!(folded.as_str(), "new york");
        assert_eq!(folded.original_span(0, 8), Some((0, 10)));
        assert_eq!(folded.original_span(4, 8), Some((6, 10)));
    }

    #[test]
    fn test_fold_rejects_split_expansions() {
        // 'İ' lowercases to "i\u{307}" (3 bytes); offset 1 sits inside it
        let folded = FoldedText::new("İx");
        assert_eq!(folded.as_str(), "i\u{307}x");
        assert_eq!(folded.original_span(0, 1), None);
        assert_eq!(folded.original_span(0, 3), Some((0, 2)));
    }

    #[test]
    fn test_fold_keeps_line_breaks() {
        let folded = FoldedText::new("New\nYork");
        assert_eq!(folded.as_str(), "new\nyork");

        // Whitespace around a break collapses on each side of it
        let folded = FoldedText::new("a \t\n  b");
        assert_eq!(folded.as_str(), "a \n b");
        assert_eq!(folded.original_span(4, 5), Some((6, 7)));
    }

    #[test]
    fn test_offset_map_units() {
        let line = "😀 café";
        let e = line.find('é').unwrap();

        let chars = OffsetMap::new(line, OffsetUnit::Char);
        assert_eq!((chars.to_unit(0), chars.to_unit(e), chars.to_unit(line.len())), (0, 5, 6));

        let utf16 = OffsetMap::new(line, OffsetUnit::Utf16);
        assert_eq!((utf16.to_unit(4), utf16.to_unit(e), utf16.to_unit(line.len())), (2, 6, 7));

        let bytes = OffsetMap::new(line, OffsetUnit::Byte);
        assert_eq!(bytes.to_unit(e), e);

        // Inside the emoji rounds down to its start
        assert_eq!(chars.to_unit(2), 0);
    }

    #[test]
    fn test_offset_map_ascii_is_identity() {
        let map = OffsetMap::new("plain text", OffsetUnit::Utf16);
        assert_eq!(map.to_unit(6), 6);
    }

    #[test]
    fn test_fold_empty() {
        let folded = FoldedText::new("");
        assert_eq!(folded.as_str(), "");
        assert_eq!(folded.original_span(0, 0), Some((0, 0)));
    }
}
