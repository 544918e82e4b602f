//! Region scanning: multi-line text with external offsets.
//!
//! Lines are scanned independently, each at its running offset (line length
//! plus one for the consumed `\n`), and overlap resolution runs once over
//! the merged region.

use crate::scanner::line::{LineScanner, PhraseInfo};
use crate::scanner::overlap::sort_and_resolve;

/// Scan `text` whose first char sits at `base_offset`. Returns resolved,
/// non-overlapping spans in ascending order.
pub fn scan_region(scanner: &LineScanner, text: &str, base_offset: usize) -> Vec<PhraseInfo> {
    let unit = scanner.unit();
    let mut infos = Vec::new();
    let mut offset = base_offset;

    for line in text.split('\n') {
        infos.extend(scanner.scan_line(line, offset));
        offset += unit.measure(line) + 1;
    }

    sort_and_resolve(infos, base_offset)
}

/// Scan several `(text, base_offset)` slices, e.g. the visible ranges of a
/// view, concatenating each slice's resolved spans in order
pub fn scan_ranges<'a, I>(scanner: &LineScanner, ranges: I) -> Vec<PhraseInfo>
where
    I: IntoIterator<Item = (&'a str, usize)>,
{
    ranges
        .into_iter()
        .flat_map(|(text, base_offset)| scan_region(scanner, text, base_offset))
        .collect()
}
