//! Overlap resolution: a single greedy left-to-right sweep.
//!
//! The first candidate to claim a stretch of text keeps it. A later candidate
//! starting before the cursor is dropped even if it is longer. Downstream
//! renderers rely on exactly this ordering, so do not swap in an optimal
//! interval selection here.

use crate::scanner::line::PhraseInfo;

/// Filter `sorted` (ascending by `from`) down to non-overlapping spans.
///
/// `region_start` is where the cursor begins; a candidate is kept when it
/// starts at or after the cursor, which then moves to its `to`.
pub fn resolve_overlaps(sorted: Vec<PhraseInfo>, region_start: usize) -> Vec<PhraseInfo> {
    let mut cursor = region_start;
    sorted
        .into_iter()
        .filter(|info| {
            if info.from >= cursor && info.from < info.to {
                cursor = info.to;
                true
            } else {
                false
            }
        })
        .collect()
}

/// Stable sort by `from`, then resolve
pub fn sort_and_resolve(mut infos: Vec<PhraseInfo>, region_start: usize) -> Vec<PhraseInfo> {
    infos.sort_by_key(|info| info.from);
    resolve_overlaps(infos, region_start)
}
