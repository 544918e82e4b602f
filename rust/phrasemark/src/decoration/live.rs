//! DecorationDriver: keeps a live view's phrase decorations fresh
//!
//! # Design
//! 1. State machine: Stale → Fresh, recomputed synchronously on notification
//! 2. Only the view's visible ranges are scanned, so cost tracks the viewport
//! 3. Nothing survives an edit - every notification is a full visible rescan
//!
//! Notifications arrive on the host's event thread. The driver holds no
//! locks during a scan; it works on a dictionary snapshot taken when the
//! rescan starts, so a concurrent `DictionaryHandle::replace` only affects
//! the next one.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::ops::Range;

use crate::config::{OffsetUnit, ScannerConfig};
use crate::decoration::attrs::{decoration_attrs, DEF_DECORATION_CLS};
use crate::logging;
use crate::scanner::dictionary::DictionaryHandle;
use crate::scanner::line::{LineScanner, PhraseInfo};
use crate::scanner::region::scan_ranges;

// =============================================================================
// Host view abstraction
// =============================================================================

/// What the driver needs from a text view. Offsets use the driver's
/// configured `OffsetUnit` unless the view reports its own.
pub trait TextView {
    /// Currently visible, non-overlapping ranges in document order
    fn visible_ranges(&self) -> Vec<Range<usize>>;

    /// Document text for `from..to`
    fn slice(&self, from: usize, to: usize) -> Cow<'_, str>;

    /// Unit the view's offsets are measured in, if the view fixes one
    fn offset_unit(&self) -> Option<OffsetUnit> {
        None
    }

    /// Start offset and text of every visible range, in order
    fn visible_text(&self) -> Vec<(usize, Cow<'_, str>)> {
        self.visible_ranges()
            .into_iter()
            .map(|range| (range.start, self.slice(range.start, range.end)))
            .collect()
    }
}

/// Flags describing what changed since the last notification
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewUpdate {
    pub doc_changed: bool,
    pub viewport_changed: bool,
}

impl ViewUpdate {
    pub fn needs_rescan(&self) -> bool {
        self.doc_changed || self.viewport_changed
    }
}

/// Text-view lifecycle events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewEvent {
    Constructed,
    ContentChanged,
    VisibleRangeChanged,
}

/// Callback interface a host view invokes synchronously on its event thread
pub trait ViewObserver {
    fn on_view_event(&mut self, view: &dyn TextView, event: ViewEvent);
}

/// Visible ranges captured as text, for hosts that push slices instead of
/// exposing a queryable view. `unit` is the coordinate space of every
/// `from`; the driver scans in it even when its config says otherwise.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ViewportSnapshot {
    pub ranges: Vec<VisibleRange>,
    #[serde(default)]
    pub unit: OffsetUnit,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibleRange {
    pub from: usize,
    pub text: String,
}

impl TextView for ViewportSnapshot {
    fn visible_ranges(&self) -> Vec<Range<usize>> {
        self.ranges
            .iter()
            .map(|r| r.from..r.from + self.unit.measure(&r.text))
            .collect()
    }

    fn slice(&self, from: usize, to: usize) -> Cow<'_, str> {
        self.ranges
            .iter()
            .find(|r| r.from == from && r.from + self.unit.measure(&r.text) == to)
            .map(|r| Cow::Borrowed(r.text.as_str()))
            .unwrap_or(Cow::Borrowed(""))
    }

    fn offset_unit(&self) -> Option<OffsetUnit> {
        Some(self.unit)
    }

    /// Pairs each range with its own text, so ranges sharing a start keep
    /// their slices apart
    fn visible_text(&self) -> Vec<(usize, Cow<'_, str>)> {
        self.ranges
            .iter()
            .map(|r| (r.from, Cow::Borrowed(r.text.as_str())))
            .collect()
    }
}

// =============================================================================
// Decorations
// =============================================================================

/// Renderer-agnostic paint instruction for one phrase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decoration {
    pub from: usize,
    pub to: usize,
    pub phrase: String,
    pub class: String,
    pub attributes: BTreeMap<String, String>,
}

impl Decoration {
    pub fn from_phrase(info: PhraseInfo, config: &ScannerConfig) -> Self {
        let attributes = decoration_attrs(&info.phrase, config);
        Self {
            from: info.from,
            to: info.to,
            phrase: info.phrase,
            class: DEF_DECORATION_CLS.to_string(),
            attributes,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    /// A notification arrived and the rescan has not finished
    Stale,
    /// Decorations reflect the last notified view
    Fresh,
}

// =============================================================================
// DecorationDriver
// =============================================================================

pub struct DecorationDriver {
    dictionary: DictionaryHandle,
    config: ScannerConfig,
    decorations: Vec<Decoration>,
    state: DriverState,
    rescans: u64,
}

impl DecorationDriver {
    /// Create and compute decorations for `view` immediately
    pub fn new(view: &dyn TextView, dictionary: DictionaryHandle, config: ScannerConfig) -> Self {
        let mut driver = Self {
            dictionary,
            config,
            decorations: Vec::new(),
            state: DriverState::Stale,
            rescans: 0,
        };
        driver.recompute(view);
        driver
    }

    /// Rescan if the update touched the document or viewport. Returns
    /// whether a rescan happened.
    pub fn update(&mut self, view: &dyn TextView, update: ViewUpdate) -> bool {
        if !update.needs_rescan() {
            return false;
        }
        self.state = DriverState::Stale;
        self.recompute(view);
        true
    }

    pub fn decorations(&self) -> &[Decoration] {
        &self.decorations
    }

    /// Just the `(from, to, phrase)` triples
    pub fn spans(&self) -> Vec<(usize, usize, &str)> {
        self.decorations
            .iter()
            .map(|d| (d.from, d.to, d.phrase.as_str()))
            .collect()
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    /// Number of rescans performed, including the initial one
    pub fn rescan_count(&self) -> u64 {
        self.rescans
    }

    pub fn config(&self) -> &ScannerConfig {
        &self.config
    }

    fn recompute(&mut self, view: &dyn TextView) {
        let start = instant::Instant::now();
        let unit = match view.offset_unit() {
            Some(unit) if unit != self.config.offset_unit => {
                logging::warn(&format!(
                    "[DecorationDriver] view reports {:?} offsets, config expects {:?}; using the view's",
                    unit, self.config.offset_unit
                ));
                unit
            }
            Some(unit) => unit,
            None => self.config.offset_unit,
        };
        let scanner = LineScanner::new(self.dictionary.snapshot(), unit);

        let visible = view.visible_text();
        let infos = scan_ranges(&scanner, visible.iter().map(|(from, text)| (&**text, *from)));

        self.decorations = infos
            .into_iter()
            .map(|info| Decoration::from_phrase(info, &self.config))
            .collect();
        self.state = DriverState::Fresh;
        self.rescans += 1;

        logging::debug(&format!(
            "Marked definitions in {:.3}ms",
            start.elapsed().as_secs_f64() * 1000.0
        ));
    }
}

impl ViewObserver for DecorationDriver {
    fn on_view_event(&mut self, view: &dyn TextView, event: ViewEvent) {
        let update = match event {
            ViewEvent::Constructed | ViewEvent::ContentChanged => ViewUpdate {
                doc_changed: true,
                viewport_changed: false,
            },
            ViewEvent::VisibleRangeChanged => ViewUpdate {
                doc_changed: false,
                viewport_changed: true,
            },
        };
        self.update(view, update);
    }
}

// =============================================================================
// Tests
// =============================================================================
