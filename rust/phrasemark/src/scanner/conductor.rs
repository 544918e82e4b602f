//! PhraseScanner: single entry point for hosts
//!
//! # Design Principles
//! 1. State machine: Uninitialized → Ready (once a dictionary is hydrated)
//! 2. Scans before hydration return `None` (`null` in JS) instead of guessing
//! 3. Rehydration swaps the dictionary; attached views see it on their next
//!    notification
//!
//! # Usage
//! ```rust
//! use phrasemark::{DefinitionRecord, PhraseScanner, ScannerConfig};
//!
//! let mut scanner = PhraseScanner::new(ScannerConfig::default());
//! scanner.hydrate(vec![DefinitionRecord::new("hello world", vec![], "a greeting")]).unwrap();
//! let spans = scanner.scan_region("say hello world now", 0).unwrap();
//! assert_eq!((spans[0].from, spans[0].to), (4, 15));
//! ```

use wasm_bindgen::prelude::*;

use crate::config::ScannerConfig;
use crate::decoration::live::{Decoration, DecorationDriver, ViewUpdate, ViewportSnapshot, VisibleRange};
use crate::decoration::tree::{annotate, AnnotateStats, Node};
use crate::error::{PhraseMarkError, Result};
use crate::logging;
use crate::scanner::dictionary::{DictionaryHandle, PhraseDictionary};
use crate::scanner::line::{LineScanner, PhraseInfo};
use crate::scanner::region::scan_region;
use crate::source::DefinitionRecord;

// =============================================================================
// State Machine
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// No dictionary yet
    Uninitialized,
    /// Dictionary hydrated, scans allowed
    Ready,
}

// =============================================================================
// PhraseScanner
// =============================================================================

#[wasm_bindgen]
pub struct PhraseScanner {
    dictionary: DictionaryHandle,
    config: ScannerConfig,
    driver: Option<DecorationDriver>,
    state: State,
}

impl Default for PhraseScanner {
    fn default() -> Self {
        Self::new(ScannerConfig::default())
    }
}

impl PhraseScanner {
    pub fn new(config: ScannerConfig) -> Self {
        Self {
            dictionary: DictionaryHandle::default(),
            config,
            driver: None,
            state: State::Uninitialized,
        }
    }

    /// Build a dictionary from `records` and swap it in
    pub fn hydrate(&mut self, records: Vec<DefinitionRecord>) -> Result<()> {
        let dictionary = PhraseDictionary::build(records)?;
        logging::debug(&format!(
            "[PhraseScanner] hydrated {} phrases from {} definitions",
            dictionary.len(),
            dictionary.record_count()
        ));
        self.dictionary.replace(dictionary);
        self.state = State::Ready;
        Ok(())
    }

    pub fn is_ready(&self) -> bool {
        self.state == State::Ready
    }

    pub fn state_name(&self) -> &'static str {
        match self.state {
            State::Uninitialized => "uninitialized",
            State::Ready => "ready",
        }
    }

    pub fn config(&self) -> &ScannerConfig {
        &self.config
    }

    /// Replace the config. Drops any attached view; its next notification
    /// must re-attach.
    pub fn set_config(&mut self, config: ScannerConfig) {
        self.config = config;
        self.driver = None;
    }

    /// Shared handle to the live dictionary
    pub fn dictionary(&self) -> DictionaryHandle {
        self.dictionary.clone()
    }

    /// Line scanner over the current dictionary, if hydrated
    pub fn line_scanner(&self) -> Option<LineScanner> {
        self.is_ready()
            .then(|| LineScanner::new(self.dictionary.snapshot(), self.config.offset_unit))
    }

    pub fn scan_line(&self, line: &str, base_offset: usize) -> Option<Vec<PhraseInfo>> {
        self.line_scanner().map(|scanner| scanner.scan_line(line, base_offset))
    }

    pub fn scan_region(&self, text: &str, base_offset: usize) -> Option<Vec<PhraseInfo>> {
        self.line_scanner().map(|scanner| scan_region(&scanner, text, base_offset))
    }

    /// Attach a view (construction event): decorations are computed eagerly
    pub fn attach_view(&mut self, snapshot: &ViewportSnapshot) -> Result<&[Decoration]> {
        if !self.is_ready() {
            return Err(PhraseMarkError::DictionaryNotReady);
        }
        let driver = DecorationDriver::new(snapshot, self.dictionary.clone(), self.config.clone());
        Ok(self.driver.insert(driver).decorations())
    }

    /// Forward a view notification, attaching on first use
    pub fn notify_view(&mut self, snapshot: &ViewportSnapshot, update: ViewUpdate) -> Result<&[Decoration]> {
        if self.driver.is_none() {
            return self.attach_view(snapshot);
        }
        match self.driver.as_mut() {
            Some(driver) => {
                driver.update(snapshot, update);
                Ok(driver.decorations())
            }
            None => Err(PhraseMarkError::DictionaryNotReady),
        }
    }

    /// Forward a host-pushed viewport. A payload that failed to decode is
    /// reported and leaves the attached view's decorations untouched.
    fn notify_ranges(&mut self, ranges: Result<Vec<VisibleRange>>, update: ViewUpdate) -> Result<&[Decoration]> {
        let ranges = ranges.map_err(|e| {
            logging::warn(&format!("[PhraseScanner] rejected view ranges: {}", e));
            e
        })?;
        let snapshot = ViewportSnapshot {
            ranges,
            unit: self.config.offset_unit,
        };
        self.notify_view(&snapshot, update)
    }

    /// Annotate a rendered tree in place
    pub fn annotate_tree(&self, root: &mut Node) -> Option<AnnotateStats> {
        self.is_ready()
            .then(|| annotate(root, self.dictionary.snapshot(), &self.config))
    }

    /// Drop the dictionary and any attached view
    pub fn reset(&mut self) {
        self.dictionary.replace(PhraseDictionary::default());
        self.driver = None;
        self.state = State::Uninitialized;
    }
}

// =============================================================================
// WASM Bindings
// =============================================================================

#[wasm_bindgen]
impl PhraseScanner {
    /// Create a scanner (JS binding). `config` may be null/undefined or a
    /// partial ScannerConfig object.
    #[wasm_bindgen(constructor)]
    pub fn js_new(config: JsValue) -> std::result::Result<PhraseScanner, JsValue> {
        let config: ScannerConfig = if config.is_null() || config.is_undefined() {
            ScannerConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config).map_err(PhraseMarkError::from)?
        };
        Ok(Self::new(config))
    }

    /// Expects an array of { word, aliases?, body?, source? }
    #[wasm_bindgen(js_name = "hydrateDefinitions")]
    pub fn js_hydrate_definitions(&mut self, records: JsValue) -> std::result::Result<(), JsValue> {
        let records: Vec<DefinitionRecord> = serde_wasm_bindgen::from_value(records).map_err(PhraseMarkError::from)?;
        self.hydrate(records).map_err(JsValue::from)
    }

    #[wasm_bindgen(js_name = "configure")]
    pub fn js_configure(&mut self, config_json: &str) -> std::result::Result<(), JsValue> {
        let config = ScannerConfig::from_json(config_json)?;
        self.set_config(config);
        Ok(())
    }

    #[wasm_bindgen(js_name = "isReady")]
    pub fn js_is_ready(&self) -> bool {
        self.is_ready()
    }

    #[wasm_bindgen(js_name = "stateName")]
    pub fn js_state_name(&self) -> String {
        self.state_name().to_string()
    }

    /// Returns null before hydration, PhraseInfo[] otherwise
    #[wasm_bindgen(js_name = "scanLine")]
    pub fn js_scan_line(&self, line: &str, base_offset: usize) -> JsValue {
        match self.scan_line(line, base_offset) {
            Some(infos) => to_js(&infos),
            None => JsValue::NULL,
        }
    }

    /// Returns null before hydration, resolved PhraseInfo[] otherwise
    #[wasm_bindgen(js_name = "scanRegion")]
    pub fn js_scan_region(&self, text: &str, base_offset: usize) -> JsValue {
        match self.scan_region(text, base_offset) {
            Some(infos) => to_js(&infos),
            None => JsValue::NULL,
        }
    }

    /// View lifecycle hook. `ranges` is [{ from, text }]; `docChanged` and
    /// `viewportChanged` mirror the host update flags. Returns the decoration
    /// list, or null before hydration. Throws on a malformed `ranges` value.
    #[wasm_bindgen(js_name = "notifyView")]
    pub fn js_notify_view(
        &mut self,
        ranges: JsValue,
        doc_changed: bool,
        viewport_changed: bool,
    ) -> std::result::Result<JsValue, JsValue> {
        let ranges = serde_wasm_bindgen::from_value(ranges).map_err(PhraseMarkError::from);
        let update = ViewUpdate { doc_changed, viewport_changed };
        match self.notify_ranges(ranges, update) {
            Ok(decorations) => Ok(to_js(decorations)),
            Err(PhraseMarkError::DictionaryNotReady) => Ok(JsValue::NULL),
            Err(e) => Err(e.into()),
        }
    }

    /// Annotate a serialized render tree; returns the rebuilt tree or null
    #[wasm_bindgen(js_name = "annotateTree")]
    pub fn js_annotate_tree(&self, root: JsValue) -> std::result::Result<JsValue, JsValue> {
        let mut root: Node = serde_wasm_bindgen::from_value(root).map_err(PhraseMarkError::from)?;
        match self.annotate_tree(&mut root) {
            Some(_) => Ok(to_js(&root)),
            None => Ok(JsValue::NULL),
        }
    }

    /// Definition record for a phrase, or null
    #[wasm_bindgen(js_name = "lookup")]
    pub fn js_lookup(&self, phrase: &str) -> JsValue {
        let dictionary = self.dictionary.snapshot();
        match dictionary.resolve(phrase) {
            Some(record) => to_js(record),
            None => JsValue::NULL,
        }
    }

    #[wasm_bindgen(js_name = "dictionaryStats")]
    pub fn js_dictionary_stats(&self) -> JsValue {
        to_js(&self.dictionary.snapshot().stats())
    }

    #[wasm_bindgen(js_name = "reset")]
    pub fn js_reset(&mut self) {
        self.reset();
    }
}

fn to_js<T: serde::Serialize + ?Sized>(value: &T) -> JsValue {
    match serde_wasm_bindgen::to_value(value) {
        Ok(v) => v,
        Err(e) => {
            logging::warn(&format!("[PhraseScanner] {}", PhraseMarkError::from(e)));
            JsValue::NULL
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
