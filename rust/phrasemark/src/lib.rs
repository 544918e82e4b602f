//! PhraseMark: defined-phrase scanner and decoration engine
//!
//! A Rust/WASM engine that finds user-defined phrases (words, multi-word
//! terms, aliases) in text and reports their spans so an editor can
//! decorate them.
//!
//! # Architecture
//!
//! ## Scanner Components
//! - `dictionary.rs` - PhraseDictionary: normalized keys -> definitions, Aho-Corasick automaton
//! - `script.rs` - Han vs delimiter tokenization regimes, case/whitespace folding
//! - `line.rs` - LineScanner: longest whole-phrase match per start position
//! - `overlap.rs` - Greedy left-to-right overlap resolution
//! - `region.rs` - Multi-line regions with external base offsets
//! - `conductor.rs` - PhraseScanner: hydration state machine + WASM API
//!
//! ## Decoration Components
//! - `live.rs` - DecorationDriver: rescans visible ranges on view notifications
//! - `tree.rs` - annotate(): rewrites text leaves of a rendered tree
//! - `attrs.rs` - Attributes carried by decorated spans
//!
//! # Usage (WASM)
//! ```javascript,ignore
//! import init, { PhraseScanner } from 'phrasemark';
//!
//! await init();
//!
//! const scanner = new PhraseScanner({ offset_unit: 'utf16' });
//! scanner.hydrateDefinitions([
//!   { word: 'New York', aliases: ['NYC'], body: 'A city' }
//! ]);
//!
//! scanner.scanRegion("I live in new york\nNYC is big", 0);
//! // [{ from: 10, to: 18, phrase: 'new york' }, { from: 19, to: 22, phrase: 'nyc' }]
//!
//! // Editor view hook: visible ranges in, decorations out
//! const decorations = scanner.notifyView([{ from: 0, text: visibleText }], true, false);
//! ```

pub mod config;
pub mod decoration;
pub mod error;
mod logging;
pub mod scanner;
pub mod source;

// Public exports
pub use config::*;
pub use decoration::*;
pub use error::{PhraseMarkError, Result};
pub use scanner::*;
pub use source::*;

use wasm_bindgen::prelude::*;

// When the `wee_alloc` feature is enabled, use `wee_alloc` as the global
// allocator for smaller WASM bundle size.
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

/// Initialize panic hook for better error messages in browser console
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Get version information
#[wasm_bindgen]
pub fn version() -> String {
    format!("phrasemark v{}", env!("CARGO_PKG_VERSION"))
}
