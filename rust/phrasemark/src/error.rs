//! Error types for hydration, configuration and the WASM boundary.
//!
//! Scanning itself is infallible: malformed text or an empty dictionary
//! simply produce no matches.

use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Debug, Error)]
pub enum PhraseMarkError {
    /// Scan requested before any dictionary was hydrated
    #[error("phrase dictionary has not been hydrated")]
    DictionaryNotReady,

    #[error("invalid config: {0}")]
    InvalidConfig(#[from] serde_json::Error),

    #[error("failed to build phrase automaton: {0}")]
    AutomatonBuild(#[from] aho_corasick::BuildError),

    /// A value crossing the JS boundary had the wrong shape
    #[error("invalid payload: {0}")]
    InvalidPayload(String),
}

impl From<serde_wasm_bindgen::Error> for PhraseMarkError {
    fn from(e: serde_wasm_bindgen::Error) -> Self {
        PhraseMarkError::InvalidPayload(e.to_string())
    }
}

impl From<PhraseMarkError> for JsValue {
    fn from(e: PhraseMarkError) -> Self {
        JsValue::from_str(&e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PhraseMarkError>;
