//! End-to-end scenarios through the public scanner API.

use crate::config::{OffsetUnit, ScannerConfig};
use crate::decoration::tree::Node;
use crate::scanner::conductor::PhraseScanner;
use crate::scanner::line::PhraseInfo;
use crate::source::{parse_aliases, DefinitionRecord};

fn info(from: usize, to: usize, phrase: &str) -> PhraseInfo {
    PhraseInfo { from, to, phrase: phrase.to_string() }
}

fn hydrated(records: Vec<DefinitionRecord>) -> PhraseScanner {
    let mut scanner = PhraseScanner::new(ScannerConfig::default());
    scanner.hydrate(records).unwrap();
    scanner
}

#[test]
fn test_boundary_rejection() {
    let scanner = hydrated(vec![DefinitionRecord::new("cat", vec![], "")]);
    assert_eq!(scanner.scan_region("category", 0), Some(vec![]));
    assert_eq!(scanner.scan_region("the cat sat", 0), Some(vec![info(4, 7, "cat")]));
}

#[test]
fn test_multi_word_greedy_match() {
    let scanner = hydrated(vec![
        DefinitionRecord::new("new york", vec![], ""),
        DefinitionRecord::new("new", vec![], ""),
    ]);
    assert_eq!(
        scanner.scan_region("i live in new york city", 0),
        Some(vec![info(10, 18, "new york")])
    );
}

#[test]
fn test_han_phrase_without_whitespace() {
    let scanner = hydrated(vec![DefinitionRecord::new("学习", vec![], "")]);
    assert_eq!(scanner.scan_region("我们喜欢学习中文", 0), Some(vec![info(4, 6, "学习")]));
}

#[test]
fn test_offset_composition() {
    let scanner = hydrated(vec![
        DefinitionRecord::new("foo", vec![], ""),
        DefinitionRecord::new("baz", vec![], ""),
    ]);
    assert_eq!(
        scanner.scan_region("foo\nbar baz", 100),
        Some(vec![info(100, 103, "foo"), info(108, 111, "baz")])
    );
}

#[test]
fn test_hello_world_scenario() {
    let scanner = hydrated(vec![
        DefinitionRecord::new("hello world", vec![], "def1"),
        DefinitionRecord::new("world", vec![], "def2"),
    ]);
    let found = scanner.scan_region("say hello world now", 0).unwrap();
    assert_eq!(found, vec![info(4, 15, "hello world")]);

    let dictionary = scanner.dictionary().snapshot();
    assert_eq!(dictionary.lookup(&found[0].phrase).unwrap().body, "def1");
}

#[test]
fn test_aliases_from_form_input() {
    let aliases = parse_aliases("NYC, Big Apple");
    let scanner = hydrated(vec![DefinitionRecord::new("New York City", aliases, "")]);
    assert_eq!(
        scanner.scan_region("The Big Apple, a.k.a. nyc.", 0),
        Some(vec![info(4, 13, "big apple"), info(22, 25, "nyc")])
    );
}

#[test]
fn test_utf16_offsets_for_editor_hosts() {
    let mut scanner = PhraseScanner::new(ScannerConfig { offset_unit: OffsetUnit::Utf16, ..ScannerConfig::default() });
    scanner.hydrate(vec![DefinitionRecord::new("cat", vec![], "")]).unwrap();
    // "𝒜" is a surrogate pair in JavaScript strings
    assert_eq!(scanner.scan_region("𝒜 cat", 0), Some(vec![info(3, 6, "cat")]));
}

#[test]
fn test_static_and_live_modes_agree() {
    let scanner = hydrated(vec![DefinitionRecord::new("hello world", vec![], "")]);
    let text = "say hello world now";

    let mut root = Node::element("p", vec![Node::text(text)]);
    let stats = scanner.annotate_tree(&mut root).unwrap();
    assert_eq!(stats.phrases_marked, 1);

    let region = scanner.scan_region(text, 0).unwrap();
    assert_eq!(region.len(), 1);
    assert_eq!(root.inner_text(), text);
}
