//! Render-tree annotation for static (reading) views.
//!
//! Walks a rendered tree depth-first and replaces each text leaf that
//! contains phrases with a `span` holding plain text segments interleaved
//! with `span.def-decoration` elements. Subtrees rendered inside a
//! definition popover (`ctx="def-popup"`) are left alone so a definition
//! never decorates itself, and spans this module produced are never
//! rescanned.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::config::{OffsetUnit, ScannerConfig};
use crate::decoration::attrs::{decoration_attrs, DEF_DECORATION_CLS};
use crate::logging;
use crate::scanner::dictionary::PhraseDictionary;
use crate::scanner::line::{LineScanner, PhraseInfo};
use crate::scanner::region::scan_region;

/// Attribute marking a popover subtree
pub const CTX_ATTR: &str = "ctx";
pub const POPOVER_CTX: &str = "def-popup";

// =============================================================================
// Host node capability
// =============================================================================

/// Minimal tree API the annotator needs from a rendering target
pub trait RenderNode: Sized {
    fn children_mut(&mut self) -> &mut [Self];

    /// `Some` for text leaves only
    fn text_content(&self) -> Option<&str>;

    fn attribute(&self, name: &str) -> Option<&str>;

    /// Replace this node in place with `replacement`
    fn replace_with(&mut self, replacement: Self);

    fn new_text(text: &str) -> Self;

    fn new_element(tag: &str, attributes: BTreeMap<String, String>, children: Vec<Self>) -> Self;
}

// =============================================================================
// In-memory tree
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Node {
    Text {
        text: String,
    },
    Element {
        tag: String,
        #[serde(default)]
        attributes: BTreeMap<String, String>,
        #[serde(default)]
        children: Vec<Node>,
    },
}

impl Node {
    pub fn text(text: &str) -> Self {
        Node::Text { text: text.to_string() }
    }

    pub fn element(tag: &str, children: Vec<Node>) -> Self {
        Node::Element {
            tag: tag.to_string(),
            attributes: BTreeMap::new(),
            children,
        }
    }

    pub fn with_attribute(mut self, name: &str, value: &str) -> Self {
        if let Node::Element { attributes, .. } = &mut self {
            attributes.insert(name.to_string(), value.to_string());
        }
        self
    }

    /// Concatenated text of the subtree
    pub fn inner_text(&self) -> String {
        match self {
            Node::Text { text } => text.clone(),
            Node::Element { children, .. } => children.iter().map(Node::inner_text).collect(),
        }
    }
}

impl RenderNode for Node {
    fn children_mut(&mut self) -> &mut [Self] {
        match self {
            Node::Text { .. } => &mut [],
            Node::Element { children, .. } => children.as_mut_slice(),
        }
    }

    fn text_content(&self) -> Option<&str> {
        match self {
            Node::Text { text } => Some(text),
            Node::Element { .. } => None,
        }
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        match self {
            Node::Text { .. } => None,
            Node::Element { attributes, .. } => attributes.get(name).map(String::as_str),
        }
    }

    fn replace_with(&mut self, replacement: Self) {
        *self = replacement;
    }

    fn new_text(text: &str) -> Self {
        Node::text(text)
    }

    fn new_element(tag: &str, attributes: BTreeMap<String, String>, children: Vec<Self>) -> Self {
        Node::Element {
            tag: tag.to_string(),
            attributes,
            children,
        }
    }
}

// =============================================================================
// Annotation
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotateStats {
    pub text_nodes_scanned: usize,
    pub text_nodes_replaced: usize,
    pub phrases_marked: usize,
    pub skipped_subtrees: usize,
}

/// Annotate `root` in place
pub fn annotate<N: RenderNode>(root: &mut N, dictionary: Arc<PhraseDictionary>, config: &ScannerConfig) -> AnnotateStats {
    let mut stats = AnnotateStats::default();
    if !config.enable_in_reading_view {
        return stats;
    }

    let start = instant::Instant::now();
    let scanner = LineScanner::new(dictionary, OffsetUnit::Byte);
    if is_skipped(root) {
        stats.skipped_subtrees += 1;
    } else {
        rebuild(root, &scanner, config, &mut stats);
    }

    logging::debug(&format!(
        "Annotated {} phrases in {:.3}ms",
        stats.phrases_marked,
        start.elapsed().as_secs_f64() * 1000.0
    ));
    stats
}

fn is_skipped<N: RenderNode>(node: &N) -> bool {
    node.attribute(CTX_ATTR) == Some(POPOVER_CTX)
        || node.attribute("class").is_some_and(|class| class.split_whitespace().any(|c| c == DEF_DECORATION_CLS))
}

fn rebuild<N: RenderNode>(parent: &mut N, scanner: &LineScanner, config: &ScannerConfig, stats: &mut AnnotateStats) {
    for child in parent.children_mut() {
        if let Some(text) = child.text_content() {
            if text.is_empty() || text == "\n" {
                continue;
            }
            stats.text_nodes_scanned += 1;

            let infos = scan_region(scanner, text, 0);
            if infos.is_empty() {
                continue;
            }

            stats.text_nodes_replaced += 1;
            stats.phrases_marked += infos.len();
            let replacement = marked_container::<N>(text, &infos, config);
            child.replace_with(replacement);
            continue;
        }

        if is_skipped(child) {
            stats.skipped_subtrees += 1;
            continue;
        }
        rebuild(child, scanner, config, stats);
    }
}

/// `infos` are resolved byte spans into `text`
fn marked_container<N: RenderNode>(text: &str, infos: &[PhraseInfo], config: &ScannerConfig) -> N {
    let mut segments = Vec::with_capacity(infos.len() * 2 + 1);
    let mut cursor = 0;

    for info in infos {
        if info.from > cursor {
            segments.push(N::new_text(&text[cursor..info.from]));
        }
        let mut attributes = decoration_attrs(&info.phrase, config);
        attributes.insert("class".to_string(), DEF_DECORATION_CLS.to_string());
        segments.push(N::new_element("span", attributes, vec![N::new_text(&text[info.from..info.to])]));
        cursor = info.to;
    }
    if cursor < text.len() {
        segments.push(N::new_text(&text[cursor..]));
    }

    N::new_element("span", BTreeMap::new(), segments)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::DefinitionRecord;

    fn dictionary(words: &[&str]) -> Arc<PhraseDictionary> {
        let records = words.iter().map(|w| DefinitionRecord::new(w, vec![], ""));
        Arc::new(PhraseDictionary::build(records).unwrap())
    }

    fn marks(node: &Node) -> Vec<(String, String)> {
        let mut found = Vec::new();
        collect_marks(node, &mut found);
        found
    }

    fn collect_marks(node: &Node, found: &mut Vec<(String, String)>) {
        if let Node::Element { attributes, children, .. } = node {
            if attributes.get("class").map(String::as_str) == Some(DEF_DECORATION_CLS) {
                found.push((attributes["def"].clone(), node.inner_text()));
            }
            for child in children {
                collect_marks(child, found);
            }
        }
    }

    // -------------------------------------------------------------------------
    // Requirement 1: Text leaves become interleaved segments
    // -------------------------------------------------------------------------
    #[test]
    fn test_replaces_text_leaf() {
        let mut root = Node::element("p", vec![Node::text("the Cat sat on the mat")]);
        let stats = annotate(&mut root, dictionary(&["cat", "mat"]), &ScannerConfig::default());

        assert_eq!(stats.text_nodes_replaced, 1);
        assert_eq!(stats.phrases_marked, 2);
        assert_eq!(root.inner_text(), "the Cat sat on the mat");

        let Node::Element { children, .. } = &root else { panic!("root must stay an element") };
        let Node::Element { tag, children: segments, .. } = &children[0] else { panic!("expected container") };
        assert_eq!(tag, "span");
        assert_eq!(segments.len(), 4);
        assert_eq!(segments[0], Node::text("the "));
        assert_eq!(segments[2], Node::text(" sat on the "));

        assert_eq!(
            marks(&root),
            vec![("cat".to_string(), "Cat".to_string()), ("mat".to_string(), "mat".to_string())]
        );
    }

    // -------------------------------------------------------------------------
    // Requirement 2: Overlaps resolved before rebuilding
    // -------------------------------------------------------------------------
    #[test]
    fn test_overlaps_resolved() {
        let mut root = Node::element("p", vec![Node::text("say hello world now")]);
        annotate(&mut root, dictionary(&["hello world", "world"]), &ScannerConfig::default());
        assert_eq!(marks(&root), vec![("hello world".to_string(), "hello world".to_string())]);
    }

    // -------------------------------------------------------------------------
    // Requirement 3: Recurses into nested elements, multibyte text
    // -------------------------------------------------------------------------
    #[test]
    fn test_nested_and_multibyte() {
        let mut root = Node::element(
            "div",
            vec![
                Node::element("p", vec![Node::text("我们喜欢机器学习")]),
                Node::element("ul", vec![Node::element("li", vec![Node::text("café au lait")])]),
            ],
        );
        let stats = annotate(&mut root, dictionary(&["机器学习", "café"]), &ScannerConfig::default());

        assert_eq!(stats.phrases_marked, 2);
        assert_eq!(
            marks(&root),
            vec![
                ("机器学习".to_string(), "机器学习".to_string()),
                ("café".to_string(), "café".to_string())
            ]
        );
        assert_eq!(root.inner_text(), "我们喜欢机器学习café au lait");
    }

    // -------------------------------------------------------------------------
    // Requirement 4: Popover subtrees and newline leaves are skipped
    // -------------------------------------------------------------------------
    #[test]
    fn test_skips_popover_context() {
        let mut root = Node::element("div", vec![Node::text("cat")]).with_attribute(CTX_ATTR, POPOVER_CTX);
        let stats = annotate(&mut root, dictionary(&["cat"]), &ScannerConfig::default());
        assert_eq!(stats.skipped_subtrees, 1);
        assert!(marks(&root).is_empty());

        let mut root = Node::element(
            "div",
            vec![
                Node::element("div", vec![Node::text("cat")]).with_attribute(CTX_ATTR, POPOVER_CTX),
                Node::text("\n"),
                Node::text("a cat"),
            ],
        );
        let stats = annotate(&mut root, dictionary(&["cat"]), &ScannerConfig::default());
        assert_eq!(stats.text_nodes_scanned, 1);
        assert_eq!(marks(&root).len(), 1);
    }

    // -------------------------------------------------------------------------
    // Requirement 5: Annotating twice does not double-wrap
    // -------------------------------------------------------------------------
    #[test]
    fn test_second_pass_leaves_marks_alone() {
        let dict = dictionary(&["cat"]);
        let mut root = Node::element("p", vec![Node::text("a cat here")]);
        annotate(&mut root, Arc::clone(&dict), &ScannerConfig::default());
        let once = root.clone();

        let stats = annotate(&mut root, dict, &ScannerConfig::default());
        assert_eq!(stats.phrases_marked, 0);
        assert_eq!(root, once);
    }

    // -------------------------------------------------------------------------
    // Requirement 6: Disabled reading view and no matches are no-ops
    // -------------------------------------------------------------------------
    #[test]
    fn test_noop_cases() {
        let original = Node::element("p", vec![Node::text("a cat")]);

        let mut root = original.clone();
        let config = ScannerConfig { enable_in_reading_view: false, ..ScannerConfig::default() };
        assert_eq!(annotate(&mut root, dictionary(&["cat"]), &config), AnnotateStats::default());
        assert_eq!(root, original);

        let mut root = original.clone();
        let stats = annotate(&mut root, dictionary(&["dog"]), &ScannerConfig::default());
        assert_eq!(stats.text_nodes_scanned, 1);
        assert_eq!(root, original);
    }

    // -------------------------------------------------------------------------
    // Requirement 7: Tree JSON shape
    // -------------------------------------------------------------------------
    #[test]
    fn test_node_json() {
        let json = r#"{"type": "element", "tag": "p", "children": [{"type": "text", "text": "a cat"}]}"#;
        let mut root: Node = serde_json::from_str(json).unwrap();
        annotate(&mut root, dictionary(&["cat"]), &ScannerConfig::default());

        let value = serde_json::to_value(&root).unwrap();
        let mark = &value["children"][0]["children"][1];
        assert_eq!(mark["attributes"]["class"], "def-decoration");
        assert_eq!(mark["attributes"]["def"], "cat");
        assert_eq!(mark["children"][0]["text"], "cat");
    }
}
