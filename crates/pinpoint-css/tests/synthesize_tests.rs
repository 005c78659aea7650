//! Tests for selector synthesis.
//!
//! Most scenarios build `<html><body><div id="fixture">...</div></body></html>`
//! and synthesize a selector for an element placed inside the fixture.

use std::cell::Cell;

use pinpoint_common::warning::was_warned;
use pinpoint_css::escape::EscapeError;
use pinpoint_css::query::{DocumentQuery, QueryError, TreeQuery};
use pinpoint_css::synthesize::features::{ElementProps, feature_selector};
use pinpoint_css::synthesize::{
    Ascent, AscentState, SynthesisError, SynthesisOptions, Synthesizer, synthesize_selector,
};
use pinpoint_dom::{DocumentMode, DomTree, ElementData, NodeId, NodeType};
use quickcheck::TestResult;
use quickcheck_macros::quickcheck;

struct Fixture {
    tree: DomTree,
    html: NodeId,
    body: NodeId,
    fixture: NodeId,
}

fn fixture_in(mode: DocumentMode) -> Fixture {
    let mut tree = DomTree::with_mode(mode);
    let html = tree.append_element(NodeId::ROOT, ElementData::new("html"));
    let body = tree.append_element(html, ElementData::new("body"));
    let fixture = tree.append_element(body, ElementData::new("div").with_attr("id", "fixture"));
    Fixture {
        tree,
        html,
        body,
        fixture,
    }
}

fn fixture() -> Fixture {
    fixture_in(DocumentMode::Html)
}

impl Fixture {
    fn add(&mut self, element: ElementData) -> NodeId {
        self.tree.append_element(self.fixture, element)
    }

    fn select(&self, node: NodeId) -> String {
        self.select_with(node, SynthesisOptions::default())
    }

    fn select_with(&self, node: NodeId, options: SynthesisOptions) -> String {
        synthesize_selector(&self.tree, Some(node), &options).unwrap()
    }

    /// The selector resolves to exactly `node`.
    fn assert_resolves(&self, selector: &str, node: NodeId) {
        assert_eq!(
            TreeQuery::new(&self.tree).query_all(selector),
            vec![node],
            "selector {selector:?}"
        );
    }
}

// ========== basic scenarios ==========

#[test]
fn test_generates_unique_selector() {
    let mut f = fixture();
    let node = f.add(ElementData::new("div"));

    let selector = f.select(node);
    assert_eq!(selector, "#fixture > div");
    f.assert_resolves(&selector, node);
}

#[test]
fn test_whitespace_only_class_name() {
    let mut f = fixture();
    let node = f.add(ElementData::new("div").with_attr("class", "    "));

    let selector = f.select(node);
    assert_eq!(selector, "#fixture > div");
    f.assert_resolves(&selector, node);
}

#[test]
fn test_special_characters_in_id() {
    let mut f = fixture();
    let node = f.add(ElementData::new("div").with_attr("id", "monkeys#are.animals\\ok"));

    let selector = f.select(node);
    assert_eq!(selector, "#monkeys\\#are\\.animals\\\\ok");
    f.assert_resolves(&selector, node);
}

#[test]
fn test_special_characters_in_class_name() {
    let mut f = fixture();
    let node = f.add(ElementData::new("div").with_attr("class", ".  bb-required"));

    let selector = f.select(node);
    assert_eq!(selector, "#fixture > div.\\..bb-required");
    f.assert_resolves(&selector, node);
}

#[test]
fn test_falls_back_to_positional_selector() {
    let mut f = fixture();
    let nodes: Vec<NodeId> = (0..10).map(|_| f.add(ElementData::new("div"))).collect();

    let selector = f.select(nodes[4]);
    assert_eq!(selector, "#fixture > div:nth-child(5)");
    f.assert_resolves(&selector, nodes[4]);
}

#[test]
fn test_stops_on_unique_id() {
    let mut f = fixture();
    let node = f.add(ElementData::new("div").with_attr("id", "monkeys"));

    let selector = f.select(node);
    assert_eq!(selector, "#monkeys");
    f.assert_resolves(&selector, node);
}

#[test]
fn test_duplicate_ids_are_not_used() {
    let mut f = fixture();
    let _ = f.add(ElementData::new("div").with_attr("id", "monkeys"));
    let node = f.add(ElementData::new("div").with_attr("id", "monkeys"));

    let selector = f.select(node);
    assert_eq!(selector, "#fixture > div:nth-child(2)");
    f.assert_resolves(&selector, node);
}

#[test]
fn test_uses_distinct_classes() {
    let mut f = fixture();
    let _ = f.add(ElementData::new("div").with_attr("class", "monkeys simian"));
    let node = f.add(ElementData::new("div").with_attr("class", "dogs cats"));

    let selector = f.select(node);
    assert_eq!(selector, "#fixture > div.dogs.cats");
    f.assert_resolves(&selector, node);
}

#[test]
fn test_shared_classes_fall_back_to_position() {
    let mut f = fixture();
    let _ = f.add(ElementData::new("div").with_attr("class", "monkeys simian"));
    let node = f.add(ElementData::new("div").with_attr("class", "monkeys simian"));

    let selector = f.select(node);
    assert_eq!(selector, "#fixture > div:nth-child(2)");
    f.assert_resolves(&selector, node);
}

#[test]
fn test_common_classes_are_ignored() {
    let mut f = fixture();
    let node = f.add(ElementData::new("div").with_attr("class", "is-hovered col-md-6 card"));

    let selector = f.select(node);
    assert_eq!(selector, "#fixture > div.card");
    f.assert_resolves(&selector, node);
}

#[test]
fn test_more_than_two_distinct_classes_are_skipped() {
    let mut f = fixture();
    let node = f.add(ElementData::new("section").with_attr("class", "one two three"));

    assert_eq!(f.select(node), "#fixture > section");
}

// ========== document element and body ==========

#[test]
fn test_document_element() {
    let f = fixture();
    let selector = f.select(f.html);
    assert_eq!(selector, "html");
    f.assert_resolves(&selector, f.html);
}

#[test]
fn test_document_element_with_classes() {
    let mut f = fixture();
    let _ = f.tree.set_attribute(f.html, "class", "stuff and other things");

    let selector = f.select(f.html);
    assert_eq!(selector, "html");
    f.assert_resolves(&selector, f.html);
}

#[test]
fn test_document_element_falls_back_to_root() {
    let mut f = fixture();
    // A second element named "html" makes the tag alone ambiguous.
    let _ = f.add(ElementData::new("html"));

    let selector = f.select(f.html);
    assert_eq!(selector, "html:root");
    f.assert_resolves(&selector, f.html);
}

#[test]
fn test_body() {
    let f = fixture();
    let selector = f.select(f.body);
    assert_eq!(selector, "html > body");
    f.assert_resolves(&selector, f.body);
}

// ========== namespaced elements ==========

#[test]
fn test_namespaced_element() {
    let mut f = fixture();
    let node = f.add(ElementData::new("hx:include"));
    let _ = f.tree.append_text(node, "Hello");

    let selector = f.select(node);
    assert_eq!(selector, "#fixture > hx\\:include");
    f.assert_resolves(&selector, node);
}

#[test]
fn test_complex_namespaced_elements() {
    let mut f = fixture();
    let math = f.add(ElementData::new("m:math").with_attr("xmlns:m", "http://www.w3.org/1998/Math/MathML"));
    let _ = f.tree.append_text(math, "\n  ");
    let mi = f.tree.append_element(math, ElementData::new("m:mi"));
    let _ = f.tree.append_text(mi, "x");
    let annotation = f.tree.append_element(
        math,
        ElementData::new("m:annotation-xml").with_attr("encoding", "MathML-Content"),
    );
    let ci = f.tree.append_element(annotation, ElementData::new("m:ci"));
    let _ = f.tree.append_text(ci, "x");

    let selector = f.select(ci);
    assert_eq!(selector, "m\\:annotation-xml > m\\:ci");
    f.assert_resolves(&selector, ci);
}

// ========== features ==========

#[test]
fn test_uses_role_attribute() {
    let mut f = fixture();
    let node = f.add(ElementData::new("div").with_attr("role", "menuitem"));

    assert_eq!(f.select(node), "#fixture > div[role=\"menuitem\"]");
}

#[test]
fn test_uses_href_and_src() {
    let mut f = fixture();
    let link = f.add(ElementData::new("a").with_attr("href", "//deque.com/about/"));
    let img = f.add(ElementData::new("img").with_attr("src", "//deque.com/logo.png"));

    let link_selector = f.select(link);
    assert_eq!(link_selector, "#fixture > a[href$=\"about/\"]");
    f.assert_resolves(&link_selector, link);

    let img_selector = f.select(img);
    assert_eq!(img_selector, "#fixture > img[src$=\"logo.png\"]");
    f.assert_resolves(&img_selector, img);
}

#[test]
fn test_uri_suffix_that_is_not_a_raw_suffix_is_dropped() {
    let mut f = fixture();
    // The friendly end is "deque.com/", but the raw value has a port before the slash.
    let with_port = f.add(ElementData::new("a").with_attr("href", "http://deque.com:8080/"));
    // Percent-encoding changes the text.
    let encoded = f.add(ElementData::new("a").with_attr("href", "/files/résumé.pdf"));

    let selector = f.select(with_port);
    assert_eq!(selector, "#fixture > a:nth-child(1)");
    f.assert_resolves(&selector, with_port);

    let selector = f.select(encoded);
    assert_eq!(selector, "#fixture > a:nth-child(2)");
    f.assert_resolves(&selector, encoded);
}

#[test]
fn test_two_features_on_the_target() {
    let mut f = fixture();
    let node = f.add(ElementData::new("div").with_attr("role", "menuitem"));
    assert_eq!(f.select(node), "#fixture > div[role=\"menuitem\"]");

    let _ = f.tree.set_attribute(node, "class", "dqpl-btn-primary");
    assert_eq!(
        f.select(node),
        "#fixture > [role=\"menuitem\"].dqpl-btn-primary"
    );
}

#[test]
fn test_one_feature_on_ancestors() {
    let mut f = fixture();
    let node = f.add(ElementData::new("div").with_attr("role", "menuitem"));
    let span = f
        .tree
        .append_element(node, ElementData::new("span").with_attr("class", "expand-icon"));

    assert_eq!(f.select(span), "[role=\"menuitem\"] > span.expand-icon");
}

#[test]
fn test_prioritizes_uncommon_tag_names() {
    let mut f = fixture();
    let node = f.add(
        ElementData::new("button")
            .with_attr("role", "menuitem")
            .with_attr("class", "dqpl-btn-primary"),
    );

    assert_eq!(f.select(node), "#fixture > button[role=\"menuitem\"]");
}

#[test]
fn test_adds_type_to_inputs() {
    let mut f = fixture();
    let node = f.add(
        ElementData::new("input")
            .with_attr("type", "password")
            .with_attr("class", "dqpl-textfield"),
    );

    assert_eq!(
        f.select(node),
        "#fixture > input[type=\"password\"].dqpl-textfield"
    );
}

#[test]
fn test_uses_name_attribute() {
    let mut f = fixture();
    let node = f.add(
        ElementData::new("input")
            .with_attr("type", "text")
            .with_attr("name", "username")
            .with_attr("class", "dqpl-textfield"),
    );

    assert_eq!(
        f.select(node),
        "#fixture > input[type=\"text\"][name=\"username\"]"
    );
}

#[test]
fn test_custom_element_name() {
    let mut f = fixture();
    let node = f.add(ElementData::new("my-widget").with_attr("role", "tab"));

    let selector = f.select(node);
    assert_eq!(selector, "#fixture > my-widget[role=\"tab\"]");
    f.assert_resolves(&selector, node);
}

#[test]
fn test_volatile_ids_are_skipped() {
    let mut f = fixture();
    let node = f.add(ElementData::new("div").with_attr("id", "widget_player_uid_1234"));

    assert_eq!(f.select(node), "#fixture > div");
    assert!(was_warned("Synthesizer", "skipping volatile id #widget_player_uid_1234"));
}

#[test]
fn test_xhtml_tag_names_keep_case() {
    let mut f = fixture_in(DocumentMode::Xhtml);
    let node = f.add(ElementData::new("DIV"));

    // "DIV" is not one of the generic lowercase tags, and no other element
    // is named "DIV", so one level is enough.
    let selector = f.select(node);
    assert_eq!(selector, "#fixture > DIV");
    f.assert_resolves(&selector, node);

    let mut f = fixture();
    let node = f.add(ElementData::new("DIV"));
    assert_eq!(f.select(node), "#fixture > div");
}

#[test]
fn test_feature_selector_orders_type_first() {
    let mut f = fixture();
    let node = f.add(
        ElementData::new("input")
            .with_attr("name", "q")
            .with_attr("class", "search"),
    );
    let props = ElementProps::from_node(&f.tree, node).unwrap().unwrap();

    assert_eq!(feature_selector(&props, 1).unwrap(), "input");
    assert_eq!(feature_selector(&props, 2).unwrap(), "input[name=\"q\"]");
    assert_eq!(feature_selector(&props, 3).unwrap(), "input[name=\"q\"].search");
    assert!(ElementProps::from_node(&f.tree, NodeId::ROOT).unwrap().is_none());
}

// ========== options ==========

#[test]
fn test_to_root_continues_past_ids() {
    let mut f = fixture();
    let node = f.add(ElementData::new("div").with_attr("id", "monkeys"));

    let selector = f.select_with(node, SynthesisOptions::default().with_to_root(true));
    assert_eq!(selector, "html > body > #fixture > #monkeys");
    f.assert_resolves(&selector, node);
}

#[test]
fn test_min_depth_zero_stops_at_unique_target() {
    let mut f = fixture();
    let node = f.add(ElementData::new("div").with_attr("role", "menuitem"));
    let span = f
        .tree
        .append_element(node, ElementData::new("span").with_attr("class", "expand-icon"));

    let selector = f.select_with(span, SynthesisOptions::default().with_min_depth(0));
    assert_eq!(selector, "span.expand-icon");
}

#[test]
fn test_min_depth_climbs_further() {
    let mut f = fixture();
    let node = f.add(ElementData::new("div").with_attr("role", "menuitem"));
    let span = f
        .tree
        .append_element(node, ElementData::new("span").with_attr("class", "expand-icon"));

    let selector = f.select_with(span, SynthesisOptions::default().with_min_depth(2));
    assert_eq!(selector, "#fixture > [role=\"menuitem\"] > span.expand-icon");
    f.assert_resolves(&selector, span);
}

#[test]
fn test_ambiguous_level_climbs_to_the_root() {
    // html > body > {nav > div > span, div > div > span}
    let mut tree = DomTree::new();
    let html = tree.append_element(NodeId::ROOT, ElementData::new("html"));
    let body = tree.append_element(html, ElementData::new("body"));
    let nav = tree.append_element(body, ElementData::new("nav"));
    let nav_div = tree.append_element(nav, ElementData::new("div"));
    let span = tree.append_element(nav_div, ElementData::new("span"));
    let outer = tree.append_element(body, ElementData::new("div"));
    let inner = tree.append_element(outer, ElementData::new("div"));
    let _ = tree.append_element(inner, ElementData::new("span"));

    let selector = synthesize_selector(&tree, Some(span), &SynthesisOptions::default()).unwrap();
    assert_eq!(selector, "html > body > nav > div > span");
    assert_eq!(TreeQuery::new(&tree).query_all(&selector), vec![span]);
}

#[test]
fn test_ambiguous_level_still_stops_at_an_id() {
    let mut f = fixture();
    let first = f.add(ElementData::new("nav"));
    let first_div = f.tree.append_element(first, ElementData::new("div"));
    let span = f.tree.append_element(first_div, ElementData::new("span"));
    let second = f.add(ElementData::new("div"));
    let _ = f.tree.append_element(second, ElementData::new("span"));

    let selector = f.select(span);
    assert_eq!(selector, "#fixture > nav > div > span");
    f.assert_resolves(&selector, span);
}

#[test]
fn test_min_depth_does_not_override_id_stop() {
    let mut f = fixture();
    let node = f.add(ElementData::new("div"));

    let selector = f.select_with(node, SynthesisOptions::default().with_min_depth(5));
    assert_eq!(selector, "#fixture > div");
}

#[test]
fn test_zero_feature_count_uses_one_feature() {
    let mut f = fixture();
    let node = f.add(ElementData::new("button").with_attr("role", "menuitem"));

    let selector = f.select_with(node, SynthesisOptions::default().with_feature_count(0));
    assert_eq!(selector, "#fixture > [role=\"menuitem\"]");
}

#[test]
fn test_caller_asserted_uniqueness() {
    let mut f = fixture();
    let first = f.add(ElementData::new("section"));
    let _ = f.tree.append_element(first, ElementData::new("div"));
    let second = f.add(ElementData::new("section"));
    let node = f.tree.append_element(second, ElementData::new("div"));

    // "div" is ambiguous, so the walk goes past depth zero and keeps going
    // up to the fixture id.
    let options = SynthesisOptions::default().with_min_depth(0);
    let selector = f.select_with(node, options);
    assert_eq!(selector, "#fixture > section:nth-child(2) > div");
    f.assert_resolves(&selector, node);

    // Uniqueness taken on trust: nothing forces another level.
    assert_eq!(f.select_with(node, options.with_unique(true)), "div");
}

// ========== degenerate input ==========

#[test]
fn test_absent_or_non_element_node() {
    let mut f = fixture();
    let text = f.tree.append_text(f.fixture, "hello");
    let comment = f.tree.alloc(NodeType::Comment("c".to_string()));
    f.tree.append_child(f.fixture, comment);

    let options = SynthesisOptions::default();
    assert_eq!(synthesize_selector(&f.tree, None, &options).unwrap(), "");
    assert_eq!(synthesize_selector(&f.tree, Some(text), &options).unwrap(), "");
    assert_eq!(synthesize_selector(&f.tree, Some(comment), &options).unwrap(), "");
    assert_eq!(synthesize_selector(&f.tree, Some(NodeId::ROOT), &options).unwrap(), "");
    assert_eq!(synthesize_selector(&f.tree, Some(NodeId(999)), &options).unwrap(), "");
}

#[test]
fn test_detached_element_is_best_effort() {
    let mut tree = DomTree::new();
    let orphan = tree.alloc(NodeType::Element(ElementData::new("div")));

    let selector = synthesize_selector(&tree, Some(orphan), &SynthesisOptions::default()).unwrap();
    assert_eq!(selector, "div");
}

#[test]
fn test_nul_in_identifier_is_an_error() {
    let mut f = fixture();
    let node = f.add(ElementData::new("div").with_attr("id", "a\0b"));

    assert_eq!(
        synthesize_selector(&f.tree, Some(node), &SynthesisOptions::default()),
        Err(SynthesisError::Escape(EscapeError::InvalidCharacter { position: 1 }))
    );
}

// ========== injected query capability ==========

/// Answers `query_all` from the tree but cannot match single elements.
struct NoMatcher<'a> {
    inner: TreeQuery<'a>,
}

impl DocumentQuery for NoMatcher<'_> {
    fn query_all(&self, selector: &str) -> Vec<NodeId> {
        self.inner.query_all(selector)
    }

    fn matches(&self, _node: NodeId, _selector: &str) -> Result<bool, QueryError> {
        Err(QueryError::NoCapability)
    }
}

#[test]
fn test_missing_match_capability_propagates() {
    let mut f = fixture();
    let _ = f.add(ElementData::new("div"));
    let node = f.add(ElementData::new("div"));

    let query = NoMatcher {
        inner: TreeQuery::new(&f.tree),
    };
    let result = Synthesizer::new(&f.tree, &query).synthesize(Some(node), &SynthesisOptions::default());
    assert_eq!(result, Err(SynthesisError::Query(QueryError::NoCapability)));
}

/// Counts document-wide scans.
struct CountingQuery<'a> {
    inner: TreeQuery<'a>,
    scans: Cell<usize>,
}

impl DocumentQuery for CountingQuery<'_> {
    fn query_all(&self, selector: &str) -> Vec<NodeId> {
        self.scans.set(self.scans.get() + 1);
        self.inner.query_all(selector)
    }

    fn matches(&self, node: NodeId, selector: &str) -> Result<bool, QueryError> {
        self.inner.matches(node, selector)
    }
}

#[test]
fn test_one_scan_per_level() {
    let mut f = fixture();
    let node = f.add(ElementData::new("div"));

    let query = CountingQuery {
        inner: TreeQuery::new(&f.tree),
        scans: Cell::new(0),
    };
    let selector = Synthesizer::new(&f.tree, &query)
        .synthesize(Some(node), &SynthesisOptions::default())
        .unwrap();

    assert_eq!(selector, "#fixture > div");
    // "div" at the target, "#fixture" at the parent.
    assert_eq!(query.scans.get(), 2);
}

// ========== single ascent steps ==========

#[test]
fn test_single_step_continues_to_parent() {
    let mut f = fixture();
    let node = f.add(ElementData::new("div"));
    let query = TreeQuery::new(&f.tree);
    let synthesizer = Synthesizer::new(&f.tree, &query);

    let start = AscentState::start(node, &SynthesisOptions::default());
    assert_eq!(start.feature_count, 2);
    assert_eq!(start.min_depth, 1);

    let Ascent::Continue(next) = synthesizer.step(&start).unwrap() else {
        panic!("expected the walk to continue");
    };
    assert_eq!(
        next,
        AscentState {
            node: f.fixture,
            child_selectors: vec!["div".to_string()],
            min_depth: 0,
            is_unique: false,
            feature_count: 1,
            to_root: false,
        }
    );

    assert_eq!(
        synthesizer.step(&next).unwrap(),
        Ascent::Done("#fixture > div".to_string())
    );
}

#[test]
fn test_single_step_with_negative_depth_keeps_climbing() {
    let f = fixture();
    let query = TreeQuery::new(&f.tree);
    let synthesizer = Synthesizer::new(&f.tree, &query);

    // "body" is unique, but a depth below zero only ends at the root.
    let state = AscentState {
        node: f.body,
        child_selectors: vec!["div".to_string()],
        min_depth: -1,
        is_unique: false,
        feature_count: 1,
        to_root: false,
    };
    let Ascent::Continue(next) = synthesizer.step(&state).unwrap() else {
        panic!("expected the walk to continue");
    };
    assert_eq!(next.node, f.html);
    assert_eq!(next.min_depth, -2);
    assert!(next.is_unique);
    assert_eq!(
        synthesizer.step(&next).unwrap(),
        Ascent::Done("html > body > div".to_string())
    );
}

#[test]
fn test_single_step_stops_without_parent_element() {
    let f = fixture();
    let query = TreeQuery::new(&f.tree);
    let synthesizer = Synthesizer::new(&f.tree, &query);

    let state = AscentState {
        node: f.html,
        child_selectors: vec!["body".to_string()],
        min_depth: 3,
        is_unique: false,
        feature_count: 1,
        to_root: true,
    };
    assert_eq!(
        synthesizer.step(&state).unwrap(),
        Ascent::Done("html > body".to_string())
    );
}

// ========== properties ==========

const TAGS: &[&str] = &["div", "span", "a", "input", "section", "my-card", "p"];
const CLASSES: &[&str] = &["card", "hover", "col-2", "item", "0lead", "a b"];
const IDS: &[&str] = &["main", "main", "player_uid_9", "x.y", "-"];
const HREFS: &[&str] = &["/about/", "//deque.com/logo.png", "#top", "/a/index.html", "/2019/1234"];

/// Grow a tree under `<body>` from arbitrary bytes. Each triple picks a
/// parent among the elements so far, a tag, and a handful of attributes.
fn random_tree(seeds: &[(u8, u8, u8)]) -> (DomTree, Vec<NodeId>) {
    let mut tree = DomTree::new();
    let html = tree.append_element(NodeId::ROOT, ElementData::new("html"));
    let body = tree.append_element(html, ElementData::new("body"));
    let mut elements = vec![html, body];

    for &(parent, tag, attrs) in seeds.iter().take(24) {
        let parent = elements[1 + usize::from(parent) % (elements.len() - 1)];
        let mut element = ElementData::new(TAGS[usize::from(tag) % TAGS.len()]);
        if attrs & 0b1 != 0 {
            element = element.with_attr("class", CLASSES[usize::from(attrs >> 4) % CLASSES.len()]);
        }
        if attrs & 0b10 != 0 {
            element = element.with_attr("id", IDS[usize::from(attrs >> 3) % IDS.len()]);
        }
        if attrs & 0b100 != 0 {
            element = element.with_attr("role", "button");
        }
        if attrs & 0b1000 != 0 {
            element = element.with_attr("href", HREFS[usize::from(attrs >> 5) % HREFS.len()]);
        }
        elements.push(tree.append_element(parent, element));
    }
    (tree, elements)
}

/// Every synthesized selector matches the element it was built for, and
/// building it twice gives the same text.
#[quickcheck]
fn prop_selector_is_sound_and_idempotent(seeds: Vec<(u8, u8, u8)>) -> TestResult {
    let (tree, elements) = random_tree(&seeds);
    let query = TreeQuery::new(&tree);
    let options = SynthesisOptions::default();

    for node in elements {
        let Ok(selector) = synthesize_selector(&tree, Some(node), &options) else {
            return TestResult::error(format!("synthesis failed for {node:?}"));
        };
        if !query.query_all(&selector).contains(&node) {
            return TestResult::error(format!("{selector:?} does not match {node:?}"));
        }
        if synthesize_selector(&tree, Some(node), &options).as_ref() != Ok(&selector) {
            return TestResult::error(format!("{selector:?} is not stable"));
        }
    }
    TestResult::passed()
}
