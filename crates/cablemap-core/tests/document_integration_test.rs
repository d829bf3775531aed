//! Integration tests for the complete document processing pipeline
//!
//! Tests use temporary directories with real file fixtures to verify:
//! - Document loading, prepended libraries and title fallback
//! - Link counts and boundary links across whole documents
//! - Autogenerated instance numbering and determinism
//! - Error propagation with row context

use cablemap_core::{
    Document, Error, Harness, HarnessSink, PinLabel, PinRef, Role, WireLink, parse, parse_file,
};
use rstest::rstest;
use tempfile::TempDir;

fn pin(component: &str, n: u64) -> PinRef {
    PinRef::new(component, PinLabel::Number(n))
}

const LOOM: &str = r#"
metadata:
  pn: HRN-0042
options:
  bgcolor: BK
connectors:
  X1:
    type: Molex KK 254
    pincount: 4
  X2:
    type: Molex KK 254
    pincount: 4
  F:
    style: simple
    type: Crimp ferrule
    autogenerate: true
cables:
  W1:
    wirecount: 3
    length: 0.2
  W2:
    wirecount: 2
    category: bundle
connections:
  - - X1: [1-3]
    - W1: [1-3]
    - X2: [3-1]
  - - X1: [4]
    - W2: [1]
    - F
  - - F
    - W2: [2]
    - X2: [4]
additional_bom_items:
  - description: Label, pinout information
    qty: 2
"#;

// =============================================================================
// Complete Pipeline Tests
// =============================================================================

#[test]
fn test_complete_document() {
    let harness = parse(LOOM).unwrap();

    let summary = harness.summary();
    assert_eq!(summary.connectors, 4);
    assert_eq!(summary.autogenerated, 2);
    assert_eq!(summary.cables, 2);
    assert_eq!(summary.links, 5);

    assert_eq!(
        harness.links[0],
        WireLink {
            from: Some(pin("X1", 1)),
            via: pin("W1", 1),
            to: Some(pin("X2", 3)),
        }
    );
    assert_eq!(harness.links[2].to, Some(pin("X2", 1)));
    assert_eq!(harness.links[3].to, Some(pin("_F_1", 1)));
    assert_eq!(harness.links[4].from, Some(pin("_F_2", 1)));

    assert_eq!(harness.options.bgcolor, "BK");
    assert_eq!(harness.additional_bom_items.len(), 1);
}

#[test]
fn test_link_count_is_cable_slots_times_cardinality() {
    let yaml = r#"
connectors:
  A: {}
  B: {}
  C: {}
cables:
  W1: {}
  W2: {}
connections:
  - - A: [1-4]
    - W1: [1-4]
    - B: [1-4]
    - W2: [5-8]
    - C: [1-4]
  - - W1: [5-6]
    - A: [5-6]
    - W2: [1-2]
"#;
    let harness = parse(yaml).unwrap();
    assert_eq!(harness.links.len(), 2 * 4 + 2 * 2);
}

#[test]
fn test_boundary_links() {
    let yaml = r#"
connectors:
  X1: {}
cables:
  W1: {}
  W2: {}
connections:
  - [{W1: 1-2}, {X1: 1-2}, {W2: 1-2}]
"#;
    let harness = parse(yaml).unwrap();
    assert_eq!(harness.links.len(), 4);
    assert!(harness.links[..2].iter().all(|l| l.from.is_none() && l.to.is_some()));
    assert!(harness.links[2..].iter().all(|l| l.from.is_some() && l.to.is_none()));
}

#[test]
fn test_alternation_inferred_from_either_end() {
    let yaml = r#"
connectors:
  connB: {}
cables:
  cableA: {}
connections:
  - [{cableA: 1}, connB]
  - [connB, {cableA: 2}]
"#;
    let harness = parse(yaml).unwrap();
    assert_eq!(harness.links[0].from, None);
    assert_eq!(harness.links[0].to, Some(pin("connB", 1)));
    assert_eq!(harness.links[1].from, Some(pin("connB", 1)));
    assert_eq!(harness.links[1].to, None);
}

// =============================================================================
// Autogeneration Tests
// =============================================================================

#[test]
fn test_autogeneration_is_deterministic() {
    let first = parse(LOOM).unwrap();
    let second = parse(LOOM).unwrap();

    let ids = |h: &Harness| -> Vec<String> { h.connectors.iter().map(|c| c.id.clone()).collect() };
    assert_eq!(ids(&first), ids(&second));
    assert_eq!(ids(&first), vec!["X1", "X2", "_F_1", "_F_2"]);
    assert_eq!(first.links, second.links);
}

#[test]
fn test_instances_keep_template_attributes() {
    let harness = parse(LOOM).unwrap();
    let instance = harness.connector("_F_2").unwrap();
    assert_eq!(instance.role, Role::Connector);
    assert_eq!(instance.instance_of.as_deref(), Some("F"));
    assert!(instance.attributes.contains_key("type"));
    assert!(harness.connector("F").is_none());
}

// =============================================================================
// Sink Tests
// =============================================================================

#[derive(Default)]
struct Recorder {
    events: Vec<String>,
}

impl HarnessSink for Recorder {
    fn add_connector(&mut self, connector: &cablemap_core::ComponentDefinition) {
        self.events.push(format!("connector {}", connector.id));
    }

    fn add_cable(&mut self, cable: &cablemap_core::ComponentDefinition) {
        self.events.push(format!("cable {}", cable.id));
    }

    fn connect(&mut self, link: WireLink) {
        self.events.push(format!("link {}", link));
    }

    fn add_bom_item(&mut self, _item: &serde_yaml::Value) {
        self.events.push("bom".to_string());
    }
}

#[test]
fn test_sink_sees_instances_before_their_links() {
    let doc = Document::from_yaml(LOOM).unwrap();
    let mut recorder = Recorder::default();
    let ctx = doc.build(&mut recorder).unwrap();

    let position = |needle: &str| recorder.events.iter().position(|e| e == needle).unwrap();
    assert!(position("connector _F_1") < position("link X1:4 =[W2:1]= _F_1:1"));
    assert_eq!(recorder.events.last().map(String::as_str), Some("bom"));
    assert_eq!(ctx.counter.count("F"), 2);
}

// =============================================================================
// File Loading Tests
// =============================================================================

#[test]
fn test_parse_file_uses_stem_as_title() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("sensor_loom.yaml");
    std::fs::write(&path, LOOM).unwrap();

    let harness = parse_file(&path).unwrap();
    assert_eq!(harness.title(), Some("sensor_loom"));
}

#[test]
fn test_document_title_wins_over_stem() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("loom.yaml");
    std::fs::write(&path, "metadata:\n  title: Main loom\n").unwrap();

    let harness = parse_file(&path).unwrap();
    assert_eq!(harness.title(), Some("Main loom"));
}

#[test]
fn test_load_with_prepended_library() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("library.yaml"),
        concat!(
            "connectors:\n  X1:\n    pincount: 2\n  X2:\n    pincount: 2\n",
            "cables:\n  W1:\n    wirecount: 2",
        ),
    )
    .unwrap();
    std::fs::write(
        dir.path().join("loom.yaml"),
        "connections:\n  - [{X1: 1-2}, {W1: 1-2}, {X2: 1-2}]\n",
    )
    .unwrap();

    let doc =
        Document::load_with_prepend(dir.path().join("loom.yaml"), dir.path().join("library.yaml"))
            .unwrap();
    let harness = doc.into_harness().unwrap();
    assert_eq!(harness.links.len(), 2);
}

#[test]
fn test_missing_document() {
    let dir = TempDir::new().unwrap();
    let result = Document::load(dir.path().join("nope.yaml"));
    assert!(matches!(result, Err(Error::DocumentNotFound { .. })));
}

#[test]
fn test_integer_ids() {
    let yaml = r#"
connectors:
  1: {}
  2: {}
cables:
  10: {}
connections:
  - [1, {10: 1-2}, [2, 2]]
"#;
    let harness = parse(yaml).unwrap();
    assert!(harness.connector("1").is_some());
    assert_eq!(harness.links.len(), 2);
    assert_eq!(harness.links[1].from, Some(pin("1", 1)));
    assert_eq!(harness.links[1].via, pin("10", 2));
    assert_eq!(harness.links[1].to, Some(pin("2", 1)));
}

// =============================================================================
// Error Handling Tests
// =============================================================================

#[rstest]
#[case::connector_where_cable_expected("[A, B, C]", "RoleAlternation")]
#[case::mapping_and_list_disagree("[{A: 1-2}, W, [B, C, A]]", "CardinalityMismatch")]
#[case::only_scalars("[A, W, B]", "NoCardinalityRevealed")]
#[case::unknown_first_item("[ghost, W, A]", "RoleAlternation")]
#[case::unknown_later_item("[{A: 1}, W, ghost]", "UnknownComponent")]
#[case::two_keys("[{A: 1, B: 1}, W]", "MultiKeyMapping")]
#[case::bad_pins("[{A: 1-}, W]", "MalformedPinSpec")]
#[case::range_too_large("[{A: 1-18446744073709551615}, W]", "MalformedPinSpec")]
#[case::not_an_id("[{A: 1}, W, true]", "InvalidEndpoint")]
#[case::integer_id_not_defined("[{A: 1}, W, 5]", "UnknownComponent")]
fn test_row_errors(#[case] row: &str, #[case] kind: &str) {
    let yaml = format!(
        "connectors:\n  A: {{}}\n  B: {{}}\n  C: {{}}\ncables:\n  W: {{}}\nconnections:\n  - {}\n",
        row
    );
    let err = parse(&yaml).unwrap_err();
    assert!(
        format!("{:?}", err).starts_with(kind),
        "expected {}, got {:?}",
        kind,
        err
    );
    assert_eq!(err.row(), Some(0));
}

#[test]
fn test_invalid_yaml() {
    let result = parse("connectors: [");
    assert!(matches!(result, Err(Error::DocumentParse(_))));
}
