//! End-to-end tests: netlist text or files in, model and validation out.

use std::fs;
use std::path::Path;

use esimkit_netlist::{ComponentKind, Error, parse, parse_file, scan_directory};

const DIVIDER: &str = "V1 1 0 DC 10\nR1 1 2 1k\nR2 2 0 2k";

#[test]
fn test_divider_scenario() {
    let parsed = parse(DIVIDER).expect("parse should succeed");
    let model = &parsed.model;

    assert_eq!(model.component_count, 3);
    let letters: Vec<_> = model
        .components
        .iter()
        .map(|c| c.kind.letter().unwrap())
        .collect();
    assert_eq!(letters, vec!['V', 'R', 'R']);

    let mut nodes: Vec<_> = model.nodes.iter().cloned().collect();
    nodes.sort();
    assert_eq!(nodes, vec!["0", "1", "2"]);

    assert!(model.validate().is_valid);
}

#[test]
fn test_lone_resistor_lacks_ground() {
    let parsed = parse("R1 1 2 1k").expect("parse should succeed");
    let report = parsed.model.validate();

    assert!(!report.is_valid);
    assert!(
        report.issues.iter().any(|i| i.to_lowercase().contains("ground")),
        "issues: {:?}",
        report.issues
    );
}

#[test]
fn test_counts_match_components_and_distinct_nodes() {
    let netlist = "\
Ladder
V1 in 0 DC 5
R1 in a 1k
R2 a 0 1k
R3 a b 1k
R4 b 0 1k
C1 b 0 10n
L1 in b 1m
";
    let parsed = parse(netlist).unwrap();

    assert_eq!(parsed.model.component_count, 7);
    assert_eq!(parsed.model.node_count, 4);
    assert_eq!(parsed.model.nodes.len(), parsed.model.node_count);
}

#[test]
fn test_parsing_is_idempotent() {
    let netlist = "Amp\nV1 vcc 0 12\nR1 vcc out 4.7k\nQ1 out base 0 2N3904\nD1 base 0 D1N4148\n";

    let first = parse(netlist).unwrap();
    let second = parse(netlist).unwrap();

    assert_eq!(first.model.components, second.model.components);
    assert_eq!(first, second);
}

#[test]
fn test_duplicate_reference_names() {
    let parsed = parse("Dup\nV1 1 0 5\nR1 1 0 1k\nR1 1 0 2k\n").unwrap();
    let report = parsed.model.validate();

    assert!(!report.is_valid);
    assert!(report.issues.iter().any(|i| i.contains("Duplicate")));
}

#[test]
fn test_each_rule_reports_once() {
    // No ground, two floating nodes, two duplicated names.
    let parsed = parse("Bad\nR1 a b 1\nR1 b c 1\nC1 d e 1\nC1 d e 1\n").unwrap();
    let report = parsed.model.validate();

    assert_eq!(report.issues.len(), 3, "issues: {:?}", report.issues);
    assert!(report.issues[1].contains("a, c"));
}

#[test]
fn test_component_summary_and_analysis() {
    let parsed = parse("* Sample\n.title Test Circuit\nV1 1 0 DC 5V\nR1 1 2 1k\nR2 2 0 2k\n.op\n.end\n")
        .unwrap();
    let analysis = parsed.model.analyze();

    assert_eq!(analysis.circuit_name, "Test Circuit");
    assert_eq!(analysis.total_components, 3);
    assert_eq!(analysis.total_nodes, 3);
    assert_eq!(analysis.component_summary[&ComponentKind::Resistor], 2);
    assert_eq!(analysis.component_summary[&ComponentKind::VoltageSource], 1);
}

#[test]
fn test_analysis_serializes_to_json() {
    let parsed = parse(DIVIDER).unwrap();
    let json = serde_json::to_value(parsed.model.analyze()).unwrap();

    assert_eq!(json["total_components"], 3);
    assert_eq!(json["component_summary"]["Resistor"], 2);
    assert_eq!(json["components"][0]["reference_name"], "V1");
}

#[test]
fn test_parse_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("divider.cir");
    fs::write(&path, DIVIDER).unwrap();

    let parsed = parse_file(&path).unwrap();
    assert_eq!(parsed.model.component_count, 3);
}

#[test]
fn test_parse_missing_file() {
    let err = parse_file(Path::new("/nonexistent/path.cir")).unwrap_err();
    assert!(matches!(err, Error::FileAccess { .. }));
}

#[test]
fn test_parse_empty_text() {
    let err = parse("* only a comment\n\n").unwrap_err();
    assert!(matches!(err, Error::EmptyCircuit));
}

#[test]
fn test_scan_directory() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("b_divider.cir"), DIVIDER).unwrap();
    fs::write(dir.path().join("a_filter.sp"), "RC\nR1 1 2 1k\nC1 2 0 1u\n").unwrap();
    fs::write(dir.path().join("c_empty.net"), "* nothing\n").unwrap();
    fs::write(dir.path().join("readme.txt"), "not a netlist").unwrap();

    let listings = scan_directory(dir.path()).unwrap();
    let ids: Vec<_> = listings.iter().map(|l| l.id.as_str()).collect();
    assert_eq!(ids, vec!["a_filter", "b_divider", "c_empty"]);

    assert_eq!(listings[1].analysis.as_ref().unwrap().total_components, 3);
    assert!(listings[2].analysis.is_none());
    assert!(listings[2].error.is_some());
}
