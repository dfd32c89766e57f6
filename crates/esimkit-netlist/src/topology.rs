//! Circuit topology: node set, per-kind counts and structural checks.

use std::collections::BTreeMap;

use indexmap::{IndexMap, IndexSet};
use serde::Serialize;

use crate::component::{Component, ComponentKind};

/// Conventional name of the reference node.
pub const DEFAULT_GROUND: &str = "0";

/// Number of components of each kind.
pub type ComponentSummary = BTreeMap<ComponentKind, usize>;

/// A parsed circuit.
///
/// Nodes are not declared in a netlist; a node exists because some component
/// terminal references it. The set keeps first-reference order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CircuitModel {
    pub circuit_name: String,
    pub components: Vec<Component>,
    pub nodes: IndexSet<String>,
    pub component_count: usize,
    pub node_count: usize,
}

impl CircuitModel {
    /// Build a model from classified components.
    pub fn new(circuit_name: impl Into<String>, components: Vec<Component>) -> Self {
        let nodes: IndexSet<String> = components
            .iter()
            .flat_map(|c| c.nodes.iter().cloned())
            .collect();

        Self {
            circuit_name: circuit_name.into(),
            component_count: components.len(),
            node_count: nodes.len(),
            components,
            nodes,
        }
    }

    /// Check if a node is referenced by any component.
    pub fn has_node(&self, node: &str) -> bool {
        self.nodes.contains(node)
    }

    /// Components with a terminal on `node`.
    pub fn components_on<'a>(&'a self, node: &'a str) -> impl Iterator<Item = &'a Component> {
        self.components.iter().filter(move |c| c.touches(node))
    }

    /// Number of component terminals landing on each node.
    pub fn terminal_counts(&self) -> IndexMap<&str, usize> {
        let mut counts: IndexMap<&str, usize> = IndexMap::new();
        for node in self.components.iter().flat_map(|c| c.nodes.iter()) {
            *counts.entry(node.as_str()).or_default() += 1;
        }
        counts
    }

    /// Count of components per kind.
    pub fn component_summary(&self) -> ComponentSummary {
        let mut summary = ComponentSummary::new();
        for comp in &self.components {
            *summary.entry(comp.kind).or_default() += 1;
        }
        summary
    }

    /// Full analysis record of the circuit.
    pub fn analyze(&self) -> CircuitAnalysis {
        CircuitAnalysis {
            circuit_name: self.circuit_name.clone(),
            total_components: self.component_count,
            total_nodes: self.node_count,
            component_summary: self.component_summary(),
            nodes: self.nodes.iter().cloned().collect(),
            components: self.components.clone(),
        }
    }

    /// Validate against the conventional ground node `"0"`.
    pub fn validate(&self) -> ValidationReport {
        self.validate_with_ground(DEFAULT_GROUND)
    }

    /// Run the structural checks using `ground` as the reference node.
    ///
    /// Each rule contributes at most one issue. An empty circuit is reported
    /// on its own since the other rules have nothing to look at.
    pub fn validate_with_ground(&self, ground: &str) -> ValidationReport {
        let mut issues = Vec::new();

        if self.components.is_empty() {
            issues.push("Circuit has no components".to_string());
            return ValidationReport::from_issues(issues);
        }

        if !self.has_node(ground) {
            issues.push(format!(
                "No ground node ('{}') found; the simulator needs a reference node",
                ground
            ));
        }

        let floating: Vec<&str> = self
            .terminal_counts()
            .into_iter()
            .filter(|(_, count)| *count == 1)
            .map(|(node, _)| node)
            .collect();
        if !floating.is_empty() {
            issues.push(format!(
                "Floating node(s) connected to a single terminal: {}",
                floating.join(", ")
            ));
        }

        let duplicates = self.duplicate_names();
        if !duplicates.is_empty() {
            issues.push(format!(
                "Duplicate reference name(s): {}",
                duplicates.join(", ")
            ));
        }

        ValidationReport::from_issues(issues)
    }

    /// Reference names used by more than one component, in first-use order.
    fn duplicate_names(&self) -> Vec<&str> {
        let mut seen: IndexMap<&str, usize> = IndexMap::new();
        for comp in &self.components {
            *seen.entry(comp.reference_name.as_str()).or_default() += 1;
        }
        seen.into_iter()
            .filter(|(_, count)| *count > 1)
            .map(|(name, _)| name)
            .collect()
    }
}

/// Outcome of the structural checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub issues: Vec<String>,
}

impl ValidationReport {
    fn from_issues(issues: Vec<String>) -> Self {
        Self {
            is_valid: issues.is_empty(),
            issues,
        }
    }
}

/// Summary record combining counts, nodes and components.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CircuitAnalysis {
    pub circuit_name: String,
    pub total_components: usize,
    pub total_nodes: usize,
    pub component_summary: ComponentSummary,
    pub nodes: Vec<String>,
    pub components: Vec<Component>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comp(name: &str, a: &str, b: &str) -> Component {
        Component {
            kind: ComponentKind::from_letter(name.chars().next().unwrap()),
            reference_name: name.to_string(),
            nodes: vec![a.to_string(), b.to_string()],
            value_or_model: String::new(),
            line: 0,
        }
    }

    fn divider() -> CircuitModel {
        CircuitModel::new(
            "divider",
            vec![comp("V1", "1", "0"), comp("R1", "1", "2"), comp("R2", "2", "0")],
        )
    }

    #[test]
    fn test_node_set_in_first_reference_order() {
        let model = divider();
        let nodes: Vec<&str> = model.nodes.iter().map(String::as_str).collect();

        assert_eq!(nodes, vec!["1", "0", "2"]);
        assert_eq!(model.node_count, 3);
        assert_eq!(model.component_count, 3);
    }

    #[test]
    fn test_valid_divider() {
        let report = divider().validate();
        assert!(report.is_valid, "issues: {:?}", report.issues);
        assert!(report.issues.is_empty());
    }

    #[test]
    fn test_summary() {
        let summary = divider().component_summary();
        assert_eq!(summary[&ComponentKind::Resistor], 2);
        assert_eq!(summary[&ComponentKind::VoltageSource], 1);
        assert!(!summary.contains_key(&ComponentKind::Capacitor));
    }

    #[test]
    fn test_empty_circuit() {
        let report = CircuitModel::new("empty", Vec::new()).validate();

        assert!(!report.is_valid);
        assert_eq!(report.issues, vec!["Circuit has no components"]);
    }

    #[test]
    fn test_floating_nodes_single_issue() {
        let model = CircuitModel::new(
            "dangling",
            vec![comp("V1", "1", "0"), comp("R1", "1", "2"), comp("R2", "3", "0")],
        );
        let report = model.validate();

        let floating: Vec<_> = report
            .issues
            .iter()
            .filter(|i| i.contains("Floating"))
            .collect();
        assert_eq!(floating.len(), 1);
        assert!(floating[0].ends_with("2, 3"));
    }

    #[test]
    fn test_duplicate_names() {
        let model = CircuitModel::new(
            "dup",
            vec![comp("V1", "1", "0"), comp("R1", "1", "0"), comp("R1", "1", "0")],
        );
        let report = model.validate();

        assert!(!report.is_valid);
        assert!(report.issues.iter().any(|i| i.contains("Duplicate") && i.contains("R1")));
    }

    #[test]
    fn test_custom_ground() {
        let model = CircuitModel::new(
            "gnd",
            vec![comp("V1", "in", "gnd"), comp("R1", "in", "gnd")],
        );

        assert!(model.validate_with_ground("gnd").is_valid);
        assert!(!model.validate().is_valid);
    }

    #[test]
    fn test_validation_is_deterministic() {
        let model = CircuitModel::new("x", vec![comp("R1", "a", "b"), comp("R1", "b", "c")]);
        assert_eq!(model.validate(), model.validate());
    }

    #[test]
    fn test_components_on_node() {
        let model = divider();
        let names: Vec<_> = model.components_on("2").map(|c| c.reference_name.as_str()).collect();
        assert_eq!(names, vec!["R1", "R2"]);
    }
}
