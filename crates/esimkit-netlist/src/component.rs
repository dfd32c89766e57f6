//! Component classification.
//!
//! Each element line is classified on its own: the reference name's leading
//! letter picks the kind, the next two tokens are the connection nodes and the
//! rest is kept as the value or model string.
//!
//! Only two-terminal connectivity is modelled. Transistors and other
//! multi-terminal devices are classified as [`ComponentKind::Other`] with
//! their first two terminals as nodes; the remaining terminals end up in
//! `value_or_model`.

use std::fmt;

use serde::Serialize;

use crate::error::MalformedLine;
use crate::lexer::LogicalLine;

/// Kind of circuit element, selected by the reference name's first letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum ComponentKind {
    Resistor,
    Capacitor,
    Inductor,
    VoltageSource,
    CurrentSource,
    Diode,
    /// Any letter not in the table.
    Other,
}

/// Letter-to-kind table. Lookups are case-insensitive.
const KIND_TABLE: [(char, ComponentKind); 6] = [
    ('R', ComponentKind::Resistor),
    ('C', ComponentKind::Capacitor),
    ('L', ComponentKind::Inductor),
    ('V', ComponentKind::VoltageSource),
    ('I', ComponentKind::CurrentSource),
    ('D', ComponentKind::Diode),
];

impl ComponentKind {
    /// Look up the kind for a reference-name letter.
    pub fn from_letter(letter: char) -> Self {
        let letter = letter.to_ascii_uppercase();
        KIND_TABLE
            .iter()
            .find(|(l, _)| *l == letter)
            .map(|(_, kind)| *kind)
            .unwrap_or(ComponentKind::Other)
    }

    /// SPICE letter for this kind, `None` for [`ComponentKind::Other`].
    pub fn letter(self) -> Option<char> {
        KIND_TABLE
            .iter()
            .find(|(_, kind)| *kind == self)
            .map(|(l, _)| *l)
    }

    pub fn name(self) -> &'static str {
        match self {
            ComponentKind::Resistor => "resistor",
            ComponentKind::Capacitor => "capacitor",
            ComponentKind::Inductor => "inductor",
            ComponentKind::VoltageSource => "voltage source",
            ComponentKind::CurrentSource => "current source",
            ComponentKind::Diode => "diode",
            ComponentKind::Other => "other",
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A classified circuit element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Component {
    pub kind: ComponentKind,
    /// Reference designator as written (R1, C2, ...).
    pub reference_name: String,
    /// Connection nodes in netlist order.
    pub nodes: Vec<String>,
    /// Remaining tokens joined by single spaces; empty if there were none.
    pub value_or_model: String,
    /// 1-based source line.
    pub line: usize,
}

impl Component {
    /// Whether any terminal of this component sits on `node`.
    pub fn touches(&self, node: &str) -> bool {
        self.nodes.iter().any(|n| n == node)
    }
}

/// Classify one element line.
///
/// Lines with fewer than three tokens cannot name two nodes and are returned
/// as [`MalformedLine`].
pub fn classify(line: &LogicalLine) -> Result<Component, MalformedLine> {
    let tokens: Vec<&str> = line.tokens().collect();

    if tokens.len() < 3 {
        return Err(MalformedLine {
            line: line.line,
            text: line.text.clone(),
            reason: format!(
                "expected a name and two nodes, found {} token(s)",
                tokens.len()
            ),
        });
    }

    let reference_name = tokens[0];
    let kind = reference_name
        .chars()
        .next()
        .map(ComponentKind::from_letter)
        .unwrap_or(ComponentKind::Other);

    Ok(Component {
        kind,
        reference_name: reference_name.to_string(),
        nodes: vec![tokens[1].to_string(), tokens[2].to_string()],
        value_or_model: tokens[3..].join(" "),
        line: line.line,
    })
}
