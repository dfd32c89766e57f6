//! SPICE netlist parsing and topology checks for esimkit.
//!
//! This crate reads SPICE decks line by line, classifies two-terminal
//! components by their leading letter and derives the node set, per-kind
//! counts and a structural validation report.
//!
//! # Example
//!
//! ```
//! use esimkit_netlist::parse;
//!
//! let parsed = parse(r#"
//! Voltage Divider
//! V1 1 0 DC 10
//! R1 1 2 1k
//! R2 2 0 1k
//! .end
//! "#).unwrap();
//!
//! assert_eq!(parsed.model.component_count, 3);
//! assert!(parsed.model.validate().is_valid);
//! ```

pub mod component;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod templates;
pub mod topology;

pub use component::{Component, ComponentKind, classify};
pub use error::{Error, MalformedLine, Result};
pub use parser::{
    CircuitListing, DEFAULT_CIRCUIT_NAME, Directive, ParsedNetlist, is_netlist_path, parse,
    parse_file, scan_directory,
};
pub use templates::{TEMPLATE_NAMES, netlist_template};
pub use topology::{
    CircuitAnalysis, CircuitModel, ComponentSummary, DEFAULT_GROUND, ValidationReport,
};
