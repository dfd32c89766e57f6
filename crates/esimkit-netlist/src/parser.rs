//! Netlist parsing front door: lexing, classification and model building.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::component::classify;
use crate::error::{Error, MalformedLine, Result};
use crate::lexer::{LineKind, Lexer, LogicalLine};
use crate::topology::{CircuitAnalysis, CircuitModel};

/// Name used when a deck has neither a title line nor `.title`.
pub const DEFAULT_CIRCUIT_NAME: &str = "Untitled Circuit";

/// File extensions recognized as netlists.
pub const NETLIST_EXTENSIONS: [&str; 3] = ["cir", "sp", "net"];

/// Dot commands that request an analysis from the simulator.
const ANALYSIS_DIRECTIVES: [&str; 6] = ["op", "dc", "ac", "tran", "noise", "tf"];

/// A dot command line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Directive {
    /// Lowercase command name without the dot (`op`, `tran`, `end`, ...).
    pub name: String,
    pub args: Vec<String>,
    pub line: usize,
}

impl Directive {
    fn from_line(line: &LogicalLine) -> Self {
        let mut tokens = line.tokens();
        let name = tokens
            .next()
            .unwrap_or_default()
            .trim_start_matches('.')
            .to_ascii_lowercase();

        Self {
            name,
            args: tokens.map(str::to_string).collect(),
            line: line.line,
        }
    }

    /// Whether this directive requests an analysis (.op, .tran, ...).
    pub fn is_analysis(&self) -> bool {
        ANALYSIS_DIRECTIVES.contains(&self.name.as_str())
    }
}

/// Everything a parse produces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedNetlist {
    pub model: CircuitModel,
    pub directives: Vec<Directive>,
    /// Lines that were skipped, in source order.
    pub warnings: Vec<MalformedLine>,
}

impl ParsedNetlist {
    /// Analysis directives in deck order.
    pub fn analyses(&self) -> impl Iterator<Item = &Directive> {
        self.directives.iter().filter(|d| d.is_analysis())
    }
}

/// Parse netlist text.
///
/// Malformed element lines are skipped and reported in
/// [`ParsedNetlist::warnings`]; only a deck with no usable lines fails.
pub fn parse(input: &str) -> Result<ParsedNetlist> {
    let lexed = Lexer::new(input).tokenize()?;

    let mut components = Vec::new();
    let mut directives = Vec::new();
    let mut warnings = lexed.warnings;

    for line in &lexed.lines {
        match line.kind {
            LineKind::Title => {}
            LineKind::Directive => directives.push(Directive::from_line(line)),
            LineKind::Element => match classify(line) {
                Ok(component) => components.push(component),
                Err(malformed) => {
                    log::warn!("skipping malformed {}", malformed);
                    warnings.push(malformed);
                }
            },
        }
    }
    warnings.sort_by_key(|w| w.line);

    let name = lexed
        .title
        .unwrap_or_else(|| DEFAULT_CIRCUIT_NAME.to_string());
    let model = CircuitModel::new(name, components);

    log::debug!(
        "parsed '{}': {} components, {} nodes, {} directives, {} warnings",
        model.circuit_name,
        model.component_count,
        model.node_count,
        directives.len(),
        warnings.len()
    );

    Ok(ParsedNetlist {
        model,
        directives,
        warnings,
    })
}

/// Read and parse a netlist file.
pub fn parse_file(path: &Path) -> Result<ParsedNetlist> {
    let content = fs::read_to_string(path).map_err(|source| Error::FileAccess {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&content)
}

/// Whether `path` has one of the [`NETLIST_EXTENSIONS`].
pub fn is_netlist_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            NETLIST_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

/// One netlist found by [`scan_directory`].
#[derive(Debug, Clone, Serialize)]
pub struct CircuitListing {
    /// File stem, used as the circuit identifier.
    pub id: String,
    pub path: PathBuf,
    pub analysis: Option<CircuitAnalysis>,
    /// Why the file could not be parsed, if it could not.
    pub error: Option<String>,
}

/// Parse every netlist in `dir`, sorted by identifier.
///
/// Files that fail to parse are listed with their error instead of failing
/// the whole scan.
pub fn scan_directory(dir: &Path) -> Result<Vec<CircuitListing>> {
    let access = |source| Error::FileAccess {
        path: dir.to_path_buf(),
        source,
    };

    let mut listings = Vec::new();
    for entry in fs::read_dir(dir).map_err(access)? {
        let path = entry.map_err(access)?.path();
        if !path.is_file() || !is_netlist_path(&path) {
            continue;
        }

        let id = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        let listing = match parse_file(&path) {
            Ok(parsed) => CircuitListing {
                id,
                path,
                analysis: Some(parsed.model.analyze()),
                error: None,
            },
            Err(e) => {
                log::warn!("failed to parse {}: {}", path.display(), e);
                CircuitListing {
                    id,
                    path,
                    analysis: None,
                    error: Some(e.to_string()),
                }
            }
        };
        listings.push(listing);
    }

    listings.sort_by(|a, b| a.id.cmp(&b.id));
    Ok(listings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::ComponentKind;

    #[test]
    fn test_parse_divider() {
        let parsed = parse("V1 1 0 DC 10\nR1 1 2 1k\nR2 2 0 2k").unwrap();
        let model = &parsed.model;

        assert_eq!(model.circuit_name, DEFAULT_CIRCUIT_NAME);
        assert_eq!(model.component_count, 3);
        let kinds: Vec<_> = model.components.iter().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ComponentKind::VoltageSource,
                ComponentKind::Resistor,
                ComponentKind::Resistor,
            ]
        );
        assert!(model.validate().is_valid);
    }

    #[test]
    fn test_directives() {
        let parsed = parse("Filter\nR1 1 2 1k\nC1 2 0 1u\n.ac dec 10 1 1Meg\n.end").unwrap();

        assert_eq!(parsed.directives.len(), 2);
        assert_eq!(parsed.directives[0].name, "ac");
        assert_eq!(parsed.directives[0].args, vec!["dec", "10", "1", "1Meg"]);
        assert_eq!(parsed.directives[0].line, 4);

        let analyses: Vec<_> = parsed.analyses().map(|d| d.name.as_str()).collect();
        assert_eq!(analyses, vec!["ac"]);
    }

    #[test]
    fn test_malformed_lines_become_warnings() {
        let parsed = parse("Title\nR1 1 0 1k\nC9 5\nR2 1 0 2k").unwrap();

        assert_eq!(parsed.model.component_count, 2);
        assert_eq!(parsed.warnings.len(), 1);
        assert_eq!(parsed.warnings[0].line, 3);
    }

    #[test]
    fn test_title_only_is_empty_model() {
        let parsed = parse("Just a title\n.end").unwrap();

        assert_eq!(parsed.model.circuit_name, "Just a title");
        assert_eq!(parsed.model.component_count, 0);
        assert!(!parsed.model.validate().is_valid);
    }

    #[test]
    fn test_netlist_extensions() {
        assert!(is_netlist_path(Path::new("a/divider.cir")));
        assert!(is_netlist_path(Path::new("amp.SP")));
        assert!(is_netlist_path(Path::new("x.net")));
        assert!(!is_netlist_path(Path::new("notes.txt")));
        assert!(!is_netlist_path(Path::new("cir")));
    }
}
