//! SPICE netlist lexer.
//!
//! Turns raw deck text into logical lines: comments and blank lines are
//! dropped, `+` continuations are folded into the line they extend, and every
//! surviving line is tagged as the title, a dot directive or an element.

use crate::error::{Error, MalformedLine, Result};

/// What a logical line represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// The deck title (first content line).
    Title,
    /// Dot command (.op, .tran, .end, ...)
    Directive,
    /// Anything else; a candidate component line.
    Element,
}

/// A comment-free, continuation-joined line of the deck.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicalLine {
    pub kind: LineKind,
    /// Trimmed text, continuations joined with a single space.
    pub text: String,
    /// 1-based line number where the logical line starts.
    pub line: usize,
}

impl LogicalLine {
    /// Whitespace-separated tokens of the line.
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.text.split_whitespace()
    }
}

/// Output of [`Lexer::tokenize`].
#[derive(Debug, Clone, Default)]
pub struct Lexed {
    /// Title taken from `.title`, or else from the first content line.
    pub title: Option<String>,
    pub lines: Vec<LogicalLine>,
    pub warnings: Vec<MalformedLine>,
}

/// Line-oriented lexer for SPICE netlists.
pub struct Lexer<'a> {
    input: &'a str,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given input.
    pub fn new(input: &'a str) -> Self {
        Self { input }
    }

    /// Split the input into logical lines.
    ///
    /// Fails with [`Error::EmptyCircuit`] when nothing but comments and blank
    /// lines remain.
    pub fn tokenize(self) -> Result<Lexed> {
        let mut lexed = Lexed::default();
        let mut first_line_title = None;
        let mut dot_title = None;
        let mut seen_content = false;

        for (idx, raw) in self.input.lines().enumerate() {
            let line = idx + 1;
            let text = strip_inline_comment(raw).trim();

            if text.is_empty() || text.starts_with('*') {
                continue;
            }

            if let Some(rest) = text.strip_prefix('+') {
                match lexed.lines.last_mut() {
                    Some(prev) => {
                        let rest = rest.trim();
                        if !rest.is_empty() {
                            prev.text.push(' ');
                            prev.text.push_str(rest);
                        }
                    }
                    None => lexed.warnings.push(MalformedLine {
                        line,
                        text: text.to_string(),
                        reason: "continuation with no preceding line".to_string(),
                    }),
                }
                continue;
            }

            if text.starts_with('.') {
                let name = text
                    .split_whitespace()
                    .next()
                    .unwrap_or_default()
                    .to_ascii_lowercase();

                if name == ".title" {
                    let rest = text[name.len()..].trim();
                    if !rest.is_empty() {
                        dot_title = Some(rest.to_string());
                    }
                }

                lexed.lines.push(LogicalLine {
                    kind: LineKind::Directive,
                    text: text.to_string(),
                    line,
                });

                if name == ".end" {
                    break;
                }
                continue;
            }

            let kind = if !seen_content && !looks_like_element(text) {
                first_line_title = Some(text.to_string());
                LineKind::Title
            } else {
                LineKind::Element
            };
            seen_content = true;

            lexed.lines.push(LogicalLine {
                kind,
                text: text.to_string(),
                line,
            });
        }

        if lexed.lines.is_empty() {
            return Err(Error::EmptyCircuit);
        }

        lexed.title = dot_title.or(first_line_title);
        Ok(lexed)
    }
}

/// Drop everything from an inline `;` comment onwards.
fn strip_inline_comment(line: &str) -> &str {
    match line.find(';') {
        Some(pos) => &line[..pos],
        None => line,
    }
}

/// Whether a first content line reads like a component rather than a title.
///
/// The first token must be a reference name (letter, then alphanumerics or
/// `_`) followed by at least two more tokens. On top of that either the name
/// carries a digit (`R1`, `Vin2`) or the line has a value token after the two
/// nodes and some token after the name starts like a number. Titles such as
/// "RC Low Pass Filter", "Diode test 1" and "Amplifier stage 2" fail both.
fn looks_like_element(text: &str) -> bool {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    if tokens.len() < 3 {
        return false;
    }

    let name = tokens[0];
    let mut chars = name.chars();
    let name_ok = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if !name_ok {
        return false;
    }

    let numbered_name = name.chars().any(|c| c.is_ascii_digit());
    let valued = tokens.len() >= 4 && tokens[1..].iter().any(|t| starts_numeric(t));
    numbered_name || valued
}

/// `10`, `1k`, `-5`, `.5u` and the like.
fn starts_numeric(token: &str) -> bool {
    let rest = token.trim_start_matches(['+', '-']);
    let rest = rest.strip_prefix('.').unwrap_or(rest);
    rest.chars().next().is_some_and(|c| c.is_ascii_digit())
}
