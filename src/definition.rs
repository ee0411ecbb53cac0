//! Equation-set definition text
//!
//! Line-oriented format with three sections:
//!
//! ```text
//! # cylinder
//! [equations]
//! area = pi*radius**2
//! volume = area*height
//!
//! [names]
//! radius: r
//!
//! [combos]
//! area_only: 0
//! ```
//!
//! `#` starts a comment, blank lines are skipped. Under `[names]` each line is
//! `original: replacement`, where `original` is a variable name and
//! `replacement` any expression (`r: d/2`). Under `[combos]` each line is
//! `name: i0 i1 ...` with zero-based equation indices.

use std::collections::BTreeMap;
use std::str::FromStr;

use crate::error::{Result, SolveError};
use crate::{Expr, ExprKind, parse};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Equations,
    Names,
    Combos,
}

impl Section {
    fn from_header(name: &str) -> Option<Section> {
        match name {
            "equations" => Some(Section::Equations),
            "names" => Some(Section::Names),
            "combos" => Some(Section::Combos),
            _ => None,
        }
    }
}

/// Parsed contents of a definition, before any equation is parsed
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Definition {
    /// Equation strings in file order
    pub equations: Vec<String>,
    /// Variable substitutions applied to every equation
    pub names: BTreeMap<String, Expr>,
    /// Named equation subsets
    pub combos: BTreeMap<String, Vec<usize>>,
}

impl Definition {
    /// Parse definition text; errors carry the 1-based line number
    pub fn parse(text: &str) -> Result<Definition> {
        let mut def = Definition::default();
        let mut section: Option<Section> = None;

        for (idx, raw) in text.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw.split('#').next().unwrap_or("").trim();
            if line.is_empty() {
                continue;
            }

            if let Some(header) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
                let header = header.trim();
                section = Some(Section::from_header(header).ok_or_else(|| {
                    definition_error(line_no, format!("invalid section header '[{}]'", header))
                })?);
                continue;
            }

            match section {
                None => {
                    return Err(definition_error(
                        line_no,
                        "content before the first section header",
                    ));
                }
                Some(Section::Equations) => def.equations.push(line.to_string()),
                Some(Section::Names) => {
                    let (old, new) = split_entry(line, line_no)?;
                    let replacement = parse_name(old, new, line_no)?;
                    def.names.insert(old.to_string(), replacement);
                }
                Some(Section::Combos) => {
                    let (name, rest) = split_entry(line, line_no)?;
                    let indices = rest
                        .split_whitespace()
                        .map(|tok| {
                            tok.parse::<usize>().map_err(|_| {
                                definition_error(
                                    line_no,
                                    format!("combo '{}': '{}' is not an equation index", name, tok),
                                )
                            })
                        })
                        .collect::<Result<Vec<usize>>>()?;
                    if indices.is_empty() {
                        return Err(definition_error(
                            line_no,
                            format!("combo '{}' lists no equations", name),
                        ));
                    }
                    def.combos.insert(name.to_string(), indices);
                }
            }
        }

        Ok(def)
    }
}

impl FromStr for Definition {
    type Err = SolveError;

    fn from_str(s: &str) -> Result<Self> {
        Definition::parse(s)
    }
}

fn split_entry(line: &str, line_no: usize) -> Result<(&str, &str)> {
    let (key, value) = line
        .split_once(':')
        .ok_or_else(|| {
            definition_error(line_no, format!("expected 'key: value', got '{}'", line))
        })?;
    let key = key.trim();
    if key.is_empty() {
        return Err(definition_error(line_no, "empty key"));
    }
    Ok((key, value.trim()))
}

/// Check that `old` is a plain variable and parse `new` as its replacement
fn parse_name(old: &str, new: &str, line_no: usize) -> Result<Expr> {
    if !matches!(parse(old).map(|e| e.kind), Ok(ExprKind::Symbol(_))) {
        return Err(definition_error(
            line_no,
            format!("'{}' is not a variable name", old),
        ));
    }
    if new.is_empty() {
        return Err(definition_error(
            line_no,
            format!("missing replacement for name '{}'", old),
        ));
    }
    parse(new).map_err(|e| {
        definition_error(line_no, format!("invalid replacement for '{}': {}", old, e))
    })
}

fn definition_error(line: usize, message: impl Into<String>) -> SolveError {
    SolveError::Definition {
        line,
        message: message.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sections_and_comments() {
        let text = "\
# header comment
[equations]
A = pi*r**2   # area
V = A*h

[names]
r: radius

[combos]
area: 0
both: 0 1
";
        let def = Definition::parse(text).unwrap();
        assert_eq!(def.equations, vec!["A = pi*r**2", "V = A*h"]);
        assert_eq!(def.names.get("r"), Some(&Expr::symbol("radius")));
        assert_eq!(def.combos.get("both"), Some(&vec![0, 1]));
    }

    #[test]
    fn test_invalid_header_names_line() {
        let err = Definition::parse("[equations]\nx = y\n[bogus]\n").unwrap_err();
        assert_eq!(
            err,
            SolveError::Definition {
                line: 3,
                message: "invalid section header '[bogus]'".to_string(),
            }
        );
    }

    #[test]
    fn test_content_before_header() {
        assert!(matches!(
            Definition::parse("x = y\n"),
            Err(SolveError::Definition { line: 1, .. })
        ));
    }

    #[test]
    fn test_malformed_names_and_combos() {
        assert!(matches!(
            Definition::parse("[names]\nradius r\n"),
            Err(SolveError::Definition { line: 2, .. })
        ));
        assert!(matches!(
            Definition::parse("[combos]\nwind: 0 x 2\n"),
            Err(SolveError::Definition { line: 2, .. })
        ));
        assert!(matches!(
            Definition::parse("[combos]\nwind:\n"),
            Err(SolveError::Definition { line: 2, .. })
        ));
    }

    #[test]
    fn test_name_replacement_is_an_expression() {
        let def = Definition::parse("[names]\nr: d/2\n").unwrap();
        assert_eq!(
            def.names.get("r"),
            Some(&Expr::div_expr(Expr::symbol("d"), Expr::number(2.0)))
        );
    }

    #[test]
    fn test_malformed_name_entries() {
        // Replacement that is not an expression
        let err = Definition::parse("[equations]\nA = pi*r**2\n[names]\nr: d/\n").unwrap_err();
        match err {
            SolveError::Definition { line, message } => {
                assert_eq!(line, 4);
                assert!(message.starts_with("invalid replacement for 'r'"));
            }
            other => panic!("Expected definition error, got {:?}", other),
        }
        // Original that is not a plain variable
        assert!(matches!(
            Definition::parse("[names]\nd/2: r\n"),
            Err(SolveError::Definition { line: 2, .. })
        ));
        assert!(matches!(
            Definition::parse("[names]\npi: p\n"),
            Err(SolveError::Definition { line: 2, .. })
        ));
        assert!(matches!(
            Definition::parse("[names]\nr:\n"),
            Err(SolveError::Definition { line: 2, .. })
        ));
    }

    #[test]
    fn test_from_str() {
        let def: Definition = "[equations]\nx = 2*y".parse().unwrap();
        assert_eq!(def.equations.len(), 1);
    }
}
