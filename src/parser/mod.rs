//! Parser module - converts equation strings to AST
mod lexer;
mod pratt;
mod tokens;

use crate::error::{Result, SolveError};
use crate::{DEFAULT_MAX_DEPTH, DEFAULT_MAX_NODES, Expr};

/// Parse an expression string (no `=`) into an AST
///
/// Grammar: numbers, identifiers, `+ - * /`, power as `**` or `^`,
/// unary `+`/`-`, parentheses and calls of built-in functions.
/// Names of built-in constants (`pi`, `E`, `I`, ...) parse to constants.
///
/// # Example
/// ```
/// use symb_propagate::parse;
///
/// let expr = parse("pi * r**2").unwrap();
/// assert!(expr.contains_var("r"));
/// ```
pub fn parse(input: &str) -> Result<Expr> {
    parse_side(input, 0, input, DEFAULT_MAX_DEPTH, DEFAULT_MAX_NODES)
}

/// Parse an equation into its zero form `f(vars) = 0`
///
/// - no `=`: the text is parsed as-is
/// - one `=`: `lhs = rhs` becomes `(lhs) - (rhs)`
/// - more than one `=`: [`SolveError::MalformedEquation`]
///
/// # Example
/// ```
/// use symb_propagate::parse_equation;
///
/// let eq = parse_equation("V = A * h").unwrap();
/// assert_eq!(eq.to_string(), "V - A * h");
/// ```
pub fn parse_equation(input: &str) -> Result<Expr> {
    parse_equation_limited(input, DEFAULT_MAX_DEPTH, DEFAULT_MAX_NODES)
}

/// [`parse_equation`] with explicit AST depth and node-count limits
pub fn parse_equation_limited(input: &str, max_depth: usize, max_nodes: usize) -> Result<Expr> {
    if input.trim().is_empty() {
        return Err(SolveError::parse(input, "equation cannot be empty"));
    }

    let count = input.matches('=').count();
    match count {
        0 => parse_side(input, 0, input, max_depth, max_nodes),
        1 => {
            // `find` cannot fail here since count == 1
            let split = input.find('=').unwrap_or(input.len());
            let lhs = parse_side(&input[..split], 0, input, max_depth, max_nodes)?;
            let rhs = parse_side(&input[split + 1..], split + 1, input, max_depth, max_nodes)?;
            let expr = Expr::sub_expr(lhs, rhs);
            check_limits(&expr, input, max_depth, max_nodes)?;
            Ok(expr)
        }
        _ => Err(SolveError::MalformedEquation {
            input: input.to_string(),
            count,
        }),
    }
}

/// Pipeline: lex -> parse -> limit check
fn parse_side(
    text: &str,
    offset: usize,
    input: &str,
    max_depth: usize,
    max_nodes: usize,
) -> Result<Expr> {
    let tokens = lexer::lex(text, offset, input)?;
    let expr = pratt::parse_expression(&tokens, input, offset + text.len())?;
    check_limits(&expr, input, max_depth, max_nodes)?;
    Ok(expr)
}

fn check_limits(expr: &Expr, input: &str, max_depth: usize, max_nodes: usize) -> Result<()> {
    if expr.max_depth() > max_depth {
        return Err(SolveError::parse(
            input,
            format!("expression nesting depth exceeds maximum limit ({})", max_depth),
        ));
    }
    if expr.node_count() > max_nodes {
        return Err(SolveError::parse(
            input,
            format!("expression size exceeds maximum node count limit ({})", max_nodes),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Span;

    #[test]
    fn test_no_equal_sign_is_used_as_is() {
        assert_eq!(parse_equation("x - y").unwrap(), parse("x - y").unwrap());
    }

    #[test]
    fn test_one_equal_sign_becomes_difference() {
        let eq = parse_equation("A = pi*r**2").unwrap();
        assert_eq!(eq, Expr::sub_expr(parse("A").unwrap(), parse("pi*r**2").unwrap()));
    }

    #[test]
    fn test_too_many_equal_signs() {
        let err = parse_equation("a = b = c").unwrap_err();
        assert_eq!(
            err,
            SolveError::MalformedEquation {
                input: "a = b = c".to_string(),
                count: 2,
            }
        );
    }

    #[test]
    fn test_empty_side_is_a_parse_error() {
        assert!(matches!(parse_equation("= x"), Err(SolveError::Parse { .. })));
        assert!(matches!(parse_equation("x ="), Err(SolveError::Parse { .. })));
        assert!(matches!(parse_equation("   "), Err(SolveError::Parse { .. })));
    }

    #[test]
    fn test_rhs_error_span_points_into_original_text() {
        let err = parse_equation("V = A * * h").unwrap_err();
        match err {
            SolveError::Parse { input, span, .. } => {
                assert_eq!(input, "V = A * * h");
                assert_eq!(span, Some(Span::new(8, 9)));
            }
            other => panic!("Expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_limits() {
        let mut text = "x".to_string();
        for _ in 0..10 {
            text = format!("sin({})", text);
        }
        assert!(parse_equation_limited(&text, 5, 1000).is_err());
        assert!(parse_equation_limited(&text, 50, 5).is_err());
        assert!(parse_equation_limited(&text, 50, 1000).is_ok());
    }
}
