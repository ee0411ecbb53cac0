use crate::constants::Constant;
use crate::error::{Result, SolveError, Span};
use crate::functions::registry::Registry;
use crate::parser::tokens::{Operator, Spanned, Token};
use crate::{Expr, ExprKind};

/// Unary minus/plus binding power: lower than Pow (30), higher than Mul (20).
/// This makes `-x**2` parse as `-(x**2)`.
const UNARY_PRECEDENCE: u8 = 25;

/// Parse tokens into an AST using Pratt parsing algorithm
///
/// `input` is the full equation text and `end` the byte offset just past the
/// parsed slice; both are only used to build error messages.
pub(crate) fn parse_expression(tokens: &[Spanned], input: &str, end: usize) -> Result<Expr> {
    if tokens.is_empty() {
        return Err(SolveError::parse_at(
            input,
            "empty expression",
            Span::at(end.saturating_sub(1)),
        ));
    }

    let mut parser = Parser {
        tokens,
        pos: 0,
        input,
        end,
    };

    let expr = parser.parse_expr(0)?;

    if let Some(extra) = parser.current() {
        return Err(SolveError::parse_at(
            input,
            format!("unexpected '{}'", extra.token.to_user_string()),
            extra.span,
        ));
    }

    Ok(expr)
}

struct Parser<'a> {
    tokens: &'a [Spanned],
    pos: usize,
    input: &'a str,
    end: usize,
}

impl<'a> Parser<'a> {
    fn current(&self) -> Option<&'a Spanned> {
        self.tokens.get(self.pos)
    }

    fn current_token(&self) -> Option<&'a Token> {
        self.current().map(|t| &t.token)
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    fn error_here(&self, message: impl Into<String>) -> SolveError {
        let span = self.current().map_or(Span::at(self.end), |t| t.span);
        SolveError::parse_at(self.input, message, span)
    }

    fn expect_right_paren(&mut self) -> Result<()> {
        match self.current_token() {
            Some(Token::RightParen) => {
                self.advance();
                Ok(())
            }
            Some(other) => Err(self.error_here(format!(
                "expected ')', but got '{}'",
                other.to_user_string()
            ))),
            None => Err(self.error_here("expected ')', but reached end of input")),
        }
    }

    fn parse_expr(&mut self, min_precedence: u8) -> Result<Expr> {
        // Parse left side (prefix)
        let mut left = self.parse_prefix()?;

        // Parse operators and right side (infix)
        while let Some(Token::Operator(op)) = self.current_token() {
            let precedence = op.precedence();
            if precedence < min_precedence {
                break;
            }
            left = self.parse_infix(left, *op, precedence)?;
        }

        Ok(left)
    }

    fn parse_arguments(&mut self) -> Result<Vec<Expr>> {
        let mut args = Vec::new();

        if let Some(Token::RightParen) = self.current_token() {
            return Ok(args);
        }

        loop {
            args.push(self.parse_expr(0)?);

            match self.current_token() {
                Some(Token::Comma) => self.advance(),
                Some(Token::RightParen) => break,
                Some(other) => {
                    return Err(self.error_here(format!(
                        "expected ',' or ')', but got '{}'",
                        other.to_user_string()
                    )));
                }
                None => return Err(self.error_here("expected ')', but reached end of input")),
            }
        }

        Ok(args)
    }

    fn parse_prefix(&mut self) -> Result<Expr> {
        let spanned = self
            .current()
            .ok_or_else(|| self.error_here("unexpected end of input"))?;

        match &spanned.token {
            Token::Number(n) => {
                self.advance();
                Ok(Expr::number(*n))
            }

            Token::Identifier(name) => {
                self.advance();

                if let Some(Token::LeftParen) = self.current_token() {
                    let def = Registry::get(name).ok_or_else(|| {
                        SolveError::parse_at(
                            self.input,
                            format!("unknown function '{}'", name),
                            spanned.span,
                        )
                    })?;
                    self.advance(); // consume (
                    let args = self.parse_arguments()?;
                    self.expect_right_paren()?;

                    if !def.validate_arity(args.len()) {
                        return Err(SolveError::parse_at(
                            self.input,
                            format!(
                                "function '{}' takes {} argument(s), got {}",
                                name,
                                def.arity,
                                args.len()
                            ),
                            spanned.span,
                        ));
                    }

                    Ok(Expr::new(ExprKind::FunctionCall {
                        name: def.name.to_string(),
                        args,
                    }))
                } else if let Some(c) = Constant::from_name(name) {
                    Ok(Expr::constant(c))
                } else {
                    Ok(Expr::symbol(name.clone()))
                }
            }

            Token::Operator(Operator::Sub) => {
                self.advance();
                let expr = self.parse_expr(UNARY_PRECEDENCE)?;
                Ok(match expr.as_number() {
                    Some(n) => Expr::number(-n),
                    None => Expr::mul_expr(Expr::number(-1.0), expr),
                })
            }

            Token::Operator(Operator::Add) => {
                self.advance();
                self.parse_expr(UNARY_PRECEDENCE)
            }

            Token::LeftParen => {
                self.advance(); // consume (
                if let Some(Token::RightParen) = self.current_token() {
                    return Err(self.error_here("empty parentheses"));
                }
                let expr = self.parse_expr(0)?;
                self.expect_right_paren()?;
                Ok(expr)
            }

            other => Err(SolveError::parse_at(
                self.input,
                format!("unexpected '{}'", other.to_user_string()),
                spanned.span,
            )),
        }
    }

    fn parse_infix(&mut self, left: Expr, op: Operator, precedence: u8) -> Result<Expr> {
        self.advance();

        // Right associative for power, left for others
        let next_precedence = if matches!(op, Operator::Pow) {
            precedence
        } else {
            precedence + 1
        };

        let right = self.parse_expr(next_precedence)?;

        Ok(match op {
            Operator::Add => Expr::add_expr(left, right),
            Operator::Sub => Expr::sub_expr(left, right),
            Operator::Mul => Expr::mul_expr(left, right),
            Operator::Div => Expr::div_expr(left, right),
            Operator::Pow => Expr::pow(left, right),
        })
    }
}
