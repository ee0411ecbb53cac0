//! Lexer - turns equation text into tokens

use super::tokens::{Operator, Spanned, Token};
use crate::error::{Result, SolveError, Span};

/// Tokenize `text`, which starts at byte `offset` within `input`.
///
/// `input` is the full equation and is only used for error reporting.
pub(crate) fn lex(text: &str, offset: usize, input: &str) -> Result<Vec<Spanned>> {
    let bytes = text.as_bytes();
    let mut tokens = Vec::with_capacity(text.len() / 2 + 1);
    let mut pos = 0;

    while pos < bytes.len() {
        let c = bytes[pos];
        let start = pos;

        let token = match c {
            b' ' | b'\t' | b'\r' | b'\n' => {
                pos += 1;
                continue;
            }
            b'+' => {
                pos += 1;
                Token::Operator(Operator::Add)
            }
            b'-' => {
                pos += 1;
                Token::Operator(Operator::Sub)
            }
            b'*' => {
                if bytes.get(pos + 1) == Some(&b'*') {
                    pos += 2;
                    Token::Operator(Operator::Pow)
                } else {
                    pos += 1;
                    Token::Operator(Operator::Mul)
                }
            }
            b'/' => {
                pos += 1;
                Token::Operator(Operator::Div)
            }
            b'^' => {
                pos += 1;
                Token::Operator(Operator::Pow)
            }
            b'(' => {
                pos += 1;
                Token::LeftParen
            }
            b')' => {
                pos += 1;
                Token::RightParen
            }
            b',' => {
                pos += 1;
                Token::Comma
            }
            b'0'..=b'9' | b'.' => {
                pos = scan_number(bytes, pos);
                let literal = &text[start..pos];
                let value = literal.parse::<f64>().map_err(|_| {
                    SolveError::parse_at(
                        input,
                        format!("invalid number '{}'", literal),
                        Span::new(offset + start, offset + pos),
                    )
                })?;
                Token::Number(value)
            }
            c if c.is_ascii_alphabetic() || c == b'_' => {
                while pos < bytes.len()
                    && (bytes[pos].is_ascii_alphanumeric() || bytes[pos] == b'_')
                {
                    pos += 1;
                }
                Token::Identifier(text[start..pos].to_string())
            }
            _ => {
                let ch = text[start..].chars().next().unwrap_or('?');
                return Err(SolveError::parse_at(
                    input,
                    format!("unexpected character '{}'", ch),
                    Span::new(offset + start, offset + start + ch.len_utf8()),
                ));
            }
        };

        tokens.push(Spanned {
            token,
            span: Span::new(offset + start, offset + pos),
        });
    }

    Ok(tokens)
}

/// Advance past a decimal literal: digits, optional fraction, optional exponent
fn scan_number(bytes: &[u8], mut pos: usize) -> usize {
    while pos < bytes.len() && bytes[pos].is_ascii_digit() {
        pos += 1;
    }
    if pos < bytes.len() && bytes[pos] == b'.' {
        pos += 1;
        while pos < bytes.len() && bytes[pos].is_ascii_digit() {
            pos += 1;
        }
    }
    // Exponent only when followed by digits, so `2E` leaves `E` as an identifier
    if pos < bytes.len() && (bytes[pos] == b'e' || bytes[pos] == b'E') {
        let mut look = pos + 1;
        if look < bytes.len() && (bytes[look] == b'+' || bytes[look] == b'-') {
            look += 1;
        }
        if look < bytes.len() && bytes[look].is_ascii_digit() {
            pos = look;
            while pos < bytes.len() && bytes[pos].is_ascii_digit() {
                pos += 1;
            }
        }
    }
    pos
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(text: &str) -> Vec<Token> {
        lex(text, 0, text)
            .unwrap()
            .into_iter()
            .map(|t| t.token)
            .collect()
    }

    #[test]
    fn test_double_star_is_power() {
        assert_eq!(
            kinds("r**2"),
            vec![
                Token::Identifier("r".to_string()),
                Token::Operator(Operator::Pow),
                Token::Number(2.0),
            ]
        );
        assert_eq!(kinds("r^2"), kinds("r ** 2"));
    }

    #[test]
    fn test_scientific_numbers() {
        assert_eq!(kinds("1.5e-3"), vec![Token::Number(1.5e-3)]);
        assert_eq!(kinds(".25"), vec![Token::Number(0.25)]);
        assert_eq!(
            kinds("2E"),
            vec![Token::Number(2.0), Token::Identifier("E".to_string())]
        );
    }

    #[test]
    fn test_spans_include_offset() {
        let tokens = lex("h", 4, "V = h").unwrap();
        assert_eq!(tokens[0].span, Span::new(4, 5));
    }

    #[test]
    fn test_bad_character() {
        let err = lex("x $ y", 0, "x $ y").unwrap_err();
        match err {
            SolveError::Parse { span, .. } => assert_eq!(span, Some(Span::at(2))),
            other => panic!("Expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_lone_dot_is_not_a_number() {
        assert!(matches!(lex("x + .", 0, "x + ."), Err(SolveError::Parse { .. })));
    }
}
