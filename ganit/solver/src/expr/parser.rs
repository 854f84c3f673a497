use std::f64::consts::{E, PI};

use crate::error::SolverError;

use super::ast::{Expr, Func};

/// Bounds applied before and during parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseLimits {
    /// Longest accepted input, in characters.
    pub max_chars: usize,
    /// Deepest accepted nesting of parentheses and unary operators.
    pub max_depth: usize,
}

impl Default for ParseLimits {
    fn default() -> Self {
        Self {
            max_chars: 512,
            max_depth: 64,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    LParen,
    RParen,
}

fn tokenize(input: &str) -> Result<Vec<(usize, Token)>, SolverError> {
    let bytes = input.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        let c = bytes[i];
        let start = i;
        match c {
            b' ' | b'\t' | b'\r' | b'\n' => {
                i += 1;
                continue;
            }
            b'0'..=b'9' | b'.' => {
                while i < bytes.len() && (bytes[i].is_ascii_digit() || bytes[i] == b'.') {
                    i += 1;
                }
                if i + 1 < bytes.len()
                    && (bytes[i] == b'e' || bytes[i] == b'E')
                    && (bytes[i + 1].is_ascii_digit()
                        || (matches!(bytes[i + 1], b'+' | b'-')
                            && bytes.get(i + 2).is_some_and(u8::is_ascii_digit)))
                {
                    i += 2;
                    while i < bytes.len() && bytes[i].is_ascii_digit() {
                        i += 1;
                    }
                }
                let literal = &input[start..i];
                let value = literal
                    .parse::<f64>()
                    .map_err(|_| SolverError::parse(start, format!("bad number `{literal}`")))?;
                tokens.push((start, Token::Number(value)));
                continue;
            }
            b'a'..=b'z' | b'A'..=b'Z' | b'_' => {
                while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_') {
                    i += 1;
                }
                tokens.push((start, Token::Ident(input[start..i].to_string())));
                continue;
            }
            b'*' if bytes.get(i + 1) == Some(&b'*') => {
                tokens.push((start, Token::Caret));
                i += 2;
                continue;
            }
            b'+' => tokens.push((start, Token::Plus)),
            b'-' => tokens.push((start, Token::Minus)),
            b'*' => tokens.push((start, Token::Star)),
            b'/' => tokens.push((start, Token::Slash)),
            b'^' => tokens.push((start, Token::Caret)),
            b'(' => tokens.push((start, Token::LParen)),
            b')' => tokens.push((start, Token::RParen)),
            _ => {
                let found = input[start..].chars().next().unwrap_or('?');
                return Err(SolverError::parse(start, format!("unexpected character `{found}`")));
            }
        }
        i += 1;
    }
    Ok(tokens)
}

struct Parser {
    tokens: Vec<(usize, Token)>,
    pos: usize,
    end: usize,
    depth: usize,
    max_depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(_, token)| token)
    }

    fn offset(&self) -> usize {
        self.tokens.get(self.pos).map_or(self.end, |(offset, _)| *offset)
    }

    fn bump(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).map(|(_, token)| token.clone());
        self.pos += 1;
        token
    }

    fn descend(&mut self) -> Result<(), SolverError> {
        self.depth += 1;
        if self.depth > self.max_depth {
            return Err(SolverError::TooComplex(format!(
                "nesting deeper than {}",
                self.max_depth
            )));
        }
        Ok(())
    }

    fn expression(&mut self) -> Result<Expr, SolverError> {
        let mut lhs = self.term()?;
        loop {
            match self.peek() {
                Some(Token::Plus) => {
                    self.bump();
                    lhs = lhs + self.term()?;
                }
                Some(Token::Minus) => {
                    self.bump();
                    lhs = lhs - self.term()?;
                }
                _ => return Ok(lhs),
            }
        }
    }

    fn term(&mut self) -> Result<Expr, SolverError> {
        let mut lhs = self.unary()?;
        loop {
            match self.peek() {
                Some(Token::Star) => {
                    self.bump();
                    lhs = lhs * self.unary()?;
                }
                Some(Token::Slash) => {
                    self.bump();
                    lhs = lhs / self.unary()?;
                }
                _ => return Ok(lhs),
            }
        }
    }

    fn unary(&mut self) -> Result<Expr, SolverError> {
        match self.peek() {
            Some(Token::Minus) => {
                self.bump();
                self.descend()?;
                let inner = self.unary()?;
                self.depth -= 1;
                Ok(-inner)
            }
            Some(Token::Plus) => {
                self.bump();
                self.descend()?;
                let inner = self.unary()?;
                self.depth -= 1;
                Ok(inner)
            }
            _ => self.power(),
        }
    }

    fn power(&mut self) -> Result<Expr, SolverError> {
        let base = self.atom()?;
        if matches!(self.peek(), Some(Token::Caret)) {
            self.bump();
            self.descend()?;
            let exponent = self.unary()?;
            self.depth -= 1;
            return Ok(base.pow(exponent));
        }
        Ok(base)
    }

    fn atom(&mut self) -> Result<Expr, SolverError> {
        let offset = self.offset();
        match self.bump() {
            Some(Token::Number(value)) => Ok(Expr::num(value)),
            Some(Token::Ident(name)) => {
                if matches!(self.peek(), Some(Token::LParen)) {
                    let func = Func::from_name(&name)
                        .ok_or_else(|| SolverError::parse(offset, format!("unknown function `{name}`")))?;
                    let arg = self.parenthesized()?;
                    return Ok(arg.apply(func));
                }
                Ok(match name.as_str() {
                    "pi" => Expr::num(PI),
                    "E" => Expr::num(E),
                    _ => Expr::Symbol(name),
                })
            }
            Some(Token::LParen) => {
                self.pos -= 1;
                self.parenthesized()
            }
            Some(other) => Err(SolverError::parse(offset, format!("unexpected token {other:?}"))),
            None => Err(SolverError::parse(offset, "unexpected end of input")),
        }
    }

    fn parenthesized(&mut self) -> Result<Expr, SolverError> {
        let offset = self.offset();
        if self.bump() != Some(Token::LParen) {
            return Err(SolverError::parse(offset, "expected `(`"));
        }
        self.descend()?;
        let inner = self.expression()?;
        self.depth -= 1;
        let close = self.offset();
        if self.bump() != Some(Token::RParen) {
            return Err(SolverError::parse(close, "expected `)`"));
        }
        Ok(inner)
    }
}

/// Parses infix arithmetic (`**` or `^` for powers) into an [`Expr`].
///
/// `pi` and `E` are read as constants; any other bare identifier is a symbol.
pub fn parse_expression(input: &str, limits: ParseLimits) -> Result<Expr, SolverError> {
    let length = input.chars().count();
    if length > limits.max_chars {
        return Err(SolverError::TooComplex(format!(
            "{length} characters exceeds the limit of {}",
            limits.max_chars
        )));
    }
    let tokens = tokenize(input)?;
    let mut parser = Parser {
        tokens,
        pos: 0,
        end: input.len(),
        depth: 0,
        max_depth: limits.max_depth,
    };
    let expr = parser.expression()?;
    if parser.pos < parser.tokens.len() {
        let offset = parser.offset();
        return Err(SolverError::parse(offset, "unexpected trailing input"));
    }
    Ok(expr)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> Result<Expr, SolverError> {
        parse_expression(input, ParseLimits::default())
    }

    #[test]
    fn respects_operator_precedence() {
        assert_eq!(parse("x**2 + 3*x").unwrap().to_string(), "x**2 + 3*x");
        assert_eq!(parse("-x^2").unwrap(), -Expr::symbol("x").pow(Expr::num(2.0)));
        assert_eq!(
            parse("2**3**2").unwrap(),
            Expr::num(2.0).pow(Expr::num(3.0).pow(Expr::num(2.0)))
        );
        assert_eq!(parse("x**-1").unwrap().to_string(), "x**(-1)");
    }

    #[test]
    fn reads_functions_and_constants() {
        assert_eq!(parse("sin(x) + log(x)").unwrap().to_string(), "sin(x) + log(x)");
        assert_eq!(parse("2.5e1").unwrap(), Expr::num(25.0));
        assert_eq!(parse("pi").unwrap(), Expr::num(PI));
        assert_eq!(parse("t*y").unwrap(), Expr::symbol("t") * Expr::symbol("y"));
    }

    #[test]
    fn rejects_malformed_input() {
        assert!(matches!(parse("Integrate y"), Err(SolverError::Parse { .. })));
        assert!(matches!(parse("(x + 1"), Err(SolverError::Parse { .. })));
        assert!(matches!(parse("foo(x)"), Err(SolverError::Parse { .. })));
        assert!(matches!(parse("x $ 2"), Err(SolverError::Parse { offset: 2, .. })));
        assert!(matches!(parse(""), Err(SolverError::Parse { .. })));
    }

    #[test]
    fn enforces_limits() {
        let limits = ParseLimits {
            max_chars: 10,
            max_depth: 3,
        };
        assert!(matches!(
            parse_expression("x + x + x + x", limits),
            Err(SolverError::TooComplex(_))
        ));
        assert!(matches!(
            parse_expression("((((x))))", limits),
            Err(SolverError::TooComplex(_))
        ));
        assert!(parse_expression("((x))", limits).is_ok());
    }
}
