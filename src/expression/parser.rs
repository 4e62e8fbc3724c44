use crate::expression::ast::{BinaryOp, Callee, Expr, UnaryOp};
use crate::expression::error::ParseError;
use crate::expression::lexer::{Token, TokenKind, lex};

/// Parse one channel expression.
///
/// Surrounding whitespace is ignored. Identifiers other than `pi` and `e` become variables and
/// are only checked against the bindings at evaluation time; likewise call targets are resolved
/// to builtins here but unknown names are kept and reported by the evaluator.
pub fn parse_expr(src: &str) -> Result<Expr, ParseError> {
    let src = src.trim();
    if src.is_empty() {
        return Err(ParseError::new(0, "", "expression is empty"));
    }
    let tokens = lex(src)?;
    let mut p = Parser {
        src,
        tokens,
        pos: 0,
    };
    let expr = p.parse_sum()?;
    p.expect(TokenKind::Eof)?;
    Ok(expr)
}

struct Parser<'a> {
    src: &'a str,
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser<'_> {
    fn peek(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn bump(&mut self) -> Token {
        let t = self.tokens[self.pos].clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        t
    }

    fn error_at(&self, t: &Token, message: impl Into<String>) -> ParseError {
        ParseError::new(t.span.start, &self.src[t.span.start..t.span.end], message)
    }

    fn expect(&mut self, kind: TokenKind) -> Result<(), ParseError> {
        if self.peek().kind == kind {
            self.bump();
            Ok(())
        } else {
            let t = self.peek();
            Err(self.error_at(
                t,
                format!("expected {}, found {}", kind.describe(), t.kind.describe()),
            ))
        }
    }

    fn consume(&mut self, kind: TokenKind) -> bool {
        if self.peek().kind == kind {
            self.bump();
            true
        } else {
            false
        }
    }

    fn parse_sum(&mut self) -> Result<Expr, ParseError> {
        let mut e = self.parse_product()?;
        loop {
            let op = if self.consume(TokenKind::Plus) {
                BinaryOp::Add
            } else if self.consume(TokenKind::Minus) {
                BinaryOp::Sub
            } else {
                break;
            };
            let r = self.parse_product()?;
            e = binary(op, e, r);
        }
        Ok(e)
    }

    fn parse_product(&mut self) -> Result<Expr, ParseError> {
        let mut e = self.parse_unary()?;
        loop {
            let op = if self.consume(TokenKind::Star) {
                BinaryOp::Mul
            } else if self.consume(TokenKind::Slash) {
                BinaryOp::Div
            } else if self.consume(TokenKind::Percent) {
                BinaryOp::Mod
            } else {
                break;
            };
            let r = self.parse_unary()?;
            e = binary(op, e, r);
        }
        Ok(e)
    }

    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        if self.consume(TokenKind::Minus) {
            let e = self.parse_unary()?;
            return Ok(Expr::Unary {
                op: UnaryOp::Neg,
                expr: Box::new(e),
            });
        }
        if self.consume(TokenKind::Plus) {
            let e = self.parse_unary()?;
            return Ok(Expr::Unary {
                op: UnaryOp::Plus,
                expr: Box::new(e),
            });
        }
        self.parse_power()
    }

    // Right associative; the exponent may carry its own sign (`2^-1`).
    fn parse_power(&mut self) -> Result<Expr, ParseError> {
        let base = self.parse_postfix()?;
        if self.consume(TokenKind::Caret) || self.consume(TokenKind::StarStar) {
            let exp = self.parse_unary()?;
            return Ok(binary(BinaryOp::Pow, base, exp));
        }
        Ok(base)
    }

    fn parse_postfix(&mut self) -> Result<Expr, ParseError> {
        let t = self.bump();
        match &t.kind {
            TokenKind::Ident(name) => {
                if self.consume(TokenKind::LParen) {
                    let args = self.parse_args()?;
                    return Ok(Expr::Call {
                        func: Callee::resolve(name),
                        args,
                    });
                }
                Ok(match name.as_str() {
                    "pi" => Expr::Lit(std::f64::consts::PI),
                    "e" => Expr::Lit(std::f64::consts::E),
                    _ => Expr::Var(name.clone()),
                })
            }
            TokenKind::Number(v) => Ok(Expr::Lit(*v)),
            TokenKind::LParen => {
                let e = self.parse_sum()?;
                self.expect(TokenKind::RParen)?;
                Ok(e)
            }
            other => Err(self.error_at(&t, format!("unexpected {}", other.describe()))),
        }
    }

    fn parse_args(&mut self) -> Result<Vec<Expr>, ParseError> {
        let mut args = Vec::new();
        if self.consume(TokenKind::RParen) {
            return Ok(args);
        }
        loop {
            args.push(self.parse_sum()?);
            if self.consume(TokenKind::Comma) {
                continue;
            }
            self.expect(TokenKind::RParen)?;
            return Ok(args);
        }
    }
}

fn binary(op: BinaryOp, left: Expr, right: Expr) -> Expr {
    Expr::Binary {
        op,
        left: Box::new(left),
        right: Box::new(right),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/expression/parser.rs"]
mod tests;
