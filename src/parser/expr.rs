//! Expression parsing: precedence climbing over `or`, `and`, unary `not`,
//! comparisons, `+`/`-`, `*`/`/`, and primaries (literals, dotted field
//! refs, calls). See spec.md §4.6 "Expressions".

use super::Parser;
use crate::error::DazzleResult;
use crate::ir::expr::{BinaryOp, Expr, Literal, UnaryOp};
use crate::lexer::{Keyword, TokenKind};

impl Parser {
    pub(crate) fn parse_expr(&mut self) -> DazzleResult<Expr> {
        self.parse_or()
    }

    fn parse_or(&mut self) -> DazzleResult<Expr> {
        let mut left = self.parse_and()?;
        while self.is_keyword(Keyword::Or) {
            let loc = self.loc();
            self.advance();
            let right = self.parse_and()?;
            left = Expr::Binary {
                op: BinaryOp::Or,
                left: Box::new(left),
                right: Box::new(right),
                location: loc,
            };
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> DazzleResult<Expr> {
        let mut left = self.parse_not()?;
        while self.is_keyword(Keyword::And) {
            let loc = self.loc();
            self.advance();
            let right = self.parse_not()?;
            left = Expr::Binary {
                op: BinaryOp::And,
                left: Box::new(left),
                right: Box::new(right),
                location: loc,
            };
        }
        Ok(left)
    }

    fn parse_not(&mut self) -> DazzleResult<Expr> {
        if self.is_keyword(Keyword::Not) {
            let loc = self.loc();
            self.advance();
            let operand = self.parse_not()?;
            return Ok(Expr::Unary {
                op: UnaryOp::Not,
                operand: Box::new(operand),
                location: loc,
            });
        }
        self.parse_comparison()
    }

    fn parse_comparison(&mut self) -> DazzleResult<Expr> {
        let left = self.parse_additive()?;
        let op = match self.peek() {
            TokenKind::Equals => Some(BinaryOp::Eq),
            TokenKind::NotEq => Some(BinaryOp::NotEq),
            TokenKind::Lt => Some(BinaryOp::Lt),
            TokenKind::LtEq => Some(BinaryOp::LtEq),
            TokenKind::Gt => Some(BinaryOp::Gt),
            TokenKind::GtEq => Some(BinaryOp::GtEq),
            _ => None,
        };
        match op {
            Some(op) => {
                let loc = self.loc();
                self.advance();
                let right = self.parse_additive()?;
                Ok(Expr::Binary {
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                    location: loc,
                })
            }
            None => Ok(left),
        }
    }

    fn parse_additive(&mut self) -> DazzleResult<Expr> {
        let mut left = self.parse_multiplicative()?;
        loop {
            let op = match self.peek() {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => break,
            };
            let loc = self.loc();
            self.advance();
            let right = self.parse_multiplicative()?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
                location: loc,
            };
        }
        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> DazzleResult<Expr> {
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.peek() {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                _ => break,
            };
            let loc = self.loc();
            self.advance();
            let right = self.parse_unary()?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
                location: loc,
            };
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> DazzleResult<Expr> {
        if matches!(self.peek(), TokenKind::Minus) {
            let loc = self.loc();
            self.advance();
            let operand = self.parse_unary()?;
            return Ok(Expr::Unary {
                op: UnaryOp::Neg,
                operand: Box::new(operand),
                location: loc,
            });
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> DazzleResult<Expr> {
        let loc = self.loc();
        match self.peek().clone() {
            TokenKind::Int(n) => {
                self.advance();
                Ok(Expr::Literal {
                    value: Literal::Int(n),
                    location: loc,
                })
            }
            TokenKind::Decimal(text) => {
                self.advance();
                Ok(Expr::Literal {
                    value: Literal::Decimal(text),
                    location: loc,
                })
            }
            TokenKind::String(text) => {
                self.advance();
                Ok(Expr::Literal {
                    value: Literal::Str(text),
                    location: loc,
                })
            }
            TokenKind::Keyword(Keyword::True) => {
                self.advance();
                Ok(Expr::Literal {
                    value: Literal::Bool(true),
                    location: loc,
                })
            }
            TokenKind::Keyword(Keyword::False) => {
                self.advance();
                Ok(Expr::Literal {
                    value: Literal::Bool(false),
                    location: loc,
                })
            }
            TokenKind::Keyword(Keyword::Null) => {
                self.advance();
                Ok(Expr::Literal {
                    value: Literal::Null,
                    location: loc,
                })
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expr()?;
                if !matches!(self.peek(), TokenKind::RParen) {
                    return Err(self.expected("`)`"));
                }
                self.advance();
                Ok(inner)
            }
            TokenKind::Ident(_) | TokenKind::Keyword(_) => {
                let (first, _) = self.ident_like()?;
                if matches!(self.peek(), TokenKind::LParen) {
                    self.advance();
                    let mut args = Vec::new();
                    if !matches!(self.peek(), TokenKind::RParen) {
                        loop {
                            args.push(self.parse_expr()?);
                            if matches!(self.peek(), TokenKind::Comma) {
                                self.advance();
                                continue;
                            }
                            break;
                        }
                    }
                    if !matches!(self.peek(), TokenKind::RParen) {
                        return Err(self.expected("`)`"));
                    }
                    self.advance();
                    return Ok(Expr::Call {
                        name: first,
                        args,
                        location: loc,
                    });
                }
                if matches!(self.peek(), TokenKind::Dot) {
                    let mut path = vec![first];
                    while matches!(self.peek(), TokenKind::Dot) {
                        self.advance();
                        let (part, _) = self.ident_like()?;
                        path.push(part);
                    }
                    return Ok(Expr::FieldRef { path, location: loc });
                }
                Ok(Expr::Ident { name: first, location: loc })
            }
            _ => Err(self.expected("an expression")),
        }
    }
}
