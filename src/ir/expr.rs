//! Expression trees used in guards, invariants, computed fields, filters,
//! sort keys, and aggregate arguments. See spec.md §9 "Expression trees".

use crate::location::Location;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOp {
    Or,
    And,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Add,
    Sub,
    Mul,
    Div,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOp {
    Not,
    Neg,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Literal {
    Int(i64),
    Decimal(String),
    Str(String),
    Bool(bool),
    Null,
}

/// A single node of the expression tree. The parser produces this
/// uniformly for guards, invariants, computed fields, workspace filters,
/// and aggregate arguments; only the validator resolves identifiers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    Literal {
        value: Literal,
        location: Location,
    },
    Ident {
        name: String,
        location: Location,
    },
    /// A dotted field path, e.g. `owner.email`.
    FieldRef {
        path: Vec<String>,
        location: Location,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
        location: Location,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
        location: Location,
    },
    Call {
        name: String,
        args: Vec<Expr>,
        location: Location,
    },
}

impl Expr {
    pub fn location(&self) -> &Location {
        match self {
            Expr::Literal { location, .. }
            | Expr::Ident { location, .. }
            | Expr::FieldRef { location, .. }
            | Expr::Binary { location, .. }
            | Expr::Unary { location, .. }
            | Expr::Call { location, .. } => location,
        }
    }
}
