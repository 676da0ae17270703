//! `entity` declarations: fields, transitions, invariants, access rules,
//! audit, and the header-level hint items. See spec.md §4.2 "Entity" and
//! §3 "Entities".

use super::Parser;
use crate::error::{DazzleError, DazzleResult};
use crate::ir::entity::{
    AccessRule, Action, AuditSpec, DefaultValue, Entity, Field, FieldModifier, FieldType, Guard,
    Index, Invariant, RefKind, ScalarType, Transition, TransitionFrom,
};
use crate::ir::expr::Literal;
use crate::lexer::{Keyword, TokenKind};

enum EntityItem {
    Field(Field),
    Transitions(Vec<Transition>),
    Invariant(Invariant),
    Permit(Vec<AccessRule>),
    Forbid(Vec<AccessRule>),
    Audit(AuditSpec),
    Archetype(String),
    Intent(String),
    Domain(String),
    Patterns(Vec<String>),
    Index(Index),
}

impl Parser {
    pub(crate) fn parse_entity(&mut self) -> DazzleResult<Entity> {
        let loc = self.expect_keyword(Keyword::Entity)?;
        let (name, _) = self.ident_like()?;
        let display_name = match self.peek() {
            TokenKind::String(_) => Some(self.string_lit()?.0),
            _ => None,
        };
        self.expect_colon()?;

        let mut entity = Entity {
            name,
            display_name,
            intent: None,
            domain: None,
            patterns: Vec::new(),
            archetype: None,
            fields: Vec::new(),
            transitions: Vec::new(),
            invariants: Vec::new(),
            permit: Vec::new(),
            forbid: Vec::new(),
            audit: None,
            indexes: Vec::new(),
            location: loc,
        };

        let items = self.parse_block(Self::parse_entity_item)?;
        for item in items {
            match item {
                EntityItem::Field(f) => entity.fields.push(f),
                EntityItem::Transitions(mut ts) => entity.transitions.append(&mut ts),
                EntityItem::Invariant(i) => entity.invariants.push(i),
                EntityItem::Permit(mut r) => entity.permit.append(&mut r),
                EntityItem::Forbid(mut r) => entity.forbid.append(&mut r),
                EntityItem::Audit(a) => entity.audit = Some(a),
                EntityItem::Archetype(a) => entity.archetype = Some(a),
                EntityItem::Intent(i) => entity.intent = Some(i),
                EntityItem::Domain(d) => entity.domain = Some(d),
                EntityItem::Patterns(mut p) => entity.patterns.append(&mut p),
                EntityItem::Index(i) => entity.indexes.push(i),
            }
        }
        Ok(entity)
    }

    fn parse_entity_item(&mut self) -> DazzleResult<EntityItem> {
        let item = match self.peek().clone() {
            TokenKind::Keyword(Keyword::Transitions) => {
                self.advance();
                self.expect_colon()?;
                let transitions = self.parse_block(Self::parse_transition)?;
                EntityItem::Transitions(transitions)
            }
            TokenKind::Keyword(Keyword::Invariant) => {
                let loc = self.loc();
                self.advance();
                self.expect_colon()?;
                let expr = self.parse_expr()?;
                self.end_of_line()?;
                EntityItem::Invariant(Invariant { expr, location: loc })
            }
            TokenKind::Keyword(Keyword::Permit) => {
                self.advance();
                self.expect_colon()?;
                EntityItem::Permit(self.parse_block(Self::parse_access_rule)?)
            }
            TokenKind::Keyword(Keyword::Forbid) => {
                self.advance();
                self.expect_colon()?;
                EntityItem::Forbid(self.parse_block(Self::parse_access_rule)?)
            }
            TokenKind::Keyword(Keyword::Audit) => {
                self.advance();
                self.expect_colon()?;
                let audit = self.parse_audit_spec()?;
                self.end_of_line()?;
                EntityItem::Audit(audit)
            }
            TokenKind::Keyword(Keyword::Archetype) => {
                self.advance();
                self.expect_colon()?;
                let (v, _) = self.ident_like()?;
                self.end_of_line()?;
                EntityItem::Archetype(v)
            }
            TokenKind::Keyword(Keyword::Intent) => {
                self.advance();
                self.expect_colon()?;
                let (v, _) = self.string_lit()?;
                self.end_of_line()?;
                EntityItem::Intent(v)
            }
            TokenKind::Keyword(Keyword::Domain) => {
                self.advance();
                self.expect_colon()?;
                let (v, _) = self.ident_like()?;
                self.end_of_line()?;
                EntityItem::Domain(v)
            }
            TokenKind::Keyword(Keyword::Patterns) => {
                self.advance();
                self.expect_colon()?;
                let items = self.bracketed_ident_list()?;
                self.end_of_line()?;
                EntityItem::Patterns(items)
            }
            TokenKind::Keyword(Keyword::Index) => {
                let loc = self.loc();
                self.advance();
                let fields = self.bracketed_ident_list()?;
                self.end_of_line()?;
                EntityItem::Index(Index { fields, location: loc })
            }
            _ => EntityItem::Field(self.parse_field()?),
        };
        Ok(item)
    }

    fn parse_field(&mut self) -> DazzleResult<Field> {
        let loc = self.loc();
        let (name, _) = self.ident_like()?;
        if !matches!(self.peek(), TokenKind::Colon) {
            return Err(self.expected_with_hint(
                "`:`",
                "field declarations require `: type` after the name",
            ));
        }
        self.advance();
        let ty = self.parse_field_type()?;

        let mut modifiers = Vec::new();
        loop {
            let m = match self.peek() {
                TokenKind::Keyword(Keyword::Pk) => FieldModifier::Pk,
                TokenKind::Keyword(Keyword::Required) => FieldModifier::Required,
                TokenKind::Keyword(Keyword::Optional) => FieldModifier::Optional,
                TokenKind::Keyword(Keyword::Unique) => FieldModifier::Unique,
                TokenKind::Keyword(Keyword::AutoAdd) => FieldModifier::AutoAdd,
                TokenKind::Keyword(Keyword::AutoUpdate) => FieldModifier::AutoUpdate,
                _ => break,
            };
            self.advance();
            modifiers.push(m);
        }

        let default = if matches!(self.peek(), TokenKind::Equals) {
            self.advance();
            Some(self.parse_default_value(&ty)?)
        } else {
            None
        };

        self.end_of_line()?;
        Ok(Field {
            name,
            ty,
            modifiers,
            default,
            location: loc,
        })
    }

    fn parse_field_type(&mut self) -> DazzleResult<FieldType> {
        match self.peek().clone() {
            TokenKind::Keyword(Keyword::Ref) => {
                self.advance();
                let (target, target_location) = self.ident_like()?;
                Ok(FieldType::Reference {
                    kind: RefKind::Ref,
                    target,
                    target_location,
                })
            }
            TokenKind::Keyword(Keyword::HasMany) => {
                self.advance();
                let (target, target_location) = self.ident_like()?;
                Ok(FieldType::Reference {
                    kind: RefKind::HasMany,
                    target,
                    target_location,
                })
            }
            TokenKind::Keyword(Keyword::BelongsTo) => {
                self.advance();
                let (target, target_location) = self.ident_like()?;
                Ok(FieldType::Reference {
                    kind: RefKind::BelongsTo,
                    target,
                    target_location,
                })
            }
            TokenKind::Keyword(Keyword::Computed) => {
                self.advance();
                Ok(FieldType::Computed(self.parse_expr()?))
            }
            TokenKind::Keyword(Keyword::Enum) => {
                self.advance();
                let variants = self.bracketed_ident_list()?;
                if variants.is_empty() {
                    return Err(DazzleError::MalformedExpression {
                        location: self.loc(),
                        detail: "enum declarations require at least one variant".to_string(),
                    });
                }
                let default = if matches!(self.peek(), TokenKind::Equals) {
                    self.advance();
                    let (v, _) = self.ident_like()?;
                    Some(v)
                } else {
                    None
                };
                Ok(FieldType::Enum { variants, default })
            }
            TokenKind::Ident(name) => {
                self.advance();
                self.parse_scalar_type(&name)
            }
            _ => Err(self.expected("a field type")),
        }
    }

    fn parse_scalar_type(&mut self, name: &str) -> DazzleResult<FieldType> {
        let scalar = match name {
            "uuid" => ScalarType::Uuid,
            "text" => ScalarType::Text,
            "int" => ScalarType::Int,
            "bool" => ScalarType::Bool,
            "datetime" => ScalarType::Datetime,
            "date" => ScalarType::Date,
            "time" => ScalarType::Time,
            "email" => ScalarType::Email,
            "json" => ScalarType::Json,
            "image" => ScalarType::Image,
            "file" => ScalarType::File,
            "richtext" => ScalarType::Richtext,
            "str" => {
                self.expect_lparen()?;
                let (n, _) = self.int_lit()?;
                self.expect_rparen()?;
                ScalarType::Str(n as u32)
            }
            "decimal" => {
                self.expect_lparen()?;
                let (p, _) = self.int_lit()?;
                if !matches!(self.peek(), TokenKind::Comma) {
                    return Err(self.expected("`,`"));
                }
                self.advance();
                let (s, _) = self.int_lit()?;
                self.expect_rparen()?;
                ScalarType::Decimal {
                    precision: p as u32,
                    scale: s as u32,
                }
            }
            other => {
                return Err(self.expected_with_hint(
                    "a scalar, enum, reference, or computed type",
                    format!("`{other}` is not a recognized type"),
                ))
            }
        };
        Ok(FieldType::Scalar(scalar))
    }

    fn expect_lparen(&mut self) -> DazzleResult<()> {
        if matches!(self.peek(), TokenKind::LParen) {
            self.advance();
            Ok(())
        } else {
            Err(self.expected("`(`"))
        }
    }

    fn expect_rparen(&mut self) -> DazzleResult<()> {
        if matches!(self.peek(), TokenKind::RParen) {
            self.advance();
            Ok(())
        } else {
            Err(self.expected("`)`"))
        }
    }

    fn parse_default_value(&mut self, ty: &FieldType) -> DazzleResult<DefaultValue> {
        if matches!(ty, FieldType::Enum { .. }) {
            let (v, _) = self.ident_like()?;
            return Ok(DefaultValue::EnumVariant(v));
        }
        let loc = self.loc();
        let lit = match self.peek().clone() {
            TokenKind::Int(n) => {
                self.advance();
                Literal::Int(n)
            }
            TokenKind::Decimal(text) => {
                self.advance();
                Literal::Decimal(text)
            }
            TokenKind::String(s) => {
                self.advance();
                Literal::Str(s)
            }
            TokenKind::Keyword(Keyword::True) => {
                self.advance();
                Literal::Bool(true)
            }
            TokenKind::Keyword(Keyword::False) => {
                self.advance();
                Literal::Bool(false)
            }
            TokenKind::Keyword(Keyword::Null) => {
                self.advance();
                Literal::Null
            }
            _ => {
                return Err(DazzleError::ExpectedToken {
                    location: loc,
                    expected: "a default literal".to_string(),
                    found: self.peek().describe(),
                    hint: None,
                })
            }
        };
        Ok(DefaultValue::Literal(lit))
    }

    fn parse_transition(&mut self) -> DazzleResult<Transition> {
        let loc = self.loc();
        let from = if matches!(self.peek(), TokenKind::Star) {
            self.advance();
            TransitionFrom::Wildcard
        } else {
            let (s, _) = self.ident_like()?;
            TransitionFrom::State(s)
        };
        if !matches!(self.peek(), TokenKind::Arrow) {
            return Err(self.expected("`->`"));
        }
        self.advance();
        let (to, _) = self.ident_like()?;

        let guard = if matches!(self.peek(), TokenKind::Colon) {
            self.advance();
            Some(self.parse_guard()?)
        } else {
            None
        };
        self.end_of_line()?;
        Ok(Transition {
            from,
            to,
            guard,
            location: loc,
        })
    }

    fn parse_guard(&mut self) -> DazzleResult<Guard> {
        match self.peek().clone() {
            TokenKind::Keyword(Keyword::Role) => {
                self.advance();
                self.expect_lparen()?;
                let (r, _) = self.ident_like()?;
                self.expect_rparen()?;
                Ok(Guard::Role(r))
            }
            TokenKind::Keyword(Keyword::Requires) => {
                self.advance();
                let (f, _) = self.ident_like()?;
                Ok(Guard::Requires(f))
            }
            _ => Err(self.expected("`role(...)` or `requires FIELD`")),
        }
    }

    fn parse_access_rule(&mut self) -> DazzleResult<AccessRule> {
        let loc = self.loc();
        let actions = self.parse_action_list()?;
        if !matches!(self.peek(), TokenKind::Colon) {
            return Err(self.expected("`:`"));
        }
        self.advance();
        let predicate = self.parse_expr()?;
        self.end_of_line()?;
        Ok(AccessRule {
            actions,
            predicate,
            location: loc,
        })
    }

    pub(crate) fn parse_action_list(&mut self) -> DazzleResult<Vec<Action>> {
        let mut actions = Vec::new();
        loop {
            let (name, loc) = self.ident_like()?;
            actions.push(action_from_str(&name, loc)?);
            if matches!(self.peek(), TokenKind::Comma) {
                self.advance();
                continue;
            }
            break;
        }
        Ok(actions)
    }

    fn parse_audit_spec(&mut self) -> DazzleResult<AuditSpec> {
        match self.peek().clone() {
            TokenKind::Keyword(Keyword::False) => {
                self.advance();
                Ok(AuditSpec::Disabled)
            }
            TokenKind::Ident(s) if s == "all" => {
                self.advance();
                Ok(AuditSpec::All)
            }
            TokenKind::LBrack => {
                let actions = self.bracketed_ident_list()?;
                let loc = self.loc();
                let actions = actions
                    .into_iter()
                    .map(|a| action_from_str(&a, loc.clone()))
                    .collect::<DazzleResult<Vec<_>>>()?;
                Ok(AuditSpec::Actions(actions))
            }
            _ => Err(self.expected("`all`, `false`, or `[action, ...]`")),
        }
    }
}

fn action_from_str(name: &str, location: crate::location::Location) -> DazzleResult<Action> {
    match name {
        "create" => Ok(Action::Create),
        "read" => Ok(Action::Read),
        "update" => Ok(Action::Update),
        "delete" => Ok(Action::Delete),
        "list" => Ok(Action::List),
        other => Err(DazzleError::ExpectedToken {
            location,
            expected: "one of create, read, update, delete, list".to_string(),
            found: format!("`{other}`"),
            hint: None,
        }),
    }
}
