//! `workspace` declarations: signal compositions. See spec.md §3
//! "Workspaces".

use super::Parser;
use crate::error::DazzleResult;
use crate::ir::workspace::{Aggregate, DisplayKind, Signal, SignalUxVariant, Workspace};
use crate::lexer::{Keyword, TokenKind};

enum WorkspaceItem {
    Purpose(String),
    EngineHint(String, crate::location::Location),
    Signal(Box<Signal>),
}

enum SignalItem {
    Source(String, crate::location::Location),
    Filter(crate::ir::expr::Expr),
    Sort(crate::ir::expr::Expr),
    Limit(i64, crate::location::Location),
    Display(DisplayKind),
    Aggregate(Aggregate),
    Action(String, crate::location::Location),
    Ux(Vec<SignalUxVariant>),
}

impl Parser {
    pub(crate) fn parse_workspace(&mut self) -> DazzleResult<Workspace> {
        let loc = self.expect_keyword(Keyword::Workspace)?;
        let (name, _) = self.ident_like()?;
        let display_name = match self.peek() {
            TokenKind::String(_) => Some(self.string_lit()?.0),
            _ => None,
        };
        self.expect_colon()?;

        let mut purpose = None;
        let mut engine_hint = None;
        let mut engine_hint_location = None;
        let mut signals = Vec::new();

        let items = self.parse_block(Self::parse_workspace_item)?;
        for item in items {
            match item {
                WorkspaceItem::Purpose(p) => purpose = Some(p),
                WorkspaceItem::EngineHint(h, l) => {
                    engine_hint = Some(h);
                    engine_hint_location = Some(l);
                }
                WorkspaceItem::Signal(s) => signals.push(*s),
            }
        }

        Ok(Workspace {
            name,
            display_name,
            purpose,
            engine_hint,
            engine_hint_location,
            signals,
            location: loc,
        })
    }

    fn parse_workspace_item(&mut self) -> DazzleResult<WorkspaceItem> {
        match self.peek().clone() {
            TokenKind::Keyword(Keyword::Purpose) => {
                self.advance();
                self.expect_colon()?;
                let (v, _) = self.string_lit()?;
                self.end_of_line()?;
                Ok(WorkspaceItem::Purpose(v))
            }
            TokenKind::Keyword(Keyword::EngineHint) => {
                self.advance();
                self.expect_colon()?;
                let (v, loc) = self.ident_like()?;
                self.end_of_line()?;
                Ok(WorkspaceItem::EngineHint(v, loc))
            }
            TokenKind::Keyword(Keyword::Signal) => Ok(WorkspaceItem::Signal(Box::new(self.parse_signal()?))),
            _ => Err(self.expected("`purpose`, `engine_hint`, or `signal`")),
        }
    }

    fn parse_signal(&mut self) -> DazzleResult<Signal> {
        let loc = self.expect_keyword(Keyword::Signal)?;
        let (name, _) = self.ident_like()?;
        self.expect_colon()?;

        let mut source = None;
        let mut source_location = loc.clone();
        let mut filter = None;
        let mut sort = None;
        let mut limit = None;
        let mut limit_location = None;
        let mut display = None;
        let mut aggregate = Vec::new();
        let mut action = None;
        let mut action_location = None;
        let mut ux = Vec::new();

        let items = self.parse_block(Self::parse_signal_item)?;
        for item in items {
            match item {
                SignalItem::Source(s, l) => {
                    source = Some(s);
                    source_location = l;
                }
                SignalItem::Filter(e) => filter = Some(e),
                SignalItem::Sort(e) => sort = Some(e),
                SignalItem::Limit(n, l) => {
                    limit = Some(n);
                    limit_location = Some(l);
                }
                SignalItem::Display(d) => display = Some(d),
                SignalItem::Aggregate(a) => aggregate.push(a),
                SignalItem::Action(a, l) => {
                    action = Some(a);
                    action_location = Some(l);
                }
                SignalItem::Ux(mut v) => ux.append(&mut v),
            }
        }

        let source = source.ok_or_else(|| {
            self.expected_with_hint("`source: ENTITY`", "every signal must declare its source entity")
        })?;

        Ok(Signal {
            name,
            source,
            source_location,
            filter,
            sort,
            limit,
            limit_location,
            display,
            aggregate,
            action,
            action_location,
            ux,
            location: loc,
        })
    }

    fn parse_signal_item(&mut self) -> DazzleResult<SignalItem> {
        match self.peek().clone() {
            TokenKind::Keyword(Keyword::Source) => {
                self.advance();
                self.expect_colon()?;
                let (v, loc) = self.ident_like()?;
                self.end_of_line()?;
                Ok(SignalItem::Source(v, loc))
            }
            TokenKind::Keyword(Keyword::Filter) => {
                self.advance();
                self.expect_colon()?;
                let e = self.parse_expr()?;
                self.end_of_line()?;
                Ok(SignalItem::Filter(e))
            }
            TokenKind::Keyword(Keyword::Sort) => {
                self.advance();
                self.expect_colon()?;
                let e = self.parse_expr()?;
                self.end_of_line()?;
                Ok(SignalItem::Sort(e))
            }
            TokenKind::Keyword(Keyword::Limit) => {
                self.advance();
                self.expect_colon()?;
                let (n, loc) = self.int_lit()?;
                self.end_of_line()?;
                Ok(SignalItem::Limit(n, loc))
            }
            TokenKind::Keyword(Keyword::Display) => {
                self.advance();
                self.expect_colon()?;
                let (v, loc) = self.ident_like()?;
                let kind = match v.as_str() {
                    "list" => DisplayKind::List,
                    "detail" => DisplayKind::Detail,
                    "grid" => DisplayKind::Grid,
                    "kanban" => DisplayKind::Kanban,
                    _ => {
                        return Err(self.expected_with_hint_at(
                            "one of list, detail, grid, kanban",
                            loc,
                        ))
                    }
                };
                self.end_of_line()?;
                Ok(SignalItem::Display(kind))
            }
            TokenKind::Keyword(Keyword::Aggregate) => {
                self.advance();
                let (output_name, _) = self.ident_like()?;
                self.expect_colon()?;
                let expr = self.parse_expr()?;
                self.end_of_line()?;
                Ok(SignalItem::Aggregate(Aggregate { output_name, expr }))
            }
            TokenKind::Keyword(Keyword::Action) => {
                self.advance();
                self.expect_colon()?;
                let (v, loc) = self.ident_like()?;
                self.end_of_line()?;
                Ok(SignalItem::Action(v, loc))
            }
            TokenKind::Keyword(Keyword::Ux) => {
                self.advance();
                self.expect_colon()?;
                Ok(SignalItem::Ux(self.parse_block(Self::parse_signal_ux_variant)?))
            }
            _ => Err(self.expected(
                "`source`, `filter`, `sort`, `limit`, `display`, `aggregate`, `action`, or `ux`",
            )),
        }
    }

    fn parse_signal_ux_variant(&mut self) -> DazzleResult<SignalUxVariant> {
        self.expect_keyword(Keyword::Persona)?;
        let (persona, _) = self.ident_like()?;
        self.expect_colon()?;
        let mut display = None;
        let fields = self.parse_block(|p| {
            p.expect_keyword(Keyword::Display)?;
            p.expect_colon()?;
            let (v, loc) = p.ident_like()?;
            let kind = match v.as_str() {
                "list" => DisplayKind::List,
                "detail" => DisplayKind::Detail,
                "grid" => DisplayKind::Grid,
                "kanban" => DisplayKind::Kanban,
                _ => return Err(p.expected_with_hint_at("one of list, detail, grid, kanban", loc)),
            };
            p.end_of_line()?;
            Ok(kind)
        })?;
        if let Some(k) = fields.into_iter().next() {
            display = Some(k);
        }
        Ok(SignalUxVariant { persona, display })
    }
}
