//! `surface` declarations: one UI screen for an entity. See spec.md §3
//! "Surfaces".

use super::Parser;
use crate::error::DazzleResult;
use crate::ir::surface::{Section, Surface, SurfaceMode, UxVariant};
use crate::lexer::{Keyword, TokenKind};

enum SurfaceItem {
    Uses(String, crate::location::Location),
    Mode(SurfaceMode),
    Section(Section),
    Ux(Vec<UxVariant>),
}

impl Parser {
    pub(crate) fn parse_surface(&mut self) -> DazzleResult<Surface> {
        let loc = self.expect_keyword(Keyword::Surface)?;
        let (name, _) = self.ident_like()?;
        let display_name = match self.peek() {
            TokenKind::String(_) => Some(self.string_lit()?.0),
            _ => None,
        };
        self.expect_colon()?;

        let mut entity = None;
        let mut entity_location = loc.clone();
        let mut mode = SurfaceMode::Custom;
        let mut sections = Vec::new();
        let mut ux = Vec::new();

        let items = self.parse_block(Self::parse_surface_item)?;
        for item in items {
            match item {
                SurfaceItem::Uses(e, l) => {
                    entity = Some(e);
                    entity_location = l;
                }
                SurfaceItem::Mode(m) => mode = m,
                SurfaceItem::Section(s) => sections.push(s),
                SurfaceItem::Ux(mut v) => ux.append(&mut v),
            }
        }

        let entity = entity.ok_or_else(|| {
            self.expected_with_hint("`uses entity NAME`", "surfaces must declare the entity they present")
        })?;

        Ok(Surface {
            name,
            display_name,
            entity,
            entity_location,
            mode,
            sections,
            ux,
            location: loc,
        })
    }

    fn parse_surface_item(&mut self) -> DazzleResult<SurfaceItem> {
        match self.peek().clone() {
            TokenKind::Keyword(Keyword::Uses) => {
                self.advance();
                self.expect_keyword(Keyword::Entity)?;
                let (name, loc) = self.ident_like()?;
                self.end_of_line()?;
                Ok(SurfaceItem::Uses(name, loc))
            }
            TokenKind::Keyword(Keyword::Mode) => {
                self.advance();
                self.expect_colon()?;
                let (m, loc) = self.ident_like()?;
                let mode = match m.as_str() {
                    "list" => SurfaceMode::List,
                    "view" => SurfaceMode::View,
                    "create" => SurfaceMode::Create,
                    "edit" => SurfaceMode::Edit,
                    "custom" => SurfaceMode::Custom,
                    _ => {
                        return Err(self.expected_with_hint(
                            "one of list, view, create, edit, custom",
                            format!("`{m}` is not a recognized surface mode"),
                        ))
                    }
                };
                self.end_of_line()?;
                let _ = loc;
                Ok(SurfaceItem::Mode(mode))
            }
            TokenKind::Keyword(Keyword::Section) => Ok(SurfaceItem::Section(self.parse_section()?)),
            TokenKind::Keyword(Keyword::Ux) => {
                self.advance();
                self.expect_colon()?;
                Ok(SurfaceItem::Ux(self.parse_block(Self::parse_ux_variant)?))
            }
            _ => Err(self.expected(
                "`uses entity`, `mode`, `section`, or `ux`",
            )),
        }
    }

    fn parse_section(&mut self) -> DazzleResult<Section> {
        let loc = self.expect_keyword(Keyword::Section)?;
        let (name, _) = self.ident_like()?;
        let display_name = match self.peek() {
            TokenKind::String(_) => Some(self.string_lit()?.0),
            _ => None,
        };
        self.expect_colon()?;
        let mut fields = Vec::new();
        let items = self.parse_block(Self::parse_section_field)?;
        for f in items {
            fields.push(f);
        }
        Ok(Section {
            name,
            display_name,
            fields,
            location: loc,
        })
    }

    fn parse_section_field(&mut self) -> DazzleResult<String> {
        self.expect_keyword(Keyword::Field)?;
        let (name, _) = self.ident_like()?;
        self.end_of_line()?;
        Ok(name)
    }

    /// Each variant is headed either by `persona IDENT:` (scoped) or by a
    /// bare `default:` (applies to every persona), followed by an indented
    /// block of ux fields.
    fn parse_ux_variant(&mut self) -> DazzleResult<UxVariant> {
        let persona = if self.is_keyword(Keyword::Persona) {
            self.advance();
            let (p, _) = self.ident_like()?;
            Some(p)
        } else {
            let (tag, _) = self.ident_like()?;
            if tag != "default" {
                return Err(self.expected_with_hint(
                    "`persona IDENT:` or `default:`",
                    "ux variants are scoped by `persona` or declared `default`",
                ));
            }
            None
        };
        self.expect_colon()?;

        let mut sort = None;
        let mut filter = None;
        let mut search = Vec::new();
        let mut empty_message = None;
        let fields = self.parse_block(Self::parse_ux_field)?;
        for f in fields {
            apply_ux_field(f, &mut sort, &mut filter, &mut search, &mut empty_message);
        }

        Ok(UxVariant {
            persona,
            sort,
            filter,
            search,
            empty_message,
        })
    }

    fn parse_ux_field(&mut self) -> DazzleResult<UxField> {
        match self.peek().clone() {
            TokenKind::Keyword(Keyword::Sort) => {
                self.advance();
                self.expect_colon()?;
                let e = self.parse_expr()?;
                self.end_of_line()?;
                Ok(UxField::Sort(e))
            }
            TokenKind::Keyword(Keyword::Filter) => {
                self.advance();
                self.expect_colon()?;
                let e = self.parse_expr()?;
                self.end_of_line()?;
                Ok(UxField::Filter(e))
            }
            TokenKind::Ident(s) if s == "search" => {
                self.advance();
                self.expect_colon()?;
                let items = self.bracketed_ident_list()?;
                self.end_of_line()?;
                Ok(UxField::Search(items))
            }
            TokenKind::Ident(s) if s == "empty_message" => {
                self.advance();
                self.expect_colon()?;
                let (msg, _) = self.string_lit()?;
                self.end_of_line()?;
                Ok(UxField::Empty(msg))
            }
            _ => Err(self.expected("`sort`, `filter`, `search`, or `empty_message`")),
        }
    }
}

enum UxField {
    Sort(crate::ir::expr::Expr),
    Filter(crate::ir::expr::Expr),
    Search(Vec<String>),
    Empty(String),
}

fn apply_ux_field(
    f: UxField,
    sort: &mut Option<crate::ir::expr::Expr>,
    filter: &mut Option<crate::ir::expr::Expr>,
    search: &mut Vec<String>,
    empty_message: &mut Option<String>,
) {
    match f {
        UxField::Sort(e) => *sort = Some(e),
        UxField::Filter(e) => *filter = Some(e),
        UxField::Search(mut s) => search.append(&mut s),
        UxField::Empty(s) => *empty_message = Some(s),
    }
}
