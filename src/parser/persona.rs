//! `persona` and `scenario` declarations. See spec.md §3 "Personas" /
//! "Scenarios".

use super::Parser;
use crate::error::DazzleResult;
use crate::ir::expr::Literal;
use crate::ir::persona::{FixtureRow, Persona, ProficiencyLevel, Scenario};
use crate::lexer::{Keyword, TokenKind};
use std::collections::BTreeMap;

enum PersonaItem {
    Goals(Vec<String>),
    ProficiencyLevel(ProficiencyLevel),
    SessionStyle(String),
    DefaultWorkspace(String, crate::location::Location),
    DefaultRoute(String),
}

enum ScenarioItem {
    StartRoute(String, String),
    Fixture(FixtureRow),
}

impl Parser {
    pub(crate) fn parse_persona(&mut self) -> DazzleResult<Persona> {
        let loc = self.expect_keyword(Keyword::Persona)?;
        let (name, _) = self.ident_like()?;
        let description = match self.peek() {
            TokenKind::String(_) => Some(self.string_lit()?.0),
            _ => None,
        };
        self.expect_colon()?;

        let mut goals = Vec::new();
        let mut proficiency_level = ProficiencyLevel::Intermediate;
        let mut session_style = None;
        let mut default_workspace = None;
        let mut default_workspace_location = None;
        let mut default_route = None;

        let items = self.parse_block(Self::parse_persona_item)?;
        for item in items {
            match item {
                PersonaItem::Goals(mut g) => goals.append(&mut g),
                PersonaItem::ProficiencyLevel(p) => proficiency_level = p,
                PersonaItem::SessionStyle(s) => session_style = Some(s),
                PersonaItem::DefaultWorkspace(w, l) => {
                    default_workspace = Some(w);
                    default_workspace_location = Some(l);
                }
                PersonaItem::DefaultRoute(r) => default_route = Some(r),
            }
        }

        Ok(Persona {
            name,
            description,
            goals,
            proficiency_level,
            session_style,
            default_workspace,
            default_workspace_location,
            default_route,
            location: loc,
        })
    }

    fn parse_persona_item(&mut self) -> DazzleResult<PersonaItem> {
        match self.peek().clone() {
            TokenKind::Keyword(Keyword::Goals) => {
                self.advance();
                self.expect_colon()?;
                let items = self.bracketed_ident_list()?;
                self.end_of_line()?;
                Ok(PersonaItem::Goals(items))
            }
            TokenKind::Keyword(Keyword::ProficiencyLevel) => {
                self.advance();
                self.expect_colon()?;
                let (v, loc) = self.ident_like()?;
                let level = match v.as_str() {
                    "novice" => ProficiencyLevel::Novice,
                    "intermediate" => ProficiencyLevel::Intermediate,
                    "expert" => ProficiencyLevel::Expert,
                    _ => {
                        return Err(self.expected_with_hint_at(
                            "one of novice, intermediate, expert",
                            loc.clone(),
                        ))
                    }
                };
                self.end_of_line()?;
                Ok(PersonaItem::ProficiencyLevel(level))
            }
            TokenKind::Keyword(Keyword::SessionStyle) => {
                self.advance();
                self.expect_colon()?;
                let (v, _) = self.string_lit()?;
                self.end_of_line()?;
                Ok(PersonaItem::SessionStyle(v))
            }
            TokenKind::Keyword(Keyword::DefaultWorkspace) => {
                self.advance();
                self.expect_colon()?;
                let (v, loc) = self.ident_like()?;
                self.end_of_line()?;
                Ok(PersonaItem::DefaultWorkspace(v, loc))
            }
            TokenKind::Keyword(Keyword::DefaultRoute) => {
                self.advance();
                self.expect_colon()?;
                let (v, _) = self.string_lit()?;
                self.end_of_line()?;
                Ok(PersonaItem::DefaultRoute(v))
            }
            _ => Err(self.expected(
                "`goals`, `proficiency_level`, `session_style`, `default_workspace`, or `default_route`",
            )),
        }
    }

    pub(crate) fn parse_scenario(&mut self) -> DazzleResult<Scenario> {
        let loc = self.expect_keyword(Keyword::Scenario)?;
        let (name, _) = self.ident_like()?;
        self.expect_colon()?;

        let mut start_routes = BTreeMap::new();
        let mut fixtures = Vec::new();

        let items = self.parse_block(Self::parse_scenario_item)?;
        for item in items {
            match item {
                ScenarioItem::StartRoute(persona, route) => {
                    start_routes.insert(persona, route);
                }
                ScenarioItem::Fixture(f) => fixtures.push(f),
            }
        }

        Ok(Scenario {
            name,
            start_routes,
            fixtures,
            location: loc,
        })
    }

    fn parse_scenario_item(&mut self) -> DazzleResult<ScenarioItem> {
        match self.peek().clone() {
            TokenKind::Keyword(Keyword::StartRoute) => {
                self.advance();
                let (persona, _) = self.ident_like()?;
                self.expect_colon()?;
                let (route, _) = self.string_lit()?;
                self.end_of_line()?;
                Ok(ScenarioItem::StartRoute(persona, route))
            }
            TokenKind::Keyword(Keyword::Demo) => {
                let loc = self.loc();
                self.advance();
                let (entity, entity_location) = self.ident_like()?;
                self.expect_colon()?;
                let values = self
                    .parse_block(Self::parse_fixture_field)?
                    .into_iter()
                    .collect::<BTreeMap<_, _>>();
                Ok(ScenarioItem::Fixture(FixtureRow {
                    entity,
                    entity_location,
                    values,
                    location: loc,
                }))
            }
            _ => Err(self.expected("`start_route` or `demo`")),
        }
    }

    fn parse_fixture_field(&mut self) -> DazzleResult<(String, Literal)> {
        let (name, _) = self.ident_like()?;
        if !matches!(self.peek(), TokenKind::Equals) {
            return Err(self.expected("`=`"));
        }
        self.advance();
        let lit = self.parse_literal()?;
        self.end_of_line()?;
        Ok((name, lit))
    }

    pub(crate) fn parse_literal(&mut self) -> DazzleResult<Literal> {
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
            _ => return Err(self.expected("a literal value")),
        };
        Ok(lit)
    }
}
