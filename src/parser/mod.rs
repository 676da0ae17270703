//! Recursive-descent parser: tokens → `ModuleAst`. Pure, side-effect-free,
//! single-pass with one-token lookahead. See spec.md §4.2.

mod entity;
mod event;
mod expr;
mod llm;
mod persona;
mod surface;
mod workspace;

use crate::error::{DazzleError, DazzleResult};
use crate::ir::{AppDecl, Declaration, ModuleAst};
use crate::lexer::{Keyword, Token, TokenKind};
use crate::location::Location;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::instrument;

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    file: Arc<PathBuf>,
}

impl Parser {
    pub fn new(tokens: Vec<Token>, file: Arc<PathBuf>) -> Self {
        Self { tokens, pos: 0, file }
    }

    fn current(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    pub(crate) fn peek(&self) -> &TokenKind {
        &self.current().kind
    }

    pub(crate) fn loc(&self) -> Location {
        self.current().location.clone()
    }

    fn advance(&mut self) -> Token {
        let tok = self.current().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        tok
    }

    fn expected(&self, expected: impl Into<String>) -> DazzleError {
        DazzleError::ExpectedToken {
            location: self.loc(),
            expected: expected.into(),
            found: self.peek().describe(),
            hint: None,
        }
    }

    fn expected_with_hint(&self, expected: impl Into<String>, hint: impl Into<String>) -> DazzleError {
        DazzleError::ExpectedToken {
            location: self.loc(),
            expected: expected.into(),
            found: self.peek().describe(),
            hint: Some(hint.into()),
        }
    }

    /// Like `expected`, but anchored at a location already consumed (e.g.
    /// an enum-like identifier read via `ident_like` that turned out not
    /// to be one of the recognized values).
    pub(crate) fn expected_with_hint_at(&self, expected: impl Into<String>, location: Location) -> DazzleError {
        DazzleError::ExpectedToken {
            location,
            expected: expected.into(),
            found: "an unrecognized value".to_string(),
            hint: None,
        }
    }

    pub(crate) fn is_eof(&self) -> bool {
        matches!(self.peek(), TokenKind::Eof)
    }

    pub(crate) fn is_dedent(&self) -> bool {
        matches!(self.peek(), TokenKind::Dedent)
    }

    pub(crate) fn is_newline(&self) -> bool {
        matches!(self.peek(), TokenKind::Newline)
    }

    pub(crate) fn is_keyword(&self, kw: Keyword) -> bool {
        matches!(self.peek(), TokenKind::Keyword(k) if *k == kw)
    }


    pub(crate) fn expect_keyword(&mut self, kw: Keyword) -> DazzleResult<Location> {
        if self.is_keyword(kw) {
            Ok(self.advance().location)
        } else {
            Err(self.expected(format!("`{}`", kw.as_str())))
        }
    }

    pub(crate) fn expect_colon(&mut self) -> DazzleResult<()> {
        if matches!(self.peek(), TokenKind::Colon) {
            self.advance();
            Ok(())
        } else {
            Err(self.expected_with_hint("`:`", "declarations require `:` before their body"))
        }
    }

    pub(crate) fn eat_newlines(&mut self) {
        while self.is_newline() {
            self.advance();
        }
    }

    /// Consumes the remainder of a logical line: zero or more NEWLINEs.
    /// Blank lines were already dropped by the lexer, so exactly one is
    /// the common case, but we tolerate the EOF/DEDENT-without-trailing-
    /// newline case too.
    pub(crate) fn end_of_line(&mut self) -> DazzleResult<()> {
        if self.is_newline() || self.is_eof() || self.is_dedent() {
            self.eat_newlines();
            Ok(())
        } else {
            Err(self.expected("end of line"))
        }
    }

    /// Accepts either a plain identifier or a keyword-shaped token used in
    /// an identifier position — the disambiguation layer of spec.md §4.2.
    pub(crate) fn ident_like(&mut self) -> DazzleResult<(String, Location)> {
        let loc = self.loc();
        match self.peek().clone() {
            TokenKind::Ident(s) => {
                self.advance();
                Ok((s, loc))
            }
            TokenKind::Keyword(kw) => {
                self.advance();
                Ok((kw.as_str().to_string(), loc))
            }
            _ => Err(self.expected("an identifier")),
        }
    }

    pub(crate) fn string_lit(&mut self) -> DazzleResult<(String, Location)> {
        let loc = self.loc();
        match self.peek().clone() {
            TokenKind::String(s) => {
                self.advance();
                Ok((s, loc))
            }
            _ => Err(self.expected("a string literal")),
        }
    }

    pub(crate) fn int_lit(&mut self) -> DazzleResult<(i64, Location)> {
        let loc = self.loc();
        match self.peek().clone() {
            TokenKind::Int(n) => {
                self.advance();
                Ok((n, loc))
            }
            _ => Err(self.expected("an integer literal")),
        }
    }

    pub(crate) fn dotted_name(&mut self) -> DazzleResult<(String, Location)> {
        let (mut name, loc) = self.ident_like()?;
        while matches!(self.peek(), TokenKind::Dot) {
            self.advance();
            let (part, _) = self.ident_like()?;
            name.push('.');
            name.push_str(&part);
        }
        Ok((name, loc))
    }

    /// `IDENT (, IDENT)*` inside `[...]`.
    pub(crate) fn bracketed_ident_list(&mut self) -> DazzleResult<Vec<String>> {
        if !matches!(self.peek(), TokenKind::LBrack) {
            return Err(self.expected("`[`"));
        }
        self.advance();
        let mut items = Vec::new();
        if !matches!(self.peek(), TokenKind::RBrack) {
            loop {
                let (name, _) = self.ident_like()?;
                items.push(name);
                if matches!(self.peek(), TokenKind::Comma) {
                    self.advance();
                    continue;
                }
                break;
            }
        }
        if !matches!(self.peek(), TokenKind::RBrack) {
            return Err(self.expected("`]`"));
        }
        self.advance();
        Ok(items)
    }

    /// Opens an indentation-based block: the colon was already consumed,
    /// so this expects `NEWLINE INDENT`, collects items via `item` until
    /// `DEDENT`, and consumes the `DEDENT`.
    pub(crate) fn parse_block<T>(
        &mut self,
        mut item: impl FnMut(&mut Self) -> DazzleResult<T>,
    ) -> DazzleResult<Vec<T>> {
        self.eat_newlines();
        if !matches!(self.peek(), TokenKind::Indent) {
            return Err(self.expected("an indented block"));
        }
        self.advance();
        let mut items = Vec::new();
        loop {
            self.eat_newlines();
            if self.is_dedent() {
                self.advance();
                break;
            }
            if self.is_eof() {
                return Err(DazzleError::UnexpectedEof { location: self.loc() });
            }
            items.push(item(self)?);
        }
        Ok(items)
    }

    #[instrument(skip(self), fields(file = %self.file.display()))]
    pub fn parse_module(&mut self) -> DazzleResult<ModuleAst> {
        let module_loc = self.loc();
        self.expect_keyword(Keyword::Module)?;
        let (name, _) = self.dotted_name()?;
        self.end_of_line()?;

        let mut uses = Vec::new();
        while self.is_keyword(Keyword::Use) {
            let loc = self.loc();
            self.advance();
            let (used, _) = if self.is_keyword(Keyword::SelfKw) {
                let l = self.loc();
                self.advance();
                ("self".to_string(), l)
            } else {
                self.dotted_name()?
            };
            self.end_of_line()?;
            uses.push((used, loc));
        }

        let mut app = None;
        if self.is_keyword(Keyword::App) {
            let loc = self.loc();
            self.advance();
            let (app_name, _) = self.ident_like()?;
            let (app_title, _) = self.string_lit()?;
            self.end_of_line()?;
            app = Some(AppDecl {
                app_name,
                app_title,
                location: loc,
            });
        }

        let mut declarations = Vec::new();
        let mut seen: std::collections::HashMap<(crate::ir::DeclCategory, String), Location> =
            std::collections::HashMap::new();
        while !self.is_eof() {
            self.eat_newlines();
            if self.is_eof() {
                break;
            }
            let decl = self.parse_declaration()?;
            let key = (decl.category(), decl.name().to_string());
            if let Some(prev) = seen.get(&key) {
                return Err(DazzleError::DuplicateDeclarationInBlock {
                    location: decl.location().clone(),
                    name: format!("{} (first declared at {})", decl.name(), prev),
                });
            }
            tracing::debug!(category = ?decl.category(), name = decl.name(), "declaration parsed");
            seen.insert(key, decl.location().clone());
            declarations.push(decl);
        }

        tracing::info!(declarations = declarations.len(), "module parsed");
        Ok(ModuleAst {
            name,
            uses,
            app,
            declarations,
            location: module_loc,
        })
    }

    fn parse_declaration(&mut self) -> DazzleResult<Declaration> {
        match self.peek() {
            TokenKind::Keyword(Keyword::Entity) => Ok(Declaration::Entity(self.parse_entity()?)),
            TokenKind::Keyword(Keyword::Surface) => Ok(Declaration::Surface(self.parse_surface()?)),
            TokenKind::Keyword(Keyword::Workspace) => Ok(Declaration::Workspace(self.parse_workspace()?)),
            TokenKind::Keyword(Keyword::Persona) => Ok(Declaration::Persona(self.parse_persona()?)),
            TokenKind::Keyword(Keyword::Scenario) => Ok(Declaration::Scenario(self.parse_scenario()?)),
            TokenKind::Keyword(Keyword::LlmModel) => Ok(Declaration::LlmModel(self.parse_llm_model()?)),
            TokenKind::Keyword(Keyword::LlmIntent) => Ok(Declaration::LlmIntent(self.parse_llm_intent()?)),
            TokenKind::Keyword(Keyword::LlmConfig) => Ok(Declaration::LlmConfig(self.parse_llm_config()?)),
            TokenKind::Keyword(Keyword::Event) => Ok(Declaration::EventModel(self.parse_event_model()?)),
            TokenKind::Keyword(Keyword::Subscribe) => Ok(Declaration::Subscribe(self.parse_subscribe()?)),
            TokenKind::Keyword(Keyword::Process) => Ok(Declaration::Process(self.parse_process()?)),
            TokenKind::Keyword(Keyword::Schedule) => Ok(Declaration::Schedule(self.parse_schedule()?)),
            _ => Err(self.expected_with_hint(
                "a declaration (entity, surface, workspace, persona, scenario, llm_model, llm_intent, llm_config, event, subscribe, process, schedule)",
                "module bodies contain only top-level declarations",
            )),
        }
    }
}

/// Parses a single file's token stream into a `ModuleAst` (spec.md §4.2
/// "Contract").
pub fn parse_module(tokens: Vec<Token>, file: Arc<PathBuf>) -> DazzleResult<ModuleAst> {
    Parser::new(tokens, file).parse_module()
}
