//! Tokens and keywords. See spec.md §4.1 "Tokens".

use crate::location::Location;
use serde::{Deserialize, Serialize};

macro_rules! keywords {
    ($($variant:ident => $text:expr),* $(,)?) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        pub enum Keyword {
            $($variant),*
        }

        impl Keyword {
            pub fn as_str(self) -> &'static str {
                match self {
                    $(Keyword::$variant => $text),*
                }
            }

            pub fn lookup(s: &str) -> Option<Keyword> {
                match s {
                    $($text => Some(Keyword::$variant),)*
                    _ => None,
                }
            }
        }
    };
}

// The ~60 keywords named in spec.md §4.1, plus the block/field-level words
// needed to parse every construct named in spec.md §3-4 (display_name,
// source, filter, sort, ...). Not reserved outside their declaring
// contexts: see `Keyword::ident_text` and the parser's disambiguation
// layer (spec.md §4.2 "Disambiguation").
keywords! {
    Module => "module",
    Use => "use",
    App => "app",
    Entity => "entity",
    Surface => "surface",
    Workspace => "workspace",
    Persona => "persona",
    Scenario => "scenario",
    Section => "section",
    Field => "field",
    Uses => "uses",
    Mode => "mode",
    Ref => "ref",
    HasMany => "has_many",
    BelongsTo => "belongs_to",
    Enum => "enum",
    Pk => "pk",
    Required => "required",
    Optional => "optional",
    Unique => "unique",
    AutoAdd => "auto_add",
    AutoUpdate => "auto_update",
    Computed => "computed",
    Transitions => "transitions",
    Invariant => "invariant",
    Permit => "permit",
    Forbid => "forbid",
    Audit => "audit",
    Role => "role",
    Requires => "requires",
    Authenticated => "authenticated",
    LlmModel => "llm_model",
    LlmIntent => "llm_intent",
    LlmConfig => "llm_config",
    Event => "event",
    Subscribe => "subscribe",
    Topic => "topic",
    Process => "process",
    Schedule => "schedule",
    Step => "step",
    Trigger => "trigger",
    On => "on",
    When => "when",
    And => "and",
    Or => "or",
    Not => "not",
    True => "true",
    False => "false",
    Null => "null",
    Archetype => "archetype",
    Intent => "intent",
    Domain => "domain",
    Patterns => "patterns",
    Index => "index",
    DisplayName => "display_name",
    Purpose => "purpose",
    EngineHint => "engine_hint",
    Signal => "signal",
    Source => "source",
    Filter => "filter",
    Sort => "sort",
    Limit => "limit",
    Display => "display",
    Aggregate => "aggregate",
    Action => "action",
    Goals => "goals",
    ProficiencyLevel => "proficiency_level",
    SessionStyle => "session_style",
    DefaultWorkspace => "default_workspace",
    DefaultRoute => "default_route",
    StartRoute => "start_route",
    Demo => "demo",
    Ux => "ux",
    Timeout => "timeout",
    Retry => "retry",
    MaxAttempts => "max_attempts",
    Backoff => "backoff",
    Delays => "delays",
    Pii => "pii",
    Scan => "scan",
    Provider => "provider",
    ModelId => "model_id",
    Tier => "tier",
    MaxTokens => "max_tokens",
    Prompt => "prompt",
    OutputSchema => "output_schema",
    RateLimits => "rate_limits",
    DefaultModel => "default_model",
    ArtifactStore => "artifact_store",
    Logging => "logging",
    Input => "input",
    SelfKw => "self",
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TokenKind {
    Ident(String),
    Keyword(Keyword),
    String(String),
    Int(i64),
    Decimal(String),
    LBrack,
    RBrack,
    LParen,
    RParen,
    Colon,
    Comma,
    Equals,
    Arrow,
    Dot,
    Star,
    Plus,
    Minus,
    Slash,
    Lt,
    LtEq,
    Gt,
    GtEq,
    NotEq,
    Newline,
    Indent,
    Dedent,
    Eof,
}

impl TokenKind {
    /// Human-readable category name for diagnostics.
    pub fn describe(&self) -> String {
        match self {
            TokenKind::Ident(s) => format!("identifier `{s}`"),
            TokenKind::Keyword(k) => format!("`{}`", k.as_str()),
            TokenKind::String(_) => "string literal".to_string(),
            TokenKind::Int(_) => "integer literal".to_string(),
            TokenKind::Decimal(_) => "decimal literal".to_string(),
            TokenKind::LBrack => "`[`".to_string(),
            TokenKind::RBrack => "`]`".to_string(),
            TokenKind::LParen => "`(`".to_string(),
            TokenKind::RParen => "`)`".to_string(),
            TokenKind::Colon => "`:`".to_string(),
            TokenKind::Comma => "`,`".to_string(),
            TokenKind::Equals => "`=`".to_string(),
            TokenKind::Arrow => "`->`".to_string(),
            TokenKind::Dot => "`.`".to_string(),
            TokenKind::Star => "`*`".to_string(),
            TokenKind::Plus => "`+`".to_string(),
            TokenKind::Minus => "`-`".to_string(),
            TokenKind::Slash => "`/`".to_string(),
            TokenKind::Lt => "`<`".to_string(),
            TokenKind::LtEq => "`<=`".to_string(),
            TokenKind::Gt => "`>`".to_string(),
            TokenKind::GtEq => "`>=`".to_string(),
            TokenKind::NotEq => "`!=`".to_string(),
            TokenKind::Newline => "newline".to_string(),
            TokenKind::Indent => "indent".to_string(),
            TokenKind::Dedent => "dedent".to_string(),
            TokenKind::Eof => "end of file".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    pub location: Location,
}
