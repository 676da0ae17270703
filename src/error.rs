//! Diagnostic taxonomy shared by every compiler phase.
//!
//! Each phase collects everything it can detect locally before returning;
//! see [`crate::compile`] for how phases are sequenced and how errors abort
//! the pipeline while warnings never do.

use crate::location::Location;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for phases that can fail outright (lexing a single file,
/// parsing a single declaration, linking the module graph).
pub type DazzleResult<T> = Result<T, DazzleError>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Error,
    Warning,
}

/// A single diagnostic: a structured error or warning with location and kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub location: Location,
    pub code: String,
    pub message: String,
    pub hint: Option<String>,
}

impl Diagnostic {
    pub fn error(location: Location, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            location,
            code: code.into(),
            message: message.into(),
            hint: None,
        }
    }

    pub fn warning(location: Location, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            location,
            code: code.into(),
            message: message.into(),
            hint: None,
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// Human-readable `path:line:col: severity: code: message` form.
    pub fn to_line(&self) -> String {
        let sev = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        match &self.hint {
            Some(hint) => format!(
                "{}: {}: {}: {} (hint: {})",
                self.location, sev, self.code, self.message, hint
            ),
            None => format!("{}: {}: {}: {}", self.location, sev, self.code, self.message),
        }
    }
}

/// An ordered, sorted batch of diagnostics returned by a phase.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Diagnostics(pub Vec<Diagnostic>);

impl Diagnostics {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, diag: Diagnostic) {
        self.0.push(diag);
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.0.extend(other.0);
    }

    pub fn has_errors(&self) -> bool {
        self.0.iter().any(Diagnostic::is_error)
    }

    pub fn error_count(&self) -> usize {
        self.0.iter().filter(|d| d.is_error()).count()
    }

    pub fn warning_count(&self) -> usize {
        self.0.len() - self.error_count()
    }

    /// Sort by `(file_path, line, column, kind)` for deterministic output.
    pub fn sort(&mut self) {
        self.0.sort_by(|a, b| {
            a.location
                .cmp(&b.location)
                .then_with(|| a.code.cmp(&b.code))
        });
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.0.iter()
    }
}

/// Errors that halt a single phase outright. Each variant corresponds to one
/// entry of the external error taxonomy.
#[derive(Error, Debug, Clone)]
pub enum DazzleError {
    #[error("{location}: unterminated string")]
    UnterminatedString { location: Location },

    #[error("{location}: invalid indentation: {detail}")]
    InvalidIndent { location: Location, detail: String },

    #[error("{location}: dedent does not match any open indent level")]
    InconsistentDedent { location: Location },

    #[error("{location}: invalid number literal: {text}")]
    InvalidNumber { location: Location, text: String },

    #[error("{location}: unexpected character {ch:?}")]
    UnexpectedChar { location: Location, ch: char },

    #[error("{location}: expected {expected}, found {found}{}", hint.as_ref().map(|h| format!(" ({h})")).unwrap_or_default())]
    ExpectedToken {
        location: Location,
        expected: String,
        found: String,
        hint: Option<String>,
    },

    #[error("{location}: unexpected end of file")]
    UnexpectedEof { location: Location },

    #[error("{location}: unexpected dedent")]
    UnexpectedDedent { location: Location },

    #[error("{location}: malformed expression: {detail}")]
    MalformedExpression { location: Location, detail: String },

    #[error("{location}: duplicate declaration of {name} in block")]
    DuplicateDeclarationInBlock { location: Location, name: String },

    #[error("{path}: file does not begin with a `module` declaration")]
    MissingModuleHeader { path: String },

    #[error("module `{name}` is declared in more than one file ({first} and {second})")]
    DuplicateModule {
        name: String,
        first: String,
        second: String,
    },

    #[error("{location}: unknown module `{name}`")]
    UnknownModule { location: Location, name: String },

    #[error("dependency cycle among modules: {}", members.join(", "))]
    Cycle { members: Vec<String>, location: Location },

    #[error("duplicate symbol `{name}` declared in both {first} and {second}")]
    DuplicateSymbol {
        name: String,
        first: String,
        second: String,
    },

    #[error("more than one `llm_config` block declared process-wide")]
    MultipleLlmConfig { locations: Vec<Location> },

    #[error("more than one `app` declaration across all modules")]
    MultipleAppDeclarations { locations: Vec<Location> },

    #[error("no modules found under the configured manifest paths")]
    NoModulesFound,

    #[error("{0}")]
    Io(String),

    #[error("{0}")]
    Manifest(String),
}

impl DazzleError {
    /// Projects phase-halting errors that do carry a location into a
    /// [`Diagnostic`]. Errors without an inherent location (e.g.
    /// `NoModulesFound`) are located at the caller-supplied fallback.
    pub fn into_diagnostic(self, fallback: Location) -> Diagnostic {
        let code = self.code();
        match &self {
            DazzleError::ExpectedToken { location, hint, .. } => {
                let mut d = Diagnostic::error(location.clone(), code, self.to_string());
                if let Some(h) = hint {
                    d = d.with_hint(h.clone());
                }
                d
            }
            DazzleError::UnterminatedString { location }
            | DazzleError::InconsistentDedent { location }
            | DazzleError::UnexpectedEof { location }
            | DazzleError::UnexpectedDedent { location }
            | DazzleError::UnknownModule { location, .. } => {
                Diagnostic::error(location.clone(), code, self.to_string())
            }
            DazzleError::InvalidIndent { location, .. }
            | DazzleError::InvalidNumber { location, .. }
            | DazzleError::UnexpectedChar { location, .. }
            | DazzleError::MalformedExpression { location, .. }
            | DazzleError::DuplicateDeclarationInBlock { location, .. } => {
                Diagnostic::error(location.clone(), code, self.to_string())
            }
            DazzleError::MultipleLlmConfig { locations } | DazzleError::MultipleAppDeclarations { locations } => {
                let loc = locations.first().cloned().unwrap_or(fallback);
                Diagnostic::error(loc, code, self.to_string())
            }
            DazzleError::Cycle { location, .. } => Diagnostic::error(location.clone(), code, self.to_string()),
            _ => Diagnostic::error(fallback, code, self.to_string()),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            DazzleError::UnterminatedString { .. } => "lex.unterminated_string",
            DazzleError::InvalidIndent { .. } => "lex.invalid_indent",
            DazzleError::InconsistentDedent { .. } => "lex.inconsistent_dedent",
            DazzleError::InvalidNumber { .. } => "lex.invalid_number",
            DazzleError::UnexpectedChar { .. } => "lex.unexpected_char",
            DazzleError::ExpectedToken { .. } => "parse.expected_token",
            DazzleError::UnexpectedEof { .. } => "parse.unexpected_eof",
            DazzleError::UnexpectedDedent { .. } => "parse.unexpected_dedent",
            DazzleError::MalformedExpression { .. } => "parse.malformed_expression",
            DazzleError::DuplicateDeclarationInBlock { .. } => "parse.duplicate_declaration",
            DazzleError::MissingModuleHeader { .. } => "link.missing_module_header",
            DazzleError::DuplicateModule { .. } => "link.duplicate_module",
            DazzleError::UnknownModule { .. } => "link.unknown_module",
            DazzleError::Cycle { .. } => "link.cycle",
            DazzleError::DuplicateSymbol { .. } => "link.duplicate_symbol",
            DazzleError::MultipleLlmConfig { .. } => "link.multiple_llm_config",
            DazzleError::MultipleAppDeclarations { .. } => "link.multiple_app_declarations",
            DazzleError::NoModulesFound => "link.no_modules_found",
            DazzleError::Io(_) => "io",
            DazzleError::Manifest(_) => "manifest",
        }
    }
}
