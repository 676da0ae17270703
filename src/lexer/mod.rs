//! Indentation-aware tokenizer. Bytes → tokens; tracks INDENT/DEDENT,
//! string literals, numbers, identifiers, punctuation. See spec.md §4.1.

pub mod token;

pub use token::{Keyword, Token, TokenKind};

use crate::error::{DazzleError, DazzleResult};
use crate::location::Location;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::instrument;

pub struct Lexer<'a> {
    file: Arc<PathBuf>,
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
    line: u32,
    column: u32,
    indent_stack: Vec<usize>,
    at_line_start: bool,
    pending_dedents: u32,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str, file: Arc<PathBuf>) -> Self {
        // Tolerate a UTF-8 BOM at file start (spec.md §6 "Source files").
        let source = source.strip_prefix('\u{feff}').unwrap_or(source);
        Self {
            file,
            chars: source.char_indices().peekable(),
            line: 1,
            column: 1,
            indent_stack: vec![0],
            at_line_start: true,
            pending_dedents: 0,
        }
    }

    fn loc(&self, span: u32) -> Location {
        Location::new(self.file.clone(), self.line, self.column, span)
    }

    fn bump(&mut self) -> Option<char> {
        let (_, ch) = self.chars.next()?;
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, c)| c)
    }

    fn peek2_char(&self) -> Option<char> {
        let mut it = self.chars.clone();
        it.next();
        it.next().map(|(_, c)| c)
    }

    /// Measures the indentation of the upcoming logical line without
    /// consuming non-whitespace. Returns `None` for a blank or
    /// comment-only line (spec.md §4.1 "Blank lines and comment-only
    /// lines never alter the indent stack").
    fn measure_indent(&mut self) -> DazzleResult<Option<usize>> {
        let mut width = 0usize;
        loop {
            match self.peek_char() {
                Some(' ') => {
                    self.bump();
                    width += 1;
                }
                Some('\t') => {
                    let loc = self.loc(1);
                    return Err(DazzleError::InvalidIndent {
                        location: loc,
                        detail: "tabs are not allowed in indentation".to_string(),
                    });
                }
                Some('\n') => {
                    self.bump();
                    return Ok(None);
                }
                Some('#') => {
                    while let Some(c) = self.peek_char() {
                        if c == '\n' {
                            break;
                        }
                        self.bump();
                    }
                    continue;
                }
                None => return Ok(None),
                _ => return Ok(Some(width)),
            }
        }
    }

    fn read_while(&mut self, pred: impl Fn(char) -> bool) -> String {
        let mut out = String::new();
        while let Some(c) = self.peek_char() {
            if pred(c) {
                out.push(c);
                self.bump();
            } else {
                break;
            }
        }
        out
    }

    fn read_string(&mut self) -> DazzleResult<String> {
        let start_line = self.line;
        let start_col = self.column;
        let mut out = String::new();
        loop {
            match self.bump() {
                None | Some('\n') => {
                    return Err(DazzleError::UnterminatedString {
                        location: Location::new(self.file.clone(), start_line, start_col, 1),
                    });
                }
                Some('"') => return Ok(out),
                Some('\\') => match self.bump() {
                    Some('\\') => out.push('\\'),
                    Some('"') => out.push('"'),
                    Some('n') => out.push('\n'),
                    Some('t') => out.push('\t'),
                    _ => {
                        return Err(DazzleError::UnterminatedString {
                            location: Location::new(self.file.clone(), start_line, start_col, 1),
                        })
                    }
                },
                Some(c) => out.push(c),
            }
        }
    }

    fn read_number(&mut self) -> DazzleResult<TokenKind> {
        let start_line = self.line;
        let start_col = self.column;
        let mut text = self.read_while(|c| c.is_ascii_digit());
        if self.peek_char() == Some('.') && self.peek2_char().map(|c| c.is_ascii_digit()).unwrap_or(false) {
            text.push('.');
            self.bump();
            text.push_str(&self.read_while(|c| c.is_ascii_digit()));
            return Ok(TokenKind::Decimal(text));
        }
        text.parse::<i64>()
            .map(TokenKind::Int)
            .map_err(|_| DazzleError::InvalidNumber {
                location: Location::new(self.file.clone(), start_line, start_col, text.len() as u32),
                text,
            })
    }

    /// Produces the next token, handling indentation tracking lazily at
    /// the start of each logical line.
    #[instrument(skip(self), level = "trace")]
    fn next_inner(&mut self) -> DazzleResult<Token> {
        if self.pending_dedents > 0 {
            self.pending_dedents -= 1;
            return Ok(Token {
                kind: TokenKind::Dedent,
                location: self.loc(0),
            });
        }

        if self.at_line_start {
            loop {
                match self.measure_indent()? {
                    None => {
                        if self.peek_char().is_none() {
                            break;
                        }
                        continue;
                    }
                    Some(width) => {
                        let top = self.indent_stack.last().copied().unwrap_or(0);
                        if width > top {
                            self.indent_stack.push(width);
                            self.at_line_start = false;
                            return Ok(Token {
                                kind: TokenKind::Indent,
                                location: self.loc(0),
                            });
                        } else if width < top {
                            let mut popped = 0u32;
                            while self.indent_stack.last().copied().unwrap_or(0) > width {
                                self.indent_stack.pop();
                                popped += 1;
                            }
                            if self.indent_stack.last().copied().unwrap_or(0) != width {
                                return Err(DazzleError::InconsistentDedent {
                                    location: self.loc(0),
                                });
                            }
                            self.at_line_start = false;
                            self.pending_dedents = popped - 1;
                            return Ok(Token {
                                kind: TokenKind::Dedent,
                                location: self.loc(0),
                            });
                        } else {
                            self.at_line_start = false;
                            break;
                        }
                    }
                }
            }
        }

        loop {
            let Some(ch) = self.peek_char() else {
                let mut popped = 0u32;
                while self.indent_stack.last().copied().unwrap_or(0) > 0 {
                    self.indent_stack.pop();
                    popped += 1;
                }
                if popped > 0 {
                    self.pending_dedents = popped - 1;
                    return Ok(Token {
                        kind: TokenKind::Dedent,
                        location: self.loc(0),
                    });
                }
                return Ok(Token {
                    kind: TokenKind::Eof,
                    location: self.loc(0),
                });
            };

            match ch {
                ' ' => {
                    self.bump();
                    continue;
                }
                '#' => {
                    while let Some(c) = self.peek_char() {
                        if c == '\n' {
                            break;
                        }
                        self.bump();
                    }
                    continue;
                }
                '\t' => {
                    let loc = self.loc(1);
                    self.bump();
                    return Err(DazzleError::UnexpectedChar {
                        location: loc,
                        ch: '\t',
                    });
                }
                '\n' => {
                    self.bump();
                    self.at_line_start = true;
                    return Ok(Token {
                        kind: TokenKind::Newline,
                        location: self.loc(0),
                    });
                }
                '"' => {
                    let loc = self.loc(1);
                    self.bump();
                    let s = self.read_string()?;
                    return Ok(Token {
                        kind: TokenKind::String(s),
                        location: loc,
                    });
                }
                '0'..='9' => {
                    let loc = self.loc(1);
                    let kind = self.read_number()?;
                    return Ok(Token { kind, location: loc });
                }
                c if c.is_ascii_alphabetic() || c == '_' => {
                    let loc = self.loc(1);
                    let text = self.read_while(|c| c.is_ascii_alphanumeric() || c == '_');
                    let kind = match Keyword::lookup(&text) {
                        Some(kw) => TokenKind::Keyword(kw),
                        None => TokenKind::Ident(text),
                    };
                    return Ok(Token { kind, location: loc });
                }
                '[' => return self.single(TokenKind::LBrack),
                ']' => return self.single(TokenKind::RBrack),
                '(' => return self.single(TokenKind::LParen),
                ')' => return self.single(TokenKind::RParen),
                ':' => return self.single(TokenKind::Colon),
                ',' => return self.single(TokenKind::Comma),
                '.' => return self.single(TokenKind::Dot),
                '*' => return self.single(TokenKind::Star),
                '+' => return self.single(TokenKind::Plus),
                '=' => return self.single(TokenKind::Equals),
                '-' => {
                    let loc = self.loc(1);
                    self.bump();
                    if self.peek_char() == Some('>') {
                        self.bump();
                        return Ok(Token {
                            kind: TokenKind::Arrow,
                            location: loc,
                        });
                    }
                    return Ok(Token {
                        kind: TokenKind::Minus,
                        location: loc,
                    });
                }
                '/' => return self.single(TokenKind::Slash),
                '<' => {
                    let loc = self.loc(1);
                    self.bump();
                    if self.peek_char() == Some('=') {
                        self.bump();
                        return Ok(Token {
                            kind: TokenKind::LtEq,
                            location: loc,
                        });
                    }
                    return Ok(Token {
                        kind: TokenKind::Lt,
                        location: loc,
                    });
                }
                '>' => {
                    let loc = self.loc(1);
                    self.bump();
                    if self.peek_char() == Some('=') {
                        self.bump();
                        return Ok(Token {
                            kind: TokenKind::GtEq,
                            location: loc,
                        });
                    }
                    return Ok(Token {
                        kind: TokenKind::Gt,
                        location: loc,
                    });
                }
                '!' => {
                    let loc = self.loc(1);
                    self.bump();
                    if self.peek_char() == Some('=') {
                        self.bump();
                        return Ok(Token {
                            kind: TokenKind::NotEq,
                            location: loc,
                        });
                    }
                    return Err(DazzleError::UnexpectedChar { location: loc, ch: '!' });
                }
                '\u{2192}' => {
                    // → as an alternate spelling of ARROW (spec.md §4.1).
                    let loc = self.loc(1);
                    self.bump();
                    return Ok(Token {
                        kind: TokenKind::Arrow,
                        location: loc,
                    });
                }
                c if !c.is_ascii() => {
                    let loc = self.loc(1);
                    self.bump();
                    return Err(DazzleError::UnexpectedChar { location: loc, ch: c });
                }
                c => {
                    let loc = self.loc(1);
                    self.bump();
                    return Err(DazzleError::UnexpectedChar { location: loc, ch: c });
                }
            }
        }
    }

    fn single(&mut self, kind: TokenKind) -> DazzleResult<Token> {
        let loc = self.loc(1);
        self.bump();
        Ok(Token { kind, location: loc })
    }

    /// Tokenizes the entire source, returning the full token stream
    /// terminated by a single trailing `EOF` (spec.md §4.1 "Contract").
    #[instrument(skip(self), fields(file = %self.file.display()))]
    pub fn tokenize(mut self) -> DazzleResult<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            let tok = self.next_inner()?;
            let is_eof = matches!(tok.kind, TokenKind::Eof);
            tokens.push(tok);
            if is_eof {
                break;
            }
        }
        Ok(tokens)
    }
}

/// Lexes a single file's contents. See spec.md §6 "IR handoff" —
/// `lex_file` is one of the per-phase operations exposed for hosts doing
/// incremental work.
#[tracing::instrument(skip(source), fields(file = %file.display()))]
pub fn lex_file(source: &str, file: Arc<PathBuf>) -> DazzleResult<Vec<Token>> {
    let tokens = Lexer::new(source, file).tokenize()?;
    tracing::info!(tokens = tokens.len(), "lexing complete");
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(src: &str) -> Vec<TokenKind> {
        lex_file(src, Arc::new(PathBuf::from("t.dsl")))
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn simple_entity_header() {
        let kinds = toks("entity Task \"Task\":\n");
        assert_eq!(
            kinds,
            vec![
                TokenKind::Keyword(Keyword::Entity),
                TokenKind::Ident("Task".into()),
                TokenKind::String("Task".into()),
                TokenKind::Colon,
                TokenKind::Newline,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn indent_dedent() {
        let kinds = toks("entity Task:\n  id: uuid pk\n  title: str(200)\nentity Other:\n");
        assert_eq!(kinds[4], TokenKind::Indent);
        assert!(kinds.contains(&TokenKind::Dedent));
    }

    #[test]
    fn mixed_tabs_rejected() {
        let err = lex_file("entity Task:\n\tid: uuid pk\n", Arc::new(PathBuf::from("t.dsl")));
        assert!(matches!(err, Err(DazzleError::InvalidIndent { .. })));
    }

    #[test]
    fn inconsistent_dedent_errors() {
        let src = "entity Task:\n    id: uuid pk\n  title: str(1)\n";
        let err = lex_file(src, Arc::new(PathBuf::from("t.dsl")));
        assert!(matches!(err, Err(DazzleError::InconsistentDedent { .. })));
    }

    #[test]
    fn unterminated_string() {
        let err = lex_file("entity Task \"Task\n", Arc::new(PathBuf::from("t.dsl")));
        assert!(matches!(err, Err(DazzleError::UnterminatedString { .. })));
    }

    #[test]
    fn arrow_and_relops() {
        let kinds = toks("new -> open\na >= b\na != b\n");
        assert!(kinds.contains(&TokenKind::Arrow));
        assert!(kinds.contains(&TokenKind::GtEq));
        assert!(kinds.contains(&TokenKind::NotEq));
    }

    #[test]
    fn decimal_literal() {
        let kinds = toks("1.50\n");
        assert_eq!(kinds[0], TokenKind::Decimal("1.50".into()));
    }

    #[test]
    fn blank_and_comment_lines_do_not_affect_indent() {
        let kinds = toks("entity Task:\n  id: uuid pk\n\n  # comment\n  title: str(1)\n");
        let dedent_count = kinds.iter().filter(|k| matches!(k, TokenKind::Dedent)).count();
        let indent_count = kinds.iter().filter(|k| matches!(k, TokenKind::Indent)).count();
        assert_eq!(indent_count, 1);
        assert_eq!(dedent_count, 1);
    }
}
