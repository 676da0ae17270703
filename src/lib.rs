//! The DAZZLE front-end compiler: lexer, parser, module loader, linker,
//! and validator for the `.dsl` language, producing an immutable `AppSpec`
//! intermediate representation consumed by downstream code generators and
//! the runtime. See `compile` for the single synchronous entrypoint.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod compile;
pub mod error;
pub mod ir;
pub mod lexer;
pub mod linker;
pub mod loader;
pub mod location;
pub mod manifest;
pub mod parser;
pub mod serializer;
pub mod validator;

pub use compile::compile;
pub use error::{DazzleError, DazzleResult, Diagnostic, Diagnostics, Severity};
pub use ir::AppSpec;
pub use lexer::lex_file;
pub use linker::link;
pub use manifest::Manifest;
pub use parser::parse_module;
pub use validator::validate;
