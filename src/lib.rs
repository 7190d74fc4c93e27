//! jinja2gotmpl: translate Jinja-style templates into Go `text/template`
//! source.
//!
//! This is a source-to-source transpiler, not a template engine: nothing is
//! rendered. The output is handed to a Go template runtime (with sprig-style
//! `dict`/`add` helpers) later.
//!
//! Supported subset:
//! - Literal text, copied verbatim.
//! - `{{ path }}` and `{{ path | filter | ... }}` (filter names only).
//! - `{% if cond %} ... {% else %} ... {% endif %}` with an opaque condition.
//! - `{% for item in list %} ... {% endfor %}`, including `loop.index`,
//!   `loop.index0`, `loop.first`, `loop.last` and `loop.length`.
//! - `{% set name = value %}` with an opaque value.
//! - `{# comments #}`, which are dropped.
//!
//! Not supported:
//! - Nested blocks inside `if`/`for` bodies (dropped with a warning).
//! - Macros, includes, `extends`, whitespace control.
//! - Expression parsing: conditions and values are passed through as-is.
//!
//! ```ignore
//! let out = jinja2gotmpl::transpile("{% if user %}Hi {{ user.name | upper }}{% endif %}")?;
//! assert_eq!(out, "{{ if user }}Hi {{ upper .user.name }}{{ end }}");
//! ```

pub mod ast;
pub mod codegen;
pub mod error;
pub mod lexer;
pub mod parser;

pub use ast::{FilterCall, Node, Root, Variable};
pub use error::{TranspileError, Warning};

use lexer::tokenize;
use parser::Parser;

/// Transpile options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Options {
    strict: bool,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail on blocks that would otherwise be dropped with a warning.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }
}

/// A successful transpile: the Go template plus anything that was dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transpiled {
    pub output: String,
    pub warnings: Vec<Warning>,
}

/// Parse a template into its AST, collecting warnings for dropped blocks.
pub fn parse(source: &str, options: &Options) -> Result<(Root, Vec<Warning>), TranspileError> {
    let tokens = tokenize(source);
    tracing::debug!(tokens = tokens.len(), "tokenized template");

    let mut parser = Parser::new(tokens).strict(options.is_strict());
    let root = parser.parse()?;
    Ok((root, parser.into_warnings()))
}

/// Transpile with explicit options, keeping the warnings.
pub fn transpile_with(source: &str, options: &Options) -> Result<Transpiled, TranspileError> {
    let (root, warnings) = parse(source, options)?;
    let output = codegen::generate(&root);
    Ok(Transpiled { output, warnings })
}

/// Transpile with default options. Warnings are only logged.
pub fn transpile(source: &str) -> Result<String, TranspileError> {
    transpile_with(source, &Options::default()).map(|t| t.output)
}
