//! Transpile errors and warnings.
//!
//! Both carry a labelled byte span into the template source so the CLI can
//! render them with miette. Errors abort the call; warnings ride along with
//! a successful result.

use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

/// All fatal transpile errors. The first one encountered ends the call.
#[derive(Error, Debug, Diagnostic, Clone, PartialEq, Eq)]
pub enum TranspileError {
    /// An `if`/`for` block ran into end of input before its closer.
    #[error("unexpected end of input in {}", block_name(.keyword))]
    #[diagnostic(
        code(jinja2gotmpl::unterminated),
        help("Add `{{% end{keyword} %}}` to close this block")
    )]
    UnterminatedControlStructure {
        keyword: String,
        #[label("opened here")]
        span: SourceSpan,
    },

    #[error("invalid for syntax: {header}")]
    #[diagnostic(
        code(jinja2gotmpl::for_header),
        help("Expected `for <item> in <list>`")
    )]
    MalformedForHeader {
        header: String,
        #[label("this loop header")]
        span: SourceSpan,
    },

    #[error("invalid set statement: {header}")]
    #[diagnostic(
        code(jinja2gotmpl::set_header),
        help("Expected `set <name> = <value>`")
    )]
    MalformedSetHeader {
        header: String,
        #[label("this assignment")]
        span: SourceSpan,
    },

    /// Raised in strict mode for any block that would otherwise be dropped.
    #[error("unsupported block `{keyword}`")]
    #[diagnostic(
        code(jinja2gotmpl::unsupported_block),
        help("Only top-level `if`, `for` and `set` blocks are translated")
    )]
    UnsupportedBlock {
        keyword: String,
        #[label("dropped in strict mode")]
        span: SourceSpan,
    },
}

fn block_name(keyword: &str) -> &'static str {
    match keyword {
        "for" => "for loop",
        _ => "if block",
    }
}

impl TranspileError {
    /// Byte offset of the token that caused the error.
    pub fn position(&self) -> usize {
        match self {
            TranspileError::UnterminatedControlStructure { span, .. }
            | TranspileError::MalformedForHeader { span, .. }
            | TranspileError::MalformedSetHeader { span, .. }
            | TranspileError::UnsupportedBlock { span, .. } => span.offset(),
        }
    }
}

/// A block the parser dropped instead of translating.
#[derive(Error, Debug, Diagnostic, Clone, PartialEq, Eq)]
pub enum Warning {
    #[error("unknown block `{keyword}` dropped")]
    #[diagnostic(code(jinja2gotmpl::unknown_block), severity(Warning))]
    UnknownBlock {
        keyword: String,
        #[label("not translated")]
        span: SourceSpan,
    },

    #[error("block `{keyword}` inside `{parent}` dropped")]
    #[diagnostic(
        code(jinja2gotmpl::nested_block),
        severity(Warning),
        help("Nested control blocks are not translated")
    )]
    NestedBlockDropped {
        keyword: String,
        parent: String,
        #[label("not translated")]
        span: SourceSpan,
    },
}

impl Warning {
    pub fn keyword(&self) -> &str {
        match self {
            Warning::UnknownBlock { keyword, .. } | Warning::NestedBlockDropped { keyword, .. } => {
                keyword
            }
        }
    }

    pub fn position(&self) -> usize {
        match self {
            Warning::UnknownBlock { span, .. } | Warning::NestedBlockDropped { span, .. } => {
                span.offset()
            }
        }
    }

    /// The error this warning turns into under strict mode.
    pub fn into_error(self) -> TranspileError {
        match self {
            Warning::UnknownBlock { keyword, span }
            | Warning::NestedBlockDropped { keyword, span, .. } => {
                TranspileError::UnsupportedBlock { keyword, span }
            }
        }
    }
}
