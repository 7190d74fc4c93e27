use crate::ast::*;
use crate::error::{TranspileError, Warning};
use crate::lexer::{Token, TokenKind};
use miette::SourceSpan;

/// Parses one block statement. Called with the opening block token current.
type BlockParser = fn(&mut Parser<'_>) -> Result<Node, TranspileError>;

/// Top-level block keywords. Anything not listed here is dropped.
const BLOCK_PARSERS: &[(&str, BlockParser)] = &[
    ("if", |p| p.parse_if()),
    ("for", |p| p.parse_for()),
    ("set", |p| p.parse_set()),
];

fn block_parser(keyword: &str) -> Option<BlockParser> {
    BLOCK_PARSERS
        .iter()
        .find(|(name, _)| *name == keyword)
        .map(|(_, parse)| *parse)
}

/// Leading identifier of a block literal: `if` for `if user`, `set` for `set x=1`.
fn block_keyword(literal: &str) -> &str {
    let end = literal
        .find(|c: char| !(c.is_alphanumeric() || c == '_'))
        .unwrap_or(literal.len());
    &literal[..end]
}

/// Block literal with its keyword removed.
fn block_header<'s>(literal: &'s str, keyword: &str) -> &'s str {
    literal.strip_prefix(keyword).unwrap_or(literal).trim()
}

/// Split `base | f1 | f2` into a variable. Filter arguments are not parsed.
pub fn parse_variable(input: &str) -> Variable {
    let mut parts = input.split('|');
    let base = parts.next().unwrap_or_default().trim().to_string();
    let filters = parts
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(FilterCall::new)
        .collect();
    Variable { base, filters }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Branch {
    Then,
    Else,
}

pub struct Parser<'a> {
    tokens: Vec<Token<'a>>,
    pos: usize,
    strict: bool,
    warnings: Vec<Warning>,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: Vec<Token<'a>>) -> Self {
        Self {
            tokens,
            pos: 0,
            strict: false,
            warnings: Vec::new(),
        }
    }

    /// Turn dropped blocks into `UnsupportedBlock` errors.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn into_warnings(self) -> Vec<Warning> {
        self.warnings
    }

    fn current(&self) -> Token<'a> {
        match self.tokens.get(self.pos) {
            Some(token) => *token,
            None => Token {
                kind: TokenKind::EndOfInput,
                literal: "",
                position: self.tokens.last().map_or(0, |t| t.position),
            },
        }
    }

    fn advance(&mut self) -> Token<'a> {
        let token = self.current();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    /// Source span of the current token. Tokens are contiguous, so its
    /// extent runs up to where the next one starts.
    fn current_span(&self) -> SourceSpan {
        let start = self.current().position;
        let end = self
            .tokens
            .get(self.pos + 1)
            .map_or(start, |next| next.position);
        (start, end - start).into()
    }

    pub fn parse(&mut self) -> Result<Root, TranspileError> {
        let mut children = Vec::new();
        loop {
            let token = self.current();
            match token.kind {
                TokenKind::EndOfInput => break,
                TokenKind::BlockExpr => {
                    let keyword = block_keyword(token.literal);
                    match block_parser(keyword) {
                        Some(parse_block) => children.push(parse_block(self)?),
                        None => self.drop_block(token, None)?,
                    }
                }
                _ => {
                    self.advance();
                    children.extend(leaf(token));
                }
            }
        }
        tracing::debug!(nodes = children.len(), "parsed template");
        Ok(Root { children })
    }

    /// Record (or, in strict mode, reject) a block that is not translated.
    /// Consumes the block token.
    fn drop_block(&mut self, token: Token<'a>, parent: Option<&str>) -> Result<(), TranspileError> {
        let span = self.current_span();
        self.advance();

        let keyword = match block_keyword(token.literal) {
            "" => token.literal,
            keyword => keyword,
        }
        .to_string();
        let warning = match parent {
            Some(parent) => Warning::NestedBlockDropped {
                keyword,
                parent: parent.to_string(),
                span,
            },
            None => Warning::UnknownBlock { keyword, span },
        };

        if self.strict {
            return Err(warning.into_error());
        }
        tracing::warn!(position = token.position, "{warning}");
        self.warnings.push(warning);
        Ok(())
    }

    fn parse_if(&mut self) -> Result<Node, TranspileError> {
        let span = self.current_span();
        let open = self.advance();
        let condition = block_header(open.literal, "if").to_string();

        let mut body = Vec::new();
        let mut else_body = Vec::new();
        let mut branch = Branch::Then;

        loop {
            let token = self.current();
            match token.kind {
                TokenKind::EndOfInput => {
                    return Err(TranspileError::UnterminatedControlStructure {
                        keyword: "if".to_string(),
                        span,
                    })
                }
                TokenKind::BlockExpr if token.literal == "else" => {
                    self.advance();
                    branch = Branch::Else;
                }
                TokenKind::BlockExpr if block_keyword(token.literal) == "endif" => {
                    self.advance();
                    return Ok(Node::Conditional {
                        condition,
                        body,
                        else_body,
                    });
                }
                TokenKind::BlockExpr => self.drop_block(token, Some("if"))?,
                _ => {
                    self.advance();
                    let target = match branch {
                        Branch::Then => &mut body,
                        Branch::Else => &mut else_body,
                    };
                    target.extend(leaf(token));
                }
            }
        }
    }

    fn parse_for(&mut self) -> Result<Node, TranspileError> {
        let span = self.current_span();
        let open = self.advance();
        let words: Vec<&str> = block_header(open.literal, "for").split_whitespace().collect();
        let (item, list) = match words.as_slice() {
            [item, "in", list] => (item.to_string(), list.to_string()),
            _ => {
                return Err(TranspileError::MalformedForHeader {
                    header: open.literal.to_string(),
                    span,
                })
            }
        };

        let mut body = Vec::new();
        loop {
            let token = self.current();
            match token.kind {
                TokenKind::EndOfInput => {
                    return Err(TranspileError::UnterminatedControlStructure {
                        keyword: "for".to_string(),
                        span,
                    })
                }
                TokenKind::BlockExpr if block_keyword(token.literal) == "endfor" => {
                    self.advance();
                    return Ok(Node::Iteration { item, list, body });
                }
                TokenKind::BlockExpr => self.drop_block(token, Some("for"))?,
                _ => {
                    self.advance();
                    body.extend(leaf(token));
                }
            }
        }
    }

    fn parse_set(&mut self) -> Result<Node, TranspileError> {
        let span = self.current_span();
        let open = self.advance();
        let malformed = || TranspileError::MalformedSetHeader {
            header: open.literal.to_string(),
            span,
        };

        let (left, right) = open.literal.split_once('=').ok_or_else(malformed)?;
        let name = block_header(left, "set");
        let value = right.trim();
        if name.is_empty() || name.contains(char::is_whitespace) || value.is_empty() {
            return Err(malformed());
        }

        Ok(Node::Assignment {
            name: name.to_string(),
            value: value.to_string(),
        })
    }
}

/// Text and variable tokens become nodes; comments (and anything else)
/// produce nothing.
fn leaf(token: Token<'_>) -> Option<Node> {
    match token.kind {
        TokenKind::Text => Some(Node::Text(token.literal.to_string())),
        TokenKind::VariableExpr => Some(Node::Variable(parse_variable(token.literal))),
        _ => None,
    }
}
