use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TokenKind {
    Text,
    VariableExpr, // {{ ... }}
    BlockExpr,    // {% ... %}
    Comment,      // {# ... #}
    EndOfInput,
}

/// A single lexed token. `literal` borrows from the template source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub literal: &'a str,
    /// Byte offset where the token began.
    pub position: usize,
}

impl<'a> Token<'a> {
    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::EndOfInput
    }
}

/// Opening delimiters in priority order, with their closers.
const DELIMITERS: [(&str, &str, TokenKind); 3] = [
    ("{{", "}}", TokenKind::VariableExpr),
    ("{%", "%}", TokenKind::BlockExpr),
    ("{#", "#}", TokenKind::Comment),
];

#[derive(Clone)]
pub struct Tokenizer<'a> {
    input: &'a str,
    cursor: usize,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self { input, cursor: 0 }
    }

    fn remaining(&self) -> &'a str {
        &self.input[self.cursor..]
    }

    fn advance(&mut self, n: usize) {
        self.cursor += n;
    }

    /// Produce the next token. Once the input is exhausted every call
    /// returns `EndOfInput`.
    pub fn next_token(&mut self) -> Token<'a> {
        let start = self.cursor;
        let rest = self.remaining();
        if rest.is_empty() {
            return Token {
                kind: TokenKind::EndOfInput,
                literal: "",
                position: start,
            };
        }

        for (open, close, kind) in DELIMITERS {
            if rest.starts_with(open) {
                return self.read_delimited(open, close, kind);
            }
        }

        // Text runs up to the next opener of any kind.
        let end = DELIMITERS
            .iter()
            .filter_map(|(open, _, _)| rest.find(open))
            .min()
            .unwrap_or(rest.len());
        self.advance(end);
        Token {
            kind: TokenKind::Text,
            literal: &rest[..end],
            position: start,
        }
    }

    fn read_delimited(&mut self, open: &str, close: &str, kind: TokenKind) -> Token<'a> {
        let start = self.cursor;
        let rest = self.remaining();

        match rest[open.len()..].find(close) {
            Some(idx) => {
                let interior = &rest[open.len()..open.len() + idx];
                self.advance(open.len() + idx + close.len());
                Token {
                    kind,
                    literal: interior.trim(),
                    position: start,
                }
            }
            None => {
                // Unterminated: swallow the rest of the input verbatim,
                // opener included. Not an error at this layer.
                self.advance(rest.len());
                Token {
                    kind,
                    literal: rest,
                    position: start,
                }
            }
        }
    }
}

/// Run the tokenizer to completion. The returned sequence always ends with
/// exactly one `EndOfInput` token.
pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    let mut tokenizer = Tokenizer::new(input);
    let mut tokens = Vec::new();
    loop {
        let token = tokenizer.next_token();
        let done = token.is_eof();
        tokens.push(token);
        if done {
            break;
        }
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn empty_input_is_just_eof() {
        let tokens = tokenize("");
        assert_eq!(tokens.len(), 1);
        assert!(tokens[0].is_eof());
        assert_eq!(tokens[0].position, 0);
    }

    #[test]
    fn splits_text_and_delimited_tokens() {
        let tokens = tokenize("Hi {{ name }}!{% if x %}{# c #}");
        let summary: Vec<_> = tokens.iter().map(|t| (t.kind, t.literal)).collect();
        assert_eq!(
            summary,
            vec![
                (TokenKind::Text, "Hi "),
                (TokenKind::VariableExpr, "name"),
                (TokenKind::Text, "!"),
                (TokenKind::BlockExpr, "if x"),
                (TokenKind::Comment, "c"),
                (TokenKind::EndOfInput, ""),
            ]
        );
    }

    #[test]
    fn positions_are_byte_offsets() {
        let tokens = tokenize("ab{{ x }}cd");
        let positions: Vec<_> = tokens.iter().map(|t| t.position).collect();
        assert_eq!(positions, vec![0, 2, 9, 11]);
    }

    #[test]
    fn lone_brace_stays_in_text() {
        let tokens = tokenize("a { b } c");
        assert_eq!(tokens[0].kind, TokenKind::Text);
        assert_eq!(tokens[0].literal, "a { b } c");
        assert_eq!(tokens.len(), 2);
    }

    #[test]
    fn unterminated_variable_consumes_rest() {
        let tokens = tokenize("x {{ name and more");
        assert_eq!(tokens[1].kind, TokenKind::VariableExpr);
        assert_eq!(tokens[1].literal, "{{ name and more");
        assert_eq!(tokens[1].position, 2);
        assert!(tokens[2].is_eof());
    }

    #[test]
    fn first_closer_wins() {
        // Known limitation: a closer-shaped substring ends the token early.
        let tokens = tokenize("{{ a('}}') }}");
        assert_eq!(tokens[0].literal, "a('");
        assert_eq!(tokens[1].kind, TokenKind::Text);
        assert_eq!(tokens[1].literal, "') }}");
    }

    #[test]
    fn multibyte_text_is_preserved() {
        let tokens = tokenize("こんにちは {{ x }} 🌍");
        assert_eq!(tokens[0].literal, "こんにちは ");
        assert_eq!(tokens[2].literal, " 🌍");
    }

    #[test]
    fn eof_is_sticky() {
        let mut tokenizer = Tokenizer::new("a");
        assert_eq!(tokenizer.next_token().kind, TokenKind::Text);
        assert!(tokenizer.next_token().is_eof());
        assert!(tokenizer.next_token().is_eof());
    }

    #[test]
    fn adjacent_tags() {
        assert_eq!(
            kinds("{{a}}{%b%}{#c#}"),
            vec![
                TokenKind::VariableExpr,
                TokenKind::BlockExpr,
                TokenKind::Comment,
                TokenKind::EndOfInput
            ]
        );
    }
}
