use crate::ParseError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TokenKind<'a> {
    Ident(&'a str),
    Integer(u32),
    Star,
    Slash,
    /// Either `^` or `**`.
    Power,
    Minus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Token<'a> {
    pub kind: TokenKind<'a>,
    pub offset: usize,
}

/// Splits a unit expression into tokens.
///
/// Whitespace between tokens is skipped. Any character outside the unit
/// grammar, including parentheses and decimal points, is rejected with its
/// byte offset.
pub(crate) struct Lexer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    pub(crate) fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    /// Tokenizes the whole input.
    pub(crate) fn tokenize(mut self) -> Result<Vec<Token<'a>>, ParseError> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token()? {
            tokens.push(token);
        }
        Ok(tokens)
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            self.pos += c.len_utf8();
        }
        &self.input[start..self.pos]
    }

    fn next_token(&mut self) -> Result<Option<Token<'a>>, ParseError> {
        self.take_while(char::is_whitespace);

        let offset = self.pos;
        let Some(c) = self.peek() else {
            return Ok(None);
        };

        let kind = match c {
            '*' => {
                self.pos += 1;
                if self.peek() == Some('*') {
                    self.pos += 1;
                    TokenKind::Power
                } else {
                    TokenKind::Star
                }
            }
            '^' => {
                self.pos += 1;
                TokenKind::Power
            }
            '/' => {
                self.pos += 1;
                TokenKind::Slash
            }
            '-' => {
                self.pos += 1;
                TokenKind::Minus
            }
            c if c.is_ascii_digit() => {
                let digits = self.take_while(|c| c.is_ascii_digit());
                let value = digits
                    .parse()
                    .map_err(|_| ParseError::InvalidExponent {
                        input: self.input.to_string(),
                    })?;
                TokenKind::Integer(value)
            }
            c if c.is_alphabetic() || c == '_' => {
                TokenKind::Ident(self.take_while(|c| c.is_alphanumeric() || c == '_'))
            }
            found => {
                return Err(ParseError::UnexpectedChar {
                    input: self.input.to_string(),
                    found,
                    offset,
                });
            }
        };

        Ok(Some(Token { kind, offset }))
    }
}
