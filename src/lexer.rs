use thiserror::Error;

pub use crate::ast::Position;
use crate::ast::{Spanned, Token};

/// Errors raised while splitting source text into tokens.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind} at {position}")]
pub struct LexError {
    pub kind: LexErrorKind,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LexErrorKind {
    /// A quote was opened but never closed
    #[error("unterminated string literal")]
    UnterminatedString,

    /// A character that starts no token
    #[error("unexpected character {0:?}")]
    UnexpectedCharacter(char),

    /// Digits that do not fit the numeric types
    #[error("invalid number `{0}`")]
    InvalidNumber(String),
}

/// On-demand tokenizer.
///
/// Tokens are produced one at a time as the parser asks for them. The lexer
/// can also be drained as an iterator, which stops after the last token or
/// the first error.
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
    finished: bool,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            input: input.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
            finished: false,
        }
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_char(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }

    fn advance(&mut self) {
        if let Some(ch) = self.current_char() {
            self.position += 1;
            if ch == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
    }

    fn here(&self) -> Position {
        Position {
            offset: self.position,
            line: self.line,
            column: self.column,
        }
    }

    fn error(&self, kind: LexErrorKind, position: Position) -> LexError {
        LexError { kind, position }
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.current_char() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn read_identifier(&mut self) -> String {
        let mut result = String::new();
        while let Some(ch) = self.current_char() {
            if ch.is_alphanumeric() || ch == '_' {
                result.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        result
    }

    /// Reads up to the matching quote. No escape sequences are recognized.
    fn read_string(&mut self, quote: char) -> Result<String, LexError> {
        let start = self.here();
        let mut result = String::new();
        self.advance(); // opening quote

        while let Some(ch) = self.current_char() {
            self.advance();
            if ch == quote {
                return Ok(result);
            }
            result.push(ch);
        }

        Err(self.error(LexErrorKind::UnterminatedString, start))
    }

    fn read_number(&mut self) -> Result<Token, LexError> {
        let start = self.here();
        let mut number = String::new();
        let mut is_float = false;

        if self.current_char() == Some('-') {
            number.push('-');
            self.advance();
        }

        while let Some(ch) = self.current_char() {
            if ch.is_ascii_digit() {
                number.push(ch);
                self.advance();
            } else if ch == '.'
                && !is_float
                && self.peek_char(1).is_some_and(|c| c.is_ascii_digit())
            {
                is_float = true;
                number.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        let token = if is_float {
            number.parse::<f64>().ok().map(Token::Float)
        } else {
            number.parse::<i64>().ok().map(Token::Integer)
        };
        token.ok_or_else(|| self.error(LexErrorKind::InvalidNumber(number), start))
    }

    /// Produces the next token. Once the input is exhausted every further
    /// call returns [`Token::Eof`].
    pub fn next_token(&mut self) -> Result<Spanned, LexError> {
        self.skip_whitespace();
        let position = self.here();

        let token = match self.current_char() {
            None => Token::Eof,
            Some('.') => {
                self.advance();
                Token::Dot
            }
            Some('|') => {
                self.advance();
                Token::Pipe
            }
            Some('(') => {
                self.advance();
                Token::LParen
            }
            Some(')') => {
                self.advance();
                Token::RParen
            }
            Some('[') => {
                self.advance();
                Token::LBracket
            }
            Some(']') => {
                self.advance();
                Token::RBracket
            }
            Some('=') => {
                if self.peek_char(1) == Some('=') {
                    self.advance();
                    self.advance();
                    Token::EqEq
                } else {
                    return Err(self.error(LexErrorKind::UnexpectedCharacter('='), position));
                }
            }
            Some('!') => {
                if self.peek_char(1) == Some('=') {
                    self.advance();
                    self.advance();
                    Token::NotEq
                } else {
                    return Err(self.error(LexErrorKind::UnexpectedCharacter('!'), position));
                }
            }
            Some('>') => {
                if self.peek_char(1) == Some('=') {
                    self.advance();
                    self.advance();
                    Token::GtEq
                } else {
                    self.advance();
                    Token::Gt
                }
            }
            Some('<') => {
                if self.peek_char(1) == Some('=') {
                    self.advance();
                    self.advance();
                    Token::LtEq
                } else {
                    self.advance();
                    Token::Lt
                }
            }
            Some(quote @ ('"' | '\'')) => Token::String(self.read_string(quote)?),
            Some('-') if self.peek_char(1).is_some_and(|c| c.is_ascii_digit()) => {
                self.read_number()?
            }
            Some(ch) if ch.is_ascii_digit() => self.read_number()?,
            Some(ch) if ch.is_alphabetic() || ch == '_' => {
                let ident = self.read_identifier();

                match ident.as_str() {
                    "and" => Token::And,
                    "or" => Token::Or,
                    "contains" => Token::Contains,
                    "true" => Token::Boolean(true),
                    "false" => Token::Boolean(false),
                    "nil" => Token::Nil,
                    _ => Token::Identifier(ident),
                }
            }
            Some(ch) => return Err(self.error(LexErrorKind::UnexpectedCharacter(ch), position)),
        };

        Ok(Spanned { token, position })
    }
}

impl Iterator for Lexer {
    type Item = Result<Spanned, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.next_token() {
            Ok(Spanned {
                token: Token::Eof, ..
            }) => {
                self.finished = true;
                None
            }
            Ok(spanned) => Some(Ok(spanned)),
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}

impl std::iter::FusedIterator for Lexer {}

/// Splits `text` into its tokens, excluding the final end-of-input marker.
pub fn tokenize(text: &str) -> Result<Vec<Spanned>, LexError> {
    Lexer::new(text).collect()
}
