use std::mem;

use thiserror::Error;

use crate::{
    ast::{CompareOp, Expr, LogicalOp, Position, Spanned, Token},
    lexer::{LexError, Lexer},
    value::Value,
};

/// Errors raised while turning source text into an [`Expr`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    /// The lexer rejected the input
    #[error(transparent)]
    Lex(#[from] LexError),

    /// A token that cannot appear here
    #[error("expected {expected}, found {found} at {position}")]
    UnexpectedToken {
        expected: String,
        found: String,
        position: Position,
    },

    /// Input ended while more was required
    #[error("expected {expected}, found end of input at {position}")]
    UnexpectedEof { expected: String, position: Position },

    /// Nesting exceeded [`ParserOptions::max_depth`]
    #[error("expression nests deeper than {limit} levels at {position}")]
    TooDeep { limit: usize, position: Position },
}

impl ParseError {
    pub fn position(&self) -> Position {
        match self {
            ParseError::Lex(e) => e.position,
            ParseError::UnexpectedToken { position, .. }
            | ParseError::UnexpectedEof { position, .. }
            | ParseError::TooDeep { position, .. } => *position,
        }
    }
}

/// Limits applied while parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserOptions {
    /// Deepest nesting accepted. Groups, index expressions and every link
    /// of a comparison, `contains`, accessor or filter chain count as one
    /// level. `and`/`or` chains are flat and do not count.
    pub max_depth: usize,
}

impl Default for ParserOptions {
    fn default() -> Self {
        ParserOptions { max_depth: 256 }
    }
}

pub struct Parser {
    lexer: Lexer,
    current: Spanned,
    options: ParserOptions,
    depth: usize,
}

impl Parser {
    pub fn new(lexer: Lexer) -> Result<Self, ParseError> {
        Self::with_options(lexer, ParserOptions::default())
    }

    pub fn with_options(mut lexer: Lexer, options: ParserOptions) -> Result<Self, ParseError> {
        let current = lexer.next_token()?;
        Ok(Parser {
            lexer,
            current,
            options,
            depth: 0,
        })
    }

    fn advance(&mut self) -> Result<Token, ParseError> {
        let next = self.lexer.next_token()?;
        Ok(mem::replace(&mut self.current, next).token)
    }

    fn check(&self, token: &Token) -> bool {
        mem::discriminant(&self.current.token) == mem::discriminant(token)
    }

    fn expect(&mut self, expected: Token, description: &str) -> Result<(), ParseError> {
        if !self.check(&expected) {
            return Err(self.unexpected(description));
        }
        self.advance()?;
        Ok(())
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        let position = self.current.position;
        match &self.current.token {
            Token::Eof => ParseError::UnexpectedEof {
                expected: expected.to_string(),
                position,
            },
            token => ParseError::UnexpectedToken {
                expected: expected.to_string(),
                found: token.describe(),
                position,
            },
        }
    }

    /// Adds one nesting level, failing once the limit is passed.
    fn descend(&mut self) -> Result<(), ParseError> {
        self.depth += 1;
        if self.depth > self.options.max_depth {
            return Err(ParseError::TooDeep {
                limit: self.options.max_depth,
                position: self.current.position,
            });
        }
        Ok(())
    }

    /// Parse primary expressions (atoms): literals, variables, groups
    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let leaf = match &self.current.token {
            Token::Integer(n) => Some(Expr::Literal(Value::Integer(*n))),
            Token::Float(n) => Some(Expr::Literal(Value::Float(*n))),
            Token::Boolean(b) => Some(Expr::Literal(Value::Boolean(*b))),
            Token::Nil => Some(Expr::Literal(Value::Nil)),
            Token::String(s) => Some(Expr::Literal(Value::String(s.clone()))),
            Token::Identifier(name) => Some(Expr::Variable(name.clone())),
            _ => None,
        };
        if let Some(expr) = leaf {
            self.advance()?;
            return Ok(expr);
        }

        match &self.current.token {
            Token::LParen => {
                self.advance()?;
                let inner = self.parse_expression()?;
                self.expect(Token::RParen, "`)` to close group")?;
                Ok(Expr::Group(Box::new(inner)))
            }
            _ => Err(self.unexpected("an expression")),
        }
    }

    /// Parse accessor chains: `.name` and `[index]`
    fn parse_access(&mut self) -> Result<Expr, ParseError> {
        let saved = self.depth;
        let mut expr = self.parse_primary()?;

        loop {
            if self.check(&Token::Dot) {
                self.descend()?;
                self.advance()?; // consume '.'
                let name = self.parse_attribute_name()?;
                expr = Expr::Attribute {
                    object: Box::new(expr),
                    name,
                };
            } else if self.check(&Token::LBracket) {
                self.descend()?;
                self.advance()?; // consume '['
                let index = self.parse_expression()?;
                self.expect(Token::RBracket, "`]` to close index")?;
                expr = Expr::Index {
                    object: Box::new(expr),
                    index: Box::new(index),
                };
            } else {
                break;
            }
        }

        self.depth = saved;
        Ok(expr)
    }

    /// After a dot, keywords are plain names: `obj.contains` reads a key.
    fn parse_attribute_name(&mut self) -> Result<String, ParseError> {
        let name = match &self.current.token {
            Token::Identifier(name) => name.clone(),
            Token::And => "and".to_string(),
            Token::Or => "or".to_string(),
            Token::Contains => "contains".to_string(),
            Token::Boolean(b) => b.to_string(),
            Token::Nil => "nil".to_string(),
            _ => return Err(self.unexpected("attribute name after `.`")),
        };
        self.advance()?;
        Ok(name)
    }

    /// Parse filter chains: `input | name | name`
    fn parse_filter(&mut self) -> Result<Expr, ParseError> {
        let saved = self.depth;
        let mut expr = self.parse_access()?;

        while self.check(&Token::Pipe) {
            self.descend()?;
            self.advance()?; // consume '|'
            let name = match &self.current.token {
                Token::Identifier(name) => name.clone(),
                _ => return Err(self.unexpected("filter name after `|`")),
            };
            self.advance()?;

            expr = Expr::Filter {
                input: Box::new(expr),
                name,
                args: Vec::new(),
            };
        }

        self.depth = saved;
        Ok(expr)
    }

    fn parse_relational(&mut self) -> Result<Expr, ParseError> {
        let saved = self.depth;
        let mut left = self.parse_filter()?;

        loop {
            let op = match &self.current.token {
                Token::Lt => CompareOp::LessThan,
                Token::Gt => CompareOp::GreaterThan,
                Token::LtEq => CompareOp::LessEqual,
                Token::GtEq => CompareOp::GreaterEqual,
                _ => break,
            };
            self.descend()?;
            self.advance()?;
            let right = self.parse_filter()?;

            left = Expr::Compare {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        self.depth = saved;
        Ok(left)
    }

    fn parse_equality(&mut self) -> Result<Expr, ParseError> {
        let saved = self.depth;
        let mut left = self.parse_relational()?;

        loop {
            let op = match &self.current.token {
                Token::EqEq => CompareOp::Equal,
                Token::NotEq => CompareOp::NotEqual,
                _ => break,
            };
            self.descend()?;
            self.advance()?;
            let right = self.parse_relational()?;

            left = Expr::Compare {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        self.depth = saved;
        Ok(left)
    }

    fn parse_contains(&mut self) -> Result<Expr, ParseError> {
        let saved = self.depth;
        let mut left = self.parse_equality()?;

        while self.check(&Token::Contains) {
            self.descend()?;
            self.advance()?;
            let right = self.parse_equality()?;

            left = Expr::Contains {
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        self.depth = saved;
        Ok(left)
    }

    /// `a and b and c` becomes a single node holding every operand, so
    /// chain length never adds nesting.
    fn parse_and(&mut self) -> Result<Expr, ParseError> {
        let first = self.parse_contains()?;
        if !self.check(&Token::And) {
            return Ok(first);
        }

        let mut operands = vec![first];
        while self.check(&Token::And) {
            self.advance()?;
            operands.push(self.parse_contains()?);
        }

        Ok(Expr::Logical {
            op: LogicalOp::And,
            operands,
        })
    }

    fn parse_or(&mut self) -> Result<Expr, ParseError> {
        let first = self.parse_and()?;
        if !self.check(&Token::Or) {
            return Ok(first);
        }

        let mut operands = vec![first];
        while self.check(&Token::Or) {
            self.advance()?;
            operands.push(self.parse_and()?);
        }

        Ok(Expr::Logical {
            op: LogicalOp::Or,
            operands,
        })
    }

    pub fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        let saved = self.depth;
        self.descend()?;
        let expr = self.parse_or()?;
        self.depth = saved;
        Ok(expr)
    }

    /// Parses one complete expression; anything left over is an error.
    pub fn parse(&mut self) -> Result<Expr, ParseError> {
        let expr = self.parse_expression()?;
        if !self.check(&Token::Eof) {
            return Err(self.unexpected("end of input"));
        }
        Ok(expr)
    }
}

/// Parses `source` into an expression tree.
///
/// # Examples
///
/// ```
/// use dram::{Expr, parse};
///
/// let expr = parse("obj.b.c").unwrap();
/// assert!(matches!(expr, Expr::Attribute { .. }));
/// ```
#[tracing::instrument(level = "trace", skip_all)]
pub fn parse(source: &str) -> Result<Expr, ParseError> {
    parse_with_options(source, ParserOptions::default())
}

pub fn parse_with_options(source: &str, options: ParserOptions) -> Result<Expr, ParseError> {
    tracing::trace!(source, "parsing expression");
    let mut parser = Parser::with_options(Lexer::new(source), options)?;
    let expr = parser.parse()?;
    tracing::trace!(depth = expr.depth(), "parsed expression");
    Ok(expr)
}
