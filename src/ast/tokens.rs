use std::fmt;

/// A location in the source text.
///
/// `offset` counts characters from the start of the input; `line` and
/// `column` are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn start() -> Self {
        Position {
            offset: 0,
            line: 1,
            column: 1,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// A lexical unit produced by the [`Lexer`](crate::Lexer).
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Literals
    /// Integer literal
    ///
    /// # Examples
    /// ```text
    /// 42
    /// -1
    /// ```
    Integer(i64),

    /// Floating-point literal
    ///
    /// # Examples
    /// ```text
    /// 12.3
    /// -0.5
    /// ```
    Float(f64),

    /// String literal enclosed in single or double quotes
    ///
    /// # Examples
    /// ```text
    /// "seafood"
    /// 'abc'
    /// ```
    String(String),

    /// Boolean values
    ///
    /// # Examples
    /// ```text
    /// true
    /// false
    /// ```
    Boolean(bool),

    /// Nil literal
    Nil,

    // Identifiers
    /// Variable, attribute or filter name
    ///
    /// Must start with a letter or underscore, followed by letters, digits,
    /// or underscores.
    ///
    /// # Examples
    /// ```text
    /// obj
    /// empty_list
    /// ```
    Identifier(String),

    // Keywords
    /// Logical AND (word, not symbol)
    ///
    /// # Examples
    /// ```text
    /// a and b
    /// ```
    And,

    /// Logical OR (word, not symbol)
    ///
    /// # Examples
    /// ```text
    /// a or b
    /// ```
    Or,

    /// Containment test
    ///
    /// # Examples
    /// ```text
    /// "seafood" contains "foo"
    /// array contains "first"
    /// ```
    Contains,

    // Comparison
    /// Equality operator
    EqEq,

    /// Inequality operator
    NotEq,

    /// Less than
    Lt,

    /// Greater than
    Gt,

    /// Less than or equal
    LtEq,

    /// Greater than or equal
    GtEq,

    // Delimiters
    /// Dot for attribute access
    Dot,

    /// Left bracket for index access
    LBracket,

    /// Right bracket
    RBracket,

    /// Left parenthesis for grouping
    LParen,

    /// Right parenthesis
    RParen,

    /// Filter pipe
    ///
    /// # Examples
    /// ```text
    /// "seafood" | length
    /// ```
    Pipe,

    /// End of input
    Eof,
}

impl Token {
    /// Short description used in parser diagnostics.
    pub fn describe(&self) -> String {
        match self {
            Token::Integer(n) => format!("integer `{}`", n),
            Token::Float(n) => format!("float `{}`", n),
            Token::String(s) => format!("string {:?}", s),
            Token::Boolean(b) => format!("`{}`", b),
            Token::Nil => "`nil`".to_string(),
            Token::Identifier(name) => format!("identifier `{}`", name),
            Token::And => "`and`".to_string(),
            Token::Or => "`or`".to_string(),
            Token::Contains => "`contains`".to_string(),
            Token::EqEq => "`==`".to_string(),
            Token::NotEq => "`!=`".to_string(),
            Token::Lt => "`<`".to_string(),
            Token::Gt => "`>`".to_string(),
            Token::LtEq => "`<=`".to_string(),
            Token::GtEq => "`>=`".to_string(),
            Token::Dot => "`.`".to_string(),
            Token::LBracket => "`[`".to_string(),
            Token::RBracket => "`]`".to_string(),
            Token::LParen => "`(`".to_string(),
            Token::RParen => "`)`".to_string(),
            Token::Pipe => "`|`".to_string(),
            Token::Eof => "end of input".to_string(),
        }
    }
}

/// A token together with where it started in the source.
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned {
    pub token: Token,
    pub position: Position,
}
