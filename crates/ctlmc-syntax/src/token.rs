//! Token types and source span tracking for the CTL lexer.

use std::fmt;

/// Position of a lexeme in the formula text.
///
/// Carries the byte range (what diagnostic labels underline) and the
/// 1-indexed line/column (the `line:column` in error messages).
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Span {
    /// First byte of the lexeme.
    pub start: usize,
    /// One past the last byte of the lexeme.
    pub end: usize,
    /// 1-indexed line.
    pub line: u32,
    /// 1-indexed column, counted in characters not bytes.
    pub column: u32,
}

impl Span {
    pub fn new(start: usize, end: usize, line: u32, column: u32) -> Self {
        Self {
            start,
            end,
            line,
            column,
        }
    }

    /// Lexeme length in bytes.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// The kind of token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TokenKind {
    // === Boolean literals ===
    /// `true`
    True,
    /// `false`
    False,

    // === Propositional operators ===
    /// `!`
    Not,
    /// `&&`
    And,
    /// `||`
    Or,
    /// `->`
    Implies,
    /// `<->`
    Iff,

    // === Temporal operators ===
    /// `EX` (exists next)
    ExistsNext,
    /// `AX` (for-all next)
    ForAllNext,
    /// `EG` (exists always)
    ExistsAlways,
    /// `AG` (for-all always)
    ForAllAlways,
    /// `EF` (exists eventually)
    ExistsEventually,
    /// `AF` (for-all eventually)
    ForAllEventually,
    /// `EU` (exists until, binary infix)
    ExistsUntil,
    /// `AU` (for-all until, binary infix)
    ForAllUntil,

    // === Punctuation ===
    /// `(`
    LParen,
    /// `)`
    RParen,

    // === Atoms ===
    /// Atomic proposition: dotted identifier such as `Account.overdrawn`.
    Atom(String),

    // === Special ===
    /// End of input.
    Eof,
    /// Lexer error carrying a message; surfaced by the parser with position.
    Error(String),
}

impl TokenKind {
    /// Get the operator/keyword token for a given lexeme, if any.
    ///
    /// Lookup uses the whole lexeme, so `EXe` or `EX.f` stay atoms while
    /// `EX` is an operator. Matching is case-sensitive.
    pub fn keyword(lexeme: &str) -> Option<TokenKind> {
        Some(match lexeme {
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            "EX" => TokenKind::ExistsNext,
            "AX" => TokenKind::ForAllNext,
            "EG" => TokenKind::ExistsAlways,
            "AG" => TokenKind::ForAllAlways,
            "EF" => TokenKind::ExistsEventually,
            "AF" => TokenKind::ForAllEventually,
            "EU" => TokenKind::ExistsUntil,
            "AU" => TokenKind::ForAllUntil,
            _ => return None,
        })
    }

    /// Check if this token is a unary prefix operator.
    pub fn is_unary(&self) -> bool {
        matches!(
            self,
            TokenKind::Not
                | TokenKind::ExistsNext
                | TokenKind::ForAllNext
                | TokenKind::ExistsAlways
                | TokenKind::ForAllAlways
                | TokenKind::ExistsEventually
                | TokenKind::ForAllEventually
        )
    }

    /// Check if this token is a binary infix operator.
    pub fn is_binary(&self) -> bool {
        matches!(
            self,
            TokenKind::And
                | TokenKind::Or
                | TokenKind::Implies
                | TokenKind::Iff
                | TokenKind::ExistsUntil
                | TokenKind::ForAllUntil
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::True => write!(f, "true"),
            TokenKind::False => write!(f, "false"),
            TokenKind::Not => write!(f, "!"),
            TokenKind::And => write!(f, "&&"),
            TokenKind::Or => write!(f, "||"),
            TokenKind::Implies => write!(f, "->"),
            TokenKind::Iff => write!(f, "<->"),
            TokenKind::ExistsNext => write!(f, "EX"),
            TokenKind::ForAllNext => write!(f, "AX"),
            TokenKind::ExistsAlways => write!(f, "EG"),
            TokenKind::ForAllAlways => write!(f, "AG"),
            TokenKind::ExistsEventually => write!(f, "EF"),
            TokenKind::ForAllEventually => write!(f, "AF"),
            TokenKind::ExistsUntil => write!(f, "EU"),
            TokenKind::ForAllUntil => write!(f, "AU"),
            TokenKind::LParen => write!(f, "("),
            TokenKind::RParen => write!(f, ")"),
            TokenKind::Atom(s) => write!(f, "{}", s),
            TokenKind::Eof => write!(f, "end of input"),
            TokenKind::Error(msg) => write!(f, "ERROR: {}", msg),
        }
    }
}

/// A token with its span in the formula text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    /// The kind of token.
    pub kind: TokenKind,
    /// The span in the formula text.
    pub span: Span,
}

impl Token {
    /// Create a new token.
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Check if this is the end of input.
    pub fn is_eof(&self) -> bool {
        matches!(self.kind, TokenKind::Eof)
    }
}
