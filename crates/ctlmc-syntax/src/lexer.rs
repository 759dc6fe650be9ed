//! Lexer for CTL formula text.
//!
//! Converts formula text into a stream of tokens.

use crate::token::{Span, Token, TokenKind};
use std::str::Chars;

/// Lexer for CTL formulas.
pub struct Lexer<'a> {
    /// Formula text being lexed.
    source: &'a str,
    /// Character iterator.
    chars: Chars<'a>,
    /// Current byte position.
    pos: usize,
    /// Current line number (1-indexed).
    line: u32,
    /// Current column number (1-indexed).
    column: u32,
    /// Start position of current token.
    token_start: usize,
    /// Start line of current token.
    token_start_line: u32,
    /// Start column of current token.
    token_start_column: u32,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given formula text.
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.chars(),
            pos: 0,
            line: 1,
            column: 1,
            token_start: 0,
            token_start_line: 1,
            token_start_column: 1,
        }
    }

    /// Tokenize the entire input, returning all tokens including EOF.
    pub fn tokenize(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let is_eof = token.is_eof();
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        tokens
    }

    /// Get the next token.
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();
        self.mark_token_start();

        let Some(c) = self.peek() else {
            return self.make_token(TokenKind::Eof);
        };

        // Atomic proposition, keyword, or temporal operator
        if c.is_alphabetic() || c == '_' {
            return self.lex_word();
        }

        self.lex_operator_or_punctuation()
    }

    /// Skip whitespace characters.
    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Mark the start of a new token.
    fn mark_token_start(&mut self) {
        self.token_start = self.pos;
        self.token_start_line = self.line;
        self.token_start_column = self.column;
    }

    /// Peek at the current character without consuming it.
    fn peek(&self) -> Option<char> {
        self.chars.clone().next()
    }

    /// Peek at the next character (after current) without consuming.
    fn peek_next(&self) -> Option<char> {
        let mut chars = self.chars.clone();
        chars.next();
        chars.next()
    }

    /// Advance to the next character, returning the current one.
    fn advance(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    /// Create a token with the current span.
    fn make_token(&self, kind: TokenKind) -> Token {
        Token::new(
            kind,
            Span::new(
                self.token_start,
                self.pos,
                self.token_start_line,
                self.token_start_column,
            ),
        )
    }

    /// Get the text of the current token.
    fn token_text(&self) -> &'a str {
        &self.source[self.token_start..self.pos]
    }

    /// Lex a word: a dotted identifier which is either an operator keyword
    /// (`EX`, `AU`, `true`, ...) or an atomic proposition.
    ///
    /// Atomic propositions are identifier segments joined by `.`, matching
    /// the qualified-field names the exploration side labels states with.
    /// The keyword table is consulted with the whole lexeme, so longest
    /// match wins: `EX` is an operator, `EXt` and `EX.f` are atoms.
    fn lex_word(&mut self) -> Token {
        self.lex_segment();

        // Dotted continuation: only consume a dot when an identifier
        // segment follows, so `a.` leaves the dot for error reporting.
        while self.peek() == Some('.')
            && self
                .peek_next()
                .is_some_and(|c| c.is_alphabetic() || c == '_')
        {
            self.advance();
            self.lex_segment();
        }

        let text = self.token_text();
        if let Some(keyword) = TokenKind::keyword(text) {
            self.make_token(keyword)
        } else {
            self.make_token(TokenKind::Atom(text.to_string()))
        }
    }

    /// Lex one identifier segment.
    fn lex_segment(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Lex an operator or punctuation.
    fn lex_operator_or_punctuation(&mut self) -> Token {
        let c = match self.advance() {
            Some(c) => c,
            None => return self.make_token(TokenKind::Eof),
        };

        match c {
            '(' => self.make_token(TokenKind::LParen),
            ')' => self.make_token(TokenKind::RParen),
            '!' => self.make_token(TokenKind::Not),
            '&' => {
                if self.peek() == Some('&') {
                    self.advance();
                    self.make_token(TokenKind::And)
                } else {
                    self.make_token(TokenKind::Error("expected `&&`".to_string()))
                }
            }
            '|' => {
                if self.peek() == Some('|') {
                    self.advance();
                    self.make_token(TokenKind::Or)
                } else {
                    self.make_token(TokenKind::Error("expected `||`".to_string()))
                }
            }
            '-' => {
                if self.peek() == Some('>') {
                    self.advance();
                    self.make_token(TokenKind::Implies)
                } else {
                    self.make_token(TokenKind::Error("expected `->`".to_string()))
                }
            }
            '<' => {
                if self.peek() == Some('-') && self.peek_next() == Some('>') {
                    self.advance();
                    self.advance();
                    self.make_token(TokenKind::Iff)
                } else {
                    self.make_token(TokenKind::Error("expected `<->`".to_string()))
                }
            }
            _ => self.make_token(TokenKind::Error(format!("unexpected character: {}", c))),
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        let token = self.next_token();
        if token.is_eof() {
            None
        } else {
            Some(token)
        }
    }
}
