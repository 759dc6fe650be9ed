//! Recursive descent parser for CTL formula text.

use crate::ctl::Formula;
use crate::lexer::Lexer;
use crate::token::{Span, Token, TokenKind};
use thiserror::Error;

/// Parser error.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("unexpected token at {span}: expected {expected}, found {found}")]
    UnexpectedToken {
        expected: String,
        found: String,
        span: Span,
    },
    #[error("unexpected end of input at {span}")]
    UnexpectedEof { span: Span },
    #[error("invalid syntax at {span}: {message}")]
    InvalidSyntax { message: String, span: Span },
}

impl ParseError {
    /// Get the span in the formula text where this error occurred.
    pub fn span(&self) -> Span {
        match self {
            ParseError::UnexpectedToken { span, .. } => *span,
            ParseError::UnexpectedEof { span } => *span,
            ParseError::InvalidSyntax { span, .. } => *span,
        }
    }
}

pub type ParseResult<T> = Result<T, ParseError>;

/// Binary operators with their binding strength.
///
/// The untils sit between the unary prefixes and `&&`, with `AU` binding
/// tighter than `EU`, so `a AU b EU c` is `(a AU b) EU c` while
/// `a EU b AU c` is `a EU (b AU c)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum BinOp {
    Iff,
    Implies,
    Or,
    And,
    ExistsUntil,
    ForAllUntil,
}

impl BinOp {
    fn precedence(self) -> u8 {
        match self {
            BinOp::Iff => 1,
            BinOp::Implies => 2,
            BinOp::Or => 3,
            BinOp::And => 4,
            BinOp::ExistsUntil => 5,
            BinOp::ForAllUntil => 6,
        }
    }

    /// The until operators associate to the right; the propositional
    /// connectives to the left.
    fn is_right_assoc(self) -> bool {
        matches!(self, BinOp::ExistsUntil | BinOp::ForAllUntil)
    }

    fn build(self, left: Formula, right: Formula) -> Formula {
        match self {
            BinOp::Iff => left.iff(right),
            BinOp::Implies => left.implies(right),
            BinOp::Or => left.or(right),
            BinOp::And => left.and(right),
            BinOp::ExistsUntil => left.eu(right),
            BinOp::ForAllUntil => left.au(right),
        }
    }
}

/// Parser for CTL formula text.
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    /// Create a new parser from formula text.
    pub fn new(source: &str) -> Self {
        Self {
            tokens: Lexer::new(source).tokenize(),
            pos: 0,
        }
    }

    /// Parse a complete formula, consuming all input.
    pub fn parse_formula(&mut self) -> ParseResult<Formula> {
        let formula = self.parse_expr(0)?;
        if !self.is_at_end() {
            return Err(self.error_at_current("end of input"));
        }
        Ok(formula)
    }

    // === Expression parsing with precedence climbing ===

    fn parse_expr(&mut self, min_prec: u8) -> ParseResult<Formula> {
        let mut left = self.parse_unary()?;

        while let Some(op) = self.peek_binop() {
            let prec = op.precedence();
            if prec < min_prec {
                break;
            }

            self.advance(); // consume operator

            // Handle right-associativity
            let next_prec = if op.is_right_assoc() { prec } else { prec + 1 };
            let right = self.parse_expr(next_prec)?;

            left = op.build(left, right);
        }

        Ok(left)
    }

    fn peek_binop(&self) -> Option<BinOp> {
        match self.peek_kind() {
            TokenKind::And => Some(BinOp::And),
            TokenKind::Or => Some(BinOp::Or),
            TokenKind::Implies => Some(BinOp::Implies),
            TokenKind::Iff => Some(BinOp::Iff),
            TokenKind::ExistsUntil => Some(BinOp::ExistsUntil),
            TokenKind::ForAllUntil => Some(BinOp::ForAllUntil),
            _ => None,
        }
    }

    /// Parse a unary prefix chain. The operand of a prefix operator is
    /// another unary expression, so `AG EF p` nests and `! a && b` parses
    /// as `(! a) && b`.
    fn parse_unary(&mut self) -> ParseResult<Formula> {
        let build: fn(Formula) -> Formula = match self.peek_kind() {
            TokenKind::Not => Formula::not,
            TokenKind::ExistsNext => Formula::ex,
            TokenKind::ForAllNext => Formula::ax,
            TokenKind::ExistsAlways => Formula::eg,
            TokenKind::ForAllAlways => Formula::ag,
            TokenKind::ExistsEventually => Formula::ef,
            TokenKind::ForAllEventually => Formula::af,
            _ => return self.parse_primary(),
        };
        self.advance();
        let operand = self.parse_unary()?;
        Ok(build(operand))
    }

    fn parse_primary(&mut self) -> ParseResult<Formula> {
        match self.peek_kind() {
            TokenKind::True => {
                self.advance();
                Ok(Formula::True)
            }
            TokenKind::False => {
                self.advance();
                Ok(Formula::False)
            }
            TokenKind::Atom(name) => {
                self.advance();
                Ok(Formula::Atom(name))
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expr(0)?;
                self.expect(TokenKind::RParen)?;
                Ok(inner)
            }
            TokenKind::Eof => Err(ParseError::UnexpectedEof {
                span: self.current_span(),
            }),
            TokenKind::Error(message) => Err(ParseError::InvalidSyntax {
                message,
                span: self.current_span(),
            }),
            found => Err(ParseError::UnexpectedToken {
                expected: "formula".to_string(),
                found: found.to_string(),
                span: self.current_span(),
            }),
        }
    }

    // === Token stream helpers ===

    fn peek(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek_kind(&self) -> TokenKind {
        self.peek().kind.clone()
    }

    fn current_span(&self) -> Span {
        self.peek().span
    }

    fn is_at_end(&self) -> bool {
        matches!(self.peek_kind(), TokenKind::Eof)
    }

    fn advance(&mut self) {
        if !self.is_at_end() {
            self.pos += 1;
        }
    }

    fn expect(&mut self, kind: TokenKind) -> ParseResult<()> {
        if self.peek_kind() == kind {
            self.advance();
            Ok(())
        } else {
            Err(self.error_at_current(&kind.to_string()))
        }
    }

    /// Report the current token as unexpected. A lexer error token is
    /// never the expectation message: it surfaces as `InvalidSyntax` with
    /// its own message and position.
    fn error_at_current(&self, expected: &str) -> ParseError {
        match self.peek_kind() {
            TokenKind::Error(message) => ParseError::InvalidSyntax {
                message,
                span: self.current_span(),
            },
            found => ParseError::UnexpectedToken {
                expected: expected.to_string(),
                found: found.to_string(),
                span: self.current_span(),
            },
        }
    }
}

/// Parse formula text into a [`Formula`].
pub fn parse(source: &str) -> ParseResult<Formula> {
    Parser::new(source).parse_formula()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(source: &str) -> Formula {
        parse(source).unwrap_or_else(|e| panic!("parse failed for {:?}: {}", source, e))
    }

    fn a() -> Formula {
        Formula::atom("a")
    }

    fn b() -> Formula {
        Formula::atom("b")
    }

    fn c() -> Formula {
        Formula::atom("c")
    }

    #[test]
    fn test_parse_literals_and_atoms() {
        assert_eq!(p("true"), Formula::True);
        assert_eq!(p("false"), Formula::False);
        assert_eq!(p("a"), a());
        assert_eq!(p("req_0"), Formula::atom("req_0"));
        assert_eq!(
            p("java.lang.Throwable.thrown"),
            Formula::atom("java.lang.Throwable.thrown")
        );
    }

    #[test]
    fn test_parse_parens() {
        assert_eq!(p("(a)"), a());
        assert_eq!(p("((a && b))"), a().and(b()));
    }

    #[test]
    fn test_parse_unary_chains() {
        assert_eq!(p("! a"), a().not());
        assert_eq!(p("! ! a"), a().not().not());
        assert_eq!(p("AX EX a"), a().ex().ax());
        assert_eq!(p("AG EF a"), a().ef().ag());
        assert_eq!(p("EG ! AF a"), a().af().not().eg());
    }

    #[test]
    fn test_and_or_precedence() {
        assert_eq!(p("a && b || c"), a().and(b()).or(c()));
        assert_eq!(p("a || b && c"), a().or(b().and(c())));
    }

    #[test]
    fn test_implies_precedence() {
        assert_eq!(p("a -> b || c"), a().implies(b().or(c())));
        assert_eq!(p("a || b -> c"), a().or(b()).implies(c()));
        assert_eq!(p("a -> b && c"), a().implies(b().and(c())));
    }

    #[test]
    fn test_iff_precedence() {
        assert_eq!(p("a <-> b -> c"), a().iff(b().implies(c())));
        assert_eq!(p("a -> b <-> c"), a().implies(b()).iff(c()));
        assert_eq!(p("AX a <-> b"), a().ax().iff(b()));
    }

    #[test]
    fn test_unary_binds_tighter_than_binary() {
        assert_eq!(p("! a && b"), a().not().and(b()));
        assert_eq!(p("AX a && b"), a().ax().and(b()));
        assert_eq!(p("EF a || EG b"), a().ef().or(b().eg()));
        assert_eq!(p("! a AU b"), a().not().au(b()));
        assert_eq!(p("a EU ! b"), a().eu(b().not()));
    }

    #[test]
    fn test_until_binds_tighter_than_and() {
        assert_eq!(p("a EU b && c"), a().eu(b()).and(c()));
        assert_eq!(p("a && b EU c"), a().and(b().eu(c())));
        assert_eq!(p("a AU b || c"), a().au(b()).or(c()));
    }

    #[test]
    fn test_until_mixed_precedence() {
        // AU binds tighter than EU.
        assert_eq!(p("a EU b AU c"), a().eu(b().au(c())));
        assert_eq!(p("a AU b EU c"), a().au(b()).eu(c()));
    }

    #[test]
    fn test_until_right_associative() {
        assert_eq!(p("a EU b EU c"), a().eu(b().eu(c())));
        assert_eq!(p("a AU b AU c"), a().au(b().au(c())));
    }

    #[test]
    fn test_left_associative_connectives() {
        assert_eq!(p("a && b && c"), a().and(b()).and(c()));
        assert_eq!(p("a || b || c"), a().or(b()).or(c()));
        assert_eq!(p("a -> b -> c"), a().implies(b()).implies(c()));
        assert_eq!(p("a <-> b <-> c"), a().iff(b()).iff(c()));
    }

    #[test]
    fn test_parens_override_precedence() {
        assert_eq!(p("a && (b || c)"), a().and(b().or(c())));
        assert_eq!(p("(a EU b) AU c"), a().eu(b()).au(c()));
        assert_eq!(p("EX (a && b)"), a().and(b()).ex());
    }

    #[test]
    fn test_larger_formula() {
        // Request/acknowledge shape: AG (req -> AF ack)
        let expected = Formula::atom("req")
            .implies(Formula::atom("ack").af())
            .ag();
        assert_eq!(p("AG (req -> AF ack)"), expected);
    }

    #[test]
    fn test_error_empty_input() {
        assert!(matches!(parse(""), Err(ParseError::UnexpectedEof { .. })));
        assert!(matches!(parse("  "), Err(ParseError::UnexpectedEof { .. })));
    }

    #[test]
    fn test_error_missing_operand() {
        assert!(matches!(
            parse("a &&"),
            Err(ParseError::UnexpectedEof { .. })
        ));
        assert!(matches!(
            parse("a EU"),
            Err(ParseError::UnexpectedEof { .. })
        ));
        assert!(matches!(parse("EF"), Err(ParseError::UnexpectedEof { .. })));
    }

    #[test]
    fn test_error_unbalanced_parens() {
        let err = parse("(a && b").unwrap_err();
        match err {
            ParseError::UnexpectedToken { expected, .. } => assert_eq!(expected, ")"),
            other => panic!("expected UnexpectedToken, got {}", other),
        }
        assert!(parse("a && b)").is_err());
    }

    #[test]
    fn test_error_trailing_input() {
        let err = parse("a b").unwrap_err();
        match err {
            ParseError::UnexpectedToken {
                expected, found, ..
            } => {
                assert_eq!(expected, "end of input");
                assert_eq!(found, "b");
            }
            other => panic!("expected UnexpectedToken, got {}", other),
        }
    }

    #[test]
    fn test_error_leading_operator() {
        assert!(matches!(
            parse("&& a"),
            Err(ParseError::UnexpectedToken { .. })
        ));
    }

    #[test]
    fn test_error_unknown_character() {
        // The lexer's message wins over the trailing-input report.
        let err = parse("a @ b").unwrap_err();
        match err {
            ParseError::InvalidSyntax { message, span } => {
                assert!(message.contains('@'), "message: {}", message);
                assert_eq!(span.column, 3);
            }
            other => panic!("expected InvalidSyntax, got {}", other),
        }
    }

    #[test]
    fn test_error_position() {
        let err = parse("a &&\n@").unwrap_err();
        let span = err.span();
        assert_eq!(span.line, 2);
        assert_eq!(span.column, 1);
    }

    #[test]
    fn test_error_incomplete_operator() {
        // `&` alone is a lexer error surfaced with its position.
        let err = parse("a & b").unwrap_err();
        match err {
            ParseError::InvalidSyntax { message, span } => {
                assert!(message.contains("&&"));
                assert_eq!(span.column, 3);
            }
            other => panic!("expected InvalidSyntax, got {}", other),
        }
    }

    #[test]
    fn test_error_token_inside_parens() {
        // Same rule at a `)` expectation point.
        let err = parse("(a & b)").unwrap_err();
        match err {
            ParseError::InvalidSyntax { message, span } => {
                assert!(message.contains("&&"));
                assert_eq!(span.column, 4);
            }
            other => panic!("expected InvalidSyntax, got {}", other),
        }
    }

    #[test]
    fn test_render_parse_round_trip() {
        let cases = vec![
            a().and(b()).or(c()).not(),
            a().eu(b().au(c())),
            a().au(b()).eu(c()),
            Formula::atom("x.y").implies(a().af()).ag(),
            Formula::True.ex().iff(Formula::False.au(b())),
        ];
        for f in cases {
            assert_eq!(p(&f.to_string()), f, "round trip failed for {}", f);
        }
    }
}
