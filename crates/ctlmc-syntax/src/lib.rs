//! Lexer, parser, and formula types for the CTL input language.

pub mod ctl;
pub mod lexer;
pub mod ltl;
pub mod parser;
pub mod token;

pub use ctl::Formula;
pub use lexer::Lexer;
pub use ltl::LtlFormula;
pub use parser::{parse, ParseError, ParseResult, Parser};
pub use token::{Span, Token, TokenKind};
