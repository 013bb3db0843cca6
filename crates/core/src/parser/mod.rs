//! PDF object-syntax scanning.
//!
//! - `chars`: character classes and rune decoding
//! - `token`: token kinds, tokens and the keyword table
//! - `lexer`: the scanning state machine

pub mod chars;
pub mod lexer;
pub mod token;

pub use lexer::{Scanner, scan_all};
pub use token::{KEYWORD_BOUNDARY, Token, TokenKind, keyword_kind};
