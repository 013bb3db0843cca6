//! pdflex - a streaming lexical scanner for PDF object syntax.
//!
//! Turns raw PDF bytes into numbers, names, dict and array delimiters,
//! literal and hex strings, comments, stream bodies and keywords. No object
//! graph is built, no cross-reference table is read and stream data is
//! never decoded.

pub mod error;
pub mod parser;

pub use error::{CodePoint, Result, ScanError};
pub use parser::{KEYWORD_BOUNDARY, Scanner, Token, TokenKind, keyword_kind, scan_all};
