//! Error types for the pdflex scanner.

use std::fmt;
use thiserror::Error;

/// A single code point, rendered as `U+0041 'A'` in error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CodePoint(pub char);

impl fmt::Display for CodePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "U+{:04X}", self.0 as u32)?;
        if !self.0.is_control() {
            write!(f, " '{}'", self.0)?;
        }
        Ok(())
    }
}

/// Terminal scan error.
///
/// Every variant carries `pos`, the byte offset at which the failed token
/// started. A scanner yields at most one of these and then stops.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScanError {
    #[error("unexpected array terminator")]
    UnexpectedArrayTerminator { pos: usize },

    #[error("unexpected dict terminator")]
    UnexpectedDictTerminator { pos: usize },

    #[error("unterminated array")]
    UnterminatedArray { pos: usize },

    #[error("unterminated dict")]
    UnterminatedDict { pos: usize },

    #[error("unterminated string object")]
    UnterminatedString { pos: usize },

    #[error("unterminated hexstring")]
    UnterminatedHexString { pos: usize },

    #[error("unclosed stream")]
    UnclosedStream { pos: usize },

    #[error("illegal character: {ch}")]
    IllegalCharacter { pos: usize, ch: CodePoint },

    #[error("illegal character in name: {ch}")]
    IllegalCharacterInName { pos: usize, ch: CodePoint },

    #[error("illegal character in hexstring: {ch}")]
    IllegalCharacterInHexString { pos: usize, ch: CodePoint },

    #[error("bad number syntax: {text:?}")]
    BadNumber { pos: usize, text: String },
}

impl ScanError {
    /// Byte offset of the token that failed to scan.
    pub fn pos(&self) -> usize {
        match self {
            ScanError::UnexpectedArrayTerminator { pos }
            | ScanError::UnexpectedDictTerminator { pos }
            | ScanError::UnterminatedArray { pos }
            | ScanError::UnterminatedDict { pos }
            | ScanError::UnterminatedString { pos }
            | ScanError::UnterminatedHexString { pos }
            | ScanError::UnclosedStream { pos }
            | ScanError::IllegalCharacter { pos, .. }
            | ScanError::IllegalCharacterInName { pos, .. }
            | ScanError::IllegalCharacterInHexString { pos, .. }
            | ScanError::BadNumber { pos, .. } => *pos,
        }
    }

    /// True for errors caused by unbalanced or unterminated constructs.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            ScanError::UnexpectedArrayTerminator { .. }
                | ScanError::UnexpectedDictTerminator { .. }
                | ScanError::UnterminatedArray { .. }
                | ScanError::UnterminatedDict { .. }
                | ScanError::UnterminatedString { .. }
                | ScanError::UnterminatedHexString { .. }
                | ScanError::UnclosedStream { .. }
        )
    }
}

/// Convenience Result type alias for ScanError.
pub type Result<T> = std::result::Result<T, ScanError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_point_display() {
        assert_eq!(CodePoint('A').to_string(), "U+0041 'A'");
        assert_eq!(CodePoint('\0').to_string(), "U+0000");
        assert_eq!(CodePoint('é').to_string(), "U+00E9 'é'");
    }

    #[test]
    fn test_error_messages() {
        let err = ScanError::IllegalCharacter {
            pos: 3,
            ch: CodePoint('}'),
        };
        assert_eq!(err.to_string(), "illegal character: U+007D '}'");
        assert_eq!(err.pos(), 3);
        assert!(!err.is_structural());

        let err = ScanError::BadNumber {
            pos: 0,
            text: "12.5x".into(),
        };
        assert_eq!(err.to_string(), r#"bad number syntax: "12.5x""#);

        let err = ScanError::UnclosedStream { pos: 6 };
        assert_eq!(err.to_string(), "unclosed stream");
        assert!(err.is_structural());
    }
}
