//! Token kinds, tokens and the keyword table.

use rustc_hash::FxHashMap;
use std::borrow::Cow;
use std::fmt;
use std::sync::LazyLock;

pub const LEFT_DICT: &[u8] = b"<<";
pub const RIGHT_DICT: &[u8] = b">>";
pub const LEFT_STREAM: &[u8] = b"stream";
pub const RIGHT_STREAM: &[u8] = b"endstream";

/// Ordinal separating the plain kinds from the keyword kinds.
///
/// No token ever carries this ordinal; every kind above it is a keyword.
pub const KEYWORD_BOUNDARY: u8 = 14;

/// Kind of a scanned token.
///
/// Ordinals are stable: consumers may key off `kind as u8`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum TokenKind {
    /// Reserved for consumers that flatten [`ScanError`](crate::ScanError)s
    /// into the token stream.
    Error = 0,
    Eof = 1,
    /// PDF number (7.3.3), raw text only.
    Number = 2,
    /// Run of whitespace (7.2.2).
    Space = 3,
    LeftDict = 4,
    RightDict = 5,
    LeftArray = 6,
    RightArray = 7,
    /// Raw contents of a stream, between `stream` and `endstream`.
    StreamBody = 8,
    /// Literal string (7.3.4.2), parens included.
    String = 9,
    /// Hex string (7.3.4.3), angle brackets included.
    HexString = 10,
    /// Comment (7.2.3), without its line terminator.
    Comment = 11,
    /// Name object (7.3.5), solidus included, `#XX` escapes undecoded.
    Name = 12,
    /// Run of alphanumerics that is not a keyword.
    Word = 13,
    Obj = 15,
    EndObj = 16,
    Stream = 17,
    EndStream = 18,
    Trailer = 19,
    Xref = 20,
    StartXref = 21,
    True = 22,
    False = 23,
    Null = 24,
}

impl TokenKind {
    /// All keyword kinds, in ordinal order.
    pub const KEYWORDS: [TokenKind; 10] = [
        TokenKind::Obj,
        TokenKind::EndObj,
        TokenKind::Stream,
        TokenKind::EndStream,
        TokenKind::Trailer,
        TokenKind::Xref,
        TokenKind::StartXref,
        TokenKind::True,
        TokenKind::False,
        TokenKind::Null,
    ];

    pub fn is_keyword(self) -> bool {
        self as u8 > KEYWORD_BOUNDARY
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, TokenKind::Error | TokenKind::Eof)
    }

    pub fn from_u8(ordinal: u8) -> Option<Self> {
        Some(match ordinal {
            0 => TokenKind::Error,
            1 => TokenKind::Eof,
            2 => TokenKind::Number,
            3 => TokenKind::Space,
            4 => TokenKind::LeftDict,
            5 => TokenKind::RightDict,
            6 => TokenKind::LeftArray,
            7 => TokenKind::RightArray,
            8 => TokenKind::StreamBody,
            9 => TokenKind::String,
            10 => TokenKind::HexString,
            11 => TokenKind::Comment,
            12 => TokenKind::Name,
            13 => TokenKind::Word,
            15 => TokenKind::Obj,
            16 => TokenKind::EndObj,
            17 => TokenKind::Stream,
            18 => TokenKind::EndStream,
            19 => TokenKind::Trailer,
            20 => TokenKind::Xref,
            21 => TokenKind::StartXref,
            22 => TokenKind::True,
            23 => TokenKind::False,
            24 => TokenKind::Null,
            _ => return None,
        })
    }

    /// Short name; for keywords this is the keyword text itself.
    pub fn as_str(self) -> &'static str {
        match self {
            TokenKind::Error => "error",
            TokenKind::Eof => "eof",
            TokenKind::Number => "number",
            TokenKind::Space => "space",
            TokenKind::LeftDict => "left_dict",
            TokenKind::RightDict => "right_dict",
            TokenKind::LeftArray => "left_array",
            TokenKind::RightArray => "right_array",
            TokenKind::StreamBody => "stream_body",
            TokenKind::String => "string",
            TokenKind::HexString => "hex_string",
            TokenKind::Comment => "comment",
            TokenKind::Name => "name",
            TokenKind::Word => "word",
            TokenKind::Obj => "obj",
            TokenKind::EndObj => "endobj",
            TokenKind::Stream => "stream",
            TokenKind::EndStream => "endstream",
            TokenKind::Trailer => "trailer",
            TokenKind::Xref => "xref",
            TokenKind::StartXref => "startxref",
            TokenKind::True => "true",
            TokenKind::False => "false",
            TokenKind::Null => "null",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

static KEYWORDS: LazyLock<FxHashMap<&'static [u8], TokenKind>> = LazyLock::new(|| {
    TokenKind::KEYWORDS
        .iter()
        .map(|&kind| (kind.as_str().as_bytes(), kind))
        .collect()
});

/// Look up a reserved word. Matching is exact and case sensitive.
pub fn keyword_kind(word: &[u8]) -> Option<TokenKind> {
    KEYWORDS.get(word).copied()
}

/// A token scanned from the input.
///
/// `value` borrows the exact source bytes `[pos, pos + value.len())`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub pos: usize,
    pub value: &'a [u8],
}

impl<'a> Token<'a> {
    pub fn new(kind: TokenKind, pos: usize, value: &'a [u8]) -> Self {
        Self { kind, pos, value }
    }

    /// Offset one past the last byte of the token.
    pub fn end(&self) -> usize {
        self.pos + self.value.len()
    }

    pub fn len(&self) -> usize {
        self.value.len()
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    pub fn text(&self) -> Cow<'a, str> {
        String::from_utf8_lossy(self.value)
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}@{}: \"{}\"",
            self.kind,
            self.pos,
            self.value.escape_ascii()
        )
    }
}
