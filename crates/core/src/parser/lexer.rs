//! PDF object-syntax scanner.
//!
//! A state machine in the style of `text/template/parse`: every lexical
//! context has its own state function which consumes one token's worth of
//! input, emits at most one item and names the next state. The scanner is
//! pull driven; each call to [`Iterator::next`] runs states until one item is
//! ready, so nothing is buffered beyond that item and a consumer can drop the
//! scanner at any point.
//!
//! ```
//! use pdflex_core::{Scanner, TokenKind};
//!
//! let kinds: Vec<TokenKind> = Scanner::new("inline", b"<< /Type /Catalog >>")
//!     .map(|item| item.map(|token| token.kind))
//!     .collect::<Result<_, _>>()
//!     .unwrap();
//! assert_eq!(kinds[0], TokenKind::LeftDict);
//! assert_eq!(*kinds.last().unwrap(), TokenKind::Eof);
//! ```

use super::chars::{
    DIGITS, decode_rune, is_alphanumeric, is_boundary, is_delimiter, is_name_char, is_space,
};
use super::token::{LEFT_DICT, RIGHT_DICT, RIGHT_STREAM, Token, TokenKind, keyword_kind};
use crate::error::{CodePoint, Result, ScanError};
use memchr::memmem;
use tracing::{debug, trace};

/// Lexing context the scanner will enter next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Default,
    Space,
    Name,
    Number,
    String,
    HexString,
    Comment,
    LeftDict,
    RightDict,
    Word,
    StreamBody,
    EndStream,
}

/// Streaming scanner over one PDF document.
///
/// Yields `Ok(Token)` items in increasing offset order and finishes with
/// exactly one terminal item: an [`TokenKind::Eof`] token or an `Err`.
/// The iterator is fused afterwards.
///
/// Nesting is tracked with two counters rather than a stack, so `<< ]` and
/// `[ >>` are not reported as mismatched; only a closer without any opener
/// of its own kind is.
pub struct Scanner<'a> {
    /// Name of the input, used only in diagnostics.
    name: String,
    input: &'a [u8],
    /// `None` once the terminal item has been produced.
    state: Option<State>,
    pos: usize,
    start: usize,
    /// Width of the last rune read by `next_char`.
    width: usize,
    /// Start offset of the last item handed to the consumer.
    last_pos: usize,
    array_depth: usize,
    dict_depth: usize,
    item: Option<Result<Token<'a>>>,
}

impl<'a> Scanner<'a> {
    pub fn new(name: impl Into<String>, input: &'a [u8]) -> Self {
        Self {
            name: name.into(),
            input,
            state: Some(State::Default),
            pos: 0,
            start: 0,
            width: 0,
            last_pos: 0,
            array_depth: 0,
            dict_depth: 0,
            item: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current byte offset of the scan.
    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn array_depth(&self) -> usize {
        self.array_depth
    }

    pub fn dict_depth(&self) -> usize {
        self.dict_depth
    }

    /// Whether the terminal item has been produced.
    pub fn is_finished(&self) -> bool {
        self.state.is_none() && self.item.is_none()
    }

    /// Line of the most recently returned item, counting from 1.
    ///
    /// Based on the item's start offset rather than the scan position, so
    /// lookahead never counts a line twice.
    pub fn line_number(&self) -> usize {
        1 + memchr::memchr_iter(b'\n', &self.input[..self.last_pos]).count()
    }

    // Input primitives

    /// Consume and return the next rune, `None` at end of input.
    fn next_char(&mut self) -> Option<char> {
        match decode_rune(&self.input[self.pos..]) {
            Some((c, width)) => {
                self.width = width;
                self.pos += width;
                Some(c)
            }
            None => {
                self.width = 0;
                None
            }
        }
    }

    /// Step back over the last rune. Only valid once per `next_char`.
    fn backup(&mut self) {
        self.pos -= self.width;
    }

    fn peek(&mut self) -> Option<char> {
        let c = self.next_char();
        self.backup();
        c
    }

    /// Consume the next rune if it is in `valid`.
    fn accept(&mut self, valid: &str) -> bool {
        if let Some(c) = self.next_char()
            && valid.contains(c)
        {
            return true;
        }
        self.backup();
        false
    }

    fn accept_run(&mut self, valid: &str) {
        while self.accept(valid) {}
    }

    /// Jump forward by `n` bytes of known ASCII content.
    fn skip(&mut self, n: usize) {
        self.pos += n;
        self.width = 0;
    }

    fn emit(&mut self, kind: TokenKind) {
        let token = Token::new(kind, self.start, &self.input[self.start..self.pos]);
        trace!(kind = %token.kind, pos = token.pos, len = token.len(), "token");
        self.item = Some(Ok(token));
        self.start = self.pos;
    }

    /// Record a terminal error and stop the machine.
    fn fail(&mut self, err: ScanError) -> Option<State> {
        self.item = Some(Err(err));
        None
    }

    fn step(&mut self, state: State) -> Option<State> {
        match state {
            State::Default => self.lex_default(),
            State::Space => self.lex_space(),
            State::Name => self.lex_name(),
            State::Number => self.lex_number(),
            State::String => self.lex_string(),
            State::HexString => self.lex_hex_string(),
            State::Comment => self.lex_comment(),
            State::LeftDict => self.lex_left_dict(),
            State::RightDict => self.lex_right_dict(),
            State::Word => self.lex_word(),
            State::StreamBody => self.lex_stream_body(),
            State::EndStream => self.lex_end_stream(),
        }
    }

    // State functions

    /// Main state. The same rules apply at the top level and inside
    /// dicts and arrays.
    fn lex_default(&mut self) -> Option<State> {
        let Some(c) = self.next_char() else {
            return self.lex_eof();
        };
        match c {
            c if is_space(c) => Some(State::Space),
            '/' => Some(State::Name),
            '+' | '-' | '.' | '0'..='9' => {
                self.backup();
                Some(State::Number)
            }
            c if is_alphanumeric(c) => Some(State::Word),
            '(' => Some(State::String),
            '<' => {
                if self.peek() == Some('<') {
                    self.backup();
                    Some(State::LeftDict)
                } else {
                    Some(State::HexString)
                }
            }
            '[' => {
                self.array_depth += 1;
                self.emit(TokenKind::LeftArray);
                Some(State::Default)
            }
            ']' => match self.array_depth.checked_sub(1) {
                Some(depth) => {
                    self.array_depth = depth;
                    self.emit(TokenKind::RightArray);
                    Some(State::Default)
                }
                None => self.fail(ScanError::UnexpectedArrayTerminator { pos: self.start }),
            },
            '%' => Some(State::Comment),
            '>' if self.peek() == Some('>') => {
                self.backup();
                Some(State::RightDict)
            }
            c => self.fail(ScanError::IllegalCharacter {
                pos: self.start,
                ch: CodePoint(c),
            }),
        }
    }

    fn lex_eof(&mut self) -> Option<State> {
        if self.array_depth > 0 {
            return self.fail(ScanError::UnterminatedArray { pos: self.start });
        }
        if self.dict_depth > 0 {
            return self.fail(ScanError::UnterminatedDict { pos: self.start });
        }
        self.emit(TokenKind::Eof);
        None
    }

    /// Run of whitespace, the first rune of which has been consumed.
    fn lex_space(&mut self) -> Option<State> {
        while self.peek().is_some_and(is_space) {
            self.next_char();
        }
        self.emit(TokenKind::Space);
        Some(State::Default)
    }

    /// Name object; the solidus has been consumed. Unprintable bytes must be
    /// written as `#XX`, which is left undecoded.
    fn lex_name(&mut self) -> Option<State> {
        loop {
            match self.next_char() {
                Some(c) if is_delimiter(c) || is_space(c) => {
                    self.backup();
                    break;
                }
                None => break,
                Some(c) if is_name_char(c) => {}
                Some(c) => {
                    return self.fail(ScanError::IllegalCharacterInName {
                        pos: self.start,
                        ch: CodePoint(c),
                    });
                }
            }
        }
        self.emit(TokenKind::Name);
        Some(State::Default)
    }

    fn lex_number(&mut self) -> Option<State> {
        if !self.scan_number() {
            let text = String::from_utf8_lossy(&self.input[self.start..self.pos]).into_owned();
            return self.fail(ScanError::BadNumber {
                pos: self.start,
                text,
            });
        }
        self.emit(TokenKind::Number);
        Some(State::Default)
    }

    /// Optional sign, digits, optional point and digits. On failure the
    /// offending rune is consumed so it shows up in the error text.
    fn scan_number(&mut self) -> bool {
        self.accept("+-");
        self.accept_run(DIGITS);
        if self.accept(".") {
            self.accept_run(DIGITS);
        }
        if is_boundary(self.peek()) {
            return true;
        }
        self.next_char();
        false
    }

    /// Literal string; the opening paren has been consumed. Balanced parens
    /// nest and `\(` or `\)` never affect the balance. No other escape is
    /// interpreted, so a backslash before anything else is plain content.
    fn lex_string(&mut self) -> Option<State> {
        let mut balance = 1usize;
        loop {
            match self.next_char() {
                Some('\\') => {
                    self.accept("()");
                }
                Some('(') => balance += 1,
                Some(')') => {
                    balance -= 1;
                    if balance == 0 {
                        self.emit(TokenKind::String);
                        return Some(State::Default);
                    }
                }
                Some(_) => {}
                None => return self.fail(ScanError::UnterminatedString { pos: self.start }),
            }
        }
    }

    /// Hex string: hex digits and whitespace up to `>`. The `<` has been
    /// consumed.
    fn lex_hex_string(&mut self) -> Option<State> {
        loop {
            match self.next_char() {
                Some(c) if c.is_ascii_hexdigit() || is_space(c) => {}
                Some('>') => {
                    self.emit(TokenKind::HexString);
                    return Some(State::Default);
                }
                Some(c) => {
                    return self.fail(ScanError::IllegalCharacterInHexString {
                        pos: self.start,
                        ch: CodePoint(c),
                    });
                }
                None => return self.fail(ScanError::UnterminatedHexString { pos: self.start }),
            }
        }
    }

    /// Comment from `%` up to the end of the line. The terminator is left
    /// for the space state, which takes `\r\n` as one run. `%%EOF` and
    /// `%PDF-x.y` get no special treatment here.
    fn lex_comment(&mut self) -> Option<State> {
        let rest = &self.input[self.pos..];
        let len = memchr::memchr2(b'\r', b'\n', rest).unwrap_or(rest.len());
        self.skip(len);
        self.emit(TokenKind::Comment);
        Some(State::Default)
    }

    fn lex_left_dict(&mut self) -> Option<State> {
        self.skip(LEFT_DICT.len());
        self.dict_depth += 1;
        self.emit(TokenKind::LeftDict);
        Some(State::Default)
    }

    fn lex_right_dict(&mut self) -> Option<State> {
        let Some(depth) = self.dict_depth.checked_sub(1) else {
            return self.fail(ScanError::UnexpectedDictTerminator { pos: self.start });
        };
        self.skip(RIGHT_DICT.len());
        self.dict_depth = depth;
        self.emit(TokenKind::RightDict);
        Some(State::Default)
    }

    /// Run of alphanumerics, the first of which has been consumed. Known
    /// keywords get their own kind; `stream` also switches to stream skipping.
    fn lex_word(&mut self) -> Option<State> {
        while self.peek().is_some_and(is_alphanumeric) {
            self.next_char();
        }
        match keyword_kind(&self.input[self.start..self.pos]) {
            Some(kind) => {
                self.emit(kind);
                if kind == TokenKind::Stream {
                    Some(State::StreamBody)
                } else {
                    Some(State::Default)
                }
            }
            None => {
                self.emit(TokenKind::Word);
                Some(State::Default)
            }
        }
    }

    /// Everything between `stream` and the next `endstream` marker.
    ///
    /// The declared `/Length` is not known at this layer, so the marker is
    /// found by plain substring search. Binary data that happens to contain
    /// the marker ends the body early.
    fn lex_stream_body(&mut self) -> Option<State> {
        let Some(len) = memmem::find(&self.input[self.pos..], RIGHT_STREAM) else {
            return self.fail(ScanError::UnclosedStream { pos: self.start });
        };
        self.skip(len);
        self.emit(TokenKind::StreamBody);
        Some(State::EndStream)
    }

    fn lex_end_stream(&mut self) -> Option<State> {
        self.skip(RIGHT_STREAM.len());
        self.emit(TokenKind::EndStream);
        Some(State::Default)
    }

    fn finish(&self, item: &Result<Token<'a>>) {
        match item {
            Ok(token) => debug!(
                name = %self.name,
                pos = token.pos,
                "scan complete"
            ),
            Err(err) => debug!(
                name = %self.name,
                pos = err.pos(),
                line = self.line_number(),
                error = %err,
                "scan aborted"
            ),
        }
    }
}

impl<'a> Iterator for Scanner<'a> {
    type Item = Result<Token<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(state) = self.state {
            self.state = self.step(state);
            if let Some(item) = self.item.take() {
                self.last_pos = match &item {
                    Ok(token) => token.pos,
                    Err(err) => err.pos(),
                };
                if self.state.is_none() {
                    self.finish(&item);
                }
                return Some(item);
            }
        }
        None
    }
}

impl std::iter::FusedIterator for Scanner<'_> {}

/// Scan `input` to completion.
///
/// Returns every token produced, the trailing `Eof` included on success, and
/// the terminating error if there was one.
pub fn scan_all<'a>(
    name: impl Into<String>,
    input: &'a [u8],
) -> (Vec<Token<'a>>, Option<ScanError>) {
    let mut tokens = Vec::new();
    for item in Scanner::new(name, input) {
        match item {
            Ok(token) => tokens.push(token),
            Err(err) => return (tokens, Some(err)),
        }
    }
    (tokens, None)
}
