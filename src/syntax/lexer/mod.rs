//! Raw, byte-level lexer for CUDA/C++ source.
//!
//! Runs over unexpanded text: preprocessor directives are lexed like any
//! other line and conditionally-excluded code is seen too. Whitespace and
//! comments are skipped. Nothing here can fail; malformed input (an
//! unterminated literal, a stray byte) becomes an `Unknown` token.


use crate::span::Span;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenKind {
    Ident,
    /// An ordinary `"..."` literal without encoding prefix.
    StringLit,
    /// `L"..."`, `u8"..."`, `R"(...)"` and friends.
    PrefixedString,
    CharLit,
    Number,
    Punct,
    Unknown,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RawToken {
    pub kind: TokenKind,
    pub span: Span,
    /// First token on its logical line (backslash-newline does not count).
    pub starts_line: bool,
}

impl RawToken {
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.span.range()]
    }

    pub fn is_punct(&self, source: &str, p: &str) -> bool {
        self.kind == TokenKind::Punct && self.text(source) == p
    }
}

const PUNCT3: &[&[u8]] = &[b"<<<", b">>>", b"<<=", b">>=", b"...", b"->*"];
const PUNCT2: &[&[u8]] = &[
    b"::", b"->", b"++", b"--", b"<<", b">>", b"<=", b">=", b"==", b"!=", b"&&", b"||", b"+=",
    b"-=", b"*=", b"/=", b"%=", b"&=", b"|=", b"^=", b"##", b".*",
];

pub struct RawLexer<'src> {
    source: &'src [u8],
    pos: usize,
    at_line_start: bool,
}

impl<'src> RawLexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source: source.as_bytes(),
            pos: 0,
            at_line_start: true,
        }
    }

    /// Start lexing at `offset`, as if a line began there.
    pub fn at(source: &'src str, offset: u32) -> Self {
        Self {
            source: source.as_bytes(),
            pos: (offset as usize).min(source.len()),
            at_line_start: true,
        }
    }

    pub fn tokenize(self) -> Vec<RawToken> {
        self.collect()
    }

    fn peek(&self, ahead: usize) -> u8 {
        self.source.get(self.pos + ahead).copied().unwrap_or(0)
    }

    fn skip_trivia(&mut self) {
        while self.pos < self.source.len() {
            match self.source[self.pos] {
                b'\n' => {
                    self.at_line_start = true;
                    self.pos += 1;
                }
                b'\\' if self.peek(1) == b'\n' => self.pos += 2,
                b'\\' if self.peek(1) == b'\r' && self.peek(2) == b'\n' => self.pos += 3,
                b if b.is_ascii_whitespace() => self.pos += 1,
                b'/' if self.peek(1) == b'/' => {
                    while self.pos < self.source.len() && self.source[self.pos] != b'\n' {
                        self.pos += 1;
                    }
                }
                b'/' if self.peek(1) == b'*' => {
                    self.pos += 2;
                    while self.pos < self.source.len()
                        && !(self.source[self.pos] == b'*' && self.peek(1) == b'/')
                    {
                        if self.source[self.pos] == b'\n' {
                            self.at_line_start = true;
                        }
                        self.pos += 1;
                    }
                    self.pos = (self.pos + 2).min(self.source.len());
                }
                _ => break,
            }
        }
    }

    fn scan(&mut self) -> TokenKind {
        let ch = self.source[self.pos];
        if is_ident_start(ch) {
            return self.scan_ident_or_prefixed_literal();
        }
        if ch.is_ascii_digit() || (ch == b'.' && self.peek(1).is_ascii_digit()) {
            self.scan_number();
            return TokenKind::Number;
        }
        match ch {
            b'"' => self.scan_quoted(b'"', TokenKind::StringLit),
            b'\'' => self.scan_quoted(b'\'', TokenKind::CharLit),
            _ => self.scan_punct(),
        }
    }

    fn scan_ident_or_prefixed_literal(&mut self) -> TokenKind {
        let start = self.pos;
        while self.pos < self.source.len() && is_ident_continue(self.source[self.pos]) {
            self.pos += 1;
        }
        let word = &self.source[start..self.pos];
        let next = self.peek(0);
        match (word, next) {
            (b"L" | b"u" | b"U" | b"u8", b'"') => {
                self.scan_quoted(b'"', TokenKind::PrefixedString)
            }
            (b"R" | b"LR" | b"uR" | b"UR" | b"u8R", b'"') => self.scan_raw_string(),
            (b"L" | b"u" | b"U" | b"u8", b'\'') => self.scan_quoted(b'\'', TokenKind::CharLit),
            _ => TokenKind::Ident,
        }
    }

    fn scan_number(&mut self) {
        self.pos += 1;
        while self.pos < self.source.len() {
            let b = self.source[self.pos];
            let exp = matches!(b, b'+' | b'-')
                && matches!(self.source[self.pos - 1], b'e' | b'E' | b'p' | b'P');
            if b.is_ascii_alphanumeric() || b == b'.' || b == b'_' || exp {
                self.pos += 1;
            } else if b == b'\'' && self.peek(1).is_ascii_alphanumeric() {
                self.pos += 2;
            } else {
                break;
            }
        }
    }

    /// Scan a quoted literal starting at the opening quote. Unterminated
    /// literals stop at the end of the line and lex as `Unknown`.
    fn scan_quoted(&mut self, quote: u8, kind: TokenKind) -> TokenKind {
        self.pos += 1;
        while self.pos < self.source.len() {
            match self.source[self.pos] {
                b'\\' => self.pos += 2,
                b'\n' => return TokenKind::Unknown,
                b if b == quote => {
                    self.pos += 1;
                    return kind;
                }
                _ => self.pos += 1,
            }
        }
        self.pos = self.source.len();
        TokenKind::Unknown
    }

    /// `R"delim( ... )delim"`, positioned at the opening quote.
    fn scan_raw_string(&mut self) -> TokenKind {
        self.pos += 1;
        let delim_start = self.pos;
        while self.pos < self.source.len() && !matches!(self.source[self.pos], b'(' | b'\n') {
            self.pos += 1;
        }
        if self.peek(0) != b'(' {
            return TokenKind::Unknown;
        }
        let mut close = vec![b')'];
        close.extend_from_slice(&self.source[delim_start..self.pos]);
        close.push(b'"');
        self.pos += 1;
        while self.pos < self.source.len() {
            if self.source[self.pos..].starts_with(&close) {
                self.pos += close.len();
                return TokenKind::PrefixedString;
            }
            self.pos += 1;
        }
        TokenKind::Unknown
    }

    fn scan_punct(&mut self) -> TokenKind {
        let rest = &self.source[self.pos..];
        for group in [PUNCT3, PUNCT2] {
            if let Some(p) = group.iter().find(|p| rest.starts_with(p)) {
                self.pos += p.len();
                return TokenKind::Punct;
            }
        }
        let ch = rest[0];
        if ch.is_ascii() {
            self.pos += 1;
            if ch.is_ascii_punctuation() {
                TokenKind::Punct
            } else {
                TokenKind::Unknown
            }
        } else {
            // Stray non-ASCII byte outside an identifier: consume the whole
            // UTF-8 sequence so spans stay on character boundaries.
            self.pos += 1;
            while self.pos < self.source.len() && (self.source[self.pos] & 0xC0) == 0x80 {
                self.pos += 1;
            }
            TokenKind::Unknown
        }
    }
}

impl Iterator for RawLexer<'_> {
    type Item = RawToken;

    fn next(&mut self) -> Option<RawToken> {
        self.skip_trivia();
        if self.pos >= self.source.len() {
            return None;
        }
        let start = self.pos;
        let starts_line = std::mem::replace(&mut self.at_line_start, false);
        let kind = self.scan();
        let end = self.pos.min(self.source.len());
        Some(RawToken {
            kind,
            span: Span::new(start as u32, end as u32),
            starts_line,
        })
    }
}

/// Offset one past the end of the token that starts at `offset`.
///
/// Locations handed over by a front-end point at the first byte of a
/// token; turning a token range into a byte length needs this.
pub fn token_end(source: &str, offset: u32) -> u32 {
    if offset as usize >= source.len() {
        return source.len() as u32;
    }
    let mut lexer = RawLexer::at(source, offset);
    match lexer.next() {
        Some(tok) if tok.span.start == offset => tok.span.end,
        // Offset sits on whitespace or a comment: nothing to measure.
        _ => offset,
    }
}

pub fn is_ident_start(ch: u8) -> bool {
    ch.is_ascii_alphabetic() || ch == b'_' || ch == b'$' || ch >= 0x80
}

pub fn is_ident_continue(ch: u8) -> bool {
    is_ident_start(ch) || ch.is_ascii_digit()
}
