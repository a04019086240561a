use memchr::memchr;
use std::io::{self, BufRead, BufReader, Read};
use std::str;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TokenKind {
    Iri,
    Literal,
    BNode,
    Lang,
    DtMarker,
    Dot,
    Eol,
    Eof,
    Error,
}

impl TokenKind {
    pub(crate) fn name(self) -> &'static str {
        match self {
            Self::Iri => "IRI",
            Self::Literal => "literal",
            Self::BNode => "blank node",
            Self::Lang => "language tag",
            Self::DtMarker => "datatype marker",
            Self::Dot => "dot",
            Self::Eol => "end of line",
            Self::Eof => "end of file",
            Self::Error => "error",
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub(crate) struct Token {
    pub kind: TokenKind,
    /// The token content, or the error message for [`TokenKind::Error`].
    pub value: String,
}

impl Token {
    fn new(kind: TokenKind) -> Self {
        Self {
            kind,
            value: String::new(),
        }
    }

    fn with_value(kind: TokenKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self::with_value(TokenKind::Error, message)
    }
}

/// A streaming N-Triples tokenizer.
///
/// Works one input line at a time; tokens never span lines, so an
/// unterminated IRI or literal is an error on the line it started on.
pub(crate) struct Lexer<R: Read> {
    input: BufReader<R>,
    line: Vec<u8>,
    pos: usize,
    line_number: u64,
}

impl<R: Read> Lexer<R> {
    pub fn new(read: R) -> Self {
        Self {
            input: BufReader::new(read),
            line: Vec::new(),
            pos: 0,
            line_number: 0,
        }
    }

    /// The 1-based number of the line the last token was read from.
    pub fn line_number(&self) -> u64 {
        self.line_number
    }

    pub fn next_token(&mut self) -> io::Result<Token> {
        loop {
            if self.pos >= self.line.len() {
                self.line.clear();
                self.pos = 0;
                if self.input.read_until(b'\n', &mut self.line)? == 0 {
                    return Ok(Token::new(TokenKind::Eof));
                }
                self.line_number += 1;
            }
            match self.line[self.pos] {
                b' ' | b'\t' | b'\r' => self.pos += 1,
                b'\n' => {
                    self.pos += 1;
                    return Ok(Token::new(TokenKind::Eol));
                }
                b'#' => {
                    // comments run to the end of the line and swallow its EOL
                    self.pos = self.line.len();
                    return Ok(Token::new(TokenKind::Eol));
                }
                b'.' => {
                    self.pos += 1;
                    return Ok(Token::new(TokenKind::Dot));
                }
                b'<' => return Ok(self.lex_iri()),
                b'"' => return Ok(self.lex_literal()),
                b'_' => return Ok(self.lex_blank_node()),
                b'@' => return Ok(self.lex_language_tag()),
                b'^' => return Ok(self.lex_datatype_marker()),
                _ => return Ok(self.lex_unexpected()),
            }
        }
    }

    fn lex_iri(&mut self) -> Token {
        let start = self.pos;
        let Some(end) = memchr(b'>', &self.line[start + 1..]) else {
            let message = format!("unclosed IRI: {}", quoted(&self.line[start..]));
            self.pos = self.line.len();
            return Token::error(message);
        };
        let end = start + 1 + end;
        self.pos = end + 1;
        if end == start + 1 {
            return Token::error(format!("empty IRI: {}", quoted(b"<>")));
        }
        match str::from_utf8(&self.line[start + 1..end]) {
            Ok(value) => Token::with_value(TokenKind::Iri, value),
            Err(_) => Token::error(format!(
                "invalid UTF-8 in IRI: {}",
                quoted(&self.line[start..=end])
            )),
        }
    }

    fn lex_literal(&mut self) -> Token {
        let start = self.pos;
        let mut search = start + 1;
        let end = loop {
            let Some(offset) = memchr(b'"', &self.line[search..]) else {
                let message = format!("unclosed Literal: {}", quoted(&self.line[start..]));
                self.pos = self.line.len();
                return Token::error(message);
            };
            let quote = search + offset;
            let mut backslashes = 0;
            while quote > start + 1 + backslashes && self.line[quote - 1 - backslashes] == b'\\' {
                backslashes += 1;
            }
            if backslashes % 2 == 1 {
                search = quote + 1;
                continue;
            }
            break quote;
        };
        self.pos = end + 1;
        if end == start + 1 {
            return Token::error(format!("empty literal: {}", quoted(b"\"\"")));
        }
        let raw = &self.line[start + 1..end];
        let Ok(value) = str::from_utf8(raw) else {
            return Token::error(format!(
                "invalid UTF-8 in literal: {}",
                quoted(&self.line[start..=end])
            ));
        };
        if memchr(b'\\', raw).is_none() {
            return Token::with_value(TokenKind::Literal, value);
        }
        match unescape(value) {
            Ok(unescaped) => Token::with_value(TokenKind::Literal, unescaped),
            Err(message) => Token::error(message),
        }
    }

    fn lex_blank_node(&mut self) -> Token {
        if self.line.get(self.pos + 1) != Some(&b':') {
            return self.lex_unexpected();
        }
        let start = self.pos + 2;
        let end = self.boundary_from(start);
        self.pos = end;
        if end == start {
            return Token::error("empty blank node label".to_owned());
        }
        match str::from_utf8(&self.line[start..end]) {
            Ok(value) => Token::with_value(TokenKind::BNode, value),
            Err(_) => Token::error(format!(
                "invalid UTF-8 in blank node label: {}",
                quoted(&self.line[start..end])
            )),
        }
    }

    fn lex_language_tag(&mut self) -> Token {
        let start = self.pos + 1;
        let end = self.boundary_from(start);
        self.pos = end;
        if end == start {
            return Token::error(format!("empty language tag: {}", quoted(b"")));
        }
        match str::from_utf8(&self.line[start..end]) {
            Ok(value) => Token::with_value(TokenKind::Lang, value),
            Err(_) => Token::error(format!(
                "invalid UTF-8 in language tag: {}",
                quoted(&self.line[start..end])
            )),
        }
    }

    fn lex_datatype_marker(&mut self) -> Token {
        if self.line.get(self.pos + 1) == Some(&b'^') {
            self.pos += 2;
            return Token::new(TokenKind::DtMarker);
        }
        self.lex_unexpected()
    }

    fn lex_unexpected(&mut self) -> Token {
        let start = self.pos;
        let end = self.boundary_from(start + 1);
        self.pos = end;
        Token::error(format!(
            "unexpected token: {}",
            quoted(&self.line[start..end])
        ))
    }

    /// The position of the next token boundary at or after `start`.
    fn boundary_from(&self, start: usize) -> usize {
        self.line[start.min(self.line.len())..]
            .iter()
            .position(|b| matches!(b, b'<' | b'.' | b'"' | b'#' | b' ' | b'\t' | b'\r' | b'\n'))
            .map_or(self.line.len(), |i| start + i)
    }
}

fn quoted(bytes: &[u8]) -> String {
    format!("{:?}", String::from_utf8_lossy(bytes))
}

/// Decodes the N-Triples escape sequences
/// `\t \b \n \r \f \" \' \\ \uXXXX \UXXXXXXXX`.
fn unescape(text: &str) -> Result<String, String> {
    let mut decoded = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(i) = rest.find('\\') {
        decoded.push_str(&rest[..i]);
        let tail = &rest[i..];
        let mut chars = tail.chars();
        chars.next();
        let consumed = match chars.next() {
            Some('t') => {
                decoded.push('\t');
                2
            }
            Some('b') => {
                decoded.push('\u{08}');
                2
            }
            Some('n') => {
                decoded.push('\n');
                2
            }
            Some('r') => {
                decoded.push('\r');
                2
            }
            Some('f') => {
                decoded.push('\u{0C}');
                2
            }
            Some('"') => {
                decoded.push('"');
                2
            }
            Some('\'') => {
                decoded.push('\'');
                2
            }
            Some('\\') => {
                decoded.push('\\');
                2
            }
            Some('u') => {
                let (c, len) = hex_escape(tail, 4)?;
                decoded.push(c);
                len
            }
            Some('U') => {
                let (c, len) = hex_escape(tail, 8)?;
                decoded.push(c);
                len
            }
            other => {
                let len = 1 + other.map_or(0, char::len_utf8);
                return Err(format!("illegal escape sequence: {:?}", &tail[..len]));
            }
        };
        rest = &tail[consumed..];
    }
    decoded.push_str(rest);
    Ok(decoded)
}

fn hex_escape(tail: &str, digits: usize) -> Result<(char, usize), String> {
    let body = &tail[2..];
    let mut end = 0;
    while end < digits && body[end..].starts_with(|c: char| c.is_ascii_hexdigit()) {
        end += 1;
    }
    if end < digits {
        let offending = body[end..].chars().next().map_or(0, char::len_utf8);
        return Err(format!(
            "illegal escape sequence: {:?}",
            &tail[..2 + end + offending]
        ));
    }
    let code = u32::from_str_radix(&body[..end], 16).map_err(|_| {
        format!("illegal escape sequence: {:?}", &tail[..2 + end])
    })?;
    match char::from_u32(code) {
        Some(c) => Ok((c, 2 + end)),
        None => Err(format!("illegal escape sequence: {:?}", &tail[..2 + end])),
    }
}
