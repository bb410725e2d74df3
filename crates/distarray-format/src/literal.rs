//! Parser for the closed literal grammar used in file headers.
//!
//! Accepts `None`, `True`, `False`, integers, floats, quoted strings,
//! tuples, lists and dicts. Names, calls, operators and everything else
//! are rejected. Printing is [`Value`]'s `Display` impl.

use distarray_core::{Error, Result, Value};

/// Maximum container nesting.
pub const MAX_DEPTH: usize = 64;

/// Parse a complete literal. Trailing whitespace is allowed, anything else is not.
pub fn parse(text: &str) -> Result<Value> {
    let mut parser = Parser {
        text,
        pos: 0,
        depth: 0,
    };
    let value = parser.value()?;
    parser.skip_ws();
    if parser.pos != text.len() {
        return Err(parser.error("trailing characters after literal"));
    }
    Ok(value)
}

struct Parser<'a> {
    text: &'a str,
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn error(&self, message: &str) -> Error {
        Error::format(format!("cannot parse header literal at byte {}: {message}", self.pos))
    }

    fn rest(&self) -> &'a str {
        &self.text[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(' ' | '\t' | '\n' | '\r')) {
            self.pos += 1;
        }
    }

    fn expect(&mut self, want: char) -> Result<()> {
        self.skip_ws();
        match self.bump() {
            Some(ch) if ch == want => Ok(()),
            _ => Err(self.error(&format!("expected '{want}'"))),
        }
    }

    fn value(&mut self) -> Result<Value> {
        self.skip_ws();
        match self.peek() {
            None => Err(self.error("unexpected end of input")),
            Some('(') => self.nested(Self::tuple),
            Some('[') => self.nested(Self::list),
            Some('{') => self.nested(Self::dict),
            Some('\'' | '"') => self.string().map(Value::Str),
            Some(c) if c.is_ascii_digit() || matches!(c, '-' | '+' | '.') => self.number(),
            Some(c) if c.is_alphabetic() || c == '_' => self.word(),
            Some(c) => Err(self.error(&format!("unexpected character {c:?}"))),
        }
    }

    fn nested(&mut self, parse: fn(&mut Self) -> Result<Value>) -> Result<Value> {
        if self.depth >= MAX_DEPTH {
            return Err(self.error("literal nested too deeply"));
        }
        self.depth += 1;
        let value = parse(self);
        self.depth -= 1;
        value
    }

    /// Comma-separated items up to `close`. Returns the items and whether a
    /// trailing comma was present.
    fn items(&mut self, close: char) -> Result<(Vec<Value>, bool)> {
        let mut items = Vec::new();
        let mut trailing = false;
        loop {
            self.skip_ws();
            if self.peek() == Some(close) {
                self.pos += 1;
                return Ok((items, trailing));
            }
            items.push(self.value()?);
            self.skip_ws();
            match self.bump() {
                Some(',') => trailing = true,
                Some(ch) if ch == close => return Ok((items, false)),
                _ => return Err(self.error(&format!("expected ',' or '{close}'"))),
            }
        }
    }

    fn tuple(&mut self) -> Result<Value> {
        self.expect('(')?;
        let (mut items, trailing) = self.items(')')?;
        if items.len() == 1 && !trailing {
            // Parenthesised expression, not a tuple.
            return Ok(items.remove(0));
        }
        Ok(Value::Tuple(items))
    }

    fn list(&mut self) -> Result<Value> {
        self.expect('[')?;
        Ok(Value::List(self.items(']')?.0))
    }

    fn dict(&mut self) -> Result<Value> {
        self.expect('{')?;
        let mut entries = Vec::new();
        loop {
            self.skip_ws();
            if self.peek() == Some('}') {
                self.pos += 1;
                return Ok(Value::Dict(entries));
            }
            let key = self.value()?;
            if matches!(key, Value::List(_) | Value::Dict(_)) {
                return Err(self.error("unhashable dict key"));
            }
            self.expect(':')?;
            let value = self.value()?;
            if let Some(slot) = entries.iter_mut().find(|(k, _)| *k == key) {
                slot.1 = value;
            } else {
                entries.push((key, value));
            }
            self.skip_ws();
            match self.bump() {
                Some(',') => {}
                Some('}') => return Ok(Value::Dict(entries)),
                _ => return Err(self.error("expected ',' or '}'")),
            }
        }
    }

    fn word(&mut self) -> Result<Value> {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_alphanumeric() || c == '_') {
            self.bump();
        }
        let word = &self.text[start..self.pos];
        match word {
            "None" => Ok(Value::None),
            "True" => Ok(Value::Bool(true)),
            "False" => Ok(Value::Bool(false)),
            "u" | "b" | "U" | "B" if matches!(self.peek(), Some('\'' | '"')) => {
                self.string().map(Value::Str)
            }
            _ => {
                self.pos = start;
                Err(self.error(&format!("non-literal name {word:?}")))
            }
        }
    }

    fn number(&mut self) -> Result<Value> {
        let start = self.pos;
        if matches!(self.peek(), Some('-' | '+')) {
            self.pos += 1;
            self.skip_ws();
        }
        let digits_start = self.pos;
        let mut is_float = false;
        while let Some(c) = self.peek() {
            match c {
                '0'..='9' => self.pos += 1,
                '.' if !is_float => {
                    is_float = true;
                    self.pos += 1;
                }
                'e' | 'E' => {
                    is_float = true;
                    self.pos += 1;
                    if matches!(self.peek(), Some('-' | '+')) {
                        self.pos += 1;
                    }
                }
                _ => break,
            }
        }

        let digits = &self.text[digits_start..self.pos];
        if !digits.bytes().any(|b| b.is_ascii_digit()) {
            self.pos = start;
            return Err(self.error("malformed number"));
        }
        let negative = self.text[start..digits_start].starts_with('-');

        if is_float {
            let x: f64 = digits
                .parse()
                .map_err(|_| self.error(&format!("malformed float {digits:?}")))?;
            return Ok(Value::Float(if negative { -x } else { x }));
        }

        // Python 2 long suffix.
        if matches!(self.peek(), Some('L' | 'l')) {
            self.pos += 1;
        }
        let magnitude: i128 = digits
            .parse()
            .map_err(|_| self.error(&format!("malformed integer {digits:?}")))?;
        let signed = if negative { -magnitude } else { magnitude };
        i64::try_from(signed)
            .map(Value::Int)
            .map_err(|_| self.error(&format!("integer {signed} out of range")))
    }

    fn string(&mut self) -> Result<String> {
        let quote = match self.bump() {
            Some(q @ ('\'' | '"')) => q,
            _ => return Err(self.error("expected string")),
        };

        let mut out = String::new();
        loop {
            match self.bump() {
                None | Some('\n') => return Err(self.error("unterminated string")),
                Some(c) if c == quote => return Ok(out),
                Some('\\') => {
                    let escaped = match self.bump() {
                        Some('\\') => '\\',
                        Some('\'') => '\'',
                        Some('"') => '"',
                        Some('n') => '\n',
                        Some('r') => '\r',
                        Some('t') => '\t',
                        Some('0') => '\0',
                        Some('a') => '\x07',
                        Some('b') => '\x08',
                        Some('f') => '\x0c',
                        Some('v') => '\x0b',
                        Some('x') => self.hex_escape(2)?,
                        Some('u') => self.hex_escape(4)?,
                        _ => return Err(self.error("invalid escape sequence")),
                    };
                    out.push(escaped);
                }
                Some(c) => out.push(c),
            }
        }
    }

    fn hex_escape(&mut self, len: usize) -> Result<char> {
        let digits = self
            .rest()
            .get(..len)
            .filter(|d| d.bytes().all(|b| b.is_ascii_hexdigit()))
            .ok_or_else(|| self.error("truncated hex escape"))?;
        let code = u32::from_str_radix(digits, 16).map_err(|_| self.error("bad hex escape"))?;
        self.pos += len;
        char::from_u32(code).ok_or_else(|| self.error("escape is not a valid character"))
    }
}
