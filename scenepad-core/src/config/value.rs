//! Inline TOML values
//!
//! Handles the right-hand side of `key = value` lines: strings, integers
//! (decimal or `0x` hex, optional sign), floats, booleans, arrays and
//! inline tables, nested to any depth.

use alloc::string::String;
use alloc::vec::Vec;

use super::toml::ParseError;

/// A parsed value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Str(String),
    Int(i64),
    Float(f32),
    Bool(bool),
    Array(Vec<Value>),
    Table(Vec<(String, Value)>),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Floats, or integers read as whole numbers
    pub fn as_float(&self) -> Option<f32> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f32),
            _ => None,
        }
    }

    /// Look a key up in an inline table
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Table(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }
}

/// Parse a complete value; trailing text other than whitespace is an error
pub fn parse_value(input: &str) -> Result<Value, ParseError> {
    let mut cursor = Cursor { rest: input };
    let value = cursor.value()?;
    cursor.skip_ws();
    if cursor.rest.is_empty() {
        Ok(value)
    } else {
        Err(ParseError::InvalidValue)
    }
}

struct Cursor<'a> {
    rest: &'a str,
}

impl<'a> Cursor<'a> {
    fn skip_ws(&mut self) {
        self.rest = self.rest.trim_start();
    }

    fn peek(&self) -> Option<char> {
        self.rest.chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.rest = &self.rest[ch.len_utf8()..];
        Some(ch)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.rest = &self.rest[expected.len_utf8()..];
            true
        } else {
            false
        }
    }

    fn value(&mut self) -> Result<Value, ParseError> {
        self.skip_ws();
        match self.peek() {
            Some('"') => self.basic_string().map(Value::Str),
            Some('\'') => self.literal_string().map(Value::Str),
            Some('[') => self.array(),
            Some('{') => self.table(),
            Some(_) => self.scalar(),
            None => Err(ParseError::InvalidValue),
        }
    }

    fn array(&mut self) -> Result<Value, ParseError> {
        self.bump();
        let mut items = Vec::new();
        loop {
            self.skip_ws();
            if self.eat(']') {
                return Ok(Value::Array(items));
            }
            items.push(self.value()?);
            self.skip_ws();
            // Trailing commas are allowed in arrays
            if !self.eat(',') {
                self.skip_ws();
                return if self.eat(']') {
                    Ok(Value::Array(items))
                } else {
                    Err(ParseError::UnterminatedArray)
                };
            }
        }
    }

    fn table(&mut self) -> Result<Value, ParseError> {
        self.bump();
        let mut entries = Vec::new();
        self.skip_ws();
        if self.eat('}') {
            return Ok(Value::Table(entries));
        }
        loop {
            self.skip_ws();
            let key = self.key()?;
            self.skip_ws();
            if !self.eat('=') {
                return Err(ParseError::InvalidValue);
            }
            let value = self.value()?;
            entries.push((key, value));
            self.skip_ws();
            if self.eat('}') {
                return Ok(Value::Table(entries));
            }
            if !self.eat(',') {
                return Err(ParseError::InvalidValue);
            }
        }
    }

    fn key(&mut self) -> Result<String, ParseError> {
        match self.peek() {
            Some('"') => self.basic_string(),
            Some('\'') => self.literal_string(),
            _ => {
                let end = self
                    .rest
                    .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_' || c == '-'))
                    .unwrap_or(self.rest.len());
                if end == 0 {
                    return Err(ParseError::InvalidValue);
                }
                let key = String::from(&self.rest[..end]);
                self.rest = &self.rest[end..];
                Ok(key)
            }
        }
    }

    fn basic_string(&mut self) -> Result<String, ParseError> {
        self.bump();
        let mut out = String::new();
        loop {
            match self.bump().ok_or(ParseError::InvalidValue)? {
                '"' => return Ok(out),
                '\\' => out.push(self.escape()?),
                ch => out.push(ch),
            }
        }
    }

    fn escape(&mut self) -> Result<char, ParseError> {
        match self.bump().ok_or(ParseError::InvalidValue)? {
            'n' => Ok('\n'),
            't' => Ok('\t'),
            'r' => Ok('\r'),
            'b' => Ok('\u{8}'),
            '\\' => Ok('\\'),
            '"' => Ok('"'),
            'u' => self.unicode_escape(4),
            'U' => self.unicode_escape(8),
            _ => Err(ParseError::InvalidValue),
        }
    }

    fn unicode_escape(&mut self, digits: usize) -> Result<char, ParseError> {
        let hex = self.rest.get(..digits).ok_or(ParseError::InvalidValue)?;
        let code = u32::from_str_radix(hex, 16).map_err(|_| ParseError::InvalidValue)?;
        self.rest = &self.rest[digits..];
        char::from_u32(code).ok_or(ParseError::InvalidValue)
    }

    fn literal_string(&mut self) -> Result<String, ParseError> {
        self.bump();
        let end = self.rest.find('\'').ok_or(ParseError::InvalidValue)?;
        let s = String::from(&self.rest[..end]);
        self.rest = &self.rest[end + 1..];
        Ok(s)
    }

    fn scalar(&mut self) -> Result<Value, ParseError> {
        let end = self
            .rest
            .find(|c: char| c == ',' || c == ']' || c == '}' || c.is_whitespace())
            .unwrap_or(self.rest.len());
        let token = &self.rest[..end];
        self.rest = &self.rest[end..];
        parse_scalar(token)
    }
}

/// Parse a bare token: boolean, integer or float
fn parse_scalar(token: &str) -> Result<Value, ParseError> {
    match token {
        "true" => return Ok(Value::Bool(true)),
        "false" => return Ok(Value::Bool(false)),
        "" => return Err(ParseError::InvalidValue),
        _ => {}
    }

    let mut digits: heapless::String<32> = heapless::String::new();
    for ch in token.chars().filter(|&c| c != '_') {
        digits.push(ch).map_err(|_| ParseError::InvalidValue)?;
    }
    if digits.is_empty() {
        return Err(ParseError::InvalidValue);
    }

    let (negative, unsigned) = match digits.as_bytes()[0] {
        b'-' => (true, &digits[1..]),
        b'+' => (false, &digits[1..]),
        _ => (false, &digits[..]),
    };

    if let Some(hex) = unsigned.strip_prefix("0x") {
        let magnitude = i64::from_str_radix(hex, 16).map_err(|_| ParseError::InvalidValue)?;
        return Ok(Value::Int(if negative { -magnitude } else { magnitude }));
    }

    if unsigned.contains(['.', 'e', 'E']) {
        return digits
            .parse::<f32>()
            .map(Value::Float)
            .map_err(|_| ParseError::InvalidValue);
    }

    digits
        .parse::<i64>()
        .map(Value::Int)
        .map_err(|_| ParseError::InvalidValue)
}
