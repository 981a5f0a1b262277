//! Reader for Zig object notation, the format of `build.zig.zon` manifests.
//!
//! Only the literal subset of the language is accepted: anonymous structs
//! and tuples, enum literals, strings, numbers, `true`, `false` and `null`.

use crate::model::ParseError;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    EnumLiteral(String),
    /// Numbers are kept verbatim, nothing in a manifest needs their value.
    Number(String),
    Bool(bool),
    Null,
    Struct(Vec<(String, Value)>),
    Tuple(Vec<Value>),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::String(_) => "string",
            Value::EnumLiteral(_) => "enum literal",
            Value::Number(_) => "number",
            Value::Bool(_) => "bool",
            Value::Null => "null",
            Value::Struct(_) => "struct",
            Value::Tuple(_) => "tuple",
        }
    }
}

pub fn from_str(data: &str) -> Result<Value, ParseError> {
    let mut parser = Parser::new(data);
    let value = parser.value()?;
    parser.skip_trivia();
    match parser.peek() {
        None => Ok(value),
        Some(c) => Err(parser.error(format!("unexpected trailing character `{c}`"))),
    }
}

const MAX_DEPTH: usize = 128;

struct Parser<'a> {
    src: &'a str,
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Parser {
            src,
            pos: 0,
            depth: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.src[self.pos..].chars().nth(n)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: char) -> Result<(), ParseError> {
        if self.eat(expected) {
            Ok(())
        } else {
            Err(self.unexpected(&format!("`{expected}`")))
        }
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        match self.peek() {
            Some(c) => self.error(format!("expected {expected}, found `{c}`")),
            None => self.error(format!("expected {expected}, found end of input")),
        }
    }

    fn error(&self, message: String) -> ParseError {
        let consumed = &self.src[..self.pos];
        let line = consumed.matches('\n').count() + 1;
        let column = consumed
            .rsplit('\n')
            .next()
            .map_or(0, |l| l.chars().count())
            + 1;
        ParseError::Syntax {
            line,
            column,
            message,
        }
    }

    fn skip_trivia(&mut self) {
        loop {
            match self.peek() {
                Some(c) if c.is_whitespace() => {
                    self.bump();
                }
                Some('/') if self.peek_nth(1) == Some('/') => {
                    while let Some(c) = self.bump() {
                        if c == '\n' {
                            break;
                        }
                    }
                }
                _ => break,
            }
        }
    }

    fn value(&mut self) -> Result<Value, ParseError> {
        self.skip_trivia();
        match self.peek() {
            Some('.') => {
                self.bump();
                if self.eat('{') {
                    if self.depth == MAX_DEPTH {
                        return Err(self.error("nesting too deep".to_string()));
                    }
                    self.depth += 1;
                    let value = self.container();
                    self.depth -= 1;
                    value
                } else {
                    self.identifier().map(Value::EnumLiteral)
                }
            }
            Some('"') => self.string().map(Value::String),
            Some('\\') => self.multiline_string().map(Value::String),
            Some(c) if c == '-' || c.is_ascii_digit() => self.number().map(Value::Number),
            Some(c) if is_identifier_start(c) => {
                let start = self.pos;
                match self.bare_identifier() {
                    "true" => Ok(Value::Bool(true)),
                    "false" => Ok(Value::Bool(false)),
                    "null" => Ok(Value::Null),
                    word => {
                        self.pos = start;
                        Err(self.error(format!("unexpected identifier `{word}`")))
                    }
                }
            }
            _ => Err(self.unexpected("a value")),
        }
    }

    /// Parses the body of `.{ ... }` after the opening brace.
    fn container(&mut self) -> Result<Value, ParseError> {
        self.skip_trivia();
        if self.eat('}') {
            return Ok(Value::Struct(Vec::new()));
        }
        if self.at_field() {
            self.struct_fields().map(Value::Struct)
        } else {
            self.tuple_items().map(Value::Tuple)
        }
    }

    fn at_field(&mut self) -> bool {
        let start = self.pos;
        let is_field = self.eat('.') && self.identifier().is_ok() && {
            self.skip_trivia();
            self.peek() == Some('=')
        };
        self.pos = start;
        is_field
    }

    fn struct_fields(&mut self) -> Result<Vec<(String, Value)>, ParseError> {
        let mut fields: Vec<(String, Value)> = Vec::new();
        loop {
            self.skip_trivia();
            if self.eat('}') {
                break;
            }
            self.expect('.')?;
            let key = self.identifier()?;
            if fields.iter().any(|(k, _)| *k == key) {
                return Err(self.error(format!("duplicate field `{key}`")));
            }
            self.skip_trivia();
            self.expect('=')?;
            let value = self.value()?;
            fields.push((key, value));
            self.skip_trivia();
            if !self.eat(',') {
                self.expect('}')?;
                break;
            }
        }
        Ok(fields)
    }

    fn tuple_items(&mut self) -> Result<Vec<Value>, ParseError> {
        let mut items = Vec::new();
        loop {
            self.skip_trivia();
            if self.eat('}') {
                break;
            }
            items.push(self.value()?);
            self.skip_trivia();
            if !self.eat(',') {
                self.expect('}')?;
                break;
            }
        }
        Ok(items)
    }

    /// An identifier following a `.`, either bare or written as `@"..."`.
    fn identifier(&mut self) -> Result<String, ParseError> {
        if self.eat('@') {
            return self.string();
        }
        match self.peek() {
            Some(c) if is_identifier_start(c) => Ok(self.bare_identifier().to_string()),
            _ => Err(self.unexpected("an identifier")),
        }
    }

    fn bare_identifier(&mut self) -> &'a str {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_ascii_alphanumeric() || c == '_') {
            self.bump();
        }
        let src = self.src;
        &src[start..self.pos]
    }

    /// String escapes produce bytes, so the result is only checked for UTF-8
    /// once the closing quote is reached.
    fn string(&mut self) -> Result<String, ParseError> {
        self.expect('"')?;
        let mut out = Vec::new();
        loop {
            match self.bump() {
                Some('"') => break,
                Some('\\') => self.escape(&mut out)?,
                Some('\n') | None => {
                    return Err(self.error("unterminated string literal".to_string()))
                }
                Some(c) => push_char(&mut out, c),
            }
        }
        String::from_utf8(out)
            .map_err(|_| self.error("string literal is not valid UTF-8".to_string()))
    }

    fn escape(&mut self, out: &mut Vec<u8>) -> Result<(), ParseError> {
        let c = match self.bump() {
            Some('n') => '\n',
            Some('r') => '\r',
            Some('t') => '\t',
            Some(c @ ('\\' | '"' | '\'')) => c,
            Some('x') => {
                let start = self.pos;
                for _ in 0..2 {
                    match self.peek() {
                        Some(c) if c.is_ascii_hexdigit() => {
                            self.bump();
                        }
                        _ => return Err(self.unexpected("a hex digit")),
                    }
                }
                let byte = u8::from_str_radix(&self.src[start..self.pos], 16)
                    .map_err(|_| self.error("invalid `\\x` escape".to_string()))?;
                out.push(byte);
                return Ok(());
            }
            Some('u') => {
                self.expect('{')?;
                let start = self.pos;
                while matches!(self.peek(), Some(c) if c.is_ascii_hexdigit()) {
                    self.bump();
                }
                let src = self.src;
                let digits = &src[start..self.pos];
                self.expect('}')?;
                u32::from_str_radix(digits, 16)
                    .ok()
                    .and_then(char::from_u32)
                    .ok_or_else(|| self.error(format!("invalid unicode escape `{digits}`")))?
            }
            _ => return Err(self.error("invalid escape sequence".to_string())),
        };
        push_char(out, c);
        Ok(())
    }

    /// Consecutive `\\` lines, joined with newlines.
    fn multiline_string(&mut self) -> Result<String, ParseError> {
        let src = self.src;
        let mut lines = Vec::new();
        while self.peek() == Some('\\') && self.peek_nth(1) == Some('\\') {
            self.pos += 2;
            let start = self.pos;
            while !matches!(self.peek(), Some('\n') | None) {
                self.bump();
            }
            lines.push(src[start..self.pos].trim_end_matches('\r'));
            self.skip_trivia();
        }
        if lines.is_empty() {
            return Err(self.unexpected("`\\\\`"));
        }
        Ok(lines.join("\n"))
    }

    fn number(&mut self) -> Result<String, ParseError> {
        let start = self.pos;
        self.eat('-');
        if !matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            return Err(self.unexpected("a digit"));
        }
        let mut prev = None;
        while let Some(c) = self.peek() {
            let exponent_sign =
                matches!(c, '+' | '-') && matches!(prev, Some('e' | 'E' | 'p' | 'P'));
            if c.is_ascii_alphanumeric() || c == '_' || c == '.' || exponent_sign {
                prev = Some(c);
                self.bump();
            } else {
                break;
            }
        }
        Ok(self.src[start..self.pos].to_string())
    }
}

fn is_identifier_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn push_char(out: &mut Vec<u8>, c: char) {
    out.extend_from_slice(c.encode_utf8(&mut [0; 4]).as_bytes());
}
