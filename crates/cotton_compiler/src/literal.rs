//! Parser for the typed defaults passed through `eval_default`.
//!
//! A var declared as `<c-vars :items="[1, 2]" />` compiles to
//! `items=items|eval_default:"[1, 2]"`; the host engine evaluates that value
//! with [`eval_default`] at render time. The accepted syntax is the Python
//! literal subset: `None`, `True`, `False`, integers, floats, quoted strings,
//! lists, tuples, sets and dicts.

use std::fmt;

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

/// A parsed literal value.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// `None`
    None,
    /// `True` / `False`
    Bool(bool),
    /// An integer that fits in `i64`.
    Int(i64),
    /// A float, including exponent forms.
    Float(f64),
    /// A quoted string with escapes resolved.
    Str(String),
    /// A list, tuple or set, in source order.
    List(Vec<Literal>),
    /// A dict as key/value pairs in source order.
    Map(Vec<(Literal, Literal)>),
}

/// Errors from [`parse_literal`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LiteralError {
    /// A character that cannot start or continue a literal.
    #[error("unexpected character {ch:?} at offset {offset}")]
    UnexpectedChar {
        /// The offending character.
        ch: char,
        /// Byte offset in the input.
        offset: usize,
    },

    /// The input ended inside a literal.
    #[error("unexpected end of input")]
    UnexpectedEnd,

    /// A numeric token that is not a valid number.
    #[error("invalid number {text:?}")]
    InvalidNumber {
        /// The token as written.
        text: String,
    },

    /// An unknown or malformed escape sequence in a string.
    #[error("invalid escape sequence at offset {offset}")]
    InvalidEscape {
        /// Byte offset of the backslash.
        offset: usize,
    },
}

/// Parses `text` as a single literal, surrounding whitespace allowed.
pub fn parse_literal(text: &str) -> Result<Literal, LiteralError> {
    let mut parser = LiteralParser { src: text, pos: 0 };
    let value = parser.value()?;
    parser.skip_ws();
    match parser.peek() {
        None => Ok(value),
        Some(ch) => Err(LiteralError::UnexpectedChar {
            ch,
            offset: parser.pos,
        }),
    }
}

/// Evaluates a default: the parsed literal, or the text itself as a string
/// when it is not a literal.
pub fn eval_default(text: &str) -> Literal {
    parse_literal(text).unwrap_or_else(|_| Literal::Str(text.to_string()))
}

struct LiteralParser<'a> {
    src: &'a str,
    pos: usize,
}

impl LiteralParser<'_> {
    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn unexpected(&self) -> LiteralError {
        match self.peek() {
            Some(ch) => LiteralError::UnexpectedChar {
                ch,
                offset: self.pos,
            },
            None => LiteralError::UnexpectedEnd,
        }
    }

    fn expect(&mut self, want: char) -> Result<(), LiteralError> {
        self.skip_ws();
        if self.peek() == Some(want) {
            self.bump();
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }

    fn value(&mut self) -> Result<Literal, LiteralError> {
        self.skip_ws();
        match self.peek() {
            None => Err(LiteralError::UnexpectedEnd),
            Some('\'' | '"') => self.string().map(Literal::Str),
            Some('[') => {
                self.bump();
                self.sequence(']').map(|(items, _)| Literal::List(items))
            }
            Some('(') => {
                self.bump();
                let (mut items, trailing_comma) = self.sequence(')')?;
                // `(x)` is a parenthesised value, `(x,)` a one-element tuple.
                if items.len() == 1 && !trailing_comma {
                    Ok(items.remove(0))
                } else {
                    Ok(Literal::List(items))
                }
            }
            Some('{') => {
                self.bump();
                self.dict_or_set()
            }
            Some(c) if c.is_ascii_digit() || c == '-' || c == '+' || c == '.' => self.number(),
            Some(c) if c.is_ascii_alphabetic() || c == '_' => self.keyword(),
            Some(_) => Err(self.unexpected()),
        }
    }

    /// Parses comma-separated values up to `close`, which is consumed.
    /// Returns the items and whether the last item was followed by a comma.
    fn sequence(&mut self, close: char) -> Result<(Vec<Literal>, bool), LiteralError> {
        let mut items = Vec::new();
        let mut trailing_comma = false;
        loop {
            self.skip_ws();
            if self.peek() == Some(close) {
                self.bump();
                return Ok((items, trailing_comma));
            }
            items.push(self.value()?);
            self.skip_ws();
            match self.peek() {
                Some(',') => {
                    self.bump();
                    trailing_comma = true;
                }
                Some(c) if c == close => {
                    self.bump();
                    return Ok((items, false));
                }
                _ => return Err(self.unexpected()),
            }
        }
    }

    fn dict_or_set(&mut self) -> Result<Literal, LiteralError> {
        self.skip_ws();
        if self.peek() == Some('}') {
            self.bump();
            return Ok(Literal::Map(Vec::new()));
        }
        let first = self.value()?;
        self.skip_ws();
        if self.peek() != Some(':') {
            let mut items = vec![first];
            match self.peek() {
                Some(',') => {
                    self.bump();
                    let (rest, _) = self.sequence('}')?;
                    items.extend(rest);
                }
                Some('}') => {
                    self.bump();
                }
                _ => return Err(self.unexpected()),
            }
            return Ok(Literal::List(items));
        }

        let mut pairs = Vec::new();
        let mut key = first;
        loop {
            self.expect(':')?;
            let value = self.value()?;
            pairs.push((key, value));
            self.skip_ws();
            match self.bump() {
                Some('}') => return Ok(Literal::Map(pairs)),
                Some(',') => {
                    self.skip_ws();
                    if self.peek() == Some('}') {
                        self.bump();
                        return Ok(Literal::Map(pairs));
                    }
                    key = self.value()?;
                }
                Some(ch) => {
                    return Err(LiteralError::UnexpectedChar {
                        ch,
                        offset: self.pos - ch.len_utf8(),
                    })
                }
                None => return Err(LiteralError::UnexpectedEnd),
            }
        }
    }

    fn keyword(&mut self) -> Result<Literal, LiteralError> {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            self.bump();
        }
        match &self.src[start..self.pos] {
            "None" => Ok(Literal::None),
            "True" => Ok(Literal::Bool(true)),
            "False" => Ok(Literal::Bool(false)),
            _ => Err(LiteralError::UnexpectedChar {
                ch: self.src[start..].chars().next().unwrap_or('\0'),
                offset: start,
            }),
        }
    }

    fn number(&mut self) -> Result<Literal, LiteralError> {
        let start = self.pos;
        if matches!(self.peek(), Some('-' | '+')) {
            self.bump();
        }
        let mut is_float = false;
        while let Some(c) = self.peek() {
            match c {
                '0'..='9' | '_' => {}
                '.' => is_float = true,
                'e' | 'E' => {
                    is_float = true;
                    self.bump();
                    if matches!(self.peek(), Some('-' | '+')) {
                        self.bump();
                    }
                    continue;
                }
                _ => break,
            }
            self.bump();
        }
        let text = &self.src[start..self.pos];
        let digits: String = text.chars().filter(|&c| c != '_').collect();
        let invalid = || LiteralError::InvalidNumber {
            text: text.to_string(),
        };
        if is_float {
            digits.parse().map(Literal::Float).map_err(|_| invalid())
        } else {
            digits.parse().map(Literal::Int).map_err(|_| invalid())
        }
    }

    fn string(&mut self) -> Result<String, LiteralError> {
        let quote = self.bump().ok_or(LiteralError::UnexpectedEnd)?;
        let mut out = String::new();
        loop {
            let offset = self.pos;
            match self.bump() {
                None => return Err(LiteralError::UnexpectedEnd),
                Some(c) if c == quote => return Ok(out),
                Some('\\') => out.push(self.escape(offset)?),
                Some(c) => out.push(c),
            }
        }
    }

    fn escape(&mut self, offset: usize) -> Result<char, LiteralError> {
        let invalid = LiteralError::InvalidEscape { offset };
        let ch = match self.bump().ok_or(LiteralError::UnexpectedEnd)? {
            'n' => '\n',
            't' => '\t',
            'r' => '\r',
            '0' => '\0',
            '\\' => '\\',
            '\'' => '\'',
            '"' => '"',
            'x' => return self.hex_escape(2).ok_or(invalid),
            'u' => return self.hex_escape(4).ok_or(invalid),
            _ => return Err(invalid),
        };
        Ok(ch)
    }

    fn hex_escape(&mut self, len: usize) -> Option<char> {
        let digits = self.src.get(self.pos..self.pos + len)?;
        let code = u32::from_str_radix(digits, 16).ok()?;
        self.pos += len;
        char::from_u32(code)
    }
}

impl fmt::Display for Literal {
    /// Writes the value back in literal syntax.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::None => f.write_str("None"),
            Literal::Bool(true) => f.write_str("True"),
            Literal::Bool(false) => f.write_str("False"),
            Literal::Int(n) => write!(f, "{n}"),
            Literal::Float(x) if x.fract() == 0.0 && x.is_finite() => write!(f, "{x:.1}"),
            Literal::Float(x) => write!(f, "{x}"),
            Literal::Str(s) => write!(f, "{s:?}"),
            Literal::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Literal::Map(pairs) => {
                f.write_str("{")?;
                for (i, (k, v)) in pairs.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                f.write_str("}")
            }
        }
    }
}

impl Serialize for Literal {
    /// Maps onto JSON; dict keys that are not strings use their literal form.
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Literal::None => serializer.serialize_unit(),
            Literal::Bool(b) => serializer.serialize_bool(*b),
            Literal::Int(n) => serializer.serialize_i64(*n),
            Literal::Float(x) => serializer.serialize_f64(*x),
            Literal::Str(s) => serializer.serialize_str(s),
            Literal::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Literal::Map(pairs) => {
                let mut map = serializer.serialize_map(Some(pairs.len()))?;
                for (k, v) in pairs {
                    match k {
                        Literal::Str(s) => map.serialize_entry(s, v)?,
                        other => map.serialize_entry(&other.to_string(), v)?,
                    }
                }
                map.end()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(v: &str) -> Literal {
        Literal::Str(v.to_string())
    }

    #[test]
    fn scalars() {
        assert_eq!(parse_literal("None"), Ok(Literal::None));
        assert_eq!(parse_literal(" True "), Ok(Literal::Bool(true)));
        assert_eq!(parse_literal("False"), Ok(Literal::Bool(false)));
        assert_eq!(parse_literal("1"), Ok(Literal::Int(1)));
        assert_eq!(parse_literal("-42"), Ok(Literal::Int(-42)));
        assert_eq!(parse_literal("1_000"), Ok(Literal::Int(1000)));
        assert_eq!(parse_literal("2.5"), Ok(Literal::Float(2.5)));
        assert_eq!(parse_literal("1e3"), Ok(Literal::Float(1000.0)));
        assert_eq!(parse_literal("'value'"), Ok(s("value")));
        assert_eq!(parse_literal(r#""it's""#), Ok(s("it's")));
    }

    #[test]
    fn string_escapes() {
        assert_eq!(parse_literal(r"'a\nb\\c\'d'"), Ok(s("a\nb\\c'd")));
        assert_eq!(parse_literal(r"'\x41é'"), Ok(s("Aé")));
        assert_eq!(
            parse_literal(r"'\q'"),
            Err(LiteralError::InvalidEscape { offset: 1 })
        );
    }

    #[test]
    fn containers() {
        assert_eq!(
            parse_literal("[1, 'two', [None]]"),
            Ok(Literal::List(vec![
                Literal::Int(1),
                s("two"),
                Literal::List(vec![Literal::None]),
            ]))
        );
        assert_eq!(
            parse_literal("{'key': 'value', 'n': 1,}"),
            Ok(Literal::Map(vec![
                (s("key"), s("value")),
                (s("n"), Literal::Int(1)),
            ]))
        );
        assert_eq!(
            parse_literal("[{'key': 'value'}]"),
            Ok(Literal::List(vec![Literal::Map(vec![(s("key"), s("value"))])]))
        );
        assert_eq!(parse_literal("{}"), Ok(Literal::Map(vec![])));
        assert_eq!(parse_literal("[]"), Ok(Literal::List(vec![])));
    }

    #[test]
    fn tuples_and_sets() {
        assert_eq!(parse_literal("(1)"), Ok(Literal::Int(1)));
        assert_eq!(parse_literal("(1,)"), Ok(Literal::List(vec![Literal::Int(1)])));
        assert_eq!(
            parse_literal("(1, 2)"),
            Ok(Literal::List(vec![Literal::Int(1), Literal::Int(2)]))
        );
        assert_eq!(
            parse_literal("{1, 2}"),
            Ok(Literal::List(vec![Literal::Int(1), Literal::Int(2)]))
        );
    }

    #[test]
    fn errors() {
        assert_eq!(parse_literal(""), Err(LiteralError::UnexpectedEnd));
        assert_eq!(parse_literal("[1, 2"), Err(LiteralError::UnexpectedEnd));
        assert!(matches!(
            parse_literal("hello"),
            Err(LiteralError::UnexpectedChar { ch: 'h', offset: 0 })
        ));
        assert!(matches!(
            parse_literal("1 2"),
            Err(LiteralError::UnexpectedChar { ch: '2', offset: 2 })
        ));
        assert!(matches!(
            parse_literal("1.2.3"),
            Err(LiteralError::InvalidNumber { .. })
        ));
    }

    #[test]
    fn eval_default_falls_back_to_string() {
        assert_eq!(eval_default("[1]"), Literal::List(vec![Literal::Int(1)]));
        assert_eq!(eval_default("plain words"), s("plain words"));
        assert_eq!(eval_default(""), s(""));
    }

    #[test]
    fn display_uses_literal_syntax() {
        let value = parse_literal("{'a': [1, 2.0, None, True]}").expect("valid literal");
        assert_eq!(value.to_string(), "{\"a\": [1, 2.0, None, True]}");
    }

    #[test]
    fn serializes_to_json() {
        let value = parse_literal("{'a': [1, 2.5, None, False], 3: 'x'}").expect("valid literal");
        let json = serde_json::to_string(&value).expect("serializable");
        assert_eq!(json, r#"{"a":[1,2.5,null,false],"3":"x"}"#);
    }
}
