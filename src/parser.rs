//! Decoder for the serialized `genres` column.
//!
//! The field holds a bracketed list of maps written as quoted literals,
//! e.g. `[{'id': 16, 'name': 'Animation'}]`. The grammar accepted here is
//! literals only: lists, maps with string keys, single- or double-quoted
//! strings, integers, floats, booleans, and null. Input is parsed, never
//! evaluated.

use thiserror::Error;

/// A value in the restricted literal grammar.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Null,
    List(Vec<Literal>),
    Map(Vec<(String, Literal)>),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenreParseError {
    #[error("unexpected character {found:?} at offset {offset}")]
    Unexpected { found: char, offset: usize },

    #[error("unexpected end of input")]
    Eof,

    #[error("invalid number {fragment:?} at offset {offset}")]
    Number { fragment: String, offset: usize },

    #[error("unknown word {fragment:?} at offset {offset}")]
    Word { fragment: String, offset: usize },

    #[error("trailing characters at offset {offset}")]
    Trailing { offset: usize },

    #[error("expected a list of genre entries")]
    NotAList,

    #[error("genre entry has no name")]
    MissingName,
}

/// Parses a complete literal, requiring the whole input to be consumed.
pub fn parse_literal(input: &str) -> Result<Literal, GenreParseError> {
    let mut cursor = Cursor::new(input);
    let value = cursor.value()?;
    cursor.skip_ws();
    if cursor.pos != input.len() {
        return Err(GenreParseError::Trailing { offset: cursor.pos });
    }
    Ok(value)
}

/// Decodes one row's raw genres field into its list of genre names.
///
/// An absent or empty field decodes to no genres. A present field must be a
/// list of maps, each carrying a string `name` value.
pub fn decode_genres(raw: &str) -> Result<Vec<String>, GenreParseError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(Vec::new());
    }

    let Literal::List(items) = parse_literal(raw)? else {
        return Err(GenreParseError::NotAList);
    };

    let mut names = Vec::with_capacity(items.len());
    for item in items {
        let Literal::Map(entries) = item else {
            return Err(GenreParseError::NotAList);
        };
        let name = entries.iter().find_map(|(key, value)| match (key.as_str(), value) {
            ("name", Literal::Str(name)) => Some(name.clone()),
            _ => None,
        });
        names.push(name.ok_or(GenreParseError::MissingName)?);
    }
    Ok(names)
}

/// Byte-offset cursor over the input, one recursive-descent rule per
/// grammar production.
struct Cursor<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_ws(&mut self) {
        while let Some(c) = self.peek() {
            if !c.is_whitespace() {
                break;
            }
            self.pos += c.len_utf8();
        }
    }

    fn expect(&mut self, want: char) -> Result<(), GenreParseError> {
        match self.peek() {
            Some(c) if c == want => {
                self.bump();
                Ok(())
            }
            Some(c) => Err(GenreParseError::Unexpected {
                found: c,
                offset: self.pos,
            }),
            None => Err(GenreParseError::Eof),
        }
    }

    fn value(&mut self) -> Result<Literal, GenreParseError> {
        self.skip_ws();
        match self.peek() {
            Some('[') => self.list(),
            Some('{') => self.map(),
            Some('\'') | Some('"') => Ok(Literal::Str(self.string()?)),
            Some(c) if c == '-' || c == '+' || c.is_ascii_digit() => self.number(),
            Some(c) if c.is_ascii_alphabetic() => self.word(),
            Some(c) => Err(GenreParseError::Unexpected {
                found: c,
                offset: self.pos,
            }),
            None => Err(GenreParseError::Eof),
        }
    }

    fn list(&mut self) -> Result<Literal, GenreParseError> {
        self.expect('[')?;
        let mut items = Vec::new();
        self.skip_ws();
        if self.peek() == Some(']') {
            self.bump();
            return Ok(Literal::List(items));
        }

        loop {
            items.push(self.value()?);
            self.skip_ws();
            match self.peek() {
                Some(',') => {
                    self.bump();
                    self.skip_ws();
                    // trailing comma
                    if self.peek() == Some(']') {
                        self.bump();
                        break;
                    }
                }
                Some(']') => {
                    self.bump();
                    break;
                }
                Some(c) => {
                    return Err(GenreParseError::Unexpected {
                        found: c,
                        offset: self.pos,
                    });
                }
                None => return Err(GenreParseError::Eof),
            }
        }
        Ok(Literal::List(items))
    }

    fn map(&mut self) -> Result<Literal, GenreParseError> {
        self.expect('{')?;
        let mut entries = Vec::new();
        self.skip_ws();
        if self.peek() == Some('}') {
            self.bump();
            return Ok(Literal::Map(entries));
        }

        loop {
            self.skip_ws();
            let key = match self.peek() {
                Some('\'') | Some('"') => self.string()?,
                Some(c) => {
                    return Err(GenreParseError::Unexpected {
                        found: c,
                        offset: self.pos,
                    });
                }
                None => return Err(GenreParseError::Eof),
            };
            self.skip_ws();
            self.expect(':')?;
            let value = self.value()?;
            entries.push((key, value));

            self.skip_ws();
            match self.peek() {
                Some(',') => {
                    self.bump();
                    self.skip_ws();
                    if self.peek() == Some('}') {
                        self.bump();
                        break;
                    }
                }
                Some('}') => {
                    self.bump();
                    break;
                }
                Some(c) => {
                    return Err(GenreParseError::Unexpected {
                        found: c,
                        offset: self.pos,
                    });
                }
                None => return Err(GenreParseError::Eof),
            }
        }
        Ok(Literal::Map(entries))
    }

    fn string(&mut self) -> Result<String, GenreParseError> {
        let quote = self.bump().ok_or(GenreParseError::Eof)?;
        let mut out = String::new();
        loop {
            match self.bump() {
                Some('\\') => {
                    let escaped = self.bump().ok_or(GenreParseError::Eof)?;
                    out.push(match escaped {
                        'n' => '\n',
                        't' => '\t',
                        'r' => '\r',
                        other => other,
                    });
                }
                Some(c) if c == quote => break,
                Some(c) => out.push(c),
                None => return Err(GenreParseError::Eof),
            }
        }
        Ok(out)
    }

    fn number(&mut self) -> Result<Literal, GenreParseError> {
        let start = self.pos;
        if matches!(self.peek(), Some('-') | Some('+')) {
            self.bump();
        }
        let mut is_float = false;
        while let Some(c) = self.peek() {
            match c {
                '0'..='9' => {
                    self.bump();
                }
                '.' | 'e' | 'E' => {
                    is_float = true;
                    self.bump();
                }
                _ => break,
            }
        }

        let text = &self.input[start..self.pos];
        let value = if is_float {
            text.parse::<f64>().ok().map(Literal::Float)
        } else {
            text.parse::<i64>().ok().map(Literal::Int)
        };
        value.ok_or_else(|| GenreParseError::Number {
            fragment: text.to_string(),
            offset: start,
        })
    }

    fn word(&mut self) -> Result<Literal, GenreParseError> {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_ascii_alphabetic()) {
            self.bump();
        }
        match &self.input[start..self.pos] {
            "True" | "true" => Ok(Literal::Bool(true)),
            "False" | "false" => Ok(Literal::Bool(false)),
            "None" | "null" => Ok(Literal::Null),
            other => Err(GenreParseError::Word {
                fragment: other.to_string(),
                offset: start,
            }),
        }
    }
}
