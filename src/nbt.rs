//! A small tagged tree for the stringified-NBT style compounds found in
//! selector values: Java's `nbt={Key:value}` and Bedrock's
//! `hasitem={key=value}` share this parser, differing only in the key
//! separator.

use std::fmt::Write;

use crate::error::ConvertError;

#[derive(Debug, Clone, PartialEq)]
pub enum Tag {
    Compound(Vec<(String, Tag)>),
    List(Vec<Tag>),
    /// A quoted string, unescaped.
    String(String),
    /// An unquoted scalar kept verbatim: `3b`, `1.5f`, `slot.hotbar`, `1..5`.
    Value(String),
}

impl Tag {
    pub fn get(&self, key: &str) -> Option<&Tag> {
        match self {
            Tag::Compound(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    /// The text of a string or scalar tag.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Tag::String(s) | Tag::Value(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Tag]> {
        match self {
            Tag::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn is_compound(&self) -> bool {
        matches!(self, Tag::Compound(_))
    }

    /// Render back to text using `key_sep` between keys and values.
    pub fn render(&self, key_sep: char) -> String {
        let mut buf = String::new();
        self.write_to(&mut buf, key_sep);
        buf
    }

    fn write_to(&self, buf: &mut String, key_sep: char) {
        match self {
            Tag::Compound(entries) => {
                buf.push('{');
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        buf.push(',');
                    }
                    if key.chars().all(is_bare_char) && !key.is_empty() {
                        buf.push_str(key);
                    } else {
                        write_quoted(buf, key);
                    }
                    buf.push(key_sep);
                    value.write_to(buf, key_sep);
                }
                buf.push('}');
            }
            Tag::List(items) => {
                buf.push('[');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        buf.push(',');
                    }
                    item.write_to(buf, key_sep);
                }
                buf.push(']');
            }
            Tag::String(s) => write_quoted(buf, s),
            Tag::Value(s) => buf.push_str(s),
        }
    }
}

fn write_quoted(buf: &mut String, s: &str) {
    buf.push('"');
    for ch in s.chars() {
        if ch == '"' || ch == '\\' {
            buf.push('\\');
        }
        buf.push(ch);
    }
    buf.push('"');
}

fn is_bare_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '+')
}

/// Parse a complete compound or list. `key_sep` is `:` for NBT and `=` for
/// `hasitem`.
pub fn parse(input: &str, key_sep: char) -> Result<Tag, ConvertError> {
    let mut parser = Parser {
        input,
        pos: 0,
        key_sep,
    };
    let tag = parser.parse_tag()?;
    parser.skip_ws();
    if parser.pos < parser.input.len() {
        return Err(ConvertError::nbt("Trailing content", parser.pos));
    }
    Ok(tag)
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
    key_sep: char,
}

impl<'a> Parser<'a> {
    // ── Helpers ──────────────────────────────────────────────────────

    fn remaining(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn peek_char(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    fn advance(&mut self, n: usize) {
        self.pos += n;
    }

    fn eat_char(&mut self, ch: char) -> bool {
        if self.peek_char() == Some(ch) {
            self.advance(ch.len_utf8());
            true
        } else {
            false
        }
    }

    fn expect_char(&mut self, ch: char) -> Result<(), ConvertError> {
        self.skip_ws();
        if self.eat_char(ch) {
            Ok(())
        } else {
            Err(ConvertError::nbt(format!("Expected '{}'", ch), self.pos))
        }
    }

    fn skip_ws(&mut self) {
        while let Some(c) = self.peek_char() {
            if c.is_whitespace() {
                self.advance(c.len_utf8());
            } else {
                break;
            }
        }
    }

    // ── Grammar ──────────────────────────────────────────────────────

    fn parse_tag(&mut self) -> Result<Tag, ConvertError> {
        self.skip_ws();
        match self.peek_char() {
            Some('{') => self.parse_compound(),
            Some('[') => self.parse_list(),
            Some(q @ ('"' | '\'')) => Ok(Tag::String(self.parse_quoted(q)?)),
            Some(_) => {
                let start = self.pos;
                while let Some(c) = self.peek_char() {
                    if matches!(c, ',' | '}' | ']') {
                        break;
                    }
                    self.advance(c.len_utf8());
                }
                let text = self.input[start..self.pos].trim();
                if text.is_empty() {
                    return Err(ConvertError::nbt("Expected a value", start));
                }
                Ok(Tag::Value(text.to_string()))
            }
            None => Err(ConvertError::nbt("Unexpected end of input", self.pos)),
        }
    }

    fn parse_compound(&mut self) -> Result<Tag, ConvertError> {
        self.expect_char('{')?;
        let mut entries = Vec::new();
        self.skip_ws();
        if self.eat_char('}') {
            return Ok(Tag::Compound(entries));
        }
        loop {
            let key = self.parse_key()?;
            self.expect_char(self.key_sep)?;
            let value = self.parse_tag()?;
            entries.push((key, value));
            self.skip_ws();
            if self.eat_char(',') {
                continue;
            }
            self.expect_char('}')?;
            return Ok(Tag::Compound(entries));
        }
    }

    fn parse_list(&mut self) -> Result<Tag, ConvertError> {
        self.expect_char('[')?;
        // Typed arrays: [B;1b,2b], [I;1,2], [L;1l]
        for prefix in ["B;", "I;", "L;"] {
            if self.remaining().starts_with(prefix) {
                self.advance(2);
            }
        }
        let mut items = Vec::new();
        self.skip_ws();
        if self.eat_char(']') {
            return Ok(Tag::List(items));
        }
        loop {
            items.push(self.parse_tag()?);
            self.skip_ws();
            if self.eat_char(',') {
                continue;
            }
            self.expect_char(']')?;
            return Ok(Tag::List(items));
        }
    }

    fn parse_key(&mut self) -> Result<String, ConvertError> {
        self.skip_ws();
        if let Some(q @ ('"' | '\'')) = self.peek_char() {
            return self.parse_quoted(q);
        }
        let start = self.pos;
        while let Some(c) = self.peek_char() {
            if !is_bare_char(c) || c == self.key_sep {
                break;
            }
            self.advance(c.len_utf8());
        }
        if self.pos == start {
            return Err(ConvertError::nbt("Expected a key", start));
        }
        Ok(self.input[start..self.pos].to_string())
    }

    fn parse_quoted(&mut self, quote: char) -> Result<String, ConvertError> {
        let start = self.pos;
        self.advance(quote.len_utf8());
        let mut s = String::new();
        while let Some(c) = self.peek_char() {
            self.advance(c.len_utf8());
            if c == quote {
                return Ok(s);
            }
            if c == '\\' {
                match self.peek_char() {
                    Some(esc) => {
                        self.advance(esc.len_utf8());
                        s.push(esc);
                    }
                    None => break,
                }
            } else {
                s.push(c);
            }
        }
        Err(ConvertError::nbt("Unterminated string", start))
    }
}

/// Render a compact debug listing of a tag's keys; used in log output.
pub(crate) fn describe(tag: &Tag) -> String {
    let mut out = String::new();
    match tag {
        Tag::Compound(entries) => {
            out.push('{');
            for (i, (k, _)) in entries.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(k);
            }
            out.push('}');
        }
        Tag::List(items) => {
            let _ = write!(out, "[{} items]", items.len());
        }
        Tag::String(s) | Tag::Value(s) => out.push_str(s),
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_inventory() {
        let tag = parse(
            r#"{Inventory:[{Slot:8b,id:"minecraft:apple",Count:3b}]}"#,
            ':',
        )
        .unwrap();
        let items = tag.get("Inventory").and_then(Tag::as_list).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].get("Slot").and_then(Tag::as_str), Some("8b"));
        assert_eq!(items[0].get("id").and_then(Tag::as_str), Some("minecraft:apple"));
    }

    #[test]
    fn parse_hasitem_syntax() {
        let tag = parse("{item=apple, quantity=1..5 ,location=slot.hotbar}", '=').unwrap();
        assert_eq!(tag.get("quantity").and_then(Tag::as_str), Some("1..5"));
        assert_eq!(tag.get("location").and_then(Tag::as_str), Some("slot.hotbar"));
        assert_eq!(
            tag.render('='),
            "{item=apple,quantity=1..5,location=slot.hotbar}"
        );
    }

    #[test]
    fn render_quotes_strings() {
        let tag = parse(r#"{CustomName:'say "hi"',Tags:[a,b]}"#, ':').unwrap();
        assert_eq!(tag.render(':'), r#"{CustomName:"say \"hi\"",Tags:[a,b]}"#);
    }

    #[test]
    fn errors_carry_offsets() {
        let err = parse("{id:\"apple\"", ':').unwrap_err();
        assert_eq!(err.code(), "nbt-parse-error");
        assert!(parse("{a:1} x", ':').is_err());
        assert!(parse("{:1}", ':').is_err());
    }

    #[test]
    fn typed_arrays() {
        let tag = parse("{UUID:[I;1,2,3,4]}", ':').unwrap();
        assert_eq!(tag.get("UUID").and_then(Tag::as_list).map(|l| l.len()), Some(4));
    }
}
