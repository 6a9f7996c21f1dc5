use crate::error::ConvertError;
use crate::json::JsonValue;

/// Parse a JSON document. The inverse of [`crate::json::to_json`].
pub fn from_json(input: &str) -> Result<JsonValue, ConvertError> {
    let mut p = JsonParser::new(input);
    let value = p.parse_value().map_err(ConvertError::Json)?;
    p.skip_ws();
    if p.pos < p.input.len() {
        return Err(ConvertError::Json(format!(
            "Trailing content at position {}",
            p.pos
        )));
    }
    Ok(value)
}

struct JsonParser<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> JsonParser<'a> {
    fn new(input: &'a str) -> Self {
        JsonParser {
            input: input.as_bytes(),
            pos: 0,
        }
    }

    fn skip_ws(&mut self) {
        while self.pos < self.input.len() {
            match self.input[self.pos] {
                b' ' | b'\t' | b'\n' | b'\r' => self.pos += 1,
                _ => break,
            }
        }
    }

    fn peek(&mut self) -> Option<u8> {
        self.skip_ws();
        self.input.get(self.pos).copied()
    }

    fn expect(&mut self, ch: u8) -> Result<(), String> {
        self.skip_ws();
        if self.input.get(self.pos) == Some(&ch) {
            self.pos += 1;
            Ok(())
        } else {
            let found = match self.input.get(self.pos) {
                Some(b) => format!("'{}'", *b as char),
                None => "EOF".to_string(),
            };
            Err(format!(
                "Expected '{}' at position {}, found {}",
                ch as char, self.pos, found
            ))
        }
    }

    /// Consume a `,` separator; returns false at the end of a sequence.
    fn eat_comma(&mut self) -> bool {
        self.skip_ws();
        if self.input.get(self.pos) == Some(&b',') {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn parse_value(&mut self) -> Result<JsonValue, String> {
        match self.peek() {
            Some(b'{') => self.parse_object(),
            Some(b'[') => self.parse_array(),
            Some(b'"') => Ok(JsonValue::String(self.parse_string()?)),
            Some(b't') => {
                self.parse_literal(b"true")?;
                Ok(JsonValue::Bool(true))
            }
            Some(b'f') => {
                self.parse_literal(b"false")?;
                Ok(JsonValue::Bool(false))
            }
            Some(b'n') => {
                self.parse_literal(b"null")?;
                Ok(JsonValue::Null)
            }
            Some(ch) if ch == b'-' || ch.is_ascii_digit() => Ok(JsonValue::Number(self.parse_number()?)),
            Some(ch) => Err(format!(
                "Unexpected character '{}' at position {}",
                ch as char, self.pos
            )),
            None => Err("Unexpected end of input".to_string()),
        }
    }

    fn parse_object(&mut self) -> Result<JsonValue, String> {
        self.expect(b'{')?;
        let mut entries = Vec::new();
        if self.peek() != Some(b'}') {
            loop {
                let key = self.parse_string()?;
                self.expect(b':')?;
                let value = self.parse_value()?;
                entries.push((key, value));
                if !self.eat_comma() {
                    break;
                }
            }
        }
        self.expect(b'}')?;
        Ok(JsonValue::Object(entries))
    }

    fn parse_array(&mut self) -> Result<JsonValue, String> {
        self.expect(b'[')?;
        let mut items = Vec::new();
        if self.peek() != Some(b']') {
            loop {
                items.push(self.parse_value()?);
                if !self.eat_comma() {
                    break;
                }
            }
        }
        self.expect(b']')?;
        Ok(JsonValue::Array(items))
    }

    fn parse_string(&mut self) -> Result<String, String> {
        self.expect(b'"')?;
        let mut s = String::new();
        while self.pos < self.input.len() {
            let ch = self.input[self.pos];
            if ch == b'"' {
                self.pos += 1;
                return Ok(s);
            }
            if ch == b'\\' {
                self.pos += 1;
                let Some(&esc) = self.input.get(self.pos) else {
                    return Err("Unexpected end of input in string escape".to_string());
                };
                match esc {
                    b'"' => s.push('"'),
                    b'\\' => s.push('\\'),
                    b'/' => s.push('/'),
                    b'n' => s.push('\n'),
                    b'r' => s.push('\r'),
                    b't' => s.push('\t'),
                    b'b' => s.push('\u{0008}'),
                    b'f' => s.push('\u{000C}'),
                    b'u' => {
                        self.pos += 1;
                        let cp = self.parse_hex4()?;
                        if (0xD800..=0xDBFF).contains(&cp) {
                            // High surrogate: expect a \uXXXX low surrogate next.
                            if self.input.get(self.pos) == Some(&b'\\')
                                && self.input.get(self.pos + 1) == Some(&b'u')
                            {
                                self.pos += 2;
                                let low = self.parse_hex4()?;
                                let c = if (0xDC00..=0xDFFF).contains(&low) {
                                    char::from_u32(
                                        0x10000 + ((cp as u32 - 0xD800) << 10) + (low as u32 - 0xDC00),
                                    )
                                } else {
                                    None
                                };
                                s.push(c.unwrap_or(char::REPLACEMENT_CHARACTER));
                            } else {
                                s.push(char::REPLACEMENT_CHARACTER);
                            }
                        } else {
                            s.push(char::from_u32(cp as u32).unwrap_or(char::REPLACEMENT_CHARACTER));
                        }
                        continue; // parse_hex4 already advanced pos
                    }
                    other => {
                        return Err(format!("Unknown escape '\\{}'", other as char));
                    }
                }
                self.pos += 1;
            } else {
                let width = utf8_char_width(ch);
                let slice = self
                    .input
                    .get(self.pos..self.pos + width)
                    .ok_or_else(|| "Invalid UTF-8 in JSON string".to_string())?;
                let cs = std::str::from_utf8(slice).map_err(|_| "Invalid UTF-8 in JSON string".to_string())?;
                s.push_str(cs);
                self.pos += width;
            }
        }
        Err("Unterminated string".to_string())
    }

    fn parse_hex4(&mut self) -> Result<u16, String> {
        let hex = self
            .input
            .get(self.pos..self.pos + 4)
            .ok_or_else(|| "Unexpected end of input in \\u escape".to_string())?;
        let hex_str = std::str::from_utf8(hex).map_err(|_| "Invalid hex in \\u escape".to_string())?;
        let val = u16::from_str_radix(hex_str, 16)
            .map_err(|_| format!("Invalid hex in \\u escape: {}", hex_str))?;
        self.pos += 4;
        Ok(val)
    }

    fn parse_number(&mut self) -> Result<f64, String> {
        self.skip_ws();
        let start = self.pos;
        if self.input.get(self.pos) == Some(&b'-') {
            self.pos += 1;
        }
        self.consume_digits();
        if self.input.get(self.pos) == Some(&b'.') {
            self.pos += 1;
            self.consume_digits();
        }
        if matches!(self.input.get(self.pos), Some(b'e' | b'E')) {
            self.pos += 1;
            if matches!(self.input.get(self.pos), Some(b'+' | b'-')) {
                self.pos += 1;
            }
            self.consume_digits();
        }
        let num_str = std::str::from_utf8(&self.input[start..self.pos])
            .map_err(|_| "Invalid number encoding".to_string())?;
        num_str
            .parse::<f64>()
            .map_err(|e| format!("Invalid number \"{}\": {}", num_str, e))
    }

    fn consume_digits(&mut self) {
        while self.input.get(self.pos).is_some_and(u8::is_ascii_digit) {
            self.pos += 1;
        }
    }

    fn parse_literal(&mut self, expected: &[u8]) -> Result<(), String> {
        if self.input.get(self.pos..self.pos + expected.len()) == Some(expected) {
            self.pos += expected.len();
            Ok(())
        } else {
            Err(format!("Unexpected token at position {}", self.pos))
        }
    }
}

fn utf8_char_width(first_byte: u8) -> usize {
    match first_byte {
        0..=0x7F => 1,
        0xC0..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF7 => 4,
        _ => 1, // invalid leading byte, consume 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::json::to_json;

    #[test]
    fn round_trip_component() {
        let json = r#"{"text":"§cHi","extra":[{"selector":"@a","separator":"|"}],"bold":true}"#;
        let v = from_json(json).unwrap();
        assert_eq!(to_json(&v), json);
    }

    #[test]
    fn whitespace_and_escapes() {
        let v = from_json(" { \"a\" : [ 1 , -2.5e1 , null ] , \"b\" : \"\\u00a7\\n\" } ").unwrap();
        assert_eq!(v.get("b").and_then(JsonValue::as_str), Some("§\n"));
        assert_eq!(
            v.get("a").and_then(JsonValue::as_array),
            Some(&[JsonValue::Number(1.0), JsonValue::Number(-25.0), JsonValue::Null][..])
        );
    }

    #[test]
    fn multibyte_and_surrogates() {
        assert_eq!(from_json(r#""😀""#).unwrap().as_str(), Some("😀"));
        assert_eq!(from_json(r#""\ud83d\ude00""#).unwrap().as_str(), Some("😀"));
        assert_eq!(from_json(r#""\ud83d""#).unwrap().as_str(), Some("\u{fffd}"));
    }

    #[test]
    fn errors() {
        assert!(from_json("{").is_err());
        assert!(from_json("{\"a\":1,}").is_err());
        assert!(from_json("[1] 2").is_err());
        assert_eq!(from_json("tru").unwrap_err().code(), "json-parse-error");
    }
}
