use std::fmt::Write;

/// A JSON value. Object keys keep insertion order, so the chat-component
/// layout is exactly what the encoder builds.
#[derive(Debug, Clone, PartialEq)]
pub enum JsonValue {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<JsonValue>),
    Object(Vec<(String, JsonValue)>),
}

impl JsonValue {
    pub fn string(s: impl Into<String>) -> Self {
        JsonValue::String(s.into())
    }

    /// An object with a single entry.
    pub fn single(key: &str, value: JsonValue) -> Self {
        JsonValue::Object(vec![(key.to_string(), value)])
    }

    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        match self {
            JsonValue::Object(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            JsonValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[JsonValue]> {
        match self {
            JsonValue::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Append an entry if this is an object; other values are unchanged.
    pub fn insert(&mut self, key: &str, value: JsonValue) {
        if let JsonValue::Object(entries) = self {
            entries.push((key.to_string(), value));
        }
    }
}

struct JsonWriter {
    buf: String,
}

impl JsonWriter {
    fn new() -> Self {
        JsonWriter { buf: String::new() }
    }

    fn write_value(&mut self, value: &JsonValue) {
        match value {
            JsonValue::Null => self.buf.push_str("null"),
            JsonValue::Bool(b) => self.buf.push_str(if *b { "true" } else { "false" }),
            JsonValue::Number(n) => self.write_number(*n),
            JsonValue::String(s) => self.write_string_value(s),
            JsonValue::Array(items) => self.write_array(items),
            JsonValue::Object(entries) => self.write_object(entries),
        }
    }

    fn write_number(&mut self, n: f64) {
        // Integers print without a decimal point while f64 holds them exactly.
        if n.is_finite() && n.fract() == 0.0 && n.abs() < (1u64 << 53) as f64 {
            let _ = write!(&mut self.buf, "{}", n as i64);
        } else if n.is_finite() {
            let _ = write!(&mut self.buf, "{}", n);
        } else {
            self.buf.push_str("null");
        }
    }

    fn write_array(&mut self, items: &[JsonValue]) {
        self.buf.push('[');
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.buf.push(',');
            }
            self.write_value(item);
        }
        self.buf.push(']');
    }

    fn write_object(&mut self, entries: &[(String, JsonValue)]) {
        self.buf.push('{');
        for (i, (key, value)) in entries.iter().enumerate() {
            if i > 0 {
                self.buf.push(',');
            }
            self.write_string_value(key);
            self.buf.push(':');
            self.write_value(value);
        }
        self.buf.push('}');
    }

    fn write_string_value(&mut self, s: &str) {
        self.buf.push('"');
        for ch in s.chars() {
            match ch {
                '"' => self.buf.push_str("\\\""),
                '\\' => self.buf.push_str("\\\\"),
                '\n' => self.buf.push_str("\\n"),
                '\r' => self.buf.push_str("\\r"),
                '\t' => self.buf.push_str("\\t"),
                '\u{0008}' => self.buf.push_str("\\b"),
                '\u{000C}' => self.buf.push_str("\\f"),
                c if c < '\u{0020}' => {
                    let _ = write!(&mut self.buf, "\\u{:04x}", c as u32);
                }
                c => self.buf.push(c),
            }
        }
        self.buf.push('"');
    }
}

/// Serialize to a compact JSON string (no whitespace), as commands need.
pub fn to_json(value: &JsonValue) -> String {
    let mut w = JsonWriter::new();
    w.write_value(value);
    w.buf
}
