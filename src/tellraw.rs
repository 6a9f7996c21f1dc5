//! `tellraw` command assembly and validation.

use std::sync::LazyLock;

use regex::Regex;

use crate::component::parse_text_components;
use crate::config::ConversionConfig;
use crate::convert::convert_selector;
use crate::encoder::{encode_java, push_unique, to_bedrock_rawtext_json};
use crate::error::ConvertError;
use crate::from_json::from_json;

/// Java selector variables accepted by [`validate_tellraw_command`].
static SELECTOR_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^@[aprsen](\[.*\])?$").expect("selector pattern is valid"));

/// Both editions' commands for one selector and message.
#[derive(Debug, Clone, PartialEq)]
pub struct TellrawOutput {
    pub java_command: String,
    pub bedrock_command: String,
    /// Selector reminders first, then encoder warnings, without duplicates.
    pub warnings: Vec<String>,
}

/// Build the Java and Bedrock `tellraw` commands for `selector` and a
/// marker-delimited message buffer.
pub fn generate_tellraw(selector: &str, buffer: &str, config: &ConversionConfig) -> TellrawOutput {
    let selector = match selector.trim() {
        "" => "@a",
        s => s,
    };
    let target = convert_selector(selector, config);
    let components = parse_text_components(buffer);
    let (java_json, java_warnings) = encode_java(&components, config);
    let (bedrock_json, bedrock_warnings) = to_bedrock_rawtext_json(&components, config);

    let mut warnings = Vec::new();
    push_unique(&mut warnings, target.java_reminders);
    push_unique(&mut warnings, target.bedrock_reminders);
    push_unique(&mut warnings, java_warnings);
    push_unique(&mut warnings, bedrock_warnings);

    TellrawOutput {
        java_command: format!("tellraw {} {}", target.java_selector, java_json),
        bedrock_command: format!("tellraw {} {}", target.bedrock_selector, bedrock_json),
        warnings,
    }
}

/// Byte offset of the first whitespace outside brackets and quotes.
fn selector_end(text: &str) -> usize {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    for (i, c) in text.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' => quote = Some(c),
            '[' | '{' => depth += 1,
            ']' | '}' => depth = depth.saturating_sub(1),
            c if c.is_whitespace() && depth == 0 => return i,
            _ => {}
        }
    }
    text.len()
}

/// Check that `command` is `tellraw <selector> <json>` with a Java selector
/// variable and well-formed JSON.
pub fn validate_tellraw_command(command: &str) -> Result<(), ConvertError> {
    let invalid = |message: String| Err(ConvertError::InvalidCommand(message));

    let Some(rest) = command.trim().strip_prefix("tellraw ") else {
        return invalid("command must start with 'tellraw '".to_string());
    };
    let rest = rest.trim_start();
    let (selector, json) = rest.split_at(selector_end(rest));
    let json = json.trim();
    if selector.is_empty() || json.is_empty() {
        return invalid("expected 'tellraw <selector> <json>'".to_string());
    }
    if !selector.starts_with('@') {
        return invalid(format!("selector '{}' must start with '@'", selector));
    }
    if !SELECTOR_SHAPE.is_match(selector) {
        return invalid(format!("unsupported selector '{}'", selector));
    }
    from_json(json)?;
    Ok(())
}
