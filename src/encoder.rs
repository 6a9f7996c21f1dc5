//! Encode text components as Java chat-component JSON or Bedrock
//! `rawtext` JSON.

use crate::component::{ComponentKind, TextComponent};
use crate::config::{ConversionConfig, MnMode};
use crate::convert::convert_selector;
use crate::format::{bedrock_text, java_runs, StyledRun, Style};
use crate::json::{to_json, JsonValue};

const SEPARATOR_WARNING: &str =
    "Bedrock does not support selector separators; sep: entries were ignored";

/// A component after its comma-separated entries are expanded: each score
/// and each selector entry becomes its own part.
#[derive(Debug, Clone, PartialEq)]
enum Part {
    Text(String),
    Translate {
        key: String,
        args: Vec<String>,
    },
    Score {
        name: String,
        objective: String,
    },
    Selector {
        java: String,
        bedrock: String,
        separator: Option<String>,
    },
}

#[derive(Default)]
struct Expanded {
    parts: Vec<Part>,
    java_warnings: Vec<String>,
    bedrock_warnings: Vec<String>,
    has_separator: bool,
}

pub(crate) fn push_unique(list: &mut Vec<String>, items: impl IntoIterator<Item = String>) {
    for item in items {
        if !list.contains(&item) {
            list.push(item);
        }
    }
}

// ── Content grammar ─────────────────────────────────────────────────

/// Split on commas, honoring `\,` escapes. With `nested`, commas inside
/// brackets and braces do not split.
fn split_entries(content: &str, nested: bool) -> Vec<String> {
    let mut out = Vec::new();
    let mut cur = String::new();
    let mut depth = 0usize;
    let mut chars = content.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&',') => {
                cur.push(',');
                chars.next();
            }
            '[' | '{' if nested => {
                depth += 1;
                cur.push(c);
            }
            ']' | '}' if nested => {
                depth = depth.saturating_sub(1);
                cur.push(c);
            }
            ',' if depth == 0 => out.push(std::mem::take(&mut cur)),
            _ => cur.push(c),
        }
    }
    out.push(cur);
    out
}

/// `name:objective` pairs; an empty side becomes `*`.
fn parse_score_content(content: &str) -> Vec<(String, String)> {
    let star = |s: &str| {
        let s = s.trim();
        if s.is_empty() {
            "*".to_string()
        } else {
            s.to_string()
        }
    };
    let entries = split_entries(content, false);
    entries
        .iter()
        .map(|e| e.trim())
        .filter(|e| !e.is_empty())
        .map(|e| match e.split_once(':') {
            Some((name, objective)) => (star(name), star(objective)),
            None => (star(e), "*".to_string()),
        })
        .collect()
}

/// Selector entries with their separators. `sep:<value>` sets the
/// separator of the entry before it; the flag reports whether any `sep:`
/// appeared at all.
fn parse_selector_content(content: &str) -> (Vec<(String, Option<String>)>, bool) {
    let mut entries: Vec<(String, Option<String>)> = Vec::new();
    let mut has_separator = false;
    for raw in split_entries(content, true) {
        let entry = raw.trim();
        if let Some(value) = entry.strip_prefix("sep:") {
            has_separator = true;
            let value = if value.is_empty() { "," } else { value };
            match entries.last_mut() {
                Some(last) => last.1 = Some(value.to_string()),
                None => log::debug!("discarding sep:{} with no selector before it", value),
            }
        } else if !entry.is_empty() {
            entries.push((entry.to_string(), None));
        }
    }
    (entries, has_separator)
}

fn expand(components: &[TextComponent], config: &ConversionConfig) -> Expanded {
    let mut out = Expanded::default();
    for component in components {
        match component.kind {
            ComponentKind::Text => out.parts.push(Part::Text(component.content.clone())),
            ComponentKind::Translate => {
                let args = component
                    .sub_components
                    .iter()
                    .flat_map(|s| split_entries(&s.content, false))
                    .filter(|a| !a.is_empty())
                    .collect();
                out.parts.push(Part::Translate {
                    key: component.content.clone(),
                    args,
                });
            }
            ComponentKind::Score => {
                let scores = parse_score_content(&component.content);
                if scores.is_empty() {
                    out.parts.push(Part::Text(component.content.clone()));
                }
                for (name, objective) in scores {
                    out.parts.push(Part::Score { name, objective });
                }
            }
            ComponentKind::Selector => {
                let (entries, has_separator) = parse_selector_content(&component.content);
                out.has_separator |= has_separator;
                if entries.is_empty() {
                    out.parts.push(Part::Text(component.content.clone()));
                }
                for (selector, separator) in entries {
                    let result = convert_selector(&selector, config);
                    push_unique(&mut out.java_warnings, result.java_reminders);
                    push_unique(&mut out.bedrock_warnings, result.bedrock_reminders);
                    out.parts.push(Part::Selector {
                        java: result.java_selector,
                        bedrock: result.bedrock_selector,
                        separator,
                    });
                }
            }
        }
    }
    out
}

// ── Java ────────────────────────────────────────────────────────────

const STYLE_KEYS: &[&str] = &[
    "color",
    "bold",
    "italic",
    "underlined",
    "strikethrough",
    "obfuscated",
];

fn push_style(obj: &mut JsonValue, style: &Style) {
    if let Some(color) = style.color {
        obj.insert("color", JsonValue::string(color));
    }
    for (key, on) in [
        ("bold", style.bold),
        ("italic", style.italic),
        ("underlined", style.underlined),
        ("strikethrough", style.strikethrough),
        ("obfuscated", style.obfuscated),
    ] {
        if on {
            obj.insert(key, JsonValue::Bool(true));
        }
    }
}

fn run_object(run: &StyledRun) -> JsonValue {
    let mut obj = JsonValue::single("text", JsonValue::string(run.text.as_str()));
    push_style(&mut obj, &run.style);
    obj
}

fn carries_style(obj: &JsonValue) -> bool {
    STYLE_KEYS.iter().any(|k| obj.get(k).is_some())
}

/// Combine sibling components into one tree. Children inherit the root's
/// style, so a styled first part goes under an empty root instead.
fn assemble(mut parts: Vec<JsonValue>) -> JsonValue {
    match parts.len() {
        0 => JsonValue::single("text", JsonValue::string("")),
        1 => parts.remove(0),
        _ if carries_style(&parts[0]) => {
            let mut root = JsonValue::single("text", JsonValue::string(""));
            root.insert("extra", JsonValue::Array(parts));
            root
        }
        _ => {
            let mut root = parts.remove(0);
            root.insert("extra", JsonValue::Array(parts));
            root
        }
    }
}

/// A translate argument: a bare string when unformatted.
fn java_arg(arg: &str, config: &ConversionConfig) -> JsonValue {
    let runs = java_runs(arg, config.mn_mode);
    match runs.as_slice() {
        [] => JsonValue::string(""),
        [run] if run.style.is_plain() => JsonValue::string(run.text.as_str()),
        _ => assemble(runs.iter().map(run_object).collect()),
    }
}

fn java_part(part: &Part, config: &ConversionConfig) -> Vec<JsonValue> {
    match part {
        Part::Text(text) => java_runs(text, config.mn_mode).iter().map(run_object).collect(),
        Part::Translate { key, args } => {
            let runs = java_runs(key, config.mn_mode);
            let key_text: String = runs.iter().map(|r| r.text.as_str()).collect();
            let mut obj = JsonValue::single("translate", JsonValue::string(key_text));
            if !args.is_empty() {
                let with = args.iter().map(|a| java_arg(a, config)).collect();
                obj.insert("with", JsonValue::Array(with));
            }
            if let Some(first) = runs.first() {
                push_style(&mut obj, &first.style);
            }
            vec![obj]
        }
        Part::Score { name, objective } => vec![score_object(name, objective)],
        Part::Selector {
            java, separator, ..
        } => {
            let mut obj = JsonValue::single("selector", JsonValue::string(java.as_str()));
            if let Some(sep) = separator {
                obj.insert("separator", JsonValue::string(sep.as_str()));
            }
            vec![obj]
        }
    }
}

fn score_object(name: &str, objective: &str) -> JsonValue {
    JsonValue::single(
        "score",
        JsonValue::Object(vec![
            ("name".to_string(), JsonValue::string(name)),
            ("objective".to_string(), JsonValue::string(objective)),
        ]),
    )
}

pub(crate) fn encode_java(components: &[TextComponent], config: &ConversionConfig) -> (String, Vec<String>) {
    let expanded = expand(components, config);
    let all_text = expanded.parts.iter().all(|p| matches!(p, Part::Text(_)));
    let objects: Vec<JsonValue> = if all_text {
        // Formatting flows across adjacent text components.
        let text: String = expanded
            .parts
            .iter()
            .filter_map(|p| match p {
                Part::Text(t) => Some(t.as_str()),
                _ => None,
            })
            .collect();
        java_runs(&text, config.mn_mode).iter().map(run_object).collect()
    } else {
        expanded.parts.iter().flat_map(|p| java_part(p, config)).collect()
    };
    (to_json(&assemble(objects)), expanded.java_warnings)
}

/// Java `tellraw` JSON for the components.
pub fn to_java_chat_json(components: &[TextComponent], config: &ConversionConfig) -> String {
    encode_java(components, config).0
}

// ── Bedrock ─────────────────────────────────────────────────────────

fn bedrock_part(part: &Part, mode: MnMode) -> Option<JsonValue> {
    match part {
        Part::Text(text) if text.is_empty() => None,
        Part::Text(text) => Some(JsonValue::single("text", JsonValue::string(bedrock_text(text, mode)))),
        Part::Translate { key, args } => {
            let mut obj = JsonValue::single("translate", JsonValue::string(bedrock_text(key, mode)));
            if !args.is_empty() {
                let rawtext = args
                    .iter()
                    .map(|a| JsonValue::single("text", JsonValue::string(bedrock_text(a, mode))))
                    .collect();
                obj.insert("with", JsonValue::single("rawtext", JsonValue::Array(rawtext)));
            }
            Some(obj)
        }
        Part::Score { name, objective } => Some(score_object(name, objective)),
        Part::Selector { bedrock, .. } => {
            Some(JsonValue::single("selector", JsonValue::string(bedrock.as_str())))
        }
    }
}

/// Bedrock `tellraw` JSON for the components, plus warnings about anything
/// Bedrock cannot express.
pub fn to_bedrock_rawtext_json(
    components: &[TextComponent],
    config: &ConversionConfig,
) -> (String, Vec<String>) {
    let expanded = expand(components, config);
    let mut items: Vec<JsonValue> = expanded
        .parts
        .iter()
        .filter_map(|p| bedrock_part(p, config.mn_mode))
        .collect();
    if items.is_empty() {
        items.push(JsonValue::single("text", JsonValue::string("")));
    }
    let mut warnings = expanded.bedrock_warnings;
    if expanded.has_separator {
        log::warn!("selector separators dropped for Bedrock");
        push_unique(&mut warnings, [SEPARATOR_WARNING.to_string()]);
    }
    let json = to_json(&JsonValue::single("rawtext", JsonValue::Array(items)));
    (json, warnings)
}
