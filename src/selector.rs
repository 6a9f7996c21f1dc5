use std::fmt;

use crate::params::BEDROCK_VARIABLES;
use crate::range::ParameterValue;

// ── Variables ───────────────────────────────────────────────────────

/// The `@x` head of a selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectorVariable {
    AllPlayers,
    NearestPlayer,
    RandomPlayer,
    AllEntities,
    Executor,
    NearestEntity,
    Initiator,
    Agent,
    AllAgents,
    /// A player name or anything else that is not a known `@` variable.
    Custom(String),
}

impl SelectorVariable {
    pub fn parse(s: &str) -> Self {
        match s {
            "@a" => SelectorVariable::AllPlayers,
            "@p" => SelectorVariable::NearestPlayer,
            "@r" => SelectorVariable::RandomPlayer,
            "@e" => SelectorVariable::AllEntities,
            "@s" => SelectorVariable::Executor,
            "@n" => SelectorVariable::NearestEntity,
            "@initiator" => SelectorVariable::Initiator,
            "@c" => SelectorVariable::Agent,
            "@v" => SelectorVariable::AllAgents,
            other => SelectorVariable::Custom(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            SelectorVariable::AllPlayers => "@a",
            SelectorVariable::NearestPlayer => "@p",
            SelectorVariable::RandomPlayer => "@r",
            SelectorVariable::AllEntities => "@e",
            SelectorVariable::Executor => "@s",
            SelectorVariable::NearestEntity => "@n",
            SelectorVariable::Initiator => "@initiator",
            SelectorVariable::Agent => "@c",
            SelectorVariable::AllAgents => "@v",
            SelectorVariable::Custom(s) => s,
        }
    }

    pub fn is_bedrock_only(&self) -> bool {
        BEDROCK_VARIABLES.contains(&self.as_str())
    }
}

// ── Parameters ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub value: ParameterValue,
}

impl Parameter {
    pub fn new(name: &str, value: &str) -> Self {
        Parameter {
            name: name.to_string(),
            value: ParameterValue::parse(value),
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.value)
    }
}

// ── Selectors ───────────────────────────────────────────────────────

/// A parsed selector: a variable plus an ordered parameter list. Order and
/// repetition are both significant.
#[derive(Debug, Clone, PartialEq)]
pub struct Selector {
    pub variable: SelectorVariable,
    pub parameters: Vec<Parameter>,
}

impl Selector {
    /// Parse leniently. Stray commas, entries without `=`, and anything
    /// after the closing bracket are discarded; this never fails.
    pub fn parse(text: &str) -> Selector {
        let text = text.trim();
        let head = match text.find('[') {
            Some(i) => &text[..i],
            None => text,
        };
        let parameters = match bracket_body(text) {
            Some(body) => split_top_level(body, ',')
                .into_iter()
                .filter_map(|entry| {
                    let (name, value) = entry.split_once('=')?;
                    let name = name.trim();
                    if name.is_empty() {
                        log::debug!("discarding selector entry with empty name: {:?}", entry);
                        return None;
                    }
                    Some(Parameter::new(name, value))
                })
                .collect(),
            None => Vec::new(),
        };
        Selector {
            variable: SelectorVariable::parse(head.trim()),
            parameters,
        }
    }

    pub fn has(&self, name: &str) -> bool {
        self.parameters.iter().any(|p| p.name == name)
    }

    pub fn values<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a ParameterValue> + 'a {
        self.parameters
            .iter()
            .filter(move |p| p.name == name)
            .map(|p| &p.value)
    }

    /// Remove every occurrence of `name`, returning the removed values.
    pub fn take(&mut self, name: &str) -> Vec<ParameterValue> {
        let mut taken = Vec::new();
        self.parameters.retain(|p| {
            if p.name == name {
                taken.push(p.value.clone());
                false
            } else {
                true
            }
        });
        taken
    }

    pub fn push(&mut self, name: &str, value: &str) {
        self.parameters.push(Parameter::new(name, value));
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.variable.as_str())?;
        if self.parameters.is_empty() {
            return Ok(());
        }
        f.write_str("[")?;
        for (i, p) in self.parameters.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", p)?;
        }
        f.write_str("]")
    }
}

/// The text between the first `[` and its matching `]`. An unclosed list
/// runs to the end of the input.
pub(crate) fn bracket_body(text: &str) -> Option<&str> {
    let open = text.find('[')?;
    let body = &text[open + 1..];
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    for (i, ch) in body.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == q {
                quote = None;
            }
            continue;
        }
        match ch {
            '"' | '\'' => quote = Some(ch),
            '[' | '{' => depth += 1,
            ']' if depth == 0 => return Some(&body[..i]),
            ']' | '}' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    Some(body)
}

/// Split on `sep` wherever it is outside braces, brackets and quotes.
pub(crate) fn split_top_level(text: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut start = 0;
    for (i, ch) in text.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == q {
                quote = None;
            }
            continue;
        }
        match ch {
            '"' | '\'' => quote = Some(ch),
            '[' | '{' => depth += 1,
            ']' | '}' => depth = depth.saturating_sub(1),
            c if c == sep && depth == 0 => {
                parts.push(&text[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&text[start..]);
    parts
}
