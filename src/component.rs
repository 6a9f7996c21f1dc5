//! Text components stored in a flat, editable buffer.
//!
//! A component is written as
//! `START key END content (START subKey END subContent END)* END`, where
//! `START` and `END` are two private sentinel characters. Plain text outside
//! any component is an implicit `text` component. Stray or unmatched
//! markers are kept as literal characters; parsing never fails.

use std::fmt;

pub const START: char = '\u{0FC8}';
pub const END: char = '\u{0F34}';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentKind {
    Text,
    Translate,
    Score,
    Selector,
}

impl ComponentKind {
    pub fn key(self) -> &'static str {
        match self {
            ComponentKind::Text => "text",
            ComponentKind::Translate => "translate",
            ComponentKind::Score => "score",
            ComponentKind::Selector => "selector",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "text" => Some(ComponentKind::Text),
            "translate" => Some(ComponentKind::Translate),
            "score" => Some(ComponentKind::Score),
            "selector" => Some(ComponentKind::Selector),
            _ => None,
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Sub-component kinds. Only `translate` carries sub-components.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubComponentKind {
    With,
}

impl SubComponentKind {
    pub fn key(self) -> &'static str {
        match self {
            SubComponentKind::With => "with",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "with" => Some(SubComponentKind::With),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubComponent {
    pub kind: SubComponentKind,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextComponent {
    pub kind: ComponentKind,
    pub content: String,
    pub sub_components: Vec<SubComponent>,
}

impl TextComponent {
    pub fn new(kind: ComponentKind, content: impl Into<String>) -> Self {
        TextComponent {
            kind,
            content: content.into(),
            sub_components: Vec::new(),
        }
    }

    pub fn text(content: impl Into<String>) -> Self {
        TextComponent::new(ComponentKind::Text, content)
    }

    pub fn with_args(mut self, args: impl Into<String>) -> Self {
        self.sub_components.push(SubComponent {
            kind: SubComponentKind::With,
            content: args.into(),
        });
        self
    }

    /// Visible length in characters: main content, then sub-components.
    fn visible_len(&self) -> usize {
        self.content.chars().count()
            + self
                .sub_components
                .iter()
                .map(|s| s.content.chars().count())
                .sum::<usize>()
    }
}

// ── Parsing ─────────────────────────────────────────────────────────

/// Segment a marker-delimited buffer into components.
///
/// Round-trips with [`components_to_text`] hold for buffers this module
/// produced. A `START` or `END` that does not open a well-formed component
/// is kept as literal text, so hand-written buffers containing stray
/// markers need not survive a serialize/parse cycle unchanged.
pub fn parse_text_components(buffer: &str) -> Vec<TextComponent> {
    let chars: Vec<char> = buffer.chars().collect();
    let mut components = Vec::new();
    let mut plain = String::new();
    let mut i = 0;

    while i < chars.len() {
        if chars[i] == START {
            if let Some((component, next)) = parse_component(&chars, i) {
                if !plain.is_empty() {
                    components.push(TextComponent::text(std::mem::take(&mut plain)));
                }
                components.push(component);
                i = next;
                continue;
            }
            log::debug!("unmatched component marker at {}", i);
        }
        plain.push(chars[i]);
        i += 1;
    }
    if !plain.is_empty() {
        components.push(TextComponent::text(plain));
    }
    components
}

/// Read characters up to (not including) the next marker.
fn read_until_marker(chars: &[char], pos: &mut usize) -> String {
    let start = *pos;
    while *pos < chars.len() && chars[*pos] != START && chars[*pos] != END {
        *pos += 1;
    }
    chars[start..*pos].iter().collect()
}

/// Parse the component opening at `start`. Returns the component and the
/// index just past its closing marker, or `None` if it is malformed.
fn parse_component(chars: &[char], start: usize) -> Option<(TextComponent, usize)> {
    let mut pos = start + 1;
    let key = read_until_marker(chars, &mut pos);
    if chars.get(pos) != Some(&END) {
        return None;
    }
    pos += 1;
    let kind = ComponentKind::from_key(&key)?;
    let content = read_until_marker(chars, &mut pos);
    let mut sub_components = Vec::new();

    loop {
        match chars.get(pos)? {
            &END => {
                let component = TextComponent {
                    kind,
                    content,
                    sub_components,
                };
                return Some((component, pos + 1));
            }
            &START => {
                pos += 1;
                let sub_key = read_until_marker(chars, &mut pos);
                if chars.get(pos) != Some(&END) || kind != ComponentKind::Translate {
                    return None;
                }
                pos += 1;
                let sub_kind = SubComponentKind::from_key(&sub_key)?;
                let sub_content = read_until_marker(chars, &mut pos);
                if chars.get(pos) != Some(&END) {
                    return None;
                }
                pos += 1;
                sub_components.push(SubComponent {
                    kind: sub_kind,
                    content: sub_content,
                });
            }
            _ => return None,
        }
    }
}

// ── Serialization ───────────────────────────────────────────────────

pub fn component_to_text(component: &TextComponent) -> String {
    let mut out = String::new();
    out.push(START);
    out.push_str(component.kind.key());
    out.push(END);
    out.push_str(&component.content);
    for sub in &component.sub_components {
        out.push(START);
        out.push_str(sub.kind.key());
        out.push(END);
        out.push_str(&sub.content);
        out.push(END);
    }
    out.push(END);
    out
}

/// Inverse of [`parse_text_components`] for contents that contain no
/// `START` or `END` markers.
pub fn components_to_text(components: &[TextComponent]) -> String {
    components.iter().map(component_to_text).collect()
}

/// Remove every marker, leaving the visible text.
pub fn strip_markers(buffer: &str) -> String {
    parse_text_components(buffer)
        .iter()
        .flat_map(|c| {
            std::iter::once(c.content.as_str()).chain(c.sub_components.iter().map(|s| s.content.as_str()))
        })
        .collect()
}

// ── Editing ─────────────────────────────────────────────────────────

fn splice(s: &str, at: usize, insert: &str) -> String {
    let byte = s.char_indices().nth(at).map(|(b, _)| b).unwrap_or(s.len());
    let mut out = String::with_capacity(s.len() + insert.len());
    out.push_str(&s[..byte]);
    out.push_str(insert);
    out.push_str(&s[byte..]);
    out
}

/// Insert `new_text` at `position` so that it flows into the component
/// under the cursor.
///
/// With no active kind (or `Text`) this is a raw splice into the buffer.
/// Otherwise `position` counts visible characters across components, main
/// content before sub-components. Past the end, the text extends the last
/// component when it has the active kind, or starts a new one.
pub fn insert_text_with_component(
    buffer: &str,
    position: usize,
    new_text: &str,
    active: Option<ComponentKind>,
) -> String {
    if new_text.is_empty() {
        return buffer.to_string();
    }
    let kind = match active {
        None | Some(ComponentKind::Text) => return splice(buffer, position, new_text),
        Some(kind) => kind,
    };

    let mut components = parse_text_components(buffer);
    if components.is_empty() {
        return component_to_text(&TextComponent::new(kind, new_text));
    }

    let mut offset = 0;
    let mut target = None;
    for (i, component) in components.iter().enumerate() {
        let len = component.visible_len();
        if position >= offset && position < offset + len {
            target = Some((i, position - offset));
            break;
        }
        offset += len;
    }

    let Some((index, local)) = target else {
        match components.last_mut() {
            Some(last) if last.kind == kind && last.sub_components.is_empty() => {
                last.content.push_str(new_text);
            }
            _ => components.push(TextComponent::new(kind, new_text)),
        }
        return components_to_text(&components);
    };

    let component = &mut components[index];
    let main_len = component.content.chars().count();
    if component.kind == kind || local < main_len {
        component.content = splice(&component.content, local.min(main_len), new_text);
    } else {
        let mut remaining = local - main_len;
        let mut inserted = false;
        for sub in &mut component.sub_components {
            let len = sub.content.chars().count();
            if remaining < len {
                sub.content = splice(&sub.content, remaining, new_text);
                inserted = true;
                break;
            }
            remaining -= len;
        }
        if !inserted {
            component.content.push_str(new_text);
        }
    }
    components_to_text(&components)
}
