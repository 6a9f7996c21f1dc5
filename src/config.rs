use std::fmt;

/// How the dual-purpose `§m` / `§n` codes are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MnMode {
    /// Java renders strikethrough / underline, Bedrock keeps the color code.
    #[default]
    Font,
    /// Both editions render the mapped color (`§m` dark red, `§n` red).
    Color,
    /// Only the explicit `§m_f` / `§n_f` (format) and `§m_c` / `§n_c` (color)
    /// spellings carry meaning for Java; bare `§m` / `§n` are Bedrock colors
    /// and are stripped from Java output.
    Suffix,
}

impl MnMode {
    pub fn parse(s: &str) -> Option<MnMode> {
        match s {
            "font" => Some(MnMode::Font),
            "color" => Some(MnMode::Color),
            "suffix" | "mn_cf" => Some(MnMode::Suffix),
            _ => None,
        }
    }
}

impl fmt::Display for MnMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MnMode::Font => "font",
            MnMode::Color => "color",
            MnMode::Suffix => "suffix",
        })
    }
}

/// Per-call conversion settings. Every engine entry point takes one of these
/// by reference; nothing is read from global state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConversionConfig {
    /// Merge duplicate range parameters into `min(mins)..max(maxes)` instead
    /// of keeping the widest single range.
    pub mixed_range_merge: bool,
    /// Let Java-only and Bedrock-only parameters coexist in one selector by
    /// cross-converting them instead of treating one side as foreign.
    pub java_bedrock_mixed_mode: bool,
    pub mn_mode: MnMode,
}
