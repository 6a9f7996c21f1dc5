//! Legacy `§` formatting codes.

use crate::config::MnMode;

/// Resolved chat formatting for one run of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Style {
    pub color: Option<&'static str>,
    pub bold: bool,
    pub italic: bool,
    pub underlined: bool,
    pub strikethrough: bool,
    pub obfuscated: bool,
}

impl Style {
    pub fn is_plain(&self) -> bool {
        *self == Style::default()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StyledRun {
    pub text: String,
    pub style: Style,
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Text(String),
    Color(&'static str),
    Bold,
    Italic,
    Underlined,
    Strikethrough,
    Obfuscated,
    Reset,
}

/// Java color name for a color code. Bedrock's extended material colors
/// map to their nearest standard color; `m` and `n` are resolved by mode
/// elsewhere.
pub fn java_color(code: char) -> Option<&'static str> {
    Some(match code {
        '0' => "black",
        '1' => "dark_blue",
        '2' => "dark_green",
        '3' => "dark_aqua",
        '4' => "dark_red",
        '5' => "dark_purple",
        '6' => "gold",
        '7' => "gray",
        '8' => "dark_gray",
        '9' => "blue",
        'a' => "green",
        'b' => "aqua",
        'c' => "red",
        'd' => "light_purple",
        'e' => "yellow",
        'f' => "white",
        'g' | 'p' | 'v' => "gold",
        'h' => "white",
        'i' => "gray",
        'j' => "dark_gray",
        'q' => "green",
        's' => "aqua",
        't' => "dark_blue",
        'u' => "light_purple",
        _ => return None,
    })
}

fn mn_color(code: char) -> &'static str {
    if code == 'm' {
        "dark_red"
    } else {
        "red"
    }
}

fn mn_format(code: char) -> Token {
    if code == 'm' {
        Token::Strikethrough
    } else {
        Token::Underlined
    }
}

/// `Some(true)` for `_f`, `Some(false)` for `_c` after an `m`/`n` code.
/// Color mode reads the suffix as ordinary text.
fn suffix_at(chars: &[char], i: usize, mode: MnMode) -> Option<bool> {
    if mode == MnMode::Color {
        return None;
    }
    if !matches!(chars.get(i + 1), Some('m' | 'n')) || chars.get(i + 2) != Some(&'_') {
        return None;
    }
    match chars.get(i + 3) {
        Some('f') => Some(true),
        Some('c') => Some(false),
        _ => None,
    }
}

fn tokenize(text: &str, mode: MnMode) -> Vec<Token> {
    let chars: Vec<char> = text.chars().collect();
    let mut tokens = Vec::new();
    let mut buf = String::new();
    let mut i = 0;

    while i < chars.len() {
        if chars[i] != '§' {
            buf.push(chars[i]);
            i += 1;
            continue;
        }
        let Some(&code) = chars.get(i + 1) else {
            // A lone trailing section sign.
            break;
        };

        if let Some(is_format) = suffix_at(&chars, i, mode) {
            if !buf.is_empty() {
                tokens.push(Token::Text(std::mem::take(&mut buf)));
            }
            tokens.push(if is_format {
                mn_format(code)
            } else {
                Token::Color(mn_color(code))
            });
            i += 4;
            continue;
        }

        let token = match code {
            'm' | 'n' => match mode {
                MnMode::Suffix => None,
                MnMode::Font => Some(mn_format(code)),
                MnMode::Color => Some(Token::Color(mn_color(code))),
            },
            'k' => Some(Token::Obfuscated),
            'l' => Some(Token::Bold),
            'o' => Some(Token::Italic),
            'r' => Some(Token::Reset),
            c => match java_color(c) {
                Some(name) => Some(Token::Color(name)),
                None => {
                    buf.push('§');
                    buf.push(c);
                    i += 2;
                    continue;
                }
            },
        };
        if let Some(token) = token {
            if !buf.is_empty() {
                tokens.push(Token::Text(std::mem::take(&mut buf)));
            }
            tokens.push(token);
        }
        i += 2;
    }
    if !buf.is_empty() {
        tokens.push(Token::Text(buf));
    }
    tokens
}

/// Split `text` into styled runs for Java. Adjacent runs with identical
/// styles are merged; empty runs are dropped.
pub fn java_runs(text: &str, mode: MnMode) -> Vec<StyledRun> {
    let mut runs: Vec<StyledRun> = Vec::new();
    let mut style = Style::default();
    for token in tokenize(text, mode) {
        match token {
            Token::Text(s) => match runs.last_mut() {
                Some(last) if last.style == style => last.text.push_str(&s),
                _ => runs.push(StyledRun { text: s, style }),
            },
            Token::Color(c) => style.color = Some(c),
            Token::Bold => style.bold = true,
            Token::Italic => style.italic = true,
            Token::Underlined => style.underlined = true,
            Token::Strikethrough => style.strikethrough = true,
            Token::Obfuscated => style.obfuscated = true,
            Token::Reset => style = Style::default(),
        }
    }
    runs
}

/// Text for Bedrock, which renders `§` codes itself. The `_f` / `_c`
/// spellings collapse to plain `§m` / `§n`, which Bedrock always reads as
/// colors, unless color mode leaves the suffixes as text. Everything else is
/// passed through.
pub fn bedrock_text(text: &str, mode: MnMode) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;
    while i < chars.len() {
        if chars[i] == '§' && suffix_at(&chars, i, mode).is_some() {
            out.push('§');
            out.push(chars[i + 1]);
            i += 4;
        } else {
            out.push(chars[i]);
            i += 1;
        }
    }
    out
}

/// Drop every `§` code, keeping only the visible characters.
pub fn plain_text(text: &str) -> String {
    java_runs(text, MnMode::Font)
        .into_iter()
        .map(|r| r.text)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(text: &str, style: Style) -> StyledRun {
        StyledRun {
            text: text.to_string(),
            style,
        }
    }

    fn colored(c: &'static str) -> Style {
        Style {
            color: Some(c),
            ..Style::default()
        }
    }

    #[test]
    fn color_code() {
        assert_eq!(java_runs("§cHello", MnMode::Font), vec![run("Hello", colored("red"))]);
    }

    #[test]
    fn mn_as_colors() {
        assert_eq!(
            java_runs("§maaa§nbbb", MnMode::Color),
            vec![run("aaa", colored("dark_red")), run("bbb", colored("red"))]
        );
    }

    #[test]
    fn mn_as_fonts() {
        let runs = java_runs("§ma§nb", MnMode::Font);
        assert!(runs[0].style.strikethrough && !runs[0].style.underlined);
        assert!(runs[1].style.strikethrough && runs[1].style.underlined);
        assert_eq!(runs[1].style.color, None);
    }

    #[test]
    fn suffix_mode() {
        let runs = java_runs("§ma§m_fb§r§n_cc", MnMode::Suffix);
        assert_eq!(
            runs,
            vec![
                run("a", Style::default()),
                run(
                    "b",
                    Style {
                        strikethrough: true,
                        ..Style::default()
                    }
                ),
                run("c", colored("red")),
            ]
        );
    }

    #[test]
    fn reset_and_formats() {
        let runs = java_runs("§l§oA§rB§kC", MnMode::Font);
        assert!(runs[0].style.bold && runs[0].style.italic);
        assert!(runs[1].style.is_plain());
        assert!(runs[2].style.obfuscated);
    }

    #[test]
    fn identical_styles_merge() {
        assert_eq!(java_runs("§ca§cb", MnMode::Font), vec![run("ab", colored("red"))]);
    }

    #[test]
    fn unknown_and_trailing_codes() {
        assert_eq!(java_runs("§zq", MnMode::Font), vec![run("§zq", Style::default())]);
        assert_eq!(java_runs("abc§", MnMode::Font), vec![run("abc", Style::default())]);
        assert!(java_runs("§c", MnMode::Font).is_empty());
    }

    #[test]
    fn extended_colors_for_java() {
        assert_eq!(java_runs("§gx", MnMode::Font), vec![run("x", colored("gold"))]);
        assert_eq!(java_runs("§jx", MnMode::Font), vec![run("x", colored("dark_gray"))]);
    }

    #[test]
    fn bedrock_normalizes_suffixes_only() {
        assert_eq!(bedrock_text("§m_fx§n_cy§nz§gw", MnMode::Suffix), "§mx§ny§nz§gw");
        assert_eq!(bedrock_text("§cHello", MnMode::Font), "§cHello");
    }

    #[test]
    fn color_mode_keeps_suffix_text() {
        assert_eq!(
            java_runs("§m_fx", MnMode::Color),
            vec![run("_fx", colored("dark_red"))]
        );
        assert_eq!(bedrock_text("§m_fx", MnMode::Color), "§m_fx");
        assert_eq!(
            java_runs("§m_fx", MnMode::Font),
            vec![run(
                "x",
                Style {
                    strikethrough: true,
                    ..Style::default()
                }
            )]
        );
    }

    #[test]
    fn plain_text_strips_codes() {
        assert_eq!(plain_text("§l§cBold§r text"), "Bold text");
    }
}
