use std::cmp::Ordering;
use std::fmt;

use crate::error::ConvertError;

// ── Values ──────────────────────────────────────────────────────────

/// The value side of a selector parameter (`name=value`).
#[derive(Debug, Clone, PartialEq)]
pub enum ParameterValue {
    /// A number, kept in its original spelling.
    Scalar(String),
    Range(Range),
    /// Braced or bracketed text (`nbt=`, `hasitem=`, `scores=`), kept verbatim.
    Compound(String),
    /// Anything else: `type=`, `name=`, `tag=`, negated values, ...
    Literal(String),
}

impl ParameterValue {
    pub fn parse(text: &str) -> ParameterValue {
        let text = text.trim();
        if text.starts_with('{') || text.starts_with('[') {
            ParameterValue::Compound(text.to_string())
        } else if text.contains("..") {
            match Range::parse(text) {
                Ok(range) => ParameterValue::Range(range),
                Err(_) => ParameterValue::Literal(text.to_string()),
            }
        } else if is_number(text) {
            ParameterValue::Scalar(text.to_string())
        } else {
            ParameterValue::Literal(text.to_string())
        }
    }

    /// View a numeric value as a range; a scalar `N` is the range `N..N`.
    pub fn as_range(&self) -> Option<Range> {
        match self {
            ParameterValue::Scalar(s) => Some(Range::exact(s)),
            ParameterValue::Range(r) => Some(r.clone()),
            _ => None,
        }
    }

    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            ParameterValue::Scalar(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for ParameterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterValue::Scalar(s) | ParameterValue::Compound(s) | ParameterValue::Literal(s) => {
                f.write_str(s)
            }
            ParameterValue::Range(r) => write!(f, "{}", r),
        }
    }
}

// ── Ranges ──────────────────────────────────────────────────────────

/// A bounded range `min..max`; an absent side is unbounded.
#[derive(Debug, Clone, PartialEq)]
pub struct Range {
    pub min: Option<String>,
    pub max: Option<String>,
}

impl Range {
    pub fn new(min: Option<String>, max: Option<String>) -> Self {
        Range { min, max }
    }

    pub fn exact(value: &str) -> Self {
        Range {
            min: Some(value.to_string()),
            max: Some(value.to_string()),
        }
    }

    /// Parse `N..`, `..N` or `N..M`. Both bounds must be numeric and at least
    /// one must be present.
    pub fn parse(text: &str) -> Result<Range, ConvertError> {
        let (lo, hi) = text
            .split_once("..")
            .ok_or_else(|| ConvertError::InvalidRange(text.to_string()))?;
        let bound = |side: &str| -> Result<Option<String>, ConvertError> {
            let side = side.trim();
            if side.is_empty() {
                Ok(None)
            } else if is_number(side) {
                Ok(Some(side.to_string()))
            } else {
                Err(ConvertError::InvalidRange(text.to_string()))
            }
        };
        let range = Range {
            min: bound(lo)?,
            max: bound(hi)?,
        };
        if range.min.is_none() && range.max.is_none() {
            return Err(ConvertError::InvalidRange(text.to_string()));
        }
        Ok(range)
    }

    pub fn min_value(&self) -> Option<f64> {
        self.min.as_deref().and_then(parse_number)
    }

    pub fn max_value(&self) -> Option<f64> {
        self.max.as_deref().and_then(parse_number)
    }

    /// Absolute width of the range, `None` when either side is unbounded.
    pub fn span(&self) -> Option<f64> {
        Some((self.max_value()? - self.min_value()?).abs())
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.min, &self.max) {
            (Some(lo), Some(hi)) if compare_numeric(lo, hi) == Some(Ordering::Equal) => {
                f.write_str(&format_number(lo))
            }
            (lo, hi) => {
                if let Some(lo) = lo {
                    f.write_str(&format_number(lo))?;
                }
                f.write_str("..")?;
                if let Some(hi) = hi {
                    f.write_str(&format_number(hi))?;
                }
                Ok(())
            }
        }
    }
}

// ── Numbers ─────────────────────────────────────────────────────────

pub fn is_number(s: &str) -> bool {
    !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+'))
        && s.parse::<f64>().is_ok()
}

pub fn parse_number(s: &str) -> Option<f64> {
    let s = s.trim();
    if is_number(s) {
        s.parse().ok()
    } else {
        None
    }
}

pub fn compare_numeric(a: &str, b: &str) -> Option<Ordering> {
    parse_number(a)?.partial_cmp(&parse_number(b)?)
}

/// Trim insignificant trailing zeros: `9.00` → `9`, `9.50` → `9.5`.
/// Non-numeric text is returned unchanged.
pub fn format_number(s: &str) -> String {
    let s = s.trim();
    if !is_number(s) || !s.contains('.') {
        return s.to_string();
    }
    let trimmed = s.trim_end_matches('0').trim_end_matches('.');
    match trimmed {
        "" | "-" | "+" => "0".to_string(),
        t => t.to_string(),
    }
}

/// Render a computed number, dropping the fraction when it is integral.
pub fn format_f64(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < (1u64 << 53) as f64 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

// ── Merging ─────────────────────────────────────────────────────────

/// Numeric maximum of the values. Non-numeric values are ignored; ties keep
/// the first spelling.
pub fn merge_max<'a>(values: impl IntoIterator<Item = &'a str>) -> Option<String> {
    pick(values, Ordering::Greater)
}

/// Numeric minimum of the values. Non-numeric values are ignored.
pub fn merge_min<'a>(values: impl IntoIterator<Item = &'a str>) -> Option<String> {
    pick(values, Ordering::Less)
}

fn pick<'a>(values: impl IntoIterator<Item = &'a str>, want: Ordering) -> Option<String> {
    let mut best: Option<(&str, f64)> = None;
    for v in values {
        let Some(n) = parse_number(v) else { continue };
        match best {
            Some((_, b)) if n.partial_cmp(&b) != Some(want) => {}
            _ => best = Some((v, n)),
        }
    }
    best.map(|(v, _)| v.to_string())
}

/// Collapse several occurrences of the same range parameter into one.
///
/// Default mode keeps the single widest range (an unbounded side counts as
/// infinitely wide; ties keep the earliest). Mixed mode returns
/// `min(mins)..max(maxes)`, unbounded if any occurrence is.
pub fn merge_ranges(ranges: &[Range], mixed: bool) -> Option<Range> {
    let first = ranges.first()?;
    if mixed {
        let min = if ranges.iter().any(|r| r.min_value().is_none()) {
            None
        } else {
            merge_min(ranges.iter().filter_map(|r| r.min.as_deref()))
        };
        let max = if ranges.iter().any(|r| r.max_value().is_none()) {
            None
        } else {
            merge_max(ranges.iter().filter_map(|r| r.max.as_deref()))
        };
        return Some(Range::new(min, max));
    }

    let mut best = first;
    for r in &ranges[1..] {
        let wider = match (best.span(), r.span()) {
            (None, _) => false,
            (Some(_), None) => true,
            (Some(b), Some(s)) => s > b,
        };
        if wider {
            best = r;
        }
    }
    Some(best.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(text: &str) -> Range {
        Range::parse(text).unwrap()
    }

    #[test]
    fn parse_value_kinds() {
        assert_eq!(ParameterValue::parse("10"), ParameterValue::Scalar("10".into()));
        assert_eq!(
            ParameterValue::parse("1..5"),
            ParameterValue::Range(Range::new(Some("1".into()), Some("5".into())))
        );
        assert_eq!(
            ParameterValue::parse("..-2.5"),
            ParameterValue::Range(Range::new(None, Some("-2.5".into())))
        );
        assert_eq!(
            ParameterValue::parse("{Count:3b}"),
            ParameterValue::Compound("{Count:3b}".into())
        );
        assert_eq!(ParameterValue::parse("zombie"), ParameterValue::Literal("zombie".into()));
        assert_eq!(ParameterValue::parse("a..b"), ParameterValue::Literal("a..b".into()));
        assert_eq!(ParameterValue::parse(".."), ParameterValue::Literal("..".into()));
    }

    #[test]
    fn number_formatting() {
        assert_eq!(format_number("9.00"), "9");
        assert_eq!(format_number("9.50"), "9.5");
        assert_eq!(format_number("9.555"), "9.555");
        assert_eq!(format_number("100"), "100");
        assert_eq!(format_number("-0.0"), "-0");
        assert_eq!(format_f64(4.0), "4");
        assert_eq!(format_f64(2.5), "2.5");
    }

    #[test]
    fn range_display() {
        assert_eq!(range("1..5").to_string(), "1..5");
        assert_eq!(range("1.50..").to_string(), "1.5..");
        assert_eq!(range("..3").to_string(), "..3");
        assert_eq!(Range::exact("10").to_string(), "10");
    }

    #[test]
    fn scalar_merge_is_numeric() {
        assert_eq!(merge_max(["-5", "-2", "-10"]).as_deref(), Some("-2"));
        assert_eq!(merge_min(["-5", "-2", "-10"]).as_deref(), Some("-10"));
        assert_eq!(merge_max(["9", "10"]).as_deref(), Some("10"));
        assert_eq!(merge_max(["abc"]), None);
    }

    #[test]
    fn default_merge_keeps_widest() {
        let merged = merge_ranges(&[range("5..7"), range("3..9")], false).unwrap();
        assert_eq!(merged, range("3..9"));
        let merged = merge_ranges(&[range("-45..45"), range("-32..0")], false).unwrap();
        assert_eq!(merged, range("-45..45"));
        let merged = merge_ranges(&[range("1..100"), range("5..")], false).unwrap();
        assert_eq!(merged, range("5.."));
    }

    #[test]
    fn default_merge_tie_keeps_first() {
        let merged = merge_ranges(&[range("0..2"), range("5..7")], false).unwrap();
        assert_eq!(merged, range("0..2"));
    }

    #[test]
    fn mixed_merge_takes_extremes() {
        let merged = merge_ranges(&[range("1..5"), range("2..81")], true).unwrap();
        assert_eq!(merged, range("1..81"));
        let merged = merge_ranges(&[range("1..5"), range("..3")], true).unwrap();
        assert_eq!(merged, range("..5"));
    }
}
