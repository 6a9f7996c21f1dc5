//! The selector engine: dialect detection, parameter filtering and
//! conversion between the two editions, and duplicate merging.

use std::collections::HashMap;

use crate::config::ConversionConfig;
use crate::hasitem::{hasitem_parameter, hasitem_to_nbt, nbt_items};
use crate::params::{self, Dialect, MergeRule, RangePair, BEDROCK_SPECIFIC, JAVA_SPECIFIC, RANGE_PAIRS};
use crate::range::{self, format_f64, parse_number, ParameterValue, Range};
use crate::selector::{bracket_body, split_top_level, Parameter, Selector, SelectorVariable};

/// The outcome of converting one selector. The edition the input was
/// written for receives the input verbatim; the other receives the rewrite.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConversionResult {
    pub java_selector: String,
    pub bedrock_selector: String,
    pub java_reminders: Vec<String>,
    pub bedrock_reminders: Vec<String>,
    /// Whether the rewritten selector differs from the input.
    pub was_converted: bool,
}

// ── Detection ───────────────────────────────────────────────────────

/// Guess which edition a selector was written for.
///
/// Bedrock-only variables decide immediately. Otherwise edition-specific
/// parameter names are tallied; a selector with none is universal. Spacing
/// around `=` counts toward Bedrock, and a tie goes to Bedrock.
pub fn detect_dialect(selector: &str) -> Dialect {
    let text = selector.trim();
    let parsed = Selector::parse(text);
    if parsed.variable.is_bedrock_only() {
        return Dialect::Bedrock;
    }
    let Some(body) = bracket_body(text) else {
        return Dialect::Universal;
    };
    let (java, bedrock) = tally(&parsed);
    if java == 0 && bedrock == 0 {
        return Dialect::Universal;
    }
    let bedrock = bedrock + usize::from(has_loose_spacing(body));
    let dialect = if java > bedrock {
        Dialect::Java
    } else {
        Dialect::Bedrock
    };
    log::debug!(
        "detected {} for {} (java={}, bedrock={})",
        dialect,
        text,
        java,
        bedrock
    );
    dialect
}

fn tally(selector: &Selector) -> (usize, usize) {
    let mut java = 0;
    let mut bedrock = 0;
    for p in &selector.parameters {
        if JAVA_SPECIFIC.contains(&p.name.as_str()) {
            java += 1;
        }
        if BEDROCK_SPECIFIC.contains(&p.name.as_str()) {
            bedrock += 1;
        }
        if p.name == "scores" && !negated_scores(&p.value).is_empty() {
            bedrock += 1;
        }
    }
    (java, bedrock)
}

fn has_loose_spacing(body: &str) -> bool {
    body.contains(" =") || body.contains("= ") || body.contains(" ,")
}

fn score_entries(value: &ParameterValue) -> Vec<(String, String)> {
    let ParameterValue::Compound(raw) = value else {
        return Vec::new();
    };
    let inner = raw.trim().trim_start_matches('{').trim_end_matches('}');
    split_top_level(inner, ',')
        .into_iter()
        .filter_map(|entry| {
            let (name, value) = entry.split_once('=')?;
            Some((name.trim().to_string(), value.trim().to_string()))
        })
        .collect()
}

fn negated_scores(value: &ParameterValue) -> Vec<(String, String)> {
    score_entries(value)
        .into_iter()
        .filter(|(_, v)| v.starts_with('!'))
        .collect()
}

// ── Merging ─────────────────────────────────────────────────────────

fn merge_values(rule: MergeRule, values: &[&ParameterValue], mixed: bool) -> Option<ParameterValue> {
    match rule {
        MergeRule::Max | MergeRule::Min => {
            let scalars = values
                .iter()
                .map(|v| v.as_scalar())
                .collect::<Option<Vec<&str>>>()?;
            let picked = if rule == MergeRule::Max {
                range::merge_max(scalars)
            } else {
                range::merge_min(scalars)
            }?;
            Some(ParameterValue::Scalar(picked))
        }
        MergeRule::Range => {
            let ranges = values
                .iter()
                .map(|v| v.as_range())
                .collect::<Option<Vec<Range>>>()?;
            range::merge_ranges(&ranges, mixed).map(ParameterValue::Range)
        }
        MergeRule::KeepAll => None,
    }
}

/// Collapse repeated parameters according to their merge rule. The merged
/// value takes the position of the first occurrence. Parameters whose
/// repetition is meaningful, or whose values are not numeric, are kept as
/// they are.
pub fn merge_duplicate_parameters(parameters: Vec<Parameter>, mixed_ranges: bool) -> Vec<Parameter> {
    let mut groups: HashMap<&str, Vec<&ParameterValue>> = HashMap::new();
    for p in &parameters {
        groups.entry(p.name.as_str()).or_default().push(&p.value);
    }
    let mut merged: HashMap<String, Option<ParameterValue>> = HashMap::new();
    for (name, values) in &groups {
        let rule = params::merge_rule(name);
        if values.len() > 1 && rule != MergeRule::KeepAll {
            if let Some(value) = merge_values(rule, values, mixed_ranges) {
                merged.insert(name.to_string(), Some(value));
            }
        }
    }

    let mut out = Vec::with_capacity(parameters.len());
    for p in parameters {
        match merged.get_mut(&p.name) {
            Some(slot) => {
                if let Some(value) = slot.take() {
                    out.push(Parameter {
                        name: p.name,
                        value,
                    });
                }
            }
            None => out.push(p),
        }
    }
    out
}

// ── Filtering ───────────────────────────────────────────────────────

/// Rewrite a selector for `target`: parameters the target cannot express
/// at all are dropped with one warning each, convertible ones are
/// converted, and duplicates are merged.
pub fn filter_parameters(
    selector: &str,
    target: Dialect,
    config: &ConversionConfig,
) -> (String, Vec<String>) {
    let mut parsed = Selector::parse(selector);
    let mut reminders = Vec::new();
    rewrite(&mut parsed, target, config.mixed_range_merge, &mut reminders);
    (parsed.to_string(), reminders)
}

/// Duplicates are merged before the transforms, so a repeated range is
/// reduced to one before its bounds are split, and again afterwards for
/// collisions between converted and existing parameters.
fn rewrite(selector: &mut Selector, target: Dialect, mixed_ranges: bool, reminders: &mut Vec<String>) {
    let parameters = std::mem::take(&mut selector.parameters);
    selector.parameters = merge_duplicate_parameters(parameters, mixed_ranges);
    match target {
        Dialect::Bedrock => to_bedrock(selector, reminders),
        Dialect::Java => to_java(selector, reminders),
        Dialect::Universal => {}
    }
    let parameters = std::mem::take(&mut selector.parameters);
    selector.parameters = merge_duplicate_parameters(parameters, mixed_ranges);
}

fn drop_exclusive(selector: &mut Selector, target: Dialect, reminders: &mut Vec<String>) {
    selector.parameters.retain(|p| match params::drop_reason(&p.name, target) {
        Some(reason) => {
            log::warn!("dropping {} for {}: {}", p, target, reason);
            reminders.push(format!("{} was removed: {}", p, reason));
            false
        }
        None => true,
    });
}

// ── Java → Bedrock ──────────────────────────────────────────────────

fn to_bedrock(selector: &mut Selector, reminders: &mut Vec<String>) {
    drop_exclusive(selector, Dialect::Bedrock, reminders);
    for pair in RANGE_PAIRS {
        split_range(selector, pair);
    }
    gamemode_to_m(selector, reminders);
    sort_limit_to_c(selector, reminders);
    nbt_to_bedrock(selector, reminders);
}

/// `java=min..max` becomes `min=..,max=..`. A bare scalar becomes both
/// bounds, or only the maximum when the pair reads scalars as upper bounds.
/// Values that are not numeric stay untouched.
fn split_range(selector: &mut Selector, pair: &RangePair) {
    let mut converted = Vec::new();
    selector.parameters.retain(|p| {
        if p.name != pair.java {
            return true;
        }
        match &p.value {
            ParameterValue::Scalar(s) => {
                if pair.scalar_is_exact {
                    converted.push(Parameter::new(pair.min, s));
                }
                converted.push(Parameter::new(pair.max, s));
                false
            }
            ParameterValue::Range(r) => {
                if let Some(lo) = &r.min {
                    converted.push(Parameter::new(pair.min, &range::format_number(lo)));
                }
                if let Some(hi) = &r.max {
                    converted.push(Parameter::new(pair.max, &range::format_number(hi)));
                }
                false
            }
            other => {
                log::warn!("leaving {}={} unconverted", pair.java, other);
                true
            }
        }
    });
    selector.parameters.extend(converted);
}

fn gamemode_to_m(selector: &mut Selector, reminders: &mut Vec<String>) {
    let mut converted = Vec::new();
    selector.parameters.retain(|p| {
        if p.name != "gamemode" {
            return true;
        }
        let text = p.value.to_string();
        let (neg, mode) = match text.strip_prefix('!') {
            Some(rest) => ("!", rest),
            None => ("", text.as_str()),
        };
        let mapped = match mode {
            "survival" | "creative" | "adventure" => mode,
            "spectator" => {
                reminders.push(
                    "gamemode=spectator has no Bedrock equivalent and became m=survival".to_string(),
                );
                "survival"
            }
            _ => return true,
        };
        converted.push(Parameter::new("m", &format!("{}{}", neg, mapped)));
        false
    });
    selector.parameters.extend(converted);
}

fn is_positive_count(s: &str) -> bool {
    parse_number(s).is_some_and(|n| n >= 1.0 && n.fract() == 0.0)
}

fn sort_limit_to_c(selector: &mut Selector, reminders: &mut Vec<String>) {
    let sorts = selector.take("sort");
    let limits = selector.take("limit");
    if sorts.is_empty() && limits.is_empty() {
        return;
    }
    let limit = range::merge_max(
        limits
            .iter()
            .filter_map(ParameterValue::as_scalar)
            .filter(|s| is_positive_count(s)),
    )
    .map(|n| range::format_number(&n));
    if limit.is_none() && !limits.is_empty() {
        let shown: Vec<String> = limits.iter().map(ToString::to_string).collect();
        reminders.push(format!(
            "limit={} is not a positive integer and was removed",
            shown.join(",")
        ));
    }
    let sort = sorts.last().map(ToString::to_string);

    let c = match sort.as_deref() {
        Some("nearest") => limit,
        Some("furthest") => match limit {
            Some(n) => Some(format!("-{}", n)),
            None => {
                reminders.push(
                    "sort=furthest without limit became c=-9999 to select every entity, furthest first"
                        .to_string(),
                );
                Some("-9999".to_string())
            }
        },
        Some("random") => {
            let from = selector.variable.as_str().to_string();
            let player_pool = matches!(
                selector.variable,
                SelectorVariable::AllPlayers | SelectorVariable::RandomPlayer
            );
            if player_pool {
                selector.variable = SelectorVariable::RandomPlayer;
                if from == "@a" {
                    reminders.push(
                        "@a[sort=random] became @r because Bedrock only randomizes with @r"
                            .to_string(),
                    );
                }
                match limit {
                    Some(n) => Some(n),
                    None if from == "@a" => Some("9999".to_string()),
                    None => None,
                }
            } else {
                reminders.push(
                    "sort=random is not supported here in Bedrock; entities are picked by distance"
                        .to_string(),
                );
                limit
            }
        }
        Some("arbitrary") => {
            reminders.push("sort=arbitrary has no Bedrock equivalent and was removed".to_string());
            limit
        }
        Some(other) => {
            reminders.push(format!("sort={} is not recognized and was removed", other));
            limit
        }
        None => {
            if limit.is_some() {
                reminders.push(
                    "limit became c; Bedrock picks the nearest entities first".to_string(),
                );
            }
            limit
        }
    };
    if let Some(c) = c {
        selector.push("c", &c);
    }
}

/// Items from every `nbt` parameter are gathered into a single `hasitem`.
fn nbt_to_bedrock(selector: &mut Selector, reminders: &mut Vec<String>) {
    let mut items = Vec::new();
    let mut extras = Vec::new();
    selector.parameters.retain(|p| {
        if p.name != "nbt" {
            return true;
        }
        let ParameterValue::Compound(raw) = &p.value else {
            return true;
        };
        match nbt_items(raw, reminders) {
            Some(found) => {
                items.extend(found.items);
                extras.extend(found.extras);
                false
            }
            None => {
                if raw.trim() != "{}" {
                    log::warn!("nbt={} has no Bedrock form", raw);
                    reminders.push(format!(
                        "nbt={} has no Bedrock equivalent and was kept unchanged",
                        raw
                    ));
                }
                true
            }
        }
    });
    selector.parameters.extend(hasitem_parameter(&items));
    selector.parameters.extend(extras);
}

// ── Bedrock → Java ──────────────────────────────────────────────────

fn to_java(selector: &mut Selector, reminders: &mut Vec<String>) {
    if selector.variable.is_bedrock_only() {
        reminders.push(format!(
            "{} has no Java equivalent and became @a",
            selector.variable.as_str()
        ));
        selector.variable = SelectorVariable::AllPlayers;
    }
    drop_exclusive(selector, Dialect::Java, reminders);
    for pair in RANGE_PAIRS {
        join_range(selector, pair);
    }
    m_to_gamemode(selector, reminders);
    c_to_limit(selector, reminders);
    hasitem_to_java(selector, reminders);
    strip_negated_scores(selector, reminders);
}

/// `min=a,max=b` becomes `java=a..b`. Repeated bounds take the smallest
/// minimum and the largest maximum.
fn join_range(selector: &mut Selector, pair: &RangePair) {
    let mut mins = Vec::new();
    let mut maxes = Vec::new();
    selector.parameters.retain(|p| {
        let bucket = if p.name == pair.min {
            &mut mins
        } else if p.name == pair.max {
            &mut maxes
        } else {
            return true;
        };
        match p.value.as_scalar() {
            Some(s) => {
                bucket.push(s.to_string());
                false
            }
            None => true,
        }
    });
    let min = range::merge_min(mins.iter().map(String::as_str));
    let max = range::merge_max(maxes.iter().map(String::as_str));
    if min.is_none() && max.is_none() {
        return;
    }
    selector.push(pair.java, &Range::new(min, max).to_string());
}

fn m_to_gamemode(selector: &mut Selector, reminders: &mut Vec<String>) {
    let mut converted = Vec::new();
    selector.parameters.retain(|p| {
        if p.name != "m" {
            return true;
        }
        let text = p.value.to_string();
        let (neg, mode) = match text.strip_prefix('!') {
            Some(rest) => ("!", rest),
            None => ("", text.as_str()),
        };
        let mapped = match mode {
            "s" | "0" | "survival" => "survival",
            "c" | "1" | "creative" => "creative",
            "a" | "2" | "adventure" => "adventure",
            "d" | "5" | "default" => {
                reminders.push(format!(
                    "m={} (default) has no Java equivalent and became gamemode={}survival",
                    text, neg
                ));
                "survival"
            }
            other => other,
        };
        converted.push(Parameter::new("gamemode", &format!("{}{}", neg, mapped)));
        false
    });
    selector.parameters.extend(converted);
}

fn c_to_limit(selector: &mut Selector, reminders: &mut Vec<String>) {
    let counts = selector.take("c");
    if counts.is_empty() {
        return;
    }
    let Some(n) = range::merge_max(counts.iter().filter_map(ParameterValue::as_scalar))
        .and_then(|c| parse_number(&c))
    else {
        reminders.push("c is not a number and was removed".to_string());
        return;
    };
    if n == 0.0 {
        reminders.push("c=0 selects nothing meaningful in Java and was removed".to_string());
        return;
    }
    selector.push("limit", &format_f64(n.abs()));
    if n < 0.0 {
        selector.push("sort", "furthest");
    } else if selector.variable != SelectorVariable::RandomPlayer {
        selector.push("sort", "nearest");
    }
}

fn hasitem_to_java(selector: &mut Selector, reminders: &mut Vec<String>) {
    if !selector.has("hasitem") {
        return;
    }
    let raws: Vec<String> = selector
        .take("hasitem")
        .iter()
        .map(ToString::to_string)
        .collect();
    for nbt in hasitem_to_nbt(&raws, reminders) {
        selector.push("nbt", &nbt);
    }
}

fn strip_negated_scores(selector: &mut Selector, reminders: &mut Vec<String>) {
    let mut rebuilt = Vec::new();
    selector.parameters.retain(|p| {
        if p.name != "scores" {
            return true;
        }
        let negated = negated_scores(&p.value);
        if negated.is_empty() {
            return true;
        }
        for (name, value) in &negated {
            reminders.push(format!(
                "scores {}={} uses negation, which Java does not support, and was removed",
                name, value
            ));
        }
        let kept: Vec<String> = score_entries(&p.value)
            .into_iter()
            .filter(|(_, v)| !v.starts_with('!'))
            .map(|(n, v)| format!("{}={}", n, v))
            .collect();
        if !kept.is_empty() {
            rebuilt.push(Parameter::new("scores", &format!("{{{}}}", kept.join(","))));
        }
        false
    });
    selector.parameters.extend(rebuilt);
}

// ── Conversion ──────────────────────────────────────────────────────

fn has_both_exclusive(selector: &Selector) -> bool {
    let names = || selector.parameters.iter().map(|p| p.name.as_str());
    names().any(|n| JAVA_SPECIFIC.contains(&n)) && names().any(|n| BEDROCK_SPECIFIC.contains(&n))
}

/// Convert a selector toward `target`, treating the input as written for
/// the other edition.
pub fn convert(selector: &str, target: Dialect, config: &ConversionConfig) -> ConversionResult {
    let text = selector.trim();
    let parsed = Selector::parse(text);

    if config.java_bedrock_mixed_mode && has_both_exclusive(&parsed) {
        return convert_mixed(parsed, text);
    }

    let mut result = ConversionResult {
        java_selector: text.to_string(),
        bedrock_selector: text.to_string(),
        ..ConversionResult::default()
    };
    match target {
        Dialect::Java => {
            let (java, reminders) = filter_parameters(text, Dialect::Java, config);
            result.java_selector = java;
            result.java_reminders = reminders;
        }
        Dialect::Bedrock => {
            let (bedrock, reminders) = filter_parameters(text, Dialect::Bedrock, config);
            result.bedrock_selector = bedrock;
            result.bedrock_reminders = reminders;
        }
        Dialect::Universal => return result,
    }
    result.was_converted = result.java_selector != result.bedrock_selector;
    result
}

/// Java and Bedrock parameters are both present: each edition gets its own
/// parameters plus the other edition's converted, merged min/max.
fn convert_mixed(parsed: Selector, source: &str) -> ConversionResult {
    const NOTE: &str = "mixed mode: Java and Bedrock parameters were merged into one selector";
    let mut java = parsed.clone();
    let mut bedrock = parsed;
    let mut java_reminders = Vec::new();
    let mut bedrock_reminders = Vec::new();
    rewrite(&mut java, Dialect::Java, true, &mut java_reminders);
    rewrite(&mut bedrock, Dialect::Bedrock, true, &mut bedrock_reminders);
    java_reminders.push(NOTE.to_string());
    bedrock_reminders.push(NOTE.to_string());
    let (java_selector, bedrock_selector) = (java.to_string(), bedrock.to_string());
    ConversionResult {
        was_converted: java_selector != source || bedrock_selector != source,
        java_selector,
        bedrock_selector,
        java_reminders,
        bedrock_reminders,
    }
}

/// Detect the selector's edition and convert it to the other one.
pub fn convert_selector(selector: &str, config: &ConversionConfig) -> ConversionResult {
    let target = match detect_dialect(selector) {
        Dialect::Java => Dialect::Bedrock,
        Dialect::Bedrock => Dialect::Java,
        Dialect::Universal => Dialect::Universal,
    };
    convert(selector, target, config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn to_bedrock(s: &str) -> (String, Vec<String>) {
        filter_parameters(s, Dialect::Bedrock, &ConversionConfig::default())
    }

    fn to_java(s: &str) -> (String, Vec<String>) {
        filter_parameters(s, Dialect::Java, &ConversionConfig::default())
    }

    // ── Detection ────────────────────────────────────────────────────

    #[test]
    fn detection() {
        assert_eq!(detect_dialect("@a"), Dialect::Universal);
        assert_eq!(detect_dialect("@a[tag=x,type=zombie]"), Dialect::Universal);
        assert_eq!(detect_dialect("@a[distance=..5]"), Dialect::Java);
        assert_eq!(detect_dialect("@a[r=5]"), Dialect::Bedrock);
        assert_eq!(detect_dialect("@initiator"), Dialect::Bedrock);
        assert_eq!(detect_dialect("@a[scores={k=!1}]"), Dialect::Bedrock);
    }

    #[test]
    fn detection_tie_goes_to_bedrock() {
        assert_eq!(detect_dialect("@a[distance=..5,r=3]"), Dialect::Bedrock);
        assert_eq!(detect_dialect("@a[level=3 , m=c]"), Dialect::Bedrock);
        assert_eq!(detect_dialect("@a[level=3,gamemode=creative, m = c]"), Dialect::Bedrock);
    }

    // ── Filtering ────────────────────────────────────────────────────

    #[test]
    fn exclusive_parameters_are_dropped_with_one_warning() {
        let (s, warnings) = to_bedrock("@a[predicate=x]");
        assert_eq!(s, "@a");
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("predicate"));

        let (s, warnings) = to_java("@a[family=monster,tag=t]");
        assert_eq!(s, "@a[tag=t]");
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("family"));
    }

    #[test]
    fn convertible_parameters_convert_silently() {
        let (s, warnings) = to_bedrock("@a[distance=10]");
        assert_eq!(s, "@a[r=10]");
        assert!(warnings.is_empty());
    }

    // ── Java → Bedrock ───────────────────────────────────────────────

    #[test]
    fn ranges_split_into_bounds() {
        assert_eq!(to_bedrock("@a[distance=1..5]").0, "@a[rm=1,r=5]");
        assert_eq!(to_bedrock("@a[distance=2..]").0, "@a[rm=2]");
        assert_eq!(to_bedrock("@a[x_rotation=-90..0]").0, "@a[rxm=-90,rx=0]");
        assert_eq!(to_bedrock("@a[level=10]").0, "@a[lm=10,l=10]");
    }

    #[test]
    fn gamemode_mapping() {
        assert_eq!(to_bedrock("@a[gamemode=!creative]").0, "@a[m=!creative]");
        let (s, reminders) = to_bedrock("@a[gamemode=spectator]");
        assert_eq!(s, "@a[m=survival]");
        assert_eq!(reminders.len(), 1);
        assert!(!to_java(&s).0.contains("spectator"));
    }

    #[test]
    fn sort_and_limit() {
        assert_eq!(to_bedrock("@e[sort=nearest,limit=3]").0, "@e[c=3]");
        assert_eq!(to_bedrock("@e[sort=furthest,limit=3]").0, "@e[c=-3]");
        assert_eq!(to_bedrock("@e[sort=furthest]").0, "@e[c=-9999]");
        assert_eq!(to_bedrock("@a[sort=random,limit=2]").0, "@r[c=2]");
        assert_eq!(to_bedrock("@a[sort=random]").0, "@r[c=9999]");
        assert_eq!(to_bedrock("@e[sort=nearest]").0, "@e");

        let (s, reminders) = to_bedrock("@e[sort=arbitrary,limit=4]");
        assert_eq!(s, "@e[c=4]");
        assert_eq!(reminders.len(), 1);

        let (s, reminders) = to_bedrock("@e[limit=5]");
        assert_eq!(s, "@e[c=5]");
        assert_eq!(reminders.len(), 1);
    }

    #[test]
    fn nbt_becomes_hasitem() {
        let (s, reminders) = to_bedrock(r#"@a[nbt={Inventory:[{Slot:8b,id:"minecraft:apple"}]}]"#);
        assert_eq!(s, "@a[hasitem={item=apple,location=slot.hotbar,slot=8}]");
        assert_eq!(reminders.len(), 1);

        let (s, reminders) = to_bedrock("@a[nbt={OnGround:1b}]");
        assert_eq!(s, "@a[nbt={OnGround:1b}]");
        assert_eq!(reminders.len(), 1);
    }

    #[test]
    fn every_nbt_clause_feeds_one_hasitem() {
        let (s, _) = to_bedrock(
            r#"@a[nbt={SelectedItem:{id:"minecraft:apple"}},tag=x,nbt={Inventory:[{Slot:3b,id:"minecraft:stone"}]}]"#,
        );
        assert_eq!(
            s,
            "@a[tag=x,hasitem=[{item=apple,location=slot.weapon.mainhand},{item=stone,location=slot.hotbar,slot=3}]]"
        );
    }

    #[test]
    fn invalid_limits_are_dropped() {
        let (s, reminders) = to_bedrock("@a[sort=furthest,limit=-3]");
        assert_eq!(s, "@a[c=-9999]");
        assert!(reminders.iter().any(|r| r.contains("limit=-3")));

        let (s, reminders) = to_bedrock("@e[sort=nearest,limit=many]");
        assert_eq!(s, "@e");
        assert_eq!(reminders.len(), 1);

        assert_eq!(to_bedrock("@e[sort=nearest,limit=2.0]").0, "@e[c=2]");
        assert_eq!(to_bedrock("@e[sort=nearest,limit=2.5]").0, "@e");
    }

    #[test]
    fn non_numeric_ranges_stay_untouched() {
        assert_eq!(to_bedrock("@a[distance=far]").0, "@a[distance=far]");
        assert_eq!(to_java("@a[r=far]").0, "@a[r=far]");
    }

    // ── Bedrock → Java ───────────────────────────────────────────────

    #[test]
    fn bounds_join_into_ranges() {
        assert_eq!(to_java("@a[r=5,rm=1]").0, "@a[distance=1..5]");
        assert_eq!(to_java("@a[r=10]").0, "@a[distance=..10]");
        assert_eq!(to_java("@a[rm=3]").0, "@a[distance=3..]");
        assert_eq!(to_java("@a[rxm=-45,rx=45]").0, "@a[x_rotation=-45..45]");
        assert_eq!(to_java("@a[lm=5,l=5]").0, "@a[level=5]");
        assert_eq!(to_java("@a[r=5,r=9,rm=2,rm=1]").0, "@a[distance=1..9]");
    }

    #[test]
    fn m_mapping() {
        assert_eq!(to_java("@a[m=c]").0, "@a[gamemode=creative]");
        assert_eq!(to_java("@a[m=!2]").0, "@a[gamemode=!adventure]");
        let (s, reminders) = to_java("@a[m=d]");
        assert_eq!(s, "@a[gamemode=survival]");
        assert_eq!(reminders.len(), 1);
    }

    #[test]
    fn c_mapping() {
        assert_eq!(to_java("@e[c=3]").0, "@e[limit=3,sort=nearest]");
        assert_eq!(to_java("@e[c=-2]").0, "@e[limit=2,sort=furthest]");
        assert_eq!(to_java("@r[c=2]").0, "@r[limit=2]");
    }

    #[test]
    fn bedrock_variables_become_all_players() {
        let (s, reminders) = to_java("@initiator[r=3]");
        assert_eq!(s, "@a[distance=..3]");
        assert_eq!(reminders.len(), 1);
    }

    #[test]
    fn negated_scores_are_removed() {
        let (s, reminders) = to_java("@a[scores={a=1,b=!2}]");
        assert_eq!(s, "@a[scores={a=1}]");
        assert_eq!(reminders.len(), 1);
        assert_eq!(to_java("@a[scores={b=!2},tag=x]").0, "@a[tag=x]");
    }

    #[test]
    fn hasitem_becomes_nbt() {
        let (s, _) = to_java("@a[hasitem={item=apple,location=slot.weapon.mainhand}]");
        assert_eq!(s, r#"@a[nbt={Inventory:[{Slot:0b,id:"minecraft:apple"}]}]"#);
    }

    // ── Merging ──────────────────────────────────────────────────────

    #[test]
    fn duplicates_merge_in_place() {
        let params = Selector::parse("@a[r=3,tag=a,r=7,tag=b,rm=2,rm=-1]").parameters;
        let merged: Vec<String> = merge_duplicate_parameters(params, false)
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(merged, ["r=7", "tag=a", "tag=b", "rm=-1"]);
    }

    #[test]
    fn duplicate_ranges_follow_merge_mode() {
        let params = || Selector::parse("@a[distance=1..5,distance=2..81]").parameters;
        let default = merge_duplicate_parameters(params(), false);
        assert_eq!(default[0].to_string(), "distance=2..81");
        let mixed = merge_duplicate_parameters(params(), true);
        assert_eq!(mixed[0].to_string(), "distance=1..81");
    }

    #[test]
    fn duplicates_merge_before_ranges_split() {
        assert_eq!(to_bedrock("@p[distance=1..5,distance=3..9]").0, "@p[rm=3,r=9]");
        let mixed = filter_parameters(
            "@p[distance=1..5,distance=3..9]",
            Dialect::Bedrock,
            &ConversionConfig {
                mixed_range_merge: true,
                ..ConversionConfig::default()
            },
        );
        assert_eq!(mixed.0, "@p[rm=1,r=9]");
    }

    #[test]
    fn converted_bounds_merge_with_existing() {
        let (s, _) = to_bedrock("@a[r=10,distance=..5]");
        assert_eq!(s, "@a[r=10]");
    }

    // ── Conversion ───────────────────────────────────────────────────

    #[test]
    fn convert_keeps_source_verbatim() {
        let config = ConversionConfig::default();
        let result = convert_selector("@a[r=5,rm=1]", &config);
        assert_eq!(result.bedrock_selector, "@a[r=5,rm=1]");
        assert_eq!(result.java_selector, "@a[distance=1..5]");
        assert!(result.was_converted);

        let result = convert_selector("@p[tag=x]", &config);
        assert_eq!(result.java_selector, "@p[tag=x]");
        assert_eq!(result.bedrock_selector, "@p[tag=x]");
        assert!(!result.was_converted);
    }

    #[test]
    fn unchanged_rewrite_is_not_a_conversion() {
        let config = ConversionConfig::default();
        let result = convert_selector("@a[nbt={OnGround:1b}]", &config);
        assert_eq!(result.bedrock_selector, "@a[nbt={OnGround:1b}]");
        assert!(!result.was_converted);
        assert_eq!(result.bedrock_reminders.len(), 1);
    }

    #[test]
    fn mixed_mode_merges_both_editions() {
        let config = ConversionConfig {
            java_bedrock_mixed_mode: true,
            ..ConversionConfig::default()
        };
        let result = convert_selector("@a[distance=2..6,rm=1,r=4]", &config);
        assert_eq!(result.java_selector, "@a[distance=1..6]");
        assert_eq!(result.bedrock_selector, "@a[rm=1,r=6]");
        assert!(result.java_reminders.iter().any(|r| r.contains("mixed mode")));
        assert!(result.bedrock_reminders.iter().any(|r| r.contains("mixed mode")));
    }
}
