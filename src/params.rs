//! Static classification tables for selector parameters.

use std::fmt;

/// A command dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Java,
    Bedrock,
    Universal,
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Dialect::Java => "java",
            Dialect::Bedrock => "bedrock",
            Dialect::Universal => "universal",
        })
    }
}

// ── Detection ───────────────────────────────────────────────────────

/// Parameter names that only Java understands. Used for dialect detection.
pub const JAVA_SPECIFIC: &[&str] = &[
    "distance",
    "x_rotation",
    "y_rotation",
    "nbt",
    "team",
    "limit",
    "sort",
    "predicate",
    "advancements",
    "level",
    "gamemode",
    "attributes",
];

/// Parameter names that only Bedrock understands. Used for dialect detection.
pub const BEDROCK_SPECIFIC: &[&str] = &[
    "r",
    "rm",
    "rx",
    "rxm",
    "ry",
    "rym",
    "hasitem",
    "family",
    "l",
    "lm",
    "m",
    "haspermission",
    "has_property",
    "c",
];

/// Selector variables that exist only in Bedrock.
pub const BEDROCK_VARIABLES: &[&str] = &["@initiator", "@c", "@v"];

// ── Filtering ───────────────────────────────────────────────────────

/// Java parameters with no Bedrock counterpart, with the reason given when
/// one is dropped.
pub const JAVA_ONLY: &[(&str, &str)] = &[
    ("predicate", "Bedrock has no predicate system"),
    ("advancements", "Bedrock has no advancement system"),
    ("team", "Bedrock has no team system"),
];

/// Bedrock parameters with no Java counterpart.
pub const BEDROCK_ONLY: &[(&str, &str)] = &[
    ("haspermission", "Java has no player permission filter"),
    ("has_property", "Java has no entity property filter"),
    ("family", "Java has no entity families; use type instead"),
];

pub fn drop_reason(name: &str, target: Dialect) -> Option<&'static str> {
    let table = match target {
        Dialect::Bedrock => JAVA_ONLY,
        Dialect::Java => BEDROCK_ONLY,
        Dialect::Universal => return None,
    };
    table.iter().find(|(n, _)| *n == name).map(|(_, reason)| *reason)
}

// ── Convertible ranges ──────────────────────────────────────────────

/// A Java range parameter and the Bedrock parameters holding its bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangePair {
    pub java: &'static str,
    pub min: &'static str,
    pub max: &'static str,
    /// Whether a bare scalar means an exact value (both bounds) rather than
    /// an upper bound.
    pub scalar_is_exact: bool,
}

pub const RANGE_PAIRS: &[RangePair] = &[
    RangePair {
        java: "distance",
        min: "rm",
        max: "r",
        scalar_is_exact: false,
    },
    RangePair {
        java: "x_rotation",
        min: "rxm",
        max: "rx",
        scalar_is_exact: true,
    },
    RangePair {
        java: "y_rotation",
        min: "rym",
        max: "ry",
        scalar_is_exact: true,
    },
    RangePair {
        java: "level",
        min: "lm",
        max: "l",
        scalar_is_exact: true,
    },
];

// ── Merge rules ─────────────────────────────────────────────────────

/// How repeated occurrences of one parameter collapse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeRule {
    Max,
    Min,
    Range,
    /// Repetition is meaningful (`tag=a,tag=b`); keep every occurrence.
    KeepAll,
}

const MAX_PARAMS: &[&str] = &[
    "x", "y", "z", "dx", "dy", "dz", "r", "rx", "ry", "l", "c", "limit",
];
const MIN_PARAMS: &[&str] = &["rm", "rxm", "rym", "lm"];
const RANGE_PARAMS: &[&str] = &["distance", "x_rotation", "y_rotation", "level"];

pub fn merge_rule(name: &str) -> MergeRule {
    if MAX_PARAMS.contains(&name) {
        MergeRule::Max
    } else if MIN_PARAMS.contains(&name) {
        MergeRule::Min
    } else if RANGE_PARAMS.contains(&name) {
        MergeRule::Range
    } else {
        MergeRule::KeepAll
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_pairs_cover_both_bound_names() {
        for pair in RANGE_PAIRS {
            assert!(JAVA_SPECIFIC.contains(&pair.java));
            assert!(BEDROCK_SPECIFIC.contains(&pair.min));
            assert!(BEDROCK_SPECIFIC.contains(&pair.max));
            assert_eq!(merge_rule(pair.java), MergeRule::Range);
            assert_eq!(merge_rule(pair.min), MergeRule::Min);
            assert_eq!(merge_rule(pair.max), MergeRule::Max);
        }
    }

    #[test]
    fn drop_reasons_follow_target() {
        assert!(drop_reason("team", Dialect::Bedrock).is_some());
        assert!(drop_reason("team", Dialect::Java).is_none());
        assert!(drop_reason("family", Dialect::Java).unwrap().contains("type"));
    }

    #[test]
    fn merge_rules() {
        assert_eq!(merge_rule("r"), MergeRule::Max);
        assert_eq!(merge_rule("lm"), MergeRule::Min);
        assert_eq!(merge_rule("distance"), MergeRule::Range);
        assert_eq!(merge_rule("tag"), MergeRule::KeepAll);
    }
}
