//! Normalized response schema.
//!
//! Upstream payloads are loosely typed, so fields that are passed through
//! unchanged stay as [`Value`] (`null` when absent). Fields that are coerced
//! to numbers use [`Number`].

use serde::Serialize;
use serde_json::{Number, Value};

/// One platform's slot in the aggregate: normalized fields, the error that
/// prevented them, or nothing at all when the upstream returned a falsy body.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Slot<T> {
    Stats(T),
    Failed { error: Value },
    Empty {},
}

impl<T> Slot<T> {
    pub fn stats(&self) -> Option<&T> {
        match self {
            Slot::Stats(stats) => Some(stats),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&Value> {
        match self {
            Slot::Failed { error } => Some(error),
            _ => None,
        }
    }
}

/// Codeforces merges three endpoints, so fields and an error can coexist.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CodeforcesStats {
    #[serde(flatten)]
    pub profile: Option<CodeforcesProfile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub solved: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contests: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeforcesProfile {
    pub rating: Value,
    pub rank: Value,
    pub max_rating: Value,
    pub max_rank: Value,
    pub contribution: Value,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CodeChefStats {
    pub rating: Value,
    pub stars: Value,
    pub solved: Value,
    pub contests: Value,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeetCodeStats {
    pub solved: Value,
    pub easy: Value,
    pub medium: Value,
    pub hard: Value,
    pub global_rank: Option<Number>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeeksForGeeksStats {
    pub total_solved: Number,
    pub easy: Number,
    pub medium: Number,
    pub hard: Number,
    pub easy_count: Number,
    pub medium_count: Number,
    pub hard_count: Number,
    pub rank: Value,
    pub score: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateResponse {
    pub timestamp: String,
    pub codeforces: CodeforcesStats,
    pub codechef: Slot<CodeChefStats>,
    pub leetcode: Slot<LeetCodeStats>,
    pub geeksforgeeks: Slot<GeeksForGeeksStats>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_codeforces_serializes_as_empty_object() {
        let value = serde_json::to_value(CodeforcesStats::default()).unwrap();
        assert_eq!(value, json!({}));
    }

    #[test]
    fn test_partial_codeforces_keeps_error_beside_fields() {
        let stats = CodeforcesStats {
            solved: Some(12),
            error: Some(json!("HTTP 502")),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(stats).unwrap(),
            json!({ "solved": 12, "error": "HTTP 502" })
        );
    }

    #[test]
    fn test_slot_variants() {
        let failed: Slot<CodeChefStats> = Slot::Failed {
            error: json!("HTTP 404"),
        };
        assert_eq!(serde_json::to_value(&failed).unwrap(), json!({ "error": "HTTP 404" }));

        let empty: Slot<CodeChefStats> = Slot::Empty {};
        assert_eq!(serde_json::to_value(&empty).unwrap(), json!({}));
    }
}
