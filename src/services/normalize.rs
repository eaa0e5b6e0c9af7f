//! Maps provider payloads onto the fixed response schema.
//!
//! Provider shapes drift between API versions and proxy deployments, so every
//! logical field is read from an ordered list of alternate names and nothing
//! about presence or type is trusted. A key holding `null` counts as absent.

use crate::models::stats::{
    CodeChefStats, CodeforcesProfile, CodeforcesStats, GeeksForGeeksStats, LeetCodeStats, Slot,
};
use serde_json::{Number, Value};
use std::collections::HashSet;

/// Merges the profile, submission-list and rating-history payloads.
///
/// Error precedence is first-write-wins: profile, then submissions, then
/// rating history.
pub fn codeforces(profile: &Value, status: &Value, rating: &Value) -> CodeforcesStats {
    let mut stats = CodeforcesStats::default();

    match profile
        .get("result")
        .and_then(|result| result.get(0))
        .filter(|user| is_truthy(user))
    {
        Some(user) => {
            stats.profile = Some(CodeforcesProfile {
                rating: passthrough(user, &["rating"]),
                rank: passthrough(user, &["rank"]),
                max_rating: passthrough(user, &["maxRating"]),
                max_rank: passthrough(user, &["maxRank"]),
                contribution: passthrough(user, &["contribution"]),
            });
        }
        None => stats.error = upstream_error(profile).cloned(),
    }

    match status.get("result").and_then(Value::as_array) {
        Some(submissions) => stats.solved = Some(count_solved(submissions)),
        None if stats.error.is_none() => stats.error = upstream_error(status).cloned(),
        None => {}
    }

    match rating.get("result").and_then(Value::as_array) {
        Some(changes) => stats.contests = Some(changes.len()),
        None if stats.error.is_none() => stats.error = upstream_error(rating).cloned(),
        None => {}
    }

    stats
}

/// Counts distinct `(contestId, index)` problems with an accepted verdict.
pub fn count_solved(submissions: &[Value]) -> usize {
    let mut solved = HashSet::new();
    for submission in submissions {
        if submission.get("verdict").and_then(Value::as_str) != Some("OK") {
            continue;
        }
        // Older payloads carry the problem coordinates on the submission itself
        let problem = submission
            .get("problem")
            .filter(|p| is_truthy(p))
            .unwrap_or(submission);
        solved.insert((
            key_part(problem.get("contestId")),
            key_part(problem.get("index")),
        ));
    }
    solved.len()
}

pub fn codechef(raw: &Value) -> Slot<CodeChefStats> {
    if let Some(error) = upstream_error(raw) {
        return Slot::Failed {
            error: error.clone(),
        };
    }
    if !is_truthy(raw) {
        return Slot::Empty {};
    }

    let user = raw.get("data").filter(|data| is_truthy(data)).unwrap_or(raw);
    Slot::Stats(CodeChefStats {
        rating: passthrough(user, &["rating"]),
        stars: passthrough(user, &["stars"]),
        solved: passthrough(user, &["problemsSolved", "solved"]),
        contests: passthrough(user, &["contests", "contestCount"]),
    })
}

pub fn leetcode(raw: &Value) -> Slot<LeetCodeStats> {
    if let Some(error) = upstream_error(raw) {
        return Slot::Failed {
            error: error.clone(),
        };
    }
    if !is_truthy(raw) {
        return Slot::Empty {};
    }

    let user = if raw.get("ranking").is_some_and(is_truthy) {
        raw
    } else {
        raw.get("profile").filter(|p| is_truthy(p)).unwrap_or(raw)
    };

    Slot::Stats(LeetCodeStats {
        solved: passthrough(user, &["totalSolved", "solved"]),
        easy: passthrough(user, &["easySolved", "easy"]),
        medium: passthrough(user, &["mediumSolved", "medium"]),
        hard: passthrough(user, &["hardSolved", "hard"]),
        global_rank: first_of(user, &["ranking", "rank", "globalRank"])
            .and_then(to_number)
            .filter(|rank| *rank != 0.0)
            .and_then(number_value),
    })
}

pub fn geeksforgeeks(raw: &Value) -> Slot<GeeksForGeeksStats> {
    if let Some(error) = upstream_error(raw) {
        return Slot::Failed {
            error: error.clone(),
        };
    }
    if !is_truthy(raw) {
        return Slot::Empty {};
    }

    let easy = count_or_zero(raw, &["Easy", "easy"]);
    let medium = count_or_zero(raw, &["Medium", "medium"]);
    let hard = count_or_zero(raw, &["Hard", "hard"]);

    Slot::Stats(GeeksForGeeksStats {
        total_solved: count_or_zero(raw, &["totalProblemsSolved", "totalSolved"]),
        easy_count: easy.clone(),
        medium_count: medium.clone(),
        hard_count: hard.clone(),
        easy,
        medium,
        hard,
        rank: passthrough(raw, &["instituteRank", "rank"]),
        score: passthrough(raw, &["codingScore", "score"]),
    })
}

/// The payload's own `error` field, when set to anything truthy.
pub fn upstream_error(raw: &Value) -> Option<&Value> {
    raw.get("error").filter(|error| is_truthy(error))
}

fn first_of<'a>(raw: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .find_map(|key| raw.get(*key).filter(|value| !value.is_null()))
}

fn passthrough(raw: &Value, keys: &[&str]) -> Value {
    first_of(raw, keys).cloned().unwrap_or(Value::Null)
}

fn count_or_zero(raw: &Value, keys: &[&str]) -> Number {
    first_of(raw, keys)
        .and_then(to_number)
        .and_then(number_value)
        .unwrap_or_else(|| Number::from(0))
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Loose numeric coercion: numbers, booleans and numeric strings convert,
/// blank strings are zero, anything else is not a number.
fn to_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Null => 0.0,
        Value::Bool(b) => f64::from(u8::from(*b)),
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                0.0
            } else {
                trimmed.parse().ok()?
            }
        }
        Value::Array(_) | Value::Object(_) => return None,
    };
    number.is_finite().then_some(number)
}

/// Integral values serialize without a fractional part.
fn number_value(number: f64) -> Option<Number> {
    const MAX_SAFE: f64 = 9_007_199_254_740_991.0;
    if number.fract() == 0.0 && number.abs() <= MAX_SAFE {
        Some(Number::from(number as i64))
    } else {
        Number::from_f64(number)
    }
}

fn key_part(value: Option<&Value>) -> String {
    match value.filter(|v| is_truthy(v)) {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => String::new(),
    }
}
