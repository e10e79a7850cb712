// src/types.rs

use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

/// Which end of the reference graph is processed first.
///
/// - `CalleesFirst`: a symbol runs after everything it references
///   (drafting documentation bottom-up; default).
/// - `CallersFirst`: the graph is reversed, so a symbol runs after everything
///   that references it (revising documentation with usage context).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Order {
    #[default]
    CalleesFirst,
    CallersFirst,
}

impl FromStr for Order {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "callees_first" => Ok(Order::CalleesFirst),
            "callers_first" => Ok(Order::CallersFirst),
            other => Err(format!(
                "invalid order: {other} (expected \"callees_first\" or \"callers_first\")"
            )),
        }
    }
}

/// Parse a duration string such as `"500ms"`, `"30s"`, `"2m"` or `"1h"`.
pub fn parse_duration(s: &str) -> Result<Duration, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty duration string".to_string());
    }

    let idx = s
        .chars()
        .position(|c| !c.is_ascii_digit())
        .ok_or_else(|| "duration missing unit suffix".to_string())?;

    let (num_part, unit_part) = s.split_at(idx);
    let value: u64 = num_part
        .parse()
        .map_err(|e| format!("invalid duration number '{}': {}", num_part, e))?;

    match unit_part.trim().to_lowercase().as_str() {
        "ms" => Ok(Duration::from_millis(value)),
        "s" => Ok(Duration::from_secs(value)),
        "m" => scaled_secs(value, 60),
        "h" => scaled_secs(value, 60 * 60),
        unit => Err(format!(
            "unsupported duration unit '{}'; expected ms, s, m, or h",
            unit
        )),
    }
}

fn scaled_secs(value: u64, factor: u64) -> Result<Duration, String> {
    value
        .checked_mul(factor)
        .map(Duration::from_secs)
        .ok_or_else(|| "duration too large".to_string())
}
