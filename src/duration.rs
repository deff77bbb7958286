//! Duration values as the directory server formats them (`1 s`, `500 ms`, `2 minutes`).
//!
//! The server normalizes durations on write, so the text it returns can differ
//! from what was configured while meaning the same thing.

use std::time::Duration;

use crate::framework::{Diagnostics, StringAttr};

const NANOS_PER_MILLI: u128 = 1_000_000;
const NANOS_PER_SECOND: u128 = 1_000 * NANOS_PER_MILLI;

fn unit_nanos(unit: &str) -> Option<u128> {
    let nanos = match unit {
        "ms" | "millisecond" | "milliseconds" => NANOS_PER_MILLI,
        "s" | "sec" | "second" | "seconds" => NANOS_PER_SECOND,
        "m" | "min" | "minute" | "minutes" => 60 * NANOS_PER_SECOND,
        "h" | "hr" | "hour" | "hours" => 3_600 * NANOS_PER_SECOND,
        "d" | "day" | "days" => 86_400 * NANOS_PER_SECOND,
        "w" | "week" | "weeks" => 604_800 * NANOS_PER_SECOND,
        _ => return None,
    };
    Some(nanos)
}

pub fn parse_duration(input: &str) -> Option<Duration> {
    let input = input.trim();
    let split = input
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(input.len());
    let (number, unit) = input.split_at(split);
    let unit_nanos = unit_nanos(unit.trim().to_ascii_lowercase().as_str())?;

    let (whole, fraction) = number.split_once('.').unwrap_or((number, ""));
    if whole.is_empty() && fraction.is_empty() {
        return None;
    }

    let whole: u128 = if whole.is_empty() { 0 } else { whole.parse().ok()? };
    let mut nanos = whole.checked_mul(unit_nanos)?;
    if !fraction.is_empty() {
        let digits: u128 = fraction.parse().ok()?;
        let scale = 10u128.checked_pow(u32::try_from(fraction.len()).ok()?)?;
        nanos = nanos.checked_add(digits.checked_mul(unit_nanos)? / scale)?;
    }

    let secs = u64::try_from(nanos / NANOS_PER_SECOND).ok()?;
    let subsec = u32::try_from(nanos % NANOS_PER_SECOND).ok()?;
    Some(Duration::new(secs, subsec))
}

/// Keeps the planned text in `state` when the server answered with an
/// equivalent duration written differently; warns when the durations differ.
pub fn reconcile_duration(
    plan: &StringAttr,
    state: &mut StringAttr,
    attribute: &str,
    diags: &mut Diagnostics,
) {
    let (Some(planned), Some(actual)) = (plan.as_str(), state.as_str()) else {
        return;
    };
    if planned == actual {
        return;
    }

    match (parse_duration(planned), parse_duration(actual)) {
        (Some(a), Some(b)) if a == b => *state = plan.clone(),
        _ => diags.add_warning(
            "Mismatched duration value",
            format!("attribute '{attribute}' was configured as '{planned}' but the server reports '{actual}'"),
        ),
    }
}
