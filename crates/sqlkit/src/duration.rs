//! Duration text in the form MySQL DSNs and service configs expect
//! (`"1s"`, `"1m30s"`, `"1.5ms"`, `"2h0m0s"`).

use crate::error::{DbError, DbResult};
use std::fmt::Write;
use std::time::Duration;

const NANOS_PER_SEC: u128 = 1_000_000_000;

/// Render a duration the way DSN parameters expect.
///
/// Sub-second values use the largest fitting unit with a trimmed fraction
/// (`"500ms"`, `"1.5µs"`); larger values are written as hours, minutes and
/// fractional seconds, omitting leading zero units (`"1m30s"`, `"1h0m0s"`).
pub fn format_duration(d: Duration) -> String {
    let nanos = d.as_nanos();
    if nanos == 0 {
        return "0s".to_string();
    }

    if nanos < NANOS_PER_SEC {
        return if nanos < 1_000 {
            format!("{nanos}ns")
        } else if nanos < 1_000_000 {
            format!("{}{}µs", nanos / 1_000, fraction(nanos % 1_000, 3))
        } else {
            format!("{}{}ms", nanos / 1_000_000, fraction(nanos % 1_000_000, 6))
        };
    }

    let total_secs = nanos / NANOS_PER_SEC;
    let mut out = String::new();
    let minutes = total_secs / 60;
    if minutes > 0 {
        let hours = minutes / 60;
        if hours > 0 {
            let _ = write!(out, "{hours}h");
        }
        let _ = write!(out, "{}m", minutes % 60);
    }
    let _ = write!(
        out,
        "{}{}s",
        total_secs % 60,
        fraction(nanos % NANOS_PER_SEC, 9)
    );
    out
}

fn fraction(value: u128, digits: usize) -> String {
    if value == 0 {
        return String::new();
    }
    let padded = format!("{value:0digits$}");
    format!(".{}", padded.trim_end_matches('0'))
}

/// Parse duration text such as `"300ms"`, `"1.5h"` or `"2h45m"`.
///
/// Valid units are `ns`, `us` (or `µs`), `ms`, `s`, `m`, `h`. A bare `"0"` is
/// accepted; negative durations are rejected.
pub fn parse_duration(input: &str) -> DbResult<Duration> {
    let invalid = || DbError::InvalidDuration(input.to_string());

    let s = input.trim();
    let s = s.strip_prefix('+').unwrap_or(s);
    if s == "0" {
        return Ok(Duration::ZERO);
    }
    if s.is_empty() || s.starts_with('-') {
        return Err(invalid());
    }

    let mut total: u128 = 0;
    let mut rest = s;
    while !rest.is_empty() {
        let num_len = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .ok_or_else(invalid)?;
        if num_len == 0 {
            return Err(invalid());
        }
        let (number, tail) = rest.split_at(num_len);
        let unit_len = tail
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(tail.len());
        let (unit, tail) = tail.split_at(unit_len);

        let scale: u128 = match unit {
            "ns" => 1,
            "us" | "µs" | "μs" => 1_000,
            "ms" => 1_000_000,
            "s" => NANOS_PER_SEC,
            "m" => 60 * NANOS_PER_SEC,
            "h" => 3_600 * NANOS_PER_SEC,
            _ => return Err(invalid()),
        };

        let (whole, frac) = number.split_once('.').unwrap_or((number, ""));
        if whole.is_empty() && frac.is_empty() {
            return Err(invalid());
        }
        let whole: u128 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| invalid())?
        };
        total = whole
            .checked_mul(scale)
            .and_then(|v| total.checked_add(v))
            .ok_or_else(invalid)?;

        if !frac.is_empty() {
            let digits = frac.len().min(18);
            let frac_value: u128 = frac[..digits].parse().map_err(|_| invalid())?;
            total += frac_value * scale / 10u128.pow(digits as u32);
        }

        rest = tail;
    }

    let secs = u64::try_from(total / NANOS_PER_SEC).map_err(|_| invalid())?;
    Ok(Duration::new(secs, (total % NANOS_PER_SEC) as u32))
}

/// Serde helpers for `Option<Duration>` fields given either as duration text
/// or as an integer number of nanoseconds.
pub(crate) mod option {
    use super::parse_duration;
    use serde::de::{self, Deserializer};
    use serde::Deserialize;
    use std::time::Duration;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Nanos(u64),
        Text(String),
    }

    pub(crate) fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<Raw>::deserialize(deserializer)? {
            None => Ok(None),
            Some(Raw::Nanos(n)) => Ok(Some(Duration::from_nanos(n))),
            Some(Raw::Text(s)) => parse_duration(&s).map(Some).map_err(de::Error::custom),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_matches_dsn_text() {
        assert_eq!(format_duration(Duration::ZERO), "0s");
        assert_eq!(format_duration(Duration::from_secs(1)), "1s");
        assert_eq!(format_duration(Duration::from_millis(1500)), "1.5s");
        assert_eq!(format_duration(Duration::from_millis(500)), "500ms");
        assert_eq!(format_duration(Duration::from_micros(1500)), "1.5ms");
        assert_eq!(format_duration(Duration::from_nanos(1500)), "1.5µs");
        assert_eq!(format_duration(Duration::from_nanos(42)), "42ns");
        assert_eq!(format_duration(Duration::from_secs(90)), "1m30s");
        assert_eq!(format_duration(Duration::from_secs(3600)), "1h0m0s");
        assert_eq!(format_duration(Duration::from_secs(3 * 3600 + 5)), "3h0m5s");
    }

    #[test]
    fn parse_accepts_units_and_fractions() {
        assert_eq!(parse_duration("0").unwrap(), Duration::ZERO);
        assert_eq!(parse_duration("1s").unwrap(), Duration::from_secs(1));
        assert_eq!(parse_duration("300ms").unwrap(), Duration::from_millis(300));
        assert_eq!(parse_duration("1.5h").unwrap(), Duration::from_secs(5400));
        assert_eq!(parse_duration("2h45m").unwrap(), Duration::from_secs(9900));
        assert_eq!(parse_duration("10us").unwrap(), Duration::from_micros(10));
        assert_eq!(parse_duration(".5s").unwrap(), Duration::from_millis(500));
    }

    #[test]
    fn parse_rejects_malformed_text() {
        for bad in ["", "-1s", "1", "s", "1x", "1.s.", "abc"] {
            assert!(parse_duration(bad).is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn format_then_parse_is_stable() {
        for d in [
            Duration::from_millis(1250),
            Duration::from_secs(86_400),
            Duration::from_micros(7),
        ] {
            assert_eq!(parse_duration(&format_duration(d)).unwrap(), d);
        }
    }
}
