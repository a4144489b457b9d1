//! Normalization of textual duration tokens to microseconds.
//!
//! Tokens come from `Debug`-formatted `std::time::Duration` values in node
//! logs, e.g. `234.56µs`, `1.2ms`, `850ns` or `1.000000001s`.

use crate::error::{AnalyzerError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationUnit {
    Nanos,
    Micros,
    Millis,
    Seconds,
}

impl DurationUnit {
    /// Maps a unit suffix to a unit. The whole suffix is compared, so `ms`
    /// never resolves to seconds. Unknown or empty suffixes are `None`.
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix {
            "ns" => Some(DurationUnit::Nanos),
            // U+00B5 MICRO SIGN and U+03BC GREEK SMALL LETTER MU
            "µs" | "μs" | "us" => Some(DurationUnit::Micros),
            "ms" => Some(DurationUnit::Millis),
            "s" => Some(DurationUnit::Seconds),
            _ => None,
        }
    }

    pub fn micros_per_unit(self) -> f64 {
        match self {
            DurationUnit::Nanos => 1e-3,
            DurationUnit::Micros => 1.0,
            DurationUnit::Millis => 1_000.0,
            DurationUnit::Seconds => 1_000_000.0,
        }
    }

    fn to_micros(self, value: f64) -> f64 {
        match self {
            // divide rather than multiply by 1e-3 to keep `1000ns` == 1.0 exactly
            DurationUnit::Nanos => value / 1_000.0,
            _ => value * self.micros_per_unit(),
        }
    }
}

/// Converts a duration token to microseconds.
///
/// Tokens without a recognized unit are assumed to be microseconds already.
/// Fails when no unsigned numeric prefix can be extracted or the value
/// overflows to infinity.
pub fn normalize(token: &str) -> Result<f64> {
    let token = token.trim();
    let caps = regex!(r"^(\d+(?:\.\d*)?|\.\d+)(?:[eE][+-]?\d+)?")
        .captures(token)
        .ok_or_else(|| AnalyzerError::UnrecognizedUnit(token.to_string()))?;
    let number = &caps[0];
    let value: f64 = number
        .parse()
        .map_err(|_| AnalyzerError::UnrecognizedUnit(token.to_string()))?;

    let suffix = token[number.len()..].trim();
    let micros = match DurationUnit::from_suffix(suffix) {
        Some(unit) => unit.to_micros(value),
        None => value,
    };
    if !micros.is_finite() {
        return Err(AnalyzerError::UnrecognizedUnit(token.to_string()));
    }
    Ok(micros)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= 1e-9 * expected.abs().max(1.0),
            "{actual} != {expected}"
        );
    }

    #[test]
    fn test_unit_scales() {
        assert_close(normalize("1500ns").unwrap(), 1.5);
        assert_close(normalize("12us").unwrap(), 12.0);
        assert_close(normalize("1.25ms").unwrap(), 1_250.0);
        assert_close(normalize("2s").unwrap(), 2_000_000.0);
        assert_close(normalize("1.000000001s").unwrap(), 1_000_000.001);
    }

    #[test]
    fn test_micro_identity_is_exact() {
        assert_eq!(normalize("234.56µs").unwrap(), 234.56);
        assert_eq!(normalize("234.56μs").unwrap(), 234.56);
        assert_eq!(normalize("234.56").unwrap(), 234.56);
    }

    #[test]
    fn test_millis_not_read_as_seconds() {
        assert_close(normalize("3ms").unwrap(), 3_000.0);
        assert_close(normalize("3 ms").unwrap(), 3_000.0);
    }

    #[test]
    fn test_unknown_unit_falls_back_to_micros() {
        assert_eq!(normalize("42min").unwrap(), 42.0);
        assert_eq!(normalize(" 7.5xyz ").unwrap(), 7.5);
    }

    #[test]
    fn test_no_numeric_prefix_fails() {
        for token in ["", "ms", "abc", "-5us", "NaNus"] {
            assert!(
                matches!(normalize(token), Err(AnalyzerError::UnrecognizedUnit(_))),
                "{token:?} should fail"
            );
        }
    }

    #[test]
    fn test_overflowing_value_fails() {
        for token in ["1e400us", "1e308s"] {
            assert!(
                matches!(normalize(token), Err(AnalyzerError::UnrecognizedUnit(_))),
                "{token:?} should fail"
            );
        }
        assert_eq!(normalize("1e3us").unwrap(), 1_000.0);
    }
}
