//! Cycle target normalization
//!
//! A conversation always ends right after a machine turn, so the number of
//! turns is forced to be even and at least two.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Number of cycles used when the caller does not request one
pub const DEFAULT_CYCLES: u64 = 2;

/// Smallest permitted cycle target
pub const MIN_CYCLES: u64 = 2;

/// A normalized cycle target: always even and `>= 2`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct CycleTarget(u64);

impl CycleTarget {
    /// Accept an already-normalized value
    ///
    /// Odd values and values below the floor are rejected rather than
    /// adjusted; use [`NormalizedCycles::normalize`] for caller input.
    pub fn try_new(cycles: u64) -> Result<Self, DomainError> {
        if cycles < MIN_CYCLES {
            return Err(DomainError::validation(format!(
                "cycle target must be at least {MIN_CYCLES}, got {cycles}"
            )));
        }
        if cycles % 2 != 0 {
            return Err(DomainError::validation(format!(
                "cycle target must be even, got {cycles}"
            )));
        }
        Ok(Self(cycles))
    }

    /// Get the number of cycles
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl Default for CycleTarget {
    fn default() -> Self {
        Self(DEFAULT_CYCLES)
    }
}

impl fmt::Display for CycleTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u64> for CycleTarget {
    type Error = DomainError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Self::try_new(value)
    }
}

impl From<CycleTarget> for u64 {
    fn from(target: CycleTarget) -> Self {
        target.0
    }
}

/// Outcome of normalizing a requested cycle count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizedCycles {
    /// What the caller asked for, if anything
    pub requested: Option<i64>,
    /// The effective, normalized target
    pub target: CycleTarget,
    /// Whether the requested value had to be changed
    pub adjusted: bool,
}

impl NormalizedCycles {
    /// Normalize a requested cycle count
    ///
    /// - absent: the default of two, not adjusted
    /// - below two (including negatives): floored to two, adjusted
    /// - odd: rounded up to the next even number, adjusted
    /// - even and at least two: unchanged
    pub fn normalize(requested: Option<i64>) -> Self {
        let Some(value) = requested else {
            return Self {
                requested,
                target: CycleTarget::default(),
                adjusted: false,
            };
        };

        let Ok(cycles) = u64::try_from(value) else {
            return Self::floored(requested);
        };
        if cycles < MIN_CYCLES {
            return Self::floored(requested);
        }

        // i64::MAX is odd, but one more still fits in u64.
        let effective = cycles + cycles % 2;
        Self {
            requested,
            target: CycleTarget(effective),
            adjusted: effective != cycles,
        }
    }

    /// Parse raw caller input and normalize it
    ///
    /// Blank input counts as absent. Anything that is not an integer is a
    /// validation error.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(Self::normalize(None));
        }

        let value = trimmed.parse::<i64>().map_err(|_| {
            DomainError::validation(format!("cycles must be a whole number, got '{trimmed}'"))
        })?;
        Ok(Self::normalize(Some(value)))
    }

    /// Human-readable notice for adjusted requests
    pub fn notice(&self) -> Option<String> {
        if !self.adjusted {
            return None;
        }
        let requested = self.requested.map_or_else(|| "no".to_string(), |r| r.to_string());
        Some(format!(
            "Requested {requested} cycles; adjusted to {} so the conversation ends after a machine turn.",
            self.target
        ))
    }

    const fn floored(requested: Option<i64>) -> Self {
        Self {
            requested,
            target: CycleTarget(MIN_CYCLES),
            adjusted: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_uses_default_without_adjustment() {
        let normalized = NormalizedCycles::normalize(None);
        assert_eq!(normalized.target.get(), 2);
        assert!(!normalized.adjusted);
    }

    #[test]
    fn even_value_passes_through() {
        let normalized = NormalizedCycles::normalize(Some(6));
        assert_eq!(normalized.target.get(), 6);
        assert!(!normalized.adjusted);
    }

    #[test]
    fn odd_value_rounds_up() {
        let normalized = NormalizedCycles::normalize(Some(3));
        assert_eq!(normalized.target.get(), 4);
        assert!(normalized.adjusted);
    }

    #[test]
    fn one_rounds_up_to_floor() {
        let normalized = NormalizedCycles::normalize(Some(1));
        assert_eq!(normalized.target.get(), 2);
        assert!(normalized.adjusted);
    }

    #[test]
    fn zero_and_negative_are_floored() {
        for requested in [0, -1, -8, i64::MIN] {
            let normalized = NormalizedCycles::normalize(Some(requested));
            assert_eq!(normalized.target.get(), 2, "requested {requested}");
            assert!(normalized.adjusted);
        }
    }

    #[test]
    fn largest_odd_value_does_not_overflow() {
        let normalized = NormalizedCycles::normalize(Some(i64::MAX));
        assert_eq!(normalized.target.get(), i64::MAX as u64 + 1);
    }

    #[test]
    fn parse_accepts_whitespace() {
        let normalized = NormalizedCycles::parse(" 5 ").unwrap();
        assert_eq!(normalized.target.get(), 6);
        assert_eq!(normalized.requested, Some(5));
    }

    #[test]
    fn parse_blank_is_default() {
        let normalized = NormalizedCycles::parse("   ").unwrap();
        assert_eq!(normalized.target.get(), 2);
        assert!(!normalized.adjusted);
    }

    #[test]
    fn parse_rejects_non_numeric() {
        let err = NormalizedCycles::parse("four").unwrap_err();
        assert!(matches!(err, DomainError::ValidationError(_)));
        assert!(err.to_string().contains("four"));
    }

    #[test]
    fn notice_only_when_adjusted() {
        assert!(NormalizedCycles::normalize(Some(4)).notice().is_none());

        let notice = NormalizedCycles::normalize(Some(3)).notice().unwrap();
        assert!(notice.contains("Requested 3 cycles"));
        assert!(notice.contains("adjusted to 4"));
    }

    #[test]
    fn try_new_rejects_unnormalized_values() {
        assert!(CycleTarget::try_new(0).is_err());
        assert!(CycleTarget::try_new(3).is_err());
        assert_eq!(CycleTarget::try_new(8).unwrap().get(), 8);
    }

    #[test]
    fn serde_rejects_odd_target() {
        let ok: CycleTarget = serde_json::from_str("4").unwrap();
        assert_eq!(ok.get(), 4);
        assert!(serde_json::from_str::<CycleTarget>("5").is_err());
        assert_eq!(serde_json::to_string(&ok).unwrap(), "4");
    }
}
