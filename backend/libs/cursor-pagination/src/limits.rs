//! Page size resolution.
//!
//! A bad limit is never an error: anything missing, non-numeric or
//! non-positive falls back to the default, anything above the cap is clamped.

use serde::{Deserialize, Serialize};

/// Page size used when the caller does not ask for one.
pub const DEFAULT_LIMIT: usize = 25;

/// Hard cap on the page size.
pub const MAX_LIMIT: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLimits {
    pub default: usize,
    pub max: usize,
}

impl Default for PageLimits {
    fn default() -> Self {
        Self {
            default: DEFAULT_LIMIT,
            max: MAX_LIMIT,
        }
    }
}

impl PageLimits {
    /// Build limits, keeping `1 <= default <= max`.
    pub fn new(default: usize, max: usize) -> Self {
        let max = max.max(1);
        Self {
            default: default.clamp(1, max),
            max,
        }
    }

    /// Resolve an already-parsed limit.
    pub fn resolve(&self, requested: Option<i64>) -> usize {
        match requested {
            Some(limit) if limit > 0 => (limit as u64).min(self.max as u64) as usize,
            _ => self.default,
        }
    }

    /// Resolve a raw query-string limit.
    pub fn resolve_raw(&self, raw: Option<&str>) -> usize {
        self.resolve(raw.and_then(|value| value.trim().parse::<i64>().ok()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_limit_uses_default() {
        assert_eq!(PageLimits::default().resolve(None), 25);
    }

    #[test]
    fn non_positive_limit_uses_default() {
        let limits = PageLimits::default();
        assert_eq!(limits.resolve(Some(0)), 25);
        assert_eq!(limits.resolve(Some(-7)), 25);
    }

    #[test]
    fn oversized_limit_is_clamped() {
        let limits = PageLimits::default();
        assert_eq!(limits.resolve(Some(101)), 100);
        assert_eq!(limits.resolve(Some(i64::MAX)), 100);
    }

    #[test]
    fn raw_limit_parsing() {
        let limits = PageLimits::default();
        assert_eq!(limits.resolve_raw(Some("10")), 10);
        assert_eq!(limits.resolve_raw(Some(" 42 ")), 42);
        assert_eq!(limits.resolve_raw(Some("ten")), 25);
        assert_eq!(limits.resolve_raw(Some("")), 25);
        assert_eq!(limits.resolve_raw(Some("2.5")), 25);
        assert_eq!(limits.resolve_raw(None), 25);
    }

    #[test]
    fn custom_limits_stay_consistent() {
        let limits = PageLimits::new(500, 50);
        assert_eq!(limits.default, 50);
        assert_eq!(limits.max, 50);

        let limits = PageLimits::new(0, 0);
        assert_eq!(limits.default, 1);
        assert_eq!(limits.max, 1);
    }
}
