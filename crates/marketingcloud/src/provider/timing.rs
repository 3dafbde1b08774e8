//! Refresh throttling helpers
//!
//! The vendor refuses inbox refreshes more often than once a minute. Only
//! providers apply this; the facade forwards every refresh request.

use chrono::{DateTime, Utc};

/// Minimum seconds between two inbox refreshes that reach the server
pub const REFRESH_COOLDOWN_SECS: u64 = 60;

/// Whether `cooldown_secs` have passed between `last` and `now`
///
/// Never refreshed (`None`) counts as elapsed.
pub fn cooldown_elapsed(
    last: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    cooldown_secs: u64,
) -> bool {
    match last {
        Some(last) => (now - last).num_seconds() >= cooldown_secs as i64,
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_first_refresh_always_allowed() {
        assert!(cooldown_elapsed(None, Utc::now(), REFRESH_COOLDOWN_SECS));
    }

    #[test]
    fn test_refresh_inside_window_is_throttled() {
        let now = Utc::now();
        assert!(!cooldown_elapsed(Some(now - Duration::seconds(59)), now, REFRESH_COOLDOWN_SECS));
        assert!(!cooldown_elapsed(Some(now), now, REFRESH_COOLDOWN_SECS));
    }

    #[test]
    fn test_refresh_at_boundary_is_allowed() {
        let now = Utc::now();
        assert!(cooldown_elapsed(Some(now - Duration::seconds(60)), now, REFRESH_COOLDOWN_SECS));
        assert!(cooldown_elapsed(Some(now - Duration::hours(1)), now, REFRESH_COOLDOWN_SECS));
    }
}
