use std::time::{SystemTime, UNIX_EPOCH};

/// Returns the current UNIX timestamp in seconds.
///
/// Used to stamp oracle requests when they are opened and to decide
/// whether they have outlived their retention window.
pub fn current_time() -> u64 {
    unix_seconds(SystemTime::now())
}

/// A clock set before the UNIX epoch yields `0` instead of panicking.
fn unix_seconds(at: SystemTime) -> u64 {
    at.duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_pre_epoch_clock_reads_zero() {
        let skewed = UNIX_EPOCH - Duration::from_secs(3_600);
        assert_eq!(unix_seconds(skewed), 0);
    }

    #[test]
    fn test_whole_seconds_after_epoch() {
        assert_eq!(unix_seconds(UNIX_EPOCH), 0);
        assert_eq!(unix_seconds(UNIX_EPOCH + Duration::from_millis(90_999)), 90);
    }
}
