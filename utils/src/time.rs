//! Duration formatting for log lines.

const UNITS: [(u64, &str); 4] = [(86_400, "d"), (3_600, "h"), (60, "m"), (1, "s")];

/// Render seconds as compact units, largest first, skipping zero units:
/// `90061` becomes `"1d 1h 1m 1s"`, `1800` becomes `"30m"`.
pub fn format_duration(secs: u64) -> String {
    if secs == 0 {
        return "0s".to_string();
    }
    let mut rest = secs;
    let mut parts = Vec::with_capacity(UNITS.len());
    for (size, suffix) in UNITS {
        let count = rest / size;
        if count > 0 {
            parts.push(format!("{count}{suffix}"));
            rest %= size;
        }
    }
    parts.join(" ")
}

/// Describe how long until a window that closes at `closes_at` lets
/// finalization through, as seen at `now`. Windows are exclusive of their
/// closing second.
pub fn format_remaining(closes_at: u64, now: u64) -> String {
    match closes_at.checked_sub(now) {
        Some(left) => format!("closes in {}", format_duration(left.saturating_add(1))),
        None => "closed".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_empty_units() {
        assert_eq!(format_duration(0), "0s");
        assert_eq!(format_duration(59), "59s");
        assert_eq!(format_duration(100), "1m 40s");
        assert_eq!(format_duration(1800), "30m");
        assert_eq!(format_duration(3601), "1h 1s");
        assert_eq!(format_duration(90_061), "1d 1h 1m 1s");
    }

    #[test]
    fn remaining_counts_the_closing_second() {
        assert_eq!(format_remaining(1100, 1099), "closes in 2s");
        assert_eq!(format_remaining(1100, 1100), "closes in 1s");
        assert_eq!(format_remaining(1100, 1101), "closed");
    }
}
