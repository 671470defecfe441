//! Display helpers for file sizes and dates.

use knowledge_ox_common::Timestamp;

const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// Human-readable size with 1024 steps, e.g. `1536` -> `"1.5 KB"`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn format_bytes(bytes: u64) -> String {
    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    // 1023.95 KB and up would print as "1024.0 KB"
    if (value * 10.0).round() / 10.0 >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rounded = format!("{value:.1}");
    let trimmed = rounded.strip_suffix(".0").unwrap_or(&rounded);
    format!("{trimmed} {}", UNITS[unit])
}

/// Local date string for an epoch value in seconds or milliseconds.
#[must_use]
pub fn format_date(epoch: i64) -> String {
    Timestamp::from_epoch_guess(epoch).to_local_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_byte_sizes() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(1024), "1 KB");
        assert_eq!(format_bytes(1536), "1.5 KB");
        assert_eq!(format_bytes(5 * 1024 * 1024), "5 MB");
        assert_eq!(format_bytes(u64::MAX), "16777216 TB");
    }

    #[test]
    fn rounding_up_to_the_next_step_switches_units() {
        assert_eq!(format_bytes(1_048_575), "1 MB");
        assert_eq!(format_bytes(1023), "1023 B");
        assert_eq!(format_bytes(1_048_524), "1023.9 KB");
    }

    #[test]
    fn dates_in_seconds_and_millis_agree() {
        assert_eq!(format_date(1_700_000_000), format_date(1_700_000_000_000));
        assert!(!format_date(0).is_empty());
    }
}
