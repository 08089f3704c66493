const UNITS: [&str; 5] = ["B", "KiB", "MiB", "GiB", "TiB"];

/// Format bytes into human-readable string
pub fn format_size(bytes: u64) -> String {
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    if unit == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}

/// Format a completion fraction (`0.0..=1.0`) as a percentage
pub fn format_progress(fraction: f64) -> String {
    format!("{:.1}%", (fraction * 100.0).clamp(0.0, 100.0))
}

/// Percentage of `part` relative to `total`, 0 when total is 0
pub fn percentage(part: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        (part as f64 / total as f64) * 100.0
    }
}

/// Format a number with thousand separators (e.g., 1,234,567)
pub fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut result = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }

    result
}

/// Comma separated list of file ids, as used in requests and summaries
pub fn format_ids(ids: &[u32]) -> String {
    ids.iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(1023), "1023 B");
        assert_eq!(format_size(1024), "1.0 KiB");
        assert_eq!(format_size(1536), "1.5 KiB");
        assert_eq!(format_size(1024 * 1024), "1.0 MiB");
        assert_eq!(format_size(5 * 1024 * 1024 * 1024), "5.0 GiB");
        assert_eq!(format_size(2048 * 1024 * 1024 * 1024 * 1024), "2048.0 TiB");
    }

    #[test]
    fn test_format_progress() {
        assert_eq!(format_progress(0.0), "0.0%");
        assert_eq!(format_progress(0.5), "50.0%");
        assert_eq!(format_progress(1.0), "100.0%");
        assert_eq!(format_progress(1.7), "100.0%");
    }

    #[test]
    fn test_percentage() {
        assert_eq!(percentage(50, 100), 50.0);
        assert_eq!(percentage(100, 0), 0.0);
    }

    #[test]
    fn test_format_count_and_ids() {
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1234567), "1,234,567");
        assert_eq!(format_ids(&[]), "");
        assert_eq!(format_ids(&[3, 1, 4]), "3,1,4");
    }
}
