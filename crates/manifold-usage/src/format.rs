//! Human-readable size formatting and its inverse
//!
//! Base-1024 scaling, two decimals. `parse_size` recovers a byte count
//! from previously formatted text and is used to re-derive sort keys.

const UNITS: [&str; 6] = ["B", "KB", "MB", "GB", "TB", "PB"];

/// Format `bytes` with the largest unit keeping the value below 1024.
pub fn format_size(bytes: u64) -> String {
    let mut value = bytes as f64;
    for unit in &UNITS[..UNITS.len() - 1] {
        if value < 1024.0 {
            return format!("{value:.2} {unit}");
        }
        value /= 1024.0;
    }
    format!("{value:.2} PB")
}

/// Extract a decimal magnitude and unit token from formatted text.
///
/// Tolerates trailing decoration (percentages etc.); the first
/// `<number> <unit>` pair wins. Returns `None` when no such pair exists.
pub fn parse_size(text: &str) -> Option<f64> {
    let mut tokens = text.split_whitespace().peekable();

    while let Some(token) = tokens.next() {
        let Ok(magnitude) = token.parse::<f64>() else {
            continue;
        };
        let Some(unit) = tokens.peek() else {
            return None;
        };
        let exponent = UNITS
            .iter()
            .position(|u| u.eq_ignore_ascii_case(unit.trim_matches(|c: char| !c.is_ascii_alphanumeric())))?;
        return Some(magnitude * 1024f64.powi(exponent as i32));
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_unit_boundaries() {
        assert_eq!(format_size(0), "0.00 B");
        assert_eq!(format_size(1023), "1023.00 B");
        assert_eq!(format_size(1024), "1.00 KB");
        assert_eq!(format_size(1048575), "1024.00 KB");
        assert_eq!(format_size(1048576), "1.00 MB");
        assert_eq!(format_size(31_457_280), "30.00 MB");
        assert_eq!(format_size(1099511627776), "1.00 TB");
    }

    #[test]
    fn test_parse_plain() {
        assert_eq!(parse_size("2.50 GB"), Some(2.5 * 1024f64.powi(3)));
        assert_eq!(parse_size("512.00 B"), Some(512.0));
        assert_eq!(parse_size("nothing here"), None);
    }

    #[test]
    fn test_parse_with_trailing_decoration() {
        let text = "30.00 MB (75.00% of occupied space)";
        assert_eq!(parse_size(text), Some(30.0 * 1024.0 * 1024.0));
    }

    #[test]
    fn test_round_trip_within_tolerance() {
        for n in [1023u64, 1024, 1048575, 1048576, 31_457_280, 1099511627776] {
            let recovered = parse_size(&format_size(n)).unwrap();
            let relative = (recovered - n as f64).abs() / n as f64;
            assert!(relative < 0.01, "{n}: recovered {recovered}");
        }
    }

    #[test]
    fn test_repeated_round_trip_is_stable() {
        let once = format_size(5 * 1024 * 1024 * 1024);
        let twice = format_size(parse_size(&once).unwrap() as u64);
        assert_eq!(once, twice);
    }
}
