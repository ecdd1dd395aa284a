use crate::{Result, TranscriptError};

/// Unit of a numeric start-offset attribute in caption markup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OffsetUnit {
    Seconds,
    Milliseconds,
}

/// Encode an offset in seconds as `MM:SS`, or `HH:MM:SS` from one hour on.
///
/// Field widths are minimums: offsets of 100 hours or more get a wider hour field.
pub fn encode(seconds: f64) -> Result<String> {
    if !seconds.is_finite() || seconds < 0.0 {
        return Err(TranscriptError::InvalidInput(format!(
            "timestamp offset must be a non-negative finite number, got {}",
            seconds
        )));
    }

    let total_seconds = seconds.floor() as u64;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let secs = total_seconds % 60;

    if seconds < 3600.0 {
        Ok(format!("{:02}:{:02}", minutes, secs))
    } else {
        Ok(format!("{:02}:{:02}:{:02}", hours, minutes, secs))
    }
}

/// Decode a panel label such as `1:05` or `1:02:03` back into seconds
pub fn decode(label: &str) -> Option<f64> {
    let parts: Vec<&str> = label.trim().split(':').collect();
    if parts.is_empty() || parts.len() > 3 {
        return None;
    }

    let mut total = 0u64;
    for (index, part) in parts.iter().enumerate() {
        if part.is_empty() || !part.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        let value: u64 = part.parse().ok()?;
        // Everything after the leading component is a base-60 digit
        if index > 0 && value >= 60 {
            return None;
        }
        total = total.checked_mul(60)?.checked_add(value)?;
    }

    Some(total as f64)
}

/// Parse a start-offset attribute; anything unusable means "no timestamp known"
pub fn parse_offset(raw: &str, unit: OffsetUnit) -> Option<f64> {
    let value: f64 = raw.trim().parse().ok()?;
    if !value.is_finite() || value < 0.0 {
        return None;
    }

    Some(match unit {
        OffsetUnit::Seconds => value,
        OffsetUnit::Milliseconds => value / 1000.0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;

    #[test]
    fn test_encode_short_offsets() {
        assert_eq!(encode(0.0).unwrap(), "00:00");
        assert_eq!(encode(5.2).unwrap(), "00:05");
        assert_eq!(encode(65.9).unwrap(), "01:05");
        assert_eq!(encode(3599.99).unwrap(), "59:59");
    }

    #[test]
    fn test_encode_long_offsets() {
        assert_eq!(encode(3600.0).unwrap(), "01:00:00");
        assert_eq!(encode(3723.4).unwrap(), "01:02:03");
        assert_eq!(encode(36000.0).unwrap(), "10:00:00");
    }

    #[test]
    fn test_encode_rejects_bad_input() {
        assert!(matches!(encode(-1.0), Err(TranscriptError::InvalidInput(_))));
        assert!(matches!(encode(f64::NAN), Err(TranscriptError::InvalidInput(_))));
        assert!(matches!(encode(f64::INFINITY), Err(TranscriptError::InvalidInput(_))));
    }

    #[test]
    fn test_encode_shape_and_round_trip() {
        let short = Regex::new(r"^[0-5][0-9]:[0-5][0-9]$").unwrap();
        let long = Regex::new(r"^\d{2}:[0-5][0-9]:[0-5][0-9]$").unwrap();

        let mut s = 0.0;
        while s < 3600.0 {
            let token = encode(s).unwrap();
            assert!(short.is_match(&token), "{} -> {}", s, token);
            assert_eq!(decode(&token), Some(s.floor()));
            s += 7.3;
        }

        for s in [3600.0, 4000.5, 86399.0, 99.0 * 3600.0] {
            let token = encode(s).unwrap();
            assert!(long.is_match(&token), "{} -> {}", s, token);
            assert_eq!(decode(&token), Some(s.floor()));
        }
    }

    #[test]
    fn test_decode_panel_labels() {
        assert_eq!(decode("0:07"), Some(7.0));
        assert_eq!(decode("12:34"), Some(754.0));
        assert_eq!(decode(" 1:02:03 "), Some(3723.0));
        assert_eq!(decode("42"), Some(42.0));
        assert_eq!(decode("1:75"), None);
        assert_eq!(decode("a:bc"), None);
        assert_eq!(decode(""), None);
        assert_eq!(decode("1:2:3:4"), None);
    }

    #[test]
    fn test_decode_overlong_label_is_rejected() {
        assert_eq!(decode("9999999999999999999:00:00"), None);
        assert_eq!(decode("99999999999999999999"), None);
        assert_eq!(decode("18446744073709551615:00"), None);
    }

    #[test]
    fn test_encode_hundreds_of_hours() {
        assert_eq!(encode(100.0 * 3600.0 + 61.0).unwrap(), "100:01:01");
    }

    #[test]
    fn test_parse_offset() {
        assert_eq!(parse_offset("5.2", OffsetUnit::Seconds), Some(5.2));
        assert_eq!(parse_offset("1500", OffsetUnit::Milliseconds), Some(1.5));
        assert_eq!(parse_offset("abc", OffsetUnit::Seconds), None);
        assert_eq!(parse_offset("-3", OffsetUnit::Seconds), None);
        assert_eq!(parse_offset("NaN", OffsetUnit::Seconds), None);
    }
}
