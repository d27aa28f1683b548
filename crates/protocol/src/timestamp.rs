use chrono::{DateTime, NaiveDateTime, Utc};

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid timestamp in {field}: {value:?}")]
pub struct TimestampError {
    pub field: &'static str,
    pub value: String,
}

/// Parses an ISO-8601 instant. A trailing `Z` or a numeric offset is honored;
/// a value without any offset is read as UTC.
pub fn parse_timestamp(field: &'static str, value: &str) -> Result<DateTime<Utc>, TimestampError> {
    let trimmed = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(parsed.with_timezone(&Utc));
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(naive.and_utc());
        }
    }
    Err(TimestampError {
        field,
        value: value.to_string(),
    })
}

pub fn parse_optional_timestamp(
    field: &'static str,
    value: Option<&str>,
) -> Result<Option<DateTime<Utc>>, TimestampError> {
    value.map(|value| parse_timestamp(field, value)).transpose()
}

/// Renders epoch seconds (the AWS JSON wire form) as an RFC 3339 string.
pub fn epoch_seconds_to_rfc3339(seconds: f64) -> Option<String> {
    let whole = seconds.floor();
    let nanos = ((seconds - whole) * 1_000_000_000.0).round() as u32;
    DateTime::<Utc>::from_timestamp(whole as i64, nanos.min(999_999_999))
        .map(|instant| instant.to_rfc3339())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn parses_z_suffix_as_utc() {
        let parsed = parse_timestamp("created", "2025-03-24T14:47:28.193399Z").expect("parse");
        assert_eq!(parsed.timestamp(), 1742827648);
        assert_eq!(parsed.timestamp_subsec_micros(), 193399);
    }

    #[test]
    fn converts_offsets_to_utc() {
        let parsed = parse_timestamp("created", "2025-01-01T02:00:00+02:00").expect("parse");
        assert_eq!(parsed, Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn reads_naive_values_as_utc() {
        let parsed = parse_timestamp("created", "2025-01-01T00:00:00").expect("parse");
        assert_eq!(parsed, Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn rejects_garbage_with_field_name() {
        let err = parse_timestamp("start_time", "yesterday").unwrap_err();
        assert_eq!(err.field, "start_time");
        assert!(err.to_string().contains("yesterday"));
    }

    #[test]
    fn absent_value_passes_through() {
        assert_eq!(parse_optional_timestamp("end_time", None), Ok(None));
    }

    #[test]
    fn epoch_seconds_render_as_rfc3339() {
        let rendered = epoch_seconds_to_rfc3339(1735689600.5).expect("render");
        let parsed = parse_timestamp("CreationTime", &rendered).expect("parse");
        assert_eq!(parsed.timestamp(), 1735689600);
        assert_eq!(parsed.timestamp_subsec_millis(), 500);
    }
}
