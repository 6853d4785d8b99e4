//! Lenient timestamp handling for task fields.
//!
//! Due dates are local wall-clock times in the `datetime-local` shape
//! (`2024-05-01T14:30`). Creation times are UTC instants; the REST backend
//! emits them without an offset, local storage with a trailing `Z`.

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Timelike, Utc};

const DUE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parse a due date. Empty input means "no due date" and yields `Ok(None)`.
pub fn parse_due(s: &str) -> Result<Option<NaiveDateTime>, String> {
    let s = s.trim();
    if s.is_empty() {
        return Ok(None);
    }
    for fmt in DUE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(Some(dt));
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(Some(dt.with_timezone(&chrono::Local).naive_local()));
    }
    if let Ok(d) = chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(d.and_hms_opt(0, 0, 0));
    }
    Err(format!("invalid due date: {s}"))
}

/// Format a due date the way it is stored
pub fn format_due(dt: &NaiveDateTime) -> String {
    if dt.second() == 0 && dt.nanosecond() == 0 {
        dt.format("%Y-%m-%dT%H:%M").to_string()
    } else {
        dt.format("%Y-%m-%dT%H:%M:%S%.f").to_string()
    }
}

pub fn parse_created(s: &str) -> Result<DateTime<Utc>, String> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f"))
        .map(|naive| naive.and_utc())
        .map_err(|_| format!("invalid timestamp: {s}"))
}

pub fn format_created(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub(crate) mod due_date {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<NaiveDateTime>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(dt) => serializer.serialize_str(&super::format_due(dt)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDateTime>, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw {
            Some(s) => super::parse_due(&s).map_err(serde::de::Error::custom),
            None => Ok(None),
        }
    }
}

pub(crate) mod created_at {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_created(value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_created(&raw).map_err(serde::de::Error::custom)
    }
}

pub(crate) fn serialize_due_patch<S: serde::Serializer>(
    value: &Option<Option<NaiveDateTime>>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match value {
        Some(inner) => due_date::serialize(inner, serializer),
        None => serializer.serialize_none(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    #[test]
    fn parses_datetime_local_shapes() {
        assert_eq!(parse_due("2024-05-01T14:30").unwrap(), Some(at(2024, 5, 1, 14, 30, 0)));
        assert_eq!(parse_due("2024-05-01 14:30").unwrap(), Some(at(2024, 5, 1, 14, 30, 0)));
        assert_eq!(
            parse_due("2024-05-01T14:30:15").unwrap(),
            Some(at(2024, 5, 1, 14, 30, 15))
        );
        assert_eq!(parse_due("2024-05-01").unwrap(), Some(at(2024, 5, 1, 0, 0, 0)));
    }

    #[test]
    fn empty_due_is_none() {
        assert_eq!(parse_due("").unwrap(), None);
        assert_eq!(parse_due("   ").unwrap(), None);
    }

    #[test]
    fn garbage_due_is_error() {
        assert!(parse_due("next tuesday").is_err());
    }

    #[test]
    fn format_due_drops_zero_seconds() {
        assert_eq!(format_due(&at(2024, 5, 1, 14, 30, 0)), "2024-05-01T14:30");
        assert_eq!(format_due(&at(2024, 5, 1, 14, 30, 9)), "2024-05-01T14:30:09");
    }

    #[test]
    fn created_accepts_naive_and_offset() {
        let a = parse_created("2024-05-01T08:00:00.500000").unwrap();
        let b = parse_created("2024-05-01T08:00:00.500Z").unwrap();
        assert_eq!(a, b);
        assert_eq!(format_created(&a), "2024-05-01T08:00:00.500Z");
    }
}
