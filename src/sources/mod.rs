//! Raw GPS samples sources API

use serde::Deserialize;
use time::format_description::well_known;
use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime};

use crate::TripError;

/// One GPS row as read from a source, before any normalization
#[derive(Clone, Debug, PartialEq)]
pub struct RawSample {
    pub timestamp: OffsetDateTime,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub speed_mps: Option<f64>,
    pub accuracy_m: Option<f64>,
}

impl RawSample {
    pub fn basic(timestamp: OffsetDateTime, lat: f64, lon: f64, speed_mps: f64) -> Self {
        Self {
            timestamp,
            lat: Some(lat),
            lon: Some(lon),
            speed_mps: Some(speed_mps),
            accuracy_m: None,
        }
    }

    pub fn accuracy(mut self, accuracy_m: f64) -> Self {
        self.accuracy_m = Some(accuracy_m);
        self
    }
}

/// Rows fetched from a source
///
/// `has_accuracy` tells whether the source carries an accuracy column at all,
/// which is not the same as every row missing its accuracy value.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawSamples {
    pub rows: Vec<RawSample>,
    pub has_accuracy: bool,
}

/// Samples source
pub trait SamplesSource {
    /// Fetch every raw sample of the trip
    fn fetch(&mut self) -> Result<RawSamples, TripError>;
}

/// Source header names
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct FieldsConfiguration {
    pub timestamp: String,
    pub lat: String,
    pub lon: String,
    pub speed: String,
    pub accuracy: String,
}

impl Default for FieldsConfiguration {
    fn default() -> Self {
        Self {
            timestamp: "timestamp".to_string(),
            lat: "lat".to_string(),
            lon: "lon".to_string(),
            speed: "speed_mps".to_string(),
            accuracy: "accuracy_m".to_string(),
        }
    }
}

/// Parse an ISO-8601 timestamp
///
/// Accepts RFC 3339 and the wider ISO-8601 forms: offsets written as `+0100`
/// or `+01`, times down to minute precision. A naive date time (`T` or space
/// separated) is taken as UTC.
pub fn parse_timestamp(raw: &str) -> Result<OffsetDateTime, time::error::Parse> {
    let raw = raw.trim().replacen(' ', "T", 1);

    if let Ok(time) = OffsetDateTime::parse(&raw, &well_known::Rfc3339) {
        return Ok(time);
    }

    if let Ok(time) = OffsetDateTime::parse(&raw, &well_known::Iso8601::DEFAULT) {
        return Ok(time);
    }

    if let Ok(time) = OffsetDateTime::parse(
        &raw,
        format_description!(
            "[year]-[month]-[day]T[hour]:[minute][optional [:[second]]][optional [.[subsecond]]][offset_hour sign:mandatory][optional [:]][optional [[offset_minute]]]"
        ),
    ) {
        return Ok(time);
    }

    PrimitiveDateTime::parse(
        &raw,
        format_description!(
            "[year]-[month]-[day]T[hour]:[minute][optional [:[second]]][optional [.[subsecond]]]"
        ),
    )
    .map(|naive| naive.assume_utc())
}

#[cfg(feature = "csv")]
mod csv_file;

#[cfg(feature = "csv")]
pub use csv_file::CsvSource;

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::parse_timestamp;

    #[test]
    fn timestamp_with_offset() -> Result<(), String> {
        let t = parse_timestamp("2026-02-15T12:00:05+01:00").map_err(|e| e.to_string())?;
        assert_eq!(datetime!(2026-02-15 12:00:05 +1), t);

        let t = parse_timestamp(" 2026-02-15 11:00:05Z ").map_err(|e| e.to_string())?;
        assert_eq!(datetime!(2026-02-15 11:00:05 UTC), t);

        Ok(())
    }

    #[test]
    fn naive_timestamp_is_utc() -> Result<(), String> {
        let t = parse_timestamp("2026-02-15T12:00:05").map_err(|e| e.to_string())?;
        assert_eq!(datetime!(2026-02-15 12:00:05 UTC), t);

        let t = parse_timestamp("2026-02-15 12:00:05.250").map_err(|e| e.to_string())?;
        assert_eq!(datetime!(2026-02-15 12:00:05.25 UTC), t);

        Ok(())
    }

    #[test]
    fn iso8601_offsets() -> Result<(), String> {
        for raw in [
            "2026-02-15T12:00:05+0100",
            "2026-02-15T12:00:05+01",
            "2026-02-15T12:00:05.000+01:00",
            "2026-02-15 11:00:05+00",
        ] {
            let t = parse_timestamp(raw).map_err(|e| format!("{}: {}", raw, e))?;
            assert_eq!(datetime!(2026-02-15 12:00:05 +1), t, "{}", raw);
        }

        let t = parse_timestamp("2026-02-15T12:00:05-03").map_err(|e| e.to_string())?;
        assert_eq!(datetime!(2026-02-15 15:00:05 UTC), t);

        Ok(())
    }

    #[test]
    fn minute_precision() -> Result<(), String> {
        let t = parse_timestamp("2026-02-15T12:00").map_err(|e| e.to_string())?;
        assert_eq!(datetime!(2026-02-15 12:00 UTC), t);

        let t = parse_timestamp("2026-02-15T12:00+01:00").map_err(|e| e.to_string())?;
        assert_eq!(datetime!(2026-02-15 12:00 +1), t);

        Ok(())
    }

    #[test]
    fn invalid_timestamp() {
        assert!(parse_timestamp("yesterday").is_err());
        assert!(parse_timestamp("").is_err());
        assert!(parse_timestamp("2026-02-15").is_err());
        assert!(parse_timestamp("2026-02-15T25:00:00").is_err());
    }
}
