//! CSV file source integration

use std::io::Read;

use csv::{Reader, StringRecord};

use super::{parse_timestamp, FieldsConfiguration, RawSample, RawSamples, SamplesSource};
use crate::errors::Stage;
use crate::trip::dynamics::{DynamicSample, DynamicTrip};
use crate::trip::Sample;
use crate::TripError;

pub const DT_COLUMN: &str = "dt_s";
pub const SPEED_KMH_COLUMN: &str = "speed_kmh";
pub const ACCELERATION_COLUMN: &str = "acc_mps2";
pub const JERK_COLUMN: &str = "jerk_mps3";

/// CSV trip source
pub struct CsvSource<T>
where
    T: Read,
{
    rdr: Reader<T>,
    fields: FieldsConfiguration,
}

impl<T> CsvSource<T>
where
    T: Read,
{
    pub fn new(rdr: Reader<T>, fields: Option<FieldsConfiguration>) -> Self {
        Self {
            rdr,
            fields: fields.unwrap_or_default(),
        }
    }

    /// Read back an augmented trip, keeping its derived columns as they are
    pub fn fetch_dynamics(&mut self) -> Result<DynamicTrip, TripError> {
        let mut header = self
            .rdr
            .headers()
            .map_err(|e| TripError::CsvRead { source: e })?
            .clone();
        let header_idx = parse_header(&self.fields, &mut header)?;
        let derived_idx = parse_derived_header(&header)?;

        let mut samples = vec![];
        for (i, row) in self.rdr.records().enumerate() {
            let mut rec = row.map_err(|e| TripError::CsvRead { source: e })?;
            rec.trim();
            if is_blank(&rec) {
                continue;
            }

            let line = i + 1;
            let raw = parse_row(&header_idx, &self.fields, &rec, line)?;
            let (Some(lat), Some(lon), Some(speed)) = (raw.lat, raw.lon, raw.speed_mps) else {
                return Err(TripError::malformed(
                    line,
                    &self.fields.speed,
                    "derived rows need a position and a speed",
                ));
            };

            let mut sample = Sample::new(raw.timestamp, lat, lon, speed);
            sample.accuracy_m = raw.accuracy_m;
            sample.speed_kmh = required_number(&rec, derived_idx.speed_kmh, SPEED_KMH_COLUMN, line)?;

            samples.push(DynamicSample {
                sample,
                dt_s: required_number(&rec, derived_idx.dt, DT_COLUMN, line)?,
                acc_mps2: required_number(&rec, derived_idx.acc, ACCELERATION_COLUMN, line)?,
                jerk_mps3: required_number(&rec, derived_idx.jerk, JERK_COLUMN, line)?,
            });
        }

        Ok(DynamicTrip::from_derived(samples))
    }
}

impl<T> SamplesSource for CsvSource<T>
where
    T: Read,
{
    fn fetch(&mut self) -> Result<RawSamples, TripError> {
        let mut rows = vec![];

        let mut header = self
            .rdr
            .headers()
            .map_err(|e| TripError::CsvRead { source: e })?
            .clone();
        let header_idx = parse_header(&self.fields, &mut header)?;

        for (i, row) in self.rdr.records().enumerate() {
            let mut rec = row.map_err(|e| TripError::CsvRead { source: e })?;
            rec.trim();
            if is_blank(&rec) {
                continue;
            }

            rows.push(parse_row(&header_idx, &self.fields, &rec, i + 1)?);
        }

        Ok(RawSamples {
            rows,
            has_accuracy: header_idx.accuracy.is_some(),
        })
    }
}

/// Field to index map
#[derive(Debug)]
struct FieldsIndex {
    timestamp: usize,
    lat: usize,
    lon: usize,
    speed: usize,
    accuracy: Option<usize>,
}

/// Derived columns index map
#[derive(Debug)]
struct DerivedIndex {
    speed_kmh: usize,
    dt: usize,
    acc: usize,
    jerk: usize,
}

fn position(header: &StringRecord, name: &str) -> Option<usize> {
    let name = name.to_lowercase();
    header.iter().position(|h| h.to_lowercase() == name)
}

fn required(header: &StringRecord, name: &str, stage: Stage) -> Result<usize, TripError> {
    position(header, name).ok_or_else(|| TripError::missing_column(name, stage))
}

fn parse_header(
    fields: &FieldsConfiguration,
    header: &mut StringRecord,
) -> Result<FieldsIndex, TripError> {
    header.trim();

    Ok(FieldsIndex {
        timestamp: required(header, &fields.timestamp, Stage::Ingestion)?,
        lat: required(header, &fields.lat, Stage::Ingestion)?,
        lon: required(header, &fields.lon, Stage::Ingestion)?,
        speed: required(header, &fields.speed, Stage::Ingestion)?,
        accuracy: position(header, &fields.accuracy),
    })
}

fn parse_derived_header(header: &StringRecord) -> Result<DerivedIndex, TripError> {
    Ok(DerivedIndex {
        speed_kmh: required(header, SPEED_KMH_COLUMN, Stage::Metrics)?,
        dt: required(header, DT_COLUMN, Stage::Metrics)?,
        acc: required(header, ACCELERATION_COLUMN, Stage::Metrics)?,
        jerk: required(header, JERK_COLUMN, Stage::Metrics)?,
    })
}

fn is_blank(row: &StringRecord) -> bool {
    row.iter().all(|f| f.is_empty())
}

/// Empty and non finite values are missing, anything else must be a number
fn parse_number(row: &StringRecord, idx: usize, column: &str, line: usize) -> Result<Option<f64>, TripError> {
    match row.get(idx) {
        Some(d) if !d.is_empty() => {
            let value = d
                .parse::<f64>()
                .map_err(|e| TripError::malformed(line, column, e))?;
            Ok(value.is_finite().then_some(value))
        }
        _ => Ok(None),
    }
}

fn required_number(row: &StringRecord, idx: usize, column: &str, line: usize) -> Result<f64, TripError> {
    parse_number(row, idx, column, line)?
        .ok_or_else(|| TripError::malformed(line, column, "value is missing"))
}

fn parse_row(
    header: &FieldsIndex,
    fields: &FieldsConfiguration,
    row: &StringRecord,
    line: usize,
) -> Result<RawSample, TripError> {
    let timestamp = match row.get(header.timestamp) {
        Some(d) => parse_timestamp(d).map_err(|e| TripError::malformed(line, &fields.timestamp, e)),
        None => Err(TripError::malformed(line, &fields.timestamp, "field not found")),
    }?;

    Ok(RawSample {
        timestamp,
        lat: parse_number(row, header.lat, &fields.lat, line)?,
        lon: parse_number(row, header.lon, &fields.lon, line)?,
        speed_mps: parse_number(row, header.speed, &fields.speed, line)?,
        accuracy_m: match header.accuracy {
            Some(idx) => parse_number(row, idx, &fields.accuracy, line)?,
            None => None,
        },
    })
}

#[cfg(test)]
pub mod tests {
    use csv::ReaderBuilder;
    use time::macros::datetime;

    use super::CsvSource;
    use crate::errors::Stage;
    use crate::sources::{FieldsConfiguration, SamplesSource};
    use crate::trip::{IngestOptions, Trip};
    use crate::TripError;

    fn source(data: &str) -> CsvSource<&[u8]> {
        let rdr = ReaderBuilder::new()
            .flexible(true)
            .from_reader(data.as_bytes());
        CsvSource::new(rdr, None)
    }

    #[test]
    fn trip() -> Result<(), TripError> {
        let data = "timestamp,lat,lon,speed_mps,accuracy_m
            2026-02-15T12:00:10+01:00,46.62,14.31,11.0,4
            2026-02-15T12:00:00+01:00,46.62,14.30,0.0,5
            2026-02-15T12:00:05+01:00,46.62,14.30,5.5,5
        ";

        let trip = Trip::from_source(source(data), &IngestOptions::default())?;
        assert_eq!(3, trip.len());

        let first = &trip.samples()[0];
        assert_eq!(datetime!(2026-02-15 12:00:00 +1), first.timestamp);
        assert_eq!(46.62, first.lat());
        assert_eq!(14.30, first.lon());
        assert_eq!(Some(5.), first.accuracy_m);
        assert_eq!(11.0, trip.samples()[2].speed_mps);

        Ok(())
    }

    #[test]
    fn filter_out_failed_rows() -> Result<(), TripError> {
        let data = "timestamp,lat,lon,speed_mps,accuracy_m
            2026-02-15T12:00:00Z,46.62,14.30,1.0,5
            2026-02-15T12:00:01Z,,14.30,1.0,5
            2026-02-15T12:00:02Z,46.62,14.30,NaN,5
            2026-02-15T12:00:03Z,46.62,14.30,1.0,
            2026-02-15T12:00:04Z,46.62,14.30,1.0,250
            2026-02-15T12:00:05Z,46.62,14.30,-3.0,100
        ";

        let trip = Trip::from_source(source(data), &IngestOptions::default())?;
        assert_eq!(2, trip.len());
        assert_eq!(0., trip.samples()[1].speed_mps);

        Ok(())
    }

    #[test]
    fn without_accuracy_column() -> Result<(), TripError> {
        let data = "Timestamp , LAT,lon,speed_mps
            2026-02-15 12:00:00,46.62,14.30,1.0
            2026-02-15 12:00:01,46.62,14.30,2.0
        ";

        let mut src = source(data);
        let raw = src.fetch()?;
        assert!(!raw.has_accuracy);
        assert_eq!(datetime!(2026-02-15 12:00:00 UTC), raw.rows[0].timestamp);

        Ok(())
    }

    #[test]
    fn custom_fields() -> Result<(), TripError> {
        let data = "time,latitude,longitude,velocity
            2026-02-15T12:00:00Z,46.62,14.30,1.0
        ";
        let fields = FieldsConfiguration {
            timestamp: "time".to_string(),
            lat: "latitude".to_string(),
            lon: "longitude".to_string(),
            speed: "velocity".to_string(),
            ..Default::default()
        };
        let rdr = ReaderBuilder::new()
            .flexible(true)
            .from_reader(data.as_bytes());

        let trip = Trip::from_source(CsvSource::new(rdr, Some(fields)), &IngestOptions::default())?;
        assert_eq!(1, trip.len());

        Ok(())
    }

    #[test]
    fn iso8601_offsets_in_rows() -> Result<(), TripError> {
        let data = "timestamp,lat,lon,speed_mps
            2026-02-15T12:00:00+0100,46.62,14.30,1.0
            2026-02-15T12:00:05+01,46.62,14.30,2.0
            2026-02-15T11:00:10Z,46.62,14.30,3.0
        ";

        let raw = source(data).fetch()?;
        assert_eq!(3, raw.rows.len());
        assert_eq!(datetime!(2026-02-15 12:00:05 +1), raw.rows[1].timestamp);
        assert_eq!(datetime!(2026-02-15 12:00:10 +1), raw.rows[2].timestamp);

        Ok(())
    }

    #[test]
    fn missing_column() {
        let data = "timestamp,lat,lon
            2026-02-15T12:00:00Z,46.62,14.30
        ";

        match source(data).fetch() {
            Err(TripError::MissingColumn { column, stage }) => {
                assert_eq!("speed_mps", column);
                assert_eq!(Stage::Ingestion, stage);
            }
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn malformed_timestamp() {
        let data = "timestamp,lat,lon,speed_mps
            2026-02-15T12:00:00Z,46.62,14.30,1.0
            noon,46.62,14.30,1.0
        ";

        match source(data).fetch() {
            Err(TripError::MalformedInput { row, column, .. }) => {
                assert_eq!(2, row);
                assert_eq!("timestamp", column);
            }
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn malformed_number() {
        let data = "timestamp,lat,lon,speed_mps
            2026-02-15T12:00:00Z,46.62,14.30,fast
        ";

        assert!(matches!(
            source(data).fetch(),
            Err(TripError::MalformedInput { row: 1, .. })
        ));
    }

    #[test]
    fn dynamics_need_derived_columns() {
        let data = "timestamp,lat,lon,speed_mps,dt_s,acc_mps2
            2026-02-15T12:00:00Z,46.62,14.30,1.0,0,0
        ";

        match source(data).fetch_dynamics() {
            Err(TripError::MissingColumn { column, stage }) => {
                assert_eq!("speed_kmh", column);
                assert_eq!(Stage::Metrics, stage);
            }
            other => panic!("unexpected result {:?}", other),
        }
    }
}
