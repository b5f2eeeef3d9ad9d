//! Augmented trip CSV export

use std::io::Write;

use csv::Writer;
use serde::Serialize;
use time::format_description::well_known;

use crate::trip::dynamics::DynamicTrip;
use crate::TripError;

const COLUMNS: [&str; 9] = [
    "timestamp",
    "lat",
    "lon",
    "speed_mps",
    "accuracy_m",
    "speed_kmh",
    "dt_s",
    "acc_mps2",
    "jerk_mps3",
];

#[derive(Serialize)]
struct AugmentedRow {
    timestamp: String,
    lat: f64,
    lon: f64,
    speed_mps: f64,
    accuracy_m: Option<f64>,
    speed_kmh: f64,
    dt_s: f64,
    acc_mps2: f64,
    jerk_mps3: f64,
}

/// Write every sample with its derived columns
///
/// Floats are written in their shortest round trip form, so reading the file
/// back gives the very same values.
pub fn write_csv<W>(trip: &DynamicTrip, wtr: &mut Writer<W>) -> Result<(), TripError>
where
    W: Write,
{
    // Headers are otherwise written along with the first row
    if trip.is_empty() {
        wtr.write_record(COLUMNS)
            .map_err(|e| TripError::CsvWrite { source: e })?;
    }

    for s in trip.samples() {
        let timestamp = s
            .sample
            .timestamp
            .format(&well_known::Rfc3339)
            .map_err(|e| TripError::TimestampFormat { source: e })?;

        wtr.serialize(AugmentedRow {
            timestamp,
            lat: s.sample.lat(),
            lon: s.sample.lon(),
            speed_mps: s.sample.speed_mps,
            accuracy_m: s.sample.accuracy_m,
            speed_kmh: s.sample.speed_kmh,
            dt_s: s.dt_s,
            acc_mps2: s.acc_mps2,
            jerk_mps3: s.jerk_mps3,
        })
        .map_err(|e| TripError::CsvWrite { source: e })?;
    }

    wtr.flush()
        .map_err(|e| TripError::CsvWrite { source: e.into() })
}
