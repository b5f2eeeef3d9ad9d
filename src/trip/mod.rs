//! Trip definition and ingestion normalization

use geo::geometry::Point;
use serde::Deserialize;
use time::OffsetDateTime;

use crate::sources::{RawSamples, SamplesSource};
use crate::TripError;

pub mod dynamics;
pub mod route;

pub const MPS_TO_KMH: f64 = 3.6;

/// Accuracy assumed for rows lacking a value while the source has the column
const MISSING_ACCURACY_M: f64 = 9999.0;

/// One normalized GPS observation
#[derive(Clone, Debug, PartialEq)]
pub struct Sample {
    pub timestamp: OffsetDateTime,
    /// x = longitude, y = latitude
    pub position: Point,
    /// Never negative
    pub speed_mps: f64,
    pub speed_kmh: f64,
    pub accuracy_m: Option<f64>,
}

impl Sample {
    pub fn new(timestamp: OffsetDateTime, lat: f64, lon: f64, speed_mps: f64) -> Self {
        let speed_mps = speed_mps.max(0.);
        Self {
            timestamp,
            position: Point::new(lon, lat),
            speed_mps,
            speed_kmh: speed_mps * MPS_TO_KMH,
            accuracy_m: None,
        }
    }

    pub fn lat(&self) -> f64 {
        self.position.y()
    }

    pub fn lon(&self) -> f64 {
        self.position.x()
    }
}

/// Ingestion filters
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct IngestOptions {
    /// Rows less precise than this, in meters, are dropped
    pub max_accuracy_m: f64,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            max_accuracy_m: 100.,
        }
    }
}

/// Ordered sequence of normalized samples of one driving session
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Trip {
    samples: Vec<Sample>,
}

impl Trip {
    /// Build a trip from samples, sorting them by time
    pub fn new(mut samples: Vec<Sample>) -> Self {
        samples.sort_by_key(|s| s.timestamp);
        Self { samples }
    }

    /// Fetch the source and normalize its rows
    pub fn from_source<SO>(mut source: SO, options: &IngestOptions) -> Result<Self, TripError>
    where
        SO: SamplesSource,
    {
        let raw = source.fetch()?;
        Ok(Self::normalize(raw, options))
    }

    /// Sort, filter and clean raw rows
    ///
    /// Ties on the timestamp keep the source order. May legitimately produce an
    /// empty trip.
    pub fn normalize(raw: RawSamples, options: &IngestOptions) -> Self {
        let RawSamples { mut rows, has_accuracy } = raw;
        let fetched = rows.len();

        rows.sort_by_key(|r| r.timestamp);

        let samples: Vec<Sample> = rows
            .into_iter()
            .filter(|r| {
                !has_accuracy || r.accuracy_m.unwrap_or(MISSING_ACCURACY_M) <= options.max_accuracy_m
            })
            .filter_map(|r| match (r.lat, r.lon, r.speed_mps) {
                (Some(lat), Some(lon), Some(speed)) => {
                    let mut sample = Sample::new(r.timestamp, lat, lon, speed);
                    sample.accuracy_m = r.accuracy_m;
                    Some(sample)
                }
                _ => None,
            })
            .collect();

        if samples.len() < fetched {
            log::debug!(
                "Dropped {} of {} rows without position, speed or enough accuracy",
                fetched - samples.len(),
                fetched
            );
        }

        Self { samples }
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::{IngestOptions, Trip};
    use crate::sources::{RawSample, RawSamples};

    #[test]
    fn sorted_and_cleaned() {
        let raw = RawSamples {
            rows: vec![
                RawSample::basic(datetime!(2026-02-15 12:00:10 UTC), 46.62, 14.31, 11.),
                RawSample::basic(datetime!(2026-02-15 12:00:00 UTC), 46.62, 14.30, -0.4),
                RawSample::basic(datetime!(2026-02-15 12:00:05 UTC), 46.62, 14.30, 5.5),
            ],
            has_accuracy: false,
        };

        let trip = Trip::normalize(raw, &IngestOptions::default());
        assert_eq!(3, trip.len());

        let samples = trip.samples();
        assert_eq!(datetime!(2026-02-15 12:00:00 UTC), samples[0].timestamp);
        assert_eq!(0., samples[0].speed_mps);
        assert_eq!(0., samples[0].speed_kmh);
        assert_eq!(5.5 * 3.6, samples[1].speed_kmh);
        assert_eq!(datetime!(2026-02-15 12:00:10 UTC), samples[2].timestamp);
        assert_eq!(46.62, samples[2].lat());
        assert_eq!(14.31, samples[2].lon());
    }

    #[test]
    fn ties_keep_source_order() {
        let raw = RawSamples {
            rows: vec![
                RawSample::basic(datetime!(2026-02-15 12:00:05 UTC), 1., 1., 3.),
                RawSample::basic(datetime!(2026-02-15 12:00:00 UTC), 0., 0., 1.),
                RawSample::basic(datetime!(2026-02-15 12:00:05 UTC), 2., 2., 4.),
            ],
            has_accuracy: false,
        };

        let trip = Trip::normalize(raw, &IngestOptions::default());
        let speeds: Vec<f64> = trip.samples().iter().map(|s| s.speed_mps).collect();
        assert_eq!(vec![1., 3., 4.], speeds);
    }

    #[test]
    fn drops_incomplete_rows() {
        let mut no_lat = RawSample::basic(datetime!(2026-02-15 12:00:01 UTC), 0., 0., 1.);
        no_lat.lat = None;
        let mut no_speed = RawSample::basic(datetime!(2026-02-15 12:00:02 UTC), 0., 0., 1.);
        no_speed.speed_mps = None;

        let raw = RawSamples {
            rows: vec![
                no_lat,
                no_speed,
                RawSample::basic(datetime!(2026-02-15 12:00:03 UTC), 0., 0., 1.),
            ],
            has_accuracy: false,
        };

        let trip = Trip::normalize(raw, &IngestOptions::default());
        assert_eq!(1, trip.len());
        assert_eq!(datetime!(2026-02-15 12:00:03 UTC), trip.samples()[0].timestamp);
    }

    #[test]
    fn accuracy_filter() {
        let t = datetime!(2026-02-15 12:00:00 UTC);
        let rows = vec![
            RawSample::basic(t, 0., 0., 1.).accuracy(5.),
            RawSample::basic(t, 0., 0., 2.).accuracy(100.),
            RawSample::basic(t, 0., 0., 3.).accuracy(100.5),
            RawSample::basic(t, 0., 0., 4.),
        ];

        let with_column = Trip::normalize(
            RawSamples {
                rows: rows.clone(),
                has_accuracy: true,
            },
            &IngestOptions::default(),
        );
        let speeds: Vec<f64> = with_column.samples().iter().map(|s| s.speed_mps).collect();
        assert_eq!(vec![1., 2.], speeds);

        // Without the column nothing is filtered by accuracy
        let without_column = Trip::normalize(
            RawSamples {
                rows,
                has_accuracy: false,
            },
            &IngestOptions::default(),
        );
        assert_eq!(4, without_column.len());

        let strict = Trip::normalize(
            RawSamples {
                rows: vec![RawSample::basic(t, 0., 0., 1.).accuracy(20.)],
                has_accuracy: true,
            },
            &IngestOptions { max_accuracy_m: 10. },
        );
        assert!(strict.is_empty());
    }

    #[test]
    fn empty_input_is_valid() {
        let trip = Trip::normalize(RawSamples::default(), &IngestOptions::default());
        assert!(trip.is_empty());
    }
}
