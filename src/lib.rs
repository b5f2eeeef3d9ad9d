//! triplog - driving dynamics and style insights from GPS trip logs

pub mod errors;
mod generator;
pub mod insights;
pub mod metrics;
pub mod report;
mod sources;
pub mod tier;
pub mod trip;

pub use errors::{Stage, TripError};
#[cfg(feature = "csv")]
pub use generator::csv_file::write_csv;
pub use generator::gpx::GpxGenerator;
pub use generator::tracker::Tracker;
pub use insights::{Anomaly, DrivingStyle, Recommendation, StyleClassification};
pub use metrics::{SmoothnessConfig, SmoothnessRating, TripMetrics};
pub use report::TripReport;
pub use sources::{parse_timestamp, FieldsConfiguration, RawSample, RawSamples, SamplesSource};
#[cfg(feature = "csv")]
pub use sources::CsvSource;
pub use tier::{Feature, Tier};
pub use trip::dynamics::{DynamicSample, DynamicTrip, DynamicsLimits};
pub use trip::{IngestOptions, Sample, Trip};
