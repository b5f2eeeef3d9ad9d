//! Error types for triplog

use std::fmt;

use snafu::Snafu;

/// Pipeline stage an error was raised from
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Ingestion,
    Dynamics,
    Metrics,
    Insights,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Ingestion => write!(f, "ingestion"),
            Stage::Dynamics => write!(f, "dynamics derivation"),
            Stage::Metrics => write!(f, "trip metrics"),
            Stage::Insights => write!(f, "driving insights"),
        }
    }
}

#[derive(Debug, Snafu)]
pub enum TripError {
    // Domain errors
    #[snafu(display("Missing column `{column}` required by {stage}"))]
    MissingColumn { column: String, stage: Stage },
    #[snafu(display("Cannot compute {stage} for an empty trip"))]
    EmptyTrip { stage: Stage },
    #[snafu(display("Malformed value in row {row}, column `{column}`: {reason}"))]
    MalformedInput {
        row: usize,
        column: String,
        reason: String,
    },

    // Errors for the CSV reader and writer
    #[cfg(feature = "csv")]
    #[snafu(display("Failed on read the CSV source"))]
    CsvRead { source: csv::Error },
    #[cfg(feature = "csv")]
    #[snafu(display("Failed on write the CSV output"))]
    CsvWrite { source: csv::Error },

    // Export errors
    #[snafu(display("Failed on format the timestamp"))]
    TimestampFormat { source: time::error::Format },
    #[snafu(display("Failed on write the GPX output"))]
    GpxWrite { source: gpx::errors::GpxError },
}

impl TripError {
    pub(crate) fn missing_column(column: &str, stage: Stage) -> Self {
        TripError::MissingColumn {
            column: column.to_string(),
            stage,
        }
    }

    pub(crate) fn malformed(row: usize, column: &str, reason: impl ToString) -> Self {
        TripError::MalformedInput {
            row,
            column: column.to_string(),
            reason: reason.to_string(),
        }
    }
}
