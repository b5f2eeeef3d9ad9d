//! Trip exports

#[cfg(feature = "csv")]
pub mod csv_file;
pub mod gpx;
pub mod tracker;
