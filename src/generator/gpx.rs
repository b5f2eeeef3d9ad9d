//! GPX generator API

use std::io::Write;

use gpx::{Gpx, GpxVersion, Track};

use crate::TripError;

pub struct GpxGenerator {
    pub tracks: Vec<Track>,
}

impl GpxGenerator {
    pub fn empty() -> Self {
        Self { tracks: vec![] }
    }

    pub fn generate(self) -> Gpx {
        let mut gpx: Gpx = Default::default();
        gpx.version = GpxVersion::Gpx11;
        gpx.creator = Some("triplog".to_string());
        gpx.tracks = self.tracks;

        gpx
    }

    /// Generate and serialize the document
    pub fn write<W>(self, writer: W) -> Result<(), TripError>
    where
        W: Write,
    {
        let doc = self.generate();
        gpx::write(&doc, writer).map_err(|e| TripError::GpxWrite { source: e })
    }
}
