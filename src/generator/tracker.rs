//! Track generator API

use gpx::{Track, TrackSegment, Waypoint};

use crate::trip::dynamics::DynamicTrip;

pub struct Tracker {
    /// Trip name
    pub name: String,
    /// Max gap between two samples of the same segment, in seconds
    pub max_gap: u32,
    /// Data source, eg.: logger app
    pub source: Option<String>,
}

impl Tracker {
    /// Start a new tracker instance
    pub fn new(name: String) -> Self {
        Self {
            name,
            source: None,
            max_gap: 300, // 5 minutes
        }
    }

    pub fn max_gap(&mut self, max: u32) -> &mut Self {
        self.max_gap = if max < 1 { 1 } else { max };

        self
    }

    pub fn source(&mut self, source: String) -> &mut Self {
        self.source = Some(source);

        self
    }

    /// Build the track with the tracker params
    pub fn build(&self, trip: &DynamicTrip) -> Track {
        let mut track = Track::new();
        track.name = Some(self.name.clone());
        track.description = Some(format!("Recorded from {} GPS samples", trip.len()));
        track.source = self.source.clone();

        let mut tseg = TrackSegment::new();

        // A pause longer than the max gap starts a new segment
        for poi in trip.samples() {
            if poi.dt_s > self.max_gap as f64 && !tseg.points.is_empty() {
                track.segments.push(tseg);
                tseg = TrackSegment::new();
            }

            let mut wp = Waypoint::new(poi.sample.position);

            wp.time = Some(poi.sample.timestamp.into());
            wp.speed = Some(poi.sample.speed_mps);

            tseg.points.push(wp);
        }

        if !tseg.points.is_empty() {
            track.segments.push(tseg);
        }

        track
    }
}
