//! Route geometry for map renderers

use geo::{Centroid, LineString, MultiPoint};
use serde::Serialize;

use super::dynamics::DynamicTrip;

/// Acceleration magnitude, m/s², mapped to a full heat intensity
const FULL_HEAT_ACCELERATION_MPS2: f64 = 5.;

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

/// Position weighted by how hard the car accelerated or braked there
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct HeatPoint {
    pub lat: f64,
    pub lon: f64,
    /// 0 to 1
    pub intensity: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum SpeedBand {
    Slow,
    Moderate,
    Fast,
    VeryFast,
}

impl SpeedBand {
    pub fn from_kmh(speed_kmh: f64) -> Self {
        match speed_kmh {
            s if s < 30. => SpeedBand::Slow,
            s if s < 60. => SpeedBand::Moderate,
            s if s < 90. => SpeedBand::Fast,
            _ => SpeedBand::VeryFast,
        }
    }
}

impl DynamicTrip {
    /// Mean position of the samples
    pub fn center(&self) -> Option<Coordinate> {
        let points: MultiPoint = self.samples().iter().map(|s| s.sample.position).collect();

        points.centroid().map(|c| Coordinate {
            lat: c.y(),
            lon: c.x(),
        })
    }

    /// Positions in sample order
    pub fn route(&self) -> LineString {
        self.samples()
            .iter()
            .map(|s| s.sample.position.0)
            .collect()
    }

    pub fn heat_points(&self) -> Vec<HeatPoint> {
        self.samples()
            .iter()
            .map(|s| HeatPoint {
                lat: s.sample.lat(),
                lon: s.sample.lon(),
                intensity: (s.acc_mps2.abs() / FULL_HEAT_ACCELERATION_MPS2).min(1.),
            })
            .collect()
    }

    pub fn speed_bands(&self) -> Vec<SpeedBand> {
        self.speeds_kmh().map(SpeedBand::from_kmh).collect()
    }
}
