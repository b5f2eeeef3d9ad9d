//! Unusual patterns in a trip

use std::fmt;

use serde::Serialize;

use crate::metrics::stats::DynamicsSummary;
use crate::trip::dynamics::DynamicTrip;

/// Speed jump between consecutive samples, km/h, hinting at a GPS glitch
const SPEED_SPIKE_KMH: f64 = 50.;
/// m/s²
const EXTREME_ACCELERATION_MPS2: f64 = 5.;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Anomaly {
    SpeedSpike,
    ExtremeAcceleration,
    ExtremeBraking,
}

impl fmt::Display for Anomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Anomaly::SpeedSpike => write!(f, "Sudden speed change detected (possible GPS error)"),
            Anomaly::ExtremeAcceleration => write!(f, "Extremely high acceleration detected"),
            Anomaly::ExtremeBraking => write!(f, "Extremely hard braking detected"),
        }
    }
}

impl Serialize for Anomaly {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

/// Largest absolute speed change between consecutive samples, km/h
fn max_speed_jump_kmh(trip: &DynamicTrip) -> Option<f64> {
    trip.samples()
        .windows(2)
        .map(|w| (w[1].sample.speed_kmh - w[0].sample.speed_kmh).abs())
        .reduce(f64::max)
}

/// Independent checks, each reported at most once
pub fn detect_anomalies(trip: &DynamicTrip) -> Vec<Anomaly> {
    let Some(summary) = DynamicsSummary::of(trip) else {
        return vec![];
    };

    let mut anomalies = vec![];

    if max_speed_jump_kmh(trip).is_some_and(|jump| jump > SPEED_SPIKE_KMH) {
        anomalies.push(Anomaly::SpeedSpike);
    }

    if summary.max_acceleration > EXTREME_ACCELERATION_MPS2 {
        anomalies.push(Anomaly::ExtremeAcceleration);
    }

    if summary.min_acceleration < -EXTREME_ACCELERATION_MPS2 {
        anomalies.push(Anomaly::ExtremeBraking);
    }

    anomalies
}
