//! Descriptive statistics over the derived signals

use crate::trip::dynamics::DynamicTrip;

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (n - 1 denominator), 0 below two values
pub fn sample_std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.;
    }

    let Some(mean) = mean(values) else {
        return 0.;
    };
    let squares: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();

    (squares / (values.len() - 1) as f64).sqrt()
}

pub fn max(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::max)
}

pub fn min(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::min)
}

/// Aggregates of a dynamics-augmented trip shared by scoring and insights
#[derive(Clone, Debug, PartialEq)]
pub struct DynamicsSummary {
    pub samples: usize,
    pub acc_std: f64,
    pub jerk_std: f64,
    pub max_acceleration: f64,
    /// Most negative acceleration
    pub min_acceleration: f64,
    pub avg_speed_kmh: f64,
    pub max_speed_kmh: f64,
}

impl DynamicsSummary {
    /// `None` for an empty trip
    pub fn of(trip: &DynamicTrip) -> Option<Self> {
        let acc: Vec<f64> = trip.accelerations().collect();
        let jerk: Vec<f64> = trip.jerks().collect();
        let speed: Vec<f64> = trip.speeds_kmh().collect();

        Some(Self {
            samples: trip.len(),
            acc_std: sample_std(&acc),
            jerk_std: sample_std(&jerk),
            max_acceleration: max(&acc)?,
            min_acceleration: min(&acc)?,
            avg_speed_kmh: mean(&speed)?,
            max_speed_kmh: max(&speed)?,
        })
    }

    /// Magnitude of the hardest braking
    pub fn hardest_braking(&self) -> f64 {
        self.min_acceleration.abs()
    }
}
