//! Trip level metrics and smoothness scoring

use serde::{Deserialize, Serialize};

use crate::errors::Stage;
use crate::trip::dynamics::DynamicTrip;
use crate::TripError;

pub mod stats;

use stats::{mean, sample_std, DynamicsSummary};

/// Smoothness scoring parameters
///
/// The reference deviations are the spread of acceleration and jerk of a good
/// driver; each one costs up to its weight in points.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct SmoothnessConfig {
    pub good_acc_std: f64,
    pub good_jerk_std: f64,
    pub acc_weight: f64,
    pub jerk_weight: f64,
    pub max_score: f64,
}

impl Default for SmoothnessConfig {
    fn default() -> Self {
        Self {
            good_acc_std: 1.,
            good_jerk_std: 2.,
            acc_weight: 50.,
            jerk_weight: 50.,
            max_score: 100.,
        }
    }
}

impl SmoothnessConfig {
    /// Score from the acceleration and jerk standard deviations
    pub fn score(&self, acc_std: f64, jerk_std: f64) -> f64 {
        let acc_penalty = (acc_std / self.good_acc_std).min(1.) * self.acc_weight;
        let jerk_penalty = (jerk_std / self.good_jerk_std).min(1.) * self.jerk_weight;

        (self.max_score - acc_penalty - jerk_penalty).clamp(0., self.max_score)
    }
}

/// 0 to 100 smoothness of the trip, higher is smoother
///
/// Trips with less than two samples show no variation and score the maximum.
pub fn smoothness_score(trip: &DynamicTrip, config: &SmoothnessConfig) -> f64 {
    if trip.len() < 2 {
        return config.max_score;
    }

    let acc: Vec<f64> = trip.accelerations().collect();
    let jerk: Vec<f64> = trip.jerks().collect();

    config.score(sample_std(&acc), sample_std(&jerk))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum SmoothnessRating {
    Excellent,
    Good,
    NeedsImprovement,
}

impl SmoothnessRating {
    pub fn from_score(score: f64) -> Self {
        match score {
            s if s >= 80. => SmoothnessRating::Excellent,
            s if s >= 60. => SmoothnessRating::Good,
            _ => SmoothnessRating::NeedsImprovement,
        }
    }
}

/// Trip summary
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TripMetrics {
    pub duration_min: f64,
    /// Speed integrated over time, not the GPS path length
    pub distance_km: f64,
    pub avg_speed_kmh: f64,
    pub max_speed_kmh: f64,
    pub smoothness_score: f64,
    /// m/s²
    pub max_acceleration: f64,
    /// Most negative acceleration, m/s²
    pub max_deceleration: f64,
    /// Mean absolute jerk, m/s³
    pub avg_jerk: f64,
}

impl TripMetrics {
    pub fn calculate(trip: &DynamicTrip, config: &SmoothnessConfig) -> Result<Self, TripError> {
        let samples = trip.samples();
        let (Some(first), Some(last), Some(summary)) =
            (samples.first(), samples.last(), DynamicsSummary::of(trip))
        else {
            return Err(TripError::EmptyTrip {
                stage: Stage::Metrics,
            });
        };

        let distance_m: f64 = samples.iter().map(|s| s.sample.speed_mps * s.dt_s).sum();
        let abs_jerk: Vec<f64> = trip.jerks().map(f64::abs).collect();

        Ok(Self {
            duration_min: (last.sample.timestamp - first.sample.timestamp).as_seconds_f64() / 60.,
            distance_km: distance_m / 1000.,
            avg_speed_kmh: summary.avg_speed_kmh,
            max_speed_kmh: summary.max_speed_kmh,
            smoothness_score: smoothness_score(trip, config),
            max_acceleration: summary.max_acceleration,
            max_deceleration: summary.min_acceleration,
            avg_jerk: mean(&abs_jerk).unwrap_or(0.),
        })
    }

    pub fn rating(&self) -> SmoothnessRating {
        SmoothnessRating::from_score(self.smoothness_score)
    }
}
