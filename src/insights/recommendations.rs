//! Driving recommendations

use std::fmt;

use serde::Serialize;

use crate::metrics::stats::DynamicsSummary;
use crate::trip::dynamics::DynamicTrip;

const SMOOTH_ACCELERATION_STD: f64 = 1.5;
const SUDDEN_CHANGES_JERK_STD: f64 = 2.;
const SAFE_SPEED_KMH: f64 = 120.;
/// Harsh event threshold, m/s²
pub const HARSH_ACCELERATION_MPS2: f64 = 2.5;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Recommendation {
    SmootherAcceleration,
    FewerSuddenChanges,
    ModerateSpeed,
    HarshAccelerations { count: usize },
    HarshBraking { count: usize },
    KeepItUp,
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Recommendation::SmootherAcceleration => {
                write!(f, "Try smoother acceleration to improve fuel efficiency")
            }
            Recommendation::FewerSuddenChanges => {
                write!(f, "Reduce sudden speed changes for better comfort")
            }
            Recommendation::ModerateSpeed => {
                write!(f, "Consider maintaining moderate speeds for safety")
            }
            Recommendation::HarshAccelerations { count } => {
                write!(f, "{} harsh acceleration event(s) detected", count)
            }
            Recommendation::HarshBraking { count } => {
                write!(f, "{} harsh braking event(s) detected", count)
            }
            Recommendation::KeepItUp => write!(f, "Excellent driving! Keep up the good work!"),
        }
    }
}

impl Serialize for Recommendation {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

/// Every applicable tip, in a fixed order
///
/// Falls back to a single positive message when nothing applies, an empty
/// trip included.
pub fn generate_recommendations(trip: &DynamicTrip) -> Vec<Recommendation> {
    let Some(summary) = DynamicsSummary::of(trip) else {
        return vec![Recommendation::KeepItUp];
    };

    let mut recommendations = vec![];

    if summary.acc_std > SMOOTH_ACCELERATION_STD {
        recommendations.push(Recommendation::SmootherAcceleration);
    }

    if summary.jerk_std > SUDDEN_CHANGES_JERK_STD {
        recommendations.push(Recommendation::FewerSuddenChanges);
    }

    if summary.max_speed_kmh > SAFE_SPEED_KMH {
        recommendations.push(Recommendation::ModerateSpeed);
    }

    let harsh_acc = trip
        .accelerations()
        .filter(|a| *a > HARSH_ACCELERATION_MPS2)
        .count();
    if harsh_acc > 0 {
        recommendations.push(Recommendation::HarshAccelerations { count: harsh_acc });
    }

    let harsh_brake = trip
        .accelerations()
        .filter(|a| *a < -HARSH_ACCELERATION_MPS2)
        .count();
    if harsh_brake > 0 {
        recommendations.push(Recommendation::HarshBraking { count: harsh_brake });
    }

    if recommendations.is_empty() {
        recommendations.push(Recommendation::KeepItUp);
    }

    recommendations
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;
    use time::Duration;

    use super::{generate_recommendations, Recommendation};
    use crate::trip::dynamics::{DynamicTrip, DynamicsLimits};
    use crate::trip::{Sample, Trip};

    fn one_hz_trip(speeds: &[f64]) -> DynamicTrip {
        let start = datetime!(2026-02-15 12:00:00 UTC);
        let samples = speeds
            .iter()
            .enumerate()
            .map(|(i, speed)| Sample::new(start + Duration::seconds(i as i64), 46.62, 14.30, *speed))
            .collect();
        Trip::new(samples).dynamics(&DynamicsLimits::default())
    }

    #[test]
    fn calm_trip_gets_praise() {
        let trip = one_hz_trip(&[10., 10.5, 11., 11.5, 12., 12., 12.]);
        let recommendations = generate_recommendations(&trip);

        assert_eq!(vec![Recommendation::KeepItUp], recommendations);
        assert_eq!(
            "Excellent driving! Keep up the good work!",
            recommendations[0].to_string()
        );
    }

    #[test]
    fn harsh_events_are_counted() {
        // +3, +3, -4 m/s² steps
        let trip = one_hz_trip(&[10., 13., 16., 12., 12.]);
        let recommendations = generate_recommendations(&trip);

        assert!(recommendations.contains(&Recommendation::HarshAccelerations { count: 2 }));
        assert!(recommendations.contains(&Recommendation::HarshBraking { count: 1 }));
        assert!(!recommendations.contains(&Recommendation::KeepItUp));

        let messages: Vec<String> = recommendations.iter().map(|r| r.to_string()).collect();
        assert!(messages.contains(&"2 harsh acceleration event(s) detected".to_string()));
    }

    #[test]
    fn all_applicable_in_order() {
        let trip = one_hz_trip(&[30., 36., 30., 36., 30., 36., 30.]);
        let recommendations = generate_recommendations(&trip);

        assert_eq!(
            vec![
                Recommendation::SmootherAcceleration,
                Recommendation::FewerSuddenChanges,
                Recommendation::ModerateSpeed,
                Recommendation::HarshAccelerations { count: 3 },
                Recommendation::HarshBraking { count: 3 },
            ],
            recommendations
        );
    }

    #[test]
    fn empty_trip_gets_praise() {
        let trip = Trip::default().dynamics(&DynamicsLimits::default());
        assert_eq!(vec![Recommendation::KeepItUp], generate_recommendations(&trip));
    }
}
