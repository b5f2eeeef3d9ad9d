//! Trip report

use serde::Serialize;

use crate::insights::{
    classify_driving_style, detect_anomalies, generate_recommendations, Anomaly, Recommendation,
    StyleClassification,
};
use crate::metrics::{SmoothnessConfig, SmoothnessRating, TripMetrics};
use crate::tier::{Feature, Tier};
use crate::trip::dynamics::DynamicTrip;
use crate::trip::route::{Coordinate, HeatPoint};
use crate::TripError;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Insights {
    pub style: StyleClassification,
    pub recommendations: Vec<Recommendation>,
    pub anomalies: Vec<Anomaly>,
}

impl Insights {
    pub fn of(trip: &DynamicTrip) -> Self {
        Self {
            style: classify_driving_style(trip),
            recommendations: generate_recommendations(trip),
            anomalies: detect_anomalies(trip),
        }
    }
}

/// Everything the tier allows to know about one trip
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TripReport {
    pub samples: usize,
    pub metrics: TripMetrics,
    pub rating: SmoothnessRating,
    pub center: Option<Coordinate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insights: Option<Insights>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heat_points: Option<Vec<HeatPoint>>,
}

impl TripReport {
    pub fn build(
        trip: &DynamicTrip,
        smoothness: &SmoothnessConfig,
        tier: Tier,
    ) -> Result<Self, TripError> {
        let metrics = TripMetrics::calculate(trip, smoothness)?;

        let insights = tier
            .has_feature(Feature::AiInsights)
            .then(|| Insights::of(trip));

        let heat_points = tier
            .has_feature(Feature::AccelerationHeatmap)
            .then(|| trip.heat_points());

        Ok(Self {
            samples: trip.len(),
            rating: metrics.rating(),
            metrics,
            center: trip.center(),
            insights,
            heat_points,
        })
    }
}
