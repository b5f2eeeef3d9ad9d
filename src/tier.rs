//! Free and premium capabilities
//!
//! Consumed by the report and the cli, never by the pipeline stages.

use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Feature {
    BasicMetrics,
    MapView,
    SingleTrip,
    AdvancedAnalytics,
    AiInsights,
    TripComparison,
    ExportPdf,
    ExportData,
    AccelerationHeatmap,
    DrivingStyleClassification,
}

impl Feature {
    pub const ALL: [Feature; 10] = [
        Feature::BasicMetrics,
        Feature::MapView,
        Feature::SingleTrip,
        Feature::AdvancedAnalytics,
        Feature::AiInsights,
        Feature::TripComparison,
        Feature::ExportPdf,
        Feature::ExportData,
        Feature::AccelerationHeatmap,
        Feature::DrivingStyleClassification,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Feature::BasicMetrics => "basic_metrics",
            Feature::MapView => "map_view",
            Feature::SingleTrip => "single_trip",
            Feature::AdvancedAnalytics => "advanced_analytics",
            Feature::AiInsights => "ai_insights",
            Feature::TripComparison => "trip_comparison",
            Feature::ExportPdf => "export_pdf",
            Feature::ExportData => "export_data",
            Feature::AccelerationHeatmap => "acceleration_heatmap",
            Feature::DrivingStyleClassification => "driving_style_classification",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.name() == name)
    }

    pub fn is_premium(&self) -> bool {
        !matches!(
            self,
            Feature::BasicMetrics | Feature::MapView | Feature::SingleTrip
        )
    }

    pub fn description(&self) -> &'static str {
        match self {
            Feature::BasicMetrics => "Trip duration, distance, speeds and smoothness score",
            Feature::MapView => "Route visualization on a map",
            Feature::SingleTrip => "Analysis of one trip at a time",
            Feature::AdvancedAnalytics => "Detailed acceleration heatmaps and jerk analysis",
            Feature::AiInsights => "AI-powered driving style classification and recommendations",
            Feature::TripComparison => "Compare multiple trips side-by-side",
            Feature::ExportPdf => "Export beautiful PDF reports of your trips",
            Feature::ExportData => "Export processed data in multiple formats",
            Feature::AccelerationHeatmap => "Visual heatmap of acceleration patterns",
            Feature::DrivingStyleClassification => "ML-based classification of your driving style",
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Tier {
    #[default]
    Free,
    Premium,
}

impl Tier {
    pub fn new(premium: bool) -> Self {
        if premium {
            Tier::Premium
        } else {
            Tier::Free
        }
    }

    pub fn has_feature(&self, feature: Feature) -> bool {
        !feature.is_premium() || *self == Tier::Premium
    }

    /// Unknown names are never available
    pub fn has_feature_named(&self, name: &str) -> bool {
        Feature::from_name(name).is_some_and(|f| self.has_feature(f))
    }
}
