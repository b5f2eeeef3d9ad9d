//! Rule based driving style classification

use std::fmt;

use serde::Serialize;

use crate::metrics::stats::DynamicsSummary;
use crate::trip::dynamics::DynamicTrip;

/// Trips shorter than this are not classified
pub const MIN_CLASSIFICATION_SAMPLES: usize = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DrivingStyle {
    EcoFriendly,
    Smooth,
    Sporty,
    Aggressive,
    Normal,
    Unknown,
}

impl fmt::Display for DrivingStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DrivingStyle::EcoFriendly => write!(f, "Eco-Friendly"),
            DrivingStyle::Smooth => write!(f, "Smooth"),
            DrivingStyle::Sporty => write!(f, "Sporty"),
            DrivingStyle::Aggressive => write!(f, "Aggressive"),
            DrivingStyle::Normal => write!(f, "Normal"),
            DrivingStyle::Unknown => write!(f, "Unknown"),
        }
    }
}

impl Serialize for DrivingStyle {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

/// Classified style with a 0 to 1 confidence
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct StyleClassification {
    #[serde(rename = "label")]
    pub style: DrivingStyle,
    pub confidence: f64,
}

impl StyleClassification {
    pub fn unknown() -> Self {
        Self {
            style: DrivingStyle::Unknown,
            confidence: 0.,
        }
    }
}

/// One step of the classification cascade
pub struct StyleRule {
    pub style: DrivingStyle,
    pub confidence: f64,
    pub matches: fn(&DynamicsSummary) -> bool,
}

fn is_eco_friendly(s: &DynamicsSummary) -> bool {
    s.acc_std < 0.5 && s.jerk_std < 1.
}

fn is_smooth(s: &DynamicsSummary) -> bool {
    s.acc_std < 1. && s.jerk_std < 1.5
}

fn is_sporty(s: &DynamicsSummary) -> bool {
    s.max_acceleration > 3. || s.hardest_braking() > 3.
}

fn is_aggressive(s: &DynamicsSummary) -> bool {
    s.acc_std > 2. || s.jerk_std > 3.
}

/// Evaluated in order, the first matching rule wins
pub const STYLE_RULES: [StyleRule; 4] = [
    StyleRule {
        style: DrivingStyle::EcoFriendly,
        confidence: 0.92,
        matches: is_eco_friendly,
    },
    StyleRule {
        style: DrivingStyle::Smooth,
        confidence: 0.88,
        matches: is_smooth,
    },
    StyleRule {
        style: DrivingStyle::Sporty,
        confidence: 0.85,
        matches: is_sporty,
    },
    StyleRule {
        style: DrivingStyle::Aggressive,
        confidence: 0.90,
        matches: is_aggressive,
    },
];

/// Classification when no rule matches
pub const NORMAL_STYLE: StyleClassification = StyleClassification {
    style: DrivingStyle::Normal,
    confidence: 0.75,
};

pub fn classify_summary(summary: &DynamicsSummary) -> StyleClassification {
    if summary.samples < MIN_CLASSIFICATION_SAMPLES {
        return StyleClassification::unknown();
    }

    STYLE_RULES
        .iter()
        .find(|rule| (rule.matches)(summary))
        .map(|rule| StyleClassification {
            style: rule.style,
            confidence: rule.confidence,
        })
        .unwrap_or(NORMAL_STYLE)
}

/// Classify the driving style of a trip, `Unknown` when there is too little data
pub fn classify_driving_style(trip: &DynamicTrip) -> StyleClassification {
    match DynamicsSummary::of(trip) {
        Some(summary) => classify_summary(&summary),
        None => StyleClassification::unknown(),
    }
}
