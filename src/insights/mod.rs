//! Driving style, recommendations and anomalies

pub mod anomalies;
pub mod recommendations;
pub mod style;

pub use anomalies::{detect_anomalies, Anomaly};
pub use recommendations::{generate_recommendations, Recommendation};
pub use style::{
    classify_driving_style, DrivingStyle, StyleClassification, StyleRule, NORMAL_STYLE, STYLE_RULES,
};
