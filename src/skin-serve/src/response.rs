use serde::Serialize;
use serde_json::{json, Value};

use crate::model::{Assessment, MetricKey, SkinMetric, SkinMetrics};

pub const NON_LIVING_MESSAGE: &str =
    "Non-human/non-living entity detected, no skin analysis available.";

/// One metric as served: the analyzer's label and its confidence as a
/// fixed four-decimal string.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricView {
    pub label: String,
    pub percentage: String,
}

impl From<&SkinMetric> for MetricView {
    fn from(metric: &SkinMetric) -> Self {
        MetricView {
            label: metric.label().to_owned(),
            percentage: format_confidence(metric.confidence()),
        }
    }
}

/// Render a confidence with exactly four fractional digits. The exact
/// binary value is rounded to nearest, exact ties go to even.
pub fn format_confidence(confidence: f64) -> String {
    format!("{:.4}", confidence)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricViews {
    pub skin_tone: MetricView,
    pub acne_level: MetricView,
    pub blackheads: MetricView,
    pub dark_circles: MetricView,
    pub skin_type: MetricView,
    pub hair_quality: MetricView,
    pub hydration_level: MetricView,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkinMetricsResponse {
    #[serde(rename = "skinMetrics")]
    pub skin_metrics: MetricViews,
}

impl From<&SkinMetrics> for SkinMetricsResponse {
    fn from(metrics: &SkinMetrics) -> Self {
        let view = |key: MetricKey| MetricView::from(metrics.get(key));

        SkinMetricsResponse {
            skin_metrics: MetricViews {
                skin_tone: view(MetricKey::Tone),
                acne_level: view(MetricKey::AcneLevel),
                blackheads: view(MetricKey::Blackheads),
                dark_circles: view(MetricKey::DarkCircles),
                skin_type: view(MetricKey::SkinType),
                hair_quality: view(MetricKey::HairQuality),
                hydration_level: view(MetricKey::HydrationLevel),
            },
        }
    }
}

/// Successful end of the pipeline, always served as 200.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    NonLiving,
    Metrics(SkinMetricsResponse),
}

impl From<Assessment> for Outcome {
    fn from(assessment: Assessment) -> Self {
        match assessment {
            Assessment::NonLiving => Outcome::NonLiving,
            Assessment::Living(metrics) => Outcome::Metrics(SkinMetricsResponse::from(&metrics)),
        }
    }
}

impl Outcome {
    pub fn to_json(&self) -> serde_json::Result<Value> {
        match self {
            Outcome::NonLiving => Ok(json!({ "message": NON_LIVING_MESSAGE })),
            Outcome::Metrics(response) => serde_json::to_value(response),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::tests::complete_metrics;
    use crate::model::AnalysisResult;

    #[test]
    fn confidences_keep_four_decimals() {
        assert_eq!(format_confidence(0.8), "0.8000");
        assert_eq!(format_confidence(0.9123), "0.9123");
        assert_eq!(format_confidence(0.0), "0.0000");
        assert_eq!(format_confidence(1.0), "1.0000");
        assert_eq!(format_confidence(0.00005), "0.0001");
    }

    #[test]
    fn confidences_round_to_nearest() {
        // 0.12345 is stored slightly above the tie
        assert_eq!(format_confidence(0.12345), "0.1235");
        assert_eq!(format_confidence(0.99994), "0.9999");
        assert_eq!(format_confidence(0.99995), "1.0000");
        assert_eq!(format_confidence(0.999951), "1.0000");
    }

    #[test]
    fn exact_ties_round_to_even() {
        // 1/32 and 3/32 are exact in binary
        assert_eq!(format_confidence(0.03125), "0.0312");
        assert_eq!(format_confidence(0.09375), "0.0938");
    }

    #[test]
    fn metrics_are_served_under_camel_case_keys() {
        let assessment = AnalysisResult {
            living: true,
            skin_metrics: Some(complete_metrics()),
        }
        .assess()
        .unwrap();

        let body = Outcome::from(assessment).to_json().unwrap();
        let metrics = &body["skinMetrics"];
        assert_eq!(metrics["skinTone"], json!({"label": "fair", "percentage": "0.9123"}));
        assert_eq!(metrics["acneLevel"]["percentage"], "0.2000");
        assert_eq!(metrics["blackheads"]["label"], "none");
        assert_eq!(metrics["darkCircles"]["label"], "mild");
        assert_eq!(metrics["skinType"]["percentage"], "0.7000");
        assert_eq!(metrics["hairQuality"]["label"], "good");
        assert_eq!(metrics["hydrationLevel"]["percentage"], "0.6000");
        assert_eq!(metrics.as_object().unwrap().len(), 7);
    }

    #[test]
    fn non_living_is_a_message() {
        assert_eq!(
            Outcome::NonLiving.to_json().unwrap(),
            json!({ "message": NON_LIVING_MESSAGE })
        );
    }
}
