use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;

use crate::error::ServeError;

/// A `(label, confidence)` pair, carried on the wire as `["label", 0.91]`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SkinMetric(pub String, pub f64);

impl SkinMetric {
    pub fn label(&self) -> &str {
        &self.0
    }

    pub fn confidence(&self) -> f64 {
        self.1
    }
}

/// Raw output of the analysis capability.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AnalysisResult {
    /// Whether the subject is a living human eligible for skin analysis
    pub living: bool,

    /// Per-attribute metrics keyed by `MetricKey::source_name`. Left
    /// undecoded until the subject is known to be living.
    #[serde(rename = "skinMetrics", default)]
    pub skin_metrics: Option<Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricKey {
    Tone,
    AcneLevel,
    Blackheads,
    DarkCircles,
    SkinType,
    HairQuality,
    HydrationLevel,
}

impl MetricKey {
    /// Every required key, in the order they are checked.
    pub const ALL: [MetricKey; 7] = [
        MetricKey::Tone,
        MetricKey::AcneLevel,
        MetricKey::Blackheads,
        MetricKey::DarkCircles,
        MetricKey::SkinType,
        MetricKey::HairQuality,
        MetricKey::HydrationLevel,
    ];

    /// Key as produced by the analyzer.
    pub fn source_name(self) -> &'static str {
        match self {
            MetricKey::Tone => "tone",
            MetricKey::AcneLevel => "acne_level",
            MetricKey::Blackheads => "blackheads",
            MetricKey::DarkCircles => "dark_circles",
            MetricKey::SkinType => "skin_type",
            MetricKey::HairQuality => "hair_quality",
            MetricKey::HydrationLevel => "hydration_level",
        }
    }

    /// Key as served in the `skinMetrics` response object.
    pub fn response_name(self) -> &'static str {
        match self {
            MetricKey::Tone => "skinTone",
            MetricKey::AcneLevel => "acneLevel",
            MetricKey::Blackheads => "blackheads",
            MetricKey::DarkCircles => "darkCircles",
            MetricKey::SkinType => "skinType",
            MetricKey::HairQuality => "hairQuality",
            MetricKey::HydrationLevel => "hydrationLevel",
        }
    }
}

/// The seven metrics of a living subject, all present.
#[derive(Debug, Clone, PartialEq)]
pub struct SkinMetrics {
    pub tone: SkinMetric,
    pub acne_level: SkinMetric,
    pub blackheads: SkinMetric,
    pub dark_circles: SkinMetric,
    pub skin_type: SkinMetric,
    pub hair_quality: SkinMetric,
    pub hydration_level: SkinMetric,
}

impl SkinMetrics {
    pub fn get(&self, key: MetricKey) -> &SkinMetric {
        match key {
            MetricKey::Tone => &self.tone,
            MetricKey::AcneLevel => &self.acne_level,
            MetricKey::Blackheads => &self.blackheads,
            MetricKey::DarkCircles => &self.dark_circles,
            MetricKey::SkinType => &self.skin_type,
            MetricKey::HairQuality => &self.hair_quality,
            MetricKey::HydrationLevel => &self.hydration_level,
        }
    }

    /// Pull every required key out of `raw`. Presence is checked for all keys
    /// before any entry is decoded, so the first absent key in
    /// `MetricKey::ALL` order is reported even when other entries are broken.
    fn from_raw(raw: Value) -> Result<Self, ServeError> {
        let mut raw: HashMap<String, Value> = serde_json::from_value(raw)
            .map_err(|err| ServeError::MalformedMetrics(err.to_string()))?;

        if let Some(key) = MetricKey::ALL
            .iter()
            .find(|key| !raw.contains_key(key.source_name()))
        {
            return Err(ServeError::MissingKey(key.source_name()));
        }

        let mut take = |key: MetricKey| -> Result<SkinMetric, ServeError> {
            let entry = raw
                .remove(key.source_name())
                .ok_or(ServeError::MissingKey(key.source_name()))?;
            serde_json::from_value::<SkinMetric>(entry).map_err(|err| {
                ServeError::MalformedMetrics(format!("{}: {}", key.source_name(), err))
            })
        };

        Ok(SkinMetrics {
            tone: take(MetricKey::Tone)?,
            acne_level: take(MetricKey::AcneLevel)?,
            blackheads: take(MetricKey::Blackheads)?,
            dark_circles: take(MetricKey::DarkCircles)?,
            skin_type: take(MetricKey::SkinType)?,
            hair_quality: take(MetricKey::HairQuality)?,
            hydration_level: take(MetricKey::HydrationLevel)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Assessment {
    NonLiving,
    Living(SkinMetrics),
}

impl AnalysisResult {
    /// Check the result against the contract. Metrics are not inspected for
    /// a non-living subject.
    pub fn assess(self) -> Result<Assessment, ServeError> {
        if !self.living {
            return Ok(Assessment::NonLiving);
        }

        let raw = self.skin_metrics.ok_or(ServeError::MetricsMissing)?;
        SkinMetrics::from_raw(raw).map(Assessment::Living)
    }
}
