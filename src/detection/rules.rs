use serde::{Deserialize, Serialize};

use crate::models::Prediction;

/// Raise `flag` when the detector reports `label` with a score above `threshold`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionRule {
    pub label: String,
    pub flag: String,
    #[serde(default = "default_threshold")]
    pub threshold: f32,
}

fn default_threshold() -> f32 {
    0.1
}

impl DetectionRule {
    pub fn new(label: impl Into<String>, flag: impl Into<String>, threshold: f32) -> Self {
        Self {
            label: label.into(),
            flag: flag.into(),
            threshold,
        }
    }

    /// Class names are compared case-insensitively
    pub fn matches_class(&self, class: &str) -> bool {
        class.to_lowercase() == self.label.to_lowercase()
    }

    pub fn is_satisfied_by(&self, prediction: &Prediction) -> bool {
        self.matches_class(&prediction.class) && prediction.score > self.threshold
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlagResult {
    pub flag: String,
    pub label: String,
    pub detected: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleSet(pub Vec<DetectionRule>);

impl Default for RuleSet {
    fn default() -> Self {
        Self(vec![
            DetectionRule::new("sink", "sinkDetected", 0.1),
            DetectionRule::new("cook-top", "cooktopDetected", 0.1),
        ])
    }
}

impl RuleSet {
    pub fn rules(&self) -> &[DetectionRule] {
        &self.0
    }

    /// One result per rule, in rule order
    pub fn evaluate(&self, predictions: &[Prediction]) -> Vec<FlagResult> {
        self.0
            .iter()
            .map(|rule| FlagResult {
                flag: rule.flag.clone(),
                label: rule.label.clone(),
                detected: predictions.iter().any(|p| rule.is_satisfied_by(p)),
            })
            .collect()
    }

    /// Whether any rule targets this class, ignoring scores
    pub fn watches_class(&self, class: &str) -> bool {
        self.0.iter().any(|rule| rule.matches_class(class))
    }
}
