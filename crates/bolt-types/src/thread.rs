use serde::{Deserialize, Serialize};

/// A standard thread size suggested by the host for a modeled diameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreadRecommendation {
    /// Size designation, e.g. `M12x1.75`.
    pub designation: String,
    /// Tolerance class, e.g. `6g`.
    pub thread_class: String,
}

/// Complete thread specification handed to a thread feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreadInfo {
    pub is_internal: bool,
    pub thread_type: String,
    pub designation: String,
    pub thread_class: String,
    /// Diametral clearance removed from the modeled thread, in internal
    /// length units. Zero models the nominal profile.
    #[serde(default)]
    pub allowance: f64,
}

impl ThreadInfo {
    pub fn external(thread_type: &str, recommendation: &ThreadRecommendation) -> Self {
        Self {
            is_internal: false,
            thread_type: thread_type.to_string(),
            designation: recommendation.designation.clone(),
            thread_class: recommendation.thread_class.clone(),
            allowance: 0.0,
        }
    }

    pub fn with_allowance(mut self, allowance: f64) -> Self {
        self.allowance = allowance;
        self
    }
}
