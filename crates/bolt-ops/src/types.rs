use serde::{Deserialize, Serialize};
use solid_host::{BodyId, ComponentId, HostError};

use crate::body::BodyStage;
use crate::finishing::FinishingStage;
use crate::head::HeadStage;
use crate::offset::OffsetStage;
use crate::params::ParameterError;
use crate::thread::ThreadStage;

/// How `backlash` feeds into thread synthesis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BacklashPolicy {
    /// Accept backlash but model the nominal recommended thread.
    #[default]
    Ignore,
    /// Pass backlash to the thread feature as a diametral allowance.
    Allowance,
}

/// Build configuration, independent of bolt dimensions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildOptions {
    pub backlash_policy: BacklashPolicy,
    /// Run the chamfer, fillet and corner-truncation stage.
    pub finish_head: bool,
}

/// Everything a successful build produced.
#[derive(Debug, Clone)]
pub struct BoltOutput {
    pub component: ComponentId,
    /// The named bolt body.
    pub body: BodyId,
    pub head: HeadStage,
    pub shaft: BodyStage,
    /// Absent when the host had no thread recommendation.
    pub thread: Option<ThreadStage>,
    pub offset: Option<OffsetStage>,
    pub finishing: Option<FinishingStage>,
    pub diagnostics: Diagnostics,
}

/// Non-fatal diagnostics from a build.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    /// Warning messages.
    pub warnings: Vec<String>,
    /// Wall time of the build, in milliseconds.
    pub build_time_ms: f64,
}

/// Errors from building a bolt.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BuildError {
    #[error("new component failed to create")]
    ComponentCreation,

    #[error("the {stage} sketch has no closed profile")]
    ProfileUnavailable { stage: &'static str },

    /// Soft: the builder skips threads instead of failing.
    #[error("no recommended thread for diameter {diameter}")]
    ThreadDataUnavailable { diameter: f64 },

    #[error("invalid bolt parameters")]
    InvalidParameters(#[from] ParameterError),

    #[error("host operation failed")]
    Host(#[from] HostError),
}

impl BuildError {
    /// Dialog title used when reporting this error.
    pub fn title(&self) -> &'static str {
        match self {
            BuildError::ComponentCreation => "New Component Failed",
            BuildError::ProfileUnavailable { .. } => "Profile Unavailable",
            BuildError::ThreadDataUnavailable { .. } => "Thread Data Unavailable",
            BuildError::InvalidParameters(_) => "Invalid Parameters",
            BuildError::Host(_) => "Build Failed",
        }
    }

    /// Whether the builder degrades instead of failing.
    pub fn is_soft(&self) -> bool {
        matches!(self, BuildError::ThreadDataUnavailable { .. })
    }
}
