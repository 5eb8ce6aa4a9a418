use serde::{Deserialize, Serialize};

// Re-export shared types from bolt-types
pub use bolt_types::{
    ConstructionAxis, ConstructionPlane, DistanceExtent, EdgeCurve, ExtentDirection,
    FeatureOperation, SketchCurve, SurfaceKind, ThreadInfo, ThreadRecommendation,
};

macro_rules! host_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        pub struct $name(pub u64);
    };
}

host_id!(
    /// Sub-assembly component in the active design.
    ComponentId
);
host_id!(SketchId);
host_id!(CurveId);
host_id!(
    /// Closed region of a sketch usable as a cross-section.
    ProfileId
);
host_id!(FeatureId);
host_id!(BodyId);
host_id!(FaceId);
host_id!(EdgeId);
host_id!(LoopId);

/// Kind of host entity, for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Component,
    Sketch,
    Curve,
    Profile,
    Feature,
    Body,
    Face,
    Edge,
    Loop,
}

/// Extrude feature input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtrudeInput {
    pub profile: ProfileId,
    pub operation: FeatureOperation,
    pub extent: DistanceExtent,
}

/// Revolve feature input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevolveInput {
    pub profile: ProfileId,
    pub axis: ConstructionAxis,
    /// Sweep angle in radians.
    pub angle: f64,
    pub operation: FeatureOperation,
}

/// Thread feature input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreadInput {
    /// Cylindrical faces to thread.
    pub faces: Vec<FaceId>,
    pub info: ThreadInfo,
    /// Modeled threads are real geometry; otherwise the thread is cosmetic.
    pub is_modeled: bool,
}

/// Offset feature input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OffsetInput {
    pub faces: Vec<FaceId>,
    /// Signed distance along the face normals.
    pub distance: f64,
    pub operation: FeatureOperation,
    /// Pull in tangent-connected faces.
    pub is_chain: bool,
}

/// The input a feature was created from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FeatureDefinition {
    Extrude(ExtrudeInput),
    Revolve(RevolveInput),
    Chamfer { edges: Vec<EdgeId>, distance: f64 },
    Fillet { edges: Vec<EdgeId>, radius: f64 },
    Thread(ThreadInput),
    Offset(OffsetInput),
}

impl FeatureDefinition {
    pub fn name(&self) -> &'static str {
        match self {
            FeatureDefinition::Extrude(_) => "extrude",
            FeatureDefinition::Revolve(_) => "revolve",
            FeatureDefinition::Chamfer { .. } => "chamfer",
            FeatureDefinition::Fillet { .. } => "fillet",
            FeatureDefinition::Thread(_) => "thread",
            FeatureDefinition::Offset(_) => "offset",
        }
    }
}

/// Errors from host operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HostError {
    #[error("{kind:?} {id} not found")]
    EntityNotFound { kind: EntityKind, id: u64 },

    #[error("feature {feature:?} has no face at index {index}")]
    FaceNotFound { feature: FeatureId, index: usize },

    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("operation not supported: {operation}")]
    NotSupported { operation: String },

    #[error("host error: {message}")]
    Other { message: String },
}
