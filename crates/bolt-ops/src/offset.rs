use solid_host::{
    BodyId, ComponentId, FaceId, FeatureId, FeatureOperation, HostBundle, HostError, OffsetInput,
};
use tracing::{info, instrument};

use crate::types::BuildError;

/// Offset applied to the thread faces to derive the inspection shell.
pub const OFFSET_SHELL_DISTANCE: f64 = -0.1;

/// Output of the offset-shell stage.
#[derive(Debug, Clone)]
pub struct OffsetStage {
    pub feature: FeatureId,
    /// The separate shell body.
    pub body: BodyId,
    pub distance: f64,
}

/// Offset the thread faces into a new, disjoint body.
#[instrument(skip(host, faces), fields(faces = faces.len()))]
pub fn execute_offset(
    host: &mut dyn HostBundle,
    component: ComponentId,
    faces: &[FaceId],
) -> Result<OffsetStage, BuildError> {
    let feature = host.offset_faces(
        component,
        &OffsetInput {
            faces: faces.to_vec(),
            distance: OFFSET_SHELL_DISTANCE,
            operation: FeatureOperation::NewBody,
            is_chain: false,
        },
    )?;

    let body = host
        .feature_faces(feature)
        .first()
        .and_then(|face| host.face_body(*face))
        .ok_or(HostError::Other {
            message: format!("offset feature {feature:?} produced no body"),
        })?;
    info!(?body, distance = OFFSET_SHELL_DISTANCE, "offset shell created");

    Ok(OffsetStage {
        feature,
        body,
        distance: OFFSET_SHELL_DISTANCE,
    })
}
