use solid_host::{ComponentId, FaceId, FeatureId, HostBundle, HostError, ThreadInfo, ThreadInput};
use tracing::{info, instrument};

use crate::params::BoltParameters;
use crate::types::{BacklashPolicy, BuildError};

/// Output of the thread stage.
#[derive(Debug, Clone)]
pub struct ThreadStage {
    pub feature: FeatureId,
    pub designation: String,
    pub thread_class: String,
    /// Diametral allowance handed to the thread feature.
    pub allowance: f64,
    /// Faces produced by the thread feature.
    pub faces: Vec<FaceId>,
}

/// Thread the shaft's lateral face with the host's recommended metric
/// size for the body diameter.
///
/// Returns `BuildError::ThreadDataUnavailable` when the host has no
/// recommendation; callers treat that as a skip.
#[instrument(skip(host, params), fields(diameter = params.body_diameter))]
pub fn execute_thread(
    host: &mut dyn HostBundle,
    component: ComponentId,
    body_feature: FeatureId,
    params: &BoltParameters,
    policy: BacklashPolicy,
) -> Result<ThreadStage, BuildError> {
    let side_face = host
        .feature_side_faces(body_feature)
        .first()
        .copied()
        .ok_or(HostError::FaceNotFound {
            feature: body_feature,
            index: 0,
        })?;

    let thread_type = host.default_metric_thread_type();
    let recommendation = host
        .recommend_thread(params.body_diameter, false, &thread_type)
        .ok_or(BuildError::ThreadDataUnavailable {
            diameter: params.body_diameter,
        })?;

    let allowance = match policy {
        BacklashPolicy::Ignore => 0.0,
        BacklashPolicy::Allowance => params.backlash,
    };
    let info = ThreadInfo::external(&thread_type, &recommendation).with_allowance(allowance);
    let feature = host.add_thread(
        component,
        &ThreadInput {
            faces: vec![side_face],
            info,
            is_modeled: true,
        },
    )?;
    let faces = host.feature_faces(feature);
    info!(
        designation = %recommendation.designation,
        class = %recommendation.thread_class,
        allowance,
        faces = faces.len(),
        "modeled thread applied"
    );

    Ok(ThreadStage {
        feature,
        designation: recommendation.designation,
        thread_class: recommendation.thread_class,
        allowance,
        faces,
    })
}
