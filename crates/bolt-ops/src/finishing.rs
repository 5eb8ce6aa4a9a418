//! Optional head finishing: chamfered shaft tip, filleted head/shaft
//! junction, and head corners truncated by two revolve cuts.

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use solid_host::{
    ComponentId, ConstructionAxis, ConstructionPlane, EdgeId, FeatureId, FeatureOperation,
    HostBundle, HostIntrospect, RevolveInput,
};
use tracing::{info, instrument, warn};

use crate::body::BodyStage;
use crate::head::HeadStage;
use crate::params::BoltParameters;
use crate::sketch::first_profile;
use crate::types::BuildError;

/// Output of the finishing stage. Each step is skipped when its
/// parameter is zero or it does not apply to the bolt.
#[derive(Debug, Clone, Default)]
pub struct FinishingStage {
    pub chamfer: Option<FeatureId>,
    pub fillet: Option<FeatureId>,
    pub revolve_cuts: Vec<FeatureId>,
}

#[instrument(skip_all)]
pub fn execute_finishing(
    host: &mut dyn HostBundle,
    component: ComponentId,
    head: &HeadStage,
    shaft: &BodyStage,
    params: &BoltParameters,
) -> Result<FinishingStage, BuildError> {
    let mut stage = FinishingStage::default();

    if params.chamfer_distance > 0.0 {
        let tip_edges: Vec<_> = host
            .feature_end_faces(shaft.feature)
            .first()
            .map(|face| host.face_edges(*face))
            .unwrap_or_default();
        if tip_edges.is_empty() {
            warn!("shaft has no end face to chamfer");
        } else {
            stage.chamfer = Some(host.chamfer(component, &tip_edges, params.chamfer_distance)?);
            info!(distance = params.chamfer_distance, "shaft tip chamfered");
        }
    }

    if params.is_headless() {
        return Ok(stage);
    }

    if params.fillet_radius > 0.0 {
        match junction_edge(host.as_introspect(), head) {
            Some(edge) => {
                stage.fillet = Some(host.fillet(component, &[edge], params.fillet_radius)?);
                info!(radius = params.fillet_radius, "head junction filleted");
            }
            None => warn!("no single-edge loop on the head face, skipping fillet"),
        }
    }

    if params.cut_angle > 0.0 && params.cut_angle < FRAC_PI_2 {
        // Top cut is sketched and revolved before the bottom one.
        for at_top in [true, false] {
            stage
                .revolve_cuts
                .push(corner_cut(host, component, params, at_top)?);
        }
        info!(angle = params.cut_angle, "head corners truncated");
    } else {
        warn!(angle = params.cut_angle, "cut angle outside (0, π/2), skipping corner cuts");
    }

    Ok(stage)
}

/// The circular edge where the shaft meets the head: the only loop on
/// the head's sketch-plane face that consists of a single edge.
fn junction_edge(introspect: &dyn HostIntrospect, head: &HeadStage) -> Option<EdgeId> {
    let face = *introspect.feature_start_faces(head.feature).first()?;
    introspect
        .face_loops(face)
        .into_iter()
        .map(|lp| introspect.loop_edges(lp))
        .find(|edges| edges.len() == 1)
        .map(|edges| edges[0])
}

/// Sketch a triangle on the XZ plane that trims the head's corners
/// outside the flat-to-flat circle, and revolve it as a cut.
fn corner_cut(
    host: &mut dyn HostBundle,
    component: ComponentId,
    params: &BoltParameters,
    at_top: bool,
) -> Result<FeatureId, BuildError> {
    let sketch = host.add_sketch(component, ConstructionPlane::XZ)?;
    let radius = params.head_diameter / 2.0;
    let inner = radius * (PI / 6.0).cos();
    let rise = (radius - inner) * params.cut_angle.tan();
    let (z, tip) = if at_top {
        (params.head_height, params.head_height - rise)
    } else {
        (0.0, rise)
    };

    let corners = [[inner, 0.0, z], [radius, 0.0, z], [radius, 0.0, tip]];
    let mut points = [[0.0; 3]; 3];
    for (point, corner) in points.iter_mut().zip(corners) {
        *point = host.model_to_sketch_space(sketch, corner)?;
    }
    for i in 0..3 {
        host.add_line(sketch, points[i], points[(i + 1) % 3])?;
    }

    let profile = first_profile(host.as_introspect(), sketch, "corner cut")?;
    let feature = host.revolve(
        component,
        &RevolveInput {
            profile,
            axis: ConstructionAxis::Z,
            angle: TAU,
            operation: FeatureOperation::Cut,
        },
    )?;
    Ok(feature)
}
