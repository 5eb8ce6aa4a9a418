use solid_host::{
    ComponentId, ConstructionPlane, DistanceExtent, ExtrudeInput, FeatureId, FeatureOperation,
    HostBundle, SketchId,
};
use tracing::{info, instrument};

use crate::params::BoltParameters;
use crate::sketch::{first_profile, ORIGIN};
use crate::types::BuildError;

pub fn body_radius(params: &BoltParameters) -> f64 {
    params.body_diameter / 2.0
}

/// Output of the shaft stage.
#[derive(Debug, Clone)]
pub struct BodyStage {
    pub sketch: SketchId,
    pub feature: FeatureId,
}

/// Sketch the shaft circle on the head's plane and extrude it away from
/// the head, joined to the head body.
#[instrument(skip(host, params), fields(length = params.body_length))]
pub fn execute_body(
    host: &mut dyn HostBundle,
    component: ComponentId,
    params: &BoltParameters,
) -> Result<BodyStage, BuildError> {
    let sketch = host.add_sketch(component, ConstructionPlane::XY)?;
    let radius = body_radius(params);
    host.add_circle(sketch, ORIGIN, radius)?;

    let profile = first_profile(host.as_introspect(), sketch, "body")?;
    let feature = host.extrude(
        component,
        &ExtrudeInput {
            profile,
            operation: FeatureOperation::Join,
            extent: DistanceExtent::negative(params.body_length),
        },
    )?;
    info!(radius, "shaft extruded");

    Ok(BodyStage { sketch, feature })
}
