use std::f64::consts::PI;

use solid_host::{
    BodyId, ComponentId, ConstructionPlane, DistanceExtent, ExtrudeInput, FeatureId,
    FeatureOperation, HostBundle, HostError, SketchId,
};
use tracing::{info, instrument};

use crate::params::BoltParameters;
use crate::sketch::{first_profile, ORIGIN};
use crate::types::BuildError;

/// Index of the head extrude's end face, opposite the sketch plane.
const END_FACE_INDEX: usize = 1;

/// Planar head outline: vertices on the head circle and the line
/// segments joining them.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadPolygon {
    pub vertices: Vec<[f64; 3]>,
    /// `(from, to)` vertex indices, one per sketch line.
    pub edges: Vec<(usize, usize)>,
}

/// Head outline for a headed bolt.
///
/// Vertex `i` sits at angle `π·i / (n/2)` on a circle of radius
/// `head_diameter / 2`; line `i` runs from vertex `(i + 1) mod n` back to
/// vertex `i`.
pub fn head_polygon(params: &BoltParameters) -> HeadPolygon {
    let n = params.head_sides as usize;
    let radius = params.head_diameter / 2.0;
    let half_turn_steps = params.head_sides as f64 / 2.0;

    let vertices = (0..n)
        .map(|i| {
            let angle = PI * i as f64 / half_turn_steps;
            [
                ORIGIN[0] + radius * angle.cos(),
                ORIGIN[1] + radius * angle.sin(),
                0.0,
            ]
        })
        .collect();
    let edges = (0..n).map(|i| ((i + 1) % n, i)).collect();

    HeadPolygon { vertices, edges }
}

/// Radius of the base disc sketched for a headless bolt.
pub fn stub_radius(params: &BoltParameters) -> f64 {
    params.body_diameter / 100.0
}

/// Output of the head stage.
#[derive(Debug, Clone)]
pub struct HeadStage {
    pub sketch: SketchId,
    pub feature: FeatureId,
    /// The new body, renamed to the bolt name.
    pub body: BodyId,
}

/// Sketch the head (or headless stub), extrude it as a new body and
/// name that body.
#[instrument(skip(host, params), fields(sides = params.head_sides))]
pub fn execute_head(
    host: &mut dyn HostBundle,
    component: ComponentId,
    params: &BoltParameters,
) -> Result<HeadStage, BuildError> {
    let sketch = host.add_sketch(component, ConstructionPlane::XY)?;

    if params.is_headless() {
        let radius = stub_radius(params);
        info!(radius, "sketching headless base stub");
        host.add_circle(sketch, ORIGIN, radius)?;
    } else {
        let polygon = head_polygon(params);
        info!(
            sides = polygon.vertices.len(),
            radius = params.head_diameter / 2.0,
            "sketching head polygon"
        );
        for &(from, to) in &polygon.edges {
            host.add_line(sketch, polygon.vertices[from], polygon.vertices[to])?;
        }
    }

    let profile = first_profile(host.as_introspect(), sketch, "head")?;
    let feature = host.extrude(
        component,
        &ExtrudeInput {
            profile,
            operation: FeatureOperation::NewBody,
            extent: DistanceExtent::positive(params.head_height),
        },
    )?;

    let end_face = host
        .feature_faces(feature)
        .get(END_FACE_INDEX)
        .copied()
        .ok_or(HostError::FaceNotFound {
            feature,
            index: END_FACE_INDEX,
        })?;
    let body = host.face_body(end_face).ok_or(HostError::Other {
        message: format!("face {end_face:?} has no body"),
    })?;
    host.set_body_name(body, &params.bolt_name)?;
    info!(?body, height = params.head_height, "head extruded");

    Ok(HeadStage {
        sketch,
        feature,
        body,
    })
}
