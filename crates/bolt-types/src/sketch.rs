use serde::{Deserialize, Serialize};

/// Origin construction planes of a component.
///
/// Sketch space is a right-handed frame on the plane: points are
/// `[u, v, w]` where `w` is the height above the plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ConstructionPlane {
    XY,
    /// Sketch v runs along model -Z, so the plane normal is +Y.
    XZ,
}

impl ConstructionPlane {
    /// Model-space direction of the sketch u axis.
    pub fn x_axis(&self) -> [f64; 3] {
        [1.0, 0.0, 0.0]
    }

    /// Model-space direction of the sketch v axis.
    pub fn y_axis(&self) -> [f64; 3] {
        match self {
            ConstructionPlane::XY => [0.0, 1.0, 0.0],
            ConstructionPlane::XZ => [0.0, 0.0, -1.0],
        }
    }

    pub fn normal(&self) -> [f64; 3] {
        match self {
            ConstructionPlane::XY => [0.0, 0.0, 1.0],
            ConstructionPlane::XZ => [0.0, 1.0, 0.0],
        }
    }

    pub fn model_to_sketch(&self, p: [f64; 3]) -> [f64; 3] {
        match self {
            ConstructionPlane::XY => p,
            ConstructionPlane::XZ => [p[0], -p[2], p[1]],
        }
    }

    pub fn sketch_to_model(&self, p: [f64; 3]) -> [f64; 3] {
        match self {
            ConstructionPlane::XY => p,
            ConstructionPlane::XZ => [p[0], p[2], -p[1]],
        }
    }
}

/// A curve drawn on a sketch, in sketch coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SketchCurve {
    Line { start: [f64; 3], end: [f64; 3] },
    Circle { center: [f64; 3], radius: f64 },
}

impl SketchCurve {
    pub fn is_closed(&self) -> bool {
        matches!(self, SketchCurve::Circle { .. })
    }
}
