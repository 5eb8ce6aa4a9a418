use serde::{Deserialize, Serialize};

/// How a feature's result combines with existing bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum FeatureOperation {
    NewBody,
    Join,
    Cut,
}

/// Side of the profile plane an extent runs toward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ExtentDirection {
    Positive,
    Negative,
}

impl ExtentDirection {
    pub fn sign(&self) -> f64 {
        match self {
            ExtentDirection::Positive => 1.0,
            ExtentDirection::Negative => -1.0,
        }
    }
}

/// One-sided distance extent measured from the profile plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistanceExtent {
    /// Unsigned distance.
    pub distance: f64,
    pub direction: ExtentDirection,
}

impl DistanceExtent {
    pub fn positive(distance: f64) -> Self {
        Self {
            distance,
            direction: ExtentDirection::Positive,
        }
    }

    pub fn negative(distance: f64) -> Self {
        Self {
            distance,
            direction: ExtentDirection::Negative,
        }
    }

    /// Distance along the plane normal.
    pub fn signed_distance(&self) -> f64 {
        self.distance * self.direction.sign()
    }
}

/// Axis a revolve sweeps around.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ConstructionAxis {
    X,
    Y,
    Z,
}

impl ConstructionAxis {
    pub fn direction(&self) -> [f64; 3] {
        match self {
            ConstructionAxis::X => [1.0, 0.0, 0.0],
            ConstructionAxis::Y => [0.0, 1.0, 0.0],
            ConstructionAxis::Z => [0.0, 0.0, 1.0],
        }
    }
}
