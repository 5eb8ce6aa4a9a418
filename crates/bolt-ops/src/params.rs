use serde::{Deserialize, Serialize};

pub const DEFAULT_BOLT_NAME: &str = "Printable Bolt";

/// Dimensional and topological inputs of a bolt.
///
/// All lengths are in the host's internal length unit. Set once by the
/// caller, then read-only for the duration of a build.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoltParameters {
    /// Name given to the resulting body.
    pub bolt_name: String,
    /// Circumscribed diameter of the head polygon.
    pub head_diameter: f64,
    pub body_diameter: f64,
    pub head_height: f64,
    /// 0 builds a headless bolt on a small cylindrical stub.
    pub head_sides: u32,
    /// Shaft length, extruded away from the head.
    pub body_length: f64,
    /// Corner truncation angle of the head, radians.
    pub cut_angle: f64,
    pub chamfer_distance: f64,
    /// 0 disables the head/shaft fillet.
    pub fillet_radius: f64,
    /// Allowance for printed thread fit.
    pub backlash: f64,
}

impl Default for BoltParameters {
    fn default() -> Self {
        Self {
            bolt_name: DEFAULT_BOLT_NAME.to_string(),
            head_diameter: 0.75,
            body_diameter: 0.5,
            head_height: 0.3125,
            head_sides: 6,
            body_length: 2.0,
            cut_angle: 30.0_f64.to_radians(),
            chamfer_distance: 0.03845,
            fillet_radius: 0.02994,
            backlash: 0.0,
        }
    }
}

impl BoltParameters {
    pub fn is_headless(&self) -> bool {
        self.head_sides == 0
    }

    /// Check the geometric preconditions of a build.
    pub fn check(&self) -> Result<(), ParameterError> {
        positive("body diameter", self.body_diameter)?;
        positive("body length", self.body_length)?;
        positive("head height", self.head_height)?;
        non_negative("chamfer distance", self.chamfer_distance)?;
        non_negative("fillet radius", self.fillet_radius)?;
        non_negative("backlash", self.backlash)?;

        if self.is_headless() {
            return Ok(());
        }
        if self.head_sides < 3 {
            return Err(ParameterError::TooFewSides {
                sides: self.head_sides,
            });
        }
        if !(self.head_diameter > self.body_diameter) {
            return Err(ParameterError::HeadTooNarrow {
                head: self.head_diameter,
                body: self.body_diameter,
            });
        }
        Ok(())
    }
}

fn positive(name: &'static str, value: f64) -> Result<(), ParameterError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ParameterError::NotPositive { name, value })
    }
}

fn non_negative(name: &'static str, value: f64) -> Result<(), ParameterError> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ParameterError::Negative { name, value })
    }
}

/// A parameter set that cannot produce a bolt.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParameterError {
    #[error("{name} must be greater than 0, got {value}")]
    NotPositive { name: &'static str, value: f64 },

    #[error("{name} cannot be negative, got {value}")]
    Negative { name: &'static str, value: f64 },

    #[error("a head needs at least 3 sides, got {sides}")]
    TooFewSides { sides: u32 },

    #[error("head diameter {head} must be greater than body diameter {body}")]
    HeadTooNarrow { head: f64, body: f64 },
}
