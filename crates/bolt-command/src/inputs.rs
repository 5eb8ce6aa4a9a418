//! Dialog inputs of the bolt command, their validation, and their mapping
//! onto [`BoltParameters`].
//!
//! Values are held in internal length units whatever [`Standard`] the
//! dialog displays.

use bolt_ops::BoltParameters;
use serde::{Deserialize, Serialize};

use crate::settings::Standard;
use crate::types::CommandError;

/// Which head-related inputs the dialog shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputVisibility {
    pub head_diameter: bool,
    pub head_height: bool,
    pub head_sides: bool,
    pub base_filleted: bool,
}

impl InputVisibility {
    fn for_headless(headless: bool) -> Self {
        Self {
            head_diameter: !headless,
            head_height: true,
            head_sides: !headless,
            base_filleted: !headless,
        }
    }
}

/// Current values of every dialog input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoltInputs {
    pub standard: Standard,
    pub shaft_diameter: f64,
    pub shaft_length: f64,
    pub backlash: f64,
    pub head_diameter: f64,
    pub head_height: f64,
    /// Free text; must hold a whole number when a head is wanted.
    pub head_sides: String,
    pub thread_chamfer_distance: f64,
    pub base_filleted: bool,
    pub headless: bool,
    pub visibility: InputVisibility,
}

impl BoltInputs {
    /// Dialog defaults for the given standard.
    pub fn new(standard: Standard) -> Self {
        Self {
            standard,
            shaft_diameter: 1.20,
            shaft_length: 2.4,
            backlash: 0.01,
            head_diameter: 2.0,
            head_height: 0.5,
            head_sides: "6".to_string(),
            thread_chamfer_distance: 0.04,
            base_filleted: true,
            headless: false,
            visibility: InputVisibility::for_headless(false),
        }
    }

    /// Display units of the length inputs.
    pub fn units(&self) -> &'static str {
        self.standard.units()
    }

    pub fn apply(&mut self, change: InputChange) {
        match change {
            InputChange::Standard(standard) => self.standard = standard,
            InputChange::ShaftDiameter(v) => self.shaft_diameter = v,
            InputChange::ShaftLength(v) => self.shaft_length = v,
            InputChange::Backlash(v) => self.backlash = v,
            InputChange::HeadDiameter(v) => self.head_diameter = v,
            InputChange::HeadHeight(v) => self.head_height = v,
            InputChange::HeadNumSides(v) => self.head_sides = v,
            InputChange::ThreadChamferDistance(v) => self.thread_chamfer_distance = v,
            InputChange::BaseFilleted(v) => self.base_filleted = v,
            InputChange::Headless(v) => {
                self.headless = v;
                self.visibility = InputVisibility::for_headless(v);
            }
        }
    }

    /// Check the inputs in dialog order; the first failure wins.
    pub fn validate(&self) -> Validation {
        match self.first_problem() {
            Some(message) => Validation::invalid(message),
            None => Validation::valid(),
        }
    }

    fn first_problem(&self) -> Option<&'static str> {
        if !(self.shaft_length > 0.0) {
            return Some("The shaft length must be greater than 0.");
        }
        if !(self.shaft_diameter > 0.0) {
            return Some("The shaft diameter must be greater than 0.");
        }
        if !(self.thread_chamfer_distance >= 0.0) {
            return Some("The thread chamfer distance value cannot be negative.");
        }
        if !(self.backlash > 0.0) {
            return Some("The backlash value must be greater than 0.");
        }
        // The headless stub is still extruded by the head height.
        if !(self.head_height > 0.0) {
            return Some("The head height must be greater than 0.");
        }
        if self.headless {
            return None;
        }
        if !(self.head_diameter > 0.0) {
            return Some("The head diameter must be greater than 0.");
        }
        if !(self.head_diameter > self.shaft_diameter) {
            return Some("The head diameter must be greater than the shaft diameter.");
        }
        match parse_sides(&self.head_sides) {
            Some(sides) if sides > 2 => None,
            _ => Some("The number of sides must be a whole number greater than 2."),
        }
    }

    /// Map dialog values onto bolt parameters.
    ///
    /// A headless bolt gets zero sides and an unfilleted base gets a zero
    /// fillet radius; everything the dialog does not expose keeps its
    /// default.
    pub fn to_parameters(&self) -> Result<BoltParameters, CommandError> {
        let head_sides = if self.headless {
            0
        } else {
            parse_sides(&self.head_sides).ok_or_else(|| CommandError::InvalidInputs {
                reason: format!("head sides {:?} is not a whole number", self.head_sides),
            })?
        };
        let defaults = BoltParameters::default();

        Ok(BoltParameters {
            body_diameter: self.shaft_diameter,
            body_length: self.shaft_length,
            head_diameter: self.head_diameter,
            head_height: self.head_height,
            head_sides,
            chamfer_distance: self.thread_chamfer_distance,
            fillet_radius: if self.base_filleted {
                defaults.fillet_radius
            } else {
                0.0
            },
            backlash: self.backlash,
            ..defaults
        })
    }
}

fn parse_sides(text: &str) -> Option<u32> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

/// A change to one dialog input, tagged with the input's id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "id", content = "value", rename_all = "camelCase")]
pub enum InputChange {
    Standard(Standard),
    ShaftDiameter(f64),
    ShaftLength(f64),
    Backlash(f64),
    HeadDiameter(f64),
    HeadHeight(f64),
    HeadNumSides(String),
    ThreadChamferDistance(f64),
    BaseFilleted(bool),
    Headless(bool),
}

/// Outcome of input validation, with the message shown under the inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Validation {
    pub valid: bool,
    /// Empty when valid.
    pub message: String,
}

impl Validation {
    pub fn valid() -> Self {
        Self {
            valid: true,
            message: String::new(),
        }
    }

    pub fn invalid(message: &str) -> Self {
        Self {
            valid: false,
            message: message.to_string(),
        }
    }
}
