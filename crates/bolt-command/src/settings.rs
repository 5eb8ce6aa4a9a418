//! Dialog settings cached in the design between command runs.

use serde::{Deserialize, Serialize};
use solid_host::DesignAttributes;

/// Attribute group holding the cached settings.
pub const SETTINGS_GROUP: &str = "PrintableBolt";
/// Attribute name within [`SETTINGS_GROUP`].
pub const SETTINGS_NAME: &str = "settings";

/// Measurement standard shown in the dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Standard {
    English,
    Metric,
}

impl Standard {
    /// Display units for dialog values.
    pub fn units(&self) -> &'static str {
        match self {
            Standard::English => "in",
            Standard::Metric => "mm",
        }
    }

    /// The standard matching a design's default length units.
    pub fn for_length_units(units: &str) -> Self {
        match units {
            "in" | "ft" => Standard::English,
            _ => Standard::Metric,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoltSettings {
    #[serde(rename = "Standard")]
    pub standard: Standard,
}

impl BoltSettings {
    /// Read cached settings, falling back to the design's length units.
    pub fn load(attributes: &dyn DesignAttributes) -> Result<Self, serde_json::Error> {
        match attributes.attribute(SETTINGS_GROUP, SETTINGS_NAME) {
            Some(json) => serde_json::from_str(&json),
            None => Ok(Self {
                standard: Standard::for_length_units(&attributes.default_length_units()),
            }),
        }
    }

    pub fn store(&self, attributes: &mut dyn DesignAttributes) -> Result<(), serde_json::Error> {
        let json = serde_json::to_string(self)?;
        attributes.set_attribute(SETTINGS_GROUP, SETTINGS_NAME, &json);
        Ok(())
    }
}
