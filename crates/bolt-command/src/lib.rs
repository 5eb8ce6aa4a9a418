pub mod definition;
pub mod inputs;
pub mod session;
pub mod settings;
pub mod types;

pub use definition::{install, uninstall, CommandDefinition, Toolbar, PRINTABLE_BOLT_COMMAND};
pub use inputs::{BoltInputs, InputChange, InputVisibility, Validation};
pub use session::{CommandHost, CommandSession, Registration};
pub use settings::{BoltSettings, Standard, SETTINGS_GROUP, SETTINGS_NAME};
pub use types::*;
