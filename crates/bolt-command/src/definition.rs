//! Command button registration in the host's toolbar.

use tracing::info;

use crate::types::CommandError;

/// Identity and placement of a toolbar command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandDefinition {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub workspace: &'static str,
    pub panel: &'static str,
    /// Existing control the button is placed after.
    pub beside: &'static str,
    /// Whether the button is promoted to the main toolbar.
    pub promoted: bool,
}

/// The printable bolt command, placed after Pipe in the solid Create panel.
pub const PRINTABLE_BOLT_COMMAND: CommandDefinition = CommandDefinition {
    id: "PrintableBolt_printableBoltCreate",
    name: "Printable Bolt",
    description: "Generate a bolt that is capable of being printed by a 3D printer. \
                  This is achieved by setting a backlash on the modeled threads \
                  within the tolerances of the printer.",
    workspace: "FusionSolidEnvironment",
    panel: "SolidCreatePanel",
    beside: "PrimitivePipe",
    promoted: false,
};

/// The host UI surface that holds command definitions and panel controls.
pub trait Toolbar {
    fn has_definition(&self, id: &str) -> bool;
    fn add_definition(&mut self, definition: &CommandDefinition);
    fn delete_definition(&mut self, id: &str);

    fn has_panel(&self, workspace: &str, panel: &str) -> bool;
    /// Add a control for `definition` to its panel, after its `beside` control.
    fn add_control(&mut self, definition: &CommandDefinition);
    /// Returns whether a control was removed.
    fn delete_control(&mut self, workspace: &str, panel: &str, id: &str) -> bool;
}

/// Register `definition` and place its button, replacing any definition
/// left behind by an earlier run.
pub fn install(
    toolbar: &mut dyn Toolbar,
    definition: &CommandDefinition,
) -> Result<(), CommandError> {
    if toolbar.has_definition(definition.id) {
        toolbar.delete_definition(definition.id);
    }
    if !toolbar.has_panel(definition.workspace, definition.panel) {
        return Err(CommandError::PanelNotFound {
            workspace: definition.workspace.to_string(),
            panel: definition.panel.to_string(),
        });
    }
    toolbar.add_definition(definition);
    toolbar.add_control(definition);
    info!(command = definition.name, "command started");
    Ok(())
}

/// Remove the button and the definition. Missing pieces are ignored.
pub fn uninstall(toolbar: &mut dyn Toolbar, definition: &CommandDefinition) {
    toolbar.delete_control(definition.workspace, definition.panel, definition.id);
    if toolbar.has_definition(definition.id) {
        toolbar.delete_definition(definition.id);
    }
    info!(command = definition.name, "command stopped");
}
