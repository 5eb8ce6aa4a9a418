//! One run of the bolt command dialog, as an explicit state machine.
//!
//! The session owns its handler registrations and the preview component.
//! Nothing outlives [`CommandSession::destroy`].

use std::error::Error as _;

use bolt_ops::{BoltBuilder, BoltOutput, BuildError, BuildOptions};
use solid_host::{ComponentId, DesignAttributes, HostBundle, HostError};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::inputs::{BoltInputs, InputChange, Validation};
use crate::settings::BoltSettings;
use crate::types::{CommandError, CommandEvent, CommandResponse, HandlerKind, SessionState};

/// Everything a session needs from the host: modeling plus design
/// attributes for the cached settings.
pub trait CommandHost: HostBundle + DesignAttributes {
    fn as_bundle(&mut self) -> &mut dyn HostBundle;
    fn as_attributes(&mut self) -> &mut dyn DesignAttributes;
}

impl<T: HostBundle + DesignAttributes> CommandHost for T {
    fn as_bundle(&mut self) -> &mut dyn HostBundle {
        self
    }

    fn as_attributes(&mut self) -> &mut dyn DesignAttributes {
        self
    }
}

/// A handler the session registered with the host application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Registration {
    pub id: Uuid,
    pub kind: HandlerKind,
}

const HANDLED_EVENTS: [HandlerKind; 5] = [
    HandlerKind::Execute,
    HandlerKind::InputChanged,
    HandlerKind::ExecutePreview,
    HandlerKind::Destroy,
    HandlerKind::ValidateInputs,
];

pub struct CommandSession {
    state: SessionState,
    inputs: BoltInputs,
    settings: BoltSettings,
    builder: BoltBuilder,
    registrations: Vec<Registration>,
    /// Component built by the most recent preview, deleted before the next
    /// preview or the final build.
    preview: Option<ComponentId>,
}

impl CommandSession {
    /// Read cached settings, build the default inputs and register the
    /// session's handlers.
    pub fn create(attributes: &dyn DesignAttributes) -> Result<Self, CommandError> {
        Self::with_options(attributes, BuildOptions::default())
    }

    pub fn with_options(
        attributes: &dyn DesignAttributes,
        options: BuildOptions,
    ) -> Result<Self, CommandError> {
        let settings = BoltSettings::load(attributes)?;
        let registrations = HANDLED_EVENTS
            .iter()
            .map(|&kind| Registration {
                id: Uuid::new_v4(),
                kind,
            })
            .collect();
        debug!(standard = ?settings.standard, "command session created");

        Ok(Self {
            state: SessionState::Created,
            inputs: BoltInputs::new(settings.standard),
            settings,
            builder: BoltBuilder::new(options),
            registrations,
            preview: None,
        })
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn inputs(&self) -> &BoltInputs {
        &self.inputs
    }

    pub fn registrations(&self) -> &[Registration] {
        &self.registrations
    }

    pub fn preview_component(&self) -> Option<ComponentId> {
        self.preview
    }

    /// Route a host event to the registered handler.
    pub fn handle(
        &mut self,
        event: CommandEvent,
        host: &mut dyn CommandHost,
    ) -> Result<CommandResponse, CommandError> {
        let kind = event.kind();
        if !self.registrations.iter().any(|r| r.kind == kind) {
            return Err(CommandError::NotRegistered { event: kind });
        }

        match event {
            CommandEvent::Execute => self
                .execute(host)
                .map(|output| CommandResponse::Executed(Box::new(output))),
            CommandEvent::InputChanged { change } => {
                self.change_input(change)?;
                Ok(CommandResponse::InputUpdated)
            }
            CommandEvent::ExecutePreview => self
                .preview(host)
                .map(|output| CommandResponse::Previewed {
                    component: output.component,
                }),
            CommandEvent::Destroy => {
                self.destroy()?;
                Ok(CommandResponse::Destroyed)
            }
            CommandEvent::ValidateInputs => self.validate().map(CommandResponse::Validated),
        }
    }

    pub fn change_input(&mut self, change: InputChange) -> Result<(), CommandError> {
        self.transition("change an input", SessionState::InputsChanging)?;
        debug!(?change, "input changed");
        self.inputs.apply(change);
        Ok(())
    }

    pub fn validate(&mut self) -> Result<Validation, CommandError> {
        self.transition("validate", SessionState::Validating)?;
        Ok(self.inputs.validate())
    }

    /// Rebuild the preview from scratch, discarding the previous one.
    #[instrument(skip_all)]
    pub fn preview(&mut self, host: &mut dyn CommandHost) -> Result<BoltOutput, CommandError> {
        self.transition("preview", SessionState::Previewing)?;
        self.discard_preview(host)?;
        let output = self.build(host)?;
        self.preview = Some(output.component);
        Ok(output)
    }

    /// Build the final bolt and remember the dialog settings.
    #[instrument(skip_all)]
    pub fn execute(&mut self, host: &mut dyn CommandHost) -> Result<BoltOutput, CommandError> {
        self.transition("execute", SessionState::Executing)?;
        self.discard_preview(host)?;
        let output = self.build(host)?;

        self.settings.standard = self.inputs.standard;
        self.settings.store(host.as_attributes())?;
        info!(body = ?output.body, "bolt created");
        Ok(output)
    }

    /// Drop every handler registration. The session is inert afterwards.
    pub fn destroy(&mut self) -> Result<(), CommandError> {
        self.transition("destroy", SessionState::Destroyed)?;
        self.registrations.clear();
        self.preview = None;
        Ok(())
    }

    fn transition(&mut self, action: &'static str, to: SessionState) -> Result<(), CommandError> {
        let allowed = match self.state {
            SessionState::Destroyed => false,
            SessionState::Executing => to == SessionState::Destroyed,
            _ => true,
        };
        if !allowed {
            return Err(CommandError::InvalidTransition {
                state: self.state,
                action,
            });
        }
        debug!(from = ?self.state, ?to, "session transition");
        self.state = to;
        Ok(())
    }

    fn discard_preview(&mut self, host: &mut dyn CommandHost) -> Result<(), CommandError> {
        let Some(component) = self.preview.take() else {
            return Ok(());
        };
        match host.delete_component(component) {
            Ok(()) => Ok(()),
            Err(HostError::EntityNotFound { .. }) => {
                warn!(?component, "preview component already gone");
                Ok(())
            }
            Err(err) => Err(CommandError::Build(BuildError::Host(err))),
        }
    }

    fn build(&self, host: &mut dyn CommandHost) -> Result<BoltOutput, CommandError> {
        let validation = self.inputs.validate();
        if !validation.valid {
            return Err(CommandError::InvalidInputs {
                reason: validation.message,
            });
        }
        let params = self.inputs.to_parameters()?;

        match self.builder.build(&params, host.as_bundle()) {
            Ok(output) => Ok(output),
            Err(err) => {
                report(host, &err);
                Err(err.into())
            }
        }
    }
}

/// Show a fatal build error to the user, with its whole source chain.
fn report(host: &mut dyn CommandHost, err: &BuildError) {
    let mut message = format!("Failed:\n{err}");
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(&format!("\n{cause}"));
        source = cause.source();
    }
    warn!(%err, "bolt build failed");
    host.message_box(&message, err.title());
}
