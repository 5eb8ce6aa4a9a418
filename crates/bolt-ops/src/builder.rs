//! Orchestrates the bolt stages against a host, in construction order.

use std::time::Instant;

use solid_host::{BodyId, HostBundle};
use tracing::{info, instrument, warn};

use crate::body::execute_body;
use crate::finishing::execute_finishing;
use crate::head::execute_head;
use crate::offset::execute_offset;
use crate::params::BoltParameters;
use crate::thread::execute_thread;
use crate::types::{BoltOutput, BuildError, BuildOptions, Diagnostics};

/// Builds printable bolts. Holds configuration only; every call to
/// [`BoltBuilder::build`] starts from a fresh component.
#[derive(Debug, Clone, Default)]
pub struct BoltBuilder {
    options: BuildOptions,
}

impl BoltBuilder {
    pub fn new(options: BuildOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &BuildOptions {
        &self.options
    }

    /// Run the full pipeline: component, head, shaft, optional finishing,
    /// thread and offset shell.
    ///
    /// A missing thread recommendation is not an error: the bolt is left
    /// unthreaded and a warning is recorded. Any other failure aborts the
    /// build without undoing what the host already created.
    #[instrument(skip_all, fields(name = %params.bolt_name))]
    pub fn build(
        &self,
        params: &BoltParameters,
        host: &mut dyn HostBundle,
    ) -> Result<BoltOutput, BuildError> {
        let start = Instant::now();
        params.check()?;

        let component = host.add_component()?.ok_or(BuildError::ComponentCreation)?;
        let head = execute_head(host, component, params)?;
        let shaft = execute_body(host, component, params)?;

        let finishing = if self.options.finish_head {
            Some(execute_finishing(host, component, &head, &shaft, params)?)
        } else {
            None
        };

        let mut diagnostics = Diagnostics::default();
        let thread = match execute_thread(
            host,
            component,
            shaft.feature,
            params,
            self.options.backlash_policy,
        ) {
            Ok(stage) => Some(stage),
            Err(err) if err.is_soft() => {
                warn!(%err, "leaving bolt unthreaded");
                diagnostics.warnings.push(err.to_string());
                None
            }
            Err(err) => return Err(err),
        };

        let offset = match &thread {
            Some(stage) => Some(execute_offset(host, component, &stage.faces)?),
            None => None,
        };

        diagnostics.build_time_ms = start.elapsed().as_secs_f64() * 1000.0;
        info!(
            threaded = thread.is_some(),
            ms = diagnostics.build_time_ms,
            "bolt built"
        );

        Ok(BoltOutput {
            component,
            body: head.body,
            head,
            shaft,
            thread,
            offset,
            finishing,
            diagnostics,
        })
    }
}

/// Build a bolt with default options and return its body.
pub fn build_bolt(
    params: &BoltParameters,
    host: &mut dyn HostBundle,
) -> Result<BodyId, BuildError> {
    BoltBuilder::default()
        .build(params, host)
        .map(|output| output.body)
}
