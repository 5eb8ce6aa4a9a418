use solid_host::{HostIntrospect, ProfileId, SketchId};

use crate::types::BuildError;

/// Sketch origin; every bolt sketch is centred on the component axis.
pub(crate) const ORIGIN: [f64; 3] = [0.0, 0.0, 0.0];

/// The first closed profile of a sketch.
pub(crate) fn first_profile(
    introspect: &dyn HostIntrospect,
    sketch: SketchId,
    stage: &'static str,
) -> Result<ProfileId, BuildError> {
    introspect
        .sketch_profiles(sketch)
        .first()
        .copied()
        .ok_or(BuildError::ProfileUnavailable { stage })
}
