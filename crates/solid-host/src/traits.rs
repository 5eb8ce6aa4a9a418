use crate::types::*;

/// Mutating operations of a solid-modeling host.
/// Implemented by MockHost (deterministic in-memory host) and by bindings
/// to real CAD applications.
pub trait SolidHost {
    /// Create a new empty component under the root assembly.
    /// `Ok(None)` means the host declined to create one.
    fn add_component(&mut self) -> Result<Option<ComponentId>, HostError>;

    /// Delete a component and everything it owns.
    fn delete_component(&mut self, component: ComponentId) -> Result<(), HostError>;

    /// Create an empty sketch on one of the component's construction planes.
    fn add_sketch(
        &mut self,
        component: ComponentId,
        plane: ConstructionPlane,
    ) -> Result<SketchId, HostError>;

    /// Add a line segment in sketch coordinates.
    fn add_line(
        &mut self,
        sketch: SketchId,
        start: [f64; 3],
        end: [f64; 3],
    ) -> Result<CurveId, HostError>;

    /// Add a circle in sketch coordinates.
    fn add_circle(
        &mut self,
        sketch: SketchId,
        center: [f64; 3],
        radius: f64,
    ) -> Result<CurveId, HostError>;

    /// Extrude a sketch profile.
    fn extrude(
        &mut self,
        component: ComponentId,
        input: &ExtrudeInput,
    ) -> Result<FeatureId, HostError>;

    /// Revolve a sketch profile around a construction axis.
    fn revolve(
        &mut self,
        component: ComponentId,
        input: &RevolveInput,
    ) -> Result<FeatureId, HostError>;

    /// Equal-distance chamfer on the given edges.
    fn chamfer(
        &mut self,
        component: ComponentId,
        edges: &[EdgeId],
        distance: f64,
    ) -> Result<FeatureId, HostError>;

    /// Constant-radius fillet on the given edges.
    fn fillet(
        &mut self,
        component: ComponentId,
        edges: &[EdgeId],
        radius: f64,
    ) -> Result<FeatureId, HostError>;

    /// Name of the host's default metric thread type.
    fn default_metric_thread_type(&self) -> String;

    /// Suggest a standard thread size for a modeled diameter.
    fn recommend_thread(
        &self,
        diameter: f64,
        is_internal: bool,
        thread_type: &str,
    ) -> Option<ThreadRecommendation>;

    /// Apply a thread feature to cylindrical faces.
    fn add_thread(
        &mut self,
        component: ComponentId,
        input: &ThreadInput,
    ) -> Result<FeatureId, HostError>;

    /// Offset a set of faces.
    fn offset_faces(
        &mut self,
        component: ComponentId,
        input: &OffsetInput,
    ) -> Result<FeatureId, HostError>;

    fn set_body_name(&mut self, body: BodyId, name: &str) -> Result<(), HostError>;

    /// Show a blocking message dialog.
    fn message_box(&mut self, message: &str, title: &str);
}

/// Read-only queries on the host document.
pub trait HostIntrospect {
    fn components(&self) -> Vec<ComponentId>;

    fn component_sketches(&self, component: ComponentId) -> Vec<SketchId>;

    /// Features of a component in creation order.
    fn component_features(&self, component: ComponentId) -> Vec<FeatureId>;

    /// Bodies of a component in creation order.
    fn component_bodies(&self, component: ComponentId) -> Vec<BodyId>;

    fn sketch_plane(&self, sketch: SketchId) -> Option<ConstructionPlane>;

    fn sketch_curves(&self, sketch: SketchId) -> Vec<SketchCurve>;

    /// Closed regions of a sketch, in the order the host reports them.
    fn sketch_profiles(&self, sketch: SketchId) -> Vec<ProfileId>;

    /// Map a model-space point into the sketch's coordinate frame.
    fn model_to_sketch_space(&self, sketch: SketchId, point: [f64; 3])
        -> Result<[f64; 3], HostError>;

    fn feature_definition(&self, feature: FeatureId) -> Option<FeatureDefinition>;

    /// Every face a feature produced or touched, start faces first, then
    /// end faces, then side faces.
    fn feature_faces(&self, feature: FeatureId) -> Vec<FaceId>;

    /// Faces lying on the profile plane.
    fn feature_start_faces(&self, feature: FeatureId) -> Vec<FaceId>;

    /// Faces at the far end of the extent.
    fn feature_end_faces(&self, feature: FeatureId) -> Vec<FaceId>;

    /// Lateral faces swept by the profile boundary.
    fn feature_side_faces(&self, feature: FeatureId) -> Vec<FaceId>;

    fn face_body(&self, face: FaceId) -> Option<BodyId>;

    fn face_surface(&self, face: FaceId) -> Option<SurfaceKind>;

    /// Loops of a face, outer loop first.
    fn face_loops(&self, face: FaceId) -> Vec<LoopId>;

    /// All edges of a face across its loops.
    fn face_edges(&self, face: FaceId) -> Vec<EdgeId>;

    fn loop_edges(&self, lp: LoopId) -> Vec<EdgeId>;

    fn edge_curve(&self, edge: EdgeId) -> Option<EdgeCurve>;

    fn body_name(&self, body: BodyId) -> Option<String>;

    fn body_faces(&self, body: BodyId) -> Vec<FaceId>;
}

/// Key/value attributes stored with the design, plus design-level settings.
pub trait DesignAttributes {
    fn attribute(&self, group: &str, name: &str) -> Option<String>;

    fn set_attribute(&mut self, group: &str, name: &str, value: &str);

    /// Default length unit of the design, e.g. `mm` or `in`.
    fn default_length_units(&self) -> String;
}

/// Combined trait for code that needs both mutable SolidHost access
/// and read-only HostIntrospect access on the same object.
pub trait HostBundle: SolidHost + HostIntrospect {
    fn as_introspect(&self) -> &dyn HostIntrospect;
}

// Blanket implementation for any type that implements both traits
impl<T: SolidHost + HostIntrospect> HostBundle for T {
    fn as_introspect(&self) -> &dyn HostIntrospect {
        self
    }
}
