//! MockHost: deterministic in-memory host implementing SolidHost,
//! HostIntrospect and DesignAttributes.
//!
//! Keeps just enough B-rep bookkeeping (bodies, faces, loops, edges) for
//! construction code to select faces and edges by position the way it
//! would against a real CAD application. Used by bolt-ops and
//! bolt-command for testing.

use std::collections::HashMap;
use std::f64::consts::{FRAC_PI_2, SQRT_2, TAU};

use tracing::debug;

use crate::thread_table;
use crate::traits::{DesignAttributes, HostIntrospect, SolidHost};
use crate::types::*;

const TOL: f64 = 1e-9;

/// Closed boundary of a profile in sketch coordinates.
#[derive(Debug, Clone)]
enum Boundary {
    /// Ordered polygon vertices, not repeated at the end.
    Polygon(Vec<[f64; 3]>),
    Circle { center: [f64; 3], radius: f64 },
}

impl Boundary {
    fn area(&self) -> f64 {
        match self {
            Boundary::Polygon(pts) => {
                let n = pts.len();
                let twice: f64 = (0..n)
                    .map(|i| {
                        let a = pts[i];
                        let b = pts[(i + 1) % n];
                        a[0] * b[1] - b[0] * a[1]
                    })
                    .sum();
                twice.abs() / 2.0
            }
            Boundary::Circle { radius, .. } => std::f64::consts::PI * radius * radius,
        }
    }

    fn centroid(&self) -> [f64; 3] {
        match self {
            Boundary::Polygon(pts) => {
                let n = pts.len() as f64;
                let sum = pts.iter().fold([0.0; 3], |acc, p| add(acc, *p));
                scale(sum, 1.0 / n)
            }
            Boundary::Circle { center, .. } => *center,
        }
    }
}

#[derive(Debug, Clone)]
struct MockComponent {
    sketches: Vec<SketchId>,
    features: Vec<FeatureId>,
    bodies: Vec<BodyId>,
}

#[derive(Debug, Clone)]
struct MockSketch {
    plane: ConstructionPlane,
    curves: Vec<(CurveId, SketchCurve)>,
    profiles: Vec<ProfileId>,
}

#[derive(Debug, Clone)]
struct MockProfile {
    sketch: SketchId,
    boundary: Boundary,
}

#[derive(Debug, Clone)]
struct MockFeature {
    component: ComponentId,
    definition: FeatureDefinition,
    start_faces: Vec<FaceId>,
    end_faces: Vec<FaceId>,
    side_faces: Vec<FaceId>,
    /// Faces that are neither caps nor sides (threads, offsets, blends).
    other_faces: Vec<FaceId>,
}

impl MockFeature {
    fn new(component: ComponentId, definition: FeatureDefinition) -> Self {
        Self {
            component,
            definition,
            start_faces: Vec::new(),
            end_faces: Vec::new(),
            side_faces: Vec::new(),
            other_faces: Vec::new(),
        }
    }

    fn forget_face(&mut self, face: FaceId) {
        self.start_faces.retain(|f| *f != face);
        self.end_faces.retain(|f| *f != face);
        self.side_faces.retain(|f| *f != face);
        self.other_faces.retain(|f| *f != face);
    }
}

#[derive(Debug, Clone)]
struct MockBody {
    name: String,
    faces: Vec<FaceId>,
}

#[derive(Debug, Clone)]
struct MockFace {
    body: BodyId,
    surface: SurfaceKind,
    normal: Option<[f64; 3]>,
    centroid: [f64; 3],
    area: f64,
    loops: Vec<LoopId>,
}

#[derive(Debug, Clone)]
struct MockLoop {
    edges: Vec<EdgeId>,
}

#[derive(Debug, Clone)]
struct MockEdge {
    body: BodyId,
    curve: EdgeCurve,
}

/// Deterministic in-memory solid-modeling host.
pub struct MockHost {
    next_id: u64,
    components: HashMap<u64, MockComponent>,
    component_order: Vec<ComponentId>,
    sketches: HashMap<u64, MockSketch>,
    profiles: HashMap<u64, MockProfile>,
    features: HashMap<u64, MockFeature>,
    bodies: HashMap<u64, MockBody>,
    faces: HashMap<u64, MockFace>,
    loops: HashMap<u64, MockLoop>,
    edges: HashMap<u64, MockEdge>,
    attributes: HashMap<(String, String), String>,
    length_units: String,
    messages: Vec<(String, String)>,
    refuse_components: bool,
    thread_data: bool,
    find_profiles: bool,
}

impl MockHost {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            components: HashMap::new(),
            component_order: Vec::new(),
            sketches: HashMap::new(),
            profiles: HashMap::new(),
            features: HashMap::new(),
            bodies: HashMap::new(),
            faces: HashMap::new(),
            loops: HashMap::new(),
            edges: HashMap::new(),
            attributes: HashMap::new(),
            length_units: "cm".to_string(),
            messages: Vec::new(),
            refuse_components: false,
            thread_data: true,
            find_profiles: true,
        }
    }

    /// `add_component` returns `Ok(None)` from now on.
    pub fn with_component_failure(mut self) -> Self {
        self.refuse_components = true;
        self
    }

    /// `recommend_thread` never finds a size.
    pub fn without_thread_data(mut self) -> Self {
        self.thread_data = false;
        self
    }

    /// Sketches never resolve closed profiles.
    pub fn without_profiles(mut self) -> Self {
        self.find_profiles = false;
        self
    }

    pub fn with_length_units(mut self, units: &str) -> Self {
        self.length_units = units.to_string();
        self
    }

    pub fn face_area(&self, face: FaceId) -> Option<f64> {
        self.faces.get(&face.0).map(|f| f.area)
    }

    /// Messages shown through `message_box`, as (message, title).
    pub fn messages(&self) -> &[(String, String)] {
        &self.messages
    }

    fn alloc(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn component(&self, id: ComponentId) -> Result<&MockComponent, HostError> {
        self.components.get(&id.0).ok_or(HostError::EntityNotFound {
            kind: EntityKind::Component,
            id: id.0,
        })
    }

    fn component_mut(&mut self, id: ComponentId) -> Result<&mut MockComponent, HostError> {
        self.components.get_mut(&id.0).ok_or(HostError::EntityNotFound {
            kind: EntityKind::Component,
            id: id.0,
        })
    }

    fn sketch_mut(&mut self, id: SketchId) -> Result<&mut MockSketch, HostError> {
        self.sketches.get_mut(&id.0).ok_or(HostError::EntityNotFound {
            kind: EntityKind::Sketch,
            id: id.0,
        })
    }

    fn face(&self, id: FaceId) -> Result<&MockFace, HostError> {
        self.faces.get(&id.0).ok_or(HostError::EntityNotFound {
            kind: EntityKind::Face,
            id: id.0,
        })
    }

    fn edge(&self, id: EdgeId) -> Result<&MockEdge, HostError> {
        self.edges.get(&id.0).ok_or(HostError::EntityNotFound {
            kind: EntityKind::Edge,
            id: id.0,
        })
    }

    fn new_body(&mut self, component: ComponentId) -> Result<BodyId, HostError> {
        let id = BodyId(self.alloc());
        let comp = self.component_mut(component)?;
        comp.bodies.push(id);
        let name = format!("Body{}", comp.bodies.len());
        self.bodies.insert(
            id.0,
            MockBody {
                name,
                faces: Vec::new(),
            },
        );
        Ok(id)
    }

    /// Most recent body of a component, the target for join and cut.
    fn target_body(&self, component: ComponentId, operation: &str) -> Result<BodyId, HostError> {
        self.component(component)?
            .bodies
            .last()
            .copied()
            .ok_or(HostError::NotSupported {
                operation: format!("{operation} without an existing body"),
            })
    }

    fn new_edge(&mut self, body: BodyId, curve: EdgeCurve) -> EdgeId {
        let id = EdgeId(self.alloc());
        self.edges.insert(id.0, MockEdge { body, curve });
        id
    }

    fn new_loop(&mut self, edges: Vec<EdgeId>) -> LoopId {
        let id = LoopId(self.alloc());
        self.loops.insert(id.0, MockLoop { edges });
        id
    }

    fn new_face(
        &mut self,
        body: BodyId,
        surface: SurfaceKind,
        normal: Option<[f64; 3]>,
        centroid: [f64; 3],
        area: f64,
        loops: Vec<LoopId>,
    ) -> FaceId {
        let id = FaceId(self.alloc());
        self.faces.insert(
            id.0,
            MockFace {
                body,
                surface,
                normal,
                centroid,
                area,
                loops,
            },
        );
        if let Some(b) = self.bodies.get_mut(&body.0) {
            b.faces.push(id);
        }
        id
    }

    /// Detach a face from its body and from every feature that lists it.
    fn remove_face(&mut self, face: FaceId) {
        if let Some(f) = self.faces.remove(&face.0) {
            if let Some(b) = self.bodies.get_mut(&f.body.0) {
                b.faces.retain(|x| *x != face);
            }
            for lp in f.loops {
                self.loops.remove(&lp.0);
            }
        }
        for feature in self.features.values_mut() {
            feature.forget_face(face);
        }
    }

    fn insert_feature(&mut self, feature: MockFeature) -> Result<FeatureId, HostError> {
        let id = FeatureId(self.alloc());
        let component = feature.component;
        self.features.insert(id.0, feature);
        self.component_mut(component)?.features.push(id);
        debug!(?component, feature = ?id, "feature added");
        Ok(id)
    }

    /// Boundary edges of a profile placed at `offset` along the plane normal.
    fn boundary_edges(
        &mut self,
        body: BodyId,
        plane: ConstructionPlane,
        boundary: &Boundary,
        offset: f64,
    ) -> Vec<EdgeId> {
        let shift = scale(plane.normal(), offset);
        match boundary {
            Boundary::Polygon(pts) => {
                let model: Vec<[f64; 3]> = pts
                    .iter()
                    .map(|p| add(plane.sketch_to_model(*p), shift))
                    .collect();
                (0..model.len())
                    .map(|i| {
                        let curve = EdgeCurve::Line {
                            start: model[i],
                            end: model[(i + 1) % model.len()],
                        };
                        self.new_edge(body, curve)
                    })
                    .collect()
            }
            Boundary::Circle { center, radius } => {
                let curve = EdgeCurve::Circle {
                    center: add(plane.sketch_to_model(*center), shift),
                    normal: plane.normal(),
                    radius: *radius,
                };
                vec![self.new_edge(body, curve)]
            }
        }
    }

    /// Find a planar face of `body` coplanar with, and facing against,
    /// a cap with the given centroid and normal.
    fn opposing_face(&self, body: BodyId, centroid: [f64; 3], normal: [f64; 3]) -> Option<FaceId> {
        self.bodies.get(&body.0)?.faces.iter().copied().find(|id| {
            self.faces.get(&id.0).is_some_and(|f| {
                f.surface == SurfaceKind::Planar
                    && f.normal.is_some_and(|n| dot(n, normal) < -1.0 + TOL)
                    && dot(sub(f.centroid, centroid), normal).abs() < TOL
            })
        })
    }

    fn recompute_profiles(&mut self, sketch: SketchId) -> Result<(), HostError> {
        let curves = self.sketch_mut(sketch)?.curves.clone();
        let stale = std::mem::take(&mut self.sketch_mut(sketch)?.profiles);
        for p in stale {
            self.profiles.remove(&p.0);
        }

        let mut ids = Vec::new();
        if !self.find_profiles {
            self.sketch_mut(sketch)?.profiles = ids;
            return Ok(());
        }
        for boundary in find_boundaries(&curves) {
            let id = ProfileId(self.alloc());
            self.profiles.insert(id.0, MockProfile { sketch, boundary });
            ids.push(id);
        }
        self.sketch_mut(sketch)?.profiles = ids;
        Ok(())
    }

    fn profile_with_plane(
        &self,
        profile: ProfileId,
    ) -> Result<(MockProfile, ConstructionPlane), HostError> {
        let p = self
            .profiles
            .get(&profile.0)
            .cloned()
            .ok_or(HostError::EntityNotFound {
                kind: EntityKind::Profile,
                id: profile.0,
            })?;
        let plane = self
            .sketches
            .get(&p.sketch.0)
            .map(|s| s.plane)
            .ok_or(HostError::EntityNotFound {
                kind: EntityKind::Sketch,
                id: p.sketch.0,
            })?;
        Ok((p, plane))
    }
}

impl Default for MockHost {
    fn default() -> Self {
        Self::new()
    }
}

/// Extract closed boundaries from sketch curves in curve order.
/// Every circle is a boundary; lines form a boundary when they chain
/// end-to-end back to their first point.
fn find_boundaries(curves: &[(CurveId, SketchCurve)]) -> Vec<Boundary> {
    let lines: Vec<(usize, [f64; 3], [f64; 3])> = curves
        .iter()
        .enumerate()
        .filter_map(|(i, (_, c))| match c {
            SketchCurve::Line { start, end } => Some((i, *start, *end)),
            SketchCurve::Circle { .. } => None,
        })
        .collect();
    let mut used = vec![false; lines.len()];
    let mut found = Vec::new();

    for (i, (_, curve)) in curves.iter().enumerate() {
        match curve {
            SketchCurve::Circle { center, radius } => found.push(Boundary::Circle {
                center: *center,
                radius: *radius,
            }),
            SketchCurve::Line { .. } => {
                let Some(first) = lines.iter().position(|l| l.0 == i) else {
                    continue;
                };
                if used[first] {
                    continue;
                }
                used[first] = true;
                let (_, origin, mut cursor) = lines[first];
                let mut points = vec![origin];
                let closed = loop {
                    if same_point(cursor, origin) {
                        break true;
                    }
                    points.push(cursor);
                    let next = lines.iter().enumerate().find(|(k, l)| {
                        !used[*k] && (same_point(l.1, cursor) || same_point(l.2, cursor))
                    });
                    match next {
                        Some((k, l)) => {
                            used[k] = true;
                            cursor = if same_point(l.1, cursor) { l.2 } else { l.1 };
                        }
                        None => break false,
                    }
                };
                if closed && points.len() >= 3 {
                    found.push(Boundary::Polygon(points));
                }
            }
        }
    }
    found
}

impl SolidHost for MockHost {
    fn add_component(&mut self) -> Result<Option<ComponentId>, HostError> {
        if self.refuse_components {
            return Ok(None);
        }
        let id = ComponentId(self.alloc());
        self.components.insert(
            id.0,
            MockComponent {
                sketches: Vec::new(),
                features: Vec::new(),
                bodies: Vec::new(),
            },
        );
        self.component_order.push(id);
        Ok(Some(id))
    }

    fn delete_component(&mut self, component: ComponentId) -> Result<(), HostError> {
        let comp = self
            .components
            .remove(&component.0)
            .ok_or(HostError::EntityNotFound {
                kind: EntityKind::Component,
                id: component.0,
            })?;
        self.component_order.retain(|c| *c != component);

        for sketch in comp.sketches {
            if let Some(s) = self.sketches.remove(&sketch.0) {
                for p in s.profiles {
                    self.profiles.remove(&p.0);
                }
            }
        }
        for feature in comp.features {
            self.features.remove(&feature.0);
        }
        for body in &comp.bodies {
            if let Some(b) = self.bodies.remove(&body.0) {
                for face in b.faces {
                    if let Some(f) = self.faces.remove(&face.0) {
                        for lp in f.loops {
                            self.loops.remove(&lp.0);
                        }
                    }
                }
            }
        }
        self.edges.retain(|_, e| !comp.bodies.contains(&e.body));
        debug!(?component, "component deleted");
        Ok(())
    }

    fn add_sketch(
        &mut self,
        component: ComponentId,
        plane: ConstructionPlane,
    ) -> Result<SketchId, HostError> {
        self.component(component)?;
        let id = SketchId(self.alloc());
        self.sketches.insert(
            id.0,
            MockSketch {
                plane,
                curves: Vec::new(),
                profiles: Vec::new(),
            },
        );
        self.component_mut(component)?.sketches.push(id);
        Ok(id)
    }

    fn add_line(
        &mut self,
        sketch: SketchId,
        start: [f64; 3],
        end: [f64; 3],
    ) -> Result<CurveId, HostError> {
        if same_point(start, end) {
            return Err(HostError::InvalidInput {
                reason: "line endpoints coincide".to_string(),
            });
        }
        let id = CurveId(self.alloc());
        self.sketch_mut(sketch)?
            .curves
            .push((id, SketchCurve::Line { start, end }));
        self.recompute_profiles(sketch)?;
        Ok(id)
    }

    fn add_circle(
        &mut self,
        sketch: SketchId,
        center: [f64; 3],
        radius: f64,
    ) -> Result<CurveId, HostError> {
        if radius <= 0.0 {
            return Err(HostError::InvalidInput {
                reason: format!("circle radius must be positive, got {radius}"),
            });
        }
        let id = CurveId(self.alloc());
        self.sketch_mut(sketch)?
            .curves
            .push((id, SketchCurve::Circle { center, radius }));
        self.recompute_profiles(sketch)?;
        Ok(id)
    }

    fn extrude(
        &mut self,
        component: ComponentId,
        input: &ExtrudeInput,
    ) -> Result<FeatureId, HostError> {
        self.component(component)?;
        if input.extent.distance <= 0.0 {
            return Err(HostError::InvalidInput {
                reason: "extrude distance must be positive".to_string(),
            });
        }
        let (profile, plane) = self.profile_with_plane(input.profile)?;
        let body = match input.operation {
            FeatureOperation::NewBody => self.new_body(component)?,
            FeatureOperation::Join => self.target_body(component, "join")?,
            FeatureOperation::Cut => {
                return Err(HostError::NotSupported {
                    operation: "cut extrude".to_string(),
                })
            }
        };

        let n = plane.normal();
        let d = input.extent.signed_distance();
        let sign = input.extent.direction.sign();
        let area = profile.boundary.area();
        let base = plane.sketch_to_model(profile.boundary.centroid());
        let start_normal = scale(n, -sign);
        let mut feature = MockFeature::new(component, FeatureDefinition::Extrude(input.clone()));

        let start_edges = self.boundary_edges(body, plane, &profile.boundary, 0.0);
        let end_edges = self.boundary_edges(body, plane, &profile.boundary, d);

        // A joined cap lying against an existing face fuses with it: the
        // smaller cap becomes an inner loop of the larger one.
        let opposing = match input.operation {
            FeatureOperation::Join => self.opposing_face(body, base, start_normal),
            _ => None,
        };
        let opposing = match opposing {
            Some(face) => Some((face, self.face(face)?.area)),
            None => None,
        };
        match opposing {
            Some((existing, existing_area)) if existing_area > area => {
                let inner = self.new_loop(start_edges.clone());
                if let Some(f) = self.faces.get_mut(&existing.0) {
                    f.loops.push(inner);
                    f.area -= area;
                }
            }
            Some((existing, existing_area)) => {
                let absorbed = self.face(existing)?.clone();
                let inner_edges = absorbed
                    .loops
                    .first()
                    .and_then(|lp| self.loops.get(&lp.0))
                    .map(|lp| lp.edges.clone())
                    .unwrap_or_default();
                self.remove_face(existing);
                let outer = self.new_loop(start_edges.clone());
                let inner = self.new_loop(inner_edges);
                let face = self.new_face(
                    body,
                    SurfaceKind::Planar,
                    Some(start_normal),
                    base,
                    area - existing_area,
                    vec![outer, inner],
                );
                feature.start_faces.push(face);
            }
            None => {
                let outer = self.new_loop(start_edges.clone());
                let face = self.new_face(
                    body,
                    SurfaceKind::Planar,
                    Some(start_normal),
                    base,
                    area,
                    vec![outer],
                );
                feature.start_faces.push(face);
            }
        }

        let end_loop = self.new_loop(end_edges.clone());
        let end_face = self.new_face(
            body,
            SurfaceKind::Planar,
            Some(scale(n, sign)),
            add(base, scale(n, d)),
            area,
            vec![end_loop],
        );
        feature.end_faces.push(end_face);

        match &profile.boundary {
            Boundary::Polygon(pts) => {
                let model: Vec<[f64; 3]> = pts.iter().map(|p| plane.sketch_to_model(*p)).collect();
                let verticals: Vec<EdgeId> = model
                    .iter()
                    .map(|p| {
                        let curve = EdgeCurve::Line {
                            start: *p,
                            end: add(*p, scale(n, d)),
                        };
                        self.new_edge(body, curve)
                    })
                    .collect();
                for k in 0..model.len() {
                    let next = (k + 1) % model.len();
                    let along = sub(model[next], model[k]);
                    let mid = scale(add(model[k], model[next]), 0.5);
                    let mut outward = normalize(cross(along, n));
                    if dot(outward, sub(mid, base)) < 0.0 {
                        outward = scale(outward, -1.0);
                    }
                    let lp = self.new_loop(vec![
                        start_edges[k],
                        verticals[next],
                        end_edges[k],
                        verticals[k],
                    ]);
                    let face = self.new_face(
                        body,
                        SurfaceKind::Planar,
                        Some(outward),
                        add(mid, scale(n, d / 2.0)),
                        norm(along) * d.abs(),
                        vec![lp],
                    );
                    feature.side_faces.push(face);
                }
            }
            Boundary::Circle { radius, .. } => {
                let bottom = self.new_loop(start_edges.clone());
                let top = self.new_loop(end_edges.clone());
                let face = self.new_face(
                    body,
                    SurfaceKind::Cylindrical,
                    None,
                    add(base, scale(n, d / 2.0)),
                    TAU * radius * d.abs(),
                    vec![bottom, top],
                );
                feature.side_faces.push(face);
            }
        }

        self.insert_feature(feature)
    }

    fn revolve(
        &mut self,
        component: ComponentId,
        input: &RevolveInput,
    ) -> Result<FeatureId, HostError> {
        self.component(component)?;
        if input.angle <= 0.0 || input.angle > TAU + TOL {
            return Err(HostError::InvalidInput {
                reason: format!("revolve angle {} outside (0, 2π]", input.angle),
            });
        }
        let (profile, plane) = self.profile_with_plane(input.profile)?;
        let body = match input.operation {
            FeatureOperation::NewBody => self.new_body(component)?,
            FeatureOperation::Join => self.target_body(component, "join")?,
            FeatureOperation::Cut => self.target_body(component, "cut")?,
        };

        // Pappus: swept area of the boundary centroid around the axis.
        let axis = input.axis.direction();
        let centroid = plane.sketch_to_model(profile.boundary.centroid());
        let radial = sub(centroid, scale(axis, dot(centroid, axis)));
        let radius = norm(radial);
        let curve = EdgeCurve::Circle {
            center: scale(axis, dot(centroid, axis)),
            normal: axis,
            radius,
        };
        let edge = self.new_edge(body, curve);
        let lp = self.new_loop(vec![edge]);
        let face = self.new_face(
            body,
            SurfaceKind::Revolved,
            None,
            scale(axis, dot(centroid, axis)),
            profile.boundary.area() * radius * input.angle,
            vec![lp],
        );
        let mut feature = MockFeature::new(component, FeatureDefinition::Revolve(input.clone()));
        feature.other_faces.push(face);
        self.insert_feature(feature)
    }

    fn chamfer(
        &mut self,
        component: ComponentId,
        edges: &[EdgeId],
        distance: f64,
    ) -> Result<FeatureId, HostError> {
        self.component(component)?;
        if distance <= 0.0 {
            return Err(HostError::InvalidInput {
                reason: "chamfer distance must be positive".to_string(),
            });
        }
        let mut feature = MockFeature::new(
            component,
            FeatureDefinition::Chamfer {
                edges: edges.to_vec(),
                distance,
            },
        );
        for &edge in edges {
            let source = self.edge(edge)?.clone();
            let lp = self.new_loop(vec![edge]);
            let face = self.new_face(
                source.body,
                SurfaceKind::Chamfer,
                None,
                curve_midpoint(&source.curve),
                source.curve.length() * distance * SQRT_2,
                vec![lp],
            );
            feature.other_faces.push(face);
        }
        self.insert_feature(feature)
    }

    fn fillet(
        &mut self,
        component: ComponentId,
        edges: &[EdgeId],
        radius: f64,
    ) -> Result<FeatureId, HostError> {
        self.component(component)?;
        if radius <= 0.0 {
            return Err(HostError::InvalidInput {
                reason: "fillet radius must be positive".to_string(),
            });
        }
        let mut feature = MockFeature::new(
            component,
            FeatureDefinition::Fillet {
                edges: edges.to_vec(),
                radius,
            },
        );
        for &edge in edges {
            let source = self.edge(edge)?.clone();
            let lp = self.new_loop(vec![edge]);
            let face = self.new_face(
                source.body,
                SurfaceKind::Fillet,
                None,
                curve_midpoint(&source.curve),
                source.curve.length() * radius * FRAC_PI_2,
                vec![lp],
            );
            feature.other_faces.push(face);
        }
        self.insert_feature(feature)
    }

    fn default_metric_thread_type(&self) -> String {
        thread_table::ISO_METRIC_PROFILE.to_string()
    }

    fn recommend_thread(
        &self,
        diameter: f64,
        is_internal: bool,
        thread_type: &str,
    ) -> Option<ThreadRecommendation> {
        if !self.thread_data || thread_type != thread_table::ISO_METRIC_PROFILE {
            return None;
        }
        thread_table::recommend(diameter, is_internal)
    }

    fn add_thread(
        &mut self,
        component: ComponentId,
        input: &ThreadInput,
    ) -> Result<FeatureId, HostError> {
        self.component(component)?;
        if input.faces.is_empty() {
            return Err(HostError::InvalidInput {
                reason: "thread needs at least one face".to_string(),
            });
        }
        if thread_table::pitch_cm(&input.info.designation).is_none() {
            return Err(HostError::InvalidInput {
                reason: format!("unknown thread designation {}", input.info.designation),
            });
        }
        for &face in &input.faces {
            if self.face(face)?.surface != SurfaceKind::Cylindrical {
                return Err(HostError::InvalidInput {
                    reason: format!("face {face:?} is not cylindrical"),
                });
            }
        }

        let mut feature = MockFeature::new(component, FeatureDefinition::Thread(input.clone()));
        if !input.is_modeled {
            feature.other_faces.extend(input.faces.iter().copied());
            return self.insert_feature(feature);
        }

        // 60° flanks: each flank is the cylinder area over 2·cos 30°.
        let flank_factor = 1.0 / (2.0 * (std::f64::consts::PI / 6.0).cos());
        for &face in &input.faces {
            let source = self.face(face)?.clone();
            let boundary: Vec<Vec<EdgeId>> = source
                .loops
                .iter()
                .filter_map(|lp| self.loops.get(&lp.0).map(|l| l.edges.clone()))
                .collect();
            // The allowance comes off the diameter, so the flanks sit closer to the axis.
            let shrink = boundary
                .first()
                .and_then(|edges| edges.first())
                .and_then(|e| self.edges.get(&e.0))
                .and_then(|e| match e.curve {
                    EdgeCurve::Circle { radius, .. } if radius > 0.0 => {
                        Some(((radius - input.info.allowance / 2.0) / radius).max(0.0))
                    }
                    _ => None,
                })
                .unwrap_or(1.0);
            self.remove_face(face);
            for (k, fraction) in [flank_factor, flank_factor, 0.125].into_iter().enumerate() {
                let edges = boundary.get(k).cloned().unwrap_or_default();
                let lp = self.new_loop(edges);
                let thread_face = self.new_face(
                    source.body,
                    SurfaceKind::Thread,
                    None,
                    source.centroid,
                    source.area * fraction * shrink,
                    vec![lp],
                );
                feature.other_faces.push(thread_face);
            }
        }
        self.insert_feature(feature)
    }

    fn offset_faces(
        &mut self,
        component: ComponentId,
        input: &OffsetInput,
    ) -> Result<FeatureId, HostError> {
        self.component(component)?;
        if input.operation != FeatureOperation::NewBody {
            return Err(HostError::NotSupported {
                operation: format!("{:?} offset", input.operation),
            });
        }
        if input.faces.is_empty() || input.distance == 0.0 {
            return Err(HostError::InvalidInput {
                reason: "offset needs faces and a non-zero distance".to_string(),
            });
        }
        let sources: Vec<MockFace> = input
            .faces
            .iter()
            .map(|f| self.face(*f).cloned())
            .collect::<Result<_, _>>()?;

        let body = self.new_body(component)?;
        let mut feature = MockFeature::new(component, FeatureDefinition::Offset(input.clone()));
        for source in sources {
            let curves: Vec<Vec<EdgeCurve>> = source
                .loops
                .iter()
                .filter_map(|lp| self.loops.get(&lp.0))
                .map(|lp| {
                    lp.edges
                        .iter()
                        .filter_map(|e| self.edges.get(&e.0).map(|e| e.curve))
                        .collect()
                })
                .collect();
            let loops = curves
                .into_iter()
                .map(|cs| {
                    let edges = cs.into_iter().map(|c| self.new_edge(body, c)).collect();
                    self.new_loop(edges)
                })
                .collect();
            let centroid = match source.normal {
                Some(n) => add(source.centroid, scale(n, input.distance)),
                None => source.centroid,
            };
            let face = self.new_face(
                body,
                SurfaceKind::Offset,
                source.normal,
                centroid,
                source.area,
                loops,
            );
            feature.other_faces.push(face);
        }
        self.insert_feature(feature)
    }

    fn set_body_name(&mut self, body: BodyId, name: &str) -> Result<(), HostError> {
        let b = self
            .bodies
            .get_mut(&body.0)
            .ok_or(HostError::EntityNotFound {
                kind: EntityKind::Body,
                id: body.0,
            })?;
        b.name = name.to_string();
        Ok(())
    }

    fn message_box(&mut self, message: &str, title: &str) {
        self.messages.push((message.to_string(), title.to_string()));
    }
}

impl HostIntrospect for MockHost {
    fn components(&self) -> Vec<ComponentId> {
        self.component_order.clone()
    }

    fn component_sketches(&self, component: ComponentId) -> Vec<SketchId> {
        self.components
            .get(&component.0)
            .map(|c| c.sketches.clone())
            .unwrap_or_default()
    }

    fn component_features(&self, component: ComponentId) -> Vec<FeatureId> {
        self.components
            .get(&component.0)
            .map(|c| c.features.clone())
            .unwrap_or_default()
    }

    fn component_bodies(&self, component: ComponentId) -> Vec<BodyId> {
        self.components
            .get(&component.0)
            .map(|c| c.bodies.clone())
            .unwrap_or_default()
    }

    fn sketch_plane(&self, sketch: SketchId) -> Option<ConstructionPlane> {
        self.sketches.get(&sketch.0).map(|s| s.plane)
    }

    fn sketch_curves(&self, sketch: SketchId) -> Vec<SketchCurve> {
        self.sketches
            .get(&sketch.0)
            .map(|s| s.curves.iter().map(|(_, c)| *c).collect())
            .unwrap_or_default()
    }

    fn sketch_profiles(&self, sketch: SketchId) -> Vec<ProfileId> {
        self.sketches
            .get(&sketch.0)
            .map(|s| s.profiles.clone())
            .unwrap_or_default()
    }

    fn model_to_sketch_space(
        &self,
        sketch: SketchId,
        point: [f64; 3],
    ) -> Result<[f64; 3], HostError> {
        self.sketch_plane(sketch)
            .map(|plane| plane.model_to_sketch(point))
            .ok_or(HostError::EntityNotFound {
                kind: EntityKind::Sketch,
                id: sketch.0,
            })
    }

    fn feature_definition(&self, feature: FeatureId) -> Option<FeatureDefinition> {
        self.features.get(&feature.0).map(|f| f.definition.clone())
    }

    fn feature_faces(&self, feature: FeatureId) -> Vec<FaceId> {
        self.features
            .get(&feature.0)
            .map(|f| {
                f.start_faces
                    .iter()
                    .chain(&f.end_faces)
                    .chain(&f.side_faces)
                    .chain(&f.other_faces)
                    .copied()
                    .collect()
            })
            .unwrap_or_default()
    }

    fn feature_start_faces(&self, feature: FeatureId) -> Vec<FaceId> {
        self.features
            .get(&feature.0)
            .map(|f| f.start_faces.clone())
            .unwrap_or_default()
    }

    fn feature_end_faces(&self, feature: FeatureId) -> Vec<FaceId> {
        self.features
            .get(&feature.0)
            .map(|f| f.end_faces.clone())
            .unwrap_or_default()
    }

    fn feature_side_faces(&self, feature: FeatureId) -> Vec<FaceId> {
        self.features
            .get(&feature.0)
            .map(|f| f.side_faces.clone())
            .unwrap_or_default()
    }

    fn face_body(&self, face: FaceId) -> Option<BodyId> {
        self.faces.get(&face.0).map(|f| f.body)
    }

    fn face_surface(&self, face: FaceId) -> Option<SurfaceKind> {
        self.faces.get(&face.0).map(|f| f.surface)
    }

    fn face_loops(&self, face: FaceId) -> Vec<LoopId> {
        self.faces
            .get(&face.0)
            .map(|f| f.loops.clone())
            .unwrap_or_default()
    }

    fn face_edges(&self, face: FaceId) -> Vec<EdgeId> {
        self.face_loops(face)
            .into_iter()
            .flat_map(|lp| self.loop_edges(lp))
            .collect()
    }

    fn loop_edges(&self, lp: LoopId) -> Vec<EdgeId> {
        self.loops
            .get(&lp.0)
            .map(|l| l.edges.clone())
            .unwrap_or_default()
    }

    fn edge_curve(&self, edge: EdgeId) -> Option<EdgeCurve> {
        self.edges.get(&edge.0).map(|e| e.curve)
    }

    fn body_name(&self, body: BodyId) -> Option<String> {
        self.bodies.get(&body.0).map(|b| b.name.clone())
    }

    fn body_faces(&self, body: BodyId) -> Vec<FaceId> {
        self.bodies
            .get(&body.0)
            .map(|b| b.faces.clone())
            .unwrap_or_default()
    }
}

impl DesignAttributes for MockHost {
    fn attribute(&self, group: &str, name: &str) -> Option<String> {
        self.attributes
            .get(&(group.to_string(), name.to_string()))
            .cloned()
    }

    fn set_attribute(&mut self, group: &str, name: &str, value: &str) {
        self.attributes
            .insert((group.to_string(), name.to_string()), value.to_string());
    }

    fn default_length_units(&self) -> String {
        self.length_units.clone()
    }
}

fn curve_midpoint(curve: &EdgeCurve) -> [f64; 3] {
    match curve {
        EdgeCurve::Line { start, end } => scale(add(*start, *end), 0.5),
        EdgeCurve::Circle { center, .. } => *center,
    }
}

fn same_point(a: [f64; 3], b: [f64; 3]) -> bool {
    norm(sub(a, b)) < TOL
}

fn add(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

fn sub(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

fn scale(a: [f64; 3], s: f64) -> [f64; 3] {
    [a[0] * s, a[1] * s, a[2] * s]
}

fn dot(a: [f64; 3], b: [f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn cross(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn norm(a: [f64; 3]) -> f64 {
    dot(a, a).sqrt()
}

fn normalize(a: [f64; 3]) -> [f64; 3] {
    let len = norm(a);
    if len > 1e-12 {
        scale(a, 1.0 / len)
    } else {
        [0.0, 0.0, 1.0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(host: &mut MockHost, sketch: SketchId) {
        let pts = [
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [1.0, 1.0, 0.0],
            [0.0, 1.0, 0.0],
        ];
        for i in 0..4 {
            host.add_line(sketch, pts[i], pts[(i + 1) % 4]).unwrap();
        }
    }

    #[test]
    fn open_chain_has_no_profile() {
        let mut host = MockHost::new();
        let c = host.add_component().unwrap().unwrap();
        let s = host.add_sketch(c, ConstructionPlane::XY).unwrap();
        host.add_line(s, [0.0, 0.0, 0.0], [1.0, 0.0, 0.0]).unwrap();
        host.add_line(s, [1.0, 0.0, 0.0], [1.0, 1.0, 0.0]).unwrap();
        assert!(host.sketch_profiles(s).is_empty());
    }

    #[test]
    fn closed_square_is_one_profile() {
        let mut host = MockHost::new();
        let c = host.add_component().unwrap().unwrap();
        let s = host.add_sketch(c, ConstructionPlane::XY).unwrap();
        square(&mut host, s);
        assert_eq!(host.sketch_profiles(s).len(), 1);
        let (profile, _) = host.profile_with_plane(host.sketch_profiles(s)[0]).unwrap();
        assert!((profile.boundary.area() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn reversed_lines_still_close() {
        let boundaries = find_boundaries(&[
            (CurveId(1), SketchCurve::Line { start: [1.0, 0.0, 0.0], end: [0.0, 0.0, 0.0] }),
            (CurveId(2), SketchCurve::Line { start: [0.0, 1.0, 0.0], end: [1.0, 0.0, 0.0] }),
            (CurveId(3), SketchCurve::Line { start: [0.0, 0.0, 0.0], end: [0.0, 1.0, 0.0] }),
        ]);
        assert_eq!(boundaries.len(), 1);
        assert!((boundaries[0].area() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn extruded_square_has_caps_then_sides() {
        let mut host = MockHost::new();
        let c = host.add_component().unwrap().unwrap();
        let s = host.add_sketch(c, ConstructionPlane::XY).unwrap();
        square(&mut host, s);
        let input = ExtrudeInput {
            profile: host.sketch_profiles(s)[0],
            operation: FeatureOperation::NewBody,
            extent: DistanceExtent::positive(2.0),
        };
        let f = host.extrude(c, &input).unwrap();
        assert_eq!(host.feature_faces(f).len(), 6);
        assert_eq!(host.feature_start_faces(f).len(), 1);
        assert_eq!(host.feature_end_faces(f).len(), 1);
        assert_eq!(host.feature_side_faces(f).len(), 4);

        let end = host.feature_end_faces(f)[0];
        let face = host.face(end).unwrap();
        assert_eq!(face.normal, Some([0.0, 0.0, 1.0]));
        assert!((face.centroid[2] - 2.0).abs() < 1e-12);
        for side in host.feature_side_faces(f) {
            assert_eq!(host.face_edges(side).len(), 4);
        }
    }

    #[test]
    fn join_without_body_is_rejected() {
        let mut host = MockHost::new();
        let c = host.add_component().unwrap().unwrap();
        let s = host.add_sketch(c, ConstructionPlane::XY).unwrap();
        host.add_circle(s, [0.0, 0.0, 0.0], 1.0).unwrap();
        let input = ExtrudeInput {
            profile: host.sketch_profiles(s)[0],
            operation: FeatureOperation::Join,
            extent: DistanceExtent::negative(1.0),
        };
        assert!(matches!(
            host.extrude(c, &input),
            Err(HostError::NotSupported { .. })
        ));
    }

    #[test]
    fn delete_component_removes_everything() {
        let mut host = MockHost::new();
        let c = host.add_component().unwrap().unwrap();
        let s = host.add_sketch(c, ConstructionPlane::XY).unwrap();
        host.add_circle(s, [0.0, 0.0, 0.0], 1.0).unwrap();
        let input = ExtrudeInput {
            profile: host.sketch_profiles(s)[0],
            operation: FeatureOperation::NewBody,
            extent: DistanceExtent::positive(1.0),
        };
        host.extrude(c, &input).unwrap();
        host.delete_component(c).unwrap();

        assert!(host.components().is_empty());
        assert!(host.faces.is_empty());
        assert!(host.edges.is_empty());
        assert!(host.loops.is_empty());
        assert!(host.profiles.is_empty());
    }
}
