use approx::assert_relative_eq;

use bolt_ops::{
    build_bolt, BacklashPolicy, BoltBuilder, BoltOutput, BoltParameters, BuildError, BuildOptions,
    ParameterError, OFFSET_SHELL_DISTANCE,
};
use solid_host::{
    ComponentId, ConstructionAxis, EdgeCurve, ExtentDirection, FaceId, FeatureDefinition,
    FeatureOperation, HostIntrospect, MockHost, SketchCurve, SurfaceKind,
};

/// The hexagon scenario: M12-sized shaft under a 2.0 head.
fn hex_params() -> BoltParameters {
    BoltParameters {
        body_diameter: 1.2,
        body_length: 2.4,
        head_diameter: 2.0,
        head_height: 0.5,
        head_sides: 6,
        ..Default::default()
    }
}

fn headless_params() -> BoltParameters {
    BoltParameters {
        head_sides: 0,
        ..hex_params()
    }
}

fn build(params: &BoltParameters, host: &mut MockHost) -> BoltOutput {
    BoltBuilder::default().build(params, host).unwrap()
}

fn definitions(host: &MockHost, component: ComponentId) -> Vec<FeatureDefinition> {
    host.component_features(component)
        .into_iter()
        .filter_map(|f| host.feature_definition(f))
        .collect()
}

fn count(host: &MockHost, component: ComponentId, name: &str) -> usize {
    definitions(host, component)
        .iter()
        .filter(|d| d.name() == name)
        .count()
}

fn thread_area(host: &MockHost, faces: &[FaceId]) -> f64 {
    faces.iter().filter_map(|f| host.face_area(*f)).sum()
}

// ── Head ───────────────────────────────────────────────────────────────────

#[test]
fn hexagon_head_is_six_lines_on_unit_circle() {
    let mut host = MockHost::new();
    let out = build(&hex_params(), &mut host);

    let curves = host.sketch_curves(out.head.sketch);
    assert_eq!(curves.len(), 6);
    for curve in curves {
        let SketchCurve::Line { start, end } = curve else {
            panic!("head sketch should only hold lines, got {curve:?}");
        };
        for p in [start, end] {
            assert_relative_eq!((p[0] * p[0] + p[1] * p[1]).sqrt(), 1.0, epsilon = 1e-12);
        }
    }
    assert_eq!(host.sketch_profiles(out.head.sketch).len(), 1);
}

#[test]
fn head_is_new_body_extruded_up_by_head_height() {
    let mut host = MockHost::new();
    let out = build(&hex_params(), &mut host);

    let Some(FeatureDefinition::Extrude(input)) = host.feature_definition(out.head.feature) else {
        panic!("head feature should be an extrude");
    };
    assert_eq!(input.operation, FeatureOperation::NewBody);
    assert_eq!(input.extent.direction, ExtentDirection::Positive);
    assert_relative_eq!(input.extent.distance, 0.5);
}

#[test]
fn headless_base_is_hundredth_of_body_diameter() {
    let mut host = MockHost::new();
    let out = build(&headless_params(), &mut host);

    let curves = host.sketch_curves(out.head.sketch);
    assert_eq!(curves.len(), 1);
    match curves[0] {
        SketchCurve::Circle { center, radius } => {
            assert_eq!(center, [0.0, 0.0, 0.0]);
            assert_relative_eq!(radius, 0.012, epsilon = 1e-15);
        }
        other => panic!("expected a circle, got {other:?}"),
    }
}

#[test]
fn headless_stub_ignores_head_dimensions() {
    let mut host = MockHost::new();
    let params = BoltParameters {
        head_diameter: 0.1,
        ..headless_params()
    };
    let out = build(&params, &mut host);
    match host.sketch_curves(out.head.sketch)[0] {
        SketchCurve::Circle { radius, .. } => assert_relative_eq!(radius, 0.012, epsilon = 1e-15),
        other => panic!("expected a circle, got {other:?}"),
    }
}

// ── Body ───────────────────────────────────────────────────────────────────

#[test]
fn body_joins_opposite_the_head() {
    let mut host = MockHost::new();
    let out = build(&hex_params(), &mut host);

    let curves = host.sketch_curves(out.shaft.sketch);
    match curves.as_slice() {
        [SketchCurve::Circle { radius, .. }] => assert_relative_eq!(*radius, 0.6),
        other => panic!("expected one circle, got {other:?}"),
    }

    let Some(FeatureDefinition::Extrude(input)) = host.feature_definition(out.shaft.feature)
    else {
        panic!("shaft feature should be an extrude");
    };
    assert_eq!(input.operation, FeatureOperation::Join);
    assert_eq!(input.extent.direction, ExtentDirection::Negative);
    assert_relative_eq!(input.extent.signed_distance(), -2.4);
}

#[test]
fn body_length_tracks_parameter() {
    for length in [0.3, 1.0, 7.25] {
        let mut host = MockHost::new();
        let params = BoltParameters {
            body_length: length,
            ..hex_params()
        };
        let out = build(&params, &mut host);
        let Some(FeatureDefinition::Extrude(input)) = host.feature_definition(out.shaft.feature)
        else {
            panic!("shaft feature should be an extrude");
        };
        assert_relative_eq!(input.extent.distance, length);
        assert_eq!(input.extent.direction, ExtentDirection::Negative);
    }
}

#[test]
fn bolt_body_carries_bolt_name() {
    let mut host = MockHost::new();
    let out = build(&hex_params(), &mut host);
    assert_eq!(host.body_name(out.body).as_deref(), Some("Printable Bolt"));

    let params = BoltParameters {
        bolt_name: "M12 test bolt".into(),
        ..hex_params()
    };
    let body = build_bolt(&params, &mut host).unwrap();
    assert_eq!(host.body_name(body).as_deref(), Some("M12 test bolt"));
}

// ── Thread and offset shell ────────────────────────────────────────────────

#[test]
fn hexagon_scenario_is_threaded_m12() {
    let mut host = MockHost::new();
    let out = build(&hex_params(), &mut host);

    let thread = out.thread.expect("M12 should have thread data");
    assert_eq!(thread.designation, "M12x1.75");
    assert_eq!(thread.thread_class, "6g");
    assert!(out.diagnostics.warnings.is_empty());

    let Some(FeatureDefinition::Thread(input)) = host.feature_definition(thread.feature) else {
        panic!("thread feature should be a thread");
    };
    assert!(input.is_modeled);
    assert!(!input.info.is_internal);
    assert_eq!(input.info.thread_type, "ISO Metric profile");
    assert_eq!(input.faces.len(), 1);
}

#[test]
fn thread_replaces_the_cylindrical_side() {
    let mut host = MockHost::new();
    let out = build(&hex_params(), &mut host);
    let thread = out.thread.unwrap();

    assert!(!thread.faces.is_empty());
    for face in &thread.faces {
        assert_eq!(host.face_surface(*face), Some(SurfaceKind::Thread));
    }
    assert!(host
        .body_faces(out.body)
        .iter()
        .all(|f| host.face_surface(*f) != Some(SurfaceKind::Cylindrical)));
}

#[test]
fn threaded_bolt_has_one_thread_and_one_shell() {
    for params in [hex_params(), headless_params(), BoltParameters::default()] {
        let mut host = MockHost::new();
        let out = build(&params, &mut host);

        assert_eq!(count(&host, out.component, "thread"), 1);
        assert_eq!(count(&host, out.component, "offset"), 1);
        assert_eq!(host.component_bodies(out.component).len(), 2);

        let offset = out.offset.expect("threaded bolt should have a shell");
        assert_relative_eq!(offset.distance, OFFSET_SHELL_DISTANCE);
        assert_relative_eq!(offset.distance, -0.1);
        assert_ne!(offset.body, out.body);

        let Some(FeatureDefinition::Offset(input)) = host.feature_definition(offset.feature)
        else {
            panic!("offset feature should be an offset");
        };
        assert_eq!(input.operation, FeatureOperation::NewBody);
        assert!(!input.is_chain);
        assert_eq!(input.faces, out.thread.unwrap().faces);
    }
}

#[test]
fn missing_thread_data_skips_thread_and_shell() {
    let mut host = MockHost::new().without_thread_data();
    let out = build(&hex_params(), &mut host);

    assert!(out.thread.is_none());
    assert!(out.offset.is_none());
    assert_eq!(count(&host, out.component, "thread"), 0);
    assert_eq!(count(&host, out.component, "offset"), 0);
    assert_eq!(host.component_bodies(out.component), vec![out.body]);
    assert_eq!(out.diagnostics.warnings.len(), 1);
    assert!(host.messages().is_empty());
}

#[test]
fn unlisted_diameter_skips_thread() {
    let mut host = MockHost::new();
    let params = BoltParameters {
        body_diameter: 12.0,
        head_diameter: 15.0,
        ..hex_params()
    };
    let out = build(&params, &mut host);
    assert!(out.thread.is_none());
    assert!(out.offset.is_none());
}

#[test]
fn backlash_is_ignored_by_default() {
    let mut host = MockHost::new();
    let params = BoltParameters {
        backlash: 0.02,
        ..hex_params()
    };
    let out = build(&params, &mut host);
    let thread = out.thread.unwrap();
    assert_eq!(thread.allowance, 0.0);

    let Some(FeatureDefinition::Thread(input)) = host.feature_definition(thread.feature) else {
        panic!("thread feature should be a thread");
    };
    assert_eq!(input.info.allowance, 0.0);
    assert_eq!(thread.designation, "M12x1.75");
}

#[test]
fn allowance_policy_feeds_backlash_to_thread() {
    let mut host = MockHost::new();
    let params = BoltParameters {
        backlash: 0.02,
        ..hex_params()
    };
    let builder = BoltBuilder::new(BuildOptions {
        backlash_policy: BacklashPolicy::Allowance,
        ..Default::default()
    });
    let out = builder.build(&params, &mut host).unwrap();
    let thread = out.thread.unwrap();
    assert_relative_eq!(thread.allowance, 0.02);

    let Some(FeatureDefinition::Thread(input)) = host.feature_definition(thread.feature) else {
        panic!("thread feature should be a thread");
    };
    assert_relative_eq!(input.info.allowance, 0.02);
    // Sizing still uses the nominal diameter.
    assert_eq!(input.info.designation, "M12x1.75");

    // The allowance thins the modeled thread against a nominal one.
    let mut nominal_host = MockHost::new();
    let nominal = build(&params, &mut nominal_host).thread.unwrap();
    let reduced_area = thread_area(&host, &thread.faces);
    let nominal_area = thread_area(&nominal_host, &nominal.faces);
    assert!(reduced_area < nominal_area);
    assert_relative_eq!(reduced_area / nominal_area, 0.59 / 0.6, epsilon = 1e-12);
}

// ── Failures ───────────────────────────────────────────────────────────────

#[test]
fn component_failure_is_fatal() {
    let mut host = MockHost::new().with_component_failure();
    let err = BoltBuilder::default()
        .build(&hex_params(), &mut host)
        .unwrap_err();
    assert_eq!(err, BuildError::ComponentCreation);
    assert_eq!(err.title(), "New Component Failed");
    assert!(!err.is_soft());
}

#[test]
fn missing_profile_is_fatal() {
    let mut host = MockHost::new().without_profiles();
    let err = BoltBuilder::default()
        .build(&hex_params(), &mut host)
        .unwrap_err();
    assert_eq!(err, BuildError::ProfileUnavailable { stage: "head" });
    assert_eq!(err.title(), "Profile Unavailable");
    assert!(!err.is_soft());
    // The component was already created and is left in place.
    let component = host.components()[0];
    assert_eq!(host.components().len(), 1);
    assert!(host.component_features(component).is_empty());
}

#[test]
fn narrow_head_is_rejected_before_touching_host() {
    let mut host = MockHost::new();
    let params = BoltParameters {
        head_diameter: 1.2,
        ..hex_params()
    };
    let err = build_bolt(&params, &mut host).unwrap_err();
    assert!(matches!(
        err,
        BuildError::InvalidParameters(ParameterError::HeadTooNarrow { .. })
    ));
    assert!(host.components().is_empty());
}

#[test]
fn two_sided_head_is_rejected() {
    let mut host = MockHost::new();
    let params = BoltParameters {
        head_sides: 2,
        ..hex_params()
    };
    assert!(matches!(
        build_bolt(&params, &mut host),
        Err(BuildError::InvalidParameters(ParameterError::TooFewSides { sides: 2 }))
    ));
}

#[test]
fn each_build_creates_its_own_component() {
    let mut host = MockHost::new();
    let a = build(&hex_params(), &mut host);
    let b = build(&hex_params(), &mut host);
    assert_ne!(a.component, b.component);
    assert_eq!(host.components(), vec![a.component, b.component]);
}

// ── Head finishing ─────────────────────────────────────────────────────────

fn finishing_builder() -> BoltBuilder {
    BoltBuilder::new(BuildOptions {
        finish_head: true,
        ..Default::default()
    })
}

#[test]
fn finishing_is_off_by_default() {
    let mut host = MockHost::new();
    let out = build(&hex_params(), &mut host);
    assert!(out.finishing.is_none());
    assert_eq!(count(&host, out.component, "chamfer"), 0);
    assert_eq!(count(&host, out.component, "fillet"), 0);
    assert_eq!(count(&host, out.component, "revolve"), 0);
}

#[test]
fn finishing_adds_chamfer_fillet_and_two_cuts() {
    let mut host = MockHost::new();
    let out = finishing_builder().build(&hex_params(), &mut host).unwrap();
    let finishing = out.finishing.unwrap();

    assert_eq!(count(&host, out.component, "chamfer"), 1);
    assert_eq!(count(&host, out.component, "fillet"), 1);
    assert_eq!(count(&host, out.component, "revolve"), 2);
    assert_eq!(finishing.revolve_cuts.len(), 2);

    for cut in &finishing.revolve_cuts {
        let Some(FeatureDefinition::Revolve(input)) = host.feature_definition(*cut) else {
            panic!("corner cut should be a revolve");
        };
        assert_eq!(input.operation, FeatureOperation::Cut);
        assert_eq!(input.axis, ConstructionAxis::Z);
        assert_relative_eq!(input.angle, std::f64::consts::TAU);
    }

    // Finishing does not disturb threading.
    assert!(out.thread.is_some());
    assert!(out.offset.is_some());
}

#[test]
fn fillet_follows_the_head_shaft_junction() {
    let mut host = MockHost::new();
    let out = finishing_builder().build(&hex_params(), &mut host).unwrap();
    let fillet = out.finishing.unwrap().fillet.unwrap();

    let Some(FeatureDefinition::Fillet { edges, radius }) = host.feature_definition(fillet) else {
        panic!("expected a fillet");
    };
    assert_relative_eq!(radius, hex_params().fillet_radius);
    assert_eq!(edges.len(), 1);
    match host.edge_curve(edges[0]) {
        Some(EdgeCurve::Circle { center, radius, .. }) => {
            assert_relative_eq!(radius, 0.6);
            assert_relative_eq!(center[2], 0.0);
        }
        other => panic!("junction should be a circle, got {other:?}"),
    }
}

#[test]
fn chamfer_targets_the_shaft_tip() {
    let mut host = MockHost::new();
    let out = finishing_builder().build(&hex_params(), &mut host).unwrap();
    let chamfer = out.finishing.unwrap().chamfer.unwrap();

    let Some(FeatureDefinition::Chamfer { edges, distance }) = host.feature_definition(chamfer)
    else {
        panic!("expected a chamfer");
    };
    assert_relative_eq!(distance, hex_params().chamfer_distance);
    match host.edge_curve(edges[0]) {
        Some(EdgeCurve::Circle { center, .. }) => assert_relative_eq!(center[2], -2.4),
        other => panic!("tip edge should be a circle, got {other:?}"),
    }
}

#[test]
fn zero_sizes_disable_finishing_steps() {
    let mut host = MockHost::new();
    let params = BoltParameters {
        chamfer_distance: 0.0,
        fillet_radius: 0.0,
        ..hex_params()
    };
    let out = finishing_builder().build(&params, &mut host).unwrap();
    let finishing = out.finishing.unwrap();
    assert!(finishing.chamfer.is_none());
    assert!(finishing.fillet.is_none());
    assert_eq!(finishing.revolve_cuts.len(), 2);
}

#[test]
fn headless_finishing_only_chamfers() {
    let mut host = MockHost::new();
    let out = finishing_builder()
        .build(&headless_params(), &mut host)
        .unwrap();
    let finishing = out.finishing.unwrap();
    assert!(finishing.chamfer.is_some());
    assert!(finishing.fillet.is_none());
    assert!(finishing.revolve_cuts.is_empty());
}

#[test]
fn options_load_from_json() {
    let options: BuildOptions =
        serde_json::from_str(r#"{"backlash_policy":{"type":"Allowance"}}"#).unwrap();
    assert_eq!(options.backlash_policy, BacklashPolicy::Allowance);
    assert!(!options.finish_head);

    let defaults: BuildOptions = serde_json::from_str("{}").unwrap();
    assert_eq!(defaults, BuildOptions::default());
}
