//! End-to-end composition tests: the properties a caller relies on when
//! wiring entities together through relative coordinates.

use tether::{
    Anchor, AnchorSpec, Coord, Entity, Geometry, Pathable, Point, ResolveError, SampledPath,
    Scene, Transform,
};

const EPS: f64 = 1e-9;

fn assert_close(a: Point, b: Point) {
    assert!(a.distance(b) < EPS, "expected {a} close to {b}");
}

#[test]
fn reactivity_without_update_calls() {
    let mut scene = Scene::new();
    let b = scene.add_named("B", Geometry::dot((10.0, 10.0), 1.0));
    let a = scene.add_named(
        "A",
        Geometry::dot(Coord::anchor(b, "center").offset(5.0, 0.0), 1.0),
    );

    assert_close(scene.origin(a).unwrap(), Point::new(15.0, 10.0));

    scene.get_mut(b).unwrap().move_to(Point::new(20.0, 20.0));
    assert_close(scene.origin(a).unwrap(), Point::new(25.0, 20.0));
}

#[test]
fn reactivity_propagates_through_paths_and_transforms() {
    let mut scene = Scene::new();
    let hub = scene.add(Entity::new(Geometry::dot((0.0, 0.0), 1.0)));
    let spoke = scene.add(Entity::new(Geometry::line(
        Coord::anchor(hub, "center"),
        Coord::anchor(hub, "center").offset(10.0, 0.0),
    )));
    // A dot riding at 30% along the spoke.
    let rider = scene.add(Entity::new(Geometry::dot(Coord::on_path(spoke, 0.3), 0.2)));
    assert_close(scene.origin(rider).unwrap(), Point::new(3.0, 0.0));

    scene.get_mut(hub).unwrap().move_to(Point::new(0.0, 7.0));
    assert_close(scene.origin(rider).unwrap(), Point::new(3.0, 7.0));
}

// The deep-chain tests recurse once per entity, so they run on a thread
// with a roomy stack instead of the test harness default.
fn with_deep_stack(f: impl FnOnce() + Send + 'static) {
    std::thread::Builder::new()
        .stack_size(64 * 1024 * 1024)
        .spawn(f)
        .unwrap()
        .join()
        .unwrap();
}

#[test]
fn deep_chain_of_ten_thousand_entities_resolves() {
    with_deep_stack(|| {
        // Recursion is bounded by the number of distinct entities; a long
        // but acyclic chain must resolve, each link shifting by one unit.
        let mut scene = Scene::new();
        let mut prev = scene.add(Entity::new(Geometry::dot((0.0, 0.0), 0.1)));
        for _ in 0..10_000 {
            prev = scene.add(Entity::new(Geometry::dot(
                Coord::anchor(prev, "center").offset(1.0, 0.0),
                0.1,
            )));
        }
        assert_close(scene.origin(prev).unwrap(), Point::new(10_000.0, 0.0));
    });
}

#[test]
fn deep_chain_with_a_cycle_at_the_bottom_fails_cleanly() {
    with_deep_stack(|| {
        let mut scene = Scene::new();
        let first = scene.add(Entity::new(Geometry::dot((0.0, 0.0), 0.1)));
        let mut prev = first;
        for _ in 0..5_000 {
            prev = scene.add(Entity::new(Geometry::dot(
                Coord::anchor(prev, "center").offset(1.0, 0.0),
                0.1,
            )));
        }
        // Close the loop: the chain's root now depends on its tip.
        scene.get_mut(first).unwrap().geometry =
            Geometry::dot(Coord::anchor(prev, "center"), 0.1);
        assert!(matches!(
            scene.origin(prev),
            Err(ResolveError::Cycle { .. })
        ));
    });
}

#[test]
fn two_quarter_turns_equal_one_half_turn() {
    let geometry = || Geometry::ellipse((3.0, 2.0), 2.0, 1.0);
    let pivot = Point::new(3.0, 2.0);

    let mut scene = Scene::new();
    let twice = scene.add(Entity::new(geometry()).with_transform(
        Transform::IDENTITY
            .rotate_about(90.0, pivot)
            .rotate_about(90.0, pivot),
    ));
    let once = scene.add(
        Entity::new(geometry()).with_transform(Transform::IDENTITY.rotate_about(180.0, pivot)),
    );

    for name in ["n", "s", "e", "w", "ne", "sw", "center"] {
        let a = scene.anchor(twice, name).unwrap();
        let b = scene.anchor(once, name).unwrap();
        assert!(a.distance(b) < 1e-9, "anchor {name}: {a} vs {b}");
    }
}

#[test]
fn anchors_rotate_with_the_entity() {
    let mut scene = Scene::new();
    // A dot of radius 1 at (2, 0), rotated a quarter turn about the world
    // origin. Anchors are found on the raw geometry and then carried
    // through the transform: north (2, 1) lands at (-1, 2), east (3, 0)
    // at (0, 3).
    let a = scene.add(
        Entity::new(Geometry::dot((2.0, 0.0), 1.0))
            .with_transform(Transform::IDENTITY.rotate_about(90.0, Point::ORIGIN)),
    );
    assert_close(scene.anchor(a, "n").unwrap(), Point::new(-1.0, 2.0));
    assert_close(scene.anchor(a, "e").unwrap(), Point::new(0.0, 3.0));
}

#[test]
fn arc_length_queries_converge_through_the_scene() {
    let mut scene = Scene::new();
    let c = scene.add(Entity::new(Geometry::curve((0.0, 0.0), (4.0, 0.0), 0.5)));
    let mut prev = scene.arc_length_on(c, 16).unwrap();
    let mut samples = 32;
    while samples <= 256 {
        let next = scene.arc_length_on(c, samples).unwrap();
        assert!(next + 1e-12 >= prev);
        prev = next;
        samples *= 2;
    }
    let a = scene.arc_length_on(c, 128).unwrap();
    let b = scene.arc_length_on(c, 256).unwrap();
    assert!((a - b).abs() < 1e-3);
}

#[test]
fn renderer_surface_points_and_polyline() {
    let mut scene = Scene::new();
    let anchor_dot = scene.add(Entity::new(Geometry::dot((1.0, 1.0), 0.5)));
    let poly = scene.add(Entity::new(Geometry::polygon(vec![
        Coord::abs(0.0, 0.0),
        Coord::anchor(anchor_dot, "center"),
        Coord::abs(2.0, 0.0),
    ])));
    let pts = scene.points_of(poly).unwrap();
    assert_eq!(pts.len(), 3);
    assert_close(pts[1], Point::new(1.0, 1.0));

    let wave = scene.add(Entity::new(Geometry::path(
        (0.0, 0.0),
        SampledPath::new(|t| Point::new(t * 4.0, (t * std::f64::consts::TAU).sin())),
    )));
    let outline = scene.polyline_of(wave, 64).unwrap();
    assert_eq!(outline.len(), 65);
    assert_close(outline[0], Point::new(0.0, 0.0));
    assert!((outline[64].x - 4.0).abs() < EPS);
}

#[test]
fn grid_cell_drives_cell_relative_anchors() {
    // The layout collaborator hands over opaque rectangles; a normalized
    // anchor inside one is just a Frac spec against that box.
    let mut scene = Scene::new();
    let cell = tether::BBox::from_rect(100.0, 200.0, 50.0, 50.0);
    let marker = scene.add(Entity::new(Geometry::dot(
        Coord::at(cell.at_frac(0.5, 0.5)),
        2.0,
    )));
    assert_close(scene.origin(marker).unwrap(), Point::new(125.0, 225.0));
    assert_close(
        scene.anchor(marker, AnchorSpec::frac(1.0, 1.0)).unwrap(),
        Point::new(127.0, 227.0),
    );
}

#[test]
fn custom_path_rider_with_tangent() {
    let mut scene = Scene::new();
    let circle = scene.add(Entity::new(Geometry::ellipse((0.0, 0.0), 5.0, 5.0)));
    // Marks every quarter turn, each positioned parametrically.
    let marks: Vec<_> = (0..4)
        .map(|i| {
            scene.add(Entity::new(Geometry::dot(
                Coord::on_path(circle, i as f64 / 4.0),
                0.2,
            )))
        })
        .collect();
    assert_close(scene.origin(marks[0]).unwrap(), Point::new(5.0, 0.0));
    assert_close(scene.origin(marks[1]).unwrap(), Point::new(0.0, 5.0));

    // Tangent at t = 0 on a counter-clockwise circle points straight up.
    let angle = scene.angle_on(circle, 0.0).unwrap();
    assert!((angle - 90.0).abs() < 1e-6, "angle was {angle}");
}

#[test]
fn selection_helpers_iterate_in_insertion_order() {
    let mut scene = Scene::new();
    let d1 = scene.add(Entity::new(Geometry::dot((0.0, 0.0), 1.0)));
    let l1 = scene.add(Entity::new(Geometry::line((0.0, 0.0), (1.0, 0.0))));
    let d2 = scene.add(Entity::new(Geometry::dot((1.0, 1.0), 1.0)));

    let dots: Vec<_> = scene.select_kind("dot").map(|(id, _)| id).collect();
    assert_eq!(dots, vec![d1, d2]);
    assert_eq!(scene.last(), Some(d2));
    assert_eq!(scene.select(|e| e.geometry.is_pathable()).count(), 1);
    let _ = l1;
}

#[test]
fn pathable_trait_is_usable_directly() {
    // The capability works outside any scene, for callers that bring their
    // own geometry.
    let shape = tether::Line::new(Point::new(0.0, 0.0), Point::new(3.0, 4.0));
    assert!((shape.arc_length(1) - 5.0).abs() < EPS);
    assert_eq!(Anchor::parse("mid").and_then(|a| a.path_param()), Some(0.5));
    assert_close(shape.point_at(0.5), Point::new(1.5, 2.0));
}
