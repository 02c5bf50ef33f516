//! End-to-end behavior of the kernel through its public API

use sling_physics::sim::{
    Body, BodyKind, INFINITE_MASS, Polygon, Rgb, Scene, Vector, create_destructive_collision,
    create_newtonian_gravity_clamped, create_physics_collision, find_shape_collision, shapes,
};

const EPS: f64 = 1e-9;

fn unit_square(center: Vector, mass: f64) -> Body {
    Body::new(shapes::rectangle(center, 1.0, 1.0), mass, Rgb::WHITE, BodyKind::Untagged).unwrap()
}

#[test]
fn sat_separated_squares() {
    let a = shapes::rectangle(Vector::ZERO, 1.0, 1.0);
    let b = shapes::rectangle(Vector::new(3.0, 0.0), 1.0, 1.0);
    assert!(!find_shape_collision(&a, &b).collided);
}

#[test]
fn sat_overlap_reports_horizontal_axis() {
    let a = shapes::rectangle(Vector::ZERO, 1.0, 1.0);
    let b = shapes::rectangle(Vector::new(0.5, 0.0), 1.0, 1.0);
    let result = find_shape_collision(&a, &b);
    assert!(result.collided);
    assert!((result.axis.x.abs() - 1.0).abs() < EPS);
    assert!(result.axis.y.abs() < EPS);
}

#[test]
fn sat_containment() {
    let outer = shapes::rectangle(Vector::ZERO, 4.0, 4.0);
    let inner = shapes::rectangle(Vector::new(0.5, -0.5), 1.0, 1.0);
    assert!(find_shape_collision(&outer, &inner).collided);
    assert!(find_shape_collision(&inner, &outer).collided);
}

#[test]
fn one_tick_uses_average_velocity() {
    let dt = 1.0 / 60.0;
    let mut scene: Scene = Scene::new();
    let h = scene.add_body(unit_square(Vector::ZERO, 5.0));
    scene.get_mut(h).unwrap().add_force(Vector::new(0.0, -750.0));
    scene.tick(dt);

    let body = scene.get(h).unwrap();
    assert!((body.velocity().y + 2.5).abs() < EPS);
    let trapezoid = -2.5 / 2.0 * dt;
    let euler = -750.0 * dt * dt / 5.0;
    assert!((body.centroid().y - trapezoid).abs() < EPS);
    assert!((body.centroid().y - euler).abs() > 1e-3);
}

#[test]
fn sweep_drops_body_and_its_registrations() {
    let mut scene: Scene = Scene::new();
    let a = scene.add_body(unit_square(Vector::ZERO, 1.0));
    let b = scene.add_body(unit_square(Vector::new(5.0, 0.0), 1.0));
    let c = scene.add_body(unit_square(Vector::new(10.0, 0.0), 1.0));

    scene.add_bodies_force_creator(|_, _| {}, vec![a]);
    scene.add_bodies_force_creator(|_, _| {}, vec![b]);
    scene.add_bodies_force_creator(|_, _| {}, vec![a, c]);
    scene.add_force_creator(|_, _| {});
    assert_eq!(scene.registration_count(), 4);

    scene.get_mut(a).unwrap().remove();
    scene.tick(0.1);

    assert_eq!(scene.len(), 2);
    assert!(scene.get(a).is_none());
    // Only the registration that depended on `a` alone goes away
    assert_eq!(scene.registration_count(), 3);
    assert!((scene.body(0).centroid() - Vector::new(5.0, 0.0)).length() < EPS);
}

#[test]
fn equal_masses_exchange_velocities() {
    let mut scene: Scene = Scene::new();
    let mut left = unit_square(Vector::new(-1.05, 0.0), 1.0);
    left.set_velocity(Vector::new(1.0, 0.0));
    let mut right = unit_square(Vector::new(1.05, 0.0), 1.0);
    right.set_velocity(Vector::new(-1.0, 0.0));
    let a = scene.add_body(left);
    let b = scene.add_body(right);
    create_physics_collision(&mut scene, a, b, 1.0);

    for _ in 0..20 {
        scene.tick(0.1);
    }

    let va = scene.get(a).unwrap().velocity();
    let vb = scene.get(b).unwrap().velocity();
    assert!((va - Vector::new(-1.0, 0.0)).length() < EPS);
    assert!((vb - Vector::new(1.0, 0.0)).length() < EPS);
}

#[test]
fn immovable_body_reflects_mover() {
    let mut scene: Scene = Scene::new();
    let mut ball = unit_square(Vector::new(-1.05, 0.0), 1.0);
    ball.set_velocity(Vector::new(1.0, 0.0));
    let a = scene.add_body(ball);
    let wall = scene.add_body(unit_square(Vector::new(1.0, 0.0), INFINITE_MASS));
    create_physics_collision(&mut scene, a, wall, 1.0);

    for _ in 0..30 {
        scene.tick(0.1);
    }

    let v = scene.get(a).unwrap().velocity();
    assert!((v - Vector::new(-1.0, 0.0)).length() < EPS);
    assert_eq!(scene.get(wall).unwrap().velocity(), Vector::ZERO);
    assert!((scene.get(wall).unwrap().centroid() - Vector::new(1.0, 0.0)).length() < EPS);
}

#[test]
fn gravity_accelerates_until_impact() {
    let mut scene: Scene = Scene::new();
    let heavy = scene.add_body(unit_square(Vector::ZERO, 1000.0));
    let light = scene.add_body(unit_square(Vector::new(0.0, 10.0), 1.0));
    create_newtonian_gravity_clamped(&mut scene, 1.0, light, heavy, 0.5);
    create_destructive_collision(&mut scene, light, heavy);

    let dt = 0.01;
    let mut last_speed = 0.0;
    let mut impacted = false;
    for step in 0..10_000 {
        scene.tick(dt);
        let Some(body) = scene.get(light).filter(|b| !b.is_removed()) else {
            impacted = true;
            break;
        };
        let speed = body.velocity().y.abs();
        // Forces land one tick after they are generated
        if step > 0 {
            assert!(speed > last_speed, "step {step}: {speed} <= {last_speed}");
            assert!(body.velocity().y < 0.0);
        }
        last_speed = speed;
    }

    assert!(impacted);
    scene.tick(dt);
    assert!(scene.is_empty());
    assert_eq!(scene.registration_count(), 0);
}

#[test]
fn set_rotation_is_idempotent() {
    let mut poly = Polygon::at_rest(shapes::regular_polygon(Vector::new(2.0, 3.0), 1.5, 6)).unwrap();
    poly.set_rotation(0.7);
    let once = poly.points().to_vec();
    poly.set_rotation(0.7);
    assert_eq!(poly.points(), once.as_slice());
    assert!((poly.rotation() - 0.7).abs() < EPS);
}

#[test]
fn centroid_tracks_translation() {
    let mut poly = Polygon::at_rest(shapes::regular_polygon(Vector::ZERO, 2.0, 7)).unwrap();
    assert!(poly.centroid().length() < 1e-9);

    let delta = Vector::new(-3.25, 4.5);
    poly.translate(delta);
    assert!((poly.centroid() - delta).length() < 1e-9);
}
