use std::str::FromStr;

use approx::assert_relative_eq;
use glam::{Vec2, Vec3};
use softsim_core::{
    init_simulation, simulate_frame, Scene, ShapeId, SimulationParams, SolverKind,
};

fn quiet_params(solver: SolverKind) -> SimulationParams {
    SimulationParams {
        solver,
        substeps: 1,
        damping: 0.0,
        min_velocity: 0.0,
        ..Default::default()
    }
}

fn add_unit_particle(scene: &mut Scene, position: Vec3) -> ShapeId {
    // Single vertex, total mass 1 => inverse mass 1.
    scene.add_particles(vec![0], vec![position], vec![0.01], 1.0, 0.0)
}

/// Unit quad floor at y = 0 with +Y normals.
fn add_floor(scene: &mut Scene) {
    scene.add_collider(
        Vec::new(),
        vec![[0, 1, 2, 3]],
        vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 1.0),
            Vec3::new(0.0, 0.0, 1.0),
        ],
        vec![Vec3::Y; 4],
        vec![0.0; 4],
    );
}

#[test]
fn test_one_frame_of_semi_implicit_euler() {
    // v' = v + dt * g, then p' = p + dt * v': velocity updates first.
    let mut scene = Scene::new();
    let id = add_unit_particle(&mut scene, Vec3::new(0.0, 1.0, 0.0));
    let params = quiet_params(SolverKind::MassSpring);

    init_simulation(&mut scene, &params).unwrap();
    simulate_frame(&mut scene, &params);

    let shape = scene.shape(id);
    assert_relative_eq!(shape.velocities[0].y, -9.8 / 60.0, epsilon = 1e-6);
    assert_relative_eq!(shape.positions[0].y, 1.0 - 9.8 / 3600.0, epsilon = 1e-4);
}

#[test]
fn test_fully_pinned_shape_is_invariant() {
    for solver in [SolverKind::MassSpring, SolverKind::PositionBased] {
        let mut scene = Scene::new();
        let id = scene.add_particles(
            vec![0, 1, 2],
            vec![Vec3::ZERO, Vec3::X, Vec3::Y],
            vec![0.01; 3],
            1.0,
            0.0,
        );
        scene.shape_mut(id).initial_pinned = vec![0, 1, 2];
        add_floor(&mut scene);

        let params = SimulationParams {
            solver,
            ..Default::default()
        };
        init_simulation(&mut scene, &params).unwrap();
        let positions0 = scene.shape(id).positions.clone();
        let velocities0 = scene.shape(id).velocities.clone();

        for _ in 0..50 {
            simulate_frame(&mut scene, &params);
        }

        assert_eq!(scene.shape(id).positions, positions0, "{solver:?}");
        assert_eq!(scene.shape(id).velocities, velocities0, "{solver:?}");
    }
}

#[test]
fn test_kinetic_energy_decays_monotonically() {
    for solver in [SolverKind::MassSpring, SolverKind::PositionBased] {
        let mut scene = Scene::new();
        let id = scene.add_particles(
            (0..16).collect(),
            vec![Vec3::ZERO; 16],
            vec![0.01; 16],
            1.0,
            2.0,
        );
        // No gravity: jitter is the only motion, damping must bleed it off.
        let params = SimulationParams {
            solver,
            gravity: 0.0,
            damping: 2.0,
            substeps: 1,
            ..Default::default()
        };
        init_simulation(&mut scene, &params).unwrap();

        let energy = |scene: &Scene| -> f32 {
            scene
                .shape(id)
                .velocities
                .iter()
                .map(|v| v.length_squared())
                .sum()
        };

        let mut previous = energy(&scene);
        assert!(previous > 0.0, "jitter must inject kinetic energy");
        for _ in 0..120 {
            simulate_frame(&mut scene, &params);
            let current = energy(&scene);
            assert!(
                current <= previous + 1e-6,
                "{solver:?}: energy increased {previous} -> {current}"
            );
            previous = current;
        }
    }
}

#[test]
fn test_identical_runs_are_bit_identical() {
    for solver in [SolverKind::MassSpring, SolverKind::PositionBased] {
        let run = || {
            let mut scene = Scene::new();
            let id = scene.add_particles(
                (0..24).collect(),
                vec![Vec3::new(0.5, 0.5, 0.5); 24],
                vec![0.01; 24],
                1.0,
                1.0,
            );
            add_floor(&mut scene);
            let params = SimulationParams {
                solver,
                seed: 1234,
                substeps: 4,
                ..Default::default()
            };
            init_simulation(&mut scene, &params).unwrap();
            for _ in 0..30 {
                simulate_frame(&mut scene, &params);
            }
            (
                scene.shape(id).positions.clone(),
                scene.shape(id).velocities.clone(),
            )
        };

        let (pa, va) = run();
        let (pb, vb) = run();
        // Bitwise equality, not approximate.
        assert_eq!(pa, pb, "{solver:?} positions diverged");
        assert_eq!(va, vb, "{solver:?} velocities diverged");
    }
}

#[test]
fn test_mass_spring_particle_settles_on_floor() {
    let mut scene = Scene::new();
    let id = add_unit_particle(&mut scene, Vec3::new(0.5, 0.5, 0.5));
    add_floor(&mut scene);

    let params = SimulationParams {
        solver: SolverKind::MassSpring,
        substeps: 1,
        ..Default::default()
    };
    init_simulation(&mut scene, &params).unwrap();

    let mut height = f32::MAX;
    for _ in 0..600 {
        simulate_frame(&mut scene, &params);
        height = scene.shape(id).positions[0].y;
        assert!(height >= -1e-6, "exported position dipped below the floor");
    }
    // Settles at the surface plus the response offset.
    assert!(
        (0.0..=0.0105).contains(&height),
        "expected height near the 0.005 contact offset, got {height}"
    );
}

#[test]
fn test_pbd_particle_never_penetrates_floor() {
    let mut scene = Scene::new();
    let id = add_unit_particle(&mut scene, Vec3::new(0.5, 0.5, 0.5));
    add_floor(&mut scene);

    let params = SimulationParams {
        solver: SolverKind::PositionBased,
        substeps: 4,
        ..Default::default()
    };
    init_simulation(&mut scene, &params).unwrap();

    let mut height = f32::MAX;
    for _ in 0..600 {
        simulate_frame(&mut scene, &params);
        height = scene.shape(id).positions[0].y;
        assert!(height >= -1e-5, "penetrated the floor: {height}");
    }
    assert!(height.abs() < 1e-3, "expected to rest on the surface, got {height}");
}

#[test]
fn test_min_velocity_clamp_zeroes_slow_drift() {
    let mut scene = Scene::new();
    let id = add_unit_particle(&mut scene, Vec3::ZERO);
    scene.shape_mut(id).set_velocities(Vec3::new(0.004, 0.0, 0.0), 0.0);

    let params = SimulationParams {
        solver: SolverKind::MassSpring,
        gravity: 0.0,
        damping: 0.0,
        min_velocity: 0.01,
        substeps: 1,
        ..Default::default()
    };
    init_simulation(&mut scene, &params).unwrap();
    simulate_frame(&mut scene, &params);

    assert_eq!(scene.shape(id).velocities[0], Vec3::ZERO);
}

#[test]
fn test_solver_selector_parsing() {
    assert_eq!(SolverKind::from_str("mass-spring").unwrap(), SolverKind::MassSpring);
    assert_eq!(SolverKind::from_str("pbd").unwrap(), SolverKind::PositionBased);
    assert!(SolverKind::from_str("verlet").is_err());

    assert_eq!(SolverKind::try_from(0).unwrap(), SolverKind::MassSpring);
    assert_eq!(SolverKind::try_from(1).unwrap(), SolverKind::PositionBased);
    assert!(SolverKind::try_from(7).is_err());
}

#[test]
fn test_bounce_controls_restitution() {
    // Full normal damping (bounce.y = 1) kills the vertical velocity on
    // contact; with bounce.y = 0 the particle leaves the surface upward.
    let drop = |bounce: Vec2| {
        let mut scene = Scene::new();
        let id = add_unit_particle(&mut scene, Vec3::new(0.5, 0.05, 0.5));
        add_floor(&mut scene);
        let params = SimulationParams {
            solver: SolverKind::MassSpring,
            substeps: 1,
            damping: 0.0,
            min_velocity: 0.0,
            bounce,
            ..Default::default()
        };
        init_simulation(&mut scene, &params).unwrap();
        // Enough frames to guarantee a contact happened.
        for _ in 0..10 {
            simulate_frame(&mut scene, &params);
        }
        scene.shape(id).velocities[0].y
    };

    let dead = drop(Vec2::new(0.05, 1.0));
    assert!(dead.abs() < 0.2, "fully damped contact should not rebound: {dead}");

    let lively = drop(Vec2::new(0.05, 0.0));
    assert!(lively > 0.0, "undamped contact should reflect upward: {lively}");
}
