use glam::Vec3;
use softsim_core::{simulate_frames, Scene, SimError, SimulationParams, SolverKind};

fn single_particle_scene() -> (Scene, softsim_core::ShapeId) {
    let mut scene = Scene::new();
    let id = scene.add_particles(
        vec![0],
        vec![Vec3::new(0.0, 1.0, 0.0)],
        vec![0.01],
        1.0,
        0.0,
    );
    (scene, id)
}

#[test]
fn test_simulate_frames_advances_the_scene() {
    let (mut scene, id) = single_particle_scene();
    let params = SimulationParams {
        frames: 10,
        substeps: 1,
        ..Default::default()
    };

    simulate_frames(&mut scene, &params, None).unwrap();
    assert!(
        scene.shape(id).positions[0].y < 1.0,
        "gravity should have pulled the particle down"
    );
}

#[test]
fn test_progress_callback_protocol() {
    let (mut scene, _) = single_particle_scene();
    let params = SimulationParams {
        frames: 3,
        substeps: 1,
        ..Default::default()
    };

    let mut calls: Vec<(String, u32, u32)> = Vec::new();
    let mut record = |stage: &str, current: u32, total: u32| {
        calls.push((stage.to_string(), current, total));
    };
    simulate_frames(&mut scene, &params, Some(&mut record)).unwrap();

    // One init call, one per frame, one completion call.
    assert_eq!(calls.len(), 5);
    assert_eq!(calls[0], ("initialize".to_string(), 0, 4));
    assert_eq!(calls[1].0, "simulate");
    assert_eq!(calls[4], ("simulate".to_string(), 4, 4));
    for pair in calls.windows(2) {
        assert!(pair[0].1 < pair[1].1, "progress must be monotonic");
    }
}

#[test]
fn test_initializer_runs_exactly_once_per_run() {
    let (mut scene, _) = single_particle_scene();
    let params = SimulationParams {
        frames: 8,
        substeps: 1,
        ..Default::default()
    };

    let mut init_calls = 0;
    let mut record = |stage: &str, _: u32, _: u32| {
        if stage == "initialize" {
            init_calls += 1;
        }
    };
    simulate_frames(&mut scene, &params, Some(&mut record)).unwrap();
    assert_eq!(init_calls, 1);
}

#[test]
fn test_invalid_scene_aborts_before_any_frame() {
    let (mut scene, id) = single_particle_scene();
    scene.shape_mut(id).initial_invmass.clear();

    let err = simulate_frames(&mut scene, &SimulationParams::default(), None).unwrap_err();
    assert!(matches!(err, SimError::ShapeArrayMismatch { .. }));
    // No frame ran: working arrays were never populated.
    assert!(scene.shape(id).positions.is_empty());
}

#[test]
fn test_both_solvers_run_through_the_driver() {
    for solver in [SolverKind::MassSpring, SolverKind::PositionBased] {
        let (mut scene, id) = single_particle_scene();
        let params = SimulationParams {
            solver,
            frames: 5,
            substeps: 1,
            ..Default::default()
        };
        simulate_frames(&mut scene, &params, None).unwrap();
        assert!(scene.shape(id).positions[0].y < 1.0, "{solver:?}");
    }
}
