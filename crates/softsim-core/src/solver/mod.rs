//! Frame driver and the two interchangeable solvers.
//!
//! A frame is strictly sequential with respect to the previous one, but
//! shapes never mutate each other within a frame, so the per-shape work is
//! dispatched through [`for_each_shape`] and parallelized across shapes when
//! the `parallel` feature is enabled. Results are bit-identical either way
//! because each shape's arithmetic stays sequential.

pub mod mass_spring;
pub mod position_based;

use log::info;

use crate::error::SimError;
use crate::init::init_simulation;
use crate::mesh::{quad_vertex_normals, triangle_vertex_normals};
use crate::params::{SimulationParams, SolverKind};
use crate::scene::{Scene, Shape};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Optional observer invoked before each unit of work as
/// `(stage, current, total)`. Purely informational.
pub type ProgressCallback<'a> = &'a mut dyn FnMut(&str, u32, u32);

/// Advance the scene by one frame with the solver selected in `params`.
pub fn simulate_frame(scene: &mut Scene, params: &SimulationParams) {
    match params.solver {
        SolverKind::MassSpring => mass_spring::simulate(scene, params),
        SolverKind::PositionBased => position_based::simulate(scene, params),
    }
}

/// Run a whole simulation: initialize once, then advance `params.frames`
/// frames. Returns without simulating anything if validation fails.
pub fn simulate_frames(
    scene: &mut Scene,
    params: &SimulationParams,
    mut progress: Option<ProgressCallback<'_>>,
) -> Result<(), SimError> {
    let total = params.frames + 1;
    let mut current = 0;

    if let Some(cb) = progress.as_mut() {
        cb("initialize", current, total);
    }
    current += 1;
    init_simulation(scene, params)?;

    info!(
        "simulating {} frames with {:?} solver, {} shapes, {} colliders",
        params.frames,
        params.solver,
        scene.shapes().len(),
        scene.colliders().len()
    );

    for _ in 0..params.frames {
        if let Some(cb) = progress.as_mut() {
            cb("simulate", current, total);
        }
        current += 1;
        simulate_frame(scene, params);
    }

    if let Some(cb) = progress.as_mut() {
        cb("simulate", current, total);
    }
    Ok(())
}

/// Apply `f` to every shape, across worker threads when the `parallel`
/// feature is on.
pub(crate) fn for_each_shape<F>(shapes: &mut [Shape], f: F)
where
    F: Fn(&mut Shape) + Send + Sync,
{
    #[cfg(feature = "parallel")]
    shapes.par_iter_mut().for_each(|shape| f(shape));
    #[cfg(not(feature = "parallel"))]
    shapes.iter_mut().for_each(|shape| f(shape));
}

/// Global damping and minimum-speed clamp, shared by both solvers.
pub(crate) fn damp_velocities(shape: &mut Shape, params: &SimulationParams) {
    for k in 0..shape.vertex_count() {
        if shape.invmass[k] == 0.0 {
            continue;
        }
        shape.velocities[k] *= 1.0 - params.damping * params.deltat;
        if shape.velocities[k].length() < params.min_velocity {
            shape.velocities[k] = glam::Vec3::ZERO;
        }
    }
}

/// Recompute smooth normals from the current positions; quads win over
/// triangles, and shapes without face topology keep their normals.
pub(crate) fn update_normals(shape: &mut Shape) {
    if !shape.quads.is_empty() {
        shape.normals = quad_vertex_normals(&shape.quads, &shape.positions);
    } else if !shape.triangles.is_empty() {
        shape.normals = triangle_vertex_normals(&shape.triangles, &shape.positions);
    }
}
