//! Explicit mass-spring solver.
//!
//! Springs are soft penalty spring-dampers rather than hard constraints, so
//! the force law is stiff and stability comes from sub-stepping: one frame
//! is `substeps` semi-implicit Euler steps of `deltat / substeps`, followed
//! by a single collision-response, damping, and normal pass.
//!
//! Reference: Provot, "Deformation constraints in a mass-spring model to
//! describe rigid cloth behavior", Graphics Interface 1995.

use glam::Vec3;

use crate::collision::collide_collider;
use crate::params::SimulationParams;
use crate::scene::{Collider, Scene, Shape};
use crate::solver::{damp_velocities, for_each_shape, update_normals};

/// Distance a vertex is pushed out along the hit normal so it does not
/// immediately re-penetrate the surface.
pub const CONTACT_OFFSET: f32 = 0.005;

pub(crate) fn simulate(scene: &mut Scene, params: &SimulationParams) {
    let (shapes, colliders) = scene.split_mut();

    for_each_shape(shapes, |shape| {
        shape.old_positions.copy_from_slice(&shape.positions);

        let ddt = params.deltat / params.substeps as f32;
        for _ in 0..params.substeps {
            accumulate_forces(shape, params.gravity);
            integrate(shape, ddt);
        }

        resolve_collisions(shape, colliders, params);
        damp_velocities(shape, params);
        update_normals(shape);
    });
}

/// Gravity weight plus spring-damper forces into the force accumulator.
fn accumulate_forces(shape: &mut Shape, gravity: f32) {
    for k in 0..shape.vertex_count() {
        if shape.invmass[k] == 0.0 {
            continue;
        }
        shape.forces[k] = Vec3::new(0.0, -gravity, 0.0) / shape.invmass[k];
    }

    for si in 0..shape.springs.len() {
        let spring = shape.springs[si];
        let v0 = spring.vert0 as usize;
        let v1 = spring.vert1 as usize;
        let invmass = shape.invmass[v0] + shape.invmass[v1];
        if invmass == 0.0 {
            continue;
        }

        let delta_pos = shape.positions[v1] - shape.positions[v0];
        let delta_vel = shape.velocities[v1] - shape.velocities[v0];
        let spring_len = delta_pos.length();
        let spring_dir = delta_pos / spring_len;

        // Restoring force proportional to relative elongation, plus a
        // velocity damping term along the spring axis.
        let mut force =
            spring_dir * (spring_len / spring.rest - 1.0) / (spring.coeff * invmass);
        force += (delta_vel / spring.rest).dot(spring_dir) * spring_dir
            / (spring.coeff * 1000.0 * invmass);

        shape.forces[v0] += force;
        shape.forces[v1] -= force;
    }
}

/// Semi-implicit Euler: velocity first, then position from the new velocity.
fn integrate(shape: &mut Shape, ddt: f32) {
    for k in 0..shape.vertex_count() {
        if shape.invmass[k] == 0.0 {
            continue;
        }
        shape.velocities[k] += ddt * shape.forces[k] * shape.invmass[k];
        shape.positions[k] += ddt * shape.velocities[k];
    }
}

/// Snap penetrating vertices to the surface and damp the velocity response:
/// the tangential component by `1 - bounce.x`, the reflected normal
/// component by `1 - bounce.y`.
fn resolve_collisions(shape: &mut Shape, colliders: &[Collider], params: &SimulationParams) {
    for k in 0..shape.vertex_count() {
        if shape.invmass[k] == 0.0 {
            continue;
        }
        for collider in colliders {
            if let Some(hit) = collide_collider(collider, shape.positions[k]) {
                shape.positions[k] = hit.position + hit.normal * CONTACT_OFFSET;
                let projection = shape.velocities[k].dot(hit.normal);
                shape.velocities[k] = (shape.velocities[k] - hit.normal * projection)
                    * (1.0 - params.bounce.x)
                    - hit.normal * projection * (1.0 - params.bounce.y);
            }
        }
    }
}
