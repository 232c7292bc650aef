//! Position-based solver: predict, detect, relax, reconcile.
//!
//! Unlike the explicit mass-spring path this is unconditionally stable for
//! any stiffness coefficient in [0, 1]; the trade-off is that constraints
//! are only approximately satisfied, converging over the relaxation
//! iterations. Collisions are detected once per frame against the predicted
//! positions and replayed as plane constraints inside the relaxation loop.
//! No frictional correction is applied in this path.
//!
//! Reference: Müller et al., "Position Based Dynamics", J. Vis. Commun.
//! Image Represent. 2007.

use glam::Vec3;

use crate::collision::collide_collider;
use crate::params::SimulationParams;
use crate::scene::{Collider, Contact, Scene, Shape};
use crate::solver::{damp_velocities, for_each_shape, update_normals};

pub(crate) fn simulate(scene: &mut Scene, params: &SimulationParams) {
    let (shapes, colliders) = scene.split_mut();

    for_each_shape(shapes, |shape| {
        shape.old_positions.copy_from_slice(&shape.positions);

        predict(shape, params);
        detect_collisions(shape, colliders);
        for _ in 0..params.substeps {
            relax(shape);
        }
        reconcile_velocities(shape, params.deltat);

        damp_velocities(shape, params);
        update_normals(shape);
    });
}

/// Unconstrained explicit step under gravity.
fn predict(shape: &mut Shape, params: &SimulationParams) {
    let gravity = Vec3::new(0.0, -params.gravity, 0.0);
    for k in 0..shape.vertex_count() {
        if shape.invmass[k] == 0.0 {
            continue;
        }
        shape.velocities[k] += gravity * params.deltat;
        shape.positions[k] += shape.velocities[k] * params.deltat;
    }
}

/// Rebuild the per-shape contact list from the predicted positions.
fn detect_collisions(shape: &mut Shape, colliders: &[Collider]) {
    shape.collisions.clear();
    for k in 0..shape.vertex_count() {
        if shape.invmass[k] == 0.0 {
            continue;
        }
        for collider in colliders {
            if let Some(hit) = collide_collider(collider, shape.positions[k]) {
                shape.collisions.push(Contact {
                    vert: k as u32,
                    position: hit.position,
                    normal: hit.normal,
                });
            }
        }
    }
}

/// One Gauss–Seidel sweep over springs and recorded contacts.
fn relax(shape: &mut Shape) {
    for si in 0..shape.springs.len() {
        let spring = shape.springs[si];
        let v0 = spring.vert0 as usize;
        let v1 = spring.vert1 as usize;
        let invmass = shape.invmass[v0] + shape.invmass[v1];
        if invmass == 0.0 {
            continue;
        }

        let mut dir = shape.positions[v1] - shape.positions[v0];
        let len = dir.length();
        dir /= len;

        let lambda = (1.0 - spring.coeff) * (len - spring.rest) / invmass;
        shape.positions[v0] += shape.invmass[v0] * lambda * dir;
        shape.positions[v1] -= shape.invmass[v1] * lambda * dir;
    }

    // Push vertices that moved through a recorded hit plane back out along
    // the stored normal by exactly the penetration depth.
    for ci in 0..shape.collisions.len() {
        let contact = shape.collisions[ci];
        let k = contact.vert as usize;
        if shape.invmass[k] == 0.0 {
            continue;
        }
        let projection = (shape.positions[k] - contact.position).dot(contact.normal);
        if projection >= 0.0 {
            continue;
        }
        shape.positions[k] -= projection * contact.normal;
    }
}

/// Standard PBD velocity derivation from the frame's position change.
fn reconcile_velocities(shape: &mut Shape, deltat: f32) {
    for k in 0..shape.vertex_count() {
        if shape.invmass[k] == 0.0 {
            continue;
        }
        shape.velocities[k] = (shape.positions[k] - shape.old_positions[k]) / deltat;
    }
}
