//! Simulation initializer: resets working state from the authored arrays and
//! builds the derived structures (springs, per-shape RNG, collider BVHs).

use glam::Vec2;
use log::debug;
use rand::Rng;
use rand_pcg::Pcg32;

use crate::bvh::Bvh;
use crate::error::SimError;
use crate::math::sample_sphere;
use crate::mesh::quad_edges;
use crate::params::SimulationParams;
use crate::scene::{Scene, Spring};

/// Reset `scene` to its authored state and (re)build derived structures.
///
/// Validation happens first, so a scene that fails the per-vertex array
/// preconditions is left untouched. Calling this again with the same seed
/// and topology restores exactly the same state: each shape's RNG stream is
/// reseeded from `(seed, shape_index * 2 + 1)`, and springs, forces, and
/// contact lists are rebuilt from scratch.
pub fn init_simulation(scene: &mut Scene, params: &SimulationParams) -> Result<(), SimError> {
    for (sid, shape) in scene.shapes.iter().enumerate() {
        shape.validate(sid)?;
    }
    for (cid, collider) in scene.colliders.iter().enumerate() {
        collider.validate(cid)?;
    }

    for (sid, shape) in scene.shapes.iter_mut().enumerate() {
        shape.emit_rng = Pcg32::new(params.seed, (sid * 2 + 1) as u64);

        shape.positions = shape.initial_positions.clone();
        shape.normals = shape.initial_normals.clone();
        shape.radius = shape.initial_radius.clone();
        shape.invmass = shape.initial_invmass.clone();
        shape.velocities = shape.initial_velocities.clone();
        shape.old_positions = shape.initial_positions.clone();
        shape.forces = vec![glam::Vec3::ZERO; shape.vertex_count()];
        shape.collisions.clear();

        for &index in &shape.initial_pinned {
            shape.invmass[index as usize] = 0.0;
        }

        // Perturb initial velocities. The draw order (direction pair, then
        // magnitude) is fixed so sequences reproduce; draws happen even when
        // the jitter scale is zero to keep the stream position stable.
        for velocity in &mut shape.velocities {
            let ruv = Vec2::new(shape.emit_rng.random(), shape.emit_rng.random());
            let magnitude: f32 = shape.emit_rng.random();
            *velocity += sample_sphere(ruv) * shape.emit_rngscale * magnitude;
        }

        shape.springs.clear();
        if shape.spring_coeff > 0.0 {
            // One spring per unique mesh edge, rest length from the current
            // geometry. Zero-length edges are a caller error and produce a
            // zero rest length here rather than a failure.
            for [v0, v1] in quad_edges(&shape.quads) {
                shape.springs.push(Spring {
                    vert0: v0,
                    vert1: v1,
                    rest: shape.positions[v0 as usize].distance(shape.positions[v1 as usize]),
                    coeff: shape.spring_coeff,
                });
            }
            // Two diagonal springs per quad, bracing opposite corners.
            for &[a, b, c, d] in &shape.quads {
                shape.springs.push(Spring {
                    vert0: a,
                    vert1: c,
                    rest: shape.positions[a as usize].distance(shape.positions[c as usize]),
                    coeff: shape.spring_coeff,
                });
                shape.springs.push(Spring {
                    vert0: b,
                    vert1: d,
                    rest: shape.positions[b as usize].distance(shape.positions[d as usize]),
                    coeff: shape.spring_coeff,
                });
            }
        }

        debug!(
            "init shape {sid}: {} vertices, {} springs, {} pinned",
            shape.vertex_count(),
            shape.springs.len(),
            shape.initial_pinned.len()
        );
    }

    for (cid, collider) in scene.colliders.iter_mut().enumerate() {
        collider.bvh = if !collider.quads.is_empty() {
            Bvh::from_quads(&collider.quads, &collider.positions, &collider.radius)
        } else {
            Bvh::from_triangles(&collider.triangles, &collider.positions, &collider.radius)
        };
        debug!(
            "init collider {cid}: {} faces",
            collider.quads.len().max(collider.triangles.len())
        );
    }

    Ok(())
}
