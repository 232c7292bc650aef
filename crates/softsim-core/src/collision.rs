//! Point-vs-collider query used by both solvers.

use glam::Vec3;

use crate::math::{interpolate_quad, interpolate_triangle, Ray};
use crate::scene::Collider;

/// Surface point and normal where a query point hit a collider.
#[derive(Clone, Copy, Debug)]
pub struct CollisionHit {
    pub position: Vec3,
    pub normal: Vec3,
}

/// Test whether `point` is inside `collider`.
///
/// Casts a ray from the point straight up (+Y) and takes the nearest
/// intersection with the collider's indexed faces (quads take precedence
/// over triangles). The point counts as colliding when the interpolated
/// surface normal faces along the ray, i.e. the ray exits the surface from
/// below. This single-ray parity test is only reliable for convex,
/// single-layer colliders; concave or multi-layer geometry can be
/// misclassified. An empty collider never reports a hit.
pub fn collide_collider(collider: &Collider, point: Vec3) -> Option<CollisionHit> {
    let ray = Ray::new(point, Vec3::Y);

    let (hit_position, hit_normal) = if !collider.quads.is_empty() {
        let hit = collider.bvh.nearest_hit(&ray, |face, ray| {
            let [a, b, c, d] = collider.quads[face as usize];
            crate::math::intersect_quad(
                ray,
                collider.positions[a as usize],
                collider.positions[b as usize],
                collider.positions[c as usize],
                collider.positions[d as usize],
            )
        })?;
        let [a, b, c, d] = collider.quads[hit.face as usize];
        let position = interpolate_quad(
            collider.positions[a as usize],
            collider.positions[b as usize],
            collider.positions[c as usize],
            collider.positions[d as usize],
            hit.uv,
        );
        let normal = interpolate_quad(
            collider.normals[a as usize],
            collider.normals[b as usize],
            collider.normals[c as usize],
            collider.normals[d as usize],
            hit.uv,
        )
        .normalize_or_zero();
        (position, normal)
    } else {
        let hit = collider.bvh.nearest_hit(&ray, |face, ray| {
            let [a, b, c] = collider.triangles[face as usize];
            crate::math::intersect_triangle(
                ray,
                collider.positions[a as usize],
                collider.positions[b as usize],
                collider.positions[c as usize],
            )
        })?;
        let [a, b, c] = collider.triangles[hit.face as usize];
        let position = interpolate_triangle(
            collider.positions[a as usize],
            collider.positions[b as usize],
            collider.positions[c as usize],
            hit.uv,
        );
        let normal = interpolate_triangle(
            collider.normals[a as usize],
            collider.normals[b as usize],
            collider.normals[c as usize],
            hit.uv,
        )
        .normalize_or_zero();
        (position, normal)
    };

    if hit_normal.dot(ray.dir) > 0.0 {
        Some(CollisionHit {
            position: hit_position,
            normal: hit_normal,
        })
    } else {
        None
    }
}
