//! Small indexed-mesh utilities shared by the initializer and the solvers.

use std::collections::HashSet;

use glam::Vec3;

/// Unique undirected edges of a quad mesh.
///
/// Edges are emitted in first-seen order while walking faces, so the result
/// is deterministic for a given face list. Degenerate quads with a repeated
/// last vertex contribute three edges instead of four.
pub fn quad_edges(quads: &[[u32; 4]]) -> Vec<[u32; 2]> {
    let mut seen = HashSet::new();
    let mut edges = Vec::new();
    for &[a, b, c, d] in quads {
        let sides: [[u32; 2]; 4] = [[a, b], [b, c], [c, d], [d, a]];
        for [v0, v1] in sides {
            if v0 == v1 {
                continue;
            }
            let key = if v0 < v1 { (v0, v1) } else { (v1, v0) };
            if seen.insert(key) {
                edges.push([key.0, key.1]);
            }
        }
    }
    edges
}

/// Smooth per-vertex normals of a triangle mesh.
///
/// Face normals are accumulated unnormalized (area weighting) and normalized
/// at the end; isolated vertices end up with a zero normal.
pub fn triangle_vertex_normals(triangles: &[[u32; 3]], positions: &[Vec3]) -> Vec<Vec3> {
    let mut normals = vec![Vec3::ZERO; positions.len()];
    for &[a, b, c] in triangles {
        let n = (positions[b as usize] - positions[a as usize])
            .cross(positions[c as usize] - positions[a as usize]);
        normals[a as usize] += n;
        normals[b as usize] += n;
        normals[c as usize] += n;
    }
    for n in &mut normals {
        *n = n.normalize_or_zero();
    }
    normals
}

/// Smooth per-vertex normals of a quad mesh.
pub fn quad_vertex_normals(quads: &[[u32; 4]], positions: &[Vec3]) -> Vec<Vec3> {
    let mut normals = vec![Vec3::ZERO; positions.len()];
    for &[a, b, c, d] in quads {
        let (pa, pb, pc, pd) = (
            positions[a as usize],
            positions[b as usize],
            positions[c as usize],
            positions[d as usize],
        );
        // Sum of the two corner cross products; robust for non-planar quads.
        let n = (pb - pa).cross(pd - pa) + (pd - pc).cross(pb - pc);
        normals[a as usize] += n;
        normals[b as usize] += n;
        normals[c as usize] += n;
        if c != d {
            normals[d as usize] += n;
        }
    }
    for n in &mut normals {
        *n = n.normalize_or_zero();
    }
    normals
}
