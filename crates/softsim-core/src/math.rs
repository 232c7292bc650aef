use glam::{Vec2, Vec3};

/// Offset below which a ray ignores intersections, so a point sitting on a
/// surface does not immediately re-hit it.
pub const RAY_EPS: f32 = 1e-4;

/// A ray with a valid parameter interval `[tmin, tmax]`.
#[derive(Clone, Copy, Debug)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
    pub tmin: f32,
    pub tmax: f32,
}

impl Ray {
    pub fn new(origin: Vec3, dir: Vec3) -> Self {
        Self {
            origin,
            dir,
            tmin: RAY_EPS,
            tmax: f32::MAX,
        }
    }
}

/// Uniform direction on the unit sphere from two uniforms in [0,1).
pub fn sample_sphere(ruv: Vec2) -> Vec3 {
    let z = 2.0 * ruv.y - 1.0;
    let r = (1.0 - z * z).clamp(0.0, 1.0).sqrt();
    let phi = 2.0 * std::f32::consts::PI * ruv.x;
    Vec3::new(r * phi.cos(), r * phi.sin(), z)
}

/// Barycentric interpolation over a triangle.
pub fn interpolate_triangle(p0: Vec3, p1: Vec3, p2: Vec3, uv: Vec2) -> Vec3 {
    p0 * (1.0 - uv.x - uv.y) + p1 * uv.x + p2 * uv.y
}

/// Bilinear interpolation over a quad, split along the same diagonal as
/// [`intersect_quad`] so interpolated attributes match the reported uv.
pub fn interpolate_quad(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3, uv: Vec2) -> Vec3 {
    if uv.x + uv.y <= 1.0 {
        interpolate_triangle(p0, p1, p3, uv)
    } else {
        interpolate_triangle(p2, p3, p1, Vec2::ONE - uv)
    }
}

/// Möller–Trumbore ray/triangle intersection.
///
/// Returns the ray parameter and barycentric uv of the hit, or `None` if the
/// ray misses or the hit falls outside `[tmin, tmax]`.
pub fn intersect_triangle(ray: &Ray, p0: Vec3, p1: Vec3, p2: Vec3) -> Option<(f32, Vec2)> {
    let edge1 = p1 - p0;
    let edge2 = p2 - p0;
    let pvec = ray.dir.cross(edge2);
    let det = edge1.dot(pvec);
    if det == 0.0 {
        return None;
    }
    let inv_det = 1.0 / det;

    let tvec = ray.origin - p0;
    let u = tvec.dot(pvec) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let qvec = tvec.cross(edge1);
    let v = ray.dir.dot(qvec) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = edge2.dot(qvec) * inv_det;
    if t < ray.tmin || t > ray.tmax {
        return None;
    }

    Some((t, Vec2::new(u, v)))
}

/// Ray/quad intersection as two triangles sharing the `p1..p3` diagonal.
///
/// Hits in the second half report `1 - uv` so the full quad parameterization
/// stays continuous for bilinear interpolation.
pub fn intersect_quad(
    ray: &Ray,
    p0: Vec3,
    p1: Vec3,
    p2: Vec3,
    p3: Vec3,
) -> Option<(f32, Vec2)> {
    // Degenerate quads (last vertex repeated) are triangles.
    if p2 == p3 {
        return intersect_triangle(ray, p0, p1, p3);
    }

    let mut clipped = *ray;
    let mut best = None;
    if let Some((t, uv)) = intersect_triangle(&clipped, p0, p1, p3) {
        clipped.tmax = t;
        best = Some((t, uv));
    }
    if let Some((t, uv)) = intersect_triangle(&clipped, p2, p3, p1) {
        best = Some((t, Vec2::ONE - uv));
    }
    best
}
