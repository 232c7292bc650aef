//! Bounding volume hierarchy over collider faces.
//!
//! Built once per collider at initialization and read-only afterwards, so
//! concurrent queries need no synchronization. The tree is a binary median
//! split on the longest axis of the face centroids, with small leaves; boxes
//! are padded by the per-vertex radius so thick vertices are not missed.

use glam::{Vec2, Vec3};

use crate::math::Ray;

const MAX_LEAF_FACES: usize = 4;

/// Axis-aligned bounding box.
#[derive(Clone, Copy, Debug)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    fn empty() -> Self {
        Self {
            min: Vec3::splat(f32::MAX),
            max: Vec3::splat(f32::MIN),
        }
    }

    fn expand_point(&mut self, p: Vec3, pad: f32) {
        self.min = self.min.min(p - Vec3::splat(pad));
        self.max = self.max.max(p + Vec3::splat(pad));
    }

    fn expand(&mut self, other: &Aabb) {
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
    }

    fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    fn longest_axis(&self) -> usize {
        let e = self.max - self.min;
        if e.x >= e.y && e.x >= e.z {
            0
        } else if e.y >= e.z {
            1
        } else {
            2
        }
    }

    /// Slab test: does the ray's `[tmin, tmax]` interval overlap this box?
    fn hit_by(&self, ray: &Ray) -> bool {
        let mut tmin = ray.tmin;
        let mut tmax = ray.tmax;
        for axis in 0..3 {
            let inv_d = 1.0 / ray.dir[axis];
            let mut t0 = (self.min[axis] - ray.origin[axis]) * inv_d;
            let mut t1 = (self.max[axis] - ray.origin[axis]) * inv_d;
            if inv_d < 0.0 {
                std::mem::swap(&mut t0, &mut t1);
            }
            tmin = tmin.max(t0);
            tmax = tmax.min(t1);
            if tmax < tmin {
                return false;
            }
        }
        true
    }
}

enum Node {
    Leaf {
        bbox: Aabb,
        faces: Vec<u32>,
    },
    Internal {
        bbox: Aabb,
        left: Box<Node>,
        right: Box<Node>,
    },
}

impl Node {
    fn bbox(&self) -> &Aabb {
        match self {
            Node::Leaf { bbox, .. } | Node::Internal { bbox, .. } => bbox,
        }
    }
}

/// The nearest face intersected by a query ray.
#[derive(Clone, Copy, Debug)]
pub struct FaceHit {
    /// Index into the collider's face list.
    pub face: u32,
    /// Barycentric (triangles) or bilinear (quads) coordinates of the hit.
    pub uv: Vec2,
    /// Ray parameter of the hit.
    pub distance: f32,
}

/// Spatial index over a fixed set of faces.
#[derive(Default)]
pub struct Bvh {
    root: Option<Box<Node>>,
}

impl Bvh {
    /// Build over a triangle list. `radius` pads each vertex's extent.
    pub fn from_triangles(triangles: &[[u32; 3]], positions: &[Vec3], radius: &[f32]) -> Self {
        let boxes = triangles
            .iter()
            .enumerate()
            .map(|(i, face)| {
                let mut bbox = Aabb::empty();
                for &v in face {
                    bbox.expand_point(positions[v as usize], radius[v as usize]);
                }
                (i as u32, bbox)
            })
            .collect();
        Self::build(boxes)
    }

    /// Build over a quad list. `radius` pads each vertex's extent.
    pub fn from_quads(quads: &[[u32; 4]], positions: &[Vec3], radius: &[f32]) -> Self {
        let boxes = quads
            .iter()
            .enumerate()
            .map(|(i, face)| {
                let mut bbox = Aabb::empty();
                for &v in face {
                    bbox.expand_point(positions[v as usize], radius[v as usize]);
                }
                (i as u32, bbox)
            })
            .collect();
        Self::build(boxes)
    }

    fn build(mut boxes: Vec<(u32, Aabb)>) -> Self {
        if boxes.is_empty() {
            return Self { root: None };
        }
        let root = Some(Self::build_node(&mut boxes));
        Self { root }
    }

    fn build_node(boxes: &mut [(u32, Aabb)]) -> Box<Node> {
        let mut bbox = Aabb::empty();
        for (_, b) in boxes.iter() {
            bbox.expand(b);
        }

        if boxes.len() <= MAX_LEAF_FACES {
            return Box::new(Node::Leaf {
                bbox,
                faces: boxes.iter().map(|(i, _)| *i).collect(),
            });
        }

        let axis = bbox.longest_axis();
        boxes.sort_unstable_by(|a, b| a.1.center()[axis].total_cmp(&b.1.center()[axis]));
        let mid = boxes.len() / 2;
        let (lo, hi) = boxes.split_at_mut(mid);

        Box::new(Node::Internal {
            bbox,
            left: Self::build_node(lo),
            right: Self::build_node(hi),
        })
    }

    /// Nearest intersection along `ray`, testing candidate faces with the
    /// caller-supplied primitive test. The ray's `tmax` shrinks as hits are
    /// found, so far subtrees are pruned.
    pub fn nearest_hit<F>(&self, ray: &Ray, intersect: F) -> Option<FaceHit>
    where
        F: Fn(u32, &Ray) -> Option<(f32, Vec2)>,
    {
        let root = self.root.as_ref()?;
        let mut clipped = *ray;
        let mut best = None;
        Self::intersect_node(root, &mut clipped, &intersect, &mut best);
        best
    }

    fn intersect_node<F>(
        node: &Node,
        ray: &mut Ray,
        intersect: &F,
        best: &mut Option<FaceHit>,
    ) where
        F: Fn(u32, &Ray) -> Option<(f32, Vec2)>,
    {
        if !node.bbox().hit_by(ray) {
            return;
        }
        match node {
            Node::Leaf { faces, .. } => {
                for &face in faces {
                    if let Some((t, uv)) = intersect(face, ray) {
                        ray.tmax = t;
                        *best = Some(FaceHit {
                            face,
                            uv,
                            distance: t,
                        });
                    }
                }
            }
            Node::Internal { left, right, .. } => {
                Self::intersect_node(left, ray, intersect, best);
                Self::intersect_node(right, ray, intersect, best);
            }
        }
    }
}
