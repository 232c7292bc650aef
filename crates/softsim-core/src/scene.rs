//! Scene model: shapes (simulated bodies), colliders (static geometry), and
//! the arena that owns them.
//!
//! Shapes carry two parallel sets of per-vertex arrays. The `initial_*`
//! arrays are authored once at creation time and never mutated afterwards;
//! the working arrays are rebuilt from them by
//! [`init_simulation`](crate::init::init_simulation) and are the only state
//! the solvers touch. Re-initializing therefore restores a scene exactly.

use glam::Vec3;
use rand_pcg::Pcg32;

use crate::bvh::Bvh;
use crate::error::SimError;

/// Stable handle to a shape in a [`Scene`].
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ShapeId(pub(crate) u32);

impl ShapeId {
    /// Position of the shape in [`Scene::shapes`]; ids are dense and handed
    /// out in creation order.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Stable handle to a collider in a [`Scene`].
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ColliderId(pub(crate) u32);

impl ColliderId {
    /// Position of the collider in [`Scene::colliders`].
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Damped spring between two vertices of the same shape.
///
/// `rest` is fixed when the spring list is built from the current geometry;
/// `coeff` is the shape's stiffness coefficient (smaller = stiffer in the
/// mass-spring force law, closer to 0 = stiffer in the PBD correction).
#[derive(Clone, Copy, Debug)]
pub struct Spring {
    pub vert0: u32,
    pub vert1: u32,
    pub rest: f32,
    pub coeff: f32,
}

/// A collision recorded for one vertex: where it hit a collider and the
/// surface normal there. Rebuilt every frame, never persisted.
#[derive(Clone, Copy, Debug)]
pub struct Contact {
    pub vert: u32,
    pub position: Vec3,
    pub normal: Vec3,
}

/// A simulated body: a free particle cloud (`points`) or a cloth sheet
/// (`quads`, with `spring_coeff > 0` enabling springs).
pub struct Shape {
    // Topology, immutable after creation.
    pub points: Vec<u32>,
    pub triangles: Vec<[u32; 3]>,
    pub quads: Vec<[u32; 4]>,

    // Authored state, never mutated after creation.
    pub initial_positions: Vec<Vec3>,
    pub initial_normals: Vec<Vec3>,
    pub initial_radius: Vec<f32>,
    pub initial_invmass: Vec<f32>,
    pub initial_velocities: Vec<Vec3>,
    pub initial_pinned: Vec<u32>,
    /// Scale of the random velocity perturbation applied at init.
    pub emit_rngscale: f32,
    /// Spring stiffness coefficient; 0 disables springs.
    pub spring_coeff: f32,

    // Working state, rebuilt by the initializer every run.
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub radius: Vec<f32>,
    pub invmass: Vec<f32>,
    pub velocities: Vec<Vec3>,
    pub old_positions: Vec<Vec3>,
    pub forces: Vec<Vec3>,
    pub springs: Vec<Spring>,
    pub collisions: Vec<Contact>,
    pub(crate) emit_rng: Pcg32,
}

impl Shape {
    fn empty() -> Self {
        Self {
            points: Vec::new(),
            triangles: Vec::new(),
            quads: Vec::new(),
            initial_positions: Vec::new(),
            initial_normals: Vec::new(),
            initial_radius: Vec::new(),
            initial_invmass: Vec::new(),
            initial_velocities: Vec::new(),
            initial_pinned: Vec::new(),
            emit_rngscale: 0.0,
            spring_coeff: 0.0,
            positions: Vec::new(),
            normals: Vec::new(),
            radius: Vec::new(),
            invmass: Vec::new(),
            velocities: Vec::new(),
            old_positions: Vec::new(),
            forces: Vec::new(),
            springs: Vec::new(),
            collisions: Vec::new(),
            emit_rng: Pcg32::new(0, 1),
        }
    }

    /// Number of simulated vertices.
    pub fn vertex_count(&self) -> usize {
        self.initial_positions.len()
    }

    /// Overwrite the authored velocities and jitter scale.
    pub fn set_velocities(&mut self, velocity: Vec3, random_scale: f32) {
        self.initial_velocities.fill(velocity);
        self.emit_rngscale = random_scale;
    }

    /// Current frame output, polled by the presentation layer after each
    /// simulated frame.
    pub fn frame_output(&self) -> (&[Vec3], &[Vec3]) {
        (&self.positions, &self.normals)
    }

    /// Check the authored arrays against the fail-fast preconditions: every
    /// per-vertex array has the same length, and every index is in bounds.
    pub fn validate(&self, shape: usize) -> Result<(), SimError> {
        let expected = self.vertex_count();
        let arrays: [(&'static str, usize); 4] = [
            ("initial_normals", self.initial_normals.len()),
            ("initial_radius", self.initial_radius.len()),
            ("initial_invmass", self.initial_invmass.len()),
            ("initial_velocities", self.initial_velocities.len()),
        ];
        for (array, got) in arrays {
            if got != expected {
                return Err(SimError::ShapeArrayMismatch {
                    shape,
                    array,
                    got,
                    expected,
                });
            }
        }

        let check = |index: u32| -> Result<(), SimError> {
            if (index as usize) < expected {
                Ok(())
            } else {
                Err(SimError::VertexIndexOutOfBounds {
                    shape,
                    index,
                    count: expected,
                })
            }
        };
        for &p in &self.points {
            check(p)?;
        }
        for t in &self.triangles {
            for &v in t {
                check(v)?;
            }
        }
        for q in &self.quads {
            for &v in q {
                check(v)?;
            }
        }
        for &p in &self.initial_pinned {
            check(p)?;
        }
        Ok(())
    }
}

/// Static collision geometry: triangles or quads (quads take precedence when
/// both are present), plus a BVH built once at init and read-only afterwards.
pub struct Collider {
    pub triangles: Vec<[u32; 3]>,
    pub quads: Vec<[u32; 4]>,
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub radius: Vec<f32>,
    pub(crate) bvh: Bvh,
}

impl Collider {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn validate(&self, collider: usize) -> Result<(), SimError> {
        let expected = self.vertex_count();
        let arrays: [(&'static str, usize); 2] =
            [("normals", self.normals.len()), ("radius", self.radius.len())];
        for (array, got) in arrays {
            if got != expected {
                return Err(SimError::ColliderArrayMismatch {
                    collider,
                    array,
                    got,
                    expected,
                });
            }
        }
        let check = |index: u32| -> Result<(), SimError> {
            if (index as usize) < expected {
                Ok(())
            } else {
                Err(SimError::ColliderIndexOutOfBounds {
                    collider,
                    index,
                    count: expected,
                })
            }
        };
        for t in &self.triangles {
            for &v in t {
                check(v)?;
            }
        }
        for q in &self.quads {
            for &v in q {
                check(v)?;
            }
        }
        Ok(())
    }
}

/// Owns all shapes and colliders of a simulation; pure data.
#[derive(Default)]
pub struct Scene {
    pub(crate) shapes: Vec<Shape>,
    pub(crate) colliders: Vec<Collider>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a free particle cloud. `mass` is the total mass of the cloud,
    /// split evenly across vertices; `random_velocity` is the jitter scale
    /// applied to the initial velocities at init time.
    pub fn add_particles(
        &mut self,
        points: Vec<u32>,
        positions: Vec<Vec3>,
        radius: Vec<f32>,
        mass: f32,
        random_velocity: f32,
    ) -> ShapeId {
        let n = positions.len();
        let mut shape = Shape::empty();
        shape.points = points;
        shape.initial_normals = vec![Vec3::Z; n];
        shape.initial_radius = radius;
        shape.initial_invmass = vec![1.0 / (mass * n as f32); n];
        shape.initial_velocities = vec![Vec3::ZERO; n];
        shape.initial_positions = positions;
        shape.emit_rngscale = random_velocity;
        self.push_shape(shape)
    }

    /// Add a cloth sheet. `coeff > 0` enables springs over the quad edges
    /// and diagonals; `pinned` lists vertices held immovable.
    #[allow(clippy::too_many_arguments)]
    pub fn add_cloth(
        &mut self,
        quads: Vec<[u32; 4]>,
        positions: Vec<Vec3>,
        normals: Vec<Vec3>,
        radius: Vec<f32>,
        mass: f32,
        coeff: f32,
        pinned: Vec<u32>,
    ) -> ShapeId {
        let n = positions.len();
        let mut shape = Shape::empty();
        shape.quads = quads;
        shape.initial_normals = normals;
        shape.initial_radius = radius;
        shape.initial_invmass = vec![1.0 / (mass * n as f32); n];
        shape.initial_velocities = vec![Vec3::ZERO; n];
        shape.initial_positions = positions;
        shape.initial_pinned = pinned;
        shape.spring_coeff = coeff;
        self.push_shape(shape)
    }

    /// Add a static collider. Quads take precedence over triangles when both
    /// are non-empty.
    pub fn add_collider(
        &mut self,
        triangles: Vec<[u32; 3]>,
        quads: Vec<[u32; 4]>,
        positions: Vec<Vec3>,
        normals: Vec<Vec3>,
        radius: Vec<f32>,
    ) -> ColliderId {
        let id = ColliderId(self.colliders.len() as u32);
        self.colliders.push(Collider {
            triangles,
            quads,
            positions,
            normals,
            radius,
            bvh: Bvh::default(),
        });
        id
    }

    fn push_shape(&mut self, shape: Shape) -> ShapeId {
        let id = ShapeId(self.shapes.len() as u32);
        self.shapes.push(shape);
        id
    }

    pub fn shape(&self, id: ShapeId) -> &Shape {
        &self.shapes[id.0 as usize]
    }

    pub fn shape_mut(&mut self, id: ShapeId) -> &mut Shape {
        &mut self.shapes[id.0 as usize]
    }

    pub fn collider(&self, id: ColliderId) -> &Collider {
        &self.colliders[id.0 as usize]
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn colliders(&self) -> &[Collider] {
        &self.colliders
    }

    /// Split borrow for the solvers: shapes are mutated per frame while
    /// colliders stay read-only.
    pub(crate) fn split_mut(&mut self) -> (&mut [Shape], &[Collider]) {
        (&mut self.shapes, &self.colliders)
    }
}
