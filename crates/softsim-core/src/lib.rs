//! Per-frame particle and cloth physics.
//!
//! The crate advances point-mass bodies (free particle clouds and cloth
//! sheets) under gravity, internal springs, and collisions against static
//! colliders, with two interchangeable integrators: an explicit sub-stepped
//! mass-spring solver and a position-based (PBD) solver.
//!
//! Typical use:
//!
//! ```no_run
//! use glam::Vec3;
//! use softsim_core::{init_simulation, simulate_frame, Scene, SimulationParams};
//!
//! let mut scene = Scene::new();
//! let ball = scene.add_particles(
//!     vec![0],
//!     vec![Vec3::new(0.0, 1.0, 0.0)],
//!     vec![0.01],
//!     1.0,
//!     0.0,
//! );
//! let params = SimulationParams::default();
//! init_simulation(&mut scene, &params)?;
//! for _ in 0..params.frames {
//!     simulate_frame(&mut scene, &params);
//!     let (positions, normals) = scene.shape(ball).frame_output();
//!     // hand positions/normals to the presentation layer
//! }
//! # Ok::<(), softsim_core::SimError>(())
//! ```
//!
//! Determinism: runs with the same seed, parameters, and scene reproduce
//! bit-identical trajectories. All randomness flows through per-shape PCG
//! streams seeded by the initializer; there is no hidden global RNG.

pub mod bvh;
pub mod collision;
pub mod error;
pub mod init;
pub mod math;
pub mod mesh;
pub mod params;
pub mod scene;
pub mod solver;

pub use error::SimError;
pub use init::init_simulation;
pub use params::{SimulationParams, SolverKind};
pub use scene::{Collider, ColliderId, Contact, Scene, Shape, ShapeId, Spring};
pub use solver::{simulate_frame, simulate_frames, ProgressCallback};
