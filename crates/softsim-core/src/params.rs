use std::str::FromStr;

use glam::Vec2;

use crate::error::SimError;

/// Which integration strategy advances a frame.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum SolverKind {
    /// Explicit sub-stepped penalty springs (stiff, needs small sub-steps).
    #[default]
    MassSpring,
    /// Predict/relax position-based dynamics (unconditionally stable).
    PositionBased,
}

impl FromStr for SolverKind {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mass-spring" | "massspring" => Ok(Self::MassSpring),
            "position-based" | "pbd" => Ok(Self::PositionBased),
            other => Err(SimError::UnknownSolver(other.to_string())),
        }
    }
}

/// Numeric selectors cross untyped boundaries (wasm, config files); anything
/// outside the known set is a fatal configuration error.
impl TryFrom<u32> for SolverKind {
    type Error = SimError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::MassSpring),
            1 => Ok(Self::PositionBased),
            other => Err(SimError::UnknownSolver(other.to_string())),
        }
    }
}

/// Per-run simulation parameters, fixed for the duration of a run.
#[derive(Clone, Copy, Debug)]
pub struct SimulationParams {
    pub solver: SolverKind,
    /// Number of frames `simulate_frames` advances.
    pub frames: u32,
    /// Gravity magnitude; acts along -Y.
    pub gravity: f32,
    /// Frame time step in seconds.
    pub deltat: f32,
    /// Sub-step count (mass-spring) or relaxation iteration count (PBD).
    pub substeps: u32,
    /// Global velocity damping factor, applied once per frame.
    pub damping: f32,
    /// Speeds below this are zeroed after damping (anti-jitter).
    pub min_velocity: f32,
    /// Collision response: `x` damps the tangential velocity component,
    /// `y` damps the reflected normal component.
    pub bounce: Vec2,
    /// Seed for the per-shape RNG streams.
    pub seed: u64,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            solver: SolverKind::MassSpring,
            frames: 120,
            gravity: 9.8,
            deltat: 1.0 / 60.0,
            substeps: 200,
            damping: 2.0,
            min_velocity: 0.01,
            bounce: Vec2::new(0.05, 1.0),
            seed: 42,
        }
    }
}
