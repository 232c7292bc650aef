use thiserror::Error;

/// Errors raised by scene validation and configuration.
///
/// All of these are structural: they indicate bad input, not a transient
/// condition, and a run must abort rather than continue with partial state.
#[derive(Debug, Error)]
pub enum SimError {
    /// Solver selector that does not name a known solver.
    #[error("unknown solver `{0}`")]
    UnknownSolver(String),

    /// A per-vertex array whose length disagrees with the shape's vertex count.
    #[error("shape {shape}: `{array}` has {got} entries, expected {expected}")]
    ShapeArrayMismatch {
        shape: usize,
        array: &'static str,
        got: usize,
        expected: usize,
    },

    /// A per-vertex array whose length disagrees with the collider's vertex count.
    #[error("collider {collider}: `{array}` has {got} entries, expected {expected}")]
    ColliderArrayMismatch {
        collider: usize,
        array: &'static str,
        got: usize,
        expected: usize,
    },

    /// A topology or pinned index referencing a vertex that does not exist.
    #[error("shape {shape}: vertex index {index} out of bounds ({count} vertices)")]
    VertexIndexOutOfBounds {
        shape: usize,
        index: u32,
        count: usize,
    },

    /// A collider face index referencing a vertex that does not exist.
    #[error("collider {collider}: vertex index {index} out of bounds ({count} vertices)")]
    ColliderIndexOutOfBounds {
        collider: usize,
        index: u32,
        count: usize,
    },
}
