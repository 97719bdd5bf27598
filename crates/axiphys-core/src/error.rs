use thiserror::Error;

/// Engine error kinds. Only `SolverSingular` aborts a running step; the
/// others surface at the API boundary.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PhysicsError {
    /// The 3×3 impulse solve produced a singular or non-finite system.
    #[error("first-contact impulse hit a singular collision matrix")]
    SolverSingular,

    /// A shape without the simulation capability set was handed to the world,
    /// or a shape pair has no narrowphase handler.
    #[error("shape is not supported by the collision pipeline")]
    UnsupportedShape,

    /// `collision_pairs` was invoked on a broadphase with no implementation.
    #[error("broadphase does not implement collision_pairs")]
    UnknownBroadphase,

    /// A world-indexed accessor was used on a body that is not in a world.
    #[error("body is not attached to a world")]
    DetachedBody,
}
