pub mod bodies;
pub mod body;

pub use bodies::{Bodies, BodyState};
pub use body::RigidBody;
