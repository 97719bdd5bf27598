pub mod broadphase;
pub mod contact_matrix;
pub mod narrowphase;

pub use broadphase::{Broadphase, NaiveBroadphase};
pub use contact_matrix::ContactMatrix;
pub use narrowphase::ContactPoint;
