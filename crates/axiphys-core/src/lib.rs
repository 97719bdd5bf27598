pub mod scalar;
pub mod ids;
pub mod types;
pub mod math;
pub mod error;
pub mod hash;
pub mod time;
pub mod schedule;
pub mod rng;
pub mod determinism;

pub use scalar::Scalar;
pub use ids::BodyId;
pub use types::{Vec3, Mat3, Isometry, Velocity, vec3, iso, quat_identity};
pub use math::{cross_matrix, inv_diag, solve3};
pub use error::PhysicsError;
pub use hash::{StepHasher, hash_scalar, hash_vec3, hash_quat};
pub use time::StepStats;
pub use schedule::{StepStage, schedule_digest};
pub use rng::XorShift64;
pub use determinism::DeterminismContract;
pub use glam::Quat;
