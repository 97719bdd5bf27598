/// The engine computes in 32-bit floats throughout.
pub type Scalar = f32;
