use axiphys_core::{Scalar, Vec3};

/// Each row spans 12 degrees of freedom: `[v_i, ω_i, v_j, ω_j]`, three
/// scalars each. One-body rows leave the j half zero.
pub const DOF_PER_ROW: usize = 12;

/// Write a vector into one of the four 3-wide blocks of a row array.
/// Block 0 = linear i, 1 = angular i, 2 = linear j, 3 = angular j.
#[inline]
pub fn block(dst: &mut [Scalar; DOF_PER_ROW], slot: usize, v: Vec3) {
    let o = slot * 3;
    dst[o] = v.x;
    dst[o + 1] = v.y;
    dst[o + 2] = v.z;
}

/// One velocity-level constraint row in SPOOK canonical form.
#[derive(Clone, Debug)]
pub struct Equation {
    /// Jacobian.
    pub g: [Scalar; DOF_PER_ROW],
    /// Inverse mass-matrix diagonal trace; fixed bodies contribute zeros.
    pub minv: [Scalar; DOF_PER_ROW],
    /// Constraint violation (position error).
    pub q: [Scalar; DOF_PER_ROW],
    /// Constraint rate (current velocities).
    pub qdot: [Scalar; DOF_PER_ROW],
    /// External forces and torques.
    pub fext: [Scalar; DOF_PER_ROW],
    pub lower: Scalar,
    pub upper: Scalar,
    /// Bound flags are per row; an unbounded side skips clamping entirely.
    pub has_lower: bool,
    pub has_upper: bool,
    pub body_i: usize,
    /// `None` marks a one-body row (the partner is immovable).
    pub body_j: Option<usize>,
}

impl Equation {
    /// A non-penetration contact row: multiplier bounded to `[0, +∞)`.
    pub fn contact(body_i: usize, body_j: Option<usize>) -> Self {
        Self {
            g: [0.0; DOF_PER_ROW],
            minv: [0.0; DOF_PER_ROW],
            q: [0.0; DOF_PER_ROW],
            qdot: [0.0; DOF_PER_ROW],
            fext: [0.0; DOF_PER_ROW],
            lower: 0.0,
            upper: Scalar::INFINITY,
            has_lower: true,
            has_upper: false,
            body_i,
            body_j,
        }
    }

    /// An unbounded row (both multiplier sides free). Used for bilateral
    /// constraints and by the solver convergence tests.
    pub fn unbounded(body_i: usize, body_j: Option<usize>) -> Self {
        Self {
            lower: Scalar::NEG_INFINITY,
            upper: Scalar::INFINITY,
            has_lower: false,
            has_upper: false,
            ..Self::contact(body_i, body_j)
        }
    }
}
