use axiphys_core::Scalar;

/// Per-body surface properties consumed by the first-contact impulse. The
/// defaults keep contacts perfectly inelastic and frictionless.
#[derive(Copy, Clone, Debug)]
pub struct Material {
    pub restitution: Scalar,
    pub friction: Scalar,
}

impl Default for Material {
    fn default() -> Self { Self { restitution: 0.0, friction: 0.0 } }
}

impl Material {
    pub fn new(restitution: Scalar, friction: Scalar) -> Self {
        Self { restitution, friction }
    }

    /// Pairwise restitution: the bouncier surface wins.
    #[inline]
    pub fn combine_restitution(a: Material, b: Material) -> Scalar {
        a.restitution.max(b.restitution)
    }

    /// Pairwise friction: geometric mean, so one frictionless surface makes
    /// the contact frictionless.
    #[inline]
    pub fn combine_friction(a: Material, b: Material) -> Scalar {
        (a.friction * b.friction).abs().sqrt()
    }
}
