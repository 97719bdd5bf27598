use axiphys_core::{Scalar, Vec3};

/// Collision primitives. `Plane` normals are stored unit length (the world
/// normalizes on add); `Box` carries half-extents.
#[derive(Copy, Clone, Debug)]
pub enum Shape {
    Sphere { r: Scalar },
    Plane { normal: Vec3 },
    Box { half: Vec3 },
}

impl Shape {
    /// Radius of the bounding sphere used by the broadphase culls. Planes are
    /// unbounded; the engine never asks for their radius.
    pub fn bounding_sphere_radius(&self) -> Scalar {
        match *self {
            Shape::Sphere { r } => r,
            Shape::Plane { .. } => Scalar::INFINITY,
            Shape::Box { half } => half.length(),
        }
    }

    /// Diagonal local inertia for the given mass. Planes are static and carry
    /// zero inertia.
    pub fn local_inertia(&self, mass: Scalar) -> Vec3 {
        match *self {
            Shape::Sphere { r } => Vec3::splat(0.4 * mass * r * r),
            Shape::Plane { .. } => Vec3::ZERO,
            Shape::Box { half } => {
                let d = half * 2.0;
                let (x2, y2, z2) = (d.x * d.x, d.y * d.y, d.z * d.z);
                Vec3::new(
                    (1.0 / 12.0) * mass * (y2 + z2),
                    (1.0 / 12.0) * mass * (x2 + z2),
                    (1.0 / 12.0) * mass * (x2 + y2),
                )
            }
        }
    }

    /// Capability probe checked by `World::add`: a shape must provide both a
    /// bounding radius and a local inertia to be stepped. Every built-in
    /// variant does; this is where future shapes opt in.
    #[inline]
    pub fn is_supported(&self) -> bool {
        matches!(self, Shape::Sphere { .. } | Shape::Plane { .. } | Shape::Box { .. })
    }
}

/// The 8 corner offsets of a box in its local frame.
pub fn box_corners(half: Vec3) -> [Vec3; 8] {
    [
        Vec3::new(half.x, half.y, half.z),
        Vec3::new(-half.x, half.y, half.z),
        Vec3::new(half.x, -half.y, half.z),
        Vec3::new(half.x, half.y, -half.z),
        Vec3::new(-half.x, -half.y, half.z),
        Vec3::new(half.x, -half.y, -half.z),
        Vec3::new(-half.x, half.y, -half.z),
        Vec3::new(-half.x, -half.y, -half.z),
    ]
}
