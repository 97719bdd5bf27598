use axiphys_core::{BodyId, PhysicsError, Scalar, Vec3, Isometry, Velocity};
use axiphys_geom::{Material, Shape};
use glam::Quat;

use crate::bodies::{Bodies, BodyState};

/// A body record. Created detached; `World::add` copies the record into the
/// world's arrays and stamps the id. After that the world accessors are
/// authoritative: the record keeps the last detached state, and the
/// `*_in` getters forward to the world arrays when attached.
#[derive(Clone, Debug)]
pub struct RigidBody {
    shape: Shape,
    mass: Scalar,
    material: Material,
    pose: Isometry,
    vel: Velocity,
    force: Vec3,
    torque: Vec3,
    id: Option<BodyId>,
}

impl RigidBody {
    pub fn new(mass: Scalar, shape: Shape) -> Self {
        Self {
            shape,
            mass,
            material: Material::default(),
            pose: Isometry::default(),
            vel: Velocity::default(),
            force: Vec3::ZERO,
            torque: Vec3::ZERO,
            id: None,
        }
    }

    pub fn with_position(mut self, p: Vec3) -> Self { self.pose.pos = p; self }
    pub fn with_velocity(mut self, v: Vec3) -> Self { self.vel.lin = v; self }
    pub fn with_material(mut self, m: Material) -> Self { self.material = m; self }

    /* -------- record accessors (valid detached; stale once attached) -------- */
    #[inline] pub fn shape(&self) -> &Shape { &self.shape }
    #[inline] pub fn mass(&self) -> Scalar { self.mass }
    #[inline] pub fn material(&self) -> Material { self.material }
    #[inline] pub fn position(&self) -> Vec3 { self.pose.pos }
    #[inline] pub fn set_position(&mut self, p: Vec3) { self.pose.pos = p; }
    #[inline] pub fn orientation(&self) -> Quat { self.pose.rot }
    #[inline] pub fn set_orientation(&mut self, q: Quat) { self.pose.rot = q; }
    #[inline] pub fn velocity(&self) -> Vec3 { self.vel.lin }
    #[inline] pub fn set_velocity(&mut self, v: Vec3) { self.vel.lin = v; }
    #[inline] pub fn angular_velocity(&self) -> Vec3 { self.vel.ang }
    #[inline] pub fn set_angular_velocity(&mut self, w: Vec3) { self.vel.ang = w; }
    #[inline] pub fn force(&self) -> Vec3 { self.force }
    #[inline] pub fn set_force(&mut self, f: Vec3) { self.force = f; }
    #[inline] pub fn torque(&self) -> Vec3 { self.torque }
    #[inline] pub fn set_torque(&mut self, t: Vec3) { self.torque = t; }

    /* -------- world-forwarding getters -------- */
    /// Position from the world arrays when attached, the record otherwise.
    pub fn position_in(&self, bodies: &Bodies) -> Vec3 {
        match self.id {
            Some(id) => bodies.pose(id.0).pos,
            None => self.pose.pos,
        }
    }

    /// Linear velocity from the world arrays when attached, the record
    /// otherwise.
    pub fn velocity_in(&self, bodies: &Bodies) -> Vec3 {
        match self.id {
            Some(id) => bodies.vel(id.0).lin,
            None => self.vel.lin,
        }
    }

    /* -------- attachment -------- */
    #[inline] pub fn id(&self) -> Option<BodyId> { self.id }

    /// Dense index in the owning world. Detached bodies have none.
    pub fn attached_index(&self) -> Result<usize, PhysicsError> {
        self.id.map(|id| id.index()).ok_or(PhysicsError::DetachedBody)
    }

    /// Called by `World::add` once the record has been copied in.
    pub fn attach(&mut self, id: BodyId) {
        self.id = Some(id);
    }

    /// The dynamic state `World::add` copies into the SoA arrays.
    pub fn state(&self) -> BodyState {
        BodyState {
            pose: self.pose,
            vel: self.vel,
            force: self.force,
            torque: self.torque,
            mass: self.mass,
            inertia: self.shape.local_inertia(self.mass),
        }
    }
}
