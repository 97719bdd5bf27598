use axiphys_core::{Scalar, Vec3, Isometry, Velocity, inv_diag};
use glam::Quat;

/// Snapshot of one body's dynamic state, used when copying a detached record
/// into the world arrays.
#[derive(Copy, Clone, Debug)]
pub struct BodyState {
    pub pose: Isometry,
    pub vel: Velocity,
    pub force: Vec3,
    pub torque: Vec3,
    pub mass: Scalar,
    pub inertia: Vec3,
}

/// SoA body storage with dense index = id semantics. One entry per array per
/// body; `fixed[i]` iff `mass[i] <= 0` iff `inv_mass[i] == 0`.
pub struct Bodies {
    pos: Vec<Vec3>,
    rot: Vec<Quat>,
    linvel: Vec<Vec3>,
    angvel: Vec<Vec3>,
    force: Vec<Vec3>,
    torque: Vec<Vec3>,
    mass: Vec<Scalar>,
    inv_mass: Vec<Scalar>,
    inertia: Vec<Vec3>, // diagonal, local frame
    fixed: Vec<bool>,
}

impl Bodies {
    pub fn with_capacity(cap: usize) -> Self {
        Self {
            pos: Vec::with_capacity(cap),
            rot: Vec::with_capacity(cap),
            linvel: Vec::with_capacity(cap),
            angvel: Vec::with_capacity(cap),
            force: Vec::with_capacity(cap),
            torque: Vec::with_capacity(cap),
            mass: Vec::with_capacity(cap),
            inv_mass: Vec::with_capacity(cap),
            inertia: Vec::with_capacity(cap),
            fixed: Vec::with_capacity(cap),
        }
    }

    /// Append one body; returns its dense index.
    pub fn add(&mut self, state: BodyState) -> u32 {
        let fixed = state.mass <= 0.0;
        self.pos.push(state.pose.pos);
        self.rot.push(state.pose.rot);
        self.linvel.push(state.vel.lin);
        self.angvel.push(state.vel.ang);
        self.force.push(state.force);
        self.torque.push(state.torque);
        self.mass.push(state.mass);
        self.inv_mass.push(if fixed { 0.0 } else { 1.0 / state.mass });
        self.inertia.push(state.inertia);
        self.fixed.push(fixed);
        (self.pos.len() as u32) - 1
    }

    #[inline] pub fn len(&self) -> usize { self.pos.len() }
    #[inline] pub fn is_empty(&self) -> bool { self.pos.is_empty() }

    /* -------- accessors -------- */
    #[inline] pub fn pose(&self, id: u32) -> Isometry {
        let i = id as usize;
        Isometry { pos: self.pos[i], rot: self.rot[i] }
    }
    #[inline] pub fn set_pose(&mut self, id: u32, iso: Isometry) {
        let i = id as usize;
        self.pos[i] = iso.pos;
        self.rot[i] = iso.rot;
    }
    #[inline] pub fn vel(&self, id: u32) -> Velocity {
        let i = id as usize;
        Velocity { lin: self.linvel[i], ang: self.angvel[i] }
    }
    #[inline] pub fn set_vel(&mut self, id: u32, v: Velocity) {
        let i = id as usize;
        self.linvel[i] = v.lin;
        self.angvel[i] = v.ang;
    }
    #[inline] pub fn force_of(&self, id: u32) -> Vec3 { self.force[id as usize] }
    #[inline] pub fn torque_of(&self, id: u32) -> Vec3 { self.torque[id as usize] }
    #[inline] pub fn mass_of(&self, id: u32) -> Scalar { self.mass[id as usize] }
    #[inline] pub fn inv_mass_of(&self, id: u32) -> Scalar { self.inv_mass[id as usize] }
    #[inline] pub fn is_fixed(&self, id: u32) -> bool { self.fixed[id as usize] }

    /// Diagonal local inertia as stored.
    #[inline] pub fn inertia_of(&self, id: u32) -> Vec3 { self.inertia[id as usize] }

    /// Componentwise inverse of the local inertia diagonal (≤ 0 inverts to 0).
    #[inline] pub fn inv_inertia_of(&self, id: u32) -> Vec3 { inv_diag(self.inertia[id as usize]) }

    /// World-frame diagonal inertia approximation: componentwise
    /// `|R · I_local|`. Only sound near axis-aligned orientations; kept to
    /// match the box contact model this engine implements.
    #[inline] pub fn world_inertia_of(&self, id: u32) -> Vec3 {
        let i = id as usize;
        (self.rot[i] * self.inertia[i]).abs()
    }

    /* -------- force & velocity application -------- */
    #[inline] pub fn add_force(&mut self, id: u32, f: Vec3) { self.force[id as usize] += f; }
    #[inline] pub fn add_torque(&mut self, id: u32, tau: Vec3) { self.torque[id as usize] += tau; }
    #[inline] pub fn add_linvel(&mut self, id: u32, dv: Vec3) { self.linvel[id as usize] += dv; }
    #[inline] pub fn add_angvel(&mut self, id: u32, dw: Vec3) { self.angvel[id as usize] += dw; }

    /// `f += g·m` on every body. Fixed bodies never integrate, so any force
    /// they accumulate here is inert.
    pub fn apply_gravity(&mut self, g: Vec3) {
        for i in 0..self.len() {
            self.force[i] += g * self.mass[i];
        }
    }

    /// Semi-implicit leapfrog: velocity from force, then position from the
    /// new velocity; quaternion derivative `q̇ = ½(0,ω)q`, renormalized.
    pub fn integrate(&mut self, dt: Scalar) {
        for i in 0..self.len() {
            if self.fixed[i] { continue; }
            self.linvel[i] += self.force[i] * self.inv_mass[i] * dt;
            self.angvel[i] += self.torque[i] * inv_diag(self.inertia[i]) * dt;
            self.pos[i] += self.linvel[i] * dt;

            let w = self.angvel[i];
            let q = self.rot[i];
            let dq = Quat::from_xyzw(w.x, w.y, w.z, 0.0) * q;
            self.rot[i] = Quat::from_xyzw(
                q.x + 0.5 * dq.x * dt,
                q.y + 0.5 * dq.y * dt,
                q.z + 0.5 * dq.z * dt,
                q.w + 0.5 * dq.w * dt,
            )
            .normalize();
        }
    }

    pub fn reset_forces(&mut self) {
        for f in self.force.iter_mut() { *f = Vec3::ZERO; }
        for t in self.torque.iter_mut() { *t = Vec3::ZERO; }
    }

    /// Stable-order index iterator for hashing.
    pub fn indices(&self) -> impl ExactSizeIterator<Item = u32> + '_ {
        0..(self.len() as u32)
    }
}

impl Default for Bodies {
    fn default() -> Self { Self::with_capacity(0) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axiphys_core::{vec3, iso, quat_identity};

    fn state(mass: Scalar, pos: Vec3, vel: Vec3) -> BodyState {
        BodyState {
            pose: iso(pos, quat_identity()),
            vel: Velocity { lin: vel, ang: Vec3::ZERO },
            force: Vec3::ZERO,
            torque: Vec3::ZERO,
            mass,
            inertia: Vec3::splat(0.4 * mass),
        }
    }

    #[test]
    fn add_assigns_dense_indices_and_inverse_mass() {
        let mut b = Bodies::with_capacity(4);
        let i0 = b.add(state(2.0, Vec3::ZERO, Vec3::ZERO));
        let i1 = b.add(state(0.0, Vec3::ZERO, Vec3::ZERO));
        assert_eq!((i0, i1), (0, 1));
        assert!((b.inv_mass_of(0) * b.mass_of(0) - 1.0).abs() < 1e-6);
        assert!(b.is_fixed(1));
        assert_eq!(b.inv_mass_of(1), 0.0);
        assert_eq!(b.mass_of(1), 0.0);
    }

    #[test]
    fn integrate_is_identity_on_velocity_without_forces() {
        let mut b = Bodies::default();
        b.add(state(1.0, vec3(0.0, 0.0, 0.0), vec3(3.0, 0.0, -1.0)));
        b.integrate(1.0 / 60.0);
        let v = b.vel(0);
        assert_eq!(v.lin, vec3(3.0, 0.0, -1.0));
        let p = b.pose(0).pos;
        assert!((p - vec3(3.0, 0.0, -1.0) / 60.0).length() < 1e-6);
    }

    #[test]
    fn integrate_applies_force_before_position() {
        // leapfrog: the new velocity moves the body this very step
        let mut b = Bodies::default();
        b.add(state(2.0, Vec3::ZERO, Vec3::ZERO));
        b.add_force(0, vec3(0.0, -19.64, 0.0));
        let dt = 0.5;
        b.integrate(dt);
        let v = b.vel(0).lin;
        assert!((v.y + 4.91).abs() < 1e-4);
        assert!((b.pose(0).pos.y - v.y * dt).abs() < 1e-5);
    }

    #[test]
    fn fixed_bodies_never_move() {
        let mut b = Bodies::default();
        b.add(state(0.0, vec3(1.0, 2.0, 3.0), Vec3::ZERO));
        b.add_force(0, vec3(100.0, 100.0, 100.0));
        b.integrate(1.0 / 60.0);
        assert_eq!(b.pose(0).pos, vec3(1.0, 2.0, 3.0));
        assert_eq!(b.vel(0).lin, Vec3::ZERO);
    }

    #[test]
    fn quaternion_stays_unit_under_spin() {
        let mut b = Bodies::default();
        let mut s = state(1.0, Vec3::ZERO, Vec3::ZERO);
        s.vel.ang = vec3(3.0, -2.0, 1.0);
        b.add(s);
        for _ in 0..240 {
            b.integrate(1.0 / 60.0);
        }
        assert!((b.pose(0).rot.length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn reset_forces_clears_both_accumulators() {
        let mut b = Bodies::default();
        b.add(state(1.0, Vec3::ZERO, Vec3::ZERO));
        b.add_force(0, vec3(1.0, 0.0, 0.0));
        b.add_torque(0, vec3(0.0, 1.0, 0.0));
        b.reset_forces();
        assert_eq!(b.force_of(0), Vec3::ZERO);
        assert_eq!(b.torque_of(0), Vec3::ZERO);
    }
}
