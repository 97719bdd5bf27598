use axiphys_core::{
    hash_quat, hash_vec3, BodyId, Isometry, PhysicsError, Scalar, StepHasher, StepStage,
    StepStats, Vec3, Velocity,
};
use axiphys_collision::{narrowphase, Broadphase, ContactMatrix, NaiveBroadphase};
use axiphys_dynamics::{Bodies, RigidBody};
use axiphys_geom::{Material, Shape};
use axiphys_solver::{block, Equation, Solver, SolverScratch, SpookParams};
use axiphys_viz::{DebugSettings, Ledger, LedgerEvent, ScheduleRecorder};

mod impulse;

/* ---------------- Builder ---------------- */
pub struct WorldBuilder {
    pub bodies: usize,
}
impl WorldBuilder {
    pub fn new() -> Self { Self { bodies: 128 } }
    pub fn with_capacity(mut self, bodies: usize) -> Self {
        self.bodies = bodies; self
    }
    pub fn build(self) -> World { World::with_capacity(self.bodies) }
}
impl Default for WorldBuilder {
    fn default() -> Self { Self::new() }
}

/* ---------------- World ---------------- */
pub struct World {
    pub gravity: Vec3,
    /// Gauss–Seidel sweeps per solve.
    pub iterations: u32,
    pub spook: SpookParams,
    /// Gates the angular half of the first-contact impulse. Off by default.
    pub apply_impulse_angular: bool,
    pub paused: bool,
    pub time: Scalar,
    pub step_number: u64,

    bodies: Bodies,
    shapes: Vec<Shape>,
    materials: Vec<Material>,
    contacts: ContactMatrix,
    broadphase: Box<dyn Broadphase>,
    solver: Solver,
    scratch: SolverScratch,
    schedule: ScheduleRecorder,
    debug: DebugSettings,
    ledger: Ledger,
}

impl World {
    pub fn new() -> Self { Self::with_capacity(0) }

    pub fn with_capacity(bodies: usize) -> Self {
        Self {
            gravity: Vec3::ZERO,
            iterations: 10,
            spook: SpookParams::default(),
            apply_impulse_angular: false,
            paused: false,
            time: 0.0,
            step_number: 0,
            bodies: Bodies::with_capacity(bodies),
            shapes: Vec::with_capacity(bodies),
            materials: Vec::with_capacity(bodies),
            contacts: ContactMatrix::new(),
            broadphase: Box::new(NaiveBroadphase::new()),
            solver: Solver::new(),
            scratch: SolverScratch::new(),
            schedule: ScheduleRecorder::new(),
            debug: DebugSettings::default(),
            ledger: Ledger::new(4096),
        }
    }

    /* ---------- composition ---------- */

    /// Copy a detached body record into the world arrays, grow the contact
    /// matrix, and stamp the record with its dense index.
    pub fn add(&mut self, body: &mut RigidBody) -> Result<BodyId, PhysicsError> {
        let mut shape = *body.shape();
        if !shape.is_supported() {
            return Err(PhysicsError::UnsupportedShape);
        }
        // stored plane normals are unit length
        if let Shape::Plane { normal } = &mut shape {
            *normal = normal.try_normalize().unwrap_or(Vec3::Y);
        }
        let idx = self.bodies.add(body.state());
        self.shapes.push(shape);
        self.materials.push(body.material());
        self.contacts.resize(self.bodies.len());
        let id = BodyId(idx);
        body.attach(id);
        Ok(id)
    }

    pub fn set_broadphase(&mut self, bp: Box<dyn Broadphase>) {
        self.broadphase = bp;
    }

    pub fn set_debug(&mut self, cfg: DebugSettings) { self.debug = cfg; }

    /* ---------- accessors ---------- */
    #[inline] pub fn num_bodies(&self) -> usize { self.bodies.len() }
    #[inline] pub fn bodies(&self) -> &Bodies { &self.bodies }
    #[inline] pub fn shapes(&self) -> &[Shape] { &self.shapes }
    #[inline] pub fn contact_history(&self) -> &ContactMatrix { &self.contacts }
    #[inline] pub fn ledger(&self) -> &Ledger { &self.ledger }

    #[inline] pub fn body_pose(&self, id: BodyId) -> Isometry { self.bodies.pose(id.0) }
    #[inline] pub fn set_body_pose(&mut self, id: BodyId, pose: Isometry) { self.bodies.set_pose(id.0, pose); }
    #[inline] pub fn body_vel(&self, id: BodyId) -> Velocity { self.bodies.vel(id.0) }
    #[inline] pub fn set_body_vel(&mut self, id: BodyId, vel: Velocity) { self.bodies.set_vel(id.0, vel); }
    #[inline] pub fn apply_force(&mut self, id: BodyId, f: Vec3) { self.bodies.add_force(id.0, f); }
    #[inline] pub fn apply_torque(&mut self, id: BodyId, tau: Vec3) { self.bodies.add_torque(id.0, tau); }

    /// Forget all contact history involving `id`, in both bit planes. Its
    /// next touch against anything resolves as a first contact.
    pub fn clear_collision_state(&mut self, id: BodyId) {
        self.contacts.clear_body(id.index());
    }

    /* ---------- step ---------- */

    /// Advance the simulation by `dt`, which should equal the timestep the
    /// SPOOK coefficients are tuned for. Phases run in a fixed order; the
    /// schedule recorder folds that order into the step hash.
    pub fn step(&mut self, dt: Scalar) -> Result<StepStats, PhysicsError> {
        if self.paused {
            return Ok(StepStats::default());
        }
        self.schedule.clear();
        self.ledger.clear();
        let n = self.bodies.len();
        let mut stats = StepStats::default();

        // Broadphase
        self.schedule.push(StepStage::Broadphase);
        let (pairs_i, pairs_j) = self.broadphase.collision_pairs(&self.bodies, &self.shapes)?;
        stats.pairs_tested = pairs_i.len() as u32;

        // Per-step scratch; reallocates only when N grew
        self.scratch.reset(n);

        // Contact history: current plane becomes previous
        self.schedule.push(StepStage::RotateContacts);
        self.contacts.rotate();

        // Gravity
        self.schedule.push(StepStage::ApplyGravity);
        self.bodies.apply_gravity(self.gravity);

        // Solver reset for this step's rows
        self.solver.set_parameters(&self.spook, dt);
        self.solver.clear();

        // Narrowphase + dispatch
        self.schedule.push(StepStage::Narrowphase);
        for k in 0..pairs_i.len() {
            let (i, j) = (pairs_i[k], pairs_j[k]);
            match (self.shapes[i], self.shapes[j]) {
                (Shape::Sphere { r: r_i }, Shape::Sphere { r: r_j }) => {
                    stats.contacts += self.pair_sphere_sphere(i, j, r_i, r_j)?;
                }
                (Shape::Sphere { r }, Shape::Plane { normal }) => {
                    stats.contacts += self.pair_sphere_plane(i, j, r, normal)?;
                }
                (Shape::Plane { normal }, Shape::Sphere { r }) => {
                    stats.contacts += self.pair_sphere_plane(j, i, r, normal)?;
                }
                (Shape::Box { half }, Shape::Plane { normal }) => {
                    stats.contacts += self.pair_box_plane(i, j, half, normal)?;
                }
                (Shape::Plane { normal }, Shape::Box { half }) => {
                    stats.contacts += self.pair_box_plane(j, i, half, normal)?;
                }
                _ => {
                    stats.pairs_skipped += 1;
                    self.ledger.push(LedgerEvent::PairSkipped { a: i as u32, b: j as u32 });
                }
            }
        }

        // Solve persistent contacts and fold the corrections in
        self.schedule.push(StepStage::Solve);
        stats.equations = self.solver.len() as u32;
        if !self.solver.is_empty() {
            self.solver.solve(self.iterations, &mut self.scratch);
            self.ledger.push(LedgerEvent::SolveSummary {
                rows: stats.equations,
                iterations: self.iterations,
            });
            for i in 0..n as u32 {
                self.bodies.add_linvel(i, self.scratch.vlambda[i as usize]);
                self.bodies.add_angvel(i, self.scratch.wlambda[i as usize]);
            }
        }

        // Leapfrog integration
        self.schedule.push(StepStage::Integrate);
        self.bodies.integrate(dt);

        // Forces are per-step
        self.schedule.push(StepStage::ResetForces);
        self.bodies.reset_forces();

        if self.debug.print_every != 0 && (self.step_number as u32) % self.debug.print_every == 0 {
            self.print_debug_block(&stats);
            let _ = self.ledger.write_jsonl("out", self.step_number);
        }

        self.time += dt;
        self.step_number += 1;
        Ok(stats)
    }

    /// Blake3 digest of the full dynamic state plus the schedule that
    /// produced it. Two worlds agree on every step iff their inputs agree.
    pub fn step_hash(&self) -> [u8; 32] {
        let mut h = StepHasher::new();
        h.update_bytes(&self.step_number.to_le_bytes());
        h.update_bytes(&self.schedule.digest());
        for i in self.bodies.indices() {
            let pose = self.bodies.pose(i);
            let vel = self.bodies.vel(i);
            h.update_bytes(&i.to_le_bytes());
            hash_vec3(&mut h, &pose.pos);
            hash_quat(&mut h, &pose.rot);
            hash_vec3(&mut h, &vel.lin);
            hash_vec3(&mut h, &vel.ang);
        }
        h.finalize()
    }

    /* ---------- pair handlers ---------- */

    fn pair_sphere_plane(
        &mut self,
        s: usize,
        p: usize,
        r: Scalar,
        plane_normal: Vec3,
    ) -> Result<u32, PhysicsError> {
        let xs = self.bodies.pose(s as u32).pos;
        let xp = self.bodies.pose(p as u32).pos;
        let cp = match narrowphase::sphere_plane(xs, r, xp, plane_normal) {
            Some(cp) => cp,
            None => return Ok(0),
        };

        let first = !self.contacts.previous(s, p);
        self.contacts.set_current(s, p, true);
        self.ledger.push(LedgerEvent::ContactBegin {
            a: s as u32, b: p as u32, normal: cp.normal, depth: cp.depth,
        });

        if first {
            let u = self.bodies.vel(s as u32).lin - self.bodies.vel(p as u32).lin;
            let e = Material::combine_restitution(self.materials[s], self.materials[p]);
            let mu = Material::combine_friction(self.materials[s], self.materials[p]);
            let j = impulse::first_contact(
                &mut self.bodies, s as u32, p as u32,
                cp.ri, cp.rj, u, cp.normal, e, mu,
                self.apply_impulse_angular,
            )?;
            self.ledger.push(LedgerEvent::Impulse { a: s as u32, b: p as u32, j });
        } else {
            // One-body row on the sphere; the plane is immovable. The
            // angular block stays zero: sphere contacts carry no torque arm.
            let mut eq = Equation::contact(s, None);
            block(&mut eq.g, 0, -cp.normal);
            block(&mut eq.minv, 0, Vec3::splat(self.bodies.inv_mass_of(s as u32)));
            block(&mut eq.minv, 1, self.bodies.inv_inertia_of(s as u32));
            block(&mut eq.q, 0, -cp.qvec);
            block(&mut eq.qdot, 0, self.bodies.vel(s as u32).lin);
            block(&mut eq.fext, 0, self.bodies.force_of(s as u32));
            block(&mut eq.fext, 1, self.bodies.torque_of(s as u32));
            self.solver.add_equation(eq);
            self.ledger.push(LedgerEvent::RowAdded { a: s as u32, b: -1 });
        }
        Ok(1)
    }

    fn pair_sphere_sphere(
        &mut self,
        i: usize,
        j: usize,
        r_i: Scalar,
        r_j: Scalar,
    ) -> Result<u32, PhysicsError> {
        let xi = self.bodies.pose(i as u32).pos;
        let xj = self.bodies.pose(j as u32).pos;
        let cp = match narrowphase::sphere_sphere(xi, r_i, xj, r_j) {
            Some(cp) => cp,
            None => return Ok(0),
        };

        let first = !self.contacts.previous(i, j);
        self.contacts.set_current(i, j, true);
        self.ledger.push(LedgerEvent::ContactBegin {
            a: i as u32, b: j as u32, normal: cp.normal, depth: cp.depth,
        });

        if first {
            let u = self.bodies.vel(i as u32).lin - self.bodies.vel(j as u32).lin;
            let e = Material::combine_restitution(self.materials[i], self.materials[j]);
            let mu = Material::combine_friction(self.materials[i], self.materials[j]);
            let imp = impulse::first_contact(
                &mut self.bodies, i as u32, j as u32,
                cp.ri, cp.rj, u, cp.normal, e, mu,
                self.apply_impulse_angular,
            )?;
            self.ledger.push(LedgerEvent::Impulse { a: i as u32, b: j as u32, j: imp });
        } else {
            // Two-body row, linear-only Jacobian (the angular cross terms
            // are deliberately absent from this contact model).
            let mut eq = Equation::contact(i, Some(j));
            block(&mut eq.g, 0, -cp.normal);
            block(&mut eq.g, 2, cp.normal);
            block(&mut eq.minv, 0, Vec3::splat(self.bodies.inv_mass_of(i as u32)));
            block(&mut eq.minv, 1, self.bodies.inv_inertia_of(i as u32));
            block(&mut eq.minv, 2, Vec3::splat(self.bodies.inv_mass_of(j as u32)));
            block(&mut eq.minv, 3, self.bodies.inv_inertia_of(j as u32));
            block(&mut eq.q, 0, -cp.qvec);
            block(&mut eq.q, 2, cp.qvec);
            block(&mut eq.qdot, 0, self.bodies.vel(i as u32).lin);
            block(&mut eq.qdot, 2, self.bodies.vel(j as u32).lin);
            block(&mut eq.fext, 0, self.bodies.force_of(i as u32));
            block(&mut eq.fext, 1, self.bodies.torque_of(i as u32));
            block(&mut eq.fext, 2, self.bodies.force_of(j as u32));
            block(&mut eq.fext, 3, self.bodies.torque_of(j as u32));
            self.solver.add_equation(eq);
            self.ledger.push(LedgerEvent::RowAdded { a: i as u32, b: j as i32 });
        }
        Ok(1)
    }

    fn pair_box_plane(
        &mut self,
        b: usize,
        p: usize,
        half: Vec3,
        plane_normal: Vec3,
    ) -> Result<u32, PhysicsError> {
        let pose = self.bodies.pose(b as u32);
        let xp = self.bodies.pose(p as u32).pos;
        let cps = narrowphase::box_plane(pose.pos, half, pose.rot, xp, plane_normal);
        if cps.is_empty() {
            return Ok(0);
        }

        let first = !self.contacts.previous(b, p);
        self.contacts.set_current(b, p, true);

        let mut emitted = 0u32;
        for cp in &cps {
            self.ledger.push(LedgerEvent::ContactBegin {
                a: b as u32, b: p as u32, normal: cp.normal, depth: cp.depth,
            });
            if first {
                let u = self.bodies.vel(b as u32).lin - self.bodies.vel(p as u32).lin;
                let e = Material::combine_restitution(self.materials[b], self.materials[p]);
                let mu = Material::combine_friction(self.materials[b], self.materials[p]);
                let j = impulse::first_contact(
                    &mut self.bodies, b as u32, p as u32,
                    cp.ri, cp.rj, u, cp.normal, e, mu,
                    self.apply_impulse_angular,
                )?;
                self.ledger.push(LedgerEvent::Impulse { a: b as u32, b: p as u32, j });
            } else {
                // One-body row with the full angular arm (−n, −r×n, 0, 0).
                // The box's world inertia is the componentwise |R·I| diagonal
                // approximation.
                let mut eq = Equation::contact(b, None);
                block(&mut eq.g, 0, -cp.normal);
                block(&mut eq.g, 1, -cp.ri.cross(cp.normal));
                block(&mut eq.minv, 0, Vec3::splat(self.bodies.inv_mass_of(b as u32)));
                block(&mut eq.minv, 1, axiphys_core::inv_diag(self.bodies.world_inertia_of(b as u32)));
                block(&mut eq.q, 0, -cp.qvec);
                block(&mut eq.qdot, 0, self.bodies.vel(b as u32).lin);
                block(&mut eq.qdot, 1, self.bodies.vel(b as u32).ang);
                block(&mut eq.fext, 0, self.bodies.force_of(b as u32));
                block(&mut eq.fext, 1, self.bodies.torque_of(b as u32));
                self.solver.add_equation(eq);
                self.ledger.push(LedgerEvent::RowAdded { a: b as u32, b: -1 });
            }
            emitted += 1;
        }
        Ok(emitted)
    }

    /* ---------- debug printer ---------- */
    fn print_debug_block(&self, stats: &StepStats) {
        println!(
            "--- debug @ step {}  pairs={} contacts={} rows={} ---",
            self.step_number, stats.pairs_tested, stats.contacts, stats.equations
        );

        if self.debug.show_energy {
            let mut ke = 0.0f32;
            for i in self.bodies.indices() {
                let im = self.bodies.inv_mass_of(i);
                if im > 0.0 {
                    let v = self.bodies.vel(i).lin;
                    ke += 0.5 * (1.0 / im) * v.length_squared();
                }
            }
            println!("energy: KE_total = {:.6}", ke);
        }

        if self.debug.show_bodies {
            let mut lines = 0usize;
            for i in self.bodies.indices() {
                let p = self.bodies.pose(i).pos;
                let v = self.bodies.vel(i).lin;
                println!(
                    "body {:3}  pos=({:+.3},{:+.3},{:+.3})  vel=({:+.3},{:+.3},{:+.3})",
                    i, p.x, p.y, p.z, v.x, v.y, v.z
                );
                lines += 1;
                if lines >= self.debug.max_lines { break; }
            }
        }

        if self.debug.show_contacts {
            let mut shown = 0usize;
            for e in self.ledger.iter() {
                if let LedgerEvent::ContactBegin { a, b, normal, depth } = e {
                    println!(
                        "contact  a={} b={}  n=({:+.3},{:+.3},{:+.3})  depth={:.5}",
                        a, b, normal.x, normal.y, normal.z, depth
                    );
                    shown += 1;
                    if shown >= self.debug.max_lines { break; }
                }
            }
            if shown == 0 {
                println!("contacts: (none)");
            }
        }
    }
}

impl Default for World {
    fn default() -> Self { Self::new() }
}
