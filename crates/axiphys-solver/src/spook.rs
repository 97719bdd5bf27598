use axiphys_core::{Scalar, Vec3};

use crate::equation::{Equation, DOF_PER_ROW};

/// Global spring/damper specification the SPOOK coefficients derive from.
/// `stiffness` is the constraint spring constant; `damping` counts the steps
/// to stabilization.
#[derive(Copy, Clone, Debug)]
pub struct SpookParams {
    pub stiffness: Scalar,
    pub damping: Scalar,
}

impl Default for SpookParams {
    fn default() -> Self { Self { stiffness: 3000.0, damping: 3.0 } }
}

impl SpookParams {
    #[inline]
    pub fn a(&self, h: Scalar) -> Scalar {
        4.0 / (h * (1.0 + 4.0 * self.damping))
    }

    #[inline]
    pub fn b(&self) -> Scalar {
        (4.0 * self.damping) / (1.0 + 4.0 * self.damping)
    }

    #[inline]
    pub fn eps(&self, h: Scalar) -> Scalar {
        4.0 / (h * h * self.stiffness * (1.0 + 4.0 * self.damping))
    }
}

/// Per-body velocity corrections accumulated by the solver. Cached by the
/// world and re-zeroed each step; it only reallocates when the body count
/// grows.
#[derive(Default)]
pub struct SolverScratch {
    pub vlambda: Vec<Vec3>,
    pub wlambda: Vec<Vec3>,
}

impl SolverScratch {
    pub fn new() -> Self { Self::default() }

    pub fn reset(&mut self, n: usize) {
        self.vlambda.resize(n, Vec3::ZERO);
        self.wlambda.resize(n, Vec3::ZERO);
        self.vlambda.fill(Vec3::ZERO);
        self.wlambda.fill(Vec3::ZERO);
    }
}

/// Projected Gauss–Seidel over SPOOK rows. Row order equals insertion order
/// and every sweep walks rows in ascending index, so the iteration is
/// deterministic.
pub struct Solver {
    equations: Vec<Equation>,
    h: Scalar,
    a: Scalar,
    b: Scalar,
    eps: Scalar,
}

impl Solver {
    pub fn new() -> Self {
        Self { equations: Vec::new(), h: 1.0 / 60.0, a: 0.0, b: 0.0, eps: 0.0 }
    }

    /// Recompute the SPOOK coefficients for this step's timestep.
    pub fn set_parameters(&mut self, params: &SpookParams, h: Scalar) {
        self.h = h;
        self.a = params.a(h);
        self.b = params.b();
        self.eps = params.eps(h);
    }

    pub fn clear(&mut self) {
        self.equations.clear();
    }

    pub fn add_equation(&mut self, eq: Equation) {
        self.equations.push(eq);
    }

    #[inline] pub fn len(&self) -> usize { self.equations.len() }
    #[inline] pub fn is_empty(&self) -> bool { self.equations.is_empty() }
    #[inline] pub fn eps(&self) -> Scalar { self.eps }

    /// Run `iterations` sweeps, accumulating velocity corrections into
    /// `scratch`. Returns the final multipliers (exposed for the residual
    /// tests; the world only consumes the scratch).
    pub fn solve(&self, iterations: u32, scratch: &mut SolverScratch) -> Vec<Scalar> {
        let rows = self.equations.len();
        let mut lambda = vec![0.0 as Scalar; rows];
        let mut b_rhs = vec![0.0 as Scalar; rows];
        let mut c_inv = vec![0.0 as Scalar; rows];

        for (l, eq) in self.equations.iter().enumerate() {
            let mut gmg = 0.0;
            let mut gq = 0.0;
            let mut gw = 0.0;
            let mut gmf = 0.0;
            for k in 0..DOF_PER_ROW {
                gmg += eq.g[k] * eq.g[k] * eq.minv[k];
                gq += eq.g[k] * eq.q[k];
                gw += eq.g[k] * eq.qdot[k];
                gmf += eq.g[k] * eq.minv[k] * eq.fext[k];
            }
            c_inv[l] = 1.0 / (gmg + self.eps);
            b_rhs[l] = -self.a * gq - self.b * gw - self.h * gmf;
        }

        for _ in 0..iterations {
            for l in 0..rows {
                let eq = &self.equations[l];

                // Gu = G · vλ over both bodies' six DoFs
                let vi = scratch.vlambda[eq.body_i];
                let wi = scratch.wlambda[eq.body_i];
                let mut gu = eq.g[0] * vi.x + eq.g[1] * vi.y + eq.g[2] * vi.z
                    + eq.g[3] * wi.x + eq.g[4] * wi.y + eq.g[5] * wi.z;
                if let Some(j) = eq.body_j {
                    let vj = scratch.vlambda[j];
                    let wj = scratch.wlambda[j];
                    gu += eq.g[6] * vj.x + eq.g[7] * vj.y + eq.g[8] * vj.z
                        + eq.g[9] * wj.x + eq.g[10] * wj.y + eq.g[11] * wj.z;
                }

                let mut delta = c_inv[l] * (b_rhs[l] - gu - self.eps * lambda[l]);
                let mut next = lambda[l] + delta;
                if eq.has_lower && next < eq.lower { next = eq.lower; }
                if eq.has_upper && next > eq.upper { next = eq.upper; }
                delta = next - lambda[l];
                lambda[l] = next;

                // scatter: vλ += Δλ · M⁻¹ · Gᵀ
                {
                    let vi = &mut scratch.vlambda[eq.body_i];
                    vi.x += delta * eq.minv[0] * eq.g[0];
                    vi.y += delta * eq.minv[1] * eq.g[1];
                    vi.z += delta * eq.minv[2] * eq.g[2];
                    let wi = &mut scratch.wlambda[eq.body_i];
                    wi.x += delta * eq.minv[3] * eq.g[3];
                    wi.y += delta * eq.minv[4] * eq.g[4];
                    wi.z += delta * eq.minv[5] * eq.g[5];
                }
                if let Some(j) = eq.body_j {
                    let vj = &mut scratch.vlambda[j];
                    vj.x += delta * eq.minv[6] * eq.g[6];
                    vj.y += delta * eq.minv[7] * eq.g[7];
                    vj.z += delta * eq.minv[8] * eq.g[8];
                    let wj = &mut scratch.wlambda[j];
                    wj.x += delta * eq.minv[9] * eq.g[9];
                    wj.y += delta * eq.minv[10] * eq.g[10];
                    wj.z += delta * eq.minv[11] * eq.g[11];
                }
            }
        }
        lambda
    }
}

impl Default for Solver {
    fn default() -> Self { Self::new() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::equation::block;
    use axiphys_core::vec3;

    const H: Scalar = 1.0 / 60.0;

    fn params() -> SpookParams { SpookParams::default() }

    #[test]
    fn spook_coefficients_match_the_closed_forms() {
        let p = params(); // k = 3000, d = 3
        assert!((p.a(H) - 240.0 / 13.0).abs() < 1e-4);
        assert!((p.b() - 12.0 / 13.0).abs() < 1e-6);
        assert!((p.eps(H) - 4.0 / (H * H * 3000.0 * 13.0)).abs() < 1e-4);
    }

    /// One unbounded row on one body: after convergence the row must satisfy
    /// G·vλ + ε·λ = B.
    #[test]
    fn unconstrained_row_satisfies_the_spook_equation() {
        let mut eq = Equation::unbounded(0, None);
        block(&mut eq.g, 0, vec3(0.0, 1.0, 0.0));
        for k in 0..6 { eq.minv[k] = 1.0; }
        block(&mut eq.q, 0, vec3(0.0, -0.05, 0.0));
        block(&mut eq.qdot, 0, vec3(0.0, -1.0, 0.0));
        block(&mut eq.fext, 0, vec3(0.0, -9.82, 0.0));

        let mut solver = Solver::new();
        solver.set_parameters(&params(), H);
        solver.add_equation(eq);

        let mut scratch = SolverScratch::new();
        scratch.reset(1);
        let lambda = solver.solve(20, &mut scratch);

        let gu = scratch.vlambda[0].y; // G = (0,1,0) on the linear block
        let gq = -0.05;
        let gw = -1.0;
        let gmf = -9.82;
        let b = -params().a(H) * gq - params().b() * gw - H * gmf;
        let residual = (gu + solver.eps() * lambda[0] - b).abs();
        assert!(residual < 1e-4, "residual {residual}");
    }

    #[test]
    fn contact_row_never_pulls() {
        // separating contact: relative velocity already positive and no
        // penetration, so the multiplier must clamp at zero
        let mut eq = Equation::contact(0, None);
        block(&mut eq.g, 0, vec3(0.0, 1.0, 0.0));
        for k in 0..6 { eq.minv[k] = 1.0; }
        block(&mut eq.qdot, 0, vec3(0.0, 5.0, 0.0));

        let mut solver = Solver::new();
        solver.set_parameters(&params(), H);
        solver.add_equation(eq);

        let mut scratch = SolverScratch::new();
        scratch.reset(1);
        let lambda = solver.solve(10, &mut scratch);
        assert_eq!(lambda[0], 0.0);
        assert_eq!(scratch.vlambda[0], Vec3::ZERO);
    }

    #[test]
    fn fewer_iterations_degrade_but_stay_bounded() {
        let build = |iters: u32| {
            let mut eq = Equation::contact(0, None);
            block(&mut eq.g, 0, vec3(0.0, 1.0, 0.0));
            for k in 0..6 { eq.minv[k] = 1.0; }
            block(&mut eq.q, 0, vec3(0.0, -0.1, 0.0));
            let mut solver = Solver::new();
            solver.set_parameters(&params(), H);
            solver.add_equation(eq);
            let mut scratch = SolverScratch::new();
            scratch.reset(1);
            solver.solve(iters, &mut scratch);
            scratch.vlambda[0].y
        };
        let v1 = build(1);
        let v10 = build(10);
        assert!(v1.is_finite() && v10.is_finite());
        assert!(v1 >= 0.0 && v10 >= 0.0);
        assert!(v10 < 100.0); // bounded input, bounded correction
    }

    #[test]
    fn two_body_row_pushes_bodies_apart() {
        // unit spheres penetrating along x, linear-only Jacobian
        let n = vec3(1.0, 0.0, 0.0);
        let mut eq = Equation::contact(0, Some(1));
        block(&mut eq.g, 0, -n);
        block(&mut eq.g, 2, n);
        for k in 0..DOF_PER_ROW { eq.minv[k] = 1.0; }
        block(&mut eq.q, 0, vec3(0.2, 0.0, 0.0));  // −qvec, qvec = −0.2·x
        block(&mut eq.q, 2, vec3(-0.2, 0.0, 0.0));

        let mut solver = Solver::new();
        solver.set_parameters(&params(), H);
        solver.add_equation(eq);
        let mut scratch = SolverScratch::new();
        scratch.reset(2);
        solver.solve(10, &mut scratch);

        assert!(scratch.vlambda[0].x < 0.0, "body 0 pushed −x");
        assert!(scratch.vlambda[1].x > 0.0, "body 1 pushed +x");
        assert!((scratch.vlambda[0].x + scratch.vlambda[1].x).abs() < 1e-6);
    }
}
