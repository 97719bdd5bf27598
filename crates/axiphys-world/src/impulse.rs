use axiphys_core::{cross_matrix, inv_diag, solve3, Mat3, PhysicsError, Scalar, Vec3};
use axiphys_dynamics::Bodies;

/// First-contact resolution. Builds the 3×3 collision matrix
/// `K = (1/mᵢ + 1/mⱼ)·I₃ − rᵢ^× Iᵢ⁻¹ rᵢ^× − rⱼ^× Iⱼ⁻¹ rⱼ^×`, solves for the
/// impulse that leaves the pair separating at `−e·(u·n)`, clamps it onto the
/// Coulomb cone, and applies the velocity change.
///
/// `u` is the relative velocity of body i with respect to body j and `n`
/// points outward from body i. Returns the applied impulse.
pub(crate) fn first_contact(
    bodies: &mut Bodies,
    i: u32,
    j: u32,
    ri: Vec3,
    rj: Vec3,
    u: Vec3,
    n: Vec3,
    e: Scalar,
    mu: Scalar,
    apply_angular: bool,
) -> Result<Vec3, PhysicsError> {
    let im_i = bodies.inv_mass_of(i);
    let im_j = bodies.inv_mass_of(j);
    let inv_inertia_i = inv_diag(bodies.inertia_of(i));
    let inv_inertia_j = inv_diag(bodies.inertia_of(j));

    let rx_i = cross_matrix(ri);
    let rx_j = cross_matrix(rj);
    let k = Mat3::from_diagonal(Vec3::splat(im_i + im_j).into())
        - rx_i * Mat3::from_diagonal(inv_inertia_i.into()) * rx_i
        - rx_j * Mat3::from_diagonal(inv_inertia_j.into()) * rx_j;

    let un = u.dot(n);
    let target = n * (-e * un);
    let mut imp = solve3(k, target - u)?;

    // Coulomb cone: if the tangential part exceeds μ·|Jn|, recompute along
    // the sliding tangent. A head-on hit has no tangent; the closed form
    // then degenerates to a pure normal impulse. μ = 0 keeps this path
    // present but the cone collapses to the contact normal.
    let jn = imp.dot(n);
    let jt = imp - n * jn;
    if jt.length() > mu * jn.abs() {
        let ut = u - n * un;
        let t = ut.try_normalize().unwrap_or(Vec3::ZERO);
        let denom = n.dot(k * (n - t * mu));
        if denom != 0.0 {
            let scalar_imp = -(1.0 + e) * un / denom;
            imp = n * scalar_imp - t * (mu * scalar_imp);
        }
    }

    bodies.add_linvel(i, imp * im_i);
    bodies.add_linvel(j, -(imp * im_j));
    if apply_angular {
        bodies.add_angvel(i, inv_inertia_i * ri.cross(imp));
        bodies.add_angvel(j, -(inv_inertia_j * rj.cross(imp)));
    }
    Ok(imp)
}
