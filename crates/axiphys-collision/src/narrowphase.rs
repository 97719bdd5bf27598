use axiphys_core::{Scalar, Vec3};
use axiphys_geom::box_corners;
use glam::Quat;

/// Box–plane pairs emit at most this many corner contacts.
pub const MAX_BOX_PLANE_CONTACTS: usize = 4;

/// One contact in the canonical solver form. `normal` points outward from
/// body i, `ri`/`rj` run from each body center to the contact point, and
/// `depth == qvec.dot(normal)` is negative exactly when the pair penetrates.
#[derive(Copy, Clone, Debug)]
pub struct ContactPoint {
    pub ri: Vec3,
    pub rj: Vec3,
    pub normal: Vec3,
    pub qvec: Vec3,
    pub depth: Scalar,
}

/// Sphere (body i) against plane (body j). The plane normal is flipped so
/// the contact normal points from the sphere toward the plane.
pub fn sphere_plane(x_s: Vec3, r: Scalar, x_p: Vec3, plane_normal: Vec3) -> Option<ContactPoint> {
    let n = -plane_normal;
    let rs = n * r;
    let projected = x_s - plane_normal * plane_normal.dot(x_s - x_p);
    let qvec = projected - x_s - rs;
    let depth = qvec.dot(n);
    if depth < 0.0 {
        Some(ContactPoint { ri: rs, rj: projected - x_p, normal: n, qvec, depth })
    } else {
        None
    }
}

/// Sphere (body i) against sphere (body j). Concentric spheres have no
/// defined normal and are skipped.
pub fn sphere_sphere(x_i: Vec3, r_i: Scalar, x_j: Vec3, r_j: Scalar) -> Option<ContactPoint> {
    let d = x_j - x_i;
    let dist = d.length();
    if dist <= 1.0e-6 {
        return None;
    }
    let n = d / dist;
    let ri = n * r_i;
    let rj = -n * r_j;
    let qvec = (x_j + rj) - (x_i + ri);
    let depth = qvec.dot(n);
    if depth < 0.0 {
        Some(ContactPoint { ri, rj, normal: n, qvec, depth })
    } else {
        None
    }
}

/// Box (body i) against plane (body j): each of the 8 rotated corners is
/// tested like a point-sphere against the plane, capped at
/// [`MAX_BOX_PLANE_CONTACTS`] emissions.
pub fn box_plane(
    x_b: Vec3,
    half: Vec3,
    rot: Quat,
    x_p: Vec3,
    plane_normal: Vec3,
) -> Vec<ContactPoint> {
    let n = -plane_normal;
    let mut out = Vec::with_capacity(MAX_BOX_PLANE_CONTACTS);
    for corner in box_corners(half) {
        let rs = rot * corner;
        let world = x_b + rs;
        let projected = world - plane_normal * plane_normal.dot(world - x_p);
        let qvec = projected - x_b - rs;
        let depth = qvec.dot(n);
        if depth < 0.0 {
            out.push(ContactPoint { ri: rs, rj: projected - x_p, normal: n, qvec, depth });
            if out.len() == MAX_BOX_PLANE_CONTACTS {
                break;
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use axiphys_core::{vec3, quat_identity};

    #[test]
    fn sphere_plane_reports_penetration_depth() {
        let cp = sphere_plane(vec3(2.0, 0.9, -1.0), 1.0, Vec3::ZERO, vec3(0.0, 1.0, 0.0))
            .expect("overlapping");
        assert!((cp.depth + 0.1).abs() < 1e-6);
        assert_eq!(cp.normal, vec3(0.0, -1.0, 0.0));
        assert_eq!(cp.ri, vec3(0.0, -1.0, 0.0));
        // contact arm on the plane points at the projected center
        assert!((cp.rj - vec3(2.0, 0.0, -1.0)).length() < 1e-6);
    }

    #[test]
    fn sphere_plane_misses_when_clear() {
        assert!(sphere_plane(vec3(0.0, 1.5, 0.0), 1.0, Vec3::ZERO, vec3(0.0, 1.0, 0.0)).is_none());
    }

    #[test]
    fn sphere_sphere_depth_is_gap_minus_radii() {
        let cp = sphere_sphere(vec3(-0.9, 0.0, 0.0), 1.0, vec3(0.9, 0.0, 0.0), 1.0)
            .expect("overlapping");
        assert!((cp.depth + 0.2).abs() < 1e-6);
        assert_eq!(cp.normal, vec3(1.0, 0.0, 0.0));
        assert_eq!(cp.ri, vec3(1.0, 0.0, 0.0));
        assert_eq!(cp.rj, vec3(-1.0, 0.0, 0.0));
    }

    #[test]
    fn touching_spheres_do_not_emit() {
        assert!(sphere_sphere(vec3(-1.0, 0.0, 0.0), 1.0, vec3(1.0, 0.0, 0.0), 1.0).is_none());
    }

    #[test]
    fn concentric_spheres_degrade_to_no_contact() {
        assert!(sphere_sphere(Vec3::ZERO, 1.0, Vec3::ZERO, 1.0).is_none());
    }

    #[test]
    fn box_flat_on_plane_emits_exactly_four_corners() {
        // unit cube centered below its own half-height: all 4 bottom corners hit
        let cps = box_plane(
            vec3(0.0, 0.4, 0.0),
            vec3(0.5, 0.5, 0.5),
            quat_identity(),
            Vec3::ZERO,
            vec3(0.0, 1.0, 0.0),
        );
        assert_eq!(cps.len(), 4);
        for cp in &cps {
            assert!((cp.depth + 0.1).abs() < 1e-5);
            assert_eq!(cp.normal, vec3(0.0, -1.0, 0.0));
        }
    }

    #[test]
    fn box_above_plane_emits_nothing() {
        let cps = box_plane(
            vec3(0.0, 1.0, 0.0),
            vec3(0.5, 0.5, 0.5),
            quat_identity(),
            Vec3::ZERO,
            vec3(0.0, 1.0, 0.0),
        );
        assert!(cps.is_empty());
    }
}
