use crate::types::{Vec3, Mat3};
use crate::error::PhysicsError;
use crate::Scalar;

/// Skew-symmetric cross-product matrix: `cross_matrix(a) * b == a.cross(b)`.
#[inline]
pub fn cross_matrix(a: Vec3) -> Mat3 {
    Mat3::from_cols(
        Vec3::new(0.0, a.z, -a.y),
        Vec3::new(-a.z, 0.0, a.x),
        Vec3::new(a.y, -a.x, 0.0),
    )
}

/// Componentwise safe inverse of a diagonal: entries ≤ 0 invert to 0, so a
/// fixed body (or a plane's zero inertia) contributes nothing.
#[inline]
pub fn inv_diag(d: Vec3) -> Vec3 {
    Vec3::new(
        if d.x > 0.0 { 1.0 / d.x } else { 0.0 },
        if d.y > 0.0 { 1.0 / d.y } else { 0.0 },
        if d.z > 0.0 { 1.0 / d.z } else { 0.0 },
    )
}

/// Solve `A x = b` for a 3×3 system by Gaussian elimination with partial
/// pivoting. A zero pivot or a non-finite result is reported as
/// [`PhysicsError::SolverSingular`].
pub fn solve3(a: Mat3, b: Vec3) -> Result<Vec3, PhysicsError> {
    let mut m = [[0.0 as Scalar; 4]; 3];
    for (c, col) in [a.x_axis, a.y_axis, a.z_axis].into_iter().enumerate() {
        m[0][c] = col.x;
        m[1][c] = col.y;
        m[2][c] = col.z;
    }
    m[0][3] = b.x;
    m[1][3] = b.y;
    m[2][3] = b.z;

    for k in 0..3 {
        // pivot on the largest magnitude in column k
        let mut p = k;
        for r in (k + 1)..3 {
            if m[r][k].abs() > m[p][k].abs() {
                p = r;
            }
        }
        if m[p][k] == 0.0 {
            return Err(PhysicsError::SolverSingular);
        }
        m.swap(k, p);
        for r in (k + 1)..3 {
            let f = m[r][k] / m[k][k];
            for c in k..4 {
                m[r][c] -= f * m[k][c];
            }
        }
    }

    let mut x = [0.0 as Scalar; 3];
    for k in (0..3).rev() {
        let mut s = m[k][3];
        for c in (k + 1)..3 {
            s -= m[k][c] * x[c];
        }
        x[k] = s / m[k][k];
    }

    let out = Vec3::new(x[0], x[1], x[2]);
    if !out.is_finite() {
        return Err(PhysicsError::SolverSingular);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vec3;

    #[test]
    fn cross_matrix_matches_cross_product() {
        let a = vec3(1.0, -2.0, 3.0);
        let b = vec3(0.5, 4.0, -1.5);
        let via_matrix = cross_matrix(a) * b;
        let direct = a.cross(b);
        assert!((via_matrix - direct).length() < 1e-6);
    }

    #[test]
    fn solve3_recovers_known_solution() {
        // A = diag(2, 4, 8) with an off-diagonal coupling term
        let a = Mat3::from_cols(
            vec3(2.0, 0.0, 1.0),
            vec3(0.0, 4.0, 0.0),
            vec3(0.0, 0.0, 8.0),
        );
        let x_expected = vec3(1.0, -0.5, 2.0);
        let b = a * x_expected;
        let x = solve3(a, b).unwrap();
        assert!((x - x_expected).length() < 1e-5);
    }

    #[test]
    fn solve3_rejects_singular_system() {
        let a = Mat3::from_cols(
            vec3(1.0, 2.0, 3.0),
            vec3(2.0, 4.0, 6.0), // linearly dependent
            vec3(0.0, 0.0, 1.0),
        );
        assert!(solve3(a, vec3(1.0, 1.0, 1.0)).is_err());
    }

    #[test]
    fn inv_diag_zeroes_non_positive_entries() {
        let inv = inv_diag(vec3(2.0, 0.0, -1.0));
        assert_eq!(inv, vec3(0.5, 0.0, 0.0));
    }
}
