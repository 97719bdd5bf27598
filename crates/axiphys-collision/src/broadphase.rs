use axiphys_core::PhysicsError;
use axiphys_dynamics::Bodies;
use axiphys_geom::Shape;

/// Candidate-pair producer. Implementations return two parallel index lists
/// with `pairs.0[k] > pairs.1[k]` for every k, in a deterministic order.
///
/// The provided default body mirrors an abstract base: a broadphase that
/// does not override it reports `UnknownBroadphase`.
pub trait Broadphase {
    fn collision_pairs(
        &self,
        bodies: &Bodies,
        shapes: &[Shape],
    ) -> Result<(Vec<usize>, Vec<usize>), PhysicsError> {
        let _ = (bodies, shapes);
        Err(PhysicsError::UnknownBroadphase)
    }
}

/// O(N²) enumeration with shape-specific cheap culls. Outer index runs from
/// 1 to N−1, inner from 0 to i−1, so emitted pairs are strictly
/// upper-triangular and ordering is reproducible.
#[derive(Default)]
pub struct NaiveBroadphase;

impl NaiveBroadphase {
    pub fn new() -> Self { Self }
}

impl Broadphase for NaiveBroadphase {
    fn collision_pairs(
        &self,
        bodies: &Bodies,
        shapes: &[Shape],
    ) -> Result<(Vec<usize>, Vec<usize>), PhysicsError> {
        let n = bodies.len();
        let mut pairs_i = Vec::new();
        let mut pairs_j = Vec::new();

        for i in 1..n {
            for j in 0..i {
                if bodies.is_fixed(i as u32) && bodies.is_fixed(j as u32) {
                    continue;
                }
                let pi = bodies.pose(i as u32).pos;
                let pj = bodies.pose(j as u32).pos;

                let hit = match (shapes[i], shapes[j]) {
                    (Shape::Sphere { r: r1 }, Shape::Sphere { r: r2 }) => {
                        let d = (pi - pj).abs();
                        let r = r1 + r2;
                        d.x < r && d.y < r && d.z < r
                    }
                    (Shape::Sphere { r }, Shape::Plane { normal }) => {
                        (pi - pj).dot(normal) - r < 0.0
                    }
                    (Shape::Plane { normal }, Shape::Sphere { r }) => {
                        (pj - pi).dot(normal) - r < 0.0
                    }
                    (Shape::Box { half }, Shape::Plane { normal }) => {
                        (pi - pj).dot(normal) - half.length() < 0.0
                    }
                    (Shape::Plane { normal }, Shape::Box { half }) => {
                        (pj - pi).dot(normal) - half.length() < 0.0
                    }
                    // no cheap test for this combination
                    _ => false,
                };
                if hit {
                    pairs_i.push(i);
                    pairs_j.push(j);
                }
            }
        }
        Ok((pairs_i, pairs_j))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axiphys_core::{vec3, iso, quat_identity, Vec3, Velocity};
    use axiphys_dynamics::BodyState;

    fn body(bodies: &mut Bodies, mass: f32, pos: Vec3, shape: &Shape) -> u32 {
        bodies.add(BodyState {
            pose: iso(pos, quat_identity()),
            vel: Velocity::default(),
            force: Vec3::ZERO,
            torque: Vec3::ZERO,
            mass,
            inertia: shape.local_inertia(mass),
        })
    }

    #[test]
    fn overlapping_spheres_pair_up_upper_triangular() {
        let mut bodies = Bodies::default();
        let s = Shape::Sphere { r: 1.0 };
        body(&mut bodies, 1.0, vec3(0.0, 0.0, 0.0), &s);
        body(&mut bodies, 1.0, vec3(1.5, 0.0, 0.0), &s);
        let shapes = vec![s, s];
        let (pi, pj) = NaiveBroadphase::new().collision_pairs(&bodies, &shapes).unwrap();
        assert_eq!(pi, vec![1]);
        assert_eq!(pj, vec![0]);
    }

    #[test]
    fn separated_spheres_are_culled() {
        let mut bodies = Bodies::default();
        let s = Shape::Sphere { r: 1.0 };
        body(&mut bodies, 1.0, vec3(0.0, 0.0, 0.0), &s);
        body(&mut bodies, 1.0, vec3(2.5, 0.0, 0.0), &s);
        let shapes = vec![s, s];
        let (pi, _) = NaiveBroadphase::new().collision_pairs(&bodies, &shapes).unwrap();
        assert!(pi.is_empty());
    }

    #[test]
    fn sphere_near_plane_pairs_in_either_order() {
        let plane = Shape::Plane { normal: vec3(0.0, 1.0, 0.0) };
        let sphere = Shape::Sphere { r: 1.0 };

        let mut bodies = Bodies::default();
        body(&mut bodies, 0.0, vec3(0.0, 0.0, 0.0), &plane);
        body(&mut bodies, 1.0, vec3(0.0, 0.5, 0.0), &sphere);
        let shapes = vec![plane, sphere];
        let (pi, pj) = NaiveBroadphase::new().collision_pairs(&bodies, &shapes).unwrap();
        assert_eq!((pi, pj), (vec![1], vec![0]));

        // sphere added first
        let mut bodies = Bodies::default();
        body(&mut bodies, 1.0, vec3(0.0, 0.5, 0.0), &sphere);
        body(&mut bodies, 0.0, vec3(0.0, 0.0, 0.0), &plane);
        let shapes = vec![sphere, plane];
        let (pi, pj) = NaiveBroadphase::new().collision_pairs(&bodies, &shapes).unwrap();
        assert_eq!((pi, pj), (vec![1], vec![0]));
    }

    #[test]
    fn sphere_far_above_plane_is_culled() {
        let plane = Shape::Plane { normal: vec3(0.0, 1.0, 0.0) };
        let sphere = Shape::Sphere { r: 1.0 };
        let mut bodies = Bodies::default();
        body(&mut bodies, 0.0, vec3(0.0, 0.0, 0.0), &plane);
        body(&mut bodies, 1.0, vec3(0.0, 3.0, 0.0), &sphere);
        let shapes = vec![plane, sphere];
        let (pi, _) = NaiveBroadphase::new().collision_pairs(&bodies, &shapes).unwrap();
        assert!(pi.is_empty());
    }

    #[test]
    fn box_over_plane_uses_half_extent_norm() {
        let plane = Shape::Plane { normal: vec3(0.0, 1.0, 0.0) };
        let bx = Shape::Box { half: vec3(1.0, 1.0, 1.0) };
        let mut bodies = Bodies::default();
        body(&mut bodies, 0.0, vec3(0.0, 0.0, 0.0), &plane);
        // center at ‖h‖ − ε: candidate even though no corner touches yet
        body(&mut bodies, 1.0, vec3(0.0, 1.7, 0.0), &bx);
        let shapes = vec![plane, bx];
        let (pi, _) = NaiveBroadphase::new().collision_pairs(&bodies, &shapes).unwrap();
        assert_eq!(pi.len(), 1);
    }

    #[test]
    fn fixed_fixed_pairs_are_skipped() {
        let plane = Shape::Plane { normal: vec3(0.0, 1.0, 0.0) };
        let sphere = Shape::Sphere { r: 1.0 };
        let mut bodies = Bodies::default();
        body(&mut bodies, 0.0, vec3(0.0, 0.0, 0.0), &plane);
        body(&mut bodies, 0.0, vec3(0.0, 0.5, 0.0), &sphere);
        let shapes = vec![plane, sphere];
        let (pi, _) = NaiveBroadphase::new().collision_pairs(&bodies, &shapes).unwrap();
        assert!(pi.is_empty());
    }

    #[test]
    fn base_trait_reports_unknown_broadphase() {
        struct Bare;
        impl Broadphase for Bare {}
        let bodies = Bodies::default();
        let err = Bare.collision_pairs(&bodies, &[]).unwrap_err();
        assert_eq!(err, PhysicsError::UnknownBroadphase);
    }
}
