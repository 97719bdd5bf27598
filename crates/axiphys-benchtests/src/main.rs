use std::time::Instant;

use axiphys_core::{vec3, DeterminismContract};
use axiphys_dynamics::RigidBody;
use axiphys_geom::{Material, Shape};
use axiphys_viz::DebugSettings;
use axiphys_world::World;

/// simple percentile
fn pct(mut xs: Vec<f32>, p: f32) -> f32 {
    if xs.is_empty() { return 0.0; }
    xs.sort_by(|a, b| a.total_cmp(b));
    let k = ((xs.len() as f32 - 1.0) * p).round() as usize;
    xs[k]
}

fn main() {
    // ---------- knobs ----------
    let n_spheres: usize = 250;
    let n_boxes: usize = 25;
    let ticks: usize = 400;
    let contract = DeterminismContract::default_contract();
    let dt = contract.fixed_dt;
    let p95_target_ms: f32 = 1.50;

    // ---------- world ----------
    let mut w = World::with_capacity(n_spheres + n_boxes + 1);
    w.gravity = vec3(0.0, -9.82, 0.0);
    w.iterations = contract.iterations;
    w.set_debug(DebugSettings::default());

    // ground
    let mut ground = RigidBody::new(0.0, Shape::Plane { normal: vec3(0.0, 1.0, 0.0) });
    w.add(&mut ground).expect("ground");

    // spheres on a jittered grid (deterministic pattern, no RNG needed)
    for i in 0..n_spheres {
        let row = i / 25;
        let col = i % 25;
        let x = -7.0 + (col as f32) * 0.6;
        let z = -7.0 + (row as f32) * 0.6;
        let y = 1.5 + ((i % 7) as f32) * 0.45;
        let mut b = RigidBody::new(1.0, Shape::Sphere { r: 0.18 })
            .with_position(vec3(x, y, z))
            .with_velocity(vec3(0.5 * ((i % 9) as f32 - 4.0) * 0.25, 0.0, 0.3 * ((i % 3) as f32 - 1.0)))
            .with_material(if i % 5 == 0 { Material::new(0.3, 0.0) } else { Material::default() });
        w.add(&mut b).expect("sphere");
    }

    // boxes dropped above the pile
    for j in 0..n_boxes {
        let x = -3.0 + (j % 5) as f32 * 1.5;
        let z = -3.0 + (j / 5) as f32 * 1.5;
        let mut b = RigidBody::new(2.0, Shape::Box { half: vec3(0.25, 0.25, 0.25) })
            .with_position(vec3(x, 5.0 + (j % 3) as f32 * 0.4, z));
        w.add(&mut b).expect("box");
    }

    // ---------- run & time ----------
    let mut step_ms: Vec<f32> = Vec::with_capacity(ticks);
    let mut total_contacts: u64 = 0;
    let mut errors: u64 = 0;

    for _ in 0..ticks {
        let t0 = Instant::now();
        let stats = match w.step(dt) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("step failed: {e}");
                errors += 1;
                continue;
            }
        };
        step_ms.push(t0.elapsed().as_secs_f64() as f32 * 1000.0);
        total_contacts += stats.contacts as u64;

        for i in w.bodies().indices() {
            let p = w.bodies().pose(i).pos;
            if !p.is_finite() { errors += 1; }
        }
    }

    // ---------- summarize ----------
    let p50 = pct(step_ms.clone(), 0.50);
    let p95 = pct(step_ms.clone(), 0.95);
    let p99 = pct(step_ms.clone(), 0.99);
    let mean: f32 = step_ms.iter().sum::<f32>() / step_ms.len().max(1) as f32;

    println!("--- PERF SUMMARY ({} ticks, {} bodies) ---", ticks, w.num_bodies());
    println!("contract: dt={:.5} float={} iterations={}", contract.fixed_dt, contract.float, contract.iterations);
    println!("step latency (ms): mean={:.3}  p50={:.3}  p95={:.3}  p99={:.3}", mean, p50, p95, p99);
    println!("total contacts:    {}", total_contacts);
    println!("errors:            {}", errors);
    if p95 <= p95_target_ms && errors == 0 {
        println!("target met (p95 <= {:.2} ms, no errors)", p95_target_ms);
    } else {
        println!("target missed (p95 {:.3} ms, errors {})", p95, errors);
    }
}
