use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use axiphys_core::XorShift64;
use axiphys_io::{hex32, scene_hash, write_scene_json, BodyDesc, SceneDesc, ShapeDesc};

#[derive(Parser, Debug)]
#[command(name = "scene_make", version, about = "Generate a deterministic pile scene as JSON")]
struct Opts {
    /// Output scene path
    out: PathBuf,

    /// Number of dropped bodies (spheres and boxes)
    #[arg(long, default_value_t = 64)]
    count: usize,

    /// RNG seed; the same seed always yields the same scene
    #[arg(long, default_value_t = 0xC0FFEE)]
    seed: u64,

    /// Pretty-print JSON
    #[arg(long)]
    pretty: bool,
}

fn main() -> Result<()> {
    let opt = Opts::parse();
    let mut rng = XorShift64::new(opt.seed);

    let mut scene = SceneDesc::new([0.0, -9.82, 0.0], 1.0 / 60.0);

    // Ground plane
    scene.bodies.push(BodyDesc {
        shape: ShapeDesc::Plane { normal: [0.0, 1.0, 0.0] },
        mass: 0.0,
        position: [0.0, 0.0, 0.0],
        velocity: [0.0, 0.0, 0.0],
        restitution: 0.0,
        friction: 0.0,
    });

    // Pile of spheres with the occasional box
    for i in 0..opt.count {
        let x = rng.next_range(-6.0, 6.0);
        let z = rng.next_range(-6.0, 6.0);
        let y = rng.next_range(1.5, 10.0);
        let vx = rng.next_range(-1.0, 1.0);
        let vz = rng.next_range(-1.0, 1.0);
        let shape = if i % 5 == 4 {
            let h = rng.next_range(0.2, 0.5);
            ShapeDesc::Box { half: [h, h, h] }
        } else {
            ShapeDesc::Sphere { r: rng.next_range(0.2, 0.6) }
        };
        scene.bodies.push(BodyDesc {
            shape,
            mass: rng.next_range(0.5, 4.0),
            position: [x, y, z],
            velocity: [vx, 0.0, vz],
            restitution: if i % 7 == 0 { 0.3 } else { 0.0 },
            friction: 0.0,
        });
    }

    write_scene_json(&scene, &opt.out, opt.pretty)?;
    println!("scene: {}", opt.out.display());
    println!("bodies: {}", scene.bodies.len());
    println!("hash: {}", hex32(scene_hash(&scene)));
    Ok(())
}
