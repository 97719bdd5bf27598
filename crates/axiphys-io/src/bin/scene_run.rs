use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use axiphys_io::{build_world, hex32, read_scene_json, scene_hash};

#[derive(Parser, Debug)]
#[command(name = "scene_run", version, about = "Step a scene JSON and report the final state hash")]
struct Opts {
    /// Input scene (from `scene_make`)
    input: PathBuf,

    /// Steps to simulate
    #[arg(long, default_value_t = 600)]
    ticks: u32,

    /// Print a progress line every N steps (0 = quiet)
    #[arg(long, default_value_t = 60)]
    print_every: u32,
}

fn main() -> Result<()> {
    let opt = Opts::parse();
    let scene = read_scene_json(&opt.input)?;
    println!("scene hash: {}", hex32(scene_hash(&scene)));

    let (mut world, _ids) = build_world(&scene)?;
    let mut total_contacts: u64 = 0;

    for tick in 0..opt.ticks {
        let stats = world.step(scene.dt)?;
        total_contacts += stats.contacts as u64;
        if opt.print_every != 0 && tick % opt.print_every == 0 {
            println!(
                "tick {tick:05}  pairs={} contacts={} rows={} skipped={}",
                stats.pairs_tested, stats.contacts, stats.equations, stats.pairs_skipped
            );
        }
    }

    println!("total contacts: {total_contacts}");
    println!("state hash: {}", hex32(world.step_hash()));
    Ok(())
}
