use axiphys_core::vec3;
use axiphys_dynamics::RigidBody;
use axiphys_geom::Shape;
use axiphys_world::World;

fn main() {
    let mut w = World::with_capacity(8);
    w.gravity = vec3(0.0, -9.82, 0.0);

    // Ground plane (static)
    let mut ground = RigidBody::new(0.0, Shape::Plane { normal: vec3(0.0, 1.0, 0.0) });
    w.add(&mut ground).expect("add ground");

    // Falling sphere
    let mut ball = RigidBody::new(1.0, Shape::Sphere { r: 1.0 }).with_position(vec3(0.0, 4.0, 0.0));
    let ball_id = w.add(&mut ball).expect("add ball");

    for step in 0..120 {
        let stats = w.step(1.0 / 60.0).expect("step");
        if step % 10 == 0 {
            let y = w.body_pose(ball_id).pos.y;
            println!(
                "step {step:03}  pairs={} contacts={} rows={}  ball.y={y:+.3}",
                stats.pairs_tested, stats.contacts, stats.equations
            );
        }
    }
    println!("final hash = {:02x?}", w.step_hash());
}
