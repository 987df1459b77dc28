//! Scheduler throughput benchmarks
//!
//! Every tick is long enough to fire a frame, so each iteration measures a
//! full pass: every rigid animation written and every joint stepped.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use keyframer::{
    AnimatedEntity, Joint, Registry, Scheduler, SkinnedMesh, Transform,
};
use nalgebra_glm as glm;

const ENTITIES: usize = 1000;
const SKELETONS: usize = 50;
const TICK: f32 = 0.05;

fn keyframes(count: usize) -> Vec<glm::Mat4> {
    (0..count)
        .map(|i| glm::translation(&glm::vec3(i as f32, 0.0, 0.0)))
        .collect()
}

/// Roughly humanoid: a spine of 6 with two 4 joint limbs hanging off each
/// end
fn humanoid() -> Joint {
    let limb = |name: &str| {
        let mut joint =
            Joint::new(&format!("{name}3")).with_keyframes(keyframes(30));
        for i in (0..3).rev() {
            joint = Joint::new(&format!("{name}{i}"))
                .with_keyframes(keyframes(30))
                .with_child(joint);
        }
        joint
    };
    let mut spine = Joint::new("neck")
        .with_keyframes(keyframes(30))
        .with_child(limb("arm_l"))
        .with_child(limb("arm_r"));
    for i in (0..5).rev() {
        spine = Joint::new(&format!("spine{i}"))
            .with_keyframes(keyframes(30))
            .with_child(spine);
    }
    spine.with_child(limb("leg_l")).with_child(limb("leg_r"))
}

fn rigid(c: &mut Criterion) {
    let mut registry = Registry::new();
    for i in 0..ENTITIES {
        let e = registry.spawn(&format!("e{i}")).unwrap();
        registry.insert(e, Transform::default());
        let frames = (0..24)
            .map(|f| Transform::from_translation(glm::vec3(0.0, f as f32, 0.0)))
            .collect();
        registry.insert(e, AnimatedEntity::new(frames).with_frame_ms(40.0));
    }
    let mut scheduler = Scheduler::default();

    c.bench_function(
        "rigid_1000", //
        |b| b.iter(|| scheduler.update(&mut registry, black_box(TICK))),
    );
}

fn skeletal(c: &mut Criterion) {
    let mut registry = Registry::new();
    for i in 0..SKELETONS {
        let e = registry.spawn(&format!("s{i}")).unwrap();
        let mut sm = SkinnedMesh::new(Some(humanoid())).with_frame_ms(40.0);
        sm.play();
        registry.insert(e, sm);
    }
    let mut scheduler = Scheduler::default();

    c.bench_function(
        "skeletal_50", //
        |b| b.iter(|| scheduler.update(&mut registry, black_box(TICK))),
    );
}

fn palette(c: &mut Criterion) {
    let root = black_box(humanoid());
    c.bench_function(
        "palette", //
        |b| b.iter(|| root.palette(64)),
    );
}

criterion_group!(benches, rigid, skeletal, palette);
criterion_main!(benches);
