//! Headless demo of the animation scheduler
//!
//! Builds a bouncing ball from a clip described in YAML, a small arm
//! skeleton and a face with two blend shapes, then drives them at a fixed
//! 60Hz for two seconds. Run with `RUST_LOG=info` (or `trace` to see every
//! tick). An optional argument names a YAML configuration file.
use keyframer::{
    AnimatedEntity, AnimationConfig, BlendShapeSet, Joint, Mesh, Registry,
    Scheduler, SkinnedMesh, Transform,
};
use log::info;
use nalgebra_glm as glm;
use std::path::Path;

const SIM_RATE: f32 = 1.0 / 60.0;
const TICKS: usize = 120;
const BOUNCE: &str = "
- translation: [0.0, 0.0, 0.0]
  rotation: [0.0, 0.0, 0.0, 1.0]
  scale: [1.0, 1.0, 1.0]
- translation: [0.0, 2.0, 0.0]
  rotation: [0.0, 0.0, 0.0, 1.0]
  scale: [0.9, 1.1, 0.9]
- translation: [0.0, 3.0, 0.0]
  rotation: [0.0, 0.0, 0.0, 1.0]
  scale: [1.0, 1.0, 1.0]
- translation: [0.0, 2.0, 0.0]
  rotation: [0.0, 0.0, 0.0, 1.0]
  scale: [0.9, 1.1, 0.9]
- translation: [0.0, 0.0, 0.0]
  rotation: [0.0, 0.0, 0.0, 1.0]
  scale: [1.2, 0.8, 1.2]
";

fn arm() -> Joint {
    let swing = |angle: f32| {
        glm::rotate(&glm::Mat4::identity(), angle, &glm::vec3(0.0, 0.0, 1.0))
    };
    let offset = glm::translation(&glm::vec3(0.0, 1.0, 0.0));
    Joint::new("shoulder")
        .with_keyframes((0..8).map(|i| swing(i as f32 * 0.1)).collect())
        .with_child(
            Joint::new("elbow")
                .with_bind(offset)
                .with_keyframes(
                    (0..4).map(|i| offset * swing(i as f32 * 0.2)).collect(),
                )
                .with_child(Joint::new("hand").with_bind(offset)),
        )
}

fn main() {
    env_logger::init();

    let config = std::env::args().nth(1).map_or_else(
        || Ok(AnimationConfig::default()),
        |path| AnimationConfig::load(Path::new(&path)),
    );
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            eprintln!("could not load configuration: {e}");
            std::process::exit(1);
        }
    };

    let mut registry = Registry::new();

    let keyframes: Vec<Transform> = serde_yaml::from_str(BOUNCE).unwrap();
    let ball = registry.spawn("ball").unwrap();
    registry.insert(ball, Transform::default());
    registry.insert(ball, AnimatedEntity::new(keyframes));

    let robot = registry.spawn("robot").unwrap();
    let mut skinned = SkinnedMesh::new(Some(arm())).with_frame_ms(100.0);
    skinned.play();
    registry.insert(robot, skinned);

    let toon = registry.spawn("toon").unwrap();
    registry.insert(
        toon,
        Mesh::new(vec![
            glm::vec3(-1.0, 0.0, 0.0),
            glm::vec3(1.0, 0.0, 0.0),
            glm::vec3(0.0, 1.0, 0.0),
        ]),
    );
    let mut faces = BlendShapeSet::new();
    faces.add_shape("happy", vec![glm::vec3(0.0, 0.2, 0.0); 3]);
    faces.add_shape("angry", vec![glm::vec3(0.0, -0.1, 0.1); 3]);
    registry.insert(toon, faces);

    // Blend shapes without a mesh are reported every tick
    let broken = registry.spawn("broken").unwrap();
    registry.insert(broken, BlendShapeSet::new());

    let mut scheduler = Scheduler::new(config);
    scheduler.init();
    scheduler.late_init(&registry);

    for tick in 0..TICKS {
        if tick == TICKS / 2 {
            if let Some(sm) = registry.component_mut::<SkinnedMesh>(robot) {
                sm.restart();
            }
        }
        if let Some(faces) = registry.component_mut::<BlendShapeSet>(toon) {
            let t = tick as f32 / TICKS as f32;
            faces.set_weight("happy", 1.0 - t);
            faces.set_weight("angry", t);
        }

        let report = match scheduler.update(&mut registry, SIM_RATE) {
            Ok(report) => report,
            Err(e) => {
                eprintln!("animation failed: {e}");
                std::process::exit(1);
            }
        };

        if report.rigid_frame {
            if let Some(t) = registry.component::<Transform>(ball) {
                info!("tick {tick} ball y={:.2}", t.translation.y);
            }
        }
        if report.skeleton_changed() {
            let max_depth = scheduler.config().max_joint_depth;
            let hand = registry
                .component::<SkinnedMesh>(robot)
                .and_then(|sm| sm.root.as_ref())
                .map(|root| root.world_matrices(max_depth))
                .and_then(|world| world.last().copied());
            if let Some(hand) = hand {
                info!(
                    "tick {tick} hand at ({:.2}, {:.2})",
                    hand[(0, 3)],
                    hand[(1, 3)]
                );
            }
        }
    }

    if let Some(mesh) = registry.component::<Mesh>(toon) {
        info!("toon apex after blending {:?}", mesh.deformed()[2]);
    }
}
