pub mod anim_error;
pub mod animation;
pub mod config;
pub mod registry;
pub mod types;

// Re-exports
pub use {
    anim_error::AnimError,
    animation::{
        AnimatedEntity, BlendShapeSet, Joint, PlayState, Scheduler,
        SkinnedMesh, TickReport,
    },
    config::{AnimationConfig, ClockMode, MissingTransform},
    registry::{Registry, SharedRegistry},
    types::{Entity, Mesh, Transform},
};
