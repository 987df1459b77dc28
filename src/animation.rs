//! Frame-stepped keyframe animation
//!
//! Three kinds of animation are driven from one `Scheduler`:
//! - rigid: whole `Transform` snapshots written over an entity's transform
//! - skeletal: every joint of a skeleton stepped to its next local keyframe
//! - blend shapes: weighted vertex offsets applied to a mesh
//!
//! Keyframes are stepped, not interpolated. A frame fires when enough time
//! has accumulated for it, and each firing moves one keyframe along.

mod blend;
mod clock;
mod scheduler;
mod skeleton;
mod types;

// Re-exports
pub use {
    blend::{BlendShape, BlendShapeSet},
    clock::FrameClock,
    scheduler::{Scheduler, TickReport},
    skeleton::{Joint, Palette},
    types::{AnimatedEntity, PlayState, SkinnedMesh},
};
