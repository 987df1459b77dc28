use super::skeleton::Joint;
use crate::types::{Transform, DEFAULT_FRAME_MS};

/// Rigid keyframe animation. Each keyframe is a complete `Transform` that is
/// written over the owner's transform when its frame comes up, after which
/// the animation moves on to the next keyframe and loops at the end.
#[derive(Clone, Debug)]
pub struct AnimatedEntity {
    pub keyframes: Vec<Transform>,
    pub current_frame: usize,
    pub frame_ms: f32,
    /// When false no keyframes are written, but time still accumulates
    pub active: bool,
    pub(crate) elapsed_ms: f32,
}

impl AnimatedEntity {
    #[must_use]
    pub const fn new(keyframes: Vec<Transform>) -> Self {
        Self {
            keyframes,
            current_frame: 0,
            frame_ms: DEFAULT_FRAME_MS,
            active: true,
            elapsed_ms: 0.0,
        }
    }

    #[must_use]
    pub fn with_frame_ms(mut self, frame_ms: f32) -> Self {
        self.frame_ms = frame_ms;
        self
    }

    #[must_use]
    pub fn num_frames(&self) -> usize {
        self.keyframes.len()
    }

    /// Writes the current keyframe into `transform` and moves to the next
    /// one. Returns false if there are no keyframes.
    pub(crate) fn step(&mut self, transform: &mut Transform) -> bool {
        let count = self.keyframes.len();
        if count == 0 {
            return false;
        }
        // Keyframes may have been swapped out from under the index
        let index = self.current_frame % count;
        transform.set(&self.keyframes[index]);
        self.current_frame = (index + 1) % count;
        true
    }
}

/// Playback state of a skeleton
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum PlayState {
    #[default]
    Inactive,
    Playing,
    /// Rewind every joint to its first keyframe on the next pass, then play
    RestartRequested,
}

/// Skeleton instance attached to a skinned mesh entity
#[derive(Clone, Debug)]
pub struct SkinnedMesh {
    /// `None` for a mesh without a joint chain, which is skipped by the
    /// animation passes
    pub root: Option<Joint>,
    pub frame_ms: f32,
    pub state: PlayState,
    pub(crate) elapsed_ms: f32,
}

impl SkinnedMesh {
    #[must_use]
    pub const fn new(root: Option<Joint>) -> Self {
        Self {
            root,
            frame_ms: DEFAULT_FRAME_MS,
            state: PlayState::Inactive,
            elapsed_ms: 0.0,
        }
    }

    #[must_use]
    pub fn with_frame_ms(mut self, frame_ms: f32) -> Self {
        self.frame_ms = frame_ms;
        self
    }

    pub fn play(&mut self) {
        self.state = PlayState::Playing;
    }

    pub fn stop(&mut self) {
        self.state = PlayState::Inactive;
    }

    /// Asks for every joint to go back to its first keyframe. Asking more
    /// than once before the next pass has the same effect as asking once.
    pub fn restart(&mut self) {
        self.state = PlayState::RestartRequested;
    }
}
