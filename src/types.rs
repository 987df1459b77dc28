use nalgebra_glm as glm;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default duration of one animation frame in milliseconds (24 fps)
pub const DEFAULT_FRAME_MS: f32 = 41.666;

/// Deepest joint hierarchy that will be traversed unless the configuration
/// says otherwise. Real skeletons are rarely more than 20 or so joints deep.
pub const MAX_JOINT_DEPTH: usize = 64;

/// Identity of an entity, handed out by the `Registry`
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Entity(pub u32);

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Spatial transform of an entity. This is the state the rigid animation pass
/// overwrites, and each keyframe of a rigid animation is a complete
/// `Transform` snapshot.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub translation: glm::Vec3,
    pub rotation: glm::Quat,
    pub scale: glm::Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: glm::vec3(0.0, 0.0, 0.0),
            rotation: glm::Quat::identity(),
            scale: glm::vec3(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    #[must_use]
    pub fn from_translation(translation: glm::Vec3) -> Self {
        Self {
            translation,
            ..Default::default()
        }
    }

    /// Overwrites all of the state with another transform. Not a blend.
    pub fn set(&mut self, other: &Self) {
        *self = *other;
    }

    /// Model matrix in translation * rotation * scale order
    #[must_use]
    pub fn matrix(&self) -> glm::Mat4 {
        let t = glm::translation(&self.translation);
        let r = glm::quat_to_mat4(&self.rotation);
        let s = glm::scaling(&self.scale);
        t * r * s
    }
}

/// Vertex positions of a renderable mesh. Blend shapes write into `deformed`
/// and never touch `base`.
#[derive(Clone, Debug, Default)]
pub struct Mesh {
    base: Vec<glm::Vec3>,
    deformed: Vec<glm::Vec3>,
}

impl Mesh {
    #[must_use]
    pub fn new(positions: Vec<glm::Vec3>) -> Self {
        Self {
            deformed: positions.clone(),
            base: positions,
        }
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.base.len()
    }

    #[must_use]
    pub fn base(&self) -> &[glm::Vec3] {
        &self.base
    }

    /// Positions after the most recent blend pass, or the base positions if
    /// no blend has happened
    #[must_use]
    pub fn deformed(&self) -> &[glm::Vec3] {
        &self.deformed
    }

    pub(crate) fn buffers_mut(&mut self) -> (&[glm::Vec3], &mut [glm::Vec3]) {
        (&self.base, &mut self.deformed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_overwrites_everything() {
        let mut t = Transform::from_translation(glm::vec3(1.0, 2.0, 3.0));
        let other = Transform {
            translation: glm::vec3(-1.0, 0.0, 4.0),
            rotation: glm::quat_angle_axis(0.5, &glm::vec3(0.0, 0.0, 1.0)),
            scale: glm::vec3(2.0, 2.0, 2.0),
        };
        t.set(&other);
        assert_eq!(t, other);
    }

    #[test]
    fn matrix_places_translation_in_last_column() {
        let t = Transform::from_translation(glm::vec3(5.0, 7.0, 9.0));
        let m = t.matrix();
        assert!((m[(0, 3)] - 5.0).abs() < 0.0001);
        assert!((m[(1, 3)] - 7.0).abs() < 0.0001);
        assert!((m[(2, 3)] - 9.0).abs() < 0.0001);
    }
}
