use crate::{anim_error::AnimError, types::MAX_JOINT_DEPTH};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// How frame intervals are turned into "new frame" events
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClockMode {
    /// One accumulator per category (rigid, skeletal). The first component
    /// in registry order whose interval has elapsed fires the frame for
    /// itself and for every component after it in the same pass, then the
    /// accumulator restarts from zero. Components with different intervals
    /// are therefore not scheduled independently.
    Shared,
    /// Every component accumulates its own time and fires on its own
    /// interval
    #[default]
    PerEntity,
}

/// What to do when an animated entity has no `Transform` to write into
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingTransform {
    /// Log it, record it in the tick report and carry on
    #[default]
    Skip,
    /// Abort the tick and return the error from `Scheduler::update`
    Fatal,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    pub clock_mode: ClockMode,
    pub missing_transform: MissingTransform,
    /// Joints deeper than this are not visited. The root is at depth 1.
    pub max_joint_depth: usize,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            clock_mode: ClockMode::default(),
            missing_transform: MissingTransform::default(),
            max_joint_depth: MAX_JOINT_DEPTH,
        }
    }
}

impl AnimationConfig {
    /// Parses a configuration from YAML. Missing fields take their default
    /// values.
    ///
    /// # Errors
    /// May return `AnimError`
    pub fn from_yaml(text: &str) -> Result<Self, AnimError> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Loads a YAML configuration file
    ///
    /// # Errors
    /// May return `AnimError`
    pub fn load(path: &Path) -> Result<Self, AnimError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml(&text)
    }

    /// # Errors
    /// May return `AnimError`
    pub fn to_yaml(&self) -> Result<String, AnimError> {
        Ok(serde_yaml::to_string(self)?)
    }
}
