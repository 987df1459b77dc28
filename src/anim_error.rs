use crate::types::Entity;
use std::{error, fmt};

/// Unified error type
///
/// Most variants are not fatal. The scheduler records them in the
/// `TickReport` for the tick where they happened and carries on with the next
/// entity. Only a missing transform under `MissingTransform::Fatal` aborts a
/// tick, and the configuration loaders return the I/O and YAML variants.
///
/// Variants that identify an entity carry its name as it was at the time of
/// the error, since the entity may be gone by the time anyone reads it.
#[derive(Debug)]
pub enum AnimError {
    MissingTransform { entity: Entity, name: String },
    MissingMesh { entity: Entity, name: String },
    ShapeMismatch {
        entity: Entity,
        shape: String,
        expected: usize,
        found: usize,
    },
    SkeletonTooDeep { entity: Entity, max_depth: usize },
    EntitiesExhausted,
    StdIoError(std::io::Error),
    SerdeYamlError(Box<serde_yaml::Error>),
}

impl AnimError {
    /// The entity an error is about, if there is one
    #[must_use]
    pub const fn entity(&self) -> Option<Entity> {
        match self {
            Self::MissingTransform { entity, .. }
            | Self::MissingMesh { entity, .. }
            | Self::ShapeMismatch { entity, .. }
            | Self::SkeletonTooDeep { entity, .. } => Some(*entity),
            Self::EntitiesExhausted
            | Self::StdIoError(_)
            | Self::SerdeYamlError(_) => None,
        }
    }
}

impl error::Error for AnimError {}

impl fmt::Display for AnimError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::MissingTransform { entity, name } => {
                write!(
                    f,
                    "entity {name} ({entity}) is animated but has no transform"
                )
            }
            Self::MissingMesh { entity, name } => {
                write!(
                    f,
                    "entity {name} ({entity}) does not have a mesh, can't blend"
                )
            }
            Self::ShapeMismatch {
                entity,
                shape,
                expected,
                found,
            } => {
                write!(
                    f,
                    "blend shape {shape} on {entity} has {found} deltas but \
                     the mesh has {expected} vertices"
                )
            }
            Self::SkeletonTooDeep { entity, max_depth } => {
                write!(
                    f,
                    "skeleton on {entity} is deeper than {max_depth} joints"
                )
            }
            Self::EntitiesExhausted => {
                write!(f, "every entity id has been handed out")
            }
            Self::StdIoError(e) => write!(f, "std::io::Error: {}", e.kind()),
            Self::SerdeYamlError(e) => {
                write!(f, "serde_yaml::Error: {e}")
            }
        }
    }
}

impl From<serde_yaml::Error> for AnimError {
    fn from(e: serde_yaml::Error) -> Self {
        Self::SerdeYamlError(Box::new(e))
    }
}

impl From<std::io::Error> for AnimError {
    fn from(e: std::io::Error) -> Self {
        Self::StdIoError(e)
    }
}
