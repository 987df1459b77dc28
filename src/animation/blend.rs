use crate::{
    anim_error::AnimError,
    registry::{Names, Store},
    types::{Entity, Mesh},
};
use itertools::Itertools;
use log::error;
use nalgebra_glm as glm;
use smallvec::SmallVec;

/// A named set of per-vertex position offsets
#[derive(Clone, Debug)]
pub struct BlendShape {
    pub name: String,
    pub weight: f32,
    pub deltas: Vec<glm::Vec3>,
}

/// Blend shapes for the mesh on the same entity
///
/// The owning entity must also have a `Mesh`. The deformed positions are
/// `base + sum(weight * deltas)` over all shapes, recomputed every pass.
#[derive(Clone, Debug, Default)]
pub struct BlendShapeSet {
    shapes: SmallVec<[BlendShape; 4]>,
}

impl BlendShapeSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a shape with a weight of zero
    pub fn add_shape(&mut self, name: &str, deltas: Vec<glm::Vec3>) {
        self.shapes.push(BlendShape {
            name: name.to_owned(),
            weight: 0.0,
            deltas,
        });
    }

    /// Sets the weight of the named shape. Returns false if there is no such
    /// shape.
    pub fn set_weight(&mut self, name: &str, weight: f32) -> bool {
        if let Some(shape) = self.shapes.iter_mut().find(|s| s.name == name) {
            shape.weight = weight;
            true
        } else {
            false
        }
    }

    #[must_use]
    pub fn weight(&self, name: &str) -> Option<f32> {
        self.shapes.iter().find(|s| s.name == name).map(|s| s.weight)
    }

    #[must_use]
    pub fn shapes(&self) -> &[BlendShape] {
        &self.shapes
    }

    /// Writes the blended positions into the mesh. Every shape must have one
    /// delta per mesh vertex.
    fn deform(&self, entity: Entity, mesh: &mut Mesh) -> Result<(), AnimError> {
        let expected = mesh.vertex_count();
        if let Some(shape) =
            self.shapes.iter().find(|s| s.deltas.len() != expected)
        {
            return Err(AnimError::ShapeMismatch {
                entity,
                shape: shape.name.clone(),
                expected,
                found: shape.deltas.len(),
            });
        }

        let (base, deformed) = mesh.buffers_mut();
        deformed.copy_from_slice(base);
        for shape in self.shapes.iter().filter(|s| s.weight.abs() > 0.0) {
            for (out, delta) in deformed.iter_mut().zip_eq(&shape.deltas) {
                *out += *delta * shape.weight;
            }
        }
        Ok(())
    }
}

/// Blends every set onto the mesh of its owner. Sets whose owner has no mesh
/// or whose shapes don't fit the mesh are skipped with a diagnostic.
pub(crate) fn deform_all(
    sets: &Store<BlendShapeSet>,
    meshes: &mut Store<Mesh>,
    names: &Names,
    diagnostics: &mut Vec<AnimError>,
) {
    for (entity, set) in sets.iter() {
        let Some(mesh) = meshes.get_mut(entity) else {
            let e = AnimError::MissingMesh {
                entity,
                name: names.get(entity).to_owned(),
            };
            error!("{e}");
            diagnostics.push(e);
            continue;
        };
        if let Err(e) = set.deform(entity, mesh) {
            error!("{e}");
            diagnostics.push(e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad() -> Mesh {
        Mesh::new(vec![
            glm::vec3(0.0, 0.0, 0.0),
            glm::vec3(1.0, 0.0, 0.0),
            glm::vec3(1.0, 1.0, 0.0),
            glm::vec3(0.0, 1.0, 0.0),
        ])
    }

    #[test]
    fn weights_by_name() {
        let mut set = BlendShapeSet::new();
        set.add_shape("happy", vec![]);
        set.add_shape("angry", vec![]);
        assert_eq!(set.weight("happy"), Some(0.0));
        assert!(set.set_weight("angry", 0.5));
        assert!(!set.set_weight("sad", 1.0));
        assert_eq!(set.weight("angry"), Some(0.5));
        assert_eq!(set.weight("sad"), None);
        assert_eq!(set.shapes().len(), 2);
    }

    #[test]
    fn weighted_sum_of_deltas() {
        let mut mesh = quad();
        let mut set = BlendShapeSet::new();
        set.add_shape("up", vec![glm::vec3(0.0, 0.0, 1.0); 4]);
        set.add_shape("right", vec![glm::vec3(2.0, 0.0, 0.0); 4]);
        set.set_weight("up", 1.0);
        set.set_weight("right", 0.25);
        set.deform(Entity(0), &mut mesh).unwrap();
        for (out, base) in mesh.deformed().iter().zip(mesh.base()) {
            assert!((out.x - (base.x + 0.5)).abs() < 0.0001);
            assert!((out.y - base.y).abs() < 0.0001);
            assert!((out.z - 1.0).abs() < 0.0001);
        }
    }

    #[test]
    fn zero_weights_restore_base() {
        let mut mesh = quad();
        let mut set = BlendShapeSet::new();
        set.add_shape("up", vec![glm::vec3(0.0, 0.0, 1.0); 4]);
        set.set_weight("up", 1.0);
        set.deform(Entity(0), &mut mesh).unwrap();
        set.set_weight("up", 0.0);
        set.deform(Entity(0), &mut mesh).unwrap();
        assert_eq!(mesh.deformed(), mesh.base());
    }

    #[test]
    fn wrong_delta_count_is_reported() {
        let mut mesh = quad();
        let mut set = BlendShapeSet::new();
        set.add_shape("short", vec![glm::vec3(0.0, 0.0, 1.0); 3]);
        set.set_weight("short", 1.0);
        let result = set.deform(Entity(4), &mut mesh);
        assert!(matches!(
            result,
            Err(AnimError::ShapeMismatch {
                expected: 4,
                found: 3,
                ..
            })
        ));
        assert_eq!(mesh.deformed(), mesh.base());
    }
}
