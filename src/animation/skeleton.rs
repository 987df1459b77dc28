use nalgebra_glm as glm;
use std::fmt;

#[cfg(feature = "trace_joints")]
use log::trace;

/// A node in a skeleton
///
/// Each joint owns its children, so a joint always has exactly one parent
/// (none for the root) and a skeleton can't contain a cycle. Keyframes are
/// local transforms relative to the parent and are stepped through one per
/// animation frame. A joint with no keyframes keeps whatever `matrix` it was
/// given, which is normally the bind pose.
///
/// Cloning, dropping and debug printing never recurse, so a malformed
/// skeleton of any depth can be copied and freed.
pub struct Joint {
    pub name: String,
    pub keyframes: Vec<glm::Mat4>,
    pub current_keyframe: usize,
    /// Current local transform, read by skinning
    pub matrix: glm::Mat4,
    pub inverse_bind: glm::Mat4,
    pub children: Vec<Joint>,
}

impl Clone for Joint {
    fn clone(&self) -> Self {
        let mut root = self.clone_without_children();
        // Copies still waiting for children, one per level below the root
        let mut open: Vec<Self> = Vec::new();
        let mut pending = vec![self.children.iter()];
        while let Some(siblings) = pending.last_mut() {
            if let Some(child) = siblings.next() {
                open.push(child.clone_without_children());
                pending.push(child.children.iter());
            } else {
                pending.pop();
                if let Some(done) = open.pop() {
                    open.last_mut().unwrap_or(&mut root).children.push(done);
                }
            }
        }
        root
    }
}

impl Drop for Joint {
    fn drop(&mut self) {
        let mut doomed = std::mem::take(&mut self.children);
        while let Some(mut joint) = doomed.pop() {
            doomed.append(&mut joint.children);
        }
    }
}

impl fmt::Debug for Joint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Joint")
            .field("name", &self.name)
            .field("current_keyframe", &self.current_keyframe)
            .field("keyframes", &self.keyframes.len())
            .field("matrix", &self.matrix)
            .field("children", &self.children.len())
            .finish_non_exhaustive()
    }
}

impl Joint {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            keyframes: Vec::new(),
            current_keyframe: 0,
            matrix: glm::Mat4::identity(),
            inverse_bind: glm::Mat4::identity(),
            children: Vec::new(),
        }
    }

    fn clone_without_children(&self) -> Self {
        Self {
            name: self.name.clone(),
            keyframes: self.keyframes.clone(),
            current_keyframe: self.current_keyframe,
            matrix: self.matrix,
            inverse_bind: self.inverse_bind,
            children: Vec::with_capacity(self.children.len()),
        }
    }

    #[must_use]
    pub fn with_keyframes(mut self, keyframes: Vec<glm::Mat4>) -> Self {
        self.keyframes = keyframes;
        self
    }

    /// Sets the local bind pose matrix and the inverse bind matrix to match
    #[must_use]
    pub fn with_bind(mut self, bind: glm::Mat4) -> Self {
        self.matrix = bind;
        self.inverse_bind = glm::inverse(&bind);
        self
    }

    #[must_use]
    pub fn with_child(mut self, child: Self) -> Self {
        self.children.push(child);
        self
    }

    /// Moves to the next keyframe, looping at the end, and makes it the
    /// current matrix. Does nothing for a joint without keyframes.
    pub fn step(&mut self) {
        let count = self.keyframes.len();
        if count > 0 {
            self.current_keyframe = (self.current_keyframe + 1) % count;
            self.matrix = self.keyframes[self.current_keyframe];
        }
    }

    /// Goes back to the first keyframe. Does nothing for a joint without
    /// keyframes.
    pub fn rewind(&mut self) {
        if let Some(first) = self.keyframes.first() {
            self.current_keyframe = 0;
            self.matrix = *first;
        }
    }

    /// Number of joints in this subtree, including this one
    #[must_use]
    pub fn count(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(joint) = stack.pop() {
            count += 1;
            stack.extend(joint.children.iter());
        }
        count
    }

    /// Finds the first joint with the given name, depth first
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&Self> {
        let mut stack = vec![self];
        while let Some(joint) = stack.pop() {
            if joint.name == name {
                return Some(joint);
            }
            stack.extend(joint.children.iter().rev());
        }
        None
    }

    /// Finds the first joint with the given name, depth first
    pub fn find_mut(&mut self, name: &str) -> Option<&mut Self> {
        let mut stack = vec![self];
        while let Some(joint) = stack.pop() {
            if joint.name == name {
                return Some(joint);
            }
            stack.extend(joint.children.iter_mut().rev());
        }
        None
    }

    /// World transforms of every joint, parents before children and siblings
    /// in order. Each is the parent's world transform times the joint's
    /// current local `matrix`. Joints deeper than `max_depth` are left out.
    #[must_use]
    pub fn world_matrices(&self, max_depth: usize) -> Vec<glm::Mat4> {
        let mut output = Vec::new();
        propagate(self, max_depth, |_, world| output.push(world));
        output
    }

    /// Skinning matrices in the same order as `world_matrices`, with each
    /// joint's inverse bind applied
    #[must_use]
    pub fn palette(&self, max_depth: usize) -> Palette {
        let mut output = Vec::new();
        propagate(self, max_depth, |joint, world| {
            output.push(world * joint.inverse_bind);
        });
        Palette(output)
    }
}

/// Skinning matrices ready to hand to a renderer
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Palette(pub Vec<glm::Mat4>);

impl Palette {
    /// Column major floats, 16 per joint, for copying into a GPU buffer
    #[must_use]
    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.0)
    }
}

/// Pre-order walk carrying each parent's world transform down to its
/// children. Returns false if some joints were beyond `max_depth`.
fn propagate(
    root: &Joint,
    max_depth: usize,
    mut visit: impl FnMut(&Joint, glm::Mat4),
) -> bool {
    let mut complete = true;
    let mut stack = vec![(root, glm::Mat4::identity(), 1_usize)];
    while let Some((joint, parent_world, depth)) = stack.pop() {
        if depth > max_depth {
            complete = false;
            continue;
        }
        let world = parent_world * joint.matrix;
        visit(joint, world);
        for child in joint.children.iter().rev() {
            stack.push((child, world, depth + 1));
        }
    }
    complete
}

/// Pre-order walk over a skeleton calling `visit` on every joint, parents
/// before children. Uses an explicit stack, so the only limit on depth is
/// `max_depth` itself. Returns false if some joints were beyond `max_depth`
/// and were not visited.
pub(crate) fn walk_mut(
    root: &mut Joint,
    max_depth: usize,
    mut visit: impl FnMut(&mut Joint),
) -> bool {
    let mut complete = true;
    let mut stack = vec![(root, 1_usize)];
    while let Some((joint, depth)) = stack.pop() {
        if depth > max_depth {
            complete = false;
            continue;
        }
        visit(&mut *joint);
        #[cfg(feature = "trace_joints")]
        trace!(
            "joint {} depth={} keyframe={}",
            joint.name,
            depth,
            joint.current_keyframe
        );
        for child in joint.children.iter_mut().rev() {
            stack.push((child, depth + 1));
        }
    }
    complete
}
