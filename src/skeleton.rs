//! Skeleton import: sprite bone metadata to a flat node array.

use crate::error::ImportError;
use crate::float::Float;
use crate::graph::Node;
use crate::vec::Vec2;
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec as AllocVec;

/// One bone of a sprite skeleton, in its parent's local frame.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bone<F: Float> {
    pub name: Option<String>,
    pub position: Vec2<F>,
    /// Radians, counter-clockwise.
    pub rotation: F,
    /// `None` attaches the bone to the synthetic root.
    pub parent: Option<usize>,
}

impl<F: Float> Bone<F> {
    pub fn new(position: Vec2<F>, rotation: F, parent: Option<usize>) -> Self {
        Bone { name: None, position, rotation, parent }
    }

    /// Bone from asset metadata, where a negative parent index means "root".
    pub fn from_parent_index(position: Vec2<F>, rotation: F, parent_index: i32) -> Self {
        let parent = usize::try_from(parent_index).ok();
        Bone::new(position, rotation, parent)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Resolve `bones` into world-space nodes under a root at `origin`.
///
/// Parents must precede their children. Unnamed bones are called `Bone_<i>`.
pub fn import<F: Float>(bones: &[Bone<F>], origin: Vec2<F>) -> Result<AllocVec<Node<F>>, ImportError> {
    if bones.is_empty() {
        return Err(ImportError::NoBones);
    }

    let mut nodes: AllocVec<Node<F>> = AllocVec::with_capacity(bones.len());
    for (i, bone) in bones.iter().enumerate() {
        let (position, rotation) = match bone.parent {
            None => (origin + bone.position, bone.rotation),
            Some(parent) => {
                let p = nodes
                    .get(parent)
                    .ok_or(ImportError::ParentOutOfOrder { bone: i, parent })?;
                (p.position + bone.position.rotate(p.rotation), p.rotation + bone.rotation)
            }
        };

        let name = match &bone.name {
            Some(name) if !name.is_empty() => name.clone(),
            _ => format!("Bone_{}", i),
        };

        nodes.push(Node {
            name,
            local_position: bone.position,
            local_rotation: bone.rotation,
            parent: bone.parent,
            position,
            rotation,
            body: None,
            shape: None,
        });
    }

    Ok(nodes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vec::Vec;
    use alloc::vec;

    #[test]
    fn chains_parent_transforms() {
        let half_turn = core::f32::consts::PI;
        let bones = vec![
            Bone::new(Vec2::new(1.0f32, 0.0), half_turn, None),
            Bone::new(Vec2::new(2.0, 0.0), 0.0, Some(0)),
        ];
        let nodes = import(&bones, Vec2::new(10.0, 0.0)).unwrap();
        assert_eq!(nodes[0].position, Vec2::new(11.0, 0.0));
        // Child is rotated by the parent's half turn.
        assert!((nodes[1].position.x - 9.0).abs() < 1e-5);
        assert!(nodes[1].position.y.abs() < 1e-5);
        assert_eq!(nodes[1].name, "Bone_1");
    }

    #[test]
    fn negative_parent_index_is_root() {
        let bone = Bone::from_parent_index(Vec2::new(0.0f32, 0.0), 0.0, -1);
        assert_eq!(bone.parent, None);
    }

    #[test]
    fn rejects_forward_parent() {
        let bones = vec![Bone::new(Vec2::new(0.0f32, 0.0), 0.0, Some(1))];
        assert_eq!(import(&bones, Vec2::zero()), Err(ImportError::ParentOutOfOrder { bone: 0, parent: 1 }));
    }

    #[test]
    fn empty_skeleton_has_no_bones() {
        let bones: [Bone<f32>; 0] = [];
        assert_eq!(import(&bones, Vec2::zero()), Err(ImportError::NoBones));
    }
}
