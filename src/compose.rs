// Model matrix composition

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::math::{chain_multiply, rotation_matrix_ordered, scale_matrix, translation_matrix, Matrix4};
use crate::order::{AxisOrder, OpOrder, TransformOp};

/// Per-axis scale, Euler rotation (radians) and translation of one object.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformParams {
    pub scale: Vec3,
    pub rotation: Vec3,
    pub translation: Vec3,
}

impl TransformParams {
    pub fn new(scale: Vec3, rotation: Vec3, translation: Vec3) -> Self {
        Self {
            scale,
            rotation,
            translation,
        }
    }

    /// Unit scale, no rotation, no translation.
    pub fn identity() -> Self {
        Self {
            scale: Vec3::ONE,
            rotation: Vec3::ZERO,
            translation: Vec3::ZERO,
        }
    }

    /// Model matrix for these parameters under the given orders.
    pub fn matrix(&self, axis_order: AxisOrder, op_order: OpOrder) -> Matrix4 {
        let s = scale_matrix(self.scale.x, self.scale.y, self.scale.z);
        let r = rotation_matrix_ordered(axis_order, self.rotation);
        let t = translation_matrix(self.translation.x, self.translation.y, self.translation.z);

        let ordered = op_order.ops().map(|op| match op {
            TransformOp::Scale => s,
            TransformOp::Rotate => r,
            TransformOp::Translate => t,
        });
        chain_multiply(&ordered)
    }
}

impl Default for TransformParams {
    fn default() -> Self {
        Self::identity()
    }
}

/// Builds the model matrix from raw parameters and order strings such as
/// `"xyz"` and `"srt"`. Fails with `InvalidOrder` when either order is not a
/// permutation of its alphabet.
pub fn compose_model_matrix(
    scale: Vec3,
    rotation: Vec3,
    translation: Vec3,
    rotation_axis_order: &str,
    transform_op_order: &str,
) -> Result<Matrix4> {
    let axis_order: AxisOrder = rotation_axis_order.parse()?;
    let op_order: OpOrder = transform_op_order.parse()?;
    Ok(TransformParams::new(scale, rotation, translation).matrix(axis_order, op_order))
}
