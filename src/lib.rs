//! Affine transform composition and staged animation for a single cube.
//!
//! [`math`] holds the 4x4 matrix builders, [`compose`] turns scale/rotation/
//! translation plus two orders into a model matrix, and [`animator`] replays
//! that composition stage by stage over time. [`scene`] ties them to a camera
//! for the demo binary.

pub mod animator;
pub mod camera;
pub mod compose;
pub mod config;
pub mod error;
pub mod math;
pub mod order;
pub mod scene;

pub use animator::{ease, Animator, AnimatorState, Playback};
pub use camera::Camera;
pub use compose::{compose_model_matrix, TransformParams};
pub use config::{AnimatorConfig, CameraConfig, DemoConfig};
pub use error::{Result, TransformError};
pub use math::{
    chain_multiply, look_at_matrix, matmul, perspective_matrix, rotation_matrix_axis,
    rotation_matrix_ordered, scale_matrix, translation_matrix, Matrix4,
};
pub use order::{Axis, AxisOrder, OpOrder, TransformOp};
pub use scene::{Control, FrameMatrices, Scene};
