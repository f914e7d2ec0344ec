// Error types for the transform core

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransformError {
    /// An order string is not a permutation of its three-symbol alphabet.
    #[error("invalid {kind} order {order:?}: expected a permutation of {alphabet:?}")]
    InvalidOrder {
        kind: &'static str,
        order: String,
        alphabet: &'static str,
    },

    /// A stage symbol outside `s`, `r`, `t` reached the animator.
    #[error("incorrect animator stage: {0:?}")]
    InvalidStageLabel(char),

    #[error("invalid animator durations: active={active}, cooldown={cooldown}")]
    InvalidDuration { active: f32, cooldown: f32 },

    #[error("degenerate projection: fov={fov}, near={near}, far={far}")]
    DegenerateProjection { fov: f32, near: f32, far: f32 },

    #[error("config error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for TransformError {
    fn from(err: serde_json::Error) -> Self {
        TransformError::Config(err.to_string())
    }
}

impl From<std::io::Error> for TransformError {
    fn from(err: std::io::Error) -> Self {
        TransformError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TransformError>;
