// Demo configuration

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::compose::TransformParams;
use crate::error::Result;
use crate::order::{AxisOrder, OpOrder};

/// Environment variable naming a JSON config file for the demo.
pub const CONFIG_ENV_VAR: &str = "AFFINE_CUBE_CONFIG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimatorConfig {
    pub active_duration_ms: f32,
    pub cooldown_duration_ms: f32,
    pub rotation_axis_order: AxisOrder,
    pub transform_op_order: OpOrder,
}

impl Default for AnimatorConfig {
    fn default() -> Self {
        Self {
            active_duration_ms: 3000.0,
            cooldown_duration_ms: 1000.0,
            rotation_axis_order: AxisOrder::XYZ,
            transform_op_order: OpOrder::SRT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub distance: f32,
    /// World units moved per second of held pan key.
    pub sensitivity: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 45.0,
            near: 0.1,
            far: 100.0,
            distance: 5.0,
            sensitivity: 2.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    pub animator: AnimatorConfig,
    pub camera: CameraConfig,
    pub initial: TransformParams,
}

impl DemoConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Loads the file named by [`CONFIG_ENV_VAR`], or defaults when unset.
    pub fn from_env() -> Result<Self> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => {
                log::info!("loading config from {}", Path::new(&path).display());
                Self::load(path)
            }
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransformError;
    use glam::Vec3;

    #[test]
    fn partial_json_fills_defaults() {
        let cfg = DemoConfig::from_json_str(
            r#"{
                "animator": { "active_duration_ms": 6000, "transform_op_order": "T-R-S" },
                "initial": { "scale": [2.0, 1.0, 1.0] }
            }"#,
        )
        .unwrap();

        assert_eq!(cfg.animator.active_duration_ms, 6000.0);
        assert_eq!(cfg.animator.cooldown_duration_ms, 1000.0);
        assert_eq!(cfg.animator.transform_op_order.to_string(), "trs");
        assert_eq!(cfg.camera, CameraConfig::default());
        assert_eq!(cfg.initial.scale, Vec3::new(2.0, 1.0, 1.0));
        assert_eq!(cfg.initial.translation, Vec3::ZERO);
    }

    #[test]
    fn bad_order_in_config_is_rejected() {
        let err = DemoConfig::from_json_str(r#"{ "animator": { "rotation_axis_order": "xxz" } }"#)
            .unwrap_err();
        assert!(matches!(err, TransformError::Config(_)));
    }

    #[test]
    fn missing_file_is_a_config_error() {
        let err = DemoConfig::load("/nonexistent/affine-cube.json").unwrap_err();
        assert!(matches!(err, TransformError::Config(_)));
    }
}
