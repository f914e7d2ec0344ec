// Scene state driven once per frame by the renderer

use log::{debug, info};

use crate::animator::Animator;
use crate::camera::Camera;
use crate::compose::TransformParams;
use crate::config::DemoConfig;
use crate::error::Result;
use crate::math::{chain_multiply, perspective_matrix, Matrix4};
use crate::order::{Axis, TransformOp};

/// A discrete user action on the scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Control {
    /// Adds `amount` to one axis of the scale, rotation (radians) or translation target.
    Nudge {
        op: TransformOp,
        axis: Axis,
        amount: f32,
    },
    CycleAxisOrder,
    CycleOpOrder,
    ToggleAnimation,
    Pan { x: f32, y: f32 },
    Dolly(f32),
    /// Restores the configured targets and stops the animation.
    Reset,
}

/// Matrices for one rendered frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameMatrices {
    pub model: Matrix4,
    pub view: Matrix4,
    pub projection: Matrix4,
    /// `projection * view * model`.
    pub mvp: Matrix4,
}

/// The single animated cube plus the camera looking at it.
#[derive(Debug, Clone)]
pub struct Scene {
    /// What the user has dialed in; the animator eases toward these.
    pub target: TransformParams,
    initial: TransformParams,
    pub animator: Animator,
    pub camera: Camera,
    /// Vertical field of view in radians.
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    /// Pan speed in world units per second.
    pub sensitivity: f32,
}

impl Scene {
    pub fn from_config(config: &DemoConfig) -> Result<Self> {
        let animator = Animator::from_config(&config.animator)?;
        Ok(Self {
            target: config.initial,
            initial: config.initial,
            animator,
            camera: Camera::at_distance(config.camera.distance),
            fov: config.camera.fov_degrees.to_radians(),
            near: config.camera.near,
            far: config.camera.far,
            sensitivity: config.camera.sensitivity,
        })
    }

    pub fn apply(&mut self, control: Control) {
        match control {
            Control::Nudge { op, axis, amount } => {
                let field = match op {
                    TransformOp::Scale => &mut self.target.scale,
                    TransformOp::Rotate => &mut self.target.rotation,
                    TransformOp::Translate => &mut self.target.translation,
                };
                field[axis.index()] += amount;
            }
            Control::CycleAxisOrder => {
                let next = self.animator.rotation_axis_order().next();
                info!("rotation axis order: {next}");
                self.animator.set_axis_order(next);
            }
            Control::CycleOpOrder => {
                let next = self.animator.transform_op_order().next();
                info!("transform op order: {next}");
                self.animator.set_op_order(next);
            }
            Control::ToggleAnimation => {
                let start = !self.animator.is_running();
                self.animator.toggle(start);
            }
            Control::Pan { x, y } => self.camera.pan(x, y),
            Control::Dolly(dist) => self.camera.dolly(dist),
            Control::Reset => {
                debug!("scene reset");
                self.target = self.initial;
                self.animator.toggle(false);
            }
        }
    }

    /// Advances the animation clock by `dt_ms` milliseconds.
    pub fn tick(&mut self, dt_ms: f32) {
        self.animator.step(dt_ms);
    }

    pub fn frame(&self, aspect_ratio: f32) -> Result<FrameMatrices> {
        let model = self.animator.animate(
            self.target.scale,
            self.target.translation,
            self.target.rotation,
        );
        let view = self.camera.view_matrix();
        let projection = perspective_matrix(self.fov, self.near, self.far, aspect_ratio)?;
        let mvp = chain_multiply(&[model, view, projection]);

        Ok(FrameMatrices {
            model,
            view,
            projection,
            mvp,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransformError;
    use crate::order::{AxisOrder, OpOrder};
    use glam::Vec3;

    fn scene() -> Scene {
        Scene::from_config(&DemoConfig::default()).unwrap()
    }

    #[test]
    fn nudge_edits_the_target_only() {
        let mut scene = scene();
        scene.apply(Control::Nudge {
            op: TransformOp::Translate,
            axis: Axis::Y,
            amount: 0.5,
        });
        scene.apply(Control::Nudge {
            op: TransformOp::Scale,
            axis: Axis::X,
            amount: 1.0,
        });
        assert_eq!(scene.target.translation, Vec3::new(0.0, 0.5, 0.0));
        assert_eq!(scene.target.scale, Vec3::new(2.0, 1.0, 1.0));

        scene.apply(Control::Reset);
        assert_eq!(scene.target, TransformParams::identity());
    }

    #[test]
    fn cycling_orders_reaches_the_animator() {
        let mut scene = scene();
        scene.apply(Control::CycleAxisOrder);
        scene.apply(Control::CycleOpOrder);
        assert_eq!(scene.animator.rotation_axis_order(), AxisOrder::ALL[1]);
        assert_eq!(scene.animator.transform_op_order(), OpOrder::ALL[1]);
    }

    #[test]
    fn toggle_flips_playback() {
        let mut scene = scene();
        scene.apply(Control::ToggleAnimation);
        scene.tick(250.0);
        assert!(scene.animator.is_running());
        assert_eq!(scene.animator.elapsed(), 250.0);

        scene.apply(Control::ToggleAnimation);
        assert!(!scene.animator.is_running());
        assert_eq!(scene.animator.elapsed(), 0.0);
    }

    #[test]
    fn frame_combines_projection_view_model() {
        let scene = scene();
        let frame = scene.frame(16.0 / 9.0).unwrap();
        assert_eq!(frame.model, Matrix4::IDENTITY);
        assert_eq!(frame.mvp, frame.projection * (frame.view * frame.model));
    }

    #[test]
    fn degenerate_projection_surfaces() {
        let mut scene = scene();
        scene.far = scene.near;
        assert!(matches!(
            scene.frame(1.0),
            Err(TransformError::DegenerateProjection { .. })
        ));
    }
}
