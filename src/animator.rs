// Staged scale/rotate/translate animation

use glam::Vec3;
use log::{debug, warn};

use crate::compose::TransformParams;
use crate::config::AnimatorConfig;
use crate::error::{Result, TransformError};
use crate::math::Matrix4;
use crate::order::{AxisOrder, OpOrder, TransformOp};

/// Number of stages in the active window, one per transform operation.
pub const STAGE_COUNT: usize = 3;

/// Smooth-step ease: `t²(3 - 2t)` with `t` clamped to `[0, 1]`.
pub fn ease(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Playback {
    Stopped,
    Running,
}

/// Point-in-time view of the animator clock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimatorState {
    pub active: bool,
    pub elapsed: f32,
    pub active_duration: f32,
    pub cooldown_duration: f32,
}

/// Drives one object through three sequential stages, then holds for a
/// cooldown and repeats.
///
/// The active window is split into equal stages. Stage `i` animates the `i`-th
/// operation of the current op order, so reordering live changes which
/// operation moves first without restarting the clock. Times are in whatever
/// unit `step` is fed (milliseconds in the demo).
#[derive(Debug, Clone)]
pub struct Animator {
    active_duration: f32,
    cooldown_duration: f32,
    stage_duration: f32,
    elapsed: f32,
    playback: Playback,
    axis_order: AxisOrder,
    op_order: OpOrder,
}

impl Animator {
    pub fn new(
        active_duration: f32,
        cooldown_duration: f32,
        rotation_axis_order: &str,
        transform_op_order: &str,
    ) -> Result<Self> {
        let axis_order = rotation_axis_order.parse()?;
        let op_order = OpOrder::parse_stages(transform_op_order)?;
        Self::with_orders(active_duration, cooldown_duration, axis_order, op_order)
    }

    pub fn with_orders(
        active_duration: f32,
        cooldown_duration: f32,
        axis_order: AxisOrder,
        op_order: OpOrder,
    ) -> Result<Self> {
        let valid = active_duration.is_finite()
            && active_duration > 0.0
            && cooldown_duration.is_finite()
            && cooldown_duration >= 0.0;
        if !valid {
            return Err(TransformError::InvalidDuration {
                active: active_duration,
                cooldown: cooldown_duration,
            });
        }

        Ok(Self {
            active_duration,
            cooldown_duration,
            stage_duration: active_duration / STAGE_COUNT as f32,
            elapsed: 0.0,
            playback: Playback::Stopped,
            axis_order,
            op_order,
        })
    }

    pub fn from_config(config: &AnimatorConfig) -> Result<Self> {
        Self::with_orders(
            config.active_duration_ms,
            config.cooldown_duration_ms,
            config.rotation_axis_order,
            config.transform_op_order,
        )
    }

    pub fn rotation_axis_order(&self) -> AxisOrder {
        self.axis_order
    }

    pub fn transform_op_order(&self) -> OpOrder {
        self.op_order
    }

    pub fn set_axis_order(&mut self, order: AxisOrder) {
        if order != self.axis_order {
            debug!("rotation axis order {} -> {}", self.axis_order, order);
        }
        self.axis_order = order;
    }

    pub fn set_op_order(&mut self, order: OpOrder) {
        if order != self.op_order {
            debug!("transform op order {} -> {}", self.op_order, order);
        }
        self.op_order = order;
    }

    /// Validates and applies a new rotation axis order. On error the current
    /// order is kept.
    pub fn set_rotation_axis_order(&mut self, order: &str) -> Result<()> {
        self.set_axis_order(order.parse()?);
        Ok(())
    }

    /// Validates and applies a new stage order. On error the current order is kept.
    pub fn set_transform_op_order(&mut self, order: &str) -> Result<()> {
        self.set_op_order(OpOrder::parse_stages(order)?);
        Ok(())
    }

    pub fn playback(&self) -> Playback {
        self.playback
    }

    pub fn is_running(&self) -> bool {
        self.playback == Playback::Running
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn stage_duration(&self) -> f32 {
        self.stage_duration
    }

    pub fn total_duration(&self) -> f32 {
        self.active_duration + self.cooldown_duration
    }

    pub fn state(&self) -> AnimatorState {
        AnimatorState {
            active: self.is_running(),
            elapsed: self.elapsed,
            active_duration: self.active_duration,
            cooldown_duration: self.cooldown_duration,
        }
    }

    /// Starts or stops the animation. Starting an already running animator
    /// keeps its clock; stopping always rewinds it to zero.
    pub fn toggle(&mut self, start: bool) {
        if start {
            if self.playback == Playback::Stopped {
                debug!("animator started");
            }
            self.playback = Playback::Running;
        } else {
            if self.playback == Playback::Running {
                debug!("animator stopped at {:.1}", self.elapsed);
            }
            self.playback = Playback::Stopped;
            self.elapsed = 0.0;
        }
    }

    /// Advances the clock by `dt`, wrapping over the full active + cooldown cycle.
    pub fn step(&mut self, dt: f32) {
        if self.playback == Playback::Stopped {
            return;
        }
        if !dt.is_finite() {
            warn!("ignoring non-finite animator step {dt}");
            return;
        }

        let total = self.total_duration();
        let mut next = (self.elapsed + dt).rem_euclid(total);
        // f32 rem_euclid can round up to the divisor
        if next >= total {
            next = 0.0;
        }
        if next < self.elapsed {
            debug!("animator cycle wrapped");
        }
        self.elapsed = next;
    }

    pub fn current_stage_index(&self) -> usize {
        let idx = (self.elapsed / self.stage_duration).floor() as usize;
        idx.min(STAGE_COUNT - 1)
    }

    pub fn current_stage(&self) -> TransformOp {
        self.op_order.get(self.current_stage_index())
    }

    /// Progress through the current stage, in `[0, 1]`. Holds at 1 during cooldown.
    pub fn current_stage_progress(&self) -> f32 {
        let progress = self.elapsed / self.stage_duration - self.current_stage_index() as f32;
        progress.clamp(0.0, 1.0)
    }

    pub fn stage_progress(&self, stage_idx: usize) -> f32 {
        let current = self.current_stage_index();
        if stage_idx < current {
            1.0
        } else if stage_idx == current {
            self.current_stage_progress()
        } else {
            0.0
        }
    }

    /// Parameters actually shown this tick. Stopped animators pass the
    /// targets through untouched.
    pub fn animated_params(&self, target: &TransformParams) -> TransformParams {
        let mut out = *target;
        if !self.is_running() {
            return out;
        }

        for (stage_idx, op) in self.op_order.ops().into_iter().enumerate() {
            let stage_progress = self.stage_progress(stage_idx);
            match op {
                TransformOp::Scale => {
                    let p = ease(stage_progress);
                    out.scale = p * (target.scale - Vec3::ONE) + Vec3::ONE;
                }
                TransformOp::Translate => {
                    let p = ease(stage_progress);
                    out.translation = p * target.translation;
                }
                TransformOp::Rotate => {
                    out.rotation = self.staged_rotation(stage_progress, target.rotation);
                }
            }
        }

        out
    }

    /// Rotates one axis at a time, in axis order, across the rotate stage.
    fn staged_rotation(&self, stage_progress: f32, target: Vec3) -> Vec3 {
        let scaled = stage_progress * STAGE_COUNT as f32;
        let sub_stage = scaled.floor();
        let sub_progress = ease(scaled - sub_stage);
        let sub_idx = sub_stage as usize;

        let mut rotation = target;
        for (axis_idx, axis) in self.axis_order.axes().into_iter().enumerate() {
            let i = axis.index();
            rotation[i] = if axis_idx < sub_idx {
                target[i]
            } else if axis_idx == sub_idx {
                sub_progress * target[i]
            } else {
                0.0
            };
        }
        rotation
    }

    /// Model matrix for this tick, composed with the live orders.
    pub fn animate(&self, scale: Vec3, translation: Vec3, rotation: Vec3) -> Matrix4 {
        let target = TransformParams::new(scale, rotation, translation);
        self.animated_params(&target)
            .matrix(self.axis_order, self.op_order)
    }
}
