use affine_cube::{compose_model_matrix, Animator, Matrix4, OpOrder, TransformError};
use approx::assert_abs_diff_eq;
use glam::Vec3;

const SCALE: Vec3 = Vec3::new(1.5, 0.3, 2.0);
const TRANSLATION: Vec3 = Vec3::new(-1.0, 0.75, 2.5);
const ROTATION: Vec3 = Vec3::new(0.6, -1.1, 2.4);

fn assert_matrix_close(a: &Matrix4, b: &Matrix4) {
    for (x, y) in a.as_flat().iter().zip(b.as_flat().iter()) {
        assert_abs_diff_eq!(*x, *y, epsilon = 1e-5);
    }
}

fn direct(axis_order: &str, op_order: &str) -> Matrix4 {
    compose_model_matrix(SCALE, ROTATION, TRANSLATION, axis_order, op_order).unwrap()
}

#[test]
fn full_cycle_reaches_targets_holds_then_wraps() {
    let mut anim = Animator::new(3000.0, 1000.0, "xyz", "srt").unwrap();
    anim.toggle(true);

    for _ in 0..3 {
        anim.step(1000.0);
    }
    assert_eq!(anim.elapsed(), 3000.0);
    assert_eq!(anim.current_stage_index(), 2);
    assert_eq!(anim.current_stage_progress(), 1.0);

    let params = anim.animated_params(&affine_cube::TransformParams::new(SCALE, ROTATION, TRANSLATION));
    assert_eq!(params.rotation, ROTATION);
    assert_eq!(params.translation, TRANSLATION);
    assert_abs_diff_eq!(params.scale.y, SCALE.y, epsilon = 1e-6);

    let at_end = anim.animate(SCALE, TRANSLATION, ROTATION);
    assert_matrix_close(&at_end, &direct("xyz", "srt"));

    // cooldown freezes the parameters
    anim.step(500.0);
    assert_eq!(anim.elapsed(), 3500.0);
    assert_eq!(anim.animate(SCALE, TRANSLATION, ROTATION), at_end);

    anim.step(500.0);
    assert_eq!(anim.elapsed(), 0.0);
    assert_eq!(
        anim.animate(SCALE, TRANSLATION, ROTATION),
        compose_model_matrix(Vec3::ONE, Vec3::ZERO, Vec3::ZERO, "xyz", "srt").unwrap()
    );
}

#[test]
fn every_op_order_lands_on_its_target() {
    for op_order in OpOrder::ALL {
        let order = op_order.to_string();
        let mut anim = Animator::new(3000.0, 1000.0, "zyx", &order).unwrap();
        anim.toggle(true);
        anim.step(3200.0);
        assert_matrix_close(&anim.animate(SCALE, TRANSLATION, ROTATION), &direct("zyx", &order));
    }
}

#[test]
fn stopping_resets_and_shows_raw_composition() {
    let mut anim = Animator::new(3000.0, 1000.0, "xyz", "srt").unwrap();
    anim.toggle(true);
    anim.step(1700.0);
    anim.toggle(false);

    assert_eq!(anim.elapsed(), 0.0);
    assert!(!anim.state().active);
    assert_eq!(anim.animate(SCALE, TRANSLATION, ROTATION), direct("xyz", "srt"));
}

#[test]
fn animate_is_idempotent_between_steps() {
    let mut anim = Animator::new(3000.0, 1000.0, "yzx", "rts").unwrap();
    anim.toggle(true);
    anim.step(1234.5);

    let first = anim.animate(SCALE, TRANSLATION, ROTATION);
    let second = anim.animate(SCALE, TRANSLATION, ROTATION);
    assert_eq!(first.to_row_major_array(), second.to_row_major_array());
}

#[test]
fn live_reorder_reads_on_next_animate() {
    let mut anim = Animator::new(3000.0, 0.0, "xyz", "srt").unwrap();
    anim.toggle(true);
    anim.step(3000.0 - 1e-3);

    anim.set_rotation_axis_order("Z-Y-X").unwrap();
    anim.set_transform_op_order("t r s").unwrap();
    assert_matrix_close(&anim.animate(SCALE, TRANSLATION, ROTATION), &direct("zyx", "trs"));

    assert_eq!(
        anim.set_transform_op_order("tr?"),
        Err(TransformError::InvalidStageLabel('?'))
    );
    assert_eq!(anim.transform_op_order().to_string(), "trs");
}

#[test]
fn state_snapshot_reports_configuration() {
    let mut anim = Animator::new(900.0, 300.0, "xyz", "srt").unwrap();
    anim.toggle(true);
    anim.step(450.0);

    let state = anim.state();
    assert!(state.active);
    assert_eq!(state.elapsed, 450.0);
    assert_eq!(state.active_duration, 900.0);
    assert_eq!(state.cooldown_duration, 300.0);
    assert_eq!(anim.stage_duration(), 300.0);
    assert_eq!(anim.total_duration(), 1200.0);
}
