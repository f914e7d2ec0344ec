// Matrix algebra for the transform core

use std::ops::Mul;

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3, Vec4};

use crate::error::{Result, TransformError};
use crate::order::{Axis, AxisOrder};

/// A 4x4 transform stored row-major.
///
/// Points are column vectors: `M * p`. The 16 floats can be handed to a GPU
/// buffer as-is via [`Matrix4::as_flat`].
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Matrix4 {
    rows: [[f32; 4]; 4],
}

impl Matrix4 {
    pub const IDENTITY: Matrix4 = Matrix4 {
        rows: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    pub const fn from_rows(rows: [[f32; 4]; 4]) -> Self {
        Self { rows }
    }

    /// Row-major flat view, ready for upload.
    pub fn as_flat(&self) -> &[f32; 16] {
        bytemuck::cast_ref(&self.rows)
    }

    pub fn to_row_major_array(&self) -> [f32; 16] {
        *self.as_flat()
    }

    /// Column-major layout, as WGSL `mat4x4<f32>` expects it.
    pub fn to_cols_array_2d(&self) -> [[f32; 4]; 4] {
        self.transpose().rows
    }

    pub fn transpose(&self) -> Matrix4 {
        let mut out = [[0.0; 4]; 4];
        for (i, row) in self.rows.iter().enumerate() {
            for (j, value) in row.iter().enumerate() {
                out[j][i] = *value;
            }
        }
        Matrix4 { rows: out }
    }

    pub fn transform_point(&self, point: Vec4) -> Vec4 {
        let p = point.to_array();
        let mut out = [0.0; 4];
        for (i, row) in self.rows.iter().enumerate() {
            for k in 0..4 {
                out[i] += row[k] * p[k];
            }
        }
        Vec4::from_array(out)
    }
}

impl Default for Matrix4 {
    fn default() -> Self {
        Matrix4::IDENTITY
    }
}

impl Mul for Matrix4 {
    type Output = Matrix4;

    fn mul(self, rhs: Matrix4) -> Matrix4 {
        matmul(&self, &rhs)
    }
}

impl From<Matrix4> for Mat4 {
    fn from(m: Matrix4) -> Self {
        Mat4::from_cols_array_2d(&m.to_cols_array_2d())
    }
}

impl From<Mat4> for Matrix4 {
    fn from(m: Mat4) -> Self {
        Matrix4 {
            rows: m.to_cols_array_2d(),
        }
        .transpose()
    }
}

/// Plain 4x4 product. Each cell sums its four products in index order so
/// results are bit-reproducible.
pub fn matmul(a: &Matrix4, b: &Matrix4) -> Matrix4 {
    let mut res = [[0.0f32; 4]; 4];
    for i_row in 0..4 {
        for i_col in 0..4 {
            for i_val in 0..4 {
                res[i_row][i_col] += a.rows[i_row][i_val] * b.rows[i_val][i_col];
            }
        }
    }
    Matrix4 { rows: res }
}

pub fn scale_matrix(x: f32, y: f32, z: f32) -> Matrix4 {
    Matrix4::from_rows([
        [x, 0.0, 0.0, 0.0],
        [0.0, y, 0.0, 0.0],
        [0.0, 0.0, z, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ])
}

pub fn translation_matrix(x: f32, y: f32, z: f32) -> Matrix4 {
    Matrix4::from_rows([
        [1.0, 0.0, 0.0, x],
        [0.0, 1.0, 0.0, y],
        [0.0, 0.0, 1.0, z],
        [0.0, 0.0, 0.0, 1.0],
    ])
}

/// Right-handed rotation by `angle` radians around `axis`.
pub fn rotation_matrix_axis(axis: Axis, angle: f32) -> Matrix4 {
    let (sin, cos) = angle.sin_cos();
    match axis {
        Axis::X => Matrix4::from_rows([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, cos, -sin, 0.0],
            [0.0, sin, cos, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ]),
        Axis::Y => Matrix4::from_rows([
            [cos, 0.0, sin, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [-sin, 0.0, cos, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ]),
        Axis::Z => Matrix4::from_rows([
            [cos, -sin, 0.0, 0.0],
            [sin, cos, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ]),
    }
}

/// Composes matrices in application order: `[A, B, C]` applies A to a point
/// first and C last, i.e. the product `C * B * A`.
///
/// The fold runs left to right; an empty chain is the identity.
pub fn chain_multiply(matrices: &[Matrix4]) -> Matrix4 {
    let Some((first, rest)) = matrices.split_first() else {
        return Matrix4::IDENTITY;
    };
    rest.iter().fold(*first, |acc, m| matmul(m, &acc))
}

/// Builds the per-axis rotations and composes them so the first axis in
/// `order` is applied first. `angles` holds radians around X, Y, Z.
pub fn rotation_matrix_ordered(order: AxisOrder, angles: Vec3) -> Matrix4 {
    let angles = angles.to_array();
    let rotations = order
        .axes()
        .map(|axis| rotation_matrix_axis(axis, angles[axis.index()]));
    chain_multiply(&rotations)
}

/// Symmetric OpenGL-style perspective projection (clip depth in `[-1, 1]`).
///
/// `aspect_ratio` must be positive; it is not checked.
pub fn perspective_matrix(fov: f32, near: f32, far: f32, aspect_ratio: f32) -> Result<Matrix4> {
    let half = fov / 2.0;
    let (sin, cos) = half.sin_cos();
    // rounding in `half` grows with its magnitude
    let tolerance = f32::EPSILON * half.abs().max(1.0);
    if near == far || sin.abs() <= tolerance || cos.abs() <= tolerance {
        return Err(TransformError::DegenerateProjection { fov, near, far });
    }

    let f = cos / sin;
    let range_inv = 1.0 / (near - far);
    Ok(Matrix4::from_rows([
        [f / aspect_ratio, 0.0, 0.0, 0.0],
        [0.0, f, 0.0, 0.0],
        [0.0, 0.0, (near + far) * range_inv, near * far * range_inv * 2.0],
        [0.0, 0.0, -1.0, 0.0],
    ]))
}

/// Right-handed view matrix for a camera at `position` looking along `view_dir`.
pub fn look_at_matrix(position: Vec3, view_dir: Vec3, up: Vec3) -> Matrix4 {
    let forward = view_dir.normalize();
    let x = forward.cross(up).normalize();
    let y = x.cross(forward).normalize();
    let z = -forward;

    Matrix4::from_rows([
        [x.x, x.y, x.z, -x.dot(position)],
        [y.x, y.y, y.z, -y.dot(position)],
        [z.x, z.y, z.z, -z.dot(position)],
        [0.0, 0.0, 0.0, 1.0],
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f32::consts::{FRAC_PI_2, PI};

    fn assert_point_eq(a: Vec4, b: Vec4) {
        for (x, y) in a.to_array().iter().zip(b.to_array().iter()) {
            assert_abs_diff_eq!(*x, *y, epsilon = 1e-5);
        }
    }

    #[test]
    fn single_matrix_chain_is_identity_of_composition() {
        let m = translation_matrix(1.0, -2.0, 3.5) * rotation_matrix_axis(Axis::Y, 0.7);
        assert_eq!(chain_multiply(&[m]), m);
        assert_eq!(chain_multiply(&[]), Matrix4::IDENTITY);
    }

    #[test]
    fn chain_applies_first_matrix_first() {
        let s = scale_matrix(2.0, 2.0, 2.0);
        let t = translation_matrix(1.0, 0.0, 0.0);
        let p = Vec4::new(1.0, 0.0, 0.0, 1.0);

        // scale then translate: 1 * 2 + 1
        assert_point_eq(chain_multiply(&[s, t]).transform_point(p), Vec4::new(3.0, 0.0, 0.0, 1.0));
        // translate then scale: (1 + 1) * 2
        assert_point_eq(chain_multiply(&[t, s]).transform_point(p), Vec4::new(4.0, 0.0, 0.0, 1.0));
    }

    #[test]
    fn chain_matches_explicit_fold() {
        let a = rotation_matrix_axis(Axis::X, 0.3);
        let b = scale_matrix(1.5, 0.5, 2.0);
        let c = translation_matrix(-1.0, 4.0, 0.25);
        assert_eq!(chain_multiply(&[a, b, c]), matmul(&c, &matmul(&b, &a)));
    }

    #[test]
    fn rotations_are_right_handed() {
        let p = Vec4::new(1.0, 0.0, 0.0, 1.0);
        assert_point_eq(
            rotation_matrix_axis(Axis::Z, FRAC_PI_2).transform_point(p),
            Vec4::new(0.0, 1.0, 0.0, 1.0),
        );
        let p = Vec4::new(0.0, 1.0, 0.0, 1.0);
        assert_point_eq(
            rotation_matrix_axis(Axis::X, FRAC_PI_2).transform_point(p),
            Vec4::new(0.0, 0.0, 1.0, 1.0),
        );
        let p = Vec4::new(0.0, 0.0, 1.0, 1.0);
        assert_point_eq(
            rotation_matrix_axis(Axis::Y, FRAC_PI_2).transform_point(p),
            Vec4::new(1.0, 0.0, 0.0, 1.0),
        );
    }

    #[test]
    fn rotation_order_matters() {
        let angles = Vec3::new(FRAC_PI_2, FRAC_PI_2, 0.0);
        let p = Vec4::new(1.0, 0.0, 0.0, 1.0);
        let xyz = rotation_matrix_ordered("xyz".parse().unwrap(), angles).transform_point(p);
        let yxz = rotation_matrix_ordered("yxz".parse().unwrap(), angles).transform_point(p);
        assert!((xyz - yxz).abs().max_element() > 0.5);
    }

    #[test]
    fn agrees_with_glam() {
        let ours = rotation_matrix_axis(Axis::Y, 0.4) * translation_matrix(1.0, 2.0, 3.0);
        let theirs = Mat4::from_rotation_y(0.4) * Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
        let converted: Mat4 = ours.into();
        assert!(converted.abs_diff_eq(theirs, 1e-6));
        assert_eq!(Matrix4::from(Mat4::IDENTITY), Matrix4::IDENTITY);
    }

    #[test]
    fn perspective_matches_gl_convention() {
        let ours = perspective_matrix(45f32.to_radians(), 0.1, 100.0, 1.5).unwrap();
        let theirs = Mat4::perspective_rh_gl(45f32.to_radians(), 1.5, 0.1, 100.0);
        assert!(Mat4::from(ours).abs_diff_eq(theirs, 1e-5));
    }

    #[test]
    fn perspective_rejects_degenerate_frustum() {
        assert!(matches!(
            perspective_matrix(1.0, 5.0, 5.0, 1.0),
            Err(TransformError::DegenerateProjection { .. })
        ));
        assert!(perspective_matrix(0.0, 0.1, 10.0, 1.0).is_err());
        assert!(perspective_matrix(PI, 0.1, 10.0, 1.0).is_err());
        assert!(perspective_matrix(2.0 * PI, 0.1, 10.0, 1.0).is_err());
        assert!(perspective_matrix(3.0 * PI, 0.1, 10.0, 1.0).is_err());
        assert!(perspective_matrix(4.0 * PI, 0.1, 10.0, 1.0).is_err());
        assert!(perspective_matrix(6.0 * PI, 0.1, 10.0, 1.0).is_err());
        assert!(perspective_matrix(179f32.to_radians(), 0.1, 10.0, 1.0).is_ok());
    }

    #[test]
    fn flat_layout_is_row_major() {
        let t = translation_matrix(7.0, 8.0, 9.0);
        let flat = t.to_row_major_array();
        assert_eq!(flat[3], 7.0);
        assert_eq!(flat[7], 8.0);
        assert_eq!(flat[11], 9.0);
        assert_eq!(t.to_cols_array_2d()[3], [7.0, 8.0, 9.0, 1.0]);
    }

    #[test]
    fn look_at_moves_camera_to_origin() {
        let view = look_at_matrix(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z, Vec3::Y);
        assert_point_eq(
            view.transform_point(Vec4::new(0.0, 0.0, 5.0, 1.0)),
            Vec4::new(0.0, 0.0, 0.0, 1.0),
        );
        let glam_view = Mat4::look_at_rh(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::Y);
        assert!(Mat4::from(view).abs_diff_eq(glam_view, 1e-6));
    }
}
