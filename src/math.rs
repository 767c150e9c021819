//! Minimal 4x4 matrix support for node-to-scene transform composition.
//!
//! The surrounding scene-description layer and the geographic coordinate
//! math (`iscs_to_gocs`) are external collaborators; this module only
//! supplies what the Primitive Builder needs to compose glTF node
//! transforms, mirroring the teacher's `mint`-free `Mat4 = [[f32; 4]; 4]`
//! representation.

/// 4x4 column-major matrix.
pub type Mat4 = [[f32; 4]; 4];

/// The identity matrix.
pub const IDENTITY: Mat4 = [
    [1.0, 0.0, 0.0, 0.0],
    [0.0, 1.0, 0.0, 0.0],
    [0.0, 0.0, 1.0, 0.0],
    [0.0, 0.0, 0.0, 1.0],
];

/// Column-major 4x4 matrix multiplication, `a * b`.
pub fn mul(a: &Mat4, b: &Mat4) -> Mat4 {
    let mut out = [[0.0f32; 4]; 4];
    for col in 0..4 {
        for row in 0..4 {
            let mut sum = 0.0;
            for k in 0..4 {
                sum += a[k][row] * b[col][k];
            }
            out[col][row] = sum;
        }
    }
    out
}

/// Composes a TRS (translation/rotation/scale) decomposition into a matrix,
/// applied in `T * R * S` order as required by the glTF 2.0 node schema.
pub fn trs_to_matrix(translation: [f32; 3], rotation: [f32; 4], scale: [f32; 3]) -> Mat4 {
    let r = quat_to_matrix(rotation);
    let mut m = [[0.0f32; 4]; 4];
    for col in 0..3 {
        for row in 0..3 {
            m[col][row] = r[col][row] * scale[col];
        }
    }
    m[3] = [translation[0], translation[1], translation[2], 1.0];
    m[0][3] = 0.0;
    m[1][3] = 0.0;
    m[2][3] = 0.0;
    m
}

fn quat_to_matrix(q: [f32; 4]) -> Mat4 {
    let [x, y, z, w] = q;
    let (x2, y2, z2) = (x + x, y + y, z + z);
    let (xx, xy, xz) = (x * x2, x * y2, x * z2);
    let (yy, yz, zz) = (y * y2, y * z2, z * z2);
    let (wx, wy, wz) = (w * x2, w * y2, w * z2);
    [
        [1.0 - (yy + zz), xy + wz, xz - wy, 0.0],
        [xy - wz, 1.0 - (xx + zz), yz + wx, 0.0],
        [xz + wy, yz - wx, 1.0 - (xx + yy), 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_mat4_close(a: Mat4, b: Mat4) {
        for col in 0..4 {
            for row in 0..4 {
                approx::assert_relative_eq!(a[col][row], b[col][row], epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn identity_times_identity_is_identity() {
        assert_eq!(mul(&IDENTITY, &IDENTITY), IDENTITY);
    }

    #[test]
    fn trs_identity_matches_matrix_identity() {
        let m = trs_to_matrix([0.0, 0.0, 0.0], [0.0, 0.0, 0.0, 1.0], [1.0, 1.0, 1.0]);
        assert_eq!(m, IDENTITY);
    }

    #[test]
    fn trs_translation_only() {
        let m = trs_to_matrix([1.0, 2.0, 3.0], [0.0, 0.0, 0.0, 1.0], [1.0, 1.0, 1.0]);
        assert_eq!(m[3], [1.0, 2.0, 3.0, 1.0]);
    }

    #[test]
    fn trs_quarter_turn_about_z_matches_hand_derived_matrix() {
        // 90deg rotation about Z as a unit quaternion: sin(45deg), 0, 0, cos(45deg)
        // on the z axis: (0, 0, sin(45deg), cos(45deg)).
        let half = std::f32::consts::FRAC_PI_4;
        let m = trs_to_matrix([0.0, 0.0, 0.0], [0.0, 0.0, half.sin(), half.cos()], [1.0, 1.0, 1.0]);
        let expected = [
            [0.0, 1.0, 0.0, 0.0],
            [-1.0, 0.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ];
        assert_mat4_close(m, expected);
    }

    #[test]
    fn mul_of_scale_and_translation_matches_hand_derived_matrix() {
        let scale = trs_to_matrix([0.0, 0.0, 0.0], [0.0, 0.0, 0.0, 1.0], [2.0, 2.0, 2.0]);
        let translate = trs_to_matrix([1.0, 0.0, 0.0], [0.0, 0.0, 0.0, 1.0], [1.0, 1.0, 1.0]);
        let combined = mul(&translate, &scale);
        let expected = [
            [2.0, 0.0, 0.0, 0.0],
            [0.0, 2.0, 0.0, 0.0],
            [0.0, 0.0, 2.0, 0.0],
            [1.0, 0.0, 0.0, 1.0],
        ];
        assert_mat4_close(combined, expected);
    }
}
