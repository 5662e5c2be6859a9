//! Row-major 3x4 affine matrix matching the runtime's `HmdMatrix34` layout.

/// A 3x3 linear block plus a translation column, stored row-major.
///
/// `m[row][3]` is the translation. Physical device poses carry an orthonormal
/// linear block; marker transforms produced by the composer do not (the vertical
/// column is stretched by the height factor), so callers must not assume rigidity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Affine3x4 {
    pub m: [[f32; 4]; 3],
}

impl Default for Affine3x4 {
    fn default() -> Self {
        Self::identity()
    }
}

impl Affine3x4 {
    /// Identity rotation with zero translation.
    pub const fn identity() -> Self {
        Self {
            m: [
                [1.0, 0.0, 0.0, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
            ],
        }
    }

    /// Build from a 3x3 linear block and a translation.
    pub const fn from_parts(linear: [[f32; 3]; 3], translation: [f32; 3]) -> Self {
        Self {
            m: [
                [linear[0][0], linear[0][1], linear[0][2], translation[0]],
                [linear[1][0], linear[1][1], linear[1][2], translation[1]],
                [linear[2][0], linear[2][1], linear[2][2], translation[2]],
            ],
        }
    }

    /// Pure translation.
    pub const fn from_translation(x: f32, y: f32, z: f32) -> Self {
        Self::from_parts([[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]], [x, y, z])
    }

    /// Rotation of `radians` about the vertical (Y) axis, placed at `translation`.
    pub fn from_yaw(radians: f32, translation: [f32; 3]) -> Self {
        let (s, c) = radians.sin_cos();
        Self::from_parts([[c, 0.0, s], [0.0, 1.0, 0.0], [-s, 0.0, c]], translation)
    }

    pub fn translation(&self) -> [f32; 3] {
        [self.m[0][3], self.m[1][3], self.m[2][3]]
    }

    pub fn set_translation(&mut self, translation: [f32; 3]) {
        for (row, value) in self.m.iter_mut().zip(translation) {
            row[3] = value;
        }
    }

    /// Add `delta` to the translation column.
    pub fn translate(&mut self, delta: [f32; 3]) {
        for (row, value) in self.m.iter_mut().zip(delta) {
            row[3] += value;
        }
    }

    pub fn linear(&self) -> [[f32; 3]; 3] {
        let mut out = [[0.0; 3]; 3];
        for (dst, src) in out.iter_mut().zip(self.m.iter()) {
            dst.copy_from_slice(&src[..3]);
        }
        out
    }

    /// Overwrite the 3x3 block, leaving translation untouched.
    pub fn set_linear(&mut self, linear: [[f32; 3]; 3]) {
        for (dst, src) in self.m.iter_mut().zip(linear.iter()) {
            dst[..3].copy_from_slice(src);
        }
    }

    /// Zero every cell of the 3x3 block.
    pub fn clear_linear(&mut self) {
        self.set_linear([[0.0; 3]; 3]);
    }

    /// Determinant of the 3x3 block.
    pub fn determinant(&self) -> f32 {
        let m = &self.m;
        m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
            - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
            + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
    }

    /// Whether the 3x3 block is orthonormal with unit determinant, within `tolerance`.
    pub fn is_rigid(&self, tolerance: f32) -> bool {
        let l = self.linear();
        for i in 0..3 {
            for j in 0..3 {
                let dot: f32 = (0..3).map(|k| l[i][k] * l[j][k]).sum();
                let expected = if i == j { 1.0 } else { 0.0 };
                if (dot - expected).abs() > tolerance {
                    return false;
                }
            }
        }
        (self.determinant() - 1.0).abs() <= tolerance
    }
}

impl From<[[f32; 4]; 3]> for Affine3x4 {
    fn from(m: [[f32; 4]; 3]) -> Self {
        Self { m }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_is_rigid() {
        assert!(Affine3x4::identity().is_rigid(1e-6));
        assert_eq!(Affine3x4::identity().translation(), [0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_yaw_is_rigid() {
        let pose = Affine3x4::from_yaw(0.7, [1.0, 2.0, 3.0]);
        assert!(pose.is_rigid(1e-5));
        assert_eq!(pose.translation(), [1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_clear_linear_keeps_translation() {
        let mut pose = Affine3x4::from_yaw(1.2, [0.5, 1.5, -2.0]);
        pose.clear_linear();
        assert_eq!(pose.linear(), [[0.0; 3]; 3]);
        assert_eq!(pose.translation(), [0.5, 1.5, -2.0]);
        assert!(!pose.is_rigid(1e-3));
    }

    #[test]
    fn test_translate_accumulates() {
        let mut pose = Affine3x4::from_translation(1.0, 1.0, 1.0);
        pose.translate([0.5, -1.0, 2.0]);
        assert_eq!(pose.translation(), [1.5, 0.0, 3.0]);
    }
}
