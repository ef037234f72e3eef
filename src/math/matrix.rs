use super::Vec3;

/// 4x4 matrix for transformations (column-major for WebGL)
///
/// `Mat4` is a plain `Copy` value. The `translated`/`rotated`/`scaled`
/// builders post-multiply (`M' = M · T`) and return a new matrix, leaving the
/// receiver untouched, so a transform handed to one branch can never be
/// changed through another.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat4 {
    pub data: [f32; 16],
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::identity()
    }
}

impl Mat4 {
    pub fn identity() -> Self {
        Self {
            data: [
                1.0, 0.0, 0.0, 0.0,
                0.0, 1.0, 0.0, 0.0,
                0.0, 0.0, 1.0, 0.0,
                0.0, 0.0, 0.0, 1.0,
            ],
        }
    }

    pub fn translation(x: f32, y: f32, z: f32) -> Self {
        let mut m = Self::identity();
        m.data[12] = x;
        m.data[13] = y;
        m.data[14] = z;
        m
    }

    pub fn scale(x: f32, y: f32, z: f32) -> Self {
        let mut m = Self::identity();
        m.data[0] = x;
        m.data[5] = y;
        m.data[10] = z;
        m
    }

    /// Rotation of `angle` radians about an arbitrary axis.
    ///
    /// The axis is normalized first. A zero-length axis has no direction to
    /// rotate about and yields the identity.
    pub fn rotation(angle: f32, axis: Vec3) -> Self {
        if axis.length_squared() < f32::EPSILON {
            return Self::identity();
        }
        let Vec3 { x, y, z } = axis.normalize();
        let s = angle.sin();
        let c = angle.cos();
        let t = 1.0 - c;

        Self {
            data: [
                x * x * t + c, y * x * t + z * s, z * x * t - y * s, 0.0,
                x * y * t - z * s, y * y * t + c, z * y * t + x * s, 0.0,
                x * z * t + y * s, y * z * t - x * s, z * z * t + c, 0.0,
                0.0, 0.0, 0.0, 1.0,
            ],
        }
    }

    /// Perspective projection matrix
    pub fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Self {
        let f = 1.0 / (fov_y / 2.0).tan();
        let nf = 1.0 / (near - far);

        Self {
            data: [
                f / aspect, 0.0, 0.0, 0.0,
                0.0, f, 0.0, 0.0,
                0.0, 0.0, (far + near) * nf, -1.0,
                0.0, 0.0, 2.0 * far * near * nf, 0.0,
            ],
        }
    }

    /// Matrix multiplication
    pub fn mul(&self, other: &Mat4) -> Self {
        let mut result = [0.0f32; 16];

        for row in 0..4 {
            for col in 0..4 {
                let mut sum = 0.0;
                for k in 0..4 {
                    sum += self.data[row + k * 4] * other.data[k + col * 4];
                }
                result[row + col * 4] = sum;
            }
        }

        Self { data: result }
    }

    /// `self · translation(offset)`
    pub fn translated(&self, offset: Vec3) -> Self {
        self.mul(&Self::translation(offset.x, offset.y, offset.z))
    }

    /// `self · rotation(angle, axis)`
    pub fn rotated(&self, angle: f32, axis: Vec3) -> Self {
        self.mul(&Self::rotation(angle, axis))
    }

    /// `self · scale(factors)`
    pub fn scaled(&self, factors: Vec3) -> Self {
        self.mul(&Self::scale(factors.x, factors.y, factors.z))
    }

    /// Transform a point (applies translation)
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        Vec3::new(
            self.data[0] * p.x + self.data[4] * p.y + self.data[8] * p.z + self.data[12],
            self.data[1] * p.x + self.data[5] * p.y + self.data[9] * p.z + self.data[13],
            self.data[2] * p.x + self.data[6] * p.y + self.data[10] * p.z + self.data[14],
        )
    }

    /// Transform a direction (ignores translation)
    pub fn transform_direction(&self, d: Vec3) -> Vec3 {
        Vec3::new(
            self.data[0] * d.x + self.data[4] * d.y + self.data[8] * d.z,
            self.data[1] * d.x + self.data[5] * d.y + self.data[9] * d.z,
            self.data[2] * d.x + self.data[6] * d.y + self.data[10] * d.z,
        )
    }

    /// Translation column
    pub fn origin(&self) -> Vec3 {
        Vec3::new(self.data[12], self.data[13], self.data[14])
    }

    /// Get as slice for WebGL
    pub fn as_slice(&self) -> &[f32; 16] {
        &self.data
    }

    pub fn approx_eq(&self, other: &Mat4, epsilon: f32) -> bool {
        self.data
            .iter()
            .zip(other.data.iter())
            .all(|(a, b)| (a - b).abs() <= epsilon)
    }
}
