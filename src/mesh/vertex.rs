use crate::math::Vec3;

/// Floats per interleaved vertex: position(3) + color(4)
pub const VERTEX_STRIDE: usize = 7;

/// Byte stride of one interleaved vertex
pub const VERTEX_STRIDE_BYTES: i32 = (VERTEX_STRIDE * std::mem::size_of::<f32>()) as i32;

/// A vertex with position and RGBA color
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Vec3,
    pub color: [f32; 4],
}

impl Vertex {
    pub fn new(position: Vec3, color: [f32; 4]) -> Self {
        Self { position, color }
    }

    /// Convert to flat array for WebGL buffer
    /// Layout: position(3) + color(4) = 7 floats
    pub fn to_array(&self) -> [f32; VERTEX_STRIDE] {
        [
            self.position.x, self.position.y, self.position.z,
            self.color[0], self.color[1], self.color[2], self.color[3],
        ]
    }
}

/// Flatten vertices into an interleaved f32 buffer
pub fn vertex_data(vertices: &[Vertex]) -> Vec<f32> {
    vertices.iter().flat_map(|v| v.to_array()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_to_array() {
        let v = Vertex::new(Vec3::new(1.0, 2.0, 3.0), [0.25, 0.5, 0.75, 1.0]);

        let arr = v.to_array();
        assert_eq!(arr[0], 1.0);
        assert_eq!(arr[2], 3.0);
        assert_eq!(arr[3], 0.25);
        assert_eq!(arr[6], 1.0);
    }

    #[test]
    fn test_vertex_data_flat() {
        let verts = [
            Vertex::new(Vec3::ZERO, [0.0, 0.0, 0.0, 1.0]),
            Vertex::new(Vec3::RIGHT, [1.0, 1.0, 1.0, 1.0]),
        ];

        let data = vertex_data(&verts);
        assert_eq!(data.len(), 2 * VERTEX_STRIDE);
        assert_eq!(data[7], 1.0); // second vertex position.x
        assert_eq!(VERTEX_STRIDE_BYTES, 28);
    }
}
