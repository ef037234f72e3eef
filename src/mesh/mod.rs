pub mod color;
pub mod cylinder;
pub mod sphere;
pub mod vertex;

pub use color::ColorSpec;
pub use cylinder::{CylinderGenerator, CylinderMesh, CylinderParams};
pub use sphere::{SphereGenerator, SphereMesh, SphereParams};
pub use vertex::{Vertex, VERTEX_STRIDE};
