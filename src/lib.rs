//! ground-gen
//!
//! A one-shot generator for a textured ground-plane GLB asset. The crate
//! decodes a texture image, builds a square ground mesh with tiling UV
//! coordinates, binds the texture through a metallic-roughness material and
//! serializes everything into a single self-contained binary glTF file for
//! use in a larger preset library.
//!
//! High-level modules
//! - `geometry`: the four-corner plane mesh and its invariants
//! - `texture`: texture decoding plus the lossless PNG copy for embedding
//! - `material`: CPU-side surface description bound to the mesh
//! - `export`: glTF document assembly and GLB writing
//!

pub mod export;
pub mod geometry;
pub mod material;
pub mod texture;

// Re-exports commonly used types for convenience in downstream code.
pub use export::{GroundPlane, build_glb, export_ground_glb};
pub use geometry::PlaneMesh;
pub use material::GroundMaterial;
pub use texture::TextureData;
