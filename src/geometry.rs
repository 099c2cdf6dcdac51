//! CPU-side ground plane mesh construction.
//!
//! Builds the four-corner quad every exported ground asset shares: positions
//! on the y = 0 plane, upward normals, tiled texture coordinates and two
//! triangles that wind counter-clockwise when viewed from above.

use anyhow::{Result, ensure};
use cgmath::Vector3;

/// Indexed ground quad with parallel per-vertex attribute arrays.
///
/// Positions, normals and UVs always have the same length and `indices`
/// references them front-face up, so the attribute arrays can be written to a
/// container buffer as-is. Constructed via [`ground`](Self::ground).
#[derive(Clone, Debug, PartialEq)]
pub struct PlaneMesh {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub indices: Vec<u16>,
}

impl PlaneMesh {
    /// Build a square ground plane with side length `size_meters` centered at
    /// the origin, lying in the y = 0 plane.
    ///
    /// The texture repeats `tile_count` times along each axis. Corners are
    /// traversed starting at the near-left corner (-x, +z) so that the
    /// canonical `[0, 1, 2, 0, 2, 3]` index pattern is counter-clockwise as
    /// seen from +Y, consistent with the upward normals.
    pub fn ground(size_meters: f32, tile_count: f32) -> Result<Self> {
        ensure!(
            size_meters.is_finite() && size_meters > 0.0,
            "plane size must be positive and finite, got {size_meters}"
        );
        ensure!(
            tile_count.is_finite() && tile_count > 0.0,
            "tile count must be positive and finite, got {tile_count}"
        );

        let h = size_meters / 2.0;
        let t = tile_count;
        let positions = vec![
            [-h, 0.0, h],
            [h, 0.0, h],
            [h, 0.0, -h],
            [-h, 0.0, -h],
        ];
        let normals = vec![[0.0, 1.0, 0.0]; positions.len()];
        // u runs along +x, v is 0 at the far (-z) edge. Matching the corner
        // traversal above keeps the texture unmirrored and unrotated.
        let uvs = vec![[0.0, t], [t, t], [t, 0.0], [0.0, 0.0]];
        let indices = vec![0, 1, 2, 0, 2, 3];

        Ok(Self {
            positions,
            normals,
            uvs,
            indices,
        })
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Component-wise position bounds, as required by the POSITION accessor.
    pub fn bounds(&self) -> ([f32; 3], [f32; 3]) {
        let mut min = [f32::INFINITY; 3];
        let mut max = [f32::NEG_INFINITY; 3];
        for position in &self.positions {
            for axis in 0..3 {
                min[axis] = min[axis].min(position[axis]);
                max[axis] = max[axis].max(position[axis]);
            }
        }
        (min, max)
    }

    /// Geometric normal of triangle `tri`: the cross product of its edges,
    /// unnormalized. Points up (positive y) for front-face-up winding.
    pub fn face_normal(&self, tri: usize) -> Vector3<f32> {
        let i = tri * 3;
        let a: Vector3<f32> = self.positions[self.indices[i] as usize].into();
        let b: Vector3<f32> = self.positions[self.indices[i + 1] as usize].into();
        let c: Vector3<f32> = self.positions[self.indices[i + 2] as usize].into();
        (b - a).cross(c - a)
    }

    /// Check the structural invariants before the mesh is serialized:
    /// matching attribute counts, in-bounds indices, whole triangles and
    /// upward-facing winding.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.normals.len() == self.positions.len()
                && self.uvs.len() == self.positions.len(),
            "attribute counts differ: {} positions, {} normals, {} uvs",
            self.positions.len(),
            self.normals.len(),
            self.uvs.len()
        );
        ensure!(
            self.indices.len() % 3 == 0,
            "index count {} does not form whole triangles",
            self.indices.len()
        );
        for &index in &self.indices {
            ensure!(
                (index as usize) < self.positions.len(),
                "index {index} out of bounds for {} vertices",
                self.positions.len()
            );
        }
        for tri in 0..self.triangle_count() {
            ensure!(
                self.face_normal(tri).y > 0.0,
                "triangle {tri} does not face up"
            );
        }
        Ok(())
    }
}
