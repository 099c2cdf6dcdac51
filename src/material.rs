//! Surface appearance bound to the exported ground mesh.

/// Metallic-roughness description of the ground surface.
///
/// The defaults are the ground contract: white base color so the texture
/// shows unmodified, non-metallic, fully rough, opaque and rendered on both
/// faces. Converted to container metadata at export time.
#[derive(Clone, Debug, PartialEq)]
pub struct GroundMaterial {
    pub name: String,
    /// Multiplied with the base color texture, `[r, g, b, a]`.
    pub base_color_factor: [f32; 4],
    pub metallic_factor: f32,
    pub roughness_factor: f32,
    pub double_sided: bool,
}

impl Default for GroundMaterial {
    fn default() -> Self {
        Self {
            name: "GroundMaterial".to_string(),
            base_color_factor: [1.0, 1.0, 1.0, 1.0],
            metallic_factor: 0.0,
            roughness_factor: 1.0,
            double_sided: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_describe_an_untinted_rough_surface() {
        let material = GroundMaterial::default();
        assert_eq!(material.base_color_factor, [1.0, 1.0, 1.0, 1.0]);
        assert_eq!(material.metallic_factor, 0.0);
        assert_eq!(material.roughness_factor, 1.0);
        assert!(material.double_sided);
    }
}
