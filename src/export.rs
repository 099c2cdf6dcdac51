//! GLB document assembly and writing.
//!
//! Packs the plane mesh, the embedded texture and the material into a
//! single-buffer binary glTF container: five buffer views (three vertex
//! attribute views, one index view, one image view), four accessors, a
//! sampler/texture/material chain, one mesh, one node and one default scene.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, ensure};
use gltf::binary;
use gltf::json;
use json::validation::Checked::Valid;
use json::validation::USize64;

use crate::geometry::PlaneMesh;
use crate::material::GroundMaterial;
use crate::texture::TextureData;

/// Parameters of the exported ground plane.
///
/// `Default` supplies the preset-library values: a 400 m square with the
/// texture tiled 10 times per axis.
#[derive(Clone, Debug, PartialEq)]
pub struct GroundPlane {
    /// Side length of the square plane in meters.
    pub size_meters: f32,
    /// How many times the texture repeats across each axis.
    pub tile_count: f32,
    pub material: GroundMaterial,
}

impl Default for GroundPlane {
    fn default() -> Self {
        Self {
            size_meters: 400.0,
            tile_count: 10.0,
            material: GroundMaterial::default(),
        }
    }
}

/// Written to the asset header of every produced container.
const GENERATOR: &str = concat!("ground-gen ", env!("CARGO_PKG_VERSION"));
const MESH_NAME: &str = "GroundPlane";

// Binary glTF framing: a 12 byte file header, then an 8 byte header per chunk.
const GLB_HEADER_LEN: usize = 12;
const CHUNK_HEADER_LEN: usize = 8;

/// Export `plane` with the texture at `texture_path` as a GLB at
/// `output_path`, creating missing parent directories.
///
/// Fails before any work if the texture file does not exist; no output is
/// produced on any failure path.
pub fn export_ground_glb(
    plane: &GroundPlane,
    texture_path: &Path,
    output_path: &Path,
) -> Result<()> {
    ensure!(
        texture_path.is_file(),
        "texture not found: {}",
        texture_path.display()
    );

    let mesh = PlaneMesh::ground(plane.size_meters, plane.tile_count)?;
    let texture = TextureData::load(texture_path)?;
    let glb = build_glb(&mesh, &texture, &plane.material)?;

    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory {}", parent.display()))?;
    }
    let file = fs::File::create(output_path)
        .with_context(|| format!("failed to create {}", output_path.display()))?;
    glb.to_writer(file)
        .with_context(|| format!("failed to write {}", output_path.display()))?;

    log::info!("wrote ground plane glb to {}", output_path.display());
    Ok(())
}

/// Assemble the complete container in memory.
///
/// The binary buffer holds positions, normals, UVs, indices and the PNG
/// bytes back to back, each region 4-byte aligned so every accessor offset
/// stays valid.
pub fn build_glb(
    mesh: &PlaneMesh,
    texture: &TextureData,
    material: &GroundMaterial,
) -> Result<binary::Glb<'static>> {
    mesh.validate()?;

    let mut bin: Vec<u8> = Vec::new();
    let positions = push_region(&mut bin, bytemuck::cast_slice(&mesh.positions));
    let normals = push_region(&mut bin, bytemuck::cast_slice(&mesh.normals));
    let uvs = push_region(&mut bin, bytemuck::cast_slice(&mesh.uvs));
    let indices = push_region(&mut bin, bytemuck::cast_slice(&mesh.indices));
    let image = push_region(&mut bin, &texture.png);
    pad_to_four(&mut bin);
    log::debug!(
        "glb buffer: {} geometry bytes, {} image bytes",
        image.offset,
        image.len
    );

    let mut root = json::Root {
        asset: json::Asset {
            generator: Some(GENERATOR.to_string()),
            ..Default::default()
        },
        ..Default::default()
    };

    let buffer = root.push(json::Buffer {
        byte_length: USize64::from(bin.len()),
        extensions: Default::default(),
        extras: Default::default(),
        name: None,
        uri: None,
    });
    let positions_view = push_view(
        &mut root,
        buffer,
        &positions,
        Some(json::buffer::Target::ArrayBuffer),
    );
    let normals_view = push_view(
        &mut root,
        buffer,
        &normals,
        Some(json::buffer::Target::ArrayBuffer),
    );
    let uvs_view = push_view(
        &mut root,
        buffer,
        &uvs,
        Some(json::buffer::Target::ArrayBuffer),
    );
    let indices_view = push_view(
        &mut root,
        buffer,
        &indices,
        Some(json::buffer::Target::ElementArrayBuffer),
    );
    let image_view = push_view(&mut root, buffer, &image, None);

    let (min, max) = mesh.bounds();
    let positions_accessor = root.push(json::Accessor {
        buffer_view: Some(positions_view),
        byte_offset: Some(USize64(0)),
        count: USize64::from(mesh.positions.len()),
        component_type: Valid(json::accessor::GenericComponentType(
            json::accessor::ComponentType::F32,
        )),
        extensions: Default::default(),
        extras: Default::default(),
        type_: Valid(json::accessor::Type::Vec3),
        min: Some(json::Value::from(Vec::from(min))),
        max: Some(json::Value::from(Vec::from(max))),
        name: None,
        normalized: false,
        sparse: None,
    });
    let normals_accessor = root.push(json::Accessor {
        buffer_view: Some(normals_view),
        byte_offset: Some(USize64(0)),
        count: USize64::from(mesh.normals.len()),
        component_type: Valid(json::accessor::GenericComponentType(
            json::accessor::ComponentType::F32,
        )),
        extensions: Default::default(),
        extras: Default::default(),
        type_: Valid(json::accessor::Type::Vec3),
        min: None,
        max: None,
        name: None,
        normalized: false,
        sparse: None,
    });
    let uvs_accessor = root.push(json::Accessor {
        buffer_view: Some(uvs_view),
        byte_offset: Some(USize64(0)),
        count: USize64::from(mesh.uvs.len()),
        component_type: Valid(json::accessor::GenericComponentType(
            json::accessor::ComponentType::F32,
        )),
        extensions: Default::default(),
        extras: Default::default(),
        type_: Valid(json::accessor::Type::Vec2),
        min: None,
        max: None,
        name: None,
        normalized: false,
        sparse: None,
    });
    let indices_accessor = root.push(json::Accessor {
        buffer_view: Some(indices_view),
        byte_offset: Some(USize64(0)),
        count: USize64::from(mesh.indices.len()),
        component_type: Valid(json::accessor::GenericComponentType(
            json::accessor::ComponentType::U16,
        )),
        extensions: Default::default(),
        extras: Default::default(),
        type_: Valid(json::accessor::Type::Scalar),
        min: None,
        max: None,
        name: None,
        normalized: false,
        sparse: None,
    });

    let image_index = root.push(json::Image {
        buffer_view: Some(image_view),
        mime_type: Some(json::image::MimeType(TextureData::MIME_TYPE.to_string())),
        name: None,
        uri: None,
        extensions: Default::default(),
        extras: Default::default(),
    });
    let sampler = root.push(json::texture::Sampler {
        mag_filter: Some(Valid(json::texture::MagFilter::Linear)),
        min_filter: Some(Valid(json::texture::MinFilter::LinearMipmapLinear)),
        name: None,
        wrap_s: Valid(json::texture::WrappingMode::Repeat),
        wrap_t: Valid(json::texture::WrappingMode::Repeat),
        extensions: Default::default(),
        extras: Default::default(),
    });
    let texture_index = root.push(json::Texture {
        name: None,
        sampler: Some(sampler),
        source: image_index,
        extensions: Default::default(),
        extras: Default::default(),
    });
    let material_index = root.push(json::Material {
        name: Some(material.name.clone()),
        alpha_mode: Valid(json::material::AlphaMode::Opaque),
        double_sided: material.double_sided,
        pbr_metallic_roughness: json::material::PbrMetallicRoughness {
            base_color_factor: json::material::PbrBaseColorFactor(material.base_color_factor),
            base_color_texture: Some(json::texture::Info {
                index: texture_index,
                tex_coord: 0,
                extensions: Default::default(),
                extras: Default::default(),
            }),
            metallic_factor: json::material::StrengthFactor(material.metallic_factor),
            roughness_factor: json::material::StrengthFactor(material.roughness_factor),
            ..Default::default()
        },
        ..Default::default()
    });

    let primitive = json::mesh::Primitive {
        attributes: {
            let mut attributes = BTreeMap::new();
            attributes.insert(Valid(json::mesh::Semantic::Positions), positions_accessor);
            attributes.insert(Valid(json::mesh::Semantic::Normals), normals_accessor);
            attributes.insert(Valid(json::mesh::Semantic::TexCoords(0)), uvs_accessor);
            attributes
        },
        extensions: Default::default(),
        extras: Default::default(),
        indices: Some(indices_accessor),
        material: Some(material_index),
        mode: Valid(json::mesh::Mode::Triangles),
        targets: None,
    };
    let mesh_index = root.push(json::Mesh {
        extensions: Default::default(),
        extras: Default::default(),
        name: Some(MESH_NAME.to_string()),
        primitives: vec![primitive],
        weights: None,
    });
    let node = root.push(json::Node {
        mesh: Some(mesh_index),
        ..Default::default()
    });
    let scene = root.push(json::Scene {
        extensions: Default::default(),
        extras: Default::default(),
        name: None,
        nodes: vec![node],
    });
    root.scene = Some(scene);

    let json_string =
        json::serialize::to_string(&root).context("failed to serialize scene json")?;
    let mut json_len = json_string.len();
    // The json chunk is space-padded to a four byte boundary when written.
    while json_len % 4 != 0 {
        json_len += 1;
    }
    let total_len = GLB_HEADER_LEN + 2 * CHUNK_HEADER_LEN + json_len + bin.len();

    Ok(binary::Glb {
        header: binary::Header {
            magic: *b"glTF",
            version: 2,
            length: total_len
                .try_into()
                .context("container exceeds the binary glTF size limit")?,
        },
        json: Cow::Owned(json_string.into_bytes()),
        bin: Some(Cow::Owned(bin)),
    })
}

/// A contiguous byte range inside the single container buffer.
struct Region {
    offset: usize,
    len: usize,
}

fn push_region(bin: &mut Vec<u8>, bytes: &[u8]) -> Region {
    // Accessor regions must start on a four byte boundary.
    pad_to_four(bin);
    let offset = bin.len();
    bin.extend_from_slice(bytes);
    Region {
        offset,
        len: bytes.len(),
    }
}

fn pad_to_four(bin: &mut Vec<u8>) {
    while bin.len() % 4 != 0 {
        bin.push(0);
    }
}

fn push_view(
    root: &mut json::Root,
    buffer: json::Index<json::Buffer>,
    region: &Region,
    target: Option<json::buffer::Target>,
) -> json::Index<json::buffer::View> {
    root.push(json::buffer::View {
        buffer,
        byte_length: USize64::from(region.len),
        byte_offset: Some(USize64::from(region.offset)),
        byte_stride: None,
        extensions: Default::default(),
        extras: Default::default(),
        name: None,
        target: target.map(Valid),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, Rgba, RgbaImage};

    fn small_texture() -> TextureData {
        let img = RgbaImage::from_pixel(2, 2, Rgba([10, 120, 40, 255]));
        TextureData::from_image(DynamicImage::ImageRgba8(img)).unwrap()
    }

    #[test]
    fn default_plane_uses_the_preset_constants() {
        let plane = GroundPlane::default();
        assert_eq!(plane.size_meters, 400.0);
        assert_eq!(plane.tile_count, 10.0);
        assert_eq!(plane.material, GroundMaterial::default());
    }

    #[test]
    fn regions_start_on_four_byte_boundaries() {
        let mut bin = Vec::new();
        let first = push_region(&mut bin, &[1, 2, 3]);
        let second = push_region(&mut bin, &[4, 5, 6, 7, 8]);
        assert_eq!((first.offset, first.len), (0, 3));
        assert_eq!((second.offset, second.len), (4, 5));
    }

    #[test]
    fn container_references_every_region() {
        let mesh = PlaneMesh::ground(10.0, 2.0).unwrap();
        let texture = small_texture();
        let glb = build_glb(&mesh, &texture, &GroundMaterial::default()).unwrap();

        let root: json::Root = json::deserialize::from_slice(&glb.json).unwrap();
        assert_eq!(root.buffers.len(), 1);
        assert_eq!(root.buffer_views.len(), 5);
        assert_eq!(root.accessors.len(), 4);
        assert_eq!(root.images.len(), 1);
        assert_eq!(root.samplers.len(), 1);
        assert_eq!(root.textures.len(), 1);
        assert_eq!(root.materials.len(), 1);
        assert_eq!(root.meshes.len(), 1);
        assert_eq!(root.nodes.len(), 1);
        assert_eq!(root.scenes.len(), 1);
        assert!(root.scene.is_some());
        assert_eq!(root.asset.version, "2.0");

        let bin = glb.bin.as_deref().unwrap();
        assert_eq!(bin.len() % 4, 0);
        assert_eq!(root.buffers[0].byte_length.0 as usize, bin.len());
    }

    #[test]
    fn header_length_covers_both_chunks() {
        let mesh = PlaneMesh::ground(10.0, 2.0).unwrap();
        let glb = build_glb(&mesh, &small_texture(), &GroundMaterial::default()).unwrap();

        let padded_json = glb.json.len().div_ceil(4) * 4;
        let expected =
            GLB_HEADER_LEN + 2 * CHUNK_HEADER_LEN + padded_json + glb.bin.as_deref().unwrap().len();
        assert_eq!(glb.header.length as usize, expected);
    }

    #[test]
    fn inconsistent_meshes_are_rejected() {
        let mut mesh = PlaneMesh::ground(10.0, 2.0).unwrap();
        mesh.normals.pop();
        assert!(build_glb(&mesh, &small_texture(), &GroundMaterial::default()).is_err());
    }
}
