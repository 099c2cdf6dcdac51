//! Texture decoding and the lossless copy embedded in the container.

use std::io::Cursor;
use std::path::Path;

use anyhow::{Context, Result};
use image::{DynamicImage, ImageFormat, RgbaImage};

/// Decoded RGBA8 texture together with the PNG bytes embedded in the output.
///
/// The pixel grid is immutable once loaded. Whatever format the source file
/// uses, the embedded copy is always a fresh PNG encoding of the RGBA8 data
/// so the alpha channel survives losslessly.
#[derive(Clone, Debug)]
pub struct TextureData {
    pub rgba: RgbaImage,
    pub png: Vec<u8>,
}

impl TextureData {
    /// MIME type of the embedded encoding.
    pub const MIME_TYPE: &'static str = "image/png";

    /// Decode the image at `path` and re-encode it for embedding.
    pub fn load(path: &Path) -> Result<Self> {
        let img = image::open(path)
            .with_context(|| format!("failed to decode texture {}", path.display()))?;
        let data = Self::from_image(img)?;
        log::info!(
            "loaded texture {} ({}x{}, {} byte png)",
            path.display(),
            data.width(),
            data.height(),
            data.png.len()
        );
        Ok(data)
    }

    /// Convert an already decoded image to RGBA8 and encode the PNG copy.
    pub fn from_image(img: DynamicImage) -> Result<Self> {
        let rgba = img.to_rgba8();
        let mut png = Vec::new();
        rgba.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .context("failed to encode texture as png")?;
        Ok(Self { rgba, png })
    }

    pub fn width(&self) -> u32 {
        self.rgba.width()
    }

    pub fn height(&self) -> u32 {
        self.rgba.height()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn gradient(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_fn(width, height, |x, y| {
            Rgba([(x * 40) as u8, (y * 40) as u8, 128, 255 - (x * 8) as u8])
        })
    }

    #[test]
    fn png_reencode_is_lossless() {
        let source = gradient(6, 4);
        let data = TextureData::from_image(DynamicImage::ImageRgba8(source.clone())).unwrap();
        let decoded = image::load_from_memory_with_format(&data.png, ImageFormat::Png)
            .unwrap()
            .to_rgba8();
        assert_eq!(decoded.dimensions(), source.dimensions());
        assert_eq!(decoded.as_raw(), source.as_raw());
    }

    #[test]
    fn alpha_channel_survives_conversion() {
        let source = gradient(4, 4);
        let data = TextureData::from_image(DynamicImage::ImageRgba8(source.clone())).unwrap();
        assert_eq!(data.rgba.get_pixel(3, 0), source.get_pixel(3, 0));
        assert_ne!(data.rgba.get_pixel(3, 0)[3], 255);
    }
}
