use std::fs;
use std::path::{Path, PathBuf};

use image::{Rgba, RgbaImage};

/// Returns a fresh per-test directory under the cargo target tmp dir.
pub(crate) fn scratch_dir(name: &str) -> PathBuf {
    let dir = Path::new(env!("CARGO_TARGET_TMPDIR")).join(name);
    if dir.exists() {
        fs::remove_dir_all(&dir).expect("stale scratch dir could not be removed");
    }
    fs::create_dir_all(&dir).expect("scratch dir could not be created");
    dir
}

/// Writes an 8x8 gradient PNG to `path` and returns the pixels it encodes.
pub(crate) fn write_test_texture(path: &Path) -> RgbaImage {
    let texture = RgbaImage::from_fn(8, 8, |x, y| {
        Rgba([(x * 32) as u8, (y * 32) as u8, 128, 255])
    });
    texture.save(path).expect("test texture could not be written");
    texture
}
