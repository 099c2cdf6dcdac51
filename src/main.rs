//! Binary entry point: exports the preset ground plane with fixed inputs.

use std::path::Path;
use std::process::ExitCode;

use ground_gen::{GroundPlane, export_ground_glb};

/// Source texture, relative to the working directory.
const TEXTURE_PATH: &str = "assets/textures/grass.png";
/// Output container; missing parent directories are created.
const OUTPUT_PATH: &str = "assets/models/ground.glb";

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let plane = GroundPlane::default();
    log::info!(
        "generating {}x{} m ground plane, texture tiled {}x per axis",
        plane.size_meters,
        plane.size_meters,
        plane.tile_count
    );
    match export_ground_glb(&plane, Path::new(TEXTURE_PATH), Path::new(OUTPUT_PATH)) {
        Ok(()) => {
            println!("Ground GLB exported to {OUTPUT_PATH}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("Failed to generate GLB: {err:#}");
            ExitCode::FAILURE
        }
    }
}
