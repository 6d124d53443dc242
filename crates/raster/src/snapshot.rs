//! PNG snapshots of a rendered frame.
//!
//! Feature-gated behind `png` (default on) so consumers that only need the
//! pixel buffer do not pull in the `image` crate.

use std::path::Path;
use terrain_mesh_core::{EngineError, Rgba, Simulation};

use crate::pixel::{frame_size, frame_to_rgba};

/// Rasterizes the current frame and writes it as a PNG.
///
/// Returns `EngineError::InvalidDimensions` if the frame does not fit `u32`
/// pixel dimensions, or `EngineError::Io` on encode or write failure.
pub fn write_png(sim: &Simulation, background: Rgba, path: &Path) -> Result<(), EngineError> {
    let (width, height) = frame_size(sim);
    let w = u32::try_from(width).map_err(|_| EngineError::InvalidDimensions)?;
    let h = u32::try_from(height).map_err(|_| EngineError::InvalidDimensions)?;
    let rgba = frame_to_rgba(sim, background);
    let img = image::RgbaImage::from_raw(w, h, rgba)
        .ok_or_else(|| EngineError::Io("RGBA buffer size mismatch".into()))?;
    img.save(path).map_err(|e| EngineError::Io(e.to_string()))?;
    log::debug!("wrote {w}x{h} snapshot to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use terrain_mesh_core::PointerState;

    #[test]
    fn write_png_round_trip() {
        let mut sim = Simulation::new(32.0, 24.0, 40, 3);
        sim.step(1.0, 1.0, PointerState::disabled());
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.png");

        write_png(&sim, Rgba::BLACK, &path).unwrap();

        let img = image::open(&path).unwrap().to_rgba8();
        assert_eq!(img.width(), 32);
        assert_eq!(img.height(), 24);
        assert_eq!(img.into_raw(), frame_to_rgba(&sim, Rgba::BLACK));
    }

    #[test]
    fn write_png_into_missing_directory_is_io_error() {
        let sim = Simulation::new(8.0, 8.0, 5, 1);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no").join("such").join("frame.png");
        assert!(matches!(
            write_png(&sim, Rgba::BLACK, &path),
            Err(EngineError::Io(_))
        ));
    }
}
