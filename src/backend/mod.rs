//! The image collaborator.
//!
//! Decoding, pixel conversion and resampling live behind [`ImageBackend`];
//! the loader only decides which operations to run and in what order.

mod raster;

pub use raster::{RasterBackend, RasterSurface};

use std::path::{Path, PathBuf};

use atlas_meta::{ColorKey, Settings};

use crate::sheet::Rect;

/// Errors reported by an image backend.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("Failed to decode '{path}': {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },
}

/// Operations the loader needs from a 2D image library.
pub trait ImageBackend {
    type Surface: Clone;

    fn decode(&self, path: &Path) -> Result<Self::Surface, BackendError>;

    /// Convert to a surface with (`alpha = true`) or without per-pixel alpha.
    fn convert(&self, surface: &Self::Surface, alpha: bool) -> Self::Surface;

    fn resize(&self, surface: &Self::Surface, size: (u32, u32), smooth: bool) -> Self::Surface;

    fn resize_by(&self, surface: &Self::Surface, factors: (f64, f64), smooth: bool)
        -> Self::Surface;

    /// Copy out `region`, which lies within the surface.
    fn subregion(&self, surface: &Self::Surface, region: Rect) -> Self::Surface;

    fn set_alpha(&self, surface: &mut Self::Surface, alpha: u8);

    fn set_colorkey(&self, surface: &mut Self::Surface, key: ColorKey);

    fn dimensions(&self, surface: &Self::Surface) -> (u32, u32);
}

/// Decode `path` and convert it according to the `alpha` setting.
pub fn decode_raw<B: ImageBackend>(
    backend: &B,
    path: &Path,
    settings: &Settings,
) -> Result<B::Surface, BackendError> {
    let decoded = backend.decode(path)?;
    Ok(backend.convert(&decoded, settings.alpha_or_default()))
}

/// Apply resize, alpha and colorkey settings to `surface`.
///
/// Resizes run in order: `size`, then `scale`, then `unit_size`.
pub fn render<B: ImageBackend>(
    backend: &B,
    mut surface: B::Surface,
    settings: &Settings,
    unit: f64,
) -> B::Surface {
    let smooth = settings.smoothscale_or_default();

    if let Some(size) = settings.size {
        surface = backend.resize(&surface, size, smooth);
    }
    if let Some(scale) = settings.scale {
        surface = backend.resize_by(&surface, scale.factors(), smooth);
    }
    if let Some((w, h)) = settings.unit_size {
        let size = ((unit * w) as u32, (unit * h) as u32);
        surface = backend.resize(&surface, size, smooth);
    }

    if let Some(alpha) = settings.global_alpha {
        backend.set_alpha(&mut surface, alpha);
    }
    if let Some(key) = settings.colorkey {
        backend.set_colorkey(&mut surface, key);
    }
    surface
}
