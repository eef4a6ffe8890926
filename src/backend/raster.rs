//! [`ImageBackend`] on top of the `image` crate.

use std::path::Path;

use atlas_meta::ColorKey;
use image::imageops::{self, FilterType};
use image::RgbaImage;

use super::{BackendError, ImageBackend};
use crate::sheet::Rect;

/// RGBA pixels plus the per-surface state set by the loader.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterSurface {
    pixels: RgbaImage,
    has_alpha: bool,
    global_alpha: Option<u8>,
    colorkey: Option<ColorKey>,
}

impl RasterSurface {
    pub fn from_rgba(pixels: RgbaImage) -> Self {
        Self {
            pixels,
            has_alpha: true,
            global_alpha: None,
            colorkey: None,
        }
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn has_alpha(&self) -> bool {
        self.has_alpha
    }

    pub fn global_alpha(&self) -> Option<u8> {
        self.global_alpha
    }

    pub fn colorkey(&self) -> Option<ColorKey> {
        self.colorkey
    }

    /// Pixels with the colorkey made transparent and the surface alpha
    /// multiplied in.
    pub fn composite(&self) -> RgbaImage {
        let mut out = self.pixels.clone();
        for pixel in out.pixels_mut() {
            if let Some(key) = self.colorkey {
                if pixel.0[..3] == key.rgb() {
                    pixel.0[3] = 0;
                    continue;
                }
            }
            if let Some(alpha) = self.global_alpha {
                pixel.0[3] = ((pixel.0[3] as u16 * alpha as u16) / 255) as u8;
            }
        }
        out
    }

    fn with_pixels(&self, pixels: RgbaImage) -> Self {
        Self {
            pixels,
            has_alpha: self.has_alpha,
            global_alpha: self.global_alpha,
            colorkey: self.colorkey,
        }
    }
}

/// Backend that decodes files with the `image` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct RasterBackend;

fn filter(smooth: bool) -> FilterType {
    if smooth {
        FilterType::Triangle
    } else {
        FilterType::Nearest
    }
}

impl ImageBackend for RasterBackend {
    type Surface = RasterSurface;

    fn decode(&self, path: &Path) -> Result<RasterSurface, BackendError> {
        let decoded = image::open(path).map_err(|e| BackendError::Decode {
            path: path.to_path_buf(),
            source: Box::new(e),
        })?;
        Ok(RasterSurface::from_rgba(decoded.to_rgba8()))
    }

    fn convert(&self, surface: &RasterSurface, alpha: bool) -> RasterSurface {
        let mut converted = surface.clone();
        if !alpha {
            for pixel in converted.pixels.pixels_mut() {
                pixel.0[3] = u8::MAX;
            }
        }
        converted.has_alpha = alpha;
        converted
    }

    fn resize(&self, surface: &RasterSurface, size: (u32, u32), smooth: bool) -> RasterSurface {
        // Zero-sized buffers cannot be resampled into.
        let (w, h) = (size.0.max(1), size.1.max(1));
        if surface.pixels.dimensions() == (w, h) {
            return surface.clone();
        }
        surface.with_pixels(imageops::resize(&surface.pixels, w, h, filter(smooth)))
    }

    fn resize_by(
        &self,
        surface: &RasterSurface,
        factors: (f64, f64),
        smooth: bool,
    ) -> RasterSurface {
        let (w, h) = surface.pixels.dimensions();
        let size = ((w as f64 * factors.0) as u32, (h as f64 * factors.1) as u32);
        self.resize(surface, size, smooth)
    }

    fn subregion(&self, surface: &RasterSurface, region: Rect) -> RasterSurface {
        let x = region.x.max(0) as u32;
        let y = region.y.max(0) as u32;
        let cropped = imageops::crop_imm(&surface.pixels, x, y, region.width, region.height);
        surface.with_pixels(cropped.to_image())
    }

    fn set_alpha(&self, surface: &mut RasterSurface, alpha: u8) {
        surface.global_alpha = Some(alpha);
    }

    fn set_colorkey(&self, surface: &mut RasterSurface, key: ColorKey) {
        surface.colorkey = Some(key);
    }

    fn dimensions(&self, surface: &RasterSurface) -> (u32, u32) {
        surface.pixels.dimensions()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn checker() -> RasterSurface {
        let pixels = RgbaImage::from_fn(4, 4, |x, y| {
            if (x + y) % 2 == 0 {
                Rgba([255, 0, 255, 255])
            } else {
                Rgba([10, 20, 30, 100])
            }
        });
        RasterSurface::from_rgba(pixels)
    }

    #[test]
    fn test_convert_without_alpha_is_opaque() {
        let backend = RasterBackend;
        let flat = backend.convert(&checker(), false);
        assert!(!flat.has_alpha());
        assert!(flat.pixels().pixels().all(|p| p.0[3] == 255));
    }

    #[test]
    fn test_subregion_copies_pixels() {
        let backend = RasterBackend;
        let sub = backend.subregion(&checker(), Rect::new(1, 0, 2, 3));
        assert_eq!(sub.pixels().dimensions(), (2, 3));
        assert_eq!(sub.pixels().get_pixel(0, 0), &Rgba([10, 20, 30, 100]));
    }

    #[test]
    fn test_resize_clamps_to_one_pixel() {
        let backend = RasterBackend;
        let out = backend.resize_by(&checker(), (0.1, 0.1), false);
        assert_eq!(backend.dimensions(&out), (1, 1));
    }

    #[test]
    fn test_composite_applies_colorkey_and_alpha() {
        let backend = RasterBackend;
        let mut surface = checker();
        backend.set_colorkey(&mut surface, ColorKey::new(255, 0, 255));
        backend.set_alpha(&mut surface, 51);

        let out = surface.composite();
        assert_eq!(out.get_pixel(0, 0).0[3], 0);
        assert_eq!(out.get_pixel(1, 0).0[3], 20);
    }

    #[test]
    fn test_decode_missing_file() {
        let err = RasterBackend
            .decode(Path::new("/nonexistent/sprite.png"))
            .unwrap_err();
        assert!(err.to_string().contains("sprite.png"));
    }
}
