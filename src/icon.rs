use std::fmt;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use image::{Rgba, RgbaImage};

use crate::config::ConfigError;

/// Decoded RGBA image shared between the builder and the overlay specs.
#[derive(Clone, PartialEq)]
pub struct Icon(Rc<RgbaImage>);

impl Icon {
    pub fn from_image(image: RgbaImage) -> Self {
        Self(Rc::new(image))
    }

    pub fn width(&self) -> u32 {
        self.0.width()
    }

    pub fn height(&self) -> u32 {
        self.0.height()
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.0
    }
}

impl fmt::Debug for Icon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Icon({}x{})", self.width(), self.height())
    }
}

#[derive(Debug, Clone)]
pub enum IconSource {
    Path(PathBuf),
    Image(RgbaImage),
}

impl IconSource {
    pub fn path(path: impl AsRef<Path>) -> Self {
        Self::Path(path.as_ref().to_path_buf())
    }
}

impl From<RgbaImage> for IconSource {
    fn from(image: RgbaImage) -> Self {
        Self::Image(image)
    }
}

pub trait IconResolver {
    fn resolve(&self, source: &IconSource) -> Result<Icon, ConfigError>;
}

/// Decodes icon files from disk with the `image` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileIconResolver;

impl IconResolver for FileIconResolver {
    fn resolve(&self, source: &IconSource) -> Result<Icon, ConfigError> {
        match source {
            IconSource::Path(path) => {
                let decoded = image::open(path).map_err(|source| ConfigError::IconLoad {
                    path: path.clone(),
                    source,
                })?;
                tracing::debug!(?path, "icon decoded");
                Ok(Icon::from_image(decoded.to_rgba8()))
            }
            IconSource::Image(image) => Ok(Icon::from_image(image.clone())),
        }
    }
}

const CLOSE_GLYPH_COLOR: Rgba<u8> = Rgba([255, 255, 255, 255]);
const CLOSE_DISC_COLOR: Rgba<u8> = Rgba([32, 32, 32, 200]);
const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Dark disc with a white cross, used when no close-bubble image is set.
pub fn default_close_icon(size: u32) -> Icon {
    let size = size.max(1);
    let center = (size as f32 - 1.0) / 2.0;
    let radius = size as f32 / 2.0;
    let stroke = (size as f32 / 16.0).max(1.0);
    let arm = radius * 0.45;

    let image = RgbaImage::from_fn(size, size, |x, y| {
        let dx = x as f32 - center;
        let dy = y as f32 - center;
        if dx.hypot(dy) > radius {
            return TRANSPARENT;
        }
        let on_cross = (dx - dy).abs() <= stroke || (dx + dy).abs() <= stroke;
        if on_cross && dx.abs() <= arm && dy.abs() <= arm {
            CLOSE_GLYPH_COLOR
        } else {
            CLOSE_DISC_COLOR
        }
    });
    Icon::from_image(image)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_memory_image_resolves_without_io() {
        let image = RgbaImage::from_pixel(4, 3, Rgba([1, 2, 3, 4]));
        let icon = FileIconResolver
            .resolve(&IconSource::from(image))
            .expect("in-memory icon should resolve");
        assert_eq!((icon.width(), icon.height()), (4, 3));
        assert_eq!(icon.pixels().get_pixel(0, 0), &Rgba([1, 2, 3, 4]));
    }

    #[test]
    fn missing_file_reports_icon_load_error_with_path() {
        let err = FileIconResolver
            .resolve(&IconSource::path("/nonexistent/floating-bubble/icon.png"))
            .expect_err("missing file should fail");
        assert!(matches!(
            err,
            ConfigError::IconLoad { ref path, .. }
                if path == Path::new("/nonexistent/floating-bubble/icon.png")
        ));
    }

    #[test]
    fn default_close_icon_draws_cross_on_transparent_corners() {
        let icon = default_close_icon(64);
        assert_eq!((icon.width(), icon.height()), (64, 64));
        assert_eq!(icon.pixels().get_pixel(0, 0), &TRANSPARENT);
        assert_eq!(icon.pixels().get_pixel(32, 32), &CLOSE_GLYPH_COLOR);
        assert_eq!(icon.pixels().get_pixel(32, 12), &CLOSE_DISC_COLOR);
    }
}
