//! Image persistence.
//!
//! A sink receives only fully built grids. `PngSink` writes through a temporary
//! file and renames it into place, so a crash never leaves a truncated PNG
//! under the final name.

use crate::manifest::ImageManifest;
use chrono::NaiveDate;
use image::RgbImage;
use pricepix_core::PixelGrid;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Largest output edge in pixels after scaling.
pub const MAX_IMAGE_EDGE: u32 = 4096;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("I/O error writing {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("image encoding failed for {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("manifest serialization failed: {0}")]
    Manifest(#[from] serde_json::Error),

    #[error("invalid output scale {scale} for a {size}x{size} grid")]
    InvalidScale { scale: u32, size: usize },
}

/// Storage key for a date: `YYYY-MM-DD`.
pub fn image_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Durable destination for generated grids.
pub trait ImageSink: Send + Sync {
    /// Persist one grid keyed by its date; returns where it went.
    fn store(
        &self,
        date: NaiveDate,
        grid: &PixelGrid,
        manifest: &ImageManifest,
    ) -> Result<PathBuf, PersistError>;
}

/// Writes `{dir}/{YYYY-MM-DD}.png` and, optionally, a `.json` manifest.
#[derive(Debug, Clone)]
pub struct PngSink {
    dir: PathBuf,
    scale: u32,
    write_manifest: bool,
}

impl PngSink {
    /// Unscaled PNGs with manifests, written under `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            scale: 1,
            write_manifest: true,
        }
    }

    /// Each grid cell becomes a `scale`×`scale` block.
    pub fn with_scale(mut self, scale: u32) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_manifest(mut self, enabled: bool) -> Self {
        self.write_manifest = enabled;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn png_path(&self, date: NaiveDate) -> PathBuf {
        self.dir.join(format!("{}.png", image_key(date)))
    }

    pub fn manifest_path(&self, date: NaiveDate) -> PathBuf {
        self.dir.join(format!("{}.json", image_key(date)))
    }

    /// Render a grid to an RGB image at the configured scale.
    pub fn render(&self, grid: &PixelGrid) -> Result<RgbImage, PersistError> {
        let size = grid.size().get();
        let invalid = || PersistError::InvalidScale {
            scale: self.scale,
            size,
        };
        let edge = u32::try_from(size).map_err(|_| invalid())?;
        let scaled = edge
            .checked_mul(self.scale)
            .filter(|e| (1..=MAX_IMAGE_EDGE).contains(e))
            .ok_or_else(invalid)?;

        let base = RgbImage::from_raw(edge, edge, grid.to_rgb_bytes()).ok_or_else(invalid)?;
        if self.scale == 1 {
            return Ok(base);
        }
        let scale = self.scale;
        Ok(RgbImage::from_fn(scaled, scaled, |x, y| {
            *base.get_pixel(x / scale, y / scale)
        }))
    }

    fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> PersistError + '_ {
        move |source| PersistError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl ImageSink for PngSink {
    fn store(
        &self,
        date: NaiveDate,
        grid: &PixelGrid,
        manifest: &ImageManifest,
    ) -> Result<PathBuf, PersistError> {
        let image = self.render(grid)?;
        std::fs::create_dir_all(&self.dir).map_err(Self::io_err(&self.dir))?;

        let path = self.png_path(date);
        let tmp = path.with_extension("png.tmp");
        image
            .save_with_format(&tmp, image::ImageFormat::Png)
            .map_err(|source| PersistError::Image {
                path: tmp.clone(),
                source,
            })?;
        std::fs::rename(&tmp, &path).map_err(Self::io_err(&path))?;

        if self.write_manifest {
            let manifest_path = self.manifest_path(date);
            std::fs::write(&manifest_path, manifest.to_json()?)
                .map_err(Self::io_err(&manifest_path))?;
        }

        tracing::debug!(path = %path.display(), "image written");
        Ok(path)
    }
}
