use crate::compositor::Opacity;
use crate::constants::{LAYER_ALPHA, RENDER_ZOOM};
use crate::types::*;
use std::path::{Path, PathBuf};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How a document is written to disk
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SaveOptions {
    /// Skip stream compression for a faster write and a larger file
    pub fast_save: bool,
}

impl Default for SaveOptions {
    fn default() -> Self {
        Self { fast_save: true }
    }
}

/// Rasterization settings for previews
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RenderOptions {
    /// Pixels per PDF point
    pub zoom: f64,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { zoom: RENDER_ZOOM }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OverlayOptions {
    pub opacity: Opacity,
}

impl OverlayOptions {
    /// Front-to-back blending with the classic per-layer alpha
    pub fn layered() -> Self {
        Self {
            opacity: Opacity::Layered(LAYER_ALPHA),
        }
    }
}

/// Everything a session can be configured with
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CropOptions {
    pub save: SaveOptions,
    pub render: RenderOptions,
    pub overlay: OverlayOptions,
    /// Copy the size of a committed odd/even rectangle to the other parity
    pub link_parity_sizes: bool,
}

impl CropOptions {
    /// Load options from JSON file
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let options = serde_json::from_slice(&bytes)
            .map_err(|e| CropError::Config(format!("Failed to parse config: {}", e)))?;
        Ok(options)
    }

    /// Save options to JSON file
    #[cfg(feature = "serde")]
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| CropError::Config(format!("Failed to serialize config: {}", e)))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.render.zoom.is_finite() && self.render.zoom > 0.0) {
            return Err(CropError::Config(format!(
                "Render zoom must be positive, got {}",
                self.render.zoom
            )));
        }
        match self.overlay.opacity {
            Opacity::Layered(alpha) if !(0.0..=1.0).contains(&alpha) => {
                return Err(CropError::Config(format!(
                    "Layer alpha must be between 0 and 1, got {}",
                    alpha
                )));
            }
            _ => {}
        }
        Ok(())
    }
}

/// Where the document goes on save, from `--save-to` / `--save-as`
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SaveTarget {
    pub save_to: Option<PathBuf>,
    pub save_as: Option<String>,
}

impl SaveTarget {
    pub fn new(save_to: Option<PathBuf>, save_as: Option<String>) -> Self {
        Self { save_to, save_as }
    }

    /// Whether saving can skip the file dialog
    pub fn is_set(&self) -> bool {
        self.save_to.is_some() || self.save_as.is_some()
    }

    /// `save_to` must name an existing directory
    pub fn validate(&self) -> Result<()> {
        match &self.save_to {
            Some(dir) if !dir.is_dir() => Err(CropError::Config(format!(
                "Save directory '{}' does not exist or is not a directory",
                dir.display()
            ))),
            _ => Ok(()),
        }
    }

    /// Output path for a document loaded from `source`, or `None` when the
    /// user should be asked
    pub fn resolve(&self, source: &Path) -> Option<PathBuf> {
        if !self.is_set() {
            return None;
        }
        let dir = self
            .save_to
            .clone()
            .or_else(|| source.parent().map(Path::to_path_buf))
            .unwrap_or_default();
        let name = self
            .save_as
            .clone()
            .unwrap_or_else(|| default_file_name(source));
        Some(dir.join(name))
    }
}

/// `<stem>_modified.pdf`
pub fn default_file_name(source: &Path) -> String {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string());
    format!("{}_modified.pdf", stem)
}
