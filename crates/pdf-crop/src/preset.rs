//! Reusable crop rectangles stored as JSON.
//!
//! Presets are kept in points measured from each page's top-left corner so
//! they do not depend on the preview zoom they were drawn at.
//!
//! ```json
//! { "scope": "parity", "odd": [36, 36, 576, 756], "even": null }
//! ```

use crate::editor::ScopedRects;

#[cfg(feature = "serde")]
use crate::types::*;
#[cfg(feature = "serde")]
use std::path::Path;

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CropPreset {
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub rects: ScopedRects,
}

impl CropPreset {
    pub fn new(rects: ScopedRects) -> Self {
        Self { rects }
    }

    /// Build a preset from rectangles drawn on previews rendered at `zoom`
    /// pixels per point
    pub fn from_preview(rects: &ScopedRects, zoom: f64) -> Self {
        Self {
            rects: rects.in_points(zoom),
        }
    }

    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| CropError::Config(format!("Failed to parse crop preset: {}", e)))
    }

    #[cfg(feature = "serde")]
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| CropError::Config(format!("Failed to serialize crop preset: {}", e)))
    }

    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let json = String::from_utf8(bytes)
            .map_err(|e| CropError::Config(format!("Crop preset is not UTF-8: {}", e)))?;
        Self::from_json(&json)
    }

    #[cfg(feature = "serde")]
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        tokio::fs::write(path, self.to_json()?).await?;
        Ok(())
    }
}
