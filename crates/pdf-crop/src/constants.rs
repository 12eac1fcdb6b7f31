//! Shared constants for overlay cropping
//!
//! This module centralizes magic numbers used by the compositor, the
//! rectangle editor and the view transform.

// =============================================================================
// Rasterization
// =============================================================================

/// Pixels per PDF point used when rasterizing pages for the overlay
pub const RENDER_ZOOM: f64 = 1.5;

/// Thumbnail bounding box in pixels (width, height)
pub const THUMBNAIL_SIZE: (u32, u32) = (80, 120);

// =============================================================================
// Overlay
// =============================================================================

/// Per-layer alpha for layered compositing (every page after the first)
pub const LAYER_ALPHA: f32 = 0.2;

// =============================================================================
// Rectangle editing
// =============================================================================

/// Distance from an edge, in view pixels, that still grabs the edge
pub const HANDLE_MARGIN_PX: f64 = 4.0;

/// Smallest width/height, in page units, a committed rectangle may have
pub const MIN_EXTENT: f64 = 1.0;

// =============================================================================
// View transform
// =============================================================================

/// Zoom factor applied per mouse-wheel notch
pub const WHEEL_ZOOM_STEP: f64 = 1.15;

/// Lower zoom limit
pub const MIN_ZOOM: f64 = 0.02;

/// Upper zoom limit
pub const MAX_ZOOM: f64 = 64.0;
