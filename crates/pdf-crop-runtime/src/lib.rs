use std::path::PathBuf;

// Re-export types from the library crate
pub use pdf_crop::{Opacity, PageInfo, PaneSource, SaveOptions, ScopedRects};

/// Commands sent from UI to worker
#[derive(Debug)]
pub enum CropCommand {
    Load {
        path: PathBuf,
    },
    /// Build the image for one pane; only the newest queued request is served
    ComposeOverlay {
        doc_id: DocumentId,
        source: PaneSource,
        /// Pages taking part in a composite, ignored for single pages
        pages: Vec<usize>,
        opacity: Opacity,
    },
    ApplyCrop {
        doc_id: DocumentId,
        rects: ScopedRects,
        /// Pages marked for deletion, left uncropped
        skip: Vec<usize>,
    },
    ResetCrop {
        doc_id: DocumentId,
    },
    DeletePages {
        doc_id: DocumentId,
        indices: Vec<usize>,
    },
    Save {
        doc_id: DocumentId,
        path: PathBuf,
        options: SaveOptions,
    },
    ExportPreset {
        rects: ScopedRects,
        /// Preview pixels per point the rectangles were drawn at
        zoom: f64,
        path: PathBuf,
    },
    Close {
        doc_id: DocumentId,
    },
}

/// Updates sent from worker to UI
#[derive(Debug, Clone)]
pub enum CropUpdate {
    Progress {
        operation: String,
        current: usize,
        total: usize,
    },
    Loaded {
        doc_id: DocumentId,
        path: PathBuf,
        pages: Vec<PageInfo>,
    },
    PageRendered {
        doc_id: DocumentId,
        page_index: usize,
        thumbnail: Bitmap,
    },
    /// Every page has been rasterized; `canvas` is the shared overlay size
    RenderComplete {
        doc_id: DocumentId,
        canvas: (u32, u32),
    },
    OverlayComposed {
        doc_id: DocumentId,
        source: PaneSource,
        image: Bitmap,
    },
    Cropped {
        doc_id: DocumentId,
        page_count: usize,
    },
    CropReset {
        doc_id: DocumentId,
    },
    PagesDeleted {
        doc_id: DocumentId,
        removed: Vec<usize>,
    },
    Saved {
        path: PathBuf,
    },
    PresetExported {
        path: PathBuf,
    },
    Closed {
        doc_id: DocumentId,
    },
    Error {
        message: String,
    },
}

/// RGBA pixels ready to upload as a texture
#[derive(Clone)]
pub struct Bitmap {
    pub width: usize,
    pub height: usize,
    pub rgba_data: Vec<u8>,
}

impl std::fmt::Debug for Bitmap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bitmap")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

/// Handle to a loaded document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DocumentId(pub u64);
