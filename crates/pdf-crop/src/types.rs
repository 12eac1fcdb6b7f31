use crate::geometry::Size;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CropError {
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Crop rectangle does not overlap page {page}")]
    InvalidRect { page: usize },
    #[error("Page {index} is out of range (document has {count} pages)")]
    PageOutOfRange { index: usize, count: usize },
    #[error("Document has no pages")]
    NoPages,
}

pub type Result<T> = std::result::Result<T, CropError>;

/// Odd/even classification of a page by its 1-based position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Parity {
    /// Pages 1, 3, 5, ... (0-based index 0, 2, 4, ...)
    Odd,
    /// Pages 2, 4, 6, ...
    Even,
}

impl Parity {
    pub fn of(index: usize) -> Self {
        if index % 2 == 0 {
            Parity::Odd
        } else {
            Parity::Even
        }
    }
}

/// Which pages take part in an overlay composite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageSubset {
    All,
    Odd,
    Even,
}

impl PageSubset {
    pub fn contains(self, index: usize) -> bool {
        match self {
            PageSubset::All => true,
            PageSubset::Odd => Parity::of(index) == Parity::Odd,
            PageSubset::Even => Parity::of(index) == Parity::Even,
        }
    }
}

/// The crop rectangle a gesture or page is addressed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    All,
    Odd,
    Even,
}

impl From<Parity> for Scope {
    fn from(parity: Parity) -> Self {
        match parity {
            Parity::Odd => Scope::Odd,
            Parity::Even => Scope::Even,
        }
    }
}

/// What the central area is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ViewMode {
    /// One overlay of every page, one crop rectangle
    All,
    /// Odd and even overlays side by side, one rectangle each
    #[default]
    Split,
    /// Only the odd-page overlay
    OddOnly,
    /// Only the even-page overlay
    EvenOnly,
    /// A single page rendered on its own
    SinglePreview(usize),
}

impl ViewMode {
    /// Whether rectangles are kept per parity rather than one for all pages
    pub fn is_parity(self) -> bool {
        matches!(self, ViewMode::Split | ViewMode::OddOnly | ViewMode::EvenOnly)
    }

    pub fn is_preview(self) -> bool {
        matches!(self, ViewMode::SinglePreview(_))
    }
}

/// The image a view pane displays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaneSource {
    Composite(PageSubset),
    Page(usize),
}

/// A pane of the central area: what it shows and which rectangle it edits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pane {
    pub source: PaneSource,
    pub scope: Scope,
}

/// Per-page state tracked by the page set
#[derive(Debug, Clone, PartialEq)]
pub struct PageInfo {
    /// 0-based position in the document
    pub index: usize,
    /// Visual page size in points (after `/Rotate`)
    pub size: Size,
    /// Page rotation in degrees (0, 90, 180 or 270)
    pub rotation: i64,
    /// Marked for removal by the next deletion
    pub marked_for_deletion: bool,
}

impl PageInfo {
    pub fn new(index: usize, size: Size, rotation: i64) -> Self {
        Self {
            index,
            size,
            rotation,
            marked_for_deletion: false,
        }
    }

    pub fn parity(&self) -> Parity {
        Parity::of(self.index)
    }
}

/// A rectangle in PDF user space (origin bottom-left, y up)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PdfBox {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl PdfBox {
    /// Build a box from two corners in any order
    pub fn new(xa: f64, ya: f64, xb: f64, yb: f64) -> Self {
        Self {
            x0: xa.min(xb),
            y0: ya.min(yb),
            x1: xa.max(xb),
            y1: ya.max(yb),
        }
    }

    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }

    pub fn is_degenerate(&self) -> bool {
        self.width() <= f64::EPSILON || self.height() <= f64::EPSILON
    }
}
