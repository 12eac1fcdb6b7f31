pub mod apply;
pub mod compositor;
pub mod constants;
pub mod editor;
pub mod geometry;
pub mod io;
mod options;
pub mod pages;
pub mod preset;
mod types;

pub use apply::{CropPlan, PageGeometry, apply_crop, apply_crop_sync, crop_boxes, page_geometry};
pub use compositor::{Opacity, canvas_size, compose, compose_on, select_pages};
pub use editor::{CropSelection, EditOutcome, Gesture, Handle, Hit, RectEditor, ScopedRects};
pub use geometry::{CropRect, Point, Size, Transform};
pub use io::{delete_pages, document_bytes, load_pdf, load_pdf_bytes, page_infos, save_pdf};
pub use options::*;
pub use pages::PageSet;
pub use preset::CropPreset;
pub use types::*;
