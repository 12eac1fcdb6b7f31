use eframe::egui;
use pdf_crop::{CropSelection, PageInfo, PageSet, PaneSource, Size, Transform};
use pdf_crop_runtime::{Bitmap, DocumentId};
use std::collections::HashMap;
use std::path::PathBuf;

/// A central-area pane: the texture it shows and how it is panned and zoomed
pub struct PaneView {
    pub texture: Option<egui::TextureHandle>,
    pub transform: Transform,
    /// Set once the transform has been fitted to the available space
    pub fitted: bool,
}

impl PaneView {
    pub fn new() -> Self {
        Self {
            texture: None,
            transform: Transform::default(),
            fitted: false,
        }
    }

    pub fn content_size(&self) -> Option<Size> {
        self.texture.as_ref().map(|t| {
            let [w, h] = t.size();
            Size::new(w as f64, h as f64)
        })
    }
}

/// UI-side state of the open document
pub struct OpenDocument {
    pub doc_id: DocumentId,
    pub path: PathBuf,
    pub pages: PageSet,
    pub selection: CropSelection,
    /// Composite canvas size in preview pixels
    pub canvas: (u32, u32),
    pub thumbnails: Vec<Option<egui::TextureHandle>>,
    pub panes: HashMap<PaneSource, PaneView>,
    /// Cropped or pages deleted since the last save
    pub dirty: bool,
}

impl OpenDocument {
    pub fn new(doc_id: DocumentId, path: PathBuf, pages: Vec<PageInfo>, link_parity_sizes: bool) -> Self {
        let count = pages.len();
        let mut selection = CropSelection::default();
        selection.set_link_parity_sizes(link_parity_sizes);
        Self {
            doc_id,
            path,
            pages: PageSet::new(pages),
            selection,
            canvas: (0, 0),
            thumbnails: vec![None; count],
            panes: HashMap::new(),
            dirty: false,
        }
    }

    pub fn set_canvas(&mut self, canvas: (u32, u32)) {
        self.canvas = canvas;
        self.selection
            .set_bounds(Size::new(canvas.0 as f64, canvas.1 as f64));
    }

    pub fn pane_mut(&mut self, source: PaneSource) -> &mut PaneView {
        self.panes.entry(source).or_insert_with(PaneView::new)
    }

    pub fn set_thumbnail(&mut self, ctx: &egui::Context, page_index: usize, bitmap: &Bitmap) {
        let Some(slot) = self.thumbnails.get_mut(page_index) else {
            return;
        };
        let image = to_color_image(bitmap);
        match slot {
            Some(texture) => texture.set(image, egui::TextureOptions::LINEAR),
            None => {
                *slot = Some(ctx.load_texture(
                    format!("thumbnail_{}", page_index),
                    image,
                    egui::TextureOptions::LINEAR,
                ));
            }
        }
    }

    pub fn set_overlay(&mut self, ctx: &egui::Context, source: PaneSource, bitmap: &Bitmap) {
        let image = to_color_image(bitmap);
        let pane = self.pane_mut(source);
        let resized = pane.texture.as_ref().is_some_and(|t| t.size() != image.size);
        match &mut pane.texture {
            Some(texture) => texture.set(image, egui::TextureOptions::LINEAR),
            None => {
                pane.texture = Some(ctx.load_texture(
                    format!("overlay_{:?}", source),
                    image,
                    egui::TextureOptions::LINEAR,
                ));
            }
        }
        if resized {
            pane.fitted = false;
        }
    }
}

pub fn to_color_image(bitmap: &Bitmap) -> egui::ColorImage {
    egui::ColorImage::from_rgba_unmultiplied([bitmap.width, bitmap.height], &bitmap.rgba_data)
}
