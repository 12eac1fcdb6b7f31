use image::RgbaImage;
use lopdf::Document;
use pdf_crop::constants::THUMBNAIL_SIZE;
use pdf_crop::{CropPlan, RenderOptions, ScopedRects, compositor};
use pdf_crop_runtime::{Bitmap, CropUpdate, DocumentId};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::mpsc;

use crate::rasterizer;

/// A document open in the worker
pub struct LoadedDocument {
    pub path: PathBuf,
    /// As loaded, with page deletions applied
    pub pristine: Document,
    /// `pristine` plus every crop applied since the last reset
    pub working: Document,
    /// Full-resolution renders of `working`, one per page
    pub renders: Arc<Vec<RgbaImage>>,
}

impl LoadedDocument {
    pub fn canvas(&self) -> (u32, u32) {
        compositor::canvas_size(self.renders.iter().map(|r| r.dimensions()))
    }

    fn preview_sizes(&self) -> Vec<(f64, f64)> {
        self.renders
            .iter()
            .map(|r| (r.width() as f64, r.height() as f64))
            .collect()
    }
}

pub struct DocumentStore {
    documents: HashMap<DocumentId, LoadedDocument>,
    next_doc_id: AtomicU64,
    render: RenderOptions,
}

impl DocumentStore {
    pub fn new(render: RenderOptions) -> Self {
        Self {
            documents: HashMap::new(),
            next_doc_id: AtomicU64::new(1),
            render,
        }
    }

    fn next_id(&self) -> DocumentId {
        DocumentId(self.next_doc_id.fetch_add(1, Ordering::SeqCst))
    }

    pub fn get(&self, doc_id: DocumentId) -> Option<&LoadedDocument> {
        self.documents.get(&doc_id)
    }

    fn get_mut(&mut self, doc_id: DocumentId) -> Option<&mut LoadedDocument> {
        self.documents.get_mut(&doc_id)
    }
}

pub fn send_missing(doc_id: DocumentId, update_tx: &mpsc::UnboundedSender<CropUpdate>) {
    let _ = update_tx.send(CropUpdate::Error {
        message: format!("Document not found: {:?}", doc_id),
    });
}

/// Rasterize `doc` on a blocking thread, reporting progress as pages finish
async fn render_document(
    doc: &Document,
    render: RenderOptions,
    update_tx: &mpsc::UnboundedSender<CropUpdate>,
) -> anyhow::Result<Vec<RgbaImage>> {
    let bytes = pdf_crop::document_bytes(doc)?;
    let progress_tx = update_tx.clone();

    tokio::task::spawn_blocking(move || {
        rasterizer::render_pages(&bytes, render.zoom, |current, total| {
            let _ = progress_tx.send(CropUpdate::Progress {
                operation: "Rendering pages".to_string(),
                current,
                total,
            });
        })
    })
    .await?
}

/// Send thumbnails and the canvas size for freshly rendered pages
fn publish_renders(
    doc_id: DocumentId,
    doc: &LoadedDocument,
    update_tx: &mpsc::UnboundedSender<CropUpdate>,
) {
    for (page_index, render) in doc.renders.iter().enumerate() {
        let thumb = compositor::thumbnail(render, THUMBNAIL_SIZE);
        let _ = update_tx.send(CropUpdate::PageRendered {
            doc_id,
            page_index,
            thumbnail: Bitmap {
                width: thumb.width() as usize,
                height: thumb.height() as usize,
                rgba_data: thumb.into_raw(),
            },
        });
    }
    let _ = update_tx.send(CropUpdate::RenderComplete {
        doc_id,
        canvas: doc.canvas(),
    });
}

pub async fn handle_load(
    path: PathBuf,
    store: &mut DocumentStore,
    update_tx: &mpsc::UnboundedSender<CropUpdate>,
) {
    let _ = update_tx.send(CropUpdate::Progress {
        operation: format!("Loading {}", path.display()),
        current: 0,
        total: 1,
    });

    let doc = match pdf_crop::load_pdf(&path).await {
        Ok(doc) => doc,
        Err(e) => {
            let _ = update_tx.send(CropUpdate::Error {
                message: format!("Failed to load PDF: {e}"),
            });
            return;
        }
    };

    let pages = match pdf_crop::page_infos(&doc) {
        Ok(pages) => pages,
        Err(e) => {
            let _ = update_tx.send(CropUpdate::Error {
                message: format!("Failed to read page geometry: {e}"),
            });
            return;
        }
    };

    let renders = match render_document(&doc, store.render, update_tx).await {
        Ok(renders) => renders,
        Err(e) => {
            let _ = update_tx.send(CropUpdate::Error {
                message: format!("Failed to render PDF: {e:#}"),
            });
            return;
        }
    };

    // Opening a file replaces whatever was open before
    store.documents.clear();
    let doc_id = store.next_id();
    let loaded = LoadedDocument {
        path: path.clone(),
        pristine: doc.clone(),
        working: doc,
        renders: Arc::new(renders),
    };
    log::info!("Loaded {} ({} pages)", path.display(), pages.len());

    let _ = update_tx.send(CropUpdate::Loaded {
        doc_id,
        path,
        pages,
    });
    publish_renders(doc_id, &loaded, update_tx);
    store.documents.insert(doc_id, loaded);
}

pub async fn handle_apply_crop(
    doc_id: DocumentId,
    rects: ScopedRects,
    skip: Vec<usize>,
    store: &mut DocumentStore,
    update_tx: &mpsc::UnboundedSender<CropUpdate>,
) {
    let render = store.render;
    let Some(doc) = store.get_mut(doc_id) else {
        send_missing(doc_id, update_tx);
        return;
    };

    let plan = CropPlan::new(rects, doc.preview_sizes()).skipping(skip);
    let cropped = match pdf_crop::apply_crop(&doc.working, &plan).await {
        Ok(cropped) => cropped,
        Err(e) => {
            let _ = update_tx.send(CropUpdate::Error {
                message: format!("Crop failed: {e}"),
            });
            return;
        }
    };

    let renders = match render_document(&cropped, render, update_tx).await {
        Ok(renders) => renders,
        Err(e) => {
            let _ = update_tx.send(CropUpdate::Error {
                message: format!("Failed to render cropped PDF: {e:#}"),
            });
            return;
        }
    };

    doc.working = cropped;
    doc.renders = Arc::new(renders);
    log::info!("Applied crop to {}", doc.path.display());

    let _ = update_tx.send(CropUpdate::Cropped {
        doc_id,
        page_count: doc.renders.len(),
    });
    publish_renders(doc_id, doc, update_tx);
}

pub async fn handle_reset_crop(
    doc_id: DocumentId,
    store: &mut DocumentStore,
    update_tx: &mpsc::UnboundedSender<CropUpdate>,
) {
    let render = store.render;
    let Some(doc) = store.get_mut(doc_id) else {
        send_missing(doc_id, update_tx);
        return;
    };

    let renders = match render_document(&doc.pristine, render, update_tx).await {
        Ok(renders) => renders,
        Err(e) => {
            let _ = update_tx.send(CropUpdate::Error {
                message: format!("Failed to render PDF: {e:#}"),
            });
            return;
        }
    };

    doc.working = doc.pristine.clone();
    doc.renders = Arc::new(renders);
    log::info!("Crop reset for {}", doc.path.display());

    let _ = update_tx.send(CropUpdate::CropReset { doc_id });
    publish_renders(doc_id, doc, update_tx);
}

pub async fn handle_delete_pages(
    doc_id: DocumentId,
    indices: Vec<usize>,
    store: &mut DocumentStore,
    update_tx: &mpsc::UnboundedSender<CropUpdate>,
) {
    let Some(doc) = store.get_mut(doc_id) else {
        send_missing(doc_id, update_tx);
        return;
    };

    // Both copies change together or not at all
    let mut pristine = doc.pristine.clone();
    let mut working = doc.working.clone();
    let result = pdf_crop::delete_pages(&mut pristine, &indices)
        .and_then(|_| pdf_crop::delete_pages(&mut working, &indices));
    if let Err(e) = result {
        let _ = update_tx.send(CropUpdate::Error {
            message: format!("Failed to delete pages: {e}"),
        });
        return;
    }

    let mut removed = indices;
    removed.sort_unstable();
    removed.dedup();

    let renders = doc
        .renders
        .iter()
        .enumerate()
        .filter(|(i, _)| removed.binary_search(i).is_err())
        .map(|(_, r)| r.clone())
        .collect();

    doc.pristine = pristine;
    doc.working = working;
    doc.renders = Arc::new(renders);
    log::info!("Deleted pages {:?} from {}", removed, doc.path.display());

    let _ = update_tx.send(CropUpdate::PagesDeleted { doc_id, removed });
    let _ = update_tx.send(CropUpdate::RenderComplete {
        doc_id,
        canvas: doc.canvas(),
    });
}

pub async fn handle_close(
    doc_id: DocumentId,
    store: &mut DocumentStore,
    update_tx: &mpsc::UnboundedSender<CropUpdate>,
) {
    store.documents.remove(&doc_id);
    let _ = update_tx.send(CropUpdate::Closed { doc_id });
}
