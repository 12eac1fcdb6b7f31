use pdf_crop::{CropPreset, SaveOptions, ScopedRects};
use pdf_crop_runtime::{CropUpdate, DocumentId};
use std::path::PathBuf;
use tokio::sync::mpsc;

use super::document::{DocumentStore, send_missing};

pub async fn handle_save(
    doc_id: DocumentId,
    path: PathBuf,
    options: SaveOptions,
    store: &DocumentStore,
    update_tx: &mpsc::UnboundedSender<CropUpdate>,
) {
    let Some(doc) = store.get(doc_id) else {
        send_missing(doc_id, update_tx);
        return;
    };

    let _ = update_tx.send(CropUpdate::Progress {
        operation: format!("Saving {}", path.display()),
        current: 0,
        total: 1,
    });

    match pdf_crop::save_pdf(&doc.working, &path, options).await {
        Ok(()) => {
            log::info!(
                "Saved {} (fast save: {})",
                path.display(),
                options.fast_save
            );
            let _ = update_tx.send(CropUpdate::Saved { path });
        }
        Err(e) => {
            let _ = update_tx.send(CropUpdate::Error {
                message: format!("Failed to save PDF: {e}"),
            });
        }
    }
}

pub async fn handle_export_preset(
    rects: ScopedRects,
    zoom: f64,
    path: PathBuf,
    update_tx: &mpsc::UnboundedSender<CropUpdate>,
) {
    let preset = CropPreset::from_preview(&rects, zoom);
    match preset.save(&path).await {
        Ok(()) => {
            log::info!("Exported crop preset to {}", path.display());
            let _ = update_tx.send(CropUpdate::PresetExported { path });
        }
        Err(e) => {
            let _ = update_tx.send(CropUpdate::Error {
                message: format!("Failed to export crop preset: {e}"),
            });
        }
    }
}
