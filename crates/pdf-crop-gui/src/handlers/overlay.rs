use pdf_crop::{Opacity, PaneSource, compositor};
use pdf_crop_runtime::{Bitmap, CropUpdate, DocumentId};
use std::sync::Arc;
use tokio::sync::mpsc;

use super::document::{DocumentStore, send_missing};

pub async fn handle_compose(
    doc_id: DocumentId,
    source: PaneSource,
    pages: Vec<usize>,
    opacity: Opacity,
    store: &DocumentStore,
    update_tx: &mpsc::UnboundedSender<CropUpdate>,
) {
    let Some(doc) = store.get(doc_id) else {
        send_missing(doc_id, update_tx);
        return;
    };

    let renders = Arc::clone(&doc.renders);
    let canvas = doc.canvas();

    let result = tokio::task::spawn_blocking(move || match source {
        PaneSource::Composite(_) => {
            let selected: Vec<_> = pages.iter().filter_map(|&i| renders.get(i)).collect();
            Some(compositor::compose_on(canvas, &selected, opacity))
        }
        PaneSource::Page(index) => renders.get(index).cloned(),
    })
    .await;

    match result {
        Ok(Some(image)) => {
            log::debug!(
                "Composed {:?} at {}x{}",
                source,
                image.width(),
                image.height()
            );
            let _ = update_tx.send(CropUpdate::OverlayComposed {
                doc_id,
                source,
                image: Bitmap {
                    width: image.width() as usize,
                    height: image.height() as usize,
                    rgba_data: image.into_raw(),
                },
            });
        }
        Ok(None) => {
            let _ = update_tx.send(CropUpdate::Error {
                message: format!("Nothing to show for {:?}", source),
            });
        }
        Err(e) => {
            let _ = update_tx.send(CropUpdate::Error {
                message: format!("Task join error: {}", e),
            });
        }
    }
}
