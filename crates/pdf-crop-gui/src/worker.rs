use pdf_crop::{Opacity, PaneSource, RenderOptions};
use pdf_crop_runtime::{CropCommand, CropUpdate, DocumentId};
use tokio::sync::mpsc;

use crate::handlers::{self, DocumentStore};

#[derive(Debug, Clone, PartialEq)]
struct ComposeRequest {
    doc_id: DocumentId,
    source: PaneSource,
    pages: Vec<usize>,
    opacity: Opacity,
}

/// Fold queued compositions into `first`, keeping only the newest request per
/// pane, in first-seen order.
///
/// Stops at the first other command and hands it back; anything queued after
/// it stays in `queued`.
fn coalesce(
    first: ComposeRequest,
    queued: impl IntoIterator<Item = CropCommand>,
) -> (Vec<ComposeRequest>, Option<CropCommand>) {
    let mut pending = vec![first];
    for cmd in queued {
        let CropCommand::ComposeOverlay {
            doc_id,
            source,
            pages,
            opacity,
        } = cmd
        else {
            return (pending, Some(cmd));
        };
        let request = ComposeRequest {
            doc_id,
            source,
            pages,
            opacity,
        };
        match pending
            .iter_mut()
            .find(|p| p.doc_id == doc_id && p.source == source)
        {
            Some(slot) => {
                log::debug!("Discarding queued overlay composition, using newer request");
                *slot = request;
            }
            None => pending.push(request),
        }
    }
    (pending, None)
}

/// Async worker task that processes crop commands and sends updates
pub async fn worker_task(
    mut command_rx: mpsc::UnboundedReceiver<CropCommand>,
    update_tx: mpsc::UnboundedSender<CropUpdate>,
    render: RenderOptions,
) {
    let mut store = DocumentStore::new(render);

    while let Some(cmd) = command_rx.recv().await {
        process_command(cmd, &mut store, &mut command_rx, &update_tx).await;
    }
    log::debug!("Command channel closed, worker exiting");
}

async fn process_command(
    cmd: CropCommand,
    store: &mut DocumentStore,
    command_rx: &mut mpsc::UnboundedReceiver<CropCommand>,
    update_tx: &mpsc::UnboundedSender<CropUpdate>,
) {
    match cmd {
        CropCommand::Load { path } => {
            handlers::document::handle_load(path, store, update_tx).await;
        }
        CropCommand::ComposeOverlay {
            doc_id,
            source,
            pages,
            opacity,
        } => {
            let first = ComposeRequest {
                doc_id,
                source,
                pages,
                opacity,
            };
            let queued = std::iter::from_fn(|| command_rx.try_recv().ok());
            let (pending, next_cmd) = coalesce(first, queued);

            for request in pending {
                handlers::overlay::handle_compose(
                    request.doc_id,
                    request.source,
                    request.pages,
                    request.opacity,
                    store,
                    update_tx,
                )
                .await;
            }

            // The command that ended the drain runs after the compositions queued before it
            if let Some(next_cmd) = next_cmd {
                Box::pin(process_command(next_cmd, store, command_rx, update_tx)).await;
            }
        }
        CropCommand::ApplyCrop {
            doc_id,
            rects,
            skip,
        } => {
            handlers::document::handle_apply_crop(doc_id, rects, skip, store, update_tx).await;
        }
        CropCommand::ResetCrop { doc_id } => {
            handlers::document::handle_reset_crop(doc_id, store, update_tx).await;
        }
        CropCommand::DeletePages { doc_id, indices } => {
            handlers::document::handle_delete_pages(doc_id, indices, store, update_tx).await;
        }
        CropCommand::Save {
            doc_id,
            path,
            options,
        } => {
            handlers::save::handle_save(doc_id, path, options, store, update_tx).await;
        }
        CropCommand::ExportPreset { rects, zoom, path } => {
            handlers::save::handle_export_preset(rects, zoom, path, update_tx).await;
        }
        CropCommand::Close { doc_id } => {
            handlers::document::handle_close(doc_id, store, update_tx).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdf_crop::PageSubset;

    const DOC: DocumentId = DocumentId(1);

    fn request(source: PaneSource, pages: Vec<usize>) -> ComposeRequest {
        ComposeRequest {
            doc_id: DOC,
            source,
            pages,
            opacity: Opacity::Uniform,
        }
    }

    fn compose(source: PaneSource, pages: Vec<usize>) -> CropCommand {
        CropCommand::ComposeOverlay {
            doc_id: DOC,
            source,
            pages,
            opacity: Opacity::Uniform,
        }
    }

    #[test]
    fn test_coalesce_keeps_newest_per_pane() {
        let odd = PaneSource::Composite(PageSubset::Odd);
        let even = PaneSource::Composite(PageSubset::Even);

        let (pending, next) = coalesce(
            request(odd, vec![0, 2, 4]),
            vec![compose(even, vec![1, 3]), compose(odd, vec![0, 4])],
        );

        assert!(next.is_none());
        assert_eq!(pending, vec![request(odd, vec![0, 4]), request(even, vec![1, 3])]);
    }

    #[test]
    fn test_coalesce_separates_documents() {
        let all = PaneSource::Composite(PageSubset::All);
        let mut other = request(all, vec![0]);
        other.doc_id = DocumentId(2);

        let (pending, _) = coalesce(
            request(all, vec![0, 1]),
            vec![CropCommand::ComposeOverlay {
                doc_id: DocumentId(2),
                source: all,
                pages: vec![0],
                opacity: Opacity::Uniform,
            }],
        );

        assert_eq!(pending, vec![request(all, vec![0, 1]), other]);
    }

    #[test]
    fn test_coalesce_stops_at_other_command() {
        let all = PaneSource::Composite(PageSubset::All);
        let mut queued = vec![
            compose(all, vec![0, 1, 2]),
            CropCommand::Close { doc_id: DOC },
            compose(all, vec![0]),
        ]
        .into_iter();

        let (pending, next) = coalesce(request(all, vec![0, 1]), &mut queued);

        assert_eq!(pending, vec![request(all, vec![0, 1, 2])]);
        assert!(matches!(next, Some(CropCommand::Close { doc_id }) if doc_id == DOC));
        // Compositions queued after the close are left for the next round
        assert!(matches!(queued.next(), Some(CropCommand::ComposeOverlay { .. })));
        assert!(queued.next().is_none());
    }
}
