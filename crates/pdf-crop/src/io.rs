//! Document I/O: loading, page queries, page deletion and atomic saving

use crate::apply::page_geometry;
use crate::options::SaveOptions;
use crate::types::*;
use lopdf::{Document, ObjectId};
use std::collections::BTreeSet;
use std::io::Write;
use std::path::Path;

/// Load a single PDF document
pub async fn load_pdf(path: impl AsRef<Path>) -> Result<Document> {
    let path = path.as_ref().to_owned();
    let bytes = tokio::fs::read(&path).await?;
    let doc = tokio::task::spawn_blocking(move || load_pdf_bytes(&bytes)).await??;
    Ok(doc)
}

/// Parse a PDF held in memory
pub fn load_pdf_bytes(bytes: &[u8]) -> Result<Document> {
    let doc = Document::load_mem(bytes)?;
    if doc.get_pages().is_empty() {
        return Err(CropError::NoPages);
    }
    Ok(doc)
}

/// Serialize a document without modifying it
pub fn document_bytes(doc: &Document) -> Result<Vec<u8>> {
    let mut doc = doc.clone();
    let mut writer = Vec::new();
    doc.save_to(&mut writer)?;
    Ok(writer)
}

/// Visual size and rotation of every page, in document order
pub fn page_infos(doc: &Document) -> Result<Vec<PageInfo>> {
    doc.get_pages()
        .values()
        .enumerate()
        .map(|(index, &page_id)| {
            let geometry = page_geometry(doc, page_id)?;
            Ok(PageInfo::new(
                index,
                geometry.visual_size(),
                geometry.rotation,
            ))
        })
        .collect()
}

/// Remove pages by 0-based index and drop objects nothing refers to anymore
pub fn delete_pages(doc: &mut Document, indices: &[usize]) -> Result<()> {
    if indices.is_empty() {
        return Ok(());
    }
    let count = doc.get_pages().len();
    if let Some(&index) = indices.iter().find(|&&i| i >= count) {
        return Err(CropError::PageOutOfRange { index, count });
    }
    let unique: BTreeSet<usize> = indices.iter().copied().collect();
    if unique.len() >= count {
        return Err(CropError::Config("Cannot delete every page".to_string()));
    }

    // lopdf numbers pages from 1
    let numbers: Vec<u32> = unique.iter().map(|&i| i as u32 + 1).collect();
    doc.delete_pages(&numbers);
    let pruned = doc.prune_objects();
    log::debug!(
        "Deleted {} pages, pruned {} objects",
        numbers.len(),
        pruned.len()
    );
    Ok(())
}

/// Save a document atomically.
///
/// The bytes go to a temporary file next to `path` which is then renamed
/// over it, so readers see either the old file or the complete new one.
pub async fn save_pdf(doc: &Document, path: impl AsRef<Path>, options: SaveOptions) -> Result<()> {
    let path = path.as_ref().to_owned();
    let mut doc = doc.clone();
    tokio::task::spawn_blocking(move || {
        if !options.fast_save {
            doc.compress();
        }
        let mut writer = Vec::new();
        doc.save_to(&mut writer)?;
        write_atomic(&path, &writer)
    })
    .await?
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let mut file = tempfile::NamedTempFile::new_in(dir)?;
    file.write_all(bytes)?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|e| e.error)?;
    log::info!("Wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}

/// Object ids of all pages, in document order
pub fn page_ids(doc: &Document) -> Vec<ObjectId> {
    doc.get_pages().values().copied().collect()
}
