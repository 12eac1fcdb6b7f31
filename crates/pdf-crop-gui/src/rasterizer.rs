use image::RgbaImage;

#[cfg(feature = "pdf-viewer")]
use pdfium_render::prelude::*;

/// Initialize Pdfium, trying the vendored library first, then falling back to system
#[cfg(feature = "pdf-viewer")]
pub fn init_pdfium() -> Result<Pdfium, PdfiumError> {
    // Try to load from vendor directory (relative to workspace root)
    let vendor_path = std::env::current_dir().ok().and_then(|mut p| {
        p.push("vendor/pdfium/lib");
        if p.exists() { Some(p) } else { None }
    });

    if let Some(vendor_path) = vendor_path {
        if let Ok(binding) =
            Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(&vendor_path))
        {
            return Ok(Pdfium::new(binding));
        }
    }

    // Fallback to system library or default search paths
    Pdfium::bind_to_system_library().map(Pdfium::new)
}

/// Rasterize every page of a serialized PDF at `zoom` pixels per point.
///
/// `progress` is called after each page with (pages done, total).
#[cfg(feature = "pdf-viewer")]
pub fn render_pages(
    bytes: &[u8],
    zoom: f64,
    mut progress: impl FnMut(usize, usize),
) -> anyhow::Result<Vec<RgbaImage>> {
    use anyhow::Context;

    let pdfium = init_pdfium().context("Failed to bind pdfium")?;
    let document = pdfium
        .load_pdf_from_byte_slice(bytes, None)
        .context("pdfium could not open the document")?;

    let config = PdfRenderConfig::new().scale_page_by_factor(zoom as f32);
    let pages = document.pages();
    let total = pages.len() as usize;
    let mut renders = Vec::with_capacity(total);

    for (index, page) in pages.iter().enumerate() {
        let bitmap = page
            .render_with_config(&config)
            .with_context(|| format!("Failed to render page {}", index + 1))?;
        let width = bitmap.width() as u32;
        let height = bitmap.height() as u32;
        let image = RgbaImage::from_raw(width, height, bitmap.as_rgba_bytes().to_vec())
            .with_context(|| format!("Page {} bitmap has an unexpected size", index + 1))?;
        renders.push(image);
        progress(index + 1, total);
    }

    Ok(renders)
}

#[cfg(not(feature = "pdf-viewer"))]
pub fn render_pages(
    _bytes: &[u8],
    _zoom: f64,
    _progress: impl FnMut(usize, usize),
) -> anyhow::Result<Vec<RgbaImage>> {
    anyhow::bail!("Page rendering not available (pdf-viewer feature disabled)")
}
