//! Writing crop rectangles into a document as `/CropBox` entries
//!
//! Rectangles are drawn in preview space (pixels of the rasterized page, y
//! down). Mapping them onto a page takes three steps:
//! 1. Scale pixels to points using the page's visual size
//! 2. Undo the page's `/Rotate` so the rectangle is in unrotated page space
//! 3. Flip y and offset by the visible box, since PDF space is y up

use crate::editor::ScopedRects;
use crate::geometry::{CropRect, Size};
use crate::io::page_ids;
use crate::types::*;
use lopdf::{Document, Object, ObjectId};
use std::collections::BTreeSet;

/// Guard against cyclic `/Parent` chains
const MAX_INHERIT_DEPTH: usize = 32;

/// A crop request for one document
#[derive(Debug, Clone, PartialEq)]
pub struct CropPlan {
    pub rects: ScopedRects,
    /// Size of each page's preview (width, height), in the units `rects` is
    /// drawn in, indexed by page
    pub preview_sizes: Vec<(f64, f64)>,
    /// Pages left untouched (e.g. marked for deletion)
    pub skip: BTreeSet<usize>,
}

impl CropPlan {
    pub fn new(rects: ScopedRects, preview_sizes: Vec<(f64, f64)>) -> Self {
        Self {
            rects,
            preview_sizes,
            skip: BTreeSet::new(),
        }
    }

    pub fn skipping(mut self, skip: impl IntoIterator<Item = usize>) -> Self {
        self.skip.extend(skip);
        self
    }
}

/// Visible box and rotation of a page
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    /// `/CropBox`, or `/MediaBox` when no crop box is set
    pub visible: PdfBox,
    /// Normalized to 0, 90, 180 or 270
    pub rotation: i64,
}

impl PageGeometry {
    /// Page size as displayed, after rotation
    pub fn visual_size(&self) -> Size {
        let (w, h) = (self.visible.width(), self.visible.height());
        if self.rotation % 180 == 0 {
            Size::new(w, h)
        } else {
            Size::new(h, w)
        }
    }
}

/// Read the (possibly inherited) visible box and rotation of a page
pub fn page_geometry(doc: &Document, page_id: ObjectId) -> Result<PageGeometry> {
    let visible = match inherited(doc, page_id, b"CropBox")?.and_then(parse_box) {
        Some(crop) => Some(crop),
        None => inherited(doc, page_id, b"MediaBox")?.and_then(parse_box),
    }
    .ok_or_else(|| CropError::Config(format!("Page {:?} has no usable MediaBox", page_id)))?;

    let rotation = match inherited(doc, page_id, b"Rotate")? {
        Some(Object::Integer(r)) => normalize_rotation(*r),
        Some(Object::Real(r)) => normalize_rotation(*r as i64),
        _ => 0,
    };

    Ok(PageGeometry { visible, rotation })
}

fn inherited<'a>(doc: &'a Document, page_id: ObjectId, key: &[u8]) -> Result<Option<&'a Object>> {
    let mut dict = doc.get_dictionary(page_id)?;
    for _ in 0..MAX_INHERIT_DEPTH {
        if let Ok(value) = dict.get(key) {
            let (_, value) = doc.dereference(value)?;
            return Ok(Some(value));
        }
        match dict.get(b"Parent").and_then(Object::as_reference) {
            Ok(parent) => dict = doc.get_dictionary(parent)?,
            Err(_) => break,
        }
    }
    Ok(None)
}

fn parse_box(obj: &Object) -> Option<PdfBox> {
    let values = obj.as_array().ok()?;
    if values.len() != 4 {
        return None;
    }
    let nums: Vec<f64> = values.iter().filter_map(extract_number).collect();
    if nums.len() != 4 {
        return None;
    }
    let b = PdfBox::new(nums[0], nums[1], nums[2], nums[3]);
    (!b.is_degenerate()).then_some(b)
}

fn extract_number(obj: &Object) -> Option<f64> {
    match obj {
        Object::Integer(i) => Some(*i as f64),
        Object::Real(r) => Some(*r as f64),
        _ => None,
    }
}

fn normalize_rotation(degrees: i64) -> i64 {
    match degrees.rem_euclid(360) {
        r @ (90 | 180 | 270) => r,
        _ => 0,
    }
}

/// Map a preview-space rectangle onto a page's native PDF coordinates.
///
/// Returns `None` if nothing of the rectangle lies on the page.
pub fn map_rect(rect: &CropRect, preview: (f64, f64), geometry: &PageGeometry) -> Option<PdfBox> {
    let visual = geometry.visual_size();
    let (pw, ph) = preview;
    if pw <= 0.0 || ph <= 0.0 || visual.is_empty() {
        return None;
    }

    let sx = visual.width / pw;
    let sy = visual.height / ph;
    let scaled = CropRect::new(
        rect.left() * sx,
        rect.top() * sy,
        rect.right() * sx,
        rect.bottom() * sy,
    )?
    .clipped_to(visual)?;

    let b = geometry.visible;
    let (w, h) = (b.width(), b.height());
    let derotate = |vx: f64, vy: f64| match geometry.rotation {
        90 => (vy, h - vx),
        180 => (w - vx, h - vy),
        270 => (w - vy, vx),
        _ => (vx, vy),
    };

    let (ax, ay) = derotate(scaled.left(), scaled.top());
    let (bx, by) = derotate(scaled.right(), scaled.bottom());
    let mapped = PdfBox::new(b.x0 + ax, b.y1 - ay, b.x0 + bx, b.y1 - by);
    (!mapped.is_degenerate()).then_some(mapped)
}

/// Compute the new crop box of every page; `None` leaves a page as is
pub fn crop_boxes(doc: &Document, plan: &CropPlan) -> Result<Vec<Option<PdfBox>>> {
    let page_ids = page_ids(doc);
    if page_ids.is_empty() {
        return Err(CropError::NoPages);
    }
    if plan.preview_sizes.len() != page_ids.len() {
        return Err(CropError::Config(format!(
            "Expected {} preview sizes, got {}",
            page_ids.len(),
            plan.preview_sizes.len()
        )));
    }

    page_ids
        .iter()
        .zip(&plan.preview_sizes)
        .enumerate()
        .map(|(index, (&page_id, &preview))| {
            if plan.skip.contains(&index) {
                return Ok(None);
            }
            let Some(rect) = plan.rects.rect_for(Parity::of(index)) else {
                return Ok(None);
            };
            let geometry = page_geometry(doc, page_id)?;
            map_rect(&rect, preview, &geometry)
                .map(Some)
                .ok_or(CropError::InvalidRect { page: index })
        })
        .collect()
}

/// Apply the plan to a copy of `doc`
pub async fn apply_crop(doc: &Document, plan: &CropPlan) -> Result<Document> {
    let doc = doc.clone();
    let plan = plan.clone();

    tokio::task::spawn_blocking(move || apply_crop_sync(&doc, &plan)).await?
}

pub fn apply_crop_sync(doc: &Document, plan: &CropPlan) -> Result<Document> {
    if plan.rects.is_empty() {
        return Err(CropError::Config("No crop rectangle selected".to_string()));
    }

    // Every box is computed before the copy is touched
    let boxes = crop_boxes(doc, plan)?;

    let mut cropped = doc.clone();
    let mut count = 0;
    for (page_id, crop) in page_ids(&cropped).into_iter().zip(boxes) {
        let Some(crop) = crop else { continue };
        let page = cropped.get_dictionary_mut(page_id)?;
        page.set(
            "CropBox",
            Object::Array(vec![
                Object::Real(crop.x0 as f32),
                Object::Real(crop.y0 as f32),
                Object::Real(crop.x1 as f32),
                Object::Real(crop.y1 as f32),
            ]),
        );
        count += 1;
    }
    log::debug!("Set crop box on {} pages", count);

    Ok(cropped)
}
