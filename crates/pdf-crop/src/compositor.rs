//! Overlay compositing of rasterized pages
//!
//! All pages are anchored at the top-left corner of a shared canvas sized to
//! the largest page, so a given canvas pixel refers to the same page-space
//! location on every page.

use crate::types::{PageInfo, PageSubset};
use image::{Rgba, RgbaImage, imageops};

/// How overlapping pages are blended
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Opacity {
    /// Each covering page contributes `1 / n` of a pixel, `n` being the
    /// number of pages that cover it
    #[default]
    Uniform,
    /// First page opaque, every later page drawn over it at this alpha
    Layered(f32),
}

/// Largest width and height over all sizes
pub fn canvas_size<I>(sizes: I) -> (u32, u32)
where
    I: IntoIterator<Item = (u32, u32)>,
{
    sizes
        .into_iter()
        .fold((0, 0), |(w, h), (pw, ph)| (w.max(pw), h.max(ph)))
}

/// Pick the renders of the pages in `subset`, leaving out pages marked for
/// deletion. `renders[i]` must belong to `pages[i]`.
pub fn select_pages<'a>(
    renders: &'a [RgbaImage],
    pages: &[PageInfo],
    subset: PageSubset,
) -> Vec<&'a RgbaImage> {
    renders
        .iter()
        .zip(pages)
        .filter(|(_, page)| subset.contains(page.index) && !page.marked_for_deletion)
        .map(|(render, _)| render)
        .collect()
}

/// Composite `pages` on a canvas sized to their bounding box.
///
/// Returns `None` when there is nothing to draw.
pub fn compose(pages: &[&RgbaImage], opacity: Opacity) -> Option<RgbaImage> {
    let canvas = canvas_size(pages.iter().map(|p| p.dimensions()));
    if pages.is_empty() || canvas.0 == 0 || canvas.1 == 0 {
        return None;
    }
    Some(compose_on(canvas, pages, opacity))
}

/// Composite `pages` on a canvas of a fixed size. Page pixels beyond the
/// canvas are dropped; canvas pixels no page covers stay transparent.
pub fn compose_on(canvas: (u32, u32), pages: &[&RgbaImage], opacity: Opacity) -> RgbaImage {
    match opacity {
        Opacity::Uniform => compose_uniform(canvas, pages),
        Opacity::Layered(alpha) => compose_layered(canvas, pages, alpha.clamp(0.0, 1.0)),
    }
}

fn compose_uniform((width, height): (u32, u32), pages: &[&RgbaImage]) -> RgbaImage {
    let len = width as usize * height as usize;
    let mut sums = vec![[0u32; 3]; len];
    let mut counts = vec![0u32; len];

    for page in pages {
        let w = page.width().min(width);
        let h = page.height().min(height);
        for y in 0..h {
            for x in 0..w {
                let Rgba([r, g, b, _]) = *page.get_pixel(x, y);
                let i = y as usize * width as usize + x as usize;
                sums[i][0] += u32::from(r);
                sums[i][1] += u32::from(g);
                sums[i][2] += u32::from(b);
                counts[i] += 1;
            }
        }
    }

    let mut out = RgbaImage::new(width, height);
    for (i, pixel) in out.pixels_mut().enumerate() {
        let n = counts[i];
        if n == 0 {
            continue;
        }
        // round half up
        let avg = |sum: u32| ((sum + n / 2) / n) as u8;
        *pixel = Rgba([avg(sums[i][0]), avg(sums[i][1]), avg(sums[i][2]), 255]);
    }
    out
}

fn compose_layered((width, height): (u32, u32), pages: &[&RgbaImage], alpha: f32) -> RgbaImage {
    let len = width as usize * height as usize;
    // straight (non-premultiplied) color plus coverage alpha
    let mut acc = vec![[0f32; 4]; len];

    for (layer, page) in pages.iter().enumerate() {
        let a = if layer == 0 { 1.0 } else { alpha };
        let w = page.width().min(width);
        let h = page.height().min(height);
        for y in 0..h {
            for x in 0..w {
                let Rgba([r, g, b, _]) = *page.get_pixel(x, y);
                let dst = &mut acc[y as usize * width as usize + x as usize];
                let out_a = a + dst[3] * (1.0 - a);
                if out_a <= 0.0 {
                    continue;
                }
                let keep = dst[3] * (1.0 - a);
                for (c, src) in [r, g, b].into_iter().enumerate() {
                    dst[c] = (f32::from(src) * a + dst[c] * keep) / out_a;
                }
                dst[3] = out_a;
            }
        }
    }

    let mut out = RgbaImage::new(width, height);
    for (pixel, [r, g, b, a]) in out.pixels_mut().zip(acc) {
        let to_u8 = |v: f32| v.round().clamp(0.0, 255.0) as u8;
        *pixel = Rgba([to_u8(r), to_u8(g), to_u8(b), to_u8(a * 255.0)]);
    }
    out
}

/// Downscale `image` to fit `max` (width, height), keeping its aspect ratio
pub fn thumbnail(image: &RgbaImage, max: (u32, u32)) -> RgbaImage {
    let (w, h) = image.dimensions();
    if w == 0 || h == 0 {
        return RgbaImage::new(0, 0);
    }
    let scale = (max.0 as f64 / w as f64).min(max.1 as f64 / h as f64).min(1.0);
    let tw = ((w as f64 * scale).round() as u32).max(1);
    let th = ((h as f64 * scale).round() as u32).max(1);
    imageops::thumbnail(image, tw, th)
}
