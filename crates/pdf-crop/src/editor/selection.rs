use super::{EditOutcome, RectEditor};
use crate::geometry::{CropRect, Size};
use crate::types::{Parity, Scope, ViewMode};

/// The crop rectangles of one scope, ready to hand to the applier
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "scope", rename_all = "snake_case")
)]
pub enum ScopedRects {
    /// One rectangle for every page
    All { rect: Option<CropRect> },
    /// Independent rectangles for odd and even pages
    Parity {
        odd: Option<CropRect>,
        even: Option<CropRect>,
    },
}

impl ScopedRects {
    /// Rectangle that applies to a page of the given parity
    pub fn rect_for(&self, parity: Parity) -> Option<CropRect> {
        match (self, parity) {
            (ScopedRects::All { rect }, _) => *rect,
            (ScopedRects::Parity { odd, .. }, Parity::Odd) => *odd,
            (ScopedRects::Parity { even, .. }, Parity::Even) => *even,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            ScopedRects::All { rect } => rect.is_none(),
            ScopedRects::Parity { odd, even } => odd.is_none() && even.is_none(),
        }
    }

    /// Convert preview pixels rendered at `zoom` px/pt into points
    pub fn in_points(&self, zoom: f64) -> Self {
        let scale = |r: Option<CropRect>| {
            r.and_then(|r| {
                CropRect::new(r.left() / zoom, r.top() / zoom, r.right() / zoom, r.bottom() / zoom)
            })
        };
        match *self {
            ScopedRects::All { rect } => ScopedRects::All { rect: scale(rect) },
            ScopedRects::Parity { odd, even } => ScopedRects::Parity {
                odd: scale(odd),
                even: scale(even),
            },
        }
    }
}

/// Editors for the all-pages rectangle and the two parity rectangles
#[derive(Debug, Clone, Default)]
pub struct CropSelection {
    all: RectEditor,
    odd: RectEditor,
    even: RectEditor,
    link_parity_sizes: bool,
}

impl CropSelection {
    pub fn new(bounds: Size) -> Self {
        Self {
            all: RectEditor::new(bounds),
            odd: RectEditor::new(bounds),
            even: RectEditor::new(bounds),
            link_parity_sizes: false,
        }
    }

    pub fn editor(&self, scope: Scope) -> &RectEditor {
        match scope {
            Scope::All => &self.all,
            Scope::Odd => &self.odd,
            Scope::Even => &self.even,
        }
    }

    pub fn editor_mut(&mut self, scope: Scope) -> &mut RectEditor {
        match scope {
            Scope::All => &mut self.all,
            Scope::Odd => &mut self.odd,
            Scope::Even => &mut self.even,
        }
    }

    pub fn link_parity_sizes(&self) -> bool {
        self.link_parity_sizes
    }

    pub fn set_link_parity_sizes(&mut self, link: bool) {
        self.link_parity_sizes = link;
    }

    /// Resize every editor's bounds (new document or canvas)
    pub fn set_bounds(&mut self, bounds: Size) {
        self.all.set_bounds(bounds);
        self.odd.set_bounds(bounds);
        self.even.set_bounds(bounds);
    }

    /// Drop every rectangle and gesture
    pub fn reset(&mut self) {
        self.all.clear();
        self.odd.clear();
        self.even.clear();
    }

    /// Abort any gesture in progress on every editor
    pub fn cancel(&mut self) {
        self.all.cancel();
        self.odd.cancel();
        self.even.cancel();
    }

    /// Propagate a finished gesture on `scope` to the linked parity editor
    pub fn after_edit(&mut self, scope: Scope, outcome: EditOutcome) {
        if !self.link_parity_sizes {
            return;
        }
        let EditOutcome::Committed(rect) = outcome else {
            return;
        };
        let other = match scope {
            Scope::Odd => &mut self.even,
            Scope::Even => &mut self.odd,
            Scope::All => return,
        };
        sync_size(other, rect);
    }

    /// Carry the current rectangle across an overlay mode change
    pub fn switch_overlay(&mut self, from: ViewMode, to: ViewMode) {
        if from.is_preview() || to.is_preview() || from.is_parity() == to.is_parity() {
            return;
        }
        if to.is_parity() {
            if let Some(rect) = self.all.rect() {
                self.odd.set_rect(Some(rect));
                if self.link_parity_sizes {
                    sync_size(&mut self.even, rect);
                }
            }
        } else if let Some(rect) = self.odd.rect() {
            self.all.set_rect(Some(rect));
        }
    }

    /// The rectangles that a crop in `mode` should apply
    pub fn scoped_rects(&self, mode: ViewMode) -> ScopedRects {
        if mode.is_parity() {
            ScopedRects::Parity {
                odd: self.odd.rect(),
                even: self.even.rect(),
            }
        } else {
            ScopedRects::All {
                rect: self.all.rect(),
            }
        }
    }

    /// Install rectangles (e.g. from a preset), replacing the current ones
    pub fn load(&mut self, rects: &ScopedRects) {
        match *rects {
            ScopedRects::All { rect } => self.all.set_rect(rect),
            ScopedRects::Parity { odd, even } => {
                self.odd.set_rect(odd);
                self.even.set_rect(even);
            }
        }
    }
}

// Keep the target's position, take the source's size; copy outright if empty
fn sync_size(target: &mut RectEditor, source: CropRect) {
    let synced = match target.rect() {
        Some(existing) => source.moved_to(existing.top_left()),
        None => source,
    };
    target.set_rect(Some(synced));
}
