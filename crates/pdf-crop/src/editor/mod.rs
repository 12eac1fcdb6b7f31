//! Interactive crop rectangle editing
//!
//! A [`RectEditor`] owns one optional rectangle and the gesture currently
//! applied to it. Pointer events arrive in view space and are converted to
//! page space through the pane's [`Transform`] before touching any edge.
//!
//! Gesture transitions:
//! 1. `Idle` + press on a handle -> `Resizing(handle)`
//! 2. `Idle` + press inside the rectangle -> `Dragging`
//! 3. `Idle` + press anywhere else -> `Drawing`
//! 4. any gesture + release -> `Idle`, committing the result

mod selection;

pub use selection::{CropSelection, ScopedRects};

use crate::constants::{HANDLE_MARGIN_PX, MIN_EXTENT};
use crate::geometry::{CropRect, Point, Size, Transform};

/// Grab points on the rectangle outline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Handle {
    Top,
    Bottom,
    Left,
    Right,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Handle {
    pub fn moves_left(self) -> bool {
        matches!(self, Handle::Left | Handle::TopLeft | Handle::BottomLeft)
    }

    pub fn moves_right(self) -> bool {
        matches!(self, Handle::Right | Handle::TopRight | Handle::BottomRight)
    }

    pub fn moves_top(self) -> bool {
        matches!(self, Handle::Top | Handle::TopLeft | Handle::TopRight)
    }

    pub fn moves_bottom(self) -> bool {
        matches!(self, Handle::Bottom | Handle::BottomLeft | Handle::BottomRight)
    }
}

/// Result of hit-testing a page-space point against the rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    Handle(Handle),
    Body,
    Outside,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Gesture {
    #[default]
    Idle,
    Drawing {
        anchor: Point,
        current: Point,
        previous: Option<CropRect>,
    },
    Dragging {
        grab: Point,
        start: CropRect,
    },
    Resizing {
        handle: Handle,
        grab: Point,
        start: CropRect,
    },
}

/// What a finished gesture did to the rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EditOutcome {
    Unchanged,
    Committed(CropRect),
    Cleared,
}

/// Crop rectangle plus gesture state for one view pane
#[derive(Debug, Clone, Default)]
pub struct RectEditor {
    rect: Option<CropRect>,
    bounds: Size,
    gesture: Gesture,
}

impl RectEditor {
    pub fn new(bounds: Size) -> Self {
        Self {
            rect: None,
            bounds,
            gesture: Gesture::Idle,
        }
    }

    /// The committed rectangle (or the live one during drag/resize)
    pub fn rect(&self) -> Option<CropRect> {
        self.rect
    }

    /// What should be drawn right now, including an in-progress drawing
    pub fn display_rect(&self) -> Option<CropRect> {
        match self.gesture {
            Gesture::Drawing {
                anchor, current, ..
            } => CropRect::from_corners(anchor, current),
            _ => self.rect,
        }
    }

    /// The live rectangle in view space, for painting
    pub fn view_rect(&self, transform: &Transform) -> Option<(Point, Point)> {
        self.display_rect().map(|r| transform.rect_to_view(&r))
    }

    pub fn bounds(&self) -> Size {
        self.bounds
    }

    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.gesture, Gesture::Idle)
    }

    /// Change the page bounds; an existing rectangle is clipped to them
    pub fn set_bounds(&mut self, bounds: Size) {
        self.bounds = bounds;
        self.gesture = Gesture::Idle;
        self.rect = self.rect.and_then(|r| r.clipped_to(bounds));
    }

    /// Replace the rectangle programmatically (mode switch, linked sizes)
    pub fn set_rect(&mut self, rect: Option<CropRect>) {
        self.gesture = Gesture::Idle;
        self.rect = rect.and_then(|r| r.shifted_into(self.bounds).clipped_to(self.bounds));
    }

    pub fn clear(&mut self) {
        self.set_rect(None);
    }

    pub fn hit_test(&self, p: Point, margin: f64) -> Hit {
        let Some(rect) = self.rect else {
            return Hit::Outside;
        };

        let within_x = p.x > rect.left() - margin && p.x < rect.right() + margin;
        let within_y = p.y > rect.top() - margin && p.y < rect.bottom() + margin;
        if !(within_x && within_y) {
            return Hit::Outside;
        }

        let on_left = (p.x - rect.left()).abs() < margin;
        let on_right = (p.x - rect.right()).abs() < margin;
        let on_top = (p.y - rect.top()).abs() < margin;
        let on_bottom = (p.y - rect.bottom()).abs() < margin;

        match (on_top, on_bottom, on_left, on_right) {
            (true, _, true, _) => Hit::Handle(Handle::TopLeft),
            (true, _, _, true) => Hit::Handle(Handle::TopRight),
            (_, true, true, _) => Hit::Handle(Handle::BottomLeft),
            (_, true, _, true) => Hit::Handle(Handle::BottomRight),
            (true, _, _, _) => Hit::Handle(Handle::Top),
            (_, true, _, _) => Hit::Handle(Handle::Bottom),
            (_, _, true, _) => Hit::Handle(Handle::Left),
            (_, _, _, true) => Hit::Handle(Handle::Right),
            _ if rect.contains(p) => Hit::Body,
            _ => Hit::Outside,
        }
    }

    /// Hit-test a view-space pointer position (used for cursor feedback)
    pub fn hit_test_view(&self, view: Point, transform: &Transform) -> Hit {
        self.hit_test(
            transform.view_to_page(view),
            transform.view_len_to_page(HANDLE_MARGIN_PX),
        )
    }

    /// Pointer pressed at `view`. Ignored unless idle.
    pub fn press(&mut self, view: Point, transform: &Transform) {
        if !self.is_idle() || self.bounds.is_empty() {
            return;
        }
        let p = transform.view_to_page(view);
        let hit = self.hit_test_view(view, transform);
        self.gesture = match (hit, self.rect) {
            (Hit::Handle(handle), Some(start)) => Gesture::Resizing {
                handle,
                grab: p,
                start,
            },
            (Hit::Body, Some(start)) => Gesture::Dragging { grab: p, start },
            _ => {
                let anchor = p.clamped(self.bounds);
                Gesture::Drawing {
                    anchor,
                    current: anchor,
                    previous: self.rect.take(),
                }
            }
        };
    }

    /// Pointer moved to `view` with the button held
    pub fn drag(&mut self, view: Point, transform: &Transform) {
        let p = transform.view_to_page(view);
        let bounds = self.bounds;
        match &mut self.gesture {
            Gesture::Idle => {}
            Gesture::Drawing { current, .. } => {
                *current = p.clamped(bounds);
            }
            Gesture::Dragging { grab, start } => {
                self.rect = Some(drag_rect(start, p.x - grab.x, p.y - grab.y, bounds));
            }
            Gesture::Resizing {
                handle,
                grab,
                start,
            } => {
                self.rect = Some(resize_rect(start, *handle, p.x - grab.x, p.y - grab.y, bounds));
            }
        }
    }

    /// Pointer released at `view`: finish the gesture and return to idle
    pub fn release(&mut self, view: Point, transform: &Transform) -> EditOutcome {
        self.drag(view, transform);
        match std::mem::take(&mut self.gesture) {
            Gesture::Idle => EditOutcome::Unchanged,
            Gesture::Drawing {
                anchor, current, ..
            } => {
                self.rect = CropRect::from_corners(anchor, current)
                    .filter(|r| r.width() >= MIN_EXTENT && r.height() >= MIN_EXTENT);
                match self.rect {
                    Some(rect) => EditOutcome::Committed(rect),
                    None => EditOutcome::Cleared,
                }
            }
            Gesture::Dragging { start, .. } | Gesture::Resizing { start, .. } => match self.rect {
                Some(rect) if rect != start => EditOutcome::Committed(rect),
                _ => EditOutcome::Unchanged,
            },
        }
    }

    /// Abort the gesture in progress, restoring the rectangle it started from
    pub fn cancel(&mut self) {
        match std::mem::take(&mut self.gesture) {
            Gesture::Idle => {}
            Gesture::Drawing { previous, .. } => self.rect = previous,
            Gesture::Dragging { start, .. } | Gesture::Resizing { start, .. } => {
                self.rect = Some(start)
            }
        }
    }
}

/// Translate `start` by (dx, dy), clamped so it stays inside `bounds`
fn drag_rect(start: &CropRect, dx: f64, dy: f64, bounds: Size) -> CropRect {
    let dx = dx.max(-start.left()).min(bounds.width - start.right());
    let dy = dy.max(-start.top()).min(bounds.height - start.bottom());
    start.translated(dx, dy)
}

/// Move the edges owned by `handle`, never past the opposite edge
fn resize_rect(start: &CropRect, handle: Handle, dx: f64, dy: f64, bounds: Size) -> CropRect {
    let mut left = start.left();
    let mut top = start.top();
    let mut right = start.right();
    let mut bottom = start.bottom();

    if handle.moves_left() {
        left = (left + dx).max(0.0).min(right - MIN_EXTENT);
    }
    if handle.moves_right() {
        right = (right + dx).min(bounds.width).max(left + MIN_EXTENT);
    }
    if handle.moves_top() {
        top = (top + dy).max(0.0).min(bottom - MIN_EXTENT);
    }
    if handle.moves_bottom() {
        bottom = (bottom + dy).min(bounds.height).max(top + MIN_EXTENT);
    }

    CropRect::new(left, top, right, bottom).unwrap_or(*start)
}
