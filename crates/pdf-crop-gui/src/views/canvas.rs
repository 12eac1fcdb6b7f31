use eframe::egui::{self, Color32, CursorIcon, PointerButton, Pos2, Rect, Sense, Stroke, StrokeKind};
use pdf_crop::constants::WHEEL_ZOOM_STEP;
use pdf_crop::{CropSelection, EditOutcome, Gesture, Handle, Hit, Pane, Point, RectEditor, Size, Transform};

use super::state::PaneView;

const SELECTION_STROKE: Color32 = Color32::from_rgb(220, 40, 40);
const SELECTION_FILL: Color32 = Color32::from_rgba_premultiplied(40, 6, 6, 40);

/// Draw one pane and route pointer input to its crop rectangle editor
pub fn show_pane(ui: &mut egui::Ui, pane: Pane, view: &mut PaneView, selection: &mut CropSelection) {
    let (response, painter) = ui.allocate_painter(ui.available_size(), Sense::click_and_drag());
    let rect = response.rect;
    painter.rect_filled(rect, 0.0, ui.visuals().extreme_bg_color);

    let Some(content) = view.content_size() else {
        painter.text(
            rect.center(),
            egui::Align2::CENTER_CENTER,
            "Rendering...",
            egui::FontId::proportional(16.0),
            ui.visuals().weak_text_color(),
        );
        return;
    };

    let viewport = Size::new(rect.width() as f64, rect.height() as f64);
    if !view.fitted || response.double_clicked() {
        view.transform = Transform::fit(content, viewport);
        view.fitted = true;
    }

    let to_view = |pos: Pos2| Point::new((pos.x - rect.min.x) as f64, (pos.y - rect.min.y) as f64);
    let to_screen = |p: Point| Pos2::new(rect.min.x + p.x as f32, rect.min.y + p.y as f32);

    if response.hovered() {
        let scroll = ui.input(|i| i.raw_scroll_delta.y);
        if scroll != 0.0 {
            if let Some(pos) = response.hover_pos() {
                let factor = WHEEL_ZOOM_STEP.powf(scroll.signum() as f64);
                view.transform.zoom_about(to_view(pos), factor);
            }
        }
    }

    let space_down = ui.input(|i| i.key_down(egui::Key::Space));
    let scope = pane.scope;

    if ui.input(|i| i.key_pressed(egui::Key::Escape)) {
        selection.cancel();
    }

    let editor = selection.editor_mut(scope);
    let outcome = if response.dragged_by(PointerButton::Middle)
        || (space_down && response.dragged_by(PointerButton::Primary) && editor.is_idle())
    {
        let delta = response.drag_delta();
        view.transform.pan_by(delta.x as f64, delta.y as f64);
        None
    } else {
        route_pointer(ui, &response, editor, &view.transform, to_view)
    };

    if let Some(outcome) = outcome {
        log::debug!("Gesture on {:?} finished: {:?}", scope, outcome);
        selection.after_edit(scope, outcome);
    }
    let editor = selection.editor(scope);

    let transform = view.transform;
    if let Some(texture) = &view.texture {
        let image_rect = Rect::from_min_max(
            to_screen(transform.page_to_view(Point::new(0.0, 0.0))),
            to_screen(transform.page_to_view(Point::new(content.width, content.height))),
        );
        let uv = Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0));
        painter.image(texture.id(), image_rect, uv, Color32::WHITE);
    }

    if let Some((a, b)) = editor.view_rect(&transform) {
        let selection_rect = Rect::from_two_pos(to_screen(a), to_screen(b));
        painter.rect_filled(selection_rect, 0.0, SELECTION_FILL);
        painter.rect_stroke(
            selection_rect,
            0.0,
            Stroke::new(2.0, SELECTION_STROKE),
            StrokeKind::Middle,
        );
    }

    if let Some(pos) = response.hover_pos() {
        let icon = if space_down {
            CursorIcon::Grab
        } else {
            cursor_for(editor, editor.hit_test_view(to_view(pos), &transform))
        };
        ui.ctx().set_cursor_icon(icon);
    }
}

fn route_pointer(
    ui: &egui::Ui,
    response: &egui::Response,
    editor: &mut RectEditor,
    transform: &Transform,
    to_view: impl Fn(Pos2) -> Point,
) -> Option<EditOutcome> {
    let pointer = response
        .interact_pointer_pos()
        .or_else(|| ui.input(|i| i.pointer.latest_pos()));

    if response.drag_started_by(PointerButton::Primary) {
        if let Some(origin) = ui.input(|i| i.pointer.press_origin()) {
            editor.press(to_view(origin), transform);
        }
    }
    if response.dragged_by(PointerButton::Primary) {
        if let Some(pos) = pointer {
            editor.drag(to_view(pos), transform);
        }
    }

    if response.drag_stopped_by(PointerButton::Primary) {
        let Some(pos) = pointer else {
            editor.cancel();
            return None;
        };
        return Some(editor.release(to_view(pos), transform));
    }

    // A click without movement is a press and release on the same spot
    if response.clicked_by(PointerButton::Primary) {
        let pos = pointer?;
        editor.press(to_view(pos), transform);
        return Some(editor.release(to_view(pos), transform));
    }
    None
}

fn cursor_for(editor: &RectEditor, hit: Hit) -> CursorIcon {
    match editor.gesture() {
        Gesture::Drawing { .. } => CursorIcon::Crosshair,
        Gesture::Dragging { .. } => CursorIcon::Grabbing,
        Gesture::Resizing { handle, .. } => handle_cursor(*handle),
        Gesture::Idle => match hit {
            Hit::Handle(handle) => handle_cursor(handle),
            Hit::Body => CursorIcon::Move,
            Hit::Outside => CursorIcon::Crosshair,
        },
    }
}

fn handle_cursor(handle: Handle) -> CursorIcon {
    match handle {
        Handle::Left | Handle::Right => CursorIcon::ResizeHorizontal,
        Handle::Top | Handle::Bottom => CursorIcon::ResizeVertical,
        Handle::TopLeft | Handle::BottomRight => CursorIcon::ResizeNwSe,
        Handle::TopRight | Handle::BottomLeft => CursorIcon::ResizeNeSw,
    }
}
