use eframe::egui::{self, Color32, Sense, Stroke, StrokeKind};
use pdf_crop::ViewMode;
use pdf_crop::constants::THUMBNAIL_SIZE;

use super::UiAction;
use super::state::OpenDocument;

const PREVIEW_HIGHLIGHT: Color32 = Color32::from_rgb(138, 43, 226);

/// Two-column grid of page thumbnails with deletion checkboxes
pub fn show_thumbnails(ui: &mut egui::Ui, doc: &OpenDocument, actions: &mut Vec<UiAction>) {
    let previewed = match doc.pages.view_mode() {
        ViewMode::SinglePreview(index) => Some(index),
        _ => None,
    };
    let slot = egui::vec2(THUMBNAIL_SIZE.0 as f32, THUMBNAIL_SIZE.1 as f32);

    egui::ScrollArea::vertical().show(ui, |ui| {
        egui::Grid::new("thumbnail_grid")
            .num_columns(2)
            .spacing([8.0, 8.0])
            .show(ui, |ui| {
                for (i, page) in doc.pages.pages().iter().enumerate() {
                    ui.vertical(|ui| {
                        let response = match doc.thumbnails.get(i).and_then(Option::as_ref) {
                            Some(texture) => ui.add(
                                egui::Image::new((texture.id(), texture.size_vec2()))
                                    .sense(Sense::click()),
                            ),
                            None => ui.add_sized(slot, egui::Spinner::new()),
                        };
                        if previewed == Some(i) {
                            ui.painter().rect_stroke(
                                response.rect.expand(2.0),
                                2.0,
                                Stroke::new(2.0, PREVIEW_HIGHLIGHT),
                                StrokeKind::Outside,
                            );
                        }
                        if response.on_hover_text("Click to preview").clicked() {
                            actions.push(UiAction::TogglePreview(i));
                        }

                        let mut marked = page.marked_for_deletion;
                        if ui.checkbox(&mut marked, format!("Page {}", i + 1)).changed() {
                            actions.push(UiAction::ToggleMarked(i));
                        }
                    });

                    if i % 2 == 1 {
                        ui.end_row();
                    }
                }
            });
    });
}
