use eframe::egui::{self, Color32};
use log::Level;

use crate::logger::AppLogger;

pub fn show_log_window(ctx: &egui::Context, open: &mut bool, logger: &AppLogger) {
    egui::Window::new("Log")
        .open(open)
        .default_size([560.0, 320.0])
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("Clear").clicked() {
                    logger.clear();
                }
                let problems = logger.problem_count();
                if problems > 0 {
                    ui.label(format!("{problems} warning(s) or error(s)"));
                }
            });
            ui.separator();

            egui::ScrollArea::vertical()
                .stick_to_bottom(true)
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    for entry in logger.get_entries() {
                        let color = match entry.level {
                            Level::Error => Color32::from_rgb(230, 80, 80),
                            Level::Warn => Color32::from_rgb(230, 180, 60),
                            Level::Info => ui.visuals().text_color(),
                            Level::Debug | Level::Trace => ui.visuals().weak_text_color(),
                        };
                        ui.label(
                            egui::RichText::new(entry.to_string())
                                .monospace()
                                .color(color),
                        );
                    }
                });
        });
}
