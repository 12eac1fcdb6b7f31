use eframe::egui;
use pdf_crop::ViewMode;

use super::UiAction;

/// What the menu bar and toolbar need to know to enable their entries
pub struct MenuState {
    pub has_document: bool,
    pub busy: bool,
    pub fast_save: bool,
    pub link_parity_sizes: bool,
    pub overlay_mode: ViewMode,
}

pub fn show_menu_bar(ui: &mut egui::Ui, state: &MenuState, actions: &mut Vec<UiAction>) {
    let idle_doc = state.has_document && !state.busy;

    egui::MenuBar::new().ui(ui, |ui| {
        ui.menu_button("File", |ui| {
            if ui.add_enabled(!state.busy, egui::Button::new("📂 Open...")).clicked() {
                actions.push(UiAction::Open);
                ui.close();
            }
            if ui.add_enabled(idle_doc, egui::Button::new("💾 Save")).clicked() {
                actions.push(UiAction::Save);
                ui.close();
            }
            if ui
                .add_enabled(state.has_document, egui::Button::new("Export Crop Preset..."))
                .clicked()
            {
                actions.push(UiAction::ExportPreset);
                ui.close();
            }
            if ui.add_enabled(idle_doc, egui::Button::new("Close PDF")).clicked() {
                actions.push(UiAction::Close);
                ui.close();
            }
            ui.separator();
            let mut fast_save = state.fast_save;
            if ui.checkbox(&mut fast_save, "Fast save").changed() {
                actions.push(UiAction::SetFastSave(fast_save));
            }
            ui.separator();
            if ui.button("Quit").clicked() {
                actions.push(UiAction::Quit);
                ui.close();
            }
        });

        ui.menu_button("View", |ui| {
            let modes = [
                (ViewMode::Split, "Split Odd/Even"),
                (ViewMode::All, "All Pages Overlay"),
                (ViewMode::OddOnly, "Odd Pages Only"),
                (ViewMode::EvenOnly, "Even Pages Only"),
            ];
            for (mode, label) in modes {
                if ui
                    .add_enabled(
                        state.has_document,
                        egui::Button::selectable(state.overlay_mode == mode, label),
                    )
                    .clicked()
                {
                    actions.push(UiAction::SetViewMode(mode));
                    ui.close();
                }
            }
            ui.separator();
            if ui.button("📋 Log").clicked() {
                actions.push(UiAction::ShowLog);
                ui.close();
            }
        });

        ui.menu_button("Help", |ui| {
            if ui.button("About").clicked() {
                actions.push(UiAction::ShowAbout);
                ui.close();
            }
        });
    });
}

pub fn show_toolbar(ui: &mut egui::Ui, state: &MenuState, actions: &mut Vec<UiAction>) {
    let idle_doc = state.has_document && !state.busy;

    ui.horizontal(|ui| {
        if ui
            .add_enabled(idle_doc, egui::Button::new("✂ Crop Selection"))
            .clicked()
        {
            actions.push(UiAction::Crop);
        }
        if ui
            .add_enabled(idle_doc, egui::Button::new("↺ Reset Crop"))
            .clicked()
        {
            actions.push(UiAction::ResetCrop);
        }
        if ui
            .add_enabled(idle_doc, egui::Button::new("🗑 Delete Selected Pages"))
            .clicked()
        {
            actions.push(UiAction::DeletePages);
        }

        ui.separator();

        let mut link = state.link_parity_sizes;
        if ui
            .add_enabled(
                state.has_document,
                egui::Checkbox::new(&mut link, "Link odd/even size"),
            )
            .changed()
        {
            actions.push(UiAction::SetLinkParitySizes(link));
        }
    });
}
