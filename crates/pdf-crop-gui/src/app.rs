use eframe::egui;
use pdf_crop::{CropOptions, PageSubset, PaneSource, SaveTarget, ViewMode, default_file_name};
use pdf_crop_runtime::{CropCommand, CropUpdate, DocumentId};
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;

use crate::logger::AppLogger;
use crate::views::{
    MenuState, OpenDocument, PaneView, UiAction, show_log_window, show_menu_bar, show_pane,
    show_thumbnails, show_toolbar,
};

const APP_TITLE: &str = "Crop PDF";

#[derive(Clone)]
struct ProgressState {
    operation: String,
    current: usize,
    total: usize,
}

pub struct CropApp {
    command_tx: mpsc::UnboundedSender<CropCommand>,
    update_rx: mpsc::UnboundedReceiver<CropUpdate>,

    options: CropOptions,
    save_target: SaveTarget,
    logger: AppLogger,

    document: Option<OpenDocument>,
    status: String,
    progress: Option<ProgressState>,
    /// A mutating command is in flight
    busy: bool,

    show_log: bool,
    show_about: bool,
    /// The user already agreed to drop unsaved changes on exit
    allow_close: bool,

    _tokio_handle: tokio::runtime::Handle,
}

impl CropApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        tokio_handle: tokio::runtime::Handle,
        logger: AppLogger,
        options: CropOptions,
        save_target: SaveTarget,
        input: Option<PathBuf>,
    ) -> Self {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (update_tx, update_rx) = mpsc::unbounded_channel();

        // Spawn worker task
        tokio_handle.spawn(crate::worker::worker_task(
            command_rx,
            update_tx,
            options.render,
        ));

        let mut app = Self {
            command_tx,
            update_rx,
            options,
            save_target,
            logger,
            document: None,
            status: String::new(),
            progress: None,
            busy: false,
            show_log: false,
            show_about: false,
            allow_close: false,
            _tokio_handle: tokio_handle,
        };

        if let Some(path) = input {
            app.load(path);
        }
        app
    }

    fn send(&mut self, command: CropCommand) {
        if self.command_tx.send(command).is_err() {
            log::error!("Worker is gone, command dropped");
            self.status = "Error: background worker stopped".to_string();
            self.busy = false;
        }
    }

    /// Send a command that changes the document and lock the UI until it answers
    fn send_mutating(&mut self, command: CropCommand, status: impl Into<String>) {
        self.busy = true;
        self.status = status.into();
        self.send(command);
    }

    fn load(&mut self, path: PathBuf) {
        log::info!("Opening {}", path.display());
        self.send_mutating(CropCommand::Load { path }, "Loading PDF...");
    }

    /// Ask for every visible pane to be (re)composited
    fn request_overlays(&mut self) {
        let Some(doc) = &self.document else {
            return;
        };
        let commands: Vec<_> = doc
            .pages
            .panes()
            .into_iter()
            .map(|pane| {
                let pages = match pane.source {
                    PaneSource::Composite(subset) => doc.pages.indices(subset, true),
                    PaneSource::Page(index) => vec![index],
                };
                CropCommand::ComposeOverlay {
                    doc_id: doc.doc_id,
                    source: pane.source,
                    pages,
                    opacity: self.options.overlay.opacity,
                }
            })
            .collect();
        for command in commands {
            self.send(command);
        }
    }

    /// True when there is nothing to lose or the user agreed to discard it
    fn confirm_discard(&self) -> bool {
        if !self.document.as_ref().is_some_and(|d| d.dirty) {
            return true;
        }
        rfd::MessageDialog::new()
            .set_level(rfd::MessageLevel::Warning)
            .set_title("Unsaved changes")
            .set_description("The current document has unsaved changes. Discard them?")
            .set_buttons(rfd::MessageButtons::YesNo)
            .show()
            == rfd::MessageDialogResult::Yes
    }

    fn warn(&mut self, message: &str) {
        log::warn!("{}", message);
        self.status = message.to_string();
        rfd::MessageDialog::new()
            .set_level(rfd::MessageLevel::Warning)
            .set_title(APP_TITLE)
            .set_description(message)
            .set_buttons(rfd::MessageButtons::Ok)
            .show();
    }

    fn process_updates(&mut self, ctx: &egui::Context) {
        while let Ok(update) = self.update_rx.try_recv() {
            self.process_update(ctx, update);
        }
    }

    fn process_update(&mut self, ctx: &egui::Context, update: CropUpdate) {
        if let Some(doc_id) = edited_document(&update) {
            if let Some(doc) = self.document.as_mut().filter(|d| d.doc_id == doc_id) {
                doc.dirty = true;
            }
        }

        match update {
            CropUpdate::Progress {
                operation,
                current,
                total,
            } => {
                self.progress = Some(ProgressState {
                    operation,
                    current,
                    total,
                });
                ctx.request_repaint(); // Request another frame
            }
            CropUpdate::Loaded {
                doc_id,
                path,
                pages,
            } => {
                self.status = format!("Loaded {} ({} pages)", path.display(), pages.len());
                let title = path
                    .file_name()
                    .map(|name| format!("{} - {}", name.to_string_lossy(), APP_TITLE))
                    .unwrap_or_else(|| APP_TITLE.to_string());
                ctx.send_viewport_cmd(egui::ViewportCommand::Title(title));
                self.document = Some(OpenDocument::new(
                    doc_id,
                    path,
                    pages,
                    self.options.link_parity_sizes,
                ));
            }
            CropUpdate::PageRendered {
                doc_id,
                page_index,
                thumbnail,
            } => {
                if let Some(doc) = self.document.as_mut().filter(|d| d.doc_id == doc_id) {
                    doc.set_thumbnail(ctx, page_index, &thumbnail);
                }
            }
            CropUpdate::RenderComplete { doc_id, canvas } => {
                if let Some(doc) = self.document.as_mut().filter(|d| d.doc_id == doc_id) {
                    if doc.canvas != canvas {
                        doc.panes.values_mut().for_each(|p| p.fitted = false);
                    }
                    doc.set_canvas(canvas);
                }
                self.busy = false;
                self.progress = None;
                self.request_overlays();
            }
            CropUpdate::OverlayComposed {
                doc_id,
                source,
                image,
            } => {
                if let Some(doc) = self.document.as_mut().filter(|d| d.doc_id == doc_id) {
                    doc.set_overlay(ctx, source, &image);
                }
            }
            CropUpdate::Cropped { doc_id, page_count } => {
                if let Some(doc) = self.document.as_mut().filter(|d| d.doc_id == doc_id) {
                    doc.selection.reset();
                }
                self.status = format!("Cropped {} pages", page_count);
            }
            CropUpdate::CropReset { doc_id } => {
                if let Some(doc) = self.document.as_mut().filter(|d| d.doc_id == doc_id) {
                    doc.selection.reset();
                }
                self.status = "Crop reset".to_string();
            }
            CropUpdate::PagesDeleted { doc_id, removed } => {
                if let Some(doc) = self.document.as_mut().filter(|d| d.doc_id == doc_id) {
                    // Marks may have changed while the deletion was running
                    for index in 0..doc.pages.len() {
                        let _ = doc.pages.set_marked(index, removed.contains(&index));
                    }
                    doc.pages.apply_deletion();
                    for &index in removed.iter().rev() {
                        if index < doc.thumbnails.len() {
                            doc.thumbnails.remove(index);
                        }
                    }
                    doc.panes
                        .retain(|source, _| matches!(source, PaneSource::Composite(_)));
                }
                self.status = format!("Deleted {} pages", removed.len());
            }
            CropUpdate::Saved { path } => {
                if let Some(doc) = &mut self.document {
                    doc.dirty = false;
                }
                self.busy = false;
                self.progress = None;
                self.status = format!("Saved {}", path.display());
                rfd::MessageDialog::new()
                    .set_level(rfd::MessageLevel::Info)
                    .set_title(APP_TITLE)
                    .set_description("PDF saved successfully!")
                    .set_buttons(rfd::MessageButtons::Ok)
                    .show();
            }
            CropUpdate::PresetExported { path } => {
                self.status = format!("Crop preset exported to {}", path.display());
            }
            CropUpdate::Closed { .. } => {
                self.document = None;
                self.status = "Closed PDF".to_string();
                ctx.send_viewport_cmd(egui::ViewportCommand::Title(APP_TITLE.to_string()));
            }
            CropUpdate::Error { message } => {
                log::error!("{}", message);
                self.status = format!("Error: {message}");
                self.busy = false;
                self.progress = None;
                rfd::MessageDialog::new()
                    .set_level(rfd::MessageLevel::Error)
                    .set_title(APP_TITLE)
                    .set_description(&message)
                    .set_buttons(rfd::MessageButtons::Ok)
                    .show();
            }
        }
    }

    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| {
            i.raw
                .dropped_files
                .iter()
                .filter_map(|file| file.path.clone())
                .find(|path| is_pdf(path))
        });
        if let Some(path) = dropped {
            if self.busy {
                self.status = "Busy, try again when the current operation finishes".to_string();
            } else if self.confirm_discard() {
                self.load(path);
            }
        }
    }

    fn handle_close_request(&mut self, ctx: &egui::Context) {
        if !ctx.input(|i| i.viewport().close_requested()) || self.allow_close {
            return;
        }
        if self.confirm_discard() {
            self.allow_close = true;
        } else {
            ctx.send_viewport_cmd(egui::ViewportCommand::CancelClose);
        }
    }

    fn handle_action(&mut self, ctx: &egui::Context, action: UiAction) {
        match action {
            UiAction::Open => {
                if !self.confirm_discard() {
                    return;
                }
                if let Some(path) = rfd::FileDialog::new()
                    .add_filter("PDF", &["pdf"])
                    .pick_file()
                {
                    self.load(path);
                }
            }
            UiAction::Save => self.save(),
            UiAction::Close => {
                let Some(doc_id) = self.document.as_ref().map(|d| d.doc_id) else {
                    return;
                };
                if self.confirm_discard() {
                    self.send(CropCommand::Close { doc_id });
                }
            }
            UiAction::ExportPreset => self.export_preset(),
            UiAction::SetFastSave(fast_save) => {
                self.options.save.fast_save = fast_save;
                log::debug!("Fast save {}", if fast_save { "on" } else { "off" });
            }
            UiAction::Quit => ctx.send_viewport_cmd(egui::ViewportCommand::Close),
            UiAction::SetViewMode(mode) => {
                let Some(doc) = &mut self.document else {
                    return;
                };
                let from = doc.pages.overlay_mode();
                if let Err(e) = doc.pages.set_view_mode(mode) {
                    log::warn!("Cannot switch view: {}", e);
                    return;
                }
                doc.selection.switch_overlay(from, mode);
                self.request_overlays();
            }
            UiAction::ShowLog => self.show_log = !self.show_log,
            UiAction::ShowAbout => self.show_about = true,
            UiAction::Crop => self.crop(),
            UiAction::ResetCrop => {
                if let Some(doc_id) = self.document.as_ref().map(|d| d.doc_id) {
                    self.send_mutating(CropCommand::ResetCrop { doc_id }, "Resetting crop...");
                }
            }
            UiAction::DeletePages => self.delete_pages(),
            UiAction::SetLinkParitySizes(link) => {
                self.options.link_parity_sizes = link;
                if let Some(doc) = &mut self.document {
                    doc.selection.set_link_parity_sizes(link);
                }
            }
            UiAction::TogglePreview(index) => {
                let Some(doc) = &mut self.document else {
                    return;
                };
                match doc.pages.toggle_preview(index) {
                    Ok(mode) => log::debug!("View mode now {:?}", mode),
                    Err(e) => log::warn!("Cannot preview page: {}", e),
                }
                self.request_overlays();
            }
            UiAction::ToggleMarked(index) => {
                let Some(doc) = &mut self.document else {
                    return;
                };
                if let Err(e) = doc.pages.toggle_marked(index) {
                    log::warn!("Cannot mark page: {}", e);
                    return;
                }
                self.request_overlays();
            }
        }
    }

    fn crop(&mut self) {
        let Some(doc) = &self.document else {
            return;
        };
        let doc_id = doc.doc_id;
        let rects = doc.selection.scoped_rects(doc.pages.overlay_mode());
        let skip = doc.pages.marked();
        if rects.is_empty() {
            self.warn("Please make a selection first.");
            return;
        }
        self.send_mutating(CropCommand::ApplyCrop { doc_id, rects, skip }, "Cropping...");
    }

    fn delete_pages(&mut self) {
        let Some(doc) = &self.document else {
            return;
        };
        let doc_id = doc.doc_id;
        let indices = doc.pages.marked();
        if indices.is_empty() {
            self.warn("Please select pages to delete.");
            return;
        }
        let command = CropCommand::DeletePages { doc_id, indices };
        self.send_mutating(command, "Deleting pages...");
    }

    fn save(&mut self) {
        let Some(doc) = &self.document else {
            return;
        };
        let doc_id = doc.doc_id;
        let path = match self.save_target.resolve(&doc.path) {
            Some(path) => path,
            None => {
                let mut dialog = rfd::FileDialog::new()
                    .add_filter("PDF", &["pdf"])
                    .set_file_name(default_file_name(&doc.path));
                if let Some(dir) = doc.path.parent() {
                    dialog = dialog.set_directory(dir);
                }
                let Some(path) = dialog.save_file() else {
                    return;
                };
                path
            }
        };
        let command = CropCommand::Save {
            doc_id,
            path,
            options: self.options.save,
        };
        self.send_mutating(command, "Saving...");
    }

    fn export_preset(&mut self) {
        let Some(doc) = &self.document else {
            return;
        };
        let rects = doc.selection.scoped_rects(doc.pages.overlay_mode());
        if rects.is_empty() {
            self.warn("Please make a selection first.");
            return;
        }
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("JSON", &["json"])
            .set_file_name("crop_preset.json")
            .save_file()
        {
            let zoom = self.options.render.zoom;
            self.send(CropCommand::ExportPreset { rects, zoom, path });
        }
    }

    fn menu_state(&self) -> MenuState {
        MenuState {
            has_document: self.document.is_some(),
            busy: self.busy,
            fast_save: self.options.save.fast_save,
            link_parity_sizes: self.options.link_parity_sizes,
            overlay_mode: self
                .document
                .as_ref()
                .map_or(ViewMode::default(), |d| d.pages.overlay_mode()),
        }
    }
}

/// The document an update leaves different from its file on disk, if any
fn edited_document(update: &CropUpdate) -> Option<DocumentId> {
    match update {
        CropUpdate::Cropped { doc_id, .. }
        | CropUpdate::CropReset { doc_id }
        | CropUpdate::PagesDeleted { doc_id, .. } => Some(*doc_id),
        _ => None,
    }
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

fn pane_caption(source: PaneSource) -> String {
    match source {
        PaneSource::Composite(PageSubset::All) => "All pages".to_string(),
        PaneSource::Composite(PageSubset::Odd) => "Odd pages".to_string(),
        PaneSource::Composite(PageSubset::Even) => "Even pages".to_string(),
        PaneSource::Page(index) => format!("Page {}", index + 1),
    }
}

fn show_document(ui: &mut egui::Ui, doc: &mut OpenDocument) {
    let panes = doc.pages.panes();
    let OpenDocument {
        panes: views,
        selection,
        ..
    } = doc;

    ui.columns(panes.len().max(1), |columns| {
        for (ui, pane) in columns.iter_mut().zip(panes) {
            ui.label(egui::RichText::new(pane_caption(pane.source)).strong());
            let view = views.entry(pane.source).or_insert_with(PaneView::new);
            show_pane(ui, pane, view, selection);
        }
    });
}

impl eframe::App for CropApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_dropped_files(ctx);
        self.handle_close_request(ctx);

        // Process all pending updates from worker
        self.process_updates(ctx);

        let menu_state = self.menu_state();
        let mut actions = Vec::new();

        egui::TopBottomPanel::top("menu").show(ctx, |ui| {
            show_menu_bar(ui, &menu_state, &mut actions);
        });

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            show_toolbar(ui, &menu_state, &mut actions);
        });

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            // Show progress bar
            if let Some(ref progress) = self.progress {
                ui.label(&progress.operation);
                ui.add(
                    egui::ProgressBar::new(progress.current as f32 / progress.total.max(1) as f32)
                        .show_percentage(),
                );
            }
            if !self.status.is_empty() {
                ui.label(&self.status);
            }
        });

        if let Some(doc) = &self.document {
            egui::SidePanel::left("thumbnails")
                .resizable(true)
                .default_width(200.0)
                .show(ctx, |ui| {
                    show_thumbnails(ui, doc, &mut actions);
                });
        }

        egui::CentralPanel::default().show(ctx, |ui| match &mut self.document {
            Some(doc) => show_document(ui, doc),
            None => {
                ui.vertical_centered(|ui| {
                    ui.add_space(50.0);
                    ui.heading(APP_TITLE);
                    ui.add_space(20.0);
                    ui.label("Drop a PDF file here or use File → Open");
                });
            }
        });

        show_log_window(ctx, &mut self.show_log, &self.logger);

        egui::Window::new("About")
            .open(&mut self.show_about)
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                ui.heading(APP_TITLE);
                ui.label(format!("Version {}", env!("CARGO_PKG_VERSION")));
                ui.label("Overlay the pages of a PDF, draw one crop rectangle, apply it to every page.");
            });

        for action in actions {
            self.handle_action(ctx, action);
        }

        if self.busy {
            ctx.request_repaint(); // Keep updating during operations
        }
    }
}
