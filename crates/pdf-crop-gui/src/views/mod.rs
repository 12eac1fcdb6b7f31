pub mod canvas;
pub mod log_window;
pub mod menu;
pub mod state;
pub mod thumbnails;

use pdf_crop::ViewMode;

pub use canvas::show_pane;
pub use log_window::show_log_window;
pub use menu::{MenuState, show_menu_bar, show_toolbar};
pub use state::{OpenDocument, PaneView};
pub use thumbnails::show_thumbnails;

/// User intents collected while drawing a frame, handled afterwards
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UiAction {
    Open,
    Save,
    Close,
    ExportPreset,
    SetFastSave(bool),
    Quit,
    SetViewMode(ViewMode),
    ShowLog,
    ShowAbout,
    Crop,
    ResetCrop,
    DeletePages,
    SetLinkParitySizes(bool),
    TogglePreview(usize),
    ToggleMarked(usize),
}
