pub mod document;
pub mod overlay;
pub mod save;

pub use document::DocumentStore;
