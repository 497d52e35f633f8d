//! Durable client-side storage

pub mod selection_file;

pub use selection_file::FileSelectionStorage;
