//! PDF export of training session plans using the builtin PDF fonts.

mod options;
mod pdf;
pub mod text;
mod types;

pub use options::{ExportOptions, suggested_file_name};
pub use pdf::{generate_pdf, generate_pdf_bytes, layout_pages};
pub use types::{ExportError, Result};
