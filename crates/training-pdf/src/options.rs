use crate::types::{ExportError, Result};
use std::path::PathBuf;
use training_plan::{PageSetup, PaperSize, RenderContext, Session};

#[derive(Debug, Clone, PartialEq)]
pub struct ExportOptions {
    /// Page geometry in points
    pub setup: PageSetup,
    /// TrueType font to embed. Without one the builtin Helvetica faces are
    /// used, which only cover Latin-1.
    pub font_path: Option<PathBuf>,
    pub page_numbers: bool,
    pub title_font_size_pt: f32,
    pub body_font_size_pt: f32,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self::for_paper(PaperSize::A4)
    }
}

impl ExportOptions {
    pub fn for_paper(paper: PaperSize) -> Self {
        Self {
            setup: PageSetup::export(paper),
            font_path: None,
            page_numbers: true,
            title_font_size_pt: 24.0,
            body_font_size_pt: 10.0,
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.setup.validate_for(RenderContext::Export)?;
        if !(self.body_font_size_pt > 0.0 && self.title_font_size_pt > 0.0) {
            return Err(ExportError::Pdf("Font sizes must be positive".to_string()));
        }
        Ok(())
    }
}

/// `<session name>.pdf`, or `training-session.pdf` for unnamed sessions
pub fn suggested_file_name(session: &Session) -> String {
    let stem: String = session
        .name
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '-',
            c => c,
        })
        .collect();
    if stem.is_empty() {
        "training-session.pdf".to_string()
    } else {
        format!("{}.pdf", stem)
    }
}
