use crate::constants::*;
use crate::paginate::PageBudget;
use crate::types::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Where a pagination is going to be shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum RenderContext {
    /// On-screen preview; heights in pixels, measured cards allowed
    Preview,
    /// Downloadable document; heights in points, estimates only
    #[default]
    Export,
}

impl RenderContext {
    /// Unit heights and budgets are expressed in for this context
    pub fn unit(&self) -> PageUnit {
        match self {
            RenderContext::Preview => PageUnit::Pixels,
            RenderContext::Export => PageUnit::Points,
        }
    }
}

/// Unit the page setup is expressed in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum PageUnit {
    Pixels,
    Points,
}

impl PageUnit {
    pub fn name(&self) -> &'static str {
        match self {
            PageUnit::Pixels => "px",
            PageUnit::Points => "pt",
        }
    }

    pub fn from_mm(&self, mm: f32) -> f32 {
        match self {
            PageUnit::Pixels => mm_to_px(mm),
            PageUnit::Points => mm_to_pt(mm),
        }
    }
}

/// Standard paper sizes
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PaperSize {
    A3,
    A4,
    A5,
    Letter,
    Legal,
    Tabloid,
    Custom { width_mm: f32, height_mm: f32 },
}

impl PaperSize {
    /// Portrait dimensions
    pub fn dimensions_mm(self) -> (f32, f32) {
        match self {
            PaperSize::A3 => (297.0, 420.0),
            PaperSize::A4 => (210.0, 297.0),
            PaperSize::A5 => (148.0, 210.0),
            PaperSize::Letter => (215.9, 279.4),
            PaperSize::Legal => (215.9, 355.6),
            PaperSize::Tabloid => (279.4, 431.8),
            PaperSize::Custom {
                width_mm,
                height_mm,
            } => (width_mm, height_mm),
        }
    }
}

/// Page geometry a renderer hands to the paginator.
///
/// All lengths share `unit`. The first page carries the title and metadata
/// header (plus the equipment block when the session lists equipment);
/// continuation pages only carry a "continued" label.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PageSetup {
    pub unit: PageUnit,
    pub page_width: f32,
    pub page_height: f32,
    /// Applied on all four sides
    pub padding: f32,
    pub first_header_height: f32,
    pub equipment_block_height: f32,
    pub continuation_header_height: f32,
    pub footer_height: f32,
    pub item_spacing: f32,
}

impl PageSetup {
    /// A4 preview canvas in CSS pixels
    pub fn preview() -> Self {
        let (width_mm, height_mm) = PaperSize::A4.dimensions_mm();
        Self {
            unit: PageUnit::Pixels,
            page_width: mm_to_px(width_mm),
            page_height: mm_to_px(height_mm),
            padding: PREVIEW_PADDING,
            first_header_height: PREVIEW_FIRST_HEADER,
            equipment_block_height: PREVIEW_EQUIPMENT_BLOCK,
            continuation_header_height: PREVIEW_CONTINUATION_HEADER,
            footer_height: PREVIEW_FOOTER,
            item_spacing: PREVIEW_SPACING,
        }
    }

    /// Printed document in points
    pub fn export(paper: PaperSize) -> Self {
        let (width_mm, height_mm) = paper.dimensions_mm();
        Self {
            unit: PageUnit::Points,
            page_width: mm_to_pt(width_mm),
            page_height: mm_to_pt(height_mm),
            padding: EXPORT_PADDING,
            first_header_height: EXPORT_FIRST_HEADER,
            equipment_block_height: EXPORT_EQUIPMENT_BLOCK,
            continuation_header_height: EXPORT_CONTINUATION_HEADER,
            footer_height: EXPORT_FOOTER,
            item_spacing: EXPORT_SPACING,
        }
    }

    pub fn for_context(context: RenderContext, paper: PaperSize) -> Self {
        match context {
            RenderContext::Preview => Self::preview(),
            RenderContext::Export => Self::export(paper),
        }
    }

    /// Width available to exercise blocks
    pub fn content_width(&self) -> f32 {
        self.page_width - 2.0 * self.padding
    }

    /// Effective first-page header for this session
    pub fn first_header_for(&self, session: &Session) -> f32 {
        if session.equipment.is_empty() {
            self.first_header_height
        } else {
            self.first_header_height + self.equipment_block_height
        }
    }

    /// Capacities the paginator works with for this session
    pub fn budget_for(&self, session: &Session) -> PageBudget {
        let body = self.page_height - 2.0 * self.padding;
        PageBudget {
            first_page: body - self.first_header_for(session),
            continuation_page: body - self.continuation_header_height,
            spacing: self.item_spacing,
            footer: self.footer_height,
        }
    }

    /// Load a page setup from a JSON file
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let setup: Self = serde_json::from_slice(&bytes)
            .map_err(|e| SessionError::Config(format!("Failed to parse page setup: {}", e)))?;
        setup.validate()?;
        Ok(setup)
    }

    /// Save the page setup to a JSON file
    #[cfg(feature = "serde")]
    pub async fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| SessionError::Config(format!("Failed to serialize page setup: {}", e)))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    /// Validate the setup
    pub fn validate(&self) -> Result<()> {
        let lengths = [
            ("page_width", self.page_width),
            ("page_height", self.page_height),
            ("padding", self.padding),
            ("first_header_height", self.first_header_height),
            ("equipment_block_height", self.equipment_block_height),
            ("continuation_header_height", self.continuation_header_height),
            ("footer_height", self.footer_height),
            ("item_spacing", self.item_spacing),
        ];
        for (name, value) in lengths {
            if !value.is_finite() || value < 0.0 {
                return Err(SessionError::Config(format!(
                    "{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }

        if self.content_width() <= 0.0 {
            return Err(SessionError::Config(
                "Padding leaves no room for content".to_string(),
            ));
        }

        let body = self.page_height - 2.0 * self.padding;
        let tallest_header = (self.first_header_height + self.equipment_block_height)
            .max(self.continuation_header_height);
        if body - tallest_header <= 0.0 {
            return Err(SessionError::Config(format!(
                "Headers leave no room for exercises on a {}{} page",
                self.page_height,
                self.unit.name()
            )));
        }

        Ok(())
    }

    /// Validate the setup and check it is in the unit `context` paginates in
    pub fn validate_for(&self, context: RenderContext) -> Result<()> {
        self.validate()?;
        let expected = context.unit();
        if self.unit != expected {
            return Err(SessionError::Config(format!(
                "Page setup for {:?} must be in {}, got {}",
                context,
                expected.name(),
                self.unit.name()
            )));
        }
        Ok(())
    }
}

impl Default for PageSetup {
    fn default() -> Self {
        Self::export(PaperSize::A4)
    }
}
