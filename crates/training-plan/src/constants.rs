//! Shared constants for page layout and height estimation
//!
//! Preview values are CSS pixels at 96 dpi; export values are PDF points.

// =============================================================================
// Unit Conversion
// =============================================================================

/// Points per millimeter (1 inch = 72 points, 1 inch = 25.4mm)
pub const POINTS_PER_MM: f32 = 72.0 / 25.4;

/// CSS pixels per millimeter (1 inch = 96 px)
pub const PIXELS_PER_MM: f32 = 96.0 / 25.4;

/// Convert millimeters to points
#[inline]
pub fn mm_to_pt(mm: f32) -> f32 {
    mm * POINTS_PER_MM
}

/// Convert millimeters to CSS pixels
#[inline]
pub fn mm_to_px(mm: f32) -> f32 {
    mm * PIXELS_PER_MM
}

/// Smallest height the estimator ever reports
pub const MIN_BLOCK_HEIGHT: f32 = 1.0;

// =============================================================================
// Preview Estimation (pixels)
// =============================================================================

/// Card chrome: number, title row, tags, duration, padding
pub const PREVIEW_BASE_HEIGHT: f32 = 80.0;
pub const PREVIEW_CHARS_PER_LINE: usize = 80;
pub const PREVIEW_LINE_HEIGHT: f32 = 20.0;
/// "Coaching Points" label and list margins
pub const PREVIEW_COACHING_HEADER: f32 = 30.0;
pub const PREVIEW_COACHING_ITEM: f32 = 22.0;
pub const PREVIEW_EQUIPMENT_HEIGHT: f32 = 24.0;
pub const PREVIEW_VARIATIONS_HEIGHT: f32 = 40.0;
pub const PREVIEW_PLAYERS_AREA_HEIGHT: f32 = 24.0;
pub const PREVIEW_IMAGE_MIN_HEIGHT: f32 = 200.0;

// =============================================================================
// Export Estimation (points)
// =============================================================================

pub const EXPORT_BASE_HEIGHT: f32 = 40.0;
pub const EXPORT_CHARS_PER_LINE: usize = 90;
/// 10pt body text at 1.4 line height
pub const EXPORT_LINE_HEIGHT: f32 = 14.0;
pub const EXPORT_COACHING_HEADER: f32 = 16.0;
pub const EXPORT_COACHING_ITEM: f32 = 12.0;
pub const EXPORT_EQUIPMENT_HEIGHT: f32 = 14.0;
pub const EXPORT_VARIATIONS_HEIGHT: f32 = 14.0;
pub const EXPORT_PLAYERS_AREA_HEIGHT: f32 = 12.0;
/// 100pt image frame plus the title row above it
pub const EXPORT_IMAGE_MIN_HEIGHT: f32 = 130.0;

// =============================================================================
// Page Setup
// =============================================================================

pub const PREVIEW_PADDING: f32 = 48.0;
pub const PREVIEW_FIRST_HEADER: f32 = 220.0;
pub const PREVIEW_EQUIPMENT_BLOCK: f32 = 56.0;
pub const PREVIEW_CONTINUATION_HEADER: f32 = 60.0;
pub const PREVIEW_FOOTER: f32 = 80.0;
pub const PREVIEW_SPACING: f32 = 16.0;

pub const EXPORT_PADDING: f32 = 30.0;
pub const EXPORT_FIRST_HEADER: f32 = 130.0;
pub const EXPORT_EQUIPMENT_BLOCK: f32 = 34.0;
pub const EXPORT_CONTINUATION_HEADER: f32 = 30.0;
pub const EXPORT_FOOTER: f32 = 50.0;
pub const EXPORT_SPACING: f32 = 12.0;

/// Height measured preview cards fall back to when `Unmeasured::Flat` is used
pub const UNMEASURED_FLAT_HEIGHT: f32 = 100.0;
