//! Exercise height estimation
//!
//! Two interchangeable providers answer "how tall is this exercise block":
//! [`HeightEstimator`] computes it from the exercise's content, and
//! [`MeasuredHeights`] reports heights recorded from a rendered preview.

use crate::constants::*;
use crate::options::RenderContext;
use crate::types::{Exercise, ExerciseId};
use std::collections::HashMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Anything that can report the rendered height of an exercise block
pub trait HeightProvider {
    fn height(&self, exercise: &Exercise) -> f32;
}

impl<F> HeightProvider for F
where
    F: Fn(&Exercise) -> f32,
{
    fn height(&self, exercise: &Exercise) -> f32 {
        self(exercise)
    }
}

/// Constants driving the content-based estimate
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EstimateProfile {
    pub base_height: f32,
    pub chars_per_line: usize,
    pub line_height: f32,
    pub coaching_header: f32,
    pub coaching_item: f32,
    pub equipment_height: f32,
    pub variations_height: f32,
    pub players_area_height: f32,
    /// Floor applied when an image is attached
    pub image_min_height: f32,
}

impl EstimateProfile {
    pub fn preview() -> Self {
        Self {
            base_height: PREVIEW_BASE_HEIGHT,
            chars_per_line: PREVIEW_CHARS_PER_LINE,
            line_height: PREVIEW_LINE_HEIGHT,
            coaching_header: PREVIEW_COACHING_HEADER,
            coaching_item: PREVIEW_COACHING_ITEM,
            equipment_height: PREVIEW_EQUIPMENT_HEIGHT,
            variations_height: PREVIEW_VARIATIONS_HEIGHT,
            players_area_height: PREVIEW_PLAYERS_AREA_HEIGHT,
            image_min_height: PREVIEW_IMAGE_MIN_HEIGHT,
        }
    }

    pub fn export() -> Self {
        Self {
            base_height: EXPORT_BASE_HEIGHT,
            chars_per_line: EXPORT_CHARS_PER_LINE,
            line_height: EXPORT_LINE_HEIGHT,
            coaching_header: EXPORT_COACHING_HEADER,
            coaching_item: EXPORT_COACHING_ITEM,
            equipment_height: EXPORT_EQUIPMENT_HEIGHT,
            variations_height: EXPORT_VARIATIONS_HEIGHT,
            players_area_height: EXPORT_PLAYERS_AREA_HEIGHT,
            image_min_height: EXPORT_IMAGE_MIN_HEIGHT,
        }
    }

    pub fn for_context(context: RenderContext) -> Self {
        match context {
            RenderContext::Preview => Self::preview(),
            RenderContext::Export => Self::export(),
        }
    }

    /// Lines a description is assumed to take. Renderers must not draw more
    /// lines than this or the block outgrows its estimate.
    pub fn description_lines(&self, text: &str) -> usize {
        text.chars().count().div_ceil(self.chars_per_line.max(1))
    }
}

/// Content-based fallback estimator
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeightEstimator {
    profile: EstimateProfile,
}

impl HeightEstimator {
    pub fn new(profile: EstimateProfile) -> Self {
        Self { profile }
    }

    pub fn for_context(context: RenderContext) -> Self {
        Self::new(EstimateProfile::for_context(context))
    }

    pub fn profile(&self) -> &EstimateProfile {
        &self.profile
    }

    /// Estimate the block height of one exercise.
    ///
    /// Every term is additive and non-negative and the image rule is a floor,
    /// so adding content never lowers the result.
    pub fn estimate(&self, exercise: &Exercise) -> f32 {
        let p = &self.profile;
        let mut height = p.base_height.max(0.0);

        if !exercise.description.is_empty() {
            height += p.description_lines(&exercise.description) as f32
                * p.line_height.max(0.0);
        }

        if !exercise.coaching_points.is_empty() {
            height += p.coaching_header.max(0.0)
                + exercise.coaching_points.len() as f32 * p.coaching_item.max(0.0);
        }

        if !exercise.equipment.is_empty() {
            height += p.equipment_height.max(0.0);
        }

        if !exercise.variations.is_empty() {
            height += p.variations_height.max(0.0);
        }

        if !exercise.players.is_empty() || !exercise.area.is_empty() {
            height += p.players_area_height.max(0.0);
        }

        if exercise.has_image() {
            height = height.max(p.image_min_height);
        }

        if height.is_finite() {
            height.max(MIN_BLOCK_HEIGHT)
        } else {
            MIN_BLOCK_HEIGHT
        }
    }
}

impl Default for HeightEstimator {
    fn default() -> Self {
        Self::for_context(RenderContext::Export)
    }
}

impl HeightProvider for HeightEstimator {
    fn height(&self, exercise: &Exercise) -> f32 {
        self.estimate(exercise)
    }
}

/// What to report for an exercise that has no recorded measurement
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Unmeasured {
    /// Fall back to the content-based estimate
    Estimate(HeightEstimator),
    /// Use a fixed height
    Flat(f32),
}

impl Default for Unmeasured {
    fn default() -> Self {
        Unmeasured::Estimate(HeightEstimator::for_context(RenderContext::Preview))
    }
}

/// Heights measured from rendered preview cards, keyed by exercise id
#[derive(Debug, Clone, Default)]
pub struct MeasuredHeights {
    heights: HashMap<ExerciseId, f32>,
    unmeasured: Unmeasured,
    generation: u64,
}

impl MeasuredHeights {
    pub fn new(unmeasured: Unmeasured) -> Self {
        Self {
            heights: HashMap::new(),
            unmeasured,
            generation: 0,
        }
    }

    /// Record a measurement. Non-finite or non-positive values are ignored.
    pub fn record(&mut self, id: ExerciseId, height: f32) {
        if !(height.is_finite() && height > 0.0) {
            log::debug!("Ignoring unusable measurement {} for {}", height, id);
            return;
        }
        if self.heights.get(&id) != Some(&height) {
            self.heights.insert(id, height);
            self.generation += 1;
        }
    }

    /// Drop measurements of exercises no longer in `exercises`; returns how
    /// many were dropped
    pub fn prune(&mut self, exercises: &[Exercise]) -> usize {
        let before = self.heights.len();
        self.heights
            .retain(|id, _| exercises.iter().any(|ex| &ex.id == id));
        let dropped = before - self.heights.len();
        if dropped > 0 {
            self.generation += 1;
        }
        dropped
    }

    pub fn clear(&mut self) {
        if !self.heights.is_empty() {
            self.heights.clear();
            self.generation += 1;
        }
    }

    pub fn measured(&self, id: &ExerciseId) -> Option<f32> {
        self.heights.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.heights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heights.is_empty()
    }

    /// Bumped whenever the recorded heights change
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Load measurements from a JSON object of `{ "exercise-id": height }`
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<std::path::Path>, unmeasured: Unmeasured) -> crate::Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let raw: HashMap<String, f32> = serde_json::from_slice(&bytes)?;
        let mut heights = Self::new(unmeasured);
        for (id, height) in raw {
            heights.record(ExerciseId(id), height);
        }
        Ok(heights)
    }
}

impl HeightProvider for MeasuredHeights {
    fn height(&self, exercise: &Exercise) -> f32 {
        match self.heights.get(&exercise.id) {
            Some(height) => *height,
            None => match self.unmeasured {
                Unmeasured::Estimate(estimator) => estimator.estimate(exercise),
                Unmeasured::Flat(height) if height.is_finite() && height > 0.0 => height,
                Unmeasured::Flat(_) => UNMEASURED_FLAT_HEIGHT,
            },
        }
    }
}
