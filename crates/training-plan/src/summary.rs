use crate::paginate::Pagination;
use crate::types::*;
use chrono::NaiveDate;

/// Figures shown alongside a session plan
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSummary {
    pub exercise_count: usize,
    /// Sum of the exercise durations
    pub total_exercise_minutes: u32,
    /// Duration entered in the session header
    pub planned_minutes: u32,
    /// Minutes per exercise type, in `ExerciseType::ALL` order
    pub minutes_by_type: Vec<(ExerciseType, u32)>,
    pub coaching_points: usize,
    pub illustrated: usize,
    pub page_count: Option<usize>,
}

impl SessionSummary {
    pub fn from_session(session: &Session) -> Self {
        let minutes_by_type = ExerciseType::ALL
            .iter()
            .map(|kind| {
                let minutes = session
                    .exercises
                    .iter()
                    .filter(|ex| ex.kind == *kind)
                    .fold(0u32, |total, ex| total.saturating_add(ex.duration_minutes));
                (*kind, minutes)
            })
            .collect();

        Self {
            exercise_count: session.exercises.len(),
            total_exercise_minutes: total_duration(session),
            planned_minutes: session.duration_minutes,
            minutes_by_type,
            coaching_points: session
                .exercises
                .iter()
                .map(|ex| ex.coaching_points.len())
                .sum(),
            illustrated: session.exercises.iter().filter(|ex| ex.has_image()).count(),
            page_count: None,
        }
    }

    pub fn with_pagination(mut self, pagination: &Pagination) -> Self {
        self.page_count = Some(pagination.page_count());
        self
    }

    /// Positive when the exercises run longer than the planned session
    pub fn overrun_minutes(&self) -> i64 {
        self.total_exercise_minutes as i64 - self.planned_minutes as i64
    }
}

/// Sum of all exercise durations, saturating at `u32::MAX`
pub fn total_duration(session: &Session) -> u32 {
    session
        .exercises
        .iter()
        .fold(0u32, |total, ex| total.saturating_add(ex.duration_minutes))
}

/// Condense free-text objectives into tags such as `TECH/TACT`
pub fn objectives_abbreviation(objectives: &str) -> String {
    const TAGS: [(&[&str], &str); 4] = [
        (&["technical", "technique"], "TECH"),
        (&["tactical", "tactics"], "TACT"),
        (&["physical", "fitness"], "PHYS"),
        (&["mental", "psychological"], "MENT"),
    ];

    let text = objectives.to_lowercase();
    let tags: Vec<&str> = TAGS
        .iter()
        .filter(|(keywords, _)| keywords.iter().any(|k| text.contains(k)))
        .map(|(_, tag)| *tag)
        .collect();

    if tags.is_empty() {
        "GENERAL".to_string()
    } else {
        tags.join("/")
    }
}

/// Render `YYYY-MM-DD` as `March 4, 2025`; anything else comes back as is
pub fn format_session_date(date: &str) -> String {
    match NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d") {
        Ok(parsed) => parsed.format("%B %-d, %Y").to_string(),
        Err(_) => date.to_string(),
    }
}

/// Green to red gradient for a load level, clamped to 1..=10
pub fn load_level_color(level: u8) -> (u8, u8, u8) {
    let clamped = level.clamp(1, 10) as f32;
    let normalized = (clamped - 1.0) / 9.0;

    let (from, to, t) = if normalized <= 0.44 {
        ((16.0, 185.0, 129.0), (245.0, 234.0, 20.0), normalized / 0.44)
    } else if normalized <= 0.66 {
        (
            (245.0, 234.0, 20.0),
            (249.0, 115.0, 22.0),
            (normalized - 0.44) / 0.22,
        )
    } else {
        (
            (249.0, 115.0, 22.0),
            (239.0, 68.0, 68.0),
            (normalized - 0.66) / 0.34,
        )
    };

    let lerp = |a: f32, b: f32| (a + (b - a) * t).round() as u8;
    (lerp(from.0, to.0), lerp(from.1, to.1), lerp(from.2, to.2))
}
