use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[cfg(feature = "serde")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Unknown exercise: {0}")]
    UnknownExercise(ExerciseId),
    #[error("Invalid exercise order: {0}")]
    InvalidOrder(String),
    #[error("Load level must be between 1 and 10, got {0}")]
    InvalidLoadLevel(u8),
}

pub type Result<T> = std::result::Result<T, SessionError>;

/// Stable identity of an exercise within a session
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ExerciseId(pub String);

impl ExerciseId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric suffix of ids shaped like `exercise-<n>`
    pub(crate) fn sequence_number(&self) -> Option<u64> {
        self.0.strip_prefix("exercise-")?.parse().ok()
    }
}

impl std::fmt::Display for ExerciseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Phase of the session an exercise belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum ExerciseType {
    WarmUp,
    #[default]
    Main,
    CoolDown,
}

impl ExerciseType {
    pub const ALL: [ExerciseType; 3] = [
        ExerciseType::WarmUp,
        ExerciseType::Main,
        ExerciseType::CoolDown,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ExerciseType::WarmUp => "warm-up",
            ExerciseType::Main => "main",
            ExerciseType::CoolDown => "cool-down",
        }
    }

    /// Lenient parse used by imports; accepts `warmup`, `Warm Up`, etc.
    pub fn parse(value: &str) -> Option<Self> {
        let normalized: String = value
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect();
        match normalized.as_str() {
            "warmup" => Some(ExerciseType::WarmUp),
            "main" => Some(ExerciseType::Main),
            "cooldown" => Some(ExerciseType::CoolDown),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Intensity {
    Low,
    #[default]
    Medium,
    High,
}

impl Intensity {
    pub fn name(&self) -> &'static str {
        match self {
            Intensity::Low => "low",
            Intensity::Medium => "medium",
            Intensity::High => "high",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "low" => Some(Intensity::Low),
            "medium" => Some(Intensity::Medium),
            "high" => Some(Intensity::High),
            _ => None,
        }
    }
}

/// Picture attached to an exercise.
///
/// `image_url` is whatever the upload step resolved to: a remote object URL
/// or an inline `data:` reference. `diagram_snapshot` keeps the editable
/// vector state of a hand-drawn diagram so it can be reopened.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct Illustration {
    pub image_url: Option<String>,
    pub diagram_snapshot: Option<String>,
}

impl Illustration {
    pub fn image(url: impl Into<String>) -> Self {
        Self {
            image_url: Some(url.into()),
            diagram_snapshot: None,
        }
    }

    /// True when there is a renderable image reference
    pub fn has_image(&self) -> bool {
        self.image_url.as_deref().is_some_and(|url| !url.is_empty())
    }
}

/// One drill within a training session
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct Exercise {
    pub id: ExerciseId,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub kind: ExerciseType,
    pub categories: Vec<String>,
    pub duration_minutes: u32,
    pub description: String,
    pub equipment: String,
    pub players: String,
    pub area: String,
    pub intensity: Intensity,
    pub coaching_points: Vec<String>,
    pub variations: String,
    pub illustration: Option<Illustration>,
}

impl Default for Exercise {
    fn default() -> Self {
        Self {
            id: ExerciseId::default(),
            name: String::new(),
            kind: ExerciseType::default(),
            categories: Vec::new(),
            duration_minutes: 10,
            description: String::new(),
            equipment: String::new(),
            players: String::new(),
            area: String::new(),
            intensity: Intensity::default(),
            coaching_points: Vec::new(),
            variations: String::new(),
            illustration: None,
        }
    }
}

impl Exercise {
    /// Name shown on cards; blank names get a placeholder
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            "Untitled Exercise"
        } else {
            &self.name
        }
    }

    pub fn has_image(&self) -> bool {
        self.illustration.as_ref().is_some_and(Illustration::has_image)
    }
}

/// Top-level training plan record
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct Session {
    pub name: String,
    /// `YYYY-MM-DD`
    pub date: String,
    /// `HH:MM`
    pub time: String,
    pub duration_minutes: u32,
    pub players_count: u32,
    /// 1..=10
    pub load_level: u8,
    pub equipment: String,
    pub objectives: String,
    pub logo_url: Option<String>,
    pub exercises: Vec<Exercise>,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            name: String::new(),
            date: chrono::Local::now().date_naive().format("%Y-%m-%d").to_string(),
            time: "18:00".to_string(),
            duration_minutes: 90,
            players_count: 22,
            load_level: 6,
            equipment: String::new(),
            objectives: String::new(),
            logo_url: None,
            exercises: Vec::new(),
        }
    }
}

impl Session {
    /// Title shown in headers; blank names get a placeholder
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            "TRAINING SESSION"
        } else {
            &self.name
        }
    }

    pub fn has_logo(&self) -> bool {
        self.logo_url.as_deref().is_some_and(|url| !url.is_empty())
    }

    pub fn exercise(&self, id: &ExerciseId) -> Option<&Exercise> {
        self.exercises.iter().find(|ex| &ex.id == id)
    }
}

/// Field-level replacement of session metadata. `None` leaves a field as is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionPatch {
    pub name: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub duration_minutes: Option<u32>,
    pub players_count: Option<u32>,
    pub load_level: Option<u8>,
    pub equipment: Option<String>,
    pub objectives: Option<String>,
    /// `Some(None)` clears the logo
    pub logo_url: Option<Option<String>>,
}

/// Contents of a new exercise; the store assigns the id
#[derive(Debug, Clone, PartialEq)]
pub struct ExerciseDraft {
    pub name: String,
    pub kind: ExerciseType,
    pub categories: Vec<String>,
    pub duration_minutes: u32,
    pub description: String,
    pub equipment: String,
    pub players: String,
    pub area: String,
    pub intensity: Intensity,
    pub coaching_points: Vec<String>,
    pub variations: String,
    pub illustration: Option<Illustration>,
}

impl Default for ExerciseDraft {
    fn default() -> Self {
        let Exercise {
            name,
            kind,
            categories,
            duration_minutes,
            description,
            equipment,
            players,
            area,
            intensity,
            coaching_points,
            variations,
            illustration,
            ..
        } = Exercise::default();
        Self {
            name,
            kind,
            categories,
            duration_minutes,
            description,
            equipment,
            players,
            area,
            intensity,
            coaching_points,
            variations,
            illustration,
        }
    }
}

impl ExerciseDraft {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub(crate) fn into_exercise(self, id: ExerciseId) -> Exercise {
        Exercise {
            id,
            name: self.name,
            kind: self.kind,
            categories: self.categories,
            duration_minutes: self.duration_minutes,
            description: self.description,
            equipment: self.equipment,
            players: self.players,
            area: self.area,
            intensity: self.intensity,
            coaching_points: self.coaching_points,
            variations: self.variations,
            illustration: self.illustration,
        }
    }
}

/// Field-level replacement of one exercise. `None` leaves a field as is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExercisePatch {
    pub name: Option<String>,
    pub kind: Option<ExerciseType>,
    pub categories: Option<Vec<String>>,
    pub duration_minutes: Option<u32>,
    pub description: Option<String>,
    pub equipment: Option<String>,
    pub players: Option<String>,
    pub area: Option<String>,
    pub intensity: Option<Intensity>,
    pub coaching_points: Option<Vec<String>>,
    pub variations: Option<String>,
    /// `Some(None)` removes the illustration
    pub illustration: Option<Option<Illustration>>,
}

impl ExercisePatch {
    pub(crate) fn apply(self, exercise: &mut Exercise) {
        if let Some(name) = self.name {
            exercise.name = name;
        }
        if let Some(kind) = self.kind {
            exercise.kind = kind;
        }
        if let Some(categories) = self.categories {
            exercise.categories = categories;
        }
        if let Some(duration) = self.duration_minutes {
            exercise.duration_minutes = duration;
        }
        if let Some(description) = self.description {
            exercise.description = description;
        }
        if let Some(equipment) = self.equipment {
            exercise.equipment = equipment;
        }
        if let Some(players) = self.players {
            exercise.players = players;
        }
        if let Some(area) = self.area {
            exercise.area = area;
        }
        if let Some(intensity) = self.intensity {
            exercise.intensity = intensity;
        }
        if let Some(points) = self.coaching_points {
            exercise.coaching_points = points;
        }
        if let Some(variations) = self.variations {
            exercise.variations = variations;
        }
        if let Some(illustration) = self.illustration {
            exercise.illustration = illustration;
        }
    }
}
