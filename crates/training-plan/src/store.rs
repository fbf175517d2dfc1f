//! Owned session state and the operations allowed to change it

use crate::types::*;
use std::collections::HashSet;

/// Single source of truth for a session being edited.
///
/// Every successful mutation bumps `revision`, which downstream views use to
/// decide whether their derived state (pagination) is stale.
#[derive(Debug, Clone)]
pub struct SessionStore {
    session: Session,
    revision: u64,
    next_id: u64,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(Session::default())
    }
}

impl SessionStore {
    pub fn new(session: Session) -> Self {
        let next_id = session
            .exercises
            .iter()
            .filter_map(|ex| ex.id.sequence_number())
            .max()
            .map_or(1, |n| n + 1);
        Self {
            session,
            revision: 0,
            next_id,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn exercises(&self) -> &[Exercise] {
        &self.session.exercises
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn into_session(self) -> Session {
        self.session
    }

    fn touch(&mut self) {
        self.revision += 1;
    }

    fn exercise_mut(&mut self, id: &ExerciseId) -> Result<&mut Exercise> {
        self.session
            .exercises
            .iter_mut()
            .find(|ex| &ex.id == id)
            .ok_or_else(|| SessionError::UnknownExercise(id.clone()))
    }

    /// Replace the metadata fields present in `patch`
    pub fn update_session(&mut self, patch: SessionPatch) -> Result<()> {
        if let Some(level) = patch.load_level {
            if !(1..=10).contains(&level) {
                return Err(SessionError::InvalidLoadLevel(level));
            }
        }

        let session = &mut self.session;
        if let Some(name) = patch.name {
            session.name = name;
        }
        if let Some(date) = patch.date {
            session.date = date;
        }
        if let Some(time) = patch.time {
            session.time = time;
        }
        if let Some(duration) = patch.duration_minutes {
            session.duration_minutes = duration;
        }
        if let Some(players) = patch.players_count {
            session.players_count = players;
        }
        if let Some(level) = patch.load_level {
            session.load_level = level;
        }
        if let Some(equipment) = patch.equipment {
            session.equipment = equipment;
        }
        if let Some(objectives) = patch.objectives {
            session.objectives = objectives;
        }
        if let Some(logo) = patch.logo_url {
            session.logo_url = logo;
        }

        self.touch();
        Ok(())
    }

    /// Append an exercise and return its new id
    pub fn add_exercise(&mut self, draft: ExerciseDraft) -> ExerciseId {
        let id = ExerciseId(format!("exercise-{}", self.next_id));
        self.next_id += 1;

        log::debug!("Adding {} ({})", id, draft.name);
        self.session.exercises.push(draft.into_exercise(id.clone()));
        self.touch();
        id
    }

    pub fn update_exercise(&mut self, id: &ExerciseId, patch: ExercisePatch) -> Result<()> {
        patch.apply(self.exercise_mut(id)?);
        self.touch();
        Ok(())
    }

    pub fn remove_exercise(&mut self, id: &ExerciseId) -> Result<Exercise> {
        let index = self
            .session
            .exercises
            .iter()
            .position(|ex| &ex.id == id)
            .ok_or_else(|| SessionError::UnknownExercise(id.clone()))?;

        let removed = self.session.exercises.remove(index);
        self.touch();
        Ok(removed)
    }

    /// Put the exercises in the given order.
    ///
    /// `order` must name every current exercise exactly once.
    pub fn reorder_exercises(&mut self, order: &[ExerciseId]) -> Result<()> {
        let current = &self.session.exercises;
        if order.len() != current.len() {
            return Err(SessionError::InvalidOrder(format!(
                "expected {} ids, got {}",
                current.len(),
                order.len()
            )));
        }

        let known: HashSet<&ExerciseId> = current.iter().map(|ex| &ex.id).collect();
        let mut seen = HashSet::new();
        for id in order {
            if !known.contains(id) {
                return Err(SessionError::UnknownExercise(id.clone()));
            }
            if !seen.insert(id) {
                return Err(SessionError::InvalidOrder(format!("{} listed twice", id)));
            }
        }

        let mut remaining = std::mem::take(&mut self.session.exercises);
        let mut reordered = Vec::with_capacity(remaining.len());
        for id in order {
            if let Some(index) = remaining.iter().position(|ex| &ex.id == id) {
                reordered.push(remaining.swap_remove(index));
            }
        }

        self.session.exercises = reordered;
        self.touch();
        Ok(())
    }

    /// Move one exercise to `position` (clamped to the end)
    pub fn move_exercise(&mut self, id: &ExerciseId, position: usize) -> Result<()> {
        let mut order: Vec<ExerciseId> = self.exercises().iter().map(|ex| ex.id.clone()).collect();
        let from = order
            .iter()
            .position(|other| other == id)
            .ok_or_else(|| SessionError::UnknownExercise(id.clone()))?;
        let moved = order.remove(from);
        order.insert(position.min(order.len()), moved);
        self.reorder_exercises(&order)
    }

    /// Append a trimmed coaching point; blank input is ignored
    pub fn add_coaching_point(&mut self, id: &ExerciseId, point: &str) -> Result<()> {
        let point = point.trim();
        let exercise = self.exercise_mut(id)?;
        if point.is_empty() {
            return Ok(());
        }
        exercise.coaching_points.push(point.to_string());
        self.touch();
        Ok(())
    }

    /// Remove the coaching point at `index`; out-of-range indices are ignored
    pub fn remove_coaching_point(&mut self, id: &ExerciseId, index: usize) -> Result<()> {
        let exercise = self.exercise_mut(id)?;
        if index >= exercise.coaching_points.len() {
            return Ok(());
        }
        exercise.coaching_points.remove(index);
        self.touch();
        Ok(())
    }

    /// Start over with a fresh session
    pub fn reset(&mut self) {
        self.session = Session::default();
        self.next_id = 1;
        self.touch();
    }
}
