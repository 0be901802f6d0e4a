//! Step sequencer for the guided session
//!
//! Tracks the active step and the (exercise, set) cursor. Set counts are
//! always read from the session passed in, never cached, because extra sets
//! can be appended while the session runs.

use crate::models::TrainingSession;
use crate::{MysetError, Result};

/// Screens of the guided flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrainingStep {
    /// Today's menu, before the first set
    #[default]
    Menu,
    /// Entering values for the current set
    Workout,
    /// Resting after a completed set
    Interval,
    /// Summary and save
    Finish,
}

impl TrainingStep {
    pub fn label(&self) -> &'static str {
        match self {
            TrainingStep::Menu => "Menu",
            TrainingStep::Workout => "Training",
            TrainingStep::Interval => "Rest",
            TrainingStep::Finish => "Finish",
        }
    }
}

/// Cursor into the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub exercise: usize,
    pub set: usize,
}

impl Position {
    pub fn new(exercise: usize, set: usize) -> Self {
        Self { exercise, set }
    }
}

#[derive(Debug, Clone, Default)]
pub struct StepSequencer {
    step: TrainingStep,
    position: Position,
}

impl StepSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> TrainingStep {
        self.step
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// Menu -> first set of the first exercise that has sets
    pub fn start(&mut self, session: &TrainingSession) -> Result<()> {
        self.expect(&[TrainingStep::Menu], "start")?;
        match first_with_sets(session, 0) {
            Some(exercise) => self.go_workout(Position::new(exercise, 0)),
            None => self.step = TrainingStep::Finish,
        }
        Ok(())
    }

    /// Workout -> Interval after a set is confirmed
    pub fn complete_set(&mut self) -> Result<()> {
        self.expect(&[TrainingStep::Workout], "complete a set")?;
        self.step = TrainingStep::Interval;
        Ok(())
    }

    /// Interval -> next set, next exercise or finish
    pub fn advance(&mut self, session: &TrainingSession) -> Result<()> {
        self.expect(&[TrainingStep::Interval], "advance")?;
        let sets = session
            .exercises
            .get(self.position.exercise)
            .map(|e| e.set_count())
            .unwrap_or(0);

        if self.position.set + 1 < sets {
            self.go_workout(Position::new(self.position.exercise, self.position.set + 1));
        } else {
            self.next_exercise(session);
        }
        Ok(())
    }

    /// Interval -> first set of the next exercise, dropping remaining sets
    pub fn skip_exercise(&mut self, session: &TrainingSession) -> Result<()> {
        self.expect(&[TrainingStep::Interval], "skip to the next exercise")?;
        self.next_exercise(session);
        Ok(())
    }

    /// Interval -> Workout on another set of the current exercise
    pub fn jump_to_set(&mut self, session: &TrainingSession, set: usize) -> Result<()> {
        self.expect(&[TrainingStep::Interval], "jump to a set")?;
        let sets = session
            .exercises
            .get(self.position.exercise)
            .map(|e| e.set_count())
            .unwrap_or(0);
        if set >= sets {
            return Err(MysetError::InvalidTransition(format!(
                "exercise {} has no set {}",
                self.position.exercise + 1,
                set + 1
            )));
        }
        self.go_workout(Position::new(self.position.exercise, set));
        Ok(())
    }

    /// Workout or Interval -> Finish
    pub fn end(&mut self) -> Result<()> {
        self.expect(&[TrainingStep::Workout, TrainingStep::Interval], "end training")?;
        self.step = TrainingStep::Finish;
        Ok(())
    }

    /// Whether the cursor sits on the last set of its exercise
    pub fn is_last_set(&self, session: &TrainingSession) -> bool {
        session
            .exercises
            .get(self.position.exercise)
            .map(|e| self.position.set + 1 >= e.set_count())
            .unwrap_or(false)
    }

    /// Index of the next exercise with sets after the current one
    pub fn next_exercise_index(&self, session: &TrainingSession) -> Option<usize> {
        first_with_sets(session, self.position.exercise + 1)
    }

    fn next_exercise(&mut self, session: &TrainingSession) {
        match self.next_exercise_index(session) {
            Some(exercise) => self.go_workout(Position::new(exercise, 0)),
            None => self.step = TrainingStep::Finish,
        }
    }

    fn go_workout(&mut self, position: Position) {
        self.position = position;
        self.step = TrainingStep::Workout;
    }

    fn expect(&self, allowed: &[TrainingStep], action: &str) -> Result<()> {
        if allowed.contains(&self.step) {
            Ok(())
        } else {
            Err(MysetError::InvalidTransition(format!(
                "cannot {} from {:?}",
                action, self.step
            )))
        }
    }
}

/// First exercise at or after `from` that has at least one set
fn first_with_sets(session: &TrainingSession, from: usize) -> Option<usize> {
    session
        .exercises
        .iter()
        .enumerate()
        .skip(from)
        .find(|(_, e)| e.set_count() > 0)
        .map(|(i, _)| i)
}
