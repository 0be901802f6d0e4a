//! Guided session controller
//!
//! `GuidedSession` is the single owner of a running session. Screens read
//! from it and call its transitions; nothing else mutates the session.

use std::time::Duration;

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use super::finish::{build_request, FinishState, SaveStatus, SessionSummary};
use super::progress::progress_percent;
use super::recorder::{RecordedSet, SetDraft};
use super::sequencer::{Position, StepSequencer, TrainingStep};
use super::timer::{RestTimer, TimerEvent};
use crate::error::user_friendly_message;
use crate::models::{
    CreateTrainingSessionRequest, Exercise, PreviousSession, PreviousSet, SaveAck, SetValues,
    TrainingSession,
};
use crate::{MysetError, Result};

/// What follows the set that was just completed
#[derive(Debug, Clone, PartialEq)]
pub enum UpNext {
    /// Another set of the same exercise
    Set {
        exercise: String,
        set_number: usize,
        values: SetValues,
        unit: String,
    },
    /// First set of the next exercise
    Exercise { name: String, sets: usize },
    Finish,
}

#[derive(Debug, Clone)]
pub struct GuidedSession {
    session: TrainingSession,
    previous: Option<PreviousSession>,
    sequencer: StepSequencer,
    timer: RestTimer,
    interval_memo: String,
    finish: FinishState,
    epoch: u64,
}

impl GuidedSession {
    pub fn new(
        session: TrainingSession,
        previous: Option<PreviousSession>,
        rest_secs: u64,
        epoch: u64,
    ) -> Self {
        Self {
            session,
            previous,
            sequencer: StepSequencer::new(),
            timer: RestTimer::new(rest_secs),
            interval_memo: String::new(),
            finish: FinishState::new(),
            epoch,
        }
    }

    pub fn session(&self) -> &TrainingSession {
        &self.session
    }

    pub fn previous(&self) -> Option<&PreviousSession> {
        self.previous.as_ref()
    }

    pub fn step(&self) -> TrainingStep {
        self.sequencer.step()
    }

    pub fn position(&self) -> Position {
        self.sequencer.position()
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn timer(&self) -> &RestTimer {
        &self.timer
    }

    pub fn timer_mut(&mut self) -> &mut RestTimer {
        &mut self.timer
    }

    pub fn finish(&self) -> &FinishState {
        &self.finish
    }

    pub fn interval_memo(&self) -> &str {
        &self.interval_memo
    }

    pub fn current_exercise(&self) -> Option<&Exercise> {
        self.session.exercises.get(self.position().exercise)
    }

    /// Previous-session set at the cursor, if any
    pub fn previous_set(&self) -> Option<&PreviousSet> {
        let pos = self.position();
        self.previous
            .as_ref()?
            .set_for(&self.session, pos.exercise, pos.set)
    }

    /// Menu -> Workout
    pub fn start(&mut self) -> Result<()> {
        self.sequencer.start(&self.session)?;
        info!(myset = self.session.id, step = self.step().label(), "training started");
        Ok(())
    }

    /// Fresh draft for the set under the cursor
    pub fn draft(&self) -> Result<SetDraft> {
        let pos = self.position();
        let exercise = self.current_exercise().ok_or_else(|| {
            MysetError::InvalidSet(format!("no exercise at index {}", pos.exercise))
        })?;
        SetDraft::for_position(exercise, pos.set, self.previous_set())
    }

    /// Merge confirmed values into the current set and start resting
    pub fn complete_set(&mut self, values: SetValues) -> Result<()> {
        if self.step() != TrainingStep::Workout {
            return Err(MysetError::InvalidTransition(format!(
                "cannot complete a set from {:?}",
                self.step()
            )));
        }
        let pos = self.position();
        let exercise = self.session.exercises.get_mut(pos.exercise).ok_or_else(|| {
            MysetError::InvalidSet(format!("no exercise at index {}", pos.exercise))
        })?;
        exercise.record(pos.set, values)?;
        self.sequencer.complete_set()?;
        self.timer.reset();
        self.interval_memo.clear();
        debug!(exercise = pos.exercise, set = pos.set, "set completed");
        Ok(())
    }

    /// Confirm a draft and complete the set with its values
    pub fn confirm_draft(&mut self, draft: &SetDraft) -> Result<RecordedSet> {
        let recorded = draft.confirm();
        self.complete_set(recorded.values.clone())?;
        Ok(recorded)
    }

    /// Replace the memo typed during the rest interval
    pub fn set_interval_memo(&mut self, memo: impl Into<String>) {
        self.interval_memo = memo.into();
    }

    pub fn push_memo_char(&mut self, c: char) {
        self.interval_memo.push(c);
    }

    pub fn pop_memo_char(&mut self) {
        self.interval_memo.pop();
    }

    /// Interval -> next set, next exercise or finish
    pub fn finish_interval(&mut self) -> Result<()> {
        self.expect_interval("finish the interval")?;
        self.flush_interval_memo()?;
        self.sequencer.advance(&self.session)
    }

    /// Interval -> first set of the next exercise
    pub fn skip_to_next_exercise(&mut self) -> Result<()> {
        self.expect_interval("skip to the next exercise")?;
        self.flush_interval_memo()?;
        self.sequencer.skip_exercise(&self.session)
    }

    /// Workout or Interval -> Finish
    pub fn end_training(&mut self) -> Result<()> {
        match self.step() {
            TrainingStep::Interval => self.flush_interval_memo()?,
            TrainingStep::Workout => {}
            step => {
                return Err(MysetError::InvalidTransition(format!(
                    "cannot end training from {:?}",
                    step
                )))
            }
        }
        self.sequencer.end()?;
        info!(done = self.session.done_sets(), "training ended");
        Ok(())
    }

    /// Append a copy of the last set and go straight back to it.
    /// Only offered after the last set of an exercise.
    pub fn add_extra_set(&mut self) -> Result<usize> {
        self.expect_interval("add an extra set")?;
        if !self.is_last_set_of_exercise() {
            return Err(MysetError::InvalidTransition(
                "extra sets can only follow the last set of an exercise".to_string(),
            ));
        }
        self.flush_interval_memo()?;
        let pos = self.position();
        let exercise = self.session.exercises.get_mut(pos.exercise).ok_or_else(|| {
            MysetError::InvalidSet(format!("no exercise at index {}", pos.exercise))
        })?;
        let index = exercise.duplicate_last_set()?;
        self.sequencer.jump_to_set(&self.session, index)?;
        debug!(exercise = pos.exercise, set = index, "extra set added");
        Ok(index)
    }

    /// Feed elapsed time to the rest timer. Returns true when the interval
    /// expired and the session moved on.
    pub fn tick(&mut self, elapsed: Duration) -> Result<bool> {
        if self.step() != TrainingStep::Interval {
            return Ok(false);
        }
        match self.timer.tick(elapsed) {
            TimerEvent::Expired => {
                debug!("rest interval expired");
                self.finish_interval()?;
                Ok(true)
            }
            TimerEvent::Idle | TimerEvent::Ticked => Ok(false),
        }
    }

    pub fn is_last_set_of_exercise(&self) -> bool {
        self.sequencer.is_last_set(&self.session)
    }

    pub fn has_next_exercise(&self) -> bool {
        self.sequencer.next_exercise_index(&self.session).is_some()
    }

    /// What the next natural advance leads to
    pub fn up_next(&self) -> UpNext {
        let pos = self.position();
        if let Some(exercise) = self.current_exercise() {
            if let Some(next) = exercise.get_set(pos.set + 1) {
                return UpNext::Set {
                    exercise: exercise.name.clone(),
                    set_number: pos.set + 2,
                    values: next.values.clone(),
                    unit: exercise.unit.clone(),
                };
            }
        }
        match self
            .sequencer
            .next_exercise_index(&self.session)
            .and_then(|i| self.session.exercises.get(i))
        {
            Some(next) => UpNext::Exercise {
                name: next.name.clone(),
                sets: next.set_count(),
            },
            None => UpNext::Finish,
        }
    }

    pub fn progress(&self) -> f64 {
        let pos = self.position();
        let sets = self.current_exercise().map(Exercise::set_count).unwrap_or(0);
        progress_percent(self.step(), pos, self.session.exercises.len(), sets)
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary::of(&self.session)
    }

    pub fn set_notes(&mut self, notes: impl Into<String>) {
        self.finish.notes = notes.into();
    }

    pub fn notes_mut(&mut self) -> &mut String {
        &mut self.finish.notes
    }

    /// Mark the save as in flight and build its payload
    pub fn begin_save(&mut self, date: NaiveDate) -> Result<CreateTrainingSessionRequest> {
        if self.step() != TrainingStep::Finish {
            return Err(MysetError::InvalidTransition(format!(
                "cannot save from {:?}",
                self.step()
            )));
        }
        match self.finish.status {
            SaveStatus::Saving => {
                return Err(MysetError::InvalidTransition(
                    "a save is already in progress".to_string(),
                ))
            }
            SaveStatus::Saved(_) => {
                return Err(MysetError::InvalidTransition(
                    "session is already saved".to_string(),
                ))
            }
            SaveStatus::Idle | SaveStatus::Failed(_) => {}
        }
        let request = build_request(&self.session, &self.finish.notes, date);
        self.finish.status = SaveStatus::Saving;
        self.finish.confirm_discard = false;
        info!(myset = self.session.id, date = %request.date, "saving session");
        Ok(request)
    }

    /// Apply the outcome of a save started with `begin_save`
    pub fn save_finished(&mut self, outcome: Result<SaveAck>) {
        self.finish.status = match outcome {
            Ok(ack) if ack.success => {
                info!(id = ?ack.id, "session saved");
                SaveStatus::Saved(ack.id)
            }
            Ok(_) => {
                warn!("server reported the save as unsuccessful");
                SaveStatus::Failed("The server did not accept the session.".to_string())
            }
            Err(err) => {
                warn!(error = %err, "save failed");
                SaveStatus::Failed(user_friendly_message(&err))
            }
        };
    }

    /// Ask for discard confirmation
    pub fn request_discard(&mut self) {
        if !self.finish.status.is_saving() {
            self.finish.confirm_discard = true;
        }
    }

    pub fn cancel_discard(&mut self) {
        self.finish.confirm_discard = false;
    }

    /// Whether a discard was asked for and may proceed
    pub fn discard_confirmed(&self) -> bool {
        self.finish.confirm_discard && !self.finish.status.is_saving()
    }

    fn expect_interval(&self, action: &str) -> Result<()> {
        if self.step() == TrainingStep::Interval {
            Ok(())
        } else {
            Err(MysetError::InvalidTransition(format!(
                "cannot {} from {:?}",
                action,
                self.step()
            )))
        }
    }

    /// Attach the interval memo to the set that was just completed
    fn flush_interval_memo(&mut self) -> Result<()> {
        let memo = std::mem::take(&mut self.interval_memo);
        if memo.trim().is_empty() {
            return Ok(());
        }
        let pos = self.position();
        if let Some(exercise) = self.session.exercises.get_mut(pos.exercise) {
            exercise.set_memo(pos.set, &memo)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExerciseKind, WorkoutSet};

    fn weight(w: f64, r: u32) -> SetValues {
        SetValues::Weight { weight: w, reps: r }
    }

    fn guided() -> GuidedSession {
        let bench = Exercise::new(
            "Bench Press",
            ExerciseKind::Weight,
            "kg",
            vec![WorkoutSet::planned(weight(60.0, 10)), WorkoutSet::planned(weight(65.0, 8))],
        )
        .unwrap();
        let row = Exercise::new(
            "Row",
            ExerciseKind::Weight,
            "kg",
            vec![WorkoutSet::planned(weight(40.0, 12))],
        )
        .unwrap();
        GuidedSession::new(TrainingSession::new(1, "Push Day", vec![bench, row]), None, 60, 1)
    }

    #[test]
    fn test_complete_set_moves_to_interval() {
        let mut g = guided();
        assert!(g.complete_set(weight(1.0, 1)).is_err());
        g.start().unwrap();
        g.complete_set(weight(62.5, 10)).unwrap();
        assert_eq!(g.step(), TrainingStep::Interval);
        assert!(g.timer().is_fresh());
        assert!(g.session().exercises[0].get_set(0).unwrap().done);
    }

    #[test]
    fn test_wrong_kind_leaves_state() {
        let mut g = guided();
        g.start().unwrap();
        let err = g
            .complete_set(SetValues::Distance { distance: 1.0, time: String::new() })
            .unwrap_err();
        assert!(matches!(err, MysetError::InvalidSet(_)));
        assert_eq!(g.step(), TrainingStep::Workout);
    }

    #[test]
    fn test_interval_memo_attached_on_every_exit() {
        let mut g = guided();
        g.start().unwrap();
        g.complete_set(weight(60.0, 10)).unwrap();
        g.set_interval_memo("slow negatives");
        g.finish_interval().unwrap();
        assert_eq!(
            g.session().exercises[0].get_set(0).unwrap().memo.as_deref(),
            Some("slow negatives")
        );

        g.complete_set(weight(65.0, 8)).unwrap();
        g.push_memo_char('x');
        g.end_training().unwrap();
        assert_eq!(g.session().exercises[0].get_set(1).unwrap().memo.as_deref(), Some("x"));
    }

    #[test]
    fn test_expiry_advances() {
        let mut g = guided();
        g.start().unwrap();
        g.complete_set(weight(60.0, 10)).unwrap();
        assert!(!g.tick(Duration::from_secs(120)).unwrap());
        g.timer_mut().start();
        assert!(g.tick(Duration::from_secs(60)).unwrap());
        assert_eq!(g.step(), TrainingStep::Workout);
        assert_eq!(g.position(), Position::new(0, 1));
    }

    #[test]
    fn test_extra_set_only_after_last_set() {
        let mut g = guided();
        g.start().unwrap();
        g.complete_set(weight(60.0, 10)).unwrap();
        assert!(g.add_extra_set().is_err());
        g.finish_interval().unwrap();
        g.complete_set(weight(67.5, 6)).unwrap();
        assert_eq!(g.add_extra_set().unwrap(), 2);
        assert_eq!(g.step(), TrainingStep::Workout);
        assert_eq!(g.position(), Position::new(0, 2));
        let extra = g.session().exercises[0].get_set(2).unwrap();
        assert_eq!(extra.values, weight(67.5, 6));
        assert!(!extra.done);
    }

    #[test]
    fn test_up_next() {
        let mut g = guided();
        g.start().unwrap();
        g.complete_set(weight(60.0, 10)).unwrap();
        assert_eq!(
            g.up_next(),
            UpNext::Set {
                exercise: "Bench Press".into(),
                set_number: 2,
                values: weight(65.0, 8),
                unit: "kg".into()
            }
        );
        g.finish_interval().unwrap();
        g.complete_set(weight(65.0, 8)).unwrap();
        assert_eq!(g.up_next(), UpNext::Exercise { name: "Row".into(), sets: 1 });
        g.skip_to_next_exercise().unwrap();
        g.complete_set(weight(40.0, 12)).unwrap();
        assert_eq!(g.up_next(), UpNext::Finish);
        assert!(!g.has_next_exercise());
    }

    #[test]
    fn test_save_lifecycle() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let mut g = guided();
        g.start().unwrap();
        assert!(g.begin_save(date).is_err());
        g.complete_set(weight(60.0, 10)).unwrap();
        g.end_training().unwrap();

        let req = g.begin_save(date).unwrap();
        assert_eq!(req.workouts[0].sets.len(), 1);
        assert!(g.begin_save(date).is_err());
        g.request_discard();
        assert!(!g.discard_confirmed());

        g.save_finished(Err(MysetError::Api { status: None, message: "down".into() }));
        assert!(matches!(g.finish().status, SaveStatus::Failed(_)));
        assert_eq!(g.session().done_sets(), 1);

        g.begin_save(date).unwrap();
        g.save_finished(Ok(SaveAck { success: true, id: Some(9) }));
        assert_eq!(g.finish().status, SaveStatus::Saved(Some(9)));
    }

    #[test]
    fn test_discard_confirmation() {
        let mut g = guided();
        g.start().unwrap();
        g.end_training().unwrap();
        assert!(!g.discard_confirmed());
        g.request_discard();
        assert!(g.discard_confirmed());
        g.cancel_discard();
        assert!(!g.discard_confirmed());
    }
}
