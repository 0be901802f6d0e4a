//! Training session data models
//!
//! Typed in-memory representation of a guided session. Every set carries
//! values matching its exercise kind, which replaces the wire format's
//! "every field optional" shape.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{MysetError, Result};

/// Whether an exercise is measured by load or by distance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExerciseKind {
    /// Weight x reps
    Weight,
    /// Distance x time
    Distance,
}

impl ExerciseKind {
    /// Wire tag
    pub fn as_str(&self) -> &'static str {
        match self {
            ExerciseKind::Weight => "weight",
            ExerciseKind::Distance => "distance",
        }
    }

    /// Empty values of this kind
    pub fn empty_values(&self) -> SetValues {
        match self {
            ExerciseKind::Weight => SetValues::Weight { weight: 0.0, reps: 0 },
            ExerciseKind::Distance => SetValues::Distance {
                distance: 0.0,
                time: String::new(),
            },
        }
    }
}

impl fmt::Display for ExerciseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Recorded or planned values of one set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SetValues {
    Weight { weight: f64, reps: u32 },
    Distance { distance: f64, time: String },
}

impl SetValues {
    /// Kind these values belong to
    pub fn kind(&self) -> ExerciseKind {
        match self {
            SetValues::Weight { .. } => ExerciseKind::Weight,
            SetValues::Distance { .. } => ExerciseKind::Distance,
        }
    }

    /// Short label such as `60 kg x 10` or `5 km in 25:00`
    pub fn describe(&self, unit: &str) -> String {
        match self {
            SetValues::Weight { weight, reps } => {
                format!("{} {} x {}", trim_number(*weight), unit, reps)
            }
            SetValues::Distance { distance, time } if time.is_empty() => {
                format!("{} {}", trim_number(*distance), unit)
            }
            SetValues::Distance { distance, time } => {
                format!("{} {} in {}", trim_number(*distance), unit, time)
            }
        }
    }
}

/// Format a number without a trailing `.0`
pub fn trim_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

/// One planned or performed set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutSet {
    pub values: SetValues,
    pub memo: Option<String>,
    pub done: bool,
}

impl WorkoutSet {
    /// A planned set that has not been performed yet
    pub fn planned(values: SetValues) -> Self {
        Self {
            values,
            memo: None,
            done: false,
        }
    }
}

/// A named movement with ordered sets of one kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    pub name: String,
    pub kind: ExerciseKind,
    pub unit: String,
    pub memo: Option<String>,
    sets: Vec<WorkoutSet>,
}

impl Exercise {
    /// Create an exercise; every set must match `kind`
    pub fn new(
        name: impl Into<String>,
        kind: ExerciseKind,
        unit: impl Into<String>,
        sets: Vec<WorkoutSet>,
    ) -> Result<Self> {
        let name = name.into();
        if let Some(bad) = sets.iter().position(|s| s.values.kind() != kind) {
            return Err(MysetError::InvalidSet(format!(
                "set {} of '{}' is not a {} set",
                bad + 1,
                name,
                kind
            )));
        }
        Ok(Self {
            name,
            kind,
            unit: unit.into(),
            memo: None,
            sets,
        })
    }

    /// Attach a memo
    pub fn with_memo(mut self, memo: impl Into<String>) -> Self {
        self.memo = Some(memo.into());
        self
    }

    pub fn sets(&self) -> &[WorkoutSet] {
        &self.sets
    }

    pub fn set_count(&self) -> usize {
        self.sets.len()
    }

    pub fn done_count(&self) -> usize {
        self.sets.iter().filter(|s| s.done).count()
    }

    pub fn get_set(&self, index: usize) -> Option<&WorkoutSet> {
        self.sets.get(index)
    }

    /// Overwrite the values of a slot and mark it done
    pub fn record(&mut self, index: usize, values: SetValues) -> Result<()> {
        self.check_kind(&values)?;
        let name = &self.name;
        let slot = self.sets.get_mut(index).ok_or_else(|| {
            MysetError::InvalidSet(format!("'{}' has no set {}", name, index + 1))
        })?;
        slot.values = values;
        slot.done = true;
        Ok(())
    }

    /// Replace the memo of a slot; an empty memo clears it
    pub fn set_memo(&mut self, index: usize, memo: &str) -> Result<()> {
        let name = &self.name;
        let slot = self.sets.get_mut(index).ok_or_else(|| {
            MysetError::InvalidSet(format!("'{}' has no set {}", name, index + 1))
        })?;
        let memo = memo.trim();
        slot.memo = (!memo.is_empty()).then(|| memo.to_string());
        Ok(())
    }

    /// Append a copy of the last set's values as a new pending set.
    /// Returns the index of the new set.
    pub fn duplicate_last_set(&mut self) -> Result<usize> {
        let last = self.sets.last().ok_or_else(|| {
            MysetError::InvalidSet(format!("'{}' has no set to duplicate", self.name))
        })?;
        let copy = WorkoutSet::planned(last.values.clone());
        self.sets.push(copy);
        Ok(self.sets.len() - 1)
    }

    fn check_kind(&self, values: &SetValues) -> Result<()> {
        if values.kind() != self.kind {
            return Err(MysetError::InvalidSet(format!(
                "'{}' takes {} sets, got {}",
                self.name,
                self.kind,
                values.kind()
            )));
        }
        Ok(())
    }
}

/// A guided session built from a myset template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingSession {
    /// Template (myset) id
    pub id: i64,
    pub name: String,
    pub exercises: Vec<Exercise>,
}

impl TrainingSession {
    pub fn new(id: i64, name: impl Into<String>, exercises: Vec<Exercise>) -> Self {
        Self {
            id,
            name: name.into(),
            exercises,
        }
    }

    pub fn total_sets(&self) -> usize {
        self.exercises.iter().map(Exercise::set_count).sum()
    }

    pub fn done_sets(&self) -> usize {
        self.exercises.iter().map(Exercise::done_count).sum()
    }

    /// Sum of weight x reps over done weight sets
    pub fn total_volume(&self) -> f64 {
        self.done_values()
            .filter_map(|v| match v {
                SetValues::Weight { weight, reps } => Some(weight * *reps as f64),
                _ => None,
            })
            .sum()
    }

    /// Sum of distance over done distance sets
    pub fn total_distance(&self) -> f64 {
        self.done_values()
            .filter_map(|v| match v {
                SetValues::Distance { distance, .. } => Some(*distance),
                _ => None,
            })
            .sum()
    }

    fn done_values(&self) -> impl Iterator<Item = &SetValues> {
        self.exercises
            .iter()
            .flat_map(|e| e.sets().iter())
            .filter(|s| s.done)
            .map(|s| &s.values)
    }
}

/// One exercise of the previous session record
#[derive(Debug, Clone, PartialEq)]
pub struct PreviousExercise {
    pub name: String,
    pub memo: Option<String>,
    pub sets: Vec<PreviousSet>,
}

/// One set of the previous session record, as stored by the server
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PreviousSet {
    pub weight: Option<f64>,
    pub reps: Option<u32>,
    pub distance: Option<f64>,
    pub time: Option<String>,
    pub memo: Option<String>,
}

/// Read-only snapshot of the most recent session of the same template
#[derive(Debug, Clone, PartialEq)]
pub struct PreviousSession {
    pub date: String,
    pub myset_name: String,
    pub exercises: Vec<PreviousExercise>,
}

impl PreviousSession {
    /// Find the previous record of the `exercise_index`-th exercise of
    /// `session`.
    ///
    /// Exercises are matched by name. When a template repeats a name, the
    /// k-th occurrence in the session matches the k-th occurrence in the
    /// previous record, so duplicates never compare against each other.
    pub fn exercise_for(
        &self,
        session: &TrainingSession,
        exercise_index: usize,
    ) -> Option<&PreviousExercise> {
        let target = session.exercises.get(exercise_index)?;
        let occurrence = session.exercises[..exercise_index]
            .iter()
            .filter(|e| e.name == target.name)
            .count();
        self.exercises
            .iter()
            .filter(|e| e.name == target.name)
            .nth(occurrence)
    }

    /// Previous set at the same position of the matched exercise
    pub fn set_for(
        &self,
        session: &TrainingSession,
        exercise_index: usize,
        set_index: usize,
    ) -> Option<&PreviousSet> {
        self.exercise_for(session, exercise_index)?.sets.get(set_index)
    }
}
