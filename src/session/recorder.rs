//! Set recorder
//!
//! Holds the editable text of the active set, turns it into typed values on
//! confirmation and compares it against the previous session.

use tracing::warn;

use crate::models::{Exercise, ExerciseKind, PreviousSet, SetValues};
use crate::util::units::{coerce_count, coerce_number};
use crate::{MysetError, Result};

/// Editable fields of a set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetField {
    Weight,
    Reps,
    Distance,
    Time,
}

impl SetField {
    /// Fields shown for an exercise kind, in focus order
    pub fn for_kind(kind: ExerciseKind) -> &'static [SetField] {
        match kind {
            ExerciseKind::Weight => &[SetField::Weight, SetField::Reps],
            ExerciseKind::Distance => &[SetField::Distance, SetField::Time],
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SetField::Weight => "Weight",
            SetField::Reps => "Reps",
            SetField::Distance => "Distance",
            SetField::Time => "Time",
        }
    }
}

/// How the current value relates to the previous session
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldComparison {
    Higher(f64),
    Lower(f64),
    Same,
}

impl FieldComparison {
    /// Only compares when both sides are present and non-zero
    pub fn between(current: f64, previous: Option<f64>) -> Option<Self> {
        let previous = previous.filter(|p| *p != 0.0)?;
        if current == 0.0 {
            return None;
        }
        let diff = current - previous;
        Some(if diff > 0.0 {
            FieldComparison::Higher(diff)
        } else if diff < 0.0 {
            FieldComparison::Lower(diff)
        } else {
            FieldComparison::Same
        })
    }
}

/// Values confirmed by the user, plus the fields that needed coercion
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedSet {
    pub values: SetValues,
    pub coerced: Vec<SetField>,
}

/// Draft of the set currently being entered
#[derive(Debug, Clone)]
pub struct SetDraft {
    kind: ExerciseKind,
    unit: String,
    exercise_name: String,
    set_index: usize,
    target: SetValues,
    previous: Option<PreviousSet>,
    weight: String,
    reps: String,
    distance: String,
    time: String,
    focus: usize,
}

impl SetDraft {
    /// Seed a draft from the slot's current values
    pub fn for_position(
        exercise: &Exercise,
        set_index: usize,
        previous: Option<&PreviousSet>,
    ) -> Result<Self> {
        let slot = exercise.get_set(set_index).ok_or_else(|| {
            MysetError::InvalidSet(format!("'{}' has no set {}", exercise.name, set_index + 1))
        })?;

        let (weight, reps, distance, time) = match &slot.values {
            SetValues::Weight { weight, reps } => (
                number_text(*weight),
                reps.to_string(),
                String::new(),
                String::new(),
            ),
            SetValues::Distance { distance, time } => {
                (String::new(), String::new(), number_text(*distance), time.clone())
            }
        };

        Ok(Self {
            kind: exercise.kind,
            unit: exercise.unit.clone(),
            exercise_name: exercise.name.clone(),
            set_index,
            target: slot.values.clone(),
            previous: previous.cloned(),
            weight,
            reps,
            distance,
            time,
            focus: 0,
        })
    }

    pub fn kind(&self) -> ExerciseKind {
        self.kind
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    pub fn set_index(&self) -> usize {
        self.set_index
    }

    /// Planned values the draft started from
    pub fn target(&self) -> &SetValues {
        &self.target
    }

    pub fn previous(&self) -> Option<&PreviousSet> {
        self.previous.as_ref()
    }

    pub fn fields(&self) -> &'static [SetField] {
        SetField::for_kind(self.kind)
    }

    pub fn focused(&self) -> SetField {
        self.fields()[self.focus]
    }

    pub fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % self.fields().len();
    }

    pub fn focus_previous(&mut self) {
        let n = self.fields().len();
        self.focus = (self.focus + n - 1) % n;
    }

    pub fn text(&self, field: SetField) -> &str {
        match field {
            SetField::Weight => &self.weight,
            SetField::Reps => &self.reps,
            SetField::Distance => &self.distance,
            SetField::Time => &self.time,
        }
    }

    /// Replace a field's text. Fields of the other kind are ignored.
    pub fn edit(&mut self, field: SetField, text: impl Into<String>) {
        if !self.fields().contains(&field) {
            return;
        }
        *self.text_mut(field) = text.into();
    }

    pub fn push_char(&mut self, c: char) {
        let field = self.focused();
        self.text_mut(field).push(c);
    }

    pub fn backspace(&mut self) {
        let field = self.focused();
        self.text_mut(field).pop();
    }

    /// Typed values of the current text, coercing bad numbers to zero
    pub fn confirm(&self) -> RecordedSet {
        let recorded = self.parse();
        for field in &recorded.coerced {
            warn!(
                exercise = %self.exercise_name,
                set = self.set_index + 1,
                field = field.label(),
                input = %self.text(*field),
                "non-numeric input stored as 0"
            );
        }
        recorded
    }

    /// Comparison of each numeric field against the previous session
    pub fn comparisons(&self) -> Vec<(SetField, FieldComparison)> {
        let Some(prev) = &self.previous else {
            return Vec::new();
        };
        let mut out = Vec::new();
        match self.parse().values {
            SetValues::Weight { weight, reps } => {
                if let Some(c) = FieldComparison::between(weight, prev.weight) {
                    out.push((SetField::Weight, c));
                }
                if let Some(c) = FieldComparison::between(reps as f64, prev.reps.map(f64::from)) {
                    out.push((SetField::Reps, c));
                }
            }
            SetValues::Distance { distance, .. } => {
                if let Some(c) = FieldComparison::between(distance, prev.distance) {
                    out.push((SetField::Distance, c));
                }
            }
        }
        out
    }

    /// Previous value of a field as display text
    pub fn previous_text(&self, field: SetField) -> Option<String> {
        let prev = self.previous.as_ref()?;
        match field {
            SetField::Weight => prev.weight.map(number_text),
            SetField::Reps => prev.reps.map(|r| r.to_string()),
            SetField::Distance => prev.distance.map(number_text),
            SetField::Time => prev.time.clone().filter(|t| !t.is_empty()),
        }
    }

    /// A nudge to beat the previous session, shown only when one exists
    pub fn encouragement(&self) -> Option<&'static str> {
        let prev = self.previous.as_ref()?;
        let message = match (self.parse().values, self.kind) {
            (SetValues::Weight { weight, .. }, ExerciseKind::Weight)
                if weight != 0.0 && prev.weight.unwrap_or(0.0) != 0.0 =>
            {
                if weight > prev.weight.unwrap_or(0.0) {
                    "Heavier than last time. Go for a new best!"
                } else {
                    "Beat last time's numbers. Outlift your past self!"
                }
            }
            (SetValues::Distance { distance, .. }, ExerciseKind::Distance)
                if distance != 0.0 && prev.distance.unwrap_or(0.0) != 0.0 =>
            {
                if distance > prev.distance.unwrap_or(0.0) {
                    "Further than last time. Push past the limit!"
                } else {
                    "Beat last time's distance. One step further!"
                }
            }
            _ => "Beat last time. Stronger and faster!",
        };
        Some(message)
    }

    fn parse(&self) -> RecordedSet {
        let mut coerced = Vec::new();
        let values = match self.kind {
            ExerciseKind::Weight => {
                let (weight, w_bad) = coerce_number(&self.weight);
                let (reps, r_bad) = coerce_count(&self.reps);
                if w_bad {
                    coerced.push(SetField::Weight);
                }
                if r_bad {
                    coerced.push(SetField::Reps);
                }
                SetValues::Weight { weight, reps }
            }
            ExerciseKind::Distance => {
                let (distance, d_bad) = coerce_number(&self.distance);
                if d_bad {
                    coerced.push(SetField::Distance);
                }
                SetValues::Distance {
                    distance,
                    time: self.time.trim().to_string(),
                }
            }
        };
        RecordedSet { values, coerced }
    }

    fn text_mut(&mut self, field: SetField) -> &mut String {
        match field {
            SetField::Weight => &mut self.weight,
            SetField::Reps => &mut self.reps,
            SetField::Distance => &mut self.distance,
            SetField::Time => &mut self.time,
        }
    }
}

fn number_text(value: f64) -> String {
    crate::models::workout::trim_number(value)
}
