//! JSON shapes exchanged with the training API
//!
//! These mirror the server's payloads field for field. Conversion into the
//! typed session model happens here so nothing else sees optional set
//! fields.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::workout::{
    Exercise, ExerciseKind, PreviousExercise, PreviousSession, PreviousSet, SetValues,
    TrainingSession, WorkoutSet,
};
use crate::Result;

/// Owner of a myset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Creator {
    pub id: i64,
    pub username: String,
}

/// Entry of `GET /training/mysets`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MySetSummary {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub created_by: Option<Creator>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Set as it appears on the wire
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WireSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reps: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
}

impl WireSet {
    /// Typed values for an exercise of `kind`; missing numbers become 0
    fn values_for(&self, kind: ExerciseKind) -> SetValues {
        match kind {
            ExerciseKind::Weight => SetValues::Weight {
                weight: self.weight.unwrap_or(0.0),
                reps: self.reps.unwrap_or(0),
            },
            ExerciseKind::Distance => SetValues::Distance {
                distance: self.distance.unwrap_or(0.0),
                time: self.time.clone().unwrap_or_default(),
            },
        }
    }

    /// Wire form of recorded values
    pub fn from_values(values: &SetValues, memo: Option<String>) -> Self {
        match values {
            SetValues::Weight { weight, reps } => Self {
                weight: Some(*weight),
                reps: Some(*reps),
                memo,
                ..Self::default()
            },
            SetValues::Distance { distance, time } => Self {
                distance: Some(*distance),
                time: Some(time.clone()),
                memo,
                ..Self::default()
            },
        }
    }
}

/// Exercise as it appears on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireWorkout {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub menu: String,
    #[serde(rename = "type")]
    pub kind: ExerciseKind,
    pub unit: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
    #[serde(default)]
    pub sets: Vec<WireSet>,
}

/// Body of `GET /training/mysets/{id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MySetDetail {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub created_by: Option<Creator>,
    #[serde(default)]
    pub workouts: Vec<WireWorkout>,
}

impl MySetDetail {
    /// Build a fresh guided session from the template
    pub fn into_session(self) -> Result<TrainingSession> {
        let exercises = self
            .workouts
            .into_iter()
            .map(|w| {
                let sets = w
                    .sets
                    .iter()
                    .map(|s| WorkoutSet {
                        values: s.values_for(w.kind),
                        memo: s.memo.clone().filter(|m| !m.is_empty()),
                        done: false,
                    })
                    .collect();
                let exercise = Exercise::new(w.menu, w.kind, w.unit, sets)?;
                Ok(match w.memo.filter(|m| !m.is_empty()) {
                    Some(memo) => exercise.with_memo(memo),
                    None => exercise,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        debug!(myset = self.id, exercises = exercises.len(), "template converted");
        Ok(TrainingSession::new(self.id, self.name, exercises))
    }
}

/// Exercise of the previous session record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviousWorkout {
    #[serde(default)]
    pub id: Option<i64>,
    pub menu: String,
    #[serde(default)]
    pub memo: Option<String>,
    #[serde(default)]
    pub sets: Vec<WireSet>,
}

/// Body of `GET /training/mysets/{id}/record/` (may be `null`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviousSessionData {
    pub date: String,
    #[serde(default)]
    pub myset_name: String,
    #[serde(default)]
    pub workouts: Vec<PreviousWorkout>,
}

impl From<PreviousSessionData> for PreviousSession {
    fn from(data: PreviousSessionData) -> Self {
        PreviousSession {
            date: data.date,
            myset_name: data.myset_name,
            exercises: data
                .workouts
                .into_iter()
                .map(|w| PreviousExercise {
                    name: w.menu,
                    memo: w.memo,
                    sets: w
                        .sets
                        .into_iter()
                        .map(|s| PreviousSet {
                            weight: s.weight,
                            reps: s.reps,
                            distance: s.distance,
                            time: s.time,
                            memo: s.memo,
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}

/// Body of `POST /training/mysets/{id}/record/`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateTrainingSessionRequest {
    #[serde(rename = "mysetId")]
    pub myset_id: i64,
    /// `YYYY-MM-DD`
    pub date: String,
    pub workouts: Vec<WireWorkout>,
}

/// Acknowledgement of a saved session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveAck {
    #[serde(default = "default_success")]
    pub success: bool,
    #[serde(default)]
    pub id: Option<i64>,
}

fn default_success() -> bool {
    true
}

impl SaveAck {
    /// Interpret a 2xx response body. Servers answer with the created record,
    /// an explicit `{success, id}` object or nothing at all.
    pub fn from_body(body: &str) -> Self {
        if body.trim().is_empty() {
            return Self { success: true, id: None };
        }
        serde_json::from_str(body).unwrap_or(Self { success: true, id: None })
    }
}
