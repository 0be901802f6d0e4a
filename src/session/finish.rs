//! Finish screen state and save payload assembly

use chrono::{NaiveDate, Utc};
use rand::seq::SliceRandom;

use crate::models::{CreateTrainingSessionRequest, TrainingSession, WireSet, WireWorkout};

/// Where the save of a finished session stands
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SaveStatus {
    #[default]
    Idle,
    Saving,
    Failed(String),
    /// Saved; carries the record id when the server returned one
    Saved(Option<i64>),
}

impl SaveStatus {
    pub fn is_saving(&self) -> bool {
        matches!(self, SaveStatus::Saving)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quote {
    pub text: &'static str,
    pub author: &'static str,
}

pub const QUOTES: &[Quote] = &[
    Quote {
        text: "We don't run away because it is hard. It becomes hard because we run away.",
        author: "William James, psychologist",
    },
    Quote {
        text: "Success is going from failure to failure without losing your enthusiasm.",
        author: "Winston Churchill",
    },
    Quote {
        text: "If you think you can, you can. If you think you can't, you can't.",
        author: "Pablo Picasso",
    },
    Quote {
        text: "Genius is one percent inspiration and ninety-nine percent perspiration.",
        author: "Thomas Edison",
    },
    Quote {
        text: "Never put off till tomorrow what you can do today.",
        author: "Benjamin Franklin",
    },
    Quote {
        text: "Stepped on or beaten down, keep working and it will bear fruit someday.",
        author: "Masuda Kozo, shogi player",
    },
    Quote {
        text: "More important than beating the opponent is always levelling yourself up.",
        author: "Nomura Katsuya, baseball manager",
    },
    Quote {
        text: "No pain, no glory.",
        author: "Kuroda Hiroki, pitcher",
    },
    Quote {
        text: "The distance you ran will never betray you.",
        author: "Noguchi Mizuki, marathon gold medalist",
    },
];

/// Pick a motivational quote at random
pub fn random_quote() -> Quote {
    QUOTES
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(QUOTES[0])
}

/// Notes, save progress and discard confirmation of the finish screen
#[derive(Debug, Clone)]
pub struct FinishState {
    pub notes: String,
    pub status: SaveStatus,
    pub confirm_discard: bool,
    pub quote: Quote,
}

impl FinishState {
    pub fn new() -> Self {
        Self {
            notes: String::new(),
            status: SaveStatus::Idle,
            confirm_discard: false,
            quote: random_quote(),
        }
    }
}

impl Default for FinishState {
    fn default() -> Self {
        Self::new()
    }
}

/// Totals shown on the finish screen
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionSummary {
    pub exercises: usize,
    pub planned_sets: usize,
    pub done_sets: usize,
    pub volume: f64,
    pub distance: f64,
}

impl SessionSummary {
    pub fn of(session: &TrainingSession) -> Self {
        Self {
            exercises: session.exercises.len(),
            planned_sets: session.total_sets(),
            done_sets: session.done_sets(),
            volume: session.total_volume(),
            distance: session.total_distance(),
        }
    }
}

/// Today's date in UTC, the date the record is filed under
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Build the save payload.
///
/// Every exercise is included, each with only its done sets in order. A set
/// without its own memo takes the session notes; the memo is left out when
/// both are empty.
pub fn build_request(
    session: &TrainingSession,
    notes: &str,
    date: NaiveDate,
) -> CreateTrainingSessionRequest {
    let notes = notes.trim();
    let workouts = session
        .exercises
        .iter()
        .map(|exercise| WireWorkout {
            id: None,
            menu: exercise.name.clone(),
            kind: exercise.kind,
            unit: exercise.unit.clone(),
            memo: exercise.memo.clone(),
            sets: exercise
                .sets()
                .iter()
                .filter(|s| s.done)
                .map(|s| {
                    let memo = s
                        .memo
                        .clone()
                        .filter(|m| !m.is_empty())
                        .or_else(|| (!notes.is_empty()).then(|| notes.to_string()));
                    WireSet::from_values(&s.values, memo)
                })
                .collect(),
        })
        .collect();

    CreateTrainingSessionRequest {
        myset_id: session.id,
        date: date.format("%Y-%m-%d").to_string(),
        workouts,
    }
}
