//! Data models module
//!
//! Typed training session model and the JSON shapes of the training API.

pub mod wire;
pub mod workout;

// Re-export commonly used types
pub use wire::{
    CreateTrainingSessionRequest, MySetDetail, MySetSummary, PreviousSessionData, SaveAck,
    WireSet, WireWorkout,
};
pub use workout::{
    Exercise, ExerciseKind, PreviousExercise, PreviousSession, PreviousSet, SetValues,
    TrainingSession, WorkoutSet,
};
