//! Guided training session
//!
//! Step sequencing, set recording, rest timing, progress and the finish
//! payload, tied together by `GuidedSession`.

pub mod controller;
pub mod finish;
pub mod progress;
pub mod recorder;
pub mod sequencer;
pub mod timer;

pub use controller::{GuidedSession, UpNext};
pub use finish::{build_request, today, FinishState, Quote, SaveStatus, SessionSummary};
pub use progress::progress_percent;
pub use recorder::{FieldComparison, RecordedSet, SetDraft, SetField};
pub use sequencer::{Position, StepSequencer, TrainingStep};
pub use timer::{RestTimer, TimerEvent, Urgency};
