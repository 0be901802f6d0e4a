//! Overall completion percentage, derived from the cursor

use super::sequencer::{Position, TrainingStep};

/// Completion in percent (0.0..=100.0).
///
/// Each exercise owns an equal slice of the bar; inside an exercise the
/// slice fills linearly with the set index.
pub fn progress_percent(
    step: TrainingStep,
    position: Position,
    total_exercises: usize,
    sets_in_exercise: usize,
) -> f64 {
    match step {
        TrainingStep::Menu => 0.0,
        TrainingStep::Finish => 100.0,
        TrainingStep::Workout | TrainingStep::Interval => {
            if total_exercises == 0 {
                return 0.0;
            }
            let slice = 100.0 / total_exercises as f64;
            let within = if sets_in_exercise == 0 {
                0.0
            } else {
                position.set as f64 / sets_in_exercise as f64
            };
            (position.exercise as f64 * slice + within * slice).clamp(0.0, 100.0)
        }
    }
}
