use chrono::NaiveDate;
use mysetrun::models::{
    Exercise, ExerciseKind, PreviousExercise, PreviousSession, PreviousSet, SaveAck, SetValues,
    TrainingSession, WorkoutSet,
};
use mysetrun::session::{FieldComparison, GuidedSession, SaveStatus, SetField, TrainingStep, UpNext};
use mysetrun::MysetError;
use std::time::Duration;

fn weight(weight: f64, reps: u32) -> SetValues {
    SetValues::Weight { weight, reps }
}

fn push_day() -> TrainingSession {
    let bench = Exercise::new(
        "Bench Press",
        ExerciseKind::Weight,
        "kg",
        vec![
            WorkoutSet::planned(weight(60.0, 10)),
            WorkoutSet::planned(weight(65.0, 8)),
        ],
    )
    .unwrap();
    let run = Exercise::new(
        "Treadmill",
        ExerciseKind::Distance,
        "km",
        vec![WorkoutSet::planned(SetValues::Distance {
            distance: 2.0,
            time: "12:00".into(),
        })],
    )
    .unwrap();
    TrainingSession::new(7, "Push Day", vec![bench, run])
}

fn last_push_day() -> PreviousSession {
    PreviousSession {
        date: "2024-05-25".into(),
        myset_name: "Push Day".into(),
        exercises: vec![PreviousExercise {
            name: "Bench Press".into(),
            memo: None,
            sets: vec![PreviousSet {
                weight: Some(55.0),
                reps: Some(10),
                ..PreviousSet::default()
            }],
        }],
    }
}

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
}

#[test]
fn test_full_walkthrough_builds_payload() {
    let mut guided = GuidedSession::new(push_day(), None, 60, 1);
    assert_eq!(guided.step(), TrainingStep::Menu);
    guided.start().unwrap();

    guided.complete_set(weight(60.0, 10)).unwrap();
    assert_eq!(guided.step(), TrainingStep::Interval);
    guided.set_interval_memo("felt light");
    guided.finish_interval().unwrap();

    guided.complete_set(weight(65.0, 8)).unwrap();
    guided.finish_interval().unwrap();
    assert_eq!(guided.position().exercise, 1);

    guided
        .complete_set(SetValues::Distance {
            distance: 2.5,
            time: "14:10".into(),
        })
        .unwrap();
    guided.finish_interval().unwrap();
    assert_eq!(guided.step(), TrainingStep::Finish);

    let request = guided.begin_save(date()).unwrap();
    assert_eq!(request.myset_id, 7);
    assert_eq!(request.date, "2024-06-01");
    assert_eq!(request.workouts.len(), 2);

    let bench = &request.workouts[0];
    assert_eq!(bench.menu, "Bench Press");
    assert_eq!(bench.sets.len(), 2);
    assert_eq!(bench.sets[0].weight, Some(60.0));
    assert_eq!(bench.sets[0].reps, Some(10));
    assert_eq!(bench.sets[0].memo.as_deref(), Some("felt light"));
    assert_eq!(bench.sets[1].weight, Some(65.0));
    assert_eq!(bench.sets[1].reps, Some(8));
    assert_eq!(bench.sets[1].memo, None);

    let run = &request.workouts[1];
    assert_eq!(run.sets[0].distance, Some(2.5));
    assert_eq!(run.sets[0].time.as_deref(), Some("14:10"));

    assert_eq!(guided.finish().status, SaveStatus::Saving);
    guided.save_finished(Ok(SaveAck { success: true, id: Some(99) }));
    assert_eq!(guided.finish().status, SaveStatus::Saved(Some(99)));
    assert!(guided.begin_save(date()).is_err());
}

#[test]
fn test_end_before_first_set_saves_nothing_done() {
    let mut guided = GuidedSession::new(push_day(), None, 60, 1);
    guided.start().unwrap();
    guided.end_training().unwrap();
    assert_eq!(guided.step(), TrainingStep::Finish);
    assert_eq!(guided.summary().done_sets, 0);

    guided.set_notes("  short on time ");
    let request = guided.begin_save(date()).unwrap();
    assert_eq!(request.workouts.len(), 2);
    assert!(request.workouts.iter().all(|w| w.sets.is_empty()));
}

#[test]
fn test_notes_fill_missing_memos() {
    let mut guided = GuidedSession::new(push_day(), None, 60, 1);
    guided.start().unwrap();
    guided.complete_set(weight(60.0, 10)).unwrap();
    guided.end_training().unwrap();
    guided.set_notes("  good session ");

    let request = guided.begin_save(date()).unwrap();
    assert_eq!(request.workouts[0].sets[0].memo.as_deref(), Some("good session"));
}

#[test]
fn test_memo_is_kept_when_ending_from_interval() {
    let mut guided = GuidedSession::new(push_day(), None, 60, 1);
    guided.start().unwrap();
    guided.complete_set(weight(60.0, 10)).unwrap();
    guided.push_memo_char('o');
    guided.push_memo_char('k');
    guided.end_training().unwrap();

    let set = guided.session().exercises[0].get_set(0).unwrap();
    assert_eq!(set.memo.as_deref(), Some("ok"));
}

#[test]
fn test_extra_set_copies_last_values() {
    let mut guided = GuidedSession::new(push_day(), None, 60, 1);
    guided.start().unwrap();

    guided.complete_set(weight(60.0, 10)).unwrap();
    assert!(!guided.is_last_set_of_exercise());
    assert!(matches!(
        guided.add_extra_set(),
        Err(MysetError::InvalidTransition(_))
    ));
    guided.finish_interval().unwrap();

    guided.complete_set(weight(67.5, 6)).unwrap();
    assert!(guided.is_last_set_of_exercise());
    let index = guided.add_extra_set().unwrap();
    assert_eq!(index, 2);
    assert_eq!(guided.step(), TrainingStep::Workout);
    assert_eq!(guided.position().set, 2);

    let bench = &guided.session().exercises[0];
    assert_eq!(bench.set_count(), 3);
    let extra = bench.get_set(2).unwrap();
    assert_eq!(extra.values, weight(67.5, 6));
    assert!(!extra.done);
}

#[test]
fn test_progress_is_monotonic() {
    let mut guided = GuidedSession::new(push_day(), None, 60, 1);
    let mut last = guided.progress();
    assert_eq!(last, 0.0);

    guided.start().unwrap();
    while guided.step() != TrainingStep::Finish {
        if guided.step() == TrainingStep::Workout {
            let values = guided.draft().unwrap().target().clone();
            guided.complete_set(values).unwrap();
        } else {
            guided.finish_interval().unwrap();
        }
        let now = guided.progress();
        assert!(now >= last, "progress went from {} to {}", last, now);
        last = now;
    }
    assert_eq!(last, 100.0);
}

#[test]
fn test_recording_twice_overwrites() {
    let mut guided = GuidedSession::new(push_day(), None, 60, 1);
    guided.start().unwrap();
    guided.complete_set(weight(60.0, 10)).unwrap();
    guided.end_training().unwrap();

    let mut session = guided.session().clone();
    session.exercises[0].record(0, weight(62.5, 9)).unwrap();
    session.exercises[0].record(0, weight(62.5, 9)).unwrap();
    assert_eq!(session.done_sets(), 1);
    assert_eq!(session.exercises[0].get_set(0).unwrap().values, weight(62.5, 9));
}

#[test]
fn test_bad_input_is_stored_as_zero() {
    let mut guided = GuidedSession::new(push_day(), None, 60, 1);
    guided.start().unwrap();

    let mut draft = guided.draft().unwrap();
    draft.edit(SetField::Weight, "abc");
    draft.edit(SetField::Reps, "12");
    let recorded = guided.confirm_draft(&draft).unwrap();

    assert_eq!(recorded.values, weight(0.0, 12));
    assert_eq!(recorded.coerced, vec![SetField::Weight]);
    assert_eq!(
        guided.session().exercises[0].get_set(0).unwrap().values,
        weight(0.0, 12)
    );
}

#[test]
fn test_draft_compares_with_previous_session() {
    let mut guided = GuidedSession::new(push_day(), Some(last_push_day()), 60, 1);
    guided.start().unwrap();

    let mut draft = guided.draft().unwrap();
    assert_eq!(draft.previous_text(SetField::Weight).as_deref(), Some("55"));
    draft.edit(SetField::Weight, "60");
    draft.edit(SetField::Reps, "10");
    let comparisons = draft.comparisons();
    assert_eq!(
        comparisons,
        vec![
            (SetField::Weight, FieldComparison::Higher(5.0)),
            (SetField::Reps, FieldComparison::Same),
        ]
    );
    assert!(draft.encouragement().is_some());

    // Second bench set has no previous counterpart
    guided.complete_set(weight(60.0, 10)).unwrap();
    guided.finish_interval().unwrap();
    assert!(guided.previous_set().is_none());
}

#[test]
fn test_up_next_and_skip_exercise() {
    let mut guided = GuidedSession::new(push_day(), None, 60, 1);
    guided.start().unwrap();
    guided.complete_set(weight(60.0, 10)).unwrap();
    assert_eq!(
        guided.up_next(),
        UpNext::Set {
            exercise: "Bench Press".into(),
            set_number: 2,
            values: weight(65.0, 8),
            unit: "kg".into(),
        }
    );
    assert!(guided.has_next_exercise());
    guided.skip_to_next_exercise().unwrap();
    assert_eq!(guided.position().exercise, 1);
    assert_eq!(guided.position().set, 0);

    guided
        .complete_set(SetValues::Distance {
            distance: 2.0,
            time: "12:00".into(),
        })
        .unwrap();
    assert_eq!(guided.up_next(), UpNext::Finish);
    assert!(!guided.has_next_exercise());
}

#[test]
fn test_timer_expiry_moves_on() {
    let mut guided = GuidedSession::new(push_day(), None, 15, 1);
    guided.start().unwrap();
    guided.complete_set(weight(60.0, 10)).unwrap();

    // Stopped until the user starts it
    assert!(!guided.tick(Duration::from_secs(30)).unwrap());
    guided.timer_mut().start();
    assert!(!guided.tick(Duration::from_secs(5)).unwrap());
    assert_eq!(guided.step(), TrainingStep::Interval);
    assert!(guided.tick(Duration::from_secs(10)).unwrap());
    assert_eq!(guided.step(), TrainingStep::Workout);
    assert_eq!(guided.position().set, 1);
}

#[test]
fn test_failed_save_can_be_retried() {
    let mut guided = GuidedSession::new(push_day(), None, 60, 1);
    guided.start().unwrap();
    guided.end_training().unwrap();

    guided.begin_save(date()).unwrap();
    assert!(guided.begin_save(date()).is_err());
    guided.save_finished(Err(MysetError::Api {
        status: Some(500),
        message: "boom".into(),
    }));
    assert!(matches!(guided.finish().status, SaveStatus::Failed(_)));

    guided.begin_save(date()).unwrap();
    guided.save_finished(Ok(SaveAck { success: true, id: None }));
    assert_eq!(guided.finish().status, SaveStatus::Saved(None));
}

#[test]
fn test_discard_needs_confirmation() {
    let mut guided = GuidedSession::new(push_day(), None, 60, 1);
    guided.start().unwrap();
    guided.end_training().unwrap();

    assert!(!guided.discard_confirmed());
    guided.request_discard();
    assert!(guided.discard_confirmed());
    guided.cancel_discard();
    assert!(!guided.discard_confirmed());
}
