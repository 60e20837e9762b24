use std::collections::BTreeMap;

use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::{CompletedSet, Exercise, ExerciseID, MuscleGroup};

pub const FATIGUE_WINDOW_DAYS: u32 = 7;

/// Trailing time window ending at an evaluation instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub end: DateTime<Utc>,
    pub days: u32,
}

impl TimeWindow {
    #[must_use]
    pub fn trailing(end: DateTime<Utc>, days: u32) -> Self {
        Self { end, days }
    }

    #[must_use]
    pub fn start(&self) -> DateTime<Utc> {
        self.end - Duration::days(i64::from(self.days))
    }

    #[must_use]
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start() < instant && instant <= self.end
    }
}

/// Training stress observed for one muscle group on one day.
///
/// A derived view recomputed per request, never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct FatigueEvent {
    pub muscle_group: MuscleGroup,
    pub date: NaiveDate,
    pub volume_load: f32,
}

/// Aggregates completed, non-warm-up sets inside `window` into one event per
/// observed `(muscle group, date)` pair.
///
/// Sets of unknown or soft-deleted exercises are skipped, as are pairs whose
/// total load is zero (sets without a rep count contribute nothing).
#[must_use]
pub fn fatigue_events(
    sets: &[CompletedSet],
    exercises: &BTreeMap<ExerciseID, Exercise>,
    window: &TimeWindow,
) -> Vec<FatigueEvent> {
    let mut loads: BTreeMap<(MuscleGroup, NaiveDate), f32> = BTreeMap::new();

    for set in sets {
        if !set.counts_for_load() || !window.contains(set.workout_start) {
            continue;
        }
        let Some(exercise) = exercises.get(&set.exercise_id) else {
            continue;
        };
        if exercise.deleted {
            continue;
        }
        for (muscle_group, split) in exercise.muscle_splits() {
            let volume_load = set.volume_load(split);
            if volume_load > 0.0 {
                *loads
                    .entry((muscle_group, set.workout_start.date_naive()))
                    .or_insert(0.0) += volume_load;
            }
        }
    }

    loads
        .into_iter()
        .map(|((muscle_group, date), volume_load)| FatigueEvent {
            muscle_group,
            date,
            volume_load,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use crate::{
        ExerciseType, MovementPattern, MuscleSplit, Name, Reps, Split, Weight, WorkoutID,
    };

    use super::*;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, day).unwrap()
    }

    fn instant(day: u32, hour: u32) -> DateTime<Utc> {
        date(day).and_hms_opt(hour, 0, 0).unwrap().and_utc()
    }

    fn bench_press(deleted: bool) -> Exercise {
        Exercise {
            id: 1.into(),
            name: Name::new("Bench Press").unwrap(),
            exercise_type: ExerciseType::Barbell,
            movement_pattern: MovementPattern::HorizontalPush,
            description: None,
            deleted,
            muscles: vec![
                MuscleSplit {
                    muscle_group: MuscleGroup::Chest,
                    split: Split::PRIMARY,
                },
                MuscleSplit {
                    muscle_group: MuscleGroup::Triceps,
                    split: Split::SECONDARY,
                },
            ],
        }
    }

    fn set(
        day: u32,
        reps: Option<u32>,
        weight: Option<f32>,
        is_warmup: bool,
        is_completed: bool,
    ) -> CompletedSet {
        CompletedSet {
            workout_id: WorkoutID::from(1),
            exercise_id: 1.into(),
            set_number: 1,
            reps: reps.map(|r| Reps::new(r).unwrap()),
            weight: weight.map(|w| Weight::new(w).unwrap()),
            is_warmup,
            is_completed,
            workout_start: instant(day, 18),
        }
    }

    #[test]
    fn test_time_window_contains() {
        let window = TimeWindow::trailing(instant(8, 12), 7);

        assert!(window.contains(instant(8, 12)));
        assert!(window.contains(instant(2, 18)));
        assert!(!window.contains(instant(1, 12)));
        assert!(!window.contains(instant(8, 13)));
    }

    #[test]
    fn test_fatigue_events_volume_load_additivity() {
        let exercises = BTreeMap::from([(1.into(), bench_press(false))]);
        let events = fatigue_events(
            &[
                set(5, Some(10), Some(50.0), false, true),
                set(5, Some(8), Some(60.0), false, true),
            ],
            &exercises,
            &TimeWindow::trailing(instant(8, 12), FATIGUE_WINDOW_DAYS),
        );

        assert_eq!(
            events,
            vec![
                FatigueEvent {
                    muscle_group: MuscleGroup::Chest,
                    date: date(5),
                    volume_load: 980.0,
                },
                FatigueEvent {
                    muscle_group: MuscleGroup::Triceps,
                    date: date(5),
                    volume_load: 490.0,
                },
            ]
        );
    }

    #[test]
    fn test_fatigue_events_one_event_per_muscle_group_and_date() {
        let exercises = BTreeMap::from([(1.into(), bench_press(false))]);
        let events = fatigue_events(
            &[
                set(4, Some(10), Some(50.0), false, true),
                set(5, Some(10), Some(50.0), false, true),
            ],
            &exercises,
            &TimeWindow::trailing(instant(8, 12), FATIGUE_WINDOW_DAYS),
        );

        assert_eq!(
            events
                .iter()
                .map(|e| (e.muscle_group, e.date))
                .collect::<Vec<_>>(),
            vec![
                (MuscleGroup::Chest, date(4)),
                (MuscleGroup::Chest, date(5)),
                (MuscleGroup::Triceps, date(4)),
                (MuscleGroup::Triceps, date(5)),
            ]
        );
    }

    #[rstest]
    #[case::warmup(set(5, Some(10), Some(50.0), true, true))]
    #[case::incomplete(set(5, Some(10), Some(50.0), false, false))]
    #[case::outside_window(set(1, Some(10), Some(50.0), false, true))]
    #[case::no_reps(set(5, None, Some(50.0), false, true))]
    fn test_fatigue_events_excluded_sets(#[case] excluded: CompletedSet) {
        let exercises = BTreeMap::from([(1.into(), bench_press(false))]);

        assert_eq!(
            fatigue_events(
                &[excluded],
                &exercises,
                &TimeWindow::trailing(instant(8, 12), FATIGUE_WINDOW_DAYS),
            ),
            vec![]
        );
    }

    #[test]
    fn test_fatigue_events_deleted_exercise() {
        let exercises = BTreeMap::from([(1.into(), bench_press(true))]);

        assert_eq!(
            fatigue_events(
                &[set(5, Some(10), Some(50.0), false, true)],
                &exercises,
                &TimeWindow::trailing(instant(8, 12), FATIGUE_WINDOW_DAYS),
            ),
            vec![]
        );
    }

    #[test]
    fn test_fatigue_events_unknown_exercise() {
        assert_eq!(
            fatigue_events(
                &[set(5, Some(10), Some(50.0), false, true)],
                &BTreeMap::new(),
                &TimeWindow::trailing(instant(8, 12), FATIGUE_WINDOW_DAYS),
            ),
            vec![]
        );
    }
}
