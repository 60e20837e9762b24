use std::collections::BTreeMap;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};

use crate::{
    CompletedSet, Exercise, ExerciseID, MuscleGroup, Property, Recovery, RepositoryError, Split,
};

#[allow(async_fn_in_trait)]
pub trait TargetRepository {
    async fn read_volume_targets(&self) -> Result<Vec<VolumeTarget>, RepositoryError>;
}

/// Prescribed weekly training volume for one muscle group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeTarget {
    pub muscle_group: MuscleGroup,
    pub weekly_target_sets: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VolumeTuning {
    /// Fraction of the elapsed-time-proportional target below which a group
    /// counts as behind schedule.
    pub on_track_floor: f32,
}

impl Default for VolumeTuning {
    fn default() -> Self {
        Self {
            on_track_floor: 0.70,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupProgress {
    pub target_sets: u32,
    pub completed_weighted_sets: f32,
    pub progress_percentage: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeeklyProgress {
    pub per_group: BTreeMap<MuscleGroup, GroupProgress>,
    pub is_on_track: bool,
}

/// Weighted sets per muscle group over `[week_start, week_start + 7 d)`.
///
/// Each completed, non-warm-up set counts as `split / 100` sets for every
/// muscle group the exercise stimulates.
#[must_use]
pub fn weekly_volume(
    sets: &[CompletedSet],
    exercises: &BTreeMap<ExerciseID, Exercise>,
    week_start: NaiveDate,
) -> BTreeMap<MuscleGroup, f32> {
    let mut result: BTreeMap<MuscleGroup, f32> = MuscleGroup::iter()
        .map(|muscle_group| (*muscle_group, 0.0))
        .collect();

    for set in sets {
        let date = set.workout_start.date_naive();
        if !set.counts_for_load() || date < week_start || date >= week_start + Duration::days(7) {
            continue;
        }
        let Some(exercise) = exercises.get(&set.exercise_id) else {
            continue;
        };
        if exercise.deleted {
            continue;
        }
        for (muscle_group, split) in exercise.muscle_splits() {
            *result.entry(muscle_group).or_insert(0.0) += split.ratio();
        }
    }

    result
}

/// Combines the weekly volume deficit with the recovery state into a need
/// score per targeted muscle group.
///
/// Fresher groups are weighted more attractive, but a needed-and-fatigued
/// group is never driven to zero.
#[must_use]
pub fn volume_needs(
    weekly: &BTreeMap<MuscleGroup, f32>,
    targets: &[VolumeTarget],
    recovery: &BTreeMap<MuscleGroup, Recovery>,
) -> BTreeMap<MuscleGroup, f32> {
    targets
        .iter()
        .map(|target| {
            let completed = weekly.get(&target.muscle_group).copied().unwrap_or(0.0);
            #[allow(clippy::cast_precision_loss)]
            let deficit = (target.weekly_target_sets as f32 - completed).max(0.0);
            let fraction = recovery
                .get(&target.muscle_group)
                .map_or(1.0, |r| r.fraction);
            (target.muscle_group, deficit * (0.5 + 0.5 * fraction))
        })
        .collect()
}

/// Progress against the weekly targets as of `as_of`.
///
/// `is_on_track` holds as long as no targeted group's completion percentage
/// falls below the configured floor relative to the elapsed fraction of the
/// week.
#[must_use]
pub fn weekly_progress(
    weekly: &BTreeMap<MuscleGroup, f32>,
    targets: &[VolumeTarget],
    week_start: NaiveDate,
    as_of: DateTime<Utc>,
    tuning: &VolumeTuning,
) -> WeeklyProgress {
    let elapsed = elapsed_fraction(week_start, as_of);
    let mut per_group = BTreeMap::new();
    let mut is_on_track = true;

    for target in targets {
        let completed = weekly.get(&target.muscle_group).copied().unwrap_or(0.0);
        #[allow(clippy::cast_precision_loss)]
        let progress_percentage = if target.weekly_target_sets == 0 {
            100.0
        } else {
            completed / target.weekly_target_sets as f32 * 100.0
        };
        if progress_percentage < tuning.on_track_floor * elapsed * 100.0 {
            is_on_track = false;
        }
        per_group.insert(
            target.muscle_group,
            GroupProgress {
                target_sets: target.weekly_target_sets,
                completed_weighted_sets: completed,
                progress_percentage,
            },
        );
    }

    WeeklyProgress {
        per_group,
        is_on_track,
    }
}

/// Daily weighted-set series for one muscle group over `[first, last]`,
/// including days without training.
#[must_use]
pub fn historical_volume(
    sets: &[CompletedSet],
    exercises: &BTreeMap<ExerciseID, Exercise>,
    muscle_group: MuscleGroup,
    first: NaiveDate,
    last: NaiveDate,
) -> Vec<(NaiveDate, f32)> {
    let mut result: BTreeMap<NaiveDate, f32> = BTreeMap::new();

    let mut day = first;
    while day <= last {
        result.insert(day, 0.0);
        day += Duration::days(1);
    }

    for set in sets {
        let date = set.workout_start.date_naive();
        if !set.counts_for_load() || date < first || date > last {
            continue;
        }
        let Some(exercise) = exercises.get(&set.exercise_id) else {
            continue;
        };
        if exercise.deleted {
            continue;
        }
        let split = exercise.split_for(muscle_group);
        if split > Split::NONE {
            *result.entry(date).or_insert(0.0) += split.ratio();
        }
    }

    result.into_iter().collect()
}

fn elapsed_fraction(week_start: NaiveDate, as_of: DateTime<Utc>) -> f32 {
    let start = week_start.and_time(NaiveTime::MIN).and_utc();
    #[allow(clippy::cast_precision_loss)]
    let fraction = (as_of - start).num_minutes() as f32 / (7.0 * 24.0 * 60.0);
    fraction.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;
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

    fn bench_press() -> Exercise {
        Exercise {
            id: 1.into(),
            name: Name::new("Bench Press").unwrap(),
            exercise_type: ExerciseType::Barbell,
            movement_pattern: MovementPattern::HorizontalPush,
            description: None,
            deleted: false,
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

    fn set(day: u32, is_warmup: bool, is_completed: bool) -> CompletedSet {
        CompletedSet {
            workout_id: WorkoutID::from(1),
            exercise_id: 1.into(),
            set_number: 1,
            reps: Some(Reps::new(10).unwrap()),
            weight: Some(Weight::new(50.0).unwrap()),
            is_warmup,
            is_completed,
            workout_start: instant(day, 18),
        }
    }

    fn exercises() -> BTreeMap<ExerciseID, Exercise> {
        BTreeMap::from([(1.into(), bench_press())])
    }

    fn target(muscle_group: MuscleGroup, weekly_target_sets: u32) -> VolumeTarget {
        VolumeTarget {
            muscle_group,
            weekly_target_sets,
        }
    }

    #[test]
    fn test_weekly_volume() {
        let result = weekly_volume(
            &[
                set(3, false, true),
                set(4, false, true),
                set(4, true, true),
                set(5, false, false),
                set(2, false, true),
                set(10, false, true),
            ],
            &exercises(),
            date(3),
        );

        assert_approx_eq!(result[&MuscleGroup::Chest], 2.0, 1e-6);
        assert_approx_eq!(result[&MuscleGroup::Triceps], 1.0, 1e-6);
        assert_approx_eq!(result[&MuscleGroup::Quads], 0.0, 1e-6);
    }

    #[test]
    fn test_weekly_volume_contains_every_muscle_group() {
        assert_eq!(
            weekly_volume(&[], &exercises(), date(3)).len(),
            MuscleGroup::iter().count()
        );
    }

    #[rstest]
    #[case::fresh(1.0, 3.0)]
    #[case::half_recovered(0.5, 2.25)]
    #[case::fatigued(0.0, 1.5)]
    fn test_volume_needs(#[case] fraction: f32, #[case] expected: f32) {
        let weekly = BTreeMap::from([(MuscleGroup::Chest, 2.0)]);
        let recovery = BTreeMap::from([(
            MuscleGroup::Chest,
            Recovery {
                fraction,
                estimated_days_to_full: 0.0,
            },
        )]);

        let needs = volume_needs(&weekly, &[target(MuscleGroup::Chest, 5)], &recovery);

        assert_approx_eq!(needs[&MuscleGroup::Chest], expected, 1e-6);
    }

    #[test]
    fn test_volume_needs_no_deficit() {
        let weekly = BTreeMap::from([(MuscleGroup::Chest, 6.0)]);

        let needs = volume_needs(&weekly, &[target(MuscleGroup::Chest, 5)], &BTreeMap::new());

        assert_approx_eq!(needs[&MuscleGroup::Chest], 0.0, 1e-6);
    }

    #[test]
    fn test_volume_needs_only_targeted_groups() {
        let needs = volume_needs(
            &BTreeMap::new(),
            &[target(MuscleGroup::Chest, 5)],
            &BTreeMap::new(),
        );

        assert_eq!(needs.len(), 1);
        assert!(needs.contains_key(&MuscleGroup::Chest));
    }

    #[test]
    fn test_weekly_progress_on_track() {
        let weekly = BTreeMap::from([(MuscleGroup::Chest, 3.0)]);

        // Half of the week elapsed, 60 % of the target completed.
        let progress = weekly_progress(
            &weekly,
            &[target(MuscleGroup::Chest, 5)],
            date(3),
            instant(6, 12),
            &VolumeTuning::default(),
        );

        assert!(progress.is_on_track);
        assert_eq!(
            progress.per_group[&MuscleGroup::Chest],
            GroupProgress {
                target_sets: 5,
                completed_weighted_sets: 3.0,
                progress_percentage: 60.0,
            }
        );
    }

    #[test]
    fn test_weekly_progress_behind_schedule() {
        let weekly = BTreeMap::from([(MuscleGroup::Chest, 1.0)]);

        // Nearly the whole week elapsed, 20 % of the target completed.
        let progress = weekly_progress(
            &weekly,
            &[target(MuscleGroup::Chest, 5)],
            date(3),
            instant(10, 0),
            &VolumeTuning::default(),
        );

        assert!(!progress.is_on_track);
    }

    #[test]
    fn test_weekly_progress_zero_target() {
        let progress = weekly_progress(
            &BTreeMap::new(),
            &[target(MuscleGroup::Chest, 0)],
            date(3),
            instant(10, 0),
            &VolumeTuning::default(),
        );

        assert!(progress.is_on_track);
        assert_approx_eq!(
            progress.per_group[&MuscleGroup::Chest].progress_percentage,
            100.0,
            1e-6
        );
    }

    #[test]
    fn test_weekly_progress_untargeted_groups_ignored() {
        let progress = weekly_progress(
            &BTreeMap::from([(MuscleGroup::Quads, 0.0)]),
            &[],
            date(3),
            instant(10, 0),
            &VolumeTuning::default(),
        );

        assert!(progress.is_on_track);
        assert!(progress.per_group.is_empty());
    }

    #[test]
    fn test_historical_volume() {
        let result = historical_volume(
            &[set(3, false, true), set(5, false, true), set(5, false, true)],
            &exercises(),
            MuscleGroup::Chest,
            date(3),
            date(6),
        );

        assert_eq!(
            result,
            vec![
                (date(3), 1.0),
                (date(4), 0.0),
                (date(5), 2.0),
                (date(6), 0.0),
            ]
        );
    }
}
