use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

use crate::{
    CompletedSet, Exercise, ExerciseID, FATIGUE_WINDOW_DAYS, FatigueEvent, MuscleGroup, Property,
    TimeWindow, fatigue_events,
};

#[derive(Debug, Clone, PartialEq)]
pub struct RecoveryTuning {
    /// Per-group half-life overrides in hours. Groups without an override
    /// use the size-based default.
    pub half_life_overrides: BTreeMap<MuscleGroup, f32>,
    /// Length of the rolling baseline window the per-event load is
    /// normalized against.
    pub baseline_days: u32,
    /// Recovery fraction at which a group counts as fully recovered.
    /// Must be in (0, 1).
    pub full_threshold: f32,
}

impl RecoveryTuning {
    pub const LARGE_GROUP_HALF_LIFE_HOURS: f32 = 48.0;
    pub const SMALL_GROUP_HALF_LIFE_HOURS: f32 = 24.0;

    #[must_use]
    pub fn half_life_hours(&self, muscle_group: MuscleGroup) -> f32 {
        self.half_life_overrides
            .get(&muscle_group)
            .copied()
            .unwrap_or(if muscle_group.is_large() {
                Self::LARGE_GROUP_HALF_LIFE_HOURS
            } else {
                Self::SMALL_GROUP_HALF_LIFE_HOURS
            })
    }
}

impl Default for RecoveryTuning {
    fn default() -> Self {
        Self {
            half_life_overrides: BTreeMap::new(),
            baseline_days: 28,
            full_threshold: 0.95,
        }
    }
}

/// Estimated readiness of a muscle group at a point in time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Recovery {
    /// 0 = fully fatigued, 1 = fully recovered.
    pub fraction: f32,
    pub estimated_days_to_full: f32,
}

impl Recovery {
    pub const FULL: Recovery = Recovery {
        fraction: 1.0,
        estimated_days_to_full: 0.0,
    };
}

/// Estimates the recovery state of every muscle group as of `as_of`.
///
/// Fatigue from each event inside the trailing [`FATIGUE_WINDOW_DAYS`] window
/// decays by `exp(-Δt / half_life)` and is normalized by the group's rolling
/// baseline (the mean per-event load over `baseline_days`), making the metric
/// dimensionless and comparable across groups and athletes. Groups without
/// recent events report [`Recovery::FULL`].
#[must_use]
pub fn recovery_map(
    sets: &[CompletedSet],
    exercises: &BTreeMap<ExerciseID, Exercise>,
    as_of: DateTime<Utc>,
    tuning: &RecoveryTuning,
) -> BTreeMap<MuscleGroup, Recovery> {
    let recent = fatigue_events(
        sets,
        exercises,
        &TimeWindow::trailing(as_of, FATIGUE_WINDOW_DAYS),
    );
    let baselines = baselines(&fatigue_events(
        sets,
        exercises,
        &TimeWindow::trailing(as_of, tuning.baseline_days),
    ));

    let mut fatigue_per_group: BTreeMap<MuscleGroup, f32> = BTreeMap::new();
    for event in &recent {
        let half_life = tuning.half_life_hours(event.muscle_group);
        let baseline = baselines
            .get(&event.muscle_group)
            .copied()
            .unwrap_or(event.volume_load);
        let normalized_load = event.volume_load / baseline;
        *fatigue_per_group.entry(event.muscle_group).or_insert(0.0) +=
            (-hours_since(event.date, as_of) / half_life).exp() * normalized_load;
    }

    let mut result: BTreeMap<MuscleGroup, Recovery> = MuscleGroup::iter()
        .map(|muscle_group| (*muscle_group, Recovery::FULL))
        .collect();
    for (muscle_group, fatigue) in fatigue_per_group {
        result.insert(
            muscle_group,
            Recovery {
                fraction: (1.0 - fatigue).clamp(0.0, 1.0),
                estimated_days_to_full: days_to_full(
                    fatigue,
                    tuning.half_life_hours(muscle_group),
                    tuning.full_threshold,
                ),
            },
        );
    }
    result
}

/// Mean per-event volume load per muscle group.
fn baselines(events: &[FatigueEvent]) -> BTreeMap<MuscleGroup, f32> {
    let mut sums: BTreeMap<MuscleGroup, (f32, u32)> = BTreeMap::new();
    for event in events {
        let entry = sums.entry(event.muscle_group).or_insert((0.0, 0));
        entry.0 += event.volume_load;
        entry.1 += 1;
    }
    #[allow(clippy::cast_precision_loss)]
    sums.into_iter()
        .map(|(muscle_group, (sum, count))| (muscle_group, sum / count as f32))
        .collect()
}

fn hours_since(date: NaiveDate, as_of: DateTime<Utc>) -> f32 {
    let event_start = date.and_time(NaiveTime::MIN).and_utc();
    #[allow(clippy::cast_precision_loss)]
    let hours = (as_of - event_start).num_minutes() as f32 / 60.0;
    hours.max(0.0)
}

/// Remaining fatigue decays uniformly, so the time until the recovery
/// fraction reaches the full threshold has a closed form.
fn days_to_full(fatigue: f32, half_life_hours: f32, full_threshold: f32) -> f32 {
    let residual = (1.0 - full_threshold).max(f32::EPSILON);
    if fatigue <= residual {
        return 0.0;
    }
    half_life_hours * (fatigue / residual).ln() / 24.0
}
