use std::collections::{BTreeMap, BTreeSet};

use chrono::Duration;

use crate::{
    CompletedSet, EquipmentInstance, Exercise, ExerciseID, ExerciseType, FloorID, GenerationError,
    MuscleGroup, Name, Property, Reps, Split, ValidationError, Weight, available_types,
};

#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorTuning {
    /// Minimum number of exercises for a viable workout.
    pub min_exercises: usize,
    pub working_sets: u32,
    pub default_reps: Reps,
    pub warm_up_weight_factor: f32,
    /// Time spent performing one set, excluding rest.
    pub set_overhead: Duration,
    pub warm_up_rest: Duration,
    /// Time to move to and set up the next exercise.
    pub transition: Duration,
}

impl GeneratorTuning {
    /// Duration of the cheapest possible exercise block (bodyweight, no
    /// warm-up). Generation stops once the remaining budget drops below it.
    #[must_use]
    pub fn min_viable_block(&self) -> Duration {
        self.transition
            + (self.set_overhead + ExerciseType::Bodyweight.default_rest())
                * i32::try_from(self.working_sets).unwrap_or(1)
    }
}

impl Default for GeneratorTuning {
    fn default() -> Self {
        Self {
            min_exercises: 3,
            working_sets: 3,
            default_reps: Reps::new(10).unwrap(),
            warm_up_weight_factor: 0.5,
            set_overhead: Duration::seconds(45),
            warm_up_rest: Duration::seconds(60),
            transition: Duration::seconds(120),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutRequest {
    pub available_equipment: Vec<EquipmentInstance>,
    pub target_duration: Duration,
    pub preferred_floor: Option<FloorID>,
    pub volume_needs: BTreeMap<MuscleGroup, f32>,
}

impl WorkoutRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.target_duration <= Duration::zero() {
            return Err(ValidationError::NonPositiveDuration);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SetPrescription {
    pub set_number: u32,
    pub target_reps: Reps,
    pub target_weight: Option<Weight>,
    pub is_warmup: bool,
    pub rest: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExerciseGroup {
    pub exercise: Exercise,
    pub order_index: u32,
    pub notes: Option<String>,
    pub sets: Vec<SetPrescription>,
}

impl ExerciseGroup {
    #[must_use]
    pub fn duration(&self, tuning: &GeneratorTuning) -> Duration {
        self.sets
            .iter()
            .map(|set| tuning.set_overhead + set.rest)
            .sum::<Duration>()
            + tuning.transition
    }
}

/// A proposed workout plan. Transient until a persistence collaborator
/// commits it.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedWorkout {
    pub name: Name,
    pub rationale: String,
    pub estimated_duration: Duration,
    pub session_notes: Option<String>,
    pub exercise_groups: Vec<ExerciseGroup>,
}

/// Builds a workout plan for the given equipment, time budget and
/// outstanding muscle-group need.
///
/// Muscle groups are served in descending need order. For each uncovered
/// group the highest-split compatible exercise is chosen (ties by ascending
/// exercise id), until the remaining budget falls below one minimum viable
/// block. Set schemes are seeded from the athlete's most recent completed
/// performance where available. The result is deterministic for identical
/// inputs.
pub fn generate_workout(
    request: &WorkoutRequest,
    exercises: &BTreeMap<ExerciseID, Exercise>,
    history: &[CompletedSet],
    tuning: &GeneratorTuning,
) -> Result<GeneratedWorkout, GenerationError> {
    request.validate()?;

    let types = available_types(&request.available_equipment, request.preferred_floor);
    if types.is_empty() {
        return Err(GenerationError::NoAvailableEquipment);
    }

    let mut ranked: Vec<(MuscleGroup, f32)> = request
        .volume_needs
        .iter()
        .filter(|(_, need)| **need > 0.0)
        .map(|(muscle_group, need)| (*muscle_group, *need))
        .collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    let recent = latest_performance(history);

    let mut exercise_groups: Vec<ExerciseGroup> = Vec::new();
    let mut covered: BTreeSet<MuscleGroup> = BTreeSet::new();
    let mut selected: BTreeSet<ExerciseID> = BTreeSet::new();
    let mut prioritized: Vec<MuscleGroup> = Vec::new();
    let mut unserved: Vec<MuscleGroup> = Vec::new();
    let mut remaining = request.target_duration;

    for (muscle_group, _) in &ranked {
        if remaining < tuning.min_viable_block() {
            break;
        }
        if covered.contains(muscle_group) {
            continue;
        }
        let Some(exercise) = best_exercise(exercises, &types, &selected, *muscle_group) else {
            unserved.push(*muscle_group);
            continue;
        };
        let group = ExerciseGroup {
            exercise: exercise.clone(),
            order_index: u32::try_from(exercise_groups.len()).unwrap_or(u32::MAX),
            notes: performance_note(recent.get(&exercise.id).copied()),
            sets: prescribe_sets(exercise, recent.get(&exercise.id).copied(), tuning),
        };
        let duration = group.duration(tuning);
        if duration > remaining {
            continue;
        }

        remaining -= duration;
        selected.insert(exercise.id);
        for (hit_group, split) in exercise.muscle_splits() {
            if split >= Split::SECONDARY {
                covered.insert(hit_group);
            }
        }
        prioritized.push(*muscle_group);
        exercise_groups.push(group);
    }

    if exercise_groups.len() < tuning.min_exercises {
        return Err(GenerationError::InsufficientExercises {
            found: exercise_groups.len(),
            required: tuning.min_exercises,
        });
    }

    Ok(GeneratedWorkout {
        name: workout_name(&prioritized),
        rationale: rationale(&prioritized),
        estimated_duration: request.target_duration - remaining,
        session_notes: session_notes(&unserved),
        exercise_groups,
    })
}

/// Highest-split compatible, not-yet-selected exercise for a muscle group.
fn best_exercise<'a>(
    exercises: &'a BTreeMap<ExerciseID, Exercise>,
    types: &BTreeSet<ExerciseType>,
    selected: &BTreeSet<ExerciseID>,
    muscle_group: MuscleGroup,
) -> Option<&'a Exercise> {
    exercises
        .values()
        .filter(|e| !e.deleted && !selected.contains(&e.id) && types.contains(&e.exercise_type))
        .filter(|e| e.split_for(muscle_group) > Split::NONE)
        .min_by(|a, b| {
            b.split_for(muscle_group)
                .cmp(&a.split_for(muscle_group))
                .then_with(|| a.id.cmp(&b.id))
        })
}

/// Most recent completed working set per exercise (latest workout start,
/// then highest set number).
fn latest_performance(history: &[CompletedSet]) -> BTreeMap<ExerciseID, &CompletedSet> {
    let mut result: BTreeMap<ExerciseID, &CompletedSet> = BTreeMap::new();
    for set in history {
        if !set.counts_for_load() || set.reps.is_none() {
            continue;
        }
        result
            .entry(set.exercise_id)
            .and_modify(|best| {
                if (set.workout_start, set.set_number) > (best.workout_start, best.set_number) {
                    *best = set;
                }
            })
            .or_insert(set);
    }
    result
}

fn prescribe_sets(
    exercise: &Exercise,
    seed: Option<&CompletedSet>,
    tuning: &GeneratorTuning,
) -> Vec<SetPrescription> {
    let target_reps = seed.and_then(|s| s.reps).unwrap_or(tuning.default_reps);
    let target_weight = seed.and_then(|s| s.weight);

    let mut sets = Vec::new();
    let mut set_number = 1;

    if exercise.exercise_type.needs_warm_up() {
        sets.push(SetPrescription {
            set_number,
            target_reps,
            target_weight: target_weight.map(|w| w.scaled(tuning.warm_up_weight_factor)),
            is_warmup: true,
            rest: tuning.warm_up_rest,
        });
        set_number += 1;
    }

    for _ in 0..tuning.working_sets {
        sets.push(SetPrescription {
            set_number,
            target_reps,
            target_weight,
            is_warmup: false,
            rest: exercise.exercise_type.default_rest(),
        });
        set_number += 1;
    }

    sets
}

fn performance_note(seed: Option<&CompletedSet>) -> Option<String> {
    let seed = seed?;
    let reps = seed.reps?;
    Some(match seed.weight {
        Some(weight) => format!("Last time: {reps} \u{d7} {weight} kg"),
        None => format!("Last time: {reps} reps"),
    })
}

fn workout_name(prioritized: &[MuscleGroup]) -> Name {
    let title = match prioritized {
        [] => "Balanced Session".to_string(),
        [first] => format!("{} Focus", first.name()),
        [first, second, ..] => format!("{} & {} Focus", first.name(), second.name()),
    };
    Name::new(&title).unwrap()
}

fn rationale(prioritized: &[MuscleGroup]) -> String {
    if prioritized.is_empty() {
        return "No muscle group has an outstanding weekly volume deficit.".to_string();
    }
    format!(
        "Prioritizes {} based on outstanding weekly volume and recovery.",
        join_names(prioritized)
    )
}

fn session_notes(unserved: &[MuscleGroup]) -> Option<String> {
    if unserved.is_empty() {
        return None;
    }
    Some(format!(
        "No compatible exercise was available for {}.",
        join_names(unserved)
    ))
}

fn join_names(muscle_groups: &[MuscleGroup]) -> String {
    muscle_groups
        .iter()
        .map(|muscle_group| muscle_group.name().to_lowercase())
        .collect::<Vec<_>>()
        .join(", ")
}
