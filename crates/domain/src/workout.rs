use chrono::Duration;

use crate::{
    CommitError, ExerciseID, GeneratedWorkout, Name, RepositoryError, Reps, Weight, WorkoutID,
};

#[allow(async_fn_in_trait)]
pub trait WorkoutRepository {
    /// Commits a generated workout in one atomic transaction. A partially
    /// committed workout is never observable.
    async fn commit_workout(&self, workout: &GeneratedWorkout) -> Result<WorkoutID, CommitError>;
    async fn read_workout(&self, id: WorkoutID) -> Result<CommittedWorkout, RepositoryError>;
    /// Replaces one exercise of a committed workout, preserving exercise
    /// order and set numbering.
    async fn splice_exercise(
        &self,
        workout_id: WorkoutID,
        old: ExerciseID,
        new: ExerciseID,
    ) -> Result<(), RepositoryError>;
}

/// A generated workout after it has been committed by the persistence
/// collaborator.
#[derive(Debug, Clone, PartialEq)]
pub struct CommittedWorkout {
    pub id: WorkoutID,
    pub name: Name,
    pub rationale: String,
    pub session_notes: Option<String>,
    pub exercise_groups: Vec<CommittedExerciseGroup>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CommittedExerciseGroup {
    pub exercise_id: ExerciseID,
    pub order_index: u32,
    pub notes: Option<String>,
    pub sets: Vec<CommittedSet>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CommittedSet {
    pub set_number: u32,
    pub target_reps: Reps,
    pub target_weight: Option<Weight>,
    pub is_warmup: bool,
    pub rest: Duration,
}

impl CommittedWorkout {
    #[must_use]
    pub fn from_generated(id: WorkoutID, workout: &GeneratedWorkout) -> Self {
        Self {
            id,
            name: workout.name.clone(),
            rationale: workout.rationale.clone(),
            session_notes: workout.session_notes.clone(),
            exercise_groups: workout
                .exercise_groups
                .iter()
                .map(|group| CommittedExerciseGroup {
                    exercise_id: group.exercise.id,
                    order_index: group.order_index,
                    notes: group.notes.clone(),
                    sets: group
                        .sets
                        .iter()
                        .map(|set| CommittedSet {
                            set_number: set.set_number,
                            target_reps: set.target_reps,
                            target_weight: set.target_weight,
                            is_warmup: set.is_warmup,
                            rest: set.rest,
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}
