//! Cached store
//!
//! Read-through cache for the exercise catalog, the engine's slow-changing
//! reference data. The cache is an explicit object owned by the caller and
//! is invalidated by any write to the catalog. All other repository methods
//! delegate to the wrapped store.

use std::sync::{PoisonError, RwLock};

use liftplan_domain as domain;

/// Write access to the exercise catalog of a store.
pub trait ExerciseStore {
    fn put_exercise(&self, exercise: domain::Exercise);
    /// Soft-deletes a catalog entry.
    fn remove_exercise(&self, id: domain::ExerciseID);
}

pub struct Cached<S> {
    inner: S,
    exercises: RwLock<Option<Vec<domain::Exercise>>>,
}

impl<S> Cached<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            exercises: RwLock::new(None),
        }
    }

    pub fn invalidate(&self) {
        *self
            .exercises
            .write()
            .unwrap_or_else(PoisonError::into_inner) = None;
    }

    fn cached_exercises(&self) -> Option<Vec<domain::Exercise>> {
        self.exercises
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl<S: ExerciseStore> ExerciseStore for Cached<S> {
    fn put_exercise(&self, exercise: domain::Exercise) {
        self.inner.put_exercise(exercise);
        self.invalidate();
    }

    fn remove_exercise(&self, id: domain::ExerciseID) {
        self.inner.remove_exercise(id);
        self.invalidate();
    }
}

impl<S: domain::ExerciseRepository> domain::ExerciseRepository for Cached<S> {
    async fn read_exercises(&self) -> Result<Vec<domain::Exercise>, domain::RepositoryError> {
        if let Some(exercises) = self.cached_exercises() {
            return Ok(exercises);
        }

        let exercises = self.inner.read_exercises().await?;
        *self
            .exercises
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(exercises.clone());
        Ok(exercises)
    }
}

impl<S: domain::TrainingLogRepository> domain::TrainingLogRepository for Cached<S> {
    async fn read_completed_sets(
        &self,
    ) -> Result<Vec<domain::CompletedSet>, domain::RepositoryError> {
        self.inner.read_completed_sets().await
    }
}

impl<S: domain::EquipmentRepository> domain::EquipmentRepository for Cached<S> {
    async fn read_equipment(
        &self,
    ) -> Result<Vec<domain::EquipmentInstance>, domain::RepositoryError> {
        self.inner.read_equipment().await
    }
}

impl<S: domain::TargetRepository> domain::TargetRepository for Cached<S> {
    async fn read_volume_targets(
        &self,
    ) -> Result<Vec<domain::VolumeTarget>, domain::RepositoryError> {
        self.inner.read_volume_targets().await
    }
}

impl<S: domain::SubstitutionRepository> domain::SubstitutionRepository for Cached<S> {
    async fn read_substitutions(
        &self,
        primary: domain::ExerciseID,
    ) -> Result<Vec<domain::PrecomputedSubstitution>, domain::RepositoryError> {
        self.inner.read_substitutions(primary).await
    }
}

impl<S: domain::WorkoutRepository> domain::WorkoutRepository for Cached<S> {
    async fn commit_workout(
        &self,
        workout: &domain::GeneratedWorkout,
    ) -> Result<domain::WorkoutID, domain::CommitError> {
        self.inner.commit_workout(workout).await
    }

    async fn read_workout(
        &self,
        id: domain::WorkoutID,
    ) -> Result<domain::CommittedWorkout, domain::RepositoryError> {
        self.inner.read_workout(id).await
    }

    async fn splice_exercise(
        &self,
        workout_id: domain::WorkoutID,
        old: domain::ExerciseID,
        new: domain::ExerciseID,
    ) -> Result<(), domain::RepositoryError> {
        self.inner.splice_exercise(workout_id, old, new).await
    }
}
