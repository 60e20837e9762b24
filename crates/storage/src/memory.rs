use std::{
    collections::BTreeMap,
    sync::{PoisonError, RwLock, atomic::AtomicBool, atomic::Ordering},
};

use liftplan_domain as domain;
use uuid::Uuid;

use crate::ExerciseStore;

#[derive(Default)]
struct Tables {
    exercises: BTreeMap<domain::ExerciseID, domain::Exercise>,
    equipment: Vec<domain::EquipmentInstance>,
    targets: Vec<domain::VolumeTarget>,
    sets: Vec<domain::CompletedSet>,
    substitutions: Vec<domain::PrecomputedSubstitution>,
    workouts: BTreeMap<domain::WorkoutID, domain::CommittedWorkout>,
}

/// In-memory implementation of the domain repositories.
///
/// All tables live behind a single lock, so committing a workout is one
/// atomic step and readers never observe partial writes.
#[derive(Default)]
pub struct InMemory {
    tables: RwLock<Tables>,
    disconnected: AtomicBool,
}

impl InMemory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulates losing the connection to the store. Subsequent operations
    /// fail with [`domain::RepositoryError::NoConnection`].
    pub fn set_connected(&self, connected: bool) {
        self.disconnected.store(!connected, Ordering::Relaxed);
    }

    pub fn put_equipment(&self, equipment: domain::EquipmentInstance) {
        self.write().equipment.push(equipment);
    }

    pub fn put_volume_target(&self, target: domain::VolumeTarget) {
        self.write().targets.push(target);
    }

    pub fn put_completed_set(&self, set: domain::CompletedSet) {
        self.write().sets.push(set);
    }

    pub fn put_substitution(&self, substitution: domain::PrecomputedSubstitution) {
        self.write().substitutions.push(substitution);
    }

    fn guard(&self) -> Result<(), domain::RepositoryError> {
        if self.disconnected.load(Ordering::Relaxed) {
            return Err(domain::RepositoryError::NoConnection);
        }
        Ok(())
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Tables> {
        self.tables.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Tables> {
        self.tables.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ExerciseStore for InMemory {
    fn put_exercise(&self, exercise: domain::Exercise) {
        self.write().exercises.insert(exercise.id, exercise);
    }

    fn remove_exercise(&self, id: domain::ExerciseID) {
        if let Some(exercise) = self.write().exercises.get_mut(&id) {
            exercise.deleted = true;
        }
    }
}

impl domain::ExerciseRepository for InMemory {
    async fn read_exercises(&self) -> Result<Vec<domain::Exercise>, domain::RepositoryError> {
        self.guard()?;
        Ok(self.read().exercises.values().cloned().collect())
    }
}

impl domain::TrainingLogRepository for InMemory {
    async fn read_completed_sets(
        &self,
    ) -> Result<Vec<domain::CompletedSet>, domain::RepositoryError> {
        self.guard()?;
        Ok(self.read().sets.clone())
    }
}

impl domain::EquipmentRepository for InMemory {
    async fn read_equipment(
        &self,
    ) -> Result<Vec<domain::EquipmentInstance>, domain::RepositoryError> {
        self.guard()?;
        Ok(self.read().equipment.clone())
    }
}

impl domain::TargetRepository for InMemory {
    async fn read_volume_targets(
        &self,
    ) -> Result<Vec<domain::VolumeTarget>, domain::RepositoryError> {
        self.guard()?;
        Ok(self.read().targets.clone())
    }
}

impl domain::SubstitutionRepository for InMemory {
    async fn read_substitutions(
        &self,
        primary: domain::ExerciseID,
    ) -> Result<Vec<domain::PrecomputedSubstitution>, domain::RepositoryError> {
        self.guard()?;
        Ok(self
            .read()
            .substitutions
            .iter()
            .filter(|s| s.primary_exercise_id == primary)
            .cloned()
            .collect())
    }
}

impl domain::WorkoutRepository for InMemory {
    async fn commit_workout(
        &self,
        workout: &domain::GeneratedWorkout,
    ) -> Result<domain::WorkoutID, domain::CommitError> {
        self.guard()?;
        if workout.exercise_groups.is_empty() {
            return Err(domain::CommitError::EmptyWorkout);
        }

        let id = domain::WorkoutID::from(Uuid::new_v4());
        let committed = domain::CommittedWorkout::from_generated(id, workout);
        self.write().workouts.insert(id, committed);
        Ok(id)
    }

    async fn read_workout(
        &self,
        id: domain::WorkoutID,
    ) -> Result<domain::CommittedWorkout, domain::RepositoryError> {
        self.guard()?;
        self.read()
            .workouts
            .get(&id)
            .cloned()
            .ok_or(domain::RepositoryError::NotFound)
    }

    async fn splice_exercise(
        &self,
        workout_id: domain::WorkoutID,
        old: domain::ExerciseID,
        new: domain::ExerciseID,
    ) -> Result<(), domain::RepositoryError> {
        self.guard()?;
        let mut tables = self.write();
        let workout = tables
            .workouts
            .get_mut(&workout_id)
            .ok_or(domain::RepositoryError::NotFound)?;
        let group = workout
            .exercise_groups
            .iter_mut()
            .find(|g| g.exercise_id == old)
            .ok_or(domain::RepositoryError::NotFound)?;
        group.exercise_id = new;
        Ok(())
    }
}
