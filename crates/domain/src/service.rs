use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Duration, NaiveDate, Utc, Weekday};
use log::{debug, error};

use crate::{
    CommitError, CompletedSet, EquipmentID, EquipmentRepository, Exercise,
    ExerciseID, ExerciseRepository, ExerciseType, FloorID, GeneratedWorkout, GenerationError,
    GeneratorTuning, MuscleGroup, Recovery, RecoveryTuning, RepositoryError, SubstitutionCandidate,
    SubstitutionError, SubstitutionRepository, TargetRepository, TrainingLogRepository,
    ValidationError, VolumeTuning, WeeklyProgress, WorkoutID, WorkoutRepository, WorkoutRequest,
};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EngineTuning {
    pub recovery: RecoveryTuning,
    pub volume: VolumeTuning,
    pub generator: GeneratorTuning,
}

/// Parameters of a workout generation request. Equipment and volume needs
/// are fetched from the repository at request time.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateRequest {
    pub as_of: DateTime<Utc>,
    pub target_duration: Duration,
    pub preferred_floor: Option<FloorID>,
}

#[allow(async_fn_in_trait)]
pub trait RecoveryService {
    async fn recovery_map(
        &self,
        as_of: DateTime<Utc>,
    ) -> Result<BTreeMap<MuscleGroup, Recovery>, RepositoryError>;
}

#[allow(async_fn_in_trait)]
pub trait VolumeService {
    async fn weekly_volume(
        &self,
        week_start: NaiveDate,
    ) -> Result<BTreeMap<MuscleGroup, f32>, RepositoryError>;
    async fn volume_needs(
        &self,
        as_of: DateTime<Utc>,
    ) -> Result<BTreeMap<MuscleGroup, f32>, RepositoryError>;
    async fn weekly_progress(&self, as_of: DateTime<Utc>)
    -> Result<WeeklyProgress, RepositoryError>;
    async fn historical_volume(
        &self,
        muscle_group: MuscleGroup,
        first: NaiveDate,
        last: NaiveDate,
    ) -> Result<Vec<(NaiveDate, f32)>, RepositoryError>;
}

#[allow(async_fn_in_trait)]
pub trait SubstitutionService {
    async fn find_substitutes(
        &self,
        exercise_id: ExerciseID,
    ) -> Result<Vec<SubstitutionCandidate>, RepositoryError>;
    async fn substitute_exercise(
        &self,
        workout_id: WorkoutID,
        exercise_id: ExerciseID,
        equipment_ids: &[EquipmentID],
    ) -> Result<Exercise, SubstitutionError>;
}

#[allow(async_fn_in_trait)]
pub trait GenerationService {
    async fn generate_workout(
        &self,
        request: GenerateRequest,
    ) -> Result<GeneratedWorkout, GenerationError>;
    async fn commit_workout(&self, workout: &GeneratedWorkout) -> Result<WorkoutID, CommitError>;
}

pub struct Service<R> {
    repository: R,
    tuning: EngineTuning,
}

impl<R> Service<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository,
            tuning: EngineTuning::default(),
        }
    }

    #[must_use]
    pub fn with_tuning(repository: R, tuning: EngineTuning) -> Self {
        Self { repository, tuning }
    }
}

macro_rules! read {
    ($self: ident, $method: ident ( $($arg: expr),* ), $entity: literal) => {{
        let result = $self.repository.$method($($arg),*).await;
        if let Err(ref err) = result {
            match err {
                RepositoryError::NoConnection => {
                    debug!("failed to read {}: {err}", $entity);
                }
                _ => {
                    error!("failed to read {}: {err}", $entity);
                }
            }
        }
        result
    }};
}

impl<R> Service<R>
where
    R: TrainingLogRepository + ExerciseRepository,
{
    async fn training_snapshot(
        &self,
    ) -> Result<(Vec<CompletedSet>, BTreeMap<ExerciseID, Exercise>), RepositoryError> {
        let sets = read!(self, read_completed_sets(), "completed sets")?;
        let exercises = exercise_map(read!(self, read_exercises(), "exercises")?);
        Ok((sets, exercises))
    }
}

impl<R> RecoveryService for Service<R>
where
    R: TrainingLogRepository + ExerciseRepository,
{
    async fn recovery_map(
        &self,
        as_of: DateTime<Utc>,
    ) -> Result<BTreeMap<MuscleGroup, Recovery>, RepositoryError> {
        let (sets, exercises) = self.training_snapshot().await?;
        Ok(crate::recovery_map(
            &sets,
            &exercises,
            as_of,
            &self.tuning.recovery,
        ))
    }
}

impl<R> VolumeService for Service<R>
where
    R: TrainingLogRepository + ExerciseRepository + TargetRepository,
{
    async fn weekly_volume(
        &self,
        week_start: NaiveDate,
    ) -> Result<BTreeMap<MuscleGroup, f32>, RepositoryError> {
        let (sets, exercises) = self.training_snapshot().await?;
        Ok(crate::weekly_volume(&sets, &exercises, week_start))
    }

    async fn volume_needs(
        &self,
        as_of: DateTime<Utc>,
    ) -> Result<BTreeMap<MuscleGroup, f32>, RepositoryError> {
        let (sets, exercises) = self.training_snapshot().await?;
        let targets = read!(self, read_volume_targets(), "volume targets")?;
        let weekly = crate::weekly_volume(&sets, &exercises, week_start(as_of));
        let recovery = crate::recovery_map(&sets, &exercises, as_of, &self.tuning.recovery);
        Ok(crate::volume_needs(&weekly, &targets, &recovery))
    }

    async fn weekly_progress(
        &self,
        as_of: DateTime<Utc>,
    ) -> Result<WeeklyProgress, RepositoryError> {
        let (sets, exercises) = self.training_snapshot().await?;
        let targets = read!(self, read_volume_targets(), "volume targets")?;
        let weekly = crate::weekly_volume(&sets, &exercises, week_start(as_of));
        Ok(crate::weekly_progress(
            &weekly,
            &targets,
            week_start(as_of),
            as_of,
            &self.tuning.volume,
        ))
    }

    async fn historical_volume(
        &self,
        muscle_group: MuscleGroup,
        first: NaiveDate,
        last: NaiveDate,
    ) -> Result<Vec<(NaiveDate, f32)>, RepositoryError> {
        let (sets, exercises) = self.training_snapshot().await?;
        Ok(crate::historical_volume(
            &sets,
            &exercises,
            muscle_group,
            first,
            last,
        ))
    }
}

impl<R> SubstitutionService for Service<R>
where
    R: ExerciseRepository + EquipmentRepository + SubstitutionRepository + WorkoutRepository,
{
    async fn find_substitutes(
        &self,
        exercise_id: ExerciseID,
    ) -> Result<Vec<SubstitutionCandidate>, RepositoryError> {
        let rows = read!(self, read_substitutions(exercise_id), "substitutions")?;
        let exercises = exercise_map(read!(self, read_exercises(), "exercises")?);
        Ok(crate::rank_candidates(&rows, &exercises))
    }

    async fn substitute_exercise(
        &self,
        workout_id: WorkoutID,
        exercise_id: ExerciseID,
        equipment_ids: &[EquipmentID],
    ) -> Result<Exercise, SubstitutionError> {
        let workout = read!(self, read_workout(workout_id), "workout")?;
        if !workout
            .exercise_groups
            .iter()
            .any(|group| group.exercise_id == exercise_id)
        {
            return Err(SubstitutionError::Repository(RepositoryError::NotFound));
        }

        let equipment = read!(self, read_equipment(), "equipment")?;
        let selected_types: BTreeSet<ExerciseType> = equipment
            .iter()
            .filter(|e| e.is_available && equipment_ids.contains(&e.id))
            .map(|e| e.exercise_type)
            .collect();

        let candidates = self.find_substitutes(exercise_id).await?;
        crate::pick_substitute(candidates, &selected_types)
    }
}

impl<R> GenerationService for Service<R>
where
    R: TrainingLogRepository + ExerciseRepository + TargetRepository + EquipmentRepository
        + WorkoutRepository,
{
    async fn generate_workout(
        &self,
        request: GenerateRequest,
    ) -> Result<GeneratedWorkout, GenerationError> {
        if request.target_duration <= Duration::zero() {
            return Err(ValidationError::NonPositiveDuration.into());
        }

        let available_equipment = read!(self, read_equipment(), "equipment")?;
        let (sets, exercises) = self.training_snapshot().await?;
        let targets = read!(self, read_volume_targets(), "volume targets")?;

        let weekly = crate::weekly_volume(&sets, &exercises, week_start(request.as_of));
        let recovery = crate::recovery_map(&sets, &exercises, request.as_of, &self.tuning.recovery);
        let volume_needs = crate::volume_needs(&weekly, &targets, &recovery);

        crate::generate_workout(
            &WorkoutRequest {
                available_equipment,
                target_duration: request.target_duration,
                preferred_floor: request.preferred_floor,
                volume_needs,
            },
            &exercises,
            &sets,
            &self.tuning.generator,
        )
    }

    async fn commit_workout(&self, workout: &GeneratedWorkout) -> Result<WorkoutID, CommitError> {
        let result = self.repository.commit_workout(workout).await;
        if let Err(ref err) = result {
            match err {
                CommitError::Repository(RepositoryError::NoConnection) => {
                    debug!("failed to commit workout: {err}");
                }
                _ => {
                    error!("failed to commit workout: {err}");
                }
            }
        }
        result
    }
}

fn exercise_map(exercises: Vec<Exercise>) -> BTreeMap<ExerciseID, Exercise> {
    exercises
        .into_iter()
        .map(|exercise| (exercise.id, exercise))
        .collect()
}

fn week_start(as_of: DateTime<Utc>) -> NaiveDate {
    as_of.date_naive().week(Weekday::Mon).first_day()
}
