use chrono::{DateTime, Utc};
use derive_more::{Deref, Display, Into};
use uuid::Uuid;

use crate::{ExerciseID, RepositoryError, Split};

#[allow(async_fn_in_trait)]
pub trait TrainingLogRepository {
    /// Returns the completed-set history. Rows of soft-deleted workouts are
    /// never included.
    async fn read_completed_sets(&self) -> Result<Vec<CompletedSet>, RepositoryError>;
}

/// One set of a persisted workout, as recorded by the training log.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletedSet {
    pub workout_id: WorkoutID,
    pub exercise_id: ExerciseID,
    pub set_number: u32,
    pub reps: Option<Reps>,
    pub weight: Option<Weight>,
    pub is_warmup: bool,
    pub is_completed: bool,
    pub workout_start: DateTime<Utc>,
}

impl CompletedSet {
    #[must_use]
    pub fn counts_for_load(&self) -> bool {
        self.is_completed && !self.is_warmup
    }

    /// Training stress attributed to one muscle group by this set.
    ///
    /// An absent weight counts as 1 (a bodyweight movement still loads the
    /// muscle), and weights below 1 are raised to 1. An absent rep count
    /// contributes 0.
    #[must_use]
    pub fn volume_load(&self, split: Split) -> f32 {
        let Some(reps) = self.reps else { return 0.0 };
        let weight = self.weight.map_or(1.0, f32::from).max(1.0);
        #[allow(clippy::cast_precision_loss)]
        {
            u32::from(reps) as f32 * weight * split.ratio()
        }
    }
}

#[derive(Deref, Debug, Default, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct WorkoutID(Uuid);

impl WorkoutID {
    #[must_use]
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }

    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl From<Uuid> for WorkoutID {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<u128> for WorkoutID {
    fn from(value: u128) -> Self {
        Self(Uuid::from_bytes(value.to_be_bytes()))
    }
}

#[derive(Debug, Default, Display, Clone, Copy, Into, PartialEq, PartialOrd)]
pub struct Reps(u32);

impl Reps {
    pub fn new(value: u32) -> Result<Self, RepsError> {
        if !(0..1000).contains(&value) {
            return Err(RepsError::OutOfRange);
        }

        Ok(Self(value))
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum RepsError {
    #[error("Reps must be in the range 0 to 999")]
    OutOfRange,
}

#[derive(Debug, Default, Display, Clone, Copy, Into, PartialEq, PartialOrd)]
pub struct Weight(f32);

impl Weight {
    pub fn new(value: f32) -> Result<Self, WeightError> {
        if !(0.0..1000.0).contains(&value) {
            return Err(WeightError::OutOfRange);
        }

        if (value * 10.0 % 1.0).abs() > f32::EPSILON {
            return Err(WeightError::InvalidResolution);
        }

        Ok(Self(value))
    }

    /// Scales the weight, rounded to the 0.1 kg resolution.
    #[must_use]
    pub fn scaled(self, factor: f32) -> Weight {
        let scaled = (self.0 * factor * 10.0).round() / 10.0;
        Weight(scaled.clamp(0.0, 999.9))
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum WeightError {
    #[error("Weight must be in the range 0.0 to 999.9 kg")]
    OutOfRange,
    #[error("Weight must be a multiple of 0.1 kg")]
    InvalidResolution,
}
