use std::{collections::BTreeMap, slice::Iter};

use chrono::Duration;
use derive_more::{AsRef, Deref, Display};
use uuid::Uuid;

use crate::{MuscleGroup, Property, RepositoryError};

#[allow(async_fn_in_trait)]
pub trait ExerciseRepository {
    /// Returns the full exercise catalog, including soft-deleted entries.
    /// Consumers must filter on [`Exercise::deleted`].
    async fn read_exercises(&self) -> Result<Vec<Exercise>, RepositoryError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exercise {
    pub id: ExerciseID,
    pub name: Name,
    pub exercise_type: ExerciseType,
    pub movement_pattern: MovementPattern,
    pub description: Option<String>,
    pub deleted: bool,
    pub muscles: Vec<MuscleSplit>,
}

impl Exercise {
    #[must_use]
    pub fn muscle_splits(&self) -> BTreeMap<MuscleGroup, Split> {
        self.muscles
            .iter()
            .map(|m| (m.muscle_group, m.split))
            .collect()
    }

    #[must_use]
    pub fn split_for(&self, muscle_group: MuscleGroup) -> Split {
        self.muscles
            .iter()
            .find(|m| m.muscle_group == muscle_group)
            .map_or(Split::NONE, |m| m.split)
    }

    /// The most stimulated muscle group (first in enum order on equal splits).
    #[must_use]
    pub fn primary_muscle(&self) -> Option<MuscleGroup> {
        self.muscle_splits()
            .into_iter()
            .max_by(|(a_group, a_split), (b_group, b_split)| {
                a_split.cmp(b_split).then_with(|| b_group.cmp(a_group))
            })
            .map(|(muscle_group, _)| muscle_group)
    }
}

#[derive(Deref, Debug, Default, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct ExerciseID(Uuid);

impl ExerciseID {
    #[must_use]
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }

    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl From<Uuid> for ExerciseID {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<u128> for ExerciseID {
    fn from(value: u128) -> Self {
        Self(Uuid::from_bytes(value.to_be_bytes()))
    }
}

#[derive(AsRef, Debug, Display, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Name(String);

impl Name {
    pub fn new(name: &str) -> Result<Self, NameError> {
        let trimmed_name = name.trim();

        if trimmed_name.is_empty() {
            return Err(NameError::Empty);
        }

        let len = trimmed_name.len();

        if len > 64 {
            return Err(NameError::TooLong(len));
        }

        Ok(Name(trimmed_name.to_string()))
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum NameError {
    #[error("Name must not be empty")]
    Empty,
    #[error("Name must be 64 characters or fewer ({0} > 64)")]
    TooLong(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MuscleSplit {
    pub muscle_group: MuscleGroup,
    pub split: Split,
}

/// Percentage of an exercise's stimulus attributed to one muscle group.
///
/// Splits across the groups of one exercise need not sum to 100.
#[derive(Deref, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Split(u32);

impl Split {
    pub const PRIMARY: Split = Split(100);
    pub const SECONDARY: Split = Split(50);
    pub const NONE: Split = Split(0);

    pub fn new(value: u32) -> Result<Self, SplitError> {
        if value > 100 {
            return Err(SplitError::OutOfRange(value));
        }
        Ok(Self(value))
    }

    #[must_use]
    pub fn ratio(self) -> f32 {
        #[allow(clippy::cast_precision_loss)]
        {
            self.0 as f32 / 100.0
        }
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum SplitError {
    #[error("Split must be 100 or less ({0} > 100)")]
    OutOfRange(u32),
}

/// Equipment category of an exercise, matched against available
/// [`crate::EquipmentInstance`]s during generation and substitution.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub enum ExerciseType {
    Barbell,
    Dumbbell,
    Kettlebell,
    Machine,
    Cable,
    Bodyweight,
    ResistanceBand,
}

impl ExerciseType {
    /// Free-weight and machine movements get a reduced warm-up set.
    #[must_use]
    pub fn needs_warm_up(self) -> bool {
        match self {
            ExerciseType::Barbell
            | ExerciseType::Dumbbell
            | ExerciseType::Kettlebell
            | ExerciseType::Machine => true,
            ExerciseType::Cable | ExerciseType::Bodyweight | ExerciseType::ResistanceBand => false,
        }
    }

    #[must_use]
    pub fn default_rest(self) -> Duration {
        match self {
            ExerciseType::Barbell | ExerciseType::Dumbbell | ExerciseType::Kettlebell => {
                Duration::seconds(150)
            }
            ExerciseType::Machine | ExerciseType::Cable => Duration::seconds(90),
            ExerciseType::Bodyweight | ExerciseType::ResistanceBand => Duration::seconds(60),
        }
    }
}

impl Property for ExerciseType {
    fn iter() -> Iter<'static, ExerciseType> {
        static EXERCISE_TYPES: [ExerciseType; 7] = [
            ExerciseType::Barbell,
            ExerciseType::Dumbbell,
            ExerciseType::Kettlebell,
            ExerciseType::Machine,
            ExerciseType::Cable,
            ExerciseType::Bodyweight,
            ExerciseType::ResistanceBand,
        ];
        EXERCISE_TYPES.iter()
    }

    fn name(self) -> &'static str {
        match self {
            ExerciseType::Barbell => "Barbell",
            ExerciseType::Dumbbell => "Dumbbell",
            ExerciseType::Kettlebell => "Kettlebell",
            ExerciseType::Machine => "Machine",
            ExerciseType::Cable => "Cable",
            ExerciseType::Bodyweight => "Bodyweight",
            ExerciseType::ResistanceBand => "Resistance Band",
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum MovementPattern {
    HorizontalPush,
    VerticalPush,
    HorizontalPull,
    VerticalPull,
    Squat,
    Hinge,
    Lunge,
    Carry,
    Rotation,
    Isolation,
}

impl Property for MovementPattern {
    fn iter() -> Iter<'static, MovementPattern> {
        static MOVEMENT_PATTERNS: [MovementPattern; 10] = [
            MovementPattern::HorizontalPush,
            MovementPattern::VerticalPush,
            MovementPattern::HorizontalPull,
            MovementPattern::VerticalPull,
            MovementPattern::Squat,
            MovementPattern::Hinge,
            MovementPattern::Lunge,
            MovementPattern::Carry,
            MovementPattern::Rotation,
            MovementPattern::Isolation,
        ];
        MOVEMENT_PATTERNS.iter()
    }

    fn name(self) -> &'static str {
        match self {
            MovementPattern::HorizontalPush => "Horizontal Push",
            MovementPattern::VerticalPush => "Vertical Push",
            MovementPattern::HorizontalPull => "Horizontal Pull",
            MovementPattern::VerticalPull => "Vertical Pull",
            MovementPattern::Squat => "Squat",
            MovementPattern::Hinge => "Hinge",
            MovementPattern::Lunge => "Lunge",
            MovementPattern::Carry => "Carry",
            MovementPattern::Rotation => "Rotation",
            MovementPattern::Isolation => "Isolation",
        }
    }
}
