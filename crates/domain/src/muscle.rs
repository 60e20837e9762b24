use std::slice::Iter;

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub enum MuscleGroup {
    Chest = 1,
    Back = 2,
    Shoulders = 3,
    Biceps = 4,
    Triceps = 5,
    Forearms = 6,
    Core = 7,
    LowerBack = 8,
    Glutes = 9,
    Quads = 10,
    Hamstrings = 11,
    Calves = 12,
}

impl Property for MuscleGroup {
    fn iter() -> Iter<'static, MuscleGroup> {
        static MUSCLE_GROUPS: [MuscleGroup; 12] = [
            MuscleGroup::Chest,
            MuscleGroup::Back,
            MuscleGroup::Shoulders,
            MuscleGroup::Biceps,
            MuscleGroup::Triceps,
            MuscleGroup::Forearms,
            MuscleGroup::Core,
            MuscleGroup::LowerBack,
            MuscleGroup::Glutes,
            MuscleGroup::Quads,
            MuscleGroup::Hamstrings,
            MuscleGroup::Calves,
        ];
        MUSCLE_GROUPS.iter()
    }

    #[must_use]
    fn name(self) -> &'static str {
        match self {
            MuscleGroup::Chest => "Chest",
            MuscleGroup::Back => "Back",
            MuscleGroup::Shoulders => "Shoulders",
            MuscleGroup::Biceps => "Biceps",
            MuscleGroup::Triceps => "Triceps",
            MuscleGroup::Forearms => "Forearms",
            MuscleGroup::Core => "Core",
            MuscleGroup::LowerBack => "Lower Back",
            MuscleGroup::Glutes => "Glutes",
            MuscleGroup::Quads => "Quads",
            MuscleGroup::Hamstrings => "Hamstrings",
            MuscleGroup::Calves => "Calves",
        }
    }
}

impl MuscleGroup {
    /// Large muscle groups recover more slowly than small ones and get a
    /// longer default recovery half-life.
    #[must_use]
    pub fn is_large(self) -> bool {
        match self {
            MuscleGroup::Chest
            | MuscleGroup::Back
            | MuscleGroup::LowerBack
            | MuscleGroup::Glutes
            | MuscleGroup::Quads
            | MuscleGroup::Hamstrings => true,
            MuscleGroup::Shoulders
            | MuscleGroup::Biceps
            | MuscleGroup::Triceps
            | MuscleGroup::Forearms
            | MuscleGroup::Core
            | MuscleGroup::Calves => false,
        }
    }
}

impl TryFrom<u8> for MuscleGroup {
    type Error = MuscleGroupError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            x if x == MuscleGroup::Chest as u8 => Ok(MuscleGroup::Chest),
            x if x == MuscleGroup::Back as u8 => Ok(MuscleGroup::Back),
            x if x == MuscleGroup::Shoulders as u8 => Ok(MuscleGroup::Shoulders),
            x if x == MuscleGroup::Biceps as u8 => Ok(MuscleGroup::Biceps),
            x if x == MuscleGroup::Triceps as u8 => Ok(MuscleGroup::Triceps),
            x if x == MuscleGroup::Forearms as u8 => Ok(MuscleGroup::Forearms),
            x if x == MuscleGroup::Core as u8 => Ok(MuscleGroup::Core),
            x if x == MuscleGroup::LowerBack as u8 => Ok(MuscleGroup::LowerBack),
            x if x == MuscleGroup::Glutes as u8 => Ok(MuscleGroup::Glutes),
            x if x == MuscleGroup::Quads as u8 => Ok(MuscleGroup::Quads),
            x if x == MuscleGroup::Hamstrings as u8 => Ok(MuscleGroup::Hamstrings),
            x if x == MuscleGroup::Calves as u8 => Ok(MuscleGroup::Calves),
            _ => Err(MuscleGroupError::Invalid),
        }
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum MuscleGroupError {
    #[error("Invalid muscle group")]
    Invalid,
}

pub trait Property: Clone + Copy + Sized {
    fn iter() -> Iter<'static, Self>;
    fn name(self) -> &'static str;
}
