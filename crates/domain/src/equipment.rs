use std::collections::BTreeSet;

use derive_more::Deref;
use uuid::Uuid;

use crate::{ExerciseType, RepositoryError};

#[allow(async_fn_in_trait)]
pub trait EquipmentRepository {
    async fn read_equipment(&self) -> Result<Vec<EquipmentInstance>, RepositoryError>;
}

/// One physical unit of gym equipment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EquipmentInstance {
    pub id: EquipmentID,
    pub exercise_type: ExerciseType,
    pub floor_id: FloorID,
    pub capacity: u32,
    pub is_available: bool,
}

#[derive(Deref, Debug, Default, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct EquipmentID(Uuid);

impl EquipmentID {
    #[must_use]
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }

    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl From<Uuid> for EquipmentID {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<u128> for EquipmentID {
    fn from(value: u128) -> Self {
        Self(Uuid::from_bytes(value.to_be_bytes()))
    }
}

#[derive(Deref, Debug, Default, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct FloorID(Uuid);

impl From<Uuid> for FloorID {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<u128> for FloorID {
    fn from(value: u128) -> Self {
        Self(Uuid::from_bytes(value.to_be_bytes()))
    }
}

/// Exercise types usable with the given equipment, optionally restricted to
/// one floor. Unavailable units are excluded.
#[must_use]
pub fn available_types(
    equipment: &[EquipmentInstance],
    preferred_floor: Option<FloorID>,
) -> BTreeSet<ExerciseType> {
    equipment
        .iter()
        .filter(|e| e.is_available)
        .filter(|e| preferred_floor.is_none_or(|floor| e.floor_id == floor))
        .map(|e| e.exercise_type)
        .collect()
}
