#[derive(thiserror::Error, Debug)]
pub enum RepositoryError {
    #[error("no connection")]
    NoConnection,
    #[error("not found")]
    NotFound,
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error>),
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ValidationError {
    #[error("target duration must be positive")]
    NonPositiveDuration,
}

#[derive(thiserror::Error, Debug)]
pub enum GenerationError {
    #[error("no available equipment")]
    NoAvailableEquipment,
    #[error("only {found} exercises fit the constraints ({required} required)")]
    InsufficientExercises { found: usize, required: usize },
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

#[derive(thiserror::Error, Debug)]
pub enum SubstitutionError {
    #[error("no suitable substitutes")]
    NoSuitableSubstitutes,
    #[error("no substitute matches the selected equipment")]
    EquipmentUnavailable,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

#[derive(thiserror::Error, Debug)]
pub enum CommitError {
    #[error("workout has no exercise groups")]
    EmptyWorkout,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
