use std::collections::{BTreeMap, BTreeSet};

use derive_more::Into;

use crate::{Exercise, ExerciseID, ExerciseType, MuscleGroup, RepositoryError, Split, SubstitutionError};

#[allow(async_fn_in_trait)]
pub trait SubstitutionRepository {
    /// Returns the precomputed substitution rows for a primary exercise.
    async fn read_substitutions(
        &self,
        primary: ExerciseID,
    ) -> Result<Vec<PrecomputedSubstitution>, RepositoryError>;
}

/// Precomputed similarity between a primary exercise and one candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct PrecomputedSubstitution {
    pub primary_exercise_id: ExerciseID,
    pub substitute_exercise_id: ExerciseID,
    pub similarity: Similarity,
    pub overlap: Overlap,
}

#[derive(Debug, Default, Into, Clone, Copy, PartialEq, PartialOrd)]
pub struct Similarity(f32);

impl Similarity {
    /// Minimum similarity for an exercise to qualify as a substitute.
    pub const SUBSTITUTE_MIN: Similarity = Similarity(0.70);

    pub fn new(value: f32) -> Result<Self, SimilarityError> {
        if !(0.0..=1.0).contains(&value) {
            return Err(SimilarityError::OutOfRange);
        }

        Ok(Self(value))
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum SimilarityError {
    #[error("Similarity must be in the range 0.0 to 1.0")]
    OutOfRange,
}

/// Percentage of the primary exercise's muscle stimulus a candidate covers.
#[derive(Debug, Default, Into, Clone, Copy, PartialEq, PartialOrd)]
pub struct Overlap(f32);

impl Overlap {
    /// Minimum muscle overlap for an exercise to qualify as a substitute.
    pub const SUBSTITUTE_MIN: Overlap = Overlap(80.0);

    pub fn new(value: f32) -> Result<Self, OverlapError> {
        if !(0.0..=100.0).contains(&value) {
            return Err(OverlapError::OutOfRange);
        }

        Ok(Self(value))
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum OverlapError {
    #[error("Overlap must be in the range 0.0 to 100.0")]
    OutOfRange,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubstitutionCandidate {
    pub exercise: Exercise,
    pub similarity: Similarity,
    pub overlap: Overlap,
}

impl SubstitutionCandidate {
    #[must_use]
    pub fn muscle_splits(&self) -> BTreeMap<MuscleGroup, Split> {
        self.exercise.muscle_splits()
    }
}

/// Candidates meeting the substitution thresholds, best match first.
///
/// Rows referencing unknown or soft-deleted exercises are dropped. Multiple
/// rows for one candidate collapse into a single entry keeping the highest
/// similarity. The result is strictly descending by similarity; ties are
/// broken by ascending exercise id so the ranking is deterministic.
#[must_use]
pub fn rank_candidates(
    rows: &[PrecomputedSubstitution],
    exercises: &BTreeMap<ExerciseID, Exercise>,
) -> Vec<SubstitutionCandidate> {
    let mut per_exercise: BTreeMap<ExerciseID, &PrecomputedSubstitution> = BTreeMap::new();

    for row in rows {
        if row.similarity < Similarity::SUBSTITUTE_MIN || row.overlap < Overlap::SUBSTITUTE_MIN {
            continue;
        }
        let Some(exercise) = exercises.get(&row.substitute_exercise_id) else {
            continue;
        };
        if exercise.deleted {
            continue;
        }
        per_exercise
            .entry(row.substitute_exercise_id)
            .and_modify(|best| {
                if row.similarity > best.similarity {
                    *best = row;
                }
            })
            .or_insert(row);
    }

    let mut candidates = per_exercise
        .into_iter()
        .map(|(id, row)| SubstitutionCandidate {
            exercise: exercises[&id].clone(),
            similarity: row.similarity,
            overlap: row.overlap,
        })
        .collect::<Vec<_>>();
    candidates.sort_by(|a, b| {
        f32::from(b.similarity)
            .total_cmp(&f32::from(a.similarity))
            .then_with(|| a.exercise.id.cmp(&b.exercise.id))
    });
    candidates
}

/// Picks the replacement exercise among ranked candidates whose type matches
/// the selected equipment.
pub fn pick_substitute(
    candidates: Vec<SubstitutionCandidate>,
    selected_types: &BTreeSet<ExerciseType>,
) -> Result<Exercise, SubstitutionError> {
    if candidates.is_empty() {
        return Err(SubstitutionError::NoSuitableSubstitutes);
    }

    candidates
        .into_iter()
        .find(|c| selected_types.contains(&c.exercise.exercise_type))
        .map(|c| c.exercise)
        .ok_or(SubstitutionError::EquipmentUnavailable)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use crate::{MovementPattern, MuscleSplit, Name};

    use super::*;

    fn exercise(id: u128, exercise_type: ExerciseType, deleted: bool) -> Exercise {
        Exercise {
            id: id.into(),
            name: Name::new("Chest Press").unwrap(),
            exercise_type,
            movement_pattern: MovementPattern::HorizontalPush,
            description: None,
            deleted,
            muscles: vec![MuscleSplit {
                muscle_group: MuscleGroup::Chest,
                split: Split::PRIMARY,
            }],
        }
    }

    fn row(substitute: u128, similarity: f32, overlap: f32) -> PrecomputedSubstitution {
        PrecomputedSubstitution {
            primary_exercise_id: 1.into(),
            substitute_exercise_id: substitute.into(),
            similarity: Similarity::new(similarity).unwrap(),
            overlap: Overlap::new(overlap).unwrap(),
        }
    }

    fn exercises() -> BTreeMap<ExerciseID, Exercise> {
        BTreeMap::from([
            (2.into(), exercise(2, ExerciseType::Dumbbell, false)),
            (3.into(), exercise(3, ExerciseType::Machine, false)),
            (4.into(), exercise(4, ExerciseType::Cable, false)),
            (5.into(), exercise(5, ExerciseType::Barbell, true)),
        ])
    }

    #[rstest]
    #[case(0.0, Ok(Similarity(0.0)))]
    #[case(1.0, Ok(Similarity(1.0)))]
    #[case(1.1, Err(SimilarityError::OutOfRange))]
    #[case(-0.1, Err(SimilarityError::OutOfRange))]
    fn test_similarity_new(
        #[case] value: f32,
        #[case] expected: Result<Similarity, SimilarityError>,
    ) {
        assert_eq!(Similarity::new(value), expected);
    }

    #[rstest]
    #[case(0.0, Ok(Overlap(0.0)))]
    #[case(100.0, Ok(Overlap(100.0)))]
    #[case(100.1, Err(OverlapError::OutOfRange))]
    #[case(-0.1, Err(OverlapError::OutOfRange))]
    fn test_overlap_new(#[case] value: f32, #[case] expected: Result<Overlap, OverlapError>) {
        assert_eq!(Overlap::new(value), expected);
    }

    #[test]
    fn test_rank_candidates_descending_by_similarity() {
        let candidates = rank_candidates(
            &[row(2, 0.75, 90.0), row(3, 0.95, 85.0), row(4, 0.80, 100.0)],
            &exercises(),
        );

        assert_eq!(
            candidates
                .iter()
                .map(|c| c.exercise.id)
                .collect::<Vec<_>>(),
            vec![3.into(), 4.into(), 2.into()]
        );
    }

    #[rstest]
    #[case::below_similarity(row(2, 0.69, 90.0))]
    #[case::below_overlap(row(2, 0.75, 79.9))]
    #[case::deleted_exercise(row(5, 0.95, 90.0))]
    #[case::unknown_exercise(row(9, 0.95, 90.0))]
    fn test_rank_candidates_filtered(#[case] filtered: PrecomputedSubstitution) {
        assert_eq!(rank_candidates(&[filtered], &exercises()), vec![]);
    }

    #[test]
    fn test_rank_candidates_thresholds_inclusive() {
        let candidates = rank_candidates(&[row(2, 0.70, 80.0)], &exercises());

        assert_eq!(candidates.len(), 1);
    }

    #[test]
    fn test_rank_candidates_ties_broken_by_exercise_id() {
        let candidates = rank_candidates(&[row(3, 0.80, 90.0), row(2, 0.80, 90.0)], &exercises());

        assert_eq!(
            candidates
                .iter()
                .map(|c| c.exercise.id)
                .collect::<Vec<_>>(),
            vec![2.into(), 3.into()]
        );
    }

    #[test]
    fn test_rank_candidates_duplicate_rows_collapse() {
        let candidates = rank_candidates(&[row(2, 0.75, 90.0), row(2, 0.85, 90.0)], &exercises());

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].similarity, Similarity(0.85));
    }

    #[test]
    fn test_pick_substitute() {
        let candidates = rank_candidates(
            &[row(2, 0.75, 90.0), row(3, 0.95, 85.0)],
            &exercises(),
        );

        let result = pick_substitute(
            candidates,
            &BTreeSet::from([ExerciseType::Dumbbell, ExerciseType::Machine]),
        );

        assert_eq!(result.unwrap().id, 3.into());
    }

    #[test]
    fn test_pick_substitute_no_candidates() {
        assert!(matches!(
            pick_substitute(vec![], &BTreeSet::from([ExerciseType::Dumbbell])),
            Err(SubstitutionError::NoSuitableSubstitutes)
        ));
    }

    #[test]
    fn test_pick_substitute_equipment_unavailable() {
        let candidates = rank_candidates(&[row(2, 0.75, 90.0)], &exercises());

        assert!(matches!(
            pick_substitute(candidates, &BTreeSet::from([ExerciseType::Barbell])),
            Err(SubstitutionError::EquipmentUnavailable)
        ));
    }
}
