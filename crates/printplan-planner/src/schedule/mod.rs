//! Print order optimization
//!
//! Features of an extruder plan, and move sequences inside each feature, are
//! ordered greedily: the next item is the one whose closest start candidate
//! is nearest to the current head position, among the items whose ordering
//! constraints are met.

pub mod candidates;
pub mod constraints;
pub mod extruder_plan;
pub mod feature;
pub mod seam;

pub use candidates::{ChangeSequenceAction, ClosestStartPoint, StartCandidatePoint};
pub use constraints::{
    BedAdhesionConstraintsGenerator, FeatureConstraintsGenerator, MeshFeaturesConstraintsGenerator,
    MonotonicConstraintsGenerator, MoveSequencesConstraints, MoveSequencesConstraintsGenerator,
};
pub use extruder_plan::{ExtruderPlanScheduler, OPTIMIZE_SEQUENCES_OPTION};
pub use feature::FeatureExtrusionScheduler;
pub use seam::{
    pre_filter_start_candidates, BestElementFinder, CornerScoringCriterion, CriteriaPass,
    DistanceScoringCriterion, DistanceType, RandomScoringCriterion, ScoringCriterion, WeighedCriterion,
};
