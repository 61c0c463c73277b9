//! Start candidates of move sequences

use printplan_core::{Coord, Point3};

use crate::error::OperationResult;
use crate::operation::OperationPtr;

/// What to do to a move sequence so that it starts at a candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeSequenceAction {
    /// Print as is
    None,
    /// Rotate a closed sequence so it ends with the candidate move
    Reorder,
    /// Print an open sequence backwards
    Reverse,
}

/// A position where printing of a feature may start
#[derive(Debug, Clone)]
pub struct StartCandidatePoint {
    pub position: Point3,
    pub feature: OperationPtr,
    /// `None` when the feature is printed as a whole, without reordering
    pub move_sequence: Option<OperationPtr>,
    /// Move to end the sequence with, for [`ChangeSequenceAction::Reorder`]
    pub move_operation: Option<OperationPtr>,
    pub action: ChangeSequenceAction,
}

impl StartCandidatePoint {
    /// Change the move sequence so that it starts at this candidate
    pub fn apply_action(&self) -> OperationResult<()> {
        let Some(move_sequence) = &self.move_sequence else {
            return Ok(());
        };

        match self.action {
            ChangeSequenceAction::None => Ok(()),
            ChangeSequenceAction::Reorder => match &self.move_operation {
                Some(move_operation) => move_sequence.reorder_to_end_with(move_operation),
                None => Ok(()),
            },
            ChangeSequenceAction::Reverse => move_sequence.reverse(),
        }
    }
}

/// Best candidate found so far, with its squared distance to the head
#[derive(Debug, Clone)]
pub struct ClosestStartPoint {
    pub distance_squared: Coord,
    pub point: StartCandidatePoint,
}

impl ClosestStartPoint {
    /// Keep `candidate` if it is strictly closer to `position`
    pub fn offer(closest: &mut Option<ClosestStartPoint>, candidate: &StartCandidatePoint, position: Point3) {
        let distance_squared = (candidate.position - position).vsize2();
        let closer = closest
            .as_ref()
            .map_or(true, |current| distance_squared < current.distance_squared);

        if closer {
            *closest = Some(ClosestStartPoint {
                distance_squared,
                point: candidate.clone(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operation::{ExtrusionMove, FeatureExtrusionInfo};
    use printplan_core::PrintFeatureType;

    fn candidate(feature: &OperationPtr, x: Coord) -> StartCandidatePoint {
        StartCandidatePoint {
            position: Point3::new(x, 0, 0),
            feature: feature.clone(),
            move_sequence: None,
            move_operation: None,
            action: ChangeSequenceAction::None,
        }
    }

    #[test]
    fn test_offer_keeps_first_on_ties() {
        let feature = OperationPtr::feature_extrusion(FeatureExtrusionInfo::new(PrintFeatureType::Skin, 400));
        let mut closest = None;

        ClosestStartPoint::offer(&mut closest, &candidate(&feature, 10), Point3::ORIGIN);
        ClosestStartPoint::offer(&mut closest, &candidate(&feature, -10), Point3::ORIGIN);
        assert_eq!(closest.as_ref().map(|c| c.point.position.x), Some(10));

        ClosestStartPoint::offer(&mut closest, &candidate(&feature, 3), Point3::ORIGIN);
        assert_eq!(closest.as_ref().map(|c| c.distance_squared), Some(9));
    }

    #[test]
    fn test_apply_reverse_action() {
        let feature = OperationPtr::feature_extrusion(FeatureExtrusionInfo::new(PrintFeatureType::Skin, 400));
        let line = OperationPtr::open_sequence(Point3::ORIGIN);
        line.append_operation(&ExtrusionMove::new(Point3::new(10, 0, 0), 400, 30.0).into())
            .unwrap();

        let candidate = StartCandidatePoint {
            position: Point3::new(10, 0, 0),
            feature,
            move_sequence: Some(line.clone()),
            move_operation: None,
            action: ChangeSequenceAction::Reverse,
        };
        candidate.apply_action().unwrap();

        assert_eq!(line.find_start_position(), Some(Point3::new(10, 0, 0)));
        assert_eq!(line.find_end_position(), Some(Point3::ORIGIN));
    }
}
