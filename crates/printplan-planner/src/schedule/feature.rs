//! Ordering of the move sequences of one feature extrusion

use printplan_core::{Point3, PrintFeatureType};
use printplan_settings::ZSeamConfig;

use super::candidates::{ChangeSequenceAction, ClosestStartPoint, StartCandidatePoint};
use super::constraints::{
    feature_constraints_generators, move_sequences_constraints_generators, MoveSequencesConstraints,
};
use super::seam::pre_filter_start_candidates;
use crate::error::{ScheduleError, ScheduleResult};
use crate::operation::{FeatureExtrusionInfo, OperationPtr};

/// Schedules the move sequences of a feature extrusion
///
/// Built once per feature with every feature of the extruder plan, so that
/// ordering constraints against the other features are known up front.
pub struct FeatureExtrusionScheduler {
    feature: OperationPtr,
    seam_config: Option<ZSeamConfig>,
    /// Features that must be printed after this one
    extrusions_after: Vec<OperationPtr>,
    moves_constraints: MoveSequencesConstraints,
    /// Start candidates of each remaining sequence, in input order
    start_candidates: Vec<(Option<OperationPtr>, Vec<StartCandidatePoint>)>,
    /// Sequences without any start candidate, appended last in input order
    skipped_sequences: Vec<OperationPtr>,
    optimize_sequences: bool,
}

impl FeatureExtrusionScheduler {
    pub fn new(feature: &OperationPtr, all_features: &[OperationPtr]) -> Self {
        Self::with_sequence_optimization(feature, all_features, true)
    }

    /// A scheduler that keeps the input order of the sequences when `optimize_sequences` is false
    pub fn with_sequence_optimization(
        feature: &OperationPtr,
        all_features: &[OperationPtr],
        optimize_sequences: bool,
    ) -> Self {
        let info = feature.feature_info();
        let seam_config = info.as_ref().and_then(seam_config_for);

        let mut extrusions_after = Vec::new();
        let mut moves_constraints = MoveSequencesConstraints::new();
        if let Some(info) = &info {
            for generator in feature_constraints_generators(info.feature_type) {
                generator.append_constraints(feature, all_features, &mut extrusions_after);
            }
            for generator in move_sequences_constraints_generators(info.feature_type) {
                generator.append_constraints(feature, &mut moves_constraints);
            }
        }

        let mut scheduler = Self {
            feature: feature.clone(),
            seam_config,
            extrusions_after,
            moves_constraints,
            start_candidates: Vec::new(),
            skipped_sequences: Vec::new(),
            optimize_sequences: optimize_sequences && seam_config.is_some(),
        };
        scheduler.make_start_candidates();
        scheduler
    }

    pub fn feature(&self) -> &OperationPtr {
        &self.feature
    }

    pub fn seam_config(&self) -> Option<&ZSeamConfig> {
        self.seam_config.as_ref()
    }

    pub fn extrusions_after(&self) -> &[OperationPtr] {
        &self.extrusions_after
    }

    pub fn optimizes_sequences(&self) -> bool {
        self.optimize_sequences
    }

    /// Sequences left out of the ordering because they offer no start position
    pub fn skipped_sequences(&self) -> &[OperationPtr] {
        &self.skipped_sequences
    }

    pub fn has_start_candidates(&self) -> bool {
        self.start_candidates.iter().any(|(_, candidates)| !candidates.is_empty())
    }

    /// Whether `feature` may start, as far as this scheduler is concerned
    pub fn is_feature_processable_now(&self, feature: &OperationPtr) -> bool {
        !self.extrusions_after.contains(feature)
    }

    /// Whether no remaining sequence has to be printed before `sequence`
    pub fn is_move_sequence_processable_now(&self, sequence: &OperationPtr) -> bool {
        !self
            .moves_constraints
            .values()
            .any(|afters| afters.contains(sequence))
    }

    /// Offer every candidate of the currently processable sequences to `closest`
    pub fn evaluate_closest_point(&self, position: Point3, closest: &mut Option<ClosestStartPoint>) {
        for (sequence, candidates) in &self.start_candidates {
            let processable = sequence
                .as_ref()
                .map_or(true, |sequence| self.is_move_sequence_processable_now(sequence));
            if !processable {
                continue;
            }

            for candidate in candidates {
                ClosestStartPoint::offer(closest, candidate, position);
            }
        }
    }

    /// Reorder the feature's sequences, starting with `start`
    ///
    /// `current_position` is left where the last sequence ends. Sequences
    /// without start candidates go last, in input order. On deadlock the
    /// remaining sequences are kept in input order and the error is returned
    /// once the feature has been written back.
    pub fn optimize(&mut self, start: &StartCandidatePoint, current_position: &mut Point3) -> ScheduleResult<()> {
        if !self.optimize_sequences || start.move_sequence.is_none() {
            if let Some(end) = self.feature.find_end_position() {
                *current_position = end;
            }
            self.start_candidates.clear();
            return Ok(());
        }

        let children = self.feature.operations();
        let (mut remaining, mut others): (Vec<OperationPtr>, Vec<OperationPtr>) = children
            .into_iter()
            .partition(|child| child.is_continuous_sequence() && !self.skipped_sequences.contains(child));
        let mut ordered = Vec::with_capacity(remaining.len() + others.len());
        // Skipped sequences keep their relative order, ahead of non-sequence children
        others.sort_by_key(|child| !self.skipped_sequences.contains(child));

        self.append_next(start, &mut ordered, &mut remaining, current_position)?;

        while !remaining.is_empty() {
            let mut closest = None;
            self.evaluate_closest_point(*current_position, &mut closest);

            let Some(closest) = closest else {
                tracing::error!(
                    "Deadlock while ordering {:?}, {} sequence(s) appended unordered",
                    self.feature,
                    remaining.len()
                );
                let count = remaining.len();
                ordered.append(&mut remaining);
                ordered.extend(others);
                self.start_candidates.clear();
                self.feature.set_operations(ordered)?;
                return Err(ScheduleError::Deadlock { remaining: count });
            };

            self.append_next(&closest.point, &mut ordered, &mut remaining, current_position)?;
        }

        ordered.extend(others);
        self.feature.set_operations(ordered)?;
        Ok(())
    }

    fn append_next(
        &mut self,
        candidate: &StartCandidatePoint,
        ordered: &mut Vec<OperationPtr>,
        remaining: &mut Vec<OperationPtr>,
        current_position: &mut Point3,
    ) -> ScheduleResult<()> {
        let Some(sequence) = &candidate.move_sequence else {
            return Ok(());
        };

        candidate.apply_action()?;
        ordered.push(sequence.clone());
        remaining.retain(|other| other != sequence);
        self.start_candidates
            .retain(|(other, _)| other.as_ref() != Some(sequence));
        self.moves_constraints.remove(sequence);

        match sequence.find_end_position() {
            Some(end) => *current_position = end,
            None => tracing::warn!("Appended {:?} without end position", sequence),
        }
        tracing::trace!("Sequence starts at {} ({:?})", candidate.position, candidate.action);
        Ok(())
    }

    fn make_start_candidates(&mut self) {
        if !self.optimize_sequences {
            match self.feature.find_start_position() {
                Some(position) => self.start_candidates.push((
                    None,
                    vec![StartCandidatePoint {
                        position,
                        feature: self.feature.clone(),
                        move_sequence: None,
                        move_operation: None,
                        action: ChangeSequenceAction::None,
                    }],
                )),
                None => tracing::error!("{:?} has no start position", self.feature),
            }
            return;
        }

        let Some(seam_config) = self.seam_config else {
            return;
        };

        for sequence in self.feature.operations_of(OperationPtr::is_continuous_sequence) {
            let candidate = |position, move_operation, action| StartCandidatePoint {
                position,
                feature: self.feature.clone(),
                move_sequence: Some(sequence.clone()),
                move_operation,
                action,
            };

            let mut candidates = Vec::new();
            if sequence.is_closed() == Some(true) {
                for extrusion in sequence.operations_of(OperationPtr::is_extrusion_move) {
                    if let Some(position) = extrusion.position() {
                        candidates.push(candidate(position, Some(extrusion), ChangeSequenceAction::Reorder));
                    }
                }
            } else {
                if let Some(start) = sequence.find_start_position() {
                    candidates.push(candidate(start, None, ChangeSequenceAction::None));
                }
                if let Some(end) = sequence.find_end_position() {
                    candidates.push(candidate(end, None, ChangeSequenceAction::Reverse));
                }
            }

            let candidates = pre_filter_start_candidates(candidates, &seam_config);
            if candidates.is_empty() {
                tracing::warn!("{:?} has no start candidate and is printed last", sequence);
                self.moves_constraints.remove(&sequence);
                self.skipped_sequences.push(sequence);
                continue;
            }
            self.start_candidates.push((Some(sequence), candidates));
        }
    }
}

/// Seam placement used for a feature, if its sequences are reordered at all
fn seam_config_for(info: &FeatureExtrusionInfo) -> Option<ZSeamConfig> {
    match info.feature_type {
        PrintFeatureType::OuterWall => Some(
            info.mesh
                .as_ref()
                .map_or_else(ZSeamConfig::default, |mesh| mesh.seam_config),
        ),
        PrintFeatureType::InnerWall
        | PrintFeatureType::Skin
        | PrintFeatureType::Roof
        | PrintFeatureType::Support
        | PrintFeatureType::SkirtBrim
        | PrintFeatureType::Infill
        | PrintFeatureType::SupportInfill
        | PrintFeatureType::SupportInterface => Some(ZSeamConfig::default()),
        _ => None,
    }
}
