//! Ordering constraints between features and between move sequences

use std::collections::HashMap;

use printplan_core::{AngleDegrees, PrintFeatureType};
use printplan_settings::InsetDirection;

use crate::operation::{FeatureExtrusionInfo, OperationPtr};

/// Move sequences that must be printed after a given one, keyed by the earlier sequence
pub type MoveSequencesConstraints = HashMap<OperationPtr, Vec<OperationPtr>>;

/// Lists the features of an extruder plan that must print after a feature
pub trait FeatureConstraintsGenerator {
    fn append_constraints(
        &self,
        feature: &OperationPtr,
        all_features: &[OperationPtr],
        extrusions_after: &mut Vec<OperationPtr>,
    );
}

/// Lists the move sequences of a feature that must print after others
pub trait MoveSequencesConstraintsGenerator {
    fn append_constraints(&self, feature: &OperationPtr, constraints: &mut MoveSequencesConstraints);
}

/// Skirt and brim print before anything else
pub struct BedAdhesionConstraintsGenerator;

impl FeatureConstraintsGenerator for BedAdhesionConstraintsGenerator {
    fn append_constraints(
        &self,
        _feature: &OperationPtr,
        all_features: &[OperationPtr],
        extrusions_after: &mut Vec<OperationPtr>,
    ) {
        extrusions_after.extend(
            all_features
                .iter()
                .filter(|other| other.feature_type() != Some(PrintFeatureType::SkirtBrim))
                .cloned(),
        );
    }
}

/// Order of walls and infill within one mesh
pub struct MeshFeaturesConstraintsGenerator;

impl MeshFeaturesConstraintsGenerator {
    fn is_wall(feature_type: PrintFeatureType) -> bool {
        matches!(feature_type, PrintFeatureType::OuterWall | PrintFeatureType::InnerWall)
    }
}

impl FeatureConstraintsGenerator for MeshFeaturesConstraintsGenerator {
    fn append_constraints(
        &self,
        feature: &OperationPtr,
        all_features: &[OperationPtr],
        extrusions_after: &mut Vec<OperationPtr>,
    ) {
        let Some(info) = feature.feature_info() else {
            return;
        };
        let Some(mesh) = &info.mesh else {
            tracing::error!("{} feature extrusion has no mesh", info.feature_type);
            return;
        };

        let infill_before_walls = mesh.settings.get_or("infill_before_walls", false);
        let inset_direction = mesh.settings.get_or("inset_direction", InsetDirection::InsideOut);

        let inset_after = info.inset_index.and_then(|index| match inset_direction {
            InsetDirection::InsideOut => index.checked_sub(1),
            InsetDirection::OutsideIn => Some(index + 1),
            InsetDirection::CenterLast => None,
        });

        let mut types_after = Vec::new();
        if infill_before_walls {
            if info.feature_type == PrintFeatureType::Infill {
                types_after.extend([PrintFeatureType::OuterWall, PrintFeatureType::InnerWall]);
            }
        } else if Self::is_wall(info.feature_type) {
            types_after.push(PrintFeatureType::Infill);
        }

        if inset_after.is_none() && types_after.is_empty() {
            return;
        }

        for other in all_features {
            if other == feature {
                continue;
            }
            let Some(other_info) = other.feature_info() else {
                continue;
            };
            if !info.same_mesh(&other_info) {
                continue;
            }

            let inset_matches = inset_after.is_some() && other_info.inset_index == inset_after;
            if inset_matches || types_after.contains(&other_info.feature_type) {
                extrusions_after.push(other.clone());
            }
        }
    }
}

/// Adjacent skin lines print in a single sweep direction
pub struct MonotonicConstraintsGenerator;

/// A move sequence projected across the lines (axial) and along them (radial)
struct ProjectedSequence {
    sequence: OperationPtr,
    axial: f64,
    radial_min: f64,
    radial_max: f64,
}

impl MonotonicConstraintsGenerator {
    /// Line angle and monotonic flag of a skin or roof feature
    fn monotonic_angle(info: &FeatureExtrusionInfo) -> Option<AngleDegrees> {
        let mesh = info.mesh.as_ref()?;
        let (flag, angles) = match info.feature_type {
            PrintFeatureType::Roof => ("roofing_monotonic", &mesh.roofing_angles),
            PrintFeatureType::Skin => ("skin_monotonic", &mesh.skin_angles),
            _ => return None,
        };

        if !mesh.settings.get_or(flag, false) {
            return None;
        }
        Some(angles.first().copied().unwrap_or(AngleDegrees::new(45.0)))
    }
}

impl MoveSequencesConstraintsGenerator for MonotonicConstraintsGenerator {
    fn append_constraints(&self, feature: &OperationPtr, constraints: &mut MoveSequencesConstraints) {
        let Some(info) = feature.feature_info() else {
            return;
        };
        let Some(angle) = Self::monotonic_angle(&info) else {
            return;
        };

        let line_width = info.line_width as f64;
        let same_line_distance = 0.5 * line_width;
        let max_adjacent_distance = 1.1 * line_width;

        let radians = angle.radians();
        let axial = (-radians.cos(), radians.sin());
        let radial = (-axial.1, axial.0);
        let project = |vector: (f64, f64), x: i64, y: i64| vector.0 * x as f64 + vector.1 * y as f64;

        let mut projected: Vec<ProjectedSequence> = feature
            .operations_of(OperationPtr::is_continuous_sequence)
            .into_iter()
            .filter_map(|sequence| {
                let start = sequence.find_start_position()?;
                let end = sequence.find_end_position()?;
                let radial_start = project(radial, start.x, start.y);
                let radial_end = project(radial, end.x, end.y);
                Some(ProjectedSequence {
                    axial: project(axial, start.x, start.y).min(project(axial, end.x, end.y)),
                    radial_min: radial_start.min(radial_end),
                    radial_max: radial_start.max(radial_end),
                    sequence,
                })
            })
            .collect();
        projected.sort_by(|a, b| a.axial.total_cmp(&b.axial));

        // Sequences closer than half a line along the axis lie on the same line
        let mut chunks: Vec<Vec<ProjectedSequence>> = Vec::new();
        for item in projected {
            match chunks.last_mut() {
                Some(chunk)
                    if chunk
                        .last()
                        .is_some_and(|last| item.axial - last.axial < same_line_distance) =>
                {
                    chunk.push(item)
                }
                _ => chunks.push(vec![item]),
            }
        }

        let mut added = 0;
        for pair in chunks.windows(2) {
            for previous in &pair[0] {
                for next in &pair[1] {
                    let adjacent = previous.radial_min - next.radial_max <= max_adjacent_distance
                        && next.radial_min - previous.radial_max <= max_adjacent_distance;
                    if adjacent {
                        constraints
                            .entry(previous.sequence.clone())
                            .or_default()
                            .push(next.sequence.clone());
                        added += 1;
                    }
                }
            }
        }

        tracing::trace!(
            "Monotonic {} at {}: {} constraint(s) over {} line(s)",
            info.feature_type,
            angle,
            added,
            chunks.len()
        );
    }
}

/// Feature constraint generators applying to a feature type
pub fn feature_constraints_generators(
    feature_type: PrintFeatureType,
) -> Vec<Box<dyn FeatureConstraintsGenerator>> {
    match feature_type {
        PrintFeatureType::SkirtBrim => vec![Box::new(BedAdhesionConstraintsGenerator)],
        PrintFeatureType::OuterWall
        | PrintFeatureType::InnerWall
        | PrintFeatureType::Skin
        | PrintFeatureType::Roof
        | PrintFeatureType::Infill => vec![Box::new(MeshFeaturesConstraintsGenerator)],
        _ => Vec::new(),
    }
}

/// Move sequence constraint generators applying to a feature type
pub fn move_sequences_constraints_generators(
    feature_type: PrintFeatureType,
) -> Vec<Box<dyn MoveSequencesConstraintsGenerator>> {
    match feature_type {
        PrintFeatureType::Skin | PrintFeatureType::Roof => vec![Box::new(MonotonicConstraintsGenerator)],
        _ => Vec::new(),
    }
}
