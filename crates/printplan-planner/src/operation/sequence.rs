//! Sequence variants of the operation tree

use std::sync::Arc;

use printplan_core::{Coord, Point3, PrintFeatureType};
use printplan_settings::MeshSettings;

use super::OperationPtr;
use crate::travel::SpeedDerivatives;

/// Geometry shared by every move sequence of one feature
#[derive(Debug, Clone)]
pub struct FeatureExtrusionInfo {
    pub feature_type: PrintFeatureType,
    /// Nominal line width
    pub line_width: Coord,
    /// Mesh the feature belongs to; compare with `Arc::ptr_eq`
    pub mesh: Option<Arc<MeshSettings>>,
    /// Wall number counted from the outside, for wall features
    pub inset_index: Option<usize>,
}

impl FeatureExtrusionInfo {
    pub fn new(feature_type: PrintFeatureType, line_width: Coord) -> Self {
        Self {
            feature_type,
            line_width,
            mesh: None,
            inset_index: None,
        }
    }

    pub fn with_mesh(mut self, mesh: Arc<MeshSettings>) -> Self {
        self.mesh = Some(mesh);
        self
    }

    pub fn with_inset_index(mut self, inset_index: usize) -> Self {
        self.inset_index = Some(inset_index);
        self
    }

    /// Whether both features belong to the same mesh instance
    pub fn same_mesh(&self, other: &FeatureExtrusionInfo) -> bool {
        match (&self.mesh, &other.mesh) {
            (Some(mine), Some(theirs)) => Arc::ptr_eq(mine, theirs),
            _ => false,
        }
    }
}

/// What a sequence node represents
#[derive(Debug, Clone)]
pub enum SequenceKind {
    /// One unbroken bead; open sequences start at `start_position`
    ContinuousMoves {
        closed: bool,
        start_position: Option<Point3>,
    },
    /// Non-extruding moves
    TravelRoute {
        feature_type: PrintFeatureType,
        speed: SpeedDerivatives,
    },
    FeatureExtrusion(FeatureExtrusionInfo),
    /// Everything one extruder prints on a layer
    ExtruderPlan {
        extruder_nr: usize,
        temperature: Option<f64>,
        wait: bool,
    },
    LayerChange {
        layer_index: i64,
    },
    LayerPlan {
        layer_index: i64,
        z: Coord,
    },
    PrintPlan,
}

impl SequenceKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::ContinuousMoves { .. } => "continuous move sequence",
            Self::TravelRoute { .. } => "travel route",
            Self::FeatureExtrusion(_) => "feature extrusion",
            Self::ExtruderPlan { .. } => "extruder plan",
            Self::LayerChange { .. } => "layer change",
            Self::LayerPlan { .. } => "layer plan",
            Self::PrintPlan => "print plan",
        }
    }
}

/// An ordered list of child operations; insertion order is print order
#[derive(Debug, Clone)]
pub struct OperationSequence {
    pub kind: SequenceKind,
    pub(crate) operations: Vec<OperationPtr>,
}

impl OperationSequence {
    pub fn new(kind: SequenceKind) -> Self {
        Self {
            kind,
            operations: Vec::new(),
        }
    }

    pub fn operations(&self) -> &[OperationPtr] {
        &self.operations
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn contains(&self, operation: &OperationPtr) -> bool {
        self.operations.contains(operation)
    }
}
