//! Print feature taxonomy
//!
//! Every extrusion or travel belongs to a feature type. The scheduler uses it
//! to pick seam policies and ordering constraints, and exporters receive it
//! with every travel move.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of geometry a feature extrusion or travel route represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrintFeatureType {
    /// Unclassified
    NoneType,
    /// Outermost wall of a mesh
    OuterWall,
    /// Any wall besides the outer one
    InnerWall,
    /// Top/bottom skin
    Skin,
    /// Support structure walls
    Support,
    /// Skirt or brim bed adhesion lines
    SkirtBrim,
    /// Sparse infill
    Infill,
    /// Support infill
    SupportInfill,
    /// Travel avoiding printed parts
    MoveCombing,
    /// Travel with retraction
    MoveRetraction,
    /// Support interface (roof or floor)
    SupportInterface,
    /// Prime tower
    PrimeTower,
    /// Topmost skin
    Roof,
}

impl PrintFeatureType {
    /// All feature types in declaration order
    pub const ALL: [PrintFeatureType; 13] = [
        Self::NoneType,
        Self::OuterWall,
        Self::InnerWall,
        Self::Skin,
        Self::Support,
        Self::SkirtBrim,
        Self::Infill,
        Self::SupportInfill,
        Self::MoveCombing,
        Self::MoveRetraction,
        Self::SupportInterface,
        Self::PrimeTower,
        Self::Roof,
    ];

    /// Whether this type describes a non-extruding move
    pub fn is_travel(self) -> bool {
        matches!(self, Self::MoveCombing | Self::MoveRetraction)
    }

    /// Whether this type is a wall of a mesh
    pub fn is_wall(self) -> bool {
        matches!(self, Self::OuterWall | Self::InnerWall)
    }

    /// Setting-style name of this feature type
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NoneType => "none",
            Self::OuterWall => "outer_wall",
            Self::InnerWall => "inner_wall",
            Self::Skin => "skin",
            Self::Support => "support",
            Self::SkirtBrim => "skirt_brim",
            Self::Infill => "infill",
            Self::SupportInfill => "support_infill",
            Self::MoveCombing => "move_combing",
            Self::MoveRetraction => "move_retraction",
            Self::SupportInterface => "support_interface",
            Self::PrimeTower => "prime_tower",
            Self::Roof => "roof",
        }
    }
}

impl Default for PrintFeatureType {
    fn default() -> Self {
        Self::NoneType
    }
}

impl fmt::Display for PrintFeatureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PrintFeatureType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|feature| feature.as_str() == lowered)
            .ok_or_else(|| format!("Unknown print feature type: {}", s))
    }
}
