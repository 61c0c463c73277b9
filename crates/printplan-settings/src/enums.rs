//! Enumerated settings
//!
//! Each enum parses from and displays as its settings-file spelling.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! setting_enum {
    (
        $(#[$meta:meta])*
        $name:ident, default = $default:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $text:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $text)] $variant, )+
        }

        impl $name {
            pub fn as_str(self) -> &'static str {
                match self {
                    $( Self::$variant => $text, )+
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::$default
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $( $text => Ok(Self::$variant), )+
                    _ => Err(format!("Unknown {}: {}", stringify!($name), s)),
                }
            }
        }
    };
}

setting_enum! {
    /// Strategy used to place the seam of closed loops
    EZSeamType, default = Shortest {
        /// Start where the previous path ended
        Shortest => "shortest",
        /// Pick a random vertex
        Random => "random",
        /// Start close to a user-given position
        UserSpecified => "back",
        /// Start on the sharpest corner
        SharpestCorner => "sharpest_corner",
        /// Delegated to an external plugin; treated as shortest
        Plugin => "plugin",
    }
}

setting_enum! {
    /// Which corners the sharpest-corner seam prefers
    EZSeamCornerPrefType, default = Inner {
        /// No preference, corners do not matter
        None => "z_seam_corner_none",
        /// Concave corners
        Inner => "z_seam_corner_inner",
        /// Convex corners
        Outer => "z_seam_corner_outer",
        /// Any sharp corner
        Any => "z_seam_corner_any",
        /// Sharp corners, with a bias toward concave ones
        Weighted => "z_seam_corner_weighted",
    }
}

setting_enum! {
    /// Order in which wall insets are printed
    InsetDirection, default = InsideOut {
        InsideOut => "inside_out",
        OutsideIn => "outside_in",
        CenterLast => "center_last",
    }
}

setting_enum! {
    /// Infill pattern
    EFillMethod, default = Grid {
        Lines => "lines",
        Grid => "grid",
        Cubic => "cubic",
        CubicSubdiv => "cubicsubdiv",
        Tetrahedral => "tetrahedral",
        QuarterCubic => "quarter_cubic",
        Triangles => "triangles",
        Trihexagon => "trihexagon",
        Concentric => "concentric",
        ZigZag => "zigzag",
        Cross => "cross",
        Cross3D => "cross_3d",
        Gyroid => "gyroid",
        Lightning => "lightning",
        Plugin => "plugin",
        None => "none",
    }
}

setting_enum! {
    /// Bed adhesion method
    EPlatformAdhesion, default = Skirt {
        Skirt => "skirt",
        Brim => "brim",
        Raft => "raft",
        None => "none",
    }
}
