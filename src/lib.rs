//! # printplan
//!
//! The print planning core of an FDM slicer:
//! - A tree of print operations, from the whole print down to single moves
//! - Ordering of feature extrusions inside each extruder plan
//! - Seam selection for closed loops
//! - Travel moves between disconnected operations
//! - Bridge detection and bridge-over-infill expansion
//!
//! ## Architecture
//!
//! printplan is organized as a workspace with multiple crates:
//!
//! 1. **printplan-core** - Coordinates, points, polygons, shapes, fuzzy comparisons
//! 2. **printplan-settings** - Settings lookup, seam configuration, mesh and scene settings
//! 3. **printplan-planner** - Operation tree, schedulers, transformers, travel insertion, export
//! 4. **printplan-bridge** - Segment overlap engine, bridge angle, bridge-over-infill shapes
//! 5. **printplan** - This facade: re-exports, logging setup and the default pipeline

pub mod error;

pub use error::{Error, Result};

pub use printplan_core::{
    coord_to_mm, fuzzy_equal, fuzzy_is_greater_or_equal, fuzzy_is_lesser_or_equal, fuzzy_not_equal,
    mm_to_coord, sign, Aabb, AngleDegrees, Coord, GeometryError, Point2, Point3, PointMatrix, Polygon,
    Polyline, PrintFeatureType, Shape, EPSILON,
};

pub use printplan_settings::{
    default_settings_path, EFillMethod, EPlatformAdhesion, EZSeamCornerPrefType, EZSeamType,
    InsetDirection, MeshSettings, Scene, Settings, SettingsError, ZSeamConfig,
};

pub use printplan_planner::{
    ExportedInstruction, ExtruderPlanScheduler, ExtrusionMove, FeatureExtrusionInfo,
    FeatureExtrusionScheduler, OperationError, OperationPtr, PlanExporter, PrintOperationTransformer,
    RecordingExporter, ScheduleError, SearchOrder, TransformError, TransformerHandle,
    TransformerPipeline, TransformerRegistry, TravelMove, TravelMovesInserter,
};

pub use printplan_bridge::{
    bridge_angle, bridge_over_infill_angle, make_bridge_over_infill_printable, BridgeError,
    CavalierShapeOps, LayerBelow, LayerPartBelow, MeshLayerBelow, ShapeOps, SupportLayerBelow,
};

use std::path::Path;
use std::sync::Arc;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Transformers run by [`process_print_plan`], in order
pub const DEFAULT_PIPELINE: &[&str] = &["extruder_plan_scheduler", "travel_moves_inserter"];

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output with pretty formatting
/// - RUST_LOG environment variable support
///
/// Fails if a global subscriber is already installed.
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(true)
        .with_level(true)
        .with_thread_ids(true)
        .with_thread_names(true)
        .with_line_number(true)
        .pretty();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}

/// Registry with every built-in transformer, bound to `scene`
pub fn default_registry(scene: Arc<Scene>) -> TransformerRegistry {
    let mut registry = TransformerRegistry::new();
    registry
        .register("extruder_plan_scheduler", || {
            Arc::new(ExtruderPlanScheduler::new()) as TransformerHandle
        })
        .register("travel_moves_inserter", move || {
            Arc::new(TravelMovesInserter::new(scene.clone())) as TransformerHandle
        });
    registry
}

/// Order every extruder plan of `plan`, then link it with travel moves
///
/// `plan` must be the root print plan.
pub fn process_print_plan(plan: &OperationPtr, scene: Arc<Scene>) -> Result<()> {
    if !plan.is_print_plan() {
        return Err(Error::other(format!("Expected a print plan, got {:?}", plan)));
    }

    let pipeline = default_registry(scene).create_pipeline(DEFAULT_PIPELINE)?;
    pipeline.process(plan)?;

    tracing::info!(
        "Processed print plan with {} layer(s)",
        plan.operations_of(OperationPtr::is_layer_plan).len()
    );
    Ok(())
}

/// Build a scene from a global settings file and one file per extruder
///
/// Files are JSON or TOML, chosen by extension.
pub fn load_scene(global: &Path, extruders: &[&Path]) -> Result<Scene> {
    let mut scene = Scene::new(Settings::load_from_file(global)?);
    for path in extruders {
        scene = scene.with_extruder(Settings::load_from_file(path)?);
    }
    tracing::debug!("Loaded scene with {} extruder(s) from {}", scene.extruder_count(), global.display());
    Ok(scene)
}
