//! Travel route insertion
//!
//! Within every extruder plan, a travel route is inserted wherever the end of
//! one operation and the start of the next one differ. Consecutive extruder
//! plans of a layer are then linked the same way.

use std::sync::Arc;

use printplan_core::Point3;
use printplan_settings::Scene;

use super::{DirectTravelMoveGenerator, SpeedDerivatives, TravelMoveGenerator};
use crate::error::{TransformError, TransformResult};
use crate::operation::OperationPtr;
use crate::transform::{InsertBetween, PrintOperationTransformer, TransformerConfig};

/// Inserts travel routes between disconnected operations of a print plan
pub struct TravelMovesInserter {
    scene: Arc<Scene>,
    generators: Vec<Arc<dyn TravelMoveGenerator>>,
    config: TransformerConfig,
}

impl TravelMovesInserter {
    /// An inserter using direct travel moves
    pub fn new(scene: Arc<Scene>) -> Self {
        Self {
            scene,
            generators: vec![Arc::new(DirectTravelMoveGenerator)],
            config: TransformerConfig::new(),
        }
    }

    /// Use these generators instead, tried in order
    pub fn with_generators(mut self, generators: Vec<Arc<dyn TravelMoveGenerator>>) -> Self {
        self.generators = generators;
        self
    }

    pub fn with_config(mut self, config: TransformerConfig) -> Self {
        self.config = config;
        self
    }

    /// Route from `start` to `end` made by the first generator that succeeds
    pub fn make_travel_route(
        &self,
        start: Point3,
        end: Point3,
        speed: SpeedDerivatives,
    ) -> Option<OperationPtr> {
        if start == end {
            return None;
        }

        self.generators
            .iter()
            .find_map(|generator| generator.generate_travel_route(start, end, speed))
    }

    /// Travel speed for an extruder on a layer, ramping up over the slowdown layers
    pub fn travel_speed(&self, layer_nr: i64, extruder_nr: usize) -> TransformResult<SpeedDerivatives> {
        let settings = self.scene.extruder(extruder_nr)?;
        let initial = SpeedDerivatives::from_settings(
            settings,
            "speed_travel_layer_0",
            "acceleration_travel_layer_0",
            "jerk_travel_layer_0",
        )?;
        if layer_nr <= 0 {
            return Ok(initial);
        }

        let up = SpeedDerivatives::from_settings(
            settings,
            "speed_travel",
            "acceleration_travel",
            "jerk_travel",
        )?;
        let slowdown_layers: i64 = self.scene.settings.get("speed_slowdown_layers")?;
        if layer_nr >= slowdown_layers {
            return Ok(up);
        }

        Ok(up.smooth_speed(&initial, layer_nr, slowdown_layers))
    }

    /// Insert travel routes inside every extruder plan of the layer, then between them
    pub fn process_layer_plan(&self, layer_plan: &OperationPtr) -> TransformResult<usize> {
        let layer_nr = layer_plan.layer_index().unwrap_or(0);
        let extruder_plans = layer_plan.operations_of(OperationPtr::is_extruder_plan);
        let mut inserted = 0;

        for extruder_plan in &extruder_plans {
            let extruder_nr = extruder_plan.extruder_nr().unwrap_or(0);
            let rule = TravelRouteRule {
                inserter: self,
                speed: self.travel_speed(layer_nr, extruder_nr)?,
            };
            inserted += rule.insert_between_recursively(extruder_plan)?;
        }

        for pair in extruder_plans.windows(2) {
            let (before, after) = (&pair[0], &pair[1]);
            let (Some(end), Some(start)) = (before.find_end_position(), after.find_start_position()) else {
                continue;
            };

            let speed = self.travel_speed(layer_nr, before.extruder_nr().unwrap_or(0))?;
            if let Some(route) = self.make_travel_route(end, start, speed) {
                layer_plan.insert_operation_after(&route, before)?;
                inserted += 1;
            }
        }

        tracing::debug!("Inserted {} travel route(s) on layer {}", inserted, layer_nr);
        Ok(inserted)
    }
}

/// Travel insertion with a fixed speed, for one extruder plan
struct TravelRouteRule<'a> {
    inserter: &'a TravelMovesInserter,
    speed: SpeedDerivatives,
}

impl InsertBetween for TravelRouteRule<'_> {
    fn first_operation_matches(&self, operation: &OperationPtr) -> bool {
        operation.find_end_position().is_some()
    }

    fn second_operation_matches(&self, _first: &OperationPtr, second: &OperationPtr) -> bool {
        second.find_start_position().is_some()
    }

    fn make_operation(&self, first: &OperationPtr, second: &OperationPtr) -> Option<OperationPtr> {
        let end = first.find_end_position()?;
        let start = second.find_start_position()?;
        self.inserter.make_travel_route(end, start, self.speed)
    }
}

impl PrintOperationTransformer for TravelMovesInserter {
    fn name(&self) -> &str {
        "travel_moves_inserter"
    }

    fn description(&self) -> &str {
        "Inserts travel routes between disconnected operations"
    }

    fn process(&self, operation: &OperationPtr) -> TransformResult<()> {
        if operation.is_layer_plan() {
            self.process_layer_plan(operation)?;
            return Ok(());
        }

        if !operation.is_print_plan() {
            return Err(TransformError::UnsupportedOperation {
                name: self.name().to_string(),
                operation: format!("{:?}", operation),
            });
        }

        for layer_plan in operation.operations_of(OperationPtr::is_layer_plan) {
            self.process_layer_plan(&layer_plan)?;
        }
        Ok(())
    }

    fn config(&self) -> &TransformerConfig {
        &self.config
    }
}
