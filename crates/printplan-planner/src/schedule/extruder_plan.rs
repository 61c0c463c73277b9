//! Ordering of the feature extrusions of extruder plans

use printplan_core::Point3;

use super::candidates::ClosestStartPoint;
use super::feature::FeatureExtrusionScheduler;
use crate::error::{ScheduleError, ScheduleResult, TransformError, TransformResult};
use crate::operation::{OperationPtr, SearchOrder};
use crate::transform::{PrintOperationTransformer, TransformerConfig};

/// Option disabling the reordering of move sequences inside features
pub const OPTIMIZE_SEQUENCES_OPTION: &str = "optimize_sequences";

/// Orders the features of every extruder plan to keep travels short
///
/// The head position is carried from one extruder plan to the next, across
/// layers, starting at the origin.
pub struct ExtruderPlanScheduler {
    config: TransformerConfig,
}

impl ExtruderPlanScheduler {
    pub fn new() -> Self {
        Self {
            config: TransformerConfig::new(),
        }
    }

    pub fn with_config(mut self, config: TransformerConfig) -> Self {
        self.config = config;
        self
    }

    fn optimize_sequences(&self) -> bool {
        self.config.get_option(OPTIMIZE_SEQUENCES_OPTION) != Some("false")
    }

    /// Order the features of one extruder plan, starting from `current_position`
    ///
    /// Non-feature children stay in front. Features without any start
    /// position are moved to the end, in input order.
    pub fn schedule(&self, extruder_plan: &OperationPtr, current_position: &mut Point3) -> ScheduleResult<()> {
        let (features, mut ordered): (Vec<OperationPtr>, Vec<OperationPtr>) = extruder_plan
            .operations()
            .into_iter()
            .partition(OperationPtr::is_feature_extrusion);

        let optimize = self.optimize_sequences();
        let (mut schedulers, unplaceable): (Vec<FeatureExtrusionScheduler>, Vec<FeatureExtrusionScheduler>) =
            features
                .iter()
                .map(|feature| FeatureExtrusionScheduler::with_sequence_optimization(feature, &features, optimize))
                .partition(FeatureExtrusionScheduler::has_start_candidates);

        let mut first_error = None;
        while !schedulers.is_empty() {
            let mut closest: Option<ClosestStartPoint> = None;
            for scheduler in &schedulers {
                let processable = schedulers
                    .iter()
                    .all(|other| other.is_feature_processable_now(scheduler.feature()));
                if processable {
                    scheduler.evaluate_closest_point(*current_position, &mut closest);
                }
            }

            let Some(closest) = closest else {
                tracing::error!(
                    "Deadlock while ordering features of {:?}, {} feature(s) appended unordered",
                    extruder_plan,
                    schedulers.len()
                );
                let remaining = schedulers.len();
                ordered.extend(schedulers.iter().map(|scheduler| scheduler.feature().clone()));
                ordered.extend(unplaceable.iter().map(|scheduler| scheduler.feature().clone()));
                extruder_plan.set_operations(ordered)?;
                return Err(ScheduleError::Deadlock { remaining });
            };

            let Some(index) = schedulers
                .iter()
                .position(|scheduler| scheduler.feature() == &closest.point.feature)
            else {
                break;
            };

            let mut scheduler = schedulers.remove(index);
            tracing::debug!("Next feature {:?} from {}", scheduler.feature(), closest.point.position);
            if let Err(e) = scheduler.optimize(&closest.point, current_position) {
                tracing::warn!("Feature kept partly unordered: {}", e);
                first_error.get_or_insert(e);
            }
            ordered.push(scheduler.feature().clone());
        }

        ordered.extend(schedulers.iter().map(|scheduler| scheduler.feature().clone()));
        ordered.extend(unplaceable.iter().map(|scheduler| scheduler.feature().clone()));
        extruder_plan.set_operations(ordered)?;

        first_error.map_or(Ok(()), Err)
    }
}

impl Default for ExtruderPlanScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl PrintOperationTransformer for ExtruderPlanScheduler {
    fn name(&self) -> &str {
        "extruder_plan_scheduler"
    }

    fn description(&self) -> &str {
        "Orders feature extrusions and their move sequences to shorten travels"
    }

    fn process(&self, operation: &OperationPtr) -> TransformResult<()> {
        let extruder_plans = if operation.is_extruder_plan() {
            vec![operation.clone()]
        } else if operation.is_layer_plan() || operation.is_print_plan() {
            operation.find_operations(&OperationPtr::is_extruder_plan, SearchOrder::Forward, None)
        } else {
            return Err(TransformError::UnsupportedOperation {
                name: self.name().to_string(),
                operation: format!("{:?}", operation),
            });
        };

        let mut current_position = Point3::ORIGIN;
        let mut first_error = None;
        for extruder_plan in &extruder_plans {
            match self.schedule(extruder_plan, &mut current_position) {
                Ok(()) => {}
                // Everything is kept in the plan, so later passes can still run
                Err(ScheduleError::Deadlock { remaining }) => tracing::error!(
                    "Extruder plan {:?} on layer {:?} kept {} item(s) unordered",
                    extruder_plan.extruder_nr(),
                    extruder_plan.find_parent(OperationPtr::is_layer_plan).and_then(|layer| layer.layer_index()),
                    remaining
                ),
                Err(e) => {
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            Some(e) => Err(e.into()),
            None => Ok(()),
        }
    }

    fn config(&self) -> &TransformerConfig {
        &self.config
    }
}
