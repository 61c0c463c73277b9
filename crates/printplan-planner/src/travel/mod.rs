//! Travel move generation
//!
//! A [`TravelMoveGenerator`] turns a start and end position into a travel
//! route. Strategies are pluggable; [`DirectTravelMoveGenerator`] moves in a
//! straight line and is the fallback every inserter ends with.

pub mod inserter;

pub use inserter::TravelMovesInserter;

use printplan_core::{Point3, PrintFeatureType};
use printplan_settings::{Settings, SettingsResult};
use serde::{Deserialize, Serialize};

use crate::operation::OperationPtr;

/// Speed, acceleration and jerk of a move
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SpeedDerivatives {
    /// mm/s
    pub speed: f64,
    /// mm/s²
    pub acceleration: f64,
    /// mm/s
    pub jerk: f64,
}

impl SpeedDerivatives {
    pub fn new(speed: f64, acceleration: f64, jerk: f64) -> Self {
        Self {
            speed,
            acceleration,
            jerk,
        }
    }

    /// Read the three values from settings
    pub fn from_settings(
        settings: &Settings,
        speed_key: &str,
        acceleration_key: &str,
        jerk_key: &str,
    ) -> SettingsResult<Self> {
        Ok(Self {
            speed: settings.get(speed_key)?,
            acceleration: settings.get(acceleration_key)?,
            jerk: settings.get(jerk_key)?,
        })
    }

    /// Blend from the initial layer values toward these ones
    ///
    /// At `layer_nr == 0` the result is the slower of both, at
    /// `layer_nr == max_speed_layer` it is `self`.
    pub fn smooth_speed(&self, initial: &SpeedDerivatives, layer_nr: i64, max_speed_layer: i64) -> Self {
        if max_speed_layer <= 0 {
            return *self;
        }

        let layer = layer_nr.clamp(0, max_speed_layer) as f64;
        let max = max_speed_layer as f64;
        let blend = |value: f64, initial_value: f64| {
            let first_layer_value = value.min(initial_value);
            (value * layer) / max + first_layer_value * (max - layer) / max
        };

        Self {
            speed: blend(self.speed, initial.speed),
            acceleration: blend(self.acceleration, initial.acceleration),
            jerk: blend(self.jerk, initial.jerk),
        }
    }
}

/// Strategy producing the travel route between two positions
pub trait TravelMoveGenerator: Send + Sync {
    fn name(&self) -> &str;

    /// A travel route from `start` to `end`, or `None` if this strategy cannot make one
    fn generate_travel_route(
        &self,
        start: Point3,
        end: Point3,
        speed: SpeedDerivatives,
    ) -> Option<OperationPtr>;
}

/// Straight travel to the end position
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectTravelMoveGenerator;

impl TravelMoveGenerator for DirectTravelMoveGenerator {
    fn name(&self) -> &str {
        "direct"
    }

    fn generate_travel_route(
        &self,
        _start: Point3,
        end: Point3,
        speed: SpeedDerivatives,
    ) -> Option<OperationPtr> {
        let route = OperationPtr::travel_route(PrintFeatureType::MoveCombing, speed);
        route.append_operation(&OperationPtr::travel_move(end)).ok()?;
        Some(route)
    }
}
