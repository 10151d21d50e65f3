//! Load-adaptive signal timing for a single road junction, together with a
//! micro-simulation of the traffic it controls.
//!
//! Vehicle counts for each approach are weighted into loads, the loads of each
//! [Phase] share out a fixed cycle time, and the resulting [Schedule] drives a
//! [SignalController] inside a [Simulation].

pub use allocation::{allocate_phase_times, Schedule, ScheduleEntry};
pub use cgmath;
pub use config::{arrival_rates_from_counts, ArrivalRates, JunctionConfig};
pub use count::{
    RandomCountProvider, RoadCounts, VehicleClass, VehicleCount, VehicleCountProvider,
};
pub use error::{Error, Result};
pub use light::{LightState, SignalController, SignalStage, SignalState};
pub use phase::{group_phases, Junction, Phase};
pub use plan::{plan_schedule, PlanSource, SchedulePlan};
pub use queue::{Queue, STOP_LINE_TOLERANCE};
pub use road::{PerRoad, Road, APPROACH_LENGTH, CLEARANCE, STOP_LINE_SETBACK};
pub use score::RoadLoads;
pub use simulation::{Command, Simulation};
use slotmap::{new_key_type, SlotMap};
pub use stats::Statistics;
pub use util::Interval;
pub use vehicle::{Vehicle, VehicleAttributes};

mod allocation;
mod config;
mod count;
mod error;
mod light;
pub mod math;
mod phase;
mod plan;
mod queue;
mod road;
mod score;
mod simulation;
mod stats;
mod util;
mod vehicle;

new_key_type! {
    /// Unique ID of a [Vehicle].
    pub struct VehicleId;
}

type VehicleSet = SlotMap<VehicleId, Vehicle>;
