use crate::util::Interval;
use crate::vehicle::Vehicle;
use crate::{Road, VehicleId, VehicleSet};

/// How far either side of the stop line a vehicle's front counts as being at the line, in m.
pub const STOP_LINE_TOLERANCE: f64 = 1.5; // m

/// How far beyond its braking distance a vehicle begins to stop for a red light, in m.
const APPROACH_MARGIN: f64 = 1.0; // m

/// The vehicles travelling along one road, ordered front to back.
///
/// Index 0 is the vehicle closest to the stop line. Vehicles are only ever
/// appended at the back or removed, so the order never changes.
#[derive(Clone, Debug)]
pub struct Queue {
    /// The road the queue is on.
    road: Road,
    /// The vehicles on the road, front first.
    vehicles: Vec<VehicleId>,
}

impl Queue {
    /// Creates an empty queue.
    pub(crate) fn new(road: Road) -> Self {
        Self {
            road,
            vehicles: vec![],
        }
    }

    /// The road the queue is on.
    pub fn road(&self) -> Road {
        self.road
    }

    /// The IDs of the vehicles in the queue, front first.
    pub fn vehicle_ids(&self) -> &[VehicleId] {
        &self.vehicles
    }

    /// The number of vehicles in the queue.
    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    /// Whether the queue holds no vehicles.
    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }

    /// The ID of the vehicle at the back of the queue.
    pub fn last(&self) -> Option<VehicleId> {
        self.vehicles.last().copied()
    }

    /// Inserts the vehicle with the given ID behind every vehicle further along the road.
    pub(crate) fn insert_vehicle(&mut self, vehicles: &VehicleSet, id: VehicleId) {
        let veh_pos = vehicles[id].pos_mid();
        let idx = self
            .vehicles
            .iter()
            .map(|id| vehicles[*id].pos_mid())
            .position(|pos| pos < veh_pos)
            .unwrap_or(self.vehicles.len());
        self.vehicles.insert(idx, id);
    }

    /// Removes every vehicle from the queue.
    pub(crate) fn clear(&mut self) {
        self.vehicles.clear();
    }

    /// Decides which vehicles must stop, working from the front of the queue back.
    ///
    /// A vehicle too close to the one ahead always waits. Otherwise a vehicle
    /// waits for a light which is not green if it is at the stop line, or can
    /// comfortably stop before it and is close enough to start braking.
    /// A vehicle too close to the line to stop comfortably carries on through.
    pub(crate) fn apply_admission(&self, vehicles: &mut VehicleSet, is_green: bool) {
        let stop_line = self.road.stop_line();
        let mut leader_pos = None;
        for id in &self.vehicles {
            let vehicle = &mut vehicles[*id];
            let blocked = leader_pos.map_or(false, |pos: f64| {
                pos - vehicle.pos_mid() <= vehicle.following_distance()
            });
            let waiting = blocked || (!is_green && must_stop_for_light(vehicle, stop_line));
            vehicle.set_waiting(waiting);
            leader_pos = Some(vehicle.pos_mid());
        }
    }

    /// Integrates the motion of every vehicle in the queue.
    pub(crate) fn integrate(&self, vehicles: &mut VehicleSet, dt: f64) {
        for id in &self.vehicles {
            vehicles[*id].integrate(dt);
        }
    }

    /// Removes and returns the vehicles which have cleared the junction,
    /// keeping the rest in order.
    pub(crate) fn retire_vehicles(&mut self, vehicles: &VehicleSet) -> Vec<VehicleId> {
        let exit_line = self.road.exit_line();
        let (exited, remaining) = self
            .vehicles
            .iter()
            .partition(|id| vehicles[**id].pos_mid() > exit_line);
        self.vehicles = remaining;
        exited
    }
}

/// Determines whether a vehicle facing a red or amber light must stop.
fn must_stop_for_light(vehicle: &Vehicle, stop_line: f64) -> bool {
    let front = vehicle.pos_front();
    if front > stop_line + STOP_LINE_TOLERANCE {
        // Already in the junction
        return false;
    }
    if Interval::disc(stop_line, STOP_LINE_TOLERANCE).contains(front) {
        return true;
    }
    let dist = stop_line - front;
    let braking = vehicle.stopping_distance();
    if dist + STOP_LINE_TOLERANCE < braking {
        log::trace!(
            "vehicle {:?} on {} cannot stop within {:.1}m, running the light",
            vehicle.id(),
            vehicle.road(),
            dist
        );
        return false;
    }
    dist <= braking + APPROACH_MARGIN
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::vehicle::VehicleAttributes;
    use slotmap::SlotMap;

    fn queue_of(positions: &[(f64, f64)]) -> (Queue, VehicleSet) {
        let mut vehicles = SlotMap::with_key();
        let mut queue = Queue::new(Road::East);
        for (pos, vel) in positions {
            let id = vehicles.insert_with_key(|id| {
                let mut vehicle = Vehicle::new(id, Road::East, &VehicleAttributes::default());
                vehicle.set_location(*pos, *vel);
                vehicle
            });
            queue.insert_vehicle(&vehicles, id);
        }
        (queue, vehicles)
    }

    fn waiting(queue: &Queue, vehicles: &VehicleSet) -> Vec<bool> {
        queue
            .vehicle_ids()
            .iter()
            .map(|id| vehicles[*id].is_waiting())
            .collect()
    }

    #[test]
    fn inserts_in_road_order() {
        let (queue, vehicles) = queue_of(&[(10.0, 0.0), (50.0, 0.0), (30.0, 0.0)]);
        let positions = queue
            .vehicle_ids()
            .iter()
            .map(|id| vehicles[*id].pos_mid())
            .collect::<Vec<_>>();
        assert_eq!(positions, vec![50.0, 30.0, 10.0]);
    }

    #[test]
    fn red_light_decisions() {
        let stop = Road::East.stop_line();
        let half = 0.5 * VehicleAttributes::default().length;
        // In the junction
        let (queue, mut vehicles) = queue_of(&[(stop + 5.0, 12.0)]);
        queue.apply_admission(&mut vehicles, false);
        assert_eq!(waiting(&queue, &vehicles), vec![false]);

        // Too fast to stop
        let (queue, mut vehicles) = queue_of(&[(stop - half - 3.0, 12.0)]);
        queue.apply_admission(&mut vehicles, false);
        assert_eq!(waiting(&queue, &vehicles), vec![false]);

        // Close enough to start braking
        let (queue, mut vehicles) = queue_of(&[(stop - half - 16.5, 12.0)]);
        queue.apply_admission(&mut vehicles, false);
        assert_eq!(waiting(&queue, &vehicles), vec![true]);

        let (queue, mut vehicles) = queue_of(&[(stop - half, 0.0)]);
        queue.apply_admission(&mut vehicles, false);
        assert_eq!(waiting(&queue, &vehicles), vec![true]);
        queue.apply_admission(&mut vehicles, true);
        assert_eq!(waiting(&queue, &vehicles), vec![false]);
    }

    #[test]
    fn far_vehicles_roll_up_to_the_line() {
        let stop = Road::East.stop_line();
        let (queue, mut vehicles) = queue_of(&[(stop - 40.0, 0.0), (stop - 60.0, 8.0)]);
        queue.apply_admission(&mut vehicles, false);
        assert_eq!(waiting(&queue, &vehicles), vec![false, false]);
    }

    #[test]
    fn followers_keep_their_distance() {
        let (queue, mut vehicles) = queue_of(&[(40.0, 0.0), (33.0, 0.0), (20.0, 10.0)]);
        queue.apply_admission(&mut vehicles, true);
        assert_eq!(waiting(&queue, &vehicles), vec![false, false, true]);
    }

    #[test]
    fn retirement_keeps_order() {
        let exit = Road::East.exit_line();
        let (mut queue, vehicles) = queue_of(&[(exit + 1.0, 5.0), (exit - 10.0, 5.0), (10.0, 0.0)]);
        let ids = queue.vehicle_ids().to_vec();
        let exited = queue.retire_vehicles(&vehicles);
        assert_eq!(exited, vec![ids[0]]);
        assert_eq!(queue.vehicle_ids(), &ids[1..]);
    }
}
