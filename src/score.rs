use crate::count::{RoadCounts, VehicleClass, VehicleCount};
use crate::{Error, Phase, Result, Road};
use std::collections::HashMap;

impl VehicleClass {
    /// How much one vehicle of this class weighs on a road's load.
    /// Heavier vehicles earn their road more green time.
    pub fn weight(self) -> f64 {
        match self {
            VehicleClass::Car => 1.0,
            VehicleClass::Truck => 3.0,
            VehicleClass::Bus => 2.5,
        }
    }
}

impl VehicleCount {
    /// The weighted load of this count.
    pub fn load(&self) -> f64 {
        self.iter()
            .map(|(class, n)| class.weight() * n as f64)
            .sum()
    }
}

/// The scalar load of each road.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RoadLoads(HashMap<Road, f64>);

impl RoadLoads {
    /// Scores every road's vehicle count.
    pub fn from_counts(counts: &RoadCounts) -> Self {
        Self(
            counts
                .iter()
                .map(|(road, count)| (*road, count.load()))
                .collect(),
        )
    }

    /// The load of a road, which must have been recorded.
    pub fn get(&self, road: Road) -> Result<f64> {
        self.0.get(&road).copied().ok_or(Error::MissingRoadData(road))
    }

    /// The combined load of a phase's roads. Roads without data count as empty.
    pub fn phase_load(&self, phase: &Phase) -> f64 {
        phase
            .roads()
            .iter()
            .map(|road| {
                self.get(*road).unwrap_or_else(|err| {
                    log::warn!("{}; treating it as empty", err);
                    0.0
                })
            })
            .sum()
    }
}

impl FromIterator<(Road, f64)> for RoadLoads {
    fn from_iter<I: IntoIterator<Item = (Road, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn weighted_load() {
        let count = VehicleCount::new()
            .with(VehicleClass::Car, 2)
            .with(VehicleClass::Truck, 1)
            .with(VehicleClass::Bus, 2);
        assert_approx_eq!(count.load(), 2.0 + 3.0 + 5.0);
        assert_eq!(VehicleCount::new().load(), 0.0);
    }

    #[test]
    fn missing_road_is_reported() {
        let loads: RoadLoads = [(Road::North, 4.0)].into_iter().collect();
        assert_eq!(loads.get(Road::North), Ok(4.0));
        assert_eq!(loads.get(Road::East), Err(Error::MissingRoadData(Road::East)));
    }

    #[test]
    fn phase_load_treats_missing_roads_as_empty() {
        let loads: RoadLoads = [(Road::North, 4.0), (Road::South, 2.5)].into_iter().collect();
        let phases = crate::Junction::FourWay.phases();
        assert_approx_eq!(loads.phase_load(&phases[0]), 6.5);
        assert_approx_eq!(loads.phase_load(&phases[1]), 0.0);
    }
}
