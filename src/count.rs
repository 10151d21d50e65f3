//! Per-road vehicle counts and the providers that supply them.

use crate::{Error, Result, Road};
use rand::Rng;
use std::collections::{BTreeMap, HashMap};

/// A class of vehicle reported by the detector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum VehicleClass {
    Car,
    Truck,
    Bus,
}

impl VehicleClass {
    /// Every vehicle class.
    pub const ALL: [VehicleClass; 3] = [VehicleClass::Car, VehicleClass::Truck, VehicleClass::Bus];

    /// Parses a detector label. Labels for classes we do not weigh yield `None`.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "car" => Some(VehicleClass::Car),
            "truck" => Some(VehicleClass::Truck),
            "bus" => Some(VehicleClass::Bus),
            _ => None,
        }
    }
}

/// The number of vehicles of each class seen on one road.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VehicleCount(BTreeMap<VehicleClass, u32>);

impl VehicleCount {
    /// Creates an empty count.
    pub fn new() -> Self {
        Default::default()
    }

    /// Builds a count from `(label, count)` pairs, ignoring unknown labels.
    pub fn from_labels<'a>(labels: impl IntoIterator<Item = (&'a str, u32)>) -> Self {
        labels
            .into_iter()
            .filter_map(|(label, n)| VehicleClass::from_label(label).map(|class| (class, n)))
            .collect()
    }

    /// Sets the count of a class, returning `self` for chaining.
    pub fn with(mut self, class: VehicleClass, count: u32) -> Self {
        self.set(class, count);
        self
    }

    /// Sets the count of a class.
    pub fn set(&mut self, class: VehicleClass, count: u32) {
        self.0.insert(class, count);
    }

    /// The count of a class, zero if never recorded.
    pub fn get(&self, class: VehicleClass) -> u32 {
        self.0.get(&class).copied().unwrap_or(0)
    }

    /// The number of vehicles of any class.
    pub fn total(&self) -> u32 {
        self.0.values().sum()
    }

    /// Iterates over the recorded classes and their counts.
    pub fn iter(&self) -> impl Iterator<Item = (VehicleClass, u32)> + '_ {
        self.0.iter().map(|(class, n)| (*class, *n))
    }
}

impl FromIterator<(VehicleClass, u32)> for VehicleCount {
    fn from_iter<I: IntoIterator<Item = (VehicleClass, u32)>>(iter: I) -> Self {
        let mut count = VehicleCount::new();
        for (class, n) in iter {
            *count.0.entry(class).or_insert(0) += n;
        }
        count
    }
}

/// Vehicle counts for the roads of a junction.
pub type RoadCounts = HashMap<Road, VehicleCount>;

/// A source of per-road vehicle counts, such as an image detector.
pub trait VehicleCountProvider {
    /// Counts the vehicles currently waiting on `road`.
    ///
    /// Failures should be reported as [Error::DetectionUnavailable].
    fn count(&mut self, road: Road) -> Result<VehicleCount>;
}

impl VehicleCountProvider for RoadCounts {
    fn count(&mut self, road: Road) -> Result<VehicleCount> {
        self.get(&road)
            .cloned()
            .ok_or_else(|| Error::DetectionUnavailable {
                road,
                reason: "no count recorded".into(),
            })
    }
}

/// A stand-in detector which reports random counts,
/// for running the junction without a detection model.
pub struct RandomCountProvider<R> {
    rng: R,
}

impl<R: Rng> RandomCountProvider<R> {
    /// Creates a random count provider drawing from `rng`.
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> VehicleCountProvider for RandomCountProvider<R> {
    fn count(&mut self, _road: Road) -> Result<VehicleCount> {
        Ok(VehicleCount::new()
            .with(VehicleClass::Car, self.rng.gen_range(0..=6))
            .with(VehicleClass::Truck, self.rng.gen_range(0..=2))
            .with(VehicleClass::Bus, self.rng.gen_range(0..=2)))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn unknown_labels_are_ignored() {
        let count = VehicleCount::from_labels([("car", 3), ("bicycle", 7), ("Bus", 1)]);
        assert_eq!(count.get(VehicleClass::Car), 3);
        assert_eq!(count.get(VehicleClass::Bus), 1);
        assert_eq!(count.get(VehicleClass::Truck), 0);
        assert_eq!(count.total(), 4);
    }

    #[test]
    fn missing_road_is_detection_failure() {
        let mut counts = RoadCounts::new();
        counts.insert(Road::North, VehicleCount::new().with(VehicleClass::Car, 2));
        assert!(counts.count(Road::North).is_ok());
        assert!(matches!(
            counts.count(Road::West),
            Err(Error::DetectionUnavailable { road: Road::West, .. })
        ));
    }

    #[test]
    fn random_counts_are_bounded_and_seeded() {
        let mut a = RandomCountProvider::new(StdRng::seed_from_u64(7));
        let mut b = RandomCountProvider::new(StdRng::seed_from_u64(7));
        for road in Road::ALL {
            let count = a.count(road).unwrap();
            assert!(count.get(VehicleClass::Car) <= 6);
            assert!(count.get(VehicleClass::Truck) <= 2);
            assert!(count.get(VehicleClass::Bus) <= 2);
            assert_eq!(count, b.count(road).unwrap());
        }
    }
}
