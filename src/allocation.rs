use crate::score::RoadLoads;
use crate::Phase;

/// The green time given to one phase of the cycle.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScheduleEntry {
    /// The index of the phase in the junction's phase list.
    pub phase: usize,
    /// The green duration in s.
    pub green: f64,
}

/// The green times of every phase in one signal cycle.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Schedule {
    entries: Vec<ScheduleEntry>,
}

impl Schedule {
    /// Creates a schedule from green times listed in phase order.
    pub fn from_green_times(times: impl IntoIterator<Item = f64>) -> Self {
        Self {
            entries: times
                .into_iter()
                .enumerate()
                .map(|(phase, green)| ScheduleEntry { phase, green })
                .collect(),
        }
    }

    /// An equal share of `cycle_time` for each of `num_phases` phases,
    /// never less than `min_green`.
    pub fn equal_split(num_phases: usize, cycle_time: f64, min_green: f64) -> Self {
        if num_phases == 0 {
            return Self::default();
        }
        let share = round_green(cycle_time / num_phases as f64, min_green);
        Self::from_green_times(std::iter::repeat(share).take(num_phases))
    }

    /// The entries in phase order.
    pub fn entries(&self) -> &[ScheduleEntry] {
        &self.entries
    }

    /// The green time of each phase in s.
    pub fn green_times(&self) -> Vec<f64> {
        self.entries.iter().map(|entry| entry.green).collect()
    }

    /// The green time of a phase in s, if the phase exists.
    pub fn green_time(&self, phase: usize) -> Option<f64> {
        self.entries.get(phase).map(|entry| entry.green)
    }

    /// The number of phases.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the schedule has no phases.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The sum of all green times in s.
    pub fn total(&self) -> f64 {
        self.entries.iter().map(|entry| entry.green).sum()
    }
}

/// Shares `cycle_time` between the phases in proportion to their load.
///
/// Every phase gets at least `min_green`. Phases held at the floor keep it and
/// the rest of the cycle is shared between the remaining phases, so busy phases
/// give up some of their proportional share to pay for the floor. Durations are
/// rounded to 0.1 s, never below `min_green`, and the rounding error is not
/// redistributed.
///
/// When nothing is loaded, or the floors alone fill the cycle, every phase gets
/// `max(min_green, cycle_time / n)` and the cycle may run long.
pub fn allocate_phase_times(
    loads: &RoadLoads,
    phases: &[Phase],
    cycle_time: f64,
    min_green: f64,
) -> Schedule {
    let phase_loads = phases
        .iter()
        .map(|phase| loads.phase_load(phase))
        .collect::<Vec<_>>();
    let total_load: f64 = phase_loads.iter().sum();

    if total_load <= 0.0 {
        log::debug!("no load on any phase, splitting the cycle equally");
        return Schedule::equal_split(phases.len(), cycle_time, min_green);
    }

    let mut pinned = phase_loads
        .iter()
        .map(|load| load / total_load * cycle_time < min_green)
        .collect::<Vec<_>>();

    loop {
        let num_pinned = pinned.iter().filter(|p| **p).count();
        let free_time = cycle_time - num_pinned as f64 * min_green;
        let free_load: f64 = phase_loads
            .iter()
            .zip(&pinned)
            .filter(|(_, pinned)| !**pinned)
            .map(|(load, _)| load)
            .sum();

        if free_load <= 0.0 || free_time <= 0.0 {
            return Schedule::equal_split(phases.len(), cycle_time, min_green);
        }

        let mut changed = false;
        for (load, pinned) in phase_loads.iter().zip(pinned.iter_mut()) {
            if !*pinned && load / free_load * free_time < min_green {
                *pinned = true;
                changed = true;
            }
        }

        if !changed {
            return Schedule::from_green_times(phase_loads.iter().zip(&pinned).map(
                |(load, pinned)| {
                    let share = if *pinned {
                        min_green
                    } else {
                        load / free_load * free_time
                    };
                    round_green(share, min_green)
                },
            ));
        }
    }
}

/// Rounds a green time to the nearest 0.1 s, rounding up instead where that
/// would fall below `min_green`.
fn round_green(secs: f64, min_green: f64) -> f64 {
    let rounded = (secs * 10.0).round() / 10.0;
    if rounded < min_green {
        // Tolerate float noise so exact tenths are not pushed up a step
        (min_green * 10.0 - 1e-9).ceil() / 10.0
    } else {
        rounded
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{Junction, Road};
    use assert_approx_eq::assert_approx_eq;

    fn four_way(ns: f64, ew: f64) -> RoadLoads {
        [
            (Road::North, ns),
            (Road::South, 0.0),
            (Road::East, ew),
            (Road::West, 0.0),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn proportional_without_floor() {
        let phases = Junction::FourWay.phases();
        let schedule = allocate_phase_times(&four_way(30.0, 10.0), &phases, 60.0, 6.0);
        assert_eq!(schedule.green_times(), vec![45.0, 15.0]);
    }

    #[test]
    fn floor_is_paid_by_busy_phases() {
        let loads: RoadLoads = [(Road::North, 0.0), (Road::East, 1.0), (Road::South, 30.0)]
            .into_iter()
            .collect();
        let schedule = allocate_phase_times(&loads, &Junction::ThreeWay.phases(), 60.0, 10.0);
        assert_eq!(schedule.green_times(), vec![10.0, 25.4, 24.6]);
        assert_approx_eq!(schedule.total(), 60.0, 0.3);
    }

    #[test]
    fn floors_filling_the_cycle() {
        let phases = Junction::FourWay.phases();
        let schedule = allocate_phase_times(&four_way(5.0, 1.0), &phases, 10.0, 6.0);
        assert_eq!(schedule.green_times(), vec![6.0, 6.0]);
    }

    #[test]
    fn rounding_never_undercuts_the_floor() {
        let phases = Junction::FourWay.phases();
        let schedule = allocate_phase_times(&four_way(1.0, 1.0), &phases, 12.09, 6.04);
        assert_eq!(schedule.green_times(), vec![6.1, 6.1]);

        let schedule = allocate_phase_times(&four_way(0.0, 0.0), &phases, 10.0, 6.04);
        assert_eq!(schedule.green_times(), vec![6.1, 6.1]);

        let schedule = allocate_phase_times(&four_way(8.0, 0.0), &phases, 60.0, 6.04);
        assert_eq!(schedule.green_times(), vec![54.0, 6.1]);

        let schedule = Schedule::equal_split(3, 10.0, 3.33);
        assert_eq!(schedule.green_times(), vec![3.4, 3.4, 3.4]);
    }

    #[test]
    fn no_phases() {
        let schedule = allocate_phase_times(&RoadLoads::default(), &[], 60.0, 6.0);
        assert!(schedule.is_empty());
    }
}
