use crate::{PerRoad, Road};
use std::fmt;
use std::time::{Duration, Instant};

/// Tallies of the vehicles that entered and cleared the junction.
#[derive(Clone, Debug)]
pub struct Statistics {
    /// Vehicles which have cleared the junction, per road.
    passed: PerRoad<u64>,
    /// Vehicles which have been spawned, per road.
    spawned: PerRoad<u64>,
    /// When counting started.
    started: Instant,
    /// The simulated time since counting started, in s.
    sim_time: f64,
}

impl Default for Statistics {
    fn default() -> Self {
        Self::new()
    }
}

impl Statistics {
    /// Starts counting from now.
    pub fn new() -> Self {
        Self {
            passed: Default::default(),
            spawned: Default::default(),
            started: Instant::now(),
            sim_time: 0.0,
        }
    }

    /// Clears every count and restarts the clocks.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub(crate) fn record_spawn(&mut self, road: Road) {
        self.spawned[road] += 1;
    }

    pub(crate) fn record_pass(&mut self, road: Road) {
        self.passed[road] += 1;
    }

    pub(crate) fn advance(&mut self, dt: f64) {
        self.sim_time += dt;
    }

    /// The vehicles which have cleared the junction from `road`.
    pub fn passed(&self, road: Road) -> u64 {
        self.passed[road]
    }

    /// The vehicles which have been spawned on `road`.
    pub fn spawned(&self, road: Road) -> u64 {
        self.spawned[road]
    }

    /// The vehicles spawned on `road` which have not yet cleared the junction.
    pub fn in_flight(&self, road: Road) -> u64 {
        self.spawned[road] - self.passed[road]
    }

    /// The vehicles which have cleared the junction from any road.
    pub fn total_passed(&self) -> u64 {
        self.passed.iter().map(|(_, n)| n).sum()
    }

    /// The vehicles which have been spawned on any road.
    pub fn total_spawned(&self) -> u64 {
        self.spawned.iter().map(|(_, n)| n).sum()
    }

    /// The wall-clock time since counting started.
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// The simulated time since counting started, in s.
    pub fn sim_time(&self) -> f64 {
        self.sim_time
    }

    /// Vehicles cleared per minute of wall-clock time.
    /// Less than a minute is treated as a full minute.
    pub fn throughput(&self) -> f64 {
        per_minute(self.total_passed(), self.elapsed().as_secs_f64())
    }

    /// Vehicles cleared per minute of simulated time.
    /// Less than a minute is treated as a full minute.
    pub fn sim_throughput(&self) -> f64 {
        per_minute(self.total_passed(), self.sim_time)
    }
}

fn per_minute(count: u64, secs: f64) -> f64 {
    count as f64 / f64::max(1.0, secs / 60.0)
}

impl fmt::Display for Statistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} spawned, {} passed ({:.1}/min)",
            self.total_spawned(),
            self.total_passed(),
            self.sim_throughput()
        )?;
        for (road, passed) in self.passed.iter() {
            write!(f, ", {}: {}", road, passed)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn counts_and_throughput() {
        let mut stats = Statistics::new();
        for _ in 0..3 {
            stats.record_spawn(Road::North);
        }
        stats.record_spawn(Road::West);
        stats.record_pass(Road::North);
        stats.record_pass(Road::North);

        assert_eq!(stats.in_flight(Road::North), 1);
        assert_eq!(stats.in_flight(Road::West), 1);
        assert_eq!(stats.total_spawned(), 4);
        assert_eq!(stats.total_passed(), 2);
        assert_approx_eq!(stats.sim_throughput(), 2.0);

        stats.advance(120.0);
        assert_approx_eq!(stats.sim_throughput(), 1.0);
        assert_eq!(
            stats.to_string(),
            "4 spawned, 2 passed (1.0/min), north: 2, south: 0, east: 0, west: 0"
        );

        stats.reset();
        assert_eq!(stats.total_spawned(), 0);
        assert_eq!(stats.sim_time(), 0.0);
    }
}
