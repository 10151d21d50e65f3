use crate::allocation::allocate_phase_times;
use crate::count::{RoadCounts, VehicleCountProvider};
use crate::score::RoadLoads;
use crate::{Junction, JunctionConfig, Phase, Result, Schedule, SignalController};

/// Where the counts behind a plan came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlanSource {
    /// Every road was counted by the provider.
    Detected,
    /// At least one road used the configured fallback counts.
    Fallback,
}

/// A signal schedule together with the counts it was derived from.
#[derive(Clone, Debug)]
pub struct SchedulePlan {
    /// The junction the plan is for.
    pub junction: Junction,
    /// The phases, in the order they are served.
    pub phases: Vec<Phase>,
    /// The vehicle counts of each road.
    pub counts: RoadCounts,
    /// The weighted load of each road.
    pub loads: RoadLoads,
    /// The green time of each phase.
    pub schedule: Schedule,
    /// Whether the counts were all detected.
    pub source: PlanSource,
}

/// Counts the vehicles on every road and shares the cycle between the phases.
///
/// Roads whose count cannot be obtained use the configured fallback counts.
/// Fails only if the configuration is unusable, in which case the provider
/// is never queried.
pub fn plan_schedule(
    config: &JunctionConfig,
    provider: &mut impl VehicleCountProvider,
) -> Result<SchedulePlan> {
    config.validate()?;
    let junction = config.junction()?;

    let mut source = PlanSource::Detected;
    let counts = junction
        .roads()
        .iter()
        .map(|road| match provider.count(*road) {
            Ok(count) => (*road, count),
            Err(err) => {
                log::warn!("{}; using fallback counts", err);
                source = PlanSource::Fallback;
                let fallback = config.fallback_counts.get(road).cloned();
                (*road, fallback.unwrap_or_default())
            }
        })
        .collect::<RoadCounts>();

    let loads = RoadLoads::from_counts(&counts);
    let phases = junction.phases();
    let schedule = allocate_phase_times(&loads, &phases, config.cycle_time, config.min_green);
    log::info!(
        "planned {}-way junction ({:?}): green times {:?}",
        junction.arity(),
        source,
        schedule.green_times()
    );

    Ok(SchedulePlan {
        junction,
        phases,
        counts,
        loads,
        schedule,
        source,
    })
}

impl SchedulePlan {
    /// A plan which ignores detection altogether: the configured fallback counts
    /// and an equal share of the cycle for every phase.
    pub fn fallback(config: &JunctionConfig) -> Result<Self> {
        let junction = config.junction()?;
        let counts = junction
            .roads()
            .iter()
            .map(|road| {
                let count = config.fallback_counts.get(road).cloned();
                (*road, count.unwrap_or_default())
            })
            .collect::<RoadCounts>();
        let phases = junction.phases();
        let schedule = Schedule::equal_split(phases.len(), config.cycle_time, config.min_green);
        log::warn!("using fallback plan: green times {:?}", schedule.green_times());

        Ok(Self {
            junction,
            loads: RoadLoads::from_counts(&counts),
            phases,
            counts,
            schedule,
            source: PlanSource::Fallback,
        })
    }

    /// Creates a signal which runs this plan.
    pub fn signal(&self, yellow_time: f64) -> Result<SignalController> {
        SignalController::new(self.phases.clone(), self.schedule.clone(), yellow_time)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::count::{VehicleClass, VehicleCount};
    use crate::{Error, Road};

    struct FailingProvider {
        calls: usize,
    }

    impl VehicleCountProvider for FailingProvider {
        fn count(&mut self, road: Road) -> Result<VehicleCount> {
            self.calls += 1;
            Err(Error::DetectionUnavailable {
                road,
                reason: "camera offline".into(),
            })
        }
    }

    #[test]
    fn detection_failure_uses_fallback_counts() {
        let config = JunctionConfig::default();
        let mut provider = FailingProvider { calls: 0 };
        let plan = plan_schedule(&config, &mut provider).unwrap();
        assert_eq!(provider.calls, 4);
        assert_eq!(plan.source, PlanSource::Fallback);
        assert_eq!(plan.counts[&Road::East].get(VehicleClass::Car), 5);
        assert_eq!(plan.schedule.green_times(), vec![15.0, 15.0]);
    }

    #[test]
    fn partial_detection() {
        let mut counts = RoadCounts::new();
        counts.insert(Road::North, VehicleCount::new().with(VehicleClass::Bus, 4));
        counts.insert(Road::South, VehicleCount::new());
        counts.insert(Road::East, VehicleCount::new());
        let config = JunctionConfig {
            fallback_counts: RoadCounts::new(),
            ..Default::default()
        };
        let plan = plan_schedule(&config, &mut counts).unwrap();
        assert_eq!(plan.source, PlanSource::Fallback);
        assert_eq!(plan.counts[&Road::West], VehicleCount::new());
        assert_eq!(plan.schedule.green_times(), vec![24.0, 6.0]);
    }

    #[test]
    fn unsupported_junction_queries_nothing() {
        let config = JunctionConfig {
            arity: 5,
            ..Default::default()
        };
        let mut provider = FailingProvider { calls: 0 };
        let result = plan_schedule(&config, &mut provider);
        assert_eq!(result.err(), Some(Error::UnsupportedJunction(5)));
        assert_eq!(provider.calls, 0);
        assert!(SchedulePlan::fallback(&config).is_err());
    }

    #[test]
    fn fallback_plan_splits_equally() {
        let config = JunctionConfig {
            arity: 3,
            cycle_time: 12.0,
            ..Default::default()
        };
        let plan = SchedulePlan::fallback(&config).unwrap();
        assert_eq!(plan.schedule.green_times(), vec![6.0, 6.0, 6.0]);
        assert!(!plan.counts.contains_key(&Road::West));
        let signal = plan.signal(config.yellow_time).unwrap();
        assert_eq!(signal.phases().len(), 3);
    }
}
