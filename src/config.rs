use crate::count::{RoadCounts, VehicleClass, VehicleCount};
use crate::{Error, Junction, PerRoad, Result, Road};

/// Vehicles per minute arriving on each road.
pub type ArrivalRates = PerRoad<f64>;

/// The settings of a controlled junction.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct JunctionConfig {
    /// The number of roads meeting at the junction, 3 or 4.
    pub arity: u8,
    /// The sum of all phases' green times in s.
    pub cycle_time: f64,
    /// The least green time any phase may be given, in s.
    pub min_green: f64,
    /// The duration of the amber stage after each green, in s.
    pub yellow_time: f64,
    /// The base arrival rate of each road in vehicles per minute.
    pub arrival_rates: ArrivalRates,
    /// The most vehicles a road's queue may hold; further arrivals are dropped.
    pub spawn_cap: usize,
    /// The counts assumed for a road when its detector fails.
    pub fallback_counts: RoadCounts,
}

impl Default for JunctionConfig {
    fn default() -> Self {
        Self {
            arity: 4,
            cycle_time: 30.0,
            min_green: 6.0,
            yellow_time: 2.0,
            arrival_rates: PerRoad::from_fn(|_| 12.0),
            spawn_cap: 20,
            fallback_counts: Road::ALL
                .into_iter()
                .map(|road| (road, VehicleCount::new().with(VehicleClass::Car, 5)))
                .collect(),
        }
    }
}

impl JunctionConfig {
    /// Parses a configuration from a JSON document. Missing fields take their defaults.
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).map_err(|err| Error::InvalidConfig {
            field: "json",
            reason: err.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// The junction described by [Self::arity].
    pub fn junction(&self) -> Result<Junction> {
        Junction::try_from(self.arity)
    }

    /// Checks that every value is in range.
    ///
    /// A minimum green too long to fit every phase into the cycle is allowed,
    /// as the allocator honours the minimum over the cycle time, but is logged.
    pub fn validate(&self) -> Result<()> {
        let junction = self.junction()?;
        positive("cycle_time", self.cycle_time)?;
        positive("min_green", self.min_green)?;
        positive("yellow_time", self.yellow_time)?;
        for (road, rate) in self.arrival_rates.iter() {
            if !rate.is_finite() || *rate < 0.0 {
                return Err(Error::InvalidConfig {
                    field: "arrival_rates",
                    reason: format!(
                        "rate for {} must be finite and non-negative, got {}",
                        road, rate
                    ),
                });
            }
        }
        let num_phases = junction.phases().len() as f64;
        if self.min_green * num_phases > self.cycle_time {
            log::warn!(
                "minimum green {}s over {} phases exceeds the {}s cycle",
                self.min_green,
                num_phases,
                self.cycle_time
            );
        }
        Ok(())
    }
}

fn positive(field: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidConfig {
            field,
            reason: format!("must be positive, got {}", value),
        })
    }
}

/// Derives arrival rates from detected counts: four vehicles per minute for
/// every vehicle seen, kept between 8 and 25 per minute.
pub fn arrival_rates_from_counts(counts: &RoadCounts) -> ArrivalRates {
    PerRoad::from_fn(|road| {
        let total = counts.get(&road).map(VehicleCount::total).unwrap_or(0);
        (total as f64 * 4.0).clamp(8.0, 25.0)
    })
}
