use crate::count::RoadCounts;
use crate::light::SignalController;
use crate::queue::{Queue, STOP_LINE_TOLERANCE};
use crate::vehicle::{Vehicle, VehicleAttributes, MIN_GAP};
use crate::{JunctionConfig, PerRoad, Result, Road, SchedulePlan, Statistics, VehicleId, VehicleSet};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Bernoulli, Distribution, Normal};
use slotmap::SlotMap;

/// The most vehicles placed on a road when the simulation is populated from counts.
const MAX_INITIAL_QUEUE: usize = 12;

/// The relative amplitude of the periodic wave modulating arrival rates.
const WAVE_AMPLITUDE: f64 = 0.3;

/// The angular frequency of the arrival wave, in rad/s.
const WAVE_FREQUENCY: f64 = 0.5; // rad/s

/// The standard deviation of the factor applied to each vehicle's cruising velocity.
const VELOCITY_ADJUST_STDDEV: f64 = 0.05;

/// A command issued by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Pauses a running simulation, or resumes a paused one.
    TogglePause,
    /// Freezes the simulation and the signal.
    Pause,
    /// Resumes a paused simulation.
    Resume,
    /// Clears every vehicle and count, repopulates the queues and restarts the signal cycle.
    Reset,
    /// Moves the signal to its next stage immediately.
    ForceAdvance,
}

/// A simulation of traffic flowing through a signalled junction.
///
/// The host owns the simulation and drives it by calling [Simulation::step]
/// with the time elapsed since the previous call.
pub struct Simulation<R = StdRng> {
    /// The roads carrying traffic into the junction.
    roads: &'static [Road],
    /// The signal controlling the junction.
    signal: SignalController,
    /// The vehicles being simulated.
    vehicles: VehicleSet,
    /// The vehicles on each road, front first.
    queues: PerRoad<Queue>,
    /// The tallies of spawned and cleared vehicles.
    stats: Statistics,
    /// The base arrival rate of each road in vehicles per minute.
    arrival_rates: PerRoad<f64>,
    /// The most vehicles a queue may hold.
    spawn_cap: usize,
    /// The counts the queues are populated from on reset.
    initial_counts: RoadCounts,
    /// The attributes given to spawned vehicles.
    attributes: VehicleAttributes,
    /// The source of randomness for arrivals.
    rng: R,
    /// The simulated time in s.
    time: f64,
    /// The current frame of simulation.
    frame: usize,
    /// Whether the simulation is frozen.
    paused: bool,
}

impl Simulation<StdRng> {
    /// Creates a simulation whose randomness is drawn from a seeded generator.
    pub fn with_seed(config: &JunctionConfig, plan: &SchedulePlan, seed: u64) -> Result<Self> {
        Self::new(config, plan, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> Simulation<R> {
    /// Creates a simulation running the given plan, with the queues populated
    /// from the plan's vehicle counts.
    pub fn new(config: &JunctionConfig, plan: &SchedulePlan, rng: R) -> Result<Self> {
        config.validate()?;
        let mut sim = Self {
            roads: plan.junction.roads(),
            signal: plan.signal(config.yellow_time)?,
            vehicles: SlotMap::with_key(),
            queues: PerRoad::from_fn(Queue::new),
            stats: Statistics::new(),
            arrival_rates: config.arrival_rates,
            spawn_cap: config.spawn_cap,
            initial_counts: plan.counts.clone(),
            attributes: VehicleAttributes::default(),
            rng,
            time: 0.0,
            frame: 0,
            paused: false,
        };
        sim.populate();
        Ok(sim)
    }

    /// Advances the simulation by `dt` seconds.
    ///
    /// For a realistic simulation, do not use a time step greater than around 0.1.
    pub fn step(&mut self, dt: f64) {
        if self.paused {
            return;
        }
        self.signal.step(dt);
        let spawned = self.spawn_vehicles(dt);
        self.apply_admission();
        self.integrate(dt);
        let passed = self.retire_vehicles();

        for road in spawned {
            self.stats.record_spawn(road);
        }
        for road in passed {
            self.stats.record_pass(road);
        }
        self.stats.advance(dt);
        self.time += dt;
        self.frame += 1;
    }

    /// Applies a command from the host.
    pub fn apply(&mut self, command: Command) {
        match command {
            Command::TogglePause if self.paused => self.resume(),
            Command::TogglePause | Command::Pause => self.pause(),
            Command::Resume => self.resume(),
            Command::Reset => self.reset(),
            Command::ForceAdvance => self.signal.force_advance(),
        }
    }

    /// Freezes the simulation; steps are ignored until resumed.
    pub fn pause(&mut self) {
        self.paused = true;
        self.signal.pause();
    }

    /// Resumes a paused simulation.
    pub fn resume(&mut self) {
        self.paused = false;
        self.signal.resume();
    }

    /// Whether the simulation is frozen.
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Removes every vehicle, clears the statistics, restarts the signal cycle
    /// and repopulates the queues from the initial counts.
    pub fn reset(&mut self) {
        self.vehicles.clear();
        for (_, queue) in self.queues.iter_mut() {
            queue.clear();
        }
        self.stats.reset();
        self.signal.reset();
        self.time = 0.0;
        self.frame = 0;
        self.populate();
        log::info!("simulation reset");
    }

    /// Adds a vehicle to a road at the given displacement and velocity.
    /// The vehicle joins the queue behind any vehicles further along the road.
    pub fn add_vehicle(&mut self, road: Road, pos: f64, vel: f64) -> VehicleId {
        let id = self.insert_vehicle(road, pos, vel);
        self.stats.record_spawn(road);
        id
    }

    /// Gets the current simulation frame index.
    pub fn frame(&self) -> usize {
        self.frame
    }

    /// The simulated time in s.
    pub fn time(&self) -> f64 {
        self.time
    }

    /// The roads carrying traffic into the junction.
    pub fn roads(&self) -> &'static [Road] {
        self.roads
    }

    /// The signal controlling the junction.
    pub fn signal(&self) -> &SignalController {
        &self.signal
    }

    /// The tallies of spawned and cleared vehicles.
    pub fn statistics(&self) -> &Statistics {
        &self.stats
    }

    /// The queue of vehicles on a road.
    pub fn queue(&self, road: Road) -> &Queue {
        &self.queues[road]
    }

    /// Returns an iterator over the vehicles on a road, front first.
    pub fn iter_queue(&self, road: Road) -> impl Iterator<Item = &Vehicle> {
        self.queues[road]
            .vehicle_ids()
            .iter()
            .map(move |id| &self.vehicles[*id])
    }

    /// The number of vehicles on a road which are stopping or stopped.
    pub fn waiting_count(&self, road: Road) -> usize {
        self.iter_queue(road).filter(|vehicle| vehicle.is_waiting()).count()
    }

    /// Returns an iterator over all the vehicles in the simulation.
    pub fn iter_vehicles(&self) -> impl Iterator<Item = &Vehicle> {
        self.vehicles.values()
    }

    /// Gets a reference to the vehicle with the given ID, if it is still in the simulation.
    pub fn get_vehicle(&self, vehicle_id: VehicleId) -> Option<&Vehicle> {
        self.vehicles.get(vehicle_id)
    }

    /// Lines up waiting vehicles behind each stop line, one for every counted vehicle.
    fn populate(&mut self) {
        let spacing = self.attributes.length + MIN_GAP;
        for road in self.roads {
            let total = self
                .initial_counts
                .get(road)
                .map_or(0, |count| count.total() as usize);
            let total = total.min(MAX_INITIAL_QUEUE).min(self.spawn_cap);
            let front = road.stop_line() - 0.5 * STOP_LINE_TOLERANCE;
            for i in 0..total {
                let pos = front - 0.5 * self.attributes.length - i as f64 * spacing;
                let id = self.add_vehicle(*road, f64::max(pos, 0.0), 0.0);
                self.vehicles[id].set_waiting(true);
            }
        }
    }

    /// Randomly spawns vehicles at the start of each road.
    fn spawn_vehicles(&mut self, dt: f64) -> Vec<Road> {
        let mut spawned = vec![];
        for road in self.roads {
            let phase = WAVE_FREQUENCY * self.time + road.wave_offset();
            let wave = 1.0 + WAVE_AMPLITUDE * phase.sin();
            let rate = self.arrival_rates[*road] * wave;
            let p = (rate / 60.0 * dt).clamp(0.0, 1.0);
            let arrived = Bernoulli::new(p).map_or(false, |trial| trial.sample(&mut self.rng));
            if !arrived {
                continue;
            }
            if self.queues[*road].len() >= self.spawn_cap || self.spawn_point_occupied(*road) {
                continue;
            }
            self.insert_vehicle(*road, 0.0, 0.0);
            spawned.push(*road);
        }
        spawned
    }

    /// Whether the last vehicle on a road is still too close to its spawn point.
    fn spawn_point_occupied(&self, road: Road) -> bool {
        self.queues[road]
            .last()
            .map_or(false, |id| self.vehicles[id].pos_mid() < self.attributes.length + MIN_GAP)
    }

    /// Decides which vehicles must stop for the light or the vehicle ahead.
    fn apply_admission(&mut self) {
        for road in self.roads {
            let is_green = self.signal.is_green(*road);
            self.queues[*road].apply_admission(&mut self.vehicles, is_green);
        }
    }

    /// Integrates the velocities and positions of all vehicles.
    fn integrate(&mut self, dt: f64) {
        for road in self.roads {
            self.queues[*road].integrate(&mut self.vehicles, dt);
        }
    }

    /// Removes vehicles which have cleared the junction.
    fn retire_vehicles(&mut self) -> Vec<Road> {
        let mut passed = vec![];
        for road in self.roads {
            for vehicle_id in self.queues[*road].retire_vehicles(&self.vehicles) {
                self.vehicles.remove(vehicle_id);
                passed.push(*road);
            }
        }
        passed
    }

    /// Adds a vehicle to the simulation without counting it.
    fn insert_vehicle(&mut self, road: Road, pos: f64, vel: f64) -> VehicleId {
        let factor = Normal::new(1.0, VELOCITY_ADJUST_STDDEV)
            .map_or(1.0, |distr| distr.sample(&mut self.rng))
            .clamp(0.88, 1.12);
        let attributes = self.attributes;
        let vehicle_id = self.vehicles.insert_with_key(|id| {
            let mut vehicle = Vehicle::new(id, road, &attributes);
            vehicle.set_velocity_adjust(factor);
            vehicle.set_location(pos, vel);
            vehicle
        });
        self.queues[road].insert_vehicle(&self.vehicles, vehicle_id);
        vehicle_id
    }
}
