use adaptive_signal::{
    arrival_rates_from_counts, plan_schedule, Command, JunctionConfig, RandomCountProvider, Road,
    SchedulePlan, Simulation,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// The simulation runs at 60 frames per simulated second.
const FRAME_TIME: f64 = 1.0 / 60.0;

/// How much traffic to simulate, in s.
const RUN_TIME: f64 = 180.0;

/// How often a summary is logged, in s.
const REPORT_INTERVAL: f64 = 5.0;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let seed = match std::env::args().nth(1) {
        Some(arg) => arg.parse()?,
        None => rand::random(),
    };
    log::info!("seed {}", seed);

    let mut config = JunctionConfig::default();
    let mut provider = RandomCountProvider::new(StdRng::seed_from_u64(seed));
    let plan = match plan_schedule(&config, &mut provider) {
        Ok(plan) => plan,
        Err(err) => {
            log::error!("could not plan the junction: {}", err);
            SchedulePlan::fallback(&JunctionConfig::default())?
        }
    };
    for road in plan.junction.roads() {
        log::info!(
            "{}: {} vehicles, load {:.1}",
            road,
            plan.counts.get(road).map_or(0, |count| count.total()),
            plan.loads.get(*road).unwrap_or(0.0)
        );
    }
    config.arrival_rates = arrival_rates_from_counts(&plan.counts);

    let mut sim = Simulation::with_seed(&config, &plan, seed)?;
    let frames = (RUN_TIME / FRAME_TIME) as usize;
    let report_every = (REPORT_INTERVAL / FRAME_TIME) as usize;
    let mut forced = false;
    for frame in 1..=frames {
        sim.step(FRAME_TIME);
        if !forced && sim.time() >= 0.5 * RUN_TIME {
            sim.apply(Command::ForceAdvance);
            forced = true;
        }
        if frame % report_every == 0 {
            let signal = sim.signal();
            let state = signal.state();
            let queues = Road::ALL
                .iter()
                .map(|road| format!("{} {}", road, sim.queue(*road).len()))
                .collect::<Vec<_>>()
                .join(", ");
            log::info!(
                "t={:.0}s phase {} {:?} ({:.1}s left) | queues: {} | {}",
                sim.time(),
                signal.current_phase(),
                state.stage,
                signal.time_remaining(),
                queues,
                sim.statistics()
            );
        }
    }

    println!("{}", sim.statistics());
    Ok(())
}
