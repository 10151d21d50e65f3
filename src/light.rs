use crate::{Error, Phase, Result, Road, Schedule};

/// The traffic signal of the junction, serving each phase in turn.
///
/// Every phase is shown green for its scheduled time and then amber for a
/// fixed time before the next phase turns green. Roads outside the current
/// phase are red.
#[derive(Clone, Debug)]
pub struct SignalController {
    /// The phases, in the order they are served.
    phases: Vec<Phase>,
    /// The green time of each phase.
    schedule: Schedule,
    /// The duration of the amber stage in s.
    yellow_time: f64,
    /// The current state.
    state: SignalState,
    /// Whether the countdown is frozen.
    paused: bool,
}

/// A snapshot of the signal's progress through its cycle.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SignalState {
    /// The index of the phase being served.
    pub phase: usize,
    /// Whether the phase is showing green or amber.
    pub stage: SignalStage,
    /// The time left in the current stage in s.
    /// May be negative for the tick in which a stage runs out.
    pub remaining: f64,
}

/// The stage of the phase being served.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SignalStage {
    Green,
    Yellow,
}

/// The light shown to a single road.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LightState {
    Red,
    Amber,
    Green,
}

impl SignalController {
    /// Creates a signal which starts at the beginning of the first phase's green.
    ///
    /// The schedule must hold one entry for every phase.
    pub fn new(phases: Vec<Phase>, schedule: Schedule, yellow_time: f64) -> Result<Self> {
        if phases.is_empty() {
            return Err(Error::InvalidConfig {
                field: "phases",
                reason: "a signal needs at least one phase".into(),
            });
        }
        check_schedule(&phases, &schedule)?;
        let state = SignalState {
            phase: 0,
            stage: SignalStage::Green,
            remaining: schedule.green_time(0).unwrap_or_default(),
        };
        Ok(Self {
            phases,
            schedule,
            yellow_time,
            state,
            paused: false,
        })
    }

    /// Advances the signal timing by `dt` seconds.
    ///
    /// At most one stage change happens per call, however large `dt` is.
    /// Any overrun is carried into the next stage, so an oversized tick is
    /// caught up by the following calls. Returns `true` if the stage changed.
    pub fn step(&mut self, dt: f64) -> bool {
        if self.paused {
            return false;
        }
        self.state.remaining -= dt;
        if self.state.remaining <= 0.0 {
            let overrun = self.state.remaining;
            self.advance();
            self.state.remaining += overrun;
            true
        } else {
            false
        }
    }

    /// Moves to the next stage immediately, with its full duration.
    pub fn force_advance(&mut self) {
        self.advance();
    }

    /// Returns to the start of the first phase's green, discarding any drift.
    pub fn reset(&mut self) {
        self.state = SignalState {
            phase: 0,
            stage: SignalStage::Green,
            remaining: self.green_time(0),
        };
    }

    /// Freezes the countdown; calls to [Self::step] are ignored until resumed.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Resumes the countdown.
    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Toggles between paused and running.
    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    /// Whether the countdown is frozen.
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Replaces the green times. The current stage keeps its remaining time;
    /// the new times apply from the next green stage.
    pub fn set_schedule(&mut self, schedule: Schedule) -> Result<()> {
        check_schedule(&self.phases, &schedule)?;
        log::info!("signal schedule updated to {:?}", schedule.green_times());
        self.schedule = schedule;
        Ok(())
    }

    /// The current state.
    pub fn state(&self) -> SignalState {
        self.state
    }

    /// The phases, in the order they are served.
    pub fn phases(&self) -> &[Phase] {
        &self.phases
    }

    /// The green times in use.
    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    /// The phase being served.
    pub fn current_phase(&self) -> &Phase {
        &self.phases[self.state.phase]
    }

    /// The phase which will be served after the current one.
    pub fn next_phase(&self) -> &Phase {
        &self.phases[(self.state.phase + 1) % self.phases.len()]
    }

    /// The roads of the phase being served, whether green or amber.
    pub fn green_roads(&self) -> &[Road] {
        self.current_phase().roads()
    }

    /// Whether the current phase is showing amber.
    pub fn is_yellow(&self) -> bool {
        self.state.stage == SignalStage::Yellow
    }

    /// Whether vehicles on `road` may proceed.
    pub fn is_green(&self, road: Road) -> bool {
        self.light_state(road) == LightState::Green
    }

    /// The light shown to `road`.
    pub fn light_state(&self, road: Road) -> LightState {
        match (self.current_phase().contains(road), self.state.stage) {
            (false, _) => LightState::Red,
            (true, SignalStage::Green) => LightState::Green,
            (true, SignalStage::Yellow) => LightState::Amber,
        }
    }

    /// The time left in the current stage in s, never negative.
    pub fn time_remaining(&self) -> f64 {
        f64::max(self.state.remaining, 0.0)
    }

    /// Moves to the next stage with its full duration.
    fn advance(&mut self) {
        self.state = match self.state.stage {
            SignalStage::Green => SignalState {
                phase: self.state.phase,
                stage: SignalStage::Yellow,
                remaining: self.yellow_time,
            },
            SignalStage::Yellow => {
                let phase = (self.state.phase + 1) % self.phases.len();
                SignalState {
                    phase,
                    stage: SignalStage::Green,
                    remaining: self.green_time(phase),
                }
            }
        };
        log::debug!(
            "signal phase {} {} now {:?} for {:.1}s",
            self.state.phase,
            self.current_phase(),
            self.state.stage,
            self.state.remaining
        );
    }

    fn green_time(&self, phase: usize) -> f64 {
        self.schedule.green_time(phase).unwrap_or_default()
    }
}

fn check_schedule(phases: &[Phase], schedule: &Schedule) -> Result<()> {
    if schedule.len() != phases.len() {
        return Err(Error::InvalidConfig {
            field: "schedule",
            reason: format!(
                "{} green times given for {} phases",
                schedule.len(),
                phases.len()
            ),
        });
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::Junction;
    use assert_approx_eq::assert_approx_eq;

    fn four_way() -> SignalController {
        SignalController::new(
            Junction::FourWay.phases(),
            Schedule::from_green_times([10.0, 5.0]),
            2.0,
        )
        .unwrap()
    }

    #[test]
    fn cycles_through_stages() {
        let mut signal = four_way();
        assert!(signal.is_green(Road::North));
        assert_eq!(signal.light_state(Road::East), LightState::Red);

        for _ in 0..19 {
            assert!(!signal.step(0.5));
        }
        assert!(signal.step(0.5));
        assert!(signal.is_yellow());
        assert_eq!(signal.light_state(Road::South), LightState::Amber);
        assert!(!signal.is_green(Road::South));

        for _ in 0..4 {
            signal.step(0.5);
        }
        assert_eq!(signal.state().phase, 1);
        assert_eq!(signal.state().stage, SignalStage::Green);
        assert_eq!(signal.green_roads(), &[Road::East, Road::West]);
        assert_eq!(signal.next_phase(), &Junction::FourWay.phases()[0]);
    }

    #[test]
    fn one_transition_per_step() {
        let mut signal = four_way();
        // Crosses green, amber and the next green in a single tick
        assert!(signal.step(20.0));
        assert_eq!(signal.state().stage, SignalStage::Yellow);
        assert_eq!(signal.state().phase, 0);
        // The overrun is caught up on later ticks
        assert!(signal.step(0.0));
        assert_eq!(signal.state().phase, 1);
        assert_eq!(signal.state().stage, SignalStage::Green);
        assert!(signal.step(0.0));
        assert_eq!(signal.state().stage, SignalStage::Yellow);
        assert_approx_eq!(signal.state().remaining, 2.0 - 3.0);
    }

    #[test]
    fn pause_freezes_countdown() {
        let mut signal = four_way();
        signal.pause();
        assert!(!signal.step(100.0));
        assert_approx_eq!(signal.time_remaining(), 10.0);
        signal.toggle_pause();
        assert!(!signal.is_paused());
        signal.step(4.0);
        assert_approx_eq!(signal.time_remaining(), 6.0);
    }

    #[test]
    fn force_advance_and_reset() {
        let mut signal = four_way();
        signal.step(3.0);
        signal.force_advance();
        assert!(signal.is_yellow());
        assert_approx_eq!(signal.time_remaining(), 2.0);
        signal.force_advance();
        assert_eq!(signal.state().phase, 1);
        assert_approx_eq!(signal.time_remaining(), 5.0);

        signal.step(1.3);
        signal.reset();
        assert_eq!(
            signal.state(),
            SignalState {
                phase: 0,
                stage: SignalStage::Green,
                remaining: 10.0
            }
        );
    }

    #[test]
    fn schedule_must_match_phases() {
        let mut signal = four_way();
        assert!(signal.set_schedule(Schedule::from_green_times([1.0, 2.0, 3.0])).is_err());
        signal.set_schedule(Schedule::from_green_times([20.0, 20.0])).unwrap();
        assert_approx_eq!(signal.time_remaining(), 10.0);
        signal.force_advance();
        signal.force_advance();
        assert_approx_eq!(signal.time_remaining(), 20.0);
    }
}
