/// The minimum gap to maintain between stopped vehicles in m.
pub const MIN_GAP: f64 = 2.0; // m

/// The extra following distance kept per m/s of speed, in s.
const TIME_HEADWAY: f64 = 0.5; // s

/// The acceleration model of a vehicle.
///
/// Speeds are eased toward a target at a bounded rate,
/// so a vehicle never changes speed instantaneously.
#[derive(Clone, Debug)]
pub struct AccelerationModel {
    max_acc: f64,
    comf_dec: f64,
}

/// The parameters of the acceleration model.
pub struct ModelParams {
    /// The vehicle's maximum acceleration in m/s<sup>2</sup>.
    pub max_acceleration: f64,
    /// The comfortable deceleration in m/s<sup>2</sup>, a positive number.
    pub comf_deceleration: f64,
}

impl AccelerationModel {
    /// Creates a new acceleration model.
    pub fn new(params: &ModelParams) -> Self {
        AccelerationModel {
            max_acc: params.max_acceleration,
            comf_dec: params.comf_deceleration,
        }
    }

    /// The maximum acceleration in m/s<sup>2</sup>.
    pub fn max_acc(&self) -> f64 {
        self.max_acc
    }

    /// The comfortable deceleration in m/s<sup>2</sup>.
    pub fn comf_dec(&self) -> f64 {
        self.comf_dec
    }

    /// Calculates the velocity after easing from `vel` toward `target` for `dt` seconds.
    /// The result never overshoots the target and is never negative.
    pub fn approach(&self, vel: f64, target: f64, dt: f64) -> f64 {
        let vel = if vel < target {
            f64::min(target, vel + self.max_acc * dt)
        } else {
            f64::max(target, vel - self.comf_dec * dt)
        };
        f64::max(vel, 0.0)
    }

    /// Calculates the comfortable braking distance of the vehicle.
    pub fn stopping_distance(&self, vel: f64) -> f64 {
        vel * vel / (2.0 * self.comf_dec)
    }

    /// Calculates the distance a vehicle must keep behind the one ahead,
    /// measured between the vehicles' centres.
    ///
    /// # Arguments
    /// * `length` - The vehicle's length in m.
    /// * `vel` - The velocity of the vehicle (m/s).
    pub fn following_distance(&self, length: f64, vel: f64) -> f64 {
        length + MIN_GAP + vel * TIME_HEADWAY + self.stopping_distance(vel)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    fn model() -> AccelerationModel {
        AccelerationModel::new(&ModelParams {
            max_acceleration: 2.0,
            comf_deceleration: 4.0,
        })
    }

    #[test]
    fn approach_is_rate_limited() {
        let acc = model();
        assert_approx_eq!(acc.approach(0.0, 10.0, 0.5), 1.0);
        assert_approx_eq!(acc.approach(9.5, 10.0, 0.5), 10.0);
        assert_approx_eq!(acc.approach(10.0, 0.0, 0.5), 8.0);
        assert_approx_eq!(acc.approach(1.0, 0.0, 0.5), 0.0);
        assert_approx_eq!(acc.approach(0.0, 0.0, 0.5), 0.0);
    }

    #[test]
    fn distances_grow_with_speed() {
        let acc = model();
        assert_approx_eq!(acc.stopping_distance(0.0), 0.0);
        assert_approx_eq!(acc.stopping_distance(8.0), 8.0);
        assert_approx_eq!(acc.following_distance(4.0, 0.0), 6.0);
        assert_approx_eq!(acc.following_distance(4.0, 8.0), 6.0 + 4.0 + 8.0);
    }
}
