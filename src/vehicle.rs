use self::acceleration::AccelerationModel;
use crate::math::{Point2d, Vector2d};
use crate::{Road, VehicleId};

pub(crate) use self::acceleration::MIN_GAP;

mod acceleration;

/// A simulated vehicle.
#[derive(Clone, Debug)]
pub struct Vehicle {
    /// The vehicle's ID
    id: VehicleId,
    /// The road the vehicle is travelling along.
    road: Road,
    /// Half the vehicle's length in m.
    half_len: f64,
    /// The acceleration model
    acc: AccelerationModel,
    /// The displacement of the vehicle's centre from the road's spawn point, in m.
    pos: f64,
    /// The velocity in m/s.
    vel: f64,
    /// The velocity the vehicle cruises at when unobstructed, in m/s.
    max_vel: f64,
    /// Whether the vehicle is braking to a stop.
    waiting: bool,
}

/// The attributes of a simulated vehicle.
#[derive(Clone, Copy, Debug)]
pub struct VehicleAttributes {
    /// The vehicle length in m.
    pub length: f64,
    /// The cruising velocity in m/s.
    pub max_vel: f64,
    /// The maximum acceleration of the vehicle, in m/s^2.
    pub max_acc: f64,
    /// The comfortable deceleration of the vehicle, a positive number in m/s^2.
    pub comf_dec: f64,
}

impl Default for VehicleAttributes {
    fn default() -> Self {
        Self {
            length: 4.5,
            max_vel: 12.0,
            max_acc: 2.5,
            comf_dec: 4.5,
        }
    }
}

impl Vehicle {
    /// Creates a new vehicle.
    pub(crate) fn new(id: VehicleId, road: Road, attributes: &VehicleAttributes) -> Self {
        Self {
            id,
            road,
            half_len: 0.5 * attributes.length,
            acc: AccelerationModel::new(&acceleration::ModelParams {
                max_acceleration: attributes.max_acc,
                comf_deceleration: attributes.comf_dec,
            }),
            pos: 0.0,
            vel: 0.0,
            max_vel: attributes.max_vel,
            waiting: false,
        }
    }

    /// Gets the vehicle's ID.
    pub fn id(&self) -> VehicleId {
        self.id
    }

    /// The road the vehicle is travelling along.
    pub fn road(&self) -> Road {
        self.road
    }

    /// The vehicle's length in m.
    pub fn length(&self) -> f64 {
        2.0 * self.half_len
    }

    /// The displacement of the centre of the vehicle along its road, in m.
    pub fn pos_mid(&self) -> f64 {
        self.pos
    }

    /// The displacement of the front of the vehicle along its road, in m.
    pub fn pos_front(&self) -> f64 {
        self.pos + self.half_len
    }

    /// The coordinates in world space of the centre of the vehicle.
    pub fn position(&self) -> Point2d {
        self.road.world_position(self.pos)
    }

    /// A unit vector in world space aligned with the vehicle's heading.
    pub fn direction(&self) -> Vector2d {
        self.road.axis()
    }

    /// The vehicle's velocity in m/s.
    pub fn vel(&self) -> f64 {
        self.vel
    }

    /// The vehicle's cruising velocity in m/s.
    pub fn max_vel(&self) -> f64 {
        self.max_vel
    }

    /// The comfortable deceleration in m/s^2.
    pub fn comf_dec(&self) -> f64 {
        self.acc.comf_dec()
    }

    /// The maximum acceleration in m/s^2.
    pub fn max_acc(&self) -> f64 {
        self.acc.max_acc()
    }

    /// Whether the vehicle is braking to a stop, or held stopped.
    pub fn is_waiting(&self) -> bool {
        self.waiting
    }

    /// Whether the vehicle is stopped.
    pub fn has_stopped(&self) -> bool {
        self.vel < 0.1
    }

    /// Scales the vehicle's cruising velocity.
    pub(crate) fn set_velocity_adjust(&mut self, factor: f64) {
        self.max_vel *= factor;
    }

    /// Places the vehicle along its road.
    pub(crate) fn set_location(&mut self, pos: f64, vel: f64) {
        self.pos = pos;
        self.vel = f64::max(vel, 0.0);
    }

    pub(crate) fn set_waiting(&mut self, waiting: bool) {
        self.waiting = waiting;
    }

    /// Determines the comfortable stopping distance of the vehicle.
    pub(crate) fn stopping_distance(&self) -> f64 {
        self.acc.stopping_distance(self.vel)
    }

    /// The centre-to-centre distance this vehicle must keep behind the vehicle ahead.
    pub(crate) fn following_distance(&self) -> f64 {
        self.acc.following_distance(self.length(), self.vel)
    }

    /// Integrates the vehicle's velocity and position
    ///
    /// # Parameters
    /// * `dt` - The time step in seconds
    pub(crate) fn integrate(&mut self, dt: f64) {
        let target = if self.waiting { 0.0 } else { self.max_vel };
        let vel = self.acc.approach(self.vel, target, dt);
        self.pos += 0.5 * (self.vel + vel) * dt;
        self.vel = vel;
    }
}
