use crate::math::{Point2d, Vector2d};
use std::fmt;
use std::ops::{Index, IndexMut};

/// Distance from a road's spawn point to the junction centre, in m.
pub const APPROACH_LENGTH: f64 = 100.0; // m

/// Distance between the stop line and the junction centre, in m.
pub const STOP_LINE_SETBACK: f64 = 12.0; // m

/// Distance past the junction centre at which a vehicle has cleared the junction, in m.
pub const CLEARANCE: f64 = 25.0; // m

/// Lateral offset of a road's lane from the junction axis, in m.
const LANE_OFFSET: f64 = 2.0; // m

/// One approach to the junction, named after the direction its traffic travels.
///
/// All positions along a road are scalar displacements from its spawn point,
/// measured along the road's travel axis, so every road shares one code path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Road {
    North,
    South,
    East,
    West,
}

impl Road {
    /// Every road, in a fixed order.
    pub const ALL: [Road; 4] = [Road::North, Road::South, Road::East, Road::West];

    /// A dense index for per-road storage.
    pub fn index(self) -> usize {
        match self {
            Road::North => 0,
            Road::South => 1,
            Road::East => 2,
            Road::West => 3,
        }
    }

    /// The lowercase name of the road.
    pub fn name(self) -> &'static str {
        match self {
            Road::North => "north",
            Road::South => "south",
            Road::East => "east",
            Road::West => "west",
        }
    }

    /// The unit vector in world space along which this road's traffic travels.
    pub fn axis(self) -> Vector2d {
        match self {
            Road::North => Vector2d::new(0.0, 1.0),
            Road::South => Vector2d::new(0.0, -1.0),
            Road::East => Vector2d::new(1.0, 0.0),
            Road::West => Vector2d::new(-1.0, 0.0),
        }
    }

    /// The world space coordinates of the road's spawn point.
    /// Lanes keep to the right of the junction axis.
    pub fn spawn_point(self) -> Point2d {
        let axis = self.axis();
        let right = Vector2d::new(axis.y, -axis.x);
        Point2d::new(0.0, 0.0) - axis * APPROACH_LENGTH + right * LANE_OFFSET
    }

    /// Projects a displacement along the road into world space.
    pub fn world_position(self, pos: f64) -> Point2d {
        self.spawn_point() + self.axis() * pos
    }

    /// The displacement of the stop line from the spawn point, in m.
    pub fn stop_line(self) -> f64 {
        APPROACH_LENGTH - STOP_LINE_SETBACK
    }

    /// The displacement past which a vehicle is retired, in m.
    pub fn exit_line(self) -> f64 {
        APPROACH_LENGTH + CLEARANCE
    }

    /// A fixed per-road phase shift for the arrival wave, in radians.
    pub(crate) fn wave_offset(self) -> f64 {
        self.index() as f64 * std::f64::consts::FRAC_PI_2
    }
}

impl fmt::Display for Road {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A value stored for every road, indexed by [Road].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PerRoad<T>([T; 4]);

impl<T> PerRoad<T> {
    /// Builds a per-road value from a function of the road.
    pub fn from_fn(mut f: impl FnMut(Road) -> T) -> Self {
        Self(Road::ALL.map(&mut f))
    }

    /// Iterates over every road with its value.
    pub fn iter(&self) -> impl Iterator<Item = (Road, &T)> {
        Road::ALL.into_iter().zip(self.0.iter())
    }

    /// Iterates mutably over every road with its value.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Road, &mut T)> {
        Road::ALL.into_iter().zip(self.0.iter_mut())
    }
}

impl<T> Index<Road> for PerRoad<T> {
    type Output = T;

    fn index(&self, road: Road) -> &T {
        &self.0[road.index()]
    }
}

impl<T> IndexMut<Road> for PerRoad<T> {
    fn index_mut(&mut self, road: Road) -> &mut T {
        &mut self.0[road.index()]
    }
}
