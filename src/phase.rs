use crate::{Error, Road};
use smallvec::SmallVec;
use std::fmt;

/// The shape of the junction being controlled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u8", into = "u8"))]
pub enum Junction {
    /// A T-junction.
    ThreeWay,
    /// A crossroads.
    FourWay,
}

/// A set of roads that are green at the same time.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Phase {
    roads: SmallVec<[Road; 2]>,
}

impl Junction {
    /// The number of roads meeting at the junction.
    pub fn arity(self) -> u8 {
        match self {
            Junction::ThreeWay => 3,
            Junction::FourWay => 4,
        }
    }

    /// The roads which carry traffic into the junction.
    pub fn roads(self) -> &'static [Road] {
        match self {
            Junction::ThreeWay => &[Road::North, Road::East, Road::South],
            Junction::FourWay => &Road::ALL,
        }
    }

    /// The conflict-free phases of the junction, in the order they are served.
    pub fn phases(self) -> Vec<Phase> {
        use Road::*;
        match self {
            Junction::FourWay => vec![Phase::new([North, South]), Phase::new([East, West])],
            Junction::ThreeWay => vec![
                Phase::new([North, East]),
                Phase::new([East, South]),
                Phase::new([South, North]),
            ],
        }
    }
}

impl TryFrom<u8> for Junction {
    type Error = Error;

    fn try_from(arity: u8) -> Result<Self, Error> {
        match arity {
            3 => Ok(Junction::ThreeWay),
            4 => Ok(Junction::FourWay),
            _ => Err(Error::UnsupportedJunction(arity)),
        }
    }
}

impl From<Junction> for u8 {
    fn from(junction: Junction) -> u8 {
        junction.arity()
    }
}

/// Gets the phases of a junction with the given number of roads.
pub fn group_phases(arity: u8) -> Result<Vec<Phase>, Error> {
    Junction::try_from(arity).map(Junction::phases)
}

impl Phase {
    /// Creates a phase from the roads it turns green.
    pub fn new(roads: impl IntoIterator<Item = Road>) -> Self {
        Self {
            roads: roads.into_iter().collect(),
        }
    }

    /// The roads this phase turns green.
    pub fn roads(&self) -> &[Road] {
        &self.roads
    }

    /// Whether this phase turns the given road green.
    pub fn contains(&self, road: Road) -> bool {
        self.roads.contains(&road)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use itertools::Itertools;
        write!(f, "{{{}}}", self.roads.iter().join(", "))
    }
}
