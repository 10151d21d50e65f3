//! Miscellaneous utility structs and functions.

use std::fmt::Debug;

/// An interval on the real number line.
#[derive(Copy, Clone, Default, PartialEq, Eq)]
pub struct Interval<T> {
    pub min: T,
    pub max: T,
}

impl<T> Interval<T> {
    /// Creates a new interval.
    pub const fn new(min: T, max: T) -> Self {
        Self { min, max }
    }
}

impl<T: PartialOrd> Interval<T> {
    /// Returns true if this interval contains the value.
    pub fn contains(&self, value: T) -> bool {
        value >= self.min && value <= self.max
    }
}

impl Interval<f64> {
    /// Creates an interval with the given centre and radius.
    pub fn disc(centre: f64, radius: f64) -> Self {
        Self {
            min: centre - radius,
            max: centre + radius,
        }
    }
}

impl<T: Debug> Debug for Interval<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Interval({:?}, {:?})", &self.min, &self.max)
    }
}

#[cfg(test)]
mod test {
    use super::Interval;

    #[test]
    fn disc_contains_its_bounds() {
        let band = Interval::disc(10.0, 1.5);
        assert_eq!(band, Interval::new(8.5, 11.5));
        assert!(band.contains(8.5));
        assert!(band.contains(11.5));
        assert!(!band.contains(11.6));
    }
}
