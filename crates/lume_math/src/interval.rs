#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f32,
    pub max: f32,
}

impl Interval {
    /// Create a new interval given min and max values.
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Returns the size of the interval (max - min).
    pub fn size(&self) -> f32 {
        self.max - self.min
    }

    /// Returns true if x is within the interval [min, max] (inclusive).
    pub fn contains(&self, x: f32) -> bool {
        self.min <= x && x <= self.max
    }

    /// Returns true if x is strictly within the interval (min, max) (exclusive).
    pub fn surrounds(&self, x: f32) -> bool {
        self.min < x && x < self.max
    }

    /// Clamps x to be within the interval [min, max].
    pub fn clamp(&self, x: f32) -> f32 {
        x.clamp(self.min, self.max)
    }

    /// Expands the interval by delta/2 on each side.
    pub fn expand(&self, delta: f32) -> Interval {
        let padding = delta / 2.0;
        Interval::new(self.min - padding, self.max + padding)
    }

    /// Creates an interval that surrounds two other intervals.
    pub fn surrounding(a: &Interval, b: &Interval) -> Interval {
        Interval::new(a.min.min(b.min), a.max.max(b.max))
    }

    /// Empty interval (contains nothing).
    pub const EMPTY: Interval = Interval {
        min: f32::INFINITY,
        max: f32::NEG_INFINITY,
    };

    /// Universe interval (contains everything).
    pub const UNIVERSE: Interval = Interval {
        min: f32::NEG_INFINITY,
        max: f32::INFINITY,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_contains() {
        let i = Interval::new(1.0, 3.0);
        assert!(i.contains(1.0));
        assert!(i.contains(2.0));
        assert!(i.contains(3.0));
        assert!(!i.contains(0.5));
        assert!(!i.contains(3.5));
    }

    #[test]
    fn test_interval_surrounds() {
        let i = Interval::new(1.0, 3.0);
        assert!(!i.surrounds(1.0));
        assert!(i.surrounds(2.0));
        assert!(!i.surrounds(3.0));
    }

    #[test]
    fn test_interval_expand() {
        let i = Interval::new(1.0, 3.0).expand(2.0);
        assert_eq!(i.min, 0.0);
        assert_eq!(i.max, 4.0);
    }

    #[test]
    fn test_interval_surrounding() {
        let a = Interval::new(0.0, 2.0);
        let b = Interval::new(1.0, 5.0);
        let s = Interval::surrounding(&a, &b);
        assert_eq!(s.min, 0.0);
        assert_eq!(s.max, 5.0);
    }

    #[test]
    fn test_empty_contains_nothing() {
        assert!(!Interval::EMPTY.contains(0.0));
        assert!(Interval::EMPTY.size() < 0.0);
    }
}
