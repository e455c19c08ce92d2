//! Index key types.
//!
//! Any totally ordered, cloneable, default-constructible type can key a
//! [`BPlusTree`](crate::index::BPlusTree). Floating point values are wrapped
//! in [`Percentage`] so they get a total order.

use std::cmp::Ordering;
use std::fmt;

/// Bound satisfied by every index key type.
///
/// `Default` supplies the filler value for unused key slots.
pub trait IndexKey: Clone + Default + Ord + fmt::Debug {}

impl<T: Clone + Default + Ord + fmt::Debug> IndexKey for T {}

/// Keys that support "strictly greater than a threshold" range scans.
pub trait ThresholdKey: IndexKey + Copy {
    /// The largest key; upper bound of an open-ended scan.
    const MAX: Self;

    /// The smallest key strictly greater than `self`, or `None` at the top.
    fn next_above(self) -> Option<Self>;

    /// The key as a number, for value sums.
    fn to_f64(self) -> f64;
}

impl ThresholdKey for i32 {
    const MAX: Self = i32::MAX;

    fn next_above(self) -> Option<Self> {
        self.checked_add(1)
    }

    fn to_f64(self) -> f64 {
        f64::from(self)
    }
}

/// A shooting percentage in `[0, 1]`, totally ordered by `f32::total_cmp`.
///
/// # Example
/// ```
/// use boxscoredb::index::{Percentage, ThresholdKey};
///
/// let p = Percentage(0.9);
/// let above = p.next_above().unwrap();
/// assert!(above > p);
/// assert!(above.0 > 0.9);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Percentage(pub f32);

impl Percentage {
    /// Wrap `value`, folding `-0.0` into `+0.0` so both zeros share one key.
    #[inline]
    pub fn new(value: f32) -> Self {
        if value == 0.0 {
            Percentage(0.0)
        } else {
            Percentage(value)
        }
    }
}

impl PartialEq for Percentage {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Percentage {}

impl PartialOrd for Percentage {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Percentage {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl From<f32> for Percentage {
    fn from(value: f32) -> Self {
        Percentage::new(value)
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}", self.0)
    }
}

impl ThresholdKey for Percentage {
    /// The positive quiet NaN with every payload bit set; last in `total_cmp`.
    const MAX: Self = Percentage(f32::from_bits(0x7FFF_FFFF));

    /// Successor in `total_cmp` order, NaNs included.
    ///
    /// `-0.0` steps to `+0.0` and the closest negative NaN steps to
    /// `-inf`, so a scan from `next_above` covers exactly the keys a
    /// `>` comparison accepts.
    fn next_above(self) -> Option<Self> {
        let bits = self.0.to_bits();
        let next = match bits {
            0x7FFF_FFFF => return None,
            0x8000_0000 => 0,
            _ if bits & 0x8000_0000 != 0 => bits - 1,
            _ => bits + 1,
        };
        Some(Percentage(f32::from_bits(next)))
    }

    fn to_f64(self) -> f64 {
        f64::from(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage_total_order() {
        let mut values = vec![Percentage(0.9), Percentage(0.1), Percentage(0.5)];
        values.sort();
        assert_eq!(values, vec![Percentage(0.1), Percentage(0.5), Percentage(0.9)]);
        assert!(Percentage(-0.0) < Percentage(0.0));
    }

    #[test]
    fn test_percentage_next_above_is_tight() {
        let p = Percentage(0.9);
        let above = p.next_above().unwrap();
        assert!(above > p);
        assert_eq!(above.0.to_bits(), 0.9f32.to_bits() + 1);
    }

    #[test]
    fn test_percentage_next_above_edges() {
        assert_eq!(Percentage(-0.0).next_above(), Some(Percentage(0.0)));
        assert_eq!(
            Percentage(0.0).next_above(),
            Some(Percentage(f32::from_bits(1)))
        );
        assert!(Percentage(-1.0).next_above().unwrap() > Percentage(-1.0));
        assert_eq!(
            Percentage(f32::INFINITY).next_above(),
            Some(Percentage(f32::from_bits(0x7F80_0001)))
        );
        assert_eq!(<Percentage as ThresholdKey>::MAX.next_above(), None);
    }

    #[test]
    fn test_percentage_next_above_negative_nan() {
        let neg_nan: f32 = "-NaN".parse().unwrap();
        let above = Percentage(neg_nan).next_above().unwrap();
        assert!(above > Percentage(neg_nan));

        let closest = Percentage(f32::from_bits(0xFF80_0001));
        assert_eq!(closest.next_above(), Some(Percentage(f32::NEG_INFINITY)));
    }

    #[test]
    fn test_percentage_max_is_last() {
        let max = <Percentage as ThresholdKey>::MAX;
        for v in [f32::INFINITY, f32::NAN, 1.0, -f32::NAN] {
            assert!(Percentage(v) <= max);
        }
    }

    #[test]
    fn test_percentage_new_folds_negative_zero() {
        assert_eq!(Percentage::new(-0.0).0.to_bits(), 0);
        assert_eq!(Percentage::from(-0.0), Percentage(0.0));
        assert_eq!(Percentage::new(0.25), Percentage(0.25));
    }

    #[test]
    fn test_i32_next_above() {
        assert_eq!(100i32.next_above(), Some(101));
        assert_eq!(i32::MAX.next_above(), None);
        assert_eq!(<i32 as ThresholdKey>::MAX, i32::MAX);
    }
}
