// Data extents and axis range padding

use std::ops::Range;

/// Min/max over the finite values seen so far
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub min: f64,
    pub max: f64,
}

impl Extent {
    /// Extent of the finite values in `values`, or `None` if there are none
    pub fn of<I>(values: I) -> Option<Extent>
    where
        I: IntoIterator<Item = f64>,
    {
        values
            .into_iter()
            .filter(|v| v.is_finite())
            .fold(None, |acc: Option<Extent>, v| {
                Some(match acc {
                    Some(e) => Extent {
                        min: e.min.min(v),
                        max: e.max.max(v),
                    },
                    None => Extent { min: v, max: v },
                })
            })
    }

    /// Extent of the present values of one series
    pub fn of_series(series: &[Option<f64>]) -> Option<Extent> {
        Extent::of(series.iter().flatten().copied())
    }

    /// Extent across several series; missing positions are skipped
    pub fn of_all<'a, I>(series: I) -> Option<Extent>
    where
        I: IntoIterator<Item = &'a [Option<f64>]>,
    {
        series
            .into_iter()
            .filter_map(Extent::of_series)
            .reduce(Extent::merge)
    }

    pub fn merge(self, other: Extent) -> Extent {
        Extent {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Widen to contain `value`
    pub fn include(self, value: f64) -> Extent {
        self.merge(Extent { min: value, max: value })
    }

    pub fn as_tuple(self) -> (f64, f64) {
        (self.min, self.max)
    }
}

/// Axis range with 5% padding; degenerate extents widen by 1 each way
pub fn pad_range(min: f64, max: f64) -> Range<f64> {
    if min == max {
        (min - 1.0)..(max + 1.0)
    } else {
        let padding = (max - min) * 0.05;
        (min - padding)..(max + padding)
    }
}

/// Explicit limits win; otherwise the padded data extent, or 0..1 with no data
pub fn axis_range(limits: Option<(f64, f64)>, extent: Option<Extent>) -> Range<f64> {
    match (limits, extent) {
        (Some((lo, hi)), _) if lo < hi => lo..hi,
        (Some((lo, hi)), _) if lo > hi => hi..lo,
        (Some((lo, hi)), _) => pad_range(lo, hi),
        (None, Some(e)) => pad_range(e.min, e.max),
        (None, None) => 0.0..1.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extent_skips_missing_and_non_finite() {
        let e = Extent::of_series(&[Some(2.0), None, Some(f64::NAN), Some(-1.0), Some(f64::INFINITY)]);
        assert_eq!(e, Some(Extent { min: -1.0, max: 2.0 }));
    }

    #[test]
    fn test_extent_empty() {
        assert_eq!(Extent::of_series(&[None, None]), None);
        assert_eq!(Extent::of(Vec::new()), None);
    }

    #[test]
    fn test_extent_across_series() {
        let y1 = vec![Some(0.0), Some(5.0)];
        let y2 = vec![Some(-3.0), Some(2.0)];
        let e = Extent::of_all([y1.as_slice(), y2.as_slice()]).unwrap();
        assert_eq!(e.as_tuple(), (-3.0, 5.0));
    }

    #[test]
    fn test_pad_range() {
        assert_eq!(pad_range(5.0, 5.0), 4.0..6.0);
        let r = pad_range(0.0, 10.0);
        assert!(r.start < 0.0 && r.end > 10.0);
    }

    #[test]
    fn test_axis_range_prefers_limits() {
        let e = Extent { min: 0.0, max: 100.0 };
        assert_eq!(axis_range(Some((1.0, 2.0)), Some(e)), 1.0..2.0);
        assert_eq!(axis_range(None, None), 0.0..1.0);
        assert_eq!(axis_range(Some((3.0, 3.0)), None), 2.0..4.0);
    }
}
