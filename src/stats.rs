// Statistics the renderer needs: histogram bins and box summaries

use crate::config::BinClosed;

/// One histogram bin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Bin finite values into equal-width bins spanning their range.
///
/// Without an explicit bin count, Sturges' rule is used. `closed` decides
/// which edge a value sitting exactly on a boundary belongs to; the outer
/// edges always include the extremes.
pub fn histogram(values: &[f64], nbins: Option<usize>, closed: BinClosed) -> Vec<Bin> {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() {
        return Vec::new();
    }

    let min = finite.iter().fold(f64::INFINITY, |a, &b| a.min(b));
    let max = finite.iter().fold(f64::NEG_INFINITY, |a, &b| a.max(b));
    let nbins = nbins.filter(|&n| n > 0).unwrap_or_else(|| sturges(finite.len()));

    let (start, width) = if min == max {
        (min - 0.5, 1.0 / nbins as f64)
    } else {
        (min, (max - min) / nbins as f64)
    };

    let mut counts = vec![0usize; nbins];
    for v in finite {
        let offset = (v - start) / width;
        let idx = match closed {
            BinClosed::Left => offset.floor() as isize,
            BinClosed::Right => offset.ceil() as isize - 1,
        };
        counts[idx.clamp(0, nbins as isize - 1) as usize] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| Bin {
            lower: start + i as f64 * width,
            upper: start + (i + 1) as f64 * width,
            count,
        })
        .collect()
}

/// Sturges' rule: ceil(log2(n)) + 1
fn sturges(n: usize) -> usize {
    (n as f64).log2().ceil() as usize + 1
}

/// Five-number summary with Tukey whiskers
#[derive(Debug, Clone, PartialEq)]
pub struct BoxSummary {
    pub lower_whisker: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub upper_whisker: f64,
    pub outliers: Vec<f64>,
}

/// Summarise a distribution; `None` without finite values
pub fn box_summary(values: &[f64]) -> Option<BoxSummary> {
    let mut ys: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if ys.is_empty() {
        return None;
    }
    ys.sort_by(f64::total_cmp);

    let q1 = percentile(&ys, 0.25);
    let median = percentile(&ys, 0.50);
    let q3 = percentile(&ys, 0.75);
    let iqr = q3 - q1;
    let lower_fence = q1 - 1.5 * iqr;
    let upper_fence = q3 + 1.5 * iqr;

    let inside = || ys.iter().copied().filter(|&v| v >= lower_fence && v <= upper_fence);
    let lower_whisker = inside().fold(f64::INFINITY, f64::min);
    let upper_whisker = inside().fold(f64::NEG_INFINITY, f64::max);
    let outliers = ys
        .iter()
        .copied()
        .filter(|&v| v < lower_fence || v > upper_fence)
        .collect();

    Some(BoxSummary {
        lower_whisker,
        q1,
        median,
        q3,
        upper_whisker,
        outliers,
    })
}

/// Linear-interpolated percentile of sorted data
fn percentile(sorted: &[f64], p: f64) -> f64 {
    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }

    let rank = p * (n - 1) as f64;
    let lower_idx = rank.floor() as usize;
    let upper_idx = rank.ceil() as usize;
    let weight = rank - lower_idx as f64;
    sorted[lower_idx] * (1.0 - weight) + sorted[upper_idx] * weight
}
