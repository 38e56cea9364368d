// Field → number conversion

use crate::error::PlotError;
use crate::normalize::RawSeries;

/// A numeric series; `None` is a missing observation, never zero.
pub type Series = Vec<Option<f64>>;

/// Convert one raw series to numbers.
///
/// `index` is the 0-based position of the series in its set and is only
/// used to report where a bad field sits.
pub fn coerce(series: &RawSeries, index: usize) -> Result<Series, PlotError> {
    series
        .iter()
        .enumerate()
        .map(|(position, field)| coerce_field(field.as_deref(), index, position))
        .collect()
}

/// Convert every series of a set, stopping at the first bad field
pub fn coerce_all(series: &[RawSeries]) -> Result<Vec<Series>, PlotError> {
    series
        .iter()
        .enumerate()
        .map(|(index, s)| coerce(s, index))
        .collect()
}

fn coerce_field(field: Option<&str>, series: usize, position: usize) -> Result<Option<f64>, PlotError> {
    let Some(text) = field.map(str::trim).filter(|t| !t.is_empty()) else {
        return Ok(None);
    };
    text.parse::<f64>().map(Some).map_err(|_| PlotError::Coercion {
        series: series + 1,
        position: position + 1,
        value: text.to_string(),
    })
}

/// The present values of a series, in order
pub fn present(series: &[Option<f64>]) -> Vec<f64> {
    series.iter().flatten().copied().collect()
}
