// Orientation normalization: rows → column-aligned series

use crate::table::Table;

/// One series of raw fields. `None` marks a position the source row did
/// not reach.
pub type RawSeries = Vec<Option<String>>;

/// How rows map onto series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    /// Each row is one observation, each field position one series
    #[default]
    ColumnMajor,
    /// Each row is already a complete series
    RowMajor,
}

impl Orientation {
    pub fn from_transpose(transpose: bool) -> Self {
        if transpose {
            Orientation::RowMajor
        } else {
            Orientation::ColumnMajor
        }
    }
}

/// Series in source order plus their optional labels
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Normalized {
    pub series: Vec<RawSeries>,
    pub headers: Option<Vec<String>>,
}

impl Normalized {
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

/// Regroup a table into series.
///
/// Column-major input is transposed over the widest row; shorter rows
/// contribute missing markers instead of truncating the other series.
pub fn normalize(table: Table, want_headers: bool, orientation: Orientation) -> Normalized {
    match orientation {
        Orientation::ColumnMajor => normalize_columns(table, want_headers),
        Orientation::RowMajor => normalize_rows(table, want_headers),
    }
}

fn normalize_columns(table: Table, want_headers: bool) -> Normalized {
    let mut rows = table.rows.into_iter();
    let header_row = if want_headers { rows.next() } else { None };
    let rows: Vec<Vec<String>> = rows.collect();

    // Pass 1: the transposition width
    let data_width = rows.iter().map(Vec::len).max().unwrap_or(0);
    let width = header_row.as_ref().map_or(data_width, |h| data_width.max(h.len()));

    // Pass 2: fixed-length series
    let mut series: Vec<RawSeries> = (0..width).map(|_| Vec::with_capacity(rows.len())).collect();
    for row in rows {
        let mut fields = row.into_iter();
        for column in series.iter_mut() {
            column.push(fields.next());
        }
    }

    let headers = header_row.map(|mut h| {
        h.resize(width, String::new());
        h
    });

    Normalized { series, headers }
}

fn normalize_rows(table: Table, want_headers: bool) -> Normalized {
    let mut headers = want_headers.then(Vec::new);
    let mut series = Vec::with_capacity(table.rows.len());

    for row in table.rows {
        let mut fields = row.into_iter();
        if let Some(labels) = headers.as_mut() {
            labels.push(fields.next().unwrap_or_default());
        }
        series.push(fields.map(Some).collect());
    }

    Normalized { series, headers }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(rows: Vec<Vec<&str>>) -> Table {
        Table::new(
            rows.into_iter()
                .map(|r| r.into_iter().map(str::to_string).collect())
                .collect(),
        )
    }

    fn present(values: &[&str]) -> RawSeries {
        values.iter().map(|v| Some(v.to_string())).collect()
    }

    #[test]
    fn test_column_major_with_headers() {
        let t = table(vec![vec!["x", "y"], vec!["1", "2"], vec!["3", "4"]]);
        let n = normalize(t, true, Orientation::ColumnMajor);
        assert_eq!(n.headers, Some(vec!["x".to_string(), "y".to_string()]));
        assert_eq!(n.series, vec![present(&["1", "3"]), present(&["2", "4"])]);
    }

    #[test]
    fn test_column_major_ragged_rows() {
        let t = table(vec![vec!["a", "b", "c"], vec!["d"], vec!["e", "f"]]);
        let n = normalize(t, false, Orientation::ColumnMajor);
        assert_eq!(n.series.len(), 3);
        assert!(n.series.iter().all(|s| s.len() == 3));
        assert_eq!(n.series[0], present(&["a", "d", "e"]));
        assert_eq!(n.series[1], vec![Some("b".to_string()), None, Some("f".to_string())]);
        assert_eq!(n.series[2], vec![Some("c".to_string()), None, None]);
    }

    #[test]
    fn test_column_major_short_header_row_is_padded() {
        let t = table(vec![vec!["x"], vec!["1", "2"]]);
        let n = normalize(t, true, Orientation::ColumnMajor);
        assert_eq!(n.headers, Some(vec!["x".to_string(), String::new()]));
        assert_eq!(n.series.len(), 2);
    }

    #[test]
    fn test_column_major_headers_only() {
        let t = table(vec![vec!["x", "y"]]);
        let n = normalize(t, true, Orientation::ColumnMajor);
        assert_eq!(n.series, vec![Vec::new(), Vec::new()]);
    }

    #[test]
    fn test_row_major_with_headers() {
        let t = table(vec![vec!["x", "1", "2"], vec!["y", "3"]]);
        let n = normalize(t, true, Orientation::RowMajor);
        assert_eq!(n.headers, Some(vec!["x".to_string(), "y".to_string()]));
        assert_eq!(n.series, vec![present(&["1", "2"]), present(&["3"])]);
    }

    #[test]
    fn test_row_major_without_headers() {
        let t = table(vec![vec!["1", "2"], vec!["3", "4"]]);
        let n = normalize(t, false, Orientation::RowMajor);
        assert_eq!(n.headers, None);
        assert_eq!(n.series, vec![present(&["1", "2"]), present(&["3", "4"])]);
    }

    #[test]
    fn test_transpose_inverse() {
        let columns = table(vec![vec!["1", "2", "3"], vec!["4", "5", "6"]]);
        let rows = table(vec![vec!["1", "4"], vec!["2", "5"], vec!["3", "6"]]);
        assert_eq!(
            normalize(columns, false, Orientation::ColumnMajor),
            normalize(rows, false, Orientation::RowMajor)
        );
    }

    #[test]
    fn test_empty_table() {
        let n = normalize(Table::default(), true, Orientation::ColumnMajor);
        assert!(n.is_empty());
        assert_eq!(n.headers, None);

        let n = normalize(Table::default(), true, Orientation::RowMajor);
        assert!(n.is_empty());
    }
}
