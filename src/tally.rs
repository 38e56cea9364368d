// Categorical frequency counting for `count` mode

use crate::normalize::RawSeries;
use std::collections::HashMap;

/// Distinct categories with their frequencies, most frequent first
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Tally {
    pub categories: Vec<String>,
    pub counts: Vec<u64>,
}

/// Count occurrences of each distinct value.
///
/// Ties keep first-seen order. Missing markers are padding from ragged
/// input and are not counted.
pub fn tally(series: &RawSeries) -> Tally {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut entries: Vec<(&str, u64)> = Vec::new();

    for value in series.iter().flatten().map(String::as_str) {
        match index.get(value) {
            Some(&i) => entries[i].1 += 1,
            None => {
                index.insert(value, entries.len());
                entries.push((value, 1));
            }
        }
    }

    // sort_by is stable
    entries.sort_by(|a, b| b.1.cmp(&a.1));

    let (categories, counts) = entries
        .into_iter()
        .map(|(category, count)| (category.to_string(), count))
        .unzip();
    Tally { categories, counts }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(values: &[&str]) -> RawSeries {
        values.iter().map(|v| Some(v.to_string())).collect()
    }

    #[test]
    fn test_tally_descending_frequency() {
        let t = tally(&raw(&["a", "b", "a", "c", "b", "a"]));
        assert_eq!(t.categories, vec!["a", "b", "c"]);
        assert_eq!(t.counts, vec![3, 2, 1]);
    }

    #[test]
    fn test_tally_ties_keep_first_seen_order() {
        let t = tally(&raw(&["z", "y", "x", "y", "z", "x"]));
        assert_eq!(t.categories, vec!["z", "y", "x"]);
        assert_eq!(t.counts, vec![2, 2, 2]);
    }

    #[test]
    fn test_tally_numeric_categories() {
        let t = tally(&raw(&["1", "2", "1", "3", "1"]));
        assert_eq!(t.categories, vec!["1", "2", "3"]);
        assert_eq!(t.counts, vec![3, 1, 1]);
    }

    #[test]
    fn test_tally_ignores_missing() {
        let series = vec![Some("a".to_string()), None, Some("a".to_string()), None];
        let t = tally(&series);
        assert_eq!(t.categories, vec!["a"]);
        assert_eq!(t.counts, vec![2]);
    }

    #[test]
    fn test_tally_empty() {
        assert_eq!(tally(&Vec::new()), Tally::default());
    }
}
