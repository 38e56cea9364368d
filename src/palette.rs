// Named colors and the default series cycle

use plotters::style::RGBColor;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A color as the user wrote it: a name, or an index into [`NAMED_COLORS`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColorSpec {
    Index(u8),
    Named(String),
}

impl fmt::Display for ColorSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorSpec::Index(i) => write!(f, "{i}"),
            ColorSpec::Named(name) => f.write_str(name),
        }
    }
}

/// Every color name the renderer accepts, in index order
pub const NAMED_COLORS: &[(&str, RGBColor)] = &[
    ("blue", RGBColor(31, 119, 180)),
    ("red", RGBColor(214, 39, 40)),
    ("green", RGBColor(44, 160, 44)),
    ("yellow", RGBColor(188, 189, 34)),
    ("magenta", RGBColor(227, 119, 194)),
    ("cyan", RGBColor(23, 190, 207)),
    ("orange", RGBColor(255, 127, 14)),
    ("purple", RGBColor(148, 103, 189)),
    ("brown", RGBColor(140, 86, 75)),
    ("gray", RGBColor(127, 127, 127)),
    ("black", RGBColor(0, 0, 0)),
    ("white", RGBColor(255, 255, 255)),
];

/// Series without an explicit color cycle through these
const SERIES_CYCLE: &[&str] = &[
    "blue", "red", "green", "orange", "purple", "cyan", "magenta", "brown", "yellow", "gray",
];

/// Look up a color by name (case-insensitive)
pub fn named(name: &str) -> Option<RGBColor> {
    NAMED_COLORS
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(name))
        .map(|&(_, c)| c)
}

/// Resolve a user color, falling back to the series cycle
pub fn resolve(spec: Option<&ColorSpec>, series_index: usize) -> RGBColor {
    match spec {
        Some(ColorSpec::Named(name)) => named(name).unwrap_or_else(|| {
            log::warn!("unknown color '{}', using the default", name);
            cycle(series_index)
        }),
        Some(ColorSpec::Index(i)) => NAMED_COLORS[*i as usize % NAMED_COLORS.len()].1,
        None => cycle(series_index),
    }
}

/// Default color of the n-th series
pub fn cycle(series_index: usize) -> RGBColor {
    let name = SERIES_CYCLE[series_index % SERIES_CYCLE.len()];
    named(name).unwrap_or(RGBColor(0, 0, 0))
}

/// Color of the n-th series on a shared canvas. The primary series takes
/// the user color; the others walk the cycle, skipping that color.
pub fn series_color(primary: Option<&ColorSpec>, series_index: usize) -> RGBColor {
    let first = resolve(primary, 0);
    if series_index == 0 {
        return first;
    }
    (0..)
        .map(cycle)
        .filter(|c| *c != first)
        .nth(series_index - 1)
        .unwrap_or(first)
}

/// Lines printed by the `colors` command
pub fn color_listing(names_only: bool) -> Vec<String> {
    NAMED_COLORS
        .iter()
        .enumerate()
        .map(|(i, (name, RGBColor(r, g, b)))| {
            if names_only {
                name.to_string()
            } else {
                format!("{:>2}  {:<8} #{:02x}{:02x}{:02x}", i, name, r, g, b)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_lookup_ignores_case() {
        assert_eq!(named("Red"), Some(RGBColor(214, 39, 40)));
        assert_eq!(named("chartreuse"), None);
    }

    #[test]
    fn test_resolve_index_wraps() {
        let first = resolve(Some(&ColorSpec::Index(0)), 3);
        let wrapped = resolve(Some(&ColorSpec::Index(NAMED_COLORS.len() as u8)), 3);
        assert_eq!(first, wrapped);
    }

    #[test]
    fn test_resolve_defaults_to_cycle() {
        assert_eq!(resolve(None, 1), named("red").unwrap());
        assert_eq!(resolve(Some(&ColorSpec::Named("nope".into())), 0), cycle(0));
    }

    #[test]
    fn test_series_color_skips_user_color() {
        let red = named("red").unwrap();
        let spec = ColorSpec::Named("red".into());
        assert_eq!(series_color(Some(&spec), 0), red);
        for i in 1..12 {
            assert_ne!(series_color(Some(&spec), i), red);
        }
        assert_eq!(series_color(Some(&spec), 1), named("blue").unwrap());
        assert_eq!(series_color(Some(&spec), 2), named("green").unwrap());
    }

    #[test]
    fn test_series_color_without_user_color() {
        for i in 0..SERIES_CYCLE.len() {
            assert_eq!(series_color(None, i), cycle(i));
        }
    }

    #[test]
    fn test_color_listing() {
        let names = color_listing(true);
        assert_eq!(names.len(), NAMED_COLORS.len());
        assert_eq!(names[0], "blue");
        assert_eq!(color_listing(false)[1], " 1  red      #d62728");
    }
}
