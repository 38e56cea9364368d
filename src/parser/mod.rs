// Option value parsers built on nom

pub mod lexer;
pub mod value;

use crate::palette::ColorSpec;

/// clap value parser for `LOW,HIGH` limits
pub fn limits_arg(input: &str) -> Result<(f64, f64), String> {
    value::parse_limits(input)
        .map(|(_, limits)| limits)
        .map_err(|_| format!("expected LOW,HIGH but got '{}'", input))
}

/// clap value parser for colors
pub fn color_arg(input: &str) -> Result<ColorSpec, String> {
    value::parse_color(input)
        .map(|(_, color)| color)
        .map_err(|_| format!("expected a color name or a palette index 0-255, got '{}'", input))
}
