// Grammars for structured option values (`--xlim`, `--color`)

use super::lexer::{number_literal, word, ws};
use crate::palette::ColorSpec;
use nom::{
    branch::alt,
    character::complete::{char, u8 as index_literal},
    combinator::{all_consuming, map},
    sequence::separated_pair,
    IResult,
};

/// Axis limits: `LOW,HIGH`
pub fn parse_limits(input: &str) -> IResult<&str, (f64, f64)> {
    all_consuming(separated_pair(
        ws(number_literal),
        char(','),
        ws(number_literal),
    ))(input)
}

/// A color name or a palette index
pub fn parse_color(input: &str) -> IResult<&str, ColorSpec> {
    all_consuming(ws(alt((
        map(index_literal, ColorSpec::Index),
        map(word, ColorSpec::Named),
    ))))(input)
}
