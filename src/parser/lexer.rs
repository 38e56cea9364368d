// Shared lexical helpers for option value grammars

use nom::{
    character::complete::{alpha1, multispace0},
    combinator::{map, recognize},
    number::complete::double,
    sequence::delimited,
    IResult,
};

/// Wrap a parser so it skips surrounding whitespace
pub fn ws<'a, F, O>(inner: F) -> impl FnMut(&'a str) -> IResult<&'a str, O>
where
    F: FnMut(&'a str) -> IResult<&'a str, O>,
{
    delimited(multispace0, inner, multispace0)
}

/// A floating point literal (`1`, `-2.5`, `3e-2`)
pub fn number_literal(input: &str) -> IResult<&str, f64> {
    double(input)
}

/// An alphabetic word
pub fn word(input: &str) -> IResult<&str, String> {
    map(recognize(alpha1), |s: &str| s.to_string())(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_literal() {
        assert_eq!(number_literal("-2.5,").unwrap(), (",", -2.5));
        assert_eq!(number_literal("1e3").unwrap(), ("", 1000.0));
        assert!(number_literal("abc").is_err());
    }

    #[test]
    fn test_ws() {
        assert_eq!(ws(number_literal)("  4  x").unwrap(), ("x", 4.0));
    }

    #[test]
    fn test_word() {
        assert_eq!(word("red)").unwrap(), (")", "red".to_string()));
    }
}
