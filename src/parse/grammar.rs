use winnow::combinator::{not, repeat, separated};
use winnow::error::ModalResult;
use winnow::prelude::*;
use winnow::token::any;

/// Separates path segments and the trailing operator in a lookup key.
pub(crate) const SEPARATOR: &str = "__";

// -- Segments ---------------------------------------------------------------

/// Any run of characters that does not contain the separator. May be empty,
/// so `"a__"` yields a trailing empty segment.
fn segment<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    let start = *input;
    let _: () = repeat(0.., (not(SEPARATOR), any)).parse_next(input)?;
    Ok(&start[..start.len() - input.len()])
}

// -- Lookup key -------------------------------------------------------------

pub(crate) fn lookup_key<'i>(input: &mut &'i str) -> ModalResult<Vec<&'i str>> {
    separated(1.., segment, SEPARATOR).parse_next(input)
}
