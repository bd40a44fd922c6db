//! Parsers built from other parsers.
//!
//! `or` and `alternates` are the only places failures are compared: when
//! every branch fails they report the one that reached furthest into the
//! input, since a later failure means a longer correct partial match.

use crate::{Failure, ParseResult, Parser};

/// Ordered choice between two parsers of the same output type.
pub fn or<O>(first: impl Parser<O>, second: impl Parser<O>) -> impl Parser<O> {
    move |input: &[char], index: usize| match first.parse(input, index) {
        Ok(success) => Ok(success),
        Err(first_failure) => match second.parse(input, index) {
            Ok(success) => Ok(success),
            Err(second_failure) => Err(first_failure.furthest(second_failure)),
        },
    }
}

/// Run two parsers in sequence, producing both values.
pub fn and<A, B>(first: impl Parser<A>, second: impl Parser<B>) -> impl Parser<(A, B)> {
    move |input: &[char], index: usize| {
        let (a, index) = first.parse(input, index)?;
        let (b, index) = second.parse(input, index)?;
        Ok(((a, b), index))
    }
}

/// Run a tuple of parsers in sequence, producing a tuple of their values.
pub fn sequence<O, S: Sequence<O>>(parsers: S) -> impl Parser<O> {
    move |input: &[char], index: usize| parsers.parse_sequence(input, index)
}

/// Try a tuple of parsers in order, returning the first success.
pub fn alternates<O, A: Alternates<O>>(parsers: A) -> impl Parser<O> {
    move |input: &[char], index: usize| parsers.parse_alternates(input, index)
}

/// Zero or more repetitions. Never fails.
pub fn many<O>(parser: impl Parser<O>) -> impl Parser<Vec<O>> {
    move |input: &[char], index: usize| Ok(repeat(&parser, input, index, Vec::new()))
}

/// One or more repetitions. Fails with the first attempt's failure.
pub fn many1<O>(parser: impl Parser<O>) -> impl Parser<Vec<O>> {
    move |input: &[char], index: usize| {
        let (first, index) = parser.parse(input, index)?;
        Ok(repeat(&parser, input, index, vec![first]))
    }
}

/// Transform a success value, passing failures through unchanged.
///
/// Grammar rules use this to wrap their output in the rule's node type.
pub fn map<A, B>(parser: impl Parser<A>, transform: impl Fn(A) -> B) -> impl Parser<B> {
    move |input: &[char], index: usize| {
        let (value, next) = parser.parse(input, index)?;
        Ok((transform(value), next))
    }
}

/// Run a parser and return exactly the characters it consumed.
pub fn recognize<O>(parser: impl Parser<O>) -> impl Parser<String> {
    move |input: &[char], index: usize| {
        let (_, next) = parser.parse(input, index)?;
        Ok((input[index..next].iter().collect(), next))
    }
}

fn repeat<O>(
    parser: &impl Parser<O>,
    input: &[char],
    mut index: usize,
    mut values: Vec<O>,
) -> (Vec<O>, usize) {
    while let Ok((value, next)) = parser.parse(input, index) {
        values.push(value);
        // A parser that succeeds without consuming would repeat forever.
        if next == index {
            break;
        }
        index = next;
    }
    (values, index)
}

/// A tuple of parsers run one after another.
pub trait Sequence<O> {
    fn parse_sequence(&self, input: &[char], index: usize) -> ParseResult<O>;
}

/// A tuple of parsers with a common output type, tried in order.
pub trait Alternates<O> {
    fn parse_alternates(&self, input: &[char], index: usize) -> ParseResult<O>;
}

macro_rules! impl_sequence {
    ($($parser:ident $output:ident $value:ident),+) => {
        impl<$($parser, $output),+> Sequence<($($output,)+)> for ($($parser,)+)
        where
            $($parser: Parser<$output>),+
        {
            fn parse_sequence(
                &self,
                input: &[char],
                index: usize,
            ) -> ParseResult<($($output,)+)> {
                let ($($value,)+) = self;
                $(
                    let ($value, index) = $value.parse(input, index)?;
                )+
                Ok((($($value,)+), index))
            }
        }
    };
}

macro_rules! impl_alternates {
    ($($parser:ident $value:ident),+) => {
        impl<O, $($parser),+> Alternates<O> for ($($parser,)+)
        where
            $($parser: Parser<O>),+
        {
            fn parse_alternates(&self, input: &[char], index: usize) -> ParseResult<O> {
                let ($($value,)+) = self;
                let mut furthest: Option<Failure> = None;
                $(
                    match $value.parse(input, index) {
                        Ok(success) => return Ok(success),
                        Err(failure) => {
                            if furthest.as_ref().map_or(true, |f| failure.index > f.index) {
                                furthest = Some(failure);
                            }
                        }
                    }
                )+
                Err(furthest.unwrap_or_else(|| Failure::new("alternates", index)))
            }
        }
    };
}

impl_sequence!(P1 O1 p1, P2 O2 p2);
impl_sequence!(P1 O1 p1, P2 O2 p2, P3 O3 p3);
impl_sequence!(P1 O1 p1, P2 O2 p2, P3 O3 p3, P4 O4 p4);
impl_sequence!(P1 O1 p1, P2 O2 p2, P3 O3 p3, P4 O4 p4, P5 O5 p5);
impl_sequence!(P1 O1 p1, P2 O2 p2, P3 O3 p3, P4 O4 p4, P5 O5 p5, P6 O6 p6);
impl_sequence!(P1 O1 p1, P2 O2 p2, P3 O3 p3, P4 O4 p4, P5 O5 p5, P6 O6 p6, P7 O7 p7);
impl_sequence!(P1 O1 p1, P2 O2 p2, P3 O3 p3, P4 O4 p4, P5 O5 p5, P6 O6 p6, P7 O7 p7, P8 O8 p8);
impl_sequence!(
    P1 O1 p1, P2 O2 p2, P3 O3 p3, P4 O4 p4, P5 O5 p5, P6 O6 p6, P7 O7 p7, P8 O8 p8, P9 O9 p9
);
impl_sequence!(
    P1 O1 p1, P2 O2 p2, P3 O3 p3, P4 O4 p4, P5 O5 p5, P6 O6 p6, P7 O7 p7, P8 O8 p8, P9 O9 p9,
    P10 O10 p10
);

impl_alternates!(P1 p1, P2 p2);
impl_alternates!(P1 p1, P2 p2, P3 p3);
impl_alternates!(P1 p1, P2 p2, P3 p3, P4 p4);
impl_alternates!(P1 p1, P2 p2, P3 p3, P4 p4, P5 p5);
impl_alternates!(P1 p1, P2 p2, P3 p3, P4 p4, P5 p5, P6 p6);
impl_alternates!(P1 p1, P2 p2, P3 p3, P4 p4, P5 p5, P6 p6, P7 p7);
impl_alternates!(P1 p1, P2 p2, P3 p3, P4 p4, P5 p5, P6 p6, P7 p7, P8 p8);
impl_alternates!(P1 p1, P2 p2, P3 p3, P4 p4, P5 p5, P6 p6, P7 p7, P8 p8, P9 p9);
impl_alternates!(P1 p1, P2 p2, P3 p3, P4 p4, P5 p5, P6 p6, P7 p7, P8 p8, P9 p9, P10 p10);
impl_alternates!(
    P1 p1, P2 p2, P3 p3, P4 p4, P5 p5, P6 p6, P7 p7, P8 p8, P9 p9, P10 p10, P11 p11
);
impl_alternates!(
    P1 p1, P2 p2, P3 p3, P4 p4, P5 p5, P6 p6, P7 p7, P8 p8, P9 p9, P10 p10, P11 p11, P12 p12
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{any, character, eof, not, string};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn chars(source: &str) -> Vec<char> {
        source.chars().collect()
    }

    /// Fails at `index + offset` after consuming `offset` characters.
    fn fails_after(offset: usize) -> impl Parser<char> {
        move |_: &[char], index: usize| -> ParseResult<char> {
            Err(Failure::new(format!("fail+{offset}"), index + offset))
        }
    }

    // =========================================================================
    // or
    // =========================================================================

    #[test]
    fn test_or_first_success_wins() {
        let input = chars("ab");
        let parser = or(character('a'), any);
        assert_eq!(parser.parse(&input, 0), Ok(('a', 1)));
    }

    #[test]
    fn test_or_falls_back() {
        let input = chars("b");
        let parser = or(character('a'), character('b'));
        assert_eq!(parser.parse(&input, 0), Ok(('b', 1)));
    }

    #[test]
    fn test_or_reports_furthest_failure() {
        let input = chars("abc");
        assert_eq!(
            or(fails_after(2), fails_after(1)).parse(&input, 0),
            Err(Failure::new("fail+2", 2))
        );
        assert_eq!(
            or(fails_after(1), fails_after(2)).parse(&input, 0),
            Err(Failure::new("fail+2", 2))
        );
    }

    #[test]
    fn test_or_tie_reports_second() {
        let input = chars("x");
        assert_eq!(
            or(character('a'), character('b')).parse(&input, 0),
            Err(Failure::new("\"b\"", 0))
        );
    }

    // =========================================================================
    // and / sequence
    // =========================================================================

    #[test]
    fn test_and_pairs_values() {
        let input = chars("\\#");
        assert_eq!(
            and(character('\\'), any).parse(&input, 0),
            Ok((('\\', '#'), 2))
        );
    }

    #[test]
    fn test_and_short_circuits() {
        let input = chars("ab");
        assert_eq!(
            and(character('x'), fails_after(5)).parse(&input, 0),
            Err(Failure::new("\"x\"", 0))
        );
    }

    #[test]
    fn test_sequence_threads_index() {
        let input = chars("</div>");
        let parser = sequence((string("</"), many(not(&[">"])), character('>')));
        assert_eq!(
            parser.parse(&input, 0),
            Ok((("</", vec!['d', 'i', 'v'], '>'), 6))
        );
    }

    #[test]
    fn test_sequence_returns_first_failure_verbatim() {
        let input = chars("<a");
        let parser = sequence((character('<'), character('a'), string("*>")));
        assert_eq!(parser.parse(&input, 0), Err(Failure::new("\"*>\"", 2)));
    }

    // =========================================================================
    // alternates
    // =========================================================================

    #[test]
    fn test_alternates_first_success() {
        let input = chars("b");
        let parser = alternates((character('a'), character('b'), any));
        assert_eq!(parser.parse(&input, 0), Ok(('b', 1)));
    }

    #[test]
    fn test_alternates_reports_greatest_index() {
        let input = chars("abcdef");
        let parser = alternates((fails_after(1), fails_after(4), fails_after(2)));
        assert_eq!(parser.parse(&input, 0), Err(Failure::new("fail+4", 4)));
    }

    #[test]
    fn test_alternates_tie_keeps_earliest() {
        let input = chars("z");
        let parser = alternates((character('a'), character('b'), character('c')));
        assert_eq!(parser.parse(&input, 0), Err(Failure::new("\"a\"", 0)));
    }

    // =========================================================================
    // many / many1
    // =========================================================================

    #[test]
    fn test_many_zero_matches() {
        let input = chars("abc");
        assert_eq!(many(character('x')).parse(&input, 0), Ok((vec![], 0)));
    }

    #[test]
    fn test_many_stops_at_first_failure() {
        let input = chars("aab");
        assert_eq!(
            many(character('a')).parse(&input, 0),
            Ok((vec!['a', 'a'], 2))
        );
    }

    #[test]
    fn test_many_stops_without_progress() {
        let input = chars("abc");
        let parser = many(recognize(many(character('x'))));
        assert_eq!(parser.parse(&input, 0), Ok((vec![String::new()], 0)));
    }

    #[test]
    fn test_many1_fails_with_first_failure() {
        let input = chars("b");
        assert_eq!(
            many1(character('a')).parse(&input, 0),
            Err(Failure::new("\"a\"", 0))
        );
    }

    // =========================================================================
    // map / recognize
    // =========================================================================

    #[test]
    fn test_map_wraps_value() {
        let input = chars("a");
        assert_eq!(
            map(character('a'), |c| c.to_ascii_uppercase()).parse(&input, 0),
            Ok(('A', 1))
        );
    }

    #[test]
    fn test_map_passes_failure_through() {
        let input = chars("b");
        assert_eq!(
            map(character('a'), |c| c.to_string()).parse(&input, 0),
            Err(Failure::new("\"a\"", 0))
        );
    }

    #[test]
    fn test_recognize_returns_consumed_text() {
        let input = chars("// note\nx");
        let parser = recognize(and(string("//"), many(not(&["\n"]))));
        assert_eq!(parser.parse(&input, 0), Ok(("// note".to_string(), 7)));
    }

    #[test]
    fn test_recognize_then_eof() {
        let input = chars("abc");
        let parser = and(recognize(many(any)), eof);
        assert_eq!(parser.parse(&input, 0), Ok((("abc".to_string(), ()), 3)));
    }

    // =========================================================================
    // Laws
    // =========================================================================

    proptest! {
        #[test]
        fn prop_many_never_fails(source in "[ab]{0,12}", start in 0usize..13) {
            let input = chars(&source);
            let start = start.min(input.len());
            let (values, end) = many(character('a')).parse(&input, start).unwrap();
            prop_assert_eq!(end, start + values.len());
        }

        #[test]
        fn prop_many1_fails_iff_first_fails(source in "[ab]{0,12}") {
            let input = chars(&source);
            let first = character('a').parse(&input, 0);
            let repeated = many1(character('a')).parse(&input, 0);
            match first {
                Ok(_) => prop_assert!(repeated.is_ok()),
                Err(failure) => prop_assert_eq!(repeated, Err(failure)),
            }
        }

        #[test]
        fn prop_alternates_reports_furthest(i in 0usize..8, j in 0usize..8) {
            let input = chars("abcdefgh");
            let result = alternates((fails_after(i), fails_after(j))).parse(&input, 0);
            prop_assert_eq!(result.unwrap_err().index, i.max(j));
        }
    }
}
