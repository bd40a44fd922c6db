//! MVL grammar.
//!
//! Rules are plain functions so they can refer to each other recursively:
//! `expression` contains values, values contain bracketed expressions, and
//! view nodes contain both. Each rule builds its combinator on entry and runs
//! it at the given index.
//!
//! Ordering inside `expression` carries the lexical disambiguation. Host
//! tokens that may contain `<` (comments, regex literals, strings) are tried
//! before views, and views before the single-character `/` and `<` fallbacks,
//! so a failed regex or view attempt is read as an operator instead of
//! getting the parser stuck.
//!
//! No rule can succeed on empty input and then recurse into itself, so the
//! parser needs no memoization. Recursion depth is bounded by [`MAX_DEPTH`]:
//! a source that nests groups, interpolations, or child lists deeper than
//! that is rejected instead of exhausting the stack.

use crate::ast::{
    Attribute, Attributes, Child, Comment, Delimiter, Expression, Interpolation, Node, NodeData,
    NodeDataChildren, NodeDataPayload, Segment, Separator, Text, TextPiece, Trivia, Value, View,
};
use mvl_combinator::{
    alternates, and, any, character, eof, many, many1, map, not, or, recognize, regex, sequence,
    string, Failure, ParseResult, Parser,
};
use ::regex::Regex;
use std::cell::Cell;
use std::sync::LazyLock;

static IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[$0-9A-Za-z_.]$").expect("identifier pattern compiles"));

/// Characters that end a generic run of host text. Each one either starts a
/// token with its own rule or closes an enclosing group.
const RUN_DELIMITERS: &[&str] = &[
    "/", "#", "\"", "'", "`", "(", ")", "[", "]", "{", "}", "<",
];

/// Deepest nesting of groups, interpolations, and child lists a source may use.
pub const MAX_DEPTH: usize = 64;

thread_local! {
    static DEPTH: Cell<usize> = const { Cell::new(0) };
    static TOO_DEEP: Cell<Option<usize>> = const { Cell::new(None) };
}

/// One level of nesting, released on drop.
struct DepthGuard;

impl DepthGuard {
    /// Enter one level deeper, or record the index and refuse past `MAX_DEPTH`.
    fn enter(index: usize) -> Option<Self> {
        let depth = DEPTH.with(|depth| {
            let next = depth.get() + 1;
            depth.set(next);
            next
        });
        let guard = DepthGuard;
        if depth > MAX_DEPTH {
            TOO_DEEP.with(|at| {
                if at.get().is_none() {
                    at.set(Some(index));
                }
            });
            return None;
        }
        Some(guard)
    }
}

impl Drop for DepthGuard {
    fn drop(&mut self) {
        DEPTH.with(|depth| depth.set(depth.get().saturating_sub(1)));
    }
}

fn too_deep(index: usize) -> Failure {
    Failure::new(format!("nesting depth of at most {MAX_DEPTH}"), index)
}

/// Run `parser` one nesting level deeper.
fn nested<O>(parser: impl Parser<O>) -> impl Parser<O> {
    move |input: &[char], index: usize| {
        let Some(_guard) = DepthGuard::enter(index) else {
            return Err(too_deep(index));
        };
        parser.parse(input, index)
    }
}

/// A whole source file: an expression followed by end of input.
///
/// If any attempt went past [`MAX_DEPTH`], the source is rejected at the
/// first index where that happened, even when another reading would parse.
pub fn main(input: &[char], index: usize) -> ParseResult<Expression> {
    DEPTH.with(|depth| depth.set(0));
    TOO_DEEP.with(|at| at.set(None));

    let result = map(and(expression, eof), |(expression, ())| expression).parse(input, index);

    match TOO_DEEP.with(Cell::take) {
        Some(at) => Err(too_deep(at)),
        None => result,
    }
}

/// Host source with embedded views, up to the first character no rule accepts.
pub fn expression(input: &[char], index: usize) -> ParseResult<Expression> {
    map(
        many(alternates((
            map(line_comment, Segment::Raw),
            map(block_comment, Segment::Raw),
            map(regex_literal, Segment::Raw),
            map(comment, Segment::Comment),
            map(value, Segment::Value),
            map(view, Segment::from),
            map(recognize(character('/')), Segment::Raw),
            map(recognize(character('<')), Segment::Raw),
            map(recognize(many1(not(RUN_DELIMITERS))), Segment::Raw),
        ))),
        |segments| Expression { segments },
    )
    .parse(input, index)
}

fn line_comment(input: &[char], index: usize) -> ParseResult<String> {
    recognize(and(string("//"), many(not(&["\n"])))).parse(input, index)
}

fn block_comment(input: &[char], index: usize) -> ParseResult<String> {
    recognize(sequence((string("/*"), many(not(&["*/"])), string("*/")))).parse(input, index)
}

/// `/pattern/`. A regex may not span lines, which is what separates it from
/// two division operators.
fn regex_literal(input: &[char], index: usize) -> ParseResult<String> {
    recognize(sequence((
        character('/'),
        many1(or(
            recognize(and(character('\\'), not(&["\n"]))),
            recognize(not(&["/", "\n"])),
        )),
        character('/'),
    )))
    .parse(input, index)
}

/// A backslash escape, or any character that does not start `excluded`.
fn escaped_or_not(excluded: &'static [&'static str]) -> impl Parser<String> {
    or(
        recognize(and(character('\\'), any)),
        recognize(not(excluded)),
    )
}

/// `#...#`, usable where `/* */` belongs to the host language.
pub fn comment(input: &[char], index: usize) -> ParseResult<Comment> {
    map(
        sequence((
            character('#'),
            recognize(many(escaped_or_not(&["#"]))),
            character('#'),
        )),
        |(_, body, _)| Comment { body },
    )
    .parse(input, index)
}

/// Whitespace and comments between the parts of a view.
pub fn separator(input: &[char], index: usize) -> ParseResult<Separator> {
    map(
        many(or(
            map(
                alternates((character(' '), character('\t'), character('\n'))),
                Trivia::Whitespace,
            ),
            map(comment, Trivia::Comment),
        )),
        |items| Separator { items },
    )
    .parse(input, index)
}

pub fn value(input: &[char], index: usize) -> ParseResult<Value> {
    alternates((
        map(recognize(many1(regex(&IDENTIFIER))), Value::Identifier),
        quoted('"', &["\""]),
        quoted('\'', &["'"]),
        quoted('`', &["`"]),
        group(Delimiter::Paren),
        group(Delimiter::Bracket),
        group(Delimiter::Brace),
    ))
    .parse(input, index)
}

fn quoted(quote: char, excluded: &'static [&'static str]) -> impl Parser<Value> {
    map(
        sequence((
            character(quote),
            recognize(many(escaped_or_not(excluded))),
            character(quote),
        )),
        move |(_, body, _)| Value::Quoted { quote, body },
    )
}

fn group(delimiter: Delimiter) -> impl Parser<Value> {
    map(
        sequence((
            character(delimiter.open()),
            nested(expression),
            character(delimiter.close()),
        )),
        move |(_, inner, _)| Value::Group { delimiter, inner },
    )
}

pub fn attributes(input: &[char], index: usize) -> ParseResult<Attributes> {
    map(
        many(sequence((value, character('='), value, separator))),
        |entries| Attributes {
            entries: entries
                .into_iter()
                .map(|(key, _, value, separator)| Attribute {
                    key,
                    value,
                    separator,
                })
                .collect(),
        },
    )
    .parse(input, index)
}

pub fn text(input: &[char], index: usize) -> ParseResult<Text> {
    map(
        many1(or(
            map(and(character('\\'), any), |(_, c)| TextPiece::Escaped(c)),
            map(not(&["{", "<"]), TextPiece::Char),
        )),
        |pieces| Text { pieces },
    )
    .parse(input, index)
}

pub fn interpolation(input: &[char], index: usize) -> ParseResult<Interpolation> {
    map(
        sequence((character('{'), nested(expression), character('}'))),
        |(_, expression, _)| Interpolation { expression },
    )
    .parse(input, index)
}

/// `<name*>`, `<name data/>`, `<name key=value/>`, or
/// `<name key=value>children</name>`.
///
/// The `<` separator name separator prefix is read once, then the ending
/// decides the form. The closing name is read but not compared with the
/// opening one.
pub fn view(input: &[char], index: usize) -> ParseResult<View> {
    map(
        and(
            sequence((character('<'), separator, value, separator)),
            alternates((reference_end, data_end, children_end)),
        ),
        |((_, leading, name, trailing), end)| match end {
            ViewEnd::Reference => View::Node(Node {
                leading,
                name,
                trailing,
            }),
            ViewEnd::Data(data) => View::NodeData(NodeData {
                leading,
                name,
                trailing,
                data,
            }),
            ViewEnd::Children {
                attributes,
                children,
                closing,
            } => View::NodeDataChildren(NodeDataChildren {
                leading,
                name,
                trailing,
                attributes,
                children,
                closing,
            }),
        },
    )
    .parse(input, index)
}

/// What follows the name of a view.
enum ViewEnd {
    Reference,
    Data(NodeDataPayload),
    Children {
        attributes: Attributes,
        children: Vec<Child>,
        closing: String,
    },
}

fn reference_end(input: &[char], index: usize) -> ParseResult<ViewEnd> {
    map(string("*>"), |_| ViewEnd::Reference).parse(input, index)
}

fn data_end(input: &[char], index: usize) -> ParseResult<ViewEnd> {
    map(
        or(
            map(and(value, string("/>")), |(value, _)| {
                NodeDataPayload::Value(value)
            }),
            map(and(attributes, string("/>")), |(attributes, _)| {
                NodeDataPayload::Attributes(attributes)
            }),
        ),
        ViewEnd::Data,
    )
    .parse(input, index)
}

fn children_end(input: &[char], index: usize) -> ParseResult<ViewEnd> {
    map(
        sequence((
            attributes,
            character('>'),
            nested(many(alternates((
                map(view, Child::from),
                map(text, Child::Text),
                map(interpolation, Child::Interpolation),
            )))),
            string("</"),
            recognize(many(not(&[">"]))),
            character('>'),
        )),
        |(attributes, _, children, _, closing, _)| ViewEnd::Children {
            attributes,
            children,
            closing,
        },
    )
    .parse(input, index)
}
