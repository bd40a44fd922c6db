//! Parse tree for host source with embedded MVL views.
//!
//! One type per grammar rule. Every node keeps enough of the consumed input
//! that writing it back with `Display` reproduces the source exactly; the
//! generator relies on this for everything that is not a view.

use std::fmt;

// ---------------------------------------------------------------------------
// Host expressions
// ---------------------------------------------------------------------------

/// A run of host source: everything between two delimiters, or a whole file.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Expression {
    pub segments: Vec<Segment>,
}

/// One piece of an expression, in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Passthrough text: `//` and `/* */` comments, regex literals, a lone
    /// `/` or `<`, or a run of ordinary characters.
    Raw(String),

    /// A `#...#` source comment.
    Comment(Comment),

    /// An identifier, string, or bracketed sub-expression.
    Value(Value),

    /// `<name*>`
    Node(Node),

    /// `<name data/>` or `<name key=value/>`
    NodeData(NodeData),

    /// `<name key=value>children</name>`
    NodeDataChildren(NodeDataChildren),
}

/// A `#...#` comment. The body keeps escapes (`\#`) as written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub body: String,
}

/// The generic value form used for names, attribute keys and values, and
/// bare host tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// A run of `[$\w.]` characters: `div`, `test.Component`, `$x`.
    Identifier(String),

    /// A `"`, `'`, or backtick string. The body keeps escapes as written.
    Quoted { quote: char, body: String },

    /// A parenthesized, bracketed, or braced expression.
    Group {
        delimiter: Delimiter,
        inner: Expression,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    Paren,
    Bracket,
    Brace,
}

impl Delimiter {
    pub fn open(self) -> char {
        match self {
            Delimiter::Paren => '(',
            Delimiter::Bracket => '[',
            Delimiter::Brace => '{',
        }
    }

    pub fn close(self) -> char {
        match self {
            Delimiter::Paren => ')',
            Delimiter::Bracket => ']',
            Delimiter::Brace => '}',
        }
    }
}

impl Value {
    /// The identifier text, if this value is a bare identifier.
    pub fn as_identifier(&self) -> Option<&str> {
        match self {
            Value::Identifier(name) => Some(name),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Views
// ---------------------------------------------------------------------------

/// Whitespace and `#...#` comments between the parts of a view.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Separator {
    pub items: Vec<Trivia>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trivia {
    /// A space, tab, or newline.
    Whitespace(char),
    Comment(Comment),
}

impl Separator {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// `key=value` pairs, each followed by its separator.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Attributes {
    pub entries: Vec<Attribute>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub key: Value,
    pub value: Value,
    pub separator: Separator,
}

impl Attributes {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A bare node reference: `<name*>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub leading: Separator,
    pub name: Value,
    pub trailing: Separator,
}

/// A node with data and no children: `<name (data)/>` or `<name a=b/>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeData {
    pub leading: Separator,
    pub name: Value,
    pub trailing: Separator,
    pub data: NodeDataPayload,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeDataPayload {
    /// A single value passed as the whole data argument.
    Value(Value),
    Attributes(Attributes),
}

/// A full node: `<name a=b>children</name>`.
///
/// `closing` is the text between `</` and `>`. It is never checked against
/// the opening name and may be empty (`</>`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeDataChildren {
    pub leading: Separator,
    pub name: Value,
    pub trailing: Separator,
    pub attributes: Attributes,
    pub children: Vec<Child>,
    pub closing: String,
}

/// Any of the three node forms. They share the `<name` prefix and differ in
/// how they end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    Node(Node),
    NodeData(NodeData),
    NodeDataChildren(NodeDataChildren),
}

impl From<View> for Segment {
    fn from(view: View) -> Self {
        match view {
            View::Node(node) => Segment::Node(node),
            View::NodeData(node) => Segment::NodeData(node),
            View::NodeDataChildren(node) => Segment::NodeDataChildren(node),
        }
    }
}

impl From<View> for Child {
    fn from(view: View) -> Self {
        match view {
            View::Node(node) => Child::Node(node),
            View::NodeData(node) => Child::NodeData(node),
            View::NodeDataChildren(node) => Child::NodeDataChildren(node),
        }
    }
}

/// Content between an opening and a closing tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Child {
    Node(Node),
    NodeData(NodeData),
    NodeDataChildren(NodeDataChildren),
    Text(Text),
    Interpolation(Interpolation),
}

/// Literal text inside a node. Backslash escapes are kept as pairs so they
/// can be written back unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Text {
    pub pieces: Vec<TextPiece>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextPiece {
    Char(char),
    /// A backslash followed by this character.
    Escaped(char),
}

impl Text {
    /// Whether the text is made only of unescaped whitespace.
    pub fn is_whitespace(&self) -> bool {
        self.pieces
            .iter()
            .all(|piece| matches!(piece, TextPiece::Char(c) if c.is_whitespace()))
    }
}

/// `{expression}` inside a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interpolation {
    pub expression: Expression,
}

// ---------------------------------------------------------------------------
// Source reconstruction
// ---------------------------------------------------------------------------

impl Expression {
    /// The exact source text this expression was parsed from.
    pub fn to_source(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.segments.iter().try_for_each(|segment| fmt::Display::fmt(segment, f))
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Raw(raw) => f.write_str(raw),
            Segment::Comment(comment) => fmt::Display::fmt(comment, f),
            Segment::Value(value) => fmt::Display::fmt(value, f),
            Segment::Node(node) => fmt::Display::fmt(node, f),
            Segment::NodeData(node) => fmt::Display::fmt(node, f),
            Segment::NodeDataChildren(node) => fmt::Display::fmt(node, f),
        }
    }
}

impl fmt::Display for Comment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}#", self.body)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Identifier(name) => f.write_str(name),
            Value::Quoted { quote, body } => write!(f, "{quote}{body}{quote}"),
            Value::Group { delimiter, inner } => {
                write!(f, "{}{inner}{}", delimiter.open(), delimiter.close())
            }
        }
    }
}

impl fmt::Display for Separator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for item in &self.items {
            match item {
                Trivia::Whitespace(c) => write!(f, "{c}")?,
                Trivia::Comment(comment) => fmt::Display::fmt(comment, f)?,
            }
        }
        Ok(())
    }
}

impl fmt::Display for Attributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            write!(f, "{}={}{}", entry.key, entry.value, entry.separator)?;
        }
        Ok(())
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}{}{}*>", self.leading, self.name, self.trailing)
    }
}

impl fmt::Display for NodeData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}{}{}", self.leading, self.name, self.trailing)?;
        match &self.data {
            NodeDataPayload::Value(value) => fmt::Display::fmt(value, f)?,
            NodeDataPayload::Attributes(attributes) => fmt::Display::fmt(attributes, f)?,
        }
        f.write_str("/>")
    }
}

impl fmt::Display for NodeDataChildren {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<{}{}{}{}>",
            self.leading, self.name, self.trailing, self.attributes
        )?;
        for child in &self.children {
            fmt::Display::fmt(child, f)?;
        }
        write!(f, "</{}>", self.closing)
    }
}

impl fmt::Display for Child {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Child::Node(node) => fmt::Display::fmt(node, f),
            Child::NodeData(node) => fmt::Display::fmt(node, f),
            Child::NodeDataChildren(node) => fmt::Display::fmt(node, f),
            Child::Text(text) => fmt::Display::fmt(text, f),
            Child::Interpolation(interpolation) => {
                write!(f, "{{{}}}", interpolation.expression)
            }
        }
    }
}

impl fmt::Display for Text {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for piece in &self.pieces {
            match piece {
                TextPiece::Char(c) => write!(f, "{c}")?,
                TextPiece::Escaped(c) => write!(f, "\\{c}")?,
            }
        }
        Ok(())
    }
}
