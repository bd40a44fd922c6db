//! JavaScript code generator.
//!
//! Walks the parse tree and writes it back out. Host source is copied
//! verbatim; view nodes become calls into the component registry:
//!
//! ```text
//! <div*>                  → Moon.view.components.div
//! <div/>                  → Moon.view.components.div({})
//! <p class='x'>hi</p>     → Moon.view.components.p ({"class":'x',children:[...]})
//! ```
//!
//! Separators written around names and attributes are re-emitted in place,
//! with `#...#` comments turned into `/*...*/`, so the output keeps the
//! source's layout.

use crate::escape;
use crate::GeneratorOptions;
use mvl_parser::ast::{
    Attributes, Child, Comment, Expression, Interpolation, Node, NodeData, NodeDataChildren,
    NodeDataPayload, Segment, Separator, Text, Trivia, Value,
};
use tracing::trace;

/// The reserved registry component that renders text.
pub const TEXT_COMPONENT: &str = "text";

/// Serializes a parse tree into JavaScript.
pub struct Generator<'a> {
    options: &'a GeneratorOptions,
}

impl<'a> Generator<'a> {
    pub fn new(options: &'a GeneratorOptions) -> Self {
        Self { options }
    }

    /// Generate code for a whole expression.
    pub fn generate(&self, expression: &Expression) -> String {
        let mut out = String::new();
        self.expression(expression, &mut out);
        out
    }

    fn expression(&self, expression: &Expression, out: &mut String) {
        for segment in &expression.segments {
            match segment {
                Segment::Raw(raw) => out.push_str(raw),
                Segment::Comment(comment) => self.comment(comment, out),
                Segment::Value(value) => self.value(value, out),
                Segment::Node(node) => self.node(node, out),
                Segment::NodeData(node) => self.node_data(node, out),
                Segment::NodeDataChildren(node) => self.node_data_children(node, out),
            }
        }
    }

    fn comment(&self, comment: &Comment, out: &mut String) {
        out.push_str("/*");
        out.push_str(&comment.body);
        out.push_str("*/");
    }

    fn value(&self, value: &Value, out: &mut String) {
        match value {
            Value::Identifier(name) => out.push_str(name),
            Value::Quoted { quote, body } => {
                out.push(*quote);
                out.push_str(body);
                out.push(*quote);
            }
            Value::Group { delimiter, inner } => {
                out.push(delimiter.open());
                self.expression(inner, out);
                out.push(delimiter.close());
            }
        }
    }

    fn separator(&self, separator: &Separator, out: &mut String) {
        for item in &separator.items {
            match item {
                Trivia::Whitespace(c) => out.push(*c),
                Trivia::Comment(comment) => self.comment(comment, out),
            }
        }
    }

    // =========================================================================
    // Views
    // =========================================================================

    /// Write a node name. Lowercase identifiers resolve into the registry;
    /// component identifiers, strings, and expressions are used as written.
    fn name(&self, name: &Value, out: &mut String) {
        match name.as_identifier() {
            Some(identifier) if is_registry_name(identifier) => {
                self.registry_reference(identifier, out);
            }
            _ => self.value(name, out),
        }
    }

    fn registry_reference(&self, name: &str, out: &mut String) {
        out.push_str(&self.options.registry);
        out.push('.');
        out.push_str(name);
    }

    /// `<name*>` is a reference only. Surrounding code decides whether and
    /// how to call it.
    fn node(&self, node: &Node, out: &mut String) {
        trace!(name = %node.name, "generating node reference");
        self.separator(&node.leading, out);
        self.name(&node.name, out);
        self.separator(&node.trailing, out);
    }

    fn node_data(&self, node: &NodeData, out: &mut String) {
        trace!(name = %node.name, "generating node with data");
        self.separator(&node.leading, out);
        self.name(&node.name, out);
        self.separator(&node.trailing, out);
        out.push('(');
        match &node.data {
            NodeDataPayload::Value(value) => self.value(value, out),
            NodeDataPayload::Attributes(attributes) => {
                out.push('{');
                self.attributes(attributes, out);
                out.push('}');
            }
        }
        out.push(')');
    }

    fn node_data_children(&self, node: &NodeDataChildren, out: &mut String) {
        trace!(
            name = %node.name,
            children = node.children.len(),
            "generating node with children"
        );
        self.separator(&node.leading, out);
        self.name(&node.name, out);
        self.separator(&node.trailing, out);
        out.push_str("({");
        self.attributes(&node.attributes, out);
        if !node.children.is_empty() {
            if !node.attributes.is_empty() {
                out.push(',');
            }
            out.push_str("children:[");
            self.children(&node.children, out);
            out.push(']');
        }
        out.push_str("})");
    }

    /// Object literal entries: `key:value` plus the separator that followed
    /// the attribute in the source, joined with commas.
    fn attributes(&self, attributes: &Attributes, out: &mut String) {
        for (i, entry) in attributes.entries.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            self.key(&entry.key, out);
            out.push(':');
            self.value(&entry.value, out);
            self.separator(&entry.separator, out);
        }
    }

    fn key(&self, key: &Value, out: &mut String) {
        match key {
            Value::Identifier(name) => {
                out.push('"');
                out.push_str(name);
                out.push('"');
            }
            Value::Quoted {
                quote: '"' | '\'', ..
            } => self.value(key, out),
            _ => {
                out.push('[');
                self.value(key, out);
                out.push(']');
            }
        }
    }

    /// Whitespace-only text between children is layout, not content: it is
    /// written as-is and the comma goes next to the following child.
    fn children(&self, children: &[Child], out: &mut String) {
        let mut first = true;
        for child in children {
            if let Child::Text(text) = child {
                if text.is_whitespace() {
                    out.push_str(&text.to_string());
                    continue;
                }
            }

            if !first {
                out.push(',');
            }
            first = false;

            match child {
                Child::Node(node) => self.node(node, out),
                Child::NodeData(node) => self.node_data(node, out),
                Child::NodeDataChildren(node) => self.node_data_children(node, out),
                Child::Text(text) => self.text(text, out),
                Child::Interpolation(interpolation) => self.interpolation(interpolation, out),
            }
        }
    }

    fn text(&self, text: &Text, out: &mut String) {
        self.registry_reference(TEXT_COMPONENT, out);
        out.push_str("({data:\"");
        escape::string_body(text, out);
        out.push_str("\"})");
    }

    fn interpolation(&self, interpolation: &Interpolation, out: &mut String) {
        self.registry_reference(TEXT_COMPONENT, out);
        out.push_str("({data:");
        self.expression(&interpolation.expression, out);
        out.push_str("})");
    }
}

/// Whether an identifier names a registry component (`div`, `text`) rather
/// than a value in scope (`Component`, `ui.Button`).
pub fn is_registry_name(name: &str) -> bool {
    name.starts_with(|c: char| c.is_ascii_lowercase()) && !name.contains('.')
}
