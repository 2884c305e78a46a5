//! Annotation values and their source text.
//!
//! Annotation arguments form a closed value domain: literals, nested
//! annotations, arrays and opaque expressions. Text is produced by one
//! recursive function over that domain:
//!
//! - `@Name` without arguments;
//! - `@Name(v)` when the only argument is `value`;
//! - `@Name(a = x, b = y)` otherwise, arguments in declaration order;
//! - arrays as `[x, y]`, strings single-quoted, class literals by name.

use indexmap::IndexMap;
use std::sync::Arc;
use tracing::trace;

/// Name of the argument that may be written without `name =`.
pub const VALUE_ARGUMENT: &str = "value";

#[derive(Clone, Debug, PartialEq)]
pub enum AnnotationLiteral {
    String(String),
    Int(i64),
    Bool(bool),
    Double(f64),
    /// Class literal, as written (`String`, `java.util.List`).
    Class(Arc<str>),
}

#[derive(Clone, Debug, PartialEq)]
pub enum AnnotationValue {
    Literal(AnnotationLiteral),
    Nested(Annotation),
    Array(Vec<AnnotationValue>),
    /// Any other expression, kept as source text.
    Expression(String),
}

impl AnnotationValue {
    pub fn string(value: &str) -> Self {
        Self::Literal(AnnotationLiteral::String(value.to_string()))
    }

    pub fn int(value: i64) -> Self {
        Self::Literal(AnnotationLiteral::Int(value))
    }

    pub fn bool(value: bool) -> Self {
        Self::Literal(AnnotationLiteral::Bool(value))
    }

    pub fn class(name: &str) -> Self {
        Self::Literal(AnnotationLiteral::Class(Arc::from(name)))
    }

    pub fn text(&self) -> String {
        let mut out = String::new();
        write_value(&mut out, self);
        out
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Annotation {
    name: Arc<str>,
    arguments: IndexMap<Arc<str>, AnnotationValue>,
}

impl Annotation {
    pub fn new(name: &str) -> Self {
        Self {
            name: Arc::from(name),
            arguments: IndexMap::new(),
        }
    }

    pub fn with_argument(mut self, name: &str, value: AnnotationValue) -> Self {
        self.set_argument(name, value);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arguments(&self) -> impl Iterator<Item = (&str, &AnnotationValue)> {
        self.arguments.iter().map(|(name, value)| (&**name, value))
    }

    pub fn argument(&self, name: &str) -> Option<&AnnotationValue> {
        self.arguments.get(name)
    }

    /// Set an argument; an existing argument keeps its position.
    pub fn set_argument(&mut self, name: &str, value: AnnotationValue) {
        trace!(annotation = &*self.name, argument = name, "Set annotation argument");
        self.arguments.insert(Arc::from(name), value);
    }

    /// Remove an argument, keeping the order of the others.
    pub fn remove_argument(&mut self, name: &str) -> Option<AnnotationValue> {
        self.arguments.shift_remove(name)
    }

    pub fn text(&self) -> String {
        let mut out = String::new();
        write_annotation(&mut out, self);
        out
    }
}

fn write_annotation(out: &mut String, annotation: &Annotation) {
    out.push('@');
    out.push_str(&annotation.name);
    if annotation.arguments.is_empty() {
        return;
    }
    out.push('(');
    match annotation.arguments.first() {
        Some((name, value)) if annotation.arguments.len() == 1 && &**name == VALUE_ARGUMENT => {
            write_value(out, value);
        }
        _ => {
            for (index, (name, value)) in annotation.arguments.iter().enumerate() {
                if index > 0 {
                    out.push_str(", ");
                }
                out.push_str(name);
                out.push_str(" = ");
                write_value(out, value);
            }
        }
    }
    out.push(')');
}

fn write_value(out: &mut String, value: &AnnotationValue) {
    match value {
        AnnotationValue::Literal(literal) => match literal {
            AnnotationLiteral::String(text) => {
                out.push('\'');
                for c in text.chars() {
                    match c {
                        '\'' => out.push_str("\\'"),
                        '\\' => out.push_str("\\\\"),
                        '\n' => out.push_str("\\n"),
                        c => out.push(c),
                    }
                }
                out.push('\'');
            }
            AnnotationLiteral::Int(value) => out.push_str(&value.to_string()),
            AnnotationLiteral::Bool(value) => out.push_str(if *value { "true" } else { "false" }),
            AnnotationLiteral::Double(value) => out.push_str(&format!("{value:?}")),
            AnnotationLiteral::Class(name) => out.push_str(name),
        },
        AnnotationValue::Nested(annotation) => write_annotation(out, annotation),
        AnnotationValue::Array(values) => {
            out.push('[');
            for (index, value) in values.iter().enumerate() {
                if index > 0 {
                    out.push_str(", ");
                }
                write_value(out, value);
            }
            out.push(']');
        }
        AnnotationValue::Expression(text) => out.push_str(text),
    }
}

#[cfg(test)]
#[path = "../tests/annotation_tests.rs"]
mod tests;
