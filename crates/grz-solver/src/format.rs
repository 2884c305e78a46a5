//! Canonical and presentable text of type values.
//!
//! Canonical text is deterministic and is re-parsed by callers that
//! materialize types as source, so its shapes are fixed:
//!
//! - class: `java.util.List<java.lang.String>`
//! - closure: `groovy.lang.Closure<R>`, raw when no return type is known
//! - tuple: `[T0, T1,...]`, two components shown
//! - map literal: `['a':T0, 'b':T1,...]`, two entries shown, `[:]` when empty;
//!   maps with non-string keys render as `java.util.LinkedHashMap<K, V>`
//! - range: `[L..R]`, `null` for a missing endpoint
//! - trait type: `P as T1, T2`
//!
//! Untyped components render as `java.lang.Object`. A type reached again
//! while it is being rendered (a closure returning itself) renders as its
//! simple class name; so does anything nested deeper than the render depth.
//!
//! Presentable text uses simple class names everywhere.

use crate::config::SolverConfig;
use crate::decl::SearchScope;
use crate::hierarchy::ClassResolver;
use crate::recursion::{DepthCounter, GuardKey, GuardKind, RecursionProfile, prevent_recursion};
use crate::types::{ClassRef, MapType, TypeValue};
use grz_common::{limits, names};
use std::cell::RefCell;

pub struct TypeFormatter<'a> {
    resolver: &'a dyn ClassResolver,
    scope: SearchScope,
    max_depth: u32,
    short_names: bool,
}

impl<'a> TypeFormatter<'a> {
    pub fn new(resolver: &'a dyn ClassResolver, scope: SearchScope) -> Self {
        Self {
            resolver,
            scope,
            max_depth: RecursionProfile::Rendering.max_depth(),
            short_names: false,
        }
    }

    pub fn with_config(mut self, config: &SolverConfig) -> Self {
        self.max_depth = config.max_render_depth;
        self
    }

    /// Formatter producing presentable text.
    pub fn presentable(mut self) -> Self {
        self.short_names = true;
        self
    }

    pub fn canonical_text(&self, ty: &TypeValue) -> String {
        let depth = RefCell::new(DepthCounter::new(self.max_depth));
        let mut out = String::new();
        Render {
            formatter: self,
            depth: &depth,
            short_names: false,
        }
        .write(&mut out, ty);
        out
    }

    pub fn presentable_text(&self, ty: &TypeValue) -> String {
        let depth = RefCell::new(DepthCounter::new(self.max_depth));
        let mut out = String::new();
        Render {
            formatter: self,
            depth: &depth,
            short_names: true,
        }
        .write(&mut out, ty);
        out
    }

    /// Text in this formatter's mode (canonical unless [`presentable`](Self::presentable)).
    pub fn text(&self, ty: &TypeValue) -> String {
        if self.short_names {
            self.presentable_text(ty)
        } else {
            self.canonical_text(ty)
        }
    }

    /// Canonical text, `java.lang.Object` for an untyped value.
    pub fn opt_canonical_text(&self, ty: Option<&TypeValue>) -> String {
        match ty {
            Some(ty) => self.canonical_text(ty),
            None => names::JAVA_LANG_OBJECT.to_string(),
        }
    }
}

struct Render<'f, 'a> {
    formatter: &'f TypeFormatter<'a>,
    depth: &'f RefCell<DepthCounter>,
    short_names: bool,
}

impl Render<'_, '_> {
    fn class_name<'n>(&self, qualified_name: &'n str) -> &'n str {
        if self.short_names {
            names::short_name(qualified_name)
        } else {
            qualified_name
        }
    }

    fn write(&self, out: &mut String, ty: &TypeValue) {
        if !self.depth.borrow_mut().enter() {
            out.push_str(fallback_name(ty));
            return;
        }
        self.write_inner(out, ty);
        self.depth.borrow_mut().leave();
    }

    fn write_opt(&self, out: &mut String, ty: Option<&TypeValue>) {
        match ty {
            Some(ty) => self.write(out, ty),
            None => out.push_str(self.class_name(names::JAVA_LANG_OBJECT)),
        }
    }

    fn write_inner(&self, out: &mut String, ty: &TypeValue) {
        match ty {
            TypeValue::Primitive(kind) => out.push_str(kind.keyword()),
            TypeValue::TypeParam(param) => out.push_str(param.name()),
            TypeValue::Class(class_ref) => self.write_class(out, class_ref),
            TypeValue::Closure(closure) => {
                let key = GuardKey::of(&**closure, GuardKind::Rendering);
                let rendered = prevent_recursion(key, || {
                    let params = closure.parameters(self.formatter.resolver, &self.formatter.scope);
                    let mut text = String::from(self.class_name(names::GROOVY_LANG_CLOSURE));
                    if let [Some(ret)] = params.as_slice() {
                        text.push('<');
                        self.write(&mut text, ret);
                        text.push('>');
                    }
                    text
                });
                match rendered.into_value() {
                    Some(text) => out.push_str(&text),
                    None => out.push_str(names::short_name(names::GROOVY_LANG_CLOSURE)),
                }
            }
            TypeValue::Tuple(tuple) => {
                out.push('[');
                for (index, component) in tuple
                    .components()
                    .iter()
                    .take(limits::TUPLE_RENDERED_COMPONENTS)
                    .enumerate()
                {
                    if index > 0 {
                        out.push_str(", ");
                    }
                    self.write_opt(out, component.as_ref());
                }
                if tuple.len() > limits::TUPLE_RENDERED_COMPONENTS {
                    out.push_str(",...");
                }
                out.push(']');
            }
            TypeValue::Map(map) => self.write_map(out, map),
            TypeValue::Range(range) => {
                out.push('[');
                match range.left() {
                    Some(left) => self.write(out, left),
                    None => out.push_str("null"),
                }
                out.push_str("..");
                match range.right() {
                    Some(right) => self.write(out, right),
                    None => out.push_str("null"),
                }
                out.push(']');
            }
            TypeValue::Intersection(intersection) => {
                self.write(out, intersection.primary());
                out.push_str(" as ");
                for (index, conjunct) in intersection.additional().iter().enumerate() {
                    if index > 0 {
                        out.push_str(", ");
                    }
                    self.write(out, conjunct);
                }
            }
            TypeValue::Anonymous(anonymous) => {
                let name = anonymous.body().synthesized_name();
                out.push_str(self.class_name(&name));
                self.write_args(out, anonymous.base().type_args());
            }
        }
    }

    fn write_class(&self, out: &mut String, class_ref: &ClassRef) {
        out.push_str(self.class_name(class_ref.qualified_name()));
        self.write_args(out, class_ref.type_args());
    }

    fn write_args(&self, out: &mut String, args: &[TypeValue]) {
        if args.is_empty() {
            return;
        }
        out.push('<');
        for (index, arg) in args.iter().enumerate() {
            if index > 0 {
                out.push_str(", ");
            }
            self.write(out, arg);
        }
        out.push('>');
    }

    fn write_map(&self, out: &mut String, map: &MapType) {
        if map.is_empty() {
            out.push_str("[:]");
            return;
        }
        if !map.has_only_string_keys() {
            out.push_str(self.class_name(names::JAVA_UTIL_LINKED_HASH_MAP));
            let params = map.parameters(self.formatter.resolver, &self.formatter.scope);
            if let [Some(key), Some(value)] = params.as_slice() {
                out.push('<');
                self.write(out, key);
                out.push_str(", ");
                self.write(out, value);
                out.push('>');
            }
            return;
        }
        out.push('[');
        for (index, (key, value)) in map
            .string_entries()
            .iter()
            .take(limits::MAP_LITERAL_RENDERED_ENTRIES)
            .enumerate()
        {
            if index > 0 {
                out.push_str(", ");
            }
            out.push('\'');
            push_escaped(out, key);
            out.push_str("':");
            self.write_opt(out, value.as_ref());
        }
        if map.string_entries().len() > limits::MAP_LITERAL_RENDERED_ENTRIES {
            out.push_str(",...");
        }
        out.push(']');
    }
}

/// Simple host class name used past the depth limit.
fn fallback_name(ty: &TypeValue) -> &str {
    match ty {
        TypeValue::Primitive(kind) => kind.keyword(),
        TypeValue::TypeParam(param) => param.name(),
        other => other
            .host_class_name()
            .map_or("Object", names::short_name),
    }
}

fn push_escaped(out: &mut String, key: &str) {
    for c in key.chars() {
        if c == '\'' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
}

#[cfg(test)]
#[path = "../tests/format_tests.rs"]
mod tests;
