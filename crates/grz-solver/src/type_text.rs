//! Parser for canonical type text.
//!
//! [`TypeTextParser`] is the reference [`SourceBridge`]: it reads back what
//! [`TypeFormatter`](crate::format::TypeFormatter) writes.
//!
//! ```text
//! type       := single ( "as" single ( "," single )* )?
//! single     := primitive | class | bracketed
//! class      := ident ( "." ident )* ( "<" single ( "," single )* ">" )?
//! bracketed  := "[:]" | "[]"
//!             | "[" string ":" single ( "," string ":" single )* "]"
//!             | "[" endpoint ".." endpoint "]"
//!             | "[" single ( "," single )* "]"
//! endpoint   := single | "null"
//! params     := "(" ( param ( "," param )* )? ")"
//! param      := ( "def" | single "..."? )? ident
//! ```
//!
//! Trait types (`as`) are accepted at the top level only. Truncated
//! renderings (`,...`) are rejected, and so is text nested deeper than
//! [`RecursionProfile::TypeText`] allows. A simple class name that is not a type
//! parameter in scope resolves through the Groovy default imports.

use crate::bridge::{FragmentKind, MalformedText, SourceBridge, SyntaxContext};
use crate::closure::Parameter;
use crate::decl::SearchScope;
use crate::hierarchy::ClassResolver;
use crate::intersection::create_intersection;
use crate::recursion::{DepthCounter, RecursionProfile};
use crate::types::{ClassRef, MapType, PrimitiveKind, RangeType, TupleType, TypeValue};
use grz_common::names;
use indexmap::IndexMap;
use std::sync::Arc;

/// Result of parsing a snippet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeFragment {
    Type(TypeValue),
    Parameters(Vec<Parameter>),
}

pub struct TypeTextParser<'a> {
    resolver: &'a dyn ClassResolver,
    scope: SearchScope,
}

impl<'a> TypeTextParser<'a> {
    pub fn new(resolver: &'a dyn ClassResolver, scope: SearchScope) -> Self {
        Self { resolver, scope }
    }

    pub fn parse_type(&self, text: &str, context: &SyntaxContext) -> Result<TypeValue, MalformedText> {
        let mut cursor = Cursor::new(self, text, context);
        let ty = cursor.parse_type()?;
        cursor.expect_end()?;
        Ok(ty)
    }

    pub fn parse_parameters(
        &self,
        text: &str,
        context: &SyntaxContext,
    ) -> Result<Vec<Parameter>, MalformedText> {
        let mut cursor = Cursor::new(self, text, context);
        let params = cursor.parse_parameters()?;
        cursor.expect_end()?;
        Ok(params)
    }

    /// Qualified name for a class name as written.
    fn qualify(&self, name: &str) -> String {
        if name.contains('.') {
            return name.to_string();
        }
        names::default_import_candidates(name)
            .into_iter()
            .find(|candidate| self.resolver.find_class(candidate, &self.scope).is_some())
            .unwrap_or_else(|| name.to_string())
    }
}

impl SourceBridge for TypeTextParser<'_> {
    type Fragment = TypeFragment;

    fn parse(
        &self,
        text: &str,
        kind: FragmentKind,
        context: &SyntaxContext,
    ) -> Result<TypeFragment, MalformedText> {
        match kind {
            FragmentKind::Type => self.parse_type(text, context).map(TypeFragment::Type),
            FragmentKind::ParameterList => self
                .parse_parameters(text, context)
                .map(TypeFragment::Parameters),
        }
    }
}

struct Cursor<'p, 't> {
    parser: &'p TypeTextParser<'p>,
    context: &'p SyntaxContext,
    text: &'t str,
    pos: usize,
    depth: DepthCounter,
}

impl<'p, 't> Cursor<'p, 't> {
    fn new(parser: &'p TypeTextParser<'p>, text: &'t str, context: &'p SyntaxContext) -> Self {
        Self {
            parser,
            context,
            text,
            pos: 0,
            depth: DepthCounter::with_profile(RecursionProfile::TypeText),
        }
    }

    fn error(&self, message: &str) -> MalformedText {
        MalformedText::new(self.pos, message)
    }

    fn rest(&self) -> &'t str {
        &self.text[self.pos..]
    }

    fn skip_ws(&mut self) {
        let trimmed = self.rest().trim_start();
        self.pos = self.text.len() - trimmed.len();
    }

    fn at(&mut self, token: &str) -> bool {
        self.skip_ws();
        self.rest().starts_with(token)
    }

    fn eat(&mut self, token: &str) -> bool {
        if self.at(token) {
            self.pos += token.len();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: &str) -> Result<(), MalformedText> {
        if self.eat(token) {
            Ok(())
        } else {
            Err(self.error(&format!("expected `{token}`")))
        }
    }

    fn expect_end(&mut self) -> Result<(), MalformedText> {
        self.skip_ws();
        if self.pos == self.text.len() {
            Ok(())
        } else {
            Err(self.error("unexpected trailing text"))
        }
    }

    /// Separator `,`; a truncation marker `,...` is an error.
    fn eat_comma(&mut self) -> Result<bool, MalformedText> {
        if self.at(",...") {
            return Err(self.error("truncated type text"));
        }
        Ok(self.eat(","))
    }

    fn at_ident(&mut self) -> bool {
        self.skip_ws();
        self.rest()
            .chars()
            .next()
            .is_some_and(|c| c.is_alphabetic() || c == '_' || c == '$')
    }

    fn ident(&mut self) -> Result<&'t str, MalformedText> {
        if !self.at_ident() {
            return Err(self.error("expected identifier"));
        }
        let rest = self.rest();
        let len = rest
            .find(|c: char| !(c.is_alphanumeric() || c == '_' || c == '$'))
            .unwrap_or(rest.len());
        self.pos += len;
        Ok(&rest[..len])
    }

    /// Whether a single `.` (not a range `..`) follows.
    fn at_qualifier_dot(&mut self) -> bool {
        self.at(".") && !self.rest().starts_with("..")
    }

    fn parse_type(&mut self) -> Result<TypeValue, MalformedText> {
        let primary = self.parse_single()?;
        if !self.at_keyword("as") {
            return Ok(primary);
        }
        self.pos += "as".len();
        let mut conjuncts = vec![primary];
        loop {
            conjuncts.push(self.parse_single()?);
            if !self.eat_comma()? {
                break;
            }
        }
        create_intersection(conjuncts).ok_or_else(|| self.error("empty trait type"))
    }

    fn at_keyword(&mut self, keyword: &str) -> bool {
        self.skip_ws();
        let rest = self.rest();
        rest.starts_with(keyword)
            && !rest[keyword.len()..]
                .chars()
                .next()
                .is_some_and(|c| c.is_alphanumeric() || c == '_' || c == '$')
    }

    fn parse_single(&mut self) -> Result<TypeValue, MalformedText> {
        if !self.depth.enter() {
            return Err(self.error("type text nested too deeply"));
        }
        let result = self.parse_single_unguarded();
        self.depth.leave();
        result
    }

    fn parse_single_unguarded(&mut self) -> Result<TypeValue, MalformedText> {
        if self.at("[") {
            return self.parse_bracketed();
        }
        let first = self.ident()?;
        if !self.at_qualifier_dot() && !self.at("<") {
            if let Some(kind) = PrimitiveKind::from_keyword(first) {
                return Ok(TypeValue::Primitive(kind));
            }
            if let Some(param) = self.context.type_param(first) {
                return Ok(TypeValue::TypeParam(param.clone()));
            }
        }

        let mut name = first.to_string();
        while self.at_qualifier_dot() {
            self.pos += 1;
            name.push('.');
            name.push_str(self.ident()?);
        }

        let mut args = Vec::new();
        if self.eat("<") {
            loop {
                args.push(self.parse_single()?);
                if !self.eat_comma()? {
                    break;
                }
            }
            self.expect(">")?;
        }
        Ok(TypeValue::Class(ClassRef::new(self.parser.qualify(&name), args)))
    }

    fn parse_bracketed(&mut self) -> Result<TypeValue, MalformedText> {
        self.expect("[")?;
        if self.eat(":") {
            self.expect("]")?;
            return Ok(TypeValue::Map(MapType::new()));
        }
        if self.eat("]") {
            return Ok(TypeValue::Tuple(TupleType::new(Vec::new())));
        }
        if self.at("'") {
            return self.parse_map_entries();
        }

        let first = self.parse_endpoint()?;
        if self.eat("..") {
            let right = self.parse_endpoint()?;
            self.expect("]")?;
            return Ok(TypeValue::Range(RangeType::new(first, right)));
        }
        let Some(first) = first else {
            return Err(self.error("`null` outside a range"));
        };

        let mut components = vec![Some(first)];
        while self.eat_comma()? {
            components.push(Some(self.parse_single()?));
        }
        self.expect("]")?;
        Ok(TypeValue::Tuple(TupleType::new(components)))
    }

    fn parse_endpoint(&mut self) -> Result<Option<TypeValue>, MalformedText> {
        if self.at_keyword("null") {
            self.pos += "null".len();
            return Ok(None);
        }
        self.parse_single().map(Some)
    }

    fn parse_map_entries(&mut self) -> Result<TypeValue, MalformedText> {
        let mut entries: IndexMap<Arc<str>, Option<TypeValue>> = IndexMap::new();
        loop {
            let key = self.string_literal()?;
            self.expect(":")?;
            let value = self.parse_single()?;
            entries.insert(Arc::from(key), Some(value));
            if !self.eat_comma()? {
                break;
            }
        }
        self.expect("]")?;
        Ok(TypeValue::Map(MapType::from_entries(entries, Vec::new())))
    }

    fn string_literal(&mut self) -> Result<String, MalformedText> {
        self.expect("'")?;
        let mut out = String::new();
        let mut chars = self.rest().char_indices();
        while let Some((offset, c)) = chars.next() {
            match c {
                '\'' => {
                    self.pos += offset + 1;
                    return Ok(out);
                }
                '\\' => match chars.next() {
                    Some((_, escaped)) => out.push(escaped),
                    None => break,
                },
                c => out.push(c),
            }
        }
        self.pos = self.text.len();
        Err(self.error("unterminated string literal"))
    }

    fn parse_parameters(&mut self) -> Result<Vec<Parameter>, MalformedText> {
        self.expect("(")?;
        let mut params = Vec::new();
        if self.eat(")") {
            return Ok(params);
        }
        loop {
            params.push(self.parse_parameter()?);
            if !self.eat_comma()? {
                break;
            }
        }
        self.expect(")")?;
        Ok(params)
    }

    fn parse_parameter(&mut self) -> Result<Parameter, MalformedText> {
        if self.at_keyword("def") {
            self.pos += "def".len();
            return Ok(Parameter::new(self.ident()?, None));
        }
        let start = self.pos;
        let ty = self.parse_single()?;
        let varargs = self.eat("...");
        if varargs || self.at_ident() {
            let param = Parameter::new(self.ident()?, Some(ty));
            return Ok(if varargs { param.varargs() } else { param });
        }
        // A bare identifier is an untyped parameter's name.
        self.pos = start;
        Ok(Parameter::new(self.ident()?, None))
    }
}

#[cfg(test)]
#[path = "../tests/type_text_tests.rs"]
mod tests;
