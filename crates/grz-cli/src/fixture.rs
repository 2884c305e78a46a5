//! JSON fixtures: class declarations plus the type texts a command works on.
//!
//! ```json
//! {
//!   "classes": [
//!     { "name": "p.Animal", "kind": "class" },
//!     { "name": "p.Box", "typeParams": ["T"], "supertypes": ["java.lang.Comparable<T>"] }
//!   ],
//!   "types": ["p.Box<String>", "[int, java.lang.String]"]
//! }
//! ```
//!
//! Types are written in canonical type text. Supertypes may refer to the
//! class's own type parameters.

use anyhow::{Context, Result, bail};
use grz_solver::bridge::SyntaxContext;
use grz_solver::type_text::TypeTextParser;
use grz_solver::{ClassDecl, ClassKind, ClassRef, ClassTable, SearchScope, TypeValue};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FixtureClassKind {
    #[default]
    Class,
    Interface,
    Trait,
    Enum,
    Annotation,
}

impl From<FixtureClassKind> for ClassKind {
    fn from(kind: FixtureClassKind) -> Self {
        match kind {
            FixtureClassKind::Class => ClassKind::Class,
            FixtureClassKind::Interface => ClassKind::Interface,
            FixtureClassKind::Trait => ClassKind::Trait,
            FixtureClassKind::Enum => ClassKind::Enum,
            FixtureClassKind::Annotation => ClassKind::Annotation,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClassSpec {
    pub name: String,
    pub kind: FixtureClassKind,
    pub type_params: Vec<String>,
    pub supertypes: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Fixture {
    pub classes: Vec<ClassSpec>,
    pub types: Vec<String>,
}

impl Fixture {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read fixture {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("invalid fixture {}", path.display()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// A class table with the JDK basics and every fixture class.
    ///
    /// A class without declared supertypes extends `java.lang.Object`.
    pub fn build_table(&self) -> Result<ClassTable> {
        let table = ClassTable::with_jdk_basics();
        for spec in &self.classes {
            // Rejects empty names before anything is registered.
            ClassRef::try_new(&spec.name, Vec::new())
                .with_context(|| format!("invalid class name `{}`", spec.name))?;

            let decl = ClassDecl::new(table.allocate(), spec.name.trim(), spec.kind.into())
                .with_type_params(&spec.type_params);
            let supertypes = if spec.supertypes.is_empty() {
                vec![TypeValue::object()]
            } else {
                let context = SyntaxContext::of_class(&decl);
                let parser = TypeTextParser::new(&table, SearchScope::all());
                spec.supertypes
                    .iter()
                    .map(|text| {
                        parser.parse_type(text, &context).with_context(|| {
                            format!("invalid supertype `{text}` of `{}`", spec.name)
                        })
                    })
                    .collect::<Result<Vec<_>>>()?
            };
            debug!(class = %spec.name, supertypes = supertypes.len(), "Registering fixture class");
            table.register(decl.with_supertypes(supertypes));
        }
        Ok(table)
    }

    /// The fixture's types, parsed against `table`.
    pub fn parse_types(&self, table: &ClassTable) -> Result<Vec<TypeValue>> {
        if self.types.is_empty() {
            bail!("fixture declares no types");
        }
        let parser = TypeTextParser::new(table, SearchScope::all());
        self.types
            .iter()
            .map(|text| {
                parser
                    .parse_type(text, &SyntaxContext::empty())
                    .with_context(|| format!("invalid type `{text}`"))
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "../tests/fixture_tests.rs"]
mod tests;
