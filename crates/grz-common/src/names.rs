//! Well-known qualified class names.
//!
//! The kernel never resolves these eagerly: they are looked up by name through
//! the host resolver the first time a computation needs them.

pub const JAVA_LANG_OBJECT: &str = "java.lang.Object";
pub const JAVA_LANG_STRING: &str = "java.lang.String";
pub const JAVA_LANG_CHAR_SEQUENCE: &str = "java.lang.CharSequence";
pub const JAVA_LANG_COMPARABLE: &str = "java.lang.Comparable";
pub const JAVA_LANG_NUMBER: &str = "java.lang.Number";
pub const JAVA_LANG_RUNNABLE: &str = "java.lang.Runnable";
pub const JAVA_LANG_CLONEABLE: &str = "java.lang.Cloneable";
pub const JAVA_LANG_ITERABLE: &str = "java.lang.Iterable";
pub const JAVA_IO_SERIALIZABLE: &str = "java.io.Serializable";

pub const JAVA_LANG_BOOLEAN: &str = "java.lang.Boolean";
pub const JAVA_LANG_BYTE: &str = "java.lang.Byte";
pub const JAVA_LANG_CHARACTER: &str = "java.lang.Character";
pub const JAVA_LANG_SHORT: &str = "java.lang.Short";
pub const JAVA_LANG_INTEGER: &str = "java.lang.Integer";
pub const JAVA_LANG_LONG: &str = "java.lang.Long";
pub const JAVA_LANG_FLOAT: &str = "java.lang.Float";
pub const JAVA_LANG_DOUBLE: &str = "java.lang.Double";
pub const JAVA_LANG_VOID: &str = "java.lang.Void";
pub const JAVA_MATH_BIG_INTEGER: &str = "java.math.BigInteger";
pub const JAVA_MATH_BIG_DECIMAL: &str = "java.math.BigDecimal";

pub const JAVA_UTIL_COLLECTION: &str = "java.util.Collection";
pub const JAVA_UTIL_LIST: &str = "java.util.List";
pub const JAVA_UTIL_ARRAY_LIST: &str = "java.util.ArrayList";
pub const JAVA_UTIL_LINKED_LIST: &str = "java.util.LinkedList";
pub const JAVA_UTIL_MAP: &str = "java.util.Map";
pub const JAVA_UTIL_HASH_MAP: &str = "java.util.HashMap";
pub const JAVA_UTIL_LINKED_HASH_MAP: &str = "java.util.LinkedHashMap";

pub const GROOVY_LANG_CLOSURE: &str = "groovy.lang.Closure";
pub const GROOVY_LANG_GSTRING: &str = "groovy.lang.GString";
pub const GROOVY_LANG_RANGE: &str = "groovy.lang.Range";
pub const GROOVY_LANG_INT_RANGE: &str = "groovy.lang.IntRange";
pub const GROOVY_LANG_OBJECT_RANGE: &str = "groovy.lang.ObjectRange";

/// Packages Groovy imports implicitly, in lookup order.
pub const DEFAULT_IMPORT_PACKAGES: &[&str] = &[
    "java.lang",
    "java.util",
    "java.io",
    "java.net",
    "groovy.lang",
    "groovy.util",
];

/// Classes Groovy imports implicitly outside the default packages.
pub const DEFAULT_IMPORT_CLASSES: &[&str] = &[JAVA_MATH_BIG_INTEGER, JAVA_MATH_BIG_DECIMAL];

/// Simple name of a qualified class name (`java.util.List` -> `List`).
pub fn short_name(qualified_name: &str) -> &str {
    match qualified_name.rfind('.') {
        Some(dot) => &qualified_name[dot + 1..],
        None => qualified_name,
    }
}

/// Package part of a qualified class name, empty for the default package.
pub fn package_name(qualified_name: &str) -> &str {
    match qualified_name.rfind('.') {
        Some(dot) => &qualified_name[..dot],
        None => "",
    }
}

/// Candidate qualified names a short name may refer to through default imports.
///
/// Already-qualified names are returned unchanged as the only candidate.
pub fn default_import_candidates(name: &str) -> Vec<String> {
    if name.contains('.') {
        return vec![name.to_string()];
    }
    let mut out: Vec<String> = DEFAULT_IMPORT_PACKAGES
        .iter()
        .map(|package| format!("{package}.{name}"))
        .collect();
    out.extend(
        DEFAULT_IMPORT_CLASSES
            .iter()
            .filter(|qualified| short_name(qualified) == name)
            .map(|qualified| (*qualified).to_string()),
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_and_package_names() {
        assert_eq!(short_name("java.util.List"), "List");
        assert_eq!(short_name("Script"), "Script");
        assert_eq!(package_name("java.util.List"), "java.util");
        assert_eq!(package_name("Script"), "");
    }

    #[test]
    fn test_default_import_candidates() {
        let candidates = default_import_candidates("BigDecimal");
        assert_eq!(candidates.first().map(String::as_str), Some("java.lang.BigDecimal"));
        assert!(candidates.iter().any(|c| c == JAVA_MATH_BIG_DECIMAL));
        assert_eq!(default_import_candidates("a.B"), vec!["a.B".to_string()]);
    }
}
