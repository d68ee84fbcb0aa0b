//! Small text-cleaning helpers shared by the resolver, extractor, and
//! inheritance walk. Kept here (rather than duplicated per language) because
//! the cleaning rules are spelled out once in the qualified-name rules and
//! reused verbatim by every consumer.

/// Erase generic type arguments, one trailing `[]`/`...`, and a single
/// leading `@Annotation` from a raw type token as written in source.
///
/// `List<String>` -> `List`, `int[]` -> `int`, `String...` -> `String`,
/// `@NonNull Foo` -> `Foo`.
pub fn clean_type_text(raw: &str) -> String {
    let mut s = raw.trim();
    if let Some(rest) = s.strip_prefix('@') {
        if let Some(space) = rest.find(char::is_whitespace) {
            s = rest[space..].trim_start();
        }
    }
    let s = match s.find('<') {
        Some(idx) => &s[..idx],
        None => s,
    };
    let s = s.trim();
    let s = s.strip_suffix("...").unwrap_or(s).trim_end();
    let s = s.strip_suffix("[]").unwrap_or(s).trim_end();
    s.to_string()
}

/// Erase only the generic-argument suffix (from the first `<`), preserving a
/// trailing `[]` or `...` verbatim. Used for qualified-name construction,
/// where array/varargs shape is part of a method's identity but a generic
/// argument is not.
///
/// `List<String>` -> `List`, `int[]` -> `int[]`, `String...` -> `String...`.
pub fn erase_generics(raw: &str) -> String {
    let s = raw.trim();
    match s.find('<') {
        Some(idx) => s[..idx].trim_end().to_string(),
        None => s.to_string(),
    }
}

/// Strip a `(...)` argument list and a leading `@` from an annotation token,
/// leaving just the dotted type name (`@Override` -> `Override`,
/// `@Retention(RUNTIME)` -> `Retention`).
pub fn clean_annotation_text(raw: &str) -> String {
    let s = raw.trim().trim_start_matches('@');
    match s.find('(') {
        Some(idx) => s[..idx].trim().to_string(),
        None => s.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_generics() {
        assert_eq!(clean_type_text("List<String>"), "List");
        assert_eq!(clean_type_text("Map<String, List<Integer>>"), "Map");
    }

    #[test]
    fn strips_array_and_varargs() {
        assert_eq!(clean_type_text("int[]"), "int");
        assert_eq!(clean_type_text("String..."), "String");
    }

    #[test]
    fn erase_generics_keeps_array_and_varargs_shape() {
        assert_eq!(erase_generics("int[]"), "int[]");
        assert_eq!(erase_generics("List<String>..."), "List...");
        assert_eq!(erase_generics("List<String>"), "List");
    }

    #[test]
    fn strips_leading_annotation() {
        assert_eq!(clean_type_text("@NonNull Foo"), "Foo");
    }

    #[test]
    fn cleans_annotation_arguments() {
        assert_eq!(clean_annotation_text("@Retention(RUNTIME)"), "Retention");
        assert_eq!(clean_annotation_text("@Override"), "Override");
    }
}
