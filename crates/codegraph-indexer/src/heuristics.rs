//! Cross-cutting fallbacks that belong to the *language's standard library
//! conventions* rather than to name scoping proper, plus the noise-filter
//! prefix list applied by the CLI as an optional post-processing step. Kept
//! separate from `languages::java::resolver` because `JavaResolver::resolve`
//! only ever walks scoping rules — these two functions are consulted by the
//! extractor only after that chain has already missed (see §4.5/§4.9 of the
//! project spec).

/// A capitalized, otherwise-unresolved short name is assumed to reference
/// `java.lang.<Name>` — the same default `javac` falls back to when a type
/// was never imported and isn't in the same package.
pub fn implicit_java_lang(short_name: &str) -> Option<String> {
    let first = short_name.chars().next()?;
    if first.is_uppercase() {
        Some(format!("java.lang.{short_name}"))
    } else {
        None
    }
}

/// Well-known JDK package prefixes excluded from output by the CLI's
/// `--no-noise-filter`-gated post-processor. Not part of the core pipeline:
/// tests of the pipeline see the full, unfiltered graph.
const NOISE_PREFIXES: &[&str] = &[
    "java.lang.",
    "java.util.",
    "java.io.",
    "java.nio.",
    "java.time.",
    "java.math.",
    "java.net.",
    "java.text.",
];

pub fn is_noise(qualified_name: &str) -> bool {
    NOISE_PREFIXES.iter().any(|prefix| qualified_name.starts_with(prefix))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capitalized_name_becomes_implicit_java_lang() {
        assert_eq!(implicit_java_lang("String"), Some("java.lang.String".to_string()));
        assert_eq!(implicit_java_lang("count"), None);
    }

    #[test]
    fn noise_prefixes_match_jdk_packages() {
        assert!(is_noise("java.util.List"));
        assert!(is_noise("java.lang.String"));
        assert!(!is_noise("com.example.Foo"));
    }
}
