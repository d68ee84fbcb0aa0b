//! Qualified-name construction rules for Java (see the QN rules in the
//! project spec): dotted separator, generic erasure, record accessor/compact
//! constructor synthesis, and per-scope anonymous-class numbering.

use codegraph_core::text::erase_generics;

pub const SEPARATOR: &str = ".";

pub fn join(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{parent}{SEPARATOR}{name}")
    }
}

/// `parent.name(T1,T2,...)` with generics erased, used as the QN/map key.
pub fn method_qn(parent: &str, name: &str, param_types: &[String]) -> String {
    let cleaned: Vec<String> = param_types.iter().map(|t| erase_generics(t)).collect();
    format!("{parent}{SEPARATOR}{name}({})", cleaned.join(","))
}

/// `parent.name(T1 n1, T2 n2, ...)`, kept for presentation (signature text),
/// never used as a map key.
pub fn method_display_qn(parent: &str, name: &str, params: &[String]) -> String {
    format!("{parent}{SEPARATOR}{name}({})", params.join(", "))
}

/// `parent.name()` for a record component's synthesized accessor.
pub fn accessor_qn(parent: &str, component_name: &str) -> String {
    method_qn(parent, component_name, &[])
}

/// Per-enclosing-scope counter for anonymous class numbering. Deterministic
/// because it is keyed by the enclosing scope's own QN and driven by the
/// collector's single-threaded, source-ordered traversal of one file.
#[derive(Default)]
pub struct AnonymousCounters {
    counts: std::collections::HashMap<String, u32>,
}

impl AnonymousCounters {
    pub fn next(&mut self, enclosing_scope_qn: &str) -> String {
        let counter = self.counts.entry(enclosing_scope_qn.to_string()).or_insert(0);
        *counter += 1;
        format!("anonymousClass${counter}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_qn_erases_generics_and_keeps_varargs() {
        assert_eq!(
            method_qn("pkg.Foo", "bar", &["List<String>".into(), "int...".into()]),
            "pkg.Foo.bar(List,int...)"
        );
    }

    #[test]
    fn anonymous_counters_are_per_scope() {
        let mut counters = AnonymousCounters::default();
        assert_eq!(counters.next("pkg.Foo.run()"), "anonymousClass$1");
        assert_eq!(counters.next("pkg.Foo.run()"), "anonymousClass$2");
        assert_eq!(counters.next("pkg.Foo.other()"), "anonymousClass$1");
    }
}
