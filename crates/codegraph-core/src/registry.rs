//! Resolver contract injected into a `GlobalContext`.
//!
//! Grounded on the `LanguageResolver` trait in the reference pack (Keel's
//! `crates/keel-parsers/src/resolver.rs`): a small `Send + Sync` trait that a
//! language implementation provides once, and the pipeline calls through a
//! trait object so it never needs to know which language it is indexing.

use crate::context::{DefinitionEntry, FileContext, GlobalContext};

/// Language-specific name construction and symbol lookup.
///
/// One implementation per supported language, registered with the indexer's
/// `LanguageRegistry` and injected into every `GlobalContext` built for a run.
pub trait Resolver: Send + Sync {
    /// The separator used when joining QN segments (e.g. `"."` for Java).
    fn separator(&self) -> &'static str;

    /// Join a parent QN and a short name into a child QN.
    fn build_qualified_name(&self, parent: &str, name: &str) -> String {
        if parent.is_empty() {
            name.to_string()
        } else {
            format!("{parent}{}{name}", self.separator())
        }
    }

    /// Ensure `package_name` and every dotted prefix of it has a `Package`
    /// element registered in `ctx`. Idempotent.
    fn register_package(&self, ctx: &GlobalContext, package_name: &str);

    /// Resolve `short_name` as it appears within `file_ctx`, following the
    /// language's priority chain. Returns every candidate in priority order;
    /// callers take the first.
    fn resolve(
        &self,
        ctx: &GlobalContext,
        file_ctx: &FileContext,
        short_name: &str,
    ) -> Vec<DefinitionEntry>;
}
