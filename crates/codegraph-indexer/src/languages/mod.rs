//! Language capability sets and the registry that looks them up by tag.
//!
//! Grounded on the `LanguageResolver` trait from the reference pack (Keel's
//! `crates/keel-parsers/src/resolver.rs`), generalized into the four
//! responsibilities this pipeline actually needs per language: collection
//! (Phase 1), extraction (Phase 2), name resolution, and output noise
//! filtering. One struct implements all four per language rather than an
//! open inheritance hierarchy of single-purpose traits.

pub mod generic;
pub mod java;

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use codegraph_core::{GlobalContext, GraphEdge, Resolver};
use tree_sitter::{Language as Grammar, Tree};

/// Everything the pipeline needs to index one language.
pub trait LanguageSupport: Send + Sync {
    /// Tag used on the CLI (`--lang java`) and to select this support.
    fn tag(&self) -> &'static str;

    /// The tree-sitter grammar to parse source files with.
    fn grammar(&self) -> Grammar;

    /// The name resolver this language injects into every `GlobalContext`.
    fn resolver(&self) -> Arc<dyn Resolver>;

    /// Phase 1: walk `tree` and register every definition it contains into
    /// `ctx`, returning the file's own symbol table.
    fn collect(
        &self,
        ctx: &GlobalContext,
        file_path: &Path,
        tree: Arc<Tree>,
        source: Arc<[u8]>,
    ) -> Result<codegraph_core::FileContext>;

    /// Phase 2: given the now-complete `ctx`, emit every structural and
    /// action edge found in the file already registered under `file_path`.
    fn extract(&self, ctx: &GlobalContext, file_path: &Path) -> Result<Vec<GraphEdge>>;

    /// True if `qualified_name` belongs to this language's well-known
    /// standard-library noise (used only by the CLI's optional output
    /// filter, never by the pipeline itself).
    fn is_noise(&self, qualified_name: &str) -> bool;
}

/// Maps a language tag to its `LanguageSupport`. Built once at startup.
#[derive(Default)]
pub struct LanguageRegistry {
    languages: HashMap<&'static str, Arc<dyn LanguageSupport>>,
}

impl LanguageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, support: Arc<dyn LanguageSupport>) {
        self.languages.insert(support.tag(), support);
    }

    pub fn get(&self, tag: &str) -> Result<Arc<dyn LanguageSupport>> {
        self.languages
            .get(tag)
            .cloned()
            .ok_or_else(|| anyhow!("no language registered for tag {tag:?}"))
    }

    /// A registry with every language this crate ships support for.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(java::JavaSupport::new()));
        registry
    }
}
