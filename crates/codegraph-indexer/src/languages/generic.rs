//! Generic fallback: a `LanguageSupport` that parses nothing and extracts
//! nothing. Exists so an unsupported `--lang` value fails with a normal
//! "no definitions found" run rather than the registry lookup itself, and
//! as the template a new language support is built from.

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use codegraph_core::{FileContext, GlobalContext, GraphEdge, Resolver};
use tree_sitter::{Language as Grammar, Tree};

use super::LanguageSupport;

struct NoopResolver;

impl Resolver for NoopResolver {
    fn separator(&self) -> &'static str {
        "."
    }

    fn register_package(&self, _ctx: &GlobalContext, _package_name: &str) {}

    fn resolve(
        &self,
        _ctx: &GlobalContext,
        file_ctx: &FileContext,
        short_name: &str,
    ) -> Vec<codegraph_core::DefinitionEntry> {
        file_ctx.local(short_name).to_vec()
    }
}

pub struct GenericSupport;

impl GenericSupport {
    pub fn new() -> Self {
        GenericSupport
    }
}

impl Default for GenericSupport {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageSupport for GenericSupport {
    fn tag(&self) -> &'static str {
        "generic"
    }

    fn grammar(&self) -> Grammar {
        tree_sitter_java::LANGUAGE.into()
    }

    fn resolver(&self) -> Arc<dyn Resolver> {
        Arc::new(NoopResolver)
    }

    fn collect(
        &self,
        _ctx: &GlobalContext,
        file_path: &Path,
        tree: Arc<Tree>,
        source: Arc<[u8]>,
    ) -> Result<FileContext> {
        Ok(FileContext::new(file_path.to_path_buf(), tree, source))
    }

    fn extract(&self, _ctx: &GlobalContext, _file_path: &Path) -> Result<Vec<GraphEdge>> {
        Ok(vec![])
    }

    fn is_noise(&self, _qualified_name: &str) -> bool {
        false
    }
}
