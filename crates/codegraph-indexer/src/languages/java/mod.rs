//! Java `LanguageSupport`: wires the Phase-1 collector, the Phase-2
//! tree-sitter-query-driven extractor, `JavaResolver`, and the built-in-JDK
//! noise filter into one capability set registered under the `"java"` tag.

pub mod builtins;
pub mod collector;
pub mod extractor;
pub mod qn;
pub mod resolver;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use codegraph_core::{FileContext, GlobalContext, GraphEdge, Resolver};
use tree_sitter::{Language as Grammar, Tree};

use crate::heuristics;
use crate::languages::LanguageSupport;
use resolver::JavaResolver;

pub struct JavaSupport {
    resolver: Arc<JavaResolver>,
}

impl JavaSupport {
    pub fn new() -> Self {
        JavaSupport {
            resolver: JavaResolver::new(),
        }
    }
}

impl Default for JavaSupport {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageSupport for JavaSupport {
    fn tag(&self) -> &'static str {
        "java"
    }

    fn grammar(&self) -> Grammar {
        tree_sitter_java::LANGUAGE.into()
    }

    fn resolver(&self) -> Arc<dyn Resolver> {
        self.resolver.clone()
    }

    fn collect(
        &self,
        ctx: &GlobalContext,
        file_path: &Path,
        tree: Arc<Tree>,
        source: Arc<[u8]>,
    ) -> Result<FileContext> {
        collector::collect(ctx, file_path, tree, source)
    }

    fn extract(&self, ctx: &GlobalContext, file_path: &Path) -> Result<Vec<GraphEdge>> {
        extractor::extract(ctx, file_path)
    }

    fn is_noise(&self, qualified_name: &str) -> bool {
        heuristics::is_noise(qualified_name)
    }
}
