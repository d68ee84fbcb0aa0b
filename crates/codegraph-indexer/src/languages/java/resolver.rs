//! Java's symbol-resolution priority chain (local -> explicit import ->
//! same-package -> wildcard import -> global QN). The built-in table and the
//! capitalized-implicit-`java.lang` heuristic are consulted by the extractor
//! after this resolver has already missed, since they are properties of the
//! *language's standard library*, not of name scoping, and the extractor is
//! where the decision of "emit Unknown vs. materialize a builtin" is made.

use std::sync::Arc;

use codegraph_core::context::ImportKind;
use codegraph_core::{CodeElement, DefinitionEntry, Extra, FileContext, GlobalContext, Resolver};

use super::qn;

pub struct JavaResolver;

impl JavaResolver {
    pub fn new() -> Arc<Self> {
        Arc::new(JavaResolver)
    }
}

impl Resolver for JavaResolver {
    fn separator(&self) -> &'static str {
        qn::SEPARATOR
    }

    fn build_qualified_name(&self, parent: &str, name: &str) -> String {
        qn::join(parent, name)
    }

    fn register_package(&self, ctx: &GlobalContext, package_name: &str) {
        if package_name.is_empty() {
            return;
        }
        let mut prefix = String::new();
        for segment in package_name.split(qn::SEPARATOR) {
            prefix = qn::join(&prefix, segment);
            if !ctx.has_qn(&prefix) {
                let element = CodeElement {
                    id: codegraph_core::NodeId::new(
                        &std::path::PathBuf::new(),
                        codegraph_core::ElementKind::Package,
                        &prefix,
                    ),
                    kind: codegraph_core::ElementKind::Package,
                    name: segment.to_string(),
                    qualified_name: prefix.clone(),
                    path: std::path::PathBuf::new(),
                    signature: None,
                    location: None,
                    doc: None,
                    comment: None,
                    extra: Extra::default(),
                };
                ctx.register_element(element);
            }
        }
    }

    fn resolve(
        &self,
        ctx: &GlobalContext,
        file_ctx: &FileContext,
        short_name: &str,
    ) -> Vec<DefinitionEntry> {
        // 1. Local definitions in this file.
        let local = file_ctx.local(short_name);
        if !local.is_empty() {
            return local.to_vec();
        }

        // 2. Explicit (non-wildcard) import.
        if let Some(entries) = file_ctx.imports.get(short_name) {
            for import in entries.iter().filter(|i| !i.is_wildcard) {
                if let Some(found) = entries_for_qn(ctx, &import.raw_import_path) {
                    return found;
                }
            }
        }

        // 3. Same package.
        let same_pkg_qn = qn::join(&file_ctx.package_name, short_name);
        if let Some(found) = entries_for_qn(ctx, &same_pkg_qn) {
            return found;
        }

        // 4. Wildcard imports, in declaration order.
        for wildcard in file_ctx.wildcard_imports() {
            let candidate = qn::join(&wildcard.raw_import_path, short_name);
            if let Some(found) = entries_for_qn(ctx, &candidate) {
                return found;
            }
        }

        // 5. Treat as an already-qualified global name.
        if matches!(import_kind_hint(file_ctx, short_name), Some(ImportKind::Package)) {
            return vec![];
        }
        entries_for_qn(ctx, short_name).unwrap_or_default()
    }
}

fn entries_for_qn(ctx: &GlobalContext, target_qn: &str) -> Option<Vec<DefinitionEntry>> {
    let ids = ctx.qn_index.get(target_qn)?;
    if ids.is_empty() {
        return None;
    }
    Some(
        ids.iter()
            .map(|&id| DefinitionEntry {
                element_id: id,
                qualified_name: target_qn.to_string(),
                parent_qn: String::new(),
                ast: codegraph_core::AstHandle {
                    start_byte: 0,
                    end_byte: 0,
                    kind_id: 0,
                },
            })
            .collect(),
    )
}

fn import_kind_hint(file_ctx: &FileContext, short_name: &str) -> Option<ImportKind> {
    file_ctx.imports.get(short_name).and_then(|v| v.first()).map(|i| i.kind)
}
