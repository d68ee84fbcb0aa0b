//! Tree-sitter parsing facade.
//!
//! `tree_sitter::Parser` is not `Sync` (and is only soundly used from a
//! single thread at a time), so rather than the teacher's channel-backed
//! `ParserPool` — built to ferry parses across `tokio` task boundaries — each
//! `rayon` worker thread keeps its own parser in a `thread_local!`. There is
//! no async runtime in this pipeline, so the extra indirection of a
//! dedicated parser-thread pool buys nothing here.

use std::cell::RefCell;
use std::path::Path;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use tree_sitter::{Language, Parser, Tree};

thread_local! {
    static PARSER: RefCell<Option<Parser>> = const { RefCell::new(None) };
}

/// Parse `source` with `language`, reusing this worker thread's cached
/// `Parser` instance across calls.
pub fn parse(language: Language, source: &[u8]) -> Result<Arc<Tree>> {
    PARSER.with(|cell| {
        let mut slot = cell.borrow_mut();
        let parser = slot.get_or_insert_with(Parser::new);
        parser
            .set_language(&language)
            .map_err(|e| anyhow!("failed to set grammar: {e}"))?;
        parser
            .parse(source, None)
            .map(Arc::new)
            .ok_or_else(|| anyhow!("tree-sitter failed to produce a parse tree"))
    })
}

/// Dump a tree as an S-expression, either the single-line `tree.root_node().to_sexp()`
/// form or an indented one for `--format-ast`.
pub fn dump_sexp(tree: &Tree, indent: bool) -> String {
    if indent {
        let mut out = String::new();
        write_indented(&mut out, tree.root_node(), 0);
        out
    } else {
        tree.root_node().to_sexp()
    }
}

fn write_indented<W: std::fmt::Write>(out: &mut W, node: tree_sitter::Node, depth: usize) {
    let pad = "  ".repeat(depth);
    let _ = writeln!(out, "{pad}({}", node.kind());
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        write_indented(out, child, depth + 1);
    }
    let _ = writeln!(out, "{pad})");
}

/// Read a file's bytes and log+propagate I/O errors with the path attached.
pub fn read_source(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|e| anyhow!("reading {}: {e}", path.display()))
}
