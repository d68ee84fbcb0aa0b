//! Reads a file once and hands Phase 1 a parsed tree. The `FileContext` the
//! collector returns retains the same `Arc<Tree>`/`Arc<[u8]>` it was built
//! from, so Phase 2 re-reads them off the registered `FileContext` rather
//! than coming back through here — there is exactly one parse per file per
//! run.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use tree_sitter::{Language, Tree};

use crate::parser;

pub struct ParsedFile {
    pub path: PathBuf,
    pub source: Arc<[u8]>,
    pub tree: Arc<Tree>,
}

/// Read and parse `path` with `language`, using the calling thread's cached
/// `tree_sitter::Parser` (see `parser::parse`).
pub fn parse_file(language: Language, path: &Path) -> Result<ParsedFile> {
    let bytes = parser::read_source(path)?;
    let source: Arc<[u8]> = Arc::from(bytes.into_boxed_slice());
    let tree = parser::parse(language, &source)?;
    Ok(ParsedFile {
        path: path.to_path_buf(),
        source,
        tree,
    })
}
