//! Pipeline-wide run configuration, threaded from the CLI into
//! `coordinator::run`. Distinct from the CLI's own `clap` arg struct (out of
//! scope per the core's spec): this is the narrow slice the orchestrator
//! actually needs, so the core stays testable without a `clap` dependency.

use std::path::PathBuf;

/// Which flavor of S-expression dump the parser facade writes alongside a
/// source file when AST dumping is requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AstDumpMode {
    /// `tree.root_node().to_sexp()`, one line.
    Compact,
    /// Two-space indented, one node per line.
    Indented,
}

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Language tag looked up in the `LanguageRegistry` (e.g. `"java"`).
    pub language: String,
    /// Project root every element and relation path is relativized against.
    pub root: PathBuf,
    /// Size of the `rayon` thread pool used for both phases.
    pub jobs: usize,
    /// When set, each parsed file also gets a `.ast`/`.ast.txt` sibling dump.
    pub dump_ast: Option<AstDumpMode>,
}

impl PipelineConfig {
    pub fn new(language: impl Into<String>, root: PathBuf) -> Self {
        PipelineConfig {
            language: language.into(),
            root,
            jobs: 4,
            dump_ast: None,
        }
    }

    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs.max(1);
        self
    }

    pub fn with_dump_ast(mut self, mode: AstDumpMode) -> Self {
        self.dump_ast = Some(mode);
        self
    }
}
