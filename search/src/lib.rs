use anyhow::{Context, Result};
use lexis_core::persist::{self, IndexPaths};
use lexis_core::tokenizer::tokenize;
use lexis_core::{ArtifactPaths, DocId, ScoredDoc, SearchIndex};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

/// Typing this instead of a query leaves the console.
pub const EXIT_COMMAND: &str = "-1";

/// A loaded index plus optional document provenance for display.
pub struct Searcher {
    pub index: SearchIndex,
    sources: Option<Vec<String>>,
    raw_dir: Option<PathBuf>,
}

impl Searcher {
    pub fn new(index: SearchIndex, sources: Option<Vec<String>>, raw_dir: Option<PathBuf>) -> Self {
        Self { index, sources, raw_dir }
    }

    /// Loads text artifacts; `sources` is read only when the file exists.
    pub fn open(artifacts: &ArtifactPaths, sources: Option<&Path>, raw_dir: Option<PathBuf>) -> Result<Self> {
        let index = SearchIndex::load_artifacts(artifacts).context("loading index artifacts")?;
        let sources = match sources.filter(|p| p.exists()) {
            Some(path) => Some(persist::load_doc_sources(path)?),
            None => None,
        };
        Ok(Self::new(index, sources, raw_dir))
    }

    pub fn open_dir(paths: &IndexPaths, raw_dir: Option<PathBuf>) -> Result<Self> {
        Self::open(&ArtifactPaths::from(paths), Some(&paths.doc_sources()), raw_dir)
    }

    pub fn source(&self, doc_id: DocId) -> Option<&str> {
        self.sources.as_ref()?.get(doc_id as usize).map(String::as_str)
    }

    /// Matching doc ids, ascending.
    pub fn boolean(&self, query: &str) -> Result<Vec<DocId>> {
        Ok(self.index.boolean(query)?.into_vec())
    }

    pub fn ranked(&self, text: &str, k: usize) -> Vec<ScoredDoc> {
        self.index.top_k(&tokenize(text), k)
    }

    fn write_hit<W: Write>(&self, out: &mut W, hit: &ScoredDoc) -> Result<()> {
        writeln!(out, "document: {}", hit.doc_id)?;
        if let Some(source) = self.source(hit.doc_id) {
            writeln!(out, "source: {source}")?;
        }
        writeln!(out, "score: {:.6}", hit.score)?;
        Ok(())
    }

    fn write_text<W: Write>(&self, out: &mut W, doc_id: DocId) -> Result<()> {
        let (Some(dir), Some(source)) = (&self.raw_dir, self.source(doc_id)) else {
            return Ok(());
        };
        match std::fs::read_to_string(dir.join(source)) {
            Ok(text) => writeln!(out, "---\n{}\n---", text.trim())?,
            Err(e) => tracing::warn!(doc_id, source, error = %e, "raw document unavailable"),
        }
        Ok(())
    }

    /// Prints the best match for every line read until EOF or [`EXIT_COMMAND`].
    pub fn console<R: BufRead, W: Write>(&self, input: R, mut out: W) -> Result<()> {
        let mut lines = input.lines();
        loop {
            write!(out, "query> ")?;
            out.flush()?;
            let Some(line) = lines.next() else { break };
            let line = line?;
            let query = line.trim();
            if query == EXIT_COMMAND {
                break;
            }
            if query.is_empty() {
                continue;
            }
            writeln!(out, "query: {query}")?;
            match self.index.best_match(&tokenize(query)) {
                Some(hit) => {
                    self.write_hit(&mut out, &hit)?;
                    self.write_text(&mut out, hit.doc_id)?;
                }
                None => writeln!(out, "no documents indexed")?,
            }
        }
        Ok(())
    }

    pub fn print_ranked<W: Write>(&self, out: &mut W, hits: &[ScoredDoc]) -> Result<()> {
        for hit in hits {
            match self.source(hit.doc_id) {
                Some(source) => writeln!(out, "{}\t{:.6}\t{source}", hit.doc_id, hit.score)?,
                None => writeln!(out, "{}\t{:.6}", hit.doc_id, hit.score)?,
            }
        }
        Ok(())
    }
}
