use anyhow::{Context, Result};
use lexis_core::persist::{save_dictionary, save_doc_sources, save_documents, IndexPaths};
use lexis_core::tokenizer::tokenize;
use lexis_core::{persist, Dictionary, SearchIndex};
use serde::Deserialize;
use walkdir::WalkDir;

use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
struct InputDoc {
    id: String,
    body: String,
    url: Option<String>,
}

/// Token lists in document id order, with where each document came from.
#[derive(Debug, Default)]
pub struct TokenizedCorpus {
    pub documents: Vec<Vec<String>>,
    pub sources: Vec<String>,
}

impl TokenizedCorpus {
    fn push(&mut self, source: String, text: &str) {
        self.documents.push(tokenize(text));
        self.sources.push(source);
    }
}

/// `.txt`, `.json` and `.jsonl` files under `input`, in file name order.
pub fn collect_inputs(input: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    if input.is_dir() {
        for entry in WalkDir::new(input).sort_by_file_name().into_iter().filter_map(|e| e.ok()) {
            let p = entry.path();
            if p.is_file() {
                if let Some(ext) = p.extension().and_then(|s| s.to_str()) {
                    if matches!(ext, "txt" | "json" | "jsonl") {
                        files.push(p.to_path_buf());
                    }
                }
            }
        }
    } else if input.is_file() {
        files.push(input.to_path_buf());
    } else {
        anyhow::bail!("input {} does not exist", input.display());
    }
    Ok(files)
}

/// Reads raw documents and tokenizes them. A `.txt` file is one document;
/// JSON files hold one object or an array of `{id, body, url}` objects, and
/// JSONL files one object per line.
pub fn tokenize_corpus(input: &Path) -> Result<TokenizedCorpus> {
    let mut corpus = TokenizedCorpus::default();
    for file in collect_inputs(input)? {
        match file.extension().and_then(|s| s.to_str()) {
            Some("jsonl") => read_jsonl(&file, &mut corpus)?,
            Some("json") => read_json(&file, &mut corpus)?,
            _ => {
                let text = fs::read_to_string(&file).with_context(|| format!("reading {}", file.display()))?;
                let rel = file.strip_prefix(input).ok().filter(|p| !p.as_os_str().is_empty());
                let source = rel.unwrap_or(file.as_path()).display().to_string();
                corpus.push(source, &text);
            }
        }
    }
    tracing::info!(num_docs = corpus.documents.len(), "tokenized documents");
    Ok(corpus)
}

fn read_jsonl(file: &Path, corpus: &mut TokenizedCorpus) -> Result<()> {
    let reader = BufReader::new(File::open(file)?);
    for (n, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() { continue; }
        let doc: InputDoc = serde_json::from_str(&line).with_context(|| format!("{}:{}", file.display(), n + 1))?;
        corpus.push(doc.url.unwrap_or(doc.id), &doc.body);
    }
    Ok(())
}

fn read_json(file: &Path, corpus: &mut TokenizedCorpus) -> Result<()> {
    let reader = BufReader::new(File::open(file)?);
    let json: serde_json::Value = serde_json::from_reader(reader).with_context(|| format!("parsing {}", file.display()))?;
    let docs = match json {
        serde_json::Value::Array(arr) => arr,
        obj @ serde_json::Value::Object(_) => vec![obj],
        _ => {
            tracing::warn!(file = %file.display(), "skipping json file without document objects");
            Vec::new()
        }
    };
    for v in docs {
        let doc: InputDoc = serde_json::from_value(v)?;
        corpus.push(doc.url.unwrap_or(doc.id), &doc.body);
    }
    Ok(())
}

/// Writes `documents.txt`, `dict.txt` (first-seen order) and `index.txt`.
pub fn write_tokenized(corpus: &TokenizedCorpus, out: &IndexPaths) -> Result<()> {
    let dict = Dictionary::build(&corpus.documents);
    save_documents(&out.documents(), &corpus.documents)?;
    save_dictionary(&out.dictionary(), &dict)?;
    save_doc_sources(&out.doc_sources(), &corpus.sources)?;
    tracing::info!(num_docs = corpus.documents.len(), num_terms = dict.len(), root = %out.root.display(), "wrote tokenized corpus");
    Ok(())
}

/// Builds every artifact from a tokenized documents file. With `dictionary`,
/// ids come from that file instead of first appearance in the documents.
pub fn build_index(documents: &Path, dictionary: Option<&Path>, out: &IndexPaths) -> Result<SearchIndex> {
    let docs = persist::load_documents(documents).with_context(|| format!("loading {}", documents.display()))?;
    let index = match dictionary {
        Some(path) => {
            let dict = persist::load_dictionary(path).with_context(|| format!("loading {}", path.display()))?;
            SearchIndex::build_with_dictionary(&docs, dict)?
        }
        None => SearchIndex::build(&docs)?,
    };
    let created_at = time::OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_else(|_| "".into());
    index.save(out, created_at)?;
    tracing::info!(output = %out.root.display(), "index build complete");
    Ok(index)
}
