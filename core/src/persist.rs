//! Line-oriented text artifacts shared with the rest of the pipeline, plus the
//! JSON meta file and a bincode snapshot for fast loading.

use crate::{Dictionary, DocId, DocumentFrequency, Error, InvertedIndex, Result, SparseVector, TfIdfMatrix};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs::{create_dir_all, File};
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

/// Separates a term from its weight inside one TF-IDF group.
pub const TFIDF_SEP: &str = "~~~";

pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetaFile {
    pub num_docs: u32,
    pub vocab_size: usize,
    pub created_at: String,
    pub version: u32,
}

/// File layout of an index directory.
#[derive(Debug, Clone)]
pub struct IndexPaths {
    pub root: PathBuf,
}

impl IndexPaths {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }
    pub fn dictionary(&self) -> PathBuf { self.root.join("dict.txt") }
    pub fn documents(&self) -> PathBuf { self.root.join("documents.txt") }
    pub fn inverted_index(&self) -> PathBuf { self.root.join("inv_index.txt") }
    pub fn df(&self) -> PathBuf { self.root.join("df.txt") }
    pub fn tfidf(&self) -> PathBuf { self.root.join("tf_idf.txt") }
    pub fn doc_sources(&self) -> PathBuf { self.root.join("index.txt") }
    pub fn meta(&self) -> PathBuf { self.root.join("meta.json") }
    pub fn snapshot(&self) -> PathBuf { self.root.join("snapshot.bin") }
}

fn create(path: &Path) -> Result<BufWriter<File>> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        create_dir_all(dir)?;
    }
    Ok(BufWriter::new(File::create(path)?))
}

/// Yields `(1-based line number, line)`.
fn read_lines(path: &Path) -> Result<impl Iterator<Item = (usize, std::io::Result<String>)>> {
    let f = File::open(path)?;
    Ok(BufReader::new(f).lines().enumerate().map(|(i, l)| (i + 1, l)))
}

pub fn save_dictionary(path: &Path, dict: &Dictionary) -> Result<()> {
    let mut w = create(path)?;
    for term in dict.terms() {
        writeln!(w, "{term}")?;
    }
    w.flush()?;
    Ok(())
}

pub fn load_dictionary(path: &Path) -> Result<Dictionary> {
    let mut terms = Vec::new();
    for (n, line) in read_lines(path)? {
        let line = line?;
        let term = line.trim();
        if term.is_empty() || term.contains(char::is_whitespace) {
            return Err(Error::parse(path, n, format!("invalid term {line:?}")));
        }
        terms.push(term.to_string());
    }
    Dictionary::from_terms(terms)
}

pub fn save_documents<T: AsRef<str>>(path: &Path, documents: &[Vec<T>]) -> Result<()> {
    let mut w = create(path)?;
    for doc in documents {
        let line: Vec<&str> = doc.iter().map(AsRef::as_ref).collect();
        writeln!(w, "{}", line.join(" "))?;
    }
    w.flush()?;
    Ok(())
}

/// One document per line; an empty line is a document without tokens.
pub fn load_documents(path: &Path) -> Result<Vec<Vec<String>>> {
    let mut docs = Vec::new();
    for (_, line) in read_lines(path)? {
        docs.push(line?.split_whitespace().map(str::to_string).collect());
    }
    Ok(docs)
}

pub fn save_inverted_index(path: &Path, index: &InvertedIndex) -> Result<()> {
    let mut w = create(path)?;
    for postings in index.iter() {
        let ids: Vec<String> = postings.iter().map(|d| d.to_string()).collect();
        writeln!(w, "{}", ids.join(" "))?;
    }
    w.flush()?;
    Ok(())
}

pub fn load_inverted_index(path: &Path, num_docs: u32) -> Result<InvertedIndex> {
    let mut postings = Vec::new();
    for (n, line) in read_lines(path)? {
        let ids = line?
            .split_whitespace()
            .map(|s| s.parse::<DocId>().map_err(|e| Error::parse(path, n, format!("doc id {s:?}: {e}"))))
            .collect::<Result<Vec<_>>>()?;
        postings.push(ids);
    }
    InvertedIndex::from_postings(postings, num_docs)
}

/// Writes `<term>\t<df>` lines by descending df.
pub fn save_df(path: &Path, df: &DocumentFrequency, dict: &Dictionary) -> Result<()> {
    let mut w = create(path)?;
    for (term_id, count) in df.ranked() {
        let term = dict
            .term(term_id)
            .ok_or_else(|| Error::CorpusInconsistency(format!("df term id {term_id} not in dictionary")))?;
        writeln!(w, "{term}\t{count}")?;
    }
    w.flush()?;
    Ok(())
}

/// Reads a DF file back into term id order. Every dictionary term must be listed once.
pub fn load_df(path: &Path, dict: &Dictionary, num_docs: u32) -> Result<DocumentFrequency> {
    let mut counts: Vec<Option<u32>> = vec![None; dict.len()];
    for (n, line) in read_lines(path)? {
        let line = line?;
        let (term, count) = line
            .split_once('\t')
            .ok_or_else(|| Error::parse(path, n, "expected <term>\\t<df>"))?;
        let count: u32 = count.trim().parse().map_err(|e| Error::parse(path, n, format!("df {count:?}: {e}")))?;
        let term_id = dict
            .get(term)
            .ok_or_else(|| Error::CorpusInconsistency(format!("df file term {term:?} not in dictionary")))?;
        if counts[term_id as usize].replace(count).is_some() {
            return Err(Error::CorpusInconsistency(format!("df file lists {term:?} twice")));
        }
    }
    let counts = counts
        .into_iter()
        .enumerate()
        .map(|(id, c)| {
            c.ok_or_else(|| Error::CorpusInconsistency(format!("df file is missing term id {id}")))
        })
        .collect::<Result<Vec<_>>>()?;
    DocumentFrequency::from_counts(counts, num_docs)
}

/// One line per document of space-separated `<term>~~~<weight>` groups.
pub fn save_tfidf(path: &Path, matrix: &TfIdfMatrix, dict: &Dictionary) -> Result<()> {
    let mut w = create(path)?;
    for row in matrix.rows() {
        let mut groups = Vec::with_capacity(row.nnz());
        for (term_id, weight) in row.iter() {
            let term = dict
                .term(term_id)
                .ok_or_else(|| Error::CorpusInconsistency(format!("tf-idf term id {term_id} not in dictionary")))?;
            groups.push(format!("{term}{TFIDF_SEP}{weight}"));
        }
        writeln!(w, "{}", groups.join(" "))?;
    }
    w.flush()?;
    Ok(())
}

pub fn load_tfidf(path: &Path, dict: &Dictionary) -> Result<TfIdfMatrix> {
    let mut rows = Vec::new();
    for (n, line) in read_lines(path)? {
        let line = line?;
        let mut entries = Vec::new();
        for group in line.split_whitespace() {
            let (term, weight) = group
                .rsplit_once(TFIDF_SEP)
                .ok_or_else(|| Error::parse(path, n, format!("group {group:?} lacks {TFIDF_SEP:?}")))?;
            let weight: f64 = weight.parse().map_err(|e| Error::parse(path, n, format!("weight {weight:?}: {e}")))?;
            if !weight.is_finite() || weight < 0.0 {
                return Err(Error::parse(path, n, format!("weight {weight} for {term:?} is not a finite non-negative number")));
            }
            let term_id = dict
                .get(term)
                .ok_or_else(|| Error::CorpusInconsistency(format!("tf-idf term {term:?} not in dictionary")))?;
            entries.push((term_id, weight));
        }
        let row = SparseVector::from_entries(dict.len(), entries)
            .ok_or_else(|| Error::parse(path, n, "term listed twice in one document"))?;
        rows.push(row);
    }
    TfIdfMatrix::from_rows(rows, dict.len())
}

pub fn save_doc_sources(path: &Path, sources: &[String]) -> Result<()> {
    let mut w = create(path)?;
    for (doc_id, source) in sources.iter().enumerate() {
        writeln!(w, "{doc_id}\t{source}")?;
    }
    w.flush()?;
    Ok(())
}

/// Reads `<doc_id>\t<source>` lines; ids must run 0, 1, 2, ...
pub fn load_doc_sources(path: &Path) -> Result<Vec<String>> {
    let mut sources = Vec::new();
    for (n, line) in read_lines(path)? {
        let line = line?;
        let (id, source) = line
            .split_once('\t')
            .ok_or_else(|| Error::parse(path, n, "expected <doc_id>\\t<source>"))?;
        if id.trim().parse::<usize>().ok() != Some(sources.len()) {
            return Err(Error::parse(path, n, format!("expected doc id {}, found {id:?}", sources.len())));
        }
        sources.push(source.to_string());
    }
    Ok(sources)
}

pub fn save_meta(path: &Path, meta: &MetaFile) -> Result<()> {
    let mut f = create(path)?;
    let json = serde_json::to_string_pretty(meta)?;
    f.write_all(json.as_bytes())?;
    f.flush()?;
    Ok(())
}

pub fn load_meta(path: &Path) -> Result<MetaFile> {
    let mut f = File::open(path)?;
    let mut buf = String::new();
    f.read_to_string(&mut buf)?;
    let meta: MetaFile = serde_json::from_str(&buf)?;
    Ok(meta)
}

pub(crate) fn save_bincode<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let mut f = create(path)?;
    let bytes = bincode::serialize(value)?;
    f.write_all(&bytes)?;
    f.flush()?;
    Ok(())
}

pub(crate) fn load_bincode<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let mut f = File::open(path)?;
    let mut buf = Vec::new();
    f.read_to_end(&mut buf)?;
    Ok(bincode::deserialize(&buf)?)
}

/// Line count of a file; used to infer the collection size from the TF-IDF file.
pub fn count_lines(path: &Path) -> Result<u32> {
    let mut n = 0u32;
    for (_, line) in read_lines(path)? {
        line?;
        n += 1;
    }
    Ok(n)
}
