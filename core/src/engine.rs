use crate::persist::{self, IndexPaths, MetaFile, FORMAT_VERSION};
use crate::{
    query, Dictionary, DocSet, DocumentFrequency, Error, InvertedIndex, InvertedIndexBuilder, QueryVectorizer, Ranker,
    Result, ScoredDoc, SparseVector, TfIdfBuilder, TfIdfMatrix,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The frozen artifacts of one corpus snapshot. Built once, then shared
/// read-only (typically behind an `Arc`) by any number of queries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchIndex {
    dictionary: Dictionary,
    index: InvertedIndex,
    df: DocumentFrequency,
    tfidf: TfIdfMatrix,
    idf: Vec<f64>,
}

/// Explicit artifact locations, for callers that do not use an index directory.
#[derive(Debug, Clone)]
pub struct ArtifactPaths {
    pub dictionary: PathBuf,
    pub inverted_index: PathBuf,
    pub df: PathBuf,
    pub tfidf: PathBuf,
    /// When absent or missing on disk, the collection size is the TF-IDF line count.
    pub meta: Option<PathBuf>,
}

impl From<&IndexPaths> for ArtifactPaths {
    fn from(paths: &IndexPaths) -> Self {
        ArtifactPaths {
            dictionary: paths.dictionary(),
            inverted_index: paths.inverted_index(),
            df: paths.df(),
            tfidf: paths.tfidf(),
            meta: Some(paths.meta()),
        }
    }
}

impl SearchIndex {
    /// Builds the dictionary from the documents, then every other artifact.
    pub fn build<T: AsRef<str> + Sync>(documents: &[Vec<T>]) -> Result<Self> {
        let dictionary = Dictionary::build(documents);
        Self::build_with_dictionary(documents, dictionary)
    }

    /// Builds against a dictionary supplied independently; it must cover every token.
    pub fn build_with_dictionary<T: AsRef<str> + Sync>(documents: &[Vec<T>], dictionary: Dictionary) -> Result<Self> {
        let num_docs = documents.len() as u32;
        let index = InvertedIndexBuilder::build(documents, &dictionary)?;
        let (tf, df) = TfIdfBuilder::build(documents, &dictionary)?;
        let tfidf = TfIdfBuilder::compute_tfidf(&tf, &df, num_docs)?;
        tracing::info!(num_docs, num_terms = dictionary.len(), "built search index");
        Self::assemble(dictionary, index, df, tfidf)
    }

    fn assemble(dictionary: Dictionary, index: InvertedIndex, df: DocumentFrequency, tfidf: TfIdfMatrix) -> Result<Self> {
        let num_docs = tfidf.num_docs();
        let vocab_size = dictionary.len();
        index.validate(vocab_size, num_docs)?;
        if df.len() != vocab_size || tfidf.vocab_size() != vocab_size {
            return Err(Error::CorpusInconsistency(format!(
                "dictionary has {vocab_size} terms, df has {}, tf-idf has {}",
                df.len(),
                tfidf.vocab_size()
            )));
        }
        for (term_id, postings) in index.iter().enumerate() {
            if postings.len() as u32 != df.get(term_id as u32) {
                return Err(Error::CorpusInconsistency(format!(
                    "term {term_id} is posted in {} documents but has df {}",
                    postings.len(),
                    df.get(term_id as u32)
                )));
            }
        }
        let idf = df.idf(num_docs);
        Ok(SearchIndex { dictionary, index, df, tfidf, idf })
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    pub fn inverted_index(&self) -> &InvertedIndex {
        &self.index
    }

    pub fn document_frequency(&self) -> &DocumentFrequency {
        &self.df
    }

    pub fn tfidf(&self) -> &TfIdfMatrix {
        &self.tfidf
    }

    pub fn idf(&self) -> &[f64] {
        &self.idf
    }

    pub fn num_docs(&self) -> u32 {
        self.tfidf.num_docs()
    }

    /// Evaluates a boolean query; unknown terms are an error.
    pub fn boolean(&self, query: &str) -> Result<DocSet> {
        query::evaluate(query, &self.dictionary, &self.index)
    }

    /// Unknown terms are dropped silently.
    pub fn vectorize<T: AsRef<str>>(&self, terms: &[T]) -> SparseVector {
        QueryVectorizer::vectorize(terms, &self.dictionary, &self.idf)
    }

    pub fn similarities<T: AsRef<str>>(&self, terms: &[T]) -> Vec<f64> {
        Ranker::similarities(&self.vectorize(terms), &self.tfidf)
    }

    pub fn top_k<T: AsRef<str>>(&self, terms: &[T], k: usize) -> Vec<ScoredDoc> {
        Ranker::top_k(&self.vectorize(terms), &self.tfidf, k)
    }

    pub fn best_match<T: AsRef<str>>(&self, terms: &[T]) -> Option<ScoredDoc> {
        Ranker::best_match(&self.vectorize(terms), &self.tfidf)
    }

    /// Writes every text artifact, `meta.json` and `snapshot.bin`.
    pub fn save(&self, paths: &IndexPaths, created_at: String) -> Result<()> {
        persist::save_dictionary(&paths.dictionary(), &self.dictionary)?;
        persist::save_inverted_index(&paths.inverted_index(), &self.index)?;
        persist::save_df(&paths.df(), &self.df, &self.dictionary)?;
        persist::save_tfidf(&paths.tfidf(), &self.tfidf, &self.dictionary)?;
        let meta = MetaFile {
            num_docs: self.num_docs(),
            vocab_size: self.dictionary.len(),
            created_at,
            version: FORMAT_VERSION,
        };
        persist::save_meta(&paths.meta(), &meta)?;
        self.save_snapshot(&paths.snapshot())
    }

    pub fn load(paths: &IndexPaths) -> Result<Self> {
        Self::load_artifacts(&ArtifactPaths::from(paths))
    }

    /// Loads the text artifacts, deriving IDF from the DF file.
    pub fn load_artifacts(paths: &ArtifactPaths) -> Result<Self> {
        let dictionary = persist::load_dictionary(&paths.dictionary)?;
        let tfidf = persist::load_tfidf(&paths.tfidf, &dictionary)?;
        let num_docs = match paths.meta.as_deref().filter(|p| p.exists()) {
            Some(meta_path) => {
                let meta = persist::load_meta(meta_path)?;
                if meta.num_docs != tfidf.num_docs() {
                    return Err(Error::CorpusInconsistency(format!(
                        "meta.json says {} documents, tf-idf file has {}",
                        meta.num_docs,
                        tfidf.num_docs()
                    )));
                }
                meta.num_docs
            }
            None => tfidf.num_docs(),
        };
        let index = persist::load_inverted_index(&paths.inverted_index, num_docs)?;
        let df = persist::load_df(&paths.df, &dictionary, num_docs)?;
        let loaded = Self::assemble(dictionary, index, df, tfidf)?;
        tracing::info!(num_docs, num_terms = loaded.dictionary.len(), "loaded search index");
        Ok(loaded)
    }

    pub fn save_snapshot(&self, path: &Path) -> Result<()> {
        persist::save_bincode(path, self)
    }

    /// Reads a bincode snapshot and re-checks the invariants it carries.
    pub fn load_snapshot(path: &Path) -> Result<Self> {
        let raw: SearchIndex = persist::load_bincode(path)?;
        Self::assemble(raw.dictionary, raw.index, raw.df, raw.tfidf)
    }
}
