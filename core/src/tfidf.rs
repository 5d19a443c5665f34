//! Term frequency counts, document frequencies and the TF-IDF weighting
//! `tf * log2(N / df)` built from them.

use crate::{Dictionary, Error, Result, SparseVector, TermId};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// `log2(num_docs / df)`; 0 for a term no document contains.
pub fn idf(num_docs: u32, df: u32) -> f64 {
    if df == 0 || num_docs == 0 {
        return 0.0;
    }
    (num_docs as f64 / df as f64).log2()
}

/// Raw counts, one sparse row per document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermFrequencyMatrix {
    rows: Vec<SparseVector<u32>>,
    vocab_size: usize,
}

impl TermFrequencyMatrix {
    pub fn num_docs(&self) -> u32 {
        self.rows.len() as u32
    }

    pub fn vocab_size(&self) -> usize {
        self.vocab_size
    }

    pub fn row(&self, doc_id: u32) -> Option<&SparseVector<u32>> {
        self.rows.get(doc_id as usize)
    }

    pub fn rows(&self) -> &[SparseVector<u32>] {
        &self.rows
    }
}

/// Number of documents containing each term, indexed by term id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentFrequency(Vec<u32>);

impl DocumentFrequency {
    /// Wraps counts loaded from disk; each must fit the collection size.
    pub fn from_counts(counts: Vec<u32>, num_docs: u32) -> Result<Self> {
        if let Some((term_id, df)) = counts.iter().enumerate().find(|(_, &df)| df > num_docs) {
            return Err(Error::CorpusInconsistency(format!(
                "term {term_id} has df {df}, collection has {num_docs} documents"
            )));
        }
        Ok(DocumentFrequency(counts))
    }

    pub fn get(&self, term_id: TermId) -> u32 {
        self.0.get(term_id as usize).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }

    /// IDF per term id, frozen for query vectorization.
    pub fn idf(&self, num_docs: u32) -> Vec<f64> {
        self.0.iter().map(|&df| idf(num_docs, df)).collect()
    }

    /// `(term_id, df)` by descending df, ties by ascending term id.
    pub fn ranked(&self) -> Vec<(TermId, u32)> {
        let mut out: Vec<(TermId, u32)> = self.0.iter().enumerate().map(|(t, &df)| (t as TermId, df)).collect();
        out.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        out
    }
}

/// Weighted rows; every stored weight is nonzero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TfIdfMatrix {
    rows: Vec<SparseVector>,
    vocab_size: usize,
}

impl TfIdfMatrix {
    /// Wraps rows loaded from disk; each must span `vocab_size` terms.
    pub fn from_rows(rows: Vec<SparseVector>, vocab_size: usize) -> Result<Self> {
        if let Some((doc_id, row)) = rows.iter().enumerate().find(|(_, r)| r.dim() != vocab_size) {
            return Err(Error::CorpusInconsistency(format!(
                "tf-idf row {doc_id} spans {} terms, dictionary has {vocab_size}",
                row.dim()
            )));
        }
        Ok(TfIdfMatrix { rows, vocab_size })
    }

    pub fn num_docs(&self) -> u32 {
        self.rows.len() as u32
    }

    pub fn vocab_size(&self) -> usize {
        self.vocab_size
    }

    pub fn row(&self, doc_id: u32) -> Option<&SparseVector> {
        self.rows.get(doc_id as usize)
    }

    pub fn rows(&self) -> &[SparseVector] {
        &self.rows
    }
}

pub struct TfIdfBuilder;

impl TfIdfBuilder {
    /// Counts terms per document in parallel; DF is then accumulated once
    /// per distinct term per document.
    pub fn build<T>(documents: &[Vec<T>], dictionary: &Dictionary) -> Result<(TermFrequencyMatrix, DocumentFrequency)>
    where
        T: AsRef<str> + Sync,
    {
        let vocab_size = dictionary.len();
        let rows: Vec<SparseVector<u32>> = documents
            .par_iter()
            .map(|doc| {
                let mut ids = dictionary.resolve_document(doc)?;
                ids.sort_unstable();
                let mut counts: Vec<(TermId, u32)> = Vec::new();
                for id in ids {
                    match counts.last_mut() {
                        Some((last, n)) if *last == id => *n += 1,
                        _ => counts.push((id, 1)),
                    }
                }
                Ok(SparseVector::from_sorted(vocab_size, counts))
            })
            .collect::<Result<_>>()?;

        let mut df = vec![0u32; vocab_size];
        for row in &rows {
            for (term_id, _) in row.iter() {
                df[term_id as usize] += 1;
            }
        }

        tracing::debug!(num_docs = rows.len(), vocab_size, "counted term frequencies");
        Ok((TermFrequencyMatrix { rows, vocab_size }, DocumentFrequency(df)))
    }

    /// Applies `tf * log2(num_docs / df)` to every stored count. Cells whose
    /// weight is zero, including terms present in every document, are dropped.
    pub fn compute_tfidf(tf: &TermFrequencyMatrix, df: &DocumentFrequency, num_docs: u32) -> Result<TfIdfMatrix> {
        if tf.num_docs() != num_docs {
            return Err(Error::CorpusInconsistency(format!(
                "tf matrix has {} rows, expected {num_docs}",
                tf.num_docs()
            )));
        }
        if df.len() != tf.vocab_size {
            return Err(Error::CorpusInconsistency(format!(
                "df vector has {} terms, tf matrix has {}",
                df.len(),
                tf.vocab_size
            )));
        }
        let idfs = df.idf(num_docs);
        let rows = tf
            .rows
            .par_iter()
            .enumerate()
            .map(|(doc_id, row)| {
                let mut weighted = Vec::with_capacity(row.nnz());
                for (term_id, count) in row.iter() {
                    if df.get(term_id) == 0 {
                        return Err(Error::CorpusInconsistency(format!(
                            "document {doc_id} contains term {term_id} whose df is 0"
                        )));
                    }
                    weighted.push((term_id, count as f64 * idfs[term_id as usize]));
                }
                Ok(SparseVector::from_sorted(tf.vocab_size, weighted))
            })
            .collect::<Result<_>>()?;
        Ok(TfIdfMatrix { rows, vocab_size: tf.vocab_size })
    }
}
