use crate::sparse::cosine_similarity;
use crate::{Dictionary, DocId, SparseVector, TermId, TfIdfMatrix};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoredDoc {
    pub doc_id: DocId,
    pub score: f64,
}

pub struct QueryVectorizer;

impl QueryVectorizer {
    /// Weights each known query term by its in-query count times its IDF.
    /// Terms missing from the dictionary are skipped without error.
    pub fn vectorize<T: AsRef<str>>(query_terms: &[T], dictionary: &Dictionary, idf: &[f64]) -> SparseVector {
        let mut counts: HashMap<TermId, u32> = HashMap::new();
        for term in query_terms {
            if let Some(id) = dictionary.get(term.as_ref()) {
                *counts.entry(id).or_insert(0) += 1;
            }
        }
        let mut entries: Vec<(TermId, f64)> = counts
            .into_iter()
            .map(|(id, n)| (id, n as f64 * idf.get(id as usize).copied().unwrap_or(0.0)))
            .collect();
        entries.sort_unstable_by_key(|(id, _)| *id);
        SparseVector::from_sorted(dictionary.len(), entries)
    }
}

pub struct Ranker;

impl Ranker {
    /// Cosine similarity of `query` against every document row, indexed by doc id.
    pub fn similarities(query: &SparseVector, matrix: &TfIdfMatrix) -> Vec<f64> {
        matrix.rows().par_iter().map(|row| cosine_similarity(query, row)).collect()
    }

    /// All documents, best first. Equal scores keep ascending doc id order.
    pub fn rank(query: &SparseVector, matrix: &TfIdfMatrix) -> Vec<ScoredDoc> {
        let mut scored: Vec<ScoredDoc> = Self::similarities(query, matrix)
            .into_iter()
            .enumerate()
            .map(|(doc_id, score)| ScoredDoc { doc_id: doc_id as DocId, score })
            .collect();
        scored.sort_by(by_score_then_id);
        scored
    }

    pub fn top_k(query: &SparseVector, matrix: &TfIdfMatrix, k: usize) -> Vec<ScoredDoc> {
        let mut ranked = Self::rank(query, matrix);
        ranked.truncate(k);
        ranked
    }

    /// Highest-scoring document, lowest id on ties. `None` for an empty collection.
    pub fn best_match(query: &SparseVector, matrix: &TfIdfMatrix) -> Option<ScoredDoc> {
        Self::similarities(query, matrix)
            .into_iter()
            .enumerate()
            .map(|(doc_id, score)| ScoredDoc { doc_id: doc_id as DocId, score })
            .min_by(by_score_then_id)
    }
}

fn by_score_then_id(a: &ScoredDoc, b: &ScoredDoc) -> Ordering {
    b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal).then(a.doc_id.cmp(&b.doc_id))
}
