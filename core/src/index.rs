use crate::{Dictionary, DocId, DocSet, Error, Result, TermId};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Posting sets indexed by term id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvertedIndex {
    postings: Vec<DocSet>,
    num_docs: u32,
}

impl InvertedIndex {
    /// Wraps externally supplied postings, checking every doc id against `num_docs`.
    pub fn from_postings(postings: Vec<Vec<DocId>>, num_docs: u32) -> Result<Self> {
        let mut sets = Vec::with_capacity(postings.len());
        for (term_id, ids) in postings.into_iter().enumerate() {
            if let Some(&bad) = ids.iter().find(|&&d| d >= num_docs) {
                return Err(Error::CorpusInconsistency(format!(
                    "term {term_id} lists document {bad}, collection has {num_docs}"
                )));
            }
            sets.push(DocSet::from_unsorted(ids));
        }
        Ok(InvertedIndex { postings: sets, num_docs })
    }

    pub fn postings(&self, term_id: TermId) -> Result<&DocSet> {
        self.postings.get(term_id as usize).ok_or_else(|| {
            Error::CorpusInconsistency(format!(
                "term id {term_id} outside index of {} terms",
                self.postings.len()
            ))
        })
    }

    pub fn num_docs(&self) -> u32 {
        self.num_docs
    }

    pub fn vocab_size(&self) -> usize {
        self.postings.len()
    }

    /// Posting sets in term id order.
    pub fn iter(&self) -> impl Iterator<Item = &DocSet> {
        self.postings.iter()
    }

    /// Checks the index covers exactly `vocab_size` terms and `num_docs` documents.
    pub fn validate(&self, vocab_size: usize, num_docs: u32) -> Result<()> {
        if self.postings.len() != vocab_size {
            return Err(Error::CorpusInconsistency(format!(
                "inverted index has {} terms, dictionary has {vocab_size}",
                self.postings.len()
            )));
        }
        if self.num_docs != num_docs {
            return Err(Error::CorpusInconsistency(format!(
                "inverted index covers {} documents, expected {num_docs}",
                self.num_docs
            )));
        }
        Ok(())
    }
}

pub struct InvertedIndexBuilder;

impl InvertedIndexBuilder {
    /// Collapses each document to its distinct term ids in parallel, then
    /// appends doc ids to posting sets in document order.
    pub fn build<T>(documents: &[Vec<T>], dictionary: &Dictionary) -> Result<InvertedIndex>
    where
        T: AsRef<str> + Sync,
    {
        let per_doc: Vec<Vec<TermId>> = documents
            .par_iter()
            .map(|doc| {
                let mut ids = dictionary.resolve_document(doc)?;
                ids.sort_unstable();
                ids.dedup();
                Ok(ids)
            })
            .collect::<Result<_>>()?;

        let mut postings: Vec<Vec<DocId>> = vec![Vec::new(); dictionary.len()];
        for (doc_id, term_ids) in per_doc.into_iter().enumerate() {
            for term_id in term_ids {
                postings[term_id as usize].push(doc_id as DocId);
            }
        }

        let num_docs = documents.len() as u32;
        tracing::debug!(num_docs, num_terms = postings.len(), "built inverted index");
        Ok(InvertedIndex { postings: postings.into_iter().map(DocSet::from_sorted).collect(), num_docs })
    }
}
