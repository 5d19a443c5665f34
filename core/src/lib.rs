//! Boolean and TF-IDF vector-space retrieval over a fixed, pre-tokenized
//! document collection.

pub mod dictionary;
pub mod docset;
pub mod engine;
pub mod error;
pub mod index;
pub mod persist;
pub mod query;
pub mod ranker;
pub mod sparse;
pub mod tfidf;
pub mod tokenizer;

pub type TermId = u32;
pub type DocId = u32;

pub use dictionary::Dictionary;
pub use docset::{DocSet, SetOperation};
pub use engine::{ArtifactPaths, SearchIndex};
pub use error::{Error, Result};
pub use index::{InvertedIndex, InvertedIndexBuilder};
pub use query::BooleanQuery;
pub use ranker::{QueryVectorizer, Ranker, ScoredDoc};
pub use sparse::{cosine_similarity, SparseVector};
pub use tfidf::{DocumentFrequency, TermFrequencyMatrix, TfIdfBuilder, TfIdfMatrix};
