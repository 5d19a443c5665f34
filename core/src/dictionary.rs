use crate::{Error, Result, TermId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Bijective term <-> id mapping. Ids are dense, start at 0 and follow the
/// order in which terms were first seen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dictionary {
    terms: Vec<String>,
    ids: HashMap<String, TermId>,
}

impl Dictionary {
    /// Scans documents in order and mints the next id for each unseen token.
    pub fn build<D, T>(documents: D) -> Self
    where
        D: IntoIterator,
        D::Item: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let mut dict = Dictionary::default();
        for doc in documents {
            for token in doc {
                let token = token.as_ref();
                if !dict.ids.contains_key(token) {
                    let id = dict.terms.len() as TermId;
                    dict.ids.insert(token.to_string(), id);
                    dict.terms.push(token.to_string());
                }
            }
        }
        dict
    }

    /// Builds from terms already in id order, e.g. the lines of a dictionary file.
    pub fn from_terms<I: IntoIterator<Item = String>>(terms: I) -> Result<Self> {
        let mut dict = Dictionary::default();
        for term in terms {
            let id = dict.terms.len() as TermId;
            if dict.ids.insert(term.clone(), id).is_some() {
                return Err(Error::CorpusInconsistency(format!("duplicate dictionary term {term:?}")));
            }
            dict.terms.push(term);
        }
        Ok(dict)
    }

    pub fn lookup(&self, term: &str) -> Result<TermId> {
        self.get(term).ok_or_else(|| Error::UnknownTerm(term.to_string()))
    }

    pub fn get(&self, term: &str) -> Option<TermId> {
        self.ids.get(term).copied()
    }

    pub fn term(&self, id: TermId) -> Option<&str> {
        self.terms.get(id as usize).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Terms in id order.
    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.terms.iter().map(String::as_str)
    }

    /// Maps a document's tokens to ids; every token must be known.
    pub(crate) fn resolve_document<T: AsRef<str>>(&self, tokens: &[T]) -> Result<Vec<TermId>> {
        tokens.iter().map(|t| self.lookup(t.as_ref())).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_follow_first_appearance() {
        let dict = Dictionary::build([vec!["b", "a"], vec!["c", "a", "b"]]);
        assert_eq!(dict.lookup("b").unwrap(), 0);
        assert_eq!(dict.lookup("a").unwrap(), 1);
        assert_eq!(dict.lookup("c").unwrap(), 2);
        assert_eq!(dict.term(2), Some("c"));
        assert_eq!(dict.len(), 3);
    }

    #[test]
    fn empty_corpus_gives_empty_dictionary() {
        let dict = Dictionary::build(Vec::<Vec<String>>::new());
        assert!(dict.is_empty());
        assert!(matches!(dict.lookup("x"), Err(Error::UnknownTerm(_))));
    }

    #[test]
    fn duplicate_terms_are_rejected() {
        let err = Dictionary::from_terms(vec!["a".to_string(), "a".to_string()]).unwrap_err();
        assert!(matches!(err, Error::CorpusInconsistency(_)));
    }
}
