//! Boolean query language: a `|`-separated disjunction of `^`-separated
//! conjunctions, each literal optionally negated with a leading `~`.
//!
//! ```text
//! query    := disjunct ('|' disjunct)*
//! disjunct := literal ('^' literal)*
//! literal  := ['~'] term
//! ```

use crate::{Dictionary, DocSet, Error, InvertedIndex, Result, SetOperation, TermId};
use std::fmt;

pub const OR: char = '|';
pub const AND: char = '^';
pub const NOT: char = '~';

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Literal {
    pub term: String,
    pub negated: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conjunction(pub Vec<Literal>);

/// Parsed query, not yet tied to a dictionary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BooleanQuery {
    pub disjuncts: Vec<Conjunction>,
}

impl BooleanQuery {
    pub fn parse(input: &str) -> Result<Self> {
        if input.trim().is_empty() {
            return Err(Error::InvalidQuery("empty query".into()));
        }
        let disjuncts = input
            .split(OR)
            .map(|disjunct| {
                if disjunct.trim().is_empty() {
                    return Err(Error::InvalidQuery(format!("empty conjunct in {input:?}")));
                }
                disjunct.split(AND).map(parse_literal).collect::<Result<Vec<_>>>().map(Conjunction)
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(BooleanQuery { disjuncts })
    }

    /// Resolves every literal to a term id. Any unknown term fails the query.
    pub fn resolve(&self, dictionary: &Dictionary) -> Result<ResolvedQuery> {
        let disjuncts = self
            .disjuncts
            .iter()
            .map(|conj| {
                conj.0
                    .iter()
                    .map(|lit| Ok(SignedTerm { term_id: dictionary.lookup(&lit.term)?, negated: lit.negated }))
                    .collect::<Result<Vec<_>>>()
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(ResolvedQuery { disjuncts })
    }
}

fn parse_literal(raw: &str) -> Result<Literal> {
    let raw = raw.trim();
    let (negated, term) = match raw.strip_prefix(NOT) {
        Some(rest) => (true, rest),
        None => (false, raw),
    };
    if term.is_empty() {
        return Err(Error::InvalidQuery(format!("literal {raw:?} has no term")));
    }
    if let Some(bad) = term.chars().find(|c| *c == NOT || c.is_whitespace()) {
        return Err(Error::InvalidQuery(format!("unexpected {bad:?} in literal {raw:?}")));
    }
    Ok(Literal { term: term.to_string(), negated })
}

impl fmt::Display for BooleanQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, conj) in self.disjuncts.iter().enumerate() {
            if i > 0 {
                write!(f, "{OR}")?;
            }
            for (j, lit) in conj.0.iter().enumerate() {
                if j > 0 {
                    write!(f, "{AND}")?;
                }
                if lit.negated {
                    write!(f, "{NOT}")?;
                }
                f.write_str(&lit.term)?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignedTerm {
    pub term_id: TermId,
    pub negated: bool,
}

/// Query whose literals are term ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedQuery {
    pub disjuncts: Vec<Vec<SignedTerm>>,
}

impl ResolvedQuery {
    pub fn evaluate(&self, index: &InvertedIndex) -> Result<DocSet> {
        let num_docs = index.num_docs();
        let mut conjunct_sets = Vec::with_capacity(self.disjuncts.len());
        for conj in &self.disjuncts {
            let literal_sets = conj
                .iter()
                .map(|lit| {
                    let postings = index.postings(lit.term_id)?;
                    Ok(if lit.negated { postings.complement(num_docs) } else { postings.clone() })
                })
                .collect::<Result<Vec<_>>>()?;
            let matched = SetOperation::Intersection
                .combine(literal_sets)
                .ok_or_else(|| Error::InvalidQuery("empty conjunct".into()))?;
            conjunct_sets.push(matched);
        }
        SetOperation::Union.combine(conjunct_sets).ok_or_else(|| Error::InvalidQuery("empty query".into()))
    }
}

/// Parses, resolves and evaluates `query` in one step.
pub fn evaluate(query: &str, dictionary: &Dictionary, index: &InvertedIndex) -> Result<DocSet> {
    let parsed = BooleanQuery::parse(query)?;
    let result = parsed.resolve(dictionary)?.evaluate(index)?;
    tracing::debug!(query = %parsed, hits = result.len(), "boolean query evaluated");
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InvertedIndexBuilder;

    fn fixture() -> (Dictionary, InvertedIndex) {
        let corpus: Vec<Vec<&str>> = vec![vec!["кот", "собака"], vec!["собака"], vec!["кот", "кот"]];
        let dict = Dictionary::build(&corpus);
        let index = InvertedIndexBuilder::build(&corpus, &dict).unwrap();
        (dict, index)
    }

    #[test]
    fn parses_two_levels() {
        let q = BooleanQuery::parse("a^~b|c").unwrap();
        assert_eq!(q.disjuncts.len(), 2);
        assert_eq!(q.disjuncts[0].0[1], Literal { term: "b".into(), negated: true });
        assert_eq!(q.to_string(), "a^~b|c");
    }

    #[test]
    fn whitespace_around_literals_is_ignored() {
        assert_eq!(BooleanQuery::parse(" a ^ ~b ").unwrap(), BooleanQuery::parse("a^~b").unwrap());
    }

    #[test]
    fn malformed_queries_are_rejected() {
        for bad in ["", "   ", "a|", "|a", "a^", "a^^b", "~", "a~b", "~~a", "a b"] {
            assert!(matches!(BooleanQuery::parse(bad), Err(Error::InvalidQuery(_))), "{bad:?}");
        }
    }

    #[test]
    fn present_and_absent_terms() {
        let (dict, index) = fixture();
        assert_eq!(evaluate("кот^~собака", &dict, &index).unwrap().as_slice(), &[2]);
        assert_eq!(evaluate("кот|собака", &dict, &index).unwrap().as_slice(), &[0, 1, 2]);
        assert_eq!(evaluate("~кот", &dict, &index).unwrap().as_slice(), &[1]);
        assert!(evaluate("~кот^~собака", &dict, &index).unwrap().is_empty());
    }

    #[test]
    fn unknown_literal_fails_the_query() {
        let (dict, index) = fixture();
        assert!(matches!(evaluate("кот|мышь", &dict, &index), Err(Error::UnknownTerm(t)) if t == "мышь"));
        assert!(matches!(evaluate("кот^~мышь", &dict, &index), Err(Error::UnknownTerm(t)) if t == "мышь"));
    }
}
