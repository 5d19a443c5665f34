//! Sorted document-id sets and the two operations boolean queries combine
//! them with.

use crate::{DocId, Error};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;

/// A set of document ids, stored as a strictly ascending vector.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocSet(Vec<DocId>);

impl DocSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sorts and deduplicates arbitrary ids.
    pub fn from_unsorted(mut ids: Vec<DocId>) -> Self {
        ids.sort_unstable();
        ids.dedup();
        DocSet(ids)
    }

    /// Wraps ids the caller already holds in strictly ascending order.
    pub(crate) fn from_sorted(ids: Vec<DocId>) -> Self {
        debug_assert!(ids.windows(2).all(|w| w[0] < w[1]));
        DocSet(ids)
    }

    /// Every id in `[0, num_docs)`.
    pub fn universe(num_docs: u32) -> Self {
        DocSet((0..num_docs).collect())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, id: DocId) -> bool {
        self.0.binary_search(&id).is_ok()
    }

    pub fn as_slice(&self) -> &[DocId] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = DocId> + '_ {
        self.0.iter().copied()
    }

    pub fn into_vec(self) -> Vec<DocId> {
        self.0
    }

    pub fn union(&self, other: &DocSet) -> DocSet {
        let (a, b) = (&self.0, &other.0);
        let mut out = Vec::with_capacity(a.len() + b.len());
        let (mut i, mut j) = (0, 0);
        while i < a.len() && j < b.len() {
            match a[i].cmp(&b[j]) {
                Ordering::Less => {
                    out.push(a[i]);
                    i += 1;
                }
                Ordering::Greater => {
                    out.push(b[j]);
                    j += 1;
                }
                Ordering::Equal => {
                    out.push(a[i]);
                    i += 1;
                    j += 1;
                }
            }
        }
        out.extend_from_slice(&a[i..]);
        out.extend_from_slice(&b[j..]);
        DocSet(out)
    }

    pub fn intersection(&self, other: &DocSet) -> DocSet {
        let (a, b) = (&self.0, &other.0);
        let mut out = Vec::with_capacity(a.len().min(b.len()));
        let (mut i, mut j) = (0, 0);
        while i < a.len() && j < b.len() {
            match a[i].cmp(&b[j]) {
                Ordering::Less => i += 1,
                Ordering::Greater => j += 1,
                Ordering::Equal => {
                    out.push(a[i]);
                    i += 1;
                    j += 1;
                }
            }
        }
        DocSet(out)
    }

    /// Ids in `[0, num_docs)` that are not in this set.
    pub fn complement(&self, num_docs: u32) -> DocSet {
        let mut out = Vec::with_capacity((num_docs as usize).saturating_sub(self.0.len()));
        let mut members = self.0.iter().peekable();
        for id in 0..num_docs {
            if members.peek() == Some(&&id) {
                members.next();
            } else {
                out.push(id);
            }
        }
        DocSet(out)
    }
}

impl FromIterator<DocId> for DocSet {
    fn from_iter<I: IntoIterator<Item = DocId>>(iter: I) -> Self {
        DocSet::from_unsorted(iter.into_iter().collect())
    }
}

impl From<&[DocId]> for DocSet {
    fn from(ids: &[DocId]) -> Self {
        DocSet::from_unsorted(ids.to_vec())
    }
}

/// How a list of document sets is folded into one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOperation {
    Union,
    Intersection,
}

impl SetOperation {
    /// Folds the sets with this operation. `None` for an empty input, where
    /// neither operation has a meaningful result.
    pub fn combine<I>(self, sets: I) -> Option<DocSet>
    where
        I: IntoIterator<Item = DocSet>,
    {
        sets.into_iter().reduce(|acc, next| match self {
            SetOperation::Union => acc.union(&next),
            SetOperation::Intersection => acc.intersection(&next),
        })
    }
}

impl FromStr for SetOperation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "union" => Ok(SetOperation::Union),
            "intersection" => Ok(SetOperation::Intersection),
            other => Err(Error::InvalidOperation(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(ids: &[DocId]) -> DocSet {
        DocSet::from(ids)
    }

    #[test]
    fn union_and_intersection_merge_sorted_runs() {
        let a = set(&[0, 2, 5]);
        let b = set(&[2, 3]);
        assert_eq!(a.union(&b).as_slice(), &[0, 2, 3, 5]);
        assert_eq!(a.intersection(&b).as_slice(), &[2]);
    }

    #[test]
    fn complement_within_universe() {
        assert_eq!(set(&[0, 1]).complement(3).as_slice(), &[2]);
        assert_eq!(DocSet::new().complement(2).as_slice(), &[0, 1]);
        assert!(DocSet::universe(4).complement(4).is_empty());
    }

    #[test]
    fn combine_of_nothing_is_none() {
        assert_eq!(SetOperation::Union.combine(Vec::new()), None);
        let folded = SetOperation::Intersection.combine(vec![set(&[1, 2, 3]), set(&[2, 3]), set(&[3])]);
        assert_eq!(folded, Some(set(&[3])));
    }

    #[test]
    fn operation_tags_parse() {
        assert_eq!("union".parse::<SetOperation>().unwrap(), SetOperation::Union);
        assert_eq!("intersection".parse::<SetOperation>().unwrap(), SetOperation::Intersection);
        assert!(matches!("xor".parse::<SetOperation>(), Err(Error::InvalidOperation(op)) if op == "xor"));
    }
}
