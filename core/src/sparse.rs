use crate::TermId;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Sparse row over the term space: `(term_id, value)` pairs in ascending
/// term order, zeros never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SparseVector<T = f64> {
    dim: usize,
    entries: Vec<(TermId, T)>,
}

impl<T: Copy + Default + PartialEq> SparseVector<T> {
    pub fn zeros(dim: usize) -> Self {
        SparseVector { dim, entries: Vec::new() }
    }

    /// Sorts by term id and drops zero values. Returns `None` if a term id
    /// is outside `dim` or appears twice.
    pub fn from_entries(dim: usize, mut entries: Vec<(TermId, T)>) -> Option<Self> {
        entries.retain(|(_, v)| *v != T::default());
        entries.sort_unstable_by_key(|(t, _)| *t);
        let in_range = entries.last().map_or(true, |(t, _)| (*t as usize) < dim);
        let distinct = entries.windows(2).all(|w| w[0].0 < w[1].0);
        (in_range && distinct).then_some(SparseVector { dim, entries })
    }

    /// Entries already sorted by distinct term id within `dim`; zeros are dropped.
    pub(crate) fn from_sorted(dim: usize, mut entries: Vec<(TermId, T)>) -> Self {
        debug_assert!(entries.windows(2).all(|w| w[0].0 < w[1].0));
        debug_assert!(entries.last().map_or(true, |(t, _)| (*t as usize) < dim));
        entries.retain(|(_, v)| *v != T::default());
        SparseVector { dim, entries }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of stored (nonzero) entries.
    pub fn nnz(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, term_id: TermId) -> T {
        self.entries
            .binary_search_by_key(&term_id, |(t, _)| *t)
            .map_or_else(|_| T::default(), |i| self.entries[i].1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (TermId, T)> + '_ {
        self.entries.iter().copied()
    }
}

impl SparseVector<f64> {
    pub fn dot(&self, other: &Self) -> f64 {
        let (a, b) = (&self.entries, &other.entries);
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0;
        while i < a.len() && j < b.len() {
            match a[i].0.cmp(&b[j].0) {
                Ordering::Less => i += 1,
                Ordering::Greater => j += 1,
                Ordering::Equal => {
                    sum += a[i].1 * b[j].1;
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }

    pub fn norm(&self) -> f64 {
        self.entries.iter().map(|(_, v)| v * v).sum::<f64>().sqrt()
    }
}

/// `(u·v) / (|u|·|v|)`, or 0 when either vector has zero norm.
pub fn cosine_similarity(u: &SparseVector, v: &SparseVector) -> f64 {
    let denom = u.norm() * v.norm();
    if denom == 0.0 {
        return 0.0;
    }
    u.dot(v) / denom
}
