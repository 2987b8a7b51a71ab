use crate::error::{IndexError, Result};
use crate::DocId;
use serde::{Deserialize, Serialize};
use std::collections::btree_map::{self, BTreeMap};
use std::fmt;

/// Occurrence profile of one term within one document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Posting {
    pub frequency: u32,
    /// Token offsets, empty when positions are not tracked.
    pub positions: Vec<usize>,
    /// Relevance weight slot, only ever written by an external scorer.
    pub score: f64,
}

impl Posting {
    pub fn new() -> Self { Self::default() }

    pub fn increment(&mut self) {
        self.frequency += 1;
    }

    pub fn record_position(&mut self, pos: usize) {
        self.positions.push(pos);
    }

    pub fn set_score(&mut self, score: f64) {
        self.score = score;
    }
}

impl fmt::Display for Posting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(freq={}, score={}, positions={:?})", self.frequency, self.score, self.positions)
    }
}

/// All postings of a single term, keyed and ordered by document id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostingList {
    postings: BTreeMap<DocId, Posting>,
}

impl PostingList {
    pub fn new() -> Self { Self::default() }

    /// Record one occurrence of the term at `pos` in `doc_id`.
    pub fn add(&mut self, doc_id: DocId, pos: usize, track_positions: bool) {
        let posting = self.postings.entry(doc_id).or_default();
        posting.increment();
        if track_positions {
            posting.record_position(pos);
        }
    }

    /// Remove the posting for `doc_id`, failing if the document is not listed.
    pub fn remove(&mut self, doc_id: DocId) -> Result<Posting> {
        self.postings.remove(&doc_id).ok_or(IndexError::DocumentNotFound(doc_id))
    }

    /// Removal for callers that already checked membership.
    pub(crate) fn discard(&mut self, doc_id: DocId) -> Option<Posting> {
        self.postings.remove(&doc_id)
    }

    /// Union keyed on document id. Postings already present in `self` win;
    /// conflicting postings from `other` are dropped, never summed.
    pub fn merge(&mut self, other: PostingList) {
        for (doc_id, posting) in other.postings {
            self.postings.entry(doc_id).or_insert(posting);
        }
    }

    pub fn document_frequency(&self) -> usize {
        self.postings.len()
    }

    /// Occurrences of the term across all documents.
    pub fn total_frequency(&self) -> u64 {
        self.postings.values().map(|p| p.frequency as u64).sum()
    }

    pub fn contains(&self, doc_id: DocId) -> bool {
        self.postings.contains_key(&doc_id)
    }

    pub fn get(&self, doc_id: DocId) -> Result<&Posting> {
        self.postings.get(&doc_id).ok_or(IndexError::DocumentNotFound(doc_id))
    }

    pub fn get_mut(&mut self, doc_id: DocId) -> Result<&mut Posting> {
        self.postings.get_mut(&doc_id).ok_or(IndexError::DocumentNotFound(doc_id))
    }

    pub fn doc_ids(&self) -> impl Iterator<Item = DocId> + '_ {
        self.postings.keys().copied()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, DocId, Posting> {
        self.postings.iter()
    }

    pub fn len(&self) -> usize {
        self.postings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.postings.is_empty()
    }
}

impl<'a> IntoIterator for &'a PostingList {
    type Item = (&'a DocId, &'a Posting);
    type IntoIter = btree_map::Iter<'a, DocId, Posting>;

    fn into_iter(self) -> Self::IntoIter {
        self.postings.iter()
    }
}

impl FromIterator<(DocId, Posting)> for PostingList {
    fn from_iter<I: IntoIterator<Item = (DocId, Posting)>>(iter: I) -> Self {
        Self { postings: iter.into_iter().collect() }
    }
}

impl fmt::Display for PostingList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (doc_id, posting)) in self.postings.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{doc_id}: {posting}")?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn posting(frequency: u32, positions: Vec<usize>) -> Posting {
        Posting { frequency, positions, score: 0.0 }
    }

    #[test]
    fn add_accumulates_frequency_and_positions() {
        let mut pl = PostingList::new();
        pl.add(3, 0, true);
        pl.add(3, 4, true);
        pl.add(5, 1, true);
        assert_eq!(pl.get(3).unwrap(), &posting(2, vec![0, 4]));
        assert_eq!(pl.get(5).unwrap(), &posting(1, vec![1]));
        assert_eq!(pl.document_frequency(), 2);
        assert_eq!(pl.total_frequency(), 3);
    }

    #[test]
    fn add_without_positions_keeps_exact_frequency() {
        let mut pl = PostingList::new();
        pl.add(1, 0, false);
        pl.add(1, 7, false);
        let p = pl.get(1).unwrap();
        assert_eq!(p.frequency, 2);
        assert!(p.positions.is_empty());
    }

    #[test]
    fn remove_missing_document_fails() {
        let mut pl = PostingList::new();
        pl.add(1, 0, true);
        assert_eq!(pl.remove(2), Err(IndexError::DocumentNotFound(2)));
        assert_eq!(pl.remove(1).unwrap().frequency, 1);
        assert!(pl.is_empty());
        assert!(pl.get(1).is_err());
    }

    #[test]
    fn merge_is_left_biased() {
        let mut left: PostingList = [(1, posting(2, vec![0, 1]))].into_iter().collect();
        let right: PostingList = [(1, posting(5, vec![])), (2, posting(1, vec![3]))].into_iter().collect();
        left.merge(right);
        assert_eq!(left.get(1).unwrap().frequency, 2);
        assert_eq!(left.get(2).unwrap(), &posting(1, vec![3]));
        assert_eq!(left.doc_ids().collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn clone_is_independent() {
        let mut original = PostingList::new();
        original.add(1, 0, true);
        let mut copy = original.clone();
        copy.add(1, 2, true);
        copy.get_mut(1).unwrap().set_score(0.5);
        assert_eq!(original.get(1).unwrap(), &posting(1, vec![0]));
        assert_eq!(copy.get(1).unwrap().frequency, 2);
    }

    #[test]
    fn display_lists_postings_in_doc_order() {
        let mut pl = PostingList::new();
        pl.add(2, 1, true);
        pl.add(1, 0, false);
        assert_eq!(
            pl.to_string(),
            "{1: (freq=1, score=0, positions=[]), 2: (freq=1, score=0, positions=[1])}"
        );
    }
}
