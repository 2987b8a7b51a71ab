use crate::error::{IndexError, Result};
use crate::posting::PostingList;
use crate::tokenizer::tokenize;
use crate::DocId;
use serde::{Deserialize, Serialize};
use std::collections::{hash_map, BTreeMap, BTreeSet, HashMap, HashSet};
use std::fmt;

/// Term -> postings mapping together with the forward store of document tokens.
///
/// After every public operation except the low-level `add` over an existing
/// document id, `remove` and `insert`, the two stores agree: a document is in
/// the forward store exactly when each of its terms has a posting for it, each
/// posting's frequency matches the token counts, and no term maps to an empty
/// posting list.
///
/// Not synchronized. Wrap it in a lock, or `clone` it for readers, when
/// sharing across threads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvertedIndex {
    index: HashMap<String, PostingList>,
    documents: BTreeMap<DocId, Vec<String>>,
}

impl InvertedIndex {
    pub fn new() -> Self { Self::default() }

    /// Index a pre-tokenized document.
    ///
    /// Re-adding an id that is already stored replaces its tokens but leaves the
    /// old postings in place; `purge` the document first when replacing it.
    pub fn add<I>(&mut self, doc_id: DocId, tokens: I, track_positions: bool)
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let tokens: Vec<String> = tokens.into_iter().map(Into::into).collect();
        for (pos, term) in tokens.iter().enumerate() {
            match self.index.get_mut(term.as_str()) {
                Some(list) => list.add(doc_id, pos, track_positions),
                None => {
                    let mut list = PostingList::new();
                    list.add(doc_id, pos, track_positions);
                    self.index.insert(term.clone(), list);
                }
            }
        }
        tracing::debug!(doc_id, tokens = tokens.len(), "indexed document");
        if self.documents.insert(doc_id, tokens).is_some() {
            tracing::warn!(doc_id, "document re-added without purge; previous postings kept");
        }
    }

    /// Tokenize raw text and index the result.
    pub fn add_text(&mut self, doc_id: DocId, text: &str, track_positions: bool) {
        self.add(doc_id, tokenize(text), track_positions);
    }

    /// Tokenize and index a whole collection of raw documents, with positions.
    pub fn parse<I, S>(&mut self, collection: I)
    where
        I: IntoIterator<Item = (DocId, S)>,
        S: AsRef<str>,
    {
        for (doc_id, text) in collection {
            self.add_text(doc_id, text.as_ref(), true);
        }
    }

    pub fn get(&self, term: &str) -> Result<&PostingList> {
        self.index.get(term).ok_or_else(|| IndexError::TermNotFound(term.to_string()))
    }

    pub fn get_mut(&mut self, term: &str) -> Result<&mut PostingList> {
        self.index.get_mut(term).ok_or_else(|| IndexError::TermNotFound(term.to_string()))
    }

    /// Drop a term's posting list without touching the forward store.
    pub fn remove(&mut self, term: &str) -> Result<PostingList> {
        self.index.remove(term).ok_or_else(|| IndexError::TermNotFound(term.to_string()))
    }

    /// Like `remove`, but an unseen term yields `None`.
    pub fn pop(&mut self, term: &str) -> Option<PostingList> {
        self.index.remove(term)
    }

    /// Replace a term's posting list without touching the forward store.
    /// An empty list removes the term.
    pub fn insert(&mut self, term: impl Into<String>, list: PostingList) -> Option<PostingList> {
        let term = term.into();
        if list.is_empty() {
            return self.index.remove(&term);
        }
        self.index.insert(term, list)
    }

    /// Remove a document from both the postings and the forward store, dropping
    /// terms left without postings.
    pub fn purge(&mut self, doc_id: DocId) -> Result<()> {
        let tokens = self.documents.get(&doc_id).ok_or(IndexError::DocumentNotFound(doc_id))?;
        let terms: HashSet<&str> = tokens.iter().map(String::as_str).collect();
        let mut dropped = 0usize;
        for term in terms {
            if let Some(list) = self.index.get_mut(term) {
                list.discard(doc_id);
                if list.is_empty() {
                    self.index.remove(term);
                    dropped += 1;
                }
            }
        }
        self.documents.remove(&doc_id);
        tracing::debug!(doc_id, dropped_terms = dropped, "purged document");
        Ok(())
    }

    /// Fold `other` into `self`. Shared terms keep `self`'s postings on document
    /// conflicts; terms only in `other` are moved over as they are. Documents in
    /// `other` replace same-id documents in `self`.
    pub fn merge(&mut self, other: InvertedIndex) {
        let (terms, docs) = (other.index.len(), other.documents.len());
        for (term, list) in other.index {
            match self.index.entry(term) {
                hash_map::Entry::Occupied(mut entry) => entry.get_mut().merge(list),
                hash_map::Entry::Vacant(entry) => {
                    entry.insert(list);
                }
            }
        }
        self.documents.extend(other.documents);
        tracing::debug!(terms, docs, "merged index");
    }

    pub fn contains(&self, term: &str) -> bool {
        self.index.contains_key(term)
    }

    /// Number of distinct terms.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn terms(&self) -> impl Iterator<Item = &str> + '_ {
        self.index.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PostingList)> + '_ {
        self.index.iter().map(|(term, list)| (term.as_str(), list))
    }

    pub fn clear(&mut self) {
        self.index.clear();
        self.documents.clear();
    }

    pub fn document_frequency(&self, term: &str) -> Result<usize> {
        Ok(self.get(term)?.document_frequency())
    }

    pub fn documents(&self) -> &BTreeMap<DocId, Vec<String>> {
        &self.documents
    }

    pub fn document(&self, doc_id: DocId) -> Result<&[String]> {
        self.documents
            .get(&doc_id)
            .map(Vec::as_slice)
            .ok_or(IndexError::DocumentNotFound(doc_id))
    }

    /// Tokens of one document, or of every document in id order.
    pub fn words(&self, doc_id: Option<DocId>) -> Result<Vec<&str>> {
        match doc_id {
            Some(id) => Ok(self.document(id)?.iter().map(String::as_str).collect()),
            None => Ok(self.documents.values().flatten().map(String::as_str).collect()),
        }
    }

    /// Distinct tokens, sorted.
    pub fn vocab(&self, doc_id: Option<DocId>) -> Result<Vec<&str>> {
        let distinct: BTreeSet<&str> = self.words(doc_id)?.into_iter().collect();
        Ok(distinct.into_iter().collect())
    }

    pub fn word_count(&self, doc_id: Option<DocId>) -> Result<usize> {
        match doc_id {
            Some(id) => Ok(self.document(id)?.len()),
            None => Ok(self.documents.values().map(Vec::len).sum()),
        }
    }

    pub fn vocab_count(&self, doc_id: Option<DocId>) -> Result<usize> {
        Ok(self.vocab(doc_id)?.len())
    }

    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    /// Mean tokens per document; `0.0` for an empty collection.
    pub fn average_length(&self) -> f64 {
        if self.documents.is_empty() {
            return 0.0;
        }
        let total: usize = self.documents.values().map(Vec::len).sum();
        total as f64 / self.documents.len() as f64
    }

    pub fn word_counter(&self, doc_id: Option<DocId>) -> Result<HashMap<&str, usize>> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for word in self.words(doc_id)? {
            *counts.entry(word).or_insert(0) += 1;
        }
        Ok(counts)
    }
}

impl fmt::Display for InvertedIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut terms: Vec<_> = self.index.iter().collect();
        terms.sort_by(|a, b| a.0.cmp(b.0));
        for (term, list) in terms {
            writeln!(f, "{term}: {list}")?;
        }
        Ok(())
    }
}
