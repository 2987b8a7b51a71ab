//! In-memory inverted index: term -> postings, with a forward store of
//! document tokens kept consistent with the postings.

pub mod error;
pub mod index;
pub mod posting;
pub mod tokenizer;

pub use error::{IndexError, Result};
pub use index::InvertedIndex;
pub use posting::{Posting, PostingList};

pub type DocId = u32;
