//! Invariant checks over randomly generated collections.

use invindex::InvertedIndex;
use proptest::prelude::*;
use std::collections::BTreeMap;

fn term_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-e]{1,2}").unwrap()
}

fn document_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(term_strategy(), 0..12)
}

fn collection_strategy() -> impl Strategy<Value = BTreeMap<u32, Vec<String>>> {
    prop::collection::btree_map(0u32..20, document_strategy(), 0..8)
}

fn build(collection: &BTreeMap<u32, Vec<String>>) -> InvertedIndex {
    let mut idx = InvertedIndex::new();
    for (doc_id, tokens) in collection {
        idx.add(*doc_id, tokens.clone(), true);
    }
    idx
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_frequency_matches_token_counts(collection in collection_strategy()) {
        let idx = build(&collection);
        for (doc_id, tokens) in &collection {
            for term in tokens {
                let expected = tokens.iter().filter(|t| *t == term).count();
                let posting = idx.get(term).unwrap().get(*doc_id).unwrap();
                prop_assert_eq!(posting.frequency as usize, expected);
                prop_assert_eq!(posting.positions.len(), expected);
            }
        }
        for (term, list) in idx.iter() {
            prop_assert!(!list.is_empty());
            for doc_id in list.doc_ids() {
                prop_assert!(collection[&doc_id].iter().any(|t| t == term));
            }
        }
    }

    #[test]
    fn prop_purge_undoes_add(collection in collection_strategy(), extra in document_strategy()) {
        let mut idx = build(&collection);
        let before = idx.clone();
        idx.add(100, extra, true);
        idx.purge(100).unwrap();
        prop_assert_eq!(idx, before);
    }

    #[test]
    fn prop_purging_everything_empties_index(collection in collection_strategy()) {
        let mut idx = build(&collection);
        for doc_id in collection.keys() {
            idx.purge(*doc_id).unwrap();
        }
        prop_assert!(idx.is_empty());
        prop_assert_eq!(idx.document_count(), 0);
        prop_assert_eq!(idx.average_length(), 0.0);
    }

    #[test]
    fn prop_clone_is_isolated(collection in collection_strategy(), extra in document_strategy()) {
        let original = build(&collection);
        let mut copy = original.clone();
        prop_assert_eq!(&copy, &original);
        let terms_before: Vec<String> = original.terms().map(String::from).collect();
        copy.add(100, extra, true);
        prop_assert_eq!(original.document_count(), collection.len());
        let terms_after: Vec<String> = original.terms().map(String::from).collect();
        prop_assert_eq!(terms_before, terms_after);
    }
}
