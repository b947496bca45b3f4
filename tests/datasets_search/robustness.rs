//! Equivalent queries return equal results

use crate::test_utils::*;

fn assert_same_results(q_ref: &str, q_other: &str) {
    let catalogue = catalogue();
    add_corpus(&catalogue, DEFAULT_CORPUS_ITEMS);

    let reference = search_titles(&catalogue, q_ref);
    assert!(!reference.is_empty(), "query {:?} found nothing", q_ref);
    assert_eq!(reference, search_titles(&catalogue, q_other));
}

#[test]
fn lexemes() {
    assert_same_results("forêt", "forestier");
}

#[test]
fn case_insensitive() {
    assert_same_results("base", "BaSe");
}

#[test]
fn inflected_forms() {
    assert_same_results("forêt", "forêts");
}

#[test]
fn punctuation_ignored() {
    assert_same_results("données cadastre", "  données, cadastre !");
}

#[test]
fn repeated_search_is_stable() {
    let catalogue = catalogue();
    add_corpus(&catalogue, DEFAULT_CORPUS_ITEMS);
    let first = search_ids(&catalogue, "national France base");
    for _ in 0..10 {
        assert_eq!(search_ids(&catalogue, "national France base"), first);
    }
}
