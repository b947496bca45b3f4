//! Expected titles for the reference corpus

use crate::test_utils::*;

fn assert_titles(q: &str, expected: &[&str]) {
    let catalogue = catalogue();
    add_corpus(&catalogue, DEFAULT_CORPUS_ITEMS);
    assert_eq!(search_titles(&catalogue, q), expected, "query {:?}", q);
}

#[test]
fn terms_none() {
    assert_titles("", &[]);
}

#[test]
fn terms_garbage() {
    assert_titles("hello!? hm?m & || specia| ch@rs'); \"quote", &[]);
}

#[test]
fn terms_single_no_results() {
    assert_titles("tototitu", &[]);
}

#[test]
fn terms_single_result_in_title() {
    assert_titles("carbone", &["Base Carbone"]);
}

#[test]
fn terms_single_result_in_description() {
    assert_titles("forêt", &["Inventaire national forestier"]);
}

#[test]
fn terms_multiple_results_in_titles() {
    assert_titles(
        "national",
        &["Inventaire national forestier", "Cadastre national"],
    );
}

#[test]
fn terms_multiple_results_in_descriptions() {
    assert_titles(
        "France",
        &["Inventaire national forestier", "Cadastre national"],
    );
}

#[test]
fn terms_multiple_results_in_title_and_description() {
    assert_titles("base", &["Base Carbone", "Cadastre national"]);
}

#[test]
fn terms_multiple_lexemes_single_result() {
    assert_titles("données cadastre", &["Cadastre national"]);
}

#[test]
fn elided_article_matches() {
    assert_titles("ADEME", &["Base Carbone"]);
}
