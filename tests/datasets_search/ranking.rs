//! Coverage and proximity ordering

use catalogue::{MatchMode, SearchConfig};
use rand::seq::SliceRandom;

use crate::test_utils::*;

const RANKING_ITEMS: &[(&str, &str)] = &[
    ("A", "..."),
    ("B", "Forêt nouvelle"),
    ("C", "Historique des forêts anciennes"),
    ("D", "Ancien historique des forêts"),
];

#[test]
fn search_ranking_by_proximity() {
    for _ in 0..10 {
        let mut items = RANKING_ITEMS.to_vec();
        // Insertion order must not matter
        items.shuffle(&mut rand::thread_rng());

        let catalogue = catalogue();
        add_corpus(&catalogue, &items);

        // Lexemes: forêt, ancien
        assert_eq!(search_titles(&catalogue, "Forêt ancienne"), vec!["C", "D"]);
    }
}

#[test]
fn search_ranking_by_coverage_in_any_mode() {
    let mut items = RANKING_ITEMS.to_vec();
    items.shuffle(&mut rand::thread_rng());

    let catalogue = catalogue_with(SearchConfig::default().with_match_mode(MatchMode::Any));
    add_corpus(&catalogue, &items);

    // Both lexemes (near, then far), then the single-lexeme match
    assert_eq!(
        search_titles(&catalogue, "Forêt ancienne"),
        vec!["C", "D", "B"]
    );
}

#[test]
fn title_and_body_are_not_adjacent() {
    let catalogue = catalogue();
    add_corpus(
        &catalogue,
        &[
            ("Forêt", "Ancienne"),
            ("Forêt ancienne", ""),
        ],
    );

    // Adjacent in the title beats split across title and body
    assert_eq!(
        search_titles(&catalogue, "forêt ancienne"),
        vec!["Forêt ancienne", "Forêt"]
    );
}
