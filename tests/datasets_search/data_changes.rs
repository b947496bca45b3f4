//! Search results follow creates, updates and deletes

use catalogue::{DataFormat, DatasetFields, UpdateDataset};

use crate::test_utils::*;

#[test]
fn search_results_change_when_data_changes() {
    let catalogue = catalogue();
    add_corpus(&catalogue, DEFAULT_CORPUS_ITEMS);

    // No results initially
    assert!(search_ids(&catalogue, "titre").is_empty());

    // New dataset is returned in search results
    let id = catalogue
        .create_dataset(
            DatasetFields::new("Titre", "Description").with_formats(vec![DataFormat::Other]),
        )
        .unwrap();
    assert_eq!(search_ids(&catalogue, "titre"), vec![id]);

    // Updated title is searchable, the old one is not
    catalogue
        .update_dataset(UpdateDataset {
            id,
            fields: DatasetFields::new("Modifié", "Description")
                .with_formats(vec![DataFormat::Other]),
        })
        .unwrap();
    assert_eq!(search_ids(&catalogue, "modifié"), vec![id]);
    assert!(search_ids(&catalogue, "titre").is_empty());

    // Same on description
    catalogue
        .update_dataset(UpdateDataset {
            id,
            fields: DatasetFields::new("Modifié", "Jeu de données spécial")
                .with_formats(vec![DataFormat::Other]),
        })
        .unwrap();
    assert_eq!(search_ids(&catalogue, "spécial"), vec![id]);
    assert!(search_ids(&catalogue, "description").is_empty());

    // Deleted dataset is not returned anymore
    catalogue.delete_dataset(id).unwrap();
    assert!(search_ids(&catalogue, "modifié").is_empty());
    assert!(search_ids(&catalogue, "spécial").is_empty());
}

#[test]
fn failed_update_leaves_index_untouched() {
    let catalogue = catalogue();
    let id = catalogue
        .create_dataset(DatasetFields::new("Titre", ""))
        .unwrap();

    assert!(catalogue
        .update_dataset(UpdateDataset {
            id,
            fields: DatasetFields::new("   ", "Modifié"),
        })
        .is_err());

    assert_eq!(search_ids(&catalogue, "titre"), vec![id]);
    assert!(search_ids(&catalogue, "modifié").is_empty());
}
