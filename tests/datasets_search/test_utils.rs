//! Shared helpers for the dataset search suite

use catalogue::{Catalogue, DataFormat, DatasetFields, DocumentId, GetAllDatasets, SearchConfig};

/// The reference corpus: (title, description)
pub const DEFAULT_CORPUS_ITEMS: &[(&str, &str)] = &[
    ("Inventaire national forestier", "Ensemble des forêts de France"),
    ("Base Carbone", "Inventaire des données climat de l'ADEME"),
    ("Cadastre national", "Base de données du cadastre de la France"),
];

/// Fresh in-memory catalogue with default settings
pub fn catalogue() -> Catalogue {
    Catalogue::new(SearchConfig::default()).unwrap()
}

/// Catalogue with a config
pub fn catalogue_with(config: SearchConfig) -> Catalogue {
    Catalogue::new(config).unwrap()
}

/// Create one dataset per item, in order
pub fn add_corpus(catalogue: &Catalogue, items: &[(&str, &str)]) -> Vec<DocumentId> {
    items
        .iter()
        .map(|(title, description)| {
            let id = catalogue
                .create_dataset(
                    DatasetFields::new(*title, *description)
                        .with_formats(vec![DataFormat::FileTabular]),
                )
                .unwrap();
            // Created datasets are readable right away
            catalogue.get_dataset(id).unwrap();
            id
        })
        .collect()
}

/// Titles returned for `q`, in rank order
pub fn search_titles(catalogue: &Catalogue, q: &str) -> Vec<String> {
    catalogue
        .list_datasets(&GetAllDatasets::search(q))
        .unwrap()
        .items
        .into_iter()
        .map(|view| view.dataset.title)
        .collect()
}

/// Ids returned for `q`, in rank order
pub fn search_ids(catalogue: &Catalogue, q: &str) -> Vec<DocumentId> {
    catalogue
        .list_datasets(&GetAllDatasets::search(q))
        .unwrap()
        .items
        .into_iter()
        .map(|view| view.dataset.id)
        .collect()
}
