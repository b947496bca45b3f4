//! Dataset catalogue: entity writes with synchronous indexing
//!
//! Every mutation writes the dataset row and its search document in one
//! transaction, so a committed dataset is immediately searchable and an
//! aborted one leaves no index rows behind.

use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use catalogue_core::{
    DocumentId, Error, Key, Result, SearchConfig, Storage, Table, CONFIG_FILE_NAME,
};
use catalogue_search::SearchFacade;
use catalogue_storage::Database;

use crate::dataset::{
    CreateDataset, DataFormat, Dataset, DatasetFiltersView, DatasetHeadlines, DatasetView,
    GetAllDatasets, Pagination, UpdateDataset, ANY_LICENSE,
};

/// The dataset catalogue
#[derive(Debug)]
pub struct Catalogue {
    search: SearchFacade,
}

impl Catalogue {
    /// In-memory catalogue with an explicit config
    pub fn new(config: SearchConfig) -> Result<Self> {
        Self::with_database(Arc::new(Database::in_memory()), config)
    }

    /// Catalogue over an existing database
    pub fn with_database(db: Arc<Database>, config: SearchConfig) -> Result<Self> {
        Ok(Catalogue {
            search: SearchFacade::new(db, config)?,
        })
    }

    /// In-memory catalogue configured from `catalogue.toml` in `dir`
    ///
    /// A commented default config is written first if none exists.
    pub fn open(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE_NAME);
        SearchConfig::write_default_if_missing(&path)?;
        let config = SearchConfig::from_file(&path)?;
        info!(path = %path.display(), locale = %config.locale, "opened catalogue");
        Self::new(config)
    }

    /// The search facade
    pub fn search(&self) -> &SearchFacade {
        &self.search
    }

    fn db(&self) -> &Database {
        self.search.database()
    }

    // ========================================================================
    // Commands
    // ========================================================================

    /// Create a dataset and index it
    ///
    /// # Errors
    ///
    /// `Error::InvalidInput` on a blank title.
    pub fn create_dataset(&self, command: CreateDataset) -> Result<DocumentId> {
        command.validate()?;
        let id = DocumentId::new();
        let now = Utc::now();

        self.db().transaction(|txn| {
            let seq = txn.allocate_sequence()?;
            let dataset = command.clone().into_dataset(id, seq, now, now);
            txn.put_as(dataset_key(&id), &dataset)?;
            self.search
                .index()
                .upsert(txn, id, &dataset.title, &dataset.description)
        })?;

        info!(%id, title = %command.title, "dataset created");
        Ok(id)
    }

    /// Replace a dataset's fields and re-index it
    ///
    /// # Errors
    ///
    /// `Error::NotFound` if the dataset does not exist,
    /// `Error::InvalidInput` on a blank title.
    pub fn update_dataset(&self, command: UpdateDataset) -> Result<()> {
        command.fields.validate()?;
        let id = command.id;
        let now = Utc::now();

        self.db().transaction(|txn| {
            let existing: Dataset = txn
                .get_as(&dataset_key(&id))?
                .ok_or_else(|| Error::NotFound(format!("dataset {}", id)))?;
            let dataset =
                command
                    .fields
                    .clone()
                    .into_dataset(id, existing.seq, existing.created_at, now);
            txn.put_as(dataset_key(&id), &dataset)?;
            self.search
                .index()
                .upsert(txn, id, &dataset.title, &dataset.description)
        })?;

        info!(%id, "dataset updated");
        Ok(())
    }

    /// Delete a dataset and its search document
    ///
    /// Idempotent: deleting a missing dataset succeeds.
    pub fn delete_dataset(&self, id: DocumentId) -> Result<()> {
        let existed = self.db().transaction(|txn| {
            let existed = txn.exists(&dataset_key(&id))?;
            txn.delete(dataset_key(&id));
            self.search.index().remove(txn, id)?;
            Ok(existed)
        })?;

        info!(%id, existed, "dataset deleted");
        Ok(())
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Get one dataset
    ///
    /// # Errors
    ///
    /// `Error::NotFound` if it does not exist.
    pub fn get_dataset(&self, id: DocumentId) -> Result<DatasetView> {
        read_dataset(self.db().storage(), &id)?
            .map(DatasetView::from)
            .ok_or_else(|| Error::NotFound(format!("dataset {}", id)))
    }

    /// List datasets, searching when `q` is set
    ///
    /// Without `q`, datasets come in creation order. With `q`, they come in
    /// rank order; an empty or unrecognized `q` yields no datasets. Filters
    /// apply after ranking, then the page is cut.
    pub fn list_datasets(&self, query: &GetAllDatasets) -> Result<Pagination<DatasetView>> {
        query.page.validate()?;
        let storage = self.db().storage();

        let datasets = match &query.q {
            Some(q) => {
                let matches = self.search.search(q, self.search.config().locale)?;
                let mut hydrated = Vec::with_capacity(matches.len());
                for m in &matches {
                    // Deleted between search and hydration
                    if let Some(dataset) = read_dataset(storage, &m.id)? {
                        hydrated.push(dataset);
                    }
                }
                hydrated
            }
            None => {
                let mut all = all_datasets(storage)?;
                all.sort_by_key(|d| d.seq);
                all
            }
        };

        let filtered: Vec<Dataset> = datasets
            .into_iter()
            .filter(|d| query.filters.matches(d))
            .collect();
        let mut page = Pagination::paginate(filtered, query.page);

        let items = match (&query.q, query.highlight) {
            (Some(q), true) => {
                let parsed = self.search.parse(q);
                let highlighter = self.search.highlighter();
                page.items
                    .drain(..)
                    .map(|dataset| {
                        let headlines = DatasetHeadlines {
                            title: highlighter.highlight(&dataset.title, &parsed),
                            description: highlighter.highlight(&dataset.description, &parsed),
                        };
                        DatasetView {
                            dataset,
                            headlines: Some(headlines),
                        }
                    })
                    .collect()
            }
            _ => page.items.drain(..).map(DatasetView::from).collect(),
        };

        debug!(
            q = ?query.q,
            total = page.total_items,
            page = page.page_number,
            "listed datasets"
        );

        Ok(Pagination {
            items,
            total_items: page.total_items,
            page_number: page.page_number,
            page_size: page.page_size,
            total_pages: page.total_pages,
        })
    }

    /// Distinct filter values across the catalogue
    pub fn get_dataset_filters(&self) -> Result<DatasetFiltersView> {
        let mut coverages = BTreeSet::new();
        let mut services = BTreeSet::new();
        let mut sources = BTreeSet::new();
        let mut licenses = BTreeSet::new();

        for dataset in all_datasets(self.db().storage())? {
            if !dataset.geographical_coverage.is_empty() {
                coverages.insert(dataset.geographical_coverage);
            }
            if !dataset.service.is_empty() {
                services.insert(dataset.service);
            }
            if let Some(source) = dataset.technical_source {
                sources.insert(source);
            }
            if let Some(license) = dataset.license {
                licenses.insert(license);
            }
        }

        let mut license = vec![ANY_LICENSE.to_string()];
        license.extend(licenses);

        Ok(DatasetFiltersView {
            geographical_coverage: coverages.into_iter().collect(),
            service: services.into_iter().collect(),
            format: DataFormat::all().to_vec(),
            technical_source: sources.into_iter().collect(),
            license,
        })
    }
}

fn dataset_key(id: &DocumentId) -> Key {
    Key::for_id(Table::Dataset, id)
}

fn read_dataset(storage: &dyn Storage, id: &DocumentId) -> Result<Option<Dataset>> {
    match storage.get(&dataset_key(id))? {
        Some(value) => Ok(Some(bincode_decode(&value.value)?)),
        None => Ok(None),
    }
}

fn all_datasets(storage: &dyn Storage) -> Result<Vec<Dataset>> {
    storage
        .scan_prefix(&Key::table_prefix(Table::Dataset))?
        .into_iter()
        .map(|(_, value)| bincode_decode(&value.value))
        .collect()
}

fn bincode_decode(bytes: &[u8]) -> Result<Dataset> {
    Ok(bincode::deserialize(bytes)?)
}
