//! Catalogue - dataset metadata catalogue with transactional full-text search
//!
//! Organizations publish dataset metadata; users find datasets by free-text
//! search over title and description.
//!
//! # Quick Start
//!
//! ```
//! use catalogue::{Catalogue, DatasetFields, GetAllDatasets};
//! use catalogue_core::SearchConfig;
//!
//! let catalogue = Catalogue::new(SearchConfig::default())?;
//! catalogue.create_dataset(DatasetFields::new(
//!     "Inventaire national forestier",
//!     "Ensemble des forêts de France",
//! ))?;
//!
//! let page = catalogue.list_datasets(&GetAllDatasets::search("forêt"))?;
//! assert_eq!(page.items[0].dataset.title, "Inventaire national forestier");
//! # Ok::<(), catalogue_core::Error>(())
//! ```
//!
//! # Architecture
//!
//! - `catalogue-core`: errors, ids, keys, locale, configuration
//! - `catalogue-storage`: ordered versioned store, optimistic transactions
//! - `catalogue-search`: normalizer, index, parser, ranking, headlines
//! - this crate: dataset entity, commands and list queries

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod catalogue;
pub mod dataset;

pub use catalogue::Catalogue;
pub use dataset::{
    CreateDataset, DataFormat, Dataset, DatasetFields, DatasetFilters, DatasetFiltersView,
    DatasetHeadlines, DatasetView, GetAllDatasets, Page, Pagination, UpdateDataset, ANY_LICENSE,
};

pub use catalogue_core::{DocumentId, Error, Locale, MatchMode, Result, SearchConfig};
