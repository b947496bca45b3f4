//! Dataset entity, commands and views
//!
//! Datasets are stored with bincode, so stored types avoid serde attributes
//! that skip or flatten fields. Views are only ever serialized for display.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use catalogue_core::{DocumentId, Error, Result};

// ============================================================================
// DataFormat
// ============================================================================

/// Format a dataset is published in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataFormat {
    /// Spreadsheet / CSV files
    FileTabular,
    /// Geographic files (shapefile, GeoJSON …)
    FileGis,
    /// Programmatic API
    Api,
    /// Database access
    Database,
    /// Website
    Website,
    /// Anything else
    Other,
}

impl DataFormat {
    /// Every format, in declaration order
    pub fn all() -> &'static [DataFormat] {
        &[
            DataFormat::FileTabular,
            DataFormat::FileGis,
            DataFormat::Api,
            DataFormat::Database,
            DataFormat::Website,
            DataFormat::Other,
        ]
    }
}

// ============================================================================
// Dataset
// ============================================================================

/// A catalogued dataset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    /// Identity, shared with the search document
    pub id: DocumentId,
    /// Title (indexed)
    pub title: String,
    /// Description (indexed)
    pub description: String,
    /// Producing service
    pub service: String,
    /// Geographical coverage, e.g. "France métropolitaine"
    pub geographical_coverage: String,
    /// Publication formats
    pub formats: Vec<DataFormat>,
    /// System the data comes from
    pub technical_source: Option<String>,
    /// License name
    pub license: Option<String>,
    /// Free tags
    pub tags: Vec<String>,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last update time
    pub updated_at: DateTime<Utc>,
    /// Creation sequence
    pub seq: u64,
}

/// Fields common to create and update commands
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetFields {
    /// Title, must not be blank
    pub title: String,
    /// Description
    pub description: String,
    /// Producing service
    pub service: String,
    /// Geographical coverage
    pub geographical_coverage: String,
    /// Publication formats
    pub formats: Vec<DataFormat>,
    /// System the data comes from
    pub technical_source: Option<String>,
    /// License name
    pub license: Option<String>,
    /// Free tags
    pub tags: Vec<String>,
}

impl DatasetFields {
    /// Fields with a title and description, everything else empty
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        DatasetFields {
            title: title.into(),
            description: description.into(),
            ..Default::default()
        }
    }

    /// Builder: set formats
    pub fn with_formats(mut self, formats: Vec<DataFormat>) -> Self {
        self.formats = formats;
        self
    }

    /// Builder: set service
    pub fn with_service(mut self, service: impl Into<String>) -> Self {
        self.service = service.into();
        self
    }

    /// Builder: set geographical coverage
    pub fn with_geographical_coverage(mut self, coverage: impl Into<String>) -> Self {
        self.geographical_coverage = coverage.into();
        self
    }

    /// Builder: set technical source
    pub fn with_technical_source(mut self, source: impl Into<String>) -> Self {
        self.technical_source = Some(source.into());
        self
    }

    /// Builder: set license
    pub fn with_license(mut self, license: impl Into<String>) -> Self {
        self.license = Some(license.into());
        self
    }

    /// Builder: set tags
    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(Error::InvalidInput("dataset title must not be empty".into()));
        }
        Ok(())
    }

    pub(crate) fn into_dataset(
        self,
        id: DocumentId,
        seq: u64,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Dataset {
        Dataset {
            id,
            title: self.title,
            description: self.description,
            service: self.service,
            geographical_coverage: self.geographical_coverage,
            formats: self.formats,
            technical_source: self.technical_source,
            license: self.license,
            tags: self.tags,
            created_at,
            updated_at,
            seq,
        }
    }
}

/// Create a dataset
pub type CreateDataset = DatasetFields;

/// Replace every field of an existing dataset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateDataset {
    /// Dataset to update
    pub id: DocumentId,
    /// New field values
    pub fields: DatasetFields,
}

// ============================================================================
// Views
// ============================================================================

/// Matched words of a dataset, highlighted
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetHeadlines {
    /// Highlighted title, if it matched
    pub title: Option<String>,
    /// Highlighted description, if it matched
    pub description: Option<String>,
}

/// A dataset as returned to readers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetView {
    /// The dataset
    #[serde(flatten)]
    pub dataset: Dataset,
    /// Search headlines, when requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headlines: Option<DatasetHeadlines>,
}

impl From<Dataset> for DatasetView {
    fn from(dataset: Dataset) -> Self {
        DatasetView {
            dataset,
            headlines: None,
        }
    }
}

/// Distinct filter values offered to users
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DatasetFiltersView {
    /// Geographical coverages, sorted
    pub geographical_coverage: Vec<String>,
    /// Services, sorted
    pub service: Vec<String>,
    /// Every format
    pub format: Vec<DataFormat>,
    /// Technical sources, sorted
    pub technical_source: Vec<String>,
    /// `"*"` (any license) followed by licenses, sorted
    pub license: Vec<String>,
}

// ============================================================================
// Listing
// ============================================================================

/// License filter value matching any dataset that has a license
pub const ANY_LICENSE: &str = "*";

/// Non-search filters; an empty list means "no constraint"
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetFilters {
    /// Keep datasets published in any of these formats
    pub formats: Vec<DataFormat>,
    /// Keep datasets with one of these coverages
    pub geographical_coverage: Vec<String>,
    /// Keep datasets from one of these services
    pub service: Vec<String>,
    /// Keep datasets under one of these licenses (`"*"` = any license)
    pub license: Vec<String>,
    /// Keep datasets from one of these technical sources
    pub technical_source: Vec<String>,
}

impl DatasetFilters {
    /// Whether a dataset passes every filter
    pub fn matches(&self, dataset: &Dataset) -> bool {
        let formats_ok = self.formats.is_empty()
            || dataset.formats.iter().any(|f| self.formats.contains(f));
        let coverage_ok = self.geographical_coverage.is_empty()
            || self
                .geographical_coverage
                .contains(&dataset.geographical_coverage);
        let service_ok = self.service.is_empty() || self.service.contains(&dataset.service);
        let license_ok = self.license.is_empty()
            || dataset.license.as_ref().map_or(false, |license| {
                self.license
                    .iter()
                    .any(|wanted| wanted == ANY_LICENSE || wanted == license)
            });
        let source_ok = self.technical_source.is_empty()
            || dataset
                .technical_source
                .as_ref()
                .map_or(false, |source| self.technical_source.contains(source));

        formats_ok && coverage_ok && service_ok && license_ok && source_ok
    }
}

/// A 1-based page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    /// Page number, starting at 1
    pub number: usize,
    /// Items per page
    pub size: usize,
}

impl Default for Page {
    fn default() -> Self {
        Page {
            number: 1,
            size: 10,
        }
    }
}

impl Page {
    /// Page `number` of `size` items
    pub fn new(number: usize, size: usize) -> Self {
        Page { number, size }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.number == 0 || self.size == 0 {
            return Err(Error::InvalidInput(format!(
                "page number and size must be at least 1 (got {}, {})",
                self.number, self.size
            )));
        }
        Ok(())
    }

    pub(crate) fn offset(&self) -> usize {
        (self.number - 1).saturating_mul(self.size)
    }
}

/// List datasets, optionally searching
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetAllDatasets {
    /// Search query; `None` lists everything in creation order
    pub q: Option<String>,
    /// Post-filters
    pub filters: DatasetFilters,
    /// Requested page
    pub page: Page,
    /// Fill `DatasetView::headlines` when searching
    pub highlight: bool,
}

impl GetAllDatasets {
    /// Search for `q`
    pub fn search(q: impl Into<String>) -> Self {
        GetAllDatasets {
            q: Some(q.into()),
            ..Default::default()
        }
    }

    /// Builder: set page
    pub fn with_page(mut self, page: Page) -> Self {
        self.page = page;
        self
    }

    /// Builder: set filters
    pub fn with_filters(mut self, filters: DatasetFilters) -> Self {
        self.filters = filters;
        self
    }

    /// Builder: request headlines
    pub fn with_highlight(mut self, highlight: bool) -> Self {
        self.highlight = highlight;
        self
    }
}

/// One page of results
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pagination<T> {
    /// Items of the page
    pub items: Vec<T>,
    /// Items across all pages
    pub total_items: usize,
    /// Page number, starting at 1
    pub page_number: usize,
    /// Page size
    pub page_size: usize,
    /// Number of pages
    pub total_pages: usize,
}

impl<T> Pagination<T> {
    /// Cut `all` down to `page`
    pub fn paginate(all: Vec<T>, page: Page) -> Self {
        let total_items = all.len();
        let items = all
            .into_iter()
            .skip(page.offset())
            .take(page.size)
            .collect();
        Pagination {
            items,
            total_items,
            page_number: page.number,
            page_size: page.size,
            total_pages: page_count(total_items, page.size),
        }
    }
}

/// Pages needed for `total_items`; rounds up without overflowing
fn page_count(total_items: usize, size: usize) -> usize {
    if size == 0 {
        return 0;
    }
    total_items / size + usize::from(total_items % size != 0)
}
