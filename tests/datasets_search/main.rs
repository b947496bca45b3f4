//! Dataset search test suite
//!
//! End-to-end tests of search through the catalogue: datasets are created
//! with commands and found with `list_datasets`.
//!
//! ## Test Groups
//!
//! - **search_results**: expected titles for a fixed corpus
//! - **robustness**: equivalent queries give equal results
//! - **data_changes**: results follow creates, updates and deletes
//! - **ranking**: coverage and proximity ordering
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --test datasets_search
//! ```

mod test_utils;

mod data_changes;
mod ranking;
mod robustness;
mod search_results;
