//! Personally-identifiable-information detection.
//!
//! Two heuristics per column: the normalized column name is matched against
//! a fixed vocabulary, and up to 100 non-null values are sampled against a
//! fixed regex table. A pattern counts when more than 10% of the sampled
//! values match. Both heuristics are name/pattern based, not a
//! certified compliance tool.

use indexmap::IndexMap;
use regex::Regex;
use tracing::info;

use crate::config::{PiiConfig, normalize_column_name};
use crate::types::Dataset;

/// Category recorded when the column name itself suggests PII.
pub const COLUMN_NAME_MATCH: &str = "COLUMN_NAME_MATCH";

pub struct PiiDetector {
    config: PiiConfig,
}

impl Default for PiiDetector {
    fn default() -> Self {
        Self::new(PiiConfig::default())
    }
}

impl PiiDetector {
    pub fn new(config: PiiConfig) -> Self {
        Self { config }
    }

    /// Detect PII across all columns. Returns column name → matched
    /// categories, restricted to columns with at least one match, in
    /// column order.
    pub fn detect(&self, dataset: &Dataset) -> IndexMap<String, Vec<String>> {
        let mut pii_by_column = IndexMap::new();
        if dataset.is_empty() {
            return pii_by_column;
        }

        for column in dataset.column_names() {
            let mut categories = Vec::new();

            if self.is_pii_column_name(&column) {
                categories.push(COLUMN_NAME_MATCH.to_string());
            }

            let samples = self.sample_values(dataset, &column);
            for (name, pattern) in &self.config.patterns {
                if self.pattern_matches(&samples, pattern) {
                    categories.push(name.clone());
                }
            }

            if !categories.is_empty() {
                info!(column = %column, categories = ?categories, "PII detected in column");
                pii_by_column.insert(column, categories);
            }
        }

        pii_by_column
    }

    /// Static guidance text for the findings section.
    pub fn recommendations(&self, pii_by_column: &IndexMap<String, Vec<String>>) -> Vec<String> {
        if pii_by_column.is_empty() {
            return vec!["No PII detected. Data appears safe for general use.".to_string()];
        }

        vec![
            format!(
                "PII detected in {} column(s). Consider the following:",
                pii_by_column.len()
            ),
            "1. Encrypt or hash sensitive columns before storage".to_string(),
            "2. Implement access controls and audit logging".to_string(),
            "3. Consider anonymization or pseudonymization techniques".to_string(),
            "4. Ensure compliance with GDPR, CCPA, or other privacy regulations".to_string(),
            "5. Remove or mask PII if not necessary for analysis".to_string(),
        ]
    }

    fn is_pii_column_name(&self, column_name: &str) -> bool {
        let normalized = normalize_column_name(column_name);
        self.config
            .column_names
            .iter()
            .any(|pii_name| normalized.contains(&normalize_column_name(pii_name)))
    }

    /// First `sample_size` non-null values of the column, rendered.
    fn sample_values(&self, dataset: &Dataset, column: &str) -> Vec<String> {
        dataset
            .column_values(column)
            .filter(|v| !v.is_null())
            .take(self.config.sample_size)
            .map(|v| v.render())
            .collect()
    }

    fn pattern_matches(&self, samples: &[String], pattern: &Regex) -> bool {
        if samples.is_empty() {
            return false;
        }
        let match_count = samples.iter().filter(|v| pattern.is_match(v)).count();
        match_count as f64 / samples.len() as f64 > self.config.match_threshold
    }
}
