//! Demographic bias detection.
//!
//! Columns whose names match a sensitive-attribute vocabulary are flagged,
//! and their value distributions are checked for imbalance. The dominant
//! value share of the most imbalanced sensitive column feeds the health
//! scorer's bias penalty.

use indexmap::IndexMap;
use tracing::info;

use crate::config::{BiasConfig, normalize_column_name};
use crate::types::{BiasReport, Dataset};

pub struct BiasDetector {
    config: BiasConfig,
}

impl Default for BiasDetector {
    fn default() -> Self {
        Self::new(BiasConfig::default())
    }
}

impl BiasDetector {
    pub fn new(config: BiasConfig) -> Self {
        Self { config }
    }

    /// Detect potential bias in the dataset.
    pub fn detect(&self, dataset: &Dataset) -> BiasReport {
        if dataset.is_empty() {
            return BiasReport {
                bias_detected: false,
                sensitive_columns: Vec::new(),
                findings: Vec::new(),
                description: "No data to analyze".to_string(),
                dominance_percentage: None,
            };
        }

        let sensitive_columns: Vec<String> = dataset
            .column_names()
            .into_iter()
            .filter(|name| self.is_sensitive_attribute(name))
            .collect();

        let bias_detected = !sensitive_columns.is_empty();
        let mut findings = Vec::new();
        let mut dominance_percentage: Option<f64> = None;

        if bias_detected {
            info!(columns = ?sensitive_columns, "Sensitive attributes detected");
            findings.push(format!(
                "Sensitive attributes detected: {}",
                sensitive_columns.join(", ")
            ));
            findings.push("These columns may introduce bias in ML models".to_string());

            for column in &sensitive_columns {
                let distribution = Self::value_distribution(dataset, column);
                let dominance = Self::dominant_share(&distribution);
                if let Some(share) = dominance {
                    let share_pct = share * 100.0;
                    if dominance_percentage.is_none_or(|current| share_pct > current) {
                        dominance_percentage = Some(share_pct);
                    }
                    if distribution.len() > 1 && share > self.config.dominance_threshold {
                        findings.push(format!(
                            "Imbalanced distribution in '{}': {}",
                            column,
                            format_distribution(&distribution)
                        ));
                    }
                }
            }
        }

        let description = if bias_detected {
            "Potential bias detected in dataset. Review sensitive attributes.".to_string()
        } else {
            "No obvious bias indicators detected.".to_string()
        };

        BiasReport {
            bias_detected,
            sensitive_columns,
            findings,
            description,
            dominance_percentage,
        }
    }

    fn is_sensitive_attribute(&self, column_name: &str) -> bool {
        let normalized = normalize_column_name(column_name);
        self.config
            .sensitive_attributes
            .iter()
            .any(|attr| normalized.contains(&normalize_column_name(attr)))
    }

    /// Value → count over all rows, nulls rendered as "null".
    fn value_distribution(dataset: &Dataset, column: &str) -> IndexMap<String, u64> {
        let mut distribution = IndexMap::new();
        for value in dataset.column_values(column) {
            *distribution.entry(value.render()).or_insert(0) += 1;
        }
        distribution
    }

    /// Share of the most frequent value, or `None` for an empty
    /// distribution.
    fn dominant_share(distribution: &IndexMap<String, u64>) -> Option<f64> {
        let total: u64 = distribution.values().sum();
        if total == 0 {
            return None;
        }
        let max = *distribution.values().max()?;
        Some(max as f64 / total as f64)
    }
}

fn format_distribution(distribution: &IndexMap<String, u64>) -> String {
    let entries: Vec<String> = distribution
        .iter()
        .map(|(value, count)| format!("{value}={count}"))
        .collect();
    format!("{{{}}}", entries.join(", "))
}
