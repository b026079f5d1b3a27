//! Column profiling: type inference, descriptive statistics, outlier
//! detection and per-column quality-issue flags.

mod statistics;
mod type_inference;

use std::collections::HashSet;

use indexmap::IndexMap;
use tracing::{error, info, warn};

use crate::error::{QualityError, Result};
use crate::types::{ColumnProfile, DataType, Dataset, Value};

pub(crate) use statistics::is_implausible_for_column;
pub(crate) use type_inference::value_matches_type;

use statistics::{NumericSummary, detect_outliers};
use type_inference::infer_column_type;

/// Data profiler for per-column analysis.
pub struct DataProfiler;

impl DataProfiler {
    /// Profile every column of the dataset, in row-0 column order.
    ///
    /// A failure profiling one column is logged and the column skipped;
    /// the rest of the batch continues. An empty dataset yields an empty
    /// profile list.
    pub fn profile_dataset(dataset: &Dataset) -> Vec<ColumnProfile> {
        if dataset.is_empty() {
            warn!("Dataset is empty, returning empty profile list");
            return Vec::new();
        }

        let columns = dataset.column_names();
        if columns.is_empty() {
            warn!("No columns found in dataset");
            return Vec::new();
        }

        info!(rows = dataset.row_count(), "Profiling dataset");

        let mut profiles = Vec::with_capacity(columns.len());
        for column in &columns {
            match Self::profile_column(dataset, column) {
                Ok(profile) => profiles.push(profile),
                Err(e) => {
                    error!(column = %column, error = %e, "Error profiling column, skipping");
                }
            }
        }

        profiles
    }

    /// Profile a single column.
    pub fn profile_column(dataset: &Dataset, column_name: &str) -> Result<ColumnProfile> {
        let values: Vec<&Value> = dataset.column_values(column_name).collect();

        let total_count = values.len() as u64;
        if total_count == 0 {
            return Err(QualityError::ColumnProfiling {
                column: column_name.to_string(),
                reason: "no rows".to_string(),
            });
        }

        let null_count = values.iter().filter(|v| v.is_null()).count() as u64;
        let non_null_count = total_count - null_count;

        let unique: HashSet<&Value> = values.iter().filter(|v| !v.is_null()).copied().collect();
        let unique_count = unique.len() as u64;

        let null_percentage = null_count as f64 * 100.0 / total_count as f64;
        let unique_percentage = if non_null_count > 0 {
            unique_count as f64 * 100.0 / non_null_count as f64
        } else {
            0.0
        };

        let data_type = infer_column_type(values.iter().copied());

        let mut profile = ColumnProfile {
            column_name: column_name.to_string(),
            data_type,
            total_count,
            null_count,
            unique_count,
            null_percentage,
            unique_percentage,
            mean: None,
            median: None,
            std_dev: None,
            min: None,
            max: None,
            q1: None,
            q3: None,
            value_counts: None,
            top_values: None,
            has_outliers: false,
            outlier_values: Vec::new(),
            quality_issues: Vec::new(),
            has_pii: false,
            pii_types: Vec::new(),
        };

        if data_type == DataType::Numeric {
            Self::fill_numeric_statistics(&values, &mut profile);
        } else {
            Self::fill_categorical_statistics(&values, &mut profile);
        }

        profile.quality_issues = Self::detect_quality_issues(&profile);

        Ok(profile)
    }

    /// Numeric path: statistics over parseable values only. Unparseable
    /// non-null values are excluded from statistics, not from the counts.
    fn fill_numeric_statistics(values: &[&Value], profile: &mut ColumnProfile) {
        let numeric_values: Vec<f64> = values.iter().filter_map(|v| v.as_number()).collect();

        let Some(summary) = NumericSummary::compute(&numeric_values) else {
            return;
        };

        profile.mean = Some(summary.mean);
        profile.median = Some(summary.median);
        profile.std_dev = Some(summary.std_dev);
        profile.min = Some(summary.min);
        profile.max = Some(summary.max);
        profile.q1 = Some(summary.q1);
        profile.q3 = Some(summary.q3);

        let outliers = detect_outliers(
            &profile.column_name,
            &numeric_values,
            summary.q1,
            summary.q3,
        );
        if !outliers.is_empty() {
            profile.has_outliers = true;
            profile.outlier_values = outliers;
        }
    }

    /// Categorical path: group non-null values by their string rendering.
    fn fill_categorical_statistics(values: &[&Value], profile: &mut ColumnProfile) {
        let mut counts: IndexMap<String, u64> = IndexMap::new();
        for value in values {
            if value.is_null() {
                continue;
            }
            *counts.entry(value.render()).or_insert(0) += 1;
        }

        if counts.is_empty() {
            return;
        }

        // Top 10 by descending count, ties in first-seen order.
        let mut entries: Vec<(&String, &u64)> = counts.iter().collect();
        entries.sort_by(|a, b| b.1.cmp(a.1));
        let top_values: Vec<String> = entries.iter().take(10).map(|(k, _)| (*k).clone()).collect();

        // Value-count map capped at 20 entries, first-seen order.
        let capped: IndexMap<String, u64> = counts.into_iter().take(20).collect();

        profile.value_counts = Some(capped);
        profile.top_values = Some(top_values);
    }

    /// Flag column-level quality issues. Checks are independent; a column
    /// may report several.
    fn detect_quality_issues(profile: &ColumnProfile) -> Vec<String> {
        let mut issues = Vec::new();

        let null_percentage = profile.null_percentage;
        if null_percentage > 50.0 {
            issues.push(format!(
                "High null percentage: {null_percentage:.2}% (more than half the data is missing)"
            ));
        } else if null_percentage > 20.0 {
            issues.push(format!(
                "Moderate null percentage: {null_percentage:.2}% (significant missing data)"
            ));
        } else if null_percentage > 10.0 {
            issues.push(format!(
                "Low null percentage: {null_percentage:.2}% (some missing data)"
            ));
        }

        if profile.unique_count == 1 && profile.null_count == 0 {
            issues.push(
                "Column has only one unique value (constant column - may not be useful)"
                    .to_string(),
            );
        }

        let non_null_count = profile.non_null_count();
        if profile.unique_count == non_null_count && profile.total_count > 10 {
            issues.push(
                "All non-null values are unique (possibly an identifier or key column)"
                    .to_string(),
            );
        }

        if profile.data_type == DataType::Categorical && non_null_count > 10 {
            let unique_ratio = profile.unique_count as f64 / non_null_count as f64;
            if unique_ratio < 0.1 {
                issues.push(format!(
                    "Very low diversity: only {} unique values for {} rows ({:.1}%)",
                    profile.unique_count,
                    non_null_count,
                    unique_ratio * 100.0
                ));
            }
        }

        issues
    }
}
