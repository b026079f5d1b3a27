//! Quality dimension computation.
//!
//! Combines column profiles, the duplicate analysis and an optional schema
//! into the six dimension scores. All scores live in [0, 100]; formulas
//! and defaults are part of the compatibility surface.

use indexmap::IndexMap;
use tracing::{debug, info, warn};

use crate::profiler::{is_implausible_for_column, value_matches_type};
use crate::types::{ColumnProfile, DataType, Dataset, DuplicateAnalysis, ExpectedType, QualityMetrics};

/// Accuracy score assumed when no schema is supplied: the engine cannot
/// verify correctness without ground truth, so it assumes "probably fine".
const NO_SCHEMA_ACCURACY: f64 = 95.0;

/// Timeliness score when temporal data is present; staleness cannot be
/// quantified without a reference clock.
const TEMPORAL_TIMELINESS: f64 = 85.0;

pub struct MetricsComputer;

impl MetricsComputer {
    /// Compute the six quality dimensions.
    pub fn compute(
        dataset: &Dataset,
        profiles: &[ColumnProfile],
        duplicates: &DuplicateAnalysis,
        schema: Option<&IndexMap<String, String>>,
    ) -> QualityMetrics {
        if dataset.is_empty() || profiles.is_empty() {
            warn!("Dataset is empty, returning default metrics");
            return Self::empty_metrics();
        }

        info!(rows = dataset.row_count(), "Computing quality metrics");

        let mut metrics = Self::empty_metrics();

        Self::compute_completeness(profiles, &mut metrics);
        Self::compute_uniqueness(dataset, duplicates, &mut metrics);

        let schema_violations = schema
            .map(|s| Self::count_schema_violations(dataset, s))
            .unwrap_or(0);

        Self::compute_validity(profiles, schema_violations, &mut metrics);
        Self::compute_consistency(profiles, &mut metrics);
        Self::compute_accuracy(dataset, schema, schema_violations, &mut metrics);
        Self::compute_timeliness(profiles, &mut metrics);

        metrics
    }

    /// Documented empty-data defaults: all scores zero, null percentage
    /// 100.
    pub fn empty_metrics() -> QualityMetrics {
        QualityMetrics {
            completeness_score: 0.0,
            total_cells: 0,
            null_cells: 0,
            null_percentage: 100.0,
            uniqueness_score: 0.0,
            total_rows: 0,
            duplicate_rows: 0,
            duplicate_percentage: 0.0,
            validity_score: 0.0,
            invalid_values: 0,
            invalid_percentage: 0.0,
            consistency_score: 0.0,
            inconsistent_values: 0,
            inconsistent_percentage: 0.0,
            accuracy_score: 0.0,
            schema_violations: 0,
            timeliness_score: 0.0,
            has_temporal_data: false,
            bias_score: None,
            bias_detected: None,
            bias_description: None,
        }
    }

    fn compute_completeness(profiles: &[ColumnProfile], metrics: &mut QualityMetrics) {
        let total_cells: u64 = profiles.iter().map(|p| p.total_count).sum();
        let null_cells: u64 = profiles.iter().map(|p| p.null_count).sum();

        let null_percentage = if total_cells > 0 {
            null_cells as f64 * 100.0 / total_cells as f64
        } else {
            0.0
        };

        metrics.total_cells = total_cells;
        metrics.null_cells = null_cells;
        metrics.null_percentage = null_percentage;
        metrics.completeness_score = 100.0 - null_percentage;

        debug!(
            score = metrics.completeness_score,
            nulls = null_cells,
            cells = total_cells,
            "Completeness"
        );
    }

    fn compute_uniqueness(
        dataset: &Dataset,
        duplicates: &DuplicateAnalysis,
        metrics: &mut QualityMetrics,
    ) {
        metrics.total_rows = dataset.row_count() as u64;
        metrics.duplicate_rows = duplicates.total_duplicates;
        metrics.duplicate_percentage = duplicates.duplicate_percentage;
        metrics.uniqueness_score = 100.0 - duplicates.duplicate_percentage;

        debug!(
            score = metrics.uniqueness_score,
            duplicates = metrics.duplicate_rows,
            "Uniqueness"
        );
    }

    /// Invalid values: nulls of columns that are more than half null
    /// (unusable columns, counted again on top of the completeness null
    /// accounting deliberately), implausible outliers, and schema
    /// violations.
    fn compute_validity(
        profiles: &[ColumnProfile],
        schema_violations: u64,
        metrics: &mut QualityMetrics,
    ) {
        let mut invalid_values = 0u64;

        for profile in profiles {
            if profile.null_count as f64 > profile.total_count as f64 * 0.5 {
                invalid_values += profile.null_count;
            }

            if profile.data_type == DataType::Numeric && profile.has_outliers {
                invalid_values += profile
                    .outlier_values
                    .iter()
                    .filter(|&&v| is_implausible_for_column(&profile.column_name, v))
                    .count() as u64;
            }
        }

        invalid_values += schema_violations;

        let invalid_percentage = if metrics.total_cells > 0 {
            invalid_values as f64 * 100.0 / metrics.total_cells as f64
        } else {
            0.0
        };

        metrics.invalid_values = invalid_values;
        metrics.invalid_percentage = invalid_percentage;
        metrics.validity_score = (100.0 - invalid_percentage).max(0.0);

        debug!(score = metrics.validity_score, invalid = invalid_values, "Validity");
    }

    /// Continuous penalty for suspiciously low categorical diversity:
    /// `nonNull × (0.3 − uniqueRatio)` estimated inconsistent values per
    /// qualifying column. Not a count of specific bad rows.
    fn compute_consistency(profiles: &[ColumnProfile], metrics: &mut QualityMetrics) {
        let mut estimated_inconsistent = 0.0f64;

        for profile in profiles {
            if profile.data_type != DataType::Categorical {
                continue;
            }
            let non_null = profile.non_null_count();
            if non_null <= 10 {
                continue;
            }
            let unique_ratio = profile.unique_count as f64 / non_null as f64;
            if unique_ratio < 0.3 {
                estimated_inconsistent += non_null as f64 * (0.3 - unique_ratio);
            }
        }

        let inconsistent_percentage = if metrics.total_cells > 0 {
            estimated_inconsistent * 100.0 / metrics.total_cells as f64
        } else {
            0.0
        };

        metrics.inconsistent_values = estimated_inconsistent.round() as u64;
        metrics.inconsistent_percentage = inconsistent_percentage;
        metrics.consistency_score = (100.0 - inconsistent_percentage).max(0.0);

        debug!(score = metrics.consistency_score, "Consistency");
    }

    fn compute_accuracy(
        dataset: &Dataset,
        schema: Option<&IndexMap<String, String>>,
        schema_violations: u64,
        metrics: &mut QualityMetrics,
    ) {
        let Some(schema) = schema.filter(|s| !s.is_empty()) else {
            metrics.schema_violations = 0;
            metrics.accuracy_score = NO_SCHEMA_ACCURACY;
            debug!(score = NO_SCHEMA_ACCURACY, "Accuracy (no schema provided)");
            return;
        };

        let total_values = dataset.row_count() as u64 * schema.len() as u64;
        let accuracy_score = if total_values > 0 {
            (100.0 - schema_violations as f64 * 100.0 / total_values as f64).max(0.0)
        } else {
            NO_SCHEMA_ACCURACY
        };

        metrics.schema_violations = schema_violations;
        metrics.accuracy_score = accuracy_score;

        debug!(
            score = accuracy_score,
            violations = schema_violations,
            checked = total_values,
            "Accuracy"
        );
    }

    fn compute_timeliness(profiles: &[ColumnProfile], metrics: &mut QualityMetrics) {
        let has_temporal_data = profiles.iter().any(|p| p.data_type == DataType::Date);
        metrics.has_temporal_data = has_temporal_data;
        metrics.timeliness_score = if has_temporal_data {
            TEMPORAL_TIMELINESS
        } else {
            100.0
        };

        debug!(score = metrics.timeliness_score, "Timeliness");
    }

    /// Count non-null cells that fail their schema-expected type. Columns
    /// named by the schema but absent from a row contribute nothing.
    fn count_schema_violations(dataset: &Dataset, schema: &IndexMap<String, String>) -> u64 {
        let expected: Vec<(&String, ExpectedType)> = schema
            .iter()
            .map(|(column, type_name)| (column, ExpectedType::parse(type_name)))
            .collect();

        let mut violations = 0u64;
        for row in &dataset.rows {
            for (column, expected_type) in &expected {
                if let Some(value) = row.get(column.as_str()) {
                    if !value.is_null() && !value_matches_type(value, *expected_type) {
                        violations += 1;
                    }
                }
            }
        }
        violations
    }
}
