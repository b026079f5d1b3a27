//! Analysis orchestration.
//!
//! [`QualityEngine::analyze`] runs the full pipeline over one dataset:
//! profiling, duplicate detection, metric computation, optional PII and
//! bias detection, health scoring and report assembly. The engine holds
//! no per-analysis state, so one instance can serve many datasets.

use std::time::Instant;

use tracing::{info, warn};
use uuid::Uuid;

use crate::config::AnalysisOptions;
use crate::detectors::{BiasDetector, DuplicateDetector, PiiDetector};
use crate::error::{QualityError, Result};
use crate::profiler::DataProfiler;
use crate::quality::{HealthScorer, MetricsComputer};
use crate::types::{
    BiasReport, Dataset, DatasetSummary, PiiFindings, QualityLevel, QualityReport,
};

/// Bias dimension score folded into the metrics when the bias check runs.
const BIAS_DETECTED_SCORE: f64 = 60.0;
const BIAS_CLEAN_SCORE: f64 = 95.0;

pub struct QualityEngine {
    pii_detector: PiiDetector,
    bias_detector: BiasDetector,
}

impl Default for QualityEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl QualityEngine {
    pub fn new() -> Self {
        Self {
            pii_detector: PiiDetector::default(),
            bias_detector: BiasDetector::default(),
        }
    }

    /// Run the full analysis pipeline. An empty dataset is not an error:
    /// it produces a degenerate report whose row-count override pins the
    /// health score at 5.0 (CRITICAL).
    pub fn analyze(&self, dataset: &Dataset, options: &AnalysisOptions) -> Result<QualityReport> {
        let started = Instant::now();
        let analysis_id = Uuid::new_v4().to_string();

        Self::validate_options(options)?;

        info!(
            analysis_id = %analysis_id,
            rows = dataset.row_count(),
            "Starting data quality analysis"
        );

        if dataset.is_empty() {
            // Recoverable by contract: the pipeline runs through and the
            // row-count override degrades the report instead.
            let cause = QualityError::EmptyDataset;
            warn!(code = cause.error_code(), "{cause}");
        }

        info!("Step 1/4: Profiling data...");
        let mut column_profiles = DataProfiler::profile_dataset(dataset);
        let duplicate_analysis = DuplicateDetector::analyze(dataset, &column_profiles);

        info!("Step 2/4: Computing quality metrics...");
        let mut quality_metrics = MetricsComputer::compute(
            dataset,
            &column_profiles,
            &duplicate_analysis,
            options.schema_definition.as_ref(),
        );

        let pii_findings = if options.perform_pii_check {
            info!("Step 3/4: Detecting PII...");
            let pii_by_column = self.pii_detector.detect(dataset);

            column_profiles = column_profiles
                .into_iter()
                .map(|profile| match pii_by_column.get(&profile.column_name) {
                    Some(categories) => profile.with_pii(categories.clone()),
                    None => profile,
                })
                .collect();

            Some(PiiFindings {
                pii_detected: !pii_by_column.is_empty(),
                total_pii_columns: pii_by_column.len(),
                recommendations: self.pii_detector.recommendations(&pii_by_column),
                pii_by_column,
            })
        } else {
            None
        };

        let bias_report: Option<BiasReport> = if options.perform_bias_check {
            info!("Detecting bias...");
            let report = self.bias_detector.detect(dataset);

            quality_metrics.bias_detected = Some(report.bias_detected);
            quality_metrics.bias_description = Some(report.description.clone());
            quality_metrics.bias_score = Some(if report.bias_detected {
                BIAS_DETECTED_SCORE
            } else {
                BIAS_CLEAN_SCORE
            });

            Some(report)
        } else {
            None
        };

        info!("Step 4/4: Computing health score...");
        let health_score = HealthScorer::compute_health_score(
            &quality_metrics,
            pii_findings.as_ref(),
            bias_report.as_ref(),
        );
        let quality_level = QualityLevel::from_score(health_score);

        let issues =
            HealthScorer::generate_issues(&column_profiles, &quality_metrics, pii_findings.as_ref());
        let recommendations =
            HealthScorer::generate_recommendations(health_score, &quality_metrics, &issues);

        let column_names = dataset.column_names();
        let summary = DatasetSummary {
            row_count: dataset.row_count() as u64,
            column_count: column_names.len() as u64,
            total_cells: dataset.row_count() as u64 * column_names.len() as u64,
            column_names,
        };

        let processing_time_ms = started.elapsed().as_millis() as u64;
        info!(
            health_score,
            processing_time_ms, "Analysis complete"
        );

        Ok(QualityReport {
            analysis_id,
            timestamp: chrono::Utc::now(),
            health_score,
            quality_level,
            summary,
            quality_metrics,
            column_profiles,
            issues,
            recommendations,
            pii_findings,
            duplicate_analysis,
            processing_time_ms,
        })
    }

    fn validate_options(options: &AnalysisOptions) -> Result<()> {
        if let Some(schema) = &options.schema_definition {
            if schema.keys().any(|column| column.trim().is_empty()) {
                return Err(QualityError::InvalidConfig(
                    "schema definition contains an empty column name".to_string(),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn dataset(json: &str) -> Dataset {
        serde_json::from_str(json).expect("test dataset should parse")
    }

    #[test]
    fn empty_dataset_yields_degenerate_critical_report() {
        let report = QualityEngine::new()
            .analyze(&Dataset::default(), &AnalysisOptions::default())
            .unwrap();

        assert_eq!(report.health_score, 5.0);
        assert_eq!(report.quality_level, QualityLevel::Critical);
        assert!(report.column_profiles.is_empty());
        assert_eq!(report.summary.row_count, 0);
        assert_eq!(report.summary.column_count, 0);
        assert_eq!(report.quality_metrics.null_percentage, 100.0);
    }

    #[test]
    fn pii_check_enriches_matching_profiles() {
        let ds = dataset(
            r#"[{"email": "a@x.io", "qty": 1},
                {"email": "b@x.io", "qty": 2},
                {"email": "c@x.io", "qty": 3},
                {"email": "d@x.io", "qty": 4},
                {"email": "e@x.io", "qty": 5}]"#,
        );
        let report = QualityEngine::new()
            .analyze(&ds, &AnalysisOptions::default())
            .unwrap();

        let email = report
            .column_profiles
            .iter()
            .find(|p| p.column_name == "email")
            .unwrap();
        assert!(email.has_pii);
        let qty = report
            .column_profiles
            .iter()
            .find(|p| p.column_name == "qty")
            .unwrap();
        assert!(!qty.has_pii);

        let findings = report.pii_findings.unwrap();
        assert!(findings.pii_detected);
        assert_eq!(findings.total_pii_columns, 1);
    }

    #[test]
    fn pii_check_can_be_disabled() {
        let ds = dataset(r#"[{"email": "a@x.io"}, {"email": "b@x.io"}]"#);
        let options = AnalysisOptions::default().with_pii_check(false);
        let report = QualityEngine::new().analyze(&ds, &options).unwrap();
        assert!(report.pii_findings.is_none());
        assert!(report.column_profiles.iter().all(|p| !p.has_pii));
    }

    #[test]
    fn bias_check_folds_scores_into_metrics() {
        let mut rows = Vec::new();
        for _ in 0..9 {
            rows.push(r#"{"gender": "M", "v": 1}"#);
        }
        rows.push(r#"{"gender": "F", "v": 2}"#);
        let ds = dataset(&format!("[{}]", rows.join(",")));

        let options = AnalysisOptions::default().with_bias_check(true);
        let report = QualityEngine::new().analyze(&ds, &options).unwrap();

        assert_eq!(report.quality_metrics.bias_detected, Some(true));
        assert_eq!(report.quality_metrics.bias_score, Some(60.0));
        assert!(report.quality_metrics.bias_description.is_some());
    }

    #[test]
    fn bias_fields_stay_unset_without_check() {
        let ds = dataset(r#"[{"gender": "M"}, {"gender": "F"}]"#);
        let report = QualityEngine::new()
            .analyze(&ds, &AnalysisOptions::default())
            .unwrap();
        assert_eq!(report.quality_metrics.bias_score, None);
        assert_eq!(report.quality_metrics.bias_detected, None);
    }

    #[test]
    fn empty_schema_column_name_is_rejected() {
        let ds = dataset(r#"[{"a": 1}]"#);
        let mut schema = indexmap::IndexMap::new();
        schema.insert(" ".to_string(), "INTEGER".to_string());
        let options = AnalysisOptions::default().with_schema(schema);

        let err = QualityEngine::new().analyze(&ds, &options).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_CONFIG");
    }
}
