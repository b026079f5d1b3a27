//! Health scoring: weighted aggregation, penalties and overrides.
//!
//! The score is a weighted sum of the seven dimensions, reduced by
//! bias/PII penalties, then bounded by catastrophic overrides. Overrides
//! are evaluated independently and every applicable bound is applied, so
//! a dataset tripping several rules lands at the lowest bound.

use tracing::{debug, info, warn};

use crate::types::{
    BiasReport, ColumnProfile, DataQualityIssue, IssueType, PiiFindings, QualityLevel,
    QualityMetrics, Severity,
};

const COMPLETENESS_WEIGHT: f64 = 0.25;
const UNIQUENESS_WEIGHT: f64 = 0.15;
const VALIDITY_WEIGHT: f64 = 0.20;
const CONSISTENCY_WEIGHT: f64 = 0.12;
const ACCURACY_WEIGHT: f64 = 0.13;
const TIMELINESS_WEIGHT: f64 = 0.05;
const BIAS_WEIGHT: f64 = 0.10;

/// Bias dimension score assumed when no bias check ran.
const DEFAULT_BIAS_SCORE: f64 = 95.0;

pub struct HealthScorer;

impl HealthScorer {
    /// Compute the overall health score with penalties and override rules.
    pub fn compute_health_score(
        metrics: &QualityMetrics,
        pii_findings: Option<&PiiFindings>,
        bias_report: Option<&BiasReport>,
    ) -> f64 {
        let bias_score = metrics.bias_score.unwrap_or(DEFAULT_BIAS_SCORE);

        let base_score = metrics.completeness_score * COMPLETENESS_WEIGHT
            + metrics.uniqueness_score * UNIQUENESS_WEIGHT
            + metrics.validity_score * VALIDITY_WEIGHT
            + metrics.consistency_score * CONSISTENCY_WEIGHT
            + metrics.accuracy_score * ACCURACY_WEIGHT
            + metrics.timeliness_score * TIMELINESS_WEIGHT
            + bias_score * BIAS_WEIGHT;

        debug!(base_score, "Base score before penalties");

        let bias_penalty = Self::bias_penalty(bias_report);
        let pii_penalty = Self::pii_penalty(pii_findings);
        let total_penalty = bias_penalty + pii_penalty;

        debug!(bias_penalty, pii_penalty, "Penalties");

        let penalized = (base_score - total_penalty).max(0.0);
        let bounded = Self::apply_catastrophic_overrides(penalized, metrics);

        let final_score = ((bounded * 100.0).round() / 100.0).clamp(0.0, 100.0);
        info!(final_score, base_score, total_penalty, "Final health score");
        final_score
    }

    /// Bias penalty in [0, 15], scaled by the dominant value share of the
    /// most imbalanced sensitive column.
    fn bias_penalty(bias_report: Option<&BiasReport>) -> f64 {
        let Some(report) = bias_report.filter(|r| r.bias_detected) else {
            return 0.0;
        };

        let Some(dominance) = report.dominance_percentage else {
            // Bias detected but no measurable dominance: flat penalty.
            return 5.0;
        };

        if dominance < 60.0 {
            0.0
        } else if dominance >= 90.0 {
            15.0
        } else {
            (dominance - 60.0) * 0.5
        }
    }

    /// PII penalty in [0, 15], stepped by affected column count.
    fn pii_penalty(pii_findings: Option<&PiiFindings>) -> f64 {
        let Some(findings) = pii_findings.filter(|f| f.pii_detected) else {
            return 0.0;
        };

        match findings.total_pii_columns {
            0 => 0.0,
            1 => 3.0,
            2 => 7.0,
            n => (7.0 + (n as f64 - 2.0) * 3.0).min(15.0),
        }
    }

    /// Every applicable override bounds the score; the bounds min-chain so
    /// the worst one wins.
    fn apply_catastrophic_overrides(current_score: f64, metrics: &QualityMetrics) -> f64 {
        let mut score = current_score;

        if metrics.total_rows < 5 {
            warn!("CATASTROPHIC: Less than 5 rows detected. Overriding score to 5.");
            score = score.min(5.0);
        }

        if metrics.null_percentage > 90.0 {
            warn!("CATASTROPHIC: >90% nulls detected. Overriding score to 10.");
            score = score.min(10.0);
        }

        if metrics.duplicate_percentage >= 80.0 {
            warn!("CATASTROPHIC: >=80% duplicates detected. Overriding score to 20.");
            score = score.min(20.0);
        }

        if metrics.invalid_percentage > 80.0 {
            warn!("CATASTROPHIC: >80% invalid values detected. Overriding score to 15.");
            score = score.min(15.0);
        }

        score
    }

    /// Aggregate dataset-level and column-level issues.
    pub fn generate_issues(
        column_profiles: &[ColumnProfile],
        metrics: &QualityMetrics,
        pii_findings: Option<&PiiFindings>,
    ) -> Vec<DataQualityIssue> {
        let mut issues = Vec::new();

        if metrics.null_percentage > 20.0 {
            issues.push(DataQualityIssue {
                issue_type: IssueType::Completeness,
                severity: if metrics.null_percentage > 50.0 {
                    Severity::High
                } else {
                    Severity::Medium
                },
                column_name: None,
                description: format!("{:.2}% of cells are null", metrics.null_percentage),
                affected_rows: Some(metrics.null_cells),
                recommendation: "Consider imputation strategies or data collection improvements"
                    .to_string(),
            });
        }

        if metrics.duplicate_percentage > 5.0 {
            issues.push(DataQualityIssue {
                issue_type: IssueType::Duplicates,
                severity: if metrics.duplicate_percentage > 20.0 {
                    Severity::High
                } else {
                    Severity::Medium
                },
                column_name: None,
                description: format!("{:.2}% of rows are duplicates", metrics.duplicate_percentage),
                affected_rows: Some(metrics.duplicate_rows),
                recommendation: "Remove duplicate records or investigate data collection process"
                    .to_string(),
            });
        }

        for profile in column_profiles {
            for issue in &profile.quality_issues {
                issues.push(DataQualityIssue {
                    issue_type: IssueType::ColumnQuality,
                    severity: Severity::Medium,
                    column_name: Some(profile.column_name.clone()),
                    description: issue.clone(),
                    affected_rows: None,
                    recommendation: "Review and clean column data".to_string(),
                });
            }

            if profile.has_outliers {
                issues.push(DataQualityIssue {
                    issue_type: IssueType::Outliers,
                    severity: Severity::Low,
                    column_name: Some(profile.column_name.clone()),
                    description: "Outliers detected in numeric column".to_string(),
                    affected_rows: None,
                    recommendation:
                        "Review outliers to determine if they are errors or valid extreme values"
                            .to_string(),
                });
            }
        }

        if let Some(findings) = pii_findings.filter(|f| f.pii_detected) {
            issues.push(DataQualityIssue {
                issue_type: IssueType::PiiDetected,
                severity: Severity::High,
                column_name: None,
                description: format!("PII detected in {} column(s)", findings.total_pii_columns),
                affected_rows: None,
                recommendation: "Implement data masking, encryption, or anonymization".to_string(),
            });
        }

        issues
    }

    /// Human-readable recommendations headed by the overall verdict.
    pub fn generate_recommendations(
        health_score: f64,
        metrics: &QualityMetrics,
        issues: &[DataQualityIssue],
    ) -> Vec<String> {
        let level = QualityLevel::from_score(health_score);

        let mut recommendations = vec![format!(
            "Overall Data Quality: {level} (Score: {health_score:.2}/100)"
        )];

        recommendations.push(
            match level {
                QualityLevel::Excellent => {
                    "Your data quality is excellent! Continue monitoring for consistency."
                }
                QualityLevel::Good => "Good data quality. Address minor issues to achieve excellence.",
                QualityLevel::Fair => {
                    "Fair data quality. Several improvements needed for production use."
                }
                QualityLevel::Poor => {
                    "Poor data quality. Significant improvements required before using this data."
                }
                QualityLevel::Critical => "Critical data quality issues! Immediate action required.",
            }
            .to_string(),
        );

        if metrics.completeness_score < 80.0 {
            recommendations.push("Improve data completeness by addressing missing values".to_string());
        }
        if metrics.uniqueness_score < 85.0 {
            recommendations.push("Remove or investigate duplicate records".to_string());
        }
        if metrics.validity_score < 85.0 {
            recommendations
                .push("Validate data against business rules and constraints".to_string());
        }
        if !issues.is_empty() {
            recommendations.push(format!(
                "Address {} identified issues (see issues list for details)",
                issues.len()
            ));
        }

        recommendations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quality::MetricsComputer;
    use pretty_assertions::assert_eq;

    fn healthy_metrics() -> QualityMetrics {
        QualityMetrics {
            completeness_score: 100.0,
            uniqueness_score: 100.0,
            validity_score: 100.0,
            consistency_score: 100.0,
            accuracy_score: 100.0,
            timeliness_score: 100.0,
            total_rows: 100,
            null_percentage: 0.0,
            ..MetricsComputer::empty_metrics()
        }
    }

    fn bias_report(dominance: Option<f64>) -> BiasReport {
        BiasReport {
            bias_detected: true,
            sensitive_columns: vec!["gender".to_string()],
            findings: Vec::new(),
            description: String::new(),
            dominance_percentage: dominance,
        }
    }

    fn pii_findings(columns: usize) -> PiiFindings {
        PiiFindings {
            pii_detected: columns > 0,
            total_pii_columns: columns,
            pii_by_column: indexmap::IndexMap::new(),
            recommendations: Vec::new(),
        }
    }

    fn profile(name: &str) -> ColumnProfile {
        ColumnProfile {
            column_name: name.to_string(),
            data_type: crate::types::DataType::Numeric,
            total_count: 10,
            null_count: 0,
            unique_count: 10,
            null_percentage: 0.0,
            unique_percentage: 100.0,
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
            outlier_values: vec![],
            quality_issues: vec![],
            has_pii: false,
            pii_types: vec![],
        }
    }

    #[test]
    fn perfect_metrics_without_bias_check_score_99_5() {
        // Bias score defaults to 95 when no check ran: 90*1.0 + 95*0.10.
        let score = HealthScorer::compute_health_score(&healthy_metrics(), None, None);
        assert_eq!(score, 99.5);
    }

    #[test]
    fn bias_penalty_scales_with_dominance() {
        assert_eq!(HealthScorer::bias_penalty(None), 0.0);
        assert_eq!(HealthScorer::bias_penalty(Some(&bias_report(Some(50.0)))), 0.0);
        assert_eq!(HealthScorer::bias_penalty(Some(&bias_report(Some(85.0)))), 12.5);
        assert_eq!(HealthScorer::bias_penalty(Some(&bias_report(Some(90.0)))), 15.0);
        assert_eq!(HealthScorer::bias_penalty(Some(&bias_report(Some(99.0)))), 15.0);
        // Detected without measurable dominance: flat 5.
        assert_eq!(HealthScorer::bias_penalty(Some(&bias_report(None))), 5.0);

        let mut undetected = bias_report(Some(95.0));
        undetected.bias_detected = false;
        assert_eq!(HealthScorer::bias_penalty(Some(&undetected)), 0.0);
    }

    #[test]
    fn pii_penalty_steps_by_column_count() {
        assert_eq!(HealthScorer::pii_penalty(None), 0.0);
        assert_eq!(HealthScorer::pii_penalty(Some(&pii_findings(0))), 0.0);
        assert_eq!(HealthScorer::pii_penalty(Some(&pii_findings(1))), 3.0);
        assert_eq!(HealthScorer::pii_penalty(Some(&pii_findings(2))), 7.0);
        assert_eq!(HealthScorer::pii_penalty(Some(&pii_findings(3))), 10.0);
        assert_eq!(HealthScorer::pii_penalty(Some(&pii_findings(4))), 13.0);
        assert_eq!(HealthScorer::pii_penalty(Some(&pii_findings(5))), 15.0);
        assert_eq!(HealthScorer::pii_penalty(Some(&pii_findings(50))), 15.0);
    }

    #[test]
    fn tiny_dataset_is_bounded_at_five() {
        let mut metrics = healthy_metrics();
        metrics.total_rows = 4;
        let score = HealthScorer::compute_health_score(&metrics, None, None);
        assert_eq!(score, 5.0);
    }

    #[test]
    fn all_applicable_overrides_apply_and_worst_wins() {
        // 3 rows (bound 5), 95% nulls (bound 10), 85% duplicates (bound
        // 20): the tightest bound applies.
        let mut metrics = healthy_metrics();
        metrics.total_rows = 3;
        metrics.null_percentage = 95.0;
        metrics.duplicate_percentage = 85.0;
        let score = HealthScorer::compute_health_score(&metrics, None, None);
        assert_eq!(score, 5.0);
    }

    #[test]
    fn overrides_bound_but_never_raise() {
        // A score already below the bound stays put.
        let mut metrics = MetricsComputer::empty_metrics();
        metrics.total_rows = 100;
        metrics.duplicate_percentage = 85.0;
        metrics.null_percentage = 50.0;
        // All dimension scores are zero; base is 0 + 95*0.10 = 9.5,
        // below the duplicate bound of 20.
        let score = HealthScorer::compute_health_score(&metrics, None, None);
        assert_eq!(score, 9.5);
    }

    #[test]
    fn penalties_subtract_before_overrides() {
        let metrics = healthy_metrics();
        let score = HealthScorer::compute_health_score(
            &metrics,
            Some(&pii_findings(2)),
            Some(&bias_report(Some(85.0))),
        );
        // 99.5 - 12.5 (bias) - 7 (pii) = 80.0
        assert_eq!(score, 80.0);
    }

    #[test]
    fn quality_levels_follow_thresholds() {
        assert_eq!(QualityLevel::from_score(85.0), QualityLevel::Excellent);
        assert_eq!(QualityLevel::from_score(84.99), QualityLevel::Good);
        assert_eq!(QualityLevel::from_score(70.0), QualityLevel::Good);
        assert_eq!(QualityLevel::from_score(50.0), QualityLevel::Fair);
        assert_eq!(QualityLevel::from_score(30.0), QualityLevel::Poor);
        assert_eq!(QualityLevel::from_score(29.99), QualityLevel::Critical);
    }

    #[test]
    fn issues_cover_nulls_duplicates_and_pii() {
        let mut metrics = MetricsComputer::empty_metrics();
        metrics.null_percentage = 55.0;
        metrics.null_cells = 11;
        metrics.duplicate_percentage = 10.0;
        metrics.duplicate_rows = 2;

        let issues = HealthScorer::generate_issues(&[], &metrics, Some(&pii_findings(2)));
        assert_eq!(issues.len(), 3);

        assert_eq!(issues[0].issue_type, IssueType::Completeness);
        assert_eq!(issues[0].severity, Severity::High);
        assert_eq!(issues[0].description, "55.00% of cells are null");
        assert_eq!(issues[0].affected_rows, Some(11));

        assert_eq!(issues[1].issue_type, IssueType::Duplicates);
        assert_eq!(issues[1].severity, Severity::Medium);
        assert_eq!(issues[1].description, "10.00% of rows are duplicates");

        assert_eq!(issues[2].issue_type, IssueType::PiiDetected);
        assert_eq!(issues[2].severity, Severity::High);
        assert_eq!(issues[2].description, "PII detected in 2 column(s)");
    }

    #[test]
    fn column_issues_and_outliers_are_lifted() {
        let mut profile = profile("amount");
        profile.quality_issues = vec!["Low null percentage: 5.00% (some missing data)".to_string()];
        profile.has_outliers = true;

        let metrics = healthy_metrics();
        let issues = HealthScorer::generate_issues(&[profile], &metrics, None);
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].issue_type, IssueType::ColumnQuality);
        assert_eq!(issues[0].column_name.as_deref(), Some("amount"));
        assert_eq!(issues[1].issue_type, IssueType::Outliers);
        assert_eq!(issues[1].severity, Severity::Low);
    }

    #[test]
    fn recommendations_lead_with_verdict() {
        let metrics = healthy_metrics();
        let recs = HealthScorer::generate_recommendations(99.5, &metrics, &[]);
        assert_eq!(recs[0], "Overall Data Quality: EXCELLENT (Score: 99.50/100)");
        assert_eq!(
            recs[1],
            "Your data quality is excellent! Continue monitoring for consistency."
        );
        assert_eq!(recs.len(), 2);
    }

    #[test]
    fn recommendations_flag_weak_dimensions_and_issue_count() {
        let mut metrics = healthy_metrics();
        metrics.completeness_score = 70.0;
        metrics.uniqueness_score = 80.0;
        metrics.validity_score = 60.0;

        let issues = vec![DataQualityIssue {
            issue_type: IssueType::Completeness,
            severity: Severity::Medium,
            column_name: None,
            description: String::new(),
            affected_rows: None,
            recommendation: String::new(),
        }];

        let recs = HealthScorer::generate_recommendations(45.0, &metrics, &issues);
        assert_eq!(recs[0], "Overall Data Quality: POOR (Score: 45.00/100)");
        assert!(recs.contains(&"Improve data completeness by addressing missing values".to_string()));
        assert!(recs.contains(&"Remove or investigate duplicate records".to_string()));
        assert!(recs.contains(&"Validate data against business rules and constraints".to_string()));
        assert!(recs.contains(&"Address 1 identified issues (see issues list for details)".to_string()));
    }
}
