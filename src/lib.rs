//! Data Quality Assessment Engine
//!
//! An automated quality scoring library for tabular datasets.
//!
//! # Overview
//!
//! This library analyzes a bounded, fully materialized dataset and produces
//! a structured quality report:
//!
//! - **Column Profiling**: Type inference, descriptive statistics, value
//!   distributions and outlier detection per column
//! - **Duplicate Detection**: Key-based row duplicate analysis with a
//!   full-row fallback
//! - **PII Detection**: Column-name vocabulary and value-pattern heuristics
//! - **Bias Detection**: Sensitive-attribute discovery and distribution
//!   imbalance checks
//! - **Quality Metrics**: Completeness, uniqueness, validity, consistency,
//!   accuracy and timeliness dimensions
//! - **Health Scoring**: Weighted aggregation with penalties and
//!   catastrophic override rules
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use quality_engine::{AnalysisOptions, Dataset, QualityEngine};
//!
//! // Rows are ordered maps of column name -> value; any JSON array of
//! // flat objects deserializes directly.
//! let dataset: Dataset = serde_json::from_str(r#"[
//!     {"id": 1, "email": "a@example.com", "age": 34},
//!     {"id": 2, "email": "b@example.com", "age": 29}
//! ]"#)?;
//!
//! let engine = QualityEngine::new();
//! let report = engine.analyze(&dataset, &AnalysisOptions::default())?;
//!
//! println!("Health score: {} ({})", report.health_score, report.quality_level);
//! for recommendation in &report.recommendations {
//!     println!("- {recommendation}");
//! }
//! ```
//!
//! # Options
//!
//! Use [`AnalysisOptions`] to supply an expected schema and toggle the
//! optional detectors:
//!
//! ```rust,ignore
//! use quality_engine::AnalysisOptions;
//! use indexmap::IndexMap;
//!
//! let mut schema = IndexMap::new();
//! schema.insert("age".to_string(), "INTEGER".to_string());
//!
//! let options = AnalysisOptions::default()
//!     .with_schema(schema)
//!     .with_bias_check(true);
//! ```

pub mod config;
pub mod detectors;
pub mod engine;
pub mod error;
pub mod profiler;
pub mod quality;
pub mod types;

// Re-exports for convenient access
pub use config::{AnalysisOptions, BiasConfig, PiiConfig};
pub use detectors::{BiasDetector, DuplicateDetector, PiiDetector};
pub use engine::QualityEngine;
pub use error::{QualityError, Result};
pub use profiler::DataProfiler;
pub use quality::{HealthScorer, MetricsComputer};
pub use types::{
    BiasReport, ColumnProfile, DataQualityIssue, DataType, Dataset, DatasetSummary,
    DuplicateAnalysis, IssueType, PiiFindings, QualityLevel, QualityMetrics, QualityReport, Row,
    Severity, Value,
};
