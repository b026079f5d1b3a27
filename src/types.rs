//! Core data model for the quality assessment engine.
//!
//! A [`Dataset`] is an ordered sequence of rows, each row an ordered mapping
//! from column name to a [`Value`]. Everything the engine produces (column
//! profiles, metrics, findings and the final [`QualityReport`]) lives here
//! as plain serializable structs. Profiles are immutable once built; PII
//! enrichment goes through [`ColumnProfile::with_pii`], which returns an
//! annotated copy.

use std::fmt;
use std::hash::{Hash, Hasher};

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A single cell value. Closed tagged variant; all parsing and type
/// dispatch in the engine matches on this tag rather than inspecting
/// runtime types.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Numeric view of the value. `Text` is parsed; `Bool` and `Null` are
    /// never numeric.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Text(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }

    /// Canonical string rendering used for grouping, duplicate keys and
    /// pattern matching. Integral numbers render without a fractional
    /// suffix so that `5` and `"5"` land in the same group.
    pub fn render(&self) -> String {
        match self {
            Value::Null => "null".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => render_number(*n),
            Value::Text(s) => s.clone(),
        }
    }
}

fn render_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a.to_bits() == b.to_bits(),
            (Value::Text(a), Value::Text(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Null => {}
            Value::Bool(b) => b.hash(state),
            Value::Number(n) => n.to_bits().hash(state),
            Value::Text(s) => s.hash(state),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

/// One dataset row: an ordered column-name → value mapping.
pub type Row = IndexMap<String, Value>;

static NULL_VALUE: Value = Value::Null;

/// A fully materialized, bounded record set. The column set is taken from
/// the first row; profiling only iterates over that set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dataset {
    pub rows: Vec<Row>,
}

impl Dataset {
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Column names in the order they appear in row 0. Empty dataset means
    /// an empty column set.
    pub fn column_names(&self) -> Vec<String> {
        self.rows
            .first()
            .map(|row| row.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Values of one column across all rows. Rows missing the key yield
    /// `Null`, so every column iterator has exactly `row_count` entries.
    pub fn column_values<'a>(&'a self, column: &'a str) -> impl Iterator<Item = &'a Value> {
        self.rows
            .iter()
            .map(move |row| row.get(column).unwrap_or(&NULL_VALUE))
    }
}

/// Inferred column data type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DataType {
    Numeric,
    Date,
    Categorical,
    Unknown,
}

/// Quality level bucket derived from the health score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QualityLevel {
    Excellent,
    Good,
    Fair,
    Poor,
    Critical,
}

impl QualityLevel {
    /// Map a health score to its bucket. Thresholds are evaluated
    /// highest-first and are part of the compatibility surface.
    pub fn from_score(score: f64) -> Self {
        if score >= 85.0 {
            QualityLevel::Excellent
        } else if score >= 70.0 {
            QualityLevel::Good
        } else if score >= 50.0 {
            QualityLevel::Fair
        } else if score >= 30.0 {
            QualityLevel::Poor
        } else {
            QualityLevel::Critical
        }
    }
}

impl fmt::Display for QualityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            QualityLevel::Excellent => "EXCELLENT",
            QualityLevel::Good => "GOOD",
            QualityLevel::Fair => "FAIR",
            QualityLevel::Poor => "POOR",
            QualityLevel::Critical => "CRITICAL",
        };
        f.write_str(name)
    }
}

/// Category of a dataset-level quality issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueType {
    Completeness,
    Duplicates,
    ColumnQuality,
    Outliers,
    PiiDetected,
}

/// Issue severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Low,
    Medium,
    High,
}

/// Expected column type named by a user-supplied schema. Unrecognized type
/// names parse to `Other`, which always validates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpectedType {
    Text,
    Integer,
    Float,
    Boolean,
    Date,
    Other,
}

impl ExpectedType {
    pub fn parse(name: &str) -> Self {
        match name.to_uppercase().as_str() {
            "STRING" | "TEXT" => ExpectedType::Text,
            "INTEGER" | "INT" => ExpectedType::Integer,
            "FLOAT" | "DOUBLE" | "NUMBER" => ExpectedType::Float,
            "BOOLEAN" | "BOOL" => ExpectedType::Boolean,
            "DATE" | "DATETIME" => ExpectedType::Date,
            _ => ExpectedType::Other,
        }
    }
}

/// Per-column descriptive profile. Immutable once built.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnProfile {
    pub column_name: String,
    pub data_type: DataType,
    pub total_count: u64,
    pub null_count: u64,
    /// Distinct non-null values, compared by value rather than formatting.
    pub unique_count: u64,
    pub null_percentage: f64,
    pub unique_percentage: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mean: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub median: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub std_dev: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q1: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q3: Option<f64>,
    /// Value → count mapping, capped at 20 entries in first-seen order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_counts: Option<IndexMap<String, u64>>,
    /// Top 10 values by descending count, ties in first-seen order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_values: Option<Vec<String>>,
    pub has_outliers: bool,
    /// Distinct outlier sample, capped at 10, first-seen order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub outlier_values: Vec<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub quality_issues: Vec<String>,
    pub has_pii: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pii_types: Vec<String>,
}

impl ColumnProfile {
    pub fn non_null_count(&self) -> u64 {
        self.total_count - self.null_count
    }

    /// Non-destructive PII enrichment: returns an annotated copy, leaving
    /// the original profile untouched.
    pub fn with_pii(mut self, pii_types: Vec<String>) -> Self {
        self.has_pii = true;
        self.pii_types = pii_types;
        self
    }
}

/// The six quality dimension scores with their underlying counts, plus the
/// optional bias sub-scores folded in by the orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityMetrics {
    pub completeness_score: f64,
    pub total_cells: u64,
    pub null_cells: u64,
    pub null_percentage: f64,

    pub uniqueness_score: f64,
    pub total_rows: u64,
    pub duplicate_rows: u64,
    pub duplicate_percentage: f64,

    pub validity_score: f64,
    pub invalid_values: u64,
    pub invalid_percentage: f64,

    pub consistency_score: f64,
    pub inconsistent_values: u64,
    pub inconsistent_percentage: f64,

    pub accuracy_score: f64,
    pub schema_violations: u64,

    pub timeliness_score: f64,
    pub has_temporal_data: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub bias_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bias_detected: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bias_description: Option<String>,
}

/// PII detection result for the whole dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PiiFindings {
    pub pii_detected: bool,
    pub total_pii_columns: usize,
    /// Column name → matched PII categories, restricted to columns with at
    /// least one match, in column order.
    pub pii_by_column: IndexMap<String, Vec<String>>,
    pub recommendations: Vec<String>,
}

/// Row-level duplicate analysis.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateAnalysis {
    pub total_duplicates: u64,
    pub duplicate_percentage: f64,
    /// Indices of rows whose key was already seen, capped at 100.
    pub duplicate_row_indices: Vec<usize>,
    /// Per-column duplicate estimate (`nonNullCount - uniqueCount`). An
    /// approximation, not an exact row-duplicate attribution.
    pub duplicates_by_column: IndexMap<String, u64>,
}

/// One entry of the ranked issue list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataQualityIssue {
    pub issue_type: IssueType,
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column_name: Option<String>,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub affected_rows: Option<u64>,
    pub recommendation: String,
}

/// Shape summary of the analyzed dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetSummary {
    pub row_count: u64,
    pub column_count: u64,
    pub total_cells: u64,
    pub column_names: Vec<String>,
}

/// Demographic bias detection result.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BiasReport {
    pub bias_detected: bool,
    pub sensitive_columns: Vec<String>,
    pub findings: Vec<String>,
    pub description: String,
    /// Dominant-value share (0-100) of the most imbalanced sensitive
    /// column; `None` when no sensitive column exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dominance_percentage: Option<f64>,
}

/// The final aggregate report returned by one analysis invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityReport {
    pub analysis_id: String,
    pub timestamp: DateTime<Utc>,
    pub health_score: f64,
    pub quality_level: QualityLevel,
    pub summary: DatasetSummary,
    pub quality_metrics: QualityMetrics,
    pub column_profiles: Vec<ColumnProfile>,
    pub issues: Vec<DataQualityIssue>,
    pub recommendations: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pii_findings: Option<PiiFindings>,
    pub duplicate_analysis: DuplicateAnalysis,
    pub processing_time_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn value_deserializes_from_json_scalars() {
        let row: Row = serde_json::from_str(r#"{"a": null, "b": true, "c": 2.5, "d": "x"}"#)
            .expect("row should deserialize");
        assert_eq!(row["a"], Value::Null);
        assert_eq!(row["b"], Value::Bool(true));
        assert_eq!(row["c"], Value::Number(2.5));
        assert_eq!(row["d"], Value::Text("x".to_string()));
    }

    #[test]
    fn value_serializes_null_as_json_null() {
        assert_eq!(serde_json::to_string(&Value::Null).unwrap(), "null");
    }

    #[test]
    fn integral_numbers_render_without_fraction() {
        assert_eq!(Value::Number(5.0).render(), "5");
        assert_eq!(Value::Number(-3.0).render(), "-3");
        assert_eq!(Value::Number(2.5).render(), "2.5");
        assert_eq!(Value::Null.render(), "null");
    }

    #[test]
    fn text_values_parse_as_numbers() {
        assert_eq!(Value::Text(" 42 ".into()).as_number(), Some(42.0));
        assert_eq!(Value::Text("abc".into()).as_number(), None);
        assert_eq!(Value::Bool(true).as_number(), None);
    }

    #[test]
    fn column_order_comes_from_first_row() {
        let dataset: Dataset =
            serde_json::from_str(r#"[{"z": 1, "a": 2}, {"z": 3, "a": 4}]"#).unwrap();
        assert_eq!(dataset.column_names(), vec!["z", "a"]);
    }

    #[test]
    fn missing_keys_read_as_null() {
        let dataset: Dataset = serde_json::from_str(r#"[{"a": 1, "b": 2}, {"a": 3}]"#).unwrap();
        let values: Vec<_> = dataset.column_values("b").collect();
        assert_eq!(values.len(), 2);
        assert!(values[1].is_null());
    }

    #[test]
    fn quality_level_thresholds() {
        assert_eq!(QualityLevel::from_score(85.0), QualityLevel::Excellent);
        assert_eq!(QualityLevel::from_score(84.99), QualityLevel::Good);
        assert_eq!(QualityLevel::from_score(70.0), QualityLevel::Good);
        assert_eq!(QualityLevel::from_score(50.0), QualityLevel::Fair);
        assert_eq!(QualityLevel::from_score(30.0), QualityLevel::Poor);
        assert_eq!(QualityLevel::from_score(29.99), QualityLevel::Critical);
    }

    #[test]
    fn expected_type_parses_case_insensitively() {
        assert_eq!(ExpectedType::parse("int"), ExpectedType::Integer);
        assert_eq!(ExpectedType::parse("DateTime"), ExpectedType::Date);
        assert_eq!(ExpectedType::parse("double"), ExpectedType::Float);
        assert_eq!(ExpectedType::parse("uuid"), ExpectedType::Other);
    }

    #[test]
    fn with_pii_leaves_original_untouched() {
        let profile = ColumnProfile {
            column_name: "email".into(),
            data_type: DataType::Categorical,
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
        };
        let enriched = profile.clone().with_pii(vec!["EMAIL".into()]);
        assert!(!profile.has_pii);
        assert!(enriched.has_pii);
        assert_eq!(enriched.pii_types, vec!["EMAIL"]);
    }
}
