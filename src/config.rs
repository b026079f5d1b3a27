//! Analysis options and detector configuration.
//!
//! Pattern and vocabulary tables are immutable configuration built once at
//! startup and injected into the detectors, never hidden mutable globals.
//! The defaults reproduce the canonical vocabularies; callers with special
//! requirements can construct their own tables.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Options for one analysis invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalysisOptions {
    /// Optional schema: column name → expected type name (STRING, INT,
    /// FLOAT, BOOLEAN, DATE, ... case-insensitive). Drives the accuracy
    /// dimension and the schema-violation part of validity.
    pub schema_definition: Option<IndexMap<String, String>>,
    /// Run the PII detector and attach findings to the report.
    pub perform_pii_check: bool,
    /// Run the bias detector and fold its result into the bias dimension.
    pub perform_bias_check: bool,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            schema_definition: None,
            perform_pii_check: true,
            perform_bias_check: false,
        }
    }
}

impl AnalysisOptions {
    pub fn with_schema(mut self, schema: IndexMap<String, String>) -> Self {
        self.schema_definition = Some(schema);
        self
    }

    pub fn with_pii_check(mut self, enabled: bool) -> Self {
        self.perform_pii_check = enabled;
        self
    }

    pub fn with_bias_check(mut self, enabled: bool) -> Self {
        self.perform_bias_check = enabled;
        self
    }
}

// Value-pattern regexes, compiled once at startup. Order is the reporting
// order of matched categories.
static PII_PATTERNS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    vec![
        (
            "EMAIL",
            Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b")
                .expect("Invalid regex: EMAIL"),
        ),
        (
            "PHONE",
            Regex::new(r"\b\d{3}[-.]?\d{3}[-.]?\d{4}\b").expect("Invalid regex: PHONE"),
        ),
        (
            "SSN",
            Regex::new(r"\b\d{3}-\d{2}-\d{4}\b").expect("Invalid regex: SSN"),
        ),
        (
            "CREDIT_CARD",
            Regex::new(r"\b\d{4}[\s-]?\d{4}[\s-]?\d{4}[\s-]?\d{4}\b")
                .expect("Invalid regex: CREDIT_CARD"),
        ),
        (
            "ZIP_CODE",
            Regex::new(r"\b\d{5}(?:-\d{4})?\b").expect("Invalid regex: ZIP_CODE"),
        ),
        (
            "IP_ADDRESS",
            Regex::new(r"\b(?:\d{1,3}\.){3}\d{1,3}\b").expect("Invalid regex: IP_ADDRESS"),
        ),
    ]
});

// Column names that suggest PII, matched as normalized substrings.
const PII_COLUMN_NAMES: &[&str] = &[
    "email",
    "e-mail",
    "mail",
    "phone",
    "telephone",
    "mobile",
    "cell",
    "ssn",
    "social_security",
    "password",
    "pwd",
    "credit_card",
    "cc",
    "card_number",
    "address",
    "street",
    "location",
    "name",
    "firstname",
    "lastname",
    "fullname",
    "dob",
    "date_of_birth",
    "birthdate",
];

/// PII detector configuration: the value-pattern table and the
/// column-name vocabulary.
#[derive(Debug, Clone)]
pub struct PiiConfig {
    /// Category name → compiled pattern, in reporting order.
    pub patterns: Vec<(String, Regex)>,
    /// Column-name vocabulary, matched after normalization.
    pub column_names: Vec<String>,
    /// Maximum non-null values sampled per column.
    pub sample_size: usize,
    /// Fraction of sampled values that must match before a pattern counts.
    pub match_threshold: f64,
}

impl Default for PiiConfig {
    fn default() -> Self {
        Self {
            patterns: PII_PATTERNS
                .iter()
                .map(|(name, re)| (name.to_string(), re.clone()))
                .collect(),
            column_names: PII_COLUMN_NAMES.iter().map(|s| s.to_string()).collect(),
            sample_size: 100,
            match_threshold: 0.1,
        }
    }
}

const SENSITIVE_ATTRIBUTES: &[&str] = &[
    "gender",
    "sex",
    "race",
    "ethnicity",
    "age",
    "religion",
    "nationality",
    "disability",
    "sexual_orientation",
];

/// Bias detector configuration.
#[derive(Debug, Clone)]
pub struct BiasConfig {
    /// Sensitive-attribute vocabulary, matched as normalized substrings of
    /// column names.
    pub sensitive_attributes: Vec<String>,
    /// A distribution is imbalanced when the most frequent value's share
    /// exceeds this fraction.
    pub dominance_threshold: f64,
}

impl Default for BiasConfig {
    fn default() -> Self {
        Self {
            sensitive_attributes: SENSITIVE_ATTRIBUTES.iter().map(|s| s.to_string()).collect(),
            dominance_threshold: 0.8,
        }
    }
}

/// Normalize a column name for vocabulary matching: lowercase with
/// underscores, hyphens and whitespace stripped.
pub(crate) fn normalize_column_name(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .filter(|c| *c != '_' && *c != '-' && !c.is_whitespace())
        .collect()
}
