//! Row-level duplicate detection.
//!
//! Rows are compared through key columns when any can be inferred (name
//! hints first, then near-unique "natural key" candidates), falling back
//! to the full value tuple. The first occurrence of a key is never counted
//! as a duplicate.

use indexmap::IndexMap;
use std::collections::HashSet;
use tracing::{debug, info};

use crate::types::{ColumnProfile, Dataset, DuplicateAnalysis, Row};

const KEY_COLUMN_NAMES: &[&str] = &["id", "identifier", "key", "pk", "primary_key"];
const MAX_REPORTED_INDICES: usize = 100;

pub struct DuplicateDetector;

impl DuplicateDetector {
    /// Analyze the dataset for duplicate rows.
    pub fn analyze(dataset: &Dataset, profiles: &[ColumnProfile]) -> DuplicateAnalysis {
        let total_rows = dataset.row_count();
        if total_rows == 0 {
            return DuplicateAnalysis::default();
        }

        let key_columns = Self::detect_key_columns(dataset, profiles);
        let compare_columns = if key_columns.is_empty() {
            debug!("No key columns found, comparing full rows");
            dataset.column_names()
        } else {
            info!(columns = ?key_columns, "Using key-based duplicate detection");
            key_columns
        };

        let mut seen: HashSet<String> = HashSet::with_capacity(total_rows);
        let mut duplicate_row_indices = Vec::new();
        let mut total_duplicates = 0u64;

        for (index, row) in dataset.rows.iter().enumerate() {
            let key = Self::row_key(row, &compare_columns);
            if !seen.insert(key) {
                total_duplicates += 1;
                if duplicate_row_indices.len() < MAX_REPORTED_INDICES {
                    duplicate_row_indices.push(index);
                }
            }
        }

        let duplicate_percentage = total_duplicates as f64 * 100.0 / total_rows as f64;

        // Per-column estimate only; repeated values in a column are not an
        // exact attribution of row duplicates.
        let mut duplicates_by_column = IndexMap::new();
        for profile in profiles {
            let column_duplicates = profile.non_null_count() - profile.unique_count;
            if column_duplicates > 0 {
                duplicates_by_column.insert(profile.column_name.clone(), column_duplicates);
            }
        }

        DuplicateAnalysis {
            total_duplicates,
            duplicate_percentage,
            duplicate_row_indices,
            duplicates_by_column,
        }
    }

    /// Infer key columns: explicit name hints first, then columns whose
    /// profile looks like a natural key (>90% unique, <10% null).
    fn detect_key_columns(dataset: &Dataset, profiles: &[ColumnProfile]) -> Vec<String> {
        let mut key_columns: Vec<String> = dataset
            .column_names()
            .into_iter()
            .filter(|name| {
                let lower = name.to_lowercase();
                KEY_COLUMN_NAMES.contains(&lower.as_str()) || lower.ends_with("_id")
            })
            .collect();

        if key_columns.is_empty() {
            for profile in profiles {
                if profile.unique_percentage > 90.0 && profile.null_percentage < 10.0 {
                    key_columns.push(profile.column_name.clone());
                }
            }
        }

        key_columns
    }

    fn row_key(row: &Row, columns: &[String]) -> String {
        let parts: Vec<String> = columns
            .iter()
            .map(|col| row.get(col).map(|v| v.render()).unwrap_or_else(|| "null".to_string()))
            .collect();
        parts.join("|")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profiler::DataProfiler;
    use pretty_assertions::assert_eq;

    fn dataset(json: &str) -> Dataset {
        serde_json::from_str(json).expect("test dataset should parse")
    }

    fn analyze(json: &str) -> DuplicateAnalysis {
        let ds = dataset(json);
        let profiles = DataProfiler::profile_dataset(&ds);
        DuplicateDetector::analyze(&ds, &profiles)
    }

    #[test]
    fn key_based_detection_with_id_column() {
        // 20 rows, two share id 3.
        let mut rows = Vec::new();
        for i in 0..19 {
            rows.push(format!(r#"{{"id": {i}, "city": "c{}"}}"#, i % 4));
        }
        rows.push(r#"{"id": 3, "city": "other"}"#.to_string());
        let analysis = analyze(&format!("[{}]", rows.join(",")));

        assert_eq!(analysis.total_duplicates, 1);
        assert_eq!(analysis.duplicate_percentage, 5.0);
        assert_eq!(analysis.duplicate_row_indices, vec![19]);
    }

    #[test]
    fn id_suffix_counts_as_key() {
        let analysis = analyze(
            r#"[{"user_id": 1, "v": "a"},
                {"user_id": 1, "v": "b"},
                {"user_id": 2, "v": "a"}]"#,
        );
        // Key-based: rows 0 and 1 collide on user_id despite different v.
        assert_eq!(analysis.total_duplicates, 1);
    }

    #[test]
    fn full_row_fallback_without_keys() {
        let analysis = analyze(
            r#"[{"color": "red", "size": "L"},
                {"color": "red", "size": "M"},
                {"color": "red", "size": "L"},
                {"color": "red", "size": "L"}]"#,
        );
        assert_eq!(analysis.total_duplicates, 2);
        assert_eq!(analysis.duplicate_row_indices, vec![2, 3]);
        assert_eq!(analysis.duplicate_percentage, 50.0);
    }

    #[test]
    fn natural_key_fallback_uses_profiles() {
        // No name hint, but "code" is >90% unique with no nulls, so it is
        // treated as a natural key: the repeated c5 counts as a duplicate
        // even though the full rows differ in "status".
        let mut rows = Vec::new();
        for i in 0..11 {
            rows.push(format!(r#"{{"code": "c{i}", "status": "open"}}"#));
        }
        rows.push(r#"{"code": "c5", "status": "closed"}"#.to_string());
        let analysis = analyze(&format!("[{}]", rows.join(",")));
        assert_eq!(analysis.total_duplicates, 1);
        assert_eq!(analysis.duplicate_row_indices, vec![11]);
    }

    #[test]
    fn nulls_render_as_literal_in_keys() {
        let analysis = analyze(
            r#"[{"a": null, "b": 1},
                {"a": null, "b": 1},
                {"a": "null", "b": 1}]"#,
        );
        // Null and the text "null" collapse to the same rendered key; that
        // is the documented tuple semantics.
        assert_eq!(analysis.total_duplicates, 2);
    }

    #[test]
    fn per_column_estimate_reports_only_positive_counts() {
        let analysis = analyze(
            r#"[{"code": "x", "grade": "a"},
                {"code": "y", "grade": "a"},
                {"code": "z", "grade": "b"}]"#,
        );
        assert_eq!(analysis.duplicates_by_column.get("grade"), Some(&1));
        assert_eq!(analysis.duplicates_by_column.get("code"), None);
    }

    #[test]
    fn empty_dataset_analysis_is_zeroed() {
        let analysis = analyze("[]");
        assert_eq!(analysis.total_duplicates, 0);
        assert_eq!(analysis.duplicate_percentage, 0.0);
        assert!(analysis.duplicate_row_indices.is_empty());
    }
}
