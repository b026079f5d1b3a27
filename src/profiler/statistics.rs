//! Numeric summary statistics and outlier detection.

/// Descriptive statistics for a numeric column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct NumericSummary {
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub q1: f64,
    pub q3: f64,
}

impl NumericSummary {
    /// Compute the summary over parseable values only. Returns `None` when
    /// there is nothing to summarize.
    pub(crate) fn compute(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        Some(Self {
            mean,
            median: percentile(&sorted, 50.0),
            std_dev: variance.sqrt(),
            min: sorted[0],
            max: sorted[sorted.len() - 1],
            q1: percentile(&sorted, 25.0),
            q3: percentile(&sorted, 75.0),
        })
    }
}

/// Percentile by linear interpolation on a sorted sample
/// (`pos = p/100 × (n−1)`).
pub(crate) fn percentile(sorted: &[f64], p: f64) -> f64 {
    debug_assert!(!sorted.is_empty());
    if sorted.len() == 1 {
        return sorted[0];
    }
    let pos = (p / 100.0) * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    if lower == upper {
        return sorted[lower];
    }
    let weight = pos - lower as f64;
    sorted[lower] + weight * (sorted[upper] - sorted[lower])
}

/// Column-name-driven plausibility check. Categories are tested in order
/// and the first matching category decides.
pub(crate) fn is_implausible_for_column(column_name: &str, value: f64) -> bool {
    let name = column_name.to_lowercase();

    if name.contains("age") {
        return value < 0.0 || value > 150.0;
    }

    if name.contains("price")
        || name.contains("salary")
        || name.contains("cost")
        || name.contains("amount")
    {
        return value < 0.0;
    }

    if name.contains("count") || name.contains("quantity") || name.contains("number") {
        return value < 0.0;
    }

    if name.contains("percent") || name.contains("rate") || name.ends_with('%') {
        return value < 0.0 || value > 100.0;
    }

    false
}

/// Collect the outlier sample for a numeric column: values outside the IQR
/// fence or implausible for the column name. Distinct values in first-seen
/// order, capped at 10.
pub(crate) fn detect_outliers(column_name: &str, values: &[f64], q1: f64, q3: f64) -> Vec<f64> {
    let iqr = q3 - q1;
    let lower_bound = q1 - 1.5 * iqr;
    let upper_bound = q3 + 1.5 * iqr;

    let mut seen: Vec<u64> = Vec::new();
    let mut outliers = Vec::new();

    for &value in values {
        let is_outlier = value < lower_bound || value > upper_bound;
        let is_invalid = is_implausible_for_column(column_name, value);
        if !(is_outlier || is_invalid) {
            continue;
        }
        let bits = value.to_bits();
        if seen.contains(&bits) {
            continue;
        }
        seen.push(bits);
        outliers.push(value);
        if outliers.len() >= 10 {
            break;
        }
    }

    outliers
}
