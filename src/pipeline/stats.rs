/// Arithmetic mean. `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (n - 1 denominator). `None` below two values.
pub fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let mean = mean(values)?;
    let sum_sq: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    Some((sum_sq / (values.len() - 1) as f64).sqrt())
}

/// Standardize `values` against their own mean and sample standard deviation.
///
/// A flat column (every value equal, which includes a single value) has no
/// spread to standardize against and maps to all zeros.
pub fn zscore(values: &[f64]) -> Vec<f64> {
    let Some(first) = values.first() else {
        return Vec::new();
    };
    if values.iter().all(|v| v == first) {
        return vec![0.0; values.len()];
    }
    let (Some(mean), Some(std)) = (mean(values), sample_std(values)) else {
        return vec![0.0; values.len()];
    };
    if std == 0.0 || !std.is_finite() {
        return vec![0.0; values.len()];
    }
    values.iter().map(|v| (v - mean) / std).collect()
}
