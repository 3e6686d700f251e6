// Stats module - Summary statistics over per-frame series
//
// Accumulation happens in f64 so long clips do not lose precision.
// Variances are population variances (divide by N).

/// Arithmetic mean; 0.0 for an empty series
pub fn mean(values: &[f32]) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    (values.iter().map(|&v| v as f64).sum::<f64>() / values.len() as f64) as f32
}

/// Population variance; 0.0 for an empty series
pub fn variance(values: &[f32]) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().map(|&v| v as f64).sum::<f64>() / n;
    let sum_sq: f64 = values
        .iter()
        .map(|&v| {
            let d = v as f64 - mean;
            d * d
        })
        .sum();
    (sum_sq / n) as f32
}

/// Population standard deviation
pub fn std_dev(values: &[f32]) -> f32 {
    variance(values).sqrt()
}

/// Per-column means of a row-major matrix
///
/// Rows shorter than the first row contribute nothing to missing columns.
pub fn column_means(rows: &[Vec<f32>]) -> Vec<f32> {
    columns(rows).iter().map(|col| mean(col)).collect()
}

/// Per-column population variances of a row-major matrix
pub fn column_variances(rows: &[Vec<f32>]) -> Vec<f32> {
    columns(rows).iter().map(|col| variance(col)).collect()
}

fn columns(rows: &[Vec<f32>]) -> Vec<Vec<f32>> {
    let width = rows.first().map_or(0, Vec::len);
    (0..width)
        .map(|c| rows.iter().filter_map(|row| row.get(c).copied()).collect())
        .collect()
}
