use ndarray::Array1;

/// Scales `values` to unit L2 norm in place. Near-zero vectors are zeroed.
pub(crate) fn normalize_vector(values: &mut [f64]) {
    let norm: f64 = values.iter().map(|&x| x * x).sum::<f64>().sqrt();
    if norm > 1e-10 {
        values.iter_mut().for_each(|x| *x /= norm);
    } else {
        values.iter_mut().for_each(|x| *x = 0.0);
    }
}

/// Dot product of a sparse row given as parallel index/value slices with a dense vector.
pub(crate) fn sparse_dot(indices: &[usize], values: &[f64], dense: &Array1<f64>) -> f64 {
    indices
        .iter()
        .zip(values)
        .map(|(&idx, &value)| value * dense[idx])
        .sum()
}

pub(crate) fn all_finite(values: &[f64]) -> bool {
    values.iter().all(|v| v.is_finite())
}
