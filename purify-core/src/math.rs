use crate::error::PurifyError;

pub fn checked_ratio(numerator: f64, count: u64) -> Result<f64, PurifyError> {
    if count == 0 {
        Err(PurifyError::EmptyState)
    } else {
        Ok(numerator / count as f64)
    }
}

// A zero sigma standardizes to 0 rather than to NaN or infinity.
pub fn standardize(deviation: f64, sigma: f64) -> f64 {
    if sigma != 0.0 {
        deviation / sigma
    } else {
        0.0
    }
}

pub fn first_non_finite(values: &[f64]) -> Option<(usize, f64)> {
    values
        .iter()
        .enumerate()
        .find(|(_, v)| !v.is_finite())
        .map(|(i, &v)| (i, v))
}

pub fn min_max(values: &[f64]) -> Option<(f64, f64)> {
    let mut it = values.iter();
    let first = *it.next()?;
    Some(it.fold((first, first), |(lo, hi), &v| (lo.min(v), hi.max(v))))
}
