use crate::error::{Error, Result};

fn check_dims(a: &[f32], b: &[f32]) -> Result<()> {
    if a.len() != b.len() {
        return Err(Error::DimensionMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }
    Ok(())
}

// Squares are summed in f64 so that very large or very small f32
// components neither overflow nor flush to zero.
fn norm_f64(v: &[f32]) -> f64 {
    v.iter()
        .map(|&x| f64::from(x) * f64::from(x))
        .sum::<f64>()
        .sqrt()
}

/// Euclidean length of `v`.
pub fn norm(v: &[f32]) -> f32 {
    norm_f64(v) as f32
}

/// Scale `v` in place to unit length.
///
/// A zero (or non-finite) norm leaves `v` untouched and returns
/// [`Error::DegenerateVector`].
pub fn normalize(v: &mut [f32]) -> Result<()> {
    let len = norm_f64(v);
    if len == 0.0 || !len.is_finite() {
        return Err(Error::DegenerateVector);
    }
    v.iter_mut().for_each(|e| *e = (f64::from(*e) / len) as f32);
    Ok(())
}

pub fn dot(a: &[f32], b: &[f32]) -> Result<f32> {
    check_dims(a, b)?;
    Ok(dot_unchecked(a, b))
}

// Callers guarantee equal lengths; zip would otherwise truncate.
#[inline]
pub(crate) fn dot_unchecked(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

pub fn add(a: &[f32], b: &[f32]) -> Result<Vec<f32>> {
    check_dims(a, b)?;
    Ok(a.iter().zip(b).map(|(x, y)| x + y).collect())
}

pub fn subtract(a: &[f32], b: &[f32]) -> Result<Vec<f32>> {
    check_dims(a, b)?;
    Ok(a.iter().zip(b).map(|(x, y)| x - y).collect())
}
