//! Small 3-vector helpers on `[f64; 3]`.

/// Dot product.
#[inline]
pub fn dot(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

/// Euclidean length.
#[inline]
pub fn norm(a: &[f64; 3]) -> f64 {
    dot(a, a).sqrt()
}

/// Component-wise `a - b`.
#[inline]
pub fn sub(a: &[f64; 3], b: &[f64; 3]) -> [f64; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

/// True when every component is finite.
#[inline]
pub fn is_finite3(a: &[f64; 3]) -> bool {
    a.iter().all(|c| c.is_finite())
}
