// ---------------------------------------------------------------------------
// Portfolio arithmetic on plain f64 vectors and row-major matrices
// ---------------------------------------------------------------------------

/// Weighted sum of expected returns: sum(w_i * r_i).
///
/// Both slices must have the same length (the asset count).
pub fn expected_return(weights: &[f64], expected_returns: &[f64]) -> f64 {
    weights
        .iter()
        .zip(expected_returns.iter())
        .map(|(w, r)| w * r)
        .sum()
}

/// Quadratic form w' * Sigma * w as a full double sum.
///
/// Off-diagonal terms are always included. No positive semi-definite check is
/// made, so an inconsistent covariance matrix can produce a negative result.
pub fn portfolio_variance(weights: &[f64], covariance: &[Vec<f64>]) -> f64 {
    let mut variance = 0.0;
    for (i, wi) in weights.iter().enumerate() {
        for (j, wj) in weights.iter().enumerate() {
            variance += wi * wj * covariance[i][j];
        }
    }
    variance
}

/// Scale a correlation matrix into a covariance matrix:
/// cov[i][j] = corr[i][j] * vol[i] * vol[j].
pub fn covariance_from_correlation(
    correlation: &[Vec<f64>],
    volatilities: &[f64],
) -> Vec<Vec<f64>> {
    correlation
        .iter()
        .enumerate()
        .map(|(i, row)| {
            row.iter()
                .enumerate()
                .map(|(j, rho)| rho * volatilities[i] * volatilities[j])
                .collect()
        })
        .collect()
}

/// Lower-triangular Cholesky factor of a symmetric matrix.
///
/// Returns `None` when a pivot drops below `-tolerance`, i.e. the matrix is not
/// positive semi-definite. Pivots in `[-tolerance, 0]` are treated as zero.
pub fn cholesky(matrix: &[Vec<f64>], tolerance: f64) -> Option<Vec<Vec<f64>>> {
    let n = matrix.len();
    let mut l = vec![vec![0.0; n]; n];

    for i in 0..n {
        for j in 0..=i {
            let dot: f64 = (0..j).map(|k| l[i][k] * l[j][k]).sum();
            if i == j {
                let pivot = matrix[i][i] - dot;
                if !pivot.is_finite() || pivot < -tolerance {
                    return None;
                }
                l[i][j] = pivot.max(0.0).sqrt();
            } else if l[j][j] > tolerance {
                l[i][j] = (matrix[i][j] - dot) / l[j][j];
            } else {
                // Singular direction: the remaining entry must also vanish.
                if (matrix[i][j] - dot).abs() > tolerance.sqrt() {
                    return None;
                }
                l[i][j] = 0.0;
            }
        }
    }

    Some(l)
}

/// True when the symmetric matrix is positive semi-definite within `tolerance`.
pub fn is_positive_semi_definite(matrix: &[Vec<f64>], tolerance: f64) -> bool {
    cholesky(matrix, tolerance).is_some()
}
