use std::collections::HashSet;

use tracing::warn;

use super::assets::{AssetInput, CorrelationInput};
use super::engine::MptEngine;
use super::matrix::is_positive_semi_definite;
use crate::error::MptError;
use crate::MptResult;

/// Tolerance for the positive semi-definite check on the correlation matrix.
const PSD_TOLERANCE: f64 = 1e-10;

/// Strict pre-call checks that the engine itself never performs.
///
/// Hard failures are returned as [`MptError::InvalidInput`]; soft problems
/// (unknown asset ids, duplicate pairs, a correlation set that is not positive
/// semi-definite) come back as warnings.
pub fn validate_inputs(
    risk_free_rate: f64,
    assets: &[AssetInput],
    correlations: &[CorrelationInput],
) -> MptResult<Vec<String>> {
    let mut warnings = Vec::new();

    if !risk_free_rate.is_finite() {
        return Err(MptError::invalid("risk_free_rate", "must be a finite number"));
    }

    let mut ids = HashSet::with_capacity(assets.len());
    for (i, asset) in assets.iter().enumerate() {
        if !ids.insert(asset.id.as_str()) {
            return Err(MptError::invalid(
                format!("assets[{i}].id"),
                format!("duplicate asset id '{}'", asset.id),
            ));
        }
        if !asset.expected_return.is_finite() {
            return Err(MptError::invalid(
                format!("assets[{i}].expected_return"),
                "must be a finite number",
            ));
        }
        if !asset.volatility.is_finite() || asset.volatility < 0.0 {
            return Err(MptError::invalid(
                format!("assets[{i}].volatility"),
                "must be a finite, non-negative number",
            ));
        }
    }

    let mut seen_pairs: HashSet<(&str, &str)> = HashSet::new();
    for (i, c) in correlations.iter().enumerate() {
        if !c.value.is_finite() || !(-1.0..=1.0).contains(&c.value) {
            return Err(MptError::invalid(
                format!("correlations[{i}].value"),
                format!("correlation {} is outside [-1, 1]", c.value),
            ));
        }
        if c.asset1_id == c.asset2_id {
            if c.value != 1.0 {
                return Err(MptError::invalid(
                    format!("correlations[{i}]"),
                    format!(
                        "self-correlation of '{}' must be 1, got {}",
                        c.asset1_id, c.value
                    ),
                ));
            }
            continue;
        }
        for id in [&c.asset1_id, &c.asset2_id] {
            if !ids.contains(id.as_str()) {
                warnings.push(format!(
                    "Correlation {i} references unknown asset '{id}' and is ignored"
                ));
            }
        }
        let key = if c.asset1_id <= c.asset2_id {
            (c.asset1_id.as_str(), c.asset2_id.as_str())
        } else {
            (c.asset2_id.as_str(), c.asset1_id.as_str())
        };
        if !seen_pairs.insert(key) {
            warnings.push(format!(
                "Duplicate correlation for ({}, {}); the first entry is used",
                key.0, key.1
            ));
        }
    }

    let engine = MptEngine::new(risk_free_rate, correlations.to_vec());
    let correlation = engine.build_correlation_matrix(assets);
    if !is_positive_semi_definite(&correlation, PSD_TOLERANCE) {
        warnings.push(
            "Correlation matrix is not positive semi-definite; some portfolios will have \
             negative variance and NaN volatility"
                .into(),
        );
    }

    for w in &warnings {
        warn!(warning = %w, "input validation");
    }

    Ok(warnings)
}
