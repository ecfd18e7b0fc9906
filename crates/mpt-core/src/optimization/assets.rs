use serde::{Deserialize, Serialize};

/// One investable asset as configured by the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetInput {
    /// Stable identifier, used to resolve correlations.
    pub id: String,
    /// Display label only.
    pub name: String,
    /// Annualized expected return as a decimal fraction.
    pub expected_return: f64,
    /// Annualized standard deviation of return as a decimal fraction.
    pub volatility: f64,
}

impl AssetInput {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        expected_return: f64,
        volatility: f64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            expected_return,
            volatility,
        }
    }
}

/// Pairwise correlation between two assets. The pair is unordered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorrelationInput {
    pub asset1_id: String,
    pub asset2_id: String,
    pub value: f64,
}

impl CorrelationInput {
    pub fn new(asset1_id: impl Into<String>, asset2_id: impl Into<String>, value: f64) -> Self {
        Self {
            asset1_id: asset1_id.into(),
            asset2_id: asset2_id.into(),
            value,
        }
    }

    /// True when this entry refers to `{a, b}` in either order.
    pub fn matches(&self, a: &str, b: &str) -> bool {
        (self.asset1_id == a && self.asset2_id == b) || (self.asset1_id == b && self.asset2_id == a)
    }
}

/// First correlation declared for the unordered pair `{a, b}`, if any.
pub fn find_correlation(correlations: &[CorrelationInput], a: &str, b: &str) -> Option<f64> {
    correlations
        .iter()
        .find(|c| c.matches(a, b))
        .map(|c| c.value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_is_order_independent() {
        let c = CorrelationInput::new("SET50", "GOLD", 0.2);
        assert!(c.matches("SET50", "GOLD"));
        assert!(c.matches("GOLD", "SET50"));
        assert!(!c.matches("SET50", "BOND"));
    }

    #[test]
    fn test_find_correlation_first_match_wins() {
        let correlations = vec![
            CorrelationInput::new("A", "B", 0.3),
            CorrelationInput::new("B", "A", -0.7),
        ];
        assert_eq!(find_correlation(&correlations, "B", "A"), Some(0.3));
    }

    #[test]
    fn test_find_correlation_missing_pair() {
        let correlations = vec![CorrelationInput::new("A", "B", 0.3)];
        assert_eq!(find_correlation(&correlations, "A", "C"), None);
    }

    #[test]
    fn test_camel_case_wire_format() {
        let json = r#"{"asset1Id":"A","asset2Id":"B","value":0.5}"#;
        let c: CorrelationInput = serde_json::from_str(json).unwrap();
        assert_eq!(c, CorrelationInput::new("A", "B", 0.5));

        let asset = AssetInput::new("A", "Asset A", 0.05, 0.1);
        let value = serde_json::to_value(&asset).unwrap();
        assert_eq!(value["expectedReturn"], 0.05);
        assert_eq!(value["volatility"], 0.1);
    }
}
