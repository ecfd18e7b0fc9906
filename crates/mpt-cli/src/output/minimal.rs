use serde_json::Value;

/// Key output fields, in order of priority.
const PRIORITY_KEYS: [&str; 4] = ["sharpeRatio", "finalExpected", "valid", "sharpeMean"];

/// Nested portfolios searched after the top level of the result.
const NESTED_KEYS: [&str; 2] = ["bestPortfolio", "average"];

/// Print just the key answer value from the output.
pub fn print_minimal(value: &Value) {
    println!("{}", minimal_line(value));
}

fn minimal_line(value: &Value) -> String {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    let Value::Object(map) = result_obj else {
        return format_minimal(result_obj);
    };

    let scopes = std::iter::once(result_obj)
        .chain(NESTED_KEYS.iter().filter_map(|k| map.get(*k)));
    for scope in scopes {
        for key in &PRIORITY_KEYS {
            if let Some(val) = scope.get(*key) {
                if !val.is_null() {
                    return format_minimal(val);
                }
            }
        }
    }

    match map.iter().next() {
        Some((key, val)) => format!("{}: {}", key, format_minimal(val)),
        None => format_minimal(result_obj),
    }
}

fn format_minimal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_best_portfolio_sharpe() {
        let out = json!({"result": {"bestPortfolio": {"sharpeRatio": 0.75}, "frontier": []}});
        assert_eq!(minimal_line(&out), "0.75");
    }

    #[test]
    fn test_ensemble_average_sharpe() {
        let out = json!({"result": {"average": {"sharpeRatio": 0.5}, "requestedRuns": 4}});
        assert_eq!(minimal_line(&out), "0.5");
    }

    #[test]
    fn test_projection_final_expected() {
        let out = json!({"result": {"years": [], "finalExpected": "112360.00"}});
        assert_eq!(minimal_line(&out), "112360.00");
    }

    #[test]
    fn test_no_portfolio_falls_back_to_first_field() {
        let out = json!({"result": {"bestPortfolio": null, "frontier": []}});
        assert_eq!(minimal_line(&out), "bestPortfolio: null");
    }
}
