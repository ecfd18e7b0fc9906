use serde_json::{Map, Value};
use std::io;

/// Row-shaped result fields, in the order they are preferred for CSV.
const ROW_ARRAYS: [&str; 2] = ["frontier", "years"];

/// Portfolio fields whose asset allocation becomes the CSV rows.
const PORTFOLIO_KEYS: [&str; 2] = ["bestPortfolio", "average"];

/// Write output as CSV to stdout.
///
/// Optimization output becomes the frontier sample, ensemble output the
/// averaged allocation, projection output one row per year.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    match value {
        Value::Object(map) => match map.get("result") {
            Some(Value::Object(result)) => write_result_csv(&mut wtr, result),
            _ => write_field_value(&mut wtr, map),
        },
        Value::Array(arr) => write_array_csv(&mut wtr, arr),
        _ => {
            let _ = wtr.write_record([&format_csv_value(value)]);
        }
    }

    let _ = wtr.flush();
}

fn write_result_csv<W: io::Write>(wtr: &mut csv::Writer<W>, result: &Map<String, Value>) {
    for key in ROW_ARRAYS {
        if let Some(Value::Array(rows)) = result.get(key) {
            write_array_csv(wtr, rows);
            return;
        }
    }
    for key in PORTFOLIO_KEYS {
        if let Some(Value::Array(assets)) = result.get(key).and_then(|p| p.get("assets")) {
            write_array_csv(wtr, assets);
            return;
        }
    }
    write_field_value(wtr, result);
}

fn write_field_value<W: io::Write>(wtr: &mut csv::Writer<W>, map: &Map<String, Value>) {
    let _ = wtr.write_record(["field", "value"]);
    for (key, val) in map {
        let _ = wtr.write_record([key.as_str(), &format_csv_value(val)]);
    }
}

fn write_array_csv<W: io::Write>(wtr: &mut csv::Writer<W>, arr: &[Value]) {
    if arr.is_empty() {
        return;
    }

    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
        let _ = wtr.write_record(&headers);

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(*h).map(format_csv_value).unwrap_or_default())
                    .collect();
                let _ = wtr.write_record(&row);
            }
        }
    } else {
        for item in arr {
            let _ = wtr.write_record([&format_csv_value(item)]);
        }
    }
}

fn format_csv_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
