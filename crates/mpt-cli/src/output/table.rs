use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

/// Array fields too long to print row by row; only their length is shown.
const COUNT_ONLY_ARRAYS: [&str; 1] = ["frontier"];

/// Format output as tables using the tabled crate.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => {
            if let Some(result) = map.get("result") {
                print_result_table(result, map);
            } else {
                print_flat_object(map);
            }
        }
        Value::Array(arr) => print_array_table(arr),
        _ => println!("{}", value),
    }
}

fn print_result_table(result: &Value, envelope: &Map<String, Value>) {
    let Value::Object(res_map) = result else {
        print_flat_object(envelope);
        return;
    };

    let mut summary = Builder::default();
    summary.push_record(["Field", "Value"]);
    let mut allocations: Vec<(&str, &Vec<Value>)> = Vec::new();
    let mut row_tables: Vec<(&str, &Vec<Value>)> = Vec::new();

    for (key, val) in res_map {
        match val {
            Value::Object(inner) => {
                for (k, v) in inner {
                    match v {
                        Value::Array(assets) if k == "assets" => {
                            allocations.push((key.as_str(), assets));
                        }
                        Value::Array(_) | Value::Object(_) => {}
                        _ => {
                            summary.push_record([format!("{key}.{k}"), format_value(v)]);
                        }
                    }
                }
            }
            Value::Array(arr) if COUNT_ONLY_ARRAYS.contains(&key.as_str()) => {
                summary.push_record([format!("{key} (points)"), arr.len().to_string()]);
            }
            Value::Array(arr) if arr.first().is_some_and(Value::is_object) => {
                row_tables.push((key.as_str(), arr));
            }
            _ => {
                summary.push_record([key.as_str(), &format_value(val)]);
            }
        }
    }
    println!("{}", Table::from(summary));

    for (label, assets) in allocations {
        println!("\nAllocation ({label}):");
        print_allocation_table(assets);
    }
    for (label, rows) in row_tables {
        println!("\n{label}:");
        print_array_table(rows);
    }

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_allocation_table(assets: &[Value]) {
    let mut builder = Builder::default();
    builder.push_record(["Asset", "Name", "Weight"]);
    for a in assets {
        let weight = a
            .get("weight")
            .and_then(Value::as_f64)
            .map(|w| format!("{:.2}%", w * 100.0))
            .unwrap_or_else(|| "null".to_string());
        builder.push_record([
            a.get("id").map(format_value).unwrap_or_default(),
            a.get("name").map(format_value).unwrap_or_default(),
            weight,
        ]);
    }
    println!("{}", Table::from(builder));
}

fn print_flat_object(map: &Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in map {
        builder.push_record([key.as_str(), &format_value(val)]);
    }
    println!("{}", Table::from(builder));
}

fn print_array_table(arr: &[Value]) {
    if arr.is_empty() {
        println!("(empty)");
        return;
    }

    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<String> = first.keys().cloned().collect();
        let mut builder = Builder::default();
        builder.push_record(&headers);

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(h.as_str()).map(format_value).unwrap_or_default())
                    .collect();
                builder.push_record(row);
            }
        }

        println!("{}", Table::from(builder));
    } else {
        for item in arr {
            println!("{}", format_value(item));
        }
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(format_value).collect();
            items.join(", ")
        }
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}
