use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::humanize;

/// Format output as tables using the tabled crate.
///
/// Scalar result fields go into a Field/Value summary; each list of
/// records (monthly projections, carry timeline, scenarios) gets a table
/// of its own.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => {
            if let Some(result) = map.get("result") {
                print_result_table(result, map);
            } else {
                print_flat_object(map);
            }
        }
        Value::Array(arr) => {
            print_array_table(arr);
        }
        _ => {
            println!("{}", value);
        }
    }
}

fn is_record_list(value: &Value) -> bool {
    matches!(value, Value::Array(arr) if arr.first().is_some_and(Value::is_object))
}

fn is_grid(value: &Value) -> bool {
    matches!(value, Value::Array(arr) if arr.first().is_some_and(Value::is_array))
}

fn print_result_table(result: &Value, envelope: &Map<String, Value>) {
    if let Value::Object(res_map) = result {
        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        for (key, val) in res_map {
            if is_record_list(val) || is_grid(val) {
                continue;
            }
            builder.push_record([key.as_str(), &format_field(key, val)]);
        }
        println!("{}", Table::from(builder));

        for (key, val) in res_map {
            if let Value::Array(arr) = val {
                if is_record_list(val) {
                    println!("\n{}:", title(key));
                    print_array_table(arr);
                } else if is_grid(val) {
                    println!("\n{}:", title(key));
                    print_grid(arr, res_map);
                }
            }
        }
    } else {
        print_flat_object(envelope);
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

fn title(key: &str) -> String {
    let spaced = key.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => spaced,
    }
}

fn print_flat_object(map: &Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in map {
        builder.push_record([key.as_str(), &format_field(key, val)]);
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
                    .map(|h| {
                        map.get(h.as_str())
                            .map(|v| format_field(h, v))
                            .unwrap_or_default()
                    })
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

/// Sensitivity matrix, labelled with the swept values when present.
fn print_grid(rows: &[Value], result: &Map<String, Value>) {
    let labels = |key: &str| -> Vec<String> {
        match result.get(key) {
            Some(Value::Array(vals)) => vals.iter().map(format_value).collect(),
            _ => Vec::new(),
        }
    };
    let row_labels = labels("variable_1_values");
    let col_labels = labels("variable_2_values");

    let mut builder = Builder::default();
    if !col_labels.is_empty() {
        let mut header = vec![String::new()];
        header.extend(col_labels);
        builder.push_record(header);
    }
    for (i, row) in rows.iter().enumerate() {
        let mut record = vec![row_labels.get(i).cloned().unwrap_or_default()];
        if let Value::Array(cells) = row {
            record.extend(cells.iter().map(|c| match c {
                Value::Null => "-".to_string(),
                other => format_value(other),
            }));
        }
        builder.push_record(record);
    }
    println!("{}", Table::from(builder));
}

fn format_field(key: &str, value: &Value) -> String {
    humanize(key, value).unwrap_or_else(|| format_value(value))
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

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_title() {
        assert_eq!(title("carry_timeline"), "Carry timeline");
        assert_eq!(title("projections"), "Projections");
    }

    #[test]
    fn test_list_detection() {
        assert!(is_record_list(&json!([{"month": 1}])));
        assert!(!is_record_list(&json!(["a", "b"])));
        assert!(is_grid(&json!([[1, 2], [3, 4]])));
        assert!(!is_grid(&json!([])));
    }

    #[test]
    fn test_format_field_humanizes_money() {
        assert_eq!(format_field("cash_balance", &json!("1250000")), "$1.3M");
        assert_eq!(format_field("label", &json!("Jan 2026")), "Jan 2026");
    }
}
