use serde_json::{Map, Value};
use std::io;

/// Record lists worth exporting on their own, in order of preference.
const TABULAR_FIELDS: &[&str] = &["projections", "results", "carry_timeline"];

/// Write output as CSV to stdout.
///
/// A projection exports one row per month; comparisons one row per
/// scenario; sensitivity grids one row per swept value. Anything else is
/// a two-column field/value listing.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    match value {
        Value::Object(map) => match map.get("result") {
            Some(Value::Object(result)) => write_result_csv(&mut wtr, result),
            _ => write_fields_csv(&mut wtr, map),
        },
        Value::Array(arr) => {
            write_array_csv(&mut wtr, arr);
        }
        _ => {
            let _ = wtr.write_record([&format_csv_value(value)]);
        }
    }

    let _ = wtr.flush();
}

fn write_result_csv(wtr: &mut csv::Writer<io::StdoutLock<'_>>, result: &Map<String, Value>) {
    for field in TABULAR_FIELDS {
        if let Some(Value::Array(rows)) = result.get(*field) {
            if !rows.is_empty() {
                write_array_csv(wtr, rows);
                return;
            }
        }
    }
    if let Some(Value::Array(matrix)) = result.get("matrix") {
        write_matrix_csv(wtr, matrix, result);
        return;
    }
    write_fields_csv(wtr, result);
}

fn write_fields_csv(wtr: &mut csv::Writer<io::StdoutLock<'_>>, map: &Map<String, Value>) {
    let _ = wtr.write_record(["field", "value"]);
    for (key, val) in map {
        let _ = wtr.write_record([key.as_str(), &format_csv_value(val)]);
    }
}

fn write_array_csv(wtr: &mut csv::Writer<io::StdoutLock<'_>>, arr: &[Value]) {
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

fn write_matrix_csv(
    wtr: &mut csv::Writer<io::StdoutLock<'_>>,
    matrix: &[Value],
    result: &Map<String, Value>,
) {
    let values = |key: &str| -> Vec<String> {
        match result.get(key) {
            Some(Value::Array(vals)) => vals.iter().map(format_csv_value).collect(),
            _ => Vec::new(),
        }
    };
    let row_values = values("variable_1_values");

    let mut header = vec![String::new()];
    header.extend(values("variable_2_values"));
    let _ = wtr.write_record(&header);

    for (i, row) in matrix.iter().enumerate() {
        let mut record = vec![row_values.get(i).cloned().unwrap_or_default()];
        if let Value::Array(cells) = row {
            record.extend(cells.iter().map(format_csv_value));
        }
        let _ = wtr.write_record(&record);
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
