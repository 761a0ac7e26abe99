//! CLI command implementations.

pub mod ads;
pub mod campaigns;
pub mod clients;
pub mod config;
pub mod report;

use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, ContentArrangement, Table};
use console::style;
use serde_json::Value;

use yd_api::{ApiClient, ApiResponse};
use yd_core::config::AppConfig;
use yd_core::error::{YdError, YdResult};

use crate::OutputFormat;

/// Helper to create an API client from config.
pub fn create_api_client(config: &AppConfig) -> YdResult<ApiClient> {
    config.require_token()?;
    ApiClient::new(&config.api)
}

/// A table with the CLI's standard look.
pub fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Truncate a string to a maximum number of characters, appending an
/// ellipsis if truncated.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len > 3 {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{head}...")
    } else {
        s.chars().take(max_len).collect()
    }
}

/// Render a scalar JSON value for a table cell.
fn cell(value: &Value) -> String {
    match value {
        Value::Null => "-".to_string(),
        Value::String(s) => truncate(s, 60),
        Value::Array(items) => truncate(
            &items.iter().map(cell).collect::<Vec<_>>().join(", "),
            60,
        ),
        other => truncate(&other.to_string(), 60),
    }
}

/// Flatten one level of nested objects into dotted column names
/// (`TextAd.Href`), preserving first-seen column order.
fn flatten(items: &[Value]) -> (Vec<String>, Vec<Vec<(String, Value)>>) {
    let mut columns: Vec<String> = Vec::new();
    let mut rows = Vec::with_capacity(items.len());

    for item in items {
        let mut row = Vec::new();
        if let Value::Object(map) = item {
            for (key, value) in map {
                match value {
                    Value::Object(nested) => {
                        for (nested_key, nested_value) in nested {
                            row.push((format!("{key}.{nested_key}"), nested_value.clone()));
                        }
                    }
                    _ => row.push((key.clone(), value.clone())),
                }
            }
        }
        for (name, _) in &row {
            if !columns.contains(name) {
                columns.push(name.clone());
            }
        }
        rows.push(row);
    }

    (columns, rows)
}

/// Table of JSON objects.
pub fn json_table(items: &[Value]) -> Table {
    let (columns, rows) = flatten(items);
    let mut table = new_table();
    table.set_header(columns.clone());
    for row in rows {
        let cells: Vec<String> = columns
            .iter()
            .map(|col| {
                row.iter()
                    .find(|(name, _)| name == col)
                    .map(|(_, v)| cell(v))
                    .unwrap_or_else(|| "-".to_string())
            })
            .collect();
        table.add_row(cells);
    }
    table
}

/// The listing result, or the platform error with the status it came with.
fn listing_result(response: ApiResponse) -> YdResult<Option<Value>> {
    let status = response.status;
    response.into_result().map_err(|err| YdError::Api {
        status,
        message: err.to_string(),
    })
}

/// Print a listing response: the first array under `result` as a table,
/// or the whole envelope as JSON. Platform errors become a failing exit.
pub fn print_listing(response: ApiResponse, collection: &str, format: OutputFormat) -> YdResult<()> {
    let result = listing_result(response)?;
    let result = result.unwrap_or(Value::Null);

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        OutputFormat::Text => {
            let items = result
                .get(collection)
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default();
            if items.is_empty() {
                println!("No {} found.", collection.to_lowercase());
            } else {
                println!("{}", json_table(&items));
                println!("\n{} {}", style(items.len()).cyan(), collection.to_lowercase());
            }
        }
    }
    Ok(())
}
