use std::{collections::HashMap, io::Read};

use crate::util::{basic::SError, rw::DescribedReader};

use super::{BrokerageExport, BrokerageTx};

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum ExportFormat {
    Json,
    Csv,
}

// The first cell of the footer row in CSV exports.
const CSV_TOTAL_ROW_MARKER: &str = "Transactions Total";

/// Reads and parses a brokerage export. Any failure to read or parse the
/// whole document is an error. There is no partial result.
pub fn load_export(
    reader: &DescribedReader,
    format: ExportFormat,
) -> Result<BrokerageExport, SError> {
    let desc = reader.desc();
    tracing::debug!("load_export: reading {} as {:?}", desc, format);

    let r = reader
        .reader()
        .map_err(|e| format!("Failed to read {desc}: {e}"))?;
    match format {
        ExportFormat::Json => parse_json_export(r),
        ExportFormat::Csv => parse_csv_export(r),
    }
    .map_err(|e| format!("Failed to parse {desc}: {e}"))
}

fn read_content(mut r: impl Read) -> Result<String, SError> {
    let mut content = String::new();
    r.read_to_string(&mut content).map_err(|e| format!("{e}"))?;
    Ok(maybe_remove_byte_order_mark(content))
}

// Exports downloaded from some brokerages start with a UTF-8 BOM.
fn maybe_remove_byte_order_mark(mut content: String) -> String {
    if content.starts_with('\u{FEFF}') {
        content.remove(0);
    }
    content
}

/// Parses the JSON form of the export.
///
/// A document which is valid JSON but not an object (a string, number, bool
/// or array) has no transactions list, so is read as zero transactions. A
/// null document is an error.
pub fn parse_json_export(r: impl Read) -> Result<BrokerageExport, SError> {
    let content = read_content(r)?;
    let doc: serde_json::Value =
        serde_json::from_str(&content).map_err(|e| format!("Invalid JSON: {e}"))?;
    match doc {
        serde_json::Value::Object(obj) => {
            serde_json::from_value(serde_json::Value::Object(obj))
                .map_err(|e| format!("Invalid JSON: {e}"))
        }
        serde_json::Value::Null => Err("Invalid JSON: document is null".to_string()),
        other => {
            tracing::debug!("parse_json_export: no transactions in non-object document {other}");
            Ok(BrokerageExport::default())
        }
    }
}

/// Parses the CSV form of the export. It has the same columns as the JSON
/// transactions, possibly preceded by a title line, and followed by a
/// total row.
pub fn parse_csv_export(r: impl Read) -> Result<BrokerageExport, SError> {
    let content = read_content(r)?;
    let mut csv_r = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut col_name_to_index: Option<HashMap<String, usize>> = None;
    let mut transactions = Vec::<BrokerageTx>::new();

    for (i, rec_res) in csv_r.records().enumerate() {
        let row_num = i + 1;
        let record = rec_res.map_err(|e| format!("Row {row_num}: {e}"))?;

        if col_name_to_index.is_none() {
            if is_header_row(&record) {
                col_name_to_index = Some(
                    record
                        .iter()
                        .enumerate()
                        .map(|(i, name)| (name.trim().to_string(), i))
                        .collect(),
                );
            } else {
                tracing::debug!("parse_csv_export: skipping preamble row {row_num}");
            }
            continue;
        }
        let Some(cols) = &col_name_to_index else {
            continue;
        };

        let get_str = |name: &str| -> String {
            cols.get(name)
                .and_then(|i| record.get(*i))
                .map(|v| v.trim().to_string())
                .unwrap_or_default()
        };

        let date = get_str("Date");
        if date.starts_with(CSV_TOTAL_ROW_MARKER) {
            continue;
        }
        if record.iter().all(|v| v.trim().is_empty()) {
            continue;
        }

        transactions.push(BrokerageTx {
            date,
            action: get_str("Action"),
            description: get_str("Description"),
            symbol: get_str("Symbol"),
            quantity: get_str("Quantity"),
            price: get_str("Price"),
            amount: get_str("Amount"),
            fees_and_comm: get_str("Fees & Comm"),
        });
    }

    if col_name_to_index.is_none() {
        return Err("No header row with Date and Action columns".to_string());
    }
    Ok(BrokerageExport { transactions })
}

fn is_header_row(record: &csv::StringRecord) -> bool {
    let has = |name: &str| record.iter().any(|v| v.trim() == name);
    has("Date") && has("Action")
}
