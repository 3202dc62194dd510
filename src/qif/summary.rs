use itertools::Itertools;
use tabled::settings::{object::Rows, Alignment, Style};

use super::writer::ConvertResult;

/// Renders a table of how many records were written for each action, and
/// how many transactions were skipped.
pub fn render_summary(result: &ConvertResult) -> String {
    let mut table_bldr = tabled::builder::Builder::default();
    table_bldr.push_record(["ACTION", "QIF", "RECORDS"]);

    let counts = result.records.iter().map(|r| r.action).counts();
    for (action, n) in counts.into_iter().sorted() {
        table_bldr.push_record([
            action.to_string(),
            action.qif_str().to_string(),
            n.to_string(),
        ]);
    }
    table_bldr.push_record([
        "Skipped".to_string(),
        String::new(),
        result.skipped.len().to_string(),
    ]);
    table_bldr.push_record([
        "Total".to_string(),
        String::new(),
        (result.records.len() + result.skipped.len()).to_string(),
    ]);

    let mut table = table_bldr.build();
    table.with(Style::ascii());
    table.modify(Rows::first(), Alignment::center());
    table.to_string()
}
