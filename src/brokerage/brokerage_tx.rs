use serde::{Deserialize, Deserializer};

/// One row of a brokerage transaction history export.
///
/// Every field is kept as the text the brokerage exported. Fields that do not
/// apply to a given action are empty (or absent, or null, which are read as
/// empty).
#[derive(Deserialize, PartialEq, Eq, Clone, Debug, Default)]
pub struct BrokerageTx {
    #[serde(rename = "Date", default, deserialize_with = "lenient_str")]
    pub date: String,
    #[serde(rename = "Action", default, deserialize_with = "lenient_str")]
    pub action: String,
    #[serde(rename = "Description", default, deserialize_with = "lenient_str")]
    pub description: String,
    #[serde(rename = "Symbol", default, deserialize_with = "lenient_str")]
    pub symbol: String,
    #[serde(rename = "Quantity", default, deserialize_with = "lenient_str")]
    pub quantity: String,
    #[serde(rename = "Price", default, deserialize_with = "lenient_str")]
    pub price: String,
    #[serde(rename = "Amount", default, deserialize_with = "lenient_str")]
    pub amount: String,
    #[serde(rename = "Fees & Comm", default, deserialize_with = "lenient_str")]
    pub fees_and_comm: String,
}

/// The top-level export document.
///
/// Other top-level fields (FromDate, TotalTransactionsAmount, etc.) are ignored.
#[derive(Deserialize, PartialEq, Eq, Clone, Debug, Default)]
pub struct BrokerageExport {
    #[serde(
        rename = "BrokerageTransactions",
        default,
        deserialize_with = "null_as_empty_vec"
    )]
    pub transactions: Vec<BrokerageTx>,
}

// Exports are not consistent about quoting numbers.
// An unquoted 0 or false means the field is unset, the same as an empty
// string. A quoted "0" is a value.
fn lenient_str<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum FieldValue {
        Text(String),
        Number(serde_json::Number),
        Bool(bool),
    }

    Ok(match Option::<FieldValue>::deserialize(deserializer)? {
        Some(FieldValue::Text(s)) => s,
        Some(FieldValue::Number(n)) if n.as_f64() == Some(0.0) => String::new(),
        Some(FieldValue::Number(n)) => n.to_string(),
        Some(FieldValue::Bool(true)) => true.to_string(),
        Some(FieldValue::Bool(false)) | None => String::new(),
    })
}

fn null_as_empty_vec<'de, D>(deserializer: D) -> Result<Vec<BrokerageTx>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<BrokerageTx>>::deserialize(deserializer)?.unwrap_or_default())
}
