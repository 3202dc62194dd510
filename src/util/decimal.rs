use std::str::FromStr;

use rust_decimal::Decimal;

/// Parses a brokerage currency string, like "$1,234.56" or "-$5.00".
///
/// Currency symbols and digit-group separators are dropped before parsing.
/// Anything that still does not parse as a number (including an empty
/// string) is treated as zero. This never fails.
pub fn parse_currency(value: &str) -> Decimal {
    let stripped: String =
        value.chars().filter(|c| *c != '$' && *c != ',').collect();
    Decimal::from_str(stripped.trim()).unwrap_or(Decimal::ZERO)
}

/// Renders a number in its shortest form, as QIF importers expect it.
/// Trailing fractional zeros are dropped, and -0 is rendered as 0.
pub fn qif_number_str(d: &Decimal) -> String {
    d.normalize().to_string()
}

pub fn dollar_precision_str(d: &Decimal) -> String {
    format!("{:.2}", d)
}
