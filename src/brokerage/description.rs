use std::collections::HashMap;

use lazy_static::lazy_static;

// Descriptions that start with this were transferred in from TD Ameritrade,
// and only identify the security by a bracketed ticker somewhere inside.
const TDA_TRANSFER_PREFIX: &str = "TDA TRAN";

lazy_static! {
    // The brokerage has renamed some securities over time, or uses a
    // different long name in some transaction types.
    static ref DESCRIPTION_ALIASES: HashMap<&'static str, &'static str> =
        HashMap::from([
            ("SCHWAB VALUE ADVANTAGE MONEY INVESTOR SHARES",
             "SCHWAB VALUE ADVANTAGE MONEY INV"),
            ("SCHWAB PRIME ADVANTAGE MONEY INV",
             "SCHWAB VALUE ADVANTAGE MONEY INV"),
            ("ISHARES CORE S&P TOTAL US STOCK MARK",
             "ISHARES TOTAL US STOCK MARKET ETF"),
            ("LAM RESH CORP", "LAM RESH CORP CLASS EQUITY"),
        ]);
}

// Order matters. See normalize_description.
const TDA_TICKER_TOKENS: &[(&str, &str)] = &[
    ("(VIG)", "VANGUARD DIVIDEND APPRECIATION ETF"),
    ("(ITOT)", "ISHARES TOTAL US STOCK MARKET ETF"),
    ("(USRT)", "ISHARES CORE US REIT ETF"),
    ("(IXUS)", "ISHARES CORE MSCI TOTL INTL STCK ETF"),
];

/// Maps a transaction description to the name the security is tracked
/// under in the QIF account.
///
/// First, exact matches of known aliases are replaced. Then, TDA transfer
/// descriptions are replaced by the security named by a ticker token they
/// contain. The tokens are applied in table order against the current
/// description, without stopping at the first hit, so a later token only
/// applies if it is still present after an earlier substitution.
pub fn normalize_description(description: &str) -> String {
    let aliased = DESCRIPTION_ALIASES
        .get(description)
        .copied()
        .unwrap_or(description);

    if !aliased.starts_with(TDA_TRANSFER_PREFIX) {
        return aliased.to_string();
    }

    TDA_TICKER_TOKENS
        .iter()
        .fold(aliased.to_string(), |desc, (token, full_name)| {
            if desc.contains(token) {
                full_name.to_string()
            } else {
                desc
            }
        })
}
