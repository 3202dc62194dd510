use std::fmt::Display;

use rust_decimal::Decimal;

use crate::util::decimal::{dollar_precision_str, qif_number_str};

/// The account type header which starts every document.
pub const INVESTMENT_ACCOUNT_HEADER: &str = "!Type:Invst";

/// Category for cash transfers in, which matches them against transactions
/// already present in the account.
pub const MATCHED_PAST_TXS_CATEGORY: &str = "[InvestmentMatchingTransactionsFromPast]";

#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Debug)]
pub enum QifAction {
    Buy,
    Sell,
    Dividend,
    ReinvestedDividend,
    MiscIncome,
    Tax,
    SharesIn,
    CashTransferIn,
}

impl QifAction {
    /// The action line, as written in the QIF file.
    pub fn qif_str(&self) -> &'static str {
        match self {
            QifAction::Buy => "NBuy",
            QifAction::Sell => "NSell",
            QifAction::Dividend => "NDiv",
            QifAction::ReinvestedDividend => "NReinvDiv",
            QifAction::MiscIncome => "NMiscInc",
            QifAction::Tax => "NTax",
            QifAction::SharesIn => "NShrsIn",
            QifAction::CashTransferIn => "NXIn",
        }
    }

    fn pretty_str(&self) -> &'static str {
        match self {
            QifAction::Buy => "Buy",
            QifAction::Sell => "Sell",
            QifAction::Dividend => "Dividend",
            QifAction::ReinvestedDividend => "Reinvested Dividend",
            QifAction::MiscIncome => "Misc Income",
            QifAction::Tax => "Tax",
            QifAction::SharesIn => "Shares In",
            QifAction::CashTransferIn => "Cash Transfer In",
        }
    }

    /// Whether the description goes only into the payee line, with no
    /// separate memo line.
    pub fn is_payee_only(&self) -> bool {
        matches!(
            self,
            QifAction::MiscIncome | QifAction::CashTransferIn | QifAction::Dividend
        )
    }
}

impl Display for QifAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.pretty_str())
    }
}

/// A single tagged line of a QIF record.
#[derive(PartialEq, Eq, Clone, Debug)]
pub enum QifLine {
    Date(String),
    Action(QifAction),
    Memo(String),
    Payee(String),
    Quantity(Decimal),
    Price(Decimal),
    Amount(Decimal),
    Total(Decimal),
    TransferAmount(Decimal),
    Category(String),
    // None is rendered as an explicit zero commission.
    Commission(Option<Decimal>),
    End,
}

impl Display for QifLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QifLine::Date(d) => write!(f, "D{d}"),
            QifLine::Action(a) => write!(f, "{}", a.qif_str()),
            QifLine::Memo(m) => write!(f, "Y{m}"),
            QifLine::Payee(p) => write!(f, "P{p}"),
            QifLine::Quantity(q) => write!(f, "Q{}", qif_number_str(q)),
            QifLine::Price(p) => write!(f, "I{}", qif_number_str(p)),
            QifLine::Amount(a) => write!(f, "U{}", qif_number_str(a)),
            QifLine::Total(t) => write!(f, "T{}", qif_number_str(t)),
            QifLine::TransferAmount(a) => write!(f, "${}", qif_number_str(a)),
            QifLine::Category(c) => write!(f, "L{c}"),
            QifLine::Commission(Some(c)) => write!(f, "O{}", qif_number_str(c)),
            QifLine::Commission(None) => {
                write!(f, "O{}", dollar_precision_str(&Decimal::ZERO))
            }
            QifLine::End => write!(f, "^"),
        }
    }
}

/// All the lines for one transaction, including the terminating "^".
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct QifRecord {
    pub action: QifAction,
    pub lines: Vec<QifLine>,
}
