use std::collections::HashMap;

use lazy_static::lazy_static;

use crate::qif::QifAction;

use super::{normalize_description, BrokerageTx};

// The brokerage reports interest on its cash alternatives sweep as a
// journaled share quantity, rather than as an amount.
const CASH_ALTERNATIVES_INTEREST: &str = "CASH ALTERNATIVES INTEREST (MMDA2)";

// Replacement description for reinvested dividends that did not buy shares.
const CASH_DIVIDEND_DESCRIPTION: &str = "CUR:USD";

lazy_static! {
    static ref ACTION_MAP: HashMap<&'static str, QifAction> = HashMap::from([
        ("Reinvest Shares", QifAction::ReinvestedDividend),
        ("Reinvest Dividend", QifAction::ReinvestedDividend),
        ("Qual Div Reinvest", QifAction::ReinvestedDividend),
        ("Buy", QifAction::Buy),
        ("Sell", QifAction::Sell),
        ("Cash Dividend", QifAction::Dividend),
        ("Qualified Dividend", QifAction::Dividend),
        ("Bank Interest", QifAction::MiscIncome),
        ("Misc Credits", QifAction::MiscIncome),
        ("MoneyLink Transfer", QifAction::MiscIncome),
        ("Bond Interest", QifAction::MiscIncome),
        ("Foreign Tax Paid", QifAction::Tax),
        // Refined by refine_share_transfer
        ("Security Transfer", QifAction::MiscIncome),
        ("Journaled Shares", QifAction::MiscIncome),
        ("Internal Transfer", QifAction::MiscIncome),
    ]);
}

/// Looks up the initial action for a raw brokerage action name.
/// Matching is exact and case-sensitive.
pub fn classify_action(raw_action: &str) -> Option<QifAction> {
    ACTION_MAP.get(raw_action).copied()
}

/// A transaction whose brokerage action was not recognized.
/// These are skipped, and produce no QIF output.
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct UnsupportedAction {
    pub raw_action: String,
}

impl std::fmt::Display for UnsupportedAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Skipping unsupported Action: {}", self.raw_action)
    }
}

/// A brokerage transaction with its final QIF action, and its fields
/// adjusted to match that action.
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct ClassifiedTx {
    pub action: QifAction,
    pub date: String,
    /// The brokerage's action name, kept for the payee line.
    pub raw_action: String,
    pub description: String,
    pub symbol: String,
    pub quantity: String,
    pub price: String,
    pub amount: String,
    pub commission: String,
}

impl ClassifiedTx {
    fn new(tx: BrokerageTx, action: QifAction) -> Self {
        ClassifiedTx {
            action,
            date: tx.date,
            raw_action: tx.action,
            description: tx.description,
            symbol: tx.symbol,
            quantity: tx.quantity,
            price: tx.price,
            amount: tx.amount,
            commission: tx.fees_and_comm,
        }
    }

    // Shares moved in, with no cash attached.
    fn is_share_only(&self) -> bool {
        !self.quantity.is_empty() && self.amount.is_empty()
    }
}

/// Classifies a brokerage transaction, and rebuilds it for QIF output.
///
/// Each step takes the transaction from the previous one, and returns a new
/// one. The order is fixed:
/// 1. Initial action from the action name.
/// 2. Transfers and journals which only moved shares.
/// 3. Reinvested dividends.
/// 4. Description normalization.
pub fn classify_tx(tx: BrokerageTx) -> Result<ClassifiedTx, UnsupportedAction> {
    let action = classify_action(&tx.action).ok_or_else(|| UnsupportedAction {
        raw_action: tx.action.clone(),
    })?;

    let ctx = ClassifiedTx::new(tx, action);
    let ctx = refine_share_transfer(ctx);
    let ctx = refine_reinvestment(ctx);
    let ctx = with_normalized_description(ctx);

    tracing::debug!(
        "classify_tx: {} {:?} -> {}",
        ctx.date,
        ctx.raw_action,
        ctx.action.qif_str()
    );
    Ok(ctx)
}

fn refine_share_transfer(tx: ClassifiedTx) -> ClassifiedTx {
    if !tx.is_share_only() {
        return tx;
    }

    let is_transfer = matches!(
        tx.raw_action.as_str(),
        "Security Transfer" | "Internal Transfer"
    );
    let is_journal = tx.raw_action == "Journaled Shares";

    if is_journal && tx.description.contains(CASH_ALTERNATIVES_INTEREST) {
        // The "quantity" here is actually the interest paid.
        ClassifiedTx {
            action: QifAction::MiscIncome,
            amount: tx.quantity,
            quantity: String::new(),
            ..tx
        }
    } else if is_transfer || is_journal {
        ClassifiedTx {
            action: QifAction::SharesIn,
            ..tx
        }
    } else {
        tx
    }
}

fn refine_reinvestment(tx: ClassifiedTx) -> ClassifiedTx {
    if tx.action != QifAction::ReinvestedDividend {
        return tx;
    }

    if tx.quantity.is_empty() {
        // No shares were bought. It was just paid out.
        ClassifiedTx {
            action: QifAction::Dividend,
            description: CASH_DIVIDEND_DESCRIPTION.to_string(),
            ..tx
        }
    } else {
        // The reinvestment half. Recorded as a purchase of the new shares.
        ClassifiedTx {
            action: QifAction::Buy,
            ..tx
        }
    }
}

fn with_normalized_description(tx: ClassifiedTx) -> ClassifiedTx {
    ClassifiedTx {
        description: normalize_description(&tx.description),
        ..tx
    }
}
